// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Classification categories management (investigator).

use crate::collection::{ManagedCollection, Messages, Resource};
use crate::error::Result;
use crate::models::category::{merge_type_suggestions, sanitize_category_type};
use crate::models::{Category, Question};
use crate::services::ApiClient;
use crate::session::Actor;
use serde::Serialize;
use validator::Validate;

pub type CategoriesPage = ManagedCollection<Categories>;

#[derive(Debug, Clone, Default, Validate)]
pub struct CategoryForm {
    #[validate(length(min = 1, message = "Preenche todos os campos."))]
    pub name: String,
    /// Free text; digits are stripped before submission
    #[validate(length(min = 1, message = "Preenche todos os campos."))]
    pub category_type: String,
    #[validate(required(message = "Preenche todos os campos."))]
    pub question_id: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CategoryPayload<'a> {
    name: &'a str,
    category_type: &'a str,
    question_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    updated_by: Option<&'a str>,
}

impl<'a> From<&'a CategoryForm> for CategoryPayload<'a> {
    fn from(form: &'a CategoryForm) -> Self {
        Self {
            name: &form.name,
            category_type: &form.category_type,
            question_id: form.question_id,
            updated_by: None,
        }
    }
}

/// Resource configuration for `/categories`.
pub struct Categories;

impl Resource for Categories {
    type Item = Category;
    type Key = i64;
    type Form = CategoryForm;

    const LABEL: &'static str = "category";
    const PAGE_SIZE: usize = 10;
    const FIELD_ORDER: &'static [&'static str] = &["name", "category_type", "question_id"];
    const MESSAGES: Messages = Messages {
        load_failed: "Erro ao carregar categorias.",
        create_failed: "Erro ao criar categoria.",
        update_failed: "Erro ao atualizar categoria.",
        delete_failed: "Erro ao apagar categoria.",
        create_conflict: "Essa categoria já existe.",
        update_conflict: "Essa categoria já existe.",
        prefer_server_message: false,
    };

    fn key(item: &Category) -> i64 {
        item.id
    }

    fn form_from(item: &Category) -> CategoryForm {
        CategoryForm {
            name: item.name.clone(),
            category_type: item.category_type.clone(),
            question_id: item.question_id,
        }
    }

    fn normalize(form: &mut CategoryForm) {
        form.name = form.name.trim().to_string();
        form.category_type = sanitize_category_type(&form.category_type);
    }

    async fn fetch(api: &ApiClient, actor: &Actor) -> Result<Vec<Category>> {
        api.get_json("/categories", &[("username", actor.username.as_str())])
            .await
    }

    async fn create(api: &ApiClient, _actor: &Actor, form: &CategoryForm) -> Result<()> {
        api.post("/categories", &CategoryPayload::from(form)).await
    }

    async fn update(api: &ApiClient, actor: &Actor, id: &i64, form: &CategoryForm) -> Result<()> {
        let payload = CategoryPayload {
            updated_by: Some(actor.username.as_str()),
            ..CategoryPayload::from(form)
        };
        api.put(&format!("/categories/{id}"), &payload).await
    }

    async fn delete(api: &ApiClient, _actor: &Actor, id: &i64) -> Result<()> {
        api.delete(&format!("/categories/{id}")).await
    }
}

/// Type suggestions for the category type field: built-in types first, then
/// whatever the backend already knows, without duplicates.
///
/// A failed lookup falls back to the built-in types.
pub async fn type_suggestions(api: &ApiClient, actor: &Actor) -> Vec<String> {
    let server: Vec<String> = match api
        .get_json("/categories/types", &[("username", actor.username.as_str())])
        .await
    {
        Ok(types) => types,
        Err(e) => {
            tracing::warn!(error = %e, "Could not fetch category types");
            Vec::new()
        }
    };
    merge_type_suggestions(&server)
}

/// Questions a category can be attached to.
pub async fn question_choices(api: &ApiClient, actor: &Actor) -> Result<Vec<Question>> {
    api.get_json("/questions", &[("username", actor.username.as_str())])
        .await
}
