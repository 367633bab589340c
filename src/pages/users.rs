// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User accounts management (admin).

use crate::collection::{ManagedCollection, Messages, Resource};
use crate::error::Result;
use crate::models::{Role, User};
use crate::services::ApiClient;
use crate::session::Actor;
use serde::Serialize;
use validator::{Validate, ValidationError};

/// Audit value sent as `createdBy`/`updatedBy` for account changes.
const AUDIT_ACTOR: &str = "admin";

pub type UsersPage = ManagedCollection<Users>;

/// Create/edit form for an account.
///
/// On edit an empty password means "unchanged" and is left out of the request.
#[derive(Debug, Clone, Validate)]
#[validate(schema(function = "required_fields", skip_on_field_errors = false))]
pub struct UserForm {
    pub username: String,
    #[validate(email(message = "Email inválido."))]
    pub email: String,
    pub password: String,
    pub role: Role,
    /// Set when the form was pre-filled from an existing account
    pub editing: bool,
}

impl Default for UserForm {
    fn default() -> Self {
        Self {
            username: String::new(),
            email: String::new(),
            password: String::new(),
            role: Role::User,
            editing: false,
        }
    }
}

fn required_fields(form: &UserForm) -> std::result::Result<(), ValidationError> {
    let missing_identity = form.username.is_empty() || form.email.is_empty();

    if form.editing && missing_identity {
        return Err(ValidationError::new("required")
            .with_message("Username e email são obrigatórios.".into()));
    }
    if !form.editing && (missing_identity || form.password.is_empty()) {
        return Err(ValidationError::new("required")
            .with_message("Preencha username, email e password.".into()));
    }
    Ok(())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UserPayload<'a> {
    username: &'a str,
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    password: Option<&'a str>,
    #[serde(rename = "type")]
    role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    created_by: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    updated_by: Option<&'static str>,
}

impl<'a> UserPayload<'a> {
    fn new(form: &'a UserForm) -> Self {
        Self {
            username: &form.username,
            email: &form.email,
            password: Some(form.password.as_str()).filter(|p| !p.is_empty()),
            role: form.role,
            created_by: None,
            updated_by: None,
        }
    }
}

/// Resource configuration for `/users`.
pub struct Users;

impl Resource for Users {
    type Item = User;
    type Key = i64;
    type Form = UserForm;

    const LABEL: &'static str = "user";
    const PAGE_SIZE: usize = 5;
    const FIELD_ORDER: &'static [&'static str] = &["__all__", "email"];
    const MESSAGES: Messages = Messages {
        load_failed: "Erro ao carregar utilizadores.",
        create_failed: "Erro ao criar utilizador.",
        update_failed: "Erro ao atualizar utilizador.",
        delete_failed: "Erro ao apagar utilizador.",
        create_conflict: "Erro ao criar utilizador.",
        update_conflict: "Erro ao atualizar utilizador.",
        prefer_server_message: true,
    };

    fn key(item: &User) -> i64 {
        item.id
    }

    fn form_from(item: &User) -> UserForm {
        UserForm {
            username: item.username.clone(),
            email: item.email.clone(),
            password: String::new(),
            role: item.role,
            editing: true,
        }
    }

    fn normalize(form: &mut UserForm) {
        form.username = form.username.trim().to_string();
        form.email = form.email.trim().to_string();
    }

    fn is_self(item: &User, actor: &Actor) -> bool {
        item.username == actor.username
    }

    async fn fetch(api: &ApiClient, _actor: &Actor) -> Result<Vec<User>> {
        api.get_json("/users", &[]).await
    }

    async fn create(api: &ApiClient, _actor: &Actor, form: &UserForm) -> Result<()> {
        let payload = UserPayload {
            created_by: Some(AUDIT_ACTOR),
            ..UserPayload::new(form)
        };
        api.post("/users", &payload).await
    }

    async fn update(api: &ApiClient, _actor: &Actor, id: &i64, form: &UserForm) -> Result<()> {
        let payload = UserPayload {
            updated_by: Some(AUDIT_ACTOR),
            ..UserPayload::new(form)
        };
        api.put(&format!("/users/{id}"), &payload).await
    }

    async fn delete(api: &ApiClient, _actor: &Actor, id: &i64) -> Result<()> {
        api.delete(&format!("/users/{id}")).await
    }
}
