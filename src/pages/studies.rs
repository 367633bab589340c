// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Research studies management (investigator).

use crate::collection::{ManagedCollection, Messages, Resource};
use crate::error::{AppError, Result};
use crate::models::Study;
use crate::services::ApiClient;
use crate::session::Actor;
use crate::time_utils::format_utc_rfc3339;
use chrono::{DateTime, Utc};
use serde::Serialize;
use validator::Validate;

const ALL_REQUIRED: &str = "Todos os campos são obrigatórios.";

pub type StudiesPage = ManagedCollection<Studies>;

/// Create/edit form for a study. Numeric fields are `None` until entered.
#[derive(Debug, Clone, Default, Validate)]
pub struct StudyForm {
    #[validate(length(min = 1, message = "Todos os campos são obrigatórios."))]
    pub name: String,
    #[validate(length(min = 1, message = "Todos os campos são obrigatórios."))]
    pub obs: String,
    #[validate(
        required(message = "Todos os campos são obrigatórios."),
        range(
            min = 1,
            message = "O mínimo de classificações por post deve ser um número positivo."
        )
    )]
    pub min_classifications_per_post: Option<u32>,
    #[validate(
        required(message = "Todos os campos são obrigatórios."),
        range(
            min = 0.0,
            max = 100.0,
            message = "A percentagem de validação deve estar entre 0 e 100."
        )
    )]
    pub validation_agreement_percent: Option<f64>,
    /// No deadline when `None`
    pub finished_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StudyPayload<'a> {
    name: &'a str,
    obs: &'a str,
    min_classifications_per_post: u32,
    validation_agreement_percent: f64,
    finished_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    added_by: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    updated_by: Option<&'a str>,
}

impl<'a> StudyPayload<'a> {
    /// Build from a validated form.
    fn new(form: &'a StudyForm) -> Result<Self> {
        let missing = || AppError::Validation(ALL_REQUIRED.to_string());

        Ok(Self {
            name: &form.name,
            obs: &form.obs,
            min_classifications_per_post: form.min_classifications_per_post.ok_or_else(missing)?,
            validation_agreement_percent: form.validation_agreement_percent.ok_or_else(missing)?,
            finished_at: form.finished_at.map(format_utc_rfc3339),
            added_by: None,
            updated_by: None,
        })
    }
}

/// Resource configuration for `/studies`.
pub struct Studies;

impl Resource for Studies {
    type Item = Study;
    type Key = i64;
    type Form = StudyForm;

    const LABEL: &'static str = "study";
    const PAGE_SIZE: usize = 10;
    const FIELD_ORDER: &'static [&'static str] = &[
        "name",
        "obs",
        "min_classifications_per_post",
        "validation_agreement_percent",
    ];
    const MESSAGES: Messages = Messages {
        load_failed: "Erro ao carregar estudos.",
        create_failed: "Erro ao criar estudo.",
        update_failed: "Erro ao atualizar estudo.",
        delete_failed: "Erro ao apagar estudo.",
        create_conflict: "Já existe um estudo com esse nome.",
        update_conflict: "Já existe outro estudo com esse nome.",
        prefer_server_message: false,
    };

    fn key(item: &Study) -> i64 {
        item.id
    }

    fn form_from(item: &Study) -> StudyForm {
        StudyForm {
            name: item.name.clone(),
            obs: item.obs.clone(),
            min_classifications_per_post: Some(item.min_classifications_per_post),
            validation_agreement_percent: Some(item.validation_agreement_percent),
            finished_at: item.finished_at,
        }
    }

    fn normalize(form: &mut StudyForm) {
        form.name = form.name.trim().to_string();
        form.obs = form.obs.trim().to_string();
        // NaN would slip through a range check
        form.validation_agreement_percent =
            form.validation_agreement_percent.filter(|p| p.is_finite());
    }

    async fn fetch(api: &ApiClient, actor: &Actor) -> Result<Vec<Study>> {
        super::own_studies(api, actor).await
    }

    async fn create(api: &ApiClient, actor: &Actor, form: &StudyForm) -> Result<()> {
        let payload = StudyPayload {
            added_by: Some(actor.username.as_str()),
            ..StudyPayload::new(form)?
        };
        api.post("/studies", &payload).await
    }

    async fn update(api: &ApiClient, actor: &Actor, id: &i64, form: &StudyForm) -> Result<()> {
        let payload = StudyPayload {
            updated_by: Some(actor.username.as_str()),
            ..StudyPayload::new(form)?
        };
        api.put(&format!("/studies/{id}"), &payload).await
    }

    async fn delete(api: &ApiClient, _actor: &Actor, id: &i64) -> Result<()> {
        api.delete(&format!("/studies/{id}")).await
    }
}
