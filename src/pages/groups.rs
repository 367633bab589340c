// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User-to-study group associations (investigator).
//!
//! The backend has no association listing, so the page assembles it from
//! `GET /users` and one `GET /users/:id/studies` per user, keeping only the
//! associations that point at the investigator's own studies.

use crate::collection::{ManagedCollection, Messages, Resource};
use crate::error::{AppError, Result};
use crate::models::association::{AssociatedStudy, AssociationRequest};
use crate::models::{Association, Role, User};
use crate::services::ApiClient;
use crate::session::Actor;
use futures_util::{stream, StreamExt};
use std::collections::HashSet;
use validator::Validate;

/// Per-user association lookups in flight at once.
const MAX_CONCURRENT_REQUESTS: usize = 8;

const SELECT_BOTH: &str = "Seleciona um utilizador e um estudo.";

pub type GroupsPage = ManagedCollection<Groups>;

/// Associate (or, on edit, move) a user to a study.
#[derive(Debug, Clone, Default, Validate)]
pub struct GroupForm {
    #[validate(required(message = "Seleciona um utilizador e um estudo."))]
    pub user_id: Option<i64>,
    #[validate(required(message = "Seleciona um utilizador e um estudo."))]
    pub study_id: Option<i64>,
}

/// Resource configuration for `/users/:id/studies`.
pub struct Groups;

impl Resource for Groups {
    type Item = Association;
    /// `(user_id, study_id)`
    type Key = (i64, i64);
    type Form = GroupForm;

    const LABEL: &'static str = "association";
    const PAGE_SIZE: usize = 10;
    const FIELD_ORDER: &'static [&'static str] = &["user_id", "study_id"];
    const MESSAGES: Messages = Messages {
        load_failed: "Erro ao carregar associações.",
        create_failed: "Erro ao associar utilizador.",
        update_failed: "Erro ao editar associação.",
        delete_failed: "Erro ao remover associação.",
        create_conflict: "Esta associação já existe.",
        update_conflict: "Esta associação já existe.",
        prefer_server_message: false,
    };

    fn key(item: &Association) -> (i64, i64) {
        item.key()
    }

    /// The user is kept; the target study must be picked again.
    fn form_from(item: &Association) -> GroupForm {
        GroupForm {
            user_id: Some(item.user_id),
            study_id: None,
        }
    }

    async fn fetch(api: &ApiClient, actor: &Actor) -> Result<Vec<Association>> {
        let users: Vec<User> = api.get_json("/users", &[]).await?;
        let own: HashSet<i64> = super::own_studies(api, actor)
            .await?
            .into_iter()
            .map(|study| study.id)
            .collect();

        let per_user = stream::iter(users)
            .map(|user| async move {
                let studies: Vec<AssociatedStudy> = api
                    .get_json(&format!("/users/{}/studies", user.id), &[])
                    .await?;
                Ok::<_, AppError>((user, studies))
            })
            .buffered(MAX_CONCURRENT_REQUESTS)
            .collect::<Vec<_>>()
            .await;

        let mut associations = Vec::new();
        for entry in per_user {
            let (user, studies) = entry?;
            associations.extend(
                studies
                    .into_iter()
                    .filter(|study| own.contains(&study.id))
                    .map(|study| Association {
                        user_id: user.id,
                        study_id: study.id,
                        username: user.username.clone(),
                        study_name: study.name,
                    }),
            );
        }
        Ok(associations)
    }

    async fn create(api: &ApiClient, _actor: &Actor, form: &GroupForm) -> Result<()> {
        let (Some(user_id), Some(study_id)) = (form.user_id, form.study_id) else {
            return Err(AppError::Validation(SELECT_BOTH.to_string()));
        };
        associate(api, user_id, study_id).await
    }

    /// Move the association: remove the old pair, then add the new one.
    ///
    /// A failure after the old pair is gone is reported as partial so the
    /// page drops the stale row instead of retrying the removal.
    async fn update(
        api: &ApiClient,
        _actor: &Actor,
        &(user_id, old_study_id): &(i64, i64),
        form: &GroupForm,
    ) -> Result<()> {
        let Some(new_study_id) = form.study_id else {
            return Err(AppError::Validation(SELECT_BOTH.to_string()));
        };

        api.delete(&format!("/users/{user_id}/studies/{old_study_id}"))
            .await?;
        associate(api, user_id, new_study_id)
            .await
            .map_err(AppError::partial)
    }

    async fn delete(api: &ApiClient, _actor: &Actor, &(user_id, study_id): &(i64, i64)) -> Result<()> {
        api.delete(&format!("/users/{user_id}/studies/{study_id}"))
            .await
    }
}

async fn associate(api: &ApiClient, user_id: i64, study_id: i64) -> Result<()> {
    api.post(
        &format!("/users/{user_id}/studies"),
        &AssociationRequest { study_id },
    )
    .await
}

/// Accounts that can be added to a study: only plain users.
pub async fn candidate_users(api: &ApiClient) -> Result<Vec<User>> {
    let users: Vec<User> = api.get_json("/users", &[]).await?;
    Ok(users
        .into_iter()
        .filter(|user| user.role == Role::User)
        .collect())
}
