// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Questions management (investigator).

use crate::collection::{ManagedCollection, Messages, Resource};
use crate::error::Result;
use crate::models::{InputType, Question};
use crate::services::ApiClient;
use crate::session::Actor;
use serde::Serialize;
use validator::Validate;

pub type QuestionsPage = ManagedCollection<Questions>;

#[derive(Debug, Clone, Default, Validate)]
pub struct QuestionForm {
    #[validate(length(min = 1, message = "Preencha todos os campos."))]
    pub question: String,
    #[validate(length(min = 1, message = "Preencha todos os campos."))]
    pub content: String,
    pub input_type: InputType,
    #[validate(required(message = "Preencha todos os campos."))]
    pub study_id: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QuestionPayload<'a> {
    question: &'a str,
    content: &'a str,
    input_type: InputType,
    study_id: Option<i64>,
}

impl<'a> From<&'a QuestionForm> for QuestionPayload<'a> {
    fn from(form: &'a QuestionForm) -> Self {
        Self {
            question: &form.question,
            content: &form.content,
            input_type: form.input_type,
            study_id: form.study_id,
        }
    }
}

/// Resource configuration for `/questions`.
pub struct Questions;

impl Resource for Questions {
    type Item = Question;
    type Key = i64;
    type Form = QuestionForm;

    const LABEL: &'static str = "question";
    const PAGE_SIZE: usize = 10;
    const FIELD_ORDER: &'static [&'static str] = &["question", "content", "study_id"];
    const MESSAGES: Messages = Messages {
        load_failed: "Erro ao carregar perguntas.",
        create_failed: "Erro ao criar pergunta.",
        update_failed: "Erro ao atualizar pergunta.",
        delete_failed: "Erro ao apagar pergunta.",
        create_conflict: "Já existe uma pergunta com esse nome neste estudo.",
        update_conflict: "Já existe uma pergunta com esse nome neste estudo.",
        prefer_server_message: false,
    };

    fn key(item: &Question) -> i64 {
        item.id
    }

    fn form_from(item: &Question) -> QuestionForm {
        QuestionForm {
            question: item.question.clone(),
            content: item.content.clone(),
            input_type: item.input_type,
            study_id: item.study_id,
        }
    }

    fn normalize(form: &mut QuestionForm) {
        form.question = form.question.trim().to_string();
        form.content = form.content.trim().to_string();
    }

    async fn fetch(api: &ApiClient, actor: &Actor) -> Result<Vec<Question>> {
        api.get_json("/questions", &[("username", actor.username.as_str())])
            .await
    }

    async fn create(api: &ApiClient, _actor: &Actor, form: &QuestionForm) -> Result<()> {
        api.post("/questions", &QuestionPayload::from(form)).await
    }

    async fn update(api: &ApiClient, _actor: &Actor, id: &i64, form: &QuestionForm) -> Result<()> {
        api.put(&format!("/questions/{id}"), &QuestionPayload::from(form))
            .await
    }

    async fn delete(api: &ApiClient, _actor: &Actor, id: &i64) -> Result<()> {
        api.delete(&format!("/questions/{id}")).await
    }
}
