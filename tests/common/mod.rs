// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory mock of the classification API, served on an ephemeral port.
//!
//! Every request is recorded so tests can assert which calls were (or were
//! not) made. Individual routes can be forced to fail with
//! [`MockBackend::fail`].

#![allow(dead_code)]

use axum::{
    body::Bytes,
    extract::State,
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json, Router,
};
use classify_admin::config::Config;
use classify_admin::models::Role;
use classify_admin::services::credentials::{USERNAME_KEY, USER_TYPE_KEY};
use classify_admin::services::CredentialStore;
use classify_admin::session::SessionWriter;
use classify_admin::AppState;
use dashmap::DashMap;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

/// One request as seen by the mock.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub body: Option<Value>,
}

#[derive(Default)]
pub struct MockState {
    pub users: DashMap<i64, Value>,
    pub studies: DashMap<i64, Value>,
    pub categories: DashMap<i64, Value>,
    pub questions: DashMap<i64, Value>,
    /// user id -> associated study ids
    pub user_studies: DashMap<i64, Vec<i64>>,
    pub posts: Mutex<Vec<Value>>,
    pub stats: Mutex<Vec<Value>>,
    /// "METHOD /path" -> forced status
    failures: DashMap<String, u16>,
    requests: Mutex<Vec<Recorded>>,
    next_id: AtomicI64,
}

impl MockState {
    fn id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }
}

pub struct MockBackend {
    pub base_url: String,
    pub state: Arc<MockState>,
    /// Holds the session file for states built by this backend
    pub dir: TempDir,
}

/// Start a mock backend on `127.0.0.1:0`.
pub async fn spawn() -> MockBackend {
    let state = Arc::new(MockState::default());
    let app = Router::new().fallback(handle).with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock backend");
    let addr = listener.local_addr().expect("mock backend address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("mock backend");
    });

    MockBackend {
        base_url: format!("http://{addr}"),
        state,
        dir: tempfile::tempdir().expect("temp dir"),
    }
}

impl MockBackend {
    pub fn config(&self) -> Config {
        Config {
            api_url: self.base_url.clone(),
            session_file: self.dir.path().join("session.json"),
            flash_window: Duration::from_millis(3000),
            request_timeout: Duration::from_secs(5),
        }
    }

    /// App state with no persisted session.
    pub fn anonymous(&self) -> (AppState, SessionWriter) {
        AppState::bootstrap(self.config()).expect("bootstrap")
    }

    /// App state restored as `username` with `role`.
    pub fn logged_in(&self, username: &str, role: Role) -> (AppState, SessionWriter) {
        let config = self.config();
        CredentialStore::new(config.session_file.clone())
            .set_many(&[(USERNAME_KEY, username), (USER_TYPE_KEY, role.as_str())])
            .expect("seed session");
        AppState::bootstrap(config).expect("bootstrap")
    }

    // ─── Seeding ─────────────────────────────────────────────────

    pub fn add_user(&self, username: &str, role: Role) -> i64 {
        let id = self.state.id();
        self.state.users.insert(
            id,
            json!({
                "id": id,
                "username": username,
                "email": format!("{username}@example.com"),
                "type": role.as_str(),
                "password": "secret",
            }),
        );
        id
    }

    pub fn add_study(&self, name: &str, owner: &str) -> i64 {
        let id = self.state.id();
        self.state.studies.insert(
            id,
            json!({
                "id": id,
                "name": name,
                "obs": "",
                "minClassificationsPerPost": 3,
                "validationAgreementPercent": "75",
                "finishedAt": null,
                "addedBy": owner,
            }),
        );
        id
    }

    pub fn add_question(&self, question: &str, study_id: i64) -> i64 {
        let id = self.state.id();
        self.state.questions.insert(
            id,
            json!({
                "id": id,
                "question": question,
                "content": "",
                "inputType": "radio",
                "studyId": study_id,
            }),
        );
        id
    }

    pub fn add_category(&self, name: &str, category_type: &str, question_id: i64) -> i64 {
        let id = self.state.id();
        self.state.categories.insert(
            id,
            json!({
                "id": id,
                "name": name,
                "categoryType": category_type,
                "questionId": question_id,
            }),
        );
        id
    }

    pub fn associate(&self, user_id: i64, study_id: i64) {
        self.state
            .user_studies
            .entry(user_id)
            .or_default()
            .push(study_id);
    }

    pub fn add_post(&self, page_name: &str, study_id: i64, image_base64: Option<&str>) -> i64 {
        let id = self.state.id();
        let images = image_base64
            .map(|data| vec![json!({ "image_data": data })])
            .unwrap_or_default();
        self.state.posts.lock().unwrap().push(json!({
            "id": id,
            "pageName": page_name,
            "details": format!("details of {page_name}"),
            "likesCount": 1,
            "commentsCount": 2,
            "sharesCount": 3,
            "studyId": study_id,
            "images": images,
        }));
        id
    }

    pub fn set_stats(&self, stats: Value) {
        *self.state.stats.lock().unwrap() = stats
            .as_array()
            .cloned()
            .unwrap_or_default();
    }

    /// Force every `method path` request to answer `status` with a message.
    pub fn fail(&self, method: Method, path: &str, status: u16) {
        self.state
            .failures
            .insert(format!("{method} {path}"), status);
    }

    pub fn heal(&self, method: Method, path: &str) {
        self.state.failures.remove(&format!("{method} {path}"));
    }

    // ─── Inspection ──────────────────────────────────────────────

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn count(&self, method: Method, path_prefix: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method == method && r.path.starts_with(path_prefix))
            .count()
    }

    pub fn last(&self, method: Method, path_prefix: &str) -> Option<Recorded> {
        self.requests()
            .into_iter()
            .rev()
            .find(|r| r.method == method && r.path.starts_with(path_prefix))
    }

    pub fn clear_requests(&self) {
        self.state.requests.lock().unwrap().clear();
    }
}

// ─── Request handling ────────────────────────────────────────────

fn reply(status: StatusCode, body: Value) -> Response {
    (status, Json(body)).into_response()
}

fn error(status: StatusCode, message: &str) -> Response {
    reply(status, json!({ "message": message }))
}

fn sorted(map: &DashMap<i64, Value>) -> Vec<Value> {
    let mut items: Vec<(i64, Value)> = map
        .iter()
        .map(|entry| (*entry.key(), entry.value().clone()))
        .collect();
    items.sort_by_key(|(id, _)| *id);
    items.into_iter().map(|(_, v)| v).collect()
}

fn query_param(query: Option<&str>, name: &str) -> Option<String> {
    query?
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
}

async fn handle(
    State(state): State<Arc<MockState>>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> Response {
    let path = uri.path().to_string();
    let body: Option<Value> = serde_json::from_slice(&body).ok();
    state.requests.lock().unwrap().push(Recorded {
        method: method.clone(),
        path: path.clone(),
        query: uri.query().map(str::to_string),
        body: body.clone(),
    });

    if let Some(status) = state.failures.get(&format!("{method} {path}")) {
        let status = StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return error(status, "forced failure");
    }

    let body = body.unwrap_or(Value::Null);
    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
    let username = query_param(uri.query(), "username");

    match (method.clone(), segments.as_slice()) {
        (Method::POST, ["login"]) => login(&state, &body),
        (Method::POST, ["register"]) => {
            let mut user = body.clone();
            user["type"] = json!("user");
            create_user(&state, user)
        }

        (Method::GET, ["users"]) => reply(StatusCode::OK, json!(sorted(&state.users))),
        (Method::POST, ["users"]) => create_user(&state, body),
        (Method::PUT, ["users", id]) => update(&state.users, id, body, |_, _| false),
        (Method::DELETE, ["users", id]) => remove(&state.users, id),
        (Method::GET, ["users", id, "studies"]) => user_studies(&state, id),
        (Method::POST, ["users", id, "studies"]) => add_association(&state, id, &body),
        (Method::DELETE, ["users", id, "studies", study]) => {
            remove_association(&state, id, study)
        }

        (Method::GET, ["studies"]) => {
            let studies: Vec<Value> = sorted(&state.studies)
                .into_iter()
                .filter(|s| username.as_deref().map_or(true, |u| s["addedBy"] == u))
                .collect();
            reply(StatusCode::OK, json!(studies))
        }
        (Method::POST, ["studies"]) => create(&state, &state.studies, body, same_field("name")),
        (Method::PUT, ["studies", id]) => update(&state.studies, id, body, same_field("name")),
        (Method::DELETE, ["studies", id]) => remove(&state.studies, id),

        (Method::GET, ["categories", "types"]) => {
            let mut types: Vec<String> = sorted(&state.categories)
                .iter()
                .filter_map(|c| c["categoryType"].as_str().map(str::to_string))
                .collect();
            types.sort();
            types.dedup();
            reply(StatusCode::OK, json!(types))
        }
        (Method::GET, ["categories"]) => reply(StatusCode::OK, json!(sorted(&state.categories))),
        (Method::POST, ["categories"]) => {
            create(&state, &state.categories, body, same_field("name"))
        }
        (Method::PUT, ["categories", id]) => {
            update(&state.categories, id, body, same_field("name"))
        }
        (Method::DELETE, ["categories", id]) => remove(&state.categories, id),

        (Method::GET, ["questions"]) => reply(StatusCode::OK, json!(sorted(&state.questions))),
        (Method::POST, ["questions"]) => {
            create(&state, &state.questions, body, same_question)
        }
        (Method::PUT, ["questions", id]) => update(&state.questions, id, body, same_question),
        (Method::DELETE, ["questions", id]) => remove(&state.questions, id),

        (Method::GET, ["posts", "investigador"]) => {
            let posts = state.posts.lock().unwrap().clone();
            reply(StatusCode::OK, json!({ "posts": posts }))
        }
        (Method::POST, ["posts"]) => import_posts(&state, &body),

        (Method::GET, ["stats", "general"]) => {
            let stats = state.stats.lock().unwrap().clone();
            reply(StatusCode::OK, json!(stats))
        }

        _ => error(StatusCode::NOT_FOUND, "not found"),
    }
}

fn same_field(field: &'static str) -> impl Fn(&Value, &Value) -> bool {
    move |a, b| a[field] == b[field]
}

fn same_question(a: &Value, b: &Value) -> bool {
    a["question"] == b["question"] && a["studyId"] == b["studyId"]
}

fn login(state: &MockState, body: &Value) -> Response {
    let found = state.users.iter().find(|u| {
        u.value()["username"] == body["username"] && u.value()["password"] == body["password"]
    });
    match found {
        Some(user) => reply(
            StatusCode::OK,
            json!({ "username": user.value()["username"], "type": user.value()["type"] }),
        ),
        None => error(StatusCode::UNAUTHORIZED, "Credenciais inválidas."),
    }
}

fn create_user(state: &MockState, mut user: Value) -> Response {
    if state
        .users
        .iter()
        .any(|u| u.value()["username"] == user["username"])
    {
        return error(StatusCode::CONFLICT, "Username já está em uso.");
    }
    if user["email"].as_str().map_or(true, |e| !e.contains('@')) {
        return error(StatusCode::BAD_REQUEST, "Email inválido.");
    }
    let id = state.id();
    user["id"] = json!(id);
    state.users.insert(id, user);
    reply(StatusCode::CREATED, json!({ "id": id }))
}

fn create(
    state: &MockState,
    map: &DashMap<i64, Value>,
    mut item: Value,
    clashes: impl Fn(&Value, &Value) -> bool,
) -> Response {
    if map.iter().any(|existing| clashes(existing.value(), &item)) {
        return error(StatusCode::CONFLICT, "duplicate");
    }
    let id = state.id();
    item["id"] = json!(id);
    map.insert(id, item);
    reply(StatusCode::CREATED, json!({ "id": id }))
}

fn update(
    map: &DashMap<i64, Value>,
    id: &str,
    item: Value,
    clashes: impl Fn(&Value, &Value) -> bool,
) -> Response {
    let Ok(id) = id.parse::<i64>() else {
        return error(StatusCode::BAD_REQUEST, "bad id");
    };
    if map
        .iter()
        .any(|existing| *existing.key() != id && clashes(existing.value(), &item))
    {
        return error(StatusCode::CONFLICT, "duplicate");
    }
    match map.get_mut(&id) {
        Some(mut existing) => {
            if let (Some(target), Some(fields)) = (existing.as_object_mut(), item.as_object()) {
                for (key, value) in fields {
                    target.insert(key.clone(), value.clone());
                }
            }
            reply(StatusCode::OK, json!({ "id": id }))
        }
        None => error(StatusCode::NOT_FOUND, "not found"),
    }
}

fn remove(map: &DashMap<i64, Value>, id: &str) -> Response {
    match id.parse::<i64>().ok().and_then(|id| map.remove(&id)) {
        Some(_) => StatusCode::NO_CONTENT.into_response(),
        None => error(StatusCode::NOT_FOUND, "not found"),
    }
}

fn user_studies(state: &MockState, id: &str) -> Response {
    let Ok(id) = id.parse::<i64>() else {
        return error(StatusCode::BAD_REQUEST, "bad id");
    };
    let ids = state
        .user_studies
        .get(&id)
        .map(|ids| ids.value().clone())
        .unwrap_or_default();
    let studies: Vec<Value> = ids
        .iter()
        .filter_map(|sid| state.studies.get(sid).map(|s| s.value().clone()))
        .collect();
    reply(StatusCode::OK, json!(studies))
}

fn add_association(state: &MockState, id: &str, body: &Value) -> Response {
    let (Ok(user_id), Some(study_id)) = (id.parse::<i64>(), body["studyId"].as_i64()) else {
        return error(StatusCode::BAD_REQUEST, "bad association");
    };
    let mut ids = state.user_studies.entry(user_id).or_default();
    if ids.contains(&study_id) {
        return error(StatusCode::CONFLICT, "Association exists");
    }
    ids.push(study_id);
    reply(StatusCode::CREATED, json!({}))
}

fn remove_association(state: &MockState, id: &str, study: &str) -> Response {
    let (Ok(user_id), Ok(study_id)) = (id.parse::<i64>(), study.parse::<i64>()) else {
        return error(StatusCode::BAD_REQUEST, "bad association");
    };
    match state.user_studies.get_mut(&user_id) {
        Some(mut ids) if ids.contains(&study_id) => {
            ids.retain(|s| *s != study_id);
            StatusCode::NO_CONTENT.into_response()
        }
        _ => error(StatusCode::NOT_FOUND, "not found"),
    }
}

fn import_posts(state: &MockState, body: &Value) -> Response {
    let (Some(posts), Some(study_id)) = (body["posts"].as_array(), body["studyId"].as_i64()) else {
        return error(StatusCode::BAD_REQUEST, "posts and studyId required");
    };
    let mut stored = state.posts.lock().unwrap();
    for post in posts {
        let mut post = post.clone();
        post["id"] = json!(state.id());
        post["studyId"] = json!(study_id);
        stored.push(post);
    }
    reply(StatusCode::CREATED, json!({ "imported": posts.len() }))
}
