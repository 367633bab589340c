// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Imported posts (investigator): searchable listing, bulk JSON import and
//! image export.
//!
//! Unlike the other management pages posts are read-only here, so this is a
//! dedicated view model rather than a managed collection.

use crate::collection::{Flash, Paginator};
use crate::error::{AppError, Result};
use crate::models::post::PostsResponse;
use crate::models::{Post, Study};
use crate::services::ApiClient;
use crate::session::Actor;
use crate::AppState;
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

pub const PAGE_SIZE: usize = 7;

const LOAD_FAILED: &str = "Erro ao carregar posts.";
const READ_FAILED: &str = "Erro ao ler ficheiro JSON.";
const IMPORT_INCOMPLETE: &str = "Seleciona um ficheiro JSON válido e um estudo.";
const IMPORT_FAILED: &str = "Erro ao importar o ficheiro JSON.";

/// A pending bulk import: parsed posts plus the target study.
#[derive(Debug, Clone, Default)]
pub struct ImportDraft {
    /// Name of the selected file, for display
    pub file_name: Option<String>,
    posts: Vec<Value>,
    study_id: Option<i64>,
    in_flight: bool,
}

impl ImportDraft {
    /// Replace the draft's posts with the JSON array in `text`.
    ///
    /// On failure the previously parsed posts are discarded.
    pub fn parse(&mut self, file_name: impl Into<String>, text: &str) -> Result<usize> {
        self.file_name = Some(file_name.into());
        self.posts.clear();

        let posts: Vec<Value> = serde_json::from_str(text).map_err(|e| {
            tracing::warn!(error = %e, "Import file is not a JSON array");
            AppError::Validation(READ_FAILED.to_string())
        })?;
        self.posts = posts;
        Ok(self.posts.len())
    }

    /// Read and parse a JSON file from disk.
    pub async fn load_file(&mut self, path: &Path) -> Result<usize> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let text = tokio::fs::read_to_string(path).await.map_err(|e| {
            tracing::warn!(path = %path.display(), error = %e, "Could not read import file");
            AppError::Validation(READ_FAILED.to_string())
        })?;
        self.parse(name, &text)
    }

    pub fn select_study(&mut self, study_id: Option<i64>) {
        self.study_id = study_id;
    }

    pub fn study_id(&self) -> Option<i64> {
        self.study_id
    }

    pub fn post_count(&self) -> usize {
        self.posts.len()
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    /// Submission needs posts and an explicitly chosen study.
    pub fn can_submit(&self) -> bool {
        !self.posts.is_empty() && self.study_id.is_some() && !self.in_flight
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ImportPayload<'a> {
    posts: &'a [Value],
    study_id: i64,
}

/// View model of the posts screen.
pub struct PostsPage {
    api: ApiClient,
    actor: Actor,
    posts: Vec<Post>,
    studies: Vec<Study>,
    search: String,
    study_filter: Option<i64>,
    pager: Paginator,
    page_error: Flash,
    /// Blocking notice, stays until dismissed
    notice: Option<String>,
    draft: ImportDraft,
}

impl PostsPage {
    /// Create and fetch posts and the investigator's studies.
    pub async fn mount(state: &AppState) -> Result<Self> {
        let actor = state.session.require_actor()?;
        let mut page = Self {
            api: state.api.clone(),
            actor,
            posts: Vec::new(),
            studies: Vec::new(),
            search: String::new(),
            study_filter: None,
            pager: Paginator::new(PAGE_SIZE),
            page_error: Flash::new(state.config.flash_window),
            notice: None,
            draft: ImportDraft::default(),
        };

        if let Err(e) = page.load().await {
            tracing::warn!(error = %e, "Initial posts fetch failed");
        }
        match super::own_studies(&page.api, &page.actor).await {
            Ok(studies) => page.studies = studies,
            Err(e) => tracing::warn!(error = %e, "Could not fetch studies for posts page"),
        }
        Ok(page)
    }

    /// Re-fetch the post list.
    pub async fn load(&mut self) -> Result<()> {
        match self
            .api
            .get_json::<PostsResponse>("/posts/investigador", &[])
            .await
        {
            Ok(response) => {
                tracing::debug!(count = response.posts.len(), "Posts loaded");
                self.posts = response.posts;
                let len = self.filtered_len();
                self.pager.set_page(self.pager.page(), len);
                Ok(())
            }
            Err(e) => {
                self.page_error.set(LOAD_FAILED);
                Err(e)
            }
        }
    }

    // ─── Listing ─────────────────────────────────────────────────

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn studies(&self) -> &[Study] {
        &self.studies
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn study_filter(&self) -> Option<i64> {
        self.study_filter
    }

    /// Change the search term; the listing restarts at page 1.
    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
        self.pager.reset();
    }

    /// Restrict to one study (or none); the listing restarts at page 1.
    pub fn set_study_filter(&mut self, study_id: Option<i64>) {
        self.study_filter = study_id;
        self.pager.reset();
    }

    pub fn filtered(&self) -> Vec<&Post> {
        self.posts
            .iter()
            .filter(|post| post.matches(&self.search, self.study_filter))
            .collect()
    }

    fn filtered_len(&self) -> usize {
        self.filtered().len()
    }

    pub fn page(&self) -> usize {
        self.pager.page()
    }

    pub fn total_pages(&self) -> usize {
        self.pager.total_pages(self.filtered_len())
    }

    pub fn set_page(&mut self, page: usize) -> usize {
        let len = self.filtered_len();
        self.pager.set_page(page, len)
    }

    pub fn page_items(&self) -> Vec<&Post> {
        let filtered = self.filtered();
        self.pager.slice(&filtered).to_vec()
    }

    pub fn page_error(&self) -> Option<String> {
        self.page_error.message()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    // ─── Import ──────────────────────────────────────────────────

    pub fn draft(&self) -> &ImportDraft {
        &self.draft
    }

    /// Load a JSON file into the draft. A parse failure raises a notice.
    pub async fn choose_file(&mut self, path: &Path) -> Result<usize> {
        let result = self.draft.load_file(path).await;
        if let Err(e) = &result {
            self.notice = Some(e.to_string());
        }
        result
    }

    pub fn select_study(&mut self, study_id: Option<i64>) {
        self.draft.select_study(study_id);
    }

    /// Send the draft in one request; on success clear it and re-fetch.
    pub async fn import(&mut self) -> Result<usize> {
        let study_id = match self.draft.study_id {
            Some(id) if self.draft.can_submit() => id,
            _ => {
                self.notice = Some(IMPORT_INCOMPLETE.to_string());
                return Err(AppError::Validation(IMPORT_INCOMPLETE.to_string()));
            }
        };

        self.draft.in_flight = true;
        let payload = ImportPayload {
            posts: &self.draft.posts,
            study_id,
        };
        let result = self.api.post("/posts", &payload).await;
        self.draft.in_flight = false;

        match result {
            Ok(()) => {
                let count = self.draft.posts.len();
                tracing::info!(count, study_id, "Posts imported");
                self.draft = ImportDraft::default();
                if let Err(e) = self.load().await {
                    tracing::debug!(error = %e, "Re-fetch after import failed");
                }
                Ok(count)
            }
            Err(e) => {
                tracing::warn!(study_id, error = %e, "Import failed");
                self.notice = Some(IMPORT_FAILED.to_string());
                Err(e)
            }
        }
    }

    // ─── Images ──────────────────────────────────────────────────

    /// Decode a post's first image and write it to `dest`.
    pub async fn export_image(&self, post_id: i64, dest: &Path) -> Result<PathBuf> {
        let post = self
            .posts
            .iter()
            .find(|post| post.id == post_id)
            .ok_or_else(|| AppError::BadRequest(format!("post {post_id} not found")))?;
        let image = post
            .images
            .first()
            .ok_or_else(|| AppError::BadRequest(format!("post {post_id} has no image")))?;

        let bytes = image
            .decode()
            .map_err(|e| AppError::Decode(format!("image of post {post_id}: {e}")))?;
        tokio::fs::write(dest, &bytes)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("writing {}: {e}", dest.display())))?;

        tracing::info!(post_id, path = %dest.display(), bytes = bytes.len(), "Image exported");
        Ok(dest.to_path_buf())
    }
}
