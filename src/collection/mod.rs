// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Managed collection: the fetch / paginate / mutate lifecycle every
//! management page shares.
//!
//! ```text
//! Loading ──fetch──▶ Idle ──open_create──▶ CreateOpen ──submit ok / cancel──▶ Idle
//!                     │  ──open_edit────▶ EditOpen   ──submit ok / cancel──▶ Idle
//!                     └──request_delete─▶ DeleteConfirm ──confirm ok / cancel─▶ Idle
//! ```
//!
//! A failed submit keeps its dialog open (form intact) and flashes a
//! modal-scoped error. A failed fetch flashes a page-scoped error and leaves
//! the page `Idle`. Successful mutations always re-fetch; nothing is updated
//! optimistically.

pub mod flash;
pub mod paginate;
pub mod validation;

use crate::error::{AppError, Result};
use crate::services::ApiClient;
use crate::session::Actor;
use crate::AppState;
use std::fmt;
use std::marker::PhantomData;
use validator::Validate;

pub use flash::Flash;
pub use paginate::Paginator;

/// Label shown instead of the delete action on the caller's own row.
pub const SELF_DELETE_LABEL: &str = "Não pode apagar a sua própria conta";

/// User-facing texts for one kind of entity.
#[derive(Debug, Clone, Copy)]
pub struct Messages {
    pub load_failed: &'static str,
    pub create_failed: &'static str,
    pub update_failed: &'static str,
    pub delete_failed: &'static str,
    pub create_conflict: &'static str,
    pub update_conflict: &'static str,
    /// Show the backend's `message` when it sent one
    pub prefer_server_message: bool,
}

/// Per-entity configuration of a managed collection.
#[allow(async_fn_in_trait)]
pub trait Resource {
    type Item: Clone;
    /// Identity of a row (an id, or a pair for associations)
    type Key: Clone + PartialEq + fmt::Debug;
    type Form: Validate + Default + Clone + fmt::Debug;

    /// Name used in logs
    const LABEL: &'static str;
    const PAGE_SIZE: usize;
    /// Precedence of fields when several fail validation
    const FIELD_ORDER: &'static [&'static str];
    const MESSAGES: Messages;

    fn key(item: &Self::Item) -> Self::Key;

    /// Pre-fill an edit form from a row.
    fn form_from(item: &Self::Item) -> Self::Form;

    /// Clean up user input before validation (trim, strip digits, ...).
    fn normalize(_form: &mut Self::Form) {}

    /// Whether a row is the authenticated account itself.
    fn is_self(_item: &Self::Item, _actor: &Actor) -> bool {
        false
    }

    async fn fetch(api: &ApiClient, actor: &Actor) -> Result<Vec<Self::Item>>;

    async fn create(api: &ApiClient, actor: &Actor, form: &Self::Form) -> Result<()>;

    async fn update(
        api: &ApiClient,
        actor: &Actor,
        key: &Self::Key,
        form: &Self::Form,
    ) -> Result<()>;

    async fn delete(api: &ApiClient, actor: &Actor, key: &Self::Key) -> Result<()>;
}

/// Lifecycle state of a managed collection.
#[derive(Debug, Clone, PartialEq)]
pub enum Mode<K, F> {
    /// List fetch in flight
    Loading,
    Idle,
    CreateOpen(F),
    EditOpen { key: K, form: F },
    /// Waiting for explicit confirmation to delete the row with this key
    DeleteConfirm(K),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Submission {
    Create,
    Update,
}

/// A paginated list of `R` items with create/edit/delete dialogs.
pub struct ManagedCollection<R: Resource> {
    api: ApiClient,
    actor: Actor,
    items: Vec<R::Item>,
    mode: Mode<R::Key, R::Form>,
    pager: Paginator,
    page_error: Flash,
    modal_error: Flash,
    delete_error: Flash,
    _resource: PhantomData<R>,
}

impl<R: Resource> ManagedCollection<R> {
    /// Create an unloaded collection for the authenticated actor.
    pub fn new(state: &AppState) -> Result<Self> {
        let actor = state.session.require_actor()?;
        let window = state.config.flash_window;

        Ok(Self {
            api: state.api.clone(),
            actor,
            items: Vec::new(),
            mode: Mode::Loading,
            pager: Paginator::new(R::PAGE_SIZE),
            page_error: Flash::new(window),
            modal_error: Flash::new(window),
            delete_error: Flash::new(window),
            _resource: PhantomData,
        })
    }

    /// Create and perform the initial fetch.
    ///
    /// A failed fetch still yields a usable (empty) collection; the failure is
    /// visible through [`Self::page_error`].
    pub async fn mount(state: &AppState) -> Result<Self> {
        let mut collection = Self::new(state)?;
        if let Err(e) = collection.load().await {
            tracing::warn!(resource = R::LABEL, error = %e, "Initial fetch failed");
        }
        Ok(collection)
    }

    /// Fetch the whole collection, replacing the in-memory list on success.
    pub async fn load(&mut self) -> Result<()> {
        if matches!(self.mode, Mode::Idle) {
            self.mode = Mode::Loading;
        }

        let result = R::fetch(&self.api, &self.actor).await;
        if matches!(self.mode, Mode::Loading) {
            self.mode = Mode::Idle;
        }

        match result {
            Ok(items) => {
                tracing::debug!(resource = R::LABEL, count = items.len(), "Collection loaded");
                self.items = items;
                self.pager.set_page(self.pager.page(), self.items.len());
                Ok(())
            }
            Err(e) => {
                tracing::warn!(resource = R::LABEL, error = %e, "Collection fetch failed");
                self.page_error.set(R::MESSAGES.load_failed);
                Err(e)
            }
        }
    }

    // ─── Read access ─────────────────────────────────────────────

    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    pub fn items(&self) -> &[R::Item] {
        &self.items
    }

    pub fn find(&self, key: &R::Key) -> Option<&R::Item> {
        self.items.iter().find(|item| &R::key(item) == key)
    }

    pub fn mode(&self) -> &Mode<R::Key, R::Form> {
        &self.mode
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.mode, Mode::Idle)
    }

    pub fn page_error(&self) -> Option<String> {
        self.page_error.message()
    }

    pub fn modal_error(&self) -> Option<String> {
        self.modal_error.message()
    }

    pub fn delete_error(&self) -> Option<String> {
        self.delete_error.message()
    }

    // ─── Pagination ──────────────────────────────────────────────

    pub fn page(&self) -> usize {
        self.pager.page()
    }

    pub fn total_pages(&self) -> usize {
        self.pager.total_pages(self.items.len())
    }

    pub fn page_items(&self) -> &[R::Item] {
        self.pager.slice(&self.items)
    }

    /// Change page; never re-fetches. Returns the (clamped) page now shown.
    pub fn set_page(&mut self, page: usize) -> usize {
        self.pager.set_page(page, self.items.len())
    }

    // ─── Create / edit ───────────────────────────────────────────

    pub fn open_create(&mut self) -> Result<()> {
        self.ensure_idle()?;
        self.modal_error.clear();
        self.mode = Mode::CreateOpen(R::Form::default());
        Ok(())
    }

    pub fn open_edit(&mut self, key: &R::Key) -> Result<()> {
        self.ensure_idle()?;
        let item = self
            .find(key)
            .ok_or_else(|| AppError::BadRequest(format!("{} {:?} not found", R::LABEL, key)))?;
        let form = R::form_from(item);

        self.modal_error.clear();
        self.mode = Mode::EditOpen {
            key: key.clone(),
            form,
        };
        Ok(())
    }

    pub fn form(&self) -> Option<&R::Form> {
        match &self.mode {
            Mode::CreateOpen(form) | Mode::EditOpen { form, .. } => Some(form),
            _ => None,
        }
    }

    pub fn form_mut(&mut self) -> Option<&mut R::Form> {
        match &mut self.mode {
            Mode::CreateOpen(form) | Mode::EditOpen { form, .. } => Some(form),
            _ => None,
        }
    }

    /// Validate and send the open form.
    ///
    /// On success the dialog closes and the list is re-fetched. On failure the
    /// dialog stays open with its values and a modal-scoped error is flashed,
    /// unless the backend was already changed: then the dialog closes, the
    /// list is re-fetched and the error goes to the page.
    pub async fn submit(&mut self) -> Result<()> {
        let (kind, key, form) = match &mut self.mode {
            Mode::CreateOpen(form) => {
                R::normalize(form);
                (Submission::Create, None, form.clone())
            }
            Mode::EditOpen { key, form } => {
                R::normalize(form);
                (Submission::Update, Some(key.clone()), form.clone())
            }
            _ => return Err(AppError::BadRequest("no form is open".to_string())),
        };

        if let Some(message) = validation::first_error(&form, R::FIELD_ORDER) {
            tracing::debug!(resource = R::LABEL, %message, "Form rejected locally");
            self.modal_error.set(message.clone());
            return Err(AppError::Validation(message));
        }

        let result = match &key {
            None => R::create(&self.api, &self.actor, &form).await,
            Some(key) => R::update(&self.api, &self.actor, key, &form).await,
        };

        match result {
            Ok(()) => {
                tracing::info!(resource = R::LABEL, key = ?key, "Saved");
                self.mode = Mode::Idle;
                self.modal_error.clear();
                self.refresh().await;
                Ok(())
            }
            Err(e) if e.is_partial() => {
                tracing::warn!(resource = R::LABEL, key = ?key, error = %e, "Save partially applied");
                self.mode = Mode::Idle;
                self.modal_error.clear();
                self.refresh().await;
                self.page_error.set(submit_error_message(&R::MESSAGES, kind, &e));
                Err(e)
            }
            Err(e) => {
                self.modal_error.set(submit_error_message(&R::MESSAGES, kind, &e));
                Err(e)
            }
        }
    }

    /// Close any open dialog, discarding its form or pending delete.
    pub fn cancel(&mut self) {
        if matches!(self.mode, Mode::Loading) {
            return;
        }
        self.mode = Mode::Idle;
        self.modal_error.clear();
        self.delete_error.clear();
    }

    // ─── Delete ──────────────────────────────────────────────────

    /// Whether the delete action is offered for a row.
    pub fn can_delete(&self, item: &R::Item) -> bool {
        !R::is_self(item, &self.actor)
    }

    /// Ask for confirmation before deleting. Never sends a request.
    pub fn request_delete(&mut self, key: &R::Key) -> Result<()> {
        self.ensure_idle()?;
        let item = self
            .find(key)
            .ok_or_else(|| AppError::BadRequest(format!("{} {:?} not found", R::LABEL, key)))?;

        if !self.can_delete(item) {
            return Err(AppError::BadRequest(SELF_DELETE_LABEL.to_string()));
        }

        self.delete_error.clear();
        self.mode = Mode::DeleteConfirm(key.clone());
        Ok(())
    }

    pub fn pending_delete(&self) -> Option<&R::Key> {
        match &self.mode {
            Mode::DeleteConfirm(key) => Some(key),
            _ => None,
        }
    }

    /// Delete the row awaiting confirmation, then re-fetch.
    pub async fn confirm_delete(&mut self) -> Result<()> {
        let Mode::DeleteConfirm(key) = &self.mode else {
            return Err(AppError::BadRequest("no delete is pending".to_string()));
        };
        let key = key.clone();

        match R::delete(&self.api, &self.actor, &key).await {
            Ok(()) => {
                tracing::info!(resource = R::LABEL, key = ?key, "Deleted");
                self.mode = Mode::Idle;
                self.refresh().await;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(resource = R::LABEL, key = ?key, error = %e, "Delete failed");
                self.delete_error.set(R::MESSAGES.delete_failed);
                Err(e)
            }
        }
    }

    pub fn cancel_delete(&mut self) {
        if self.pending_delete().is_some() {
            self.cancel();
        }
    }

    // ─── Internals ───────────────────────────────────────────────

    async fn refresh(&mut self) {
        // Failure is already flashed at page scope.
        if let Err(e) = self.load().await {
            tracing::debug!(resource = R::LABEL, error = %e, "Re-fetch after mutation failed");
        }
    }

    fn ensure_idle(&self) -> Result<()> {
        match self.mode {
            Mode::Idle => Ok(()),
            Mode::Loading => Err(AppError::BadRequest("list is still loading".to_string())),
            _ => Err(AppError::BadRequest("another dialog is open".to_string())),
        }
    }
}

/// Pick the modal message for a failed create/update.
fn submit_error_message(messages: &Messages, kind: Submission, error: &AppError) -> String {
    if messages.prefer_server_message {
        if let Some(server) = error.server_message() {
            return server.to_string();
        }
    }

    let text = match (kind, error.is_conflict()) {
        (Submission::Create, true) => messages.create_conflict,
        (Submission::Update, true) => messages.update_conflict,
        (Submission::Create, false) => messages.create_failed,
        (Submission::Update, false) => messages.update_failed,
    };
    text.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MESSAGES: Messages = Messages {
        load_failed: "load",
        create_failed: "create",
        update_failed: "update",
        delete_failed: "delete",
        create_conflict: "create-dup",
        update_conflict: "update-dup",
        prefer_server_message: false,
    };

    #[test]
    fn test_conflict_message_is_distinct() {
        let conflict = AppError::Conflict("taken".to_string());
        let server = AppError::Server {
            status: 500,
            message: "boom".to_string(),
        };

        assert_eq!(
            submit_error_message(&MESSAGES, Submission::Create, &conflict),
            "create-dup"
        );
        assert_eq!(
            submit_error_message(&MESSAGES, Submission::Update, &conflict),
            "update-dup"
        );
        assert_eq!(
            submit_error_message(&MESSAGES, Submission::Create, &server),
            "create"
        );
        assert_eq!(
            submit_error_message(
                &MESSAGES,
                Submission::Update,
                &AppError::Transport("down".to_string())
            ),
            "update"
        );
    }

    #[test]
    fn test_server_message_preferred_when_configured() {
        let messages = Messages {
            prefer_server_message: true,
            ..MESSAGES
        };
        let server = AppError::Server {
            status: 400,
            message: "Email inválido".to_string(),
        };
        let bare = AppError::from_status(reqwest::StatusCode::BAD_REQUEST, None);

        assert_eq!(
            submit_error_message(&messages, Submission::Create, &server),
            "Email inválido"
        );
        assert_eq!(
            submit_error_message(&messages, Submission::Create, &bare),
            "create"
        );
    }
}
