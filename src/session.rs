// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session context.
//!
//! The authenticated identity is shared through a `watch` channel. The write
//! half ([`SessionWriter`]) is only handed to the login and logout flows;
//! everything else (route guard, menu, pages) holds a [`SessionReader`].

use crate::error::{AppError, Result};
use crate::models::Role;
use crate::services::credentials::{USERNAME_KEY, USER_TYPE_KEY};
use crate::services::{ApiClient, CredentialStore};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// Snapshot of the authentication state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub username: Option<String>,
    pub role: Option<Role>,
    /// True until persisted credentials have been restored or found absent
    pub loading: bool,
}

impl Session {
    fn resolving() -> Self {
        Self {
            username: None,
            role: None,
            loading: true,
        }
    }

    fn anonymous() -> Self {
        Self {
            username: None,
            role: None,
            loading: false,
        }
    }

    fn authenticated(username: String, role: Role) -> Self {
        Self {
            username: Some(username),
            role: Some(role),
            loading: false,
        }
    }

    /// The acting identity, when both username and role are known.
    pub fn actor(&self) -> Option<Actor> {
        match (&self.username, self.role) {
            (Some(username), Some(role)) => Some(Actor {
                username: username.clone(),
                role,
            }),
            _ => None,
        }
    }
}

/// Authenticated identity used to scope requests and guard self-deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub username: String,
    pub role: Role,
}

/// Credentials sent to `POST /login`.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Self-registration body for `POST /register`.
#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    username: String,
    #[serde(rename = "type")]
    role: Role,
}

/// Create a session channel in the resolving state.
pub fn channel(store: CredentialStore) -> (SessionWriter, SessionReader) {
    let (tx, rx) = watch::channel(Session::resolving());
    (SessionWriter { tx, store }, SessionReader { rx })
}

/// Read capability over the session.
#[derive(Debug, Clone)]
pub struct SessionReader {
    rx: watch::Receiver<Session>,
}

impl SessionReader {
    pub fn current(&self) -> Session {
        self.rx.borrow().clone()
    }

    pub fn actor(&self) -> Option<Actor> {
        self.rx.borrow().actor()
    }

    /// Require an authenticated actor.
    pub fn require_actor(&self) -> Result<Actor> {
        self.actor().ok_or(AppError::Unauthenticated)
    }

    /// Wait until the session is no longer resolving.
    pub async fn ready(&mut self) -> Session {
        let waited = self.rx.wait_for(|s| !s.loading).await.map(|s| s.clone());
        // Writer dropped: whatever was last published is final.
        waited.unwrap_or_else(|_| self.current())
    }
}

/// Write capability over the session. Owned by the login/logout flows.
#[derive(Debug)]
pub struct SessionWriter {
    tx: watch::Sender<Session>,
    store: CredentialStore,
}

impl SessionWriter {
    /// Restore persisted credentials, ending the resolving state.
    ///
    /// An unreadable store or an unknown role is treated as no session.
    pub fn restore(&self) -> Session {
        let restored = match self.store.load() {
            Ok(map) => {
                let username = map.get(USERNAME_KEY).filter(|u| !u.is_empty());
                let role = map.get(USER_TYPE_KEY).and_then(|r| r.parse::<Role>().ok());
                match (username, role) {
                    (Some(username), Some(role)) => Session::authenticated(username.clone(), role),
                    _ => Session::anonymous(),
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Could not read persisted session");
                Session::anonymous()
            }
        };

        tracing::info!(
            username = ?restored.username,
            role = ?restored.role,
            "Session restored"
        );
        self.publish(restored)
    }

    /// Authenticate against the backend and persist the identity.
    pub async fn login(&self, api: &ApiClient, credentials: &Credentials) -> Result<Session> {
        let response: LoginResponse = api.post_json("/login", credentials).await?;

        self.store.set_many(&[
            (USERNAME_KEY, response.username.as_str()),
            (USER_TYPE_KEY, response.role.as_str()),
        ])?;

        tracing::info!(username = %response.username, role = %response.role, "Logged in");
        Ok(self.publish(Session::authenticated(response.username, response.role)))
    }

    /// Clear the identity, in memory and on disk.
    pub fn logout(&self) -> Result<Session> {
        self.store.remove(&[USERNAME_KEY, USER_TYPE_KEY])?;
        tracing::info!("Logged out");
        Ok(self.publish(Session::anonymous()))
    }

    pub fn reader(&self) -> SessionReader {
        SessionReader {
            rx: self.tx.subscribe(),
        }
    }

    fn publish(&self, session: Session) -> Session {
        self.tx.send_replace(session.clone());
        session
    }
}

/// Create an account with role `user`. Does not log in.
pub async fn register(api: &ApiClient, registration: &Registration) -> Result<()> {
    api.post("/register", registration).await?;
    tracing::info!(username = %registration.username, "Account registered");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_loading_then_restores_anonymous() {
        let dir = tempfile::tempdir().unwrap();
        let (writer, reader) = channel(CredentialStore::new(dir.path().join("s.json")));

        assert!(reader.current().loading);
        let restored = writer.restore();

        assert!(!restored.loading);
        assert_eq!(reader.current(), restored);
        assert!(reader.actor().is_none());
        assert!(matches!(reader.require_actor(), Err(AppError::Unauthenticated)));
    }

    #[test]
    fn test_restore_reads_persisted_identity() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path().join("s.json"));
        store
            .set_many(&[(USERNAME_KEY, "inês"), (USER_TYPE_KEY, "investigator")])
            .unwrap();

        let (writer, reader) = channel(store);
        writer.restore();

        assert_eq!(
            reader.actor(),
            Some(Actor {
                username: "inês".to_string(),
                role: Role::Investigator
            })
        );
    }

    #[test]
    fn test_restore_ignores_unknown_role() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path().join("s.json"));
        store
            .set_many(&[(USERNAME_KEY, "x"), (USER_TYPE_KEY, "root")])
            .unwrap();

        let (writer, reader) = channel(store);
        writer.restore();
        assert_eq!(reader.current().role, None);
    }

    #[test]
    fn test_logout_clears_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path().join("s.json"));
        store
            .set_many(&[(USERNAME_KEY, "rui"), (USER_TYPE_KEY, "admin")])
            .unwrap();

        let (writer, reader) = channel(store.clone());
        writer.restore();
        writer.logout().unwrap();

        assert_eq!(reader.current(), Session::anonymous());
        assert_eq!(store.get(USERNAME_KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn test_ready_waits_for_restore() {
        let dir = tempfile::tempdir().unwrap();
        let (writer, mut reader) = channel(CredentialStore::new(dir.path().join("s.json")));

        let waiter = tokio::spawn(async move { reader.ready().await });
        tokio::task::yield_now().await;
        writer.restore();

        let session = waiter.await.unwrap();
        assert!(!session.loading);
    }
}
