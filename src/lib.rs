// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Classify-Admin: management client for a post classification research platform
//!
//! This crate holds the headless state machines behind every screen of the
//! admin/investigator client: session, route guard, menu, the managed
//! collection lifecycle shared by the management pages, bulk post import and
//! the statistics view. The `classify-admin` binary drives them from the
//! command line.

pub mod collection;
pub mod config;
pub mod error;
pub mod models;
pub mod pages;
pub mod routes;
pub mod services;
pub mod session;
pub mod time_utils;

use config::Config;
use error::Result;
use services::{ApiClient, CredentialStore};
use session::{SessionReader, SessionWriter};

/// Shared application state handed to every page.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub api: ApiClient,
    pub session: SessionReader,
}

impl AppState {
    /// Build the API client and session channel, then restore the persisted
    /// session.
    ///
    /// The writer is returned separately; only login/logout flows get it.
    pub fn bootstrap(config: Config) -> Result<(Self, SessionWriter)> {
        let api = ApiClient::new(&config)?;
        let store = CredentialStore::new(config.session_file.clone());
        let (writer, session) = session::channel(store);
        writer.restore();

        Ok((
            Self {
                config,
                api,
                session,
            },
            writer,
        ))
    }
}
