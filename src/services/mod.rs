// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - I/O boundary (HTTP API and on-disk session store).

pub mod api;
pub mod credentials;

pub use api::ApiClient;
pub use credentials::CredentialStore;
