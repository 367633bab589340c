// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Durable key-value store for the persisted session.
//!
//! A flat JSON object on disk. Writes go to a sibling temp file that is then
//! renamed over the target, so a crash never leaves a half-written store.

use crate::error::AppError;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub const USERNAME_KEY: &str = "username";
pub const USER_TYPE_KEY: &str = "userType";

/// File-backed string map.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every entry. A missing file is an empty store.
    pub fn load(&self) -> Result<BTreeMap<String, String>, AppError> {
        match fs::read_to_string(&self.path) {
            Ok(text) if text.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(text) => serde_json::from_str(&text).map_err(|e| {
                AppError::Storage(format!("{} is not a valid store: {e}", self.path.display()))
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(AppError::Storage(format!(
                "failed to read {}: {e}",
                self.path.display()
            ))),
        }
    }

    pub fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.load()?.remove(key))
    }

    /// Set several keys in one write.
    pub fn set_many(&self, entries: &[(&str, &str)]) -> Result<(), AppError> {
        let mut map = self.load()?;
        for (key, value) in entries {
            map.insert((*key).to_string(), (*value).to_string());
        }
        self.save(&map)
    }

    pub fn remove(&self, keys: &[&str]) -> Result<(), AppError> {
        let mut map = self.load()?;
        let before = map.len();
        map.retain(|k, _| !keys.contains(&k.as_str()));
        if map.len() == before {
            return Ok(());
        }
        self.save(&map)
    }

    fn save(&self, map: &BTreeMap<String, String>) -> Result<(), AppError> {
        let storage_err =
            |e: std::io::Error| AppError::Storage(format!("failed to write {}: {e}", self.path.display()));

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(storage_err)?;
        }

        let text = serde_json::to_string_pretty(map)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, text).map_err(storage_err)?;
        fs::rename(&tmp, &self.path).map_err(storage_err)?;

        tracing::debug!(path = %self.path.display(), keys = map.len(), "Credential store saved");
        Ok(())
    }
}
