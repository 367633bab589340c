// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Research study model and its deadline status.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::time_utils::format_countdown;

/// A research campaign with a validation threshold and optional end date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Study {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub obs: String,
    #[serde(deserialize_with = "super::de::u32_lenient")]
    pub min_classifications_per_post: u32,
    /// Percentage of agreeing classifications needed to validate a post (0-100)
    #[serde(deserialize_with = "super::de::f64_lenient")]
    pub validation_agreement_percent: f64,
    #[serde(default)]
    pub finished_at: Option<DateTime<Utc>>,
}

impl Study {
    /// A study with no end date, or one in the future, is active.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.finished_at.map_or(true, |end| end > now)
    }

    pub fn status(&self, now: DateTime<Utc>) -> StudyStatus {
        match self.finished_at {
            None => StudyStatus::Open,
            Some(end) if end > now => StudyStatus::EndsIn(end - now),
            Some(_) => StudyStatus::Finished,
        }
    }
}

/// Deadline status shown in the studies table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudyStatus {
    /// Active with no deadline
    Open,
    /// Active, ends after the given duration
    EndsIn(chrono::Duration),
    Finished,
}

impl fmt::Display for StudyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StudyStatus::Open => f.write_str("Ativo (sem data limite)"),
            StudyStatus::EndsIn(remaining) => {
                write!(f, "Ativo (acaba em {})", format_countdown(*remaining))
            }
            StudyStatus::Finished => f.write_str("Concluído"),
        }
    }
}
