// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Question model.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a question is answered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    /// Single choice
    #[default]
    Radio,
    /// Multiple choice
    Checkbox,
}

impl fmt::Display for InputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            InputType::Radio => "radio",
            InputType::Checkbox => "checkbox",
        })
    }
}

impl FromStr for InputType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "radio" => Ok(InputType::Radio),
            "checkbox" => Ok(InputType::Checkbox),
            other => Err(format!("unknown input type: {other:?}")),
        }
    }
}

/// A question asked about every post of a study.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: i64,
    pub question: String,
    #[serde(default)]
    pub content: String,
    pub input_type: InputType,
    #[serde(default)]
    pub study_id: Option<i64>,
}
