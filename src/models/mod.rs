// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models exchanged with the classification API.

pub mod association;
pub mod category;
pub mod post;
pub mod question;
pub mod stats;
pub mod study;
pub mod user;

pub use association::Association;
pub use category::Category;
pub use post::{Post, PostImage};
pub use question::{InputType, Question};
pub use stats::GeneralStat;
pub use study::{Study, StudyStatus};
pub use user::{Role, User};

/// Lenient deserializers for numeric columns the backend may send as strings.
pub(crate) mod de {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        Text(String),
    }

    fn to_f64<E: serde::de::Error>(value: NumberOrString) -> Result<f64, E> {
        match value {
            NumberOrString::Number(n) => Ok(n),
            NumberOrString::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| E::custom(format!("expected a number, got {s:?}"))),
        }
    }

    pub fn f64_lenient<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        to_f64(NumberOrString::deserialize(d)?)
    }

    pub fn u32_lenient<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
        let value = to_f64(NumberOrString::deserialize(d)?)?;
        if value.fract() != 0.0 || value < 0.0 || value > f64::from(u32::MAX) {
            return Err(serde::de::Error::custom(format!(
                "expected a non-negative integer, got {value}"
            )));
        }
        Ok(value as u32)
    }
}
