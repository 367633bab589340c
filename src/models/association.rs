//! User-to-study association model.

use serde::{Deserialize, Serialize};

/// Many-to-many link between a user and a study, identified by the pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Association {
    pub user_id: i64,
    pub study_id: i64,
    /// Denormalized for display
    pub username: String,
    /// Denormalized for display
    pub study_name: String,
}

impl Association {
    pub fn key(&self) -> (i64, i64) {
        (self.user_id, self.study_id)
    }
}

/// Study record returned by `GET /users/:id/studies`.
#[derive(Debug, Clone, Deserialize)]
pub struct AssociatedStudy {
    pub id: i64,
    #[serde(default)]
    pub name: String,
}

/// Body of `POST /users/:id/studies`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssociationRequest {
    pub study_id: i64,
}
