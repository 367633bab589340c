//! Imported social-media post model.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

/// A post imported into a study.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: i64,
    #[serde(default)]
    pub page_name: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub likes_count: u64,
    #[serde(default)]
    pub comments_count: u64,
    #[serde(default)]
    pub shares_count: u64,
    #[serde(default)]
    pub study_id: Option<i64>,
    #[serde(default)]
    pub images: Vec<PostImage>,
}

/// Image attached to a post, carried inline as base64.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostImage {
    pub image_data: String,
}

impl PostImage {
    /// Decode the base64 payload to raw bytes.
    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        STANDARD.decode(self.image_data.trim())
    }
}

/// Response of `GET /posts/investigador`.
#[derive(Debug, Clone, Deserialize)]
pub struct PostsResponse {
    #[serde(default)]
    pub posts: Vec<Post>,
}

impl Post {
    /// Case-insensitive match on page name or details, plus an optional study filter.
    pub fn matches(&self, search: &str, study: Option<i64>) -> bool {
        let needle = search.trim().to_lowercase();
        let text_match = needle.is_empty()
            || [&self.page_name, &self.details]
                .into_iter()
                .flatten()
                .any(|field| field.to_lowercase().contains(&needle));

        text_match && study.map_or(true, |id| self.study_id == Some(id))
    }
}
