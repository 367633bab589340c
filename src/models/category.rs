//! Classification category model.

use serde::{Deserialize, Serialize};

/// Category types offered even before the backend knows any.
pub const DEFAULT_CATEGORY_TYPES: [&str; 2] = ["tematicas", "sentimento"];

/// A classification category attached to a question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub category_type: String,
    #[serde(default)]
    pub question_id: Option<i64>,
}

/// Strip digits from a free-text category type before it is persisted.
pub fn sanitize_category_type(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_ascii_digit())
        .collect::<String>()
        .trim()
        .to_string()
}

/// Merge built-in and server-side type suggestions, keeping first-seen order.
pub fn merge_type_suggestions(server: &[String]) -> Vec<String> {
    let mut merged: Vec<String> = Vec::new();
    let candidates = DEFAULT_CATEGORY_TYPES
        .iter()
        .map(|t| t.to_string())
        .chain(server.iter().map(|t| sanitize_category_type(t)));

    for candidate in candidates {
        if !candidate.is_empty() && !merged.contains(&candidate) {
            merged.push(candidate);
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_strips_digits() {
        assert_eq!(sanitize_category_type("sentimento2"), "sentimento");
        assert_eq!(sanitize_category_type(" 1tema2ticas3 "), "tematicas");
        assert_eq!(sanitize_category_type("123"), "");
    }

    #[test]
    fn test_merge_type_suggestions_dedupes() {
        let server = vec![
            "sentimento".to_string(),
            "ironia".to_string(),
            "ironia2".to_string(),
        ];
        assert_eq!(
            merge_type_suggestions(&server),
            vec!["tematicas", "sentimento", "ironia"]
        );
    }
}
