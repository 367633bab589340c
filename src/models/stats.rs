// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Aggregate classification statistics and the bar chart view over them.

use serde::{Deserialize, Serialize};

/// Width in pixels reserved for one bar group on the horizontal chart.
pub const BAR_SLOT_WIDTH: u32 = 100;

pub const VALIDATED_COLOR: &str = "#36A2EB";
pub const VALIDATED_HIGHLIGHT: &str = "#0056b3";
pub const NOT_VALIDATED_COLOR: &str = "#FF6384";
pub const NOT_VALIDATED_HIGHLIGHT: &str = "#b3004b";

/// Classification counts for one anonymized user (`GET /stats/general`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralStat {
    #[serde(rename = "anonymizedUser")]
    pub anonymized_user: String,
    #[serde(default)]
    pub validated: u64,
    #[serde(default)]
    pub not_validated: u64,
}

/// One bar pair as rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bar<'a> {
    pub label: &'a str,
    pub validated: u64,
    pub not_validated: u64,
    pub validated_color: &'static str,
    pub not_validated_color: &'static str,
}

/// Index of the first entry whose label contains `term`, ignoring case.
///
/// Plain substring matching: an empty term matches the first entry. The
/// statistics page skips the lookup for a blank search and highlights nothing.
pub fn find_first_match(stats: &[GeneralStat], term: &str) -> Option<usize> {
    let needle = term.to_lowercase();
    stats
        .iter()
        .position(|s| s.anonymized_user.to_lowercase().contains(&needle))
}

/// Bars for the chart, with the highlighted index recolored.
pub fn bars(stats: &[GeneralStat], highlighted: Option<usize>) -> Vec<Bar<'_>> {
    stats
        .iter()
        .enumerate()
        .map(|(index, s)| {
            let hit = highlighted == Some(index);
            Bar {
                label: &s.anonymized_user,
                validated: s.validated,
                not_validated: s.not_validated,
                validated_color: if hit { VALIDATED_HIGHLIGHT } else { VALIDATED_COLOR },
                not_validated_color: if hit {
                    NOT_VALIDATED_HIGHLIGHT
                } else {
                    NOT_VALIDATED_COLOR
                },
            }
        })
        .collect()
}

/// Horizontal scroll position that centers bar `index` in a viewport.
pub fn scroll_offset(index: usize, viewport_width: u32) -> u32 {
    let slot = i64::from(BAR_SLOT_WIDTH);
    let left = index as i64 * slot - i64::from(viewport_width) / 2 + slot / 2;
    left.max(0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stat(user: &str, validated: u64, not_validated: u64) -> GeneralStat {
        GeneralStat {
            anonymized_user: user.to_string(),
            validated,
            not_validated,
        }
    }

    #[test]
    fn test_find_first_match_case_insensitive() {
        let stats = vec![stat("User-A1", 1, 0), stat("user-b2", 2, 1), stat("USER-B3", 0, 4)];

        assert_eq!(find_first_match(&stats, "b"), Some(1));
        assert_eq!(find_first_match(&stats, "B3"), Some(2));
        assert_eq!(find_first_match(&stats, "zzz"), None);
        assert_eq!(find_first_match(&[], "a"), None);
        assert_eq!(find_first_match(&stats, ""), Some(0));
    }

    #[test]
    fn test_bars_highlight_only_match() {
        let stats = vec![stat("a", 1, 2), stat("b", 3, 4)];
        let rendered = bars(&stats, Some(1));

        assert_eq!(rendered[0].validated_color, VALIDATED_COLOR);
        assert_eq!(rendered[0].not_validated_color, NOT_VALIDATED_COLOR);
        assert_eq!(rendered[1].validated_color, VALIDATED_HIGHLIGHT);
        assert_eq!(rendered[1].not_validated_color, NOT_VALIDATED_HIGHLIGHT);
    }

    #[test]
    fn test_scroll_offset_centers_and_clamps() {
        assert_eq!(scroll_offset(0, 800), 0);
        assert_eq!(scroll_offset(10, 800), 650);
        assert_eq!(scroll_offset(3, 100), 300);
    }

    #[test]
    fn test_wire_field_names() {
        let parsed: GeneralStat =
            serde_json::from_str(r#"{"anonymizedUser": "U1", "validated": 5, "not_validated": 2}"#)
                .unwrap();
        assert_eq!(parsed, stat("U1", 5, 2));
    }
}
