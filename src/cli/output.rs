// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Plain-text rendering of tables and the statistics chart.

use chrono::Utc;
use classify_admin::models::stats::Bar;
use classify_admin::models::{Association, Category, Post, Question, Study, User};
use classify_admin::time_utils::format_input;

/// Widest a single cell may grow before it is truncated.
const MAX_CELL_WIDTH: usize = 40;
/// Characters of the longest bar in the statistics chart.
const CHART_WIDTH: u64 = 40;

/// A row type that can be listed in a table.
pub trait Tabular {
    const HEADERS: &'static [&'static str];

    fn row(&self) -> Vec<String>;
}

impl<T: Tabular> Tabular for &T {
    const HEADERS: &'static [&'static str] = T::HEADERS;

    fn row(&self) -> Vec<String> {
        (**self).row()
    }
}

impl Tabular for User {
    const HEADERS: &'static [&'static str] = &["id", "username", "email", "type"];

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.username.clone(),
            self.email.clone(),
            self.role.to_string(),
        ]
    }
}

impl Tabular for Study {
    const HEADERS: &'static [&'static str] =
        &["id", "name", "min/post", "agree %", "deadline", "status"];

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.min_classifications_per_post.to_string(),
            self.validation_agreement_percent.to_string(),
            self.finished_at.map_or_else(|| "-".to_string(), format_input),
            self.status(Utc::now()).to_string(),
        ]
    }
}

impl Tabular for Category {
    const HEADERS: &'static [&'static str] = &["id", "name", "type", "question"];

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.category_type.clone(),
            optional(self.question_id),
        ]
    }
}

impl Tabular for Question {
    const HEADERS: &'static [&'static str] = &["id", "question", "input", "study"];

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.question.clone(),
            self.input_type.to_string(),
            optional(self.study_id),
        ]
    }
}

impl Tabular for Association {
    const HEADERS: &'static [&'static str] = &["user id", "username", "study id", "study"];

    fn row(&self) -> Vec<String> {
        vec![
            self.user_id.to_string(),
            self.username.clone(),
            self.study_id.to_string(),
            self.study_name.clone(),
        ]
    }
}

impl Tabular for Post {
    const HEADERS: &'static [&'static str] =
        &["id", "page", "details", "likes", "comments", "shares", "study", "images"];

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.page_name.clone().unwrap_or_default(),
            self.details.clone().unwrap_or_default(),
            self.likes_count.to_string(),
            self.comments_count.to_string(),
            self.shares_count.to_string(),
            optional(self.study_id),
            self.images.len().to_string(),
        ]
    }
}

fn optional(value: Option<i64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

/// Render rows of `T` as an aligned table with a page footer.
pub fn render_page<T: Tabular>(items: &[T], page: usize, total_pages: usize) -> String {
    let rows: Vec<Vec<String>> = items.iter().map(T::row).collect();
    let mut out = render_table(T::HEADERS, &rows);
    out.push_str(&format!("\npage {page}/{}", total_pages.max(1)));
    out
}

/// Render a simple aligned table for string rows.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            rows.iter()
                .filter_map(|row| row.get(index))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
                .max(header.chars().count())
                .min(MAX_CELL_WIDTH)
        })
        .collect();

    let header_cells: Vec<(&str, usize)> = headers
        .iter()
        .copied()
        .zip(widths.iter().copied())
        .collect();
    let header_line = format_line(&header_cells);
    let divider = "-".repeat(header_line.chars().count());

    let mut lines = Vec::with_capacity(2 + rows.len());
    lines.push(header_line);
    lines.push(divider);
    for row in rows {
        let cells: Vec<(&str, usize)> = widths
            .iter()
            .enumerate()
            .map(|(index, width)| (row.get(index).map_or("-", String::as_str), *width))
            .collect();
        lines.push(format_line(&cells));
    }
    if rows.is_empty() {
        lines.push("(no entries)".to_string());
    }
    lines.join("\n")
}

/// Render the statistics chart, one line per series and user. The
/// highlighted pair is marked and shows its highlight colors.
pub fn render_bars(bars: &[Bar<'_>], highlighted: Option<usize>) -> String {
    let max = bars
        .iter()
        .map(|bar| bar.validated.max(bar.not_validated))
        .max()
        .unwrap_or(0)
        .max(1);
    let label_width = bars
        .iter()
        .map(|bar| bar.label.chars().count())
        .max()
        .unwrap_or(0);
    let scaled = |value: u64| (value * CHART_WIDTH).div_ceil(max) as usize;

    let mut lines = vec![format!("{:label_width$}  Validadas / Por validar", "")];
    for (index, bar) in bars.iter().enumerate() {
        let marker = if highlighted == Some(index) { '>' } else { ' ' };
        lines.push(format!(
            "{marker}{:label_width$}  {} {} [{}]",
            bar.label,
            "█".repeat(scaled(bar.validated)),
            bar.validated,
            bar.validated_color,
        ));
        lines.push(format!(
            " {:label_width$}  {} {} [{}]",
            "",
            "░".repeat(scaled(bar.not_validated)),
            bar.not_validated,
            bar.not_validated_color,
        ));
    }
    lines.join("\n")
}

fn format_line(cells: &[(&str, usize)]) -> String {
    cells
        .iter()
        .map(|&(value, width)| {
            let text = truncate_text(value, width);
            let pad = width.saturating_sub(text.chars().count());
            if looks_numeric(&text) {
                format!("{}{}", " ".repeat(pad), text)
            } else {
                format!("{}{}", text, " ".repeat(pad))
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

fn truncate_text(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    if width <= 1 {
        return "…".to_string();
    }

    let mut out: String = value.chars().take(width - 1).collect();
    out.push('…');
    out
}

fn looks_numeric(value: &str) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty()
        && trimmed
            .chars()
            .all(|ch| ch.is_ascii_digit() || matches!(ch, '-' | '+' | '.' | ','))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_table_aligns_and_truncates() {
        let rows = vec![
            vec!["1".to_string(), "ana".to_string()],
            vec!["12".to_string(), "x".repeat(60)],
        ];
        let table = render_table(&["id", "username"], &rows);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines[0], "id  username");
        assert_eq!(lines[2], " 1  ana");
        assert!(lines[3].ends_with('…'));
        assert_eq!(lines[3].chars().count(), 4 + MAX_CELL_WIDTH);
    }

    #[test]
    fn test_empty_table_says_so() {
        let table = render_table(&["id"], &[]);
        assert!(table.ends_with("(no entries)"));
    }

    #[test]
    fn test_study_row_shows_deadline_in_input_form() {
        let mut study = Study {
            id: 7,
            name: "Eleições".to_string(),
            obs: String::new(),
            min_classifications_per_post: 3,
            validation_agreement_percent: 75.0,
            finished_at: Some(Utc.with_ymd_and_hms(2020, 6, 1, 14, 30, 0).unwrap()),
        };
        let row = study.row();
        assert_eq!(row.len(), Study::HEADERS.len());
        assert_eq!(row[4], "2020-06-01T14:30");
        assert_eq!(row[5], "Concluído");

        study.finished_at = None;
        assert_eq!(study.row()[4], "-");
    }
}
