use std::sync::LazyLock;

use regex::Regex;
use scraper::ElementRef;

use crate::utils::models::{Position, HORIZONTAL, VERTICAL};

pub mod models;

/// `Label: value` prefix of the date and time lines
static LABEL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[^:]+:\s*").unwrap());

/// Separator between a label and its value
static SEPARATOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r":\s+").unwrap());

/// User-Agent sent to the timetable website
pub fn user_agent() -> String {
    format!("tusurcal/{}", env!("CARGO_PKG_VERSION"))
}

/// Remove everything up to the first colon and the whitespace after it
pub fn strip_label(line: &str) -> String {
    LABEL.replace(line, "").into_owned()
}

/// Rewrite the first `label:   value` separator as `label: value`
pub fn normalize_separator(line: &str) -> String {
    SEPARATOR.replace(line, ": ").into_owned()
}

/// Trimmed text content of an element
pub fn text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_owned()
}

/// Direct children of an element, text nodes excluded
pub fn element_children<'a>(element: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    element.children().filter_map(ElementRef::wrap)
}

/// Cut a string so it fits in `width` characters
pub fn etc_str(data: &str, width: usize) -> String {
    if data.chars().count() <= width {
        return data.to_owned();
    }

    let mut cut: String = data.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

/// Print a separator line of the table, `widths` being the cell lengths
pub fn line_table(widths: &[usize], pos: &Position) {
    let (left, joint, right) = pos.joints();

    let cells: Vec<String> = widths
        .iter()
        .map(|width| HORIZONTAL.to_string().repeat(*width + 2))
        .collect();
    println!("{left}{}{right}", cells.join(&joint.to_string()));
}

/// Print one row of the table
pub fn row_table(widths: &[usize], data: &[&str]) {
    let mut line = String::from(VERTICAL);
    for (&width, value) in widths.iter().zip(data) {
        line.push_str(&format!(" {:<width$} {VERTICAL}", etc_str(value, width)));
    }
    println!("{line}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_label_removes_prefix() {
        assert_eq!(strip_label("Дата: 05.09.2024"), "05.09.2024");
        assert_eq!(strip_label("Время:\n   08:30-10:05"), "08:30-10:05");
    }

    #[test]
    fn strip_label_keeps_unlabelled() {
        assert_eq!(strip_label("05.09.2024"), "05.09.2024");
    }

    #[test]
    fn normalize_separator_first_only() {
        assert_eq!(
            normalize_separator("Преподаватель:\n    Иванов И. И.: доцент"),
            "Преподаватель: Иванов И. И.: доцент"
        );
        assert_eq!(normalize_separator("Группа:590-1"), "Группа:590-1");
    }

    #[test]
    fn etc_str_cuts_long_values() {
        assert_eq!(etc_str("Алгоритмы", 20), "Алгоритмы");
        assert_eq!(etc_str("Алгоритмы", 5), "Алго…");
    }
}
