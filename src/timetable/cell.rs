use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Selector};

use crate::error::{Error, Result};
use crate::timetable::models::{CellOutcome, Lesson};
use crate::utils::{element_children, normalize_separator, strip_label, text};

/// Lines starting with this are links to online rooms, never kept
const LINK_LINE: &str = "Ссылка";

static WRAPPER: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.lessons-wrapper").unwrap());
static DETAIL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.hidden_for_print").unwrap());
static HOLIDAY: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".holiday-description").unwrap());
static DISCIPLINE: LazyLock<Selector> = LazyLock::new(|| Selector::parse(".discipline").unwrap());
static KIND: LazyLock<Selector> = LazyLock::new(|| Selector::parse(".kind").unwrap());
static NOTE: LazyLock<Selector> = LazyLock::new(|| Selector::parse(r#"[class="note"]"#).unwrap());
static TITLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h4.modal-title").unwrap());
static LINES: LazyLock<Selector> = LazyLock::new(|| Selector::parse(".modal-body > p").unwrap());
static VENUE_ICON: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".auditoriums i").unwrap());

static TITLE_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"title\s*=\s*"([^"]+)"#).unwrap());

/// First element matching `selector`, the page is broken without it
fn required<'a>(
    element: ElementRef<'a>,
    selector: &Selector,
    name: &'static str,
) -> Result<ElementRef<'a>> {
    element
        .select(selector)
        .next()
        .ok_or(Error::MissingElement { selector: name })
}

/// Parse a lesson cell of the timetable
///
/// # Errors
///
/// Fails when an expected element is missing, when the detail block is too
/// short, or when the date or time can't be read
pub fn parse(cell: ElementRef) -> Result<CellOutcome> {
    let wrapper = required(cell, &WRAPPER, "div.lessons-wrapper")?;
    let detail = required(cell, &DETAIL, "div.hidden_for_print")?;

    if element_children(wrapper).next().is_none() || element_children(detail).next().is_none() {
        return Ok(CellOutcome::Empty);
    }

    if wrapper.select(&HOLIDAY).next().is_some() {
        return Ok(CellOutcome::Cancelled);
    }

    let name = text(required(wrapper, &DISCIPLINE, ".discipline")?);
    let kind = text(required(wrapper, &KIND, ".kind")?);
    let long_name = text(required(detail, &TITLE, "h4.modal-title")?);
    let comment = wrapper.select(&NOTE).next().map(text).unwrap_or_default();

    let lines: Vec<String> = detail.select(&LINES).map(text).collect();

    // Header, date, time and place always come first
    let [_, date, time, place_line, rest @ ..] = &lines[..] else {
        return Err(Error::MissingDetail { found: lines.len() });
    };

    let lesson = Lesson {
        name,
        kind,
        long_name,
        date: strip_label(date),
        time: strip_label(time),
        place: place(detail, place_line),
        extra: rest
            .iter()
            .filter(|line| !line.starts_with(LINK_LINE))
            .map(|line| normalize_separator(line))
            .collect(),
        comment,
    };

    // A lesson without a usable date or time is a broken page
    lesson.span()?;

    Ok(CellOutcome::Record(lesson))
}

/// Split the place line and add the venue title of the icon, if any
pub fn place(detail: ElementRef, line: &str) -> Vec<String> {
    let segments: Vec<&str> = line.split(':').collect();
    if segments.len() > 1 && segments[1].chars().count() < 2 {
        return vec![];
    }

    let mut segments: Vec<String> = segments.iter().map(|s| s.trim().to_owned()).collect();

    if let Some(icon) = detail.select(&VENUE_ICON).next() {
        if let Some(title) = TITLE_ATTR.captures(&icon.html()).and_then(|cap| cap.get(1)) {
            segments.push(title.as_str().to_owned());
        }
    }

    segments
}

#[cfg(test)]
mod tests {
    use scraper::Html;

    use super::*;

    const LESSON: &str = r#"<div class="lesson"><span class="discipline">Алгоритмы</span> <span class="kind">Лекция</span></div>"#;

    fn page(wrapper: &str, detail: &str) -> Html {
        Html::parse_document(&format!(
            r#"<html><body><table><tbody><tr>
            <td class="lesson_cell">
              <div class="lessons-wrapper">{wrapper}</div>
              <div class="hidden_for_print">{detail}</div>
            </td>
            </tr></tbody></table></body></html>"#
        ))
    }

    fn detail(lines: &[&str], extra: &str) -> String {
        let paragraphs: String = lines.iter().map(|line| format!("<p>{line}</p>")).collect();
        format!(
            r#"<div class="modal"><h4 class="modal-title"> Алгоритмы и структуры данных </h4>
            <div class="modal-body">{paragraphs}</div>{extra}</div>"#
        )
    }

    fn parse_page(document: &Html) -> Result<CellOutcome> {
        let sel = Selector::parse("td.lesson_cell").unwrap();
        parse(document.select(&sel).next().unwrap())
    }

    const FULL: [&str; 7] = [
        "Алгоритмы",
        "Дата: 05.09.2024",
        "Время:\n   08:30-10:05",
        "Место: 101",
        "Преподаватель:\n     Иванов И. И.",
        "Ссылка: https://meet.example/abc",
        "Группы: 590-1",
    ];

    #[test]
    fn parses_complete_lesson() {
        let document = page(
            &format!(r#"{LESSON}<span class="note">онлайн</span>"#),
            &detail(&FULL, ""),
        );

        let CellOutcome::Record(lesson) = parse_page(&document).unwrap() else {
            panic!("expected a lesson");
        };
        assert_eq!(lesson.name, "Алгоритмы");
        assert_eq!(lesson.kind, "Лекция");
        assert_eq!(lesson.long_name, "Алгоритмы и структуры данных");
        assert_eq!(lesson.date, "05.09.2024");
        assert_eq!(lesson.time, "08:30-10:05");
        assert_eq!(lesson.place, ["Место", "101"]);
        assert_eq!(lesson.extra, ["Преподаватель: Иванов И. И.", "Группы: 590-1"]);
        assert_eq!(lesson.comment, "онлайн");
    }

    #[test]
    fn missing_note_is_empty_comment() {
        let document = page(LESSON, &detail(&FULL[..4], ""));
        let CellOutcome::Record(lesson) = parse_page(&document).unwrap() else {
            panic!("expected a lesson");
        };
        assert_eq!(lesson.comment, "");
        assert!(lesson.extra.is_empty());
    }

    #[test]
    fn venue_icon_adds_segment() {
        let icon = r#"<div class="auditoriums"><i class="fa fa-map-marker" title="Главный корпус"></i></div>"#;
        let document = page(LESSON, &detail(&FULL[..4], icon));
        let CellOutcome::Record(lesson) = parse_page(&document).unwrap() else {
            panic!("expected a lesson");
        };
        assert_eq!(lesson.place, ["Место", "101", "Главный корпус"]);
    }

    #[test]
    fn blank_place_gives_no_segment() {
        let icon = r#"<div class="auditoriums"><i title="Главный корпус"></i></div>"#;
        let lines = ["Алгоритмы", "Дата: 05.09.2024", "Время: 08:30-10:05", "Место: "];
        let document = page(LESSON, &detail(&lines, icon));
        let CellOutcome::Record(lesson) = parse_page(&document).unwrap() else {
            panic!("expected a lesson");
        };
        assert!(lesson.place.is_empty());
    }

    #[test]
    fn empty_cell() {
        assert_eq!(parse_page(&page("", "")).unwrap(), CellOutcome::Empty);
        assert_eq!(parse_page(&page(LESSON, "")).unwrap(), CellOutcome::Empty);
        assert_eq!(
            parse_page(&page("", &detail(&FULL, ""))).unwrap(),
            CellOutcome::Empty
        );
    }

    #[test]
    fn cancelled_cell() {
        let wrapper = format!(r#"{LESSON}<div class="holiday-description">Праздник</div>"#);
        let document = page(&wrapper, &detail(&FULL, ""));
        assert_eq!(parse_page(&document).unwrap(), CellOutcome::Cancelled);
    }

    #[test]
    fn missing_wrapper_fails() {
        let document = Html::parse_document(
            r#"<table><tr><td class="lesson_cell"><div class="hidden_for_print"></div></td></tr></table>"#,
        );
        assert!(matches!(
            parse_page(&document),
            Err(Error::MissingElement {
                selector: "div.lessons-wrapper"
            })
        ));
    }

    #[test]
    fn missing_detail_block_fails() {
        let document = Html::parse_document(&format!(
            r#"<table><tr><td class="lesson_cell"><div class="lessons-wrapper">{LESSON}</div></td></tr></table>"#
        ));
        assert!(matches!(
            parse_page(&document),
            Err(Error::MissingElement {
                selector: "div.hidden_for_print"
            })
        ));
    }

    #[test]
    fn missing_discipline_or_kind_fails() {
        let no_kind = r#"<div class="lesson"><span class="discipline">Алгоритмы</span></div>"#;
        assert!(matches!(
            parse_page(&page(no_kind, &detail(&FULL, ""))),
            Err(Error::MissingElement { selector: ".kind" })
        ));

        let no_discipline = r#"<div class="lesson"><span class="kind">Лекция</span></div>"#;
        assert!(matches!(
            parse_page(&page(no_discipline, &detail(&FULL, ""))),
            Err(Error::MissingElement {
                selector: ".discipline"
            })
        ));
    }

    #[test]
    fn venue_icon_without_title() {
        let icon = r#"<div class="auditoriums"><i class="fa fa-map-marker"></i></div>"#;
        let document = page(LESSON, &detail(&FULL[..4], icon));
        let CellOutcome::Record(lesson) = parse_page(&document).unwrap() else {
            panic!("expected a lesson");
        };
        assert_eq!(lesson.place, ["Место", "101"]);
    }

    #[test]
    fn whitespace_room_is_trimmed_empty() {
        let fragment = Html::parse_fragment("<div></div>");
        assert_eq!(
            place(fragment.root_element(), "Место:  : Корпус"),
            ["Место", "", "Корпус"]
        );
    }

    #[test]
    fn short_detail_fails() {
        let document = page(LESSON, &detail(&FULL[..3], ""));
        assert!(matches!(
            parse_page(&document),
            Err(Error::MissingDetail { found: 3 })
        ));
    }

    #[test]
    fn unparsable_date_fails() {
        let lines = ["Алгоритмы", "Дата: скоро", "Время: 08:30-10:05", "Место: 101"];
        let document = page(LESSON, &detail(&lines, ""));
        assert!(matches!(
            parse_page(&document),
            Err(Error::InvalidDate { .. })
        ));
    }
}
