use chrono::NaiveDateTime;

use crate::error::Result;
use crate::timetable::{self, models::Lesson, models::Request, PageSource};

pub mod uid;

/// A lesson ready to be put in a calendar
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CalendarEvent {
    /// Local wall-clock time, as published
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// Only depends on `start`: two lessons starting together share it
    pub uid: String,
    pub title: String,
    pub description: String,
    pub location: Option<String>,
}

impl CalendarEvent {
    pub const STATUS: &'static str = "CONFIRMED";
    pub const BUSY_STATUS: &'static str = "BUSY";

    /// # Errors
    ///
    /// Fails when the date or time of the lesson can't be read
    pub fn from_lesson(lesson: &Lesson) -> Result<Self> {
        let (start, end) = lesson.span()?;

        Ok(Self {
            start,
            end,
            uid: uid::from_seed(&start.to_string()),
            title: title(lesson),
            description: description(lesson),
            location: lesson.place.get(2).cloned(),
        })
    }
}

/// `name (room, comment) – kind`, empty parts left out
fn title(lesson: &Lesson) -> String {
    let mut details = vec![];
    if let Some(room) = lesson.place.get(1).filter(|room| !room.is_empty()) {
        details.push(room.as_str());
    }
    if !lesson.comment.is_empty() {
        details.push(lesson.comment.as_str());
    }

    let mut title = lesson.name.clone();
    if !details.is_empty() {
        title.push_str(&format!(" ({})", details.join(", ")));
    }
    if !lesson.kind.is_empty() {
        title.push_str(&format!(" – {}", lesson.kind));
    }

    title
}

/// Full subject name, a blank line, then the detail lines
fn description(lesson: &Lesson) -> String {
    let first_row = if lesson.long_name.is_empty() {
        String::new()
    } else {
        format!("{}\n\n", lesson.long_name)
    };

    format!("{first_row}{}", lesson.extra.join("\n"))
}

/// One event per lesson, same order
///
/// # Errors
///
/// Fails on the first lesson with an unreadable date or time
pub fn build(lessons: &[Lesson]) -> Result<Vec<CalendarEvent>> {
    lessons.iter().map(CalendarEvent::from_lesson).collect()
}

/// Calendar events of a request
///
/// # Errors
///
/// Fails when a page can't be fetched or parsed
pub async fn events<S>(source: &S, request: &Request) -> Result<Vec<CalendarEvent>>
where
    S: PageSource + Sync,
{
    let lessons = timetable::lessons(source, request).await?;
    build(&lessons)
}
