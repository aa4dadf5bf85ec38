use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use scraper::ElementRef;

use crate::error::{Error, Result};
use crate::filter::Exclusion;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Lesson {
    /// Subject's name
    pub name: String,

    /// Lesson kind: lecture, lab, practice...
    pub kind: String,

    /// Full title of the subject
    pub long_name: String,

    /// Day of the lesson, as published: `DD.MM.YYYY`
    pub date: String,

    /// Hours of the lesson, as published: `HH:MM-HH:MM`
    pub time: String,

    /// Place segments, in this order when present:
    /// - label of the line
    /// - room
    /// - venue title taken from the icon
    ///
    /// Empty when the page gives no usable place, always check the length
    pub place: Vec<String>,

    /// Free text lines of the detail block, in page order
    pub extra: Vec<String>,

    /// Short note such as "online"
    pub comment: String,
}

impl Lesson {
    /// Start and end of the lesson, as naive wall-clock time
    ///
    /// # Errors
    ///
    /// [`Error::InvalidDate`] or [`Error::InvalidTime`] when the text can't be read
    pub fn span(&self) -> Result<(NaiveDateTime, NaiveDateTime)> {
        let day = parse_date(&self.date)?;

        let invalid = || Error::InvalidTime {
            value: self.time.clone(),
        };
        let (start, end) = self.time.split_once('-').ok_or_else(invalid)?;
        let start = parse_time(start).ok_or_else(invalid)?;
        let end = parse_time(end).ok_or_else(invalid)?;

        Ok((day.and_time(start), day.and_time(end)))
    }
}

/// Parse `day.month.year`
fn parse_date(date: &str) -> Result<NaiveDate> {
    let invalid = || Error::InvalidDate {
        value: date.to_owned(),
    };

    let parts = date
        .trim()
        .split('.')
        .map(|part| part.trim().parse::<u32>().ok())
        .collect::<Option<Vec<_>>>()
        .ok_or_else(invalid)?;

    match parts[..] {
        [day, month, year] => {
            let year = i32::try_from(year).map_err(|_| invalid())?;
            NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
        }
        _ => Err(invalid()),
    }
}

/// Parse `HH:MM`
fn parse_time(time: &str) -> Option<NaiveTime> {
    let (hours, minutes) = time.trim().split_once(':')?;
    NaiveTime::from_hms_opt(hours.trim().parse().ok()?, minutes.trim().parse().ok()?, 0)
}

/// What a lesson cell holds
#[derive(Debug, PartialEq, Eq)]
pub enum CellOutcome {
    /// Nothing takes place in this slot
    Empty,
    /// The lesson is cancelled (holiday)
    Cancelled,
    Record(Lesson),
}

/// Schedule table of a page, with the weeks following it when asked
pub struct WeekResolution<'a> {
    /// `None` when there are no classes this week
    pub table: Option<ElementRef<'a>>,
    /// Identifiers of the next weeks, only when pagination was asked
    pub weeks: Option<Vec<u32>>,
}

/// A validated timetable request
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Request {
    /// Group's timetable URL
    pub url: String,
    /// Number of weeks, the current one included
    pub weeks: Option<usize>,
    /// Subjects to leave out
    pub exclusion: Exclusion,
}
