use std::future::Future;
use std::sync::LazyLock;
use std::time::Duration;

use futures::future::try_join_all;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::filter;
use crate::timetable::models::{CellOutcome, Lesson, Request, WeekResolution};
use crate::utils::{self, element_children, line_table, row_table, models::Position};

pub mod cell;
pub mod models;

static CONTAINER: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".table-responsive").unwrap());
static WEEK_LIST: LazyLock<Selector> = LazyLock::new(|| Selector::parse("ul.weeks").unwrap());
static LINK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").unwrap());
static LESSON_CELL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td.lesson_cell").unwrap());

/// Week identifier at the end of a link
static WEEK_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)/?$").unwrap());

/// Where the timetable pages come from
pub trait PageSource {
    /// Markup of the page at `url`
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String>> + Send;
}

/// Fetch pages from the timetable website
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
}

impl Client {
    /// # Errors
    ///
    /// Fails when the HTTP client can't be initialized
    pub fn new() -> Result<Self> {
        // Use custom User-Agent
        let http = reqwest::Client::builder()
            .user_agent(utils::user_agent())
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self { http })
    }
}

impl PageSource for Client {
    async fn fetch(&self, url: &str) -> Result<String> {
        debug!(%url, "fetching page");
        let response = self.http.get(url).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::GroupNotFound {
                url: url.to_owned(),
            });
        }

        Ok(response.error_for_status()?.text().await?)
    }
}

/// URL of the page of a given week
pub fn week_url(base: &str, week: u32) -> String {
    format!("{base}?week_id={week}")
}

/// Find the schedule table, and the `next_weeks` following weeks if asked
///
/// # Errors
///
/// Fails without the table container, or without the week list when
/// following weeks are asked
pub fn locate(document: &Html, next_weeks: Option<usize>) -> Result<WeekResolution<'_>> {
    let container = document
        .select(&CONTAINER)
        .next()
        .ok_or(Error::MissingElement {
            selector: ".table-responsive",
        })?;

    // The first table is the header, no second one means no classes this week
    let table = element_children(container).nth(1);

    let weeks = next_weeks
        .map(|count| week_ids(document, count))
        .transpose()?;

    Ok(WeekResolution { table, weeks })
}

/// Identifiers of the `count` weeks after the current one
///
/// # Errors
///
/// [`Error::MissingWeekList`] when the page has no week list
pub fn week_ids(document: &Html, count: usize) -> Result<Vec<u32>> {
    let list = document
        .select(&WEEK_LIST)
        .next()
        .ok_or(Error::MissingWeekList)?;

    let mut ids = vec![];
    let mut armed = false;
    for week in element_children(list) {
        if ids.len() >= count {
            break;
        }

        if armed {
            let id = week
                .select(&LINK)
                .next()
                .and_then(|link| link.value().attr("href"))
                .and_then(week_id);
            if let Some(id) = id {
                ids.push(id);
            }
        } else if week.value().classes().any(|class| class == "current") {
            armed = true;
        }
    }

    Ok(ids)
}

fn week_id(href: &str) -> Option<u32> {
    WEEK_ID.captures(href)?.get(1)?.as_str().parse().ok()
}

/// Every lesson of a schedule table, in cell order
///
/// # Errors
///
/// Fails on the first cell that can't be parsed
pub fn table_lessons(table: ElementRef) -> Result<Vec<Lesson>> {
    let mut lessons = vec![];
    for element in table.select(&LESSON_CELL) {
        if let CellOutcome::Record(lesson) = cell::parse(element)? {
            lessons.push(lesson);
        }
    }

    Ok(lessons)
}

/// Lessons of one page, with the identifiers of the following weeks
fn page_lessons(markup: &str, next_weeks: Option<usize>) -> Result<(Vec<Lesson>, Vec<u32>)> {
    let document = Html::parse_document(markup);
    let resolution = locate(&document, next_weeks)?;

    let lessons = match resolution.table {
        Some(table) => table_lessons(table)?,
        None => vec![],
    };

    Ok((lessons, resolution.weeks.unwrap_or_default()))
}

/// Lessons of a following week
async fn week_lessons<S>(source: &S, url: &str, week: u32) -> Result<Vec<Lesson>>
where
    S: PageSource + Sync,
{
    let markup = source.fetch(&week_url(url, week)).await?;
    let (lessons, _) = page_lessons(&markup, None)?;
    debug!(week, lessons = lessons.len(), "week parsed");

    Ok(lessons)
}

/// Fetch the lessons of every requested week, nothing filtered
///
/// The following weeks are fetched concurrently and the first failure aborts
/// everything. Weeks are merged in no particular order, lessons of a week
/// keep their table order.
///
/// # Errors
///
/// Fails when any page can't be fetched or parsed
pub async fn fetch_lessons<S>(source: &S, url: &str, weeks: Option<usize>) -> Result<Vec<Lesson>>
where
    S: PageSource + Sync,
{
    let next_weeks = weeks.filter(|n| *n > 1).map(|n| n - 1);

    let markup = source.fetch(url).await?;
    let (mut lessons, ids) = page_lessons(&markup, next_weeks)?;
    info!(%url, lessons = lessons.len(), next_weeks = ids.len(), "current week parsed");

    let others = try_join_all(ids.into_iter().map(|week| week_lessons(source, url, week))).await?;

    lessons.extend(others.into_iter().flatten());
    Ok(lessons)
}

/// Lessons of the request, excluded subjects removed
///
/// # Errors
///
/// See [`fetch_lessons`]
pub async fn lessons<S>(source: &S, request: &Request) -> Result<Vec<Lesson>>
where
    S: PageSource + Sync,
{
    let lessons = fetch_lessons(source, &request.url, request.weeks).await?;
    Ok(filter::lessons(lessons, &request.exclusion))
}

/// Display the lessons
pub fn display(lessons: &[Lesson]) {
    let widths = [10, 11, 45, 20];

    line_table(&widths, &Position::Top);
    row_table(&widths, &["Дата", "Время", "Занятие", "Место"]);

    for lesson in lessons {
        line_table(&widths, &Position::Middle);

        let subject = if lesson.kind.is_empty() {
            lesson.name.clone()
        } else {
            format!("{} – {}", lesson.name, lesson.kind)
        };
        let room = lesson.place.get(1).map_or("", String::as_str);

        row_table(
            &widths,
            &[lesson.date.as_str(), lesson.time.as_str(), subject.as_str(), room],
        );
    }

    line_table(&widths, &Position::Bottom);
}
