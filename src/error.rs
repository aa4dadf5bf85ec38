use thiserror::Error;

/// Everything that can abort a timetable extraction
#[derive(Debug, Error)]
pub enum Error {
    /// Transport failure while fetching a page
    #[error("Не удалось получить страницу расписания: {0}")]
    Fetch(#[from] reqwest::Error),

    /// The source answered 404, usually a wrong faculty or group
    #[error("Группа не найдена: {url}")]
    GroupNotFound { url: String },

    /// A mandatory element of the page is missing
    #[error("Не удалось найти элемент по селектору \"{selector}\".")]
    MissingElement { selector: &'static str },

    /// The week navigation list is missing
    #[error("Не удалось найти список недель.")]
    MissingWeekList,

    /// The detail block has less than the date, time and place lines
    #[error("Описание занятия неполное: {found} строк(и) вместо минимум 4.")]
    MissingDetail { found: usize },

    /// Date text is not `DD.MM.YYYY`
    #[error("Неверная дата занятия: \"{value}\"")]
    InvalidDate { value: String },

    /// Time text is not `HH:MM-HH:MM`
    #[error("Неверное время занятия: \"{value}\"")]
    InvalidTime { value: String },

    /// Invalid request parameters
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True when the caller asked for something that can't exist
    pub fn is_bad_request(&self) -> bool {
        matches!(self, Self::BadRequest(_) | Self::GroupNotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
