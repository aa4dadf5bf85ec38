use crate::error::{Error, Result};
use crate::filter::Exclusion;
use crate::timetable::models::Request;

/// Where the groups timetables are published
pub const BASE_URL: &str = "https://timetable.tusur.ru/faculties";

pub const BAD_REQUEST: &str = "Ошибка: неправильный запрос. Укажите правильные параметры URL-адреса.\n\
    Пример: https://.../fvs_590-1?weeks=3&not=УПД&not=ГПО\n\
    Где fvs – факультет, 590-1 – номер группы, 3 – кол-во недель, УПД и ГПО исключаемые предметы.";

/// URL of a group timetable from a `faculty_group` link
///
/// # Errors
///
/// [`Error::BadRequest`] unless the link is `faculty_group`
pub fn group_url(base: &str, faculty_group: &str) -> Result<String> {
    match faculty_group.split('_').collect::<Vec<_>>()[..] {
        [faculty, group] if !faculty.is_empty() && !group.is_empty() => Ok(format!(
            "{}/{faculty}/groups/{group}",
            base.trim_end_matches('/')
        )),
        _ => Err(Error::BadRequest(BAD_REQUEST.to_owned())),
    }
}

/// Number of weeks, must be a positive integer
///
/// # Errors
///
/// [`Error::BadRequest`] for anything else
pub fn weeks(value: Option<&str>) -> Result<Option<usize>> {
    value
        .map(|weeks| match weeks.trim().parse::<usize>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(Error::BadRequest(BAD_REQUEST.to_owned())),
        })
        .transpose()
}

/// Validate every parameter of a request, blank subjects are ignored
///
/// # Errors
///
/// [`Error::BadRequest`] when the link or the number of weeks is invalid
pub fn request(
    base: &str,
    faculty_group: &str,
    weeks_value: Option<&str>,
    not: Vec<String>,
) -> Result<Request> {
    Ok(Request {
        url: group_url(base, faculty_group)?,
        weeks: weeks(weeks_value)?,
        exclusion: Exclusion::from_values(
            not.into_iter()
                .filter(|name| !name.trim().is_empty())
                .collect(),
        ),
    })
}

/// Same as [`request`] from a raw query string like `weeks=3&not=УПД&not=ГПО`
///
/// # Errors
///
/// See [`request`]
pub fn from_query(base: &str, faculty_group: &str, query: Option<&str>) -> Result<Request> {
    let mut weeks_value = None;
    let mut not = vec![];
    for (key, value) in url::form_urlencoded::parse(query.unwrap_or_default().as_bytes()) {
        match key.as_ref() {
            "weeks" => weeks_value = Some(value.into_owned()),
            "not" => not.push(value.into_owned()),
            _ => (),
        }
    }

    request(base, faculty_group, weeks_value.as_deref(), not)
}
