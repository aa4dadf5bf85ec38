use chrono::{NaiveDateTime, Utc};
use ics::{
    components::Property,
    escape_text,
    parameters::TzIDParam,
    properties::{Description, DtEnd, DtStart, Location, Status, Summary, Transp},
    Event, ICalendar,
};

use crate::calendar::CalendarEvent;
use crate::error::Result;

/// Date format used by iCalendar
fn dt_ical(dt: NaiveDateTime) -> String {
    dt.format("%Y%m%dT%H%M%S").to_string()
}

/// Build the calendar, `timezone` only tags the dates, nothing is converted
pub fn calendar<'a>(events: &'a [CalendarEvent], timezone: Option<&'a str>) -> ICalendar<'a> {
    let mut calendar = ICalendar::new("2.0", "-//tusurcal//EN");

    let dtstamp = Utc::now().format("%Y%m%dT%H%M%SZ").to_string();
    for data in events {
        let mut event = Event::new(data.uid.as_str(), dtstamp.clone());

        let mut start = DtStart::new(dt_ical(data.start));
        let mut end = DtEnd::new(dt_ical(data.end));
        if let Some(tz) = timezone {
            start.add(TzIDParam::new(tz));
            end.add(TzIDParam::new(tz));
        }
        event.push(start);
        event.push(end);

        event.push(Summary::new(escape_text(data.title.as_str())));
        if !data.description.is_empty() {
            event.push(Description::new(escape_text(data.description.as_str())));
        }
        if let Some(location) = &data.location {
            event.push(Location::new(escape_text(location.as_str())));
        }

        event.push(Status::new(CalendarEvent::STATUS));
        // Show as busy
        event.push(Transp::opaque());
        event.push(Property::new(
            "X-MICROSOFT-CDO-BUSYSTATUS",
            CalendarEvent::BUSY_STATUS,
        ));

        calendar.add_event(event);
    }

    calendar
}

/// Calendar as text, for the feed
pub fn render(events: &[CalendarEvent], timezone: Option<&str>) -> String {
    calendar(events, timezone).to_string()
}

/// Save the calendar in `filename`, adding the `.ics` extension if needed
///
/// # Errors
///
/// Fails when the file can't be written
pub fn export(events: &[CalendarEvent], filename: &mut String, timezone: Option<&str>) -> Result<()> {
    // Add .ics extension if the user didn't put it
    if !std::path::Path::new(filename.as_str())
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("ics"))
    {
        filename.push_str(".ics");
    }

    calendar(events, timezone).save_file(filename.as_str())?;
    Ok(())
}
