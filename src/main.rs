use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod calendar;
mod error;
mod filter;
mod ics;
mod link;
mod server;
mod timetable;
mod utils;

#[derive(Parser)]
#[clap(version, about, long_about = None)]
struct Args {
    /// The group you want the timetable of, as faculty_group, i.e.: fvs_590-1
    #[clap(value_parser, required_unless_present = "serve")]
    group: Option<String>,

    /// Number of weeks to fetch, the current one included
    #[clap(short, long, value_name = "NUMBER")]
    weeks: Option<String>,

    /// Subject to leave out, can be repeated
    #[clap(short, long, value_name = "SUBJECT")]
    not: Vec<String>,

    /// Export to iCalendar format (.ics)
    #[clap(short, long, value_name = "FILE NAME")]
    export: Option<String>,

    /// Choose the subjects to follow
    #[clap(short, long)]
    interactive: bool,

    /// TZID put on the exported dates, they are never converted
    #[clap(short, long, value_name = "TZID")]
    timezone: Option<String>,

    /// Serve the calendars over HTTP instead
    #[clap(long)]
    serve: bool,

    /// Port of the HTTP server
    #[clap(long, env = "TUSURCAL_PORT", default_value_t = 3000)]
    port: u16,

    /// Root of the groups timetables
    #[clap(long, env = "TUSURCAL_BASE_URL", default_value = link::BASE_URL)]
    base_url: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tusurcal=info")),
        )
        .init();

    let args = Args::parse();
    let client = timetable::Client::new()?;

    if args.serve {
        let state = server::AppState {
            source: client,
            base_url: args.base_url,
            timezone: args.timezone,
        };
        server::serve(state, args.port).await?;
        return Ok(());
    }

    let group = args.group.context("no group given")?;
    let mut request = link::request(&args.base_url, &group, args.weeks.as_deref(), args.not)?;

    println!("Получение расписания группы {group}...");
    let lessons = timetable::fetch_lessons(&client, &request.url, request.weeks).await?;

    if args.interactive {
        request.exclusion = filter::interactive(&lessons, &request.exclusion)?;
    }
    let lessons = filter::lessons(lessons, &request.exclusion);

    if let Some(mut filename) = args.export {
        // Export the calendar
        let events = calendar::build(&lessons)?;
        ics::export(&events, &mut filename, args.timezone.as_deref())?;

        println!("Файл .ICS построен и экспортирован => {filename}");
    } else {
        // Show the lessons
        println!("Отображение...");
        timetable::display(&lessons);
    }

    Ok(())
}
