use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Path, RawQuery, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tracing::{info, warn};

use crate::calendar;
use crate::error::Error;
use crate::ics;
use crate::link::{self, BAD_REQUEST};
use crate::timetable::PageSource;

/// What every request shares
pub struct AppState<S> {
    pub source: S,
    /// Root of the groups timetables
    pub base_url: String,
    /// Optional TZID put on the dates
    pub timezone: Option<String>,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        if self.is_bad_request() {
            (StatusCode::BAD_REQUEST, BAD_REQUEST).into_response()
        } else {
            (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
        }
    }
}

/// Router serving one calendar feed per group
pub fn create_router<S>(state: Arc<AppState<S>>) -> Router
where
    S: PageSource + Send + Sync + 'static,
{
    Router::new()
        .route("/:faculty_group", get(feed::<S>))
        .with_state(state)
}

async fn feed<S>(
    State(state): State<Arc<AppState<S>>>,
    Path(faculty_group): Path<String>,
    RawQuery(query): RawQuery,
) -> Result<Response, Error>
where
    S: PageSource + Send + Sync + 'static,
{
    let request = link::from_query(&state.base_url, &faculty_group, query.as_deref())?;
    info!(group = %faculty_group, weeks = ?request.weeks, "feed requested");

    let events = calendar::events(&state.source, &request)
        .await
        .inspect_err(|err| warn!(group = %faculty_group, %err, "feed failed"))?;

    Ok((
        [(header::CONTENT_TYPE, "text/calendar; charset=utf-8")],
        ics::render(&events, state.timezone.as_deref()),
    )
        .into_response())
}

/// Serve the feeds until the process stops
///
/// # Errors
///
/// Fails when the port can't be bound
pub async fn serve<S>(state: AppState<S>, port: u16) -> std::io::Result<()>
where
    S: PageSource + Send + Sync + 'static,
{
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Сервер запущен на http://{addr}");
    axum::serve(listener, create_router(Arc::new(state))).await
}
