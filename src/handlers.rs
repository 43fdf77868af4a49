mod artists;
mod shows;
mod venues;

pub use artists::*;
pub use shows::*;
pub use venues::*;

use askama::Template;
use axum::{
    extract::{rejection::PathRejection, Path, State},
    response::{Html, IntoResponse},
};
use chrono::{Local, NaiveDateTime};
use serde::Deserialize;
use tracing::debug;

use crate::error::{WebError, WebResult};
use crate::state::AppState;
use crate::templates::{Flash, HomeTemplate};

/// How many recent venues and artists the home page lists.
pub const RECENT_LIMIT: usize = 10;

#[derive(Debug, Default, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub search_term: String,
}

pub(crate) fn render<T: Template>(template: &T) -> WebResult<Html<String>> {
    Ok(Html(template.render()?))
}

/// Show times are entered as local wall-clock times, so compare against local now.
pub(crate) fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Non-numeric ids are treated like unknown ones.
pub(crate) fn path_id(path: Result<Path<i64>, PathRejection>) -> WebResult<i64> {
    path.map(|Path(id)| id).map_err(|rejection| {
        debug!("Rejected path id: {}", rejection);
        WebError::NotFound
    })
}

pub(crate) async fn home_page(state: &AppState, flashes: Vec<Flash>) -> WebResult<Html<String>> {
    let recent_venues = state.store.recent_venues(RECENT_LIMIT).await?;
    let recent_artists = state.store.recent_artists(RECENT_LIMIT).await?;
    render(&HomeTemplate {
        flashes,
        recent_venues,
        recent_artists,
    })
}

pub async fn index(State(state): State<AppState>) -> WebResult<Html<String>> {
    home_page(&state, Vec::new()).await
}

pub async fn render_metrics(State(state): State<AppState>) -> impl IntoResponse {
    app_core::metrics::render(state.metrics.as_ref())
}

pub async fn not_found() -> WebError {
    WebError::NotFound
}
