use axum::{
    extract::{rejection::PathRejection, Form, Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};
use serde_json::json;
use tracing::{info, warn};

use super::{home_page, now, path_id, render, SearchForm};
use crate::error::{WebError, WebResult};
use crate::forms::{FormData, VenueForm};
use crate::state::AppState;
use crate::templates::{Flash, SearchTemplate, VenueFormTemplate, VenueTemplate, VenuesTemplate};
use crate::views::ShowSplit;

pub async fn venues_list(State(state): State<AppState>) -> WebResult<Html<String>> {
    let areas = state.store.venue_areas(now()).await?;
    render(&VenuesTemplate { areas })
}

pub async fn search_venues(
    State(state): State<AppState>,
    Form(search): Form<SearchForm>,
) -> WebResult<Html<String>> {
    let results = state.store.search_venues(&search.search_term, now()).await?;
    render(&SearchTemplate {
        kind: "venues",
        search_term: search.search_term,
        results,
    })
}

pub async fn venue_page(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> WebResult<Html<String>> {
    let id = path_id(path)?;
    let venue = state.store.get_venue(id).await?.ok_or(WebError::NotFound)?;
    let listings = state.store.venue_shows(id).await?;

    render(&VenueTemplate {
        venue,
        shows: ShowSplit::new(&listings, now()),
    })
}

pub async fn new_venue_form() -> WebResult<Html<String>> {
    render(&VenueFormTemplate {
        form: VenueForm::default(),
        errors: Vec::new(),
        venue_id: None,
    })
}

pub async fn create_venue(
    State(state): State<AppState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> WebResult<Response> {
    let form = VenueForm::from_form(&FormData::new(pairs));
    let venue = match form.validate() {
        Ok(venue) => venue,
        Err(errors) => {
            let page = render(&VenueFormTemplate {
                form,
                errors,
                venue_id: None,
            })?;
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response());
        }
    };

    let flash = match state.store.create_venue(&venue).await {
        Ok(id) => {
            metrics::counter!("fyyur_listings_created_total", "kind" => "venue").increment(1);
            info!("Venue {} listed with id {}", venue.name, id);
            Flash::success(format!("Venue {} was successfully listed!", venue.name))
        }
        Err(e) => {
            metrics::counter!("fyyur_listing_failures_total", "kind" => "venue").increment(1);
            warn!("Failed to list venue {}: {}", venue.name, e);
            Flash::danger(format!(
                "An error occurred. Venue {} could not be listed.",
                venue.name
            ))
        }
    };

    Ok(home_page(&state, vec![flash]).await?.into_response())
}

pub async fn edit_venue_form(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> WebResult<Html<String>> {
    let id = path_id(path)?;
    let venue = state.store.get_venue(id).await?.ok_or(WebError::NotFound)?;
    render(&VenueFormTemplate {
        form: VenueForm::from_venue(&venue),
        errors: Vec::new(),
        venue_id: Some(id),
    })
}

pub async fn update_venue(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> WebResult<Response> {
    let id = path_id(path)?;
    let form = VenueForm::from_form(&FormData::new(pairs));
    let venue = match form.validate() {
        Ok(venue) => venue,
        Err(errors) => {
            let page = render(&VenueFormTemplate {
                form,
                errors,
                venue_id: Some(id),
            })?;
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response());
        }
    };

    if !state.store.update_venue(id, &venue).await? {
        return Err(WebError::NotFound);
    }
    Ok(Redirect::to(&format!("/venues/{id}")).into_response())
}

/// Answers `{"success": false}` when the venue is unknown or still has shows.
pub async fn delete_venue(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Json<serde_json::Value> {
    let Ok(id) = path_id(path) else {
        return Json(json!({ "success": false }));
    };

    let success = match state.store.delete_venue(id).await {
        Ok(deleted) => deleted,
        Err(e) if e.is_constraint_violation() => {
            info!("Venue {} still has shows, not deleting", id);
            false
        }
        Err(e) => {
            warn!("Failed to delete venue {}: {}", id, e);
            false
        }
    };
    Json(json!({ "success": success }))
}
