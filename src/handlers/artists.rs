use axum::{
    extract::{rejection::PathRejection, Form, Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use tracing::{info, warn};

use super::{home_page, now, path_id, render, SearchForm};
use crate::error::{WebError, WebResult};
use crate::forms::{ArtistForm, FormData};
use crate::state::AppState;
use crate::templates::{ArtistFormTemplate, ArtistTemplate, ArtistsTemplate, Flash, SearchTemplate};
use crate::views::ShowSplit;

pub async fn artists_list(State(state): State<AppState>) -> WebResult<Html<String>> {
    let artists = state.store.list_artists(now()).await?;
    render(&ArtistsTemplate { artists })
}

pub async fn search_artists(
    State(state): State<AppState>,
    Form(search): Form<SearchForm>,
) -> WebResult<Html<String>> {
    let results = state.store.search_artists(&search.search_term, now()).await?;
    render(&SearchTemplate {
        kind: "artists",
        search_term: search.search_term,
        results,
    })
}

pub async fn artist_page(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> WebResult<Html<String>> {
    let id = path_id(path)?;
    let artist = state.store.get_artist(id).await?.ok_or(WebError::NotFound)?;
    let listings = state.store.artist_shows(id).await?;

    render(&ArtistTemplate {
        artist,
        shows: ShowSplit::new(&listings, now()),
    })
}

pub async fn new_artist_form() -> WebResult<Html<String>> {
    render(&ArtistFormTemplate {
        form: ArtistForm::default(),
        errors: Vec::new(),
        artist_id: None,
    })
}

pub async fn create_artist(
    State(state): State<AppState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> WebResult<Response> {
    let form = ArtistForm::from_form(&FormData::new(pairs));
    let artist = match form.validate() {
        Ok(artist) => artist,
        Err(errors) => {
            let page = render(&ArtistFormTemplate {
                form,
                errors,
                artist_id: None,
            })?;
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response());
        }
    };

    let flash = match state.store.create_artist(&artist).await {
        Ok(id) => {
            metrics::counter!("fyyur_listings_created_total", "kind" => "artist").increment(1);
            info!("Artist {} listed with id {}", artist.name, id);
            Flash::success(format!("Artist {} was successfully listed!", artist.name))
        }
        Err(e) => {
            metrics::counter!("fyyur_listing_failures_total", "kind" => "artist").increment(1);
            warn!("Failed to list artist {}: {}", artist.name, e);
            Flash::danger(format!(
                "An error occurred. Artist {} could not be listed.",
                artist.name
            ))
        }
    };

    Ok(home_page(&state, vec![flash]).await?.into_response())
}

pub async fn edit_artist_form(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> WebResult<Html<String>> {
    let id = path_id(path)?;
    let artist = state.store.get_artist(id).await?.ok_or(WebError::NotFound)?;
    render(&ArtistFormTemplate {
        form: ArtistForm::from_artist(&artist),
        errors: Vec::new(),
        artist_id: Some(id),
    })
}

pub async fn update_artist(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> WebResult<Response> {
    let id = path_id(path)?;
    let form = ArtistForm::from_form(&FormData::new(pairs));
    let artist = match form.validate() {
        Ok(artist) => artist,
        Err(errors) => {
            let page = render(&ArtistFormTemplate {
                form,
                errors,
                artist_id: Some(id),
            })?;
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response());
        }
    };

    if !state.store.update_artist(id, &artist).await? {
        return Err(WebError::NotFound);
    }
    Ok(Redirect::to(&format!("/artists/{id}")).into_response())
}
