use axum::{
    extract::{Form, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use tracing::{info, warn};

use super::{home_page, render};
use crate::error::WebResult;
use crate::forms::{FormData, ShowForm};
use crate::state::AppState;
use crate::templates::{Flash, ShowFormTemplate, ShowsTemplate};
use crate::views::ShowView;

pub async fn shows_list(State(state): State<AppState>) -> WebResult<Html<String>> {
    let listings = state.store.list_shows().await?;
    render(&ShowsTemplate {
        shows: listings.iter().map(ShowView::from).collect(),
    })
}

pub async fn new_show_form() -> WebResult<Html<String>> {
    render(&ShowFormTemplate {
        form: ShowForm::default(),
        errors: Vec::new(),
    })
}

/// Unknown venue or artist ids surface as a failure flash, not a form error.
pub async fn create_show(
    State(state): State<AppState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> WebResult<Response> {
    let form = ShowForm::from_form(&FormData::new(pairs));
    let show = match form.validate() {
        Ok(show) => show,
        Err(errors) => {
            let page = render(&ShowFormTemplate { form, errors })?;
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response());
        }
    };

    let flash = match state.store.create_show(&show).await {
        Ok(id) => {
            metrics::counter!("fyyur_listings_created_total", "kind" => "show").increment(1);
            info!(
                "Show {} listed: artist {} at venue {}",
                id, show.artist_id, show.venue_id
            );
            Flash::success("Show was successfully listed!")
        }
        Err(e) => {
            metrics::counter!("fyyur_listing_failures_total", "kind" => "show").increment(1);
            if e.is_constraint_violation() {
                info!(
                    "Rejected show for unknown artist {} or venue {}",
                    show.artist_id, show.venue_id
                );
            } else {
                warn!("Failed to list show: {}", e);
            }
            Flash::danger("An error occurred. Show could not be listed.")
        }
    };

    Ok(home_page(&state, vec![flash]).await?.into_response())
}
