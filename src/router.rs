use axum::{
    routing::{get, post},
    Router,
};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    artist_page, artists_list, create_artist, create_show, create_venue, delete_venue,
    edit_artist_form, edit_venue_form, index, new_artist_form, new_show_form, new_venue_form,
    not_found, render_metrics, search_artists, search_venues, shows_list, update_artist,
    update_venue, venue_page, venues_list,
};
use crate::state::AppState;

pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/venues", get(venues_list))
        .route("/venues/search", post(search_venues))
        .route("/venues/create", get(new_venue_form).post(create_venue))
        .route("/venues/:id", get(venue_page).delete(delete_venue))
        .route("/venues/:id/edit", get(edit_venue_form).post(update_venue))
        .route("/artists", get(artists_list))
        .route("/artists/search", post(search_artists))
        .route("/artists/create", get(new_artist_form).post(create_artist))
        .route("/artists/:id", get(artist_page))
        .route("/artists/:id/edit", get(edit_artist_form).post(update_artist))
        .route("/shows", get(shows_list))
        .route("/shows/create", get(new_show_form).post(create_show))
        .route("/metrics", get(render_metrics))
        .nest_service("/static", ServeDir::new("static"))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
