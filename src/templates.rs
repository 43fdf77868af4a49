use askama::Template;

use crate::forms::{ArtistForm, FieldError, ShowForm, VenueForm};
use crate::models::{Area, Artist, ListingSummary, SearchResult, Venue};
use crate::views::{ShowSplit, ShowView};

/// A one-off message shown at the top of the page rendered for this request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    /// Bootstrap alert class suffix: `success` or `danger`.
    pub kind: &'static str,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: "success",
            message: message.into(),
        }
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self {
            kind: "danger",
            message: message.into(),
        }
    }
}

#[derive(Template)]
#[template(path = "pages/home.html")]
pub struct HomeTemplate {
    pub flashes: Vec<Flash>,
    pub recent_venues: Vec<Venue>,
    pub recent_artists: Vec<Artist>,
}

#[derive(Template)]
#[template(path = "pages/venues.html")]
pub struct VenuesTemplate {
    pub areas: Vec<Area>,
}

#[derive(Template)]
#[template(path = "pages/artists.html")]
pub struct ArtistsTemplate {
    pub artists: Vec<ListingSummary>,
}

/// Results page for venue and artist searches; `kind` is the URL prefix.
#[derive(Template)]
#[template(path = "pages/search.html")]
pub struct SearchTemplate {
    pub kind: &'static str,
    pub search_term: String,
    pub results: SearchResult,
}

#[derive(Template)]
#[template(path = "pages/show_venue.html")]
pub struct VenueTemplate {
    pub venue: Venue,
    pub shows: ShowSplit,
}

#[derive(Template)]
#[template(path = "pages/show_artist.html")]
pub struct ArtistTemplate {
    pub artist: Artist,
    pub shows: ShowSplit,
}

#[derive(Template)]
#[template(path = "pages/shows.html")]
pub struct ShowsTemplate {
    pub shows: Vec<ShowView>,
}

/// New-venue form when `venue_id` is `None`, edit form otherwise.
#[derive(Template)]
#[template(path = "forms/venue.html")]
pub struct VenueFormTemplate {
    pub form: VenueForm,
    pub errors: Vec<FieldError>,
    pub venue_id: Option<i64>,
}

#[derive(Template)]
#[template(path = "forms/artist.html")]
pub struct ArtistFormTemplate {
    pub form: ArtistForm,
    pub errors: Vec<FieldError>,
    pub artist_id: Option<i64>,
}

#[derive(Template)]
#[template(path = "forms/new_show.html")]
pub struct ShowFormTemplate {
    pub form: ShowForm,
    pub errors: Vec<FieldError>,
}

#[derive(Template)]
#[template(path = "errors/404.html")]
pub struct NotFoundTemplate;

#[derive(Template)]
#[template(path = "errors/500.html")]
pub struct ServerErrorTemplate;
