use app_core::Result;
use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::models::*;

/// Storage for venues, artists and the shows linking them.
#[async_trait]
pub trait ListingStore: Send + Sync {
    // Venue operations
    async fn create_venue(&self, venue: &NewVenue) -> Result<i64>;
    async fn get_venue(&self, id: i64) -> Result<Option<Venue>>;
    /// Returns false when no venue has that id.
    async fn update_venue(&self, id: i64, venue: &NewVenue) -> Result<bool>;
    /// Fails with a constraint violation while shows still reference the venue.
    async fn delete_venue(&self, id: i64) -> Result<bool>;
    async fn recent_venues(&self, limit: usize) -> Result<Vec<Venue>>;
    async fn venue_areas(&self, now: NaiveDateTime) -> Result<Vec<Area>>;
    async fn search_venues(&self, term: &str, now: NaiveDateTime) -> Result<SearchResult>;
    async fn venue_shows(&self, venue_id: i64) -> Result<Vec<ShowListing>>;

    // Artist operations
    async fn create_artist(&self, artist: &NewArtist) -> Result<i64>;
    async fn get_artist(&self, id: i64) -> Result<Option<Artist>>;
    async fn update_artist(&self, id: i64, artist: &NewArtist) -> Result<bool>;
    async fn recent_artists(&self, limit: usize) -> Result<Vec<Artist>>;
    async fn list_artists(&self, now: NaiveDateTime) -> Result<Vec<ListingSummary>>;
    async fn search_artists(&self, term: &str, now: NaiveDateTime) -> Result<SearchResult>;
    async fn artist_shows(&self, artist_id: i64) -> Result<Vec<ShowListing>>;

    // Show operations, ordered by start time
    async fn create_show(&self, show: &NewShow) -> Result<i64>;
    async fn list_shows(&self) -> Result<Vec<ShowListing>>;
}
