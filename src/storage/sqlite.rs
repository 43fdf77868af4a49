use app_core::db::matches_term;
use app_core::{Database, Result};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row, ToSql};
use std::sync::Arc;
use tracing::{debug, info};

use super::traits::ListingStore;
use crate::models::*;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS venues (
    id                   INTEGER PRIMARY KEY AUTOINCREMENT,
    name                 TEXT NOT NULL,
    city                 TEXT NOT NULL,
    state                TEXT NOT NULL,
    address              TEXT NOT NULL,
    phone                TEXT,
    image_link           TEXT,
    facebook_link        TEXT,
    website_link         TEXT,
    genres               TEXT NOT NULL DEFAULT '[]',
    seeking_talent       INTEGER NOT NULL DEFAULT 0,
    seeking_description  TEXT
);
CREATE TABLE IF NOT EXISTS artists (
    id                   INTEGER PRIMARY KEY AUTOINCREMENT,
    name                 TEXT NOT NULL,
    city                 TEXT NOT NULL,
    state                TEXT NOT NULL,
    phone                TEXT,
    image_link           TEXT,
    facebook_link        TEXT,
    website_link         TEXT,
    genres               TEXT NOT NULL DEFAULT '[]',
    seeking_venue        INTEGER NOT NULL DEFAULT 0,
    seeking_description  TEXT
);
CREATE TABLE IF NOT EXISTS shows (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    venue_id    INTEGER NOT NULL REFERENCES venues(id),
    artist_id   INTEGER NOT NULL REFERENCES artists(id),
    start_time  TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS shows_venue_idx ON shows(venue_id);
CREATE INDEX IF NOT EXISTS shows_artist_idx ON shows(artist_id);
"#;

/// Stored as sortable text so `start_time > ?` compares chronologically.
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const VENUE_COLUMNS: &str = "id, name, city, state, address, phone, image_link, facebook_link, \
     website_link, genres, seeking_talent, seeking_description";

const ARTIST_COLUMNS: &str = "id, name, city, state, phone, image_link, facebook_link, \
     website_link, genres, seeking_venue, seeking_description";

const SHOW_LISTING_SELECT: &str = "SELECT s.id, v.id, v.name, v.image_link, a.id, a.name, a.image_link, s.start_time \
     FROM shows s \
     JOIN venues v ON v.id = s.venue_id \
     JOIN artists a ON a.id = s.artist_id";

fn format_time(time: &NaiveDateTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

fn parse_time(row: &Row<'_>, idx: usize) -> rusqlite::Result<NaiveDateTime> {
    let text: String = row.get(idx)?;
    NaiveDateTime::parse_from_str(&text, TIME_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn encode_genres(genres: &[String]) -> String {
    serde_json::to_string(genres).unwrap_or_else(|_| "[]".to_string())
}

fn parse_genres(row: &Row<'_>, idx: usize) -> rusqlite::Result<Vec<String>> {
    let text: String = row.get(idx)?;
    serde_json::from_str(&text)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// SQLite-backed listing storage.
pub struct SqliteListingStore {
    db: Arc<Database>,
}

impl SqliteListingStore {
    pub fn new(db: Arc<Database>) -> Result<Self> {
        db.migrate(SCHEMA)?;
        Ok(Self { db })
    }

    pub fn in_memory() -> Result<Self> {
        Self::new(Arc::new(Database::open_in_memory()?))
    }

    fn row_to_venue(row: &Row<'_>) -> rusqlite::Result<Venue> {
        Ok(Venue {
            id: row.get(0)?,
            name: row.get(1)?,
            city: row.get(2)?,
            state: row.get(3)?,
            address: row.get(4)?,
            phone: row.get(5)?,
            image_link: row.get(6)?,
            facebook_link: row.get(7)?,
            website_link: row.get(8)?,
            genres: parse_genres(row, 9)?,
            seeking_talent: row.get(10)?,
            seeking_description: row.get(11)?,
        })
    }

    fn row_to_artist(row: &Row<'_>) -> rusqlite::Result<Artist> {
        Ok(Artist {
            id: row.get(0)?,
            name: row.get(1)?,
            city: row.get(2)?,
            state: row.get(3)?,
            phone: row.get(4)?,
            image_link: row.get(5)?,
            facebook_link: row.get(6)?,
            website_link: row.get(7)?,
            genres: parse_genres(row, 8)?,
            seeking_venue: row.get(9)?,
            seeking_description: row.get(10)?,
        })
    }

    fn row_to_listing(row: &Row<'_>) -> rusqlite::Result<ShowListing> {
        Ok(ShowListing {
            show_id: row.get(0)?,
            venue_id: row.get(1)?,
            venue_name: row.get(2)?,
            venue_image_link: row.get(3)?,
            artist_id: row.get(4)?,
            artist_name: row.get(5)?,
            artist_image_link: row.get(6)?,
            start_time: parse_time(row, 7)?,
        })
    }

    fn row_to_summary(row: &Row<'_>) -> rusqlite::Result<ListingSummary> {
        let upcoming: i64 = row.get(2)?;
        Ok(ListingSummary {
            id: row.get(0)?,
            name: row.get(1)?,
            num_upcoming_shows: upcoming as usize,
        })
    }

    fn collect<T, F>(conn: &Connection, sql: &str, args: &[&dyn ToSql], map: F) -> Result<Vec<T>>
    where
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt
            .query_map(args, map)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    fn listings(&self, filter: &str, id: i64) -> Result<Vec<ShowListing>> {
        let sql = format!("{SHOW_LISTING_SELECT} WHERE {filter} = ?1 ORDER BY s.start_time, s.id");
        self.db
            .with_conn(|conn| Self::collect(conn, &sql, &[&id], Self::row_to_listing))
    }

    fn search(&self, table: &str, foreign_key: &str, term: &str, now: NaiveDateTime) -> Result<SearchResult> {
        debug!("Searching {} for '{}'", table, term);
        let sql = format!(
            "SELECT t.id, t.name, \
                (SELECT COUNT(*) FROM shows s WHERE s.{foreign_key} = t.id AND s.start_time > ?1) \
             FROM {table} t \
             ORDER BY t.name, t.id"
        );
        let now = format_time(&now);
        let data = self
            .db
            .with_conn(|conn| Self::collect(conn, &sql, &[&now], Self::row_to_summary))?
            .into_iter()
            .filter(|summary| matches_term(&summary.name, term))
            .collect();
        Ok(SearchResult::new(data))
    }
}

#[async_trait]
impl ListingStore for SqliteListingStore {
    async fn create_venue(&self, venue: &NewVenue) -> Result<i64> {
        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO venues (name, city, state, address, phone, image_link, facebook_link, \
                     website_link, genres, seeking_talent, seeking_description) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    venue.name,
                    venue.city,
                    venue.state,
                    venue.address,
                    venue.phone,
                    venue.image_link,
                    venue.facebook_link,
                    venue.website_link,
                    encode_genres(&venue.genres),
                    venue.seeking_talent,
                    venue.seeking_description,
                ],
            )?;
            let id = conn.last_insert_rowid();
            info!("Created venue: {} with id {}", venue.name, id);
            Ok(id)
        })
    }

    async fn get_venue(&self, id: i64) -> Result<Option<Venue>> {
        self.db.with_conn(|conn| {
            let venue = conn
                .query_row(
                    &format!("SELECT {VENUE_COLUMNS} FROM venues WHERE id = ?1"),
                    params![id],
                    Self::row_to_venue,
                )
                .optional()?;
            Ok(venue)
        })
    }

    async fn update_venue(&self, id: i64, venue: &NewVenue) -> Result<bool> {
        self.db.with_conn(|conn| {
            let updated = conn.execute(
                "UPDATE venues SET name = ?1, city = ?2, state = ?3, address = ?4, phone = ?5, \
                     image_link = ?6, facebook_link = ?7, website_link = ?8, genres = ?9, \
                     seeking_talent = ?10, seeking_description = ?11 \
                 WHERE id = ?12",
                params![
                    venue.name,
                    venue.city,
                    venue.state,
                    venue.address,
                    venue.phone,
                    venue.image_link,
                    venue.facebook_link,
                    venue.website_link,
                    encode_genres(&venue.genres),
                    venue.seeking_talent,
                    venue.seeking_description,
                    id,
                ],
            )?;
            if updated > 0 {
                info!("Updated venue {}", id);
            }
            Ok(updated > 0)
        })
    }

    async fn delete_venue(&self, id: i64) -> Result<bool> {
        self.db.with_conn(|conn| {
            let deleted = conn.execute("DELETE FROM venues WHERE id = ?1", params![id])?;
            if deleted > 0 {
                info!("Deleted venue {}", id);
            }
            Ok(deleted > 0)
        })
    }

    async fn recent_venues(&self, limit: usize) -> Result<Vec<Venue>> {
        let sql = format!("SELECT {VENUE_COLUMNS} FROM venues ORDER BY id DESC LIMIT ?1");
        let limit = limit as i64;
        self.db
            .with_conn(|conn| Self::collect(conn, &sql, &[&limit], Self::row_to_venue))
    }

    async fn venue_areas(&self, now: NaiveDateTime) -> Result<Vec<Area>> {
        let now = format_time(&now);
        let rows = self.db.with_conn(|conn| {
            Self::collect(
                conn,
                "SELECT v.id, v.name, \
                    (SELECT COUNT(*) FROM shows s WHERE s.venue_id = v.id AND s.start_time > ?1), \
                    v.city, v.state \
                 FROM venues v \
                 ORDER BY v.state, v.city, v.name, v.id",
                &[&now],
                |row| {
                    let summary = Self::row_to_summary(row)?;
                    let city: String = row.get(3)?;
                    let state: String = row.get(4)?;
                    Ok((city, state, summary))
                },
            )
        })?;

        let mut areas: Vec<Area> = Vec::new();
        for (city, state, summary) in rows {
            match areas.last_mut() {
                Some(area) if area.city == city && area.state == state => area.venues.push(summary),
                _ => areas.push(Area {
                    city,
                    state,
                    venues: vec![summary],
                }),
            }
        }
        Ok(areas)
    }

    async fn search_venues(&self, term: &str, now: NaiveDateTime) -> Result<SearchResult> {
        self.search("venues", "venue_id", term, now)
    }

    async fn venue_shows(&self, venue_id: i64) -> Result<Vec<ShowListing>> {
        self.listings("s.venue_id", venue_id)
    }

    async fn create_artist(&self, artist: &NewArtist) -> Result<i64> {
        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO artists (name, city, state, phone, image_link, facebook_link, \
                     website_link, genres, seeking_venue, seeking_description) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    artist.name,
                    artist.city,
                    artist.state,
                    artist.phone,
                    artist.image_link,
                    artist.facebook_link,
                    artist.website_link,
                    encode_genres(&artist.genres),
                    artist.seeking_venue,
                    artist.seeking_description,
                ],
            )?;
            let id = conn.last_insert_rowid();
            info!("Created artist: {} with id {}", artist.name, id);
            Ok(id)
        })
    }

    async fn get_artist(&self, id: i64) -> Result<Option<Artist>> {
        self.db.with_conn(|conn| {
            let artist = conn
                .query_row(
                    &format!("SELECT {ARTIST_COLUMNS} FROM artists WHERE id = ?1"),
                    params![id],
                    Self::row_to_artist,
                )
                .optional()?;
            Ok(artist)
        })
    }

    async fn update_artist(&self, id: i64, artist: &NewArtist) -> Result<bool> {
        self.db.with_conn(|conn| {
            let updated = conn.execute(
                "UPDATE artists SET name = ?1, city = ?2, state = ?3, phone = ?4, image_link = ?5, \
                     facebook_link = ?6, website_link = ?7, genres = ?8, seeking_venue = ?9, \
                     seeking_description = ?10 \
                 WHERE id = ?11",
                params![
                    artist.name,
                    artist.city,
                    artist.state,
                    artist.phone,
                    artist.image_link,
                    artist.facebook_link,
                    artist.website_link,
                    encode_genres(&artist.genres),
                    artist.seeking_venue,
                    artist.seeking_description,
                    id,
                ],
            )?;
            if updated > 0 {
                info!("Updated artist {}", id);
            }
            Ok(updated > 0)
        })
    }

    async fn recent_artists(&self, limit: usize) -> Result<Vec<Artist>> {
        let sql = format!("SELECT {ARTIST_COLUMNS} FROM artists ORDER BY id DESC LIMIT ?1");
        let limit = limit as i64;
        self.db
            .with_conn(|conn| Self::collect(conn, &sql, &[&limit], Self::row_to_artist))
    }

    async fn list_artists(&self, now: NaiveDateTime) -> Result<Vec<ListingSummary>> {
        let now = format_time(&now);
        self.db.with_conn(|conn| {
            Self::collect(
                conn,
                "SELECT a.id, a.name, \
                    (SELECT COUNT(*) FROM shows s WHERE s.artist_id = a.id AND s.start_time > ?1) \
                 FROM artists a \
                 ORDER BY a.name, a.id",
                &[&now],
                Self::row_to_summary,
            )
        })
    }

    async fn search_artists(&self, term: &str, now: NaiveDateTime) -> Result<SearchResult> {
        self.search("artists", "artist_id", term, now)
    }

    async fn artist_shows(&self, artist_id: i64) -> Result<Vec<ShowListing>> {
        self.listings("s.artist_id", artist_id)
    }

    async fn create_show(&self, show: &NewShow) -> Result<i64> {
        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO shows (venue_id, artist_id, start_time) VALUES (?1, ?2, ?3)",
                params![show.venue_id, show.artist_id, format_time(&show.start_time)],
            )?;
            let id = conn.last_insert_rowid();
            info!(
                "Created show {} (venue {}, artist {}) at {}",
                id, show.venue_id, show.artist_id, show.start_time
            );
            Ok(id)
        })
    }

    async fn list_shows(&self) -> Result<Vec<ShowListing>> {
        let sql = format!("{SHOW_LISTING_SELECT} ORDER BY s.start_time, s.id");
        self.db
            .with_conn(|conn| Self::collect(conn, &sql, &[], Self::row_to_listing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn venue(name: &str, city: &str, state: &str) -> NewVenue {
        NewVenue {
            name: name.to_string(),
            city: city.to_string(),
            state: state.to_string(),
            address: "1015 Folsom Street".to_string(),
            phone: Some("123-123-1234".to_string()),
            image_link: None,
            facebook_link: None,
            website_link: None,
            genres: vec!["Jazz".to_string(), "Folk".to_string()],
            seeking_talent: true,
            seeking_description: Some("Looking for local acts".to_string()),
        }
    }

    fn artist(name: &str) -> NewArtist {
        NewArtist {
            name: name.to_string(),
            city: "San Francisco".to_string(),
            state: "CA".to_string(),
            phone: None,
            image_link: Some("https://example.com/a.jpg".to_string()),
            facebook_link: None,
            website_link: None,
            genres: vec!["Rock n Roll".to_string()],
            seeking_venue: false,
            seeking_description: None,
        }
    }

    #[tokio::test]
    async fn venue_round_trips_through_storage() {
        let store = SqliteListingStore::in_memory().unwrap();
        let id = store
            .create_venue(&venue("The Musical Hop", "San Francisco", "CA"))
            .await
            .unwrap();

        let stored = store.get_venue(id).await.unwrap().unwrap();
        assert_eq!(stored.name, "The Musical Hop");
        assert_eq!(stored.genres, vec!["Jazz", "Folk"]);
        assert!(stored.seeking_talent);
        assert!(store.get_venue(id + 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_changes_only_existing_rows() {
        let store = SqliteListingStore::in_memory().unwrap();
        let id = store.create_artist(&artist("Guns N Petals")).await.unwrap();

        let mut changed = artist("Guns N Roses");
        changed.seeking_venue = true;
        assert!(store.update_artist(id, &changed).await.unwrap());
        assert!(!store.update_artist(id + 10, &changed).await.unwrap());

        let stored = store.get_artist(id).await.unwrap().unwrap();
        assert_eq!(stored.name, "Guns N Roses");
        assert!(stored.seeking_venue);
    }

    #[tokio::test]
    async fn areas_group_venues_and_count_upcoming_shows() {
        let store = SqliteListingStore::in_memory().unwrap();
        let hop = store.create_venue(&venue("The Musical Hop", "San Francisco", "CA")).await.unwrap();
        let park = store.create_venue(&venue("Park Square Live", "San Francisco", "CA")).await.unwrap();
        store.create_venue(&venue("The Dueling Pianos Bar", "New York", "NY")).await.unwrap();
        let band = store.create_artist(&artist("The Wild Sax Band")).await.unwrap();

        let now = at(2024, 6, 1, 12);
        for start in [at(2024, 7, 1, 20), at(2024, 8, 1, 20), at(2023, 1, 1, 20)] {
            store
                .create_show(&NewShow { venue_id: hop, artist_id: band, start_time: start })
                .await
                .unwrap();
        }
        store
            .create_show(&NewShow { venue_id: park, artist_id: band, start_time: at(2020, 1, 1, 20) })
            .await
            .unwrap();

        let areas = store.venue_areas(now).await.unwrap();
        assert_eq!(areas.len(), 2);
        assert_eq!(areas[0].state, "CA");
        let names: Vec<_> = areas[0].venues.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["Park Square Live", "The Musical Hop"]);
        assert_eq!(areas[0].venues[1].num_upcoming_shows, 2);
        assert_eq!(areas[0].venues[0].num_upcoming_shows, 0);
        assert_eq!(areas[1].city, "New York");
    }

    #[tokio::test]
    async fn search_matches_partial_names_ignoring_case() {
        let store = SqliteListingStore::in_memory().unwrap();
        store.create_artist(&artist("Guns N Petals")).await.unwrap();
        store.create_artist(&artist("Matt Quevedo")).await.unwrap();
        store.create_artist(&artist("The Wild Sax Band")).await.unwrap();

        let now = at(2024, 1, 1, 0);
        let result = store.search_artists("A", now).await.unwrap();
        assert_eq!(result.count, 3);

        let result = store.search_artists("band", now).await.unwrap();
        assert_eq!(result.count, 1);
        assert_eq!(result.data[0].name, "The Wild Sax Band");

        assert_eq!(store.search_artists("zzz", now).await.unwrap().count, 0);
    }

    #[tokio::test]
    async fn search_folds_non_ascii_case() {
        let store = SqliteListingStore::in_memory().unwrap();
        store
            .create_venue(&venue("Café Ölbar", "Berlin", "NY"))
            .await
            .unwrap();
        store
            .create_venue(&venue("The Musical Hop", "San Francisco", "CA"))
            .await
            .unwrap();

        let now = at(2024, 1, 1, 0);
        let result = store.search_venues("Ölbar", now).await.unwrap();
        assert_eq!(result.count, 1);
        assert_eq!(result.data[0].name, "Café Ölbar");
        assert_eq!(store.search_venues("ölbar", now).await.unwrap().count, 1);
        assert_eq!(store.search_venues("CAFÉ", now).await.unwrap().count, 1);
        assert_eq!(store.search_venues("", now).await.unwrap().count, 2);
    }

    #[tokio::test]
    async fn shows_require_existing_venue_and_artist() {
        let store = SqliteListingStore::in_memory().unwrap();
        let band = store.create_artist(&artist("The Wild Sax Band")).await.unwrap();

        let err = store
            .create_show(&NewShow { venue_id: 99, artist_id: band, start_time: at(2024, 1, 1, 20) })
            .await
            .unwrap_err();
        assert!(err.is_constraint_violation());
        assert!(store.list_shows().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn venue_with_shows_cannot_be_deleted() {
        let store = SqliteListingStore::in_memory().unwrap();
        let hop = store.create_venue(&venue("The Musical Hop", "San Francisco", "CA")).await.unwrap();
        let empty = store.create_venue(&venue("Empty Hall", "Austin", "TX")).await.unwrap();
        let band = store.create_artist(&artist("The Wild Sax Band")).await.unwrap();
        store
            .create_show(&NewShow { venue_id: hop, artist_id: band, start_time: at(2024, 1, 1, 20) })
            .await
            .unwrap();

        let err = store.delete_venue(hop).await.unwrap_err();
        assert!(err.is_constraint_violation());
        assert!(store.get_venue(hop).await.unwrap().is_some());

        assert!(store.delete_venue(empty).await.unwrap());
        assert!(!store.delete_venue(empty).await.unwrap());
    }

    #[tokio::test]
    async fn show_listings_are_joined_and_ordered() {
        let store = SqliteListingStore::in_memory().unwrap();
        let hop = store.create_venue(&venue("The Musical Hop", "San Francisco", "CA")).await.unwrap();
        let petals = store.create_artist(&artist("Guns N Petals")).await.unwrap();
        let sax = store.create_artist(&artist("The Wild Sax Band")).await.unwrap();

        store
            .create_show(&NewShow { venue_id: hop, artist_id: sax, start_time: at(2035, 4, 1, 20) })
            .await
            .unwrap();
        store
            .create_show(&NewShow { venue_id: hop, artist_id: petals, start_time: at(2019, 5, 21, 21) })
            .await
            .unwrap();

        let shows = store.venue_shows(hop).await.unwrap();
        assert_eq!(shows.len(), 2);
        assert_eq!(shows[0].artist_name, "Guns N Petals");
        assert_eq!(shows[0].start_time, at(2019, 5, 21, 21));
        assert_eq!(shows[1].venue_name, "The Musical Hop");

        let sax_shows = store.artist_shows(sax).await.unwrap();
        assert_eq!(sax_shows.len(), 1);
        assert_eq!(store.list_shows().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn recent_listings_are_newest_first() {
        let store = SqliteListingStore::in_memory().unwrap();
        for name in ["first", "second", "third"] {
            store.create_artist(&artist(name)).await.unwrap();
        }

        let recent = store.recent_artists(2).await.unwrap();
        let names: Vec<_> = recent.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["third", "second"]);
    }
}
