use app_core::Result;
use chrono::NaiveDateTime;
use tracing::{info, warn};

use crate::models::{NewArtist, NewShow, NewVenue};
use crate::storage::ListingStore;

fn text(value: &str) -> Option<String> {
    Some(value.to_string())
}

fn genres(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

fn demo_venues() -> Vec<NewVenue> {
    vec![
        NewVenue {
            name: "The Musical Hop".to_string(),
            city: "San Francisco".to_string(),
            state: "CA".to_string(),
            address: "1015 Folsom Street".to_string(),
            phone: text("123-123-1234"),
            image_link: text("https://images.unsplash.com/photo-1543900694-133f37abaaa5?w=400"),
            facebook_link: text("https://www.facebook.com/TheMusicalHop"),
            website_link: text("https://www.themusicalhop.com"),
            genres: genres(&["Jazz", "Reggae", "Blues", "Classical", "Folk"]),
            seeking_talent: true,
            seeking_description: text(
                "We are on the lookout for a local artist to play every two weeks. Please call us.",
            ),
        },
        NewVenue {
            name: "The Dueling Pianos Bar".to_string(),
            city: "New York".to_string(),
            state: "NY".to_string(),
            address: "335 Delancey Street".to_string(),
            phone: text("914-003-1132"),
            image_link: text("https://images.unsplash.com/photo-1497032205916-ac775f0649ae?w=400"),
            facebook_link: text("https://www.facebook.com/theduelingpianos"),
            website_link: text("https://www.theduelingpianos.com"),
            genres: genres(&["Classical", "R&B", "Hip-Hop"]),
            seeking_talent: false,
            seeking_description: None,
        },
        NewVenue {
            name: "Park Square Live Music & Coffee".to_string(),
            city: "San Francisco".to_string(),
            state: "CA".to_string(),
            address: "34 Whiskey Moore Ave".to_string(),
            phone: text("415-000-1234"),
            image_link: text("https://images.unsplash.com/photo-1485686531765-ba63b07845a7?w=400"),
            facebook_link: text("https://www.facebook.com/ParkSquareLiveMusicAndCoffee"),
            website_link: text("https://www.parksquarelivemusicandcoffee.com"),
            genres: genres(&["Rock n Roll", "Jazz", "Classical", "Folk"]),
            seeking_talent: false,
            seeking_description: None,
        },
    ]
}

fn demo_artists() -> Vec<NewArtist> {
    vec![
        NewArtist {
            name: "Guns N Petals".to_string(),
            city: "San Francisco".to_string(),
            state: "CA".to_string(),
            phone: text("326-123-5000"),
            image_link: text("https://images.unsplash.com/photo-1549213783-8284d0336c4f?w=300"),
            facebook_link: text("https://www.facebook.com/GunsNPetals"),
            website_link: text("https://www.gunsnpetalsband.com"),
            genres: genres(&["Rock n Roll"]),
            seeking_venue: true,
            seeking_description: text(
                "Looking for shows to perform at in the San Francisco Bay Area!",
            ),
        },
        NewArtist {
            name: "Matt Quevedo".to_string(),
            city: "New York".to_string(),
            state: "NY".to_string(),
            phone: text("300-400-5000"),
            image_link: text("https://images.unsplash.com/photo-1495223153807-b916f75de8c5?w=334"),
            facebook_link: text("https://www.facebook.com/mattquevedo923251523"),
            website_link: None,
            genres: genres(&["Jazz"]),
            seeking_venue: false,
            seeking_description: None,
        },
        NewArtist {
            name: "The Wild Sax Band".to_string(),
            city: "San Francisco".to_string(),
            state: "CA".to_string(),
            phone: text("432-325-5432"),
            image_link: text("https://images.unsplash.com/photo-1558369981-f9ca78462e61?w=794"),
            facebook_link: None,
            website_link: None,
            genres: genres(&["Jazz", "Classical"]),
            seeking_venue: false,
            seeking_description: None,
        },
    ]
}

// (venue index, artist index, start time)
const DEMO_SHOWS: &[(usize, usize, &str)] = &[
    (0, 0, "2019-05-21 21:30:00"),
    (2, 1, "2019-06-15 23:00:00"),
    (2, 2, "2035-04-01 20:00:00"),
    (2, 2, "2035-04-08 20:00:00"),
    (2, 2, "2035-04-15 20:00:00"),
];

/// Loads demo venues, artists and shows into an empty database.
///
/// Returns how many shows were inserted; zero when listings already exist.
pub async fn seed(store: &dyn ListingStore) -> Result<usize> {
    if !store.recent_venues(1).await?.is_empty() || !store.recent_artists(1).await?.is_empty() {
        info!("Listings already present, skipping seed");
        return Ok(0);
    }

    let mut venue_ids = Vec::new();
    for venue in demo_venues() {
        venue_ids.push(store.create_venue(&venue).await?);
    }
    let mut artist_ids = Vec::new();
    for artist in demo_artists() {
        artist_ids.push(store.create_artist(&artist).await?);
    }

    let mut inserted = 0;
    for &(venue, artist, start_time) in DEMO_SHOWS {
        let start_time = match NaiveDateTime::parse_from_str(start_time, "%Y-%m-%d %H:%M:%S") {
            Ok(time) => time,
            Err(e) => {
                warn!("Skipping demo show at {}: {}", start_time, e);
                continue;
            }
        };
        store
            .create_show(&NewShow {
                venue_id: venue_ids[venue],
                artist_id: artist_ids[artist],
                start_time,
            })
            .await?;
        inserted += 1;
    }

    info!(
        "Seeded {} venues, {} artists and {} shows",
        venue_ids.len(),
        artist_ids.len(),
        inserted
    );
    Ok(inserted)
}
