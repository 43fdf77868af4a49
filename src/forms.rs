//! Form parsing and validation for the create and edit pages.
//!
//! Forms keep the raw submitted strings so an invalid submission can be
//! rendered back to the user unchanged.

use chrono::{Local, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

use crate::models::*;

static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{3}-?\d{3}-?\d{4}$").expect("phone pattern is valid")
});

const START_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// One `<option>` of a select box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub value: &'static str,
    pub selected: bool,
}

/// Submitted `application/x-www-form-urlencoded` pairs, in order.
///
/// Kept as pairs because multi-selects repeat their key once per value.
#[derive(Debug, Clone, Default)]
pub struct FormData(Vec<(String, String)>);

impl FormData {
    pub fn new(pairs: Vec<(String, String)>) -> Self {
        Self(pairs)
    }

    pub fn get(&self, key: &str) -> String {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.trim().to_string())
            .unwrap_or_default()
    }

    pub fn get_all(&self, key: &str) -> Vec<String> {
        self.0
            .iter()
            .filter(|(k, v)| k == key && !v.trim().is_empty())
            .map(|(_, v)| v.trim().to_string())
            .collect()
    }

    /// Checkbox semantics: present with a truthy value.
    pub fn flag(&self, key: &str) -> bool {
        matches!(
            self.get(key).to_lowercase().as_str(),
            "y" | "yes" | "on" | "true" | "1"
        )
    }
}

fn optional(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn state_choices(current: &str) -> Vec<Choice> {
    STATES
        .iter()
        .map(|&value| Choice {
            value,
            selected: value == current,
        })
        .collect()
}

fn genre_choices(current: &[String]) -> Vec<Choice> {
    GENRES
        .iter()
        .map(|&value| Choice {
            value,
            selected: current.iter().any(|g| g == value),
        })
        .collect()
}

/// Collects field errors for the fields every listing has.
#[derive(Default)]
struct Checker {
    errors: Vec<FieldError>,
}

impl Checker {
    fn fail(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    fn required(&mut self, field: &'static str, value: &str) {
        if value.is_empty() {
            self.fail(field, "This field is required.");
        }
    }

    fn state(&mut self, value: &str) {
        if value.is_empty() {
            self.fail("state", "This field is required.");
        } else if !STATES.contains(&value) {
            self.fail("state", "Not a valid choice.");
        }
    }

    fn phone(&mut self, value: &str) {
        if !value.is_empty() && !PHONE_RE.is_match(value) {
            self.fail("phone", "Phone number must look like 123-456-7890.");
        }
    }

    fn link(&mut self, field: &'static str, value: &str) {
        if !value.is_empty() && !(value.starts_with("http://") || value.starts_with("https://")) {
            self.fail(field, "Invalid URL.");
        }
    }

    fn genres(&mut self, values: &[String]) {
        if values.is_empty() {
            self.fail("genres", "Choose at least one genre.");
        }
        for genre in values {
            if !GENRES.contains(&genre.as_str()) {
                self.fail("genres", format!("'{genre}' is not a valid choice."));
            }
        }
    }

    fn finish<T>(self, value: T) -> Result<T, Vec<FieldError>> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(self.errors)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VenueForm {
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: String,
    pub image_link: String,
    pub facebook_link: String,
    pub website_link: String,
    pub genres: Vec<String>,
    pub seeking_talent: bool,
    pub seeking_description: String,
}

impl VenueForm {
    pub fn from_form(data: &FormData) -> Self {
        Self {
            name: data.get("name"),
            city: data.get("city"),
            state: data.get("state"),
            address: data.get("address"),
            phone: data.get("phone"),
            image_link: data.get("image_link"),
            facebook_link: data.get("facebook_link"),
            website_link: data.get("website_link"),
            genres: data.get_all("genres"),
            seeking_talent: data.flag("seeking_talent"),
            seeking_description: data.get("seeking_description"),
        }
    }

    pub fn from_venue(venue: &Venue) -> Self {
        Self {
            name: venue.name.clone(),
            city: venue.city.clone(),
            state: venue.state.clone(),
            address: venue.address.clone(),
            phone: venue.phone.clone().unwrap_or_default(),
            image_link: venue.image_link.clone().unwrap_or_default(),
            facebook_link: venue.facebook_link.clone().unwrap_or_default(),
            website_link: venue.website_link.clone().unwrap_or_default(),
            genres: venue.genres.clone(),
            seeking_talent: venue.seeking_talent,
            seeking_description: venue.seeking_description.clone().unwrap_or_default(),
        }
    }

    pub fn validate(&self) -> Result<NewVenue, Vec<FieldError>> {
        let mut check = Checker::default();
        check.required("name", &self.name);
        check.required("city", &self.city);
        check.state(&self.state);
        check.required("address", &self.address);
        check.phone(&self.phone);
        check.link("image_link", &self.image_link);
        check.link("facebook_link", &self.facebook_link);
        check.link("website_link", &self.website_link);
        check.genres(&self.genres);

        check.finish(NewVenue {
            name: self.name.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            address: self.address.clone(),
            phone: optional(&self.phone),
            image_link: optional(&self.image_link),
            facebook_link: optional(&self.facebook_link),
            website_link: optional(&self.website_link),
            genres: self.genres.clone(),
            seeking_talent: self.seeking_talent,
            seeking_description: optional(&self.seeking_description),
        })
    }

    pub fn state_choices(&self) -> Vec<Choice> {
        state_choices(&self.state)
    }

    pub fn genre_choices(&self) -> Vec<Choice> {
        genre_choices(&self.genres)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtistForm {
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: String,
    pub image_link: String,
    pub facebook_link: String,
    pub website_link: String,
    pub genres: Vec<String>,
    pub seeking_venue: bool,
    pub seeking_description: String,
}

impl ArtistForm {
    pub fn from_form(data: &FormData) -> Self {
        Self {
            name: data.get("name"),
            city: data.get("city"),
            state: data.get("state"),
            phone: data.get("phone"),
            image_link: data.get("image_link"),
            facebook_link: data.get("facebook_link"),
            website_link: data.get("website_link"),
            genres: data.get_all("genres"),
            seeking_venue: data.flag("seeking_venue"),
            seeking_description: data.get("seeking_description"),
        }
    }

    pub fn from_artist(artist: &Artist) -> Self {
        Self {
            name: artist.name.clone(),
            city: artist.city.clone(),
            state: artist.state.clone(),
            phone: artist.phone.clone().unwrap_or_default(),
            image_link: artist.image_link.clone().unwrap_or_default(),
            facebook_link: artist.facebook_link.clone().unwrap_or_default(),
            website_link: artist.website_link.clone().unwrap_or_default(),
            genres: artist.genres.clone(),
            seeking_venue: artist.seeking_venue,
            seeking_description: artist.seeking_description.clone().unwrap_or_default(),
        }
    }

    pub fn validate(&self) -> Result<NewArtist, Vec<FieldError>> {
        let mut check = Checker::default();
        check.required("name", &self.name);
        check.required("city", &self.city);
        check.state(&self.state);
        check.phone(&self.phone);
        check.link("image_link", &self.image_link);
        check.link("facebook_link", &self.facebook_link);
        check.link("website_link", &self.website_link);
        check.genres(&self.genres);

        check.finish(NewArtist {
            name: self.name.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            phone: optional(&self.phone),
            image_link: optional(&self.image_link),
            facebook_link: optional(&self.facebook_link),
            website_link: optional(&self.website_link),
            genres: self.genres.clone(),
            seeking_venue: self.seeking_venue,
            seeking_description: optional(&self.seeking_description),
        })
    }

    pub fn state_choices(&self) -> Vec<Choice> {
        state_choices(&self.state)
    }

    pub fn genre_choices(&self) -> Vec<Choice> {
        genre_choices(&self.genres)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowForm {
    pub artist_id: String,
    pub venue_id: String,
    pub start_time: String,
}

impl Default for ShowForm {
    /// Prefills the start time with the current local time.
    fn default() -> Self {
        Self {
            artist_id: String::new(),
            venue_id: String::new(),
            start_time: Local::now().naive_local().format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

impl ShowForm {
    pub fn from_form(data: &FormData) -> Self {
        Self {
            artist_id: data.get("artist_id"),
            venue_id: data.get("venue_id"),
            start_time: data.get("start_time"),
        }
    }

    pub fn validate(&self) -> Result<NewShow, Vec<FieldError>> {
        let mut check = Checker::default();
        let artist_id = parse_id(&mut check, "artist_id", &self.artist_id);
        let venue_id = parse_id(&mut check, "venue_id", &self.venue_id);
        let start_time = parse_start_time(&self.start_time);
        if start_time.is_none() {
            check.fail("start_time", "Use the format YYYY-MM-DD HH:MM[:SS].");
        }

        match (artist_id, venue_id, start_time) {
            (Some(artist_id), Some(venue_id), Some(start_time)) => check.finish(NewShow {
                venue_id,
                artist_id,
                start_time,
            }),
            _ => Err(check.errors),
        }
    }
}

fn parse_id(check: &mut Checker, field: &'static str, value: &str) -> Option<i64> {
    if value.is_empty() {
        check.fail(field, "This field is required.");
        return None;
    }
    match value.parse::<i64>() {
        Ok(id) if id > 0 => Some(id),
        _ => {
            check.fail(field, "Must be a positive whole number.");
            None
        }
    }
}

pub fn parse_start_time(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    START_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
}
