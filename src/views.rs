use chrono::NaiveDateTime;

use crate::models::ShowListing;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormat {
    /// `Saturday May, 21, 2019 at 9:30PM`
    Full,
    /// `Sat 05, 21, 2019 9:30PM`
    Medium,
}

pub fn format_datetime(value: &NaiveDateTime, format: DateFormat) -> String {
    let pattern = match format {
        DateFormat::Full => "%A %B, %-d, %Y at %-I:%M%p",
        DateFormat::Medium => "%a %m, %d, %Y %-I:%M%p",
    };
    value.format(pattern).to_string()
}

/// A show as rendered on venue, artist and show-list pages.
#[derive(Debug, Clone)]
pub struct ShowView {
    pub venue_id: i64,
    pub venue_name: String,
    pub venue_image_link: String,
    pub artist_id: i64,
    pub artist_name: String,
    pub artist_image_link: String,
    pub start_time: String,
}

impl From<&ShowListing> for ShowView {
    fn from(listing: &ShowListing) -> Self {
        Self {
            venue_id: listing.venue_id,
            venue_name: listing.venue_name.clone(),
            venue_image_link: listing.venue_image_link.clone().unwrap_or_default(),
            artist_id: listing.artist_id,
            artist_name: listing.artist_name.clone(),
            artist_image_link: listing.artist_image_link.clone().unwrap_or_default(),
            start_time: format_datetime(&listing.start_time, DateFormat::Full),
        }
    }
}

/// Shows split around `now`: a show starting exactly now counts as past.
#[derive(Debug, Clone, Default)]
pub struct ShowSplit {
    pub past: Vec<ShowView>,
    pub upcoming: Vec<ShowView>,
}

impl ShowSplit {
    pub fn new(listings: &[ShowListing], now: NaiveDateTime) -> Self {
        let (upcoming, past): (Vec<&ShowListing>, Vec<&ShowListing>) =
            listings.iter().partition(|show| show.start_time > now);
        Self {
            past: past.into_iter().map(ShowView::from).collect(),
            upcoming: upcoming.into_iter().map(ShowView::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn listing(id: i64, start_time: NaiveDateTime) -> ShowListing {
        ShowListing {
            show_id: id,
            venue_id: 1,
            venue_name: "The Musical Hop".to_string(),
            venue_image_link: None,
            artist_id: 4,
            artist_name: "Guns N Petals".to_string(),
            artist_image_link: Some("https://example.com/petals.jpg".to_string()),
            start_time,
        }
    }

    #[test]
    fn formats_full_and_medium_dates() {
        let time = at(2019, 5, 21, 21, 30);
        assert_eq!(
            format_datetime(&time, DateFormat::Full),
            "Tuesday May, 21, 2019 at 9:30PM"
        );
        assert_eq!(
            format_datetime(&time, DateFormat::Medium),
            "Tue 05, 21, 2019 9:30PM"
        );
    }

    #[test]
    fn splits_past_and_upcoming_shows() {
        let now = at(2024, 6, 1, 12, 0);
        let listings = vec![
            listing(1, at(2019, 5, 21, 21, 30)),
            listing(2, now),
            listing(3, at(2035, 4, 1, 20, 0)),
        ];

        let split = ShowSplit::new(&listings, now);
        assert_eq!(split.past.len(), 2);
        assert_eq!(split.upcoming.len(), 1);
        assert_eq!(split.upcoming[0].start_time, "Sunday April, 1, 2035 at 8:00PM");
        assert_eq!(split.past[0].venue_image_link, "");
    }
}
