use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::NaiveDate;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use fyyur::models::{NewArtist, NewShow, NewVenue};
use fyyur::storage::{ListingStore, SqliteListingStore};
use fyyur::{app_router, AppState};

fn app_with_store() -> (Router, Arc<SqliteListingStore>) {
    let store = Arc::new(SqliteListingStore::in_memory().unwrap());
    let app = app_router(AppState::new(store.clone()));
    (app, store)
}

fn venue(name: &str) -> NewVenue {
    NewVenue {
        name: name.to_string(),
        city: "San Francisco".to_string(),
        state: "CA".to_string(),
        address: "1015 Folsom Street".to_string(),
        phone: None,
        image_link: None,
        facebook_link: None,
        website_link: None,
        genres: vec!["Jazz".to_string()],
        seeking_talent: false,
        seeking_description: None,
    }
}

fn artist(name: &str) -> NewArtist {
    NewArtist {
        name: name.to_string(),
        city: "San Francisco".to_string(),
        state: "CA".to_string(),
        phone: None,
        image_link: None,
        facebook_link: None,
        website_link: None,
        genres: vec!["Rock n Roll".to_string()],
        seeking_venue: false,
        seeking_description: None,
    }
}

async fn send(app: &Router, method: Method, uri: &str, form: Option<&str>) -> (StatusCode, String) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match form {
        Some(form) => builder
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn test_home_page_lists_recent_venues() {
    let (app, store) = app_with_store();
    store.create_venue(&venue("The Musical Hop")).await.unwrap();

    let (status, body) = send(&app, Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("The Musical Hop"));
}

#[tokio::test]
async fn test_create_venue_from_form() {
    let (app, store) = app_with_store();
    let form = "name=Blue+Note&city=New+York&state=NY&address=131+W+3rd+St\
                &phone=212-475-8592&genres=Jazz&genres=Blues&seeking_talent=y";

    let (status, body) = send(&app, Method::POST, "/venues/create", Some(form)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Venue Blue Note was successfully listed!"));

    let venues = store.recent_venues(10).await.unwrap();
    assert_eq!(venues.len(), 1);
    assert_eq!(venues[0].genres, vec!["Jazz", "Blues"]);
    assert!(venues[0].seeking_talent);
}

#[tokio::test]
async fn test_invalid_venue_form_is_rerendered() {
    let (app, store) = app_with_store();
    let form = "name=&city=New+York&state=ZZ&address=x&phone=12345&genres=Jazz";

    let (status, body) = send(&app, Method::POST, "/venues/create", Some(form)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body.contains("This field is required."));
    assert!(body.contains("Not a valid choice."));
    assert!(store.recent_venues(10).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_and_malformed_ids_are_404() {
    let (app, _) = app_with_store();

    let (status, body) = send(&app, Method::GET, "/venues/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("404"));

    let (status, _) = send(&app, Method::GET, "/artists/abc", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::GET, "/no/such/page", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_venue_page_splits_shows() {
    let (app, store) = app_with_store();
    let hop = store.create_venue(&venue("The Musical Hop")).await.unwrap();
    let petals = store.create_artist(&artist("Guns N Petals")).await.unwrap();
    for year in [2019, 2035, 2036] {
        store
            .create_show(&NewShow {
                venue_id: hop,
                artist_id: petals,
                start_time: NaiveDate::from_ymd_opt(year, 5, 21)
                    .unwrap()
                    .and_hms_opt(21, 30, 0)
                    .unwrap(),
            })
            .await
            .unwrap();
    }

    let (status, body) = send(&app, Method::GET, &format!("/venues/{hop}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("2 Upcoming Shows"));
    assert!(body.contains("1 Past Shows"));
    assert!(body.contains("Guns N Petals"));
}

#[tokio::test]
async fn test_delete_venue_reports_success_flag() {
    let (app, store) = app_with_store();
    let empty = store.create_venue(&venue("Empty Hall")).await.unwrap();
    let busy = store.create_venue(&venue("Busy Hall")).await.unwrap();
    let band = store.create_artist(&artist("The Wild Sax Band")).await.unwrap();
    store
        .create_show(&NewShow {
            venue_id: busy,
            artist_id: band,
            start_time: NaiveDate::from_ymd_opt(2035, 4, 1)
                .unwrap()
                .and_hms_opt(20, 0, 0)
                .unwrap(),
        })
        .await
        .unwrap();

    let (status, body) = send(&app, Method::DELETE, &format!("/venues/{empty}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["success"], true);
    assert!(store.get_venue(empty).await.unwrap().is_none());

    let (_, body) = send(&app, Method::DELETE, &format!("/venues/{busy}"), None).await;
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["success"], false);
    assert!(store.get_venue(busy).await.unwrap().is_some());

    let (_, body) = send(&app, Method::DELETE, "/venues/999", None).await;
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn test_search_is_case_insensitive() {
    let (app, store) = app_with_store();
    store.create_artist(&artist("Guns N Petals")).await.unwrap();
    store.create_artist(&artist("Matt Quevedo")).await.unwrap();
    store.create_artist(&artist("The Wild Sax Band")).await.unwrap();

    let (status, body) = send(&app, Method::POST, "/artists/search", Some("search_term=A")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(": 3</h3>"));

    let (_, body) = send(&app, Method::POST, "/artists/search", Some("search_term=band")).await;
    assert!(body.contains(": 1</h3>"));
    assert!(body.contains("The Wild Sax Band"));
}

#[tokio::test]
async fn test_edit_artist_redirects_to_detail_page() {
    let (app, store) = app_with_store();
    let id = store.create_artist(&artist("Guns N Petals")).await.unwrap();

    let (status, body) = send(&app, Method::GET, &format!("/artists/{id}/edit"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Guns N Petals"));

    let form = "name=Guns+N+Roses&city=Los+Angeles&state=CA&genres=Rock+n+Roll";
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri(format!("/artists/{id}/edit"))
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(form))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers()[header::LOCATION],
        format!("/artists/{id}").as_str()
    );

    let stored = store.get_artist(id).await.unwrap().unwrap();
    assert_eq!(stored.name, "Guns N Roses");
    assert_eq!(stored.city, "Los Angeles");
}

#[tokio::test]
async fn test_create_show_flashes_outcome() {
    let (app, store) = app_with_store();
    let hop = store.create_venue(&venue("The Musical Hop")).await.unwrap();
    let petals = store.create_artist(&artist("Guns N Petals")).await.unwrap();

    let form = format!("artist_id={petals}&venue_id={hop}&start_time=2035-04-01+20%3A00%3A00");
    let (status, body) = send(&app, Method::POST, "/shows/create", Some(&form)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Show was successfully listed!"));

    let form = format!("artist_id={petals}&venue_id=999&start_time=2035-04-01+20%3A00");
    let (status, body) = send(&app, Method::POST, "/shows/create", Some(&form)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("An error occurred. Show could not be listed."));

    let (_, body) = send(&app, Method::GET, "/shows", None).await;
    assert!(body.contains("Sunday April, 1, 2035 at 8:00PM"));
    assert_eq!(store.list_shows().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_venues_page_groups_by_area() {
    let (app, store) = app_with_store();
    store.create_venue(&venue("The Musical Hop")).await.unwrap();
    let mut dueling = venue("The Dueling Pianos Bar");
    dueling.city = "New York".to_string();
    dueling.state = "NY".to_string();
    store.create_venue(&dueling).await.unwrap();

    let (status, body) = send(&app, Method::GET, "/venues", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("San Francisco"));
    assert!(body.contains("New York"));
    assert!(body.contains("The Dueling Pianos Bar"));
}

#[tokio::test]
async fn test_edit_venue_redirects_to_detail_page() {
    let (app, store) = app_with_store();
    let id = store.create_venue(&venue("The Musical Hop")).await.unwrap();

    let (status, body) = send(&app, Method::GET, &format!("/venues/{id}/edit"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("value=\"The Musical Hop\""));
    assert!(body.contains(&format!("action=\"/venues/{id}/edit\"")));

    let form = "name=The+Musical+Hop+Annex&city=Oakland&state=CA&address=1+Broadway\
                &genres=Jazz&genres=Folk&seeking_talent=y";
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri(format!("/venues/{id}/edit"))
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(form))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers()[header::LOCATION],
        format!("/venues/{id}").as_str()
    );

    let stored = store.get_venue(id).await.unwrap().unwrap();
    assert_eq!(stored.name, "The Musical Hop Annex");
    assert_eq!(stored.city, "Oakland");
    assert_eq!(stored.genres, vec!["Jazz", "Folk"]);
    assert!(stored.seeking_talent);
}

#[tokio::test]
async fn test_invalid_edit_is_rerendered_without_saving() {
    let (app, store) = app_with_store();
    let id = store.create_venue(&venue("The Musical Hop")).await.unwrap();

    let form = "name=&city=Oakland&state=CA&address=1+Broadway&genres=Swing";
    let (status, body) =
        send(&app, Method::POST, &format!("/venues/{id}/edit"), Some(form)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body.contains("This field is required."));
    assert!(body.contains("is not a valid choice."));
    assert!(body.contains(&format!("action=\"/venues/{id}/edit\"")));

    let stored = store.get_venue(id).await.unwrap().unwrap();
    assert_eq!(stored.name, "The Musical Hop");
    assert_eq!(stored.city, "San Francisco");

    let valid = "name=x&city=y&state=CA&address=z&genres=Jazz";
    let (status, _) = send(&app, Method::POST, "/venues/999/edit", Some(valid)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_metrics_route_responds_without_recorder() {
    let (app, _) = app_with_store();
    let (status, body) = send(&app, Method::GET, "/metrics", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty());
}
