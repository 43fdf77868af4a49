use axum::{
    http::{header, Method},
    routing::{delete, get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::routes;
use crate::state::AppState;

/// Create the HTTP router with all API routes
pub fn create_server(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::PATCH,
            Method::POST,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .route("/health", get(routes::health))
        .route("/metrics", get(routes::render_metrics))
        .route("/categories", get(routes::get_categories))
        .route(
            "/categories/:id/questions",
            get(routes::get_questions_by_category),
        )
        .route(
            "/questions",
            get(routes::get_questions).post(routes::post_questions),
        )
        .route("/questions/:id", delete(routes::delete_question))
        .route("/quizzes", post(routes::play_quiz))
        .fallback(routes::not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// Serve until Ctrl-C
pub async fn start_server(state: AppState, bind_addr: &str) -> anyhow::Result<()> {
    let app = create_server(state);
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;

    info!("Trivia API listening on http://{}", bind_addr);
    info!("Health check: http://{}/health", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Trivia API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
