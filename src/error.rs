use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::templates::{NotFoundTemplate, ServerErrorTemplate};

#[derive(Error, Debug)]
pub enum WebError {
    #[error("Page not found")]
    NotFound,

    #[error("Storage error: {0}")]
    Storage(#[from] app_core::CoreError),

    #[error("Template rendering failed: {0}")]
    Template(#[from] askama::Error),
}

impl WebError {
    pub fn status(&self) -> StatusCode {
        match self {
            WebError::NotFound => StatusCode::NOT_FOUND,
            WebError::Storage(_) | WebError::Template(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = self.status();
        let page = match self {
            WebError::NotFound => NotFoundTemplate.render(),
            other => {
                error!("Request failed: {}", other);
                ServerErrorTemplate.render()
            }
        };

        match page {
            Ok(html) => (status, Html(html)).into_response(),
            // The error page itself failed; fall back to plain text
            Err(e) => {
                error!("Failed to render error page: {}", e);
                (status, status.canonical_reason().unwrap_or("error")).into_response()
            }
        }
    }
}

pub type WebResult<T> = std::result::Result<T, WebError>;
