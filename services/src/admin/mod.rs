//! HTML admin pages rendered with the table renderer.

pub mod pages;
pub mod routes;

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use debug_api_table::TableError;

/// Root of the admin pages.
pub const ADMIN_PATH: &str = "/_fake/admin";

/// Failures while serving an admin page.
#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    #[error(transparent)]
    BadTimezone(TableError),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Failed to render table: {0}")]
    Render(#[from] TableError),
}

impl AdminError {
    fn status(&self) -> StatusCode {
        match self {
            AdminError::BadTimezone(_) => StatusCode::BAD_REQUEST,
            AdminError::NotFound(_) => StatusCode::NOT_FOUND,
            AdminError::Storage(_) | AdminError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Admin page failed: {}", self);
        } else {
            tracing::warn!("Admin page rejected: {}", self);
        }

        let title = status.canonical_reason().unwrap_or("Error");
        (status, Html(pages::message_page(title, &self.to_string()))).into_response()
    }
}
