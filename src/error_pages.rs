//! Full-page responses for requests that cannot be served, e.g. 404 and 500.
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::html::error_view;

/// A full HTML page explaining why a request failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorPage<'a> {
    pub status: StatusCode,
    pub description: &'a str,
    pub fix: &'a str,
}

impl<'a> ErrorPage<'a> {
    /// The page for a record or route that does not exist.
    pub fn not_found() -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            description: "Something's missing.",
            fix: "Sorry, we can't find that page. It may have been deleted, \
                check the cash flow page for what is still around.",
        }
    }

    /// The page for an unexpected server-side failure.
    pub fn internal_server_error() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            description: "Sorry, something went wrong.",
            fix: "Try again later or check the server logs",
        }
    }

    /// A server-side failure with a custom explanation.
    pub fn internal_server_error_with(description: &'a str, fix: &'a str) -> Self {
        Self {
            description,
            fix,
            ..Self::internal_server_error()
        }
    }
}

impl IntoResponse for ErrorPage<'_> {
    fn into_response(self) -> Response {
        let title = self.status.canonical_reason().unwrap_or("Error");
        let header = self.status.as_str();

        (
            self.status,
            Html(error_view(title, header, self.description, self.fix).into_string()),
        )
            .into_response()
    }
}

/// The fallback route handler.
pub async fn get_404_not_found() -> Response {
    ErrorPage::not_found().into_response()
}
