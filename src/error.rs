//! Defines the app level error type and conversions to rendered HTML pages and alerts.
use std::fmt::Display;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    alert::Alert, catalog::CatalogKind, error_pages::ErrorPage, validation::ValidationErrors,
};

/// The kind of record an operation was performed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Record {
    Transaction,
    Catalog(CatalogKind),
}

impl Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Record::Transaction => write!(f, "transaction"),
            Record::Catalog(kind) => write!(f, "{}", kind.singular_name()),
        }
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// One or more form fields failed validation.
    ///
    /// Nothing is written to the database when this error is returned.
    #[error("invalid input: {0}")]
    Validation(ValidationErrors),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Tried to update a record that does not exist.
    #[error("tried to update a {0} that is not in the database")]
    UpdateMissing(Record),

    /// Tried to delete a record that does not exist.
    #[error("tried to delete a {0} that is not in the database")]
    DeleteMissing(Record),

    /// The operation is not allowed by the referential policy.
    ///
    /// Every deletion is currently absorbed by cascading or clearing references,
    /// so nothing returns this yet.
    #[error("the operation conflicts with existing data: {0}")]
    Conflict(String),

    /// A string that should have been an ID could not be parsed as one.
    #[error("\"{0}\" is not a valid ID")]
    InvalidIdFormat(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<ValidationErrors> for Error {
    fn from(value: ValidationErrors) -> Self {
        Error::Validation(value)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound | Error::UpdateMissing(_) | Error::DeleteMissing(_) => {
                ErrorPage::not_found().into_response()
            }
            Error::InvalidTimezoneError(timezone) => ErrorPage::internal_server_error_with(
                "Invalid Timezone Settings",
                &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            )
            .into_response(),
            Error::DatabaseLockError => ErrorPage::internal_server_error().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                ErrorPage::internal_server_error().into_response()
            }
        }
    }
}

impl Error {
    /// Convert the error into an HTTP response with an HTML alert.
    pub fn into_alert_response(self) -> Response {
        let (status_code, alert) = match self {
            Error::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid input".to_owned(),
                    details: errors.to_string(),
                },
            ),
            Error::InvalidTimezoneError(timezone) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Invalid Timezone Settings".to_owned(),
                    details: format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                    ),
                },
            ),
            Error::NotFound => (
                StatusCode::NOT_FOUND,
                Alert::ErrorSimple {
                    message: "The requested resource could not be found.".to_owned(),
                },
            ),
            Error::UpdateMissing(record) => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: format!("Could not update {record}"),
                    details: format!("The {record} could not be found."),
                },
            ),
            Error::DeleteMissing(record) => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: format!("Could not delete {record}"),
                    details: format!(
                        "The {record} could not be found. \
                        Try refreshing the page to see if the {record} has already been deleted."
                    ),
                },
            ),
            Error::Conflict(details) => (
                StatusCode::CONFLICT,
                Alert::Error {
                    message: "Conflicting change".to_owned(),
                    details,
                },
            ),
            error => {
                tracing::error!("An unexpected error occurred: {error}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Alert::Error {
                        message: "Something went wrong".to_owned(),
                        details:
                            "An unexpected error occurred, check the server logs for more details."
                                .to_owned(),
                    },
                )
            }
        };

        (status_code, alert.into_html()).into_response()
    }
}
