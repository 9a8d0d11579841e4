//! Catalog entry deletion endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use axum_htmx::HxRefresh;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    alert::Alert,
    catalog::{CatalogKind, delete_catalog_entry},
    database_id::DatabaseId,
};

/// The state needed for deleting a catalog entry.
#[derive(Debug, Clone)]
pub struct DeleteCatalogEntryState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteCatalogEntryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Handle catalog entry deletion. Returns success alert or error.
///
/// Deleting a type or category also removes its dependents from other tables
/// on the page, so the client is told to refresh.
pub async fn delete_catalog_entry_endpoint(
    Path((kind, entry_id)): Path<(CatalogKind, DatabaseId)>,
    State(state): State<DeleteCatalogEntryState>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_catalog_entry(kind, entry_id, &connection) {
        Ok(_) => {
            tracing::info!("deleted {kind} {entry_id}");

            let alert = Alert::SuccessSimple {
                message: format!("{} deleted successfully", kind.title()),
            };

            if kind.child().is_some() {
                (HxRefresh(true), alert).into_response()
            } else {
                alert.into_response()
            }
        }
        Err(error @ Error::DeleteMissing(_)) => error.into_alert_response(),
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while deleting {kind} {entry_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}
