//! Catalog entry editing page and endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    catalog::{
        CatalogEntry, CatalogFormData, CatalogKind,
        form::{CatalogFormValues, FormAction, catalog_form_view, parent_options},
        get_catalog_entry, update_catalog_entry, validate_catalog_entry,
    },
    cascade::selected_id,
    database_id::DatabaseId,
    endpoints,
    form_schema::SelectOption,
    html::{FORM_CONTAINER_STYLE, base},
    navigation::NavBar,
    validation::ValidationErrors,
};

/// The state needed for editing a catalog entry.
#[derive(Debug, Clone)]
pub struct EditCatalogEntryState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditCatalogEntryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the page for editing a catalog entry.
pub async fn get_edit_catalog_entry_page(
    State(state): State<EditCatalogEntryState>,
    Path((kind, entry_id)): Path<(CatalogKind, DatabaseId)>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let entry = get_catalog_entry(kind, entry_id, &connection)
        .inspect_err(|error| tracing::error!("could not get {kind} {entry_id}: {error}"))?;
    let options = parent_options(kind, &connection)
        .inspect_err(|error| tracing::error!("could not get {kind} parent options: {error}"))?;

    Ok(edit_catalog_entry_view(kind, &entry, &options).into_response())
}

/// Handle catalog entry update form submission.
pub async fn update_catalog_entry_endpoint(
    State(state): State<EditCatalogEntryState>,
    Path((kind, entry_id)): Path<(CatalogKind, DatabaseId)>,
    Form(form): Form<CatalogFormData>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let updated_entry = match validate_catalog_entry(kind, &form, Some(entry_id), &connection) {
        Ok(updated_entry) => updated_entry,
        Err(Error::Validation(errors)) => {
            let options = match parent_options(kind, &connection) {
                Ok(options) => options,
                Err(error) => return error.into_alert_response(),
            };
            let values = CatalogFormValues {
                name: Some(&form.name),
                parent_id: selected_id(form.parent_value(kind)),
            };

            return catalog_form_view(
                kind,
                FormAction::Update(entry_id),
                &values,
                &options,
                &errors,
            )
            .into_response();
        }
        Err(error) => {
            tracing::error!("could not validate {kind} {entry_id}: {error}");
            return error.into_alert_response();
        }
    };

    match update_catalog_entry(kind, entry_id, updated_entry, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::CATALOGS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("could not update {kind} {entry_id}: {error}");
            error.into_alert_response()
        }
    }
}

fn edit_catalog_entry_view(
    kind: CatalogKind,
    entry: &CatalogEntry,
    parent_options: &[SelectOption],
) -> Markup {
    let nav_bar = NavBar::new(endpoints::CATALOGS_VIEW).into_html();
    let values = CatalogFormValues {
        name: Some(entry.name.as_ref()),
        parent_id: entry.parent_id,
    };
    let form = catalog_form_view(
        kind,
        FormAction::Update(entry.id),
        &values,
        parent_options,
        &ValidationErrors::new(),
    );
    let title = format!("Edit {}", kind.title());

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="mb-4 text-xl font-bold" { (title) }

            (form)
        }
    };

    base(&title, &content)
}
