//! Catalog entry creation page and endpoint.

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
        CatalogFormData, CatalogKind, create_catalog_entry,
        form::{CatalogFormValues, FormAction, catalog_form_view, parent_options},
        validate_catalog_entry,
    },
    cascade::selected_id,
    endpoints,
    form_schema::SelectOption,
    html::{FORM_CONTAINER_STYLE, base},
    navigation::NavBar,
    validation::ValidationErrors,
};

/// The state needed for creating a catalog entry.
#[derive(Debug, Clone)]
pub struct CreateCatalogEntryState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateCatalogEntryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the catalog entry creation page.
pub async fn get_new_catalog_entry_page(
    State(state): State<CreateCatalogEntryState>,
    Path(kind): Path<CatalogKind>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let options = parent_options(kind, &connection)
        .inspect_err(|error| tracing::error!("could not get {kind} parent options: {error}"))?;

    Ok(new_catalog_entry_view(kind, &options).into_response())
}

/// Handle catalog entry creation form submission.
pub async fn create_catalog_entry_endpoint(
    State(state): State<CreateCatalogEntryState>,
    Path(kind): Path<CatalogKind>,
    Form(form): Form<CatalogFormData>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let new_entry = match validate_catalog_entry(kind, &form, None, &connection) {
        Ok(new_entry) => new_entry,
        Err(Error::Validation(errors)) => {
            let options = match parent_options(kind, &connection) {
                Ok(options) => options,
                Err(error) => return error.into_alert_response(),
            };
            let values = CatalogFormValues {
                name: Some(&form.name),
                parent_id: selected_id(form.parent_value(kind)),
            };

            return catalog_form_view(kind, FormAction::Create, &values, &options, &errors)
                .into_response();
        }
        Err(error) => {
            tracing::error!("could not validate new {kind}: {error}");
            return error.into_alert_response();
        }
    };

    match create_catalog_entry(kind, new_entry, &connection) {
        Ok(entry) => {
            tracing::info!("created {kind} {} \"{}\"", entry.id, entry.name);

            (
                HxRedirect(endpoints::CATALOGS_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating a {kind}: {error}");

            error.into_alert_response()
        }
    }
}

fn new_catalog_entry_view(kind: CatalogKind, parent_options: &[SelectOption]) -> Markup {
    let nav_bar = NavBar::new(endpoints::CATALOGS_VIEW).into_html();
    let form = catalog_form_view(
        kind,
        FormAction::Create,
        &CatalogFormValues::default(),
        parent_options,
        &ValidationErrors::new(),
    );
    let title = format!("Create {}", kind.title());

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

#[cfg(test)]
mod new_catalog_entry_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::{Path, State};
    use rusqlite::Connection;

    use crate::{
        catalog::{
            CatalogKind, CatalogName, NewCatalogEntry, create_catalog_entry,
            get_new_catalog_entry_page,
        },
        db::initialize,
        test_utils::{
            assert_content_type, assert_form_input, assert_form_submit_button_with_text,
            assert_hx_endpoint, assert_status_ok, assert_valid_html, must_get_form,
            parse_html_document, select_option_labels,
        },
    };

    use super::CreateCatalogEntryState;

    #[tokio::test]
    async fn render_category_page() {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        create_catalog_entry(
            CatalogKind::Type,
            NewCatalogEntry::new(CatalogName::new_unchecked("Income")),
            &connection,
        )
        .unwrap();
        let state = CreateCatalogEntryState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = get_new_catalog_entry_page(State(state), Path(CatalogKind::Category))
            .await
            .expect("Could not render page");

        assert_status_ok(&response);
        assert_content_type(&response, "text/html; charset=utf-8");
        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let form = must_get_form(&html);
        assert_hx_endpoint(&form, "/api/catalogs/categories", "hx-post");
        assert_form_input(&form, "name", "text");
        assert_form_submit_button_with_text(&form, "Create Category");

        assert_eq!(
            select_option_labels(&form, "type_id"),
            vec!["Select a type", "Income"]
        );
    }
}
