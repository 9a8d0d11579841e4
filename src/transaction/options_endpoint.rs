//! The endpoint the transaction form calls when the type or category changes.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    cascade::{CascadeSelection, selected_id},
    validation::ValidationErrors,
};

use super::form::cascade_fields_view;

/// The current selection of the form, sent with `hx-include`.
///
/// The form includes every field, only the cascading ones are read.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OptionsQuery {
    pub type_id: Option<String>,
    pub category_id: Option<String>,
    pub subcategory_id: Option<String>,
}

/// The state needed for the options endpoint.
#[derive(Debug, Clone)]
pub struct TransactionOptionsState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionOptionsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the category and subcategory selects for the selected type and category.
///
/// Selections that no longer belong to their parent are cleared. Malformed
/// IDs are treated as no selection.
pub async fn get_transaction_options(
    State(state): State<TransactionOptionsState>,
    Query(query): Query<OptionsQuery>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let selection = CascadeSelection {
        type_id: selected_id(query.type_id.as_deref()),
        category_id: selected_id(query.category_id.as_deref()),
        subcategory_id: selected_id(query.subcategory_id.as_deref()),
    };

    match selection.narrow(&connection) {
        Ok((selection, options)) => {
            cascade_fields_view(&options, &selection, &ValidationErrors::new()).into_response()
        }
        Err(error) => {
            tracing::error!("could not get options for {selection:?}: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::{Query, State};
    use rusqlite::Connection;
    use scraper::{Html, Selector};

    use crate::{
        catalog::{CatalogEntry, CatalogKind, CatalogName, NewCatalogEntry, create_catalog_entry},
        db::initialize,
        test_utils::{assert_status_ok, parse_html_fragment},
    };

    use super::{OptionsQuery, TransactionOptionsState, get_transaction_options};

    struct Fixture {
        state: TransactionOptionsState,
        income: CatalogEntry,
        expenses: CatalogEntry,
        rent: CatalogEntry,
        utilities: CatalogEntry,
    }

    fn create(
        kind: CatalogKind,
        name: &str,
        parent: Option<&CatalogEntry>,
        connection: &Connection,
    ) -> CatalogEntry {
        let mut entry = NewCatalogEntry::new(CatalogName::new_unchecked(name));
        if let Some(parent) = parent {
            entry = entry.parent_id(parent.id);
        }

        create_catalog_entry(kind, entry, connection).expect("Could not create catalog entry")
    }

    fn fixture() -> Fixture {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let income = create(CatalogKind::Type, "Income", None, &connection);
        let expenses = create(CatalogKind::Type, "Expenses", None, &connection);
        create(CatalogKind::Category, "Salary", Some(&income), &connection);
        let rent = create(CatalogKind::Category, "Rent", Some(&expenses), &connection);
        let utilities = create(CatalogKind::Subcategory, "Utilities", Some(&rent), &connection);

        Fixture {
            state: TransactionOptionsState {
                db_connection: Arc::new(Mutex::new(connection)),
            },
            income,
            expenses,
            rent,
            utilities,
        }
    }

    fn option_labels(html: &Html, name: &str) -> Vec<String> {
        html.select(&Selector::parse(&format!("select[name={name}] option")).unwrap())
            .map(|option| option.text().collect())
            .collect()
    }

    fn selected_values(html: &Html) -> Vec<String> {
        html.select(&Selector::parse("option[selected]").unwrap())
            .filter_map(|option| option.value().attr("value"))
            .map(str::to_owned)
            .collect()
    }

    #[tokio::test]
    async fn returns_options_for_selection() {
        let fixture = fixture();
        let query = OptionsQuery {
            type_id: Some(fixture.expenses.id.to_string()),
            category_id: Some(fixture.rent.id.to_string()),
            subcategory_id: Some(fixture.utilities.id.to_string()),
        };

        let response = get_transaction_options(State(fixture.state), Query(query)).await;

        assert_status_ok(&response);
        let html = parse_html_fragment(response).await;
        assert!(
            html.select(&Selector::parse("div#cascade-fields").unwrap())
                .next()
                .is_some()
        );
        assert_eq!(
            option_labels(&html, "category_id"),
            vec!["Select a category", "Rent"]
        );
        assert_eq!(
            option_labels(&html, "subcategory_id"),
            vec!["Select a subcategory", "Utilities"]
        );
        assert_eq!(
            selected_values(&html),
            vec![fixture.rent.id.to_string(), fixture.utilities.id.to_string()]
        );
    }

    #[tokio::test]
    async fn changing_type_clears_category_and_subcategory() {
        let fixture = fixture();
        let query = OptionsQuery {
            type_id: Some(fixture.income.id.to_string()),
            category_id: Some(fixture.rent.id.to_string()),
            subcategory_id: Some(fixture.utilities.id.to_string()),
        };

        let response = get_transaction_options(State(fixture.state), Query(query)).await;

        let html = parse_html_fragment(response).await;
        assert_eq!(
            option_labels(&html, "category_id"),
            vec!["Select a category", "Salary"]
        );
        assert_eq!(
            option_labels(&html, "subcategory_id"),
            vec!["Select a subcategory"]
        );
        assert!(selected_values(&html).is_empty());
    }

    #[tokio::test]
    async fn malformed_type_gives_empty_options() {
        let fixture = fixture();
        let query = OptionsQuery {
            type_id: Some("Income".to_owned()),
            ..Default::default()
        };

        let response = get_transaction_options(State(fixture.state), Query(query)).await;

        assert_status_ok(&response);
        let html = parse_html_fragment(response).await;
        assert_eq!(
            option_labels(&html, "category_id"),
            vec!["Select a category"]
        );
    }
}
