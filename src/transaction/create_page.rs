//! The page for creating a new transaction.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use time::Date;

use crate::{
    AppState, Error,
    endpoints,
    html::{FORM_CONTAINER_STYLE, base},
    navigation::NavBar,
    timezone::current_local_date,
    validation::ValidationErrors,
};

use super::form::{FormAction, TransactionFormOptions, TransactionFormValues, transaction_form_view};

/// The state needed for the new transaction page.
#[derive(Debug, Clone)]
pub struct CreateTransactionPageState {
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for CreateTransactionPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Render the page for creating a transaction with the date set to today.
pub async fn get_new_transaction_page(
    State(state): State<CreateTransactionPageState>,
) -> Result<Response, Error> {
    let today = current_local_date(&state.local_timezone)?;
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let values = TransactionFormValues::for_new(today);
    let options = TransactionFormOptions::load(&values.selection, &connection)
        .inspect_err(|error| tracing::error!("could not get transaction form options: {error}"))?;

    Ok(new_transaction_view(today, &values, &options).into_response())
}

fn new_transaction_view(
    today: Date,
    values: &TransactionFormValues,
    options: &TransactionFormOptions,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_TRANSACTION_VIEW).into_html();
    let form = transaction_form_view(
        FormAction::Create,
        values,
        options,
        &ValidationErrors::new(),
    );

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="mb-4 text-xl font-bold" { "Create Transaction" }
            p class="mb-4 text-sm text-gray-500 dark:text-gray-400" { "Today is " (today) "." }

            (form)
        }
    };

    base("Create Transaction", &content)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::State;
    use rusqlite::Connection;

    use crate::{
        catalog::{CatalogKind, CatalogName, NewCatalogEntry, create_catalog_entry},
        db::initialize,
        test_utils::{
            assert_content_type, assert_form_input, assert_form_submit_button_with_text,
            assert_hx_endpoint, assert_status_ok, assert_valid_html, must_get_form,
            parse_html_document, select_option_labels,
        },
        timezone::current_local_date,
    };

    use super::{CreateTransactionPageState, get_new_transaction_page};

    fn get_state() -> CreateTransactionPageState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        for name in ["Paid", "Planned"] {
            create_catalog_entry(
                CatalogKind::Status,
                NewCatalogEntry::new(CatalogName::new_unchecked(name)),
                &connection,
            )
            .unwrap();
        }

        CreateTransactionPageState {
            db_connection: Arc::new(Mutex::new(connection)),
            local_timezone: "Etc/UTC".to_owned(),
        }
    }

    #[tokio::test]
    async fn render_page() {
        let state = get_state();

        let response = get_new_transaction_page(State(state))
            .await
            .expect("Could not render page");

        assert_status_ok(&response);
        assert_content_type(&response, "text/html; charset=utf-8");
        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let form = must_get_form(&html);
        assert_hx_endpoint(&form, "/api/transactions", "hx-post");
        assert_form_input(&form, "date_created", "date");
        assert_form_input(&form, "amount", "number");
        assert_form_submit_button_with_text(&form, "Create Transaction");
        assert_eq!(
            select_option_labels(&form, "status_id"),
            vec!["Select a status", "Paid", "Planned"]
        );
        assert_eq!(
            select_option_labels(&form, "category_id"),
            vec!["Select a category"]
        );
    }

    #[tokio::test]
    async fn date_defaults_to_today() {
        let state = get_state();
        let today = current_local_date("Etc/UTC").unwrap();

        let response = get_new_transaction_page(State(state)).await.unwrap();

        let html = parse_html_document(response).await;
        let form = must_get_form(&html);
        let date_input = form
            .select(&scraper::Selector::parse("input[name=date_created]").unwrap())
            .next()
            .expect("No date input");
        assert_eq!(date_input.value().attr("value"), Some(today.to_string().as_str()));
    }

    #[tokio::test]
    async fn invalid_timezone_is_an_error() {
        let mut state = get_state();
        state.local_timezone = "Not/AZone".to_owned();

        let result = get_new_transaction_page(State(state)).await;

        assert!(result.is_err());
    }
}
