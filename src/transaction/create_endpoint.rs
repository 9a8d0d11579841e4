//! Defines the endpoint for creating a new transaction.
use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{AppState, Error, endpoints, timezone::current_local_date};

use super::{
    core::create_transaction,
    form::{
        FormAction, TransactionForm, TransactionFormOptions, TransactionFormValues,
        transaction_form_view, validate_transaction,
    },
};

/// The state needed for creating a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// A route handler for creating a new transaction.
///
/// Redirects to the transactions page on success. If the form is invalid, the
/// form is rendered again with an error message for every invalid field.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    // Empty fields must stay as `Some("")` so they can be told apart from
    // missing ones, which `axum_extra::extract::Form` does not do.
    Form(form): Form<TransactionForm>,
) -> Response {
    let today = match current_local_date(&state.local_timezone) {
        Ok(today) => today,
        Err(error) => return error.into_alert_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let new_transaction = match validate_transaction(&form, None, today, &connection) {
        Ok(new_transaction) => new_transaction,
        Err(Error::Validation(errors)) => {
            tracing::debug!("rejected new transaction: {errors}");
            let values = TransactionFormValues::from_form(&form, None);
            let options = match TransactionFormOptions::load(&values.selection, &connection) {
                Ok(options) => options,
                Err(error) => return error.into_alert_response(),
            };

            return transaction_form_view(FormAction::Create, &values, &options, &errors)
                .into_response();
        }
        Err(error) => {
            tracing::error!("could not validate new transaction: {error}");
            return error.into_alert_response();
        }
    };

    match create_transaction(new_transaction, &connection) {
        Ok(transaction) => {
            tracing::info!(
                "created transaction {} for {} on {}",
                transaction.id,
                transaction.amount,
                transaction.date_created
            );

            (
                HxRedirect(endpoints::TRANSACTIONS_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating a transaction: {error}");

            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Form, extract::State, http::StatusCode};
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        catalog::{CatalogEntry, CatalogKind, CatalogName, NewCatalogEntry, create_catalog_entry},
        db::initialize,
        endpoints,
        test_utils::{
            assert_hx_redirect, field_error_names, must_get_form, parse_html_fragment,
            select_option_labels,
        },
        transaction::{
            Transaction, TransactionForm, count_transactions, create_transaction_endpoint,
            get_transaction,
        },
    };

    use super::CreateTransactionState;

    struct Fixture {
        state: CreateTransactionState,
        income: CatalogEntry,
        salary: CatalogEntry,
        rent: CatalogEntry,
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
        let salary = create(CatalogKind::Category, "Salary", Some(&income), &connection);
        let rent = create(CatalogKind::Category, "Rent", Some(&expenses), &connection);

        Fixture {
            state: CreateTransactionState {
                db_connection: Arc::new(Mutex::new(connection)),
                local_timezone: "Etc/UTC".to_owned(),
            },
            income,
            salary,
            rent,
        }
    }

    #[tokio::test]
    async fn can_create_transaction() {
        let fixture = fixture();
        let form = TransactionForm {
            date_created: Some("2025-10-05".to_owned()),
            type_id: Some(fixture.income.id.to_string()),
            category_id: Some(fixture.salary.id.to_string()),
            subcategory_id: Some("".to_owned()),
            amount: Some("1000".to_owned()),
            comment: Some("".to_owned()),
            ..Default::default()
        };

        let response = create_transaction_endpoint(State(fixture.state.clone()), Form(form)).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::TRANSACTIONS_VIEW);
        let connection = fixture.state.db_connection.lock().unwrap();
        assert_eq!(
            get_transaction(1, &connection),
            Ok(Transaction {
                id: 1,
                date_created: date!(2025 - 10 - 05),
                status_id: None,
                type_id: Some(fixture.income.id),
                category_id: Some(fixture.salary.id),
                subcategory_id: None,
                amount: 1000,
                comment: None,
            })
        );
    }

    #[tokio::test]
    async fn rejects_category_of_other_type() {
        let fixture = fixture();
        let form = TransactionForm {
            type_id: Some(fixture.income.id.to_string()),
            category_id: Some(fixture.rent.id.to_string()),
            amount: Some("1000".to_owned()),
            ..Default::default()
        };

        let response = create_transaction_endpoint(State(fixture.state.clone()), Form(form)).await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        assert_eq!(field_error_names(&html), vec!["category_id"]);
        let form = must_get_form(&html);
        assert_eq!(
            select_option_labels(&form, "category_id"),
            vec!["Select a category", "Salary"]
        );
        let connection = fixture.state.db_connection.lock().unwrap();
        assert_eq!(count_transactions(&connection), Ok(0));
    }

    #[tokio::test]
    async fn rejects_missing_amount() {
        let fixture = fixture();

        let response =
            create_transaction_endpoint(State(fixture.state.clone()), Form(TransactionForm::default()))
                .await;

        let html = parse_html_fragment(response).await;
        assert_eq!(field_error_names(&html), vec!["amount"]);
        let connection = fixture.state.db_connection.lock().unwrap();
        assert_eq!(count_transactions(&connection), Ok(0));
    }
}
