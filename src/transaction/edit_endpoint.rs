use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error, database_id::TransactionId, error::Record, timezone::current_local_date,
};

use super::{
    core::{get_transaction, update_transaction},
    form::{
        FormAction, TransactionForm, TransactionFormOptions, TransactionFormValues,
        transaction_form_view, validate_transaction,
    },
    redirect::RedirectQuery,
};

/// The state needed to edit a transaction.
#[derive(Debug, Clone)]
pub struct EditTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for EditTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Update a transaction with the submitted fields merged over its current values.
///
/// Redirects to `redirect_url` on success, or back to the transactions page if
/// it is missing or points elsewhere.
pub async fn edit_transaction_endpoint(
    State(state): State<EditTransactionState>,
    Path(transaction_id): Path<TransactionId>,
    Query(redirect): Query<RedirectQuery>,
    // See `create_transaction_endpoint` for why this is not `axum_extra`'s `Form`.
    Form(form): Form<TransactionForm>,
) -> Response {
    let today = match current_local_date(&state.local_timezone) {
        Ok(today) => today,
        Err(error) => return error.into_alert_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let prior = match get_transaction(transaction_id, &connection) {
        Ok(prior) => prior,
        Err(Error::NotFound) => {
            return Error::UpdateMissing(Record::Transaction).into_alert_response();
        }
        Err(error) => {
            tracing::error!("Could not get transaction {transaction_id}: {error}");
            return error.into_alert_response();
        }
    };

    let updated = match validate_transaction(&form, Some(&prior), today, &connection) {
        Ok(updated) => updated,
        Err(Error::Validation(errors)) => {
            tracing::debug!("rejected update to transaction {transaction_id}: {errors}");
            let values = TransactionFormValues::from_form(&form, Some(&prior));
            let options = match TransactionFormOptions::load(&values.selection, &connection) {
                Ok(options) => options,
                Err(error) => return error.into_alert_response(),
            };
            let action = FormAction::Update {
                id: transaction_id,
                redirect: &redirect,
            };

            return transaction_form_view(action, &values, &options, &errors).into_response();
        }
        Err(error) => {
            tracing::error!("Could not validate transaction {transaction_id}: {error}");
            return error.into_alert_response();
        }
    };

    if let Err(error) = update_transaction(transaction_id, updated, &connection) {
        tracing::error!("Could not update transaction {transaction_id}: {error}");
        return error.into_alert_response();
    }

    (HxRedirect(redirect.target().to_owned()), StatusCode::SEE_OTHER).into_response()
}
