use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    database_id::TransactionId,
    endpoints,
    html::{FORM_CONTAINER_STYLE, LINK_STYLE, base},
    navigation::NavBar,
    validation::ValidationErrors,
};

use super::{
    core::get_transaction,
    form::{FormAction, TransactionFormOptions, TransactionFormValues, transaction_form_view},
    redirect::RedirectQuery,
};

/// The state needed for the edit transaction page.
#[derive(Debug, Clone)]
pub struct EditTransactionPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditTransactionPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Renders the page for editing a transaction.
///
/// The category and subcategory choices are those of the transaction's
/// current type and category.
pub async fn get_edit_transaction_page(
    State(state): State<EditTransactionPageState>,
    Path(transaction_id): Path<TransactionId>,
    Query(redirect): Query<RedirectQuery>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transaction = get_transaction(transaction_id, &connection).inspect_err(|error| {
        tracing::error!("Failed to retrieve transaction {transaction_id}: {error}")
    })?;
    let values = TransactionFormValues::from_transaction(&transaction);
    let options = TransactionFormOptions::load(&values.selection, &connection)
        .inspect_err(|error| tracing::error!("could not get transaction form options: {error}"))?;

    Ok(edit_transaction_view(transaction_id, &values, &options, &redirect).into_response())
}

fn edit_transaction_view(
    transaction_id: TransactionId,
    values: &TransactionFormValues,
    options: &TransactionFormOptions,
    redirect: &RedirectQuery,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::EDIT_TRANSACTION_VIEW).into_html();
    let form = transaction_form_view(
        FormAction::Update {
            id: transaction_id,
            redirect,
        },
        values,
        options,
        &ValidationErrors::new(),
    );

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            div class="w-full flex justify-between items-center mb-4"
            {
                h1 class="text-xl font-bold" { "Edit Transaction" }
                a href=(redirect.target()) class=(LINK_STYLE) { "Cancel" }
            }

            (form)
        }
    };

    base("Edit Transaction", &content)
}
