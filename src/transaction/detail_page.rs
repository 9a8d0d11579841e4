//! The page showing every field of a single transaction.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    database_id::TransactionId,
    endpoints::{self, format_endpoint},
    form_schema::{
        AMOUNT_FIELD, CATEGORY_FIELD, DATE_CREATED_FIELD, STATUS_FIELD, SUBCATEGORY_FIELD,
        TRANSACTION_FIELDS, TYPE_FIELD,
    },
    html::{BUTTON_DELETE_STYLE, FORM_CONTAINER_STYLE, LINK_STYLE, base, format_amount},
    navigation::NavBar,
};

use super::{
    core::{TransactionDetail, get_transaction_detail},
    redirect::RedirectQuery,
};

/// The state needed for the transaction detail page.
#[derive(Debug, Clone)]
pub struct TransactionDetailPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionDetailPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render a transaction with the names of its status, type, category and subcategory.
pub async fn get_transaction_page(
    State(state): State<TransactionDetailPageState>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let detail = get_transaction_detail(transaction_id, &connection).inspect_err(|error| {
        tracing::error!("Failed to retrieve transaction {transaction_id}: {error}")
    })?;

    Ok(transaction_detail_view(&detail).into_response())
}

fn transaction_detail_view(detail: &TransactionDetail) -> Markup {
    let transaction = &detail.transaction;
    let nav_bar = NavBar::new(endpoints::TRANSACTION_VIEW).into_html();
    let edit_url = format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction.id);
    let delete_url = RedirectQuery::new(endpoints::TRANSACTIONS_VIEW)
        .append_to(&format_endpoint(endpoints::TRANSACTION, transaction.id));
    let unset = "None";

    let fields = TRANSACTION_FIELDS.iter().map(|field| {
        let value = match *field {
            DATE_CREATED_FIELD => transaction.date_created.to_string(),
            STATUS_FIELD => detail.status_name.as_deref().unwrap_or(unset).to_owned(),
            TYPE_FIELD => detail.type_name.as_deref().unwrap_or(unset).to_owned(),
            CATEGORY_FIELD => detail.category_name.as_deref().unwrap_or(unset).to_owned(),
            SUBCATEGORY_FIELD => detail.subcategory_name.as_deref().unwrap_or(unset).to_owned(),
            AMOUNT_FIELD => format_amount(transaction.amount),
            _ => transaction.comment.clone().unwrap_or_default(),
        };

        (field, value)
    });

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="mb-4 text-xl font-bold" { "Transaction #" (transaction.id) }

            dl class="w-full max-w-md divide-y divide-gray-200 dark:divide-gray-700"
            {
                @for (field, value) in fields {
                    div class="flex justify-between py-2"
                    {
                        dt class="text-sm text-gray-500 dark:text-gray-400" { (field.label) }
                        dd class="text-sm font-semibold" data-field=(field.name) { (value) }
                    }
                }
            }

            div class="flex gap-4 mt-6"
            {
                a href=(endpoints::TRANSACTIONS_VIEW) class=(LINK_STYLE) { "Back" }
                a href=(edit_url) class=(LINK_STYLE) { "Edit" }
                button
                    type="button"
                    hx-delete=(delete_url)
                    hx-confirm="Are you sure you want to delete this transaction? This cannot be undone."
                    hx-target-error="#alert-container"
                    class=(BUTTON_DELETE_STYLE)
                {
                    "Delete"
                }
            }
        }
    };

    base("Transaction", &content)
}
