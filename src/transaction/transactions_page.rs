//! Defines the route handler for the page that lists transactions with a filter bar.
use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    catalog::CatalogKind,
    database_id::DatabaseId,
    endpoints::{self, format_endpoint},
    form_schema::SelectOption,
    html::{
        FILTER_SELECT_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, edit_delete_action_links, format_amount, link,
    },
    navigation::NavBar,
};

use super::{
    core::{TransactionDetail, count_transactions},
    filter::{FilterConfig, FilterResult, TransactionFilter, evaluate_filter},
    form::catalog_options,
    redirect::RedirectQuery,
};

/// The state needed for the transactions page.
#[derive(Debug, Clone)]
pub struct TransactionsPageState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the transactions that match the filter in the query string.
pub async fn get_transactions_page(
    State(state): State<TransactionsPageState>,
    Query(filter): Query<TransactionFilter>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let statuses = catalog_options(CatalogKind::Status, &connection)
        .inspect_err(|error| tracing::error!("could not get statuses: {error}"))?;
    let types = catalog_options(CatalogKind::Type, &connection)
        .inspect_err(|error| tracing::error!("could not get types: {error}"))?;
    let result = evaluate_filter(FilterConfig::from(&filter), &connection)
        .inspect_err(|error| tracing::error!("could not filter transactions: {error}"))?;
    let total_count = count_transactions(&connection)
        .inspect_err(|error| tracing::error!("could not count transactions: {error}"))?;

    Ok(transactions_view(&result, total_count, &statuses, &types).into_response())
}

fn transactions_view(
    result: &FilterResult,
    total_count: u32,
    statuses: &[SelectOption],
    types: &[SelectOption],
) -> Markup {
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();
    let query_string = result.config.to_query_string();
    let current_url = if query_string.is_empty() {
        endpoints::TRANSACTIONS_VIEW.to_owned()
    } else {
        format!("{}?{query_string}", endpoints::TRANSACTIONS_VIEW)
    };
    let redirect = RedirectQuery::new(&current_url);

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full lg:max-w-6xl space-y-4"
            {
                div class="flex justify-between items-center"
                {
                    h1 class="text-xl font-bold" { "Transactions" }

                    a href=(endpoints::NEW_TRANSACTION_VIEW) class=(LINK_STYLE)
                    {
                        "New Transaction"
                    }
                }

                (filter_bar_view(result, statuses, types))

                div class="relative overflow-x-auto shadow-md sm:rounded-lg"
                {
                    table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                @for heading in [
                                    "Date", "Amount", "Status", "Type", "Category",
                                    "Subcategory", "Comment", "Actions",
                                ] {
                                    th scope="col" class=(TABLE_CELL_STYLE) { (heading) }
                                }
                            }
                        }

                        tbody
                        {
                            @for detail in &result.transactions {
                                (transaction_row_view(detail, &redirect))
                            }

                            @if result.transactions.is_empty() {
                                tr class=(TABLE_ROW_STYLE)
                                {
                                    td colspan="8" class="px-6 py-4 text-center"
                                    {
                                        @if total_count == 0 {
                                            "No transactions yet. "
                                            (link(endpoints::NEW_TRANSACTION_VIEW, "Create one"))
                                        } @else {
                                            "No transactions match the filter."
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    );

    base("Transactions", &content)
}

fn filter_bar_view(
    result: &FilterResult,
    statuses: &[SelectOption],
    types: &[SelectOption],
) -> Markup {
    let config = &result.config;
    let selection = &result.selection;
    let date_value = |date: Option<time::Date>| date.map(|date| date.to_string());

    html! {
        form
            id="filter"
            method="get"
            action=(endpoints::TRANSACTIONS_VIEW)
            onchange="this.requestSubmit()"
            class="flex flex-wrap gap-2 items-end"
        {
            label class="flex flex-col text-xs"
            {
                "From"
                input
                    type="date"
                    name="date_from"
                    value=[date_value(config.date_from)]
                    class=(FILTER_SELECT_STYLE);
            }

            label class="flex flex-col text-xs"
            {
                "To"
                input
                    type="date"
                    name="date_to"
                    value=[date_value(config.date_to)]
                    class=(FILTER_SELECT_STYLE);
            }

            (filter_select("status_id", "All statuses", statuses, config.status_id))
            (filter_select("type_id", "All types", types, selection.type_id))
            (filter_select(
                "category_id",
                "All categories",
                &result.options.category_options(),
                selection.category_id,
            ))
            (filter_select(
                "subcategory_id",
                "All subcategories",
                &result.options.subcategory_options(),
                selection.subcategory_id,
            ))

            button type="submit" class=(LINK_STYLE) { "Apply" }

            @if !config.is_empty() {
                a href=(endpoints::TRANSACTIONS_VIEW) class=(LINK_STYLE) { "Clear filters" }
            }
        }
    }
}

fn filter_select(
    name: &str,
    placeholder: &str,
    options: &[SelectOption],
    selected: Option<DatabaseId>,
) -> Markup {
    html! {
        select name=(name) class=(FILTER_SELECT_STYLE)
        {
            option value="" { (placeholder) }

            @for choice in options {
                option value=(choice.id) selected[Some(choice.id) == selected] { (choice.label) }
            }
        }
    }
}

fn transaction_row_view(detail: &TransactionDetail, redirect: &RedirectQuery) -> Markup {
    let transaction = &detail.transaction;
    let view_url = format_endpoint(endpoints::TRANSACTION_VIEW, transaction.id);
    let edit_url =
        redirect.append_to(&format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction.id));
    let delete_url = format_endpoint(endpoints::TRANSACTION, transaction.id);
    let name = |name: &Option<String>| name.clone().unwrap_or_default();

    html! {
        tr class=(TABLE_ROW_STYLE)
        {
            td class=(TABLE_CELL_STYLE)
            {
                a href=(view_url) class=(LINK_STYLE) { (transaction.date_created) }
            }
            td class={(TABLE_CELL_STYLE) " text-right"} { (format_amount(transaction.amount)) }
            td class=(TABLE_CELL_STYLE) { (name(&detail.status_name)) }
            td class=(TABLE_CELL_STYLE) { (name(&detail.type_name)) }
            td class=(TABLE_CELL_STYLE) { (name(&detail.category_name)) }
            td class=(TABLE_CELL_STYLE) { (name(&detail.subcategory_name)) }
            td class=(TABLE_CELL_STYLE) { (transaction.comment.as_deref().unwrap_or_default()) }
            td class=(TABLE_CELL_STYLE)
            {
                div class="flex gap-4"
                {
                    (edit_delete_action_links(
                        &edit_url,
                        &delete_url,
                        "Are you sure you want to delete this transaction? This cannot be undone.",
                        "closest tr",
                        "delete",
                    ))
                }
            }
        }
    }
}
