//! Application router configuration.

use axum::{
    Router,
    response::Redirect,
    routing::{get, post, put},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    catalog::{
        create_catalog_entry_endpoint, delete_catalog_entry_endpoint, get_catalogs_page,
        get_edit_catalog_entry_page, get_new_catalog_entry_page, update_catalog_entry_endpoint,
    },
    endpoints,
    error_pages::get_404_not_found,
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, edit_transaction_endpoint,
        get_edit_transaction_page, get_new_transaction_page, get_transaction_options,
        get_transaction_page, get_transactions_page,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let page_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::TRANSACTIONS_VIEW, get(get_transactions_page))
        .route(endpoints::NEW_TRANSACTION_VIEW, get(get_new_transaction_page))
        .route(endpoints::TRANSACTION_VIEW, get(get_transaction_page))
        .route(
            endpoints::EDIT_TRANSACTION_VIEW,
            get(get_edit_transaction_page),
        )
        .route(endpoints::CATALOGS_VIEW, get(get_catalogs_page))
        .route(
            endpoints::NEW_CATALOG_ENTRY_VIEW,
            get(get_new_catalog_entry_page),
        )
        .route(
            endpoints::EDIT_CATALOG_ENTRY_VIEW,
            get(get_edit_catalog_entry_page),
        );

    let api_routes = Router::new()
        .route(
            endpoints::POST_TRANSACTION,
            post(create_transaction_endpoint),
        )
        .route(
            endpoints::TRANSACTION,
            put(edit_transaction_endpoint).delete(delete_transaction_endpoint),
        )
        .route(endpoints::TRANSACTION_OPTIONS, get(get_transaction_options))
        .route(
            endpoints::POST_CATALOG_ENTRY,
            post(create_catalog_entry_endpoint),
        )
        .route(
            endpoints::CATALOG_ENTRY,
            put(update_catalog_entry_endpoint).delete(delete_catalog_entry_endpoint),
        );

    page_routes
        .merge(api_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the transactions page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::TRANSACTIONS_VIEW)
}
