//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/transactions/{transaction_id}', use [format_endpoint].
//! Catalog endpoints also take the catalog kind, use [format_catalog_endpoint] for those.

use crate::{catalog::CatalogKind, database_id::DatabaseId};

/// The root route which redirects to the transactions page.
pub const ROOT: &str = "/";
/// The page for listing and filtering transactions.
pub const TRANSACTIONS_VIEW: &str = "/transactions";
/// The page for creating a new transaction.
pub const NEW_TRANSACTION_VIEW: &str = "/transactions/new";
/// The page showing every field of a single transaction.
pub const TRANSACTION_VIEW: &str = "/transactions/{transaction_id}";
/// The page for editing an existing transaction.
pub const EDIT_TRANSACTION_VIEW: &str = "/transactions/{transaction_id}/edit";
/// The page for managing the statuses, types, categories and subcategories.
pub const CATALOGS_VIEW: &str = "/catalogs";
/// The page for creating a new catalog entry.
pub const NEW_CATALOG_ENTRY_VIEW: &str = "/catalogs/{kind}/new";
/// The page for editing an existing catalog entry.
pub const EDIT_CATALOG_ENTRY_VIEW: &str = "/catalogs/{kind}/{entry_id}/edit";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route to create a transaction.
pub const POST_TRANSACTION: &str = "/api/transactions";
/// The route to update or delete a transaction.
pub const TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// The route for the category and subcategory options for a type and category selection.
pub const TRANSACTION_OPTIONS: &str = "/api/transactions/options";
/// The route to create a catalog entry.
pub const POST_CATALOG_ENTRY: &str = "/api/catalogs/{kind}";
/// The route to update or delete a catalog entry.
pub const CATALOG_ENTRY: &str = "/api/catalogs/{kind}/{entry_id}";

/// Replace the first parameter in `endpoint_path` with `id`.
///
/// # Examples
///
/// ```
/// use cashflow_rs::endpoints::format_endpoint;
///
/// assert_eq!(format_endpoint("/hello/{world_id}", 1), "/hello/1");
/// ```
pub fn format_endpoint(endpoint_path: &str, id: DatabaseId) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_string();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|offset| param_start + offset + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

/// Fill in the `{kind}` parameter of a catalog endpoint and, if given, the entry ID.
///
/// # Examples
///
/// ```
/// use cashflow_rs::{catalog::CatalogKind, endpoints::{self, format_catalog_endpoint}};
///
/// assert_eq!(
///     format_catalog_endpoint(endpoints::CATALOG_ENTRY, CatalogKind::Category, Some(3)),
///     "/api/catalogs/categories/3"
/// );
/// ```
pub fn format_catalog_endpoint(
    endpoint_path: &str,
    kind: CatalogKind,
    entry_id: Option<DatabaseId>,
) -> String {
    let path = endpoint_path.replace("{kind}", kind.slug());

    match entry_id {
        Some(id) => format_endpoint(&path, id),
        None => path,
    }
}
