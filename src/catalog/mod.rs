//! The reference catalogs used to label transactions: statuses, types,
//! categories and subcategories.
//!
//! Statuses and types are flat lists. Categories belong to a type and
//! subcategories belong to a category.

mod create;
mod db;
mod delete;
mod domain;
mod edit;
mod form;
mod list;

pub use create::{create_catalog_entry_endpoint, get_new_catalog_entry_page};
pub use db::{
    create_catalog_entry, create_catalog_tables, delete_catalog_entry, entry_exists,
    get_catalog_entries, get_catalog_entry, get_children, update_catalog_entry,
    validate_catalog_entry,
};
pub use delete::delete_catalog_entry_endpoint;
pub use domain::{CatalogEntry, CatalogFormData, CatalogKind, CatalogName, NewCatalogEntry};
pub use edit::{get_edit_catalog_entry_page, update_catalog_entry_endpoint};
pub use list::get_catalogs_page;
