//! Transaction management for the cash flow tracker.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and database functions for storing and querying transactions
//! - Validation of the transaction form against the catalogs
//! - The filter engine behind the transactions list
//! - View handlers for transaction-related web pages

mod core;
mod create_endpoint;
mod create_page;
mod delete_endpoint;
mod detail_page;
mod edit_endpoint;
mod edit_page;
mod filter;
mod form;
mod options_endpoint;
mod redirect;
mod transactions_page;

pub use core::{
    NewTransaction, Transaction, TransactionDetail, count_transactions, create_transaction,
    create_transaction_table, delete_transaction, get_transaction, get_transaction_detail,
    map_transaction_row, update_transaction,
};
pub use create_endpoint::create_transaction_endpoint;
pub use create_page::get_new_transaction_page;
pub use delete_endpoint::delete_transaction_endpoint;
pub use detail_page::get_transaction_page;
pub use edit_endpoint::edit_transaction_endpoint;
pub use edit_page::get_edit_transaction_page;
pub use filter::{FilterConfig, FilterResult, TransactionFilter, evaluate_filter};
pub use form::{TransactionForm, validate_transaction};
pub use options_endpoint::get_transaction_options;
pub use transactions_page::get_transactions_page;
