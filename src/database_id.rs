//! Database ID type definitions.

/// Alias for the integer type used for mapping to database IDs.
///
/// IDs are assigned by SQLite when a row is inserted and are otherwise opaque.
pub type DatabaseId = i64;

/// Database identifier for a transaction.
pub type TransactionId = DatabaseId;
