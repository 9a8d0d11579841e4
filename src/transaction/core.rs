//! Defines the core data models and database queries for transactions.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    database_id::{DatabaseId, TransactionId},
    error::Record,
};

// ============================================================================
// MODELS
// ============================================================================

/// A single cash flow event labelled with a status, type, category and subcategory.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The day the transaction was recorded for.
    pub date_created: Date,
    pub status_id: Option<DatabaseId>,
    pub type_id: Option<DatabaseId>,
    /// Belongs to `type_id` when both are set.
    pub category_id: Option<DatabaseId>,
    /// Belongs to `category_id` when both are set.
    pub subcategory_id: Option<DatabaseId>,
    /// The amount of money as a whole number.
    pub amount: u32,
    pub comment: Option<String>,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [NewTransaction] for discoverability.
    pub fn build(amount: u32, date_created: Date) -> NewTransaction {
        NewTransaction {
            date_created,
            status_id: None,
            type_id: None,
            category_id: None,
            subcategory_id: None,
            amount,
            comment: None,
        }
    }
}

/// The validated fields of a transaction that has not been saved yet, or the
/// new values for an existing one.
///
/// The database layer does not check that the category belongs to the type,
/// use [crate::transaction::validate_transaction] to build one from user input.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct NewTransaction {
    pub date_created: Date,
    pub status_id: Option<DatabaseId>,
    pub type_id: Option<DatabaseId>,
    pub category_id: Option<DatabaseId>,
    pub subcategory_id: Option<DatabaseId>,
    pub amount: u32,
    pub comment: Option<String>,
}

impl NewTransaction {
    pub fn status_id(mut self, status_id: Option<DatabaseId>) -> Self {
        self.status_id = status_id;
        self
    }

    pub fn type_id(mut self, type_id: Option<DatabaseId>) -> Self {
        self.type_id = type_id;
        self
    }

    pub fn category_id(mut self, category_id: Option<DatabaseId>) -> Self {
        self.category_id = category_id;
        self
    }

    pub fn subcategory_id(mut self, subcategory_id: Option<DatabaseId>) -> Self {
        self.subcategory_id = subcategory_id;
        self
    }

    pub fn comment(mut self, comment: &str) -> Self {
        self.comment = Some(comment.to_owned());
        self
    }
}

/// A transaction with the names of the catalog entries it references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionDetail {
    pub transaction: Transaction,
    pub status_name: Option<String>,
    pub type_name: Option<String>,
    pub category_name: Option<String>,
    pub subcategory_name: Option<String>,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

const TRANSACTION_COLUMNS: &str =
    "id, date_created, status_id, type_id, category_id, subcategory_id, amount, comment";

/// Selects the transaction columns followed by the referenced names, for use
/// with [map_transaction_detail_row].
pub(super) const TRANSACTION_DETAIL_SELECT: &str = "SELECT t.id, t.date_created, t.status_id, \
    t.type_id, t.category_id, t.subcategory_id, t.amount, t.comment, \
    s.name, ty.name, c.name, sc.name \
    FROM \"transaction\" t \
    LEFT JOIN status_action s ON s.id = t.status_id \
    LEFT JOIN type_action ty ON ty.id = t.type_id \
    LEFT JOIN category_action c ON c.id = t.category_id \
    LEFT JOIN subcategory_action sc ON sc.id = t.subcategory_id";

/// Create a new transaction in the database.
///
/// # Errors
/// This function will return an [Error::SqlError] if a referenced catalog
/// entry does not exist or there is some other SQL error.
pub fn create_transaction(
    new_transaction: NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(&format!(
            "INSERT INTO \"transaction\" \
            (date_created, status_id, type_id, category_id, subcategory_id, amount, comment) \
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7) \
            RETURNING {TRANSACTION_COLUMNS}"
        ))?
        .query_row(
            (
                new_transaction.date_created,
                new_transaction.status_id,
                new_transaction.type_id,
                new_transaction.category_id,
                new_transaction.subcategory_id,
                new_transaction.amount,
                new_transaction.comment,
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" WHERE id = :id"
        ))?
        .query_row(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}

/// Retrieve a transaction along with the names of the catalog entries it references.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction_detail(
    id: TransactionId,
    connection: &Connection,
) -> Result<TransactionDetail, Error> {
    let detail = connection
        .prepare(&format!("{TRANSACTION_DETAIL_SELECT} WHERE t.id = :id"))?
        .query_row(&[(":id", &id)], map_transaction_detail_row)?;

    Ok(detail)
}

/// Replace every field of the transaction `id`.
///
/// # Errors
/// Returns [Error::UpdateMissing] if there is no transaction with `id`.
pub fn update_transaction(
    id: TransactionId,
    updated: NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let rows_affected = connection.execute(
        "UPDATE \"transaction\" SET \
            date_created = ?1, \
            status_id = ?2, \
            type_id = ?3, \
            category_id = ?4, \
            subcategory_id = ?5, \
            amount = ?6, \
            comment = ?7 \
        WHERE id = ?8",
        (
            updated.date_created,
            updated.status_id,
            updated.type_id,
            updated.category_id,
            updated.subcategory_id,
            updated.amount,
            &updated.comment,
            id,
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissing(Record::Transaction));
    }

    Ok(Transaction {
        id,
        date_created: updated.date_created,
        status_id: updated.status_id,
        type_id: updated.type_id,
        category_id: updated.category_id,
        subcategory_id: updated.subcategory_id,
        amount: updated.amount,
        comment: updated.comment,
    })
}

/// Delete the transaction `id`.
///
/// # Errors
/// Returns [Error::DeleteMissing] if there is no transaction with `id`.
pub fn delete_transaction(id: TransactionId, connection: &Connection) -> Result<(), Error> {
    let rows_affected =
        connection.execute("DELETE FROM \"transaction\" WHERE id = :id", &[(":id", &id)])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissing(Record::Transaction));
    }

    Ok(())
}

/// Get the total number of transactions in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn count_transactions(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM \"transaction\";", [], |row| {
            row.get(0)
        })
        .map_err(|error| error.into())
}

/// Create the transaction table in the database.
///
/// References to catalog entries are cleared when the entry is deleted.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            date_created TEXT NOT NULL,
            status_id INTEGER,
            type_id INTEGER,
            category_id INTEGER,
            subcategory_id INTEGER,
            amount INTEGER NOT NULL CHECK (amount >= 0),
            comment TEXT,
            FOREIGN KEY(status_id) REFERENCES status_action(id) ON UPDATE CASCADE ON DELETE SET NULL,
            FOREIGN KEY(type_id) REFERENCES type_action(id) ON UPDATE CASCADE ON DELETE SET NULL,
            FOREIGN KEY(category_id) REFERENCES category_action(id) ON UPDATE CASCADE ON DELETE SET NULL,
            FOREIGN KEY(subcategory_id) REFERENCES subcategory_action(id) ON UPDATE CASCADE ON DELETE SET NULL
        );

        CREATE INDEX IF NOT EXISTS idx_transaction_date_created ON \"transaction\"(date_created);",
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        date_created: row.get(1)?,
        status_id: row.get(2)?,
        type_id: row.get(3)?,
        category_id: row.get(4)?,
        subcategory_id: row.get(5)?,
        amount: row.get(6)?,
        comment: row.get(7)?,
    })
}

/// Map a row selected with [TRANSACTION_DETAIL_SELECT] to a [TransactionDetail].
pub(super) fn map_transaction_detail_row(row: &Row) -> Result<TransactionDetail, rusqlite::Error> {
    Ok(TransactionDetail {
        transaction: map_transaction_row(row)?,
        status_name: row.get(8)?,
        type_name: row.get(9)?,
        category_name: row.get(10)?,
        subcategory_name: row.get(11)?,
    })
}

// ============================================================================
// TESTS
// ============================================================================
