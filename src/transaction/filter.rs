//! Filtering of the transactions list.
//!
//! The raw query string is parsed leniently into a [FilterConfig]: anything
//! that cannot be parsed is logged and ignored. Every parsed constraint is
//! applied to the query, so a category that does not belong to the selected
//! type matches nothing. The filter bar only offers the categories and
//! subcategories of the selected type and category.

use rusqlite::{Connection, params_from_iter, types::Value};
use serde::{Deserialize, Serialize};
use time::{Date, macros::format_description};

use crate::{
    Error,
    cascade::{CascadeOptions, CascadeSelection, selected_id},
    database_id::DatabaseId,
    transaction::core::{
        TRANSACTION_DETAIL_SELECT, TransactionDetail, map_transaction_detail_row,
    },
};

/// The filter as it appears in the query string of the transactions page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory_id: Option<String>,
}

/// The constraints to apply to the transactions list.
///
/// Every constraint is optional and they are combined with AND.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterConfig {
    /// Inclusive lower bound on `date_created`.
    pub date_from: Option<Date>,
    /// Inclusive upper bound on `date_created`.
    pub date_to: Option<Date>,
    pub status_id: Option<DatabaseId>,
    pub selection: CascadeSelection,
}

impl From<&TransactionFilter> for FilterConfig {
    fn from(filter: &TransactionFilter) -> Self {
        Self {
            date_from: parse_date("date_from", filter.date_from.as_deref()),
            date_to: parse_date("date_to", filter.date_to.as_deref()),
            status_id: selected_id(filter.status_id.as_deref()),
            selection: CascadeSelection {
                type_id: selected_id(filter.type_id.as_deref()),
                category_id: selected_id(filter.category_id.as_deref()),
                subcategory_id: selected_id(filter.subcategory_id.as_deref()),
            },
        }
    }
}

impl FilterConfig {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// The query string that reproduces this config, without the leading "?".
    pub fn to_query_string(&self) -> String {
        let filter = TransactionFilter {
            date_from: self.date_from.map(|date| date.to_string()),
            date_to: self.date_to.map(|date| date.to_string()),
            status_id: self.status_id.map(|id| id.to_string()),
            type_id: self.selection.type_id.map(|id| id.to_string()),
            category_id: self.selection.category_id.map(|id| id.to_string()),
            subcategory_id: self.selection.subcategory_id.map(|id| id.to_string()),
        };

        serde_urlencoded::to_string(&filter)
            .inspect_err(|error| tracing::warn!("could not encode filter {self:?}: {error}"))
            .unwrap_or_default()
    }
}

fn parse_date(field: &str, raw: Option<&str>) -> Option<Date> {
    let raw = raw.map(str::trim).filter(|raw| !raw.is_empty())?;

    Date::parse(raw, format_description!("[year]-[month]-[day]"))
        .inspect_err(|error| tracing::warn!("ignoring {field} \"{raw}\": {error}"))
        .ok()
}

/// The transactions that match a filter along with the choices for the
/// filter's category and subcategory selects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterResult {
    /// Newest first, ties broken by ascending ID.
    pub transactions: Vec<TransactionDetail>,
    pub options: CascadeOptions,
    /// The config that was applied.
    pub config: FilterConfig,
    /// The selection to show in the filter bar, with selections that do not
    /// belong to their parent cleared.
    pub selection: CascadeSelection,
}

/// Find the transactions that match every constraint in `config`.
///
/// # Errors
/// Returns [Error::SqlError] if there is an SQL error.
pub fn evaluate_filter(
    config: FilterConfig,
    connection: &Connection,
) -> Result<FilterResult, Error> {
    let (selection, options) = config.selection.narrow(connection)?;

    let mut where_clause_parts = vec![];
    let mut query_parameters = vec![];

    let mut add_constraint = |column: &str, operator: &str, value: Value| {
        query_parameters.push(value);
        where_clause_parts.push(format!("t.{column} {operator} ?{}", query_parameters.len()));
    };

    if let Some(date_from) = config.date_from {
        add_constraint("date_created", ">=", Value::Text(date_from.to_string()));
    }
    if let Some(date_to) = config.date_to {
        add_constraint("date_created", "<=", Value::Text(date_to.to_string()));
    }
    let references = [
        ("status_id", config.status_id),
        ("type_id", config.selection.type_id),
        ("category_id", config.selection.category_id),
        ("subcategory_id", config.selection.subcategory_id),
    ];
    for (column, id) in references {
        if let Some(id) = id {
            add_constraint(column, "=", Value::Integer(id));
        }
    }

    let mut query_string_parts = vec![TRANSACTION_DETAIL_SELECT.to_owned()];
    if !where_clause_parts.is_empty() {
        query_string_parts.push(String::from("WHERE ") + &where_clause_parts.join(" AND "));
    }
    query_string_parts.push("ORDER BY t.date_created DESC, t.id ASC".to_owned());

    let query_string = query_string_parts.join(" ");
    let params = params_from_iter(query_parameters.iter());

    let transactions = connection
        .prepare(&query_string)?
        .query_map(params, map_transaction_detail_row)?
        .map(|detail| detail.map_err(Error::SqlError))
        .collect::<Result<Vec<_>, Error>>()?;

    tracing::debug!(
        "filter {config:?} matched {} transactions",
        transactions.len()
    );

    Ok(FilterResult {
        transactions,
        options,
        config,
        selection,
    })
}
