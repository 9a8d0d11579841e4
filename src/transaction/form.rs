//! Validation and rendering of the form shared by the transaction create and edit pages.

use std::num::IntErrorKind;

use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;
use time::{Date, macros::format_description};

use crate::{
    Error,
    cascade::{CascadeOptions, CascadeSelection, check_cascade_consistency, parse_id, selected_id},
    catalog::{CatalogKind, entry_exists, get_catalog_entries},
    database_id::{DatabaseId, TransactionId},
    endpoints::{self, format_endpoint},
    form_schema::{
        AMOUNT_FIELD, CATEGORY_FIELD, COMMENT_FIELD, DATE_CREATED_FIELD, FieldSchema,
        STATUS_FIELD, SUBCATEGORY_FIELD, SelectOption, TYPE_FIELD, input_field, select_field,
    },
    html::BUTTON_PRIMARY_STYLE,
    transaction::{NewTransaction, Transaction, redirect::RedirectQuery},
    validation::ValidationErrors,
};

/// The raw values submitted by the transaction form.
///
/// A field that is missing keeps its prior value on update, while an empty
/// field clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TransactionForm {
    pub date_created: Option<String>,
    pub status_id: Option<String>,
    pub type_id: Option<String>,
    pub category_id: Option<String>,
    pub subcategory_id: Option<String>,
    pub amount: Option<String>,
    pub comment: Option<String>,
}

/// Merge `form` over `prior` and check the result.
///
/// `today` is used as the date when neither the form nor `prior` provide one.
///
/// # Errors
/// Returns [Error::Validation] listing every invalid field, or [Error::SqlError]
/// if the catalogs could not be read.
pub fn validate_transaction(
    form: &TransactionForm,
    prior: Option<&Transaction>,
    today: Date,
    connection: &Connection,
) -> Result<NewTransaction, Error> {
    let mut errors = ValidationErrors::new();

    let date_created = merge_date(
        form.date_created.as_deref(),
        prior.map(|transaction| transaction.date_created),
        today,
        &mut errors,
    );

    let status_id = merge_reference(
        &STATUS_FIELD,
        form.status_id.as_deref(),
        prior.and_then(|transaction| transaction.status_id),
        &mut errors,
    );
    let selection = CascadeSelection {
        type_id: merge_reference(
            &TYPE_FIELD,
            form.type_id.as_deref(),
            prior.and_then(|transaction| transaction.type_id),
            &mut errors,
        ),
        category_id: merge_reference(
            &CATEGORY_FIELD,
            form.category_id.as_deref(),
            prior.and_then(|transaction| transaction.category_id),
            &mut errors,
        ),
        subcategory_id: merge_reference(
            &SUBCATEGORY_FIELD,
            form.subcategory_id.as_deref(),
            prior.and_then(|transaction| transaction.subcategory_id),
            &mut errors,
        ),
    };

    match status_id {
        Some(status_id) if !entry_exists(CatalogKind::Status, status_id, connection)? => {
            errors.add(STATUS_FIELD.name, "status does not exist");
        }
        _ => {}
    }
    errors.extend(check_cascade_consistency(&selection, connection)?);

    let amount = merge_amount(
        form.amount.as_deref(),
        prior.map(|transaction| transaction.amount),
        &mut errors,
    );

    let comment = match form.comment.as_deref() {
        None => prior.and_then(|transaction| transaction.comment.clone()),
        Some(comment) => Some(comment.trim())
            .filter(|comment| !comment.is_empty())
            .map(str::to_owned),
    };

    match amount {
        Some(amount) if errors.is_empty() => Ok(NewTransaction {
            date_created,
            status_id,
            type_id: selection.type_id,
            category_id: selection.category_id,
            subcategory_id: selection.subcategory_id,
            amount,
            comment,
        }),
        _ => Err(Error::Validation(errors)),
    }
}

fn merge_date(
    raw: Option<&str>,
    prior: Option<Date>,
    today: Date,
    errors: &mut ValidationErrors,
) -> Date {
    let fallback = prior.unwrap_or(today);

    let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return fallback;
    };

    match Date::parse(raw, format_description!("[year]-[month]-[day]")) {
        Ok(date) => date,
        Err(error) => {
            tracing::debug!("could not parse date \"{raw}\": {error}");
            errors.add(DATE_CREATED_FIELD.name, "date must be in the format YYYY-MM-DD");
            fallback
        }
    }
}

fn merge_reference(
    field: &FieldSchema,
    raw: Option<&str>,
    prior: Option<DatabaseId>,
    errors: &mut ValidationErrors,
) -> Option<DatabaseId> {
    let raw = match raw.map(str::trim) {
        None => return prior,
        Some("") => return None,
        Some(raw) => raw,
    };

    match parse_id(raw) {
        Ok(id) => Some(id),
        Err(error) => {
            errors.add(field.name, error.to_string());
            None
        }
    }
}

fn merge_amount(
    raw: Option<&str>,
    prior: Option<u32>,
    errors: &mut ValidationErrors,
) -> Option<u32> {
    let raw = match raw.map(str::trim) {
        None if prior.is_some() => return prior,
        None | Some("") => {
            errors.add(AMOUNT_FIELD.name, "amount is required");
            return None;
        }
        Some(raw) => raw,
    };

    let reason = match raw.parse::<i64>() {
        Ok(amount) if amount < 0 => "amount must not be negative",
        Ok(amount) => match u32::try_from(amount) {
            Ok(amount) => return Some(amount),
            Err(_) => "amount is too large",
        },
        Err(error) => match error.kind() {
            IntErrorKind::PosOverflow => "amount is too large",
            IntErrorKind::NegOverflow => "amount must not be negative",
            _ => "amount must be a whole number",
        },
    };

    errors.add(AMOUNT_FIELD.name, reason);
    None
}

/// Whether the form creates a new transaction or updates an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum FormAction<'a> {
    Create,
    Update {
        id: TransactionId,
        redirect: &'a RedirectQuery,
    },
}

/// The values to pre-fill the form with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(super) struct TransactionFormValues {
    pub date_created: Option<String>,
    pub status_id: Option<DatabaseId>,
    pub selection: CascadeSelection,
    pub amount: Option<String>,
    pub comment: Option<String>,
}

impl TransactionFormValues {
    pub fn for_new(today: Date) -> Self {
        Self {
            date_created: Some(today.to_string()),
            ..Default::default()
        }
    }

    pub fn from_transaction(transaction: &Transaction) -> Self {
        Self {
            date_created: Some(transaction.date_created.to_string()),
            status_id: transaction.status_id,
            selection: CascadeSelection {
                type_id: transaction.type_id,
                category_id: transaction.category_id,
                subcategory_id: transaction.subcategory_id,
            },
            amount: Some(transaction.amount.to_string()),
            comment: transaction.comment.clone(),
        }
    }

    /// The values the user submitted, so that a rejected form can be shown again.
    ///
    /// Fields the user left out fall back to `prior`.
    pub fn from_form(form: &TransactionForm, prior: Option<&Transaction>) -> Self {
        let prior = prior.map(Self::from_transaction).unwrap_or_default();
        let reference = |raw: &Option<String>, prior: Option<DatabaseId>| match raw {
            Some(raw) => selected_id(Some(raw)),
            None => prior,
        };

        Self {
            date_created: form.date_created.clone().or(prior.date_created),
            status_id: reference(&form.status_id, prior.status_id),
            selection: CascadeSelection {
                type_id: reference(&form.type_id, prior.selection.type_id),
                category_id: reference(&form.category_id, prior.selection.category_id),
                subcategory_id: reference(&form.subcategory_id, prior.selection.subcategory_id),
            },
            amount: form.amount.clone().or(prior.amount),
            comment: form.comment.clone().or(prior.comment),
        }
    }
}

/// The choices for every select in the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(super) struct TransactionFormOptions {
    pub statuses: Vec<SelectOption>,
    pub types: Vec<SelectOption>,
    pub cascade: CascadeOptions,
}

impl TransactionFormOptions {
    pub fn load(selection: &CascadeSelection, connection: &Connection) -> Result<Self, Error> {
        Ok(Self {
            statuses: catalog_options(CatalogKind::Status, connection)?,
            types: catalog_options(CatalogKind::Type, connection)?,
            cascade: CascadeOptions::for_selection(
                selection.type_id,
                selection.category_id,
                connection,
            )?,
        })
    }
}

/// The options for a flat catalog select.
pub(super) fn catalog_options(
    kind: CatalogKind,
    connection: &Connection,
) -> Result<Vec<SelectOption>, Error> {
    let options = get_catalog_entries(kind, connection)?
        .into_iter()
        .map(|entry| SelectOption {
            id: entry.id,
            label: entry.name.to_string(),
        })
        .collect();

    Ok(options)
}

pub(super) fn transaction_form_view(
    action: FormAction,
    values: &TransactionFormValues,
    options: &TransactionFormOptions,
    errors: &ValidationErrors,
) -> Markup {
    let (hx_post, hx_put, submit_label) = match action {
        FormAction::Create => (
            Some(endpoints::POST_TRANSACTION.to_owned()),
            None,
            "Create Transaction",
        ),
        FormAction::Update { id, redirect } => (
            None,
            Some(redirect.append_to(&format_endpoint(endpoints::TRANSACTION, id))),
            "Update Transaction",
        ),
    };

    html! {
        form
            hx-post=[hx_post]
            hx-put=[hx_put]
            hx-target-error="#alert-container"
            hx-swap="outerHTML"
            class="w-full space-y-4 md:space-y-6"
        {
            (input_field(
                &DATE_CREATED_FIELD,
                values.date_created.as_deref(),
                errors.for_field(DATE_CREATED_FIELD.name),
            ))

            (select_field(
                &STATUS_FIELD,
                &options.statuses,
                values.status_id,
                errors.for_field(STATUS_FIELD.name),
                None,
            ))

            (select_field(
                &TYPE_FIELD,
                &options.types,
                values.selection.type_id,
                errors.for_field(TYPE_FIELD.name),
                Some(endpoints::TRANSACTION_OPTIONS),
            ))

            (cascade_fields_view(&options.cascade, &values.selection, errors))

            (input_field(
                &AMOUNT_FIELD,
                values.amount.as_deref(),
                errors.for_field(AMOUNT_FIELD.name),
            ))

            (input_field(
                &COMMENT_FIELD,
                values.comment.as_deref(),
                errors.for_field(COMMENT_FIELD.name),
            ))

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { (submit_label) }
        }
    }
}

/// The category and subcategory selects, swapped out whenever the type or
/// category changes.
pub(super) fn cascade_fields_view(
    options: &CascadeOptions,
    selection: &CascadeSelection,
    errors: &ValidationErrors,
) -> Markup {
    html! {
        div id="cascade-fields" class="space-y-4 md:space-y-6"
        {
            (select_field(
                &CATEGORY_FIELD,
                &options.category_options(),
                selection.category_id,
                errors.for_field(CATEGORY_FIELD.name),
                Some(endpoints::TRANSACTION_OPTIONS),
            ))

            (select_field(
                &SUBCATEGORY_FIELD,
                &options.subcategory_options(),
                selection.subcategory_id,
                errors.for_field(SUBCATEGORY_FIELD.name),
                None,
            ))
        }
    }
}
