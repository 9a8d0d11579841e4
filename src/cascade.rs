//! Narrowing of category and subcategory choices based on the selected type and category.
//!
//! The same functions drive the transaction form, the options endpoint used
//! when the user changes a select, and the filter bar on the transactions page.
//! Malformed IDs coming from the client are treated as "nothing selected"
//! rather than failing the request.

use rusqlite::Connection;

use crate::{
    Error,
    catalog::{CatalogEntry, CatalogKind, get_catalog_entry, get_children},
    database_id::DatabaseId,
    form_schema::SelectOption,
    validation::FieldError,
};

/// Parse a client supplied ID.
///
/// # Errors
/// Returns [Error::InvalidIdFormat] if `raw` is not an integer.
pub fn parse_id(raw: &str) -> Result<DatabaseId, Error> {
    raw.trim()
        .parse()
        .map_err(|_| Error::InvalidIdFormat(raw.to_owned()))
}

/// Parse an optional client supplied ID, treating empty and malformed values as no selection.
pub fn selected_id(raw: Option<&str>) -> Option<DatabaseId> {
    let raw = raw.map(str::trim).filter(|raw| !raw.is_empty())?;

    parse_id(raw)
        .inspect_err(|error| tracing::warn!("ignoring selection: {error}"))
        .ok()
}

/// The categories of the type `type_id`, or nothing if no type is selected.
pub fn categories_for_type(
    type_id: Option<DatabaseId>,
    connection: &Connection,
) -> Result<Vec<CatalogEntry>, Error> {
    match type_id {
        Some(type_id) => get_children(CatalogKind::Type, type_id, connection),
        None => Ok(Vec::new()),
    }
}

/// The subcategories of the category `category_id`, or nothing if no category is selected.
pub fn subcategories_for_category(
    category_id: Option<DatabaseId>,
    connection: &Connection,
) -> Result<Vec<CatalogEntry>, Error> {
    match category_id {
        Some(category_id) => get_children(CatalogKind::Category, category_id, connection),
        None => Ok(Vec::new()),
    }
}

/// The category and subcategory choices for a type and category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CascadeOptions {
    pub categories: Vec<CatalogEntry>,
    pub subcategories: Vec<CatalogEntry>,
}

impl CascadeOptions {
    pub fn for_selection(
        type_id: Option<DatabaseId>,
        category_id: Option<DatabaseId>,
        connection: &Connection,
    ) -> Result<Self, Error> {
        Ok(Self {
            categories: categories_for_type(type_id, connection)?,
            subcategories: subcategories_for_category(category_id, connection)?,
        })
    }

    pub fn category_options(&self) -> Vec<SelectOption> {
        to_select_options(&self.categories)
    }

    pub fn subcategory_options(&self) -> Vec<SelectOption> {
        to_select_options(&self.subcategories)
    }
}

/// A type, category and subcategory picked together.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CascadeSelection {
    pub type_id: Option<DatabaseId>,
    pub category_id: Option<DatabaseId>,
    pub subcategory_id: Option<DatabaseId>,
}

impl CascadeSelection {
    /// Work out the choices for this selection and clear any downstream
    /// selection that is not one of them.
    ///
    /// A category is kept only if it belongs to the selected type, and a
    /// subcategory only if it belongs to the kept category.
    pub fn narrow(self, connection: &Connection) -> Result<(Self, CascadeOptions), Error> {
        let categories = categories_for_type(self.type_id, connection)?;
        let category_id = keep_if_listed(self.category_id, &categories);

        let subcategories = subcategories_for_category(category_id, connection)?;
        let subcategory_id = keep_if_listed(self.subcategory_id, &subcategories);

        let narrowed = Self {
            type_id: self.type_id,
            category_id,
            subcategory_id,
        };

        if narrowed != self {
            tracing::debug!("narrowed selection {self:?} to {narrowed:?}");
        }

        Ok((
            narrowed,
            CascadeOptions {
                categories,
                subcategories,
            },
        ))
    }
}

/// Check that each selected entry exists and that the category belongs to
/// the type and the subcategory belongs to the category when both are set.
///
/// Returns one [FieldError] per offending field, or an empty list if the
/// selection is consistent.
pub fn check_cascade_consistency(
    selection: &CascadeSelection,
    connection: &Connection,
) -> Result<Vec<FieldError>, Error> {
    let mut errors = Vec::new();

    let type_entry = lookup(CatalogKind::Type, selection.type_id, connection, &mut errors)?;
    let category = lookup(
        CatalogKind::Category,
        selection.category_id,
        connection,
        &mut errors,
    )?;
    let subcategory = lookup(
        CatalogKind::Subcategory,
        selection.subcategory_id,
        connection,
        &mut errors,
    )?;

    match (&type_entry, &category) {
        (Some(type_entry), Some(category)) if category.parent_id != Some(type_entry.id) => {
            errors.push(FieldError::new(
                CatalogKind::Category.reference_column(),
                format!(
                    "\"{}\" does not belong to the type \"{}\"",
                    category.name, type_entry.name
                ),
            ));
        }
        _ => {}
    }

    match (&category, &subcategory) {
        (Some(category), Some(subcategory)) if subcategory.parent_id != Some(category.id) => {
            errors.push(FieldError::new(
                CatalogKind::Subcategory.reference_column(),
                format!(
                    "\"{}\" does not belong to the category \"{}\"",
                    subcategory.name, category.name
                ),
            ));
        }
        _ => {}
    }

    Ok(errors)
}

fn lookup(
    kind: CatalogKind,
    id: Option<DatabaseId>,
    connection: &Connection,
    errors: &mut Vec<FieldError>,
) -> Result<Option<CatalogEntry>, Error> {
    let Some(id) = id else {
        return Ok(None);
    };

    match get_catalog_entry(kind, id, connection) {
        Ok(entry) => Ok(Some(entry)),
        Err(Error::NotFound) => {
            errors.push(FieldError::new(
                kind.reference_column(),
                format!("{kind} does not exist"),
            ));
            Ok(None)
        }
        Err(error) => Err(error),
    }
}

fn keep_if_listed(id: Option<DatabaseId>, entries: &[CatalogEntry]) -> Option<DatabaseId> {
    id.filter(|id| entries.iter().any(|entry| entry.id == *id))
}

fn to_select_options(entries: &[CatalogEntry]) -> Vec<SelectOption> {
    entries
        .iter()
        .map(|entry| SelectOption {
            id: entry.id,
            label: entry.name.to_string(),
        })
        .collect()
}
