//! Core catalog domain types.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{
    database_id::DatabaseId,
    form_schema::{
        CATALOG_CATEGORY_FIELD, CATALOG_NAME_FIELD, CATALOG_TYPE_FIELD, FieldSchema,
        MAX_NAME_LENGTH,
    },
    validation::FieldError,
};

/// One of the four reference lists used to label transactions.
///
/// Statuses and types stand alone, while every category belongs to a type
/// and every subcategory belongs to a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CatalogKind {
    #[serde(rename = "statuses")]
    Status,
    #[serde(rename = "types")]
    Type,
    #[serde(rename = "categories")]
    Category,
    #[serde(rename = "subcategories")]
    Subcategory,
}

impl CatalogKind {
    /// Every catalog, in the order they are shown on the catalogs page.
    pub const ALL: [CatalogKind; 4] = [
        CatalogKind::Status,
        CatalogKind::Type,
        CatalogKind::Category,
        CatalogKind::Subcategory,
    ];

    /// The name of the database table holding the entries.
    pub fn table(self) -> &'static str {
        match self {
            CatalogKind::Status => "status_action",
            CatalogKind::Type => "type_action",
            CatalogKind::Category => "category_action",
            CatalogKind::Subcategory => "subcategory_action",
        }
    }

    /// The catalog that entries of this catalog belong to, if any.
    pub fn parent(self) -> Option<CatalogKind> {
        match self {
            CatalogKind::Status | CatalogKind::Type => None,
            CatalogKind::Category => Some(CatalogKind::Type),
            CatalogKind::Subcategory => Some(CatalogKind::Category),
        }
    }

    /// The catalog whose entries belong to entries of this catalog, if any.
    pub fn child(self) -> Option<CatalogKind> {
        match self {
            CatalogKind::Status | CatalogKind::Subcategory => None,
            CatalogKind::Type => Some(CatalogKind::Category),
            CatalogKind::Category => Some(CatalogKind::Subcategory),
        }
    }

    /// The column (and form field) referencing the parent entry.
    pub fn parent_column(self) -> Option<&'static str> {
        self.parent().map(CatalogKind::reference_column)
    }

    /// The name of a column that references an entry of this catalog,
    /// e.g. `type_id`.
    pub fn reference_column(self) -> &'static str {
        match self {
            CatalogKind::Status => "status_id",
            CatalogKind::Type => "type_id",
            CatalogKind::Category => "category_id",
            CatalogKind::Subcategory => "subcategory_id",
        }
    }

    /// The path segment used in URLs, e.g. "categories".
    pub fn slug(self) -> &'static str {
        match self {
            CatalogKind::Status => "statuses",
            CatalogKind::Type => "types",
            CatalogKind::Category => "categories",
            CatalogKind::Subcategory => "subcategories",
        }
    }

    /// The lowercase singular name, e.g. "category".
    pub fn singular_name(self) -> &'static str {
        match self {
            CatalogKind::Status => "status",
            CatalogKind::Type => "type",
            CatalogKind::Category => "category",
            CatalogKind::Subcategory => "subcategory",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            CatalogKind::Status => "Status",
            CatalogKind::Type => "Type",
            CatalogKind::Category => "Category",
            CatalogKind::Subcategory => "Subcategory",
        }
    }

    pub fn plural_title(self) -> &'static str {
        match self {
            CatalogKind::Status => "Statuses",
            CatalogKind::Type => "Types",
            CatalogKind::Category => "Categories",
            CatalogKind::Subcategory => "Subcategories",
        }
    }

    /// The fields of the create and update forms for this catalog.
    pub fn form_fields(self) -> &'static [FieldSchema] {
        match self {
            CatalogKind::Status | CatalogKind::Type => &[CATALOG_NAME_FIELD],
            CatalogKind::Category => &[CATALOG_NAME_FIELD, CATALOG_TYPE_FIELD],
            CatalogKind::Subcategory => &[CATALOG_NAME_FIELD, CATALOG_CATEGORY_FIELD],
        }
    }
}

impl Display for CatalogKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.singular_name())
    }
}

/// A validated, non-empty catalog entry name of at most [MAX_NAME_LENGTH] characters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct CatalogName(String);

impl CatalogName {
    /// Create a catalog name from `name` with surrounding whitespace removed.
    ///
    /// # Errors
    ///
    /// Returns a [FieldError] for the `name` field if `name` is empty or too long.
    pub fn new(name: &str) -> Result<Self, FieldError> {
        let name = name.trim();

        if name.is_empty() {
            Err(FieldError::new("name", "name cannot be empty"))
        } else if name.chars().count() > MAX_NAME_LENGTH {
            Err(FieldError::new(
                "name",
                format!("name must be at most {MAX_NAME_LENGTH} characters long"),
            ))
        } else {
            Ok(Self(name.to_string()))
        }
    }

    /// Create a catalog name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`, because if the non-empty invariant is violated it will cause incorrect behaviour but not affect memory safety.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for CatalogName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for CatalogName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An entry in one of the catalogs, e.g. the type "Income" or the category "Salary".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct CatalogEntry {
    pub id: DatabaseId,
    pub name: CatalogName,
    /// The entry this entry belongs to: the type of a category or the
    /// category of a subcategory. Always `None` for statuses and types.
    pub parent_id: Option<DatabaseId>,
}

/// The validated fields for creating or updating a catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCatalogEntry {
    pub name: CatalogName,
    pub parent_id: Option<DatabaseId>,
}

impl NewCatalogEntry {
    /// An entry with no parent, i.e. a status or a type.
    pub fn new(name: CatalogName) -> Self {
        Self {
            name,
            parent_id: None,
        }
    }

    /// Set the entry this entry belongs to.
    pub fn parent_id(mut self, parent_id: DatabaseId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }
}

/// Form data for catalog entry creation and editing.
///
/// Categories send their type as `type_id` and subcategories send their
/// category as `category_id`. Statuses and types send neither.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CatalogFormData {
    pub name: String,
    #[serde(default)]
    pub type_id: Option<String>,
    #[serde(default)]
    pub category_id: Option<String>,
}

impl CatalogFormData {
    /// The raw value of the field referencing the parent entry of a `kind` entry.
    pub fn parent_value(&self, kind: CatalogKind) -> Option<&str> {
        match kind.parent() {
            Some(CatalogKind::Type) => self.type_id.as_deref(),
            Some(CatalogKind::Category) => self.category_id.as_deref(),
            _ => None,
        }
    }
}
