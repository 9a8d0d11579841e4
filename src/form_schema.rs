//! Declarative descriptions of the create/update forms and helpers to render them.
//!
//! Each form is a static list of [FieldSchema]s. The schema carries the field
//! type, whether it is required, the validation rule shown to the user and any
//! display hints, so rendering is a plain function of the schema and the
//! current values.

use maud::{Markup, html};

use crate::{
    database_id::DatabaseId,
    html::{FORM_FIELD_ERROR_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE},
};

/// Maximum length of a catalog entry name.
pub const MAX_NAME_LENGTH: usize = 100;

/// The kind of input widget used for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Text,
    TextArea,
    /// A whole number input with a lower bound.
    Number { min: i64 },
    Date,
    /// A drop down list of catalog entries.
    Select,
}

/// The description of a single form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSchema {
    /// The form field name, also used as the element ID.
    pub name: &'static str,
    pub label: &'static str,
    pub input: InputKind,
    pub required: bool,
    /// A short description of what makes the value valid.
    pub rule: &'static str,
    pub max_length: Option<usize>,
    /// Whether changing this field should refresh the options of the fields
    /// that depend on it.
    pub refreshes_dependents: bool,
}

impl FieldSchema {
    const fn new(name: &'static str, label: &'static str, input: InputKind) -> Self {
        Self {
            name,
            label,
            input,
            required: false,
            rule: "",
            max_length: None,
            refreshes_dependents: false,
        }
    }

    const fn required(self) -> Self {
        Self {
            required: true,
            ..self
        }
    }

    const fn rule(self, rule: &'static str) -> Self {
        Self { rule, ..self }
    }

    const fn max_length(self, max_length: usize) -> Self {
        Self {
            max_length: Some(max_length),
            ..self
        }
    }

    const fn refreshes_dependents(self) -> Self {
        Self {
            refreshes_dependents: true,
            ..self
        }
    }
}

pub const DATE_CREATED_FIELD: FieldSchema = FieldSchema::new("date_created", "Date", InputKind::Date)
    .required()
    .rule("a date in the format YYYY-MM-DD, defaults to today");
pub const STATUS_FIELD: FieldSchema = FieldSchema::new("status_id", "Status", InputKind::Select)
    .rule("an existing status");
pub const TYPE_FIELD: FieldSchema = FieldSchema::new("type_id", "Type", InputKind::Select)
    .rule("an existing type")
    .refreshes_dependents();
pub const CATEGORY_FIELD: FieldSchema =
    FieldSchema::new("category_id", "Category", InputKind::Select)
        .rule("a category that belongs to the selected type")
        .refreshes_dependents();
pub const SUBCATEGORY_FIELD: FieldSchema =
    FieldSchema::new("subcategory_id", "Subcategory", InputKind::Select)
        .rule("a subcategory that belongs to the selected category");
pub const AMOUNT_FIELD: FieldSchema = FieldSchema::new("amount", "Amount", InputKind::Number {
    min: 0,
})
.required()
.rule("a whole number that is zero or more");
pub const COMMENT_FIELD: FieldSchema = FieldSchema::new("comment", "Comment", InputKind::TextArea);

/// The fields of the transaction create and update forms, in display order.
pub const TRANSACTION_FIELDS: &[FieldSchema] = &[
    DATE_CREATED_FIELD,
    STATUS_FIELD,
    TYPE_FIELD,
    CATEGORY_FIELD,
    SUBCATEGORY_FIELD,
    AMOUNT_FIELD,
    COMMENT_FIELD,
];

pub const CATALOG_NAME_FIELD: FieldSchema = FieldSchema::new("name", "Name", InputKind::Text)
    .required()
    .max_length(MAX_NAME_LENGTH)
    .rule("a unique, non-empty name of at most 100 characters");
pub const CATALOG_TYPE_FIELD: FieldSchema = FieldSchema::new("type_id", "Type", InputKind::Select)
    .required()
    .rule("the type this category belongs to");
pub const CATALOG_CATEGORY_FIELD: FieldSchema =
    FieldSchema::new("category_id", "Category", InputKind::Select)
        .required()
        .rule("the category this subcategory belongs to");

/// An option in a drop down list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub id: DatabaseId,
    pub label: String,
}

/// Render a text, text area, number or date input for `field`.
///
/// Select fields must be rendered with [select_field].
pub fn input_field(field: &FieldSchema, value: Option<&str>, error: Option<&str>) -> Markup {
    html! {
        div
        {
            label for=(field.name) class=(FORM_LABEL_STYLE) { (field.label) }

            @match field.input {
                InputKind::TextArea => {
                    textarea
                        name=(field.name)
                        id=(field.name)
                        rows="3"
                        placeholder=(field.label)
                        required[field.required]
                        class=(FORM_TEXT_INPUT_STYLE)
                    {
                        (value.unwrap_or_default())
                    }
                }
                InputKind::Number { min } => {
                    input
                        name=(field.name)
                        id=(field.name)
                        type="number"
                        step="1"
                        min=(min)
                        placeholder="0"
                        value=[value]
                        required[field.required]
                        title=(field.rule)
                        class=(FORM_TEXT_INPUT_STYLE);
                }
                InputKind::Date => {
                    input
                        name=(field.name)
                        id=(field.name)
                        type="date"
                        value=[value]
                        required[field.required]
                        title=(field.rule)
                        class=(FORM_TEXT_INPUT_STYLE);
                }
                InputKind::Text | InputKind::Select => {
                    input
                        name=(field.name)
                        id=(field.name)
                        type="text"
                        placeholder=(field.label)
                        value=[value]
                        maxlength=[field.max_length]
                        required[field.required]
                        title=(field.rule)
                        class=(FORM_TEXT_INPUT_STYLE);
                }
            }

            (field_error(field, error))
        }
    }
}

/// Render a drop down list for `field` with `options`, marking `selected`.
///
/// When the field refreshes its dependents, changing the selection fetches
/// fresh options from `options_endpoint` and swaps them into `#cascade-fields`.
pub fn select_field(
    field: &FieldSchema,
    options: &[SelectOption],
    selected: Option<DatabaseId>,
    error: Option<&str>,
    options_endpoint: Option<&str>,
) -> Markup {
    let hx_get = options_endpoint.filter(|_| field.refreshes_dependents);
    let placeholder = format!("Select a {}", field.label.to_lowercase());

    html! {
        div
        {
            label for=(field.name) class=(FORM_LABEL_STYLE) { (field.label) }

            select
                name=(field.name)
                id=(field.name)
                required[field.required]
                hx-get=[hx_get]
                hx-trigger=[hx_get.map(|_| "change")]
                hx-target=[hx_get.map(|_| "#cascade-fields")]
                hx-swap=[hx_get.map(|_| "outerHTML")]
                hx-include=[hx_get.map(|_| "closest form")]
                class=(FORM_TEXT_INPUT_STYLE)
            {
                option value="" { (placeholder) }

                @for choice in options {
                    option value=(choice.id) selected[Some(choice.id) == selected] { (choice.label) }
                }
            }

            (field_error(field, error))
        }
    }
}

fn field_error(field: &FieldSchema, error: Option<&str>) -> Markup {
    html! {
        @if let Some(error) = error {
            p class=(FORM_FIELD_ERROR_STYLE) data-field=(field.name) { (error) }
        }
    }
}
