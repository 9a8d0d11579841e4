//! The form shared by the catalog entry create and edit pages.

use std::collections::HashMap;

use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    Error,
    catalog::{CatalogKind, get_catalog_entries},
    database_id::DatabaseId,
    endpoints::{self, format_catalog_endpoint},
    form_schema::{InputKind, SelectOption, input_field, select_field},
    html::BUTTON_PRIMARY_STYLE,
    validation::ValidationErrors,
};

/// Whether the form creates a new entry or updates an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum FormAction {
    Create,
    Update(DatabaseId),
}

/// The values to pre-fill the form with.
#[derive(Debug, Default)]
pub(super) struct CatalogFormValues<'a> {
    pub name: Option<&'a str>,
    pub parent_id: Option<DatabaseId>,
}

/// The options for the parent select of a `kind` entry.
///
/// Categories are labelled with their type so that categories with the same
/// name under different types can be told apart.
pub(super) fn parent_options(
    kind: CatalogKind,
    connection: &Connection,
) -> Result<Vec<SelectOption>, Error> {
    let Some(parent_kind) = kind.parent() else {
        return Ok(Vec::new());
    };

    let grandparent_names = match parent_kind.parent() {
        Some(grandparent_kind) => get_catalog_entries(grandparent_kind, connection)?
            .into_iter()
            .map(|entry| (entry.id, entry.name.to_string()))
            .collect(),
        None => HashMap::new(),
    };

    let options = get_catalog_entries(parent_kind, connection)?
        .into_iter()
        .map(|entry| {
            let label = match entry
                .parent_id
                .and_then(|parent_id| grandparent_names.get(&parent_id))
            {
                Some(grandparent_name) => format!("{grandparent_name} / {}", entry.name),
                None => entry.name.to_string(),
            };

            SelectOption {
                id: entry.id,
                label,
            }
        })
        .collect();

    Ok(options)
}

pub(super) fn catalog_form_view(
    kind: CatalogKind,
    action: FormAction,
    values: &CatalogFormValues,
    parent_options: &[SelectOption],
    errors: &ValidationErrors,
) -> Markup {
    let (hx_post, hx_put, submit_label) = match action {
        FormAction::Create => (
            Some(format_catalog_endpoint(
                endpoints::POST_CATALOG_ENTRY,
                kind,
                None,
            )),
            None,
            format!("Create {}", kind.title()),
        ),
        FormAction::Update(id) => (
            None,
            Some(format_catalog_endpoint(
                endpoints::CATALOG_ENTRY,
                kind,
                Some(id),
            )),
            format!("Update {}", kind.title()),
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
            @for field in kind.form_fields() {
                @if field.input == InputKind::Select {
                    (select_field(
                        field,
                        parent_options,
                        values.parent_id,
                        errors.for_field(field.name),
                        None,
                    ))
                } @else {
                    (input_field(field, values.name, errors.for_field(field.name)))
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { (submit_label) }
        }
    }
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use scraper::{Html, Selector};

    use crate::{
        catalog::{CatalogKind, CatalogName, NewCatalogEntry, create_catalog_entry},
        db::initialize,
        validation::ValidationErrors,
    };

    use super::{CatalogFormValues, FormAction, catalog_form_view, parent_options};

    #[test]
    fn subcategory_parents_are_labelled_with_type() {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let expenses = create_catalog_entry(
            CatalogKind::Type,
            NewCatalogEntry::new(CatalogName::new_unchecked("Expenses")),
            &connection,
        )
        .unwrap();
        let rent = create_catalog_entry(
            CatalogKind::Category,
            NewCatalogEntry::new(CatalogName::new_unchecked("Rent")).parent_id(expenses.id),
            &connection,
        )
        .unwrap();

        let options = parent_options(CatalogKind::Subcategory, &connection).unwrap();

        assert_eq!(options.len(), 1);
        assert_eq!(options[0].id, rent.id);
        assert_eq!(options[0].label, "Expenses / Rent");
        assert_eq!(parent_options(CatalogKind::Status, &connection), Ok(vec![]));
    }

    #[test]
    fn update_form_puts_to_entry() {
        let markup = catalog_form_view(
            CatalogKind::Type,
            FormAction::Update(4),
            &CatalogFormValues {
                name: Some("Income"),
                parent_id: None,
            },
            &[],
            &ValidationErrors::new(),
        );

        let html = Html::parse_fragment(&markup.into_string());
        let form = html
            .select(&Selector::parse("form").unwrap())
            .next()
            .expect("No form found");
        assert_eq!(form.value().attr("hx-put"), Some("/api/catalogs/types/4"));
        assert_eq!(form.value().attr("hx-post"), None);
        assert_eq!(
            html.select(&Selector::parse("select").unwrap()).count(),
            0,
            "types have no parent select"
        );
    }
}
