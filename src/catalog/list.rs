//! The catalogs page listing every status, type, category and subcategory.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    catalog::{CatalogEntry, CatalogKind, get_catalog_entries},
    database_id::DatabaseId,
    endpoints::{self, format_catalog_endpoint},
    html::{
        BADGE_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE,
        TABLE_ROW_STYLE, base, edit_delete_action_links,
    },
    navigation::NavBar,
};

/// The state needed for the catalogs page.
#[derive(Debug, Clone)]
pub struct CatalogsPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CatalogsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A catalog entry with everything needed to render its table row.
struct CatalogRow {
    entry: CatalogEntry,
    parent_name: Option<String>,
    transaction_count: u32,
}

/// All the rows for one catalog.
struct CatalogSection {
    kind: CatalogKind,
    rows: Vec<CatalogRow>,
}

/// Render the catalogs page.
pub async fn get_catalogs_page(State(state): State<CatalogsPageState>) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let mut entries_by_kind = HashMap::new();
    for kind in CatalogKind::ALL {
        let entries = get_catalog_entries(kind, &connection)
            .inspect_err(|error| tracing::error!("could not get {kind} entries: {error}"))?;
        entries_by_kind.insert(kind, entries);
    }

    let mut sections = Vec::with_capacity(CatalogKind::ALL.len());
    for kind in CatalogKind::ALL {
        let transaction_counts = count_transactions_per_entry(kind, &connection)
            .inspect_err(|error| {
                tracing::error!("could not count transactions per {kind}: {error}")
            })?;

        let parent_names: HashMap<DatabaseId, &str> = kind
            .parent()
            .and_then(|parent_kind| entries_by_kind.get(&parent_kind))
            .map(|parents| {
                parents
                    .iter()
                    .map(|parent| (parent.id, parent.name.as_ref()))
                    .collect()
            })
            .unwrap_or_default();

        let rows = entries_by_kind
            .get(&kind)
            .map(|entries| entries.as_slice())
            .unwrap_or_default()
            .iter()
            .map(|entry| CatalogRow {
                parent_name: entry
                    .parent_id
                    .and_then(|parent_id| parent_names.get(&parent_id))
                    .map(|name| name.to_string()),
                transaction_count: transaction_counts.get(&entry.id).copied().unwrap_or(0),
                entry: entry.clone(),
            })
            .collect();

        sections.push(CatalogSection { kind, rows });
    }

    Ok(catalogs_view(&sections).into_response())
}

fn count_transactions_per_entry(
    kind: CatalogKind,
    connection: &Connection,
) -> Result<HashMap<DatabaseId, u32>, Error> {
    let column = kind.reference_column();

    let result: Result<HashMap<DatabaseId, u32>, rusqlite::Error> = connection
        .prepare(&format!(
            "SELECT {column}, COUNT(1) FROM \"transaction\" WHERE {column} IS NOT NULL GROUP BY {column}"
        ))?
        .query_map((), |row| {
            let id = row.get(0)?;
            let count = row.get(1)?;

            Ok((id, count))
        })?
        .collect();

    result.map_err(Error::from)
}

fn confirm_message(kind: CatalogKind, row: &CatalogRow) -> String {
    let dependents = match kind.child() {
        Some(child) => format!(
            " Its {} will also be deleted.",
            child.plural_title().to_lowercase()
        ),
        None => String::new(),
    };

    format!(
        "Are you sure you want to delete '{}'? It will be cleared from {} transaction(s).{dependents}",
        row.entry.name, row.transaction_count
    )
}

fn catalogs_view(sections: &[CatalogSection]) -> Markup {
    let nav_bar = NavBar::new(endpoints::CATALOGS_VIEW).into_html();

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full lg:max-w-5xl space-y-8"
            {
                h1 class="text-xl font-bold" { "Catalogs" }

                @for section in sections {
                    (catalog_section_view(section))
                }
            }
        }
    );

    base("Catalogs", &content)
}

fn catalog_section_view(section: &CatalogSection) -> Markup {
    let kind = section.kind;
    let new_entry_url = format_catalog_endpoint(endpoints::NEW_CATALOG_ENTRY_VIEW, kind, None);
    let parent_title = kind.parent().map(CatalogKind::title);
    let column_count = if parent_title.is_some() { 4 } else { 3 };

    let table_row = |row: &CatalogRow| {
        let edit_url =
            format_catalog_endpoint(endpoints::EDIT_CATALOG_ENTRY_VIEW, kind, Some(row.entry.id));
        let delete_url =
            format_catalog_endpoint(endpoints::CATALOG_ENTRY, kind, Some(row.entry.id));

        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                td class=(TABLE_CELL_STYLE)
                {
                    span class=(BADGE_STYLE) { (row.entry.name) }
                }

                @if parent_title.is_some() {
                    td class=(TABLE_CELL_STYLE)
                    {
                        (row.parent_name.as_deref().unwrap_or_default())
                    }
                }

                td class=(TABLE_CELL_STYLE) { (row.transaction_count) }

                td class=(TABLE_CELL_STYLE)
                {
                    div class="flex gap-4"
                    {
                        (edit_delete_action_links(
                            &edit_url,
                            &delete_url,
                            &confirm_message(kind, row),
                            "closest tr",
                            "delete",
                        ))
                    }
                }
            }
        )
    };

    html!(
        section id=(kind.slug()) class="space-y-4 dark:bg-gray-800"
        {
            header class="flex justify-between flex-wrap items-end"
            {
                h2 class="text-lg font-semibold" { (kind.plural_title()) }

                a href=(new_entry_url) class=(LINK_STYLE)
                {
                    "Create " (kind.title())
                }
            }

            table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Name" }

                        @if let Some(parent_title) = parent_title {
                            th scope="col" class=(TABLE_CELL_STYLE) { (parent_title) }
                        }

                        th scope="col" class=(TABLE_CELL_STYLE) { "Transactions" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                    }
                }

                tbody
                {
                    @for row in &section.rows {
                        (table_row(row))
                    }

                    @if section.rows.is_empty() {
                        tr
                        {
                            td
                                colspan=(column_count)
                                class="px-6 py-4 text-center text-gray-500 dark:text-gray-400"
                            {
                                "No " (kind.plural_title().to_lowercase()) " created yet."
                            }
                        }
                    }
                }
            }
        }
    )
}
