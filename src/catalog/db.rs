//! Database operations for the four catalogs.

use rusqlite::{Connection, OptionalExtension, Row};

use crate::{
    Error,
    catalog::{CatalogEntry, CatalogFormData, CatalogKind, CatalogName, NewCatalogEntry},
    cascade::parse_id,
    database_id::DatabaseId,
    error::Record,
    validation::ValidationErrors,
};

/// Create an entry in the `kind` catalog and return it with its generated ID.
///
/// # Errors
/// Returns [Error::Conflict] if an entry with the same name already exists
/// under the same parent.
pub fn create_catalog_entry(
    kind: CatalogKind,
    entry: NewCatalogEntry,
    connection: &Connection,
) -> Result<CatalogEntry, Error> {
    let result = match kind.parent_column() {
        Some(parent_column) => connection.execute(
            &format!(
                "INSERT INTO {} (name, {parent_column}) VALUES (?1, ?2);",
                kind.table()
            ),
            (entry.name.as_ref(), entry.parent_id),
        ),
        None => connection.execute(
            &format!("INSERT INTO {} (name) VALUES (?1);", kind.table()),
            (entry.name.as_ref(),),
        ),
    };
    result.map_err(|error| map_unique_error(kind, &entry.name, error))?;

    let id = connection.last_insert_rowid();

    Ok(CatalogEntry {
        id,
        name: entry.name,
        parent_id: entry.parent_id,
    })
}

/// Retrieve a single catalog entry by ID.
pub fn get_catalog_entry(
    kind: CatalogKind,
    id: DatabaseId,
    connection: &Connection,
) -> Result<CatalogEntry, Error> {
    connection
        .prepare(&format!("{} WHERE id = :id;", select_sql(kind)))?
        .query_row(&[(":id", &id)], map_row)
        .map_err(|error| error.into())
}

/// Retrieve every entry in the `kind` catalog ordered alphabetically by name.
pub fn get_catalog_entries(
    kind: CatalogKind,
    connection: &Connection,
) -> Result<Vec<CatalogEntry>, Error> {
    connection
        .prepare(&format!("{} ORDER BY name ASC, id ASC;", select_sql(kind)))?
        .query_map([], map_row)?
        .map(|maybe_entry| maybe_entry.map_err(|error| error.into()))
        .collect()
}

/// Retrieve the entries of the child catalog of `kind` that belong to `parent_id`,
/// ordered alphabetically by name.
///
/// Returns an empty list for catalogs without children.
pub fn get_children(
    kind: CatalogKind,
    parent_id: DatabaseId,
    connection: &Connection,
) -> Result<Vec<CatalogEntry>, Error> {
    let Some(child) = kind.child() else {
        return Ok(Vec::new());
    };
    let Some(parent_column) = child.parent_column() else {
        return Ok(Vec::new());
    };

    connection
        .prepare(&format!(
            "{} WHERE {parent_column} = :parent_id ORDER BY name ASC, id ASC;",
            select_sql(child)
        ))?
        .query_map(&[(":parent_id", &parent_id)], map_row)?
        .map(|maybe_entry| maybe_entry.map_err(|error| error.into()))
        .collect()
}

/// Update a catalog entry's name and parent. Returns an error if the entry doesn't exist.
pub fn update_catalog_entry(
    kind: CatalogKind,
    id: DatabaseId,
    entry: NewCatalogEntry,
    connection: &Connection,
) -> Result<CatalogEntry, Error> {
    let result = match kind.parent_column() {
        Some(parent_column) => connection.execute(
            &format!(
                "UPDATE {} SET name = ?1, {parent_column} = ?2 WHERE id = ?3;",
                kind.table()
            ),
            (entry.name.as_ref(), entry.parent_id, id),
        ),
        None => connection.execute(
            &format!("UPDATE {} SET name = ?1 WHERE id = ?2;", kind.table()),
            (entry.name.as_ref(), id),
        ),
    };
    let rows_affected = result.map_err(|error| map_unique_error(kind, &entry.name, error))?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissing(Record::Catalog(kind)));
    }

    Ok(CatalogEntry {
        id,
        name: entry.name,
        parent_id: entry.parent_id,
    })
}

/// Delete a catalog entry by ID. Returns an error if the entry doesn't exist.
///
/// Deleting a type also deletes its categories, and deleting a category also
/// deletes its subcategories. Transactions that referenced a deleted entry
/// keep existing with that reference cleared.
pub fn delete_catalog_entry(
    kind: CatalogKind,
    id: DatabaseId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        &format!("DELETE FROM {} WHERE id = ?1;", kind.table()),
        [id],
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissing(Record::Catalog(kind)));
    }

    Ok(())
}

/// Check a catalog form and turn it into a [NewCatalogEntry].
///
/// Every problem with the form is collected before returning. `existing_id`
/// is the ID of the entry being updated, which is ignored when checking for
/// duplicate names. Moving an existing entry to a new parent is rejected
/// while transactions that use it are labelled with a different parent.
///
/// # Errors
/// Returns [Error::Validation] listing each invalid field, or an SQL error if
/// the database could not be queried.
pub fn validate_catalog_entry(
    kind: CatalogKind,
    form: &CatalogFormData,
    existing_id: Option<DatabaseId>,
    connection: &Connection,
) -> Result<NewCatalogEntry, Error> {
    let mut errors = ValidationErrors::new();

    let name = CatalogName::new(&form.name)
        .map_err(|error| errors.extend([error]))
        .ok();

    let parent_id = match (kind.parent(), kind.parent_column()) {
        (Some(parent_kind), Some(parent_field)) => {
            match form.parent_value(kind).map(str::trim) {
                None | Some("") => {
                    errors.add(parent_field, format!("{parent_kind} is required"));
                    None
                }
                Some(raw) => match parse_id(raw) {
                    Err(_) => {
                        errors.add(parent_field, format!("\"{raw}\" is not a valid ID"));
                        None
                    }
                    Ok(parent_id) => {
                        if entry_exists(parent_kind, parent_id, connection)? {
                            Some(parent_id)
                        } else {
                            errors.add(parent_field, format!("{parent_kind} does not exist"));
                            None
                        }
                    }
                },
            }
        }
        _ => None,
    };

    if let (Some(parent_kind), Some(parent_field), Some(id), Some(parent_id)) =
        (kind.parent(), kind.parent_column(), existing_id, parent_id)
    {
        let stranded = count_stranded_transactions(kind, id, parent_id, connection)?;

        if stranded > 0 {
            errors.add(
                parent_field,
                format!("{stranded} transaction(s) use this {kind} with a different {parent_kind}"),
            );
        }
    }

    if let Some(name) = &name {
        let parent_is_valid = kind.parent().is_none() || parent_id.is_some();

        if parent_is_valid && name_taken(kind, name, parent_id, existing_id, connection)? {
            let reason = match kind.parent() {
                Some(parent_kind) => {
                    format!("a {kind} with this name already exists for this {parent_kind}")
                }
                None => format!("a {kind} with this name already exists"),
            };
            errors.add("name", reason);
        }
    }

    match name {
        Some(name) if errors.is_empty() => Ok(NewCatalogEntry { name, parent_id }),
        _ => Err(Error::Validation(errors)),
    }
}

/// Whether an entry with `id` exists in the `kind` catalog.
pub fn entry_exists(
    kind: CatalogKind,
    id: DatabaseId,
    connection: &Connection,
) -> Result<bool, Error> {
    let found: Option<i64> = connection
        .query_row(
            &format!("SELECT 1 FROM {} WHERE id = ?1;", kind.table()),
            [id],
            |row| row.get(0),
        )
        .optional()?;

    Ok(found.is_some())
}

/// The number of transactions labelled with the `kind` entry `id` whose
/// parent label is set to something other than `parent_id`.
fn count_stranded_transactions(
    kind: CatalogKind,
    id: DatabaseId,
    parent_id: DatabaseId,
    connection: &Connection,
) -> Result<u32, Error> {
    let Some(parent_column) = kind.parent_column() else {
        return Ok(0);
    };

    // Transactions without a parent label are not checked for consistency.
    connection
        .query_row(
            &format!(
                "SELECT COUNT(*) FROM \"transaction\" WHERE {} = ?1 AND {parent_column} <> ?2;",
                kind.reference_column()
            ),
            (id, parent_id),
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

fn name_taken(
    kind: CatalogKind,
    name: &CatalogName,
    parent_id: Option<DatabaseId>,
    existing_id: Option<DatabaseId>,
    connection: &Connection,
) -> Result<bool, Error> {
    // Comparing with IS treats two NULL parents as equal.
    let parent_clause = kind
        .parent_column()
        .map(|column| format!(" AND {column} IS ?2"))
        .unwrap_or_default();

    let found: Option<DatabaseId> = connection
        .query_row(
            &format!(
                "SELECT id FROM {} WHERE name = ?1{parent_clause} AND id IS NOT ?3 LIMIT 1;",
                kind.table()
            ),
            (name.as_ref(), parent_id, existing_id),
            |row| row.get(0),
        )
        .optional()?;

    Ok(found.is_some())
}

/// Create the four catalog tables.
///
/// Categories are deleted with their type and subcategories are deleted with
/// their category.
pub fn create_catalog_tables(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS status_action (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE
        );

        CREATE TABLE IF NOT EXISTS type_action (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE
        );

        CREATE TABLE IF NOT EXISTS category_action (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            type_id INTEGER NOT NULL,
            UNIQUE(type_id, name),
            FOREIGN KEY(type_id) REFERENCES type_action(id) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE TABLE IF NOT EXISTS subcategory_action (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            category_id INTEGER NOT NULL,
            UNIQUE(category_id, name),
            FOREIGN KEY(category_id) REFERENCES category_action(id) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_category_action_type ON category_action(type_id);
        CREATE INDEX IF NOT EXISTS idx_subcategory_action_category ON subcategory_action(category_id);",
    )?;

    Ok(())
}

fn select_sql(kind: CatalogKind) -> String {
    format!(
        "SELECT id, name, {} FROM {}",
        kind.parent_column().unwrap_or("NULL"),
        kind.table()
    )
}

fn map_row(row: &Row) -> Result<CatalogEntry, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_name: String = row.get(1)?;
    let name = CatalogName::new_unchecked(&raw_name);
    let parent_id = row.get(2)?;

    Ok(CatalogEntry {
        id,
        name,
        parent_id,
    })
}

fn map_unique_error(kind: CatalogKind, name: &CatalogName, error: rusqlite::Error) -> Error {
    match error {
        rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error {
                code: _,
                extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
            },
            _,
        ) => {
            tracing::warn!("duplicate {kind} name \"{name}\" rejected by the database");
            Error::Conflict(format!("a {kind} named \"{name}\" already exists"))
        }
        error => error.into(),
    }
}

#[cfg(test)]
mod catalog_query_tests {
    use std::collections::HashSet;

    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        catalog::{
            CatalogFormData, CatalogKind, CatalogName, NewCatalogEntry, create_catalog_entry,
            delete_catalog_entry, get_catalog_entries, get_catalog_entry, get_children,
            update_catalog_entry, validate_catalog_entry,
        },
        db::initialize,
        error::Record,
        transaction::{Transaction, create_transaction, delete_transaction},
    };

    fn get_test_db_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).expect("Could not initialize database");
        connection
    }

    fn name(raw: &str) -> CatalogName {
        CatalogName::new_unchecked(raw)
    }

    #[test]
    fn create_entry_succeeds() {
        let connection = get_test_db_connection();

        let entry = create_catalog_entry(
            CatalogKind::Status,
            NewCatalogEntry::new(name("Paid")),
            &connection,
        )
        .expect("Could not create status");

        assert!(entry.id > 0);
        assert_eq!(entry.name, name("Paid"));
        assert_eq!(entry.parent_id, None);
    }

    #[test]
    fn get_entry_succeeds() {
        let connection = get_test_db_connection();
        let income = create_catalog_entry(
            CatalogKind::Type,
            NewCatalogEntry::new(name("Income")),
            &connection,
        )
        .unwrap();
        let salary = create_catalog_entry(
            CatalogKind::Category,
            NewCatalogEntry::new(name("Salary")).parent_id(income.id),
            &connection,
        )
        .unwrap();

        let got = get_catalog_entry(CatalogKind::Category, salary.id, &connection);

        assert_eq!(got, Ok(salary));
    }

    #[test]
    fn get_entry_with_invalid_id_returns_not_found() {
        let connection = get_test_db_connection();

        let got = get_catalog_entry(CatalogKind::Subcategory, 42, &connection);

        assert_eq!(got, Err(Error::NotFound));
    }

    #[test]
    fn get_entries_returns_only_that_catalog() {
        let connection = get_test_db_connection();
        let want = HashSet::from([
            create_catalog_entry(
                CatalogKind::Type,
                NewCatalogEntry::new(name("Income")),
                &connection,
            )
            .unwrap(),
            create_catalog_entry(
                CatalogKind::Type,
                NewCatalogEntry::new(name("Expenses")),
                &connection,
            )
            .unwrap(),
        ]);
        create_catalog_entry(
            CatalogKind::Status,
            NewCatalogEntry::new(name("Paid")),
            &connection,
        )
        .unwrap();

        let got = get_catalog_entries(CatalogKind::Type, &connection).unwrap();

        assert_eq!(got.first().map(|entry| entry.name.as_ref()), Some("Expenses"));
        assert_eq!(HashSet::from_iter(got), want);
    }

    #[test]
    fn get_children_returns_direct_children_only() {
        let connection = get_test_db_connection();
        let income = create_catalog_entry(
            CatalogKind::Type,
            NewCatalogEntry::new(name("Income")),
            &connection,
        )
        .unwrap();
        let expenses = create_catalog_entry(
            CatalogKind::Type,
            NewCatalogEntry::new(name("Expenses")),
            &connection,
        )
        .unwrap();
        let salary = create_catalog_entry(
            CatalogKind::Category,
            NewCatalogEntry::new(name("Salary")).parent_id(income.id),
            &connection,
        )
        .unwrap();
        create_catalog_entry(
            CatalogKind::Category,
            NewCatalogEntry::new(name("Rent")).parent_id(expenses.id),
            &connection,
        )
        .unwrap();

        let got = get_children(CatalogKind::Type, income.id, &connection).unwrap();

        assert_eq!(got, vec![salary]);
        assert_eq!(
            get_children(CatalogKind::Status, income.id, &connection),
            Ok(vec![])
        );
    }

    #[test]
    fn update_entry_succeeds() {
        let connection = get_test_db_connection();
        let status = create_catalog_entry(
            CatalogKind::Status,
            NewCatalogEntry::new(name("Planned")),
            &connection,
        )
        .unwrap();

        update_catalog_entry(
            CatalogKind::Status,
            status.id,
            NewCatalogEntry::new(name("Done")),
            &connection,
        )
        .expect("Could not update status");

        let got = get_catalog_entry(CatalogKind::Status, status.id, &connection).unwrap();
        assert_eq!(got.name, name("Done"));
    }

    #[test]
    fn update_entry_with_invalid_id_returns_error() {
        let connection = get_test_db_connection();

        let result = update_catalog_entry(
            CatalogKind::Type,
            999,
            NewCatalogEntry::new(name("Other")),
            &connection,
        );

        assert_eq!(
            result,
            Err(Error::UpdateMissing(Record::Catalog(CatalogKind::Type)))
        );
    }

    #[test]
    fn delete_entry_with_invalid_id_returns_error() {
        let connection = get_test_db_connection();

        let result = delete_catalog_entry(CatalogKind::Status, 999, &connection);

        assert_eq!(
            result,
            Err(Error::DeleteMissing(Record::Catalog(CatalogKind::Status)))
        );
    }

    #[test]
    fn deleting_type_cascades_to_categories_and_subcategories() {
        let connection = get_test_db_connection();
        let expenses = create_catalog_entry(
            CatalogKind::Type,
            NewCatalogEntry::new(name("Expenses")),
            &connection,
        )
        .unwrap();
        let rent = create_catalog_entry(
            CatalogKind::Category,
            NewCatalogEntry::new(name("Rent")).parent_id(expenses.id),
            &connection,
        )
        .unwrap();
        let utilities = create_catalog_entry(
            CatalogKind::Subcategory,
            NewCatalogEntry::new(name("Utilities")).parent_id(rent.id),
            &connection,
        )
        .unwrap();

        delete_catalog_entry(CatalogKind::Type, expenses.id, &connection)
            .expect("Could not delete type");

        assert_eq!(
            get_catalog_entry(CatalogKind::Category, rent.id, &connection),
            Err(Error::NotFound)
        );
        assert_eq!(
            get_catalog_entry(CatalogKind::Subcategory, utilities.id, &connection),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn duplicate_insert_is_a_conflict() {
        let connection = get_test_db_connection();
        create_catalog_entry(
            CatalogKind::Status,
            NewCatalogEntry::new(name("Paid")),
            &connection,
        )
        .unwrap();

        let result = create_catalog_entry(
            CatalogKind::Status,
            NewCatalogEntry::new(name("Paid")),
            &connection,
        );

        assert!(matches!(result, Err(Error::Conflict(_))));
    }

    #[test]
    fn validate_collects_every_error() {
        let connection = get_test_db_connection();
        let form = CatalogFormData {
            name: "   ".to_owned(),
            type_id: Some("abc".to_owned()),
            category_id: None,
        };

        let result = validate_catalog_entry(CatalogKind::Category, &form, None, &connection);

        let Err(Error::Validation(errors)) = result else {
            panic!("want validation error");
        };
        assert_eq!(errors.for_field("name"), Some("name cannot be empty"));
        assert_eq!(errors.for_field("type_id"), Some("\"abc\" is not a valid ID"));
    }

    #[test]
    fn validate_rejects_missing_and_unknown_parent() {
        let connection = get_test_db_connection();

        let missing = validate_catalog_entry(
            CatalogKind::Subcategory,
            &CatalogFormData {
                name: "Power".to_owned(),
                ..Default::default()
            },
            None,
            &connection,
        );
        let unknown = validate_catalog_entry(
            CatalogKind::Subcategory,
            &CatalogFormData {
                name: "Power".to_owned(),
                category_id: Some("12".to_owned()),
                ..Default::default()
            },
            None,
            &connection,
        );

        let Err(Error::Validation(missing)) = missing else {
            panic!("want validation error");
        };
        assert_eq!(missing.for_field("category_id"), Some("category is required"));
        let Err(Error::Validation(unknown)) = unknown else {
            panic!("want validation error");
        };
        assert_eq!(
            unknown.for_field("category_id"),
            Some("category does not exist")
        );
    }

    #[test]
    fn validate_rejects_duplicate_name() {
        let connection = get_test_db_connection();
        create_catalog_entry(
            CatalogKind::Type,
            NewCatalogEntry::new(name("Income")),
            &connection,
        )
        .unwrap();

        let result = validate_catalog_entry(
            CatalogKind::Type,
            &CatalogFormData {
                name: " Income ".to_owned(),
                ..Default::default()
            },
            None,
            &connection,
        );

        let Err(Error::Validation(errors)) = result else {
            panic!("want validation error");
        };
        assert_eq!(
            errors.for_field("name"),
            Some("a type with this name already exists")
        );
    }

    #[test]
    fn validate_allows_same_name_under_different_parents() {
        let connection = get_test_db_connection();
        let income = create_catalog_entry(
            CatalogKind::Type,
            NewCatalogEntry::new(name("Income")),
            &connection,
        )
        .unwrap();
        let expenses = create_catalog_entry(
            CatalogKind::Type,
            NewCatalogEntry::new(name("Expenses")),
            &connection,
        )
        .unwrap();
        create_catalog_entry(
            CatalogKind::Category,
            NewCatalogEntry::new(name("Other")).parent_id(income.id),
            &connection,
        )
        .unwrap();

        let result = validate_catalog_entry(
            CatalogKind::Category,
            &CatalogFormData {
                name: "Other".to_owned(),
                type_id: Some(expenses.id.to_string()),
                ..Default::default()
            },
            None,
            &connection,
        );

        assert_eq!(
            result,
            Ok(NewCatalogEntry::new(name("Other")).parent_id(expenses.id))
        );
    }

    #[test]
    fn validate_ignores_own_name_on_update() {
        let connection = get_test_db_connection();
        let paid = create_catalog_entry(
            CatalogKind::Status,
            NewCatalogEntry::new(name("Paid")),
            &connection,
        )
        .unwrap();

        let result = validate_catalog_entry(
            CatalogKind::Status,
            &CatalogFormData {
                name: "Paid".to_owned(),
                ..Default::default()
            },
            Some(paid.id),
            &connection,
        );

        assert_eq!(result, Ok(NewCatalogEntry::new(name("Paid"))));
    }

    #[test]
    fn validate_rejects_moving_category_used_by_transactions() {
        let connection = get_test_db_connection();
        let income = create_catalog_entry(
            CatalogKind::Type,
            NewCatalogEntry::new(name("Income")),
            &connection,
        )
        .unwrap();
        let expenses = create_catalog_entry(
            CatalogKind::Type,
            NewCatalogEntry::new(name("Expenses")),
            &connection,
        )
        .unwrap();
        let rent = create_catalog_entry(
            CatalogKind::Category,
            NewCatalogEntry::new(name("Rent")).parent_id(expenses.id),
            &connection,
        )
        .unwrap();
        let transaction = create_transaction(
            Transaction::build(400, date!(2025 - 02 - 01))
                .type_id(Some(expenses.id))
                .category_id(Some(rent.id)),
            &connection,
        )
        .unwrap();
        let form = CatalogFormData {
            name: "Rent".to_owned(),
            type_id: Some(income.id.to_string()),
            ..Default::default()
        };

        let result =
            validate_catalog_entry(CatalogKind::Category, &form, Some(rent.id), &connection);

        match result {
            Err(Error::Validation(errors)) => assert_eq!(
                errors.for_field("type_id"),
                Some("1 transaction(s) use this category with a different type")
            ),
            other => panic!("want validation error, got {other:?}"),
        }
        assert_eq!(
            get_catalog_entry(CatalogKind::Category, rent.id, &connection)
                .unwrap()
                .parent_id,
            Some(expenses.id)
        );

        delete_transaction(transaction.id, &connection).unwrap();
        let result =
            validate_catalog_entry(CatalogKind::Category, &form, Some(rent.id), &connection);

        assert_eq!(
            result,
            Ok(NewCatalogEntry::new(name("Rent")).parent_id(income.id))
        );
    }

    #[test]
    fn validate_rejects_moving_subcategory_used_by_transactions() {
        let connection = get_test_db_connection();
        let expenses = create_catalog_entry(
            CatalogKind::Type,
            NewCatalogEntry::new(name("Expenses")),
            &connection,
        )
        .unwrap();
        let rent = create_catalog_entry(
            CatalogKind::Category,
            NewCatalogEntry::new(name("Rent")).parent_id(expenses.id),
            &connection,
        )
        .unwrap();
        let food = create_catalog_entry(
            CatalogKind::Category,
            NewCatalogEntry::new(name("Food")).parent_id(expenses.id),
            &connection,
        )
        .unwrap();
        let utilities = create_catalog_entry(
            CatalogKind::Subcategory,
            NewCatalogEntry::new(name("Utilities")).parent_id(rent.id),
            &connection,
        )
        .unwrap();
        create_transaction(
            Transaction::build(120, date!(2025 - 02 - 01))
                .type_id(Some(expenses.id))
                .category_id(Some(rent.id))
                .subcategory_id(Some(utilities.id)),
            &connection,
        )
        .unwrap();

        let moved = validate_catalog_entry(
            CatalogKind::Subcategory,
            &CatalogFormData {
                name: "Utilities".to_owned(),
                category_id: Some(food.id.to_string()),
                ..Default::default()
            },
            Some(utilities.id),
            &connection,
        );
        let renamed = validate_catalog_entry(
            CatalogKind::Subcategory,
            &CatalogFormData {
                name: "Power".to_owned(),
                category_id: Some(rent.id.to_string()),
                ..Default::default()
            },
            Some(utilities.id),
            &connection,
        );

        assert!(matches!(
            moved,
            Err(Error::Validation(errors)) if errors.for_field("category_id").is_some()
        ));
        assert_eq!(
            renamed,
            Ok(NewCatalogEntry::new(name("Power")).parent_id(rent.id))
        );
    }
}
