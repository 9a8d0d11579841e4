use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use cashflow_rs::{
    DatabaseId,
    catalog::{CatalogKind, CatalogName, NewCatalogEntry, create_catalog_entry},
    initialize_db,
    transaction::{Transaction, create_transaction},
};

/// A utility for creating a test database for the web server of cashflow_rs.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// The number of transactions to create.
    #[arg(long, short, default_value_t = 60)]
    transactions: u32,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating catalogs...");
    let statuses = vec![
        create_entry(CatalogKind::Status, "Paid", None, &conn)?,
        create_entry(CatalogKind::Status, "Pending", None, &conn)?,
    ];

    let income = create_entry(CatalogKind::Type, "Income", None, &conn)?;
    let expenses = create_entry(CatalogKind::Type, "Expenses", None, &conn)?;
    let salary = create_entry(CatalogKind::Category, "Salary", Some(income), &conn)?;
    let housing = create_entry(CatalogKind::Category, "Housing", Some(expenses), &conn)?;
    let food = create_entry(CatalogKind::Category, "Food", Some(expenses), &conn)?;
    let rent = create_entry(CatalogKind::Subcategory, "Rent", Some(housing), &conn)?;
    let power = create_entry(CatalogKind::Subcategory, "Power", Some(housing), &conn)?;
    let groceries = create_entry(CatalogKind::Subcategory, "Groceries", Some(food), &conn)?;
    let takeaways = create_entry(CatalogKind::Subcategory, "Takeaways", Some(food), &conn)?;

    // (type, category, subcategory, base amount, comment)
    let templates = [
        (income, salary, None, 4200, Some("Monthly pay")),
        (expenses, housing, Some(rent), 1800, Some("Rent")),
        (expenses, housing, Some(power), 150, Some("Power bill")),
        (expenses, food, Some(groceries), 220, Some("Weekly shop")),
        (expenses, food, Some(takeaways), 35, None),
    ];

    println!("Creating {} transactions...", args.transactions);
    let today = OffsetDateTime::now_utc().date();

    for i in 0..args.transactions {
        let (type_id, category_id, subcategory_id, base_amount, comment) =
            templates[i as usize % templates.len()];
        let date = today - Duration::days(i64::from(i) * 3);
        let amount = base_amount + (i * 7) % 50;

        let mut transaction = Transaction::build(amount, date)
            .status_id(Some(statuses[i as usize % statuses.len()]))
            .type_id(Some(type_id))
            .category_id(Some(category_id))
            .subcategory_id(subcategory_id);
        if let Some(comment) = comment {
            transaction = transaction.comment(comment);
        }

        create_transaction(transaction, &conn)?;
    }

    println!("Success!");

    Ok(())
}

fn create_entry(
    kind: CatalogKind,
    name: &str,
    parent_id: Option<DatabaseId>,
    conn: &Connection,
) -> Result<DatabaseId, cashflow_rs::Error> {
    let mut entry = NewCatalogEntry::new(CatalogName::new_unchecked(name));
    if let Some(parent_id) = parent_id {
        entry = entry.parent_id(parent_id);
    }

    create_catalog_entry(kind, entry, conn).map(|entry| entry.id)
}
