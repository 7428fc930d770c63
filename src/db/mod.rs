// Database module - SQLite connection and models

pub mod models;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use once_cell::sync::Lazy;
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::info;

use crate::error::UpkeepError;
pub use models::{Asset, Category, Expense, ExpenseKind, RecurringInterval};

/// Get the default database path (~/.upkeep/data.db)
pub fn get_default_db_path() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    let upkeep_dir = PathBuf::from(home).join(".upkeep");

    // Create directory if it doesn't exist
    std::fs::create_dir_all(&upkeep_dir).context("Failed to create .upkeep directory")?;

    Ok(upkeep_dir.join("data.db"))
}

/// Open database connection
pub fn open_db(db_path: Option<PathBuf>) -> Result<Connection> {
    let path = db_path.unwrap_or(get_default_db_path()?);
    let conn = Connection::open(&path).context(format!("Failed to open database at {:?}", path))?;

    // Enable foreign keys
    conn.execute("PRAGMA foreign_keys = ON", [])
        .context("Failed to enable foreign keys")?;

    Ok(conn)
}

/// Initialize the database with schema and the default category tree
pub fn init_database(db_path: Option<PathBuf>) -> Result<()> {
    let path = db_path.unwrap_or(get_default_db_path()?);

    let conn = open_db(Some(path.clone()))?;

    let schema_sql = include_str!("schema.sql");
    conn.execute_batch(schema_sql)
        .context("Failed to execute schema")?;

    let seeded = seed_default_categories(&conn)?;
    if seeded > 0 {
        info!(
            "Initialized database at {:?} with {} default categories",
            path, seeded
        );
    }

    Ok(())
}

/// Default category tree seeded into an empty database
struct CategorySeed {
    name: &'static str,
    emoji: &'static str,
    subcategories: &'static [(&'static str, &'static str)],
}

static DEFAULT_CATEGORIES: Lazy<Vec<CategorySeed>> = Lazy::new(|| {
    vec![
        CategorySeed {
            name: "Electronics",
            emoji: "📱",
            subcategories: &[
                ("Phone", "📱"),
                ("Computer", "💻"),
                ("Tablet", "📟"),
                ("Headphones", "🎧"),
                ("Camera", "📷"),
            ],
        },
        CategorySeed {
            name: "Home",
            emoji: "🏠",
            subcategories: &[
                ("Furniture", "🪑"),
                ("Appliances", "🔌"),
                ("Kitchenware", "🍳"),
            ],
        },
        CategorySeed {
            name: "Vehicles",
            emoji: "🚗",
            subcategories: &[("Car", "🚗"), ("Bicycle", "🚲"), ("Motorcycle", "🏍️")],
        },
        CategorySeed {
            name: "Apparel",
            emoji: "👕",
            subcategories: &[("Clothes", "👔"), ("Shoes", "👟"), ("Bags", "👜")],
        },
        CategorySeed {
            name: "Entertainment",
            emoji: "🎮",
            subcategories: &[("Games", "🎮"), ("Sports", "⚽"), ("Instruments", "🎸")],
        },
        CategorySeed {
            name: "Other",
            emoji: "📦",
            subcategories: &[],
        },
    ]
});

/// Seed the default category tree into an empty categories table.
/// No-op when any category already exists. Returns the number of rows added.
pub fn seed_default_categories(conn: &Connection) -> Result<usize> {
    let existing: i64 = conn.query_row("SELECT COUNT(*) FROM categories", [], |row| row.get(0))?;
    if existing > 0 {
        return Ok(0);
    }

    let mut added = 0;
    for (order, seed) in DEFAULT_CATEGORIES.iter().enumerate() {
        let parent = Category {
            id: None,
            name: seed.name.to_string(),
            emoji: seed.emoji.to_string(),
            parent_id: None,
            sort_order: order as i64,
            created_at: Utc::now(),
        };
        let parent_id = insert_category(conn, &parent)?;
        added += 1;

        for (sub_order, (name, emoji)) in seed.subcategories.iter().enumerate() {
            let child = Category {
                id: None,
                name: (*name).to_string(),
                emoji: (*emoji).to_string(),
                parent_id: Some(parent_id),
                sort_order: sub_order as i64,
                created_at: Utc::now(),
            };
            insert_category(conn, &child)?;
            added += 1;
        }
    }

    Ok(added)
}

// ============ Categories ============

pub fn insert_category(conn: &Connection, category: &Category) -> Result<i64> {
    conn.execute(
        "INSERT INTO categories (name, emoji, parent_id, sort_order, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            category.name,
            category.emoji,
            category.parent_id,
            category.sort_order,
            category.created_at,
        ],
    )?;

    Ok(conn.last_insert_rowid())
}

fn category_from_row(row: &rusqlite::Row) -> rusqlite::Result<Category> {
    Ok(Category {
        id: Some(row.get(0)?),
        name: row.get(1)?,
        emoji: row.get(2)?,
        parent_id: row.get(3)?,
        sort_order: row.get(4)?,
        created_at: row.get(5)?,
    })
}

const CATEGORY_COLUMNS: &str = "id, name, emoji, parent_id, sort_order, created_at";

pub fn get_category(conn: &Connection, id: i64) -> Result<Option<Category>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM categories WHERE id = ?1",
        CATEGORY_COLUMNS
    ))?;
    let result = stmt.query_row([id], category_from_row).optional()?;
    Ok(result)
}

/// Look up a category by name, optionally scoped to a parent (subcategories
/// share names across parents, e.g. "Car" under "Vehicles").
pub fn get_category_by_name(
    conn: &Connection,
    name: &str,
    parent_id: Option<i64>,
) -> Result<Option<Category>> {
    let result = match parent_id {
        Some(pid) => {
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM categories WHERE name = ?1 COLLATE NOCASE AND parent_id = ?2",
                CATEGORY_COLUMNS
            ))?;
            stmt.query_row(params![name, pid], category_from_row)
                .optional()?
        }
        None => {
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM categories WHERE name = ?1 COLLATE NOCASE AND parent_id IS NULL",
                CATEGORY_COLUMNS
            ))?;
            stmt.query_row([name], category_from_row).optional()?
        }
    };
    Ok(result)
}

/// All categories as a flat tree: each parent directly followed by its
/// subcategories, each level in sort order
pub fn list_categories(conn: &Connection) -> Result<Vec<Category>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM categories
         ORDER BY COALESCE(parent_id, id), parent_id IS NOT NULL, sort_order, name",
        CATEGORY_COLUMNS
    ))?;
    let categories = stmt
        .query_map([], category_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(categories)
}

pub fn category_in_use(conn: &Connection, category_id: i64) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM assets WHERE category_id = ?1 OR subcategory_id = ?1",
        [category_id],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Delete a category and its subcategories. Refuses while any asset still
/// references the category or one of its children.
pub fn delete_category(conn: &Connection, id: i64) -> Result<()> {
    if category_in_use(conn, id)? {
        bail!("Category #{} is still referenced by assets", id);
    }
    let mut stmt = conn.prepare("SELECT id FROM categories WHERE parent_id = ?1")?;
    let children = stmt
        .query_map([id], |row| row.get::<_, i64>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    for child in children {
        if category_in_use(conn, child)? {
            bail!("Subcategory #{} is still referenced by assets", child);
        }
    }

    let affected = conn.execute("DELETE FROM categories WHERE id = ?1", [id])?;
    if affected == 0 {
        bail!("Category #{} not found", id);
    }
    Ok(())
}

// ============ Assets ============

pub fn insert_asset(conn: &Connection, asset: &Asset) -> Result<i64> {
    conn.execute(
        "INSERT INTO assets (name, category_id, subcategory_id, notes, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            asset.name,
            asset.category_id,
            asset.subcategory_id,
            asset.notes,
            asset.created_at,
            asset.updated_at,
        ],
    )?;

    Ok(conn.last_insert_rowid())
}

fn asset_from_row(row: &rusqlite::Row) -> rusqlite::Result<Asset> {
    Ok(Asset {
        id: Some(row.get(0)?),
        name: row.get(1)?,
        category_id: row.get(2)?,
        subcategory_id: row.get(3)?,
        notes: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

const ASSET_COLUMNS: &str = "id, name, category_id, subcategory_id, notes, created_at, updated_at";

pub fn get_asset(conn: &Connection, id: i64) -> Result<Option<Asset>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM assets WHERE id = ?1",
        ASSET_COLUMNS
    ))?;
    let result = stmt.query_row([id], asset_from_row).optional()?;
    Ok(result)
}

/// All assets, oldest first, optionally restricted to one category (matches
/// the category itself or any of its subcategories).
pub fn list_assets(conn: &Connection, category_id: Option<i64>) -> Result<Vec<Asset>> {
    let assets = match category_id {
        Some(cid) => {
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM assets
                 WHERE category_id = ?1
                    OR subcategory_id = ?1
                    OR category_id IN (SELECT id FROM categories WHERE parent_id = ?1)
                 ORDER BY created_at, id",
                ASSET_COLUMNS
            ))?;
            let rows = stmt.query_map([cid], asset_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            rows
        }
        None => {
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM assets ORDER BY created_at, id",
                ASSET_COLUMNS
            ))?;
            let rows = stmt.query_map([], asset_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            rows
        }
    };
    Ok(assets)
}

pub fn update_asset_name(conn: &Connection, id: i64, name: &str) -> Result<()> {
    let affected = conn.execute(
        "UPDATE assets SET name = ?2, updated_at = ?3 WHERE id = ?1",
        params![id, name, Utc::now()],
    )?;
    if affected == 0 {
        bail!("Asset #{} not found", id);
    }
    Ok(())
}

pub fn update_asset_notes(conn: &Connection, id: i64, notes: &str) -> Result<()> {
    let affected = conn.execute(
        "UPDATE assets SET notes = ?2, updated_at = ?3 WHERE id = ?1",
        params![id, notes, Utc::now()],
    )?;
    if affected == 0 {
        bail!("Asset #{} not found", id);
    }
    Ok(())
}

pub fn update_asset_category(
    conn: &Connection,
    id: i64,
    category_id: i64,
    subcategory_id: Option<i64>,
) -> Result<()> {
    let affected = conn.execute(
        "UPDATE assets SET category_id = ?2, subcategory_id = ?3, updated_at = ?4 WHERE id = ?1",
        params![id, category_id, subcategory_id, Utc::now()],
    )?;
    if affected == 0 {
        bail!("Asset #{} not found", id);
    }
    Ok(())
}

/// Delete an asset; its expenses go with it (FK cascade)
pub fn delete_asset(conn: &Connection, id: i64) -> Result<()> {
    let affected = conn.execute("DELETE FROM assets WHERE id = ?1", [id])?;
    if affected == 0 {
        bail!("Asset #{} not found", id);
    }
    Ok(())
}

// ============ Expenses ============

/// Check the shape invariants before an expense reaches storage:
/// non-negative amount, interval present iff recurring, end date not before
/// the start date, and at most one initial expense per asset.
pub fn validate_expense(conn: &Connection, expense: &Expense) -> Result<()> {
    fn invalid(message: String) -> anyhow::Error {
        UpkeepError::ValidationError(message).into()
    }

    if expense.amount < Decimal::ZERO {
        return Err(invalid("expense amount must not be negative".to_string()));
    }

    match expense.kind {
        ExpenseKind::Recurring => {
            if expense.recurring_interval.is_none() {
                return Err(invalid(
                    "recurring expense requires an interval (daily, monthly, or yearly)"
                        .to_string(),
                ));
            }
            if let Some(end) = expense.recurring_end_date {
                if end < expense.date {
                    return Err(invalid(
                        "recurring end date must be on or after the start date".to_string(),
                    ));
                }
            }
        }
        _ => {
            if expense.recurring_interval.is_some() || expense.recurring_end_date.is_some() {
                return Err(invalid(format!(
                    "only recurring expenses may carry an interval or end date (kind is '{}')",
                    expense.kind.as_str()
                )));
            }
        }
    }

    if expense.kind == ExpenseKind::Initial {
        let existing: i64 = conn.query_row(
            "SELECT COUNT(*) FROM expenses WHERE asset_id = ?1 AND kind = 'initial'",
            [expense.asset_id],
            |row| row.get(0),
        )?;
        if existing > 0 {
            return Err(invalid(format!(
                "asset #{} already has an initial expense",
                expense.asset_id
            )));
        }
    }

    Ok(())
}

/// Validate and insert an expense
pub fn insert_expense(conn: &Connection, expense: &Expense) -> Result<i64> {
    validate_expense(conn, expense)?;

    if get_asset(conn, expense.asset_id)?.is_none() {
        bail!("Asset #{} not found", expense.asset_id);
    }

    conn.execute(
        "INSERT INTO expenses (
            asset_id, kind, name, amount, date,
            recurring_interval, recurring_end_date, notes, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            expense.asset_id,
            expense.kind.as_str(),
            expense.name,
            expense.amount.to_string(),
            expense.date,
            expense.recurring_interval.map(|i| i.as_str()),
            expense.recurring_end_date,
            expense.notes,
            expense.created_at,
        ],
    )?;

    Ok(conn.last_insert_rowid())
}

fn expense_from_row(row: &rusqlite::Row) -> rusqlite::Result<Expense> {
    Ok(Expense {
        id: Some(row.get(0)?),
        asset_id: row.get(1)?,
        kind: row
            .get::<_, String>(2)?
            .parse::<ExpenseKind>()
            .unwrap_or(ExpenseKind::OneTime),
        name: row.get(3)?,
        amount: get_decimal_value(row, 4)?,
        date: row.get(5)?,
        recurring_interval: row
            .get::<_, Option<String>>(6)?
            .and_then(|s| s.parse::<RecurringInterval>().ok()),
        recurring_end_date: row.get(7)?,
        notes: row.get(8)?,
        created_at: row.get(9)?,
    })
}

const EXPENSE_COLUMNS: &str = "id, asset_id, kind, name, amount, date, \
     recurring_interval, recurring_end_date, notes, created_at";

pub fn get_expense(conn: &Connection, id: i64) -> Result<Option<Expense>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM expenses WHERE id = ?1",
        EXPENSE_COLUMNS
    ))?;
    let result = stmt.query_row([id], expense_from_row).optional()?;
    Ok(result)
}

pub fn list_expenses_for_asset(conn: &Connection, asset_id: i64) -> Result<Vec<Expense>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM expenses WHERE asset_id = ?1 ORDER BY date, id",
        EXPENSE_COLUMNS
    ))?;
    let expenses = stmt
        .query_map([asset_id], expense_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(expenses)
}

pub fn delete_expense(conn: &Connection, id: i64) -> Result<()> {
    let affected = conn.execute("DELETE FROM expenses WHERE id = ?1", [id])?;
    if affected == 0 {
        bail!("Expense #{} not found", id);
    }
    Ok(())
}

/// Every asset paired with its expense records, for portfolio aggregation
pub fn expenses_grouped_by_asset(conn: &Connection) -> Result<Vec<(Asset, Vec<Expense>)>> {
    let assets = list_assets(conn, None)?;
    let mut groups = Vec::with_capacity(assets.len());
    for asset in assets {
        let asset_id = asset.id.context("asset loaded without id")?;
        let expenses = list_expenses_for_asset(conn, asset_id)?;
        groups.push((asset, expenses));
    }
    Ok(groups)
}

// ============ Bulk replace (snapshot import) ============

/// Replace the entire database content with the given records, preserving
/// their ids, inside a single transaction. Returns per-table counts.
pub fn replace_all(
    conn: &mut Connection,
    categories: &[Category],
    assets: &[Asset],
    expenses: &[Expense],
) -> Result<(usize, usize, usize)> {
    let tx = conn.transaction()?;

    tx.execute("DELETE FROM expenses", [])?;
    tx.execute("DELETE FROM assets", [])?;
    tx.execute("DELETE FROM categories", [])?;

    for category in categories {
        tx.execute(
            "INSERT INTO categories (id, name, emoji, parent_id, sort_order, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                category.id,
                category.name,
                category.emoji,
                category.parent_id,
                category.sort_order,
                category.created_at,
            ],
        )?;
    }

    for asset in assets {
        tx.execute(
            "INSERT INTO assets (id, name, category_id, subcategory_id, notes, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                asset.id,
                asset.name,
                asset.category_id,
                asset.subcategory_id,
                asset.notes,
                asset.created_at,
                asset.updated_at,
            ],
        )?;
    }

    for expense in expenses {
        tx.execute(
            "INSERT INTO expenses (
                id, asset_id, kind, name, amount, date,
                recurring_interval, recurring_end_date, notes, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                expense.id,
                expense.asset_id,
                expense.kind.as_str(),
                expense.name,
                expense.amount.to_string(),
                expense.date,
                expense.recurring_interval.map(|i| i.as_str()),
                expense.recurring_end_date,
                expense.notes,
                expense.created_at,
            ],
        )?;
    }

    tx.commit()?;

    Ok((categories.len(), assets.len(), expenses.len()))
}

/// Helper to read Decimal from SQLite (handles INTEGER, REAL and TEXT)
pub fn get_decimal_value(row: &rusqlite::Row, idx: usize) -> Result<Decimal, rusqlite::Error> {
    use rusqlite::types::ValueRef;

    match row.get_ref(idx)? {
        ValueRef::Text(bytes) => {
            let s = std::str::from_utf8(bytes)
                .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
            Decimal::from_str(s).map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
        }
        ValueRef::Integer(i) => Ok(Decimal::from(i)),
        ValueRef::Real(f) => {
            Decimal::try_from(f).map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
        }
        _ => Err(rusqlite::Error::InvalidColumnType(
            idx,
            "decimal".to_string(),
            rusqlite::types::Type::Null,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn test_conn() -> (tempfile::TempDir, Connection) {
        let temp_dir = tempfile::tempdir().unwrap();
        let db_path = temp_dir.path().join("test.db");
        init_database(Some(db_path.clone())).unwrap();
        let conn = open_db(Some(db_path)).unwrap();
        (temp_dir, conn)
    }

    fn sample_asset(conn: &Connection) -> i64 {
        let category = get_category_by_name(conn, "Electronics", None)
            .unwrap()
            .unwrap();
        insert_asset(
            conn,
            &Asset {
                id: None,
                name: "Laptop".to_string(),
                category_id: category.id.unwrap(),
                subcategory_id: None,
                notes: String::new(),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
        )
        .unwrap()
    }

    #[test]
    fn test_init_seeds_default_categories() {
        let (_tmp, conn) = test_conn();
        let categories = list_categories(&conn).unwrap();
        assert!(categories.iter().any(|c| c.name == "Electronics"));
        assert!(categories.iter().any(|c| c.name == "Other"));
        // Parents come before children in the listing
        let first = &categories[0];
        assert!(first.parent_id.is_none());

        // Re-running the seed is a no-op
        assert_eq!(seed_default_categories(&conn).unwrap(), 0);
    }

    #[test]
    fn test_expense_validation_rejects_second_initial() {
        let (_tmp, conn) = test_conn();
        let asset_id = sample_asset(&conn);

        let initial = Expense {
            id: None,
            asset_id,
            kind: ExpenseKind::Initial,
            name: "purchase".to_string(),
            amount: dec!(9999),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            recurring_interval: None,
            recurring_end_date: None,
            notes: String::new(),
            created_at: Utc::now(),
        };
        insert_expense(&conn, &initial).unwrap();
        let err = insert_expense(&conn, &initial).unwrap_err();
        assert!(err.to_string().contains("already has an initial expense"));
    }

    #[test]
    fn test_expense_validation_interval_iff_recurring() {
        let (_tmp, conn) = test_conn();
        let asset_id = sample_asset(&conn);

        let mut expense = Expense {
            id: None,
            asset_id,
            kind: ExpenseKind::Recurring,
            name: String::new(),
            amount: dec!(10),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            recurring_interval: None,
            recurring_end_date: None,
            notes: String::new(),
            created_at: Utc::now(),
        };
        assert!(insert_expense(&conn, &expense).is_err());

        expense.kind = ExpenseKind::OneTime;
        expense.recurring_interval = Some(RecurringInterval::Monthly);
        assert!(insert_expense(&conn, &expense).is_err());

        expense.kind = ExpenseKind::Recurring;
        expense.recurring_end_date = Some(NaiveDate::from_ymd_opt(2023, 12, 1).unwrap());
        assert!(insert_expense(&conn, &expense).is_err());

        expense.recurring_end_date = Some(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        assert!(insert_expense(&conn, &expense).is_ok());
    }

    #[test]
    fn test_expense_roundtrips_through_sqlite() {
        let (_tmp, conn) = test_conn();
        let asset_id = sample_asset(&conn);

        let expense = Expense {
            id: None,
            asset_id,
            kind: ExpenseKind::Recurring,
            name: "cloud sync".to_string(),
            amount: dec!(6.50),
            date: NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
            recurring_interval: Some(RecurringInterval::Monthly),
            recurring_end_date: Some(NaiveDate::from_ymd_opt(2025, 2, 28).unwrap()),
            notes: "family plan".to_string(),
            created_at: Utc::now(),
        };
        let id = insert_expense(&conn, &expense).unwrap();

        let loaded = get_expense(&conn, id).unwrap().unwrap();
        assert_eq!(loaded.kind, ExpenseKind::Recurring);
        assert_eq!(loaded.amount, dec!(6.50));
        assert_eq!(loaded.date, expense.date);
        assert_eq!(loaded.recurring_interval, Some(RecurringInterval::Monthly));
        assert_eq!(loaded.recurring_end_date, expense.recurring_end_date);
        assert_eq!(loaded.notes, "family plan");
    }

    #[test]
    fn test_delete_asset_cascades_to_expenses() {
        let (_tmp, conn) = test_conn();
        let asset_id = sample_asset(&conn);

        insert_expense(
            &conn,
            &Expense {
                id: None,
                asset_id,
                kind: ExpenseKind::OneTime,
                name: String::new(),
                amount: dec!(42),
                date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                recurring_interval: None,
                recurring_end_date: None,
                notes: String::new(),
                created_at: Utc::now(),
            },
        )
        .unwrap();

        delete_asset(&conn, asset_id).unwrap();
        let orphaned: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM expenses WHERE asset_id = ?1",
                [asset_id],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(orphaned, 0);
    }

    #[test]
    fn test_category_delete_refuses_while_in_use() {
        let (_tmp, conn) = test_conn();
        let asset_id = sample_asset(&conn);
        let electronics = get_category_by_name(&conn, "Electronics", None)
            .unwrap()
            .unwrap();

        assert!(delete_category(&conn, electronics.id.unwrap()).is_err());

        delete_asset(&conn, asset_id).unwrap();
        delete_category(&conn, electronics.id.unwrap()).unwrap();
        assert!(get_category_by_name(&conn, "Electronics", None)
            .unwrap()
            .is_none());
    }
}
