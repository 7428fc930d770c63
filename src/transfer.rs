//! Import/export of the full database as a versioned JSON snapshot
//!
//! The snapshot is the single interchange format: `export`/`import` write
//! and read it as a file, and the cloud backup pushes/pulls the same
//! envelope. Import replaces all local data in one transaction.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::db::{self, Asset, Category, Expense};

/// Envelope version this build writes and accepts
pub const SNAPSHOT_VERSION: u32 = 1;

/// Versioned snapshot of everything the tracker stores
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    pub exported_at: DateTime<Utc>,
    pub categories: Vec<Category>,
    pub assets: Vec<Asset>,
    pub expenses: Vec<Expense>,
}

/// Per-table row counts reported after an import
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ImportCounts {
    pub categories: usize,
    pub assets: usize,
    pub expenses: usize,
}

/// Collect the current database content into a snapshot
pub fn export_snapshot(conn: &Connection) -> Result<Snapshot> {
    let categories = db::list_categories(conn)?;
    let mut assets = Vec::new();
    let mut expenses = Vec::new();
    for (asset, asset_expenses) in db::expenses_grouped_by_asset(conn)? {
        assets.push(asset);
        expenses.extend(asset_expenses);
    }

    Ok(Snapshot {
        version: SNAPSHOT_VERSION,
        exported_at: Utc::now(),
        categories,
        assets,
        expenses,
    })
}

pub fn snapshot_to_json(snapshot: &Snapshot) -> Result<String> {
    serde_json::to_string_pretty(snapshot).context("Failed to serialize snapshot")
}

/// Parse and shape-check a snapshot. Unknown versions are an error rather
/// than a best-effort read, so a newer app's backup never half-loads here.
pub fn parse_snapshot(json: &str) -> Result<Snapshot> {
    let snapshot: Snapshot =
        serde_json::from_str(json).context("Snapshot is not valid upkeep backup JSON")?;

    if snapshot.version != SNAPSHOT_VERSION {
        bail!(
            "Unsupported snapshot version {} (this build reads version {})",
            snapshot.version,
            SNAPSHOT_VERSION
        );
    }

    Ok(snapshot)
}

/// Replace all local data with the snapshot content
pub fn import_snapshot(conn: &mut Connection, snapshot: &Snapshot) -> Result<ImportCounts> {
    let (categories, assets, expenses) = db::replace_all(
        conn,
        &snapshot.categories,
        &snapshot.assets,
        &snapshot.expenses,
    )?;

    Ok(ImportCounts {
        categories,
        assets,
        expenses,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::ExpenseKind;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn test_conn() -> (tempfile::TempDir, Connection) {
        let temp_dir = tempfile::tempdir().unwrap();
        let db_path = temp_dir.path().join("test.db");
        db::init_database(Some(db_path.clone())).unwrap();
        let conn = db::open_db(Some(db_path)).unwrap();
        (temp_dir, conn)
    }

    #[test]
    fn test_snapshot_roundtrip_preserves_rows() {
        let (_tmp, conn) = test_conn();
        let category = db::get_category_by_name(&conn, "Home", None)
            .unwrap()
            .unwrap();
        let asset_id = db::insert_asset(
            &conn,
            &Asset {
                id: None,
                name: "Espresso machine".to_string(),
                category_id: category.id.unwrap(),
                subcategory_id: None,
                notes: String::new(),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
        )
        .unwrap();
        db::insert_expense(
            &conn,
            &Expense {
                id: None,
                asset_id,
                kind: ExpenseKind::Initial,
                name: "purchase".to_string(),
                amount: dec!(450),
                date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
                recurring_interval: None,
                recurring_end_date: None,
                notes: String::new(),
                created_at: Utc::now(),
            },
        )
        .unwrap();

        let json = snapshot_to_json(&export_snapshot(&conn).unwrap()).unwrap();
        let parsed = parse_snapshot(&json).unwrap();

        // Import into a fresh database and compare content
        let (_tmp2, mut other) = test_conn();
        let counts = import_snapshot(&mut other, &parsed).unwrap();
        assert_eq!(counts.assets, 1);
        assert_eq!(counts.expenses, 1);

        let restored = db::get_asset(&other, asset_id).unwrap().unwrap();
        assert_eq!(restored.name, "Espresso machine");
        let expenses = db::list_expenses_for_asset(&other, asset_id).unwrap();
        assert_eq!(expenses.len(), 1);
        assert_eq!(expenses[0].amount, dec!(450));

        // Import is replace-all, both databases hold identical category sets
        assert_eq!(
            db::list_categories(&conn).unwrap().len(),
            db::list_categories(&other).unwrap().len()
        );
    }

    #[test]
    fn test_unsupported_version_is_rejected() {
        let json = r#"{"version": 99, "exported_at": "2024-01-01T00:00:00Z",
                       "categories": [], "assets": [], "expenses": []}"#;
        let err = parse_snapshot(json).unwrap_err();
        assert!(err.to_string().contains("Unsupported snapshot version"));
    }

    #[test]
    fn test_malformed_json_is_rejected() {
        assert!(parse_snapshot("{\"version\": 1").is_err());
        assert!(parse_snapshot("[]").is_err());
    }
}
