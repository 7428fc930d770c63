//! Command dispatch layer
//!
//! Each submodule owns one command group: it opens the database, runs the
//! domain logic, and renders the result as a table or JSON.

pub mod assets;
pub mod backup;
pub mod categories;
pub mod expenses;
pub mod stats;
pub mod transfer;

use anyhow::Result;
use chrono::NaiveDate;
use colored::Colorize;
use rusqlite::Connection;

use crate::db;

pub(crate) fn open_conn() -> Result<Connection> {
    db::init_database(None)?;
    db::open_db(None)
}

/// The evaluation horizon used when no `--at` override is given
pub(crate) fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Handle `upkeep init`
pub fn dispatch_init(json_output: bool) -> Result<()> {
    let conn = open_conn()?;
    let categories = db::list_categories(&conn)?;

    if json_output {
        let payload = serde_json::json!({
            "database": db::get_default_db_path()?,
            "categories": categories.len(),
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    println!(
        "{} Database ready ({} categories)",
        "✓".green().bold(),
        categories.len()
    );
    Ok(())
}
