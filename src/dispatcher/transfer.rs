use anyhow::{Context, Result};
use colored::Colorize;

use crate::transfer::{export_snapshot, import_snapshot, parse_snapshot, snapshot_to_json};

use super::open_conn;

/// Handle `upkeep export <path>`
pub fn dispatch_export(path: &str, json_output: bool) -> Result<()> {
    let conn = open_conn()?;
    let snapshot = export_snapshot(&conn)?;
    let json = snapshot_to_json(&snapshot)?;

    std::fs::write(path, &json).with_context(|| format!("Failed to write snapshot to {}", path))?;

    if json_output {
        println!(
            "{}",
            serde_json::json!({
                "path": path,
                "categories": snapshot.categories.len(),
                "assets": snapshot.assets.len(),
                "expenses": snapshot.expenses.len(),
            })
        );
        return Ok(());
    }

    println!(
        "{} Exported {} categories, {} assets, {} expenses to {}",
        "✓".green().bold(),
        snapshot.categories.len(),
        snapshot.assets.len(),
        snapshot.expenses.len(),
        path
    );
    Ok(())
}

/// Handle `upkeep import <path>`; replaces all local data
pub fn dispatch_import(path: &str, json_output: bool) -> Result<()> {
    let raw =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read snapshot {}", path))?;
    let snapshot = parse_snapshot(&raw)?;

    let mut conn = open_conn()?;
    let counts = import_snapshot(&mut conn, &snapshot)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&counts)?);
        return Ok(());
    }

    println!("{} Import complete!", "✓".green().bold());
    println!("  Categories: {}", counts.categories);
    println!("  Assets:     {}", counts.assets);
    println!("  Expenses:   {}", counts.expenses);
    Ok(())
}
