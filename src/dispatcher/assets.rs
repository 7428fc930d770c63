use anyhow::{bail, Context, Result};
use chrono::Utc;
use colored::Colorize;
use itertools::Itertools;
use std::collections::HashMap;

use crate::cli::formatters::{self, AssetOverview};
use crate::cli::AssetsCommands;
use crate::config::Config;
use crate::db::{self, Asset, Category};
use crate::stats::{compute_asset_stats, compute_portfolio_stats};

use super::{open_conn, today};

pub fn dispatch_assets(action: AssetsCommands, json_output: bool) -> Result<()> {
    match action {
        AssetsCommands::List {
            category,
            search,
            sort,
            desc,
        } => list_assets(category.as_deref(), search.as_deref(), &sort, desc, json_output),
        AssetsCommands::Show { id } => show_asset(id, json_output),
        AssetsCommands::Add {
            name,
            category,
            subcategory,
            notes,
        } => add_asset(&name, &category, subcategory.as_deref(), &notes, json_output),
        AssetsCommands::SetName { id, name } => set_asset_name(id, &name, json_output),
        AssetsCommands::SetNotes { id, notes } => set_asset_notes(id, &notes, json_output),
        AssetsCommands::Move {
            id,
            category,
            subcategory,
        } => move_asset(id, &category, subcategory.as_deref(), json_output),
        AssetsCommands::Remove { id } => remove_asset(id, json_output),
    }
}

/// Resolve a top-level category and optional subcategory pair by name
fn resolve_category_pair(
    conn: &rusqlite::Connection,
    category: &str,
    subcategory: Option<&str>,
) -> Result<(i64, Option<i64>)> {
    let parent = db::get_category_by_name(conn, category, None)?
        .with_context(|| format!("Category '{}' not found", category))?;
    let parent_id = parent.id.context("category loaded without id")?;

    let subcategory_id = match subcategory {
        Some(name) => {
            let child = db::get_category_by_name(conn, name, Some(parent_id))?.with_context(
                || format!("Subcategory '{}' not found under '{}'", name, category),
            )?;
            Some(child.id.context("category loaded without id")?)
        }
        None => None,
    };

    Ok((parent_id, subcategory_id))
}

/// "📱 Electronics" or "📱 Electronics / Phone"
pub(crate) fn category_label(categories: &HashMap<i64, Category>, asset: &Asset) -> String {
    let parent = categories.get(&asset.category_id);
    let mut label = match parent {
        Some(c) if !c.emoji.is_empty() => format!("{} {}", c.emoji, c.name),
        Some(c) => c.name.clone(),
        None => "-".to_string(),
    };
    if let Some(sub) = asset.subcategory_id.and_then(|id| categories.get(&id)) {
        label.push_str(&format!(" / {}", sub.name));
    }
    label
}

pub(crate) fn category_map(conn: &rusqlite::Connection) -> Result<HashMap<i64, Category>> {
    let map = db::list_categories(conn)?
        .into_iter()
        .filter_map(|c| c.id.map(|id| (id, c)))
        .collect();
    Ok(map)
}

fn list_assets(
    category: Option<&str>,
    search: Option<&str>,
    sort: &str,
    desc: bool,
    json_output: bool,
) -> Result<()> {
    let conn = open_conn()?;
    let config = Config::load()?;
    let horizon = today();

    let category_filter = match category {
        Some(name) => {
            let found = db::get_category_by_name(&conn, name, None)?
                .with_context(|| format!("Category '{}' not found", name))?;
            Some(found.id.context("category loaded without id")?)
        }
        None => None,
    };

    let categories = category_map(&conn)?;
    let assets = db::list_assets(&conn, category_filter)?;

    let mut rows = Vec::new();
    let mut groups = Vec::new();
    for asset in assets {
        if let Some(needle) = search {
            if !asset.name.to_lowercase().contains(&needle.to_lowercase()) {
                continue;
            }
        }
        let id = asset.id.context("asset loaded without id")?;
        let expenses = db::list_expenses_for_asset(&conn, id)?;
        rows.push(AssetOverview {
            id,
            name: asset.name.clone(),
            category_label: category_label(&categories, &asset),
            stats: compute_asset_stats(&expenses, horizon),
        });
        groups.push(expenses);
    }

    let mut rows: Vec<AssetOverview> = match sort {
        "name" => rows
            .into_iter()
            .sorted_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
            .collect(),
        "total-cost" => rows
            .into_iter()
            .sorted_by(|a, b| a.stats.total_expenses.cmp(&b.stats.total_expenses))
            .collect(),
        "daily-cost" => rows
            .into_iter()
            .sorted_by(|a, b| a.stats.daily_cost.cmp(&b.stats.daily_cost))
            .collect(),
        // "date": keep insertion order (oldest first)
        _ => rows,
    };
    if desc {
        rows.reverse();
    }

    if json_output {
        println!("{}", formatters::format_assets_json(&rows));
        return Ok(());
    }

    if rows.is_empty() {
        println!("{} No assets found.", "ℹ".blue().bold());
        return Ok(());
    }

    println!("{}", formatters::format_assets_table(&rows, &config.currency_symbol));

    let portfolio = compute_portfolio_stats(&groups, horizon);
    println!(
        "{}",
        formatters::format_portfolio_summary(&portfolio, &config.currency_symbol)
    );

    Ok(())
}

fn show_asset(id: i64, json_output: bool) -> Result<()> {
    let conn = open_conn()?;
    let config = Config::load()?;

    let asset = db::get_asset(&conn, id)?.with_context(|| format!("Asset #{} not found", id))?;
    let categories = category_map(&conn)?;
    let expenses = db::list_expenses_for_asset(&conn, id)?;
    let stats = compute_asset_stats(&expenses, today());

    if json_output {
        let payload = serde_json::json!({
            "asset": asset,
            "category": category_label(&categories, &asset),
            "expenses": expenses,
            "stats": stats,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    println!(
        "\n{} {} (#{})",
        "▪".cyan().bold(),
        asset.name.bold(),
        id
    );
    println!("{:<16} {}", "Category:".bold(), category_label(&categories, &asset));
    if !asset.notes.is_empty() {
        println!("{:<16} {}", "Notes:".bold(), asset.notes);
    }
    println!();
    print!(
        "{}",
        formatters::format_asset_stats_block(&stats, &config.currency_symbol)
    );

    if !expenses.is_empty() {
        println!();
        println!("{}", super::expenses::expense_table(&expenses, &config.currency_symbol));
    }

    Ok(())
}

fn add_asset(
    name: &str,
    category: &str,
    subcategory: Option<&str>,
    notes: &str,
    json_output: bool,
) -> Result<()> {
    if name.trim().is_empty() {
        bail!("Asset name must not be empty");
    }

    let conn = open_conn()?;
    let (category_id, subcategory_id) = resolve_category_pair(&conn, category, subcategory)?;

    let id = db::insert_asset(
        &conn,
        &Asset {
            id: None,
            name: name.trim().to_string(),
            category_id,
            subcategory_id,
            notes: notes.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        },
    )?;

    if json_output {
        println!("{}", serde_json::json!({ "id": id }));
        return Ok(());
    }

    println!("{} Added asset #{}: {}", "✓".green().bold(), id, name.trim());
    Ok(())
}

fn set_asset_name(id: i64, name: &str, json_output: bool) -> Result<()> {
    if name.trim().is_empty() {
        bail!("Asset name must not be empty");
    }
    let conn = open_conn()?;
    db::update_asset_name(&conn, id, name.trim())?;

    if json_output {
        println!("{}", serde_json::json!({ "id": id, "name": name.trim() }));
        return Ok(());
    }
    println!("{} Renamed asset #{} to {}", "✓".green().bold(), id, name.trim());
    Ok(())
}

fn set_asset_notes(id: i64, notes: &str, json_output: bool) -> Result<()> {
    let conn = open_conn()?;
    db::update_asset_notes(&conn, id, notes)?;

    if json_output {
        println!("{}", serde_json::json!({ "id": id }));
        return Ok(());
    }
    println!("{} Updated notes of asset #{}", "✓".green().bold(), id);
    Ok(())
}

fn move_asset(id: i64, category: &str, subcategory: Option<&str>, json_output: bool) -> Result<()> {
    let conn = open_conn()?;
    let (category_id, subcategory_id) = resolve_category_pair(&conn, category, subcategory)?;
    db::update_asset_category(&conn, id, category_id, subcategory_id)?;

    if json_output {
        println!("{}", serde_json::json!({ "id": id, "category_id": category_id }));
        return Ok(());
    }
    println!("{} Moved asset #{} to {}", "✓".green().bold(), id, category);
    Ok(())
}

fn remove_asset(id: i64, json_output: bool) -> Result<()> {
    let conn = open_conn()?;
    let asset = db::get_asset(&conn, id)?.with_context(|| format!("Asset #{} not found", id))?;
    let expense_count = db::list_expenses_for_asset(&conn, id)?.len();
    db::delete_asset(&conn, id)?;

    if json_output {
        println!(
            "{}",
            serde_json::json!({ "id": id, "removed_expenses": expense_count })
        );
        return Ok(());
    }
    println!(
        "{} Removed asset #{} ({}) and {} expense(s)",
        "✓".green().bold(),
        id,
        asset.name,
        expense_count
    );
    Ok(())
}
