use anyhow::{bail, Context, Result};
use chrono::Utc;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use crate::cli::CategoriesCommands;
use crate::db::{self, Category};

use super::open_conn;

pub fn dispatch_categories(action: CategoriesCommands, json_output: bool) -> Result<()> {
    match action {
        CategoriesCommands::List => list_categories(json_output),
        CategoriesCommands::Add {
            name,
            emoji,
            parent,
            sort_order,
        } => add_category(&name, &emoji, parent.as_deref(), sort_order, json_output),
        CategoriesCommands::Remove { id } => remove_category(id, json_output),
    }
}

fn list_categories(json_output: bool) -> Result<()> {
    let conn = open_conn()?;
    let categories = db::list_categories(&conn)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&categories)?);
        return Ok(());
    }

    if categories.is_empty() {
        println!("{} No categories found.", "ℹ".blue().bold());
        return Ok(());
    }

    #[derive(Tabled)]
    struct CategoryRow {
        #[tabled(rename = "ID")]
        id: String,
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "Assets")]
        assets: i64,
    }

    // Parents come first in list order; indent children beneath them
    let rows: Vec<CategoryRow> = categories
        .iter()
        .map(|category| {
            let id = category.id.unwrap_or_default();
            let display = if category.emoji.is_empty() {
                category.name.clone()
            } else {
                format!("{} {}", category.emoji, category.name)
            };
            let name = if category.parent_id.is_some() {
                format!("  └ {}", display)
            } else {
                display
            };
            let assets = asset_count(&conn, id).unwrap_or(0);
            CategoryRow {
                id: id.to_string(),
                name,
                assets,
            }
        })
        .collect();

    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{}", table);
    Ok(())
}

fn asset_count(conn: &rusqlite::Connection, category_id: i64) -> Result<i64> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM assets WHERE category_id = ?1 OR subcategory_id = ?1",
        [category_id],
        |row| row.get(0),
    )?;
    Ok(count)
}

fn add_category(
    name: &str,
    emoji: &str,
    parent: Option<&str>,
    sort_order: Option<i64>,
    json_output: bool,
) -> Result<()> {
    if name.trim().is_empty() {
        bail!("Category name must not be empty");
    }

    let conn = open_conn()?;

    let parent_id = match parent {
        Some(parent_name) => {
            let found = db::get_category_by_name(&conn, parent_name, None)?
                .with_context(|| format!("Parent category '{}' not found", parent_name))?;
            if found.parent_id.is_some() {
                bail!("'{}' is a subcategory; only one level of nesting is supported", parent_name);
            }
            Some(found.id.context("category loaded without id")?)
        }
        None => None,
    };

    if db::get_category_by_name(&conn, name.trim(), parent_id)?.is_some() {
        bail!("Category '{}' already exists at this level", name.trim());
    }

    // Append after the current siblings unless a position is given
    let order = match sort_order {
        Some(order) => order,
        None => match parent_id {
            Some(pid) => conn.query_row(
                "SELECT COALESCE(MAX(sort_order) + 1, 0) FROM categories WHERE parent_id = ?1",
                [pid],
                |row| row.get(0),
            )?,
            None => conn.query_row(
                "SELECT COALESCE(MAX(sort_order) + 1, 0) FROM categories WHERE parent_id IS NULL",
                [],
                |row| row.get(0),
            )?,
        },
    };

    let id = db::insert_category(
        &conn,
        &Category {
            id: None,
            name: name.trim().to_string(),
            emoji: emoji.to_string(),
            parent_id,
            sort_order: order,
            created_at: Utc::now(),
        },
    )?;

    if json_output {
        println!("{}", serde_json::json!({ "id": id }));
        return Ok(());
    }
    println!("{} Added category #{}: {}", "✓".green().bold(), id, name.trim());
    Ok(())
}

fn remove_category(id: i64, json_output: bool) -> Result<()> {
    let conn = open_conn()?;
    let category =
        db::get_category(&conn, id)?.with_context(|| format!("Category #{} not found", id))?;
    db::delete_category(&conn, id)?;

    if json_output {
        println!("{}", serde_json::json!({ "id": id }));
        return Ok(());
    }
    println!(
        "{} Removed category #{} ({})",
        "✓".green().bold(),
        id,
        category.name
    );
    Ok(())
}
