use anyhow::{Context, Result};
use colored::Colorize;

use crate::cli::formatters::{self, AssetOverview};
use crate::cli::parse_flexible_date;
use crate::config::Config;
use crate::db;
use crate::stats::{compute_asset_stats, compute_portfolio_stats};

use super::{open_conn, today};

/// Handle `upkeep stats [--asset <id>] [--at <date>]`
pub fn dispatch_stats(asset: Option<i64>, at: Option<&str>, json_output: bool) -> Result<()> {
    let horizon = match at {
        Some(s) => parse_flexible_date(s)?,
        None => today(),
    };

    match asset {
        Some(id) => asset_stats(id, horizon, json_output),
        None => portfolio_stats(horizon, json_output),
    }
}

fn asset_stats(id: i64, horizon: chrono::NaiveDate, json_output: bool) -> Result<()> {
    let conn = open_conn()?;
    let config = Config::load()?;

    let asset = db::get_asset(&conn, id)?.with_context(|| format!("Asset #{} not found", id))?;
    let expenses = db::list_expenses_for_asset(&conn, id)?;
    let stats = compute_asset_stats(&expenses, horizon);

    if json_output {
        println!("{}", formatters::format_asset_stats_json(&stats));
        return Ok(());
    }

    println!(
        "\n{} {} as of {}\n",
        "📊".cyan().bold(),
        asset.name.bold(),
        horizon.format("%Y-%m-%d")
    );
    print!(
        "{}",
        formatters::format_asset_stats_block(&stats, &config.currency_symbol)
    );
    Ok(())
}

fn portfolio_stats(horizon: chrono::NaiveDate, json_output: bool) -> Result<()> {
    let conn = open_conn()?;
    let config = Config::load()?;

    let grouped = db::expenses_grouped_by_asset(&conn)?;
    let groups: Vec<Vec<db::Expense>> = grouped.iter().map(|(_, e)| e.clone()).collect();
    let portfolio = compute_portfolio_stats(&groups, horizon);

    if json_output {
        println!("{}", formatters::format_portfolio_json(&portfolio));
        return Ok(());
    }

    if grouped.is_empty() {
        println!("{} No assets found.", "ℹ".blue().bold());
        return Ok(());
    }

    println!(
        "\n{} Portfolio as of {}\n",
        "📊".cyan().bold(),
        horizon.format("%Y-%m-%d")
    );

    let categories = super::assets::category_map(&conn)?;
    let rows: Vec<AssetOverview> = grouped
        .iter()
        .map(|(asset, expenses)| AssetOverview {
            id: asset.id.unwrap_or_default(),
            name: asset.name.clone(),
            category_label: super::assets::category_label(&categories, asset),
            stats: compute_asset_stats(expenses, horizon),
        })
        .collect();

    println!(
        "{}",
        formatters::format_assets_table(&rows, &config.currency_symbol)
    );
    println!(
        "{}",
        formatters::format_portfolio_summary(&portfolio, &config.currency_symbol)
    );
    Ok(())
}
