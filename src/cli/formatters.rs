//! Output formatting module for CLI display
//!
//! This module handles all terminal output formatting, separating
//! the concerns of data calculation from presentation.

use colored::Colorize;
use rust_decimal::Decimal;
use serde::Serialize;
use tabled::{
    settings::{object::Columns, Alignment, Style},
    Table, Tabled,
};

use crate::stats::{AssetStats, PortfolioStats};
use crate::utils::{format_amount, format_days};

/// One asset joined with its category label and computed statistics
#[derive(Debug, Clone)]
pub struct AssetOverview {
    pub id: i64,
    pub name: String,
    pub category_label: String,
    pub stats: AssetStats,
}

/// Format the asset overview list for JSON output
pub fn format_assets_json(rows: &[AssetOverview]) -> String {
    #[derive(Serialize)]
    struct JsonAsset<'a> {
        id: i64,
        name: &'a str,
        category: &'a str,
        holding_days: i64,
        total_expenses: String,
        total_sale_income: String,
        net_cost: String,
        daily_cost: String,
    }

    let entries: Vec<JsonAsset> = rows
        .iter()
        .map(|row| JsonAsset {
            id: row.id,
            name: &row.name,
            category: &row.category_label,
            holding_days: row.stats.holding_days,
            total_expenses: row.stats.total_expenses.to_string(),
            total_sale_income: row.stats.total_sale_income.to_string(),
            net_cost: row.stats.net_cost.to_string(),
            daily_cost: row.stats.daily_cost.to_string(),
        })
        .collect();

    serde_json::to_string_pretty(&entries)
        .unwrap_or_else(|e| format!(r#"{{"error": "JSON serialization failed: {}"}}"#, e))
}

/// Format the asset overview list as a terminal table
pub fn format_assets_table(rows: &[AssetOverview], symbol: &str) -> String {
    #[derive(Tabled)]
    struct AssetRow {
        #[tabled(rename = "ID")]
        id: i64,
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "Category")]
        category: String,
        #[tabled(rename = "Held")]
        held: String,
        #[tabled(rename = "Total Cost")]
        total_cost: String,
        #[tabled(rename = "Net Cost")]
        net_cost: String,
        #[tabled(rename = "Daily Cost")]
        daily_cost: String,
    }

    let table_rows: Vec<AssetRow> = rows
        .iter()
        .map(|row| AssetRow {
            id: row.id,
            name: row.name.clone(),
            category: row.category_label.clone(),
            held: format_days(row.stats.holding_days),
            total_cost: format_amount(row.stats.total_expenses, symbol),
            net_cost: colorize_net_cost(row.stats.net_cost, symbol),
            daily_cost: format_amount(row.stats.daily_cost.round_dp(2), symbol),
        })
        .collect();

    let mut table = Table::new(&table_rows);
    table.with(Style::modern());
    // Right-align the numeric columns
    table.modify(Columns::new(3..), Alignment::right());

    table.to_string()
}

/// Format the portfolio totals block shown under the asset table
pub fn format_portfolio_summary(stats: &PortfolioStats, symbol: &str) -> String {
    let mut output = String::new();
    output.push_str(&format!("\n{}", "━".repeat(60).bright_black()));
    output.push_str(&format!("\n{:<16} {}", "Assets:".bold(), stats.asset_count));
    output.push_str(&format!(
        "\n{:<16} {}",
        "Net cost:".bold(),
        colorize_net_cost(stats.total_net_cost, symbol)
    ));
    output.push_str(&format!(
        "\n{:<16} {}",
        "Daily cost:".bold(),
        format_amount(stats.total_daily_cost.round_dp(2), symbol)
    ));
    output
}

/// Format the statistics of a single asset as a labelled block
pub fn format_asset_stats_block(stats: &AssetStats, symbol: &str) -> String {
    let mut output = String::new();
    match stats.initial_expense_date {
        Some(date) => {
            output.push_str(&format!(
                "{:<16} {} (held {})\n",
                "Acquired:".bold(),
                date.format("%Y-%m-%d"),
                format_days(stats.holding_days)
            ));
        }
        None => {
            output.push_str(&format!("{:<16} -\n", "Acquired:".bold()));
        }
    }
    output.push_str(&format!(
        "{:<16} {}\n",
        "Total cost:".bold(),
        format_amount(stats.total_expenses, symbol)
    ));
    output.push_str(&format!(
        "{:<16} {}\n",
        "Sale income:".bold(),
        format_amount(stats.total_sale_income, symbol)
    ));
    output.push_str(&format!(
        "{:<16} {}\n",
        "Net cost:".bold(),
        colorize_net_cost(stats.net_cost, symbol)
    ));
    output.push_str(&format!(
        "{:<16} {}\n",
        "Daily cost:".bold(),
        format_amount(stats.daily_cost.round_dp(2), symbol)
    ));
    output
}

/// Format per-asset stats for JSON output
pub fn format_asset_stats_json(stats: &AssetStats) -> String {
    serde_json::to_string_pretty(stats)
        .unwrap_or_else(|e| format!(r#"{{"error": "JSON serialization failed: {}"}}"#, e))
}

/// Format portfolio stats for JSON output
pub fn format_portfolio_json(stats: &PortfolioStats) -> String {
    serde_json::to_string_pretty(stats)
        .unwrap_or_else(|e| format!(r#"{{"error": "JSON serialization failed: {}"}}"#, e))
}

/// Negative net cost means the asset earned more than it cost
fn colorize_net_cost(net_cost: Decimal, symbol: &str) -> String {
    let formatted = format_amount(net_cost.round_dp(2), symbol);
    if net_cost < Decimal::ZERO {
        formatted.green().to_string()
    } else {
        formatted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn sample_stats() -> AssetStats {
        AssetStats {
            initial_expense_date: NaiveDate::from_ymd_opt(2024, 1, 1),
            holding_days: 30,
            total_expenses: dec!(12000),
            total_sale_income: dec!(0),
            net_cost: dec!(12000),
            daily_cost: dec!(400),
        }
    }

    #[test]
    fn test_assets_table_contains_formatted_values() {
        colored::control::set_override(false);
        let rows = vec![AssetOverview {
            id: 1,
            name: "Laptop".to_string(),
            category_label: "📱 Electronics".to_string(),
            stats: sample_stats(),
        }];
        let table = format_assets_table(&rows, "¥");
        assert!(table.contains("Laptop"));
        assert!(table.contains("¥12,000.00"));
        assert!(table.contains("¥400.00"));
        assert!(table.contains("1 mo"));
    }

    #[test]
    fn test_assets_json_is_parseable() {
        let rows = vec![AssetOverview {
            id: 1,
            name: "Laptop".to_string(),
            category_label: "Electronics".to_string(),
            stats: sample_stats(),
        }];
        let json = format_assets_json(&rows);
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[0]["net_cost"], "12000");
        assert_eq!(parsed[0]["holding_days"], 30);
    }

    #[test]
    fn test_stats_block_mentions_every_metric() {
        colored::control::set_override(false);
        let block = format_asset_stats_block(&sample_stats(), "¥");
        assert!(block.contains("2024-01-01"));
        assert!(block.contains("Total cost:"));
        assert!(block.contains("Net cost:"));
        assert!(block.contains("Daily cost:"));
        assert!(block.contains("¥400.00"));
    }
}
