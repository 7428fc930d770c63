use anyhow::{anyhow, Context, Result};
use chrono::{NaiveDate, Utc};
use colored::Colorize;
use rust_decimal::Decimal;
use std::str::FromStr;
use tabled::{
    settings::{object::Columns, Alignment, Style},
    Table, Tabled,
};

use crate::cli::{parse_flexible_date, ExpensesCommands};
use crate::config::Config;
use crate::db::{self, Expense, ExpenseKind, RecurringInterval};
use crate::recurring::expand_occurrences;
use crate::utils::format_amount;

use super::{open_conn, today};

pub fn dispatch_expenses(action: ExpensesCommands, json_output: bool) -> Result<()> {
    match action {
        ExpensesCommands::List { asset_id } => list_expenses(asset_id, json_output),
        ExpensesCommands::Add {
            asset_id,
            kind,
            amount,
            date,
            name,
            interval,
            end_date,
            notes,
        } => add_expense(
            asset_id,
            &kind,
            &amount,
            &date,
            &name,
            interval.as_deref(),
            end_date.as_deref(),
            &notes,
            json_output,
        ),
        ExpensesCommands::Remove { id } => remove_expense(id, json_output),
        ExpensesCommands::Occurrences { id, until } => {
            show_occurrences(id, until.as_deref(), json_output)
        }
    }
}

/// Render an expense list as a table (also used by `assets show`)
pub(crate) fn expense_table(expenses: &[Expense], symbol: &str) -> String {
    #[derive(Tabled)]
    struct ExpenseRow {
        #[tabled(rename = "ID")]
        id: String,
        #[tabled(rename = "Kind")]
        kind: &'static str,
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "Date")]
        date: String,
        #[tabled(rename = "Schedule")]
        schedule: String,
        #[tabled(rename = "Amount")]
        amount: String,
    }

    let rows: Vec<ExpenseRow> = expenses
        .iter()
        .map(|expense| {
            let schedule = match expense.recurring_interval {
                Some(interval) => match expense.recurring_end_date {
                    Some(end) => format!("{} until {}", interval.as_str(), end.format("%Y-%m-%d")),
                    None => interval.as_str().to_string(),
                },
                None => "-".to_string(),
            };
            ExpenseRow {
                id: expense.id.map(|id| id.to_string()).unwrap_or_default(),
                kind: expense.kind.as_str(),
                name: if expense.name.is_empty() {
                    "-".to_string()
                } else {
                    expense.name.clone()
                },
                date: expense.date.format("%Y-%m-%d").to_string(),
                schedule,
                amount: format_amount(expense.amount, symbol),
            }
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::modern());
    table.modify(Columns::new(5..), Alignment::right());
    table.to_string()
}

fn list_expenses(asset_id: i64, json_output: bool) -> Result<()> {
    let conn = open_conn()?;
    let config = Config::load()?;

    db::get_asset(&conn, asset_id)?.with_context(|| format!("Asset #{} not found", asset_id))?;
    let expenses = db::list_expenses_for_asset(&conn, asset_id)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&expenses)?);
        return Ok(());
    }

    if expenses.is_empty() {
        println!("{} No expenses recorded for asset #{}.", "ℹ".blue().bold(), asset_id);
        return Ok(());
    }

    println!("{}", expense_table(&expenses, &config.currency_symbol));
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn add_expense(
    asset_id: i64,
    kind: &str,
    amount: &str,
    date: &str,
    name: &str,
    interval: Option<&str>,
    end_date: Option<&str>,
    notes: &str,
    json_output: bool,
) -> Result<()> {
    let kind = kind
        .parse::<ExpenseKind>()
        .map_err(|_| anyhow!("Unknown expense kind '{}'", kind))?;
    let amount = Decimal::from_str(amount)
        .with_context(|| format!("Invalid amount '{}'", amount))?;
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}'. Use YYYY-MM-DD", date))?;
    let recurring_interval = interval
        .map(|s| {
            s.parse::<RecurringInterval>()
                .map_err(|_| anyhow!("Unknown interval '{}'", s))
        })
        .transpose()?;
    let recurring_end_date = end_date
        .map(|s| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .with_context(|| format!("Invalid end date '{}'. Use YYYY-MM-DD", s))
        })
        .transpose()?;

    let conn = open_conn()?;
    let id = db::insert_expense(
        &conn,
        &Expense {
            id: None,
            asset_id,
            kind,
            name: name.to_string(),
            amount,
            date,
            recurring_interval,
            recurring_end_date,
            notes: notes.to_string(),
            created_at: Utc::now(),
        },
    )?;

    if json_output {
        println!("{}", serde_json::json!({ "id": id }));
        return Ok(());
    }

    let config = Config::load()?;
    println!(
        "{} Recorded {} expense #{} ({})",
        "✓".green().bold(),
        kind.as_str(),
        id,
        format_amount(amount, &config.currency_symbol)
    );
    Ok(())
}

fn remove_expense(id: i64, json_output: bool) -> Result<()> {
    let conn = open_conn()?;
    db::delete_expense(&conn, id)?;

    if json_output {
        println!("{}", serde_json::json!({ "id": id }));
        return Ok(());
    }
    println!("{} Removed expense #{}", "✓".green().bold(), id);
    Ok(())
}

fn show_occurrences(id: i64, until: Option<&str>, json_output: bool) -> Result<()> {
    let conn = open_conn()?;
    let config = Config::load()?;

    let expense = db::get_expense(&conn, id)?.with_context(|| format!("Expense #{} not found", id))?;
    let horizon = match until {
        Some(s) => parse_flexible_date(s)?,
        None => today(),
    };

    let occurrences = expand_occurrences(&expense, horizon);

    if json_output {
        let entries: Vec<serde_json::Value> = occurrences
            .iter()
            .map(|o| {
                serde_json::json!({
                    "date": o.date,
                    "amount": o.amount.to_string(),
                    "source_expense_id": o.source_expense_id,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if expense.kind != ExpenseKind::Recurring {
        println!(
            "{} Expense #{} is {}, not recurring; nothing to expand.",
            "ℹ".blue().bold(),
            id,
            expense.kind.as_str()
        );
        return Ok(());
    }

    if occurrences.is_empty() {
        println!(
            "{} No occurrences on or before {}.",
            "ℹ".blue().bold(),
            horizon.format("%Y-%m-%d")
        );
        return Ok(());
    }

    #[derive(Tabled)]
    struct OccurrenceRow {
        #[tabled(rename = "#")]
        index: usize,
        #[tabled(rename = "Date")]
        date: String,
        #[tabled(rename = "Amount")]
        amount: String,
    }

    let rows: Vec<OccurrenceRow> = occurrences
        .iter()
        .enumerate()
        .map(|(i, o)| OccurrenceRow {
            index: i + 1,
            date: o.date.format("%Y-%m-%d").to_string(),
            amount: format_amount(o.amount, &config.currency_symbol),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::modern());
    table.modify(Columns::new(2..), Alignment::right());
    println!("{}", table);

    let total: Decimal = occurrences.iter().map(|o| o.amount).sum();
    println!(
        "\n{} occurrence(s), {} total",
        occurrences.len(),
        format_amount(total, &config.currency_symbol)
    );
    Ok(())
}
