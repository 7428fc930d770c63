use anyhow::{bail, Result};
use chrono::{Datelike, NaiveDate};
use clap::{Parser, Subcommand};

pub mod formatters;

#[derive(Parser)]
#[command(name = "upkeep")]
#[command(version, about = "Personal asset and expense tracker")]
#[command(
    long_about = "Track the things you own, the expenses they accrue, and what each one really costs per day of ownership. Records live in a local SQLite database; snapshots can be exported to JSON or backed up to a gist."
)]
pub struct Cli {
    /// Disable colorized/ANSI output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Output results in JSON format
    #[arg(long = "json", global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the database and seed the default category tree
    Init,

    /// Asset management
    Assets {
        #[command(subcommand)]
        action: AssetsCommands,
    },

    /// Category management
    Categories {
        #[command(subcommand)]
        action: CategoriesCommands,
    },

    /// Expense management
    Expenses {
        #[command(subcommand)]
        action: ExpensesCommands,
    },

    /// Cost statistics for one asset or the whole portfolio
    Stats {
        /// Asset id; omit for the portfolio roll-up
        #[arg(long)]
        asset: Option<i64>,

        /// Evaluate as of this date (YYYY-MM-DD, YYYY-MM, or YYYY)
        #[arg(long)]
        at: Option<String>,
    },

    /// Export all data to a JSON snapshot file
    Export {
        /// Destination file path
        path: String,
    },

    /// Import a JSON snapshot file, replacing all local data
    Import {
        /// Snapshot file path
        path: String,
    },

    /// Cloud backup of the database via gist
    Backup {
        #[command(subcommand)]
        action: BackupCommands,
    },
}

#[derive(Subcommand)]
pub enum AssetsCommands {
    /// List assets with their cost statistics
    List {
        /// Filter by category name (includes its subcategories)
        #[arg(long)]
        category: Option<String>,

        /// Filter by a case-insensitive name substring
        #[arg(long)]
        search: Option<String>,

        /// Sort field
        #[arg(long, default_value = "date", value_parser = ["date", "name", "total-cost", "daily-cost"])]
        sort: String,

        /// Sort descending
        #[arg(long)]
        desc: bool,
    },

    /// Show one asset with its expenses and statistics
    Show {
        /// Asset id
        id: i64,
    },

    /// Add a new asset
    Add {
        /// Asset name
        name: String,

        /// Category name (top-level)
        #[arg(long)]
        category: String,

        /// Subcategory name under the category
        #[arg(long)]
        subcategory: Option<String>,

        /// Optional notes
        #[arg(long, default_value = "")]
        notes: String,
    },

    /// Rename an asset
    SetName {
        /// Asset id
        id: i64,

        /// New name
        name: String,
    },

    /// Replace an asset's notes
    SetNotes {
        /// Asset id
        id: i64,

        /// New notes
        notes: String,
    },

    /// Move an asset to another category
    Move {
        /// Asset id
        id: i64,

        /// Category name (top-level)
        #[arg(long)]
        category: String,

        /// Subcategory name under the category
        #[arg(long)]
        subcategory: Option<String>,
    },

    /// Remove an asset and all its expenses
    Remove {
        /// Asset id
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum CategoriesCommands {
    /// List the category tree
    List,

    /// Add a category
    Add {
        /// Category name
        name: String,

        /// Emoji shown next to the name
        #[arg(long, default_value = "")]
        emoji: String,

        /// Parent category name (makes this a subcategory)
        #[arg(long)]
        parent: Option<String>,

        /// Position among siblings (appended last when omitted)
        #[arg(long)]
        sort_order: Option<i64>,
    },

    /// Remove a category (refused while assets still use it)
    Remove {
        /// Category id
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum ExpensesCommands {
    /// List the expenses of an asset
    List {
        /// Asset id
        asset_id: i64,
    },

    /// Record an expense against an asset
    Add {
        /// Asset id
        asset_id: i64,

        /// Expense kind
        #[arg(value_parser = ["initial", "one-time", "recurring", "sale"])]
        kind: String,

        /// Amount (non-negative; direction implied by kind)
        amount: String,

        /// Date (YYYY-MM-DD): purchase date, occurrence date, or cycle start
        date: String,

        /// Short label for the expense
        #[arg(long, default_value = "")]
        name: String,

        /// Billing interval, required for recurring expenses
        #[arg(long, value_parser = ["daily", "monthly", "yearly"])]
        interval: Option<String>,

        /// Last day of a recurring series (open-ended when omitted)
        #[arg(long)]
        end_date: Option<String>,

        /// Optional notes
        #[arg(long, default_value = "")]
        notes: String,
    },

    /// Remove an expense
    Remove {
        /// Expense id
        id: i64,
    },

    /// Show the billing schedule of a recurring expense
    Occurrences {
        /// Expense id
        id: i64,

        /// Expand up to this date (defaults to today)
        #[arg(long)]
        until: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum BackupCommands {
    /// Upload a snapshot to the backup gist (created on first push)
    Push,

    /// Download the backup snapshot, replacing all local data
    Pull,

    /// Show backup gist metadata
    Info,
}

/// Parse flexible date formats: YYYY-MM-DD, YYYY-MM (last day of month),
/// or YYYY (December 31)
pub fn parse_flexible_date(s: &str) -> Result<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }

    // YYYY-MM: resolve to the last day of that month
    if let Ok(first) = NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d") {
        let next_month = if first.month() == 12 {
            NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
        };
        if let Some(nm) = next_month {
            return Ok(nm.pred_opt().unwrap_or(first));
        }
    }

    // YYYY: December 31
    if let Ok(year) = s.parse::<i32>() {
        if (1900..=2100).contains(&year) {
            if let Some(date) = NaiveDate::from_ymd_opt(year, 12, 31) {
                return Ok(date);
            }
        }
    }

    bail!("Invalid date '{}'. Use YYYY-MM-DD, YYYY-MM, or YYYY", s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flexible_date_full() {
        assert_eq!(
            parse_flexible_date("2024-02-29").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
    }

    #[test]
    fn test_parse_flexible_date_year_month() {
        assert_eq!(
            parse_flexible_date("2024-02").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert_eq!(
            parse_flexible_date("2023-12").unwrap(),
            NaiveDate::from_ymd_opt(2023, 12, 31).unwrap()
        );
    }

    #[test]
    fn test_parse_flexible_date_year() {
        assert_eq!(
            parse_flexible_date("2024").unwrap(),
            NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()
        );
    }

    #[test]
    fn test_parse_flexible_date_rejects_garbage() {
        assert!(parse_flexible_date("yesterday").is_err());
        assert!(parse_flexible_date("2024-13").is_err());
        assert!(parse_flexible_date("99").is_err());
    }
}
