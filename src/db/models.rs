use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How an expense contributes to an asset's cost aggregates
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ExpenseKind {
    #[serde(rename = "initial")]
    Initial, // Purchase cost, anchors the holding period
    #[serde(rename = "one-time")]
    OneTime, // Single charge (repair, accessory, ...)
    #[serde(rename = "recurring")]
    Recurring, // Repeating charge (subscription, insurance, ...)
    #[serde(rename = "sale")]
    Sale, // Resale income, reduces net cost
}

impl ExpenseKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseKind::Initial => "initial",
            ExpenseKind::OneTime => "one-time",
            ExpenseKind::Recurring => "recurring",
            ExpenseKind::Sale => "sale",
        }
    }
}

impl FromStr for ExpenseKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "initial" => Ok(ExpenseKind::Initial),
            "one-time" | "one_time" | "onetime" => Ok(ExpenseKind::OneTime),
            "recurring" => Ok(ExpenseKind::Recurring),
            "sale" => Ok(ExpenseKind::Sale),
            _ => Err(()),
        }
    }
}

/// Billing cadence of a recurring expense
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum RecurringInterval {
    #[serde(rename = "daily")]
    Daily,
    #[serde(rename = "monthly")]
    Monthly,
    #[serde(rename = "yearly")]
    Yearly,
}

impl RecurringInterval {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecurringInterval::Daily => "daily",
            RecurringInterval::Monthly => "monthly",
            RecurringInterval::Yearly => "yearly",
        }
    }
}

impl FromStr for RecurringInterval {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" | "day" => Ok(RecurringInterval::Daily),
            "monthly" | "month" => Ok(RecurringInterval::Monthly),
            "yearly" | "year" | "annual" => Ok(RecurringInterval::Yearly),
            _ => Err(()),
        }
    }
}

/// Category for grouping assets; one optional level of nesting via parent_id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: Option<i64>,
    pub name: String,
    pub emoji: String,
    pub parent_id: Option<i64>,
    pub sort_order: i64,
    pub created_at: DateTime<Utc>,
}

/// An owned item that expenses are logged against
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    pub id: Option<i64>,
    pub name: String,
    pub category_id: i64,
    pub subcategory_id: Option<i64>,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A cost or income record attached to an asset.
///
/// `amount` is stored as an absolute value; direction is implied by `kind`.
/// `recurring_interval` is set iff `kind == Recurring`. `date` is the
/// purchase date for `Initial`, the occurrence date for `OneTime`/`Sale`,
/// and the cycle-start date for `Recurring`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: Option<i64>,
    pub asset_id: i64,
    pub kind: ExpenseKind,
    pub name: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub recurring_interval: Option<RecurringInterval>,
    pub recurring_end_date: Option<NaiveDate>,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}
