//! Recurring expense occurrence expansion
//!
//! A recurring expense describes a series of charges anchored at its start
//! date: one charge per interval (day, month, or year), open-ended unless an
//! end date is set. Expansion materializes the concrete charge dates up to a
//! horizon, which is what the cost aggregation and the occurrence schedule
//! view both build on.
//!
//! Month and year steps use calendar-aware addition that clamps to the last
//! valid day of the target month (a series anchored on Jan 31 bills on
//! Feb 28/29, Mar 31, Apr 30, ...).

use chrono::{Days, Months, NaiveDate};
use rust_decimal::Decimal;

use crate::db::models::{Expense, ExpenseKind, RecurringInterval};

/// Hard cap on expansion steps (~100 years of daily charges). Guarantees
/// termination for any input, e.g. an end date centuries in the future.
const MAX_STEPS: u32 = 36_500;

/// One concrete dated charge of a recurring expense
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence {
    pub date: NaiveDate,
    pub amount: Decimal,
    pub source_expense_id: Option<i64>,
}

fn advance(anchor: NaiveDate, interval: RecurringInterval, steps: u32) -> Option<NaiveDate> {
    match interval {
        RecurringInterval::Daily => anchor.checked_add_days(Days::new(u64::from(steps))),
        RecurringInterval::Monthly => anchor.checked_add_months(Months::new(steps)),
        RecurringInterval::Yearly => anchor.checked_add_months(Months::new(steps * 12)),
    }
}

/// Expand a recurring expense into its dated occurrences up to `horizon`.
///
/// Non-recurring expenses (or a recurring row with no interval) produce an
/// empty schedule, so callers can map this over mixed expense lists. The
/// boundary is the earlier of the series end date and `horizon`; a charge
/// falling exactly on the boundary day is included. The anchor date itself
/// is the first occurrence when it is on or before the boundary.
///
/// Pure function of its inputs: same expense and horizon, same schedule.
pub fn expand_occurrences(expense: &Expense, horizon: NaiveDate) -> Vec<Occurrence> {
    if expense.kind != ExpenseKind::Recurring {
        return Vec::new();
    }
    let Some(interval) = expense.recurring_interval else {
        return Vec::new();
    };

    let end = match expense.recurring_end_date {
        Some(series_end) => series_end.min(horizon),
        None => horizon,
    };

    let mut occurrences = Vec::new();
    for step in 0..=MAX_STEPS {
        let Some(date) = advance(expense.date, interval, step) else {
            break;
        };
        if date > end {
            break;
        }
        occurrences.push(Occurrence {
            date,
            amount: expense.amount,
            source_expense_id: expense.id,
        });
    }

    occurrences
}

/// Number of charges the expense implies up to `horizon`
pub fn count_occurrences(expense: &Expense, horizon: NaiveDate) -> usize {
    expand_occurrences(expense, horizon).len()
}

/// Total billed amount up to `horizon`: occurrence count times the amount
pub fn total_recurring_cost(expense: &Expense, horizon: NaiveDate) -> Decimal {
    Decimal::from(count_occurrences(expense, horizon) as u64) * expense.amount
}
