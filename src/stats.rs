//! Cost aggregation over an asset's expense records
//!
//! Folds every expense effect (purchase, one-time charges, expanded
//! recurring charges, resale income) into a single statistics record, and
//! rolls per-asset records up into portfolio totals. Both functions are
//! pure: the evaluation date is always passed in, never read from a clock.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::db::models::{Expense, ExpenseKind};
use crate::recurring::total_recurring_cost;

/// Derived cost metrics for one asset. Never persisted; recomputed from the
/// expense records on every read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetStats {
    pub initial_expense_date: Option<NaiveDate>,
    /// Days held since the initial expense, floored at 1 so the daily cost
    /// is always defined.
    pub holding_days: i64,
    pub total_expenses: Decimal,
    pub total_sale_income: Decimal,
    /// `total_expenses - total_sale_income`; negative when sales exceed spend.
    pub net_cost: Decimal,
    pub daily_cost: Decimal,
}

/// Portfolio roll-up across all assets
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortfolioStats {
    pub total_net_cost: Decimal,
    pub total_daily_cost: Decimal,
    pub asset_count: usize,
}

/// Compute the cost metrics for one asset from its expense records.
///
/// The first `initial` expense encountered anchors the holding period;
/// duplicates are tolerated silently. Recurring expenses contribute their
/// expanded total up to `today`. Empty input yields the zero record with
/// `holding_days = 1`.
pub fn compute_asset_stats(expenses: &[Expense], today: NaiveDate) -> AssetStats {
    let initial_expense_date = expenses
        .iter()
        .find(|e| e.kind == ExpenseKind::Initial)
        .map(|e| e.date);

    let holding_days = initial_expense_date
        .map(|d| today.signed_duration_since(d).num_days().max(1))
        .unwrap_or(1);

    let mut total_expenses = Decimal::ZERO;
    let mut total_sale_income = Decimal::ZERO;

    for expense in expenses {
        match expense.kind {
            ExpenseKind::Initial | ExpenseKind::OneTime => total_expenses += expense.amount,
            ExpenseKind::Recurring => total_expenses += total_recurring_cost(expense, today),
            ExpenseKind::Sale => total_sale_income += expense.amount,
        }
    }

    let net_cost = total_expenses - total_sale_income;
    let daily_cost = net_cost / Decimal::from(holding_days);

    AssetStats {
        initial_expense_date,
        holding_days,
        total_expenses,
        total_sale_income,
        net_cost,
        daily_cost,
    }
}

/// Sum per-asset stats across expense groups, one group per asset.
pub fn compute_portfolio_stats(groups: &[Vec<Expense>], today: NaiveDate) -> PortfolioStats {
    let mut total_net_cost = Decimal::ZERO;
    let mut total_daily_cost = Decimal::ZERO;

    for expenses in groups {
        let stats = compute_asset_stats(expenses, today);
        total_net_cost += stats.net_cost;
        total_daily_cost += stats.daily_cost;
    }

    PortfolioStats {
        total_net_cost,
        total_daily_cost,
        asset_count: groups.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::RecurringInterval;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn expense(kind: ExpenseKind, amount: Decimal, date: NaiveDate) -> Expense {
        Expense {
            id: Some(1),
            asset_id: 1,
            kind,
            name: String::new(),
            amount,
            date,
            recurring_interval: None,
            recurring_end_date: None,
            notes: String::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_input_yields_zero_stats() {
        let stats = compute_asset_stats(&[], ymd(2024, 6, 1));
        assert_eq!(stats.initial_expense_date, None);
        assert_eq!(stats.holding_days, 1);
        assert_eq!(stats.total_expenses, Decimal::ZERO);
        assert_eq!(stats.total_sale_income, Decimal::ZERO);
        assert_eq!(stats.net_cost, Decimal::ZERO);
        assert_eq!(stats.daily_cost, Decimal::ZERO);
    }

    #[test]
    fn test_initial_expense_amortizes_over_holding_days() {
        // 12000 spent 30 days ago amortizes to 400/day
        let expenses = vec![expense(ExpenseKind::Initial, dec!(12000), ymd(2024, 1, 1))];
        let stats = compute_asset_stats(&expenses, ymd(2024, 1, 31));
        assert_eq!(stats.initial_expense_date, Some(ymd(2024, 1, 1)));
        assert_eq!(stats.holding_days, 30);
        assert_eq!(stats.total_expenses, dec!(12000));
        assert_eq!(stats.daily_cost, dec!(400));
    }

    #[test]
    fn test_holding_days_floors_at_one() {
        // Bought today: one day, not zero
        let expenses = vec![expense(ExpenseKind::Initial, dec!(500), ymd(2024, 3, 10))];
        let stats = compute_asset_stats(&expenses, ymd(2024, 3, 10));
        assert_eq!(stats.holding_days, 1);
        assert_eq!(stats.daily_cost, dec!(500));

        // Initial date recorded in the future still floors at one
        let stats = compute_asset_stats(&expenses, ymd(2024, 3, 1));
        assert_eq!(stats.holding_days, 1);
    }

    #[test]
    fn test_sale_income_can_push_net_cost_negative() {
        let expenses = vec![
            expense(ExpenseKind::Initial, dec!(5000), ymd(2024, 1, 1)),
            expense(ExpenseKind::Sale, dec!(6000), ymd(2024, 2, 1)),
        ];
        let stats = compute_asset_stats(&expenses, ymd(2024, 2, 1));
        assert_eq!(stats.total_expenses, dec!(5000));
        assert_eq!(stats.total_sale_income, dec!(6000));
        assert_eq!(stats.net_cost, dec!(-1000));
    }

    #[test]
    fn test_one_time_and_recurring_both_add_to_total() {
        let mut subscription = expense(ExpenseKind::Recurring, dec!(100), ymd(2024, 1, 1));
        subscription.recurring_interval = Some(RecurringInterval::Monthly);

        let expenses = vec![
            expense(ExpenseKind::Initial, dec!(1000), ymd(2024, 1, 1)),
            expense(ExpenseKind::OneTime, dec!(250), ymd(2024, 2, 15)),
            subscription,
        ];
        // Horizon 2024-03-10: subscription billed Jan, Feb, Mar = 300
        let stats = compute_asset_stats(&expenses, ymd(2024, 3, 10));
        assert_eq!(stats.total_expenses, dec!(1550));
    }

    #[test]
    fn test_first_initial_expense_wins() {
        let expenses = vec![
            expense(ExpenseKind::Initial, dec!(100), ymd(2024, 2, 1)),
            expense(ExpenseKind::Initial, dec!(200), ymd(2024, 1, 1)),
        ];
        let stats = compute_asset_stats(&expenses, ymd(2024, 2, 11));
        // Holding anchored on the first record in input order; both amounts
        // still count toward the total.
        assert_eq!(stats.initial_expense_date, Some(ymd(2024, 2, 1)));
        assert_eq!(stats.holding_days, 10);
        assert_eq!(stats.total_expenses, dec!(300));
    }

    #[test]
    fn test_portfolio_sums_signed_net_costs() {
        let gains = vec![
            expense(ExpenseKind::Initial, dec!(100), ymd(2024, 1, 1)),
            expense(ExpenseKind::Sale, dec!(150), ymd(2024, 1, 2)),
        ];
        let spend = vec![expense(ExpenseKind::Initial, dec!(100), ymd(2024, 1, 1))];
        let stats = compute_portfolio_stats(&[spend, gains], ymd(2024, 1, 11));
        assert_eq!(stats.asset_count, 2);
        assert_eq!(stats.total_net_cost, dec!(50));
    }

    #[test]
    fn test_portfolio_of_nothing() {
        let stats = compute_portfolio_stats(&[], ymd(2024, 1, 1));
        assert_eq!(stats.asset_count, 0);
        assert_eq!(stats.total_net_cost, Decimal::ZERO);
        assert_eq!(stats.total_daily_cost, Decimal::ZERO);
    }
}
