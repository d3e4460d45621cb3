//! Read-side sums over stored ledger rows.
//!
//! Everything here except the `*_for` loaders is a pure function of the rows it is given.

use anyhow::Result;
use chrono::{Duration, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::BTreeMap;

use crate::categorize::Categorizer;
use crate::config::Settings;
use crate::db::Database;
use crate::models::{BudgetPeriod, Category, Expense};
use crate::period::resolve_current;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PeriodStatus {
    pub(crate) period: BudgetPeriod,
    pub(crate) total_spent: Decimal,
    /// May be negative once the allowance is overspent.
    pub(crate) remaining: Decimal,
    pub(crate) days_left: i64,
    pub(crate) daily_limit: Decimal,
}

/// Expenses recorded on a single day, newest first, with their total.
#[derive(Debug, Clone)]
pub(crate) struct DaySpending {
    pub(crate) date: NaiveDate,
    pub(crate) entries: Vec<Expense>,
    pub(crate) total: Decimal,
}

/// Sum of every expense dated inside the period's inclusive window.
///
/// Sums saturate at `Decimal::MAX` instead of overflowing.
pub(crate) fn total_spent(period: &BudgetPeriod, expenses: &[Expense]) -> Decimal {
    expenses
        .iter()
        .filter(|e| period.contains(e.date))
        .fold(Decimal::ZERO, |acc, e| acc.saturating_add(e.amount))
}

pub(crate) fn period_status(
    period: &BudgetPeriod,
    expenses: &[Expense],
    today: NaiveDate,
) -> PeriodStatus {
    let total_spent = total_spent(period, expenses);
    let remaining = period.allowance.saturating_sub(total_spent);
    let days_left = period.days_left(today);
    let daily_limit = (remaining / Decimal::from(days_left))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    PeriodStatus {
        period: period.clone(),
        total_spent,
        remaining,
        days_left,
        daily_limit,
    }
}

/// Spend per category, largest first. Categories with no spend are left out.
pub(crate) fn category_totals(
    expenses: &[Expense],
    categorizer: &Categorizer,
) -> Vec<(Category, Decimal)> {
    let mut totals: BTreeMap<Category, Decimal> = BTreeMap::new();
    for expense in expenses {
        let total = totals
            .entry(categorizer.categorize_expense(expense))
            .or_default();
        *total = total.saturating_add(expense.amount);
    }
    let mut totals: Vec<(Category, Decimal)> = totals.into_iter().collect();
    totals.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    totals
}

/// One point per day that has spending, oldest first.
pub(crate) fn daily_totals(expenses: &[Expense]) -> Vec<(NaiveDate, Decimal)> {
    let mut days: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for expense in expenses {
        let total = days.entry(expense.date).or_default();
        *total = total.saturating_add(expense.amount);
    }
    days.into_iter().collect()
}

/// Total spent in each period, in the order the periods are given.
///
/// The stored current flag is not trusted: a period is marked current only if it covers `today`.
pub(crate) fn period_history(
    periods: &[BudgetPeriod],
    expenses: &[Expense],
    today: NaiveDate,
) -> Vec<(BudgetPeriod, Decimal)> {
    periods
        .iter()
        .map(|p| {
            let mut period = p.clone();
            period.is_current = period.contains(today);
            let spent = total_spent(&period, expenses);
            (period, spent)
        })
        .collect()
}

pub(crate) fn day_spending(day: NaiveDate, expenses: &[Expense]) -> DaySpending {
    let entries: Vec<Expense> = expenses.iter().filter(|e| e.date == day).cloned().collect();
    let total = entries
        .iter()
        .fold(Decimal::ZERO, |acc, e| acc.saturating_add(e.amount));
    DaySpending {
        date: day,
        entries,
        total,
    }
}

/// Inclusive window from `days` days before today up to today.
pub(crate) fn trailing_window(today: NaiveDate, days: i64) -> Result<(NaiveDate, NaiveDate)> {
    let from = Duration::try_days(days.max(0))
        .and_then(|span| today.checked_sub_signed(span))
        .ok_or_else(|| {
            anyhow::anyhow!("A window of {days} days is out of the supported date range")
        })?;
    Ok((from, today))
}

/// Status of the period covering `today`, creating that period if needed.
pub(crate) fn current_status_for(
    db: &Database,
    settings: &Settings,
    today: NaiveDate,
) -> Result<PeriodStatus> {
    let period = resolve_current(db, today, settings.default_allowance)?;
    let expenses = db.get_expenses_between(period.start_date, period.end_date)?;
    Ok(period_status(&period, &expenses, today))
}

pub(crate) fn category_totals_for(
    db: &Database,
    today: NaiveDate,
    days: i64,
) -> Result<Vec<(Category, Decimal)>> {
    let (from, to) = trailing_window(today, days)?;
    let expenses = db.get_expenses_between(from, to)?;
    Ok(category_totals(&expenses, &Categorizer::default()))
}

pub(crate) fn daily_totals_for(
    db: &Database,
    today: NaiveDate,
    days: i64,
) -> Result<Vec<(NaiveDate, Decimal)>> {
    let (from, to) = trailing_window(today, days)?;
    Ok(daily_totals(&db.get_expenses_between(from, to)?))
}

pub(crate) fn period_history_for(
    db: &Database,
    today: NaiveDate,
) -> Result<Vec<(BudgetPeriod, Decimal)>> {
    let periods = db.get_periods()?;
    let expenses = db.get_all_expenses()?;
    Ok(period_history(&periods, &expenses, today))
}

pub(crate) fn day_spending_for(db: &Database, day: NaiveDate) -> Result<DaySpending> {
    let expenses = db.get_expenses_between(day, day)?;
    Ok(day_spending(day, &expenses))
}

#[cfg(test)]
mod tests;
