use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;

/// Length of every budget period, inclusive of both ends.
pub const PERIOD_DAYS: i64 = 14;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BudgetPeriod {
    pub id: Option<i64>,
    pub start_date: NaiveDate,
    /// Inclusive.
    pub end_date: NaiveDate,
    pub allowance: Decimal,
    /// Advisory only; re-validated against the real date on every resolve.
    pub is_current: bool,
}

impl BudgetPeriod {
    pub fn starting(start_date: NaiveDate, allowance: Decimal) -> Self {
        Self {
            id: None,
            start_date,
            end_date: start_date + Duration::days(PERIOD_DAYS - 1),
            allowance,
            is_current: false,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// Days remaining in the period counting `today`, never less than 1.
    pub fn days_left(&self, today: NaiveDate) -> i64 {
        ((self.end_date - today).num_days() + 1).max(1)
    }

    pub fn next(&self) -> Self {
        Self::starting(self.end_date + Duration::days(1), self.allowance)
    }

    pub fn label(&self) -> String {
        format!(
            "{} – {}",
            self.start_date.format("%b %d, %Y"),
            self.end_date.format("%b %d, %Y")
        )
    }
}
