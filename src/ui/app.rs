use anyhow::Result;
use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;

use crate::config::Settings;
use crate::db::Database;
use crate::models::{BudgetPeriod, Category};
use crate::report::{self, DaySpending, PeriodStatus};
use crate::ui::util::ListCursor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Dashboard,
    Periods,
}

impl Screen {
    pub(crate) fn all() -> &'static [Screen] {
        &[Self::Dashboard, Self::Periods]
    }

    pub(crate) fn next(self) -> Self {
        let screens = Self::all();
        let idx = screens.iter().position(|s| *s == self).unwrap_or(0);
        screens[(idx + 1) % screens.len()]
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dashboard => write!(f, "Dashboard"),
            Self::Periods => write!(f, "Periods"),
        }
    }
}

pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) screen: Screen,
    pub(crate) status_message: String,
    pub(crate) show_help: bool,
    pub(crate) today: NaiveDate,
    pub(crate) settings: Settings,

    // Dashboard
    pub(crate) status: Option<PeriodStatus>,
    pub(crate) category_totals: Vec<(Category, Decimal)>,
    /// Spend per day over the trailing window, zero-filled, oldest first.
    pub(crate) daily_spend: Vec<Decimal>,
    pub(crate) today_spending: Option<DaySpending>,
    pub(crate) expense_count: i64,

    // Periods
    pub(crate) history: Vec<(BudgetPeriod, Decimal)>,
    pub(crate) period_cursor: ListCursor,

    // Layout (updated each render frame)
    pub(crate) visible_rows: usize,
}

impl App {
    pub(crate) fn new(settings: Settings, today: NaiveDate) -> Self {
        Self {
            running: true,
            screen: Screen::Dashboard,
            status_message: String::new(),
            show_help: false,
            today,
            settings,

            status: None,
            category_totals: Vec::new(),
            daily_spend: Vec::new(),
            today_spending: None,
            expense_count: 0,

            history: Vec::new(),
            period_cursor: ListCursor::default(),

            visible_rows: 20,
        }
    }

    pub(crate) fn refresh_dashboard(&mut self, db: &Database) -> Result<()> {
        let days = self.settings.history_days;
        self.status = Some(report::current_status_for(db, &self.settings, self.today)?);
        self.category_totals = report::category_totals_for(db, self.today, days)?;
        let (from, to) = report::trailing_window(self.today, days)?;
        let totals = report::daily_totals_for(db, self.today, days)?;
        self.daily_spend = zero_filled(&totals, from, to);
        self.today_spending = Some(report::day_spending_for(db, self.today)?);
        self.expense_count = db.get_expense_count()?;
        Ok(())
    }

    pub(crate) fn refresh_periods(&mut self, db: &Database) -> Result<()> {
        self.history = report::period_history_for(db, self.today)?;
        self.period_cursor.clamp(self.history.len());
        Ok(())
    }

    pub(crate) fn refresh_all(&mut self, db: &Database) -> Result<()> {
        // Dashboard first: resolving the current period may create it
        self.refresh_dashboard(db)?;
        self.refresh_periods(db)?;
        Ok(())
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }
}

/// Expand sparse daily totals into one value per day of `[from, to]`.
pub(crate) fn zero_filled(
    totals: &[(NaiveDate, Decimal)],
    from: NaiveDate,
    to: NaiveDate,
) -> Vec<Decimal> {
    let len = (to - from).num_days() + 1;
    (0..len)
        .map(|offset| {
            let day = from + Duration::days(offset);
            totals
                .iter()
                .find(|(d, _)| *d == day)
                .map(|(_, amount)| *amount)
                .unwrap_or(Decimal::ZERO)
        })
        .collect()
}
