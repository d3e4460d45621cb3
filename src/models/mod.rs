mod category;
mod expense;
mod period;

pub use category::Category;
pub use expense::{EntryError, Expense, Origin};
pub use period::{BudgetPeriod, PERIOD_DAYS};
