use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::debug;

use super::label::DateRange;
use crate::config::Settings;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Cell {
    Number(Decimal),
    Text(String),
    Empty,
}

impl Cell {
    pub(crate) fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Self::Empty
        } else if let Ok(n) = Decimal::from_str(trimmed) {
            Self::Number(n)
        } else {
            Self::Text(trimmed.to_string())
        }
    }

    /// Numeric value of the cell, reading text cells as currency (`$1,234.50`).
    pub(crate) fn amount(&self) -> Option<Decimal> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => parse_currency(s),
            Self::Empty => None,
        }
    }
}

pub(crate) fn parse_currency(s: &str) -> Option<Decimal> {
    let cleaned = s.replace(['$', ','], "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(cleaned)
        .or_else(|_| Decimal::from_scientific(cleaned))
        .ok()
}

/// A rectangular-ish sheet of cells. Rows may differ in length.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Grid {
    rows: Vec<Vec<Cell>>,
}

impl Grid {
    pub(crate) fn from_rows<S: AsRef<str>>(rows: &[Vec<S>]) -> Self {
        Self {
            rows: rows
                .iter()
                .map(|r| r.iter().map(|c| Cell::parse(c.as_ref())).collect())
                .collect(),
        }
    }

    pub(crate) fn height(&self) -> usize {
        self.rows.len()
    }

    pub(crate) fn row(&self, index: usize) -> Option<&[Cell]> {
        self.rows.get(index).map(|r| r.as_slice())
    }
}

/// Heuristics for finding the daily-totals row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ExtractOptions {
    pub(crate) min_amount: Decimal,
    pub(crate) max_amount: Decimal,
    pub(crate) min_row_matches: usize,
    pub(crate) first_row: usize,
    pub(crate) row_count: usize,
}

impl From<&Settings> for ExtractOptions {
    fn from(s: &Settings) -> Self {
        Self {
            min_amount: s.min_daily_amount,
            max_amount: s.max_daily_amount,
            min_row_matches: s.min_row_matches,
            first_row: s.first_candidate_row,
            row_count: s.candidate_row_count,
        }
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self::from(&Settings::default())
    }
}

impl ExtractOptions {
    pub(crate) fn is_plausible_daily_amount(&self, amount: Decimal) -> bool {
        amount >= self.min_amount && amount <= self.max_amount
    }
}

/// Find the first candidate row holding one plausible total per day and map its columns to dates.
///
/// Column `i` is day `range.start + i`. Only the first `range.len_days()` columns are read and
/// nothing past `range.end` is emitted. Returns an empty list when no row qualifies.
pub(crate) fn extract_daily_totals(
    grid: &Grid,
    range: &DateRange,
    opts: &ExtractOptions,
) -> Vec<(NaiveDate, Decimal)> {
    let days = range.len_days();
    let last_row = opts.first_row.saturating_add(opts.row_count).min(grid.height());

    for row_idx in opts.first_row..last_row {
        let Some(row) = grid.row(row_idx) else {
            break;
        };

        let mut found = Vec::new();
        for (col_idx, cell) in row.iter().take(days).enumerate() {
            let Some(amount) = cell.amount() else {
                if let Cell::Text(text) = cell {
                    debug!(row = row_idx, col = col_idx, %text, "skipping non-numeric cell");
                }
                continue;
            };
            if !opts.is_plausible_daily_amount(amount) {
                continue;
            }
            let day = range.day(col_idx);
            if day > range.end {
                continue;
            }
            found.push((day, amount));
        }

        if found.len() >= opts.min_row_matches {
            debug!(row = row_idx, matches = found.len(), "found daily totals row");
            return found;
        }
    }

    Vec::new()
}

#[cfg(test)]
#[path = "grid_tests.rs"]
mod tests;
