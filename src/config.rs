//! User settings.
//!
//! Read from `config.json` next to the database. Every field is optional in the file; anything
//! missing takes its default. The extraction heuristics live here because they were tuned to one
//! person's spreadsheets and are expected to need adjusting.

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Upper bound for `history_days`, about a century.
pub(crate) const MAX_HISTORY_DAYS: i64 = 36_500;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Settings {
    /// Allowance given to every newly created period.
    pub(crate) default_allowance: Decimal,
    /// Smallest cell value accepted as a daily total.
    pub(crate) min_daily_amount: Decimal,
    /// Largest cell value accepted as a daily total.
    pub(crate) max_daily_amount: Decimal,
    /// Qualifying cells a row needs before it is taken as the daily-totals row.
    pub(crate) min_row_matches: usize,
    /// First grid row (0-based, header row included) scanned for daily totals.
    pub(crate) first_candidate_row: usize,
    pub(crate) candidate_row_count: usize,
    /// Years tried, in order, when a sheet label has no year. `None` means this year, then last.
    pub(crate) candidate_years: Option<Vec<i32>>,
    /// Sheet labels that never describe a period (compared case-insensitively).
    pub(crate) ignored_labels: Vec<String>,
    /// Window used by the category and daily-spend reports.
    pub(crate) history_days: i64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_allowance: Decimal::new(50000, 2),
            min_daily_amount: Decimal::new(50, 2),
            max_daily_amount: Decimal::new(30000, 2),
            min_row_matches: 5,
            first_candidate_row: 15,
            candidate_row_count: 6,
            candidate_years: None,
            ignored_labels: vec!["general".to_string()],
            history_days: 30,
        }
    }
}

impl Settings {
    /// Load settings, falling back to defaults when the file does not exist.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings: {}", path.display()))?;
        let settings: Settings = serde_json::from_str(&contents)
            .with_context(|| format!("Malformed settings file: {}", path.display()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Like [`Settings::load`], but writes the defaults out when no file exists yet so they can
    /// be edited.
    pub(crate) fn load_or_init(path: &Path) -> Result<Self> {
        if path.exists() {
            return Self::load(path);
        }
        let settings = Self::default();
        settings.save(path)?;
        tracing::info!(path = %path.display(), "wrote default settings");
        Ok(settings)
    }

    pub(crate) fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize settings")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write settings: {}", path.display()))
    }

    fn validate(&self) -> Result<()> {
        if self.default_allowance < Decimal::ZERO {
            anyhow::bail!("default_allowance must not be negative");
        }
        if self.min_daily_amount <= Decimal::ZERO || self.min_daily_amount > self.max_daily_amount {
            anyhow::bail!(
                "daily amount bounds must satisfy 0 < min_daily_amount <= max_daily_amount"
            );
        }
        if self.min_row_matches == 0 {
            anyhow::bail!("min_row_matches must be at least 1");
        }
        if !(1..=MAX_HISTORY_DAYS).contains(&self.history_days) {
            anyhow::bail!("history_days must be between 1 and {MAX_HISTORY_DAYS}");
        }
        if matches!(&self.candidate_years, Some(years) if years.is_empty()) {
            anyhow::bail!("candidate_years must not be empty when set");
        }
        Ok(())
    }

    /// Candidate years for label inference, most recent first.
    pub(crate) fn candidate_years(&self, as_of: NaiveDate) -> Vec<i32> {
        match &self.candidate_years {
            Some(years) => years.clone(),
            None => vec![as_of.year(), as_of.year() - 1],
        }
    }

    pub(crate) fn is_ignored_label(&self, label: &str) -> bool {
        let label = label.trim();
        self.ignored_labels
            .iter()
            .any(|l| l.trim().eq_ignore_ascii_case(label))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.default_allowance, dec!(500.00));
        assert_eq!(s.min_daily_amount, dec!(0.50));
        assert_eq!(s.max_daily_amount, dec!(300.00));
        assert_eq!(s.min_row_matches, 5);
        assert!(s.is_ignored_label("General"));
        assert!(!s.is_ignored_label("Jan 15 - 28"));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let s = Settings::load(&dir.path().join("config.json")).unwrap();
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{"default_allowance": "650.00", "candidate_years": [2025, 2024]}"#)
            .unwrap();
        let s = Settings::load(file.path()).unwrap();
        assert_eq!(s.default_allowance, dec!(650.00));
        assert_eq!(s.candidate_years, Some(vec![2025, 2024]));
        assert_eq!(s.min_row_matches, 5);
    }

    #[test]
    fn test_malformed_file_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();
        assert!(Settings::load(file.path()).is_err());
    }

    #[test]
    fn test_invalid_bounds_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{"min_daily_amount": "400", "max_daily_amount": "300"}"#)
            .unwrap();
        assert!(Settings::load(file.path()).is_err());
    }

    #[test]
    fn test_history_days_out_of_range_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{"history_days": 1000000000}"#).unwrap();
        assert!(Settings::load(file.path()).is_err());

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{"history_days": 0}"#).unwrap();
        assert!(Settings::load(file.path()).is_err());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut s = Settings::default();
        s.min_row_matches = 3;
        s.save(&path).unwrap();
        assert_eq!(Settings::load(&path).unwrap(), s);
    }

    #[test]
    fn test_load_or_init_writes_defaults_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        assert_eq!(Settings::load_or_init(&path).unwrap(), Settings::default());
        assert!(path.exists());

        std::fs::write(&path, r#"{"history_days": 14}"#).unwrap();
        assert_eq!(Settings::load_or_init(&path).unwrap().history_days, 14);
    }

    #[test]
    fn test_candidate_years_default_to_this_year_then_last() {
        let s = Settings::default();
        let as_of = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();
        assert_eq!(s.candidate_years(as_of), vec![2025, 2024]);
    }
}
