use anyhow::Result;
use chrono::NaiveDate;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

use super::grid::{extract_daily_totals, ExtractOptions, Grid};
use super::label::LabelParser;
use super::sheets::{list_sources, SheetSource};
use crate::config::Settings;
use crate::db::Database;
use crate::models::{Expense, Origin};
use crate::period::partition;

/// Description given to every imported daily total.
pub(crate) const DAILY_TOTAL: &str = "Daily Total";

/// Why a sheet contributed nothing. None of these abort an ingestion run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum SkipReason {
    #[error("not a period sheet")]
    NotAPeriodSheet,
    #[error("label does not name a date range")]
    UnparseableLabel,
    #[error("no row with at least {0} plausible daily totals")]
    NoDailyTotalsRow(usize),
    #[error("unreadable: {0}")]
    Unreadable(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SkippedSource {
    pub(crate) label: String,
    pub(crate) reason: SkipReason,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct IngestReport {
    pub(crate) sources_ingested: usize,
    pub(crate) entries: usize,
    pub(crate) periods: usize,
    pub(crate) skipped: Vec<SkippedSource>,
}

/// Turn one labelled grid into ledger entries.
pub(crate) fn extract_sheet(
    label: &str,
    grid: &Grid,
    parser: &LabelParser,
    opts: &ExtractOptions,
    created_at: &str,
) -> Result<Vec<Expense>, SkipReason> {
    let range = parser.parse(label).ok_or(SkipReason::UnparseableLabel)?;
    let totals = extract_daily_totals(grid, &range, opts);
    if totals.is_empty() {
        return Err(SkipReason::NoDailyTotalsRow(opts.min_row_matches));
    }

    let origin = Origin::Imported(label.to_string());
    Ok(totals
        .into_iter()
        .map(|(date, amount)| Expense {
            id: None,
            date,
            description: DAILY_TOTAL.to_string(),
            amount,
            import_hash: compute_hash(&origin, date, DAILY_TOTAL),
            origin: origin.clone(),
            created_at: created_at.to_string(),
        })
        .collect())
}

/// A label worth parsing at all: has a range separator and is not on the ignore list.
fn is_period_label(label: &str, settings: &Settings) -> bool {
    label.contains(" - ") && !settings.is_ignored_label(label)
}

fn read_source(
    source: &SheetSource,
    settings: &Settings,
    parser: &LabelParser,
    opts: &ExtractOptions,
    created_at: &str,
) -> Result<Vec<Expense>, SkipReason> {
    if !is_period_label(&source.label, settings) {
        return Err(SkipReason::NotAPeriodSheet);
    }
    let grid = source
        .read_grid()
        .map_err(|e| SkipReason::Unreadable(format!("{e:#}")))?;
    extract_sheet(&source.label, &grid, parser, opts, created_at)
}

/// Rebuild imported entries and all periods from `sources`.
///
/// Each source is visited once. Sources that cannot be used are reported and skipped; only a
/// storage failure aborts the run, in which case nothing is written.
pub(crate) fn ingest_sources(
    db: &mut Database,
    sources: &[SheetSource],
    settings: &Settings,
    today: NaiveDate,
) -> Result<IngestReport> {
    let parser = LabelParser::new(settings.candidate_years(today), today)?;
    let opts = ExtractOptions::from(settings);
    let created_at = chrono::Utc::now().to_rfc3339();

    let mut report = IngestReport::default();
    let mut expenses: Vec<Expense> = Vec::new();
    for source in sources {
        match read_source(source, settings, &parser, &opts, &created_at) {
            Ok(entries) => {
                info!(label = %source.label, entries = entries.len(), "ingested sheet");
                report.sources_ingested += 1;
                expenses.extend(entries);
            }
            Err(reason) => {
                warn!(label = %source.label, %reason, "skipping sheet");
                report.skipped.push(SkippedSource {
                    label: source.label.clone(),
                    reason,
                });
            }
        }
    }

    let mut dates = db.get_manual_expense_dates()?;
    dates.extend(expenses.iter().map(|e| e.date));
    let periods = partition(&dates, today, settings.default_allowance);

    let (entries, periods) = db.replace_imported(&expenses, &periods)?;
    report.entries = entries;
    report.periods = periods;
    info!(
        sources = report.sources_ingested,
        skipped = report.skipped.len(),
        entries,
        periods,
        "ingestion finished"
    );
    Ok(report)
}

/// Ingest a directory of CSV sheets, or a single CSV file.
pub(crate) fn ingest_path(
    db: &mut Database,
    path: &Path,
    settings: &Settings,
    today: NaiveDate,
) -> Result<IngestReport> {
    let sources = list_sources(path)?;
    ingest_sources(db, &sources, settings, today)
}

/// Compute a stable, deterministic hash for deduplication.
/// FNV-1a is used instead of DefaultHasher, whose output may change between Rust releases.
fn compute_hash(origin: &Origin, date: NaiveDate, description: &str) -> String {
    let input = format!("{}|{date}|{description}", origin.as_db_string());
    let hash = fnv1a(input.as_bytes());
    format!("{hash:016x}")
}

fn fnv1a(data: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf29ce484222325;
    for &byte in data {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

#[cfg(test)]
#[path = "ingest_tests.rs"]
mod tests;
