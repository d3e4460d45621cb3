//! Budget period tiling and current-period resolution.

use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

use crate::db::Database;
use crate::models::BudgetPeriod;

/// Tile `[min(dates), max(dates)]` with consecutive 14-day periods.
///
/// The last period is never clipped, so it may run past the latest date. The period containing
/// `today`, if any, is flagged current. No dates means no periods.
pub(crate) fn partition(
    dates: &[NaiveDate],
    today: NaiveDate,
    allowance: Decimal,
) -> Vec<BudgetPeriod> {
    let (Some(first), Some(last)) = (dates.iter().min(), dates.iter().max()) else {
        return Vec::new();
    };

    let mut periods = Vec::new();
    let mut period = BudgetPeriod::starting(*first, allowance);
    loop {
        period.is_current = period.contains(today);
        let done = period.end_date >= *last;
        periods.push(period.clone());
        if done {
            break;
        }
        period = period.next();
    }
    periods
}

/// Return the stored period covering `today`, creating it if none does.
///
/// A newly created period starts on `today`. Creation is a single guarded insert; a caller that
/// loses a race simply reads back the winner's row. The advisory current flag is rewritten so
/// the returned period is the only one flagged.
pub(crate) fn resolve_current(
    db: &Database,
    today: NaiveDate,
    allowance: Decimal,
) -> Result<BudgetPeriod> {
    let mut period = match db.find_period_covering(today)? {
        Some(p) => p,
        None => {
            let mut candidate = BudgetPeriod::starting(today, allowance);
            candidate.is_current = true;
            if db.insert_period_if_uncovered(&candidate)? {
                debug!(
                    start = %candidate.start_date,
                    end = %candidate.end_date,
                    "created budget period"
                );
            } else {
                debug!(%today, "period creation skipped, reading back existing row");
            }
            db.find_period_covering(today)?.ok_or_else(|| {
                anyhow::anyhow!(
                    "No period covers {today} and a new one would overlap an existing period"
                )
            })?
        }
    };

    let id = period
        .id
        .ok_or_else(|| anyhow::anyhow!("Stored period has no ID"))?;
    if !period.is_current {
        debug!(start = %period.start_date, "re-flagging current period");
    }
    db.mark_current(id)?;
    period.is_current = true;
    Ok(period)
}

/// Change the allowance of the period covering `today`.
pub(crate) fn set_current_allowance(
    db: &Database,
    today: NaiveDate,
    default_allowance: Decimal,
    allowance: Decimal,
) -> Result<BudgetPeriod> {
    if allowance < Decimal::ZERO {
        anyhow::bail!("Allowance must not be negative, got {allowance}");
    }
    let mut period = resolve_current(db, today, default_allowance)?;
    let id = period
        .id
        .ok_or_else(|| anyhow::anyhow!("Stored period has no ID"))?;
    db.update_period_allowance(id, allowance)?;
    period.allowance = allowance;
    Ok(period)
}
