mod schema;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{params, types::Type, Connection, OptionalExtension, Row};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use crate::models::*;

const EXPENSE_COLUMNS: &str =
    "id, date, description, amount, origin, import_hash, created_at";
const PERIOD_COLUMNS: &str = "id, start_date, end_date, allowance, is_current";

pub(crate) struct Database {
    conn: Connection,
}

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.busy_timeout(Duration::from_secs(5))
            .context("Failed to set busy timeout")?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .context("Failed to set database pragmas")?;
        let mut db = Self { conn };
        db.migrate().context("Database migration failed")?;
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        let mut db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&mut self) -> Result<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            let tx = self.conn.transaction()?;
            tx.execute_batch(schema::SCHEMA_V1)?;
            tx.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            tx.commit()?;
            return Ok(());
        }

        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .optional()?
            .unwrap_or(0);

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
        }

        Ok(())
    }

    // ── Expenses ──────────────────────────────────────────────

    pub(crate) fn insert_expense(&self, expense: &Expense) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO expenses (date, description, amount, origin, import_hash, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                expense.date,
                expense.description,
                expense.amount.to_string(),
                expense.origin.as_db_string(),
                expense.import_hash,
                expense.created_at,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub(crate) fn get_expense_by_id(&self, id: i64) -> Result<Option<Expense>> {
        let sql = format!("SELECT {EXPENSE_COLUMNS} FROM expenses WHERE id = ?1");
        Ok(self
            .conn
            .query_row(&sql, params![id], expense_from_row)
            .optional()?)
    }

    /// Expenses dated within `[from, to]`, newest first.
    pub(crate) fn get_expenses_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Expense>> {
        let sql = format!(
            "SELECT {EXPENSE_COLUMNS} FROM expenses
             WHERE date BETWEEN ?1 AND ?2
             ORDER BY date DESC, id DESC"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![from, to], expense_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn get_all_expenses(&self) -> Result<Vec<Expense>> {
        let sql = format!("SELECT {EXPENSE_COLUMNS} FROM expenses ORDER BY date, id");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], expense_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Distinct dates of hand-entered expenses.
    pub(crate) fn get_manual_expense_dates(&self) -> Result<Vec<NaiveDate>> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT date FROM expenses WHERE origin = 'manual' ORDER BY date",
        )?;
        let rows = stmt.query_map([], |row| row.get::<_, NaiveDate>(0))?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn get_expense_count(&self) -> Result<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM expenses", [], |row| row.get(0))?)
    }

    pub(crate) fn delete_expense(&self, id: i64) -> Result<bool> {
        let n = self
            .conn
            .execute("DELETE FROM expenses WHERE id = ?1", params![id])?;
        Ok(n > 0)
    }

    // ── Budget periods ────────────────────────────────────────

    #[cfg(test)]
    pub(crate) fn insert_period(&self, period: &BudgetPeriod) -> Result<i64> {
        insert_period_on(&self.conn, period)?;
        Ok(self.conn.last_insert_rowid())
    }

    pub(crate) fn get_periods(&self) -> Result<Vec<BudgetPeriod>> {
        let sql = format!("SELECT {PERIOD_COLUMNS} FROM budget_periods ORDER BY start_date");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], period_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// The period whose inclusive window contains `date`, latest start first.
    pub(crate) fn find_period_covering(&self, date: NaiveDate) -> Result<Option<BudgetPeriod>> {
        let sql = format!(
            "SELECT {PERIOD_COLUMNS} FROM budget_periods
             WHERE start_date <= ?1 AND end_date >= ?1
             ORDER BY start_date DESC LIMIT 1"
        );
        Ok(self
            .conn
            .query_row(&sql, params![date], period_from_row)
            .optional()?)
    }

    /// Insert `period` only if no stored period overlaps its window.
    ///
    /// The existence check and the insert are one statement, so two writers racing to create
    /// the same window cannot both succeed. Returns whether a row was written.
    pub(crate) fn insert_period_if_uncovered(&self, period: &BudgetPeriod) -> Result<bool> {
        let n = self.conn.execute(
            "INSERT INTO budget_periods (start_date, end_date, allowance, is_current, created_at)
             SELECT ?1, ?2, ?3, ?4, ?5
             WHERE NOT EXISTS (
                 SELECT 1 FROM budget_periods WHERE start_date <= ?2 AND end_date >= ?1
             )
             ON CONFLICT(start_date) DO NOTHING",
            params![
                period.start_date,
                period.end_date,
                period.allowance.to_string(),
                period.is_current,
                chrono::Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(n > 0)
    }

    /// Flag `id` as the current period and clear the flag everywhere else.
    pub(crate) fn mark_current(&self, id: i64) -> Result<()> {
        self.conn.execute(
            "UPDATE budget_periods SET is_current = (id = ?1)",
            params![id],
        )?;
        Ok(())
    }

    pub(crate) fn update_period_allowance(&self, id: i64, allowance: Decimal) -> Result<()> {
        self.conn.execute(
            "UPDATE budget_periods SET allowance = ?1 WHERE id = ?2",
            params![allowance.to_string(), id],
        )?;
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn get_current_flag_count(&self) -> Result<i64> {
        Ok(self.conn.query_row(
            "SELECT COUNT(*) FROM budget_periods WHERE is_current = 1",
            [],
            |row| row.get(0),
        )?)
    }

    // ── Ingestion ─────────────────────────────────────────────

    /// Replace every imported expense and every period in one transaction.
    /// Manual expenses are left untouched. Returns (expenses written, periods written).
    pub(crate) fn replace_imported(
        &mut self,
        expenses: &[Expense],
        periods: &[BudgetPeriod],
    ) -> Result<(usize, usize)> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM expenses WHERE origin != 'manual'", [])?;
        tx.execute("DELETE FROM budget_periods", [])?;
        for expense in expenses {
            upsert_expense_on(&tx, expense)?;
        }
        for period in periods {
            insert_period_on(&tx, period)?;
        }
        let written: i64 = tx.query_row(
            "SELECT COUNT(*) FROM expenses WHERE origin != 'manual'",
            [],
            |row| row.get(0),
        )?;
        tx.commit()?;
        Ok((written as usize, periods.len()))
    }
}

/// Insert, or replace the row already carrying the same import hash.
fn upsert_expense_on(conn: &Connection, expense: &Expense) -> Result<()> {
    conn.execute(
        "INSERT INTO expenses (date, description, amount, origin, import_hash, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT(import_hash) WHERE import_hash != '' DO UPDATE SET
             date = excluded.date,
             description = excluded.description,
             amount = excluded.amount,
             origin = excluded.origin",
        params![
            expense.date,
            expense.description,
            expense.amount.to_string(),
            expense.origin.as_db_string(),
            expense.import_hash,
            expense.created_at,
        ],
    )?;
    Ok(())
}

fn insert_period_on(conn: &Connection, period: &BudgetPeriod) -> Result<()> {
    conn.execute(
        "INSERT INTO budget_periods (start_date, end_date, allowance, is_current, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            period.start_date,
            period.end_date,
            period.allowance.to_string(),
            period.is_current,
            chrono::Utc::now().to_rfc3339(),
        ],
    )?;
    Ok(())
}

/// Amounts are stored as text; a value that does not parse is a row error, not zero.
fn decimal_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let raw: String = row.get(idx)?;
    Decimal::from_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn expense_from_row(row: &Row<'_>) -> rusqlite::Result<Expense> {
    let origin: String = row.get(4)?;
    Ok(Expense {
        id: Some(row.get(0)?),
        date: row.get(1)?,
        description: row.get(2)?,
        amount: decimal_column(row, 3)?,
        origin: Origin::parse(&origin),
        import_hash: row.get(5)?,
        created_at: row.get(6)?,
    })
}

fn period_from_row(row: &Row<'_>) -> rusqlite::Result<BudgetPeriod> {
    Ok(BudgetPeriod {
        id: Some(row.get(0)?),
        start_date: row.get(1)?,
        end_date: row.get(2)?,
        allowance: decimal_column(row, 3)?,
        is_current: row.get(4)?,
    })
}
