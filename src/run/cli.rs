use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

use crate::config::{Settings, MAX_HISTORY_DAYS};
use crate::db::Database;
use crate::models::Expense;
use crate::report;
use crate::ui::util::{format_amount, truncate};

pub(crate) fn as_cli(args: &[String], db: &mut Database, settings: &Settings) -> Result<()> {
    let today = chrono::Local::now().date_naive();
    match args[1].as_str() {
        "import" => cli_import(&args[2..], db, settings, today),
        "status" | "s" => cli_status(db, settings, today),
        "add" => cli_add(&args[2..], db),
        "delete" => cli_delete(&args[2..], db),
        "list" | "ls" => cli_list(db, settings, today),
        "today" | "t" => cli_today(db, today),
        "periods" => cli_periods(db, today),
        "categories" => cli_categories(&args[2..], db, settings, today),
        "allowance" => cli_allowance(&args[2..], db, settings, today),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("periodledger {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("PeriodLedger: 14-day budget periods over a local expense ledger");
    println!();
    println!("Usage: periodledger [command]");
    println!();
    println!("Commands:");
    println!("  (none)                          Launch interactive TUI");
    println!("  import <dir|file.csv>           Rebuild imported history from exported sheets");
    println!("  status                          Show the current period");
    println!("  add <YYYY-MM-DD> <amount> <description...>");
    println!("                                  Record an expense");
    println!("  delete <id>                     Delete an expense");
    println!("  list                            List expenses in the current period");
    println!("  today                           List today's expenses and their total");
    println!("  periods                         List every period with its spending");
    println!("  categories [days]               Spending by category (default: history_days)");
    println!("  allowance <amount>              Set the current period's allowance");
    println!("  --help, -h                      Show this help");
    println!("  --version, -V                   Show version");
}

fn cli_import(
    args: &[String],
    db: &mut Database,
    settings: &Settings,
    today: NaiveDate,
) -> Result<()> {
    let Some(source) = args.first() else {
        anyhow::bail!("Usage: periodledger import <dir|file.csv>");
    };
    let path = Path::new(source);
    if !path.exists() {
        anyhow::bail!("Source not found: {source}");
    }

    let report = crate::import::ingest_path(db, path, settings, today)?;
    println!(
        "Ingested {} sheet(s): {} entries across {} periods",
        report.sources_ingested, report.entries, report.periods
    );
    if !report.skipped.is_empty() {
        println!("Skipped {} sheet(s):", report.skipped.len());
        for skipped in &report.skipped {
            println!("  {:<28} {}", truncate(&skipped.label, 28), skipped.reason);
        }
    }
    Ok(())
}

fn cli_status(db: &Database, settings: &Settings, today: NaiveDate) -> Result<()> {
    let status = report::current_status_for(db, settings, today)?;
    println!("Period {}", status.period.label());
    println!("{}", "─".repeat(40));
    println!("  Allowance:    {}", format_amount(status.period.allowance));
    println!("  Spent:        {}", format_amount(status.total_spent));
    println!("  Remaining:    {}", format_amount(status.remaining));
    println!("  Days left:    {}", status.days_left);
    println!("  Daily limit:  {}", format_amount(status.daily_limit));
    Ok(())
}

fn cli_add(args: &[String], db: &Database) -> Result<()> {
    if args.len() < 3 {
        anyhow::bail!("Usage: periodledger add <YYYY-MM-DD> <amount> <description...>");
    }
    let date = NaiveDate::parse_from_str(&args[0], "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", args[0]))?;
    let amount = parse_amount(&args[1])?;
    let description = args[2..].join(" ");

    let expense = Expense::manual(date, &description, amount)?;
    let id = db.insert_expense(&expense)?;
    println!(
        "Added #{id}: {} {} {}",
        expense.date,
        format_amount(expense.amount),
        expense.description
    );
    Ok(())
}

fn cli_delete(args: &[String], db: &Database) -> Result<()> {
    let Some(raw) = args.first() else {
        anyhow::bail!("Usage: periodledger delete <id>");
    };
    let id: i64 = raw
        .parse()
        .with_context(|| format!("Invalid expense id '{raw}'"))?;
    let Some(expense) = db.get_expense_by_id(id)? else {
        anyhow::bail!("No expense with id {id}");
    };
    if expense.is_imported() {
        println!("Note: #{id} was imported and will come back on the next import");
    }
    db.delete_expense(id)?;
    println!(
        "Deleted #{id}: {} {} {}",
        expense.date,
        format_amount(expense.amount),
        expense.description
    );
    Ok(())
}

fn cli_list(db: &Database, settings: &Settings, today: NaiveDate) -> Result<()> {
    let period = crate::period::resolve_current(db, today, settings.default_allowance)?;
    let expenses = db.get_expenses_between(period.start_date, period.end_date)?;
    if expenses.is_empty() {
        println!("No expenses in {}", period.label());
        return Ok(());
    }

    println!("{:<6} {:<12} {:>12}  {:<8} Description", "ID", "Date", "Amount", "Source");
    println!("{}", "─".repeat(70));
    for e in &expenses {
        println!(
            "{:<6} {:<12} {:>12}  {:<8} {}",
            e.id.unwrap_or(0),
            e.date,
            format_amount(e.amount),
            if e.is_imported() { "import" } else { "manual" },
            truncate(&e.description, 40),
        );
    }
    Ok(())
}

fn cli_today(db: &Database, today: NaiveDate) -> Result<()> {
    let spending = report::day_spending_for(db, today)?;
    println!("Today, {}", spending.date);
    println!("{}", "─".repeat(40));
    if spending.entries.is_empty() {
        println!("  Nothing spent today");
    }
    for e in &spending.entries {
        println!(
            "  #{:<5} {:>12}  {}",
            e.id.unwrap_or(0),
            format_amount(e.amount),
            truncate(&e.description, 40)
        );
    }
    println!("  {:<6} {:>12}", "Total", format_amount(spending.total));
    Ok(())
}

fn cli_periods(db: &Database, today: NaiveDate) -> Result<()> {
    let history = report::period_history_for(db, today)?;
    if history.is_empty() {
        println!("No periods");
        return Ok(());
    }

    println!(
        "{:<2} {:<12} {:<12} {:>12} {:>12}",
        "", "Start", "End", "Allowance", "Spent"
    );
    println!("{}", "─".repeat(54));
    for (period, spent) in &history {
        println!(
            "{:<2} {:<12} {:<12} {:>12} {:>12}",
            if period.is_current { "*" } else { "" },
            period.start_date,
            period.end_date,
            format_amount(period.allowance),
            format_amount(*spent),
        );
    }
    Ok(())
}

fn cli_categories(
    args: &[String],
    db: &Database,
    settings: &Settings,
    today: NaiveDate,
) -> Result<()> {
    let days = match args.first() {
        Some(raw) => raw
            .parse::<i64>()
            .with_context(|| format!("Invalid number of days '{raw}'"))?,
        None => settings.history_days,
    };
    if !(1..=MAX_HISTORY_DAYS).contains(&days) {
        anyhow::bail!("Number of days must be between 1 and {MAX_HISTORY_DAYS}");
    }

    let totals = report::category_totals_for(db, today, days)?;
    println!("Spending by category, last {days} days");
    println!("{}", "─".repeat(40));
    if totals.is_empty() {
        println!("  No spending");
    }
    for (category, amount) in &totals {
        println!("  {:<24} {:>12}", category.as_str(), format_amount(*amount));
    }
    Ok(())
}

fn cli_allowance(
    args: &[String],
    db: &Database,
    settings: &Settings,
    today: NaiveDate,
) -> Result<()> {
    let Some(raw) = args.first() else {
        anyhow::bail!("Usage: periodledger allowance <amount>");
    };
    let amount = parse_amount(raw)?;
    let period =
        crate::period::set_current_allowance(db, today, settings.default_allowance, amount)?;
    println!(
        "Allowance for {} set to {}",
        period.label(),
        format_amount(period.allowance)
    );
    Ok(())
}

fn parse_amount(raw: &str) -> Result<Decimal> {
    let cleaned = raw.replace(['$', ','], "");
    Decimal::from_str(cleaned.trim()).with_context(|| format!("Invalid amount '{raw}'"))
}
