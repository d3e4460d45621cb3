#![allow(clippy::unwrap_used)]

use super::*;
use rust_decimal_macros::dec;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn spend(d: NaiveDate, description: &str, amount: Decimal) -> Expense {
    Expense::manual(d, description, amount).unwrap()
}

fn june_period(allowance: Decimal) -> BudgetPeriod {
    BudgetPeriod::starting(date(2025, 6, 10), allowance)
}

// ── period_status ─────────────────────────────────────────────

#[test]
fn test_total_spent_uses_inclusive_window() {
    let p = june_period(dec!(500));
    let expenses = vec![
        spend(date(2025, 6, 9), "before", dec!(100)),
        spend(date(2025, 6, 10), "first day", dec!(10)),
        spend(date(2025, 6, 23), "last day", dec!(20.25)),
        spend(date(2025, 6, 24), "after", dec!(100)),
    ];
    assert_eq!(total_spent(&p, &expenses), dec!(30.25));
}

#[test]
fn test_status_remaining_and_daily_limit() {
    let p = june_period(dec!(500));
    let expenses = vec![spend(date(2025, 6, 11), "groceries", dec!(80))];
    // 2025-06-14 .. 2025-06-23 is 10 days including today
    let s = period_status(&p, &expenses, date(2025, 6, 14));
    assert_eq!(s.total_spent, dec!(80));
    assert_eq!(s.remaining, dec!(420));
    assert_eq!(s.days_left, 10);
    assert_eq!(s.daily_limit, dec!(42.00));
}

#[test]
fn test_status_daily_limit_rounds_to_cents() {
    let p = june_period(dec!(100));
    let s = period_status(&p, &[], date(2025, 6, 21));
    assert_eq!(s.days_left, 3);
    assert_eq!(s.daily_limit, dec!(33.33));
}

#[test]
fn test_status_overspent_goes_negative() {
    let p = june_period(dec!(50));
    let expenses = vec![spend(date(2025, 6, 12), "big night", dec!(80))];
    let s = period_status(&p, &expenses, date(2025, 6, 23));
    assert_eq!(s.remaining, dec!(-30));
    assert_eq!(s.days_left, 1);
    assert_eq!(s.daily_limit, dec!(-30));
}

#[test]
fn test_status_after_period_end_uses_one_day() {
    let p = june_period(dec!(70));
    let s = period_status(&p, &[], date(2025, 7, 30));
    assert_eq!(s.days_left, 1);
    assert_eq!(s.daily_limit, dec!(70));
}

#[test]
fn test_expenses_outside_every_period_total_zero() {
    let p = june_period(dec!(500));
    let expenses = vec![spend(date(2024, 1, 1), "old", dec!(12))];
    assert_eq!(total_spent(&p, &expenses), Decimal::ZERO);
}

// ── category_totals ───────────────────────────────────────────

#[test]
fn test_category_totals_sorted_descending() {
    let expenses = vec![
        spend(date(2025, 6, 1), "Tim Hortons", dec!(4.50)),
        spend(date(2025, 6, 2), "Shell gas", dec!(60)),
        spend(date(2025, 6, 3), "Starbucks", dec!(6)),
        spend(date(2025, 6, 4), "Hardware store", dec!(25)),
        spend(date(2025, 6, 5), "Domino's", dec!(22)),
    ];
    let totals = category_totals(&expenses, &Categorizer::default());
    assert_eq!(
        totals,
        vec![
            (Category::Gas, dec!(60)),
            (Category::Other, dec!(25)),
            (Category::Food, dec!(22)),
            (Category::Coffee, dec!(10.50)),
        ]
    );
}

#[test]
fn test_category_totals_ties_keep_rule_order() {
    let expenses = vec![
        spend(date(2025, 6, 1), "weed", dec!(10)),
        spend(date(2025, 6, 1), "coffee", dec!(10)),
    ];
    let totals = category_totals(&expenses, &Categorizer::default());
    assert_eq!(totals[0].0, Category::Coffee);
    assert_eq!(totals[1].0, Category::Cannabis);
}

#[test]
fn test_category_totals_empty() {
    assert!(category_totals(&[], &Categorizer::default()).is_empty());
}

// ── daily_totals / history ────────────────────────────────────

#[test]
fn test_daily_totals_groups_by_day() {
    let expenses = vec![
        spend(date(2025, 6, 3), "a", dec!(1)),
        spend(date(2025, 6, 1), "b", dec!(2)),
        spend(date(2025, 6, 3), "c", dec!(3)),
    ];
    assert_eq!(
        daily_totals(&expenses),
        vec![(date(2025, 6, 1), dec!(2)), (date(2025, 6, 3), dec!(4))]
    );
}

#[test]
fn test_period_history_totals_each_period() {
    let first = BudgetPeriod::starting(date(2025, 6, 1), dec!(500));
    let second = first.next();
    let expenses = vec![
        spend(date(2025, 6, 2), "a", dec!(5)),
        spend(date(2025, 6, 20), "b", dec!(7)),
        spend(date(2025, 6, 21), "c", dec!(8)),
    ];
    let history = period_history(
        &[first.clone(), second.clone()],
        &expenses,
        date(2025, 7, 1),
    );
    assert_eq!(history, vec![(first, dec!(5)), (second, dec!(15))]);
}

#[test]
fn test_period_history_flags_only_period_covering_today() {
    let mut stale = BudgetPeriod::starting(date(2025, 1, 15), dec!(500));
    stale.is_current = true;
    let later = BudgetPeriod::starting(date(2025, 2, 26), dec!(500));

    let history = period_history(&[stale, later], &[], date(2025, 3, 1));
    assert!(!history[0].0.is_current);
    assert!(history[1].0.is_current);
}

#[test]
fn test_trailing_window() {
    // today plus the 30 days before it
    assert_eq!(
        trailing_window(date(2025, 6, 30), 30).unwrap(),
        (date(2025, 5, 31), date(2025, 6, 30))
    );
    assert_eq!(
        trailing_window(date(2025, 6, 30), 0).unwrap(),
        (date(2025, 6, 30), date(2025, 6, 30))
    );
}

#[test]
fn test_trailing_window_out_of_range_is_error() {
    assert!(trailing_window(date(2025, 3, 1), 1_000_000_000).is_err());
    assert!(trailing_window(date(2025, 3, 1), i64::MAX).is_err());
}

// ── overflow ──────────────────────────────────────────────────

#[test]
fn test_huge_amounts_saturate_instead_of_overflowing() {
    let p = june_period(dec!(500));
    let expenses = vec![
        spend(date(2025, 6, 11), "yacht", Decimal::MAX),
        spend(date(2025, 6, 12), "another yacht", Decimal::MAX),
    ];
    assert_eq!(total_spent(&p, &expenses), Decimal::MAX);

    let s = period_status(&p, &expenses, date(2025, 6, 14));
    assert!(s.remaining < Decimal::ZERO);

    let cats = category_totals(&expenses, &Categorizer::default());
    assert_eq!(cats, vec![(Category::Other, Decimal::MAX)]);
    let days = daily_totals(&expenses);
    assert_eq!(days.len(), 2);
}

// ── day_spending ──────────────────────────────────────────────

#[test]
fn test_day_spending_keeps_only_that_day() {
    let expenses = vec![
        spend(date(2025, 6, 14), "coffee", dec!(3.25)),
        spend(date(2025, 6, 13), "gas", dec!(40)),
        spend(date(2025, 6, 14), "lunch", dec!(12.50)),
    ];
    let today = day_spending(date(2025, 6, 14), &expenses);
    assert_eq!(today.date, date(2025, 6, 14));
    assert_eq!(today.entries.len(), 2);
    assert_eq!(today.entries[0].description, "coffee");
    assert_eq!(today.entries[1].description, "lunch");
    assert_eq!(today.total, dec!(15.75));
}

#[test]
fn test_day_spending_empty_day_totals_zero() {
    let today = day_spending(date(2025, 6, 14), &[]);
    assert!(today.entries.is_empty());
    assert_eq!(today.total, Decimal::ZERO);
}

// ── database-backed ───────────────────────────────────────────

#[test]
fn test_current_status_for_creates_period_and_sums() {
    let db = Database::open_in_memory().unwrap();
    db.insert_expense(&spend(date(2025, 6, 10), "coffee", dec!(5)))
        .unwrap();
    db.insert_expense(&spend(date(2025, 6, 1), "earlier", dec!(99)))
        .unwrap();

    let settings = Settings::default();
    let s = current_status_for(&db, &settings, date(2025, 6, 10)).unwrap();
    assert_eq!(s.period.start_date, date(2025, 6, 10));
    assert_eq!(s.period.allowance, dec!(500.00));
    assert_eq!(s.total_spent, dec!(5));
    assert_eq!(s.days_left, 14);
    assert_eq!(s.daily_limit, dec!(35.36));
}

#[test]
fn test_loaders_read_trailing_window() {
    let db = Database::open_in_memory().unwrap();
    db.insert_expense(&spend(date(2025, 6, 30), "gas", dec!(40)))
        .unwrap();
    db.insert_expense(&spend(date(2025, 6, 30), "coffee", dec!(3)))
        .unwrap();
    db.insert_expense(&spend(date(2025, 5, 1), "gas", dec!(40)))
        .unwrap();

    let cats = category_totals_for(&db, date(2025, 6, 30), 30).unwrap();
    assert_eq!(cats, vec![(Category::Gas, dec!(40)), (Category::Coffee, dec!(3))]);

    let days = daily_totals_for(&db, date(2025, 6, 30), 30).unwrap();
    assert_eq!(days, vec![(date(2025, 6, 30), dec!(43))]);
}

#[test]
fn test_period_history_for_reads_all_periods() {
    let db = Database::open_in_memory().unwrap();
    db.insert_period(&BudgetPeriod::starting(date(2025, 6, 1), dec!(500)))
        .unwrap();
    db.insert_expense(&spend(date(2025, 6, 3), "food", dec!(12)))
        .unwrap();
    let history = period_history_for(&db, date(2025, 6, 3)).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].1, dec!(12));
    assert!(history[0].0.is_current);
}

#[test]
fn test_period_history_for_ignores_stale_current_flag() {
    let db = Database::open_in_memory().unwrap();
    let mut imported = BudgetPeriod::starting(date(2025, 1, 15), dec!(500));
    imported.is_current = true;
    db.insert_period(&imported).unwrap();

    let history = period_history_for(&db, date(2025, 3, 1)).unwrap();
    assert_eq!(history.len(), 1);
    assert!(!history[0].0.is_current);
}

#[test]
fn test_day_spending_for_reads_one_day() {
    let db = Database::open_in_memory().unwrap();
    db.insert_expense(&spend(date(2025, 6, 14), "coffee", dec!(3)))
        .unwrap();
    db.insert_expense(&spend(date(2025, 6, 14), "gas", dec!(45)))
        .unwrap();
    db.insert_expense(&spend(date(2025, 6, 15), "food", dec!(9)))
        .unwrap();

    let today = day_spending_for(&db, date(2025, 6, 14)).unwrap();
    assert_eq!(today.entries.len(), 2);
    assert_eq!(today.total, dec!(48));
}
