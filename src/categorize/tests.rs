#![allow(clippy::unwrap_used)]

use super::*;
use chrono::NaiveDate;
use rust_decimal_macros::dec;

// ── Rule table ────────────────────────────────────────────────

#[test]
fn test_every_rule_token_classifies_to_its_category() {
    let cat = Categorizer::default();
    for (category, tokens) in RULES {
        for token in *tokens {
            assert_eq!(
                cat.categorize(token),
                *category,
                "token '{token}' should map to {category}"
            );
        }
    }
}

#[test]
fn test_rule_order_matches_category_order() {
    let order: Vec<Category> = RULES.iter().map(|(c, _)| *c).collect();
    assert_eq!(
        order,
        vec![
            Category::Coffee,
            Category::Gas,
            Category::Food,
            Category::Cannabis
        ]
    );
}

// ── Categorizer ───────────────────────────────────────────────

#[test]
fn test_categorize_case_insensitive() {
    let cat = Categorizer::default();
    assert_eq!(cat.categorize("TIM HORTONS #4411"), Category::Coffee);
    assert_eq!(cat.categorize("Shell Gas Station"), Category::Gas);
    assert_eq!(cat.categorize("DOMINOS PIZZA"), Category::Food);
    assert_eq!(cat.categorize("Weed run"), Category::Cannabis);
}

#[test]
fn test_categorize_tim_variants_are_coffee() {
    let cat = Categorizer::default();
    for desc in ["Tims", "tim's", "Timmies run", "TIM HORTONS #4411", "iced capp at tim"] {
        assert_eq!(cat.categorize(desc), Category::Coffee, "'{desc}'");
    }
}

#[test]
fn test_categorize_no_match_is_other() {
    let cat = Categorizer::default();
    assert_eq!(cat.categorize("Daily Total"), Category::Other);
    assert_eq!(cat.categorize(""), Category::Other);
}

#[test]
fn test_categorize_first_match_wins() {
    let cat = Categorizer::default();
    // Coffee is listed before Food
    assert_eq!(cat.categorize("Starbucks near the restaurant"), Category::Coffee);
    // Gas is listed before Food
    assert_eq!(cat.categorize("gas station food"), Category::Gas);
}

#[test]
fn test_categorize_is_pure() {
    let cat = Categorizer::default();
    let desc = "coffee and a mcdonald's breakfast";
    let first = cat.categorize(desc);
    for _ in 0..5 {
        assert_eq!(cat.categorize(desc), first);
    }
    assert_eq!(first, Category::Coffee);
}

#[test]
fn test_categorize_custom_rules() {
    let rules: &[(Category, &[&str])] = &[
        (Category::Food, &["shop"]),
        (Category::Coffee, &["coffee shop"]),
    ];
    let cat = Categorizer::new(rules);
    assert_eq!(cat.categorize("Coffee Shop"), Category::Food);
}

#[test]
fn test_categorize_empty_rules() {
    let cat = Categorizer::new(&[]);
    assert_eq!(cat.categorize("coffee"), Category::Other);
}

#[test]
fn test_categorize_expense_uses_description() {
    let cat = Categorizer::default();
    let e = Expense::manual(
        NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
        "Cannabis store",
        dec!(30),
    )
    .unwrap();
    assert_eq!(cat.categorize_expense(&e), Category::Cannabis);
}
