#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::util::*;

// ── truncate ──────────────────────────────────────────────────

#[test]
fn test_truncate_fits() {
    assert_eq!(truncate("Daily Total", 20), "Daily Total");
    assert_eq!(truncate("Daily Total", 11), "Daily Total");
    assert_eq!(truncate("", 5), "");
}

#[test]
fn test_truncate_cuts_with_ellipsis() {
    assert_eq!(truncate("Dec 28 - Jan 10", 8), "Dec 28 …");
    assert_eq!(truncate("hello", 1), "…");
    assert_eq!(truncate("hello", 0), "");
}

#[test]
fn test_truncate_multibyte() {
    assert_eq!(truncate("Tim Hortons ☕☕☕", 13), "Tim Hortons …");
    assert_eq!(truncate("café résumé", 5), "café…");
}

// ── format_amount ─────────────────────────────────────────────

#[test]
fn test_format_amount_groups_thousands() {
    assert_eq!(format_amount(dec!(1234.56)), "$1,234.56");
    assert_eq!(format_amount(dec!(1234567.89)), "$1,234,567.89");
    assert_eq!(format_amount(dec!(999.99)), "$999.99");
    assert_eq!(format_amount(dec!(100000)), "$100,000.00");
}

#[test]
fn test_format_amount_pads_and_rounds() {
    assert_eq!(format_amount(dec!(0)), "$0.00");
    assert_eq!(format_amount(dec!(5)), "$5.00");
    assert_eq!(format_amount(dec!(1.5)), "$1.50");
    assert_eq!(format_amount(dec!(35.355)), "$35.36");
}

#[test]
fn test_format_amount_negative() {
    assert_eq!(format_amount(dec!(-42.50)), "-$42.50");
    assert_eq!(format_amount(dec!(-99999.01)), "-$99,999.01");
    // Rounds to zero: no sign
    assert_eq!(format_amount(dec!(-0.001)), "$0.00");
}

// ── spend_bar ─────────────────────────────────────────────────

#[test]
fn test_spend_bar_fill() {
    assert_eq!(spend_bar(dec!(0), dec!(500), 4), "[░░░░]");
    assert_eq!(spend_bar(dec!(250), dec!(500), 4), "[██░░]");
    assert_eq!(spend_bar(dec!(900), dec!(500), 4), "[████]");
}

#[test]
fn test_spend_bar_zero_allowance() {
    assert_eq!(spend_bar(dec!(0), dec!(0), 3), "[░░░]");
    assert_eq!(spend_bar(dec!(1), dec!(0), 3), "[███]");
}

// ── ListCursor ────────────────────────────────────────────────

#[test]
fn test_cursor_scrolls_to_keep_selection_visible() {
    let mut c = ListCursor::default();
    for _ in 0..4 {
        c.down(10, 3);
    }
    assert_eq!(c, ListCursor { index: 4, scroll: 2 });
    c.up();
    c.up();
    c.up();
    assert_eq!(c, ListCursor { index: 1, scroll: 1 });
}

#[test]
fn test_cursor_stops_at_ends() {
    let mut c = ListCursor::default();
    c.up();
    assert_eq!(c.index, 0);
    c.down(1, 5);
    assert_eq!(c.index, 0);
    c.down(0, 5);
    assert_eq!(c.index, 0);
}

#[test]
fn test_cursor_top_and_bottom() {
    let mut c = ListCursor::default();
    c.bottom(20, 5);
    assert_eq!(c, ListCursor { index: 19, scroll: 15 });
    c.top();
    assert_eq!(c, ListCursor::default());
    c.bottom(0, 5);
    assert_eq!(c, ListCursor::default());
}

#[test]
fn test_cursor_clamp_after_shrink() {
    let mut c = ListCursor { index: 9, scroll: 6 };
    c.clamp(4);
    assert_eq!(c, ListCursor { index: 3, scroll: 3 });
    c.clamp(0);
    assert_eq!(c, ListCursor { index: 0, scroll: 0 });
}
