use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// `$1,234.50`, with a leading `-` for negative amounts. Rounds half away from zero to cents.
pub(crate) fn format_amount(val: Decimal) -> String {
    let rounded = val
        .abs()
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{rounded:.2}");
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if val < Decimal::ZERO && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}${grouped}.{cents}")
}

/// Shorten to at most `max` characters, marking the cut with `…`.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some(_) => {
            let keep: String = s.chars().take(max - 1).collect();
            format!("{keep}…")
        }
    }
}

/// `[████░░░░]` showing how much of an allowance is spent, capped at full.
pub(crate) fn spend_bar(spent: Decimal, allowance: Decimal, width: usize) -> String {
    let ratio = if allowance > Decimal::ZERO {
        (spent / allowance).to_f64().unwrap_or(0.0).clamp(0.0, 1.0)
    } else if spent > Decimal::ZERO {
        1.0
    } else {
        0.0
    };
    let filled = ((ratio * width as f64).round() as usize).min(width);
    format!("[{}{}]", "█".repeat(filled), "░".repeat(width - filled))
}

/// Selection and scroll offset of a table that shows `page` rows at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct ListCursor {
    pub(crate) index: usize,
    pub(crate) scroll: usize,
}

impl ListCursor {
    pub(crate) fn down(&mut self, len: usize, page: usize) {
        if self.index + 1 < len {
            self.index += 1;
            self.keep_visible(page);
        }
    }

    pub(crate) fn up(&mut self) {
        self.index = self.index.saturating_sub(1);
        self.scroll = self.scroll.min(self.index);
    }

    pub(crate) fn top(&mut self) {
        *self = Self::default();
    }

    pub(crate) fn bottom(&mut self, len: usize, page: usize) {
        if len > 0 {
            self.index = len - 1;
            self.keep_visible(page);
        }
    }

    /// Pull the cursor back inside a list that may have shrunk.
    pub(crate) fn clamp(&mut self, len: usize) {
        self.index = self.index.min(len.saturating_sub(1));
        self.scroll = self.scroll.min(self.index);
    }

    fn keep_visible(&mut self, page: usize) {
        let page = page.max(1);
        if self.index >= self.scroll + page {
            self.scroll = self.index + 1 - page;
        }
    }
}
