use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};
use regex::{Captures, Regex};

/// An inclusive calendar range inferred from a sheet label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DateRange {
    pub(crate) start: NaiveDate,
    pub(crate) end: NaiveDate,
}

impl DateRange {
    /// Number of days in the range, both ends included.
    pub(crate) fn len_days(&self) -> usize {
        ((self.end - self.start).num_days() + 1).max(0) as usize
    }

    pub(crate) fn day(&self, offset: usize) -> NaiveDate {
        self.start + Duration::days(offset as i64)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    /// "Dec 28 - Jan 10"
    CrossMonth,
    /// "Jan 15 - 28"
    SameMonth,
}

/// Label shapes, tried in order. Cross-month comes first so a second month token wins.
const PATTERNS: &[(&str, Shape)] = &[
    (
        r"^\s*([A-Za-z]+)\.?\s+(\d{1,2})\s*[-–]\s*([A-Za-z]+)\.?\s+(\d{1,2})\b",
        Shape::CrossMonth,
    ),
    (
        r"^\s*([A-Za-z]+)\.?\s+(\d{1,2})\s*[-–]\s*(\d{1,2})\b",
        Shape::SameMonth,
    ),
];

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Month number for a full English month name or any prefix of at least three letters.
pub(crate) fn month_number(token: &str) -> Option<u32> {
    let token = token.to_ascii_lowercase();
    if token.len() < 3 {
        return None;
    }
    MONTHS
        .iter()
        .position(|m| m.starts_with(&token))
        .map(|i| i as u32 + 1)
}

/// Infers the year-less date range written in a spreadsheet tab name.
pub(crate) struct LabelParser {
    patterns: Vec<(Regex, Shape)>,
    candidate_years: Vec<i32>,
    as_of: NaiveDate,
}

impl LabelParser {
    /// `candidate_years` are tried in order; a year is only accepted if the resulting range does
    /// not start after `as_of`.
    pub(crate) fn new(candidate_years: Vec<i32>, as_of: NaiveDate) -> Result<Self> {
        let patterns = PATTERNS
            .iter()
            .map(|(pattern, shape)| {
                Regex::new(pattern)
                    .with_context(|| format!("Invalid label pattern: {pattern}"))
                    .map(|re| (re, *shape))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            patterns,
            candidate_years,
            as_of,
        })
    }

    /// `None` when the label matches no known shape or resolves under no candidate year.
    pub(crate) fn parse(&self, label: &str) -> Option<DateRange> {
        let (caps, shape) = self
            .patterns
            .iter()
            .find_map(|(re, shape)| re.captures(label).map(|c| (c, *shape)))?;
        let (start_month, start_day, end_month, end_day) = tokens(&caps, shape)?;

        for &year in &self.candidate_years {
            let Some(start) = NaiveDate::from_ymd_opt(year, start_month, start_day) else {
                continue;
            };
            let Some(mut end) = NaiveDate::from_ymd_opt(year, end_month, end_day) else {
                continue;
            };
            if end < start {
                match shape {
                    // Same month never wraps; "Jan 28 - 5" is not a range under any year
                    Shape::SameMonth => return None,
                    Shape::CrossMonth => {
                        let Some(rolled) = NaiveDate::from_ymd_opt(year + 1, end_month, end_day)
                        else {
                            continue;
                        };
                        end = rolled;
                    }
                }
            }
            if start > self.as_of {
                continue;
            }
            return Some(DateRange { start, end });
        }

        None
    }
}

fn tokens(caps: &Captures<'_>, shape: Shape) -> Option<(u32, u32, u32, u32)> {
    let start_month = month_number(caps.get(1)?.as_str())?;
    let start_day: u32 = caps.get(2)?.as_str().parse().ok()?;
    match shape {
        Shape::CrossMonth => {
            let end_month = month_number(caps.get(3)?.as_str())?;
            let end_day: u32 = caps.get(4)?.as_str().parse().ok()?;
            Some((start_month, start_day, end_month, end_day))
        }
        Shape::SameMonth => {
            let end_day: u32 = caps.get(3)?.as_str().parse().ok()?;
            Some((start_month, start_day, start_month, end_day))
        }
    }
}

#[cfg(test)]
#[path = "label_tests.rs"]
mod tests;
