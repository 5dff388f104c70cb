// Scalar coercion helpers.
//
// This module centralizes all the "dirty" cell/number handling so the rest of
// the code can assume clean, typed values. Every coercion is total: bad input
// becomes 0 (or an explicit None for the non-defaulting probes), never an
// error and never NaN.
use crate::types::Cell;
use num_format::{Locale, ToFormattedString};

/// Clamp policy for percentage coercion. Observed source variants disagree on
/// whether out-of-range percentages are clamped into [0, 100]; both behaviors
/// are supported and the policy is chosen in `Config`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClampMode {
    Clamp,
    Passthrough,
}

/// Parse a string into `f64` while being forgiving about formatting issues
/// that are common in spreadsheet exports (commas, spaces, stray text).
///
/// - Trims whitespace.
/// - Rejects values that contain alphabetic characters.
/// - Strips thousands separators like `","` before parsing.
/// - Returns `None` for anything that cannot be safely parsed.
pub fn parse_number_safe(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if s.chars().any(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let s = s.replace(',', "");
    s.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// The finite numeric value of a cell, if it has one.
///
/// This is the non-defaulting probe: callers that must *drop* a row on an
/// unparseable numeric key (zone ids, wave numbers) use this instead of
/// `to_number`.
pub fn finite_number(cell: Option<&Cell>) -> Option<f64> {
    match cell? {
        Cell::Number(n) if n.is_finite() => Some(*n),
        Cell::Text(s) => parse_number_safe(s),
        _ => None,
    }
}

/// Numeric value of a cell, defaulting to 0 for anything unparseable.
pub fn to_number(cell: Option<&Cell>) -> f64 {
    finite_number(cell).unwrap_or(0.0)
}

/// Integer count of a cell: `to_number` rounded to the nearest integer.
pub fn to_count(cell: Option<&Cell>) -> i64 {
    to_number(cell).round() as i64
}

/// Integer percentage of a cell.
///
/// Absent, empty, or non-numeric cells yield 0. Strings have a trailing `%`
/// and surrounding whitespace stripped before parsing. A numeric value ≤ 1 is
/// treated as a fractional ratio cell and multiplied by 100; the result is
/// rounded to the nearest integer and then clamped into [0, 100] or passed
/// through, per `mode`.
pub fn to_percentage(cell: Option<&Cell>, mode: ClampMode) -> i64 {
    let n = match cell {
        None => return 0,
        Some(Cell::Number(n)) if n.is_finite() => *n,
        Some(Cell::Text(s)) => {
            let stripped = s.trim().trim_end_matches('%').trim();
            match parse_number_safe(stripped) {
                Some(n) => n,
                None => return 0,
            }
        }
        Some(_) => return 0,
    };
    let scaled = if n <= 1.0 { n * 100.0 } else { n };
    let pct = scaled.round() as i64;
    match mode {
        ClampMode::Clamp => pct.clamp(0, 100),
        ClampMode::Passthrough => pct,
    }
}

/// Thin wrapper around `num-format` for integer-like values. Used for counts
/// in console messages (e.g., `1,248 rows`).
pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(n: f64) -> Cell {
        Cell::Number(n)
    }

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    #[test]
    fn to_number_defaults_to_zero() {
        assert_eq!(to_number(Some(&text("abc"))), 0.0);
        assert_eq!(to_number(Some(&num(42.0))), 42.0);
        assert_eq!(to_number(None), 0.0);
        assert_eq!(to_number(Some(&text(""))), 0.0);
    }

    #[test]
    fn to_number_strips_thousands_separators() {
        assert_eq!(to_number(Some(&text("1,234"))), 1234.0);
    }

    #[test]
    fn ratio_cells_scale_to_percent() {
        assert_eq!(to_percentage(Some(&num(0.75)), ClampMode::Clamp), 75);
        assert_eq!(to_percentage(Some(&num(75.0)), ClampMode::Clamp), 75);
        assert_eq!(to_percentage(Some(&num(1.0)), ClampMode::Clamp), 100);
    }

    #[test]
    fn percent_strings_parse() {
        assert_eq!(to_percentage(Some(&text("75%")), ClampMode::Clamp), 75);
        assert_eq!(to_percentage(Some(&text(" 75 % ")), ClampMode::Clamp), 75);
        assert_eq!(to_percentage(Some(&text("0.9")), ClampMode::Clamp), 90);
    }

    #[test]
    fn empty_or_absent_percentages_are_zero() {
        assert_eq!(to_percentage(Some(&text("")), ClampMode::Clamp), 0);
        assert_eq!(to_percentage(None, ClampMode::Clamp), 0);
        assert_eq!(to_percentage(Some(&text("n/a")), ClampMode::Clamp), 0);
    }

    #[test]
    fn clamp_policy_is_configurable() {
        assert_eq!(to_percentage(Some(&num(140.0)), ClampMode::Clamp), 100);
        assert_eq!(
            to_percentage(Some(&num(140.0)), ClampMode::Passthrough),
            140
        );
        assert_eq!(to_percentage(Some(&num(-0.5)), ClampMode::Clamp), 0);
        assert_eq!(
            to_percentage(Some(&num(-0.5)), ClampMode::Passthrough),
            -50
        );
    }

    #[test]
    fn finite_number_is_none_for_garbage() {
        assert_eq!(finite_number(Some(&text("abc"))), None);
        assert_eq!(finite_number(None), None);
        assert_eq!(finite_number(Some(&num(7.0))), Some(7.0));
        assert_eq!(finite_number(Some(&text("7"))), Some(7.0));
    }

    #[test]
    fn to_count_rounds_to_nearest() {
        assert_eq!(to_count(Some(&num(799.6))), 800);
        assert_eq!(to_count(Some(&text("800"))), 800);
        assert_eq!(to_count(None), 0);
    }
}
