// Header resolution and key canonicalization.
//
// Source workbooks come from unknown provenance and spell their column
// headers inconsistently (`Pick_Perf`, `pickperf`, `picking perf`, ...).
// Each logical field carries an ordered list of accepted spellings; lookup
// tries an exact match first, then a normalized match with case, whitespace,
// underscores, and punctuation ignored.
use crate::types::{Cell, LevelKey, Row};
use crate::util;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Canonical short code for the shipping department.
pub const SHIP: &str = "ship";

/// Accepted header spellings per logical field, ordered by preference.
/// This table is the contract surface with real-world spreadsheets; extend it
/// rather than special-casing a header at a call site.
pub mod cols {
    pub const DEPT: &[&str] = &["dept", "department"];
    pub const LEVEL: &[&str] = &["level", "lvl", "area", "section"];
    pub const ZONE: &[&str] = &["zone", "zn"];
    pub const PICK_PERF: &[&str] = &["pick_perf", "picking_perf", "pickperf", "pickingperf"];
    pub const PICK_WAVE: &[&str] = &["pick_wave", "picking_wave", "pickwave", "wave"];
    pub const PICK_PROGRESS: &[&str] = &[
        "pick_progress",
        "picking_progress",
        "pickprogress",
        "progress",
    ];
    pub const STOCK_PERF: &[&str] = &["stock_perf", "stocking_perf", "stockperf", "stockingperf"];
    pub const STOCK_EXPECTED: &[&str] = &["stock_expected", "expected"];
    pub const STOCK_STOCKED: &[&str] = &[
        "stock_stocked",
        "stocked",
        "received",
        "stocked_qty",
        "received_qty",
    ];
    pub const STOCK_REMAINING: &[&str] = &["stock_remaining", "remaining", "left"];
    pub const ORDERS_TOTAL: &[&str] = &["orders_total", "orders", "total"];
    pub const ORDERS_COMPLETE: &[&str] = &["orders_complete", "orders_done", "complete", "completed"];
    pub const WAVE: &[&str] = &["wave", "wave_no", "wave_number"];
    pub const PROGRESS: &[&str] = &["progress", "pct", "percent", "completion"];
}

// Department spellings that map onto a different canonical short code.
static DEPT_ALIASES: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| HashMap::from([("shipping", SHIP)]));

/// Normalize a header key: lowercase, keep only ascii alphanumerics. Makes
/// `Pick_Perf`, `pick perf`, and `pickperf` compare equal.
pub fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Locate the cell for a logical field in `row`, trying each candidate header
/// exactly first, then under normalized comparison. Returns `None` when no
/// candidate matches in either pass; never substitutes a default.
pub fn resolve<'r>(row: &'r Row, candidates: &[&str]) -> Option<&'r Cell> {
    for candidate in candidates {
        if let Some(cell) = row.get(candidate) {
            return Some(cell);
        }
    }
    for candidate in candidates {
        let wanted = normalize_key(candidate);
        for (key, cell) in row.iter() {
            if normalize_key(key) == wanted {
                return Some(cell);
            }
        }
    }
    None
}

/// Canonical department code for a row: trimmed, lowercased, alias-mapped.
/// `None` means the row carries no usable department and must be skipped.
pub fn dept_key(row: &Row) -> Option<String> {
    let code = resolve(row, cols::DEPT)?.as_text().trim().to_lowercase();
    if code.is_empty() {
        return None;
    }
    match DEPT_ALIASES.get(code.as_str()) {
        Some(canonical) => Some((*canonical).to_string()),
        None => Some(code),
    }
}

/// Level key for a row; `None` when absent or blank.
pub fn level_key(row: &Row) -> Option<LevelKey> {
    let raw = resolve(row, cols::LEVEL)?.as_text();
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    Some(LevelKey::parse(raw))
}

/// Integer zone id for a row; `None` when the zone cell is absent or does not
/// parse to a finite number (the row is dropped, not defaulted).
pub fn zone_key(row: &Row) -> Option<i64> {
    util::finite_number(resolve(row, cols::ZONE)).map(|n| n.round() as i64)
}
