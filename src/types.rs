use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use tabled::Tabled;

/// A single spreadsheet cell after the workbook reader has flattened it.
///
/// The reader hands the normalizer heterogeneous scalars only; formulas,
/// errors, and empty cells never make it into a `Row`.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Number(f64),
    Text(String),
    Bool(bool),
}

impl Cell {
    /// Render the cell the way the source spreadsheet displays it: integral
    /// numbers without a decimal part (`3`, not `3.0`), text verbatim.
    pub fn as_text(&self) -> String {
        match self {
            Cell::Number(n) if n.is_finite() && n.fract() == 0.0 && n.abs() < 9e15 => {
                format!("{}", *n as i64)
            }
            Cell::Number(n) => n.to_string(),
            Cell::Text(s) => s.clone(),
            Cell::Bool(b) => b.to_string(),
        }
    }
}

/// One sheet row: header key → cell, in column order.
///
/// Column order matters for the normalized header match (first hit wins), so
/// this is a Vec rather than a HashMap.
#[derive(Debug, Clone, Default)]
pub struct Row {
    cells: Vec<(String, Cell)>,
}

impl Row {
    pub fn new() -> Self {
        Self { cells: Vec::new() }
    }

    pub fn push(&mut self, key: impl Into<String>, cell: Cell) {
        self.cells.push((key.into(), cell));
    }

    pub fn get(&self, key: &str) -> Option<&Cell> {
        self.cells.iter().find(|(k, _)| k == key).map(|(_, c)| c)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Cell)> {
        self.cells.iter().map(|(k, c)| (k.as_str(), c))
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Level identifier: numbered floor (`1`, `2`, ...) or named area
/// (`"oil"`, `"pbs"`).
///
/// The source data genuinely mixes both, so the two forms are kept apart and
/// never coerced into each other. Both serialize as JSON object keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelKey {
    Num(i64),
    Name(String),
}

impl LevelKey {
    /// Canonicalize a trimmed, non-empty level cell. Numeric-looking values
    /// (including spreadsheet floats like `3.0`) become integer keys; anything
    /// else keeps its verbatim spelling, case preserved.
    pub fn parse(raw: &str) -> LevelKey {
        match raw.parse::<f64>() {
            Ok(n) if n.is_finite() => LevelKey::Num(n.round() as i64),
            _ => LevelKey::Name(raw.to_string()),
        }
    }
}

/// A type usable as a JSON object key.
pub trait JsonKey {
    fn json_key(&self) -> String;
}

impl JsonKey for String {
    fn json_key(&self) -> String {
        self.clone()
    }
}

impl JsonKey for i64 {
    fn json_key(&self) -> String {
        self.to_string()
    }
}

impl JsonKey for LevelKey {
    fn json_key(&self) -> String {
        match self {
            LevelKey::Num(n) => n.to_string(),
            LevelKey::Name(s) => s.clone(),
        }
    }
}

/// Insertion-ordered map.
///
/// The dashboard consumer indexes the document by key, but the JSON itself
/// must list departments, levels, and zones in sheet row order so that
/// re-running on an unchanged workbook reproduces the file byte for byte.
/// Backed by a Vec; the maps here hold at most a few dozen entries.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedMap<K, V> {
    entries: Vec<(K, V)>,
}

impl<K, V> Default for OrderedMap<K, V> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<K: PartialEq, V> OrderedMap<K, V> {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Insert-or-replace. A replaced entry keeps its original position so
    /// later rows win without reordering the document.
    pub fn insert(&mut self, key: K, value: V) {
        match self.entries.iter().position(|(k, _)| *k == key) {
            Some(idx) => self.entries[idx].1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Explicit get-or-insert: returns the existing value or appends one
    /// built by `default`.
    pub fn get_or_insert_with(&mut self, key: K, default: impl FnOnce() -> V) -> &mut V {
        if let Some(idx) = self.entries.iter().position(|(k, _)| *k == key) {
            return &mut self.entries[idx].1;
        }
        self.entries.push((key, default()));
        let last = self.entries.len() - 1;
        &mut self.entries[last].1
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }
}

impl<K: PartialEq, V> IntoIterator for OrderedMap<K, V> {
    type Item = (K, V);
    type IntoIter = std::vec::IntoIter<(K, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K: JsonKey, V: Serialize> Serialize for OrderedMap<K, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(&k.json_key(), v)?;
        }
        map.end()
    }
}

/// Outbound order-fulfillment metrics for one level or zone.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Picking {
    pub perf: i64,
    pub wave: i64,
    pub progress: i64,
}

/// Inbound replenishment metrics for one level or zone.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Stocking {
    pub perf: i64,
    pub expected: i64,
    pub stocked: i64,
    pub remaining: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ZoneRecord {
    pub picking: Picking,
    pub stocking: Stocking,
}

/// One level of a department. `zones` is always present, possibly empty, so
/// consumers can index into it without an existence check.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LevelRecord {
    pub picking: Picking,
    pub stocking: Stocking,
    pub zones: OrderedMap<i64, ZoneRecord>,
}

/// Home-page summary for one department.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SummaryRecord {
    pub pick_perf: i64,
    pub stock_perf: i64,
    pub wave: i64,
    pub progress: i64,
    pub orders_complete: i64,
    pub orders_total: i64,
    pub expected: i64,
    pub stocked: i64,
    pub remaining: i64,
}

/// Per-wave order completion.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OrderRecord {
    pub wave: i64,
    pub total: i64,
    pub completed: i64,
}

/// Shipping wave progress (department "ship" only).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WaveRecord {
    pub wave: i64,
    pub progress: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Department {
    pub levels: OrderedMap<LevelKey, LevelRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dept: Option<SummaryRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orders: Option<Vec<OrderRecord>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waves: Option<Vec<WaveRecord>>,
}

impl Department {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get-or-insert the level record, synthesizing a zeroed placeholder when
    /// a zone row arrives before (or without) its levels-sheet row.
    pub fn level_mut(&mut self, key: LevelKey) -> &mut LevelRecord {
        self.levels.get_or_insert_with(key, LevelRecord::default)
    }
}

/// The canonical dashboard document: department code → department record.
///
/// Rebuilt from scratch on every run; assemblers thread `&mut Document`
/// through explicit get-or-insert calls, never ambient state.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Document {
    depts: OrderedMap<String, Department>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.depts.is_empty()
    }

    pub fn get(&self, code: &str) -> Option<&Department> {
        self.depts.get(&code.to_string())
    }

    pub fn dept_mut(&mut self, code: &str) -> &mut Department {
        self.depts
            .get_or_insert_with(code.to_string(), Department::new)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Department)> {
        self.depts.iter()
    }

    /// Department/level/zone counts for console diagnostics.
    pub fn stats(&self) -> DocStats {
        let mut stats = DocStats::default();
        stats.departments = self.depts.len();
        for (_, dept) in self.depts.iter() {
            stats.levels += dept.levels.len();
            for (_, level) in dept.levels.iter() {
                stats.zones += level.zones.len();
            }
        }
        stats
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DocStats {
    pub departments: usize,
    pub levels: usize,
    pub zones: usize,
}

/// Console preview row, one per department.
#[derive(Debug, Clone, Tabled)]
pub struct DeptOverviewRow {
    #[tabled(rename = "Dept")]
    pub dept: String,
    #[tabled(rename = "Levels")]
    pub levels: usize,
    #[tabled(rename = "Zones")]
    pub zones: usize,
    #[tabled(rename = "PickPerf")]
    pub pick_perf: String,
    #[tabled(rename = "StockPerf")]
    pub stock_perf: String,
}
