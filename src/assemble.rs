// Sheet assemblers: raw rows in, canonical document out.
//
// One assembler per logical sheet, run in a fixed order (levels, zones,
// summary, waves, orders). Each is tolerant of its sheet being absent and of
// partial rows; a row without a resolvable department/level/zone key is
// skipped silently. Later assemblers may create department entries the
// earlier ones never saw, but they only ever add their own top-level key.
use crate::config::Config;
use crate::loader::WorkbookFile;
use crate::schema::{self, cols, SHIP};
use crate::types::{
    Document, LevelRecord, OrderRecord, OrderedMap, Picking, Row, Stocking, SummaryRecord,
    WaveRecord, ZoneRecord,
};
use crate::util::{to_count, to_percentage, finite_number, ClampMode};
use std::error::Error;

/// Full pipeline for one workbook snapshot: read every configured sheet and
/// run the assemblers against a fresh document.
pub fn build_document(book: &mut WorkbookFile, cfg: &Config) -> Result<Document, Box<dyn Error>> {
    let mut doc = Document::new();
    assemble_levels(&mut doc, &book.rows(&cfg.sheets.levels)?, cfg.clamp);
    assemble_zones(&mut doc, &book.rows(&cfg.sheets.zones)?, cfg.clamp);
    assemble_summary(&mut doc, &book.rows(&cfg.sheets.summary)?, cfg.clamp);
    assemble_waves(&mut doc, &book.rows(&cfg.sheets.waves)?, cfg.clamp);
    assemble_orders(&mut doc, &book.rows(&cfg.sheets.orders)?);
    Ok(doc)
}

fn picking_from(row: &Row, clamp: ClampMode) -> Picking {
    Picking {
        perf: to_percentage(schema::resolve(row, cols::PICK_PERF), clamp),
        wave: to_count(schema::resolve(row, cols::PICK_WAVE)),
        progress: to_percentage(schema::resolve(row, cols::PICK_PROGRESS), clamp),
    }
}

fn stocking_from(row: &Row, clamp: ClampMode) -> Stocking {
    Stocking {
        perf: to_percentage(schema::resolve(row, cols::STOCK_PERF), clamp),
        expected: to_count(schema::resolve(row, cols::STOCK_EXPECTED)),
        stocked: to_count(schema::resolve(row, cols::STOCK_STOCKED)),
        remaining: to_count(schema::resolve(row, cols::STOCK_REMAINING)),
    }
}

/// Levels sheet: one Level Record per row at `doc[dept].levels[level]`.
/// A later row for the same (dept, level) replaces the earlier one outright.
pub fn assemble_levels(doc: &mut Document, rows: &[Row], clamp: ClampMode) {
    for row in rows {
        let Some(dept) = schema::dept_key(row) else { continue };
        let Some(level) = schema::level_key(row) else { continue };
        let record = LevelRecord {
            picking: picking_from(row, clamp),
            stocking: stocking_from(row, clamp),
            zones: OrderedMap::new(),
        };
        doc.dept_mut(&dept).levels.insert(level, record);
    }
}

/// Zones sheet: one Zone Record per row at
/// `doc[dept].levels[level].zones[zone]`. A zone row whose parent level never
/// appeared on the levels sheet still lands on a zeroed placeholder level.
pub fn assemble_zones(doc: &mut Document, rows: &[Row], clamp: ClampMode) {
    for row in rows {
        let Some(dept) = schema::dept_key(row) else { continue };
        let Some(level) = schema::level_key(row) else { continue };
        let Some(zone) = schema::zone_key(row) else { continue };
        let record = ZoneRecord {
            picking: picking_from(row, clamp),
            stocking: stocking_from(row, clamp),
        };
        doc.dept_mut(&dept).level_mut(level).zones.insert(zone, record);
    }
}

/// Summary sheet: one Summary Record per department at `doc[dept].dept`,
/// used for home-page display. Later rows for the same department win.
pub fn assemble_summary(doc: &mut Document, rows: &[Row], clamp: ClampMode) {
    for row in rows {
        let Some(dept) = schema::dept_key(row) else { continue };
        let summary = SummaryRecord {
            pick_perf: to_percentage(schema::resolve(row, cols::PICK_PERF), clamp),
            stock_perf: to_percentage(schema::resolve(row, cols::STOCK_PERF), clamp),
            wave: to_count(schema::resolve(row, cols::PICK_WAVE)),
            progress: to_percentage(schema::resolve(row, cols::PICK_PROGRESS), clamp),
            orders_complete: to_count(schema::resolve(row, cols::ORDERS_COMPLETE)),
            orders_total: to_count(schema::resolve(row, cols::ORDERS_TOTAL)),
            expected: to_count(schema::resolve(row, cols::STOCK_EXPECTED)),
            stocked: to_count(schema::resolve(row, cols::STOCK_STOCKED)),
            remaining: to_count(schema::resolve(row, cols::STOCK_REMAINING)),
        };
        doc.dept_mut(&dept).dept = Some(summary);
    }
}

/// Waves sheet: (wave, progress) pairs for the shipping department. Rows
/// whose wave does not parse to a finite number are dropped. The `waves` key
/// is only written when at least one valid wave was produced; absence, not
/// an empty array, is the "no data" signal.
pub fn assemble_waves(doc: &mut Document, rows: &[Row], clamp: ClampMode) {
    let mut waves = Vec::new();
    for row in rows {
        let Some(wave) = finite_number(schema::resolve(row, cols::WAVE)) else { continue };
        waves.push(WaveRecord {
            wave: wave.round() as i64,
            progress: to_percentage(schema::resolve(row, cols::PROGRESS), clamp),
        });
    }
    if !waves.is_empty() {
        doc.dept_mut(SHIP).waves = Some(waves);
    }
}

/// Orders sheet: rows grouped by department and wave number (last row wins
/// per pair), flattened per department into an array sorted ascending by
/// wave before attaching as `doc[dept].orders`.
pub fn assemble_orders(doc: &mut Document, rows: &[Row]) {
    let mut by_dept: OrderedMap<String, OrderedMap<i64, OrderRecord>> = OrderedMap::new();
    for row in rows {
        let Some(dept) = schema::dept_key(row) else { continue };
        let Some(wave) = finite_number(schema::resolve(row, cols::WAVE)) else { continue };
        let wave = wave.round() as i64;
        let record = OrderRecord {
            wave,
            total: to_count(schema::resolve(row, cols::ORDERS_TOTAL)),
            completed: to_count(schema::resolve(row, cols::ORDERS_COMPLETE)),
        };
        by_dept
            .get_or_insert_with(dept, OrderedMap::new)
            .insert(wave, record);
    }
    for (dept, group) in by_dept {
        let mut orders: Vec<OrderRecord> = group.into_iter().map(|(_, rec)| rec).collect();
        orders.sort_by_key(|o| o.wave);
        doc.dept_mut(&dept).orders = Some(orders);
    }
}
