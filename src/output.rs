use crate::types::{DeptOverviewRow, Document};
use serde::Serialize;
use std::error::Error;
use std::fs;
use std::path::Path;
use tabled::{settings::Style, Table, Tabled};

/// Serialize `value` as pretty-printed JSON (2-space indentation) and write
/// it to `path` in one operation, creating missing parent directories. An
/// unwritable path is fatal for the run; there is no partial output.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let s = serde_json::to_string_pretty(value)?;
    fs::write(path, s)?;
    Ok(())
}

/// One overview row per department for the console preview. Headline
/// percentages come from the department summary when one exists, otherwise
/// from the first level.
pub fn overview_rows(doc: &Document) -> Vec<DeptOverviewRow> {
    doc.iter()
        .map(|(code, dept)| {
            let zones = dept.levels.iter().map(|(_, l)| l.zones.len()).sum();
            let (pick, stock) = match (&dept.dept, dept.levels.iter().next()) {
                (Some(summary), _) => (Some(summary.pick_perf), Some(summary.stock_perf)),
                (None, Some((_, first))) => {
                    (Some(first.picking.perf), Some(first.stocking.perf))
                }
                (None, None) => (None, None),
            };
            DeptOverviewRow {
                dept: code.clone(),
                levels: dept.levels.len(),
                zones,
                pick_perf: pct_label(pick),
                stock_perf: pct_label(stock),
            }
        })
        .collect()
}

fn pct_label(value: Option<i64>) -> String {
    match value {
        Some(v) => format!("{}%", v),
        None => "-".to_string(),
    }
}

pub fn preview_table_rows<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().cloned().take(max_rows).collect();
    if slice.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let table_str = Table::new(slice).with(Style::markdown()).to_string();
    println!("{}\n", table_str);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assemble::{assemble_levels, assemble_summary};
    use crate::types::{Cell, Row};
    use crate::util::ClampMode;

    fn sample_doc() -> Document {
        let mut level = Row::new();
        level.push("dept", Cell::Text("mz".into()));
        level.push("level", Cell::Text("1".into()));
        level.push("pick_perf", Cell::Number(80.0));
        level.push("stock_perf", Cell::Number(91.0));

        let mut doc = Document::new();
        assemble_levels(&mut doc, &[level], ClampMode::Clamp);
        doc
    }

    #[test]
    fn write_json_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("dashboard.json");
        write_json(&path, &sample_doc()).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("\"mz\""));
        // 2-space indentation from the pretty printer.
        assert!(written.contains("\n  \"mz\""));
    }

    #[test]
    fn serialization_is_deterministic() {
        let a = serde_json::to_string_pretty(&sample_doc()).unwrap();
        let b = serde_json::to_string_pretty(&sample_doc()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn overview_prefers_the_department_summary() {
        let mut doc = sample_doc();
        let rows = overview_rows(&doc);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].pick_perf, "80%");

        let mut summary = Row::new();
        summary.push("dept", Cell::Text("mz".into()));
        summary.push("pick_perf", Cell::Number(99.0));
        summary.push("stock_perf", Cell::Number(98.0));
        assemble_summary(&mut doc, &[summary], ClampMode::Clamp);

        let rows = overview_rows(&doc);
        assert_eq!(rows[0].pick_perf, "99%");
        assert_eq!(rows[0].stock_perf, "98%");
    }
}
