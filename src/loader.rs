use crate::types::{Cell, Row};
use calamine::{open_workbook, DataType, Reader, Xlsx};
use std::error::Error;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// The workbook reader, wrapped so the normalizer never touches spreadsheet
/// internals: given a sheet name it yields ordered row records, or no rows at
/// all when the sheet is absent.
pub struct WorkbookFile {
    book: Xlsx<BufReader<File>>,
}

impl WorkbookFile {
    /// Open the workbook. A bad path or corrupt file is fatal for the run;
    /// nothing is written when the input cannot be read.
    pub fn open(path: &Path) -> Result<Self, Box<dyn Error>> {
        let book: Xlsx<_> = open_workbook(path)?;
        Ok(Self { book })
    }

    /// All data rows of the named sheet, keyed by the sheet's header row.
    /// An absent sheet contributes zero rows; a sheet that exists but cannot
    /// be read is an error.
    pub fn rows(&mut self, sheet: &str) -> Result<Vec<Row>, Box<dyn Error>> {
        let range = match self.book.worksheet_range(sheet) {
            Some(Ok(range)) => range,
            Some(Err(e)) => return Err(Box::new(e)),
            None => return Ok(Vec::new()),
        };

        let mut rows_iter = range.rows();
        let headers: Vec<String> = match rows_iter.next() {
            Some(header_row) => header_row
                .iter()
                .map(|cell| cell.to_string().trim().to_string())
                .collect(),
            None => return Ok(Vec::new()),
        };

        let mut rows = Vec::new();
        for data_row in rows_iter {
            let mut row = Row::new();
            for (idx, cell) in data_row.iter().enumerate() {
                let Some(header) = headers.get(idx) else { continue };
                if header.is_empty() {
                    continue;
                }
                if let Some(cell) = convert_cell(cell) {
                    row.push(header.clone(), cell);
                }
            }
            // Fully empty rows (common padding at the bottom of a sheet)
            // carry no data and are not worth handing to the assemblers.
            if !row.is_empty() {
                rows.push(row);
            }
        }
        Ok(rows)
    }
}

/// Flatten a spreadsheet cell to a plain scalar. Empty and error cells are
/// dropped so the row record only contains values that were actually entered.
fn convert_cell(cell: &DataType) -> Option<Cell> {
    match cell {
        DataType::Empty => None,
        DataType::String(s) => Some(Cell::Text(s.clone())),
        DataType::Float(f) => Some(Cell::Number(*f)),
        DataType::Int(i) => Some(Cell::Number(*i as f64)),
        DataType::Bool(b) => Some(Cell::Bool(*b)),
        DataType::DateTime(f) => Some(Cell::Number(*f)),
        _ => None,
    }
}
