//! Workbook importer - spreadsheet file → in-memory `Workbook`

use crate::error::{HarvestError, HarvestResult};
use crate::types::{CellValue, Sheet, Workbook};
use calamine::{open_workbook_auto, Data, Range, Reader};
use chrono::{NaiveDate, NaiveDateTime};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Reads every sheet of a workbook as cached cell values (formulas are not evaluated)
pub struct WorkbookImporter {
    path: PathBuf,
}

impl WorkbookImporter {
    /// Create a new importer for `.xlsx`, `.xlsm`, `.xls`, `.xlsb` or `.ods` files
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Sheet names in workbook order
    pub fn sheet_names(&self) -> HarvestResult<Vec<String>> {
        let workbook = open_workbook_auto(&self.path).map_err(|e| {
            HarvestError::Import(format!("Failed to open {}: {}", self.path.display(), e))
        })?;
        Ok(workbook.sheet_names())
    }

    /// Import all sheets, in workbook order
    pub fn import(&self) -> HarvestResult<Workbook> {
        let mut source = open_workbook_auto(&self.path).map_err(|e| {
            HarvestError::Import(format!("Failed to open {}: {}", self.path.display(), e))
        })?;

        let mut workbook = Workbook::new();
        for sheet_name in source.sheet_names() {
            let range = source.worksheet_range(&sheet_name).map_err(|e| {
                HarvestError::Import(format!("Failed to read sheet '{}': {}", sheet_name, e))
            })?;
            let sheet = Self::range_to_sheet(&sheet_name, &range);
            debug!(
                sheet = %sheet_name,
                height = sheet.height(),
                width = sheet.width(),
                "Imported sheet"
            );
            workbook.add_sheet(sheet);
        }

        info!(
            path = %self.path.display(),
            sheets = workbook.len(),
            "Imported workbook"
        );
        Ok(workbook)
    }

    /// Build a sheet addressed from A1
    ///
    /// calamine ranges start at the first used cell. Only that block is
    /// copied; its start becomes the sheet origin so that row 1 / column A
    /// mean what the user sees.
    fn range_to_sheet(name: &str, range: &Range<Data>) -> Sheet {
        let Some((start_row, start_col)) = range.start() else {
            return Sheet::new(name, Vec::new());
        };
        let rows = range
            .rows()
            .map(|row| row.iter().map(Self::convert_cell).collect())
            .collect();

        Sheet::with_origin(name, (start_row as usize, start_col as usize), rows)
    }

    fn convert_cell(cell: &Data) -> CellValue {
        match cell {
            Data::Empty => CellValue::Empty,
            Data::Int(i) => CellValue::Number(*i as f64),
            Data::Float(f) => CellValue::Number(*f),
            Data::String(s) => CellValue::Text(s.clone()),
            Data::Bool(b) => CellValue::Bool(*b),
            Data::DateTime(dt) => match dt.as_datetime() {
                Some(value) => CellValue::DateTime(value),
                None => CellValue::Number(dt.as_f64()),
            },
            Data::DateTimeIso(s) => {
                parse_iso_datetime(s).map_or_else(|| CellValue::Text(s.clone()), CellValue::DateTime)
            }
            Data::DurationIso(s) => CellValue::Text(s.clone()),
            Data::Error(e) => CellValue::Error(e.to_string()),
        }
    }
}

fn parse_iso_datetime(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
