//! Excel exporter - `OutputTable` → .xlsx

use crate::error::{HarvestError, HarvestResult};
use crate::types::{CellValue, OutputTable};
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::path::Path;
use tracing::info;

const DATE_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

/// Writes an output table to a single worksheet with a header row
pub struct TableExporter<'a> {
    table: &'a OutputTable,
    sheet_name: String,
}

impl<'a> TableExporter<'a> {
    pub fn new(table: &'a OutputTable, sheet_name: impl Into<String>) -> Self {
        Self {
            table,
            sheet_name: sheet_name.into(),
        }
    }

    /// Export the table to an Excel .xlsx file
    pub fn export(&self, output_path: &Path) -> HarvestResult<()> {
        let mut workbook = self.build_workbook()?;
        workbook
            .save(output_path)
            .map_err(|e| HarvestError::Export(format!("Failed to save Excel file: {}", e)))?;

        info!(
            path = %output_path.display(),
            rows = self.table.row_count(),
            "Exported table"
        );
        Ok(())
    }

    fn build_workbook(&self) -> HarvestResult<Workbook> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(&self.sheet_name)
            .map_err(|e| HarvestError::Export(format!("Invalid sheet name '{}': {}", self.sheet_name, e)))?;

        let header_format = Format::new().set_bold();
        let date_format = Format::new().set_num_format(DATE_FORMAT);

        for (idx, header) in self.table.headers.iter().enumerate() {
            let col = column_number(idx)?;
            worksheet
                .write_string_with_format(0, col, header, &header_format)
                .map_err(|e| HarvestError::Export(format!("Failed to write header: {}", e)))?;
        }

        for (row_idx, row) in self.table.rows.iter().enumerate() {
            // Row 0 holds the headers
            let excel_row = u32::try_from(row_idx + 1)
                .map_err(|_| HarvestError::Export("Too many rows for a worksheet".to_string()))?;
            for (col_idx, value) in row.values().enumerate() {
                Self::write_cell_value(worksheet, excel_row, column_number(col_idx)?, value, &date_format)?;
            }
        }

        Ok(workbook)
    }

    /// Write a single cell value based on its type
    fn write_cell_value(
        worksheet: &mut Worksheet,
        row: u32,
        col: u16,
        value: &CellValue,
        date_format: &Format,
    ) -> HarvestResult<()> {
        let result = match value {
            CellValue::Empty => return Ok(()),
            CellValue::Number(n) => worksheet.write_number(row, col, *n).map(|_| ()),
            CellValue::Bool(b) => worksheet.write_boolean(row, col, *b).map(|_| ()),
            CellValue::Text(s) | CellValue::Error(s) => worksheet.write_string(row, col, s).map(|_| ()),
            // 1900 leap-year quirk handled by rust_xlsxwriter
            CellValue::DateTime(dt) => worksheet
                .write_datetime_with_format(row, col, dt, date_format)
                .map(|_| ()),
        };
        result.map_err(|e| {
            HarvestError::Export(format!(
                "Failed to write {} at row {}, column {}: {}",
                value.type_name(),
                row + 1,
                col + 1,
                e
            ))
        })
    }
}

fn column_number(idx: usize) -> HarvestResult<u16> {
    u16::try_from(idx).map_err(|_| HarvestError::Export("Too many columns for a worksheet".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::excel::WorkbookImporter;
    use crate::types::OutputRow;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn sample_table() -> OutputTable {
        let mut table = OutputTable::new(vec!["Name".to_string(), "Qty".to_string()]);
        let mut row = OutputRow::new("s1");
        row.push("Name", CellValue::from("widget"));
        row.push("Qty", CellValue::Number(4.0));
        table.push_row(row);
        table
    }

    fn datetime(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> CellValue {
        CellValue::DateTime(
            NaiveDate::from_ymd_opt(y, m, d)
                .unwrap()
                .and_hms_opt(h, min, s)
                .unwrap(),
        )
    }

    #[test]
    fn test_export_writes_file() {
        let temp_dir = TempDir::new().unwrap();
        let output_path = temp_dir.path().join("out.xlsx");

        TableExporter::new(&sample_table(), "Result")
            .export(&output_path)
            .unwrap();

        assert!(output_path.exists());
        let written = WorkbookImporter::new(&output_path).import().unwrap();
        assert_eq!(written.sheets[0].get(1, 0), Some(&CellValue::from("widget")));
    }

    #[test]
    fn test_dates_around_1900_leap_day_survive_reimport() {
        let temp_dir = TempDir::new().unwrap();
        let output_path = temp_dir.path().join("dates.xlsx");

        // Time-only cells come back from calamine as 1899-12-31
        let values = vec![
            datetime(1899, 12, 31, 12, 0, 0),
            datetime(1900, 1, 15, 0, 0, 0),
            datetime(1900, 2, 28, 0, 0, 0),
            datetime(1900, 3, 1, 0, 0, 0),
            datetime(2024, 5, 6, 13, 45, 30),
        ];
        let mut table = OutputTable::new(vec!["When".to_string()]);
        for value in &values {
            let mut row = OutputRow::new("s");
            row.push("When", value.clone());
            table.push_row(row);
        }

        TableExporter::new(&table, "Dates").export(&output_path).unwrap();

        let written = WorkbookImporter::new(&output_path).import().unwrap();
        let sheet = &written.sheets[0];
        let read_back: Vec<_> = (1..=values.len())
            .map(|row| sheet.get(row, 0).cloned().unwrap())
            .collect();
        assert_eq!(read_back, values);
    }

    #[test]
    fn test_invalid_sheet_name() {
        let temp_dir = TempDir::new().unwrap();
        let output_path = temp_dir.path().join("bad.xlsx");

        let result = TableExporter::new(&sample_table(), "bad[name]").export(&output_path);

        assert!(matches!(result, Err(HarvestError::Export(_))));
        assert!(!output_path.exists());
    }

    #[test]
    fn test_export_empty_table() {
        let temp_dir = TempDir::new().unwrap();
        let output_path = temp_dir.path().join("empty.xlsx");
        let table = OutputTable::default();
        assert!(TableExporter::new(&table, "Sheet1").export(&output_path).is_ok());
    }
}
