//! Single-cell lookup by 1-based row and column label

use crate::error::{HarvestError, HarvestResult};
use crate::types::{CellValue, ColumnLabel, Sheet};

/// Read the cell at `row` (1-based) and `column` from `sheet`
pub fn get_cell<'a>(sheet: &'a Sheet, row: usize, column: &ColumnLabel) -> HarvestResult<&'a CellValue> {
    let out_of_range = || HarvestError::CellOutOfRange {
        row,
        column: column.to_string(),
        height: sheet.height(),
        width: sheet.width(),
    };

    if row == 0 || row > sheet.height() || column.index() > sheet.width() {
        return Err(out_of_range());
    }

    sheet
        .get(row - 1, column.index() - 1)
        .ok_or_else(out_of_range)
}

/// Like [`get_cell`], parsing a raw label first
pub fn get_cell_by_label<'a>(sheet: &'a Sheet, row: usize, label: &str) -> HarvestResult<&'a CellValue> {
    let column = ColumnLabel::parse(label)?;
    get_cell(sheet, row, &column)
}
