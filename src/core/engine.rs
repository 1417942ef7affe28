//! Extraction engine: apply every config entry to every sheet
//!
//! Sheets are processed in workbook order and entries in config order. Each
//! sheet produces exactly one output row, appended after its last entry. The
//! first failing lookup aborts the whole run and the partial table is dropped.

use crate::core::cell_locator;
use crate::error::{HarvestError, HarvestResult};
use crate::types::{ConfigTable, OutputRow, OutputTable, Sheet, Workbook};
use tracing::{debug, trace, warn};

/// Receives coarse progress notifications during a run
pub trait ProgressObserver {
    /// Called once before the first sheet
    fn started(&mut self, _total_sheets: usize) {}

    /// Called after each sheet's row has been appended
    fn sheet_finished(&mut self, done: usize, total: usize, sheet_name: &str);

    /// Called once after the last sheet, on success only
    fn finished(&mut self) {}
}

/// Observer that ignores all notifications
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn sheet_finished(&mut self, _done: usize, _total: usize, _sheet_name: &str) {}
}

/// Config-driven extractor producing one output row per sheet
pub struct ExtractionEngine<'a> {
    config: &'a ConfigTable,
}

impl<'a> ExtractionEngine<'a> {
    pub fn new(config: &'a ConfigTable) -> Self {
        Self { config }
    }

    /// Run over all sheets without progress reporting
    pub fn run(&self, workbook: &Workbook) -> HarvestResult<OutputTable> {
        self.run_with_progress(workbook, &mut NoProgress)
    }

    pub fn run_with_progress(
        &self,
        workbook: &Workbook,
        observer: &mut dyn ProgressObserver,
    ) -> HarvestResult<OutputTable> {
        let total = workbook.len();
        if self.config.is_empty() {
            warn!("Config has no entries; every output row will be empty");
        }
        if workbook.is_empty() {
            warn!("Workbook has no sheets; output table will have no rows");
        }

        let mut table = OutputTable::new(self.config.headers());
        observer.started(total);

        for (idx, sheet) in workbook.sheets.iter().enumerate() {
            debug!(
                sheet = %sheet.name,
                height = sheet.height(),
                width = sheet.width(),
                "Extracting sheet {}/{}",
                idx + 1,
                total
            );
            let row = self.extract_sheet(sheet)?;
            table.push_row(row);
            observer.sheet_finished(idx + 1, total, &sheet.name);
        }

        observer.finished();
        Ok(table)
    }

    /// Build the output row for a single sheet
    pub fn extract_sheet(&self, sheet: &Sheet) -> HarvestResult<OutputRow> {
        let mut row = OutputRow::new(sheet.name.clone());

        for entry in self.config.iter() {
            let value = cell_locator::get_cell(sheet, entry.row, &entry.column).map_err(|e| {
                HarvestError::Extraction {
                    sheet: sheet.name.clone(),
                    header: entry.header.clone(),
                    row: entry.row,
                    column: entry.column.to_string(),
                    source: Box::new(e),
                }
            })?;
            trace!(
                sheet = %sheet.name,
                header = %entry.header,
                "{}{} = {}",
                entry.column,
                entry.row,
                value
            );
            row.push(entry.header.clone(), value.clone());
        }

        Ok(row)
    }
}
