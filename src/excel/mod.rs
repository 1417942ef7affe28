//! Excel import/export
//!
//! - Import: workbook file (.xlsx, .xls, .ods, ...) → `Workbook`
//! - Export: `OutputTable` → .xlsx with a header row

mod exporter;
mod importer;

pub use exporter::TableExporter;
pub use importer::WorkbookImporter;
