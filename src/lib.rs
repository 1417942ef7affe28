//! Harvest - config-driven cell extraction across workbook sheets
//!
//! A CSV config maps output column names to a source cell (row number +
//! column letter). Harvest reads that cell from every sheet of a workbook and
//! assembles a flat table with one row per sheet.
//!
//! # Example
//!
//! ```no_run
//! use royalbit_harvest::config::ConfigLoader;
//! use royalbit_harvest::core::ExtractionEngine;
//! use royalbit_harvest::excel::WorkbookImporter;
//! use royalbit_harvest::writer::write_table;
//! use std::path::Path;
//!
//! let config = ConfigLoader::new().load_path(Path::new("mapping.csv"))?;
//! let workbook = WorkbookImporter::new("orders.xlsx").import()?;
//!
//! let table = ExtractionEngine::new(&config).run(&workbook)?;
//! println!("Rows: {}", table.row_count());
//!
//! write_table(&table, Path::new("summary.xlsx"), "Summary")?;
//! # Ok::<(), royalbit_harvest::error::HarvestError>(())
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod excel;
pub mod types;
pub mod writer;

// Re-export commonly used types
pub use error::{HarvestError, HarvestResult};
pub use types::{CellValue, ColumnLabel, ConfigEntry, ConfigTable, OutputRow, OutputTable, Sheet, Workbook};
