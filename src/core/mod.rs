//! Core extraction engine: column arithmetic, cell lookup, row assembly

pub mod cell_locator;
pub mod column_codec;
pub mod engine;

pub use cell_locator::{get_cell, get_cell_by_label};
pub use column_codec::{column_to_index, index_to_column, normalize_column};
pub use engine::{ExtractionEngine, NoProgress, ProgressObserver};
