use crate::core::column_codec;
use crate::error::HarvestResult;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::fmt;

//==============================================================================
// Cell values
//==============================================================================

/// A single spreadsheet cell value
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Empty,
    Bool(bool),
    Number(f64),
    DateTime(NaiveDateTime),
    Text(String),
    /// Spreadsheet error cell (`#DIV/0!`, `#N/A`, ...)
    Error(String),
}

impl CellValue {
    /// Get the type name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            CellValue::Empty => "Empty",
            CellValue::Bool(_) => "Boolean",
            CellValue::Number(_) => "Number",
            CellValue::DateTime(_) => "Date",
            CellValue::Text(_) => "Text",
            CellValue::Error(_) => "Error",
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Bool(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            // Whole numbers print without a trailing ".0"
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            CellValue::Text(s) | CellValue::Error(s) => f.write_str(s),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

//==============================================================================
// Column labels
//==============================================================================

/// A validated, upper-cased column label ("A", "AA", ...) with its 1-based index
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnLabel {
    label: String,
    index: usize,
}

impl ColumnLabel {
    /// Trim, upper-case and validate a raw label
    pub fn parse(raw: &str) -> HarvestResult<Self> {
        let label = column_codec::normalize_column(raw)?;
        let index = column_codec::column_to_index(&label)?;
        Ok(Self { label, index })
    }

    pub fn from_index(index: usize) -> HarvestResult<Self> {
        let label = column_codec::index_to_column(index)?;
        Ok(Self { label, index })
    }

    pub fn as_str(&self) -> &str {
        &self.label
    }

    /// 1-based column index
    pub fn index(&self) -> usize {
        self.index
    }
}

impl fmt::Display for ColumnLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

//==============================================================================
// Workbook model
//==============================================================================

/// One named grid of cells addressed from A1
///
/// Only the used block is stored. Cells above or left of `origin` read as
/// `Empty`, so a single value far from A1 costs one cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    origin: (usize, usize),
    cells: Vec<Vec<CellValue>>,
    height: usize,
    width: usize,
}

static EMPTY_CELL: CellValue = CellValue::Empty;

impl Sheet {
    /// Build a sheet from rows starting at A1; short rows are padded with `Empty`
    pub fn new(name: impl Into<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self::with_origin(name, (0, 0), rows)
    }

    /// Build a sheet whose first stored cell sits at 0-based `(row, col)`
    pub fn with_origin(
        name: impl Into<String>,
        origin: (usize, usize),
        mut rows: Vec<Vec<CellValue>>,
    ) -> Self {
        let used_width = rows.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut rows {
            row.resize(used_width, CellValue::Empty);
        }
        let height = if rows.is_empty() { 0 } else { origin.0 + rows.len() };
        let width = if used_width == 0 { 0 } else { origin.1 + used_width };
        Self {
            name: name.into(),
            origin,
            cells: rows,
            height,
            width,
        }
    }

    /// Convenience for building text-only sheets
    pub fn from_text<S: AsRef<str>>(name: impl Into<String>, rows: &[Vec<S>]) -> Self {
        let rows = rows
            .iter()
            .map(|row| row.iter().map(|s| CellValue::from(s.as_ref())).collect())
            .collect();
        Self::new(name, rows)
    }

    /// Rows from A1 to the last used row
    pub fn height(&self) -> usize {
        self.height
    }

    /// Columns from A to the last used column
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn is_empty(&self) -> bool {
        self.height == 0 || self.width == 0
    }

    /// 0-based access, `None` outside the grid
    pub fn get(&self, row: usize, col: usize) -> Option<&CellValue> {
        if row >= self.height || col >= self.width {
            return None;
        }
        let (origin_row, origin_col) = self.origin;
        if row < origin_row || col < origin_col {
            return Some(&EMPTY_CELL);
        }
        self.cells
            .get(row - origin_row)
            .and_then(|r| r.get(col - origin_col))
    }
}

/// Ordered collection of sheets; order is output row order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_sheet(&mut self, sheet: Sheet) {
        self.sheets.push(sheet);
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }
}

//==============================================================================
// Config
//==============================================================================

/// One output column: take the cell at (row, column) from every sheet
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigEntry {
    pub header: String,
    /// 1-based source row
    pub row: usize,
    pub column: ColumnLabel,
}

impl ConfigEntry {
    pub fn new(header: impl Into<String>, row: usize, column: ColumnLabel) -> Self {
        Self {
            header: header.into(),
            row,
            column,
        }
    }
}

/// Ordered config entries; order is output column order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigTable {
    pub entries: Vec<ConfigEntry>,
}

impl ConfigTable {
    pub fn new(entries: Vec<ConfigEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Output headers in config order, duplicates included
    pub fn headers(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.header.clone()).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ConfigEntry> {
        self.entries.iter()
    }
}

//==============================================================================
// Output
//==============================================================================

/// Values extracted from one sheet, in config order
#[derive(Debug, Clone, PartialEq)]
pub struct OutputRow {
    /// Sheet the values came from
    pub sheet: String,
    cells: Vec<(String, CellValue)>,
}

impl OutputRow {
    pub fn new(sheet: impl Into<String>) -> Self {
        Self {
            sheet: sheet.into(),
            cells: Vec::new(),
        }
    }

    pub fn push(&mut self, header: impl Into<String>, value: CellValue) {
        self.cells.push((header.into(), value));
    }

    /// First value stored under `header`
    pub fn get(&self, header: &str) -> Option<&CellValue> {
        self.cells
            .iter()
            .find(|(h, _)| h == header)
            .map(|(_, v)| v)
    }

    /// Values in column order
    pub fn values(&self) -> impl Iterator<Item = &CellValue> {
        self.cells.iter().map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// The flat result: headers from the config, one row per sheet
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OutputTable {
    pub headers: Vec<String>,
    pub rows: Vec<OutputRow>,
}

impl OutputTable {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: OutputRow) {
        self.rows.push(row);
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}
