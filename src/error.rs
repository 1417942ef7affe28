use thiserror::Error;

pub type HarvestResult<T> = Result<T, HarvestError>;

#[derive(Error, Debug)]
pub enum HarvestError {
    #[error("Invalid column label '{label}': {reason}")]
    InvalidColumnLabel { label: String, reason: String },

    #[error("Cell {column}{row} is out of range (sheet has {height} rows and {width} columns)")]
    CellOutOfRange {
        row: usize,
        column: String,
        height: usize,
        width: usize,
    },

    #[error("Malformed config at line {line}: {reason}")]
    MalformedConfig { line: u64, reason: String },

    /// A lookup failed while extracting one config entry from one sheet
    #[error("Sheet '{sheet}', output column '{header}' ({column}{row}): {source}")]
    Extraction {
        sheet: String,
        header: String,
        row: usize,
        column: String,
        source: Box<HarvestError>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Import error: {0}")]
    Import(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl HarvestError {
    /// Innermost error, unwrapping any extraction context
    pub fn root_cause(&self) -> &HarvestError {
        match self {
            HarvestError::Extraction { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
