//! Output writers, chosen by file extension

use crate::error::{HarvestError, HarvestResult};
use crate::excel::TableExporter;
use crate::types::{CellValue, OutputTable};
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::info;

/// Supported output file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Xlsx,
    Json,
    Yaml,
    Csv,
}

impl OutputFormat {
    /// Detect format from the path's extension (case-insensitive)
    pub fn from_path(path: &Path) -> HarvestResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "xlsx" => Ok(OutputFormat::Xlsx),
            "json" => Ok(OutputFormat::Json),
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(HarvestError::Validation(format!(
                "Unsupported output format '{}' (use .xlsx, .json, .yaml or .csv)",
                other
            ))),
        }
    }
}

/// Serialized shape for JSON/YAML; rows are positional so duplicate headers survive
#[derive(Debug, Serialize)]
struct TableDocument<'a> {
    sheet: &'a str,
    headers: &'a [String],
    rows: Vec<Vec<&'a CellValue>>,
}

impl<'a> TableDocument<'a> {
    fn new(table: &'a OutputTable, sheet_name: &'a str) -> Self {
        Self {
            sheet: sheet_name,
            headers: &table.headers,
            rows: table.rows.iter().map(|r| r.values().collect()).collect(),
        }
    }
}

/// Write `table` to `path` in the format its extension names
pub fn write_table(table: &OutputTable, path: &Path, sheet_name: &str) -> HarvestResult<()> {
    let format = OutputFormat::from_path(path)?;
    match format {
        OutputFormat::Xlsx => TableExporter::new(table, sheet_name).export(path)?,
        OutputFormat::Json => fs::write(path, to_json(table, sheet_name)?)?,
        OutputFormat::Yaml => fs::write(path, to_yaml(table, sheet_name)?)?,
        OutputFormat::Csv => fs::write(path, to_csv(table)?)?,
    }
    info!(path = %path.display(), ?format, "Wrote output table");
    Ok(())
}

pub fn to_json(table: &OutputTable, sheet_name: &str) -> HarvestResult<String> {
    Ok(serde_json::to_string_pretty(&TableDocument::new(table, sheet_name))?)
}

pub fn to_yaml(table: &OutputTable, sheet_name: &str) -> HarvestResult<String> {
    Ok(serde_yaml::to_string(&TableDocument::new(table, sheet_name))?)
}

/// Header line, then one line per row with values in display form
pub fn to_csv(table: &OutputTable) -> HarvestResult<String> {
    let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(&table.headers)?;
    for row in &table.rows {
        writer.write_record(row.values().map(|v| v.to_string()))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| HarvestError::Export(format!("Failed to flush CSV: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| HarvestError::Export(format!("CSV is not UTF-8: {}", e)))
}
