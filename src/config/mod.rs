//! CSV config loader
//!
//! Each record is `output header, source row, source column`, in that order.
//! Fields past the third are ignored. Record order is output column order.

use crate::error::{HarvestError, HarvestResult};
use crate::types::{ColumnLabel, ConfigEntry, ConfigTable};
use csv::{ReaderBuilder, StringRecord};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::info;

/// Builder-style loader for extraction configs
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    has_headers: bool,
    delimiter: u8,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self {
            has_headers: true,
            delimiter: b',',
        }
    }
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the first line is a header and should be skipped (default: true)
    pub fn has_headers(mut self, yes: bool) -> Self {
        self.has_headers = yes;
        self
    }

    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn load_path(&self, path: &Path) -> HarvestResult<ConfigTable> {
        let file = File::open(path)?;
        let config = self.load_reader(file)?;
        info!(
            path = %path.display(),
            entries = config.len(),
            "Loaded extraction config"
        );
        Ok(config)
    }

    pub fn load_str(&self, content: &str) -> HarvestResult<ConfigTable> {
        self.load_reader(content.as_bytes())
    }

    fn load_reader<R: Read>(&self, reader: R) -> HarvestResult<ConfigTable> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(self.has_headers)
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let mut entries = Vec::new();
        for result in reader.records() {
            let record = result?;
            if record.iter().all(str::is_empty) {
                continue;
            }
            entries.push(parse_record(&record)?);
        }

        Ok(ConfigTable::new(entries))
    }
}

fn parse_record(record: &StringRecord) -> HarvestResult<ConfigEntry> {
    let line = record.position().map(|p| p.line()).unwrap_or(0);
    let malformed = |reason: String| HarvestError::MalformedConfig { line, reason };

    if record.len() < 3 {
        return Err(malformed(format!(
            "expected 3 fields (header, row, column), found {}",
            record.len()
        )));
    }

    let header = &record[0];
    let row = record[1]
        .parse::<usize>()
        .ok()
        .filter(|r| *r >= 1)
        .ok_or_else(|| malformed(format!("source row '{}' is not a positive integer", &record[1])))?;
    let column = ColumnLabel::parse(&record[2]).map_err(|e| malformed(e.to_string()))?;

    Ok(ConfigEntry::new(header, row, column))
}
