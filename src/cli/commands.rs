use crate::config::ConfigLoader;
use crate::core::{index_to_column, ExtractionEngine, ProgressObserver};
use crate::error::{HarvestError, HarvestResult};
use crate::excel::WorkbookImporter;
use crate::types::{ColumnLabel, OutputTable};
use crate::writer::{self, OutputFormat};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};

/// Workbook extensions calamine can open
const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Options for the extract command
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    pub input: PathBuf,
    pub config: PathBuf,
    pub output: PathBuf,
    pub sheet_name: String,
    pub config_header: bool,
    pub delimiter: u8,
    pub force: bool,
    pub verbose: bool,
}

/// Progress bar over sheets; hidden automatically when stderr is not a terminal
struct SheetProgress {
    bar: Option<ProgressBar>,
}

impl SheetProgress {
    fn new() -> Self {
        Self { bar: None }
    }
}

impl ProgressObserver for SheetProgress {
    fn started(&mut self, total_sheets: usize) {
        let bar = ProgressBar::new(total_sheets as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        self.bar = Some(bar);
    }

    fn sheet_finished(&mut self, _done: usize, _total: usize, sheet_name: &str) {
        if let Some(bar) = &self.bar {
            bar.set_message(sheet_name.to_string());
            bar.inc(1);
        }
    }

    fn finished(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}

impl Drop for SheetProgress {
    fn drop(&mut self) {
        // A failed run never reaches finished()
        if let Some(bar) = self.bar.take() {
            bar.abandon();
        }
    }
}

/// Execute the extract command
pub fn extract(options: ExtractOptions) -> HarvestResult<()> {
    println!("{}", "🌾 Harvest - Extracting cells".bold().green());
    println!("   Input:  {}", options.input.display());
    println!("   Config: {}", options.config.display());
    println!("   Output: {}\n", options.output.display());

    validate_input_path(&options.input, WORKBOOK_EXTENSIONS, "Input workbook")?;
    validate_input_path(&options.config, &["csv"], "Config file")?;
    validate_output_path(&options.output, options.force)?;

    if options.verbose {
        println!("{}", "📖 Reading config file...".cyan());
    }
    let config = ConfigLoader::new()
        .has_headers(options.config_header)
        .delimiter(options.delimiter)
        .load_path(&options.config)?;
    if options.verbose {
        println!("   Found {} output columns", config.len());
        for entry in config.iter() {
            println!(
                "      {} ← {}{}",
                entry.header.bright_blue(),
                entry.column,
                entry.row
            );
        }
        println!();
    }

    if options.verbose {
        println!("{}", "📖 Reading workbook...".cyan());
    }
    let workbook = WorkbookImporter::new(&options.input).import()?;
    if options.verbose {
        println!("   Found {} sheets\n", workbook.len());
    }

    let mut progress = SheetProgress::new();
    let table = ExtractionEngine::new(&config).run_with_progress(&workbook, &mut progress)?;

    if options.verbose {
        println!("{}", "💾 Writing output...".cyan());
    }
    writer::write_table(&table, &options.output, &options.sheet_name)?;

    print_summary(&table, &options.output);
    Ok(())
}

/// Execute the sheets command - list sheet names and used extents
pub fn sheets(input: PathBuf) -> HarvestResult<()> {
    validate_input_path(&input, WORKBOOK_EXTENSIONS, "Input workbook")?;

    println!("{}", "🌾 Harvest - Sheets".bold().green());
    println!("   File: {}\n", input.display());

    let workbook = WorkbookImporter::new(&input).import()?;
    for (idx, sheet) in workbook.sheets.iter().enumerate() {
        let extent = if sheet.is_empty() {
            "empty".dimmed().to_string()
        } else {
            let last_column = index_to_column(sheet.width()).unwrap_or_default();
            format!("A1:{}{} ({} rows × {} columns)", last_column, sheet.height(), sheet.height(), sheet.width())
        };
        println!("   {:>3}. {}  {}", idx + 1, sheet.name.bright_blue().bold(), extent);
    }
    println!();

    Ok(())
}

/// Execute the column command - convert labels to indices and back
pub fn column(values: Vec<String>) -> HarvestResult<()> {
    for value in values {
        let trimmed = value.trim();
        if let Ok(index) = trimmed.parse::<usize>() {
            let label = ColumnLabel::from_index(index)?;
            println!("{} → {}", trimmed, label.as_str().bold());
        } else {
            let label = ColumnLabel::parse(trimmed)?;
            println!("{} → {}", label, label.index().to_string().bold());
        }
    }
    Ok(())
}

fn print_summary(table: &OutputTable, output: &Path) {
    println!("{}", "✅ Extraction Complete!".bold().green());
    println!("   Rows:    {} (one per sheet)", table.row_count());
    println!("   Columns: {}", table.headers.len());
    println!("   Output:  {}\n", output.display());
}

/// Input files must exist, be regular files and carry one of `extensions`
fn validate_input_path(path: &Path, extensions: &[&str], what: &str) -> HarvestResult<()> {
    if !path.exists() {
        return Err(HarvestError::Validation(format!(
            "{} not found: {}",
            what,
            path.display()
        )));
    }
    if !path.is_file() {
        return Err(HarvestError::Validation(format!(
            "{} is not a file: {}",
            what,
            path.display()
        )));
    }
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    if !extensions.contains(&ext.as_str()) {
        return Err(HarvestError::Validation(format!(
            "{} must be one of .{}: {}",
            what,
            extensions.join(", ."),
            path.display()
        )));
    }
    Ok(())
}

/// Output must have a supported extension, a real parent directory, and not exist unless forced
fn validate_output_path(path: &Path, force: bool) -> HarvestResult<()> {
    OutputFormat::from_path(path)?;

    if path.exists() && !force {
        return Err(HarvestError::Validation(format!(
            "Output file already exists: {} (use --force to overwrite)",
            path.display()
        )));
    }
    if path.is_dir() {
        return Err(HarvestError::Validation(format!(
            "Output path is a directory: {}",
            path.display()
        )));
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.is_dir() {
            return Err(HarvestError::Validation(format!(
                "Output directory does not exist: {}",
                parent.display()
            )));
        }
    }
    Ok(())
}
