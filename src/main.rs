use clap::{Parser, Subcommand};
use colored::Colorize;
use royalbit_harvest::cli::{self, ExtractOptions};
use royalbit_harvest::error::{HarvestError, HarvestResult};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "harvest")]
#[command(about = "Pull the same cells out of every sheet of a workbook into one flat table.")]
#[command(long_about = "Harvest - config-driven cell extraction

Reads a CSV mapping of output column → source cell, takes that cell from
every sheet of a workbook, and writes one output row per sheet.

COMMANDS:
  extract  - Extract mapped cells from every sheet
  sheets   - List the sheets of a workbook
  column   - Convert column letters to numbers and back

EXAMPLES:
  harvest extract orders.xlsx -c mapping.csv -o summary.xlsx
  harvest extract orders.xlsx -c mapping.csv -o summary.json --force
  harvest sheets orders.xlsx
  harvest column AA 28

LOGGING:
  Set RUST_LOG (e.g. RUST_LOG=royalbit_harvest=trace) for detailed logs.")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Extract mapped cells from every sheet of a workbook.

CONFIG FORMAT (CSV, first line is a header unless --no-config-header):
  输出列名,行,列
  Customer,2,B
  Total,14,F

  Field 1: output column name
  Field 2: source row (1-based)
  Field 3: source column letter (A, B, ..., AA, ...)

Every sheet yields exactly one output row, in workbook order. Output columns
follow config order. Any cell outside a sheet's used range aborts the run and
nothing is written.

OUTPUT FORMATS (by extension):
  .xlsx  - single worksheet named by --sheet-name
  .json  - { sheet, headers, rows }
  .yaml  - same shape as JSON
  .csv   - header line plus one line per sheet")]
    /// Extract mapped cells from every sheet
    Extract {
        /// Path to the source workbook (.xlsx, .xlsm, .xlsb, .xls, .ods)
        input: PathBuf,

        /// Path to the CSV mapping config
        #[arg(short, long)]
        config: PathBuf,

        /// Output file (.xlsx, .json, .yaml, .csv)
        #[arg(short, long)]
        output: PathBuf,

        /// Worksheet name for .xlsx output
        #[arg(short, long, env = "HARVEST_SHEET_NAME", default_value = "Sheet1")]
        sheet_name: String,

        /// Treat the first config line as data instead of a header
        #[arg(long)]
        no_config_header: bool,

        /// Field delimiter of the config file
        #[arg(short, long, default_value_t = ',')]
        delimiter: char,

        /// Overwrite the output file if it exists
        #[arg(short, long)]
        force: bool,

        /// Show verbose extraction steps
        #[arg(short, long)]
        verbose: bool,
    },

    /// List the sheets of a workbook
    Sheets {
        /// Path to the workbook
        input: PathBuf,
    },

    /// Convert column letters to numbers and numbers to letters
    Column {
        /// Column labels (AA) or 1-based indices (27)
        #[arg(required = true)]
        values: Vec<String>,
    },
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "royalbit_harvest=debug"
    } else {
        "royalbit_harvest=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> HarvestResult<()> {
    match cli.command {
        Commands::Extract {
            input,
            config,
            output,
            sheet_name,
            no_config_header,
            delimiter,
            force,
            verbose,
        } => {
            if !delimiter.is_ascii() {
                return Err(HarvestError::Validation(format!(
                    "Delimiter '{}' must be an ASCII character",
                    delimiter
                )));
            }
            cli::extract(ExtractOptions {
                input,
                config,
                output,
                sheet_name,
                config_header: !no_config_header,
                delimiter: delimiter as u8,
                force,
                verbose,
            })
        }

        Commands::Sheets { input } => cli::sheets(input),

        Commands::Column { values } => cli::column(values),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let verbose = matches!(cli.command, Commands::Extract { verbose: true, .. });
    init_tracing(verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "❌ Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
