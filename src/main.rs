use clap::{Parser, Subcommand};
use sovreader::cli;
use sovreader::error::ExtractResult;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sovreader")]
#[command(about = "Extract buildings and policy terms from SOV workbooks")]
#[command(long_about = "sovreader - Convention-driven SOV workbook extraction

Reads a statement-of-values workbook whose schema is described by defined
names, tables and custom document properties, and writes one JSON document
with its buildings, policy terms, extra data fields and metadata.

CONVENTIONS:
  r_<table>_column_specification   Column → attribute mapping (Col, Attribute, Props)
  p_L{n}PL / LL / AP / PP / Name / PR   Policy layers
  p_<peril>_Caption / _Group        Peril groups
  p_<group>_<zone>_Caption          Zone groups
  p_extra_data_fields               Extra data (Label, Excel Defined Name)

EXAMPLES:
  sovreader extract acme_sov.xlsx                  # Writes acme_sov.xlsx.output.json
  sovreader extract acme_sov.xlsx -o acme.json -v
  sovreader names acme_sov.xlsx --pattern '^p_L'")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract a workbook to JSON
    Extract {
        /// Path to the workbook (.xlsx / .xlsm)
        input: PathBuf,

        /// Output JSON file (default: <INPUT>.output.json)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// YAML file overriding naming conventions and markers
        #[arg(short, long, env = "SOVREADER_CONFIG")]
        config: Option<PathBuf>,

        /// Show extraction summary and debug logging
        #[arg(short, long)]
        verbose: bool,
    },

    /// List the workbook's defined names
    Names {
        /// Path to the workbook (.xlsx / .xlsm)
        input: PathBuf,

        /// Only show names matching this regular expression
        #[arg(short, long)]
        pattern: Option<String>,
    },
}

fn main() -> ExtractResult<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Extract {
            input,
            output,
            config,
            verbose,
        } => {
            cli::init_logging(verbose);
            cli::extract(input, output, config, verbose)
        }

        Commands::Names { input, pattern } => {
            cli::init_logging(false);
            cli::names(input, pattern)
        }
    }
}
