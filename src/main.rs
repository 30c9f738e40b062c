use clap::{Parser, Subcommand};
use colored::Colorize;
use excel_mapper::cli;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "excel-mapper")]
#[command(about = "Map spreadsheet rows to records and back, driven by column tags.")]
#[command(long_about = "Excel Mapper - spreadsheet rows ↔ records

A YAML template describes the record: each field has a key, a type and an
optional column tag. A tag starting with '*' marks a required column.

COMMANDS:
  columns  - Show the columns a template maps
  import   - Spreadsheet (.xls/.xlsx/.csv) to JSON records
  export   - JSON records to spreadsheet (.xlsx/.csv)

TEMPLATE:
  name: employee
  fields:
    - key: id
      tag: \"*ID\"
      type: integer      # integer | float | boolean | text | time
    - key: name
      tag: Name

EXAMPLES:
  excel-mapper columns employee.yaml
  excel-mapper import employee.yaml upload.xlsx -o staff.json
  excel-mapper export employee.yaml staff.json staff.xlsx --sheet Staff")]
#[command(version)]
struct Cli {
    /// Show verbose steps and debug logs
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the columns a template maps, in order
    Columns {
        /// Path to YAML template
        template: PathBuf,

        /// Column display name to leave out (repeatable)
        #[arg(short, long)]
        exclude: Vec<String>,
    },

    #[command(long_about = "Import a spreadsheet into JSON records.

The first row is the header. Header cells are matched against the template's
column names; unknown columns are ignored. A required column missing from the
header, an empty required cell, or a cell that does not parse as its field's
type stops the import with the row and column of the problem.

Timestamps use the pattern YYYY-MM-DD HH:MM:SS.")]
    /// Import a spreadsheet into JSON records
    Import {
        /// Path to YAML template
        template: PathBuf,

        /// Spreadsheet to read (.xls, .xlsx or .csv)
        input: PathBuf,

        /// Write JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Column display name to leave out (repeatable)
        #[arg(short, long)]
        exclude: Vec<String>,
    },

    #[command(long_about = "Export JSON records to a spreadsheet.

The input is a JSON object (one record) or an array of objects. The header
row shows each column's display name; required columns are rendered in red
in .xlsx output.")]
    /// Export JSON records to a spreadsheet
    Export {
        /// Path to YAML template
        template: PathBuf,

        /// JSON file with one record or an array of records
        input: PathBuf,

        /// Output file (.xlsx or .csv)
        output: PathBuf,

        /// Worksheet name
        #[arg(short, long, env = "EXCEL_MAPPER_SHEET", default_value = "Sheet1")]
        sheet: String,

        /// Column display name to leave out (repeatable)
        #[arg(short, long)]
        exclude: Vec<String>,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "excel_mapper=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Columns { template, exclude } => cli::columns(template, exclude),
        Commands::Import {
            template,
            input,
            output,
            exclude,
        } => cli::import(template, input, output, exclude, cli.verbose),
        Commands::Export {
            template,
            input,
            output,
            sheet,
            exclude,
        } => cli::export(template, input, output, sheet, exclude, cli.verbose),
    };

    if let Err(err) = result {
        eprintln!("{} {} (code {})", "❌ Error:".bold().red(), err, err.code());
        std::process::exit(1);
    }
}
