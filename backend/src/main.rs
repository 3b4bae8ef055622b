//! Shipmerge CLI - reshape and aggregate shipment export CSV files
//!
//! ```bash
//! shipmerge transform export.csv -o processed_file.csv   # Write processed CSV
//! shipmerge preview export.csv --rows 20                 # Show result as JSON
//! shipmerge columns                                      # Required/output columns
//! shipmerge serve                                        # Start HTTP server (port 3000)
//! ```

use clap::{Parser, Subcommand};
use shipmerge::{
    transform_csv, write_csv, GroupOrder, ServerConfig, TransformOptions, OUTPUT_COLUMNS,
    REQUIRED_COLUMNS,
};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "shipmerge")]
#[command(version, about = "Reshape and aggregate shipment export CSV files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Transform a shipment export and write the processed CSV
    Transform {
        /// Input CSV file
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Keep groups in input order instead of sorting by Delivery Number and Product ID
        #[arg(long)]
        input_order: bool,
    },

    /// Transform a shipment export and print the result as JSON
    Preview {
        /// Input CSV file
        input: PathBuf,

        /// Number of rows to show
        #[arg(long, default_value = "10")]
        rows: usize,

        /// Keep groups in input order instead of sorting by Delivery Number and Product ID
        #[arg(long)]
        input_order: bool,
    },

    /// List required input columns and the output layout
    Columns,

    /// Start HTTP server
    Serve {
        /// Port to listen on (default: SHIPMERGE_PORT or 3000)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Transform {
            input,
            output,
            input_order,
        } => cmd_transform(&input, output.as_deref(), options(input_order)),

        Commands::Preview {
            input,
            rows,
            input_order,
        } => cmd_preview(&input, rows, options(input_order)),

        Commands::Columns => cmd_columns(),

        Commands::Serve { port } => cmd_serve(port).await,
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn options(input_order: bool) -> TransformOptions {
    TransformOptions {
        group_order: if input_order {
            GroupOrder::FirstSeen
        } else {
            GroupOrder::Sorted
        },
    }
}

fn cmd_transform(
    input: &Path,
    output: Option<&Path>,
    options: TransformOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let result = transform_csv(input, &options)?;

    match output {
        Some(path) => {
            let file = BufWriter::new(File::create(path)?);
            write_csv(&result.rows, file)?;
            eprintln!("💾 {} rows written to: {}", result.rows.len(), path.display());
        }
        None => {
            let stdout = io::stdout();
            write_csv(&result.rows, stdout.lock())?;
        }
    }

    Ok(())
}

fn cmd_preview(
    input: &Path,
    rows: usize,
    options: TransformOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let result = transform_csv(input, &options)?;
    let shown = &result.rows[..rows.min(result.rows.len())];

    println!("{}", serde_json::to_string_pretty(shown)?);
    if shown.len() < result.rows.len() {
        eprintln!("   ({} of {} rows shown)", shown.len(), result.rows.len());
    }

    Ok(())
}

fn cmd_columns() -> Result<(), Box<dyn std::error::Error>> {
    let mut out = io::stdout().lock();

    writeln!(out, "Required input columns:")?;
    for col in REQUIRED_COLUMNS {
        writeln!(out, "  - {}", col)?;
    }
    writeln!(out, "\nOutput columns:")?;
    for (i, col) in OUTPUT_COLUMNS.iter().enumerate() {
        writeln!(out, "  [{:2}] {}", i + 1, col)?;
    }

    Ok(())
}

async fn cmd_serve(port: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::from_env().with_port(port);
    shipmerge::server::start_server(config).await
}
