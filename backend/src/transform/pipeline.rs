//! High-level pipeline API: parse, transform and serialize.
//!
//! # Example
//!
//! ```rust,ignore
//! use shipmerge::transform::pipeline::{transform_csv, to_csv_string};
//! use shipmerge::TransformOptions;
//! use std::path::Path;
//!
//! let output = transform_csv(Path::new("export.csv"), &TransformOptions::default())?;
//! std::fs::write("processed_file.csv", to_csv_string(&output.rows)?)?;
//! ```

use serde::Serialize;
use std::io::Write;
use std::path::Path;

use crate::api::logs::{log_error, log_info, log_success, log_warning};
use crate::config::TransformOptions;
use crate::error::{PipelineError, PipelineResult};
use crate::models::{ShipmentRow, Table, OUTPUT_COLUMNS, REQUIRED_COLUMNS};
use crate::parser::{parse_bytes_auto, parse_csv_file_auto, ParseResult};

use super::transform;

/// Result of a complete pipeline run
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineOutput {
    /// Aggregated rows in export layout
    pub rows: Vec<ShipmentRow>,

    /// CSV parsing metadata
    pub csv_info: CsvInfo,
}

/// CSV file information
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvInfo {
    pub encoding: String,
    pub delimiter: char,
    pub headers: Vec<String>,
    pub row_count: usize,
}

/// Transform a CSV file.
pub fn transform_csv(path: &Path, options: &TransformOptions) -> PipelineResult<PipelineOutput> {
    log_info(format!("📖 Reading {}", path.display()));
    let parse_result = parse_csv_file_auto(path)?;
    transform_parsed(parse_result, options)
}

/// Transform CSV bytes, e.g. an uploaded file.
pub fn transform_bytes(bytes: &[u8], options: &TransformOptions) -> PipelineResult<PipelineOutput> {
    log_info(format!("📖 Reading upload ({} bytes)", bytes.len()));
    let parse_result = parse_bytes_auto(bytes)?;
    transform_parsed(parse_result, options)
}

/// Transform an already-parsed table.
pub fn transform_table(table: Table, options: &TransformOptions) -> PipelineResult<PipelineOutput> {
    let parse_result = ParseResult {
        table,
        encoding: "utf-8".to_string(),
        delimiter: ',',
    };
    transform_parsed(parse_result, options)
}

fn transform_parsed(
    parse_result: ParseResult,
    options: &TransformOptions,
) -> PipelineResult<PipelineOutput> {
    let ParseResult {
        table,
        encoding,
        delimiter,
    } = parse_result;

    log_success(format!("Detected encoding: {}", encoding));
    log_success(format!("Detected separator: '{}'", format_delimiter(delimiter)));
    log_success(format!("Read {} rows, {} columns", table.len(), table.headers.len()));

    if table.is_empty() {
        log_error("CSV file has no data rows");
        return Err(PipelineError::EmptyInput);
    }

    log_info("⚙️  Reformatting dates and aggregating by Delivery Number + Product ID...");
    let rows = transform(&table, options).map_err(|e| {
        log_error(e.to_string());
        e
    })?;
    log_success(format!(
        "{} input lines → {} shipment rows",
        table.len(),
        rows.len()
    ));

    let dropped = dropped_columns(&table.headers);
    if !dropped.is_empty() {
        log_warning(format!("Dropped columns: {}", dropped.join(", ")));
    }

    Ok(PipelineOutput {
        csv_info: CsvInfo {
            encoding,
            delimiter,
            row_count: table.len(),
            headers: table.headers,
        },
        rows,
    })
}

/// Input columns that do not appear in the export layout.
fn dropped_columns(headers: &[String]) -> Vec<&str> {
    headers
        .iter()
        .map(String::as_str)
        .filter(|h| !h.is_empty() && !REQUIRED_COLUMNS.contains(h))
        .collect()
}

/// Format delimiter for display
fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "TAB".to_string(),
        c => c.to_string(),
    }
}

/// Write rows as comma-separated CSV with the export header and no index
/// column. The header is written even when `rows` is empty.
pub fn write_csv<W: Write>(rows: &[ShipmentRow], writer: W) -> PipelineResult<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    wtr.write_record(OUTPUT_COLUMNS)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush().map_err(|e| PipelineError::Output(e.to_string()))?;

    Ok(())
}

/// Serialize rows to a CSV string.
pub fn to_csv_string(rows: &[ShipmentRow]) -> PipelineResult<String> {
    let mut buffer = Vec::new();
    write_csv(rows, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| PipelineError::Output(e.to_string()))
}
