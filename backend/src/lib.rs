//! # Shipmerge - shipment export reshaping and aggregation
//!
//! Shipmerge reads a shipment export CSV, reformats the planned ship date,
//! moves the carrier into `Shipping Conditions`, sums quantities per
//! (Delivery Number, Product ID) and writes the fixed 16-column layout back
//! out as CSV.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   CSV File  │────▶│   Parser    │────▶│  Transform  │────▶│  CSV Export │
//! │  (ISO/UTF8) │     │  (auto-enc) │     │ (date+group)│     │ (16 columns)│
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use shipmerge::{transform_csv, to_csv_string, TransformOptions};
//! use std::path::Path;
//!
//! let output = transform_csv(Path::new("export.csv"), &TransformOptions::default())?;
//! println!("{}", to_csv_string(&output.rows)?);
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Column names, line items and output rows
//! - [`parser`] - CSV parsing with auto-detection
//! - [`transform`] - Dates, grouping and pipeline
//! - [`config`] - Transform options and server settings
//! - [`api`] - HTTP API server

// Core modules
pub mod config;
pub mod error;
pub mod models;

// Parsing
pub mod parser;

// Transformation
pub mod transform;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports - Errors
// =============================================================================

pub use error::{CsvError, PipelineError, ServerError, TransformError};

// =============================================================================
// Re-exports - Models & config
// =============================================================================

pub use config::{GroupOrder, ServerConfig, TransformOptions};
pub use models::{Quantity, ShipDate, ShipmentLine, ShipmentRow, Table, OUTPUT_COLUMNS, REQUIRED_COLUMNS};

// =============================================================================
// Re-exports - Parsing
// =============================================================================

pub use parser::{
    decode_content, detect_delimiter, detect_encoding, parse_bytes_auto, parse_csv_file_auto,
    parse_table, ParseResult,
};

// =============================================================================
// Re-exports - Transform & pipeline
// =============================================================================

pub use transform::{
    reformat_ship_date, to_csv_string, transform, transform_bytes, transform_csv,
    transform_table, write_csv, CsvInfo, PipelineOutput,
};

// =============================================================================
// Re-exports - API
// =============================================================================

pub use api::types::{error_response, UploadResponse};

// Server
pub mod server {
    pub use crate::api::server::{router, start_server};
}
