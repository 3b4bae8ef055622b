//! Common types used across the frontend application.
//!
//! # Categories
//!
//! - **Preview Types** - The processed table as shown in the UI
//! - **Log Types** - Real-time log streaming
//! - **API Types** - Backend response structures
//! - **Error Types** - Frontend error handling

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

// =============================================================================
// Preview Types
// =============================================================================

/// The processed table, ready to render.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PreviewTable {
    /// Column names, in export order
    pub columns: Vec<String>,
    /// Cell text, one inner vec per row, aligned with `columns`
    pub rows: Vec<Vec<String>>,
    /// Serialized CSV for download
    pub csv: String,
    /// Suggested download file name
    pub file_name: String,
}

impl PreviewTable {
    /// Build from an upload response. Numbers are rendered as text and
    /// missing cells as empty strings.
    pub fn from_response(response: &UploadResponse) -> Self {
        let rows = response
            .rows
            .iter()
            .map(|row| {
                response
                    .columns
                    .iter()
                    .map(|col| cell_text(row.get(col)))
                    .collect()
            })
            .collect();

        Self {
            columns: response.columns.clone(),
            rows,
            csv: response.csv.clone(),
            file_name: response.file_name.clone(),
        }
    }
}

fn cell_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

// =============================================================================
// Log Types
// =============================================================================

/// Log severity level.
///
/// Matches the backend's log levels for SSE streaming.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl LogLevel {
    /// Get CSS class for styling.
    pub fn css_class(&self) -> &'static str {
        match self {
            LogLevel::Info => "log-info",
            LogLevel::Success => "log-success",
            LogLevel::Warning => "log-warning",
            LogLevel::Error => "log-error",
        }
    }
}

/// A single log entry.
///
/// Received via SSE from `/api/logs`, or added locally by components.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    /// Timestamp string (HH:MM:SS)
    pub timestamp: String,
}

// =============================================================================
// API Response Types
// =============================================================================

/// Response from the backend upload endpoint.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub job_id: String,
    pub status: String,
    pub columns: Vec<String>,
    /// Rows keyed by column name
    pub rows: Vec<serde_json::Map<String, Value>>,
    pub csv: String,
    pub file_name: String,
    pub metadata: ResponseMetadata,
}

/// Metadata about the transformation.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMetadata {
    pub source_file: Option<String>,
    pub total_rows: usize,
    pub csv_info: CsvInfo,
}

/// Input CSV details.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvInfo {
    pub encoding: String,
    pub delimiter: String,
    pub row_count: usize,
    pub columns: Vec<String>,
}

/// Error body returned by the backend on failure.
#[derive(Clone, Debug, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

// =============================================================================
// Error Types
// =============================================================================

/// Frontend application errors.
#[derive(Clone, Debug, PartialEq)]
pub enum AppError {
    /// File rejected before upload.
    Upload(String),
    /// Backend rejected the file (bad columns, dates, quantities).
    Transform(String),
    /// Network/HTTP error.
    Network(String),
    /// Browser download failed.
    Download(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Upload(msg) => write!(f, "Upload error: {}", msg),
            AppError::Transform(msg) => write!(f, "{}", msg),
            AppError::Network(msg) => write!(f, "Network error: {}", msg),
            AppError::Download(msg) => write!(f, "Download error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

/// Result type alias for frontend operations.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_table_from_response() {
        let json = r#"{
            "jobId": "123e4567-e89b-12d3-a456-426614174000",
            "status": "ready",
            "columns": ["Delivery Number", "Quantity", "Carrier"],
            "rows": [
                {"Delivery Number": "D1", "Quantity": 5, "Carrier": ""},
                {"Delivery Number": "D2", "Quantity": 1.5}
            ],
            "csv": "Delivery Number,Quantity,Carrier\nD1,5,\n",
            "fileName": "processed_file.csv",
            "metadata": {
                "sourceFile": "export.csv",
                "totalRows": 2,
                "csvInfo": {"encoding": "utf-8", "delimiter": ",", "rowCount": 3, "columns": []}
            }
        }"#;

        let response: UploadResponse = serde_json::from_str(json).unwrap();
        let table = PreviewTable::from_response(&response);

        assert_eq!(table.columns.len(), 3);
        assert_eq!(table.rows[0], vec!["D1", "5", ""]);
        assert_eq!(table.rows[1], vec!["D2", "1.5", ""]);
        assert_eq!(table.file_name, "processed_file.csv");
    }

    #[test]
    fn test_transform_error_display_is_bare() {
        let err = AppError::Transform("Missing required column: 'Product ID'".into());
        assert_eq!(err.to_string(), "Missing required column: 'Product ID'");
    }
}
