//! REST API types for frontend integration.
//!
//! The upload response carries both the preview rows and the serialized CSV,
//! so the browser can show the table and offer the download without a second
//! round trip.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::PipelineResult;
use crate::models::{ShipmentRow, OUTPUT_COLUMNS};
use crate::transform::pipeline::{to_csv_string, PipelineOutput};

/// Response sent to the frontend after a successful upload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    /// Unique job identifier
    pub job_id: String,

    /// Always "ready" on success
    pub status: String,

    /// Output column names, in order
    pub columns: Vec<String>,

    /// Aggregated rows, keyed by output column name
    pub rows: Vec<ShipmentRow>,

    /// Serialized CSV, ready to download
    pub csv: String,

    /// Suggested download file name
    pub file_name: String,

    pub metadata: ResponseMetadata,
}

/// Metadata about the transformation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMetadata {
    /// Name of the uploaded file, if the client sent one
    pub source_file: Option<String>,
    /// Number of aggregated rows
    pub total_rows: usize,
    pub csv_info: CsvMetadata,
}

/// CSV file metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvMetadata {
    pub encoding: String,
    pub delimiter: String,
    pub row_count: usize,
    pub columns: Vec<String>,
}

impl UploadResponse {
    /// Build the response, serializing the rows to CSV.
    pub fn build(
        output: PipelineOutput,
        source_file: Option<String>,
        file_name: &str,
    ) -> PipelineResult<Self> {
        let csv = to_csv_string(&output.rows)?;
        let total_rows = output.rows.len();

        Ok(UploadResponse {
            job_id: Uuid::new_v4().to_string(),
            status: "ready".to_string(),
            columns: OUTPUT_COLUMNS.iter().map(|c| c.to_string()).collect(),
            rows: output.rows,
            csv,
            file_name: file_name.to_string(),
            metadata: ResponseMetadata {
                source_file,
                total_rows,
                csv_info: CsvMetadata {
                    encoding: output.csv_info.encoding,
                    delimiter: output.csv_info.delimiter.to_string(),
                    row_count: output.csv_info.row_count,
                    columns: output.csv_info.headers,
                },
            },
        })
    }
}

/// Create an error response. Carries no rows and no CSV.
pub fn error_response(error: &str) -> Value {
    json!({
        "jobId": Uuid::new_v4().to_string(),
        "status": "error",
        "error": error,
        "columns": [],
        "rows": [],
        "metadata": {
            "totalRows": 0
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TransformOptions;
    use crate::transform::pipeline::transform_bytes;

    const INPUT: &str = "Delivery Number,Company Name/Contact Name,Address 1,Address 2,Address 3,City,State,Postal Code,Country,Product ID,Quantity,Sales Order,Delivery Instructions,Carrier,Planned Ship Date\n\
                         D1,Acme,1 Main St,,,Austin,TX,78701,US,P1,3,SO1,,UPS,20240101\n\
                         D1,Acme,1 Main St,,,Austin,TX,78701,US,P1,2,SO1,,FedEx,20240101\n";

    #[test]
    fn test_upload_response_shape() {
        let output = transform_bytes(INPUT.as_bytes(), &TransformOptions::default()).unwrap();
        let response =
            UploadResponse::build(output, Some("export.csv".into()), "processed_file.csv").unwrap();

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], "ready");
        assert_eq!(json["fileName"], "processed_file.csv");
        assert_eq!(json["columns"].as_array().unwrap().len(), 16);
        assert_eq!(json["rows"][0]["Quantity"], 5);
        assert_eq!(json["rows"][0]["Carrier"], "");
        assert_eq!(json["rows"][0]["Shipping Conditions"], "UPS");
        assert_eq!(json["metadata"]["totalRows"], 1);
        assert_eq!(json["metadata"]["sourceFile"], "export.csv");
        assert_eq!(json["metadata"]["csvInfo"]["rowCount"], 2);
        assert!(json["csv"].as_str().unwrap().starts_with("Delivery Number,"));
    }

    #[test]
    fn test_error_response_has_no_rows() {
        let json = error_response("Missing required column: 'Product ID'");
        assert_eq!(json["status"], "error");
        assert!(json["rows"].as_array().unwrap().is_empty());
        assert!(json.get("csv").is_none());
    }
}
