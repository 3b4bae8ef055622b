//! HTTP service for uploading shipment CSV files to the backend.

use gloo_net::http::Request;
use web_sys::{File, FormData};

use crate::{AppError, AppResult, ErrorBody, UploadResponse, MAX_FILE_SIZE};

/// Upload a CSV file and return the processed table.
///
/// Transform failures (missing column, bad date, bad quantity) come back as
/// [`AppError::Transform`] carrying the backend's message.
pub async fn upload_csv(file: File, backend_url: &str) -> AppResult<UploadResponse> {
    check_file_size(file.size())?;

    let form_data = FormData::new()
        .map_err(|e| AppError::Upload(format!("Failed to create FormData: {:?}", e)))?;
    form_data
        .append_with_blob("file", &file)
        .map_err(|e| AppError::Upload(format!("Failed to append file: {:?}", e)))?;

    let url = format!("{}/api/upload", backend_url);
    let response = Request::post(&url)
        .body(form_data)
        .map_err(|e| AppError::Network(format!("Failed to build request: {}", e)))?
        .send()
        .await
        .map_err(|e| AppError::Network(format!("HTTP request failed: {}", e)))?;

    if !response.ok() {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        return Err(error_from_body(status, &text));
    }

    response
        .json::<UploadResponse>()
        .await
        .map_err(|e| AppError::Network(format!("Failed to parse response: {}", e)))
}

fn check_file_size(size: f64) -> AppResult<()> {
    if size > MAX_FILE_SIZE as f64 {
        return Err(AppError::Upload(format!(
            "File is {:.1} MB, limit is {} MB",
            size / (1024.0 * 1024.0),
            MAX_FILE_SIZE / (1024 * 1024)
        )));
    }
    Ok(())
}

/// Map a non-2xx response to an error, preferring the backend's message.
fn error_from_body(status: u16, body: &str) -> AppError {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) if status == 422 => AppError::Transform(parsed.error),
        Ok(parsed) => AppError::Network(format!("Server error ({}): {}", status, parsed.error)),
        Err(_) if body.is_empty() => AppError::Network(format!("Server error ({})", status)),
        Err(_) => AppError::Network(format!("Server error ({}): {}", status, body)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_error_from_body() {
        let body = r#"{"jobId":"x","status":"error","error":"Transform error: Missing required column: 'Product ID'","rows":[]}"#;
        let err = error_from_body(422, body);
        assert_eq!(
            err,
            AppError::Transform("Transform error: Missing required column: 'Product ID'".into())
        );
    }

    #[test]
    fn test_other_errors_are_network() {
        assert!(matches!(error_from_body(500, "oops"), AppError::Network(_)));
        assert!(matches!(error_from_body(502, ""), AppError::Network(_)));
    }

    #[test]
    fn test_file_size_limit() {
        assert!(check_file_size(1024.0).is_ok());
        assert!(check_file_size((MAX_FILE_SIZE + 1) as f64).is_err());
    }
}
