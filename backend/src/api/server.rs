//! HTTP Server for the shipmerge API.
//!
//! # API Endpoints
//!
//! | Method | Path              | Description                                   |
//! |--------|-------------------|-----------------------------------------------|
//! | GET    | `/health`         | Health check                                  |
//! | POST   | `/api/upload`     | Upload CSV, get preview rows + processed CSV  |
//! | POST   | `/api/download`   | Upload CSV, get the processed CSV as a file   |
//! | GET    | `/api/logs`       | SSE stream for real-time logs                 |
//!
//! Both POST endpoints take a multipart form with a `file` field and an
//! optional `order` field (`sorted` or `firstSeen`).

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::{header, Method, StatusCode},
    response::{sse::Event, IntoResponse, Json, Response, Sse},
    routing::{get, post},
    Router,
};
use futures::stream::Stream;
use serde_json::{json, Value};
use std::{convert::Infallible, net::SocketAddr, sync::Arc, time::Duration};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;
use tower_http::cors::CorsLayer;

use super::logs::{log_error, log_info, LOG_BROADCASTER};
use super::types::{error_response, UploadResponse};
use crate::config::{GroupOrder, ServerConfig, TransformOptions};
use crate::error::{PipelineError, ServerError, ServerResult};
use crate::transform::pipeline::{to_csv_string, transform_bytes, PipelineOutput};

/// Room for multipart boundaries and the small form fields.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

#[derive(Clone)]
struct AppState {
    config: Arc<ServerConfig>,
}

/// A parsed upload form.
struct Upload {
    file_name: Option<String>,
    bytes: Vec<u8>,
    options: TransformOptions,
}

/// Build the application router.
pub fn router(config: ServerConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_TYPE, header::CONTENT_DISPOSITION]);

    let body_limit = config.max_upload_bytes.saturating_add(MULTIPART_OVERHEAD);
    let state = AppState {
        config: Arc::new(config),
    };

    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/api/upload", post(upload_csv))
        .route("/api/download", post(download_csv))
        .route("/api/logs", get(sse_logs))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server
pub async fn start_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let app = router(config.clone());

    println!("🚀 Shipmerge server running on http://localhost:{}", config.port);
    println!("   POST /api/upload   - Upload CSV, preview result");
    println!("   POST /api/download - Upload CSV, download {}", config.download_name);
    println!("   GET  /api/logs     - SSE log stream");
    println!("   GET  /health       - Health check");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "shipmerge",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "upload": "POST /api/upload",
            "download": "POST /api/download",
            "logs": "GET /api/logs (SSE)"
        }
    }))
}

/// SSE endpoint for real-time log streaming
async fn sse_logs() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = LOG_BROADCASTER.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(entry) => {
            let json = serde_json::to_string(&entry).ok()?;
            Some(Ok(Event::default().data(json)))
        }
        // Lagged receiver, skip
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

/// Upload CSV endpoint: preview rows plus the processed CSV.
async fn upload_csv(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ServerResult<Json<UploadResponse>> {
    let upload = read_upload(multipart, state.config.max_upload_bytes).await?;
    let file_name = upload.file_name.clone();
    let output = run_transform(upload).await?;

    let response = UploadResponse::build(output, file_name, &state.config.download_name)?;
    Ok(Json(response))
}

/// Download endpoint: the processed CSV as an attachment.
async fn download_csv(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ServerResult<Response> {
    let upload = read_upload(multipart, state.config.max_upload_bytes).await?;
    let output = run_transform(upload).await?;
    let csv = to_csv_string(&output.rows)?;

    let headers = [
        (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
        (
            header::CONTENT_DISPOSITION,
            content_disposition(&state.config.download_name),
        ),
    ];
    Ok((headers, csv).into_response())
}

async fn read_upload(mut multipart: Multipart, limit: usize) -> ServerResult<Upload> {
    let mut file_data: Option<Vec<u8>> = None;
    let mut file_name: Option<String> = None;
    let mut options = TransformOptions::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::BadRequest(format!("Multipart error: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "file" => {
                file_name = field.file_name().map(|s| s.to_string());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ServerError::BadRequest(format!("Read error: {}", e)))?;
                file_data = Some(bytes.to_vec());
            }
            "order" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ServerError::BadRequest(format!("Read error: {}", e)))?;
                options.group_order = parse_group_order(&value)?;
            }
            _ => {}
        }
    }

    let bytes = file_data.ok_or_else(|| ServerError::BadRequest("No file provided".into()))?;
    if bytes.len() > limit {
        return Err(ServerError::TooLarge {
            size: bytes.len(),
            limit,
        });
    }

    log_info(format!(
        "📄 New upload: {} ({} bytes)",
        file_name.as_deref().unwrap_or("unknown"),
        bytes.len()
    ));

    Ok(Upload {
        file_name,
        bytes,
        options,
    })
}

async fn run_transform(upload: Upload) -> ServerResult<PipelineOutput> {
    let Upload { bytes, options, .. } = upload;

    let output = tokio::task::spawn_blocking(move || transform_bytes(&bytes, &options))
        .await
        .map_err(|e| ServerError::Internal(e.to_string()))??;

    Ok(output)
}

fn parse_group_order(value: &str) -> ServerResult<GroupOrder> {
    match value.trim() {
        "" => Ok(GroupOrder::default()),
        "firstSeen" | "first-seen" => Ok(GroupOrder::FirstSeen),
        "sorted" => Ok(GroupOrder::Sorted),
        other => Err(ServerError::BadRequest(format!("Unknown order '{}'", other))),
    }
}

fn content_disposition(file_name: &str) -> String {
    format!("attachment; filename=\"{}\"", file_name.replace('"', ""))
}

impl ServerError {
    fn status(&self) -> StatusCode {
        match self {
            ServerError::Pipeline(PipelineError::Output(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ServerError::Pipeline(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        log_error(format!("Request failed: {}", message));
        (self.status(), Json(error_response(&message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransformError;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    #[test]
    fn test_status_mapping() {
        let missing: ServerError =
            PipelineError::from(TransformError::MissingColumn("Carrier".into())).into();
        assert_eq!(missing.status(), StatusCode::UNPROCESSABLE_ENTITY);

        assert_eq!(
            ServerError::from(PipelineError::EmptyInput).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ServerError::BadRequest("No file provided".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServerError::TooLarge { size: 10, limit: 5 }.status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
    }

    #[test]
    fn test_parse_group_order() {
        assert_eq!(parse_group_order("sorted").unwrap(), GroupOrder::Sorted);
        assert_eq!(parse_group_order("").unwrap(), GroupOrder::Sorted);
        assert_eq!(parse_group_order("firstSeen").unwrap(), GroupOrder::FirstSeen);
        assert!(parse_group_order("random").is_err());
    }

    #[test]
    fn test_content_disposition() {
        assert_eq!(
            content_disposition("processed_file.csv"),
            "attachment; filename=\"processed_file.csv\""
        );
    }

    const BOUNDARY: &str = "shipmerge-test-boundary";

    const INPUT: &str = "Delivery Number,Company Name/Contact Name,Address 1,Address 2,Address 3,City,State,Postal Code,Country,Product ID,Quantity,Sales Order,Delivery Instructions,Carrier,Planned Ship Date\n\
                         D1,Acme,1 Main St,,,Austin,TX,78701,US,P1,3,SO1,,UPS,20240101\n\
                         D1,Acme,1 Main St,,,Austin,TX,78701,US,P1,2,SO1,,FedEx,20240101\n";

    fn form(file: Option<&str>, order: Option<&str>) -> String {
        let mut body = String::new();
        if let Some(order) = order {
            body.push_str(&format!(
                "--{}\r\nContent-Disposition: form-data; name=\"order\"\r\n\r\n{}\r\n",
                BOUNDARY, order
            ));
        }
        if let Some(file) = file {
            body.push_str(&format!(
                "--{}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"export.csv\"\r\nContent-Type: text/csv\r\n\r\n{}\r\n",
                BOUNDARY, file
            ));
        }
        body.push_str(&format!("--{}--\r\n", BOUNDARY));
        body
    }

    async fn post(config: ServerConfig, path: &str, body: String) -> Response {
        let request = Request::builder()
            .method(Method::POST)
            .uri(path)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap();

        router(config).oneshot(request).await.unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_upload_returns_table_and_csv() {
        let response = post(ServerConfig::default(), "/api/upload", form(Some(INPUT), None)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["status"], "ready");
        assert_eq!(json["columns"].as_array().unwrap().len(), 16);
        assert_eq!(json["rows"][0]["Quantity"], 5);
        assert_eq!(json["fileName"], "processed_file.csv");
        assert_eq!(json["metadata"]["sourceFile"], "export.csv");
    }

    #[tokio::test]
    async fn test_upload_without_file_is_bad_request() {
        let response = post(ServerConfig::default(), "/api/upload", form(None, Some("sorted"))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_order_is_bad_request() {
        let response = post(
            ServerConfig::default(),
            "/api/upload",
            form(Some(INPUT), Some("random")),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_upload_over_limit_is_too_large() {
        let config = ServerConfig {
            max_upload_bytes: 16,
            ..ServerConfig::default()
        };
        let response = post(config, "/api/upload", form(Some(INPUT), None)).await;
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_transform_failure_is_unprocessable_without_csv() {
        let bad = INPUT.replace(",Product ID", "").replace(",P1,", ",");
        let response = post(ServerConfig::default(), "/api/upload", form(Some(&bad), None)).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let json = body_json(response).await;
        assert_eq!(json["status"], "error");
        assert!(json["error"].as_str().unwrap().contains("Product ID"));
        assert!(json["rows"].as_array().unwrap().is_empty());
        assert!(json.get("csv").is_none());
    }

    #[tokio::test]
    async fn test_download_is_csv_attachment() {
        let response = post(ServerConfig::default(), "/api/download", form(Some(INPUT), None)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"processed_file.csv\""
        );
        assert!(response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/csv"));

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let csv = String::from_utf8(bytes.to_vec()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Delivery Number,"));
        assert!(lines[1].ends_with(",5,SO1,UPS,,,01/01/2024"));
    }

    #[tokio::test]
    async fn test_transform_error_surfaces_before_output() {
        let upload = Upload {
            file_name: None,
            bytes: b"Delivery Number,Quantity\nD1,3\n".to_vec(),
            options: TransformOptions::default(),
        };

        match run_transform(upload).await {
            Err(ServerError::Pipeline(PipelineError::Transform(TransformError::MissingColumn(col)))) => {
                assert_eq!(col, "Company Name/Contact Name")
            }
            Err(other) => panic!("unexpected error: {}", other),
            Ok(_) => panic!("expected an error"),
        }
    }
}
