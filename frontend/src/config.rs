//! Application configuration.
//!
//! Hardcoded for local development; the backend reads its own settings from
//! the environment.

/// Backend API base URL.
pub const BACKEND_URL: &str = "http://localhost:3000";

/// Application name shown in the page title.
pub const APP_NAME: &str = "Shipmerge";

/// Maximum file size accepted before upload (in bytes).
///
/// 50 MB limit, same as the backend default.
pub const MAX_FILE_SIZE: usize = 50 * 1024 * 1024;

/// Maximum logs to keep in memory.
pub const MAX_LOG_ENTRIES: usize = 100;

/// File name used when the backend does not suggest one.
pub const DEFAULT_DOWNLOAD_NAME: &str = "processed_file.csv";
