//! UI Components for the Shipmerge application.
//!
//! # Layout Components
//! - [`Hero`] - Main title and description
//! - [`Footer`] - Page footer
//!
//! # Feature Components
//! - [`UploadSection`] - CSV file upload
//! - [`PreviewSection`] - Processed table with download button
//! - [`LogsPanel`] - Real-time processing logs (SSE)

mod footer;
mod hero;
mod logs;
mod preview;
mod upload;

pub use footer::*;
pub use hero::*;
pub use logs::*;
pub use preview::*;
pub use upload::*;
