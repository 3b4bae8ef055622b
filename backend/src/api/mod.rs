//! HTTP API module.
//!
//! Upload/preview/download endpoints and the processing-log stream used by
//! the browser frontend.

pub mod logs;
pub mod server;
pub mod types;

pub use logs::*;
pub use server::{router, start_server};
pub use types::*;
