//! Backend and browser services.
//!
//! - [`upload`] - CSV upload to the shipmerge backend
//! - [`download`] - Save the processed CSV through a Blob URL

pub mod download;
pub mod upload;

pub use download::*;
pub use upload::*;
