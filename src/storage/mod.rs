//! Object storage module
//!
//! One [`StorageLocation`] type serves both the raw input root and the output
//! root, over S3, GCS, Azure or the local filesystem.

mod pattern;
mod location;

pub use pattern::{literal_prefix, GlobFilter};
pub use location::StorageLocation;
