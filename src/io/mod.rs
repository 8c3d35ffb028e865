//! IO modules - external system interfaces
//!
//! This module contains all external IO operations:
//! - `snapshot` - HTTP snapshot source for the device's /gates endpoint

pub mod snapshot;

// Re-export commonly used types
pub use snapshot::{HttpSnapshotSource, SnapshotSource};
