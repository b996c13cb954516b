//! Cutout snapshot module
//!
//! This module writes the current cutout to an image file so the classifier's
//! view of a frame can be inspected or collected as training data.

mod writer;
mod tiff_snapshot;

pub use writer::SnapshotWriter;
pub use tiff_snapshot::TiffSnapshotWriter;
