//! Frame capture module
//!
//! This module defines the camera contract the pipeline pulls compressed
//! frames from, and a file-backed source for running without hardware.

mod source;
mod file_source;

pub use source::CaptureSource;
pub use file_source::FileCaptureSource;
