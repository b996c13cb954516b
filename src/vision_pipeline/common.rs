//! Common utilities module
//!
//! This module contains shared utilities used across the vision pipeline.

pub mod error;

pub use error::{PipelineError, Result};
