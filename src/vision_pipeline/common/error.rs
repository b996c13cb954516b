use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Capture did not complete within {0:?}")]
    CaptureTimeout(Duration),

    #[error("Capture source error: {0}")]
    Capture(String),

    #[error("Transfer buffer too small: frame is {required} bytes, buffer holds {capacity}")]
    TransferBufferTooSmall { required: usize, capacity: usize },

    #[error("Failed to decode frame: {0}")]
    DecodeCorrupt(String),

    #[error("Crop misconfigured: {0}")]
    CropMisconfigured(String),

    #[error("Sample range {offset}..{offset}+{len} exceeds cutout of {total} elements")]
    OutOfRange { offset: usize, len: usize, total: usize },

    #[error("No decoded frame available for sampling")]
    FrameNotReady,

    #[error("Classifier error: {0}")]
    Classifier(String),

    #[error("Failed to encode snapshot: {0}")]
    EncodeError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl PipelineError {
    /// Whether the error only invalidates the current capture cycle.
    ///
    /// Recoverable errors mean "skip this frame and try the next one". A crop
    /// that keeps no blocks of one captured frame is recoverable too; a bad
    /// static configuration is already rejected when the pipeline is built.
    /// The rest point at programming mistakes.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            PipelineError::CaptureTimeout(_)
                | PipelineError::Capture(_)
                | PipelineError::TransferBufferTooSmall { .. }
                | PipelineError::DecodeCorrupt(_)
                | PipelineError::CropMisconfigured(_)
                | PipelineError::FrameNotReady
                | PipelineError::Classifier(_)
                | PipelineError::IoError(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
