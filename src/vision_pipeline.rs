//! Camera vision pipeline module
//!
//! This module turns compressed camera frames into a centered cutout that a
//! classifier samples on demand, with separate modules for capture, block
//! decoding, crop placement, raster storage, and sampling.

pub mod capture;
pub mod classify;
pub mod color;
pub mod common;
pub mod config;
pub mod crop;
pub mod cutout;
pub mod decode;
pub mod pipeline;
pub mod raster;
pub mod sampling;
pub mod snapshot;
pub mod timing;


pub use common::{
    PipelineError,
    Result,
};

pub use capture::{
    CaptureSource,
    FileCaptureSource,
};

pub use decode::{
    BlockDecoder,
    BlockLayout,
    BlockStream,
    CodedBlock,
    ImageBlockDecoder,
};

pub use crop::CropPlacement;
pub use cutout::CutoutWindow;
pub use raster::{DecodeReport, FrameState, RasterStore};
pub use sampling::{CutoutSampler, SignalSource};

pub use classify::{
    ClassificationResult,
    Classifier,
    Prediction,
};
#[cfg(feature = "onnx")]
pub use classify::OnnxClassifier;

pub use config::{
    PipelineConfig,
    PipelineConfigBuilder,
    SnapshotCompression,
};

pub use snapshot::{
    SnapshotWriter,
    TiffSnapshotWriter,
};

pub use pipeline::{
    CameraPipeline,
    CycleReport,
};
