//! Classification module
//!
//! This module defines the contract for classifiers that consume a cutout
//! through [`SignalSource`](crate::vision_pipeline::sampling::SignalSource).

mod classifier;
#[cfg(feature = "onnx")]
mod onnx_classifier;

pub use classifier::{
    ClassificationResult, Classifier, DEFAULT_CHUNK_LEN, InferenceTiming, Prediction, read_signal,
};
#[cfg(feature = "onnx")]
pub use onnx_classifier::OnnxClassifier;
