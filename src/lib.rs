//! Centered-cutout vision pipeline for camera classifiers.

pub mod logger;
pub mod vision_pipeline;
