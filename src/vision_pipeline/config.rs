//! Pipeline configuration types

use std::time::Duration;

use crate::vision_pipeline::common::error::{PipelineError, Result};

/// TIFF compression methods for cutout snapshots
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotCompression {
    /// No compression (fastest, largest file)
    None,
    /// LZW compression
    Lzw,
    /// Deflate compression, balanced level
    Deflate,
}

/// Configuration for the capture/decode/sample pipeline
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Raster width; also the crop target handed to the block decoder
    pub frame_width: usize,
    /// Raster height
    pub frame_height: usize,
    /// Width of the classifier input cutout
    pub cutout_width: usize,
    /// Height of the classifier input cutout
    pub cutout_height: usize,
    /// Capacity of the compressed-frame transfer buffer in bytes
    pub transfer_buffer_len: usize,
    /// How long to wait for the camera to finish a capture
    pub capture_timeout: Duration,
    /// Delay between capture-complete polls
    pub poll_interval: Duration,
    /// Compression used when writing cutout snapshots
    pub snapshot_compression: SnapshotCompression,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            frame_width: 96,
            frame_height: 96,
            cutout_width: 96,
            cutout_height: 96,
            transfer_buffer_len: 4096,
            capture_timeout: Duration::from_secs(5),
            poll_interval: Duration::from_millis(10),
            snapshot_compression: SnapshotCompression::None,
        }
    }
}

impl PipelineConfig {
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }

    /// Checks the geometry that can be verified without a decoded frame.
    pub fn validate(&self) -> Result<()> {
        if self.frame_width == 0 || self.frame_height == 0 {
            return Err(PipelineError::CropMisconfigured(format!(
                "frame {}x{} is empty",
                self.frame_width, self.frame_height
            )));
        }
        if self.cutout_width == 0 || self.cutout_height == 0 {
            return Err(PipelineError::CropMisconfigured(format!(
                "cutout {}x{} is empty",
                self.cutout_width, self.cutout_height
            )));
        }
        if self.cutout_width > self.frame_width || self.cutout_height > self.frame_height {
            return Err(PipelineError::CropMisconfigured(format!(
                "cutout {}x{} exceeds frame {}x{}",
                self.cutout_width, self.cutout_height, self.frame_width, self.frame_height
            )));
        }
        if self.transfer_buffer_len == 0 {
            return Err(PipelineError::CropMisconfigured(
                "transfer buffer length is zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Number of elements the classifier will request.
    pub fn cutout_len(&self) -> usize {
        self.cutout_width * self.cutout_height
    }
}

/// Builder for PipelineConfig
#[derive(Default)]
pub struct PipelineConfigBuilder {
    frame_size: Option<(usize, usize)>,
    cutout_size: Option<(usize, usize)>,
    transfer_buffer_len: Option<usize>,
    capture_timeout: Option<Duration>,
    poll_interval: Option<Duration>,
    snapshot_compression: Option<SnapshotCompression>,
}

impl PipelineConfigBuilder {
    pub fn frame_size(mut self, width: usize, height: usize) -> Self {
        self.frame_size = Some((width, height));
        self
    }

    pub fn cutout_size(mut self, width: usize, height: usize) -> Self {
        self.cutout_size = Some((width, height));
        self
    }

    pub fn transfer_buffer_len(mut self, len: usize) -> Self {
        self.transfer_buffer_len = Some(len);
        self
    }

    pub fn capture_timeout(mut self, timeout: Duration) -> Self {
        self.capture_timeout = Some(timeout);
        self
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = Some(interval);
        self
    }

    pub fn snapshot_compression(mut self, compression: SnapshotCompression) -> Self {
        self.snapshot_compression = Some(compression);
        self
    }

    pub fn build(self) -> PipelineConfig {
        let default = PipelineConfig::default();
        let (frame_width, frame_height) = self
            .frame_size
            .unwrap_or((default.frame_width, default.frame_height));
        let (cutout_width, cutout_height) = self
            .cutout_size
            .unwrap_or((default.cutout_width, default.cutout_height));
        PipelineConfig {
            frame_width,
            frame_height,
            cutout_width,
            cutout_height,
            transfer_buffer_len: self.transfer_buffer_len.unwrap_or(default.transfer_buffer_len),
            capture_timeout: self.capture_timeout.unwrap_or(default.capture_timeout),
            poll_interval: self.poll_interval.unwrap_or(default.poll_interval),
            snapshot_compression: self
                .snapshot_compression
                .unwrap_or(default.snapshot_compression),
        }
    }
}
