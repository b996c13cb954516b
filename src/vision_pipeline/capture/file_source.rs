//! Capture source that replays still images from disk.
//!
//! Each capture loads the next file in order and wraps around at the end, so
//! a directory of frames behaves like a camera pointed at a looping scene.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::vision_pipeline::capture::source::CaptureSource;
use crate::vision_pipeline::common::error::{PipelineError, Result};

const FRAME_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

#[derive(Debug)]
pub struct FileCaptureSource {
    frames: Vec<PathBuf>,
    next: usize,
    pending: Option<Vec<u8>>,
}

impl FileCaptureSource {
    /// Replays the given files in order.
    pub fn new(frames: Vec<PathBuf>) -> Result<Self> {
        if frames.is_empty() {
            return Err(PipelineError::Capture("no frames to replay".to_string()));
        }
        Ok(Self {
            frames,
            next: 0,
            pending: None,
        })
    }

    /// Replays a single file, or every image file of a directory sorted by name.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_dir() {
            return Self::new(vec![path.to_path_buf()]);
        }

        let mut frames = Vec::new();
        for entry in std::fs::read_dir(path)? {
            let entry_path = entry?.path();
            let is_frame = entry_path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| {
                    FRAME_EXTENSIONS
                        .iter()
                        .any(|known| ext.eq_ignore_ascii_case(known))
                });
            if is_frame {
                frames.push(entry_path);
            }
        }
        frames.sort();

        debug!("Found {} frames in {}", frames.len(), path.display());
        Self::new(frames)
    }

    pub fn frames(&self) -> &[PathBuf] {
        &self.frames
    }
}

impl CaptureSource for FileCaptureSource {
    fn start_capture(&mut self) -> Result<()> {
        let path = &self.frames[self.next];
        self.next = (self.next + 1) % self.frames.len();

        self.pending = None;
        let data = std::fs::read(path)
            .map_err(|e| PipelineError::Capture(format!("{}: {}", path.display(), e)))?;
        debug!("Loaded frame {} ({} bytes)", path.display(), data.len());
        self.pending = Some(data);
        Ok(())
    }

    fn capture_done(&mut self) -> Result<bool> {
        Ok(self.pending.is_some())
    }

    fn frame_len(&mut self) -> Result<usize> {
        self.pending
            .as_ref()
            .map(Vec::len)
            .ok_or_else(|| PipelineError::Capture("no completed capture".to_string()))
    }

    fn read_frame(&mut self, buf: &mut [u8]) -> Result<()> {
        let data = self
            .pending
            .as_ref()
            .ok_or_else(|| PipelineError::Capture("no completed capture".to_string()))?;
        buf.copy_from_slice(&data[..buf.len()]);
        Ok(())
    }
}
