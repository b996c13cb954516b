//! On-demand cutout sampling for the classifier
//!
//! Nothing is materialized here: each requested element is translated,
//! read from the raster, and color-converted at call time.

use crate::vision_pipeline::color::wire_to_sample;
use crate::vision_pipeline::common::error::{PipelineError, Result};
use crate::vision_pipeline::cutout::CutoutWindow;
use crate::vision_pipeline::raster::RasterStore;

/// A source of classifier input elements addressed by flat offset.
pub trait SignalSource {
    /// Number of elements in the signal.
    fn total_len(&self) -> usize;

    /// Fills `out` with the elements at `offset .. offset + out.len()`.
    fn get_data(&self, offset: usize, out: &mut [f32]) -> Result<()>;
}

/// Samples the centered cutout of a decoded raster.
///
/// Holds a shared borrow of the raster, so no decode can run while a sampler
/// is alive.
#[derive(Debug, Clone, Copy)]
pub struct CutoutSampler<'a> {
    raster: &'a RasterStore,
    window: CutoutWindow,
}

impl<'a> CutoutSampler<'a> {
    pub fn new(raster: &'a RasterStore, window: CutoutWindow) -> Result<Self> {
        if raster.width() != window.frame_width() || raster.height() != window.frame_height() {
            return Err(PipelineError::CropMisconfigured(format!(
                "cutout window expects a {}x{} frame, raster is {}x{}",
                window.frame_width(),
                window.frame_height(),
                raster.width(),
                raster.height()
            )));
        }
        if !raster.is_ready() {
            return Err(PipelineError::FrameNotReady);
        }
        Ok(Self { raster, window })
    }

    pub fn window(&self) -> &CutoutWindow {
        &self.window
    }

    /// Raw wire-order sample at a virtual offset.
    pub fn raw(&self, offset: usize) -> Option<u16> {
        if offset >= self.window.len() {
            return None;
        }
        let (row, col) = self.window.translate(offset);
        Some(self.raster.pixel(row, col))
    }
}

impl SignalSource for CutoutSampler<'_> {
    fn total_len(&self) -> usize {
        self.window.len()
    }

    fn get_data(&self, offset: usize, out: &mut [f32]) -> Result<()> {
        let total = self.window.len();
        match offset.checked_add(out.len()) {
            Some(end) if end <= total => {}
            _ => {
                return Err(PipelineError::OutOfRange {
                    offset,
                    len: out.len(),
                    total,
                });
            }
        }

        for (i, slot) in out.iter_mut().enumerate() {
            let (row, col) = self.window.translate(offset + i);
            *slot = wire_to_sample(self.raster.pixel(row, col));
        }
        Ok(())
    }
}
