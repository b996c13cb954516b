//! Centered cutout window and its virtual address space
//!
//! The classifier addresses the cutout as a flat row-major index space of
//! `width * height` elements. [`CutoutWindow::translate`] maps those offsets
//! back onto absolute raster coordinates.

use crate::vision_pipeline::common::error::{PipelineError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CutoutWindow {
    frame_width: usize,
    frame_height: usize,
    width: usize,
    height: usize,
    row_start: usize,
    col_start: usize,
}

impl CutoutWindow {
    /// Centers a `width x height` cutout in a `frame_width x frame_height` raster.
    ///
    /// Offsets use truncating division, so an odd margin puts the extra pixel
    /// on the trailing side.
    pub fn new(
        frame_width: usize,
        frame_height: usize,
        width: usize,
        height: usize,
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(PipelineError::CropMisconfigured(format!(
                "cutout {}x{} is empty",
                width, height
            )));
        }
        if width > frame_width || height > frame_height {
            return Err(PipelineError::CropMisconfigured(format!(
                "cutout {}x{} exceeds frame {}x{}",
                width, height, frame_width, frame_height
            )));
        }

        Ok(Self {
            frame_width,
            frame_height,
            width,
            height,
            row_start: (frame_height - height) / 2,
            col_start: (frame_width - width) / 2,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn frame_width(&self) -> usize {
        self.frame_width
    }

    pub fn frame_height(&self) -> usize {
        self.frame_height
    }

    pub fn row_start(&self) -> usize {
        self.row_start
    }

    pub fn col_start(&self) -> usize {
        self.col_start
    }

    /// Size of the virtual address space.
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Raster `(row, col)` of a virtual offset. Offsets must be below [`len`](Self::len).
    #[inline]
    pub fn translate(&self, offset: usize) -> (usize, usize) {
        let cutout_row = offset / self.width;
        let cutout_col = offset - cutout_row * self.width;
        (cutout_row + self.row_start, cutout_col + self.col_start)
    }

    /// Virtual offset of a raster cell, or `None` if it lies outside the window.
    pub fn linearize(&self, row: usize, col: usize) -> Option<usize> {
        let cutout_row = row.checked_sub(self.row_start).filter(|&r| r < self.height)?;
        let cutout_col = col.checked_sub(self.col_start).filter(|&c| c < self.width)?;
        Some(cutout_row * self.width + cutout_col)
    }
}
