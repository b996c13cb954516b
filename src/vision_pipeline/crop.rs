//! Block-aligned center crop placement
//!
//! Decides, per coded block, whether it lands inside the centered crop and
//! where its pixels go in the output raster. Only whole blocks are kept, so a
//! target that is not a multiple of the block size yields a smaller crop.

use crate::vision_pipeline::common::error::{PipelineError, Result};
use crate::vision_pipeline::decode::BlockLayout;

/// Keep/skip window along one axis of the block grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisPlacement {
    /// Blocks kept on this axis
    pub keep: usize,
    /// Index of the first kept block
    pub skip_start: usize,
    /// Index one past the last kept block
    pub skip_end: usize,
}

impl AxisPlacement {
    pub fn new(total_blocks: usize, block_dim: usize, target: usize) -> Self {
        let keep = match target.checked_div(block_dim) {
            Some(keep) if keep <= total_blocks => keep,
            // Block larger than the target, zero block size, or target larger than the source
            _ => 0,
        };
        let discard = total_blocks - keep;
        let skip_start = if keep == 0 { 0 } else { discard / 2 };

        Self {
            keep,
            skip_start,
            skip_end: skip_start + keep,
        }
    }

    #[inline]
    pub fn contains(&self, index: usize) -> bool {
        index >= self.skip_start && index < self.skip_end
    }
}

/// Where the kept blocks of a decode session go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropPlacement {
    pub x: AxisPlacement,
    pub y: AxisPlacement,
    pub block_width: usize,
    pub block_height: usize,
}

impl CropPlacement {
    pub fn new(layout: &BlockLayout, target_width: usize, target_height: usize) -> Self {
        Self {
            x: AxisPlacement::new(layout.blocks_per_row, layout.block_width, target_width),
            y: AxisPlacement::new(layout.blocks_per_col, layout.block_height, target_height),
            block_width: layout.block_width,
            block_height: layout.block_height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.x.keep == 0 || self.y.keep == 0
    }

    /// Rejects placements that would keep nothing.
    pub fn validate(&self) -> Result<()> {
        if self.is_empty() {
            return Err(PipelineError::CropMisconfigured(format!(
                "no blocks kept (keep {}x{} blocks of {}x{})",
                self.x.keep, self.y.keep, self.block_width, self.block_height
            )));
        }
        Ok(())
    }

    pub fn kept_blocks(&self) -> usize {
        self.x.keep * self.y.keep
    }

    /// Width of the area actually written, in pixels.
    pub fn output_width(&self) -> usize {
        self.x.keep * self.block_width
    }

    /// Height of the area actually written, in pixels.
    pub fn output_height(&self) -> usize {
        self.y.keep * self.block_height
    }

    /// Pixel origin `(x, y)` of block `(row, col)` in the output, or `None` if skipped.
    pub fn place(&self, row: usize, col: usize) -> Option<(usize, usize)> {
        if !self.x.contains(col) || !self.y.contains(row) {
            return None;
        }
        let relative_col = col - self.x.skip_start;
        let relative_row = row - self.y.skip_start;
        Some((relative_col * self.block_width, relative_row * self.block_height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn layout(blocks_per_row: usize, blocks_per_col: usize) -> BlockLayout {
        BlockLayout {
            blocks_per_row,
            blocks_per_col,
            block_width: 16,
            block_height: 8,
        }
    }

    #[test]
    fn test_centering_for_all_small_grids() {
        for total in 0..20 {
            for keep in 0..=total {
                let axis = AxisPlacement::new(total, 4, keep * 4);
                assert_eq!(axis.keep, keep);
                assert!(axis.skip_start + axis.keep <= total);
                if keep > 0 {
                    assert_eq!(axis.skip_start, (total - keep) / 2);
                }
            }
        }
    }

    #[test]
    fn test_odd_discard_trails() {
        let axis = AxisPlacement::new(6, 16, 48);
        assert_eq!(axis, AxisPlacement { keep: 3, skip_start: 1, skip_end: 4 });
    }

    #[test]
    fn test_reference_scenario() {
        // 96x96 source of 16x8 blocks cropped to 48x48
        let placement = CropPlacement::new(&layout(6, 12), 48, 48);

        assert_eq!(placement.x.keep, 3);
        assert_eq!(placement.y.keep, 6);
        assert_eq!(placement.x.skip_start, 1);
        assert_eq!(placement.y.skip_start, 3);

        // Source column block 1 starts at pixel 16 and lands at output column 0
        assert_eq!(placement.place(3, 1), Some((0, 0)));
        assert_eq!(placement.place(8, 3), Some((32, 40)));
        assert_eq!(placement.place(3, 0), None);
        assert_eq!(placement.place(3, 4), None);
        assert_eq!(placement.place(2, 1), None);
        assert_eq!(placement.place(9, 1), None);
    }

    #[test]
    fn test_kept_blocks_tile_output_exactly() {
        let placement = CropPlacement::new(&layout(10, 15), 96, 96);
        assert_eq!((placement.x.keep, placement.y.keep), (6, 12));

        let mut origins = HashSet::new();
        for row in 0..15 {
            for col in 0..10 {
                if let Some(origin) = placement.place(row, col) {
                    assert!(origins.insert(origin), "duplicate origin {:?}", origin);
                }
            }
        }

        assert_eq!(origins.len(), placement.kept_blocks());
        for by in 0..12 {
            for bx in 0..6 {
                assert!(origins.contains(&(bx * 16, by * 8)));
            }
        }
    }

    #[test]
    fn test_non_multiple_target_shrinks() {
        let placement = CropPlacement::new(&layout(10, 15), 100, 90);
        assert_eq!(placement.output_width(), 96);
        assert_eq!(placement.output_height(), 88);
    }

    #[test]
    fn test_oversized_target_keeps_nothing() {
        let placement = CropPlacement::new(&layout(6, 12), 200, 48);
        assert_eq!(placement.x.keep, 0);
        assert!(placement.is_empty());
        assert_eq!(placement.place(0, 0), None);
        assert!(matches!(placement.validate(), Err(PipelineError::CropMisconfigured(_))));
    }

    #[test]
    fn test_block_larger_than_target_keeps_nothing() {
        let placement = CropPlacement::new(&layout(6, 12), 8, 48);
        assert!(placement.is_empty());
        assert!(placement.validate().is_err());
    }

    #[test]
    fn test_zero_block_size_keeps_nothing() {
        let layout = BlockLayout {
            blocks_per_row: 4,
            blocks_per_col: 4,
            block_width: 0,
            block_height: 8,
        };
        assert!(CropPlacement::new(&layout, 48, 48).is_empty());
    }
}
