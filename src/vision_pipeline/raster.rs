//! Full-frame RGB565 raster and the decode-to-raster loop

use tracing::{debug, warn};

use crate::vision_pipeline::common::error::{PipelineError, Result};
use crate::vision_pipeline::crop::CropPlacement;
use crate::vision_pipeline::decode::BlockStream;

/// Whether the raster currently holds a decoded frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameState {
    /// Never written, reset for a new capture, or last decode wrote nothing
    Stale,
    /// A decode finished and wrote this many blocks
    Ready { blocks_written: usize },
}

/// Fixed-size raster of wire-order RGB565 samples, indexed by absolute row/column.
///
/// Cells outside the area written by the last decode keep whatever an earlier
/// frame left there.
#[derive(Debug, Clone)]
pub struct RasterStore {
    width: usize,
    height: usize,
    pixels: Vec<u16>,
    state: FrameState,
}

impl RasterStore {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0u16; width * height],
            state: FrameState::Stale,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn state(&self) -> FrameState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, FrameState::Ready { .. })
    }

    /// Marks the start of a capture cycle. Pixel contents are left in place.
    pub fn reset(&mut self) {
        self.state = FrameState::Stale;
    }

    pub fn get(&self, row: usize, col: usize) -> Option<u16> {
        if row >= self.height || col >= self.width {
            return None;
        }
        Some(self.pixels[row * self.width + col])
    }

    /// Reads a cell the caller has already bounds-checked.
    #[inline]
    pub(crate) fn pixel(&self, row: usize, col: usize) -> u16 {
        self.pixels[row * self.width + col]
    }

    pub fn as_slice(&self) -> &[u16] {
        &self.pixels
    }

    /// Copies a whole block with its top-left corner at `(x, y)`, one block row at a time.
    pub fn write_block(
        &mut self,
        x: usize,
        y: usize,
        block_width: usize,
        pixels: &[u16],
    ) -> Result<()> {
        if block_width == 0 || pixels.len() % block_width != 0 {
            return Err(PipelineError::DecodeCorrupt(format!(
                "block of {} pixels is not a whole number of {}-pixel rows",
                pixels.len(),
                block_width
            )));
        }
        let block_height = pixels.len() / block_width;
        if x + block_width > self.width || y + block_height > self.height {
            return Err(PipelineError::CropMisconfigured(format!(
                "{}x{} block at ({}, {}) exceeds {}x{} raster",
                block_width, block_height, x, y, self.width, self.height
            )));
        }

        for (row, src) in pixels.chunks_exact(block_width).enumerate() {
            let start = (y + row) * self.width + x;
            self.pixels[start..start + block_width].copy_from_slice(src);
        }
        Ok(())
    }
}

/// Outcome of one decode-to-raster pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodeReport {
    /// Blocks the decoder yielded
    pub blocks_seen: usize,
    /// Blocks copied into the raster
    pub blocks_written: usize,
    /// Why the stream ended early, if it did
    pub truncated: Option<String>,
}

/// Streams decoded blocks into the raster, keeping only those inside the crop.
///
/// Stops at the first decoder error or malformed block; everything written up
/// to that point stays. Fails before reading anything when the placement keeps
/// no blocks.
pub fn decode_into_raster<S: BlockStream + ?Sized>(
    stream: &mut S,
    placement: &CropPlacement,
    raster: &mut RasterStore,
) -> Result<DecodeReport> {
    placement.validate()?;

    if placement.output_width() > raster.width() || placement.output_height() > raster.height() {
        return Err(PipelineError::CropMisconfigured(format!(
            "crop of {}x{} does not fit {}x{} raster",
            placement.output_width(),
            placement.output_height(),
            raster.width(),
            raster.height()
        )));
    }

    let expected = placement.block_width * placement.block_height;
    let mut report = DecodeReport::default();
    raster.reset();

    while let Some(next) = stream.next_block() {
        let block = match next {
            Ok(block) => block,
            Err(e) => {
                warn!("Decoder stopped after {} blocks: {}", report.blocks_seen, e);
                report.truncated = Some(e.to_string());
                break;
            }
        };
        report.blocks_seen += 1;

        let Some((x, y)) = placement.place(block.row, block.col) else {
            continue;
        };

        if block.pixels.len() != expected {
            let reason = format!(
                "block ({}, {}) has {} pixels, expected {}",
                block.row,
                block.col,
                block.pixels.len(),
                expected
            );
            warn!("{}", reason);
            report.truncated = Some(reason);
            break;
        }

        raster.write_block(x, y, placement.block_width, block.pixels)?;
        report.blocks_written += 1;
    }

    debug!(
        "Decode pass: {} blocks seen, {} written of {} kept",
        report.blocks_seen,
        report.blocks_written,
        placement.kept_blocks()
    );

    if report.blocks_written > 0 {
        raster.state = FrameState::Ready {
            blocks_written: report.blocks_written,
        };
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vision_pipeline::decode::{BlockLayout, CodedBlock};

    /// Emits every block of a grid, each filled with a value derived from its coordinates.
    struct GridStream {
        layout: BlockLayout,
        next: usize,
        fail_at: Option<usize>,
        short_at: Option<usize>,
        block: Vec<u16>,
    }

    impl GridStream {
        fn new(
            blocks_per_row: usize,
            blocks_per_col: usize,
            block_width: usize,
            block_height: usize,
        ) -> Self {
            Self {
                layout: BlockLayout {
                    blocks_per_row,
                    blocks_per_col,
                    block_width,
                    block_height,
                },
                next: 0,
                fail_at: None,
                short_at: None,
                block: Vec::new(),
            }
        }

        fn value(row: usize, col: usize) -> u16 {
            (row * 100 + col) as u16
        }
    }

    impl BlockStream for GridStream {
        fn layout(&self) -> BlockLayout {
            self.layout
        }

        fn next_block(&mut self) -> Option<Result<CodedBlock<'_>>> {
            if self.next >= self.layout.total_blocks() {
                return None;
            }
            let index = self.next;
            self.next += 1;
            if self.fail_at == Some(index) {
                return Some(Err(PipelineError::DecodeCorrupt("truncated stream".to_string())));
            }
            let row = index / self.layout.blocks_per_row;
            let col = index % self.layout.blocks_per_row;
            let len = if self.short_at == Some(index) {
                self.layout.pixels_per_block() - 1
            } else {
                self.layout.pixels_per_block()
            };
            self.block = vec![Self::value(row, col); len];
            Some(Ok(CodedBlock {
                row,
                col,
                pixels: &self.block,
            }))
        }

        fn restart(&mut self) {
            self.next = 0;
        }
    }

    #[test]
    fn test_write_block_row_by_row() {
        let mut raster = RasterStore::new(4, 4);
        raster.write_block(2, 1, 2, &[1, 2, 3, 4]).unwrap();

        assert_eq!(raster.get(1, 2), Some(1));
        assert_eq!(raster.get(1, 3), Some(2));
        assert_eq!(raster.get(2, 2), Some(3));
        assert_eq!(raster.get(2, 3), Some(4));
        assert_eq!(raster.get(0, 0), Some(0));
        assert_eq!(raster.get(4, 0), None);
    }

    #[test]
    fn test_write_block_out_of_bounds() {
        let mut raster = RasterStore::new(4, 4);
        let result = raster.write_block(3, 0, 2, &[1, 2, 3, 4]);
        assert!(result.is_err());
        assert!(raster.as_slice().iter().all(|&p| p == 0));
    }

    #[test]
    fn test_reference_crop_into_raster() {
        // 6x12 grid of 16x8 blocks cropped to 48x48
        let mut stream = GridStream::new(6, 12, 16, 8);
        let layout = stream.layout();
        let placement = CropPlacement::new(&layout, 48, 48);
        let mut raster = RasterStore::new(48, 48);

        let report = decode_into_raster(&mut stream, &placement, &mut raster).unwrap();

        assert_eq!(report.blocks_seen, 72);
        assert_eq!(report.blocks_written, 18);
        assert_eq!(report.truncated, None);
        assert_eq!(raster.state(), FrameState::Ready { blocks_written: 18 });

        // Output column 0 comes from source block column 1 (source pixels 16..32)
        assert_eq!(raster.get(0, 0), Some(GridStream::value(3, 1)));
        assert_eq!(raster.get(0, 47), Some(GridStream::value(3, 3)));
        assert_eq!(raster.get(47, 0), Some(GridStream::value(8, 1)));
        assert_eq!(raster.get(47, 47), Some(GridStream::value(8, 3)));
    }

    #[test]
    fn test_untouched_cells_stay_stale() {
        let mut stream = GridStream::new(6, 12, 16, 8);
        let placement = CropPlacement::new(&stream.layout(), 32, 32);
        let mut raster = RasterStore::new(48, 48);
        raster.write_block(40, 40, 8, &[0xABCD; 64]).unwrap();

        decode_into_raster(&mut stream, &placement, &mut raster).unwrap();

        assert_eq!(raster.get(47, 47), Some(0xABCD));
    }

    #[test]
    fn test_decoder_error_stops_loop() {
        let mut stream = GridStream::new(6, 12, 16, 8);
        // Block index 25 is row 4, col 1: after the first kept row
        stream.fail_at = Some(25);
        let placement = CropPlacement::new(&stream.layout(), 48, 48);
        let mut raster = RasterStore::new(48, 48);

        let report = decode_into_raster(&mut stream, &placement, &mut raster).unwrap();

        assert_eq!(report.blocks_written, 3);
        assert!(report.truncated.is_some());
        assert_eq!(raster.get(8, 0), Some(0));
    }

    #[test]
    fn test_short_block_is_not_written() {
        let mut stream = GridStream::new(6, 12, 16, 8);
        stream.short_at = Some(19);
        let placement = CropPlacement::new(&stream.layout(), 48, 48);
        let mut raster = RasterStore::new(48, 48);

        let report = decode_into_raster(&mut stream, &placement, &mut raster).unwrap();

        assert_eq!(report.blocks_written, 0);
        assert!(report.truncated.is_some());
        assert_eq!(raster.state(), FrameState::Stale);
        assert!(raster.as_slice().iter().all(|&p| p == 0));
    }

    #[test]
    fn test_empty_placement_rejected_before_decoding() {
        let mut stream = GridStream::new(6, 12, 16, 8);
        let placement = CropPlacement::new(&stream.layout(), 200, 48);
        let mut raster = RasterStore::new(48, 48);

        let result = decode_into_raster(&mut stream, &placement, &mut raster);

        assert!(matches!(result, Err(PipelineError::CropMisconfigured(_))));
        assert_eq!(stream.next, 0);
    }

    #[test]
    fn test_reset_marks_stale() {
        let mut stream = GridStream::new(3, 6, 16, 8);
        let placement = CropPlacement::new(&stream.layout(), 48, 48);
        let mut raster = RasterStore::new(48, 48);

        decode_into_raster(&mut stream, &placement, &mut raster).unwrap();
        assert!(raster.is_ready());
        raster.reset();
        assert!(!raster.is_ready());
    }
}
