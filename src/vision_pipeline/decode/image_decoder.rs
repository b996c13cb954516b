//! Block decoder implementation using the image library.
//!
//! The `image` crate decodes whole frames, so this decoder decodes once and
//! then walks the result in fixed-size blocks, the way a baseline JPEG decoder
//! hands out MCUs. Pixels are reduced to RGB565 and stored in wire order, which
//! is what a camera-side MCU decoder produces.

use image::RgbImage;
use tracing::debug;

use crate::vision_pipeline::color::{rgb888_to_rgb565, to_wire};
use crate::vision_pipeline::common::error::{PipelineError, Result};
use crate::vision_pipeline::decode::decoder::{BlockDecoder, BlockLayout, BlockStream, CodedBlock};

/// MCU width of a 4:2:2 subsampled JPEG, as produced by OV2640-class sensors.
pub const DEFAULT_BLOCK_WIDTH: usize = 16;

/// MCU height of a 4:2:2 subsampled JPEG.
pub const DEFAULT_BLOCK_HEIGHT: usize = 8;

/// Decoder for any still format the `image` crate understands (JPEG, PNG).
#[derive(Debug, Clone, Copy)]
pub struct ImageBlockDecoder {
    block_width: usize,
    block_height: usize,
}

impl Default for ImageBlockDecoder {
    fn default() -> Self {
        Self {
            block_width: DEFAULT_BLOCK_WIDTH,
            block_height: DEFAULT_BLOCK_HEIGHT,
        }
    }
}

impl ImageBlockDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a custom block size. Zero dimensions are rejected at decode time.
    pub fn with_block_size(block_width: usize, block_height: usize) -> Self {
        Self {
            block_width,
            block_height,
        }
    }
}

impl BlockDecoder for ImageBlockDecoder {
    type Stream = ImageBlockStream;

    fn decode(&self, data: &[u8]) -> Result<ImageBlockStream> {
        debug!("Decoding frame, {} bytes", data.len());

        if self.block_width == 0 || self.block_height == 0 {
            return Err(PipelineError::DecodeCorrupt(format!(
                "invalid block size {}x{}",
                self.block_width, self.block_height
            )));
        }

        let image = image::load_from_memory(data)
            .map_err(|e| PipelineError::DecodeCorrupt(e.to_string()))?
            .to_rgb8();

        let (width, height) = (image.width() as usize, image.height() as usize);

        // Partial blocks at the right and bottom edges are padded, like MCUs are
        let layout = BlockLayout {
            blocks_per_row: width.div_ceil(self.block_width),
            blocks_per_col: height.div_ceil(self.block_height),
            block_width: self.block_width,
            block_height: self.block_height,
        };

        debug!(
            "Decoded image: {}x{}, {}x{} blocks of {}x{}",
            width,
            height,
            layout.blocks_per_row,
            layout.blocks_per_col,
            layout.block_width,
            layout.block_height
        );

        Ok(ImageBlockStream {
            image,
            layout,
            next: 0,
            block: vec![0u16; layout.pixels_per_block()],
        })
    }
}

/// Row-major walk over the blocks of a decoded frame.
pub struct ImageBlockStream {
    image: RgbImage,
    layout: BlockLayout,
    next: usize,
    block: Vec<u16>,
}

impl ImageBlockStream {
    fn fill_block(&mut self, row: usize, col: usize) {
        let BlockLayout { block_width, block_height, .. } = self.layout;
        let max_x = self.image.width() as usize - 1;
        let max_y = self.image.height() as usize - 1;

        for y in 0..block_height {
            let src_y = (row * block_height + y).min(max_y);
            for x in 0..block_width {
                let src_x = (col * block_width + x).min(max_x);
                let pixel = self.image.get_pixel(src_x as u32, src_y as u32);
                self.block[y * block_width + x] = to_wire(rgb888_to_rgb565(pixel.0));
            }
        }
    }
}

impl BlockStream for ImageBlockStream {
    fn layout(&self) -> BlockLayout {
        self.layout
    }

    fn next_block(&mut self) -> Option<Result<CodedBlock<'_>>> {
        if self.next >= self.layout.total_blocks() {
            return None;
        }

        let row = self.next / self.layout.blocks_per_row;
        let col = self.next % self.layout.blocks_per_row;
        self.next += 1;

        self.fill_block(row, col);

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
