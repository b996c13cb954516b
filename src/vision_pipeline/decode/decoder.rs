use crate::vision_pipeline::common::error::Result;

/// Block grid geometry of one decode session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockLayout {
    /// Number of blocks in one row of the grid
    pub blocks_per_row: usize,
    /// Number of blocks in one column of the grid
    pub blocks_per_col: usize,
    /// Width of every block in pixels
    pub block_width: usize,
    /// Height of every block in pixels
    pub block_height: usize,
}

impl BlockLayout {
    pub fn total_blocks(&self) -> usize {
        self.blocks_per_row * self.blocks_per_col
    }

    pub fn pixels_per_block(&self) -> usize {
        self.block_width * self.block_height
    }
}

/// One decoded block, borrowed from the stream that produced it.
#[derive(Debug, Clone, Copy)]
pub struct CodedBlock<'a> {
    /// Block-grid row
    pub row: usize,
    /// Block-grid column
    pub col: usize,
    /// Packed RGB565 samples in wire order, row-major
    pub pixels: &'a [u16],
}

/// Sequential access to the blocks of one decoded image.
pub trait BlockStream {
    fn layout(&self) -> BlockLayout;

    /// Yields the next block, `None` once the stream is exhausted.
    ///
    /// An `Err` means the remaining data is unusable; callers stop reading.
    fn next_block(&mut self) -> Option<Result<CodedBlock<'_>>>;

    /// Rewinds to the first block.
    fn restart(&mut self);
}

pub trait BlockDecoder {
    type Stream: BlockStream;

    fn decode(&self, data: &[u8]) -> Result<Self::Stream>;
}
