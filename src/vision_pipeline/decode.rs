//! Coded-block decoding module
//!
//! This module defines the block decoder contract the pipeline consumes and an
//! implementation backed by the `image` crate.

mod decoder;
mod image_decoder;

pub use decoder::{BlockDecoder, BlockLayout, BlockStream, CodedBlock};
pub use image_decoder::{ImageBlockDecoder, ImageBlockStream};
