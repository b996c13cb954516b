use std::io::Write;

use tracing::debug;

use crate::vision_pipeline::color::{from_wire, rgb565_to_rgb888};
use crate::vision_pipeline::common::error::{PipelineError, Result};
use crate::vision_pipeline::config::{PipelineConfig, SnapshotCompression};
use crate::vision_pipeline::sampling::CutoutSampler;
use crate::vision_pipeline::snapshot::writer::SnapshotWriter;

pub struct TiffSnapshotWriter;

impl SnapshotWriter for TiffSnapshotWriter {
    fn write_snapshot(
        &self,
        cutout: &CutoutSampler<'_>,
        output: &mut dyn Write,
        config: &PipelineConfig,
    ) -> Result<()> {
        let window = cutout.window();
        debug!("Encoding cutout snapshot: {}x{}", window.width(), window.height());

        let mut rgb = Vec::with_capacity(window.len() * 3);
        for offset in 0..window.len() {
            let raw = cutout.raw(offset).ok_or(PipelineError::OutOfRange {
                offset,
                len: 1,
                total: window.len(),
            })?;
            rgb.extend_from_slice(&rgb565_to_rgb888(from_wire(raw)));
        }

        let compression = match config.snapshot_compression {
            SnapshotCompression::None => tiff::encoder::Compression::Uncompressed,
            SnapshotCompression::Lzw => tiff::encoder::Compression::Lzw,
            SnapshotCompression::Deflate => tiff::encoder::Compression::Deflate(
                tiff::encoder::compression::DeflateLevel::Balanced,
            ),
        };

        let mut buffer = Vec::new();
        let mut encoder = tiff::encoder::TiffEncoder::new(std::io::Cursor::new(&mut buffer))
            .map_err(|e| PipelineError::EncodeError(e.to_string()))?
            .with_compression(compression);

        encoder
            .write_image::<tiff::encoder::colortype::RGB8>(
                window.width() as u32,
                window.height() as u32,
                &rgb,
            )
            .map_err(|e| PipelineError::EncodeError(e.to_string()))?;

        output.write_all(&buffer)?;

        debug!("Snapshot encoding complete, {} bytes", buffer.len());
        Ok(())
    }
}
