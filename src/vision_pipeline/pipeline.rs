use std::io::Write;
use std::path::Path;
use std::time::Instant;

use tracing::{debug, info, instrument, warn};

use crate::vision_pipeline::{
    capture::{CaptureSource, FileCaptureSource},
    classify::{ClassificationResult, Classifier},
    common::error::{PipelineError, Result},
    config::PipelineConfig,
    crop::CropPlacement,
    cutout::CutoutWindow,
    decode::{BlockDecoder, BlockStream, ImageBlockDecoder},
    raster::{DecodeReport, RasterStore, decode_into_raster},
    sampling::CutoutSampler,
    snapshot::SnapshotWriter,
    timing::CycleTimings,
};

/// Summary of one capture → transfer → decode cycle.
#[derive(Debug, Clone)]
pub struct CycleReport {
    /// Size of the compressed frame in bytes
    pub frame_len: usize,
    pub decode: DecodeReport,
    pub timings: CycleTimings,
}

/// One camera's capture/decode/sample pipeline.
///
/// Owns the transfer buffer and the raster. Decoding needs `&mut self` and
/// sampling borrows `&self`, so a sampler can never observe a decode in progress.
pub struct CameraPipeline<C: CaptureSource, D: BlockDecoder> {
    source: C,
    decoder: D,
    config: PipelineConfig,
    window: CutoutWindow,
    raster: RasterStore,
    transfer_buf: Vec<u8>,
}

impl CameraPipeline<FileCaptureSource, ImageBlockDecoder> {
    /// Replays image files from `path` through the default 16x8 block decoder.
    pub fn from_path<P: AsRef<Path>>(path: P, config: PipelineConfig) -> Result<Self> {
        Self::with_custom(
            FileCaptureSource::from_path(path)?,
            ImageBlockDecoder::new(),
            config,
        )
    }
}

impl<C: CaptureSource, D: BlockDecoder> CameraPipeline<C, D> {
    pub fn with_custom(source: C, decoder: D, config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        let window = CutoutWindow::new(
            config.frame_width,
            config.frame_height,
            config.cutout_width,
            config.cutout_height,
        )?;

        debug!(
            "Cutout {}x{} at ({}, {}) in {}x{} frame",
            window.width(),
            window.height(),
            window.row_start(),
            window.col_start(),
            config.frame_width,
            config.frame_height
        );

        Ok(Self {
            source,
            decoder,
            raster: RasterStore::new(config.frame_width, config.frame_height),
            transfer_buf: vec![0u8; config.transfer_buffer_len],
            window,
            config,
        })
    }

    /// Triggers the sensor and waits for it to finish the frame.
    #[instrument(skip(self))]
    fn await_capture(&mut self) -> Result<()> {
        self.source
            .capture(self.config.capture_timeout, self.config.poll_interval)
    }

    /// Moves the captured frame into the transfer buffer, returning its length.
    #[instrument(skip(self))]
    fn transfer_frame(&mut self) -> Result<usize> {
        self.source.transfer(&mut self.transfer_buf)
    }

    /// Decodes the first `len` bytes of the transfer buffer into the raster.
    ///
    /// Fails if no block lands in the crop. A stream that breaks off after
    /// writing some blocks is accepted with a warning.
    #[instrument(skip(self))]
    pub(crate) fn decode_frame(&mut self, len: usize) -> Result<DecodeReport> {
        self.raster.reset();

        let capacity = self.transfer_buf.len();
        let data = self.transfer_buf.get(..len).ok_or_else(|| {
            PipelineError::DecodeCorrupt(format!(
                "frame length {} exceeds the {} byte transfer buffer",
                len, capacity
            ))
        })?;

        let mut stream = self.decoder.decode(data)?;
        let layout = stream.layout();
        let placement =
            CropPlacement::new(&layout, self.config.frame_width, self.config.frame_height);

        if !placement.is_empty()
            && (placement.output_width() < self.config.frame_width
                || placement.output_height() < self.config.frame_height)
        {
            warn!(
                "Crop covers {}x{} of the {}x{} frame, not a multiple of {}x{} blocks",
                placement.output_width(),
                placement.output_height(),
                self.config.frame_width,
                self.config.frame_height,
                layout.block_width,
                layout.block_height
            );
        }

        let report = decode_into_raster(&mut stream, &placement, &mut self.raster)?;

        if report.blocks_written == 0 {
            return Err(PipelineError::DecodeCorrupt(
                report
                    .truncated
                    .unwrap_or_else(|| "no blocks inside the crop window".to_string()),
            ));
        }
        if let Some(reason) = &report.truncated {
            warn!(
                "Frame partially decoded ({} of {} blocks): {}",
                report.blocks_written,
                placement.kept_blocks(),
                reason
            );
        }

        Ok(report)
    }

    /// Runs one capture → transfer → decode cycle.
    ///
    /// The raster is left untouched when capture or transfer fails. A failed
    /// decode leaves it stale until the next successful cycle.
    #[instrument(skip(self))]
    pub fn run_cycle(&mut self) -> Result<CycleReport> {
        let mut timings = CycleTimings::default();

        let started = Instant::now();
        self.await_capture()?;
        timings.capture = started.elapsed();

        let started = Instant::now();
        let frame_len = self.transfer_frame()?;
        timings.transfer = started.elapsed();

        let started = Instant::now();
        let decode = self.decode_frame(frame_len)?;
        timings.decode = started.elapsed();

        info!(
            frame_len,
            blocks_written = decode.blocks_written,
            "Frame ready"
        );

        Ok(CycleReport {
            frame_len,
            decode,
            timings,
        })
    }

    /// Sampler over the cutout of the last decoded frame.
    pub fn sampler(&self) -> Result<CutoutSampler<'_>> {
        CutoutSampler::new(&self.raster, self.window)
    }

    #[instrument(skip(self, classifier))]
    pub fn classify<K: Classifier + ?Sized>(
        &self,
        classifier: &mut K,
    ) -> Result<ClassificationResult> {
        let sampler = self.sampler()?;
        classifier.classify(&sampler)
    }

    pub fn write_snapshot<W: SnapshotWriter + ?Sized>(
        &self,
        writer: &W,
        output: &mut dyn Write,
    ) -> Result<()> {
        let sampler = self.sampler()?;
        writer.write_snapshot(&sampler, output, &self.config)
    }

    pub fn raster(&self) -> &RasterStore {
        &self.raster
    }

    pub fn window(&self) -> &CutoutWindow {
        &self.window
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn source_mut(&mut self) -> &mut C {
        &mut self.source
    }
}
