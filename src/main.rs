use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use cutout_vision::logger;
use cutout_vision::vision_pipeline::{
    BlockDecoder, CameraPipeline, CaptureSource, PipelineConfig, SignalSource,
    SnapshotCompression, TiffSnapshotWriter,
};

use tracing::{error, info, warn};

#[derive(Clone, Copy, ValueEnum)]
enum Compression {
    None,
    Lzw,
    Deflate,
}

impl From<Compression> for SnapshotCompression {
    fn from(value: Compression) -> Self {
        match value {
            Compression::None => SnapshotCompression::None,
            Compression::Lzw => SnapshotCompression::Lzw,
            Compression::Deflate => SnapshotCompression::Deflate,
        }
    }
}

#[derive(Parser)]
#[command(name = "cutout-vision", about = "Decode camera frames into a centered classifier cutout")]
struct Args {
    /// Frame file, or directory of frames to replay
    input: PathBuf,
    /// Number of capture cycles to run
    #[arg(short = 'n', long, default_value = "1")]
    cycles: usize,
    /// Raster width and crop target, in pixels
    #[arg(long, default_value = "96")]
    frame_width: usize,
    /// Raster height and crop target, in pixels
    #[arg(long, default_value = "96")]
    frame_height: usize,
    /// Classifier input width
    #[arg(long, default_value = "96")]
    cutout_width: usize,
    /// Classifier input height
    #[arg(long, default_value = "96")]
    cutout_height: usize,
    /// Largest compressed frame accepted, in bytes
    #[arg(long, default_value = "4096")]
    buffer: usize,
    /// Capture timeout in milliseconds
    #[arg(long, default_value = "5000")]
    timeout_ms: u64,
    /// Write each cutout as a TIFF into this directory
    #[arg(short, long)]
    snapshot_dir: Option<PathBuf>,
    /// Snapshot compression
    #[arg(long, value_enum, default_value = "none")]
    compression: Compression,
    /// ONNX classifier model
    #[cfg(feature = "onnx")]
    #[arg(long, requires = "labels")]
    model: Option<PathBuf>,
    /// JSON label list for the model
    #[cfg(feature = "onnx")]
    #[arg(long)]
    labels: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    logger::init();
    let args = Args::parse();

    let config = PipelineConfig::builder()
        .frame_size(args.frame_width, args.frame_height)
        .cutout_size(args.cutout_width, args.cutout_height)
        .transfer_buffer_len(args.buffer)
        .capture_timeout(Duration::from_millis(args.timeout_ms))
        .snapshot_compression(args.compression.into())
        .build();

    let mut pipeline = CameraPipeline::from_path(&args.input, config)
        .with_context(|| format!("failed to set up pipeline for {}", args.input.display()))?;

    info!(
        "Cutout {}x{} from {}x{} frame",
        pipeline.window().width(),
        pipeline.window().height(),
        pipeline.config().frame_width,
        pipeline.config().frame_height
    );

    #[cfg(feature = "onnx")]
    let mut classifier = match (&args.model, &args.labels) {
        (Some(model), Some(labels)) => Some(
            cutout_vision::vision_pipeline::OnnxClassifier::new(model, labels)
                .context("failed to load classifier")?,
        ),
        _ => None,
    };

    if let Some(dir) = &args.snapshot_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
    }

    let mut completed = 0;
    for cycle in 0..args.cycles {
        let report = match pipeline.run_cycle() {
            Ok(report) => report,
            Err(e) if e.is_recoverable() => {
                warn!("Cycle {} skipped: {}", cycle, e);
                continue;
            }
            Err(e) => {
                error!("Cycle {} failed: {}", cycle, e);
                return Err(e.into());
            }
        };
        report.timings.log_summary();

        let sampler = pipeline.sampler()?;
        info!("Cutout ready: {} samples", sampler.total_len());

        #[cfg(feature = "onnx")]
        if let Some(classifier) = classifier.as_mut() {
            match pipeline.classify(classifier) {
                Ok(result) => result.log(),
                Err(e) => warn!("Classification failed: {}", e),
            }
        }

        if let Some(dir) = &args.snapshot_dir {
            let path = dir.join(format!("cutout_{:04}.tiff", cycle));
            match write_snapshot(&pipeline, &path) {
                Ok(()) => info!("Snapshot written to {}", path.display()),
                Err(e) => warn!("Snapshot for cycle {} not written: {:#}", cycle, e),
            }
        }

        completed += 1;
    }

    info!("{} of {} cycles completed", completed, args.cycles);
    Ok(())
}

fn write_snapshot<C: CaptureSource, D: BlockDecoder>(
    pipeline: &CameraPipeline<C, D>,
    path: &Path,
) -> anyhow::Result<()> {
    let mut file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    pipeline
        .write_snapshot(&TiffSnapshotWriter, &mut file)
        .with_context(|| format!("failed to encode {}", path.display()))
}
