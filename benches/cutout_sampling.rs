use std::hint::black_box;
use std::io::Cursor;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use cutout_vision::vision_pipeline::{
    CameraPipeline, FileCaptureSource, ImageBlockDecoder, PipelineConfig, SignalSource,
};
use image::{ImageFormat, Rgb, RgbImage};

fn generate_mock_frame(width: u32, height: u32) -> Vec<u8> {
    let image = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    });
    let mut bytes = Cursor::new(Vec::new());
    image
        .write_to(&mut bytes, ImageFormat::Jpeg)
        .expect("encode mock frame");
    bytes.into_inner()
}

fn decoded_pipeline() -> (tempfile::TempDir, CameraPipeline<FileCaptureSource, ImageBlockDecoder>) {
    let dir = tempfile::tempdir().expect("temp dir");
    std::fs::write(dir.path().join("frame.jpg"), generate_mock_frame(160, 120))
        .expect("write frame");

    let config = PipelineConfig::builder()
        .transfer_buffer_len(256 * 1024)
        .build();
    let mut pipeline = CameraPipeline::from_path(dir.path(), config).expect("pipeline");
    pipeline.run_cycle().expect("cycle");
    (dir, pipeline)
}

fn benchmark_chunked_sampling(c: &mut Criterion) {
    let mut group = c.benchmark_group("cutout_sampling");
    let (_dir, pipeline) = decoded_pipeline();
    let sampler = pipeline.sampler().expect("sampler");
    let total = sampler.total_len();

    for chunk_len in [64usize, 1024, total] {
        group.bench_with_input(
            BenchmarkId::from_parameter(chunk_len),
            &chunk_len,
            |b, &chunk_len| {
                let mut out = vec![0.0f32; total];
                b.iter(|| {
                    for (i, chunk) in out.chunks_mut(chunk_len).enumerate() {
                        sampler.get_data(i * chunk_len, chunk).expect("in range");
                    }
                    black_box(&out);
                });
            },
        );
    }

    group.finish();
}

fn benchmark_capture_cycle(c: &mut Criterion) {
    let (_dir, mut pipeline) = decoded_pipeline();

    c.bench_function("capture_decode_cycle", |b| {
        b.iter(|| black_box(pipeline.run_cycle().expect("cycle")));
    });
}

criterion_group!(benches, benchmark_chunked_sampling, benchmark_capture_cycle);
criterion_main!(benches);
