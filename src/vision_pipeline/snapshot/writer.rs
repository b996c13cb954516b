use std::io::Write;

use crate::vision_pipeline::common::error::Result;
use crate::vision_pipeline::config::PipelineConfig;
use crate::vision_pipeline::sampling::CutoutSampler;

pub trait SnapshotWriter {
    fn write_snapshot(
        &self,
        cutout: &CutoutSampler<'_>,
        output: &mut dyn Write,
        config: &PipelineConfig,
    ) -> Result<()>;
}
