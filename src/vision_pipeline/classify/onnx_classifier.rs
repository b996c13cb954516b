//! Classifier backed by an ONNX model through ONNX Runtime.

use std::path::Path;
use std::time::Instant;

use ort::session::{Session, builder::GraphOptimizationLevel};
use ort::value::Tensor;
use tracing::debug;

use crate::vision_pipeline::classify::classifier::{
    ClassificationResult, Classifier, DEFAULT_CHUNK_LEN, InferenceTiming, Prediction, read_signal,
};
use crate::vision_pipeline::common::error::{PipelineError, Result};
use crate::vision_pipeline::sampling::SignalSource;

pub struct OnnxClassifier {
    session: Session,
    labels: Vec<String>,
    input_shape: Option<Vec<usize>>,
}

impl OnnxClassifier {
    /// Loads a model and its label list (`{"labels": ["...", ...]}`).
    pub fn new(model_path: impl AsRef<Path>, labels_path: impl AsRef<Path>) -> Result<Self> {
        let session = Session::builder()
            .map_err(|e| PipelineError::Classifier(e.to_string()))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| PipelineError::Classifier(e.to_string()))?
            .commit_from_file(model_path.as_ref())
            .map_err(|e| PipelineError::Classifier(e.to_string()))?;

        let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(labels_path)?)
            .map_err(|e| PipelineError::Classifier(e.to_string()))?;
        let labels: Vec<String> = json["labels"]
            .as_array()
            .ok_or_else(|| {
                PipelineError::Classifier("labels file has no \"labels\" array".to_string())
            })?
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect();

        Ok(Self {
            session,
            labels,
            input_shape: None,
        })
    }

    /// Overrides the input tensor shape; defaults to `[1, signal_len]`.
    pub fn with_input_shape(mut self, shape: Vec<usize>) -> Self {
        self.input_shape = Some(shape);
        self
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

impl Classifier for OnnxClassifier {
    fn classify(&mut self, signal: &dyn SignalSource) -> Result<ClassificationResult> {
        let dsp_start = Instant::now();
        let features = read_signal(signal, DEFAULT_CHUNK_LEN)?;
        let dsp = dsp_start.elapsed();

        let shape = self
            .input_shape
            .clone()
            .unwrap_or_else(|| vec![1, features.len()]);
        if shape.iter().product::<usize>() != features.len() {
            return Err(PipelineError::Classifier(format!(
                "input shape {:?} does not hold {} features",
                shape,
                features.len()
            )));
        }

        let classification_start = Instant::now();
        let input = Tensor::from_array((shape, features))
            .map_err(|e| PipelineError::Classifier(e.to_string()))?;
        let outputs = self
            .session
            .run(ort::inputs![input])
            .map_err(|e| PipelineError::Classifier(e.to_string()))?;
        let (_, scores) = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(|e| PipelineError::Classifier(e.to_string()))?;
        let classification = classification_start.elapsed();

        debug!("Model produced {} scores for {} labels", scores.len(), self.labels.len());

        let predictions = self
            .labels
            .iter()
            .zip(scores.iter())
            .map(|(label, &value)| Prediction {
                label: label.clone(),
                value,
            })
            .collect();

        Ok(ClassificationResult {
            predictions,
            anomaly: None,
            timing: InferenceTiming {
                dsp,
                classification,
                ..Default::default()
            },
        })
    }
}
