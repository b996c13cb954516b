use std::time::Duration;

use tracing::info;

use crate::vision_pipeline::common::error::Result;
use crate::vision_pipeline::sampling::SignalSource;

/// Elements fetched per `get_data` call when a classifier pulls a whole signal.
pub const DEFAULT_CHUNK_LEN: usize = 1024;

#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub label: String,
    pub value: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InferenceTiming {
    /// Feature extraction, including pulling samples from the signal
    pub dsp: Duration,
    pub classification: Duration,
    pub anomaly: Duration,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassificationResult {
    /// One score per label, in model order
    pub predictions: Vec<Prediction>,
    /// Anomaly score, for models that produce one
    pub anomaly: Option<f32>,
    pub timing: InferenceTiming,
}

impl ClassificationResult {
    /// Highest-scoring prediction.
    pub fn top(&self) -> Option<&Prediction> {
        self.predictions
            .iter()
            .max_by(|a, b| a.value.total_cmp(&b.value))
    }

    pub fn log(&self) {
        info!(
            dsp_ms = self.timing.dsp.as_millis() as u64,
            classification_ms = self.timing.classification.as_millis() as u64,
            anomaly_ms = self.timing.anomaly.as_millis() as u64,
            "Predictions"
        );
        for prediction in &self.predictions {
            info!("    {}: {:.5}", prediction.label, prediction.value);
        }
        if let Some(anomaly) = self.anomaly {
            info!("    anomaly score: {:.3}", anomaly);
        }
    }
}

pub trait Classifier {
    fn classify(&mut self, signal: &dyn SignalSource) -> Result<ClassificationResult>;
}

/// Pulls the whole signal in `chunk_len`-sized `get_data` calls.
pub fn read_signal(signal: &dyn SignalSource, chunk_len: usize) -> Result<Vec<f32>> {
    let chunk_len = chunk_len.max(1);
    let mut features = vec![0.0f32; signal.total_len()];
    for (i, chunk) in features.chunks_mut(chunk_len).enumerate() {
        signal.get_data(i * chunk_len, chunk)?;
    }
    Ok(features)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct Ramp {
        len: usize,
        calls: RefCell<Vec<(usize, usize)>>,
    }

    impl SignalSource for Ramp {
        fn total_len(&self) -> usize {
            self.len
        }

        fn get_data(&self, offset: usize, out: &mut [f32]) -> Result<()> {
            self.calls.borrow_mut().push((offset, out.len()));
            for (i, slot) in out.iter_mut().enumerate() {
                *slot = (offset + i) as f32;
            }
            Ok(())
        }
    }

    #[test]
    fn test_read_signal_covers_range_once() {
        let ramp = Ramp {
            len: 10,
            calls: RefCell::new(Vec::new()),
        };

        let features = read_signal(&ramp, 4).unwrap();

        assert_eq!(features, (0..10).map(|v| v as f32).collect::<Vec<_>>());
        assert_eq!(*ramp.calls.borrow(), vec![(0, 4), (4, 4), (8, 2)]);
    }

    #[test]
    fn test_top_prediction() {
        let result = ClassificationResult {
            predictions: vec![
                Prediction { label: "no person".to_string(), value: 0.2 },
                Prediction { label: "person".to_string(), value: 0.8 },
            ],
            ..Default::default()
        };
        assert_eq!(result.top().map(|p| p.label.as_str()), Some("person"));
        assert!(ClassificationResult::default().top().is_none());
    }
}
