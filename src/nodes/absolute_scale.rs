use crate::core::{Sample, Stage};
use crate::transforms::{absolute, scale_frames, subtract};
use anyhow::{ensure, Result};
use gesturelab_macros::StageNode;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Optionally subtracts a per-axis offset, takes absolute values and
/// resamples every sample to `scale_size` frames.
#[derive(StageNode, Debug, Clone, Serialize, Deserialize)]
#[node_meta(name = "Absolute Scale", category = "Transforms")]
#[serde(default)]
pub struct AbsoluteScale {
    #[param(default = "50", min = 1.0)]
    pub scale_size: usize,

    #[param(default = "null")]
    pub subtract: Option<Vec<f64>>,
}

impl Default for AbsoluteScale {
    fn default() -> Self {
        Self {
            scale_size: 50,
            subtract: None,
        }
    }
}

impl AbsoluteScale {
    pub fn new(scale_size: usize) -> Self {
        Self {
            scale_size,
            subtract: None,
        }
    }

    pub fn with_offsets(mut self, offsets: Vec<f64>) -> Self {
        self.subtract = Some(offsets);
        self
    }
}

impl Stage for AbsoluteScale {
    fn on_create(&mut self, config: Value) -> Result<()> {
        super::configure(self, config)?;
        ensure!(self.scale_size > 0, "scale_size must be at least 1");
        Ok(())
    }

    fn process(&mut self, sample: Sample) -> Option<Sample> {
        let sample = match &self.subtract {
            Some(offsets) => subtract(sample, offsets),
            None => sample,
        };
        Some(scale_frames(&absolute(sample), self.scale_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_then_scale() {
        let mut stage = AbsoluteScale::new(3).with_offsets(vec![1.0]);
        let sample = Sample::from_frames(vec![vec![-1.0, 4.0], vec![5.0, -8.0]]).unwrap();
        let out = stage.process(sample).unwrap();
        assert_eq!(out.as_slice(), &[2.0, 4.0, 3.0, 6.0, 4.0, 8.0]);
    }

    #[test]
    fn test_zero_scale_size_rejected() {
        let mut stage = AbsoluteScale::default();
        assert!(stage.on_create(serde_json::json!({"scale_size": 0})).is_err());
    }
}
