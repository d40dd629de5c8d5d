use crate::core::{Sample, Stage};
use anyhow::Result;
use gesturelab_macros::StageNode;
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Suppresses samples shorter than `min_frames`
#[derive(StageNode, Debug, Clone, Serialize, Deserialize)]
#[node_meta(name = "Min Length", category = "Filters")]
#[serde(default)]
pub struct MinLength {
    #[param(default = "1", min = 0.0)]
    pub min_frames: usize,
}

impl Default for MinLength {
    fn default() -> Self {
        Self { min_frames: 1 }
    }
}

impl MinLength {
    pub fn new(min_frames: usize) -> Self {
        Self { min_frames }
    }
}

impl Stage for MinLength {
    fn on_create(&mut self, config: Value) -> Result<()> {
        super::configure(self, config)
    }

    fn process(&mut self, sample: Sample) -> Option<Sample> {
        if sample.frame_count() < self.min_frames {
            debug!(
                "min length: suppressing sample with {} frames (< {})",
                sample.frame_count(),
                self.min_frames
            );
            return None;
        }
        Some(sample)
    }
}
