use crate::core::{Sample, Stage};
use crate::transforms::trim;
use anyhow::Result;
use gesturelab_macros::StageNode;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Trims the quiet ends of every sample
#[derive(StageNode, Debug, Clone, Serialize, Deserialize)]
#[node_meta(name = "Trimmer", category = "Transforms")]
#[serde(default)]
pub struct Trimmer {
    #[param(default = "300.0", min = 0.0)]
    pub threshold: f64,
}

impl Default for Trimmer {
    fn default() -> Self {
        Self { threshold: 300.0 }
    }
}

impl Trimmer {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }
}

impl Stage for Trimmer {
    fn on_create(&mut self, config: Value) -> Result<()> {
        super::configure(self, config)
    }

    fn process(&mut self, sample: Sample) -> Option<Sample> {
        Some(trim(&sample, self.threshold))
    }
}
