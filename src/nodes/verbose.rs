use crate::core::{Sample, Stage};
use anyhow::Result;
use gesturelab_macros::StageNode;
use log::info;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Logs a one-line summary of every sample and forwards it
#[derive(StageNode, Debug, Clone, Serialize, Deserialize)]
#[node_meta(name = "Verbose", category = "Utility")]
#[serde(default)]
pub struct Verbose {
    #[param(default = "\"sample\"")]
    pub label: String,
}

impl Default for Verbose {
    fn default() -> Self {
        Self {
            label: "sample".to_string(),
        }
    }
}

impl Verbose {
    pub fn summarize(&self, sample: &Sample) -> String {
        let values = sample.as_slice();
        let stats = if !values.is_empty() {
            let mean = values.iter().sum::<f64>() / values.len() as f64;
            let rms = (values.iter().map(|x| x * x).sum::<f64>() / values.len() as f64).sqrt();
            format!("mean={:.4}, rms={:.4}", mean, rms)
        } else {
            "empty".to_string()
        };

        format!(
            "[{}] {}x{} gesture={} {}",
            self.label,
            sample.frame_count(),
            sample.axis_count(),
            sample.gesture_id.as_deref().unwrap_or("-"),
            stats
        )
    }
}

impl Stage for Verbose {
    fn on_create(&mut self, config: Value) -> Result<()> {
        super::configure(self, config)
    }

    fn process(&mut self, sample: Sample) -> Option<Sample> {
        info!("{}", self.summarize(&sample));
        Some(sample)
    }
}
