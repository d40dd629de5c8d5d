use crate::core::{Sample, Stage};
use crate::transforms::fft_magnitude;
use anyhow::Result;
use gesturelab_macros::StageNode;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Replaces (or extends) every sample with its FFT magnitude spectrum
#[derive(StageNode, Debug, Clone, Default, Serialize, Deserialize)]
#[node_meta(name = "FFT", category = "Transforms")]
#[serde(default)]
pub struct Fft {
    #[param(default = "false")]
    pub drop_low_bins: bool,

    #[param(default = "false")]
    pub append: bool,
}

impl Stage for Fft {
    fn on_create(&mut self, config: Value) -> Result<()> {
        super::configure(self, config)
    }

    fn process(&mut self, sample: Sample) -> Option<Sample> {
        Some(fft_magnitude(&sample, self.drop_low_bins, self.append))
    }
}
