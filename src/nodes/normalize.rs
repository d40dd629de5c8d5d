use crate::core::{Sample, Stage};
use crate::transforms::normalize;
use gesturelab_macros::StageNode;
use serde::{Deserialize, Serialize};

/// Min-max normalizes each axis into [0, 1]
#[derive(StageNode, Debug, Clone, Default, Serialize, Deserialize)]
#[node_meta(name = "Normalize", category = "Transforms")]
pub struct Normalize;

impl Stage for Normalize {
    fn process(&mut self, sample: Sample) -> Option<Sample> {
        Some(normalize(sample))
    }
}
