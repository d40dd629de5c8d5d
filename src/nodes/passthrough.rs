use crate::core::Stage;
use gesturelab_macros::StageNode;
use serde::{Deserialize, Serialize};

/// Forwards every sample unchanged
#[derive(StageNode, Debug, Clone, Default, Serialize, Deserialize)]
#[node_meta(name = "Identity", category = "Utility")]
pub struct Passthrough;

impl Stage for Passthrough {}
