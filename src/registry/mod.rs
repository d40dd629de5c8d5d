pub mod metadata;

pub use metadata::{
    ParameterSchema, StageFactory, StageMetadata, StageMetadataFactory,
    StageMetadataFactoryWrapper,
};

use crate::core::Stage;
use anyhow::{anyhow, Context, Result};
use serde_json::Value;

/// Every stage type registered through `#[derive(StageNode)]`, sorted by id
pub fn all_stages() -> Vec<StageMetadata> {
    let mut stages: Vec<StageMetadata> = inventory::iter::<StageMetadataFactoryWrapper>
        .into_iter()
        .map(|wrapper| (wrapper.0)())
        .collect();
    stages.sort_by(|a, b| a.id.cmp(&b.id));
    stages
}

pub fn find_stage(type_name: &str) -> Option<StageMetadata> {
    all_stages().into_iter().find(|meta| meta.matches(type_name))
}

/// Instantiate a registered stage and hand it its JSON config
pub fn create_stage(type_name: &str, config: Value) -> Result<Box<dyn Stage>> {
    let meta = find_stage(type_name).ok_or_else(|| anyhow!("Unknown stage type: {}", type_name))?;
    let mut stage = meta.create_instance();
    stage
        .on_create(config)
        .with_context(|| format!("Failed to configure stage {}", meta.name))?;
    Ok(stage)
}
