use crate::core::Stage;
use serde::{Deserialize, Serialize};

/// Schema for a configurable parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSchema {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: String,
    pub default: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

/// Factory function type for creating stage instances
pub type StageFactory = fn() -> Box<dyn Stage>;

/// Complete metadata for a stage type
#[derive(Clone, Serialize)]
pub struct StageMetadata {
    pub id: String,
    pub name: String,
    pub category: String,
    pub parameters: Vec<ParameterSchema>,
    #[serde(skip)]
    pub factory: StageFactory,
}

impl StageMetadata {
    /// Create a new instance of this stage type with default parameters
    pub fn create_instance(&self) -> Box<dyn Stage> {
        (self.factory)()
    }

    /// Whether `type_name` refers to this stage.
    ///
    /// Matches the id or the display name, ignoring case, spaces and
    /// underscores, so "GradientThreshold", "gradient_threshold" and
    /// "Gradient Threshold" all resolve to the same stage.
    pub fn matches(&self, type_name: &str) -> bool {
        let wanted = canonical(type_name);
        canonical(&self.id) == wanted || canonical(&self.name) == wanted
    }
}

fn canonical(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '_' | ' ' | '-'))
        .flat_map(char::to_lowercase)
        .collect()
}

// Factory type for creating stage metadata at runtime
pub type StageMetadataFactory = fn() -> StageMetadata;

// Wrapper for inventory collection
pub struct StageMetadataFactoryWrapper(pub StageMetadataFactory);

inventory::collect!(StageMetadataFactoryWrapper);
