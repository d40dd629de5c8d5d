use thiserror::Error;

#[derive(Error, Debug)]
pub enum GestureError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Ragged matrix: row {row} has {found} values, expected {expected}")]
    RaggedMatrix {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Axis mismatch: expected {expected} axes, found {found}")]
    AxisMismatch { expected: usize, found: usize },

    #[error("Can't process an empty sample, it must contain data")]
    EmptySample,

    #[error("Model not ready: train or load a model before predicting")]
    ModelNotReady,

    #[error("The sample must have a gesture_id to be saved")]
    MissingGestureId,

    #[error("Can't find a free file name for the sample after {0} tries")]
    FilenameConflict(usize),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GestureError>;
