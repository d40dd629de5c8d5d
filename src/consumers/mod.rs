//! Terminal consumers: recording, prediction and gesture dispatch.

pub mod callback;
pub mod predictor;
pub mod recorder;

pub use callback::{CallbackManager, GestureCallback, GestureReceiver};
pub use predictor::{ClassifierPredictor, HighestAxisPredictor, Predict, Predictor};
pub use recorder::FileRecorder;
