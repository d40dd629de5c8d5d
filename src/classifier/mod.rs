//! Gesture classifiers and the on-disk dataset they train on.

pub mod dataset;
pub mod nearest_centroid;

pub use nearest_centroid::NearestCentroidClassifier;

use crate::core::Sample;
use crate::error::Result;
use std::path::Path;

/// A trainable gesture model.
///
/// Every training sample must carry a gesture id. Predicting before the
/// model has been trained or loaded fails with `ModelNotReady`.
pub trait Classifier: Send {
    /// Fit the model and return its score, a value in `[0, 1]`
    fn train(&mut self, samples: &[Sample]) -> Result<f64>;

    fn predict(&self, sample: &Sample) -> Result<String>;

    fn save(&self, path: &Path) -> Result<()>;

    fn load(&mut self, path: &Path) -> Result<()>;

    fn is_trained(&self) -> bool;
}
