use log::{debug, warn};

use super::callback::GestureReceiver;
use crate::classifier::Classifier;
use crate::core::{Receiver, Sample};
use crate::error::{GestureError, Result};

/// Maps a sample to a gesture id
pub trait Predict: Send {
    fn predict(&mut self, sample: &Sample) -> Result<String>;
}

/// Terminal consumer that predicts a gesture for every sample and hands the
/// id to each attached gesture receiver, in attachment order
pub struct Predictor<P> {
    model: P,
    receivers: Vec<Box<dyn GestureReceiver>>,
}

impl<P: Predict> Predictor<P> {
    pub fn new(model: P) -> Self {
        Self {
            model,
            receivers: Vec::new(),
        }
    }

    pub fn attach(&mut self, receiver: impl GestureReceiver + 'static) {
        self.receivers.push(Box::new(receiver));
    }

    pub fn with_receiver(mut self, receiver: impl GestureReceiver + 'static) -> Self {
        self.attach(receiver);
        self
    }

    pub fn model(&self) -> &P {
        &self.model
    }

    /// Predict without notifying anyone
    pub fn predict(&mut self, sample: &Sample) -> Result<String> {
        self.model.predict(sample)
    }
}

impl<P: Predict> Receiver for Predictor<P> {
    fn receive(&mut self, sample: Sample) {
        match self.model.predict(&sample) {
            Ok(gesture_id) => {
                debug!("predicted gesture {}", gesture_id);
                for receiver in self.receivers.iter_mut() {
                    receiver.receive_gesture(&gesture_id);
                }
            }
            Err(e) => warn!("prediction failed: {}", e),
        }
    }
}

/// Predicts the index of the axis with the greatest mean value
#[derive(Debug, Clone, Copy, Default)]
pub struct HighestAxisPredictor {
    pub absolute_values: bool,
}

impl HighestAxisPredictor {
    pub fn new(absolute_values: bool) -> Self {
        Self { absolute_values }
    }
}

impl Predict for HighestAxisPredictor {
    fn predict(&mut self, sample: &Sample) -> Result<String> {
        if sample.frame_count() == 0 || sample.axis_count() == 0 {
            return Err(GestureError::EmptySample);
        }

        let frames = sample.frame_count() as f64;
        let mut best: Option<(usize, f64)> = None;
        for axis in 0..sample.axis_count() {
            let mut mean = sample.column(axis).iter().sum::<f64>() / frames;
            if self.absolute_values {
                mean = mean.abs();
            }
            // First index wins ties
            if best.map_or(true, |(_, value)| mean > value) {
                best = Some((axis, mean));
            }
        }

        best.map(|(axis, _)| axis.to_string())
            .ok_or(GestureError::EmptySample)
    }
}

/// Delegates prediction to a trained classifier
pub struct ClassifierPredictor<C> {
    classifier: C,
}

impl<C: Classifier> ClassifierPredictor<C> {
    pub fn new(classifier: C) -> Self {
        Self { classifier }
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }
}

impl<C: Classifier> Predict for ClassifierPredictor<C> {
    fn predict(&mut self, sample: &Sample) -> Result<String> {
        self.classifier.predict(sample)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highest_axis_uses_mean() {
        let sample = Sample::from_frames(vec![vec![1.0, 5.0, 2.0], vec![1.0, -1.0, 2.5]]).unwrap();
        let mut predictor = HighestAxisPredictor::default();
        assert_eq!(predictor.predict(&sample).unwrap(), "2");
    }

    #[test]
    fn test_highest_axis_absolute() {
        let sample = Sample::from_frames(vec![vec![1.0, -8.0]]).unwrap();
        assert_eq!(HighestAxisPredictor::new(false).predict(&sample).unwrap(), "0");
        assert_eq!(HighestAxisPredictor::new(true).predict(&sample).unwrap(), "1");
    }

    #[test]
    fn test_empty_sample_rejected() {
        let result = HighestAxisPredictor::default().predict(&Sample::empty(3));
        assert!(matches!(result, Err(GestureError::EmptySample)));
    }
}
