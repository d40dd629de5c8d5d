use log::info;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use super::Classifier;
use crate::core::Sample;
use crate::error::{GestureError, Result};
use crate::transforms::scale_frames;

/// Labels a sample with the gesture whose mean feature vector is closest.
///
/// Features are the sample rescaled to `frame_count` frames and flattened,
/// so samples of different lengths compare frame by frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearestCentroidClassifier {
    frame_count: usize,
    axes: Option<usize>,
    centroids: BTreeMap<String, Vec<f64>>,
}

impl Default for NearestCentroidClassifier {
    fn default() -> Self {
        Self::new(50)
    }
}

impl NearestCentroidClassifier {
    pub fn new(frame_count: usize) -> Self {
        Self {
            frame_count: frame_count.max(1),
            axes: None,
            centroids: BTreeMap::new(),
        }
    }

    pub fn gesture_ids(&self) -> impl Iterator<Item = &str> {
        self.centroids.keys().map(String::as_str)
    }

    fn features(&self, sample: &Sample, axes: Option<usize>) -> Result<Vec<f64>> {
        if sample.frame_count() == 0 {
            return Err(GestureError::EmptySample);
        }
        if let Some(axes) = axes {
            if sample.axis_count() != axes {
                return Err(GestureError::AxisMismatch {
                    expected: axes,
                    found: sample.axis_count(),
                });
            }
        }
        Ok(scale_frames(sample, self.frame_count).linearized())
    }

}

fn nearest(centroids: &BTreeMap<String, Vec<f64>>, features: &[f64]) -> Result<String> {
    centroids
        .iter()
        .map(|(id, centroid)| (id, squared_distance(centroid, features)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(id, _)| id.clone())
        .ok_or(GestureError::ModelNotReady)
}

fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

impl Classifier for NearestCentroidClassifier {
    fn train(&mut self, samples: &[Sample]) -> Result<f64> {
        let first = samples.first().ok_or_else(|| {
            GestureError::InvalidConfig("no training samples".to_string())
        })?;
        // Nothing is stored until every sample has been validated
        let axes = first.axis_count();

        let mut labeled = Vec::with_capacity(samples.len());
        let mut sums: BTreeMap<String, (Vec<f64>, usize)> = BTreeMap::new();
        for sample in samples {
            let gesture_id = sample
                .gesture_id
                .clone()
                .ok_or(GestureError::MissingGestureId)?;
            let features = self.features(sample, Some(axes))?;

            let (sum, count) = sums
                .entry(gesture_id.clone())
                .or_insert_with(|| (vec![0.0; features.len()], 0));
            for (acc, value) in sum.iter_mut().zip(&features) {
                *acc += value;
            }
            *count += 1;
            labeled.push((gesture_id, features));
        }

        let centroids: BTreeMap<String, Vec<f64>> = sums
            .into_iter()
            .map(|(id, (sum, count))| {
                let centroid = sum.into_iter().map(|v| v / count as f64).collect();
                (id, centroid)
            })
            .collect();

        let mut correct = 0;
        for (gesture_id, features) in &labeled {
            if nearest(&centroids, features)? == *gesture_id {
                correct += 1;
            }
        }
        let score = correct as f64 / labeled.len() as f64;
        info!(
            "trained on {} samples across {} gestures, score {:.3}",
            labeled.len(),
            centroids.len(),
            score
        );

        self.axes = Some(axes);
        self.centroids = centroids;
        Ok(score)
    }

    fn predict(&self, sample: &Sample) -> Result<String> {
        if !self.is_trained() {
            return Err(GestureError::ModelNotReady);
        }
        let features = self.features(sample, self.axes)?;
        nearest(&self.centroids, &features)
    }

    fn save(&self, path: &Path) -> Result<()> {
        if !self.is_trained() {
            return Err(GestureError::ModelNotReady);
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    fn load(&mut self, path: &Path) -> Result<()> {
        let contents = fs::read_to_string(path)?;
        *self = serde_json::from_str(&contents)?;
        Ok(())
    }

    fn is_trained(&self) -> bool {
        !self.centroids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labeled(frames: Vec<Vec<f64>>, id: &str) -> Sample {
        Sample::from_frames(frames)
            .unwrap()
            .with_gesture_id(Some(id.to_string()))
    }

    #[test]
    fn test_separable_gestures_score_one() {
        let samples = vec![
            labeled(vec![vec![0.0, 0.0], vec![0.0, 1.0]], "low"),
            labeled(vec![vec![0.0, 0.0], vec![0.0, 1.0], vec![0.0, 2.0]], "low"),
            labeled(vec![vec![9.0, 9.0], vec![10.0, 9.0]], "high"),
        ];
        let mut classifier = NearestCentroidClassifier::new(4);
        assert_eq!(classifier.train(&samples).unwrap(), 1.0);

        let query = Sample::from_frames(vec![vec![8.0, 9.5], vec![9.0, 9.0]]).unwrap();
        assert_eq!(classifier.predict(&query).unwrap(), "high");
    }

    #[test]
    fn test_unlabeled_training_sample_rejected() {
        let sample = Sample::from_frames(vec![vec![1.0]]).unwrap();
        let result = NearestCentroidClassifier::default().train(&[sample]);
        assert!(matches!(result, Err(GestureError::MissingGestureId)));
    }

    #[test]
    fn test_failed_retrain_keeps_previous_model() {
        let mut classifier = NearestCentroidClassifier::new(2);
        classifier
            .train(&[labeled(vec![vec![1.0, 2.0, 3.0]], "a")])
            .unwrap();

        let unlabeled = Sample::from_frames(vec![vec![1.0, 2.0]]).unwrap();
        let result = classifier.train(&[labeled(vec![vec![1.0, 2.0]], "b"), unlabeled]);
        assert!(matches!(result, Err(GestureError::MissingGestureId)));

        let query = Sample::from_frames(vec![vec![1.0, 2.0, 3.0]]).unwrap();
        assert_eq!(classifier.predict(&query).unwrap(), "a");
        assert_eq!(classifier.gesture_ids().collect::<Vec<_>>(), vec!["a"]);
    }

    #[test]
    fn test_axis_count_checked_on_predict() {
        let mut classifier = NearestCentroidClassifier::new(2);
        classifier
            .train(&[labeled(vec![vec![1.0, 2.0]], "a")])
            .unwrap();
        let query = Sample::from_frames(vec![vec![1.0, 2.0, 3.0]]).unwrap();
        assert!(matches!(
            classifier.predict(&query),
            Err(GestureError::AxisMismatch { expected: 2, found: 3 })
        ));
    }
}
