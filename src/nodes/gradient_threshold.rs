use crate::core::{Sample, Stage};
use crate::transforms::{activity, trim};
use anyhow::{ensure, Result};
use gesturelab_macros::StageNode;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Gradient-threshold gate.
///
/// A sample is active when `|mean(gradient)|` reaches `threshold`. Without
/// grouping, active samples pass and inactive ones are suppressed. With
/// grouping, a burst of active samples is buffered and released as one
/// combined sample by the first inactive sample that follows it; up to
/// `sample_group_delay` consecutive inactive samples are absorbed into the
/// burst first, so short dips don't split a gesture.
///
/// A burst still buffered when the stream ends is only released by
/// [`Stage::flush`].
#[derive(StageNode, Debug, Clone, Serialize, Deserialize)]
#[node_meta(name = "Gradient Threshold", category = "Filters")]
#[serde(default)]
pub struct GradientThreshold {
    #[param(default = "10.0", min = 0.0)]
    pub threshold: f64,

    #[param(default = "false")]
    pub group: bool,

    #[param(default = "2", min = 0.0)]
    pub sample_group_delay: usize,

    #[param(default = "false")]
    pub autotrim: bool,

    #[param(default = "10.0", min = 0.0)]
    pub trim_threshold: f64,

    #[serde(skip)]
    buffer: Option<Sample>,

    #[serde(skip)]
    group_delay_counter: usize,
}

impl Default for GradientThreshold {
    fn default() -> Self {
        Self {
            threshold: 10.0,
            group: false,
            sample_group_delay: 2,
            autotrim: false,
            trim_threshold: 10.0,
            buffer: None,
            group_delay_counter: 0,
        }
    }
}

impl GradientThreshold {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            ..Self::default()
        }
    }

    pub fn grouped(threshold: f64, sample_group_delay: usize) -> Self {
        Self {
            threshold,
            group: true,
            sample_group_delay,
            ..Self::default()
        }
    }

    pub fn with_autotrim(mut self, trim_threshold: f64) -> Self {
        self.autotrim = true;
        self.trim_threshold = trim_threshold;
        self
    }

    /// Frames currently held back in the burst buffer
    pub fn buffered_frames(&self) -> usize {
        self.buffer.as_ref().map(Sample::frame_count).unwrap_or(0)
    }

    fn add_to_buffer(&mut self, sample: &Sample) {
        match &mut self.buffer {
            None => self.buffer = Some(sample.clone().with_gesture_id(None)),
            Some(buffer) => {
                if let Err(e) = buffer.concat(sample) {
                    warn!("gradient threshold: not grouping sample: {}", e);
                }
            }
        }
    }

    fn release_group(&mut self, gesture_id: Option<String>) -> Option<Sample> {
        let grouped = self.buffer.take()?.with_gesture_id(gesture_id);
        self.group_delay_counter = 0;

        debug!("gradient threshold: releasing group of {} frames", grouped.frame_count());

        if self.autotrim {
            Some(trim(&grouped, self.trim_threshold))
        } else {
            Some(grouped)
        }
    }
}

impl Stage for GradientThreshold {
    fn on_create(&mut self, config: Value) -> Result<()> {
        super::configure(self, config)?;
        ensure!(self.threshold.is_finite(), "threshold must be a finite number");
        ensure!(self.trim_threshold.is_finite(), "trim_threshold must be a finite number");
        Ok(())
    }

    fn process(&mut self, sample: Sample) -> Option<Sample> {
        let average = activity(&sample);
        debug!("gradient threshold: average {:.3} (threshold {})", average, self.threshold);

        if average >= self.threshold {
            self.group_delay_counter = 0;
            if !self.group {
                return Some(sample);
            }
            self.add_to_buffer(&sample);
            return None;
        }

        if !self.group {
            return None;
        }

        if self.buffer.is_some() && self.group_delay_counter < self.sample_group_delay {
            self.add_to_buffer(&sample);
            self.group_delay_counter += 1;
            return None;
        }

        self.release_group(sample.gesture_id)
    }

    fn flush(&mut self) -> Option<Sample> {
        self.release_group(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// One-axis sample whose activity equals `slope`
    fn ramp(slope: f64, start: f64) -> Sample {
        Sample::from_frames((0..4).map(|i| vec![start + slope * i as f64]).collect()).unwrap()
    }

    #[test]
    fn test_ungrouped_pass_and_suppress() {
        let mut gate = GradientThreshold::new(5.0);
        let active = ramp(10.0, 0.0);
        assert_eq!(gate.process(active.clone()), Some(active));
        assert_eq!(gate.process(ramp(1.0, 0.0)), None);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let mut gate = GradientThreshold::new(10.0);
        assert!(gate.process(ramp(10.0, 0.0)).is_some());
        assert!(gate.process(ramp(-10.0, 0.0)).is_some());
    }

    #[test]
    fn test_empty_sample_is_inactive() {
        let mut gate = GradientThreshold::new(0.5);
        assert_eq!(gate.process(Sample::empty(3)), None);
    }

    #[test]
    fn test_inactive_without_burst_is_not_absorbed() {
        let mut gate = GradientThreshold::grouped(5.0, 2);
        assert_eq!(gate.process(ramp(0.0, 1.0)), None);
        assert_eq!(gate.buffered_frames(), 0);
    }

    #[test]
    fn test_group_takes_label_of_closing_sample() {
        let mut gate = GradientThreshold::grouped(5.0, 0);
        gate.process(ramp(10.0, 0.0).with_gesture_id(Some("ignored".to_string())));
        let closing = ramp(0.0, 0.0).with_gesture_id(Some("circle".to_string()));
        let grouped = gate.process(closing).unwrap();
        assert_eq!(grouped.gesture_id.as_deref(), Some("circle"));
    }

    #[test]
    fn test_counter_resets_on_active_sample() {
        let mut gate = GradientThreshold::grouped(5.0, 1);
        assert!(gate.process(ramp(10.0, 0.0)).is_none());
        assert!(gate.process(ramp(0.0, 0.0)).is_none());
        assert!(gate.process(ramp(10.0, 0.0)).is_none());
        assert!(gate.process(ramp(0.0, 0.0)).is_none());
        let grouped = gate.process(ramp(0.0, 0.0)).unwrap();
        assert_eq!(grouped.frame_count(), 16);
    }

    #[test]
    fn test_flush_releases_pending_burst() {
        let mut gate = GradientThreshold::grouped(5.0, 3);
        gate.process(ramp(10.0, 0.0));
        assert_eq!(gate.buffered_frames(), 4);
        assert_eq!(gate.flush().unwrap().frame_count(), 4);
        assert!(gate.flush().is_none());
    }

    #[test]
    fn test_on_create_reads_config() {
        let mut gate = GradientThreshold::default();
        gate.on_create(serde_json::json!({"threshold": 3.5, "group": true})).unwrap();
        assert_eq!(gate.threshold, 3.5);
        assert!(gate.group);
        assert_eq!(gate.sample_group_delay, 2);
    }
}
