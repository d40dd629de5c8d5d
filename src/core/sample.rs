use crate::error::{GestureError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// One reading per sensor axis, produced at a single time tick
pub type Frame = Vec<f64>;

/// Out-of-band signals sent by a frame source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControlEvent {
    Start,
    Stop,
    Error,
    Timeout,
}

/// A frame_count x axis_count matrix of consecutive frames, optionally labeled.
///
/// The matrix is stored row-major behind an `Arc`, so cloning a sample for
/// fan-out is cheap. Mutation goes through [`Sample::data_mut`], which copies
/// the matrix first if any other clone still references it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SampleRecord", into = "SampleRecord")]
pub struct Sample {
    data: Arc<Vec<f64>>,
    frames: usize,
    axes: usize,
    pub gesture_id: Option<String>,
}

impl Sample {
    /// Zero-frame sample with a fixed axis count
    pub fn empty(axes: usize) -> Self {
        Self {
            data: Arc::new(Vec::new()),
            frames: 0,
            axes,
            gesture_id: None,
        }
    }

    /// Build a sample from rows; every row must have the same length.
    pub fn from_frames(frames: Vec<Frame>) -> Result<Self> {
        let axes = frames.first().map(|f| f.len()).unwrap_or(0);
        let mut data = Vec::with_capacity(frames.len() * axes);

        for (row, frame) in frames.iter().enumerate() {
            if frame.len() != axes {
                return Err(GestureError::RaggedMatrix {
                    row,
                    expected: axes,
                    found: frame.len(),
                });
            }
            data.extend_from_slice(frame);
        }

        Ok(Self {
            data: Arc::new(data),
            frames: frames.len(),
            axes,
            gesture_id: None,
        })
    }

    /// Build a sample from row-major values.
    pub fn from_flat(axes: usize, data: Vec<f64>) -> Result<Self> {
        if axes == 0 {
            if !data.is_empty() {
                return Err(GestureError::AxisMismatch {
                    expected: 0,
                    found: data.len(),
                });
            }
            return Ok(Self::empty(0));
        }
        if data.len() % axes != 0 {
            return Err(GestureError::RaggedMatrix {
                row: data.len() / axes,
                expected: axes,
                found: data.len() % axes,
            });
        }

        Ok(Self {
            frames: data.len() / axes,
            data: Arc::new(data),
            axes,
            gesture_id: None,
        })
    }

    pub fn with_gesture_id(mut self, gesture_id: Option<String>) -> Self {
        self.gesture_id = gesture_id;
        self
    }

    pub fn frame_count(&self) -> usize {
        self.frames
    }

    pub fn axis_count(&self) -> usize {
        self.axes
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Row-major view of the matrix
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Mutable row-major view, copying the matrix first if it is shared
    pub fn data_mut(&mut self) -> &mut [f64] {
        Arc::make_mut(&mut self.data).as_mut_slice()
    }

    /// True when both samples point at the same matrix allocation
    pub fn shares_data_with(&self, other: &Sample) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }

    pub fn frame(&self, index: usize) -> Option<&[f64]> {
        if index >= self.frames {
            return None;
        }
        let start = index * self.axes;
        Some(&self.data[start..start + self.axes])
    }

    pub fn frames(&self) -> impl Iterator<Item = &[f64]> {
        // axes == 0 only happens with an empty matrix
        self.data.chunks(self.axes.max(1))
    }

    pub fn get(&self, frame: usize, axis: usize) -> Option<f64> {
        if axis >= self.axes {
            return None;
        }
        self.frame(frame).map(|f| f[axis])
    }

    /// All values of one axis, in frame order
    pub fn column(&self, axis: usize) -> Vec<f64> {
        if axis >= self.axes {
            return Vec::new();
        }
        self.frames().map(|f| f[axis]).collect()
    }

    pub fn to_rows(&self) -> Vec<Frame> {
        self.frames().map(|f| f.to_vec()).collect()
    }

    /// Flattened copy of the matrix, as fed to classifiers
    pub fn linearized(&self) -> Vec<f64> {
        self.data.as_ref().clone()
    }

    /// Frames `[start, end)`, clamped to the frame count
    pub fn slice_frames(&self, start: usize, end: usize) -> Sample {
        let end = end.min(self.frames);
        let start = start.min(end);
        Sample {
            data: Arc::new(self.data[start * self.axes..end * self.axes].to_vec()),
            frames: end - start,
            axes: self.axes,
            gesture_id: self.gesture_id.clone(),
        }
    }

    /// Append the frames of `other` after the frames of `self`.
    ///
    /// A zero-frame side never causes an axis mismatch.
    pub fn concat(&mut self, other: &Sample) -> Result<()> {
        if other.frames == 0 {
            return Ok(());
        }
        if self.frames == 0 {
            self.data = other.data.clone();
            self.frames = other.frames;
            self.axes = other.axes;
            return Ok(());
        }
        if self.axes != other.axes {
            return Err(GestureError::AxisMismatch {
                expected: self.axes,
                found: other.axes,
            });
        }

        Arc::make_mut(&mut self.data).extend_from_slice(&other.data);
        self.frames += other.frames;
        Ok(())
    }

    /// Apply `f` to every value
    pub fn map_values(mut self, f: impl Fn(f64) -> f64) -> Sample {
        for value in self.data_mut() {
            *value = f(*value);
        }
        self
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Sample> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}

/// Persisted form of a sample
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SampleRecord {
    gesture_id: Option<String>,
    #[serde(default)]
    axes: usize,
    data: Vec<Frame>,
}

impl From<Sample> for SampleRecord {
    fn from(sample: Sample) -> Self {
        Self {
            data: sample.to_rows(),
            axes: sample.axes,
            gesture_id: sample.gesture_id,
        }
    }
}

impl TryFrom<SampleRecord> for Sample {
    type Error = GestureError;

    fn try_from(record: SampleRecord) -> Result<Self> {
        let sample = if record.data.is_empty() {
            Sample::empty(record.axes)
        } else {
            Sample::from_frames(record.data)?
        };
        Ok(sample.with_gesture_id(record.gesture_id))
    }
}
