use super::gradient::frame_intensity;
use crate::core::Sample;

/// Drop the quiet head and tail of a sample.
///
/// The first frame whose intensity exceeds `threshold` starts the kept range
/// (inclusive); scanning backwards, the first frame above `threshold` ends it
/// (exclusive). When no frame exceeds the threshold the sample is returned
/// unchanged.
pub fn trim(sample: &Sample, threshold: f64) -> Sample {
    let intensity = frame_intensity(sample);

    let start = match intensity.iter().position(|v| *v > threshold) {
        Some(start) => start,
        None => return sample.clone(),
    };
    let from_end = intensity
        .iter()
        .rev()
        .position(|v| *v > threshold)
        .unwrap_or(0);

    sample.slice_frames(start, intensity.len() - 1 - from_end)
}
