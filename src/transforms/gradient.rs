use crate::core::Sample;

/// Derivative of every axis along the time axis, row-major like the sample.
///
/// Interior frames use central differences, the first and last frame use
/// one-sided differences. Fewer than two frames give an all-zero gradient.
pub fn gradient(sample: &Sample) -> Vec<f64> {
    let frames = sample.frame_count();
    let axes = sample.axis_count();
    let data = sample.as_slice();

    if frames < 2 {
        return vec![0.0; data.len()];
    }

    let at = |frame: usize, axis: usize| data[frame * axes + axis];
    let mut out = Vec::with_capacity(data.len());

    for frame in 0..frames {
        for axis in 0..axes {
            let value = if frame == 0 {
                at(1, axis) - at(0, axis)
            } else if frame == frames - 1 {
                at(frame, axis) - at(frame - 1, axis)
            } else {
                (at(frame + 1, axis) - at(frame - 1, axis)) / 2.0
            };
            out.push(value);
        }
    }

    out
}

/// `|mean(gradient)|` over the whole sample; 0 for an empty sample.
pub fn activity(sample: &Sample) -> f64 {
    let grad = gradient(sample);
    if grad.is_empty() {
        return 0.0;
    }
    (grad.iter().sum::<f64>() / grad.len() as f64).abs()
}

/// Mean absolute gradient of each frame, averaged across axes
pub fn frame_intensity(sample: &Sample) -> Vec<f64> {
    let axes = sample.axis_count();
    if axes == 0 {
        return Vec::new();
    }

    gradient(sample)
        .chunks(axes)
        .map(|row| row.iter().map(|v| v.abs()).sum::<f64>() / axes as f64)
        .collect()
}
