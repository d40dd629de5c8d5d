use crate::core::Sample;

/// Resample a sample to exactly `target` frames.
///
/// Samples with two or more axes are interpolated linearly over the
/// (frame, axis) grid; since the axis grid is kept as is, this reduces to
/// linear interpolation of each axis along time. Single-axis samples use
/// zero-order hold: every output frame repeats the closest preceding input
/// frame.
pub fn scale_frames(sample: &Sample, target: usize) -> Sample {
    let frames = sample.frame_count();
    let axes = sample.axis_count();

    if frames == 0 {
        return sample.clone();
    }

    let data = if axes == 1 {
        zero_hold(sample.as_slice(), target)
    } else {
        linear_grid(sample, target)
    };

    // `data.len()` is a multiple of `axes` by construction
    Sample::from_flat(axes, data)
        .unwrap_or_else(|_| Sample::empty(axes))
        .with_gesture_id(sample.gesture_id.clone())
}

fn linear_grid(sample: &Sample, target: usize) -> Vec<f64> {
    let frames = sample.frame_count();
    let axes = sample.axis_count();
    let mut out = Vec::with_capacity(target * axes);

    for i in 0..target {
        let position = if target > 1 {
            (i * (frames - 1)) as f64 / (target - 1) as f64
        } else {
            0.0
        };
        let lo = position.floor() as usize;
        let hi = (lo + 1).min(frames - 1);
        let frac = position - lo as f64;

        for axis in 0..axes {
            let a = sample.get(lo, axis).unwrap_or(0.0);
            let b = sample.get(hi, axis).unwrap_or(0.0);
            out.push(a + (b - a) * frac);
        }
    }

    out
}

fn zero_hold(values: &[f64], target: usize) -> Vec<f64> {
    let frames = values.len();
    (0..target)
        .map(|i| {
            let index = if target > 1 { i * (frames - 1) / (target - 1) } else { 0 };
            values[index]
        })
        .collect()
}

pub fn absolute(sample: Sample) -> Sample {
    sample.map_values(f64::abs)
}

/// Subtract one offset per axis; axes without an offset are left alone
pub fn subtract(mut sample: Sample, offsets: &[f64]) -> Sample {
    let axes = sample.axis_count();
    if axes == 0 || offsets.is_empty() {
        return sample;
    }
    for row in sample.data_mut().chunks_mut(axes) {
        for (value, offset) in row.iter_mut().zip(offsets) {
            *value -= offset;
        }
    }
    sample
}

/// Min-max normalize each axis into [0, 1]; a constant axis becomes all zeros
pub fn normalize(mut sample: Sample) -> Sample {
    let axes = sample.axis_count();
    if sample.is_empty() {
        return sample;
    }

    let mut bounds = vec![(f64::INFINITY, f64::NEG_INFINITY); axes];
    for row in sample.frames() {
        for (axis, value) in row.iter().enumerate() {
            bounds[axis].0 = bounds[axis].0.min(*value);
            bounds[axis].1 = bounds[axis].1.max(*value);
        }
    }

    for row in sample.data_mut().chunks_mut(axes) {
        for (value, (min, max)) in row.iter_mut().zip(&bounds) {
            let range = max - min;
            *value = if range > 0.0 { (*value - min) / range } else { 0.0 };
        }
    }
    sample
}
