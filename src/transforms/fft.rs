use crate::core::Sample;
use rustfft::{num_complex::Complex, FftPlanner};

/// Number of low-frequency bins dropped by [`fft_magnitude`] when asked to
pub const LOW_BINS: usize = 10;

/// Real FFT magnitude of every axis along the time axis.
///
/// The spectrum has `frames / 2 + 1` bins per axis. With `drop_low_bins` the
/// first [`LOW_BINS`] bins (dominated by the DC offset) are discarded. With
/// `append` the spectrum frames are added after the original frames instead
/// of replacing them.
pub fn fft_magnitude(sample: &Sample, drop_low_bins: bool, append: bool) -> Sample {
    let frames = sample.frame_count();
    let axes = sample.axis_count();

    if frames == 0 {
        return sample.clone();
    }

    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(frames);
    let num_bins = frames / 2 + 1;
    let skip = if drop_low_bins { LOW_BINS.min(num_bins) } else { 0 };

    let mut spectra = Vec::with_capacity(axes);
    for axis in 0..axes {
        let mut buffer: Vec<Complex<f64>> = sample
            .column(axis)
            .into_iter()
            .map(|v| Complex::new(v, 0.0))
            .collect();
        fft.process(&mut buffer);
        spectra.push(
            buffer
                .iter()
                .take(num_bins)
                .skip(skip)
                .map(|bin| bin.norm())
                .collect::<Vec<f64>>(),
        );
    }

    let kept_bins = num_bins - skip;
    let mut data = if append {
        sample.linearized()
    } else {
        Vec::with_capacity(kept_bins * axes)
    };
    for bin in 0..kept_bins {
        for spectrum in &spectra {
            data.push(spectrum[bin]);
        }
    }

    Sample::from_flat(axes, data)
        .unwrap_or_else(|_| Sample::empty(axes))
        .with_gesture_id(sample.gesture_id.clone())
}
