//! Per-sample numeric transforms.
//!
//! Every transform takes the sample by reference (or by value when it only
//! rewrites values) and returns a new sample, so a sample shared by sibling
//! stages is never modified behind their back.

pub mod fft;
pub mod gradient;
pub mod scale;
pub mod trim;

pub use fft::{fft_magnitude, LOW_BINS};
pub use gradient::{activity, frame_intensity, gradient};
pub use scale::{absolute, normalize, scale_frames, subtract};
pub use trim::trim;
