pub mod absolute_scale;
pub mod channel_sink;
pub mod fft;
pub mod gradient_threshold;
pub mod min_length;
pub mod normalize;
pub mod passthrough;
pub mod trimmer;
pub mod verbose;

pub use absolute_scale::AbsoluteScale;
pub use channel_sink::ChannelSink;
pub use fft::Fft;
pub use gradient_threshold::GradientThreshold;
pub use min_length::MinLength;
pub use normalize::Normalize;
pub use passthrough::Passthrough;
pub use trimmer::Trimmer;
pub use verbose::Verbose;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Overwrite a stage's parameters from a JSON object.
///
/// Missing fields fall back to the stage defaults and unknown fields are
/// ignored; `null` leaves the stage untouched.
pub(crate) fn configure<T: DeserializeOwned>(stage: &mut T, config: Value) -> Result<()> {
    if config.is_null() {
        return Ok(());
    }
    *stage = serde_json::from_value(config).with_context(|| {
        format!("Invalid config for {}", std::any::type_name::<T>())
    })?;
    Ok(())
}
