//! Streaming gesture segmentation: frames in, labeled samples out.
//!
//! A frame source feeds a [`hal::FrameDispatcher`], an assembler groups
//! frames into [`core::Sample`]s, and a tree of stages filters and
//! transforms them on the way to terminal consumers such as recorders and
//! predictors.

pub mod assemblers;
pub mod classifier;
pub mod consumers;
pub mod core;
pub mod engine;
pub mod error;
pub mod hal;
pub mod nodes;
pub mod observability;
pub mod registry;
pub mod transforms;

pub use error::{GestureError, Result};
