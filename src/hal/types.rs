use crate::core::{ControlEvent, Frame};
use serde::{Deserialize, Serialize};

/// One item read from a frame source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SourceEvent {
    Frame(Frame),
    Control(ControlEvent),
}

/// Lifecycle of a frame source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceState {
    Unopened,
    Opened,
    Closed,
}
