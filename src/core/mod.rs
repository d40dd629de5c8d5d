pub mod node;
pub mod sample;

pub use node::{FrameListener, Receiver, ReceiverId, Sender, Stage, StageNode};
pub use sample::{ControlEvent, Frame, Sample};
