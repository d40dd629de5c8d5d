//! Frame sources: the producer side of the pipeline.

pub mod dispatcher;
pub mod line_stream;
pub mod mock;
pub mod protocol;
pub mod serial;
pub mod traits;
pub mod types;

pub use dispatcher::{FrameDispatcher, ListenerId};
pub use line_stream::LineStreamSource;
pub use protocol::LineProtocol;
pub use traits::DeviceSource;
pub use types::{DeviceState, SourceEvent};
