use super::types::{DeviceState, SourceEvent};
use anyhow::Result;
use async_trait::async_trait;

/// A producer of frames and control events, e.g. a serial link
#[async_trait]
pub trait DeviceSource: Send {
    /// Acquire the underlying connection
    async fn open(&mut self) -> Result<()>;

    /// Next event, or `None` once the source is exhausted
    async fn read_event(&mut self) -> Result<Option<SourceEvent>>;

    /// Release the underlying connection
    async fn close(&mut self) -> Result<()>;

    fn state(&self) -> DeviceState;
}
