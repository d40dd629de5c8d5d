use super::protocol::LineProtocol;
use super::traits::DeviceSource;
use super::types::{DeviceState, SourceEvent};
use crate::core::ControlEvent;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::trace;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::time::{timeout, Duration};

/// Frame source reading the line protocol from any async byte stream
/// (a serial port, a TCP socket, a file, stdin).
///
/// When `read_timeout` is set, a line that takes longer than that to arrive
/// yields a TIMEOUT event; the partial line is kept and completed by the
/// next read.
pub struct LineStreamSource<R> {
    reader: R,
    protocol: LineProtocol,
    read_timeout: Option<Duration>,
    line: Vec<u8>,
    state: DeviceState,
}

impl<R> LineStreamSource<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    pub fn new(reader: R, protocol: LineProtocol) -> Self {
        Self {
            reader,
            protocol,
            read_timeout: None,
            line: Vec::new(),
            state: DeviceState::Unopened,
        }
    }

    pub fn with_read_timeout(mut self, read_timeout: Duration) -> Self {
        self.read_timeout = Some(read_timeout);
        self
    }

    fn take_line(&mut self) -> SourceEvent {
        let text = String::from_utf8_lossy(&self.line).into_owned();
        self.line.clear();
        trace!("line stream: {:?}", text);
        self.protocol.parse_line(&text)
    }
}

#[async_trait]
impl<R> DeviceSource for LineStreamSource<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    async fn open(&mut self) -> Result<()> {
        if self.state != DeviceState::Unopened {
            return Err(anyhow!("Cannot open source in state {:?}", self.state));
        }
        self.state = DeviceState::Opened;
        Ok(())
    }

    async fn read_event(&mut self) -> Result<Option<SourceEvent>> {
        if self.state != DeviceState::Opened {
            return Err(anyhow!("Source not open"));
        }

        let read = self.reader.read_until(b'\n', &mut self.line);
        let bytes = match self.read_timeout {
            Some(limit) => match timeout(limit, read).await {
                Ok(result) => result?,
                Err(_) => return Ok(Some(SourceEvent::Control(ControlEvent::Timeout))),
            },
            None => read.await?,
        };

        if bytes == 0 && self.line.is_empty() {
            return Ok(None);
        }
        Ok(Some(self.take_line()))
    }

    async fn close(&mut self) -> Result<()> {
        self.state = DeviceState::Closed;
        Ok(())
    }

    fn state(&self) -> DeviceState {
        self.state
    }
}
