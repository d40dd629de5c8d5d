use crate::core::{ControlEvent, Frame};
use crate::hal::{DeviceSource, DeviceState, SourceEvent};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use tokio::time::{sleep, Duration};

/// Replays a fixed list of events, optionally pausing between them
pub struct ScriptedSource {
    state: DeviceState,
    events: VecDeque<SourceEvent>,
    interval: Option<Duration>,
}

impl ScriptedSource {
    pub fn new(events: impl IntoIterator<Item = SourceEvent>) -> Self {
        Self {
            state: DeviceState::Unopened,
            events: events.into_iter().collect(),
            interval: None,
        }
    }

    /// START, every frame, STOP
    pub fn batch(frames: impl IntoIterator<Item = Frame>) -> Self {
        let mut events = vec![SourceEvent::Control(ControlEvent::Start)];
        events.extend(frames.into_iter().map(SourceEvent::Frame));
        events.push(SourceEvent::Control(ControlEvent::Stop));
        Self::new(events)
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = Some(interval);
        self
    }

    pub fn remaining(&self) -> usize {
        self.events.len()
    }
}

#[async_trait]
impl DeviceSource for ScriptedSource {
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
        if let Some(interval) = self.interval {
            sleep(interval).await;
        }
        Ok(self.events.pop_front())
    }

    async fn close(&mut self) -> Result<()> {
        self.state = DeviceState::Closed;
        Ok(())
    }

    fn state(&self) -> DeviceState {
        self.state
    }
}
