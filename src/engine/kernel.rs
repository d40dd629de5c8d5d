use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::future::Future;

use crate::hal::{DeviceSource, DeviceState, FrameDispatcher, SourceEvent};

/// What happened during one [`drive`] run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub frames: u64,
    pub control_events: u64,
    /// True when the shutdown signal fired before the source ran dry
    pub interrupted: bool,
}

impl RunSummary {
    pub fn events(&self) -> u64 {
        self.frames + self.control_events
    }
}

/// Read `source` to the end, dispatching every event synchronously.
///
/// Opens the source if needed and closes it afterwards, also when a read
/// fails. The dispatcher is not finished, so held-back samples stay held
/// back until the caller flushes.
pub async fn drive<S>(source: &mut S, dispatcher: &mut FrameDispatcher) -> Result<RunSummary>
where
    S: DeviceSource + ?Sized,
{
    drive_until(source, dispatcher, std::future::pending::<()>()).await
}

/// Like [`drive`], but stops early once `shutdown` completes
pub async fn drive_until<S, F>(
    source: &mut S,
    dispatcher: &mut FrameDispatcher,
    shutdown: F,
) -> Result<RunSummary>
where
    S: DeviceSource + ?Sized,
    F: Future<Output = ()>,
{
    if source.state() == DeviceState::Unopened {
        source.open().await.context("Failed to open frame source")?;
    }
    info!("frame source opened");

    let mut summary = RunSummary::default();
    let mut failure = None;
    tokio::pin!(shutdown);

    loop {
        let event = tokio::select! {
            _ = &mut shutdown => {
                debug!("shutdown requested");
                summary.interrupted = true;
                break;
            }
            event = source.read_event() => event,
        };

        match event {
            Ok(Some(event)) => {
                match &event {
                    SourceEvent::Frame(_) => summary.frames += 1,
                    SourceEvent::Control(_) => summary.control_events += 1,
                }
                dispatcher.dispatch(&event);
            }
            Ok(None) => break,
            Err(e) => {
                warn!("frame source read failed: {}", e);
                failure = Some(e.context("Failed to read from frame source"));
                break;
            }
        }
    }

    // The source is closed even when reading failed; the read error wins.
    let closed = source.close().await.context("Failed to close frame source");
    if let Some(e) = failure {
        return Err(e);
    }
    closed?;
    info!(
        "frame source closed after {} frames and {} control events",
        summary.frames, summary.control_events
    );
    Ok(summary)
}
