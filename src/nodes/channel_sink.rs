use crate::core::{Receiver, Sample};
use crossbeam_channel::{bounded, unbounded, Receiver as ChannelReceiver, Sender as ChannelSender};
use log::warn;

/// Terminal consumer that forwards samples over a crossbeam channel,
/// typically to a thread that plots, logs or stores them.
pub struct ChannelSink {
    tx: ChannelSender<Sample>,
}

impl ChannelSink {
    pub fn unbounded() -> (Self, ChannelReceiver<Sample>) {
        let (tx, rx) = unbounded();
        (Self { tx }, rx)
    }

    /// A full channel blocks the pipeline until the consumer catches up
    pub fn bounded(capacity: usize) -> (Self, ChannelReceiver<Sample>) {
        let (tx, rx) = bounded(capacity);
        (Self { tx }, rx)
    }
}

impl Receiver for ChannelSink {
    fn receive(&mut self, sample: Sample) {
        if self.tx.send(sample).is_err() {
            warn!("channel sink: receiver disconnected, dropping sample");
        }
    }
}
