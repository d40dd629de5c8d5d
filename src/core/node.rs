use super::{ControlEvent, Sample};
use crate::observability::StageMetrics;
use anyhow::Result;
use serde_json::Value;
use std::sync::Arc;

/// Anything that accepts one sample at a time: stages, recorders, predictors, sinks
pub trait Receiver: Send {
    fn receive(&mut self, sample: Sample);

    /// Called once when the upstream has no more samples to send
    fn finish(&mut self) {}
}

/// Consumer of the raw frame stream produced by a frame source
pub trait FrameListener: Send {
    fn on_frame(&mut self, frame: &[f64]);

    fn on_event(&mut self, event: ControlEvent);

    /// Called once when the source is exhausted
    fn finish(&mut self) {}
}

/// Base trait for all processing stages in the pipeline
pub trait Stage: Send {
    /// Called once when the stage is instantiated with config from JSON
    fn on_create(&mut self, _config: Value) -> Result<()> {
        Ok(())
    }

    /// Transform one sample. Returning `None` suppresses it: nothing is
    /// forwarded and the rest of this branch does not run.
    fn process(&mut self, sample: Sample) -> Option<Sample> {
        Some(sample)
    }

    /// Emit whatever the stage is still holding back
    fn flush(&mut self) -> Option<Sample> {
        None
    }
}

/// Handle returned by [`Sender::attach`], used to detach that exact receiver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReceiverId(u64);

/// Ordered fan-out list of downstream receivers
#[derive(Default)]
pub struct Sender {
    receivers: Vec<(ReceiverId, Box<dyn Receiver>)>,
    next_id: u64,
}

impl Sender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&mut self, receiver: Box<dyn Receiver>) -> ReceiverId {
        let id = ReceiverId(self.next_id);
        self.next_id += 1;
        self.receivers.push((id, receiver));
        id
    }

    /// Remove and hand back the receiver registered under `id`
    pub fn detach(&mut self, id: ReceiverId) -> Option<Box<dyn Receiver>> {
        let index = self.receivers.iter().position(|(rid, _)| *rid == id)?;
        Some(self.receivers.remove(index).1)
    }

    pub fn len(&self) -> usize {
        self.receivers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receivers.is_empty()
    }

    /// Push `sample` to every receiver, in attachment order.
    ///
    /// Siblings get clones sharing one matrix; a receiver that mutates its
    /// copy triggers copy-on-write and never affects the others.
    pub fn notify(&mut self, sample: Sample) {
        if let Some(((_, last), rest)) = self.receivers.split_last_mut() {
            for (_, receiver) in rest.iter_mut() {
                receiver.receive(sample.clone());
            }
            last.receive(sample);
        }
    }

    pub fn finish(&mut self) {
        for (_, receiver) in self.receivers.iter_mut() {
            receiver.finish();
        }
    }
}

/// A stage plus its downstream fan-out
pub struct StageNode {
    stage: Box<dyn Stage>,
    downstream: Sender,
    metrics: Option<Arc<StageMetrics>>,
}

impl StageNode {
    pub fn new(stage: impl Stage + 'static) -> Self {
        Self::from_boxed(Box::new(stage))
    }

    pub fn from_boxed(stage: Box<dyn Stage>) -> Self {
        Self {
            stage,
            downstream: Sender::new(),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<StageMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn attach(&mut self, receiver: impl Receiver + 'static) -> ReceiverId {
        self.downstream.attach(Box::new(receiver))
    }

    pub fn attach_boxed(&mut self, receiver: Box<dyn Receiver>) -> ReceiverId {
        self.downstream.attach(receiver)
    }

    pub fn detach(&mut self, id: ReceiverId) -> Option<Box<dyn Receiver>> {
        self.downstream.detach(id)
    }

    pub fn downstream_len(&self) -> usize {
        self.downstream.len()
    }

    fn forward(&mut self, output: Option<Sample>) {
        match output {
            Some(sample) => {
                if let Some(metrics) = &self.metrics {
                    metrics.record_forwarded();
                }
                self.downstream.notify(sample);
            }
            None => {
                if let Some(metrics) = &self.metrics {
                    metrics.record_suppressed();
                }
            }
        }
    }
}

impl Receiver for StageNode {
    fn receive(&mut self, sample: Sample) {
        let output = match &self.metrics {
            Some(metrics) => {
                metrics.record_received();
                let start = metrics.start_processing();
                let output = self.stage.process(sample);
                metrics.finish_processing(start);
                output
            }
            None => self.stage.process(sample),
        };
        self.forward(output);
    }

    fn finish(&mut self) {
        if let Some(sample) = self.stage.flush() {
            self.forward(Some(sample));
        }
        self.downstream.finish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Collect(Arc<Mutex<Vec<Sample>>>);

    impl Receiver for Collect {
        fn receive(&mut self, sample: Sample) {
            self.0.lock().unwrap().push(sample);
        }
    }

    struct Negate;

    impl Stage for Negate {
        fn process(&mut self, sample: Sample) -> Option<Sample> {
            Some(sample.map_values(|v| -v))
        }
    }

    struct DropAll;

    impl Stage for DropAll {
        fn process(&mut self, _sample: Sample) -> Option<Sample> {
            None
        }
    }

    fn sample() -> Sample {
        Sample::from_frames(vec![vec![1.0, 2.0]]).unwrap()
    }

    #[test]
    fn test_fan_out_in_attachment_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut sender = Sender::new();
        sender.attach(Box::new(Collect(seen.clone())));
        sender.attach(Box::new(Collect(seen.clone())));

        sender.notify(sample());

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert!(seen[0].shares_data_with(&seen[1]));
    }

    #[test]
    fn test_detach_by_identity() {
        let first = Arc::new(Mutex::new(Vec::new()));
        let second = Arc::new(Mutex::new(Vec::new()));
        let mut sender = Sender::new();
        let id = sender.attach(Box::new(Collect(first.clone())));
        sender.attach(Box::new(Collect(second.clone())));

        assert!(sender.detach(id).is_some());
        assert!(sender.detach(id).is_none());
        sender.notify(sample());

        assert!(first.lock().unwrap().is_empty());
        assert_eq!(second.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_mutating_sibling_does_not_alias() {
        let plain = Arc::new(Mutex::new(Vec::new()));
        let negated = Arc::new(Mutex::new(Vec::new()));

        let mut negate = StageNode::new(Negate);
        negate.attach(Collect(negated.clone()));

        let mut sender = Sender::new();
        sender.attach(Box::new(negate));
        sender.attach(Box::new(Collect(plain.clone())));
        sender.notify(sample());

        assert_eq!(plain.lock().unwrap()[0].as_slice(), &[1.0, 2.0]);
        assert_eq!(negated.lock().unwrap()[0].as_slice(), &[-1.0, -2.0]);
    }

    #[test]
    fn test_suppressed_sample_stops_branch() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut node = StageNode::new(DropAll);
        let mut tail = StageNode::new(Negate);
        tail.attach(Collect(seen.clone()));
        node.attach(tail);

        node.receive(sample());

        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_metrics_count_forwarded_and_suppressed() {
        let metrics = Arc::new(StageMetrics::new("drop"));
        let mut node = StageNode::new(DropAll).with_metrics(metrics.clone());
        node.receive(sample());
        node.receive(sample());

        assert_eq!(metrics.samples_received(), 2);
        assert_eq!(metrics.samples_suppressed(), 2);
        assert_eq!(metrics.samples_forwarded(), 0);
    }
}
