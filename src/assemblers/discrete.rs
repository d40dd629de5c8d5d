use crate::core::{ControlEvent, FrameListener, Receiver, ReceiverId, Sample, Sender};
use log::{debug, warn};

/// Packages the frames between a START and the following STOP into one sample.
///
/// Frames that arrive outside a START..STOP window are dropped. ERROR and
/// TIMEOUT change nothing.
pub struct DiscreteAssembler {
    axes: usize,
    buffer: Vec<f64>,
    collecting: bool,
    downstream: Sender,
}

impl DiscreteAssembler {
    pub fn new(axes: usize) -> Self {
        Self {
            axes,
            buffer: Vec::new(),
            collecting: false,
            downstream: Sender::new(),
        }
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

    pub fn axes(&self) -> usize {
        self.axes
    }

    pub fn is_collecting(&self) -> bool {
        self.collecting
    }

    pub fn buffered_frames(&self) -> usize {
        self.buffer.len() / self.axes.max(1)
    }

    fn package_sample(&mut self) {
        let data = std::mem::take(&mut self.buffer);
        let sample = Sample::from_flat(self.axes, data).unwrap_or_else(|_| Sample::empty(self.axes));
        debug!("discrete assembler: emitting sample with {} frames", sample.frame_count());
        self.downstream.notify(sample);
    }
}

impl FrameListener for DiscreteAssembler {
    fn on_frame(&mut self, frame: &[f64]) {
        if !self.collecting {
            debug!("discrete assembler: dropping frame received while idle");
            return;
        }
        if frame.len() != self.axes {
            warn!(
                "discrete assembler: dropping frame with {} values, expected {}",
                frame.len(),
                self.axes
            );
            return;
        }
        self.buffer.extend_from_slice(frame);
    }

    fn on_event(&mut self, event: ControlEvent) {
        match event {
            ControlEvent::Start => {
                self.buffer.clear();
                self.collecting = true;
            }
            ControlEvent::Stop => {
                // An idle STOP still emits: the buffer is empty then, and
                // degenerate samples are for downstream stages to reject.
                self.package_sample();
                self.collecting = false;
            }
            ControlEvent::Error | ControlEvent::Timeout => {
                debug!("discrete assembler: ignoring {:?}", event);
            }
        }
    }

    fn finish(&mut self) {
        self.downstream.finish();
    }
}
