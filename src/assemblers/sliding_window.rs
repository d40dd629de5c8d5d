use crate::core::{ControlEvent, FrameListener, Receiver, ReceiverId, Sample, Sender};
use crate::error::{GestureError, Result};
use log::{debug, warn};
use std::collections::VecDeque;

/// Emits overlapping windows of `window` frames, advancing by `step` frames.
///
/// There is no START-driven reset: the assembler is always collecting. A STOP
/// emits whatever is buffered, even a partial window, and empties the buffer.
pub struct SlidingWindowAssembler {
    axes: usize,
    window: usize,
    step: usize,
    buffer: VecDeque<f64>,
    downstream: Sender,
}

impl SlidingWindowAssembler {
    pub fn new(axes: usize, window: usize, step: usize) -> Result<Self> {
        if window == 0 {
            return Err(GestureError::InvalidConfig(
                "window must be at least 1 frame".to_string(),
            ));
        }
        if step == 0 {
            return Err(GestureError::InvalidConfig(
                "step must be at least 1 frame".to_string(),
            ));
        }
        if step > window {
            return Err(GestureError::InvalidConfig(format!(
                "step ({}) can't be greater than window ({})",
                step, window
            )));
        }

        Ok(Self {
            axes,
            window,
            step,
            buffer: VecDeque::with_capacity(window * axes),
            downstream: Sender::new(),
        })
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

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn buffered_frames(&self) -> usize {
        self.buffer.len() / self.axes.max(1)
    }

    fn package_sample(&self) -> Sample {
        let data: Vec<f64> = self.buffer.iter().copied().collect();
        Sample::from_flat(self.axes, data).unwrap_or_else(|_| Sample::empty(self.axes))
    }
}

impl FrameListener for SlidingWindowAssembler {
    fn on_frame(&mut self, frame: &[f64]) {
        if frame.len() != self.axes {
            warn!(
                "sliding window assembler: dropping frame with {} values, expected {}",
                frame.len(),
                self.axes
            );
            return;
        }
        self.buffer.extend(frame.iter().copied());

        if self.buffered_frames() >= self.window {
            let sample = self.package_sample();
            debug!("sliding window assembler: emitting window of {} frames", sample.frame_count());
            self.downstream.notify(sample);
            self.buffer.drain(..self.step * self.axes);
        }
    }

    fn on_event(&mut self, event: ControlEvent) {
        match event {
            ControlEvent::Stop => {
                let sample = self.package_sample();
                debug!("sliding window assembler: STOP, emitting {} frames", sample.frame_count());
                self.buffer.clear();
                self.downstream.notify(sample);
            }
            ControlEvent::Start | ControlEvent::Error | ControlEvent::Timeout => {
                debug!("sliding window assembler: ignoring {:?}", event);
            }
        }
    }

    fn finish(&mut self) {
        self.downstream.finish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::ChannelSink;

    #[test]
    fn test_step_greater_than_window_is_rejected() {
        assert!(matches!(
            SlidingWindowAssembler::new(3, 4, 5),
            Err(GestureError::InvalidConfig(_))
        ));
        assert!(SlidingWindowAssembler::new(3, 4, 0).is_err());
        assert!(SlidingWindowAssembler::new(3, 0, 0).is_err());
        assert!(SlidingWindowAssembler::new(3, 4, 4).is_ok());
    }

    #[test]
    fn test_carry_over_after_emission() {
        let (sink, rx) = ChannelSink::unbounded();
        let mut assembler = SlidingWindowAssembler::new(1, 3, 1).unwrap();
        assembler.attach(sink);

        for v in 1..=3 {
            assembler.on_frame(&[v as f64]);
        }
        assert_eq!(rx.try_recv().unwrap().as_slice(), &[1.0, 2.0, 3.0]);
        assert_eq!(assembler.buffered_frames(), 2);

        assembler.on_frame(&[4.0]);
        assert_eq!(rx.try_recv().unwrap().as_slice(), &[2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_start_does_not_reset() {
        let (sink, rx) = ChannelSink::unbounded();
        let mut assembler = SlidingWindowAssembler::new(1, 2, 2).unwrap();
        assembler.attach(sink);

        assembler.on_frame(&[1.0]);
        assembler.on_event(ControlEvent::Start);
        assembler.on_frame(&[2.0]);

        assert_eq!(rx.try_recv().unwrap().as_slice(), &[1.0, 2.0]);
    }

    #[test]
    fn test_stop_flushes_partial_window() {
        let (sink, rx) = ChannelSink::unbounded();
        let mut assembler = SlidingWindowAssembler::new(2, 4, 2).unwrap();
        assembler.attach(sink);

        assembler.on_frame(&[1.0, 1.0]);
        assembler.on_event(ControlEvent::Stop);

        let sample = rx.try_recv().unwrap();
        assert_eq!(sample.frame_count(), 1);
        assert_eq!(assembler.buffered_frames(), 0);
    }
}
