//! Sample assemblers turn the raw frame stream into samples.

pub mod discrete;
pub mod sliding_window;

pub use discrete::DiscreteAssembler;
pub use sliding_window::SlidingWindowAssembler;

use crate::core::{ControlEvent, FrameListener, Receiver, ReceiverId};
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// JSON description of an assembler
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AssemblerConfig {
    Discrete {
        axes: usize,
    },
    SlidingWindow {
        axes: usize,
        window: usize,
        step: usize,
    },
}

pub enum Assembler {
    Discrete(DiscreteAssembler),
    SlidingWindow(SlidingWindowAssembler),
}

impl Assembler {
    pub fn from_config(config: &AssemblerConfig) -> Result<Self> {
        Ok(match *config {
            AssemblerConfig::Discrete { axes } => Assembler::Discrete(DiscreteAssembler::new(axes)),
            AssemblerConfig::SlidingWindow { axes, window, step } => {
                Assembler::SlidingWindow(SlidingWindowAssembler::new(axes, window, step)?)
            }
        })
    }

    pub fn attach_boxed(&mut self, receiver: Box<dyn Receiver>) -> ReceiverId {
        match self {
            Assembler::Discrete(a) => a.attach_boxed(receiver),
            Assembler::SlidingWindow(a) => a.attach_boxed(receiver),
        }
    }

    pub fn attach(&mut self, receiver: impl Receiver + 'static) -> ReceiverId {
        self.attach_boxed(Box::new(receiver))
    }

    pub fn detach(&mut self, id: ReceiverId) -> Option<Box<dyn Receiver>> {
        match self {
            Assembler::Discrete(a) => a.detach(id),
            Assembler::SlidingWindow(a) => a.detach(id),
        }
    }

    pub fn axes(&self) -> usize {
        match self {
            Assembler::Discrete(a) => a.axes(),
            Assembler::SlidingWindow(a) => a.axes(),
        }
    }
}

impl FrameListener for Assembler {
    fn on_frame(&mut self, frame: &[f64]) {
        match self {
            Assembler::Discrete(a) => a.on_frame(frame),
            Assembler::SlidingWindow(a) => a.on_frame(frame),
        }
    }

    fn on_event(&mut self, event: ControlEvent) {
        match self {
            Assembler::Discrete(a) => a.on_event(event),
            Assembler::SlidingWindow(a) => a.on_event(event),
        }
    }

    fn finish(&mut self) {
        match self {
            Assembler::Discrete(a) => a.finish(),
            Assembler::SlidingWindow(a) => a.finish(),
        }
    }
}
