use super::dispatcher::FrameDispatcher;
use super::types::SourceEvent;
use crate::core::ControlEvent;
use crate::error::Result;
use log::{debug, trace};
use std::io::BufRead;

pub const BATCH_START: &str = "STARTING BATCH";
pub const BATCH_STOP: &str = "CLOSING BATCH";

/// Text protocol spoken by the sensor firmware, one message per line:
///
/// ```text
/// STARTING BATCH
/// START -36 1968 16060 -108 258 -136 END
/// CLOSING BATCH
/// ```
///
/// An empty line is what a serial read returns on timeout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineProtocol {
    /// Exact number of values a data line must carry; any count >= 1 when unset
    pub expected_axes: Option<usize>,
}

impl LineProtocol {
    pub fn new(expected_axes: Option<usize>) -> Self {
        Self { expected_axes }
    }

    pub fn parse_line(&self, line: &str) -> SourceEvent {
        let line = line.trim_end_matches(&['\r', '\n'][..]);

        if line == BATCH_START {
            return SourceEvent::Control(ControlEvent::Start);
        }
        if line == BATCH_STOP {
            return SourceEvent::Control(ControlEvent::Stop);
        }
        if line.is_empty() {
            return SourceEvent::Control(ControlEvent::Timeout);
        }
        if line.starts_with("START") && line.ends_with("END") {
            return self.parse_values(line);
        }

        debug!("line protocol: unrecognized line {:?}", line);
        SourceEvent::Control(ControlEvent::Error)
    }

    fn parse_values(&self, line: &str) -> SourceEvent {
        // Single-space separated; a doubled space yields an empty token
        let tokens: Vec<&str> = line.split(' ').collect();
        if tokens.len() < 2 || tokens[0] != "START" || tokens[tokens.len() - 1] != "END" {
            return SourceEvent::Control(ControlEvent::Error);
        }

        let values = &tokens[1..tokens.len() - 1];
        let count_ok = match self.expected_axes {
            Some(expected) => values.len() == expected,
            None => !values.is_empty(),
        };
        if !count_ok {
            debug!("line protocol: data line with {} values rejected", values.len());
            return SourceEvent::Control(ControlEvent::Error);
        }

        match values.iter().map(|v| v.parse::<f64>()).collect::<std::result::Result<Vec<f64>, _>>() {
            Ok(frame) => SourceEvent::Frame(frame),
            Err(_) => SourceEvent::Control(ControlEvent::Error),
        }
    }

    /// Feed every line of `reader` to `dispatcher` and return the number of
    /// dispatched events. Flushing the listeners afterwards is up to the caller.
    pub fn replay<R: BufRead>(&self, mut reader: R, dispatcher: &mut FrameDispatcher) -> Result<usize> {
        let mut line = Vec::new();
        let mut count = 0;

        loop {
            line.clear();
            if reader.read_until(b'\n', &mut line)? == 0 {
                break;
            }
            let text = String::from_utf8_lossy(&line);
            trace!("line protocol: {:?}", text);
            dispatcher.dispatch(&self.parse_line(&text));
            count += 1;
        }

        Ok(count)
    }
}
