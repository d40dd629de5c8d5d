use super::types::SourceEvent;
use crate::core::{ControlEvent, FrameListener};

/// Handle returned by [`FrameDispatcher::attach`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Fans every frame and control event out to all attached listeners,
/// synchronously and in attachment order.
#[derive(Default)]
pub struct FrameDispatcher {
    listeners: Vec<(ListenerId, Box<dyn FrameListener>)>,
    next_id: u64,
}

impl FrameDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&mut self, listener: impl FrameListener + 'static) -> ListenerId {
        self.attach_boxed(Box::new(listener))
    }

    pub fn attach_boxed(&mut self, listener: Box<dyn FrameListener>) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, listener));
        id
    }

    pub fn detach(&mut self, id: ListenerId) -> Option<Box<dyn FrameListener>> {
        let index = self.listeners.iter().position(|(lid, _)| *lid == id)?;
        Some(self.listeners.remove(index).1)
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn notify_frame(&mut self, frame: &[f64]) {
        for (_, listener) in self.listeners.iter_mut() {
            listener.on_frame(frame);
        }
    }

    pub fn notify_event(&mut self, event: ControlEvent) {
        for (_, listener) in self.listeners.iter_mut() {
            listener.on_event(event);
        }
    }

    pub fn dispatch(&mut self, event: &SourceEvent) {
        match event {
            SourceEvent::Frame(frame) => self.notify_frame(frame),
            SourceEvent::Control(event) => self.notify_event(*event),
        }
    }

    /// Tell every listener the source is exhausted
    pub fn finish(&mut self) {
        for (_, listener) in self.listeners.iter_mut() {
            listener.finish();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Recorded {
        frames: Vec<Vec<f64>>,
        events: Vec<ControlEvent>,
    }

    struct MockListener(Arc<Mutex<Recorded>>);

    impl FrameListener for MockListener {
        fn on_frame(&mut self, frame: &[f64]) {
            self.0.lock().unwrap().frames.push(frame.to_vec());
        }

        fn on_event(&mut self, event: ControlEvent) {
            self.0.lock().unwrap().events.push(event);
        }
    }

    #[test]
    fn test_every_listener_gets_every_event() {
        let a = Arc::new(Mutex::new(Recorded::default()));
        let b = Arc::new(Mutex::new(Recorded::default()));
        let mut dispatcher = FrameDispatcher::new();
        dispatcher.attach(MockListener(a.clone()));
        dispatcher.attach(MockListener(b.clone()));

        dispatcher.dispatch(&SourceEvent::Control(ControlEvent::Start));
        dispatcher.dispatch(&SourceEvent::Frame(vec![1.0, 2.0]));

        for recorded in [a, b] {
            let recorded = recorded.lock().unwrap();
            assert_eq!(recorded.events, vec![ControlEvent::Start]);
            assert_eq!(recorded.frames, vec![vec![1.0, 2.0]]);
        }
    }

    #[test]
    fn test_detached_listener_is_not_notified() {
        let a = Arc::new(Mutex::new(Recorded::default()));
        let mut dispatcher = FrameDispatcher::new();
        let id = dispatcher.attach(MockListener(a.clone()));
        assert!(dispatcher.detach(id).is_some());
        assert!(dispatcher.is_empty());

        dispatcher.notify_event(ControlEvent::Stop);
        assert!(a.lock().unwrap().events.is_empty());
    }
}
