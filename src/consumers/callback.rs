use log::info;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub type GestureCallback = Box<dyn FnMut(&str) + Send>;

/// Anything a predictor can hand a predicted gesture id to
pub trait GestureReceiver: Send {
    fn receive_gesture(&mut self, gesture_id: &str);
}

impl<T: GestureReceiver> GestureReceiver for Arc<Mutex<T>> {
    fn receive_gesture(&mut self, gesture_id: &str) {
        // A poisoned lock still holds usable callbacks
        let mut inner = self.lock().unwrap_or_else(|e| e.into_inner());
        inner.receive_gesture(gesture_id);
    }
}

/// Routes each gesture id to the callback registered for it
#[derive(Default)]
pub struct CallbackManager {
    callbacks: HashMap<String, GestureCallback>,
    default_callback: Option<GestureCallback>,
}

impl CallbackManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces any callback already registered for `gesture_id`
    pub fn attach_callback(
        &mut self,
        gesture_id: impl Into<String>,
        callback: impl FnMut(&str) + Send + 'static,
    ) {
        self.callbacks.insert(gesture_id.into(), Box::new(callback));
    }

    pub fn detach_callback(&mut self, gesture_id: &str) -> bool {
        self.callbacks.remove(gesture_id).is_some()
    }

    /// Called for gesture ids with no callback of their own
    pub fn set_default_callback(&mut self, callback: impl FnMut(&str) + Send + 'static) {
        self.default_callback = Some(Box::new(callback));
    }

    pub fn has_callback(&self, gesture_id: &str) -> bool {
        self.callbacks.contains_key(gesture_id)
    }

    pub fn notify_gesture(&mut self, gesture_id: &str) {
        if let Some(callback) = self.callbacks.get_mut(gesture_id) {
            callback(gesture_id);
        } else if let Some(default) = self.default_callback.as_mut() {
            default(gesture_id);
        }
    }
}

impl GestureReceiver for CallbackManager {
    fn receive_gesture(&mut self, gesture_id: &str) {
        info!("received gesture: {}", gesture_id);
        self.notify_gesture(gesture_id);
    }
}
