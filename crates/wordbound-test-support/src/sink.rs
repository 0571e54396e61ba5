//! Test sink — collects notifications published during a test.

use std::sync::{Arc, Mutex};

use wordbound_core::notification::{Notification, Subscriber};

/// Records every notification delivered to its subscriber closure.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    received: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A subscriber closure that records into this sink.
    #[must_use]
    pub fn subscriber(&self) -> Subscriber {
        let received = Arc::clone(&self.received);
        Box::new(move |notification| {
            received
                .lock()
                .expect("sink mutex poisoned")
                .push(notification.clone());
        })
    }

    /// All notifications recorded so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn notifications(&self) -> Vec<Notification> {
        self.received.lock().expect("sink mutex poisoned").clone()
    }
}
