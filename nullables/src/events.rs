//! Event recorder for asserting on emitted engine events.

use pledge_settlement::PledgeEvent;
use std::sync::{Arc, Mutex};

/// Collects every [`PledgeEvent`] passed to its listeners.
#[derive(Clone, Default)]
pub struct EventRecorder {
    events: Arc<Mutex<Vec<PledgeEvent>>>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A listener to hand to `PledgeEngine::subscribe`.
    pub fn listener(&self) -> Box<dyn Fn(&PledgeEvent) + Send + Sync> {
        let events = Arc::clone(&self.events);
        Box::new(move |event| events.lock().unwrap().push(event.clone()))
    }

    pub fn events(&self) -> Vec<PledgeEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }
}
