//! Audit events emitted after each committed operation.

use pledge_cohort::Outcome;
use pledge_types::{Address, AssetKind, CohortId, StakeKey};
use serde::Serialize;

/// Something the engine committed. Observers cannot influence control flow.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PledgeEvent {
    StakeOpened {
        stake: StakeKey,
        asset: AssetKind,
        cohort: CohortId,
        amount: u128,
        duration_days: u32,
    },
    ProofAccepted {
        stake: StakeKey,
        day: u32,
        achieved: bool,
    },
    Settled {
        stake: StakeKey,
        asset: AssetKind,
        cohort: CohortId,
        outcome: Outcome,
        /// Collateral handed back (the full amount for a win, zero otherwise).
        returned: u128,
        forfeited: u128,
        bonus: u128,
        /// Who actually received `returned + bonus`.
        recipient: Address,
    },
    PoolFinalized {
        cohort: CohortId,
        asset: AssetKind,
        treasury: u128,
        charity: u128,
    },
}

/// Synchronous fan-out of [`PledgeEvent`]s.
///
/// Listeners run inline on the calling thread after the write has committed.
pub struct EventBus {
    listeners: Vec<Box<dyn Fn(&PledgeEvent) + Send + Sync>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&PledgeEvent) + Send + Sync>) {
        self.listeners.push(listener);
    }

    pub fn emit(&self, event: &PledgeEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn every_listener_sees_every_event() {
        let mut bus = EventBus::new();
        let seen = Arc::new(AtomicUsize::new(0));
        for _ in 0..2 {
            let seen = Arc::clone(&seen);
            bus.subscribe(Box::new(move |_| {
                seen.fetch_add(1, Ordering::SeqCst);
            }));
        }
        bus.emit(&PledgeEvent::ProofAccepted {
            stake: StakeKey::single(Address::new("alice")),
            day: 0,
            achieved: true,
        });
        assert_eq!(seen.load(Ordering::SeqCst), 2);
        assert_eq!(bus.listener_count(), 2);
    }

    #[test]
    fn events_serialize_with_tag() {
        let event = PledgeEvent::PoolFinalized {
            cohort: CohortId(3),
            asset: AssetKind::Token,
            treasury: 67,
            charity: 33,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "pool_finalized");
        assert_eq!(json["asset"], "token");
    }
}
