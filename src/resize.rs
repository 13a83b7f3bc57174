//! Resize notifications fanned out to active strips.
//!
//! The host emits a new container width on every terminal resize. Each active
//! component holds a [`ResizeSubscription`]; dropping it deregisters the
//! listener, so a torn-down component never receives another signal.

use crossbeam_channel::{unbounded, Receiver, Sender};
use std::sync::{Arc, Mutex, Weak};

use crate::lock_or_recover;

/// How queued resize signals are handed to a subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResizeDelivery {
    /// Every queued signal, in order. One recompute per resize event.
    #[default]
    EveryEvent,
    /// Only the most recent queued width; earlier ones are conflated away.
    Conflate,
}

impl ResizeDelivery {
    #[must_use]
    pub fn from_conflate_flag(conflate: bool) -> Self {
        if conflate {
            Self::Conflate
        } else {
            Self::EveryEvent
        }
    }
}

#[derive(Default)]
struct Listeners {
    next_id: u64,
    senders: Vec<(u64, Sender<u16>)>,
}

/// Host-side resize signal source.
#[derive(Clone, Default)]
pub struct ResizeBus {
    listeners: Arc<Mutex<Listeners>>,
}

impl ResizeBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. It stays registered until the subscription drops.
    #[must_use]
    pub fn subscribe(&self) -> ResizeSubscription {
        let (tx, rx) = unbounded();
        let mut listeners = lock_or_recover(&self.listeners, "resize_bus.subscribe");
        let id = listeners.next_id;
        listeners.next_id += 1;
        listeners.senders.push((id, tx));
        tracing::debug!(id, "resize listener registered");
        ResizeSubscription {
            id,
            rx,
            bus: Arc::downgrade(&self.listeners),
        }
    }

    /// Deliver a new container width to every live listener.
    pub fn emit(&self, width: u16) {
        let mut listeners = lock_or_recover(&self.listeners, "resize_bus.emit");
        listeners
            .senders
            .retain(|(_, tx)| tx.send(width).is_ok());
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        lock_or_recover(&self.listeners, "resize_bus.listener_count")
            .senders
            .len()
    }
}

/// A registered resize listener. Deregisters itself on drop.
pub struct ResizeSubscription {
    id: u64,
    rx: Receiver<u16>,
    bus: Weak<Mutex<Listeners>>,
}

impl ResizeSubscription {
    /// Drain queued widths without blocking.
    #[must_use]
    pub fn take_pending(&self, delivery: ResizeDelivery) -> Vec<u16> {
        let queued: Vec<u16> = self.rx.try_iter().collect();
        match delivery {
            ResizeDelivery::EveryEvent => queued,
            ResizeDelivery::Conflate => {
                if queued.len() > 1 {
                    tracing::trace!(dropped = queued.len() - 1, "conflated resize signals");
                }
                queued.last().copied().into_iter().collect()
            }
        }
    }
}

impl Drop for ResizeSubscription {
    fn drop(&mut self) {
        let Some(listeners) = self.bus.upgrade() else {
            return;
        };
        lock_or_recover(&listeners, "resize_subscription.drop")
            .senders
            .retain(|(id, _)| *id != self.id);
        tracing::debug!(id = self.id, "resize listener deregistered");
    }
}
