use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;

use crate::common::cluster::MembershipEvent;
use crate::sync::publisher::TargetPublisher;
use crate::sync::report;
use crate::traits::membership::MembershipProvider;

/// Single pending slot in front of the regeneration worker.
///
/// `dirty` is set by the first request after the worker picked up the previous
/// one; later requests are absorbed until the worker clears it again.
struct PendingSlot {
    dirty: AtomicBool,
    wake: Notify,
}

impl PendingSlot {
    fn new() -> Self {
        Self {
            dirty: AtomicBool::new(false),
            wake: Notify::new(),
        }
    }

    /// Returns false when the request was absorbed by one already pending.
    fn request(&self) -> bool {
        if self.dirty.swap(true, Ordering::AcqRel) {
            return false;
        }
        self.wake.notify_one();
        true
    }

    async fn take(&self) {
        self.wake.notified().await;
        // cleared before the snapshot query, so a later request schedules a follow-up
        self.dirty.store(false, Ordering::Release);
    }
}

/// Turns membership notifications into regenerations, at most one in flight and
/// at most one waiting behind it.
pub struct ChangeCoalescer {
    slot: Arc<PendingSlot>,
    completed: watch::Receiver<u64>,
    worker: JoinHandle<()>,
    pump: JoinHandle<()>,
}

impl ChangeCoalescer {
    pub fn spawn<M>(publisher: TargetPublisher<M>, events: broadcast::Receiver<MembershipEvent>) -> Self
    where
        M: MembershipProvider + Send + Sync + 'static,
    {
        let slot = Arc::new(PendingSlot::new());
        let (completed_tx, completed) = watch::channel(0u64);

        let worker_slot = slot.clone();
        let worker = tokio::spawn(async move {
            loop {
                worker_slot.take().await;
                match publisher.publish().await {
                    Ok(count) => log::info!(
                        "Successfully updated Prometheus target file {:?} ({} targets)",
                        publisher.store().path(),
                        count
                    ),
                    Err(e) => report(&e),
                }
                completed_tx.send_modify(|n| *n += 1);
            }
        });

        let pump_slot = slot.clone();
        let pump = tokio::spawn(pump_events(events, pump_slot));

        Self {
            slot,
            completed,
            worker,
            pump,
        }
    }

    /// Asks for a regeneration without a membership event.
    pub fn request_regeneration(&self) -> bool {
        self.slot.request()
    }

    /// Number of finished regeneration attempts, successful or not.
    pub fn completions(&self) -> watch::Receiver<u64> {
        self.completed.clone()
    }

    pub fn shutdown(self) {
        self.pump.abort();
        self.worker.abort();
    }
}

async fn pump_events(mut events: broadcast::Receiver<MembershipEvent>, slot: Arc<PendingSlot>) {
    loop {
        match events.recv().await {
            Ok(event) => {
                let node = event.node();
                if slot.request() {
                    log::info!(
                        "Node \"{}\" {}. Regenerating target file for Prometheus",
                        node.id,
                        event.kind()
                    );
                } else {
                    log::debug!(
                        "Node \"{}\" {}. Absorbed by pending regeneration",
                        node.id,
                        event.kind()
                    );
                }
            }
            Err(RecvError::Lagged(missed)) => {
                log::warn!("Missed {} membership events, regenerating target file", missed);
                slot.request();
            }
            Err(RecvError::Closed) => {
                log::info!("Membership event stream closed");
                break;
            }
        }
    }
}
