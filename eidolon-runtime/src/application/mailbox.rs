// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Mailboxes (C5 support)
//!
//! A subscriber's bounded inbox (§4.5 "mailbox overflow", §10.4). `block` is
//! a plain `tokio::sync::mpsc` bounded channel — the channel's own
//! backpressure *is* the policy. `drop-oldest` and `drop-new` need eviction
//! the channel itself can't do from the sender side, so they use a small
//! ring buffer guarded by a `parking_lot::Mutex` with a `Notify` to wake a
//! waiting receiver, racing a bounded push against an explicit
//! oldest-eviction step per the policy (§10.4).

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{mpsc, Notify};

use eidolon_domain::entities::Envelope;
use eidolon_domain::value_objects::MailboxPolicy;

/// Outcome of one enqueue attempt, used to drive the §4.7/§8 diagnostics
/// (overflow counters, "producer suspended" observation for S5).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueOutcome {
    Delivered,
    /// Delivered, but only after evicting the oldest pending envelope.
    DeliveredAfterEvictingOldest,
    /// Dropped; the mailbox was full and the policy is `drop-new`.
    DroppedNew,
}

struct RingMailboxInner {
    queue: VecDeque<Envelope>,
    capacity: usize,
    policy: MailboxPolicy,
}

struct RingMailbox {
    inner: Mutex<RingMailboxInner>,
    notify: Notify,
    closed: AtomicBool,
    overflow_count: AtomicU64,
}

impl RingMailbox {
    fn new(capacity: usize, policy: MailboxPolicy) -> Self {
        Self {
            inner: Mutex::new(RingMailboxInner {
                queue: VecDeque::with_capacity(capacity),
                capacity,
                policy,
            }),
            notify: Notify::new(),
            closed: AtomicBool::new(false),
            overflow_count: AtomicU64::new(0),
        }
    }

    fn push(&self, envelope: Envelope) -> EnqueueOutcome {
        let mut inner = self.inner.lock();
        let outcome = if inner.queue.len() < inner.capacity {
            inner.queue.push_back(envelope);
            EnqueueOutcome::Delivered
        } else {
            match inner.policy {
                MailboxPolicy::DropOldest => {
                    inner.queue.pop_front();
                    inner.queue.push_back(envelope);
                    self.overflow_count.fetch_add(1, Ordering::Relaxed);
                    EnqueueOutcome::DeliveredAfterEvictingOldest
                }
                MailboxPolicy::DropNew => {
                    self.overflow_count.fetch_add(1, Ordering::Relaxed);
                    EnqueueOutcome::DroppedNew
                }
                MailboxPolicy::Block => unreachable!("Block policy is carried by an mpsc channel, not a RingMailbox"),
            }
        };
        drop(inner);
        self.notify.notify_one();
        outcome
    }

    async fn recv(&self) -> Option<Envelope> {
        loop {
            if let Some(envelope) = self.inner.lock().pop_front_if_any() {
                return Some(envelope);
            }
            if self.closed.load(Ordering::Acquire) {
                return None;
            }
            self.notify.notified().await;
        }
    }

    fn close(&self) {
        self.closed.store(true, Ordering::Release);
        self.notify.notify_waiters();
    }

    fn overflow_count(&self) -> u64 {
        self.overflow_count.load(Ordering::Relaxed)
    }
}

impl RingMailboxInner {
    fn pop_front_if_any(&mut self) -> Option<Envelope> {
        self.queue.pop_front()
    }
}

/// The producer-facing half of a subscriber's mailbox. Cheaply `Clone` (an
/// `mpsc::Sender` clone or an `Arc` bump) so the bus can snapshot a topic's
/// subscriber list without holding its lock across an `.await`.
#[derive(Clone)]
pub enum MailboxSender {
    Blocking(mpsc::Sender<Envelope>),
    Ring(Arc<RingMailbox>),
}

impl MailboxSender {
    /// Enqueues `envelope`, applying this mailbox's overflow policy.
    /// Suspends the caller under `block` when full (§5 suspension point b).
    pub async fn enqueue(&self, envelope: Envelope) -> EnqueueOutcome {
        match self {
            MailboxSender::Blocking(sender) => {
                // Suspends the caller once the channel is at capacity (§5
                // suspension point b); this *is* the `block` policy.
                match sender.send(envelope).await {
                    Ok(()) => EnqueueOutcome::Delivered,
                    Err(_) => EnqueueOutcome::DroppedNew, // receiver gone, subscriber already torn down
                }
            }
            MailboxSender::Ring(ring) => ring.push(envelope),
        }
    }

    pub fn overflow_count(&self) -> u64 {
        match self {
            MailboxSender::Blocking(_) => 0,
            MailboxSender::Ring(ring) => ring.overflow_count(),
        }
    }

    pub fn close(&self) {
        if let MailboxSender::Ring(ring) = self {
            ring.close();
        }
    }
}

/// The subscriber-facing half; the module host's receive loop reads these.
pub enum MailboxReceiver {
    Blocking(mpsc::Receiver<Envelope>),
    Ring(Arc<RingMailbox>),
}

impl MailboxReceiver {
    pub async fn recv(&mut self) -> Option<Envelope> {
        match self {
            MailboxReceiver::Blocking(receiver) => receiver.recv().await,
            MailboxReceiver::Ring(ring) => ring.recv().await,
        }
    }
}

/// Builds the paired sender/receiver for one subscription, sized and
/// policed per the slot's wiring (§4.5, falling back to the pipeline's
/// `default_mailbox_size` when a slot doesn't override it).
pub fn mailbox(capacity: usize, policy: MailboxPolicy) -> (MailboxSender, MailboxReceiver) {
    match policy {
        MailboxPolicy::Block => {
            let (tx, rx) = mpsc::channel(capacity.max(1));
            (MailboxSender::Blocking(tx), MailboxReceiver::Blocking(rx))
        }
        MailboxPolicy::DropOldest | MailboxPolicy::DropNew => {
            let ring = Arc::new(RingMailbox::new(capacity.max(1), policy));
            (MailboxSender::Ring(ring.clone()), MailboxReceiver::Ring(ring))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use eidolon_domain::value_objects::run_id::RunIdCategory;
    use eidolon_domain::value_objects::{GenericId, Payload, SlotId, TypeExpr};

    fn test_envelope(n: i64) -> Envelope {
        Envelope::publish(
            Payload::Int(n),
            TypeExpr::Int,
            SlotId::new("producer").unwrap(),
            "out".into(),
            GenericId::<RunIdCategory>::new(),
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn block_policy_delivers_in_order_and_suspends_when_full() {
        let (tx, mut rx) = mailbox(1, MailboxPolicy::Block);
        assert_eq!(tx.enqueue(test_envelope(1)).await, EnqueueOutcome::Delivered);

        let tx2 = match &tx {
            MailboxSender::Blocking(sender) => sender.clone(),
            _ => unreachable!(),
        };
        let send_task = tokio::spawn(async move { MailboxSender::Blocking(tx2).enqueue(test_envelope(2)).await });

        assert_eq!(rx.recv().await.unwrap().payload, Payload::Int(1));
        assert_eq!(send_task.await.unwrap(), EnqueueOutcome::Delivered);
        assert_eq!(rx.recv().await.unwrap().payload, Payload::Int(2));
    }

    #[tokio::test]
    async fn drop_new_policy_discards_the_incoming_envelope_when_full() {
        let (tx, mut rx) = mailbox(1, MailboxPolicy::DropNew);
        assert_eq!(tx.enqueue(test_envelope(1)).await, EnqueueOutcome::Delivered);
        assert_eq!(tx.enqueue(test_envelope(2)).await, EnqueueOutcome::DroppedNew);
        assert_eq!(tx.overflow_count(), 1);
        assert_eq!(rx.recv().await.unwrap().payload, Payload::Int(1));
    }

    #[tokio::test]
    async fn drop_oldest_policy_evicts_the_pending_envelope() {
        let (tx, mut rx) = mailbox(1, MailboxPolicy::DropOldest);
        assert_eq!(tx.enqueue(test_envelope(1)).await, EnqueueOutcome::Delivered);
        assert_eq!(
            tx.enqueue(test_envelope(2)).await,
            EnqueueOutcome::DeliveredAfterEvictingOldest
        );
        assert_eq!(tx.overflow_count(), 1);
        assert_eq!(rx.recv().await.unwrap().payload, Payload::Int(2));
    }

    #[tokio::test]
    async fn closing_a_ring_mailbox_unblocks_a_pending_receive() {
        let (tx, mut rx) = mailbox(1, MailboxPolicy::DropNew);
        tx.close();
        assert!(rx.recv().await.is_none());
    }
}
