// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Message Bus (C5)
//!
//! Typed topics, keyed internally by `"<producerSlotId>.<outputName>"`
//! (§4.5). `publish` fans an [`Envelope`] out to every subscriber binding
//! registered on its topic, translating the payload per-binding when the
//! subscriber's declared input type differs from the producer's declared
//! output type. The topic table is written only during wiring (§4.7 step 5,
//! single-threaded) and is read-only once the engine starts running
//! (§5 "shared-resource policy").

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use eidolon_domain::entities::Envelope;
use eidolon_domain::value_objects::{MailboxPolicy, Payload, RunId, SlotId, TypeExpr};
use eidolon_domain::EidolonError;

use crate::application::mailbox::{mailbox, EnqueueOutcome, MailboxReceiver, MailboxSender};
use crate::application::translation_cache::TranslationCache;
use crate::error::RuntimeError;

#[derive(Clone)]
struct Subscription {
    subscriber: SlotId,
    input_name: String,
    declared_input_type: TypeExpr,
    sender: MailboxSender,
}

/// Per-delivery outcome, surfaced to the engine for logging and metrics
/// (§4.5 "Failure semantics", §8 invariant 2).
#[derive(Debug)]
pub enum DeliveryOutcome {
    Delivered,
    DeliveredAfterEvictingOldest,
    DroppedByOverflowPolicy,
    TranslationFailed(EidolonError),
}

#[derive(Default)]
struct BusDiagnostics {
    delivered: AtomicU64,
    dropped_overflow: AtomicU64,
    translation_failures: AtomicU64,
}

pub struct MessageBus {
    run_id: RunId,
    translation_cache: Arc<TranslationCache>,
    topics: parking_lot::RwLock<HashMap<String, Vec<Subscription>>>,
    registered: parking_lot::Mutex<HashSet<(SlotId, String)>>,
    diagnostics: BusDiagnostics,
}

impl MessageBus {
    pub fn new(run_id: RunId, translation_cache: Arc<TranslationCache>) -> Self {
        Self {
            run_id,
            translation_cache,
            topics: parking_lot::RwLock::new(HashMap::new()),
            registered: parking_lot::Mutex::new(HashSet::new()),
            diagnostics: BusDiagnostics::default(),
        }
    }

    /// Registers a subscription binding (§4.5 `subscribe`): idempotent per
    /// `(subscriberSlotId, inputName)` — a pipeline document's own
    /// validation already guarantees each slot input is wired at most once,
    /// so a repeat call here indicates a wiring bug in the caller, not a
    /// normal runtime occurrence.
    pub fn subscribe(
        &self,
        subscriber: SlotId,
        input_name: String,
        qualified_topic: String,
        declared_input_type: TypeExpr,
        mailbox_size: usize,
        policy: MailboxPolicy,
    ) -> Result<MailboxReceiver, RuntimeError> {
        let key = (subscriber.clone(), input_name.clone());
        let mut registered = self.registered.lock();
        if !registered.insert(key) {
            return Err(RuntimeError::Domain(EidolonError::internal(format!(
                "slot '{subscriber}' input '{input_name}' was already subscribed"
            ))));
        }
        drop(registered);

        let (sender, receiver) = mailbox(mailbox_size, policy);
        self.topics.write().entry(qualified_topic).or_default().push(Subscription {
            subscriber,
            input_name,
            declared_input_type,
            sender,
        });
        Ok(receiver)
    }

    /// Publishes `payload` on `producer`'s `output_name` (§4.5 `publish`):
    /// wraps it into an [`Envelope`] and fans out to each subscriber
    /// binding in registration order. Returns once every binding has been
    /// offered the envelope — delivery itself is asynchronous with respect
    /// to the caller only in the sense that each mailbox is independently
    /// bounded (§4.5 "Delivery contract" point 3).
    pub async fn publish(
        &self,
        producer: &SlotId,
        output_name: &str,
        payload: Payload,
        source_type: TypeExpr,
    ) -> Result<(), RuntimeError> {
        let topic = format!("{producer}.{output_name}");
        let envelope = Envelope::publish(
            payload,
            source_type,
            producer.clone(),
            output_name.to_string(),
            self.run_id.clone(),
            chrono::Utc::now(),
        );

        // Snapshot the subscriber list and release the lock before the
        // `.await`s below — subscriptions never change after wiring, so a
        // clone is cheap and keeps a `parking_lot` guard off the hot path
        // (§5 shared-resource policy).
        let targets: Vec<Subscription> = self.topics.read().get(&topic).cloned().unwrap_or_default();
        self.deliver_to(&targets, &envelope).await
    }

    async fn deliver_to(&self, subscriptions: &[Subscription], envelope: &Envelope) -> Result<(), RuntimeError> {
        for sub in subscriptions {
            match self.translate_for(envelope, &sub.input_name, &sub.declared_input_type) {
                Ok(delivered) => match sub.sender.enqueue(delivered).await {
                    EnqueueOutcome::Delivered => {
                        self.diagnostics.delivered.fetch_add(1, Ordering::Relaxed);
                    }
                    EnqueueOutcome::DeliveredAfterEvictingOldest => {
                        self.diagnostics.delivered.fetch_add(1, Ordering::Relaxed);
                        self.diagnostics.dropped_overflow.fetch_add(1, Ordering::Relaxed);
                        tracing::warn!(target: "bus", subscriber = %sub.subscriber, input = %sub.input_name, "mailbox overflow: evicted oldest pending envelope");
                    }
                    EnqueueOutcome::DroppedNew => {
                        self.diagnostics.dropped_overflow.fetch_add(1, Ordering::Relaxed);
                        tracing::warn!(target: "bus", subscriber = %sub.subscriber, input = %sub.input_name, "mailbox overflow: dropped incoming envelope");
                    }
                },
                Err(e) => {
                    self.diagnostics.translation_failures.fetch_add(1, Ordering::Relaxed);
                    tracing::warn!(
                        target: "bus",
                        subscriber = %sub.subscriber,
                        input = %sub.input_name,
                        error = %e,
                        "translation failed, subscriber skipped"
                    );
                }
            }
        }
        Ok(())
    }

    /// Applies the §4.5 delivery contract for one subscriber binding: an
    /// identity shortcut when types already match, otherwise a
    /// cache-assisted call into the Translation Layer.
    fn translate_for(&self, envelope: &Envelope, dst_input: &str, dst_type: &TypeExpr) -> Result<Envelope, EidolonError> {
        if &envelope.source_type == dst_type {
            let mut delivered = envelope.clone();
            delivered.destination_input = Some(dst_input.to_string());
            return Ok(delivered);
        }

        // The cache memoises `CoercionRule::resolve` lookups (§4.4, §10.4);
        // `any`/union destinations are resolved directly by
        // `Envelope::for_subscriber`, which already special-cases them.
        if !matches!(dst_type, TypeExpr::Any | TypeExpr::Union(_))
            && self.translation_cache.resolve(&envelope.source_type, dst_type).is_none()
        {
            return Err(EidolonError::TranslationFailure {
                src: envelope.source_type.to_string(),
                dst: dst_type.to_string(),
                reason: "no coercion rule bridges these types".to_string(),
            });
        }

        envelope.for_subscriber(dst_input, dst_type)
    }

    pub fn delivered_count(&self) -> u64 {
        self.diagnostics.delivered.load(Ordering::Relaxed)
    }

    pub fn dropped_overflow_count(&self) -> u64 {
        self.diagnostics.dropped_overflow.load(Ordering::Relaxed)
    }

    pub fn translation_failure_count(&self) -> u64 {
        self.diagnostics.translation_failures.load(Ordering::Relaxed)
    }

    /// Closes every registered mailbox, unblocking any receiver still
    /// awaiting `recv()` (§4.7 step 8, invariant 5: "no module's
    /// `iterate()`/`on_input()` runs after shutdown").
    pub fn close_all(&self) {
        for subs in self.topics.read().values() {
            for sub in subs {
                sub.sender.close();
            }
        }
    }

    /// Closes every mailbox fed by one producer's outputs, without
    /// disturbing any other topic (§4.7 step 8, natural-completion
    /// trigger). Called once `producer`'s host task reaches a terminal
    /// state so its downstream `reactive`/`on_trigger` subscribers observe
    /// their inbox close, drain whatever is still queued, and complete in
    /// turn — cascading shutdown through the dependency graph without
    /// waiting on an operator signal or the pipeline timeout.
    pub fn close_producer(&self, producer: &SlotId) {
        let prefix = format!("{producer}.");
        for (topic, subs) in self.topics.read().iter() {
            if topic.starts_with(&prefix) {
                for sub in subs {
                    sub.sender.close();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eidolon_domain::value_objects::run_id::RunIdCategory;
    use eidolon_domain::value_objects::GenericId;

    fn test_bus() -> MessageBus {
        MessageBus::new(GenericId::<RunIdCategory>::new(), Arc::new(TranslationCache::new(64)))
    }

    #[tokio::test]
    async fn delivers_without_translation_when_types_match() {
        let bus = test_bus();
        let mut rx = bus
            .subscribe(
                SlotId::new("consumer").unwrap(),
                "data".into(),
                "producer.result".into(),
                TypeExpr::Int,
                8,
                MailboxPolicy::Block,
            )
            .unwrap();

        bus.publish(&SlotId::new("producer").unwrap(), "result", Payload::Int(3), TypeExpr::Int)
            .await
            .unwrap();

        let envelope = rx.recv().await.unwrap();
        assert_eq!(envelope.payload, Payload::Int(3));
        assert_eq!(envelope.destination_input.as_deref(), Some("data"));
        assert_eq!(bus.delivered_count(), 1);
    }

    #[tokio::test]
    async fn translates_int_to_float_on_delivery() {
        let bus = test_bus();
        let mut rx = bus
            .subscribe(
                SlotId::new("consumer").unwrap(),
                "data".into(),
                "producer.result".into(),
                TypeExpr::Float,
                8,
                MailboxPolicy::Block,
            )
            .unwrap();

        bus.publish(&SlotId::new("producer").unwrap(), "result", Payload::Int(3), TypeExpr::Int)
            .await
            .unwrap();

        assert_eq!(rx.recv().await.unwrap().payload, Payload::Float(3.0));
    }

    #[tokio::test]
    async fn untranslatable_delivery_is_skipped_without_poisoning_other_subscribers() {
        let bus = test_bus();
        let mut skipped = bus
            .subscribe(
                SlotId::new("skipped").unwrap(),
                "data".into(),
                "producer.result".into(),
                TypeExpr::Int,
                8,
                MailboxPolicy::Block,
            )
            .unwrap();
        let mut passthrough = bus
            .subscribe(
                SlotId::new("passthrough").unwrap(),
                "data".into(),
                "producer.result".into(),
                TypeExpr::Any,
                8,
                MailboxPolicy::Block,
            )
            .unwrap();

        bus.publish(
            &SlotId::new("producer").unwrap(),
            "result",
            Payload::Str("not-an-int".into()),
            TypeExpr::Str,
        )
        .await
        .unwrap();

        assert_eq!(bus.translation_failure_count(), 1);
        assert_eq!(passthrough.recv().await.unwrap().payload, Payload::Str("not-an-int".into()));

        // The skipped subscriber's mailbox never received anything; dropping
        // the bus (closing the sender side) lets recv() observe that.
        drop(bus);
        assert!(skipped.recv().await.is_none());
    }

    #[tokio::test]
    async fn publishing_to_a_topic_with_no_subscribers_is_a_silent_no_op() {
        let bus = test_bus();
        bus.publish(&SlotId::new("producer").unwrap(), "result", Payload::Int(1), TypeExpr::Int)
            .await
            .unwrap();
        assert_eq!(bus.delivered_count(), 0);
    }

    #[tokio::test]
    async fn close_producer_closes_only_that_producers_topics() {
        let bus = test_bus();
        let mut from_a = bus
            .subscribe(
                SlotId::new("consumer").unwrap(),
                "data".into(),
                "producer_a.result".into(),
                TypeExpr::Int,
                8,
                MailboxPolicy::Block,
            )
            .unwrap();
        let mut from_b = bus
            .subscribe(
                SlotId::new("other").unwrap(),
                "data".into(),
                "producer_b.result".into(),
                TypeExpr::Int,
                8,
                MailboxPolicy::Block,
            )
            .unwrap();

        bus.close_producer(&SlotId::new("producer_a").unwrap());

        assert!(from_a.recv().await.is_none());
        bus.publish(&SlotId::new("producer_b").unwrap(), "result", Payload::Int(7), TypeExpr::Int)
            .await
            .unwrap();
        assert_eq!(from_b.recv().await.unwrap().payload, Payload::Int(7));
    }

    #[tokio::test]
    async fn subscribing_the_same_input_twice_is_rejected() {
        let bus = test_bus();
        bus.subscribe(
            SlotId::new("consumer").unwrap(),
            "data".into(),
            "producer.result".into(),
            TypeExpr::Int,
            8,
            MailboxPolicy::Block,
        )
        .unwrap();

        let err = bus
            .subscribe(
                SlotId::new("consumer").unwrap(),
                "data".into(),
                "producer.result".into(),
                TypeExpr::Int,
                8,
                MailboxPolicy::Block,
            )
            .unwrap_err();
        assert!(matches!(err, RuntimeError::Domain(_)));
    }
}
