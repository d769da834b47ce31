// /////////////////////////////////////////////////////////////////////////////
// Optimized Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Engine Events
//!
//! Domain events for the significant, run-scoped occurrences a Module
//! Engine execution produces (§3 lifecycle, §4.7, §7). These are business
//! events, not per-message telemetry: an `EnvelopePublished` for every
//! message on the bus would drown the log and duplicate what `tracing`
//! spans (§10.2) and the Prometheus counters (§10.7) already cover. What
//! belongs here is the handful of occurrences an operator or an
//! integration actually wants to react to — a slot changing lifecycle
//! state, a security rejection, a shutdown completing.

use serde::{Deserialize, Serialize};

use crate::services::datetime_serde;
use crate::value_objects::run_id::RunIdCategory;
use crate::value_objects::{GenericId, RunId, SlotId, Verdict};

#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct EventIdCategory;

impl crate::value_objects::generic_id::IdCategory for EventIdCategory {
    fn category_name() -> &'static str {
        "event"
    }
    fn validate_id(_ulid: &ulid::Ulid) -> Result<(), crate::EidolonError> {
        Ok(())
    }
    fn allows_nil() -> bool {
        true
    }
}

pub type EventId = GenericId<EventIdCategory>;

/// Common event envelope fields, mirroring the shape of this codebase's
/// previous event modules (event id, occurrence time, run correlation) but
/// scoped to one engine execution rather than a persisted aggregate.
pub trait EngineEvent {
    fn event_id(&self) -> &EventId;
    fn run_id(&self) -> &RunId;
    fn occurred_at(&self) -> chrono::DateTime<chrono::Utc>;
    fn event_type(&self) -> &'static str;
}

macro_rules! engine_event {
    ($name:ident { $($field:ident : $ty:ty),* $(,)? }, $kind:literal) => {
        #[derive(Debug, Clone, Serialize, Deserialize)]
        pub struct $name {
            pub event_id: EventId,
            pub run_id: RunId,
            #[serde(with = "datetime_serde")]
            pub occurred_at: chrono::DateTime<chrono::Utc>,
            $(pub $field: $ty,)*
        }

        impl EngineEvent for $name {
            fn event_id(&self) -> &EventId { &self.event_id }
            fn run_id(&self) -> &RunId { &self.run_id }
            fn occurred_at(&self) -> chrono::DateTime<chrono::Utc> { self.occurred_at }
            fn event_type(&self) -> &'static str { $kind }
        }
    };
}

engine_event!(SlotVerified { slot_id: SlotId, verdict: Verdict }, "slot_verified");
engine_event!(SlotRejected { slot_id: SlotId, verdict: Verdict, reason: String }, "slot_rejected");
engine_event!(SlotInitialised { slot_id: SlotId }, "slot_initialised");
engine_event!(SlotRunning { slot_id: SlotId }, "slot_running");
engine_event!(SlotTerminated { slot_id: SlotId, reason: String }, "slot_terminated");
engine_event!(
    TranslationFailed { slot_id: SlotId, input: String, src_type: String, dst_type: String, reason: String },
    "translation_failed"
);
engine_event!(
    MailboxOverflowed { slot_id: SlotId, input: String, policy: String },
    "mailbox_overflowed"
);
engine_event!(ShutdownInitiated { cause: String }, "shutdown_initiated");
engine_event!(ShutdownTimedOut { slot_id: SlotId }, "shutdown_timed_out");
engine_event!(ShutdownCompleted { terminated_slots: usize }, "shutdown_completed");

/// Union of every engine-level domain event, analogous to this codebase's
/// previous single `PipelineEvent` enum but re-scoped to the dataflow
/// runtime's own lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EngineEventEnvelope {
    SlotVerified(SlotVerified),
    SlotRejected(SlotRejected),
    SlotInitialised(SlotInitialised),
    SlotRunning(SlotRunning),
    SlotTerminated(SlotTerminated),
    TranslationFailed(TranslationFailed),
    MailboxOverflowed(MailboxOverflowed),
    ShutdownInitiated(ShutdownInitiated),
    ShutdownTimedOut(ShutdownTimedOut),
    ShutdownCompleted(ShutdownCompleted),
}
