// /////////////////////////////////////////////////////////////////////////////
// Optimized Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Envelope
//!
//! One message in flight on the bus (§4, §5): a payload tagged with the
//! producer's declared output type, stamped with its origin and publication
//! time. `for_subscriber` produces the per-destination view the Translation
//! Layer hands to a subscriber's mailbox, coercing the payload from the
//! producer's declared type into the consumer's declared input type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::services::translation;
use crate::value_objects::{Payload, RunId, SlotId, TypeExpr};
use crate::EidolonError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    pub payload: Payload,
    /// The declared type of the output that produced this payload — half of
    /// the Translation Layer's `(src type, dst type)` cache key.
    pub source_type: TypeExpr,
    /// `{source_slot}.{source_output}`, used for logs and metrics.
    pub topic: String,
    pub source_slot: SlotId,
    pub source_output: String,
    pub published_at: DateTime<Utc>,
    pub run_id: RunId,
    /// Populated once `for_subscriber` has targeted this envelope at a
    /// specific consumer input; absent on the envelope as published.
    #[serde(default)]
    pub destination_input: Option<String>,
}

impl Envelope {
    pub fn publish(
        payload: Payload,
        source_type: TypeExpr,
        source_slot: SlotId,
        source_output: String,
        run_id: RunId,
        published_at: DateTime<Utc>,
    ) -> Self {
        let topic = format!("{source_slot}.{source_output}");
        Self {
            payload,
            source_type,
            topic,
            source_slot,
            source_output,
            published_at,
            run_id,
            destination_input: None,
        }
    }

    /// Coerces this envelope's payload into `dst_type` for delivery to
    /// `dst_input`, per the static compatibility relation and coercion rules
    /// of §4.4. Fails if no rule bridges the two types.
    pub fn for_subscriber(&self, dst_input: &str, dst_type: &TypeExpr) -> Result<Envelope, EidolonError> {
        let coerced = translation::coerce(&self.payload, &self.source_type, dst_type)?;
        Ok(Envelope {
            payload: coerced,
            source_type: dst_type.clone(),
            topic: self.topic.clone(),
            source_slot: self.source_slot.clone(),
            source_output: self.source_output.clone(),
            published_at: self.published_at,
            run_id: self.run_id.clone(),
            destination_input: Some(dst_input.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::run_id::RunIdCategory;
    use crate::value_objects::GenericId;

    #[test]
    fn topic_is_slot_dot_output() {
        let env = Envelope::publish(
            Payload::Int(1),
            TypeExpr::Int,
            SlotId::new("producer").unwrap(),
            "result".into(),
            GenericId::<RunIdCategory>::new(),
            Utc::now(),
        );
        assert_eq!(env.topic, "producer.result");
    }

    #[test]
    fn for_subscriber_coerces_and_tags_destination() {
        let env = Envelope::publish(
            Payload::Int(1),
            TypeExpr::Int,
            SlotId::new("producer").unwrap(),
            "result".into(),
            GenericId::<RunIdCategory>::new(),
            Utc::now(),
        );
        let delivered = env.for_subscriber("data", &TypeExpr::Float).unwrap();
        assert_eq!(delivered.payload, Payload::Float(1.0));
        assert_eq!(delivered.destination_input.as_deref(), Some("data"));
    }
}
