// /////////////////////////////////////////////////////////////////////////////
// Optimized Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Module Slot
//!
//! One occurrence of a module within a pipeline document (§3).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::value_objects::{ModuleName, RunMode, SlotId};

/// `{slotId, outputName}` — the upstream source an input is wired to (§3,
/// §6's `input: { data: producer.result }` shorthand).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputBinding {
    pub slot_id: SlotId,
    pub output_name: String,
}

impl InputBinding {
    /// Parses the manifest's `producer.result` qualified-name shorthand into
    /// `{slotId: producer, outputName: result}`.
    pub fn parse_qualified(qualified: &str) -> Option<Self> {
        let (slot, output) = qualified.split_once('.')?;
        Some(Self {
            slot_id: SlotId::new(slot).ok()?,
            output_name: output.to_string(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleSlot {
    pub id: SlotId,
    pub name: ModuleName,
    #[serde(default)]
    pub config: HashMap<String, serde_json::Value>,
    pub run_mode: RunMode,
    #[serde(default)]
    pub depends_on: Vec<SlotId>,
    #[serde(default)]
    pub input: HashMap<String, InputBinding>,
    /// Mailbox size for each of this slot's inputs; falls back to the
    /// pipeline-wide default (§4.5) when absent.
    #[serde(default)]
    pub mailbox_size: Option<usize>,
    #[serde(default)]
    pub mailbox_policy: Option<crate::value_objects::MailboxPolicy>,
    /// Cycle delay between `loop` iterations (§4.6); defaults to 1s.
    #[serde(default, with = "humantime_duration_opt")]
    pub cycle_delay: Option<std::time::Duration>,
}

mod humantime_duration_opt {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => serializer.serialize_some(&humantime::format_duration(*d).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Duration>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw {
            Some(s) => humantime::parse_duration(&s)
                .map(Some)
                .map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_qualified_output_shorthand() {
        let binding = InputBinding::parse_qualified("producer.result").unwrap();
        assert_eq!(binding.slot_id.as_str(), "producer");
        assert_eq!(binding.output_name, "result");
    }

    #[test]
    fn rejects_shorthand_without_a_dot() {
        assert!(InputBinding::parse_qualified("producer").is_none());
    }
}
