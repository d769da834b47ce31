// /////////////////////////////////////////////////////////////////////////////
// Optimized Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Pipeline Document
//!
//! The top-level manifest of a pipeline (§3, §6): a name, engine-wide
//! execution options, and an unordered set of module slots wired together by
//! `depends_on` and `input` references. Ordering the slots into an execution
//! schedule is the job of `aggregates::PipelineGraph`; this entity only
//! guarantees the document itself is internally well-formed.

use std::collections::HashSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::entities::ModuleSlot;
use crate::value_objects::ErrorPolicy;
use crate::EidolonError;

fn default_max_threads() -> usize {
    num_cpus_fallback()
}

fn num_cpus_fallback() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

fn default_retries() -> u32 {
    0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionOptions {
    #[serde(default = "default_max_threads")]
    pub max_threads: usize,
    #[serde(default, with = "humantime_duration_opt")]
    pub timeout: Option<Duration>,
    #[serde(default = "default_retries")]
    pub retries: u32,
    #[serde(default)]
    pub error_policy: ErrorPolicy,
    /// Default mailbox capacity for slots that don't override it (§4.5).
    #[serde(default = "default_mailbox_size")]
    pub default_mailbox_size: usize,
}

fn default_mailbox_size() -> usize {
    64
}

impl Default for ExecutionOptions {
    fn default() -> Self {
        Self {
            max_threads: default_max_threads(),
            timeout: None,
            retries: default_retries(),
            error_policy: ErrorPolicy::default(),
            default_mailbox_size: default_mailbox_size(),
        }
    }
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

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineDocument {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub options: ExecutionOptions,
    pub slots: Vec<ModuleSlot>,
}

impl PipelineDocument {
    /// Structural checks that don't require loading any manifest (§4.1):
    /// slot ids unique, every `depends_on` and `input` reference names a slot
    /// that exists in this document.
    pub fn validate(&self) -> Result<(), EidolonError> {
        let mut seen = HashSet::new();
        for slot in &self.slots {
            if !seen.insert(slot.id.as_str()) {
                return Err(EidolonError::bad_pipeline(format!(
                    "pipeline '{}' declares slot id '{}' more than once",
                    self.name, slot.id
                )));
            }
        }

        let known: HashSet<&str> = self.slots.iter().map(|s| s.id.as_str()).collect();
        for slot in &self.slots {
            for dep in &slot.depends_on {
                if !known.contains(dep.as_str()) {
                    return Err(EidolonError::bad_pipeline(format!(
                        "slot '{}' depends on unknown slot '{}'",
                        slot.id, dep
                    )));
                }
            }
            for (input_name, binding) in &slot.input {
                if !known.contains(binding.slot_id.as_str()) {
                    return Err(EidolonError::bad_pipeline(format!(
                        "slot '{}' input '{}' references unknown slot '{}'",
                        slot.id, input_name, binding.slot_id
                    )));
                }
            }
        }

        Ok(())
    }

    pub fn slot(&self, id: &str) -> Option<&ModuleSlot> {
        self.slots.iter().find(|s| s.id.as_str() == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::{ModuleName, RunMode, SlotId};
    use std::collections::HashMap;

    fn slot(id: &str, depends_on: Vec<&str>) -> ModuleSlot {
        ModuleSlot {
            id: SlotId::new(id).unwrap(),
            name: ModuleName::new("crawler").unwrap(),
            config: HashMap::new(),
            run_mode: RunMode::Once,
            depends_on: depends_on.into_iter().map(|s| SlotId::new(s).unwrap()).collect(),
            input: HashMap::new(),
            mailbox_size: None,
            mailbox_policy: None,
            cycle_delay: None,
        }
    }

    #[test]
    fn duplicate_slot_ids_are_rejected() {
        let doc = PipelineDocument {
            name: "p".into(),
            description: String::new(),
            options: ExecutionOptions::default(),
            slots: vec![slot("a", vec![]), slot("a", vec![])],
        };
        assert!(doc.validate().is_err());
    }

    #[test]
    fn dependency_on_unknown_slot_is_rejected() {
        let doc = PipelineDocument {
            name: "p".into(),
            description: String::new(),
            options: ExecutionOptions::default(),
            slots: vec![slot("a", vec!["ghost"])],
        };
        assert!(doc.validate().is_err());
    }

    #[test]
    fn well_formed_document_validates() {
        let doc = PipelineDocument {
            name: "p".into(),
            description: String::new(),
            options: ExecutionOptions::default(),
            slots: vec![slot("a", vec![]), slot("b", vec!["a"])],
        };
        assert!(doc.validate().is_ok());
    }
}
