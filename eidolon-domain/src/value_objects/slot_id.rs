// /////////////////////////////////////////////////////////////////////////////
// Optimized Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Slot Identifier
//!
//! A `SlotId` names one occurrence of a module within a pipeline document. It
//! is operator-chosen (declared in the pipeline YAML), not generated, and
//! must be unique within its pipeline.

use crate::EidolonError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of a module slot within a pipeline document.
///
/// # Validation
/// Non-empty, at most 64 bytes, restricted to `[a-z0-9_-]` so it is safe to
/// use as a bus topic-name component (`"<slotId>.<outputName>"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotId(String);

impl SlotId {
    pub fn new(id: impl Into<String>) -> Result<Self, EidolonError> {
        let id = id.into();
        if id.is_empty() || id.len() > 64 {
            return Err(EidolonError::bad_pipeline(format!(
                "slot id must be 1-64 bytes, got {} bytes",
                id.len()
            )));
        }
        if !id
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_' || b == b'-')
        {
            return Err(EidolonError::bad_pipeline(format!(
                "slot id '{id}' must match [a-z0-9_-]+"
            )));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for SlotId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
