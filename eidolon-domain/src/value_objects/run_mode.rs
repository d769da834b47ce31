// /////////////////////////////////////////////////////////////////////////////
// Optimized Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Run Mode
//!
//! The scheduling discipline a module slot runs under. See the Module Host
//! component for the delivery semantics of each variant.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    /// `iterate()` invoked exactly once when the slot reaches Running.
    Once,
    /// `iterate()` invoked repeatedly with a configured cycle delay between
    /// completions.
    Loop,
    /// `iterate()` invoked once per received envelope; multiple envelopes
    /// that arrive while an iteration is in flight are coalesced.
    Reactive,
    /// `iterate()` invoked only when a sentinel message arrives on the
    /// slot's declared trigger input.
    OnTrigger,
}

impl RunMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunMode::Once => "once",
            RunMode::Loop => "loop",
            RunMode::Reactive => "reactive",
            RunMode::OnTrigger => "on_trigger",
        }
    }

    /// `on_trigger` slots require exactly one input declared `trigger: true`
    /// in the manifest; every other run mode has no such requirement.
    pub fn requires_trigger_input(&self) -> bool {
        matches!(self, RunMode::OnTrigger)
    }
}
