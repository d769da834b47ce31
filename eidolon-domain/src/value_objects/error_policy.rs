// /////////////////////////////////////////////////////////////////////////////
// Optimized Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Error Policy
//!
//! Classifies how a `ModuleFault` raised from `initialise`/`iterate`/
//! `on_input`/`teardown` is resolved, pipeline-wide.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorPolicy {
    /// Signal engine-wide shutdown.
    Halt,
    /// Continue iterating; increment the error counter.
    Continue,
    /// Transition the faulting slot to Terminated but leave the rest
    /// running.
    Isolate,
    /// Continue silently after logging.
    LogOnly,
}

impl Default for ErrorPolicy {
    fn default() -> Self {
        ErrorPolicy::Halt
    }
}
