// /////////////////////////////////////////////////////////////////////////////
// Optimized Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Security Mode
//!
//! The operator-selected strictness the admission policy (see
//! `services::admission_policy`) evaluates verification verdicts against.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::EidolonError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecurityMode {
    /// Only `Verified-by-trusted` modules are admitted; everything else is
    /// rejected outright.
    Paranoid,
    /// `Signed-but-untrusted`/`Unsigned` modules are offered to the prompt
    /// capability; `Invalid` is rejected.
    Default,
    /// Every verdict is admitted; anything short of
    /// `Verified-by-trusted` is admitted with a warning.
    Permissive,
}

impl Default for SecurityMode {
    fn default() -> Self {
        SecurityMode::Default
    }
}

impl FromStr for SecurityMode {
    type Err = EidolonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "paranoid" => Ok(SecurityMode::Paranoid),
            "default" => Ok(SecurityMode::Default),
            "permissive" => Ok(SecurityMode::Permissive),
            other => Err(EidolonError::bad_pipeline(format!(
                "unknown security mode '{other}', expected paranoid|default|permissive"
            ))),
        }
    }
}
