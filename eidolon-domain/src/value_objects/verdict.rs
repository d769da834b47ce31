// /////////////////////////////////////////////////////////////////////////////
// Optimized Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Verification Verdict
//!
//! The outcome of signature verification for a single module, plus the
//! admission/prompt decisions layered on top of it by the Module Registry.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::value_objects::SignerId;

/// Outcome of `verify(module-dir, trusted-signers)` (§4.2).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// The module's detached signature verified against a known signer.
    VerifiedByTrusted { signer: SignerId },
    /// A syntactically well-formed signature exists but verifies against no
    /// known trusted signer.
    SignedButUntrusted,
    /// No `module.sig` file is present.
    Unsigned,
    /// A `module.sig` file is present but is not a well-formed signature.
    Invalid,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::VerifiedByTrusted { signer } => write!(f, "Verified-by-trusted({signer})"),
            Verdict::SignedButUntrusted => write!(f, "Signed-but-untrusted"),
            Verdict::Unsigned => write!(f, "Unsigned"),
            Verdict::Invalid => write!(f, "Invalid"),
        }
    }
}

/// Outcome of the admission policy (§4.3) for a single (verdict, mode) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    Admit,
    AdmitWithWarning,
    Reject,
    /// Delegated to the injected prompt capability; the engine must call it
    /// and act on the `PromptDecision` it returns.
    Prompt,
}

/// Response from the injected `prompt(module-name, reason)` capability
/// (§4.3). The core never talks to a terminal directly; a `Prompt` capability
/// is supplied by the bootstrap/CLI shell (or a test double).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptDecision {
    AllowOnce,
    Deny,
    /// Remembered for the remainder of the engine's lifetime only — never
    /// persisted across runs.
    AllowAlways,
}
