// /////////////////////////////////////////////////////////////////////////////
// Optimized Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Admission Policy
//!
//! The pure decision matrix of §4.3: given a security mode and a signature
//! verdict, decide whether a module is admitted, admitted with a warning,
//! rejected outright, or requires an interactive prompt.

use crate::value_objects::{Admission, SecurityMode, Verdict};

/// Implements the §4.3 admission matrix.
///
/// | Mode       | VerifiedByTrusted | SignedButUntrusted | Unsigned | Invalid |
/// |------------|--------------------|---------------------|----------|---------|
/// | paranoid   | Admit              | Reject              | Reject   | Reject  |
/// | default    | Admit              | Prompt              | Prompt   | Reject  |
/// | permissive | Admit              | AdmitWithWarning    | AdmitWithWarning | Reject |
pub fn decide(mode: SecurityMode, verdict: &Verdict) -> Admission {
    match (mode, verdict) {
        (_, Verdict::Invalid) => Admission::Reject,
        (_, Verdict::VerifiedByTrusted { .. }) => Admission::Admit,
        (SecurityMode::Paranoid, Verdict::SignedButUntrusted) => Admission::Reject,
        (SecurityMode::Paranoid, Verdict::Unsigned) => Admission::Reject,
        (SecurityMode::Default, Verdict::SignedButUntrusted) => Admission::Prompt,
        (SecurityMode::Default, Verdict::Unsigned) => Admission::Prompt,
        (SecurityMode::Permissive, Verdict::SignedButUntrusted) => Admission::AdmitWithWarning,
        (SecurityMode::Permissive, Verdict::Unsigned) => Admission::AdmitWithWarning,
    }
}
