// /////////////////////////////////////////////////////////////////////////////
// Optimized Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Domain Error System
//!
//! A single, hierarchical error enum covering every configuration-time,
//! per-module, and per-delivery failure kind the domain distinguishes.
//!
//! ## Error Categories
//!
//! - **Configuration-time** (`BadManifest`, `BadPipeline`, `Cycle`,
//!   `UnknownModule`, `UnknownOutput`, `TypeIncompatible`): fatal for the
//!   affected pipeline, surfaced before any module runs.
//! - **Security** (`SecurityRejected`): per-module; the affected slot and its
//!   downstream transitive closure are removed, not fatal to the whole run
//!   unless no slots remain.
//! - **Per-delivery** (`TranslationFailure`, `MailboxOverflow`): contained at
//!   the subscriber boundary, never propagated past it.
//! - **Per-module** (`ModuleFault`, `ShutdownTimeout`): resolved according to
//!   the pipeline's `error_policy`.

use thiserror::Error;

/// Domain-specific errors for the dataflow runtime.
///
/// Every variant carries the structured context (slot id, input/output name,
/// verdict, …) a caller needs to react programmatically rather than matching
/// on a formatted message.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EidolonError {
    #[error("bad manifest: {0}")]
    BadManifest(String),

    #[error("bad pipeline: {0}")]
    BadPipeline(String),

    #[error("dependency cycle among slots: {0:?}")]
    Cycle(Vec<String>),

    #[error("unknown module '{0}'")]
    UnknownModule(String),

    #[error("slot '{slot_id}' declares no output named '{output}'")]
    UnknownOutput { slot_id: String, output: String },

    #[error(
        "type mismatch wiring {src_slot}.{src_output} ({src_type}) into {dst_slot}.{dst_input} ({dst_type})"
    )]
    TypeIncompatible {
        src_slot: String,
        src_output: String,
        src_type: String,
        dst_slot: String,
        dst_input: String,
        dst_type: String,
    },

    #[error("module '{module}' rejected by security policy: {verdict}")]
    SecurityRejected {
        module: String,
        verdict: String,
        signer: Option<String>,
    },

    #[error("translation failure {src} -> {dst}: {reason}")]
    TranslationFailure {
        src: String,
        dst: String,
        reason: String,
    },

    #[error("module fault in slot '{slot_id}' during {phase}: {cause}")]
    ModuleFault {
        slot_id: String,
        phase: String,
        cause: String,
    },

    #[error("mailbox overflow on slot '{slot_id}' input '{input}' (policy: {policy})")]
    MailboxOverflow {
        slot_id: String,
        input: String,
        policy: String,
    },

    #[error("shutdown grace period exceeded for slot '{slot_id}'")]
    ShutdownTimeout { slot_id: String },

    #[error("IO error: {0}")]
    Io(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl EidolonError {
    pub fn bad_manifest(msg: impl Into<String>) -> Self {
        Self::BadManifest(msg.into())
    }

    pub fn bad_pipeline(msg: impl Into<String>) -> Self {
        Self::BadPipeline(msg.into())
    }

    pub fn unknown_output(slot_id: impl Into<String>, output: impl Into<String>) -> Self {
        Self::UnknownOutput {
            slot_id: slot_id.into(),
            output: output.into(),
        }
    }

    pub fn module_fault(
        slot_id: impl Into<String>,
        phase: impl Into<String>,
        cause: impl Into<String>,
    ) -> Self {
        Self::ModuleFault {
            slot_id: slot_id.into(),
            phase: phase.into(),
            cause: cause.into(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Configuration-time errors are fatal to the whole run before any module
    /// is constructed; everything else is contained to a slot or a delivery.
    pub fn is_fatal_to_run(&self) -> bool {
        matches!(
            self,
            EidolonError::BadManifest(_)
                | EidolonError::BadPipeline(_)
                | EidolonError::Cycle(_)
                | EidolonError::UnknownModule(_)
                | EidolonError::UnknownOutput { .. }
                | EidolonError::TypeIncompatible { .. }
        )
    }

    pub fn is_security_error(&self) -> bool {
        matches!(self, EidolonError::SecurityRejected { .. })
    }

    /// Stable, test-assertable category tag per §7 of the specification.
    pub fn category(&self) -> &'static str {
        match self {
            EidolonError::BadManifest(_) => "bad_manifest",
            EidolonError::BadPipeline(_) => "bad_pipeline",
            EidolonError::Cycle(_) => "cycle",
            EidolonError::UnknownModule(_) => "unknown_module",
            EidolonError::UnknownOutput { .. } => "unknown_output",
            EidolonError::TypeIncompatible { .. } => "type_incompatible",
            EidolonError::SecurityRejected { .. } => "security_rejected",
            EidolonError::TranslationFailure { .. } => "translation_failure",
            EidolonError::ModuleFault { .. } => "module_fault",
            EidolonError::MailboxOverflow { .. } => "mailbox_overflow",
            EidolonError::ShutdownTimeout { .. } => "shutdown_timeout",
            EidolonError::Io(_) => "io",
            EidolonError::Serialization(_) => "serialization",
            EidolonError::Internal(_) => "internal",
        }
    }
}

impl From<std::io::Error> for EidolonError {
    fn from(err: std::io::Error) -> Self {
        EidolonError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for EidolonError {
    fn from(err: serde_json::Error) -> Self {
        EidolonError::Serialization(err.to_string())
    }
}
