// /////////////////////////////////////////////////////////////////////////////
// Optimized Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Domain Entities
//!
//! Objects with distinct identity that persists through state changes (§3).
//!
//! - [`ModuleManifest`]: one module on disk, its declared inputs/outputs and
//!   requirements.
//! - [`ModuleSlot`] / [`PipelineDocument`]: one pipeline run's wiring.
//! - [`Envelope`]: the wrapper around every in-flight payload on the bus.
//! - [`TrustedSigner`]: one entry of the trusted-signer registry.

pub mod envelope;
pub mod module_manifest;
pub mod module_slot;
pub mod pipeline_document;
pub mod trusted_signer;

pub use envelope::Envelope;
pub use module_manifest::{ModuleManifest, Port, Requirement, RuntimeDescriptor};
pub use module_slot::{InputBinding, ModuleSlot};
pub use pipeline_document::{ExecutionOptions, PipelineDocument};
pub use trusted_signer::TrustedSigner;
