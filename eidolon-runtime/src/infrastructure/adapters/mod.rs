// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Adapters
//!
//! Concrete implementations of the ports declared in
//! `eidolon_domain::services` (§4.1, §4.2).

pub mod manifest_parser;
pub mod module_hasher;
pub mod pipeline_parser;
pub mod signature_service;
pub mod trusted_signer_registry;

pub use manifest_parser::YamlManifestParser;
pub use module_hasher::Sha256ModuleHasher;
pub use pipeline_parser::YamlPipelineParser;
pub use signature_service::RsaPssSignatureService;
pub use trusted_signer_registry::TrustedSignerRegistry;
