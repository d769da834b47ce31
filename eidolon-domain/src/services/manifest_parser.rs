// /////////////////////////////////////////////////////////////////////////////
// Optimized Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Manifest Parser
//!
//! Domain-level port for loading a [`ModuleManifest`] from disk (§4.1, §6).
//! The concrete implementation (YAML parsing, path resolution) lives in the
//! runtime crate; the port keeps the domain free of any file-format
//! dependency beyond the shape of the manifest itself.

use std::path::Path;

use async_trait::async_trait;

use crate::entities::ModuleManifest;
use crate::EidolonError;

#[async_trait]
pub trait ManifestParser: Send + Sync {
    /// Parses and structurally validates the manifest at `manifest_path`.
    async fn parse(&self, manifest_path: &Path) -> Result<ModuleManifest, EidolonError>;
}
