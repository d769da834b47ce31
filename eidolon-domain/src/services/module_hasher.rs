// /////////////////////////////////////////////////////////////////////////////
// Optimized Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Module Hasher
//!
//! Domain-level port for computing a module's canonical digest (§4.2): the
//! SHA-256 over its sorted file tree, used both as the input to signature
//! verification and as the cache key for "have we already verified this
//! module version". The concrete filesystem walk and hashing lives in the
//! runtime crate's infrastructure layer.

use std::path::Path;

use async_trait::async_trait;

use crate::value_objects::ModuleDigest;
use crate::EidolonError;

#[async_trait]
pub trait ModuleHasher: Send + Sync {
    /// Computes the canonical digest of the module rooted at `module_dir`.
    async fn hash_module(&self, module_dir: &Path) -> Result<ModuleDigest, EidolonError>;
}
