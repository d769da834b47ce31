// /////////////////////////////////////////////////////////////////////////////
// Optimized Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Canonical Module Digest
//!
//! The deterministic SHA-256 over a module's sorted file tree (§4.2). This
//! value object only carries the 32 raw bytes and its hex encoding; the
//! algorithm that produces it is an infrastructure concern (`ModuleHasher`
//! port in `services::module_hasher`, concrete `Sha256ModuleHasher` adapter
//! in the runtime crate) because it walks the filesystem.

use crate::EidolonError;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModuleDigest([u8; 32]);

impl ModuleDigest {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(s: &str) -> Result<Self, EidolonError> {
        let bytes = hex::decode(s).map_err(|e| EidolonError::internal(e.to_string()))?;
        let bytes: [u8; 32] = bytes
            .try_into()
            .map_err(|v: Vec<u8>| EidolonError::internal(format!("digest must be 32 bytes, got {}", v.len())))?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for ModuleDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
