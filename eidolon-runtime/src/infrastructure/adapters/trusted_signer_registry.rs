// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Trusted Signer Registry
//!
//! Loads and persists the JSON-backed trusted-signer registry (§4.2, §6):
//! `{ "<signer-id>": {"pubkey": "<PEM>", "comment": "<text>"} }`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use eidolon_domain::entities::TrustedSigner;
use eidolon_domain::value_objects::SignerId;
use eidolon_domain::EidolonError;

#[derive(Debug, Serialize, Deserialize)]
struct SignerRecord {
    pubkey: String,
    #[serde(default)]
    comment: String,
}

/// The trusted-signer registry, backed by a single JSON file on disk.
#[derive(Debug, Clone)]
pub struct TrustedSignerRegistry {
    path: PathBuf,
}

impl TrustedSignerRegistry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Loads the registry. A missing file is treated as an empty registry —
    /// the engine runs with no trusted signers rather than refusing to
    /// start.
    pub async fn load(&self) -> Result<Vec<TrustedSigner>, EidolonError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(EidolonError::internal(format!("cannot read {}: {e}", self.path.display()))),
        };

        let records: BTreeMap<String, SignerRecord> =
            serde_json::from_str(&raw).map_err(|e| EidolonError::internal(format!("malformed trusted signer registry: {e}")))?;

        records
            .into_iter()
            .map(|(id, record)| {
                let signer_id = SignerId::new(id)?;
                Ok(TrustedSigner::new(signer_id, record.pubkey, record.comment))
            })
            .collect()
    }

    /// Persists `signers` back to disk, overwriting the file.
    pub async fn save(&self, signers: &[TrustedSigner]) -> Result<(), EidolonError> {
        let records: BTreeMap<String, SignerRecord> = signers
            .iter()
            .map(|s| {
                (
                    s.signer_id.as_str().to_string(),
                    SignerRecord {
                        pubkey: s.public_key_pem.clone(),
                        comment: s.comment.clone(),
                    },
                )
            })
            .collect();

        let serialized = serde_json::to_string_pretty(&records)
            .map_err(|e| EidolonError::internal(format!("cannot serialize trusted signer registry: {e}")))?;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| EidolonError::internal(format!("cannot create {}: {e}", parent.display())))?;
        }

        tokio::fs::write(&self.path, serialized)
            .await
            .map_err(|e| EidolonError::internal(format!("cannot write {}: {e}", self.path.display())))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn a_missing_registry_file_loads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let registry = TrustedSignerRegistry::new(dir.path().join("trusted.json"));
        assert!(registry.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn round_trips_through_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let registry = TrustedSignerRegistry::new(dir.path().join("trusted.json"));

        let signers = vec![TrustedSigner::new(
            SignerId::new("alice").unwrap(),
            "-----BEGIN PUBLIC KEY-----\nabc\n-----END PUBLIC KEY-----\n".to_string(),
            "Alice's key".to_string(),
        )];

        registry.save(&signers).await.unwrap();
        let loaded = registry.load().await.unwrap();
        assert_eq!(loaded, signers);
    }
}
