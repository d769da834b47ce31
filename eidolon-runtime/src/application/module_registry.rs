// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Module Registry (C3)
//!
//! Scans one or more module root directories. Each immediate subdirectory
//! containing a readable `manifest.yaml` is recorded as `{name → (path,
//! manifest, verdict)}` (§4.3); a sibling `module.sig` is read and checked
//! against the trusted-signer registry through the injected
//! [`SignatureService`]. A subdirectory with no manifest is silently
//! skipped rather than treated as an error — module roots commonly hold
//! scratch directories alongside real modules.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use eidolon_domain::entities::TrustedSigner;
use eidolon_domain::services::signature_service::DetachedSignature;
use eidolon_domain::services::{ManifestParser, ModuleHasher, SignatureService};
use eidolon_domain::value_objects::{ModuleName, Verdict};
use eidolon_domain::entities::ModuleManifest;

use crate::error::RuntimeError;

/// A module discovered on disk, with its verification verdict already
/// attached (§4.3).
#[derive(Debug, Clone)]
pub struct RegisteredModule {
    pub path: PathBuf,
    pub manifest: ModuleManifest,
    pub verdict: Verdict,
}

/// In-memory index of every module discovered across the configured module
/// roots, built once at engine startup.
#[derive(Debug, Default)]
pub struct ModuleRegistry {
    modules: HashMap<ModuleName, RegisteredModule>,
}

impl ModuleRegistry {
    /// Scans `roots` for module subdirectories, parsing and verifying each
    /// one found. Two modules of the same name across different roots are
    /// resolved first-root-wins; later duplicates are logged and skipped.
    pub async fn discover(
        roots: &[PathBuf],
        manifest_parser: &dyn ManifestParser,
        hasher: &dyn ModuleHasher,
        signature_service: &dyn SignatureService,
        trusted_signers: &[TrustedSigner],
    ) -> Result<Self, RuntimeError> {
        let mut modules = HashMap::new();

        for root in roots {
            let mut entries = match tokio::fs::read_dir(root).await {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!(target: "registry", root = %root.display(), error = %e, "cannot read module root, skipping");
                    continue;
                }
            };

            while let Some(entry) = entries.next_entry().await? {
                if !entry.file_type().await?.is_dir() {
                    continue;
                }
                let module_dir = entry.path();
                match Self::load_one(&module_dir, manifest_parser, hasher, signature_service, trusted_signers).await {
                    Ok(Some(registered)) => {
                        let name = registered.manifest.name.clone();
                        if let Some(existing) = modules.get(&name) {
                            tracing::warn!(
                                target: "registry",
                                module = %name,
                                first = %existing.path.display(),
                                duplicate = %module_dir.display(),
                                "duplicate module name across roots, keeping first discovered"
                            );
                        } else {
                            tracing::info!(target: "registry", module = %name, path = %module_dir.display(), verdict = %registered.verdict, "discovered module");
                            modules.insert(name, registered);
                        }
                    }
                    Ok(None) => {}
                    Err(e) => {
                        tracing::warn!(target: "registry", dir = %module_dir.display(), error = %e, "skipping unreadable module directory");
                    }
                }
            }
        }

        Ok(Self { modules })
    }

    async fn load_one(
        module_dir: &Path,
        manifest_parser: &dyn ManifestParser,
        hasher: &dyn ModuleHasher,
        signature_service: &dyn SignatureService,
        trusted_signers: &[TrustedSigner],
    ) -> Result<Option<RegisteredModule>, RuntimeError> {
        let manifest_path = module_dir.join("manifest.yaml");
        if tokio::fs::metadata(&manifest_path).await.is_err() {
            return Ok(None);
        }

        let manifest = manifest_parser.parse(&manifest_path).await?;
        let digest = hasher.hash_module(module_dir).await?;

        let signature_path = module_dir.join("module.sig");
        let signature = match tokio::fs::read(&signature_path).await {
            Ok(bytes) => Some(DetachedSignature {
                signer_id: String::new(),
                signature_bytes: bytes,
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => return Err(RuntimeError::Io(e)),
        };

        let verdict = signature_service.verify(&digest, signature.as_ref(), trusted_signers).await?;

        Ok(Some(RegisteredModule {
            path: module_dir.to_path_buf(),
            manifest,
            verdict,
        }))
    }

    pub fn resolve(&self, name: &ModuleName) -> Option<&RegisteredModule> {
        self.modules.get(name)
    }

    pub fn list_all(&self) -> impl Iterator<Item = &RegisteredModule> {
        self.modules.values()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
