// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # SHA-256 Module Hasher
//!
//! Concrete [`ModuleHasher`] adapter (§4.2): walks a module directory,
//! excludes signature files and cache artefacts, sorts the remaining files
//! lexicographically by relative path, and folds `path \0 bytes \0` for each
//! into a running SHA-256. The algorithm is bit-for-bit load-bearing — any
//! change here changes every module's digest and invalidates every existing
//! signature.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use eidolon_domain::services::ModuleHasher;
use eidolon_domain::value_objects::ModuleDigest;
use eidolon_domain::EidolonError;

/// Directory names recognised as bytecode/build caches and excluded from the
/// digest walk alongside `.sig` files (§4.2 step 1).
const EXCLUDED_DIR_NAMES: &[&str] = &["__pycache__", ".mypy_cache", ".pytest_cache", "target", "node_modules", ".git"];

#[derive(Debug, Default, Clone, Copy)]
pub struct Sha256ModuleHasher;

impl Sha256ModuleHasher {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ModuleHasher for Sha256ModuleHasher {
    async fn hash_module(&self, module_dir: &Path) -> Result<ModuleDigest, EidolonError> {
        let module_dir = module_dir.to_path_buf();
        tokio::task::spawn_blocking(move || hash_module_sync(&module_dir))
            .await
            .map_err(|e| EidolonError::internal(format!("hasher task panicked: {e}")))?
    }
}

fn hash_module_sync(module_dir: &Path) -> Result<ModuleDigest, EidolonError> {
    let mut files = collect_files(module_dir, module_dir)?;
    files.sort();

    let mut hasher = Sha256::new();
    for relative in &files {
        let absolute = module_dir.join(relative);
        let bytes = std::fs::read(&absolute)
            .map_err(|e| EidolonError::internal(format!("cannot read {}: {e}", absolute.display())))?;
        hasher.update(relative.as_bytes());
        hasher.update([0u8]);
        hasher.update(&bytes);
        hasher.update([0u8]);
    }

    let digest: [u8; 32] = hasher.finalize().into();
    Ok(ModuleDigest::from_bytes(digest))
}

/// Recursively collects forward-slash relative paths of every regular,
/// non-excluded file beneath `dir`.
fn collect_files(root: &Path, dir: &Path) -> Result<Vec<String>, EidolonError> {
    let mut out = Vec::new();
    let entries =
        std::fs::read_dir(dir).map_err(|e| EidolonError::internal(format!("cannot read {}: {e}", dir.display())))?;

    for entry in entries {
        let entry = entry.map_err(|e| EidolonError::internal(format!("directory walk failed: {e}")))?;
        let path = entry.path();
        let file_type = entry
            .file_type()
            .map_err(|e| EidolonError::internal(format!("cannot stat {}: {e}", path.display())))?;

        if file_type.is_dir() {
            let name = entry.file_name();
            if EXCLUDED_DIR_NAMES.iter().any(|excluded| name == *excluded) {
                continue;
            }
            out.extend(collect_files(root, &path)?);
            continue;
        }

        if !file_type.is_file() {
            continue;
        }
        if path.extension().is_some_and(|ext| ext == "sig") {
            continue;
        }

        out.push(relative_slash_path(root, &path));
    }

    Ok(out)
}

fn relative_slash_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn make_module(files: &[(&str, &[u8])]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for (relative, bytes) in files {
            let path = dir.path().join(relative);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(path, bytes).unwrap();
        }
        dir
    }

    #[tokio::test]
    async fn digest_is_stable_across_directory_iteration_order() {
        let a = make_module(&[("b.py", b"two"), ("a.py", b"one"), ("manifest.yaml", b"m")]);
        let b = make_module(&[("manifest.yaml", b"m"), ("a.py", b"one"), ("b.py", b"two")]);

        let hasher = Sha256ModuleHasher::new();
        let digest_a = hasher.hash_module(a.path()).await.unwrap();
        let digest_b = hasher.hash_module(b.path()).await.unwrap();
        assert_eq!(digest_a, digest_b);
    }

    #[tokio::test]
    async fn sig_files_and_cache_directories_are_excluded() {
        let with_extras = make_module(&[
            ("main.py", b"code"),
            ("module.sig", b"should-be-ignored"),
            ("__pycache__/main.cpython-311.pyc", b"should-be-ignored-too"),
        ]);
        let without_extras = make_module(&[("main.py", b"code")]);

        let hasher = Sha256ModuleHasher::new();
        let digest_with = hasher.hash_module(with_extras.path()).await.unwrap();
        let digest_without = hasher.hash_module(without_extras.path()).await.unwrap();
        assert_eq!(digest_with, digest_without);
    }

    #[tokio::test]
    async fn different_content_yields_different_digest() {
        let a = make_module(&[("main.py", b"version one")]);
        let b = make_module(&[("main.py", b"version two")]);

        let hasher = Sha256ModuleHasher::new();
        let digest_a = hasher.hash_module(a.path()).await.unwrap();
        let digest_b = hasher.hash_module(b.path()).await.unwrap();
        assert_ne!(digest_a, digest_b);
    }
}
