// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # YAML Manifest Parser
//!
//! Concrete [`ManifestParser`] adapter (§4.1, §6): reads a module manifest
//! YAML document from disk and structurally validates it.

use std::path::Path;

use async_trait::async_trait;
use eidolon_domain::entities::ModuleManifest;
use eidolon_domain::services::ManifestParser;
use eidolon_domain::EidolonError;

#[derive(Debug, Default, Clone, Copy)]
pub struct YamlManifestParser;

impl YamlManifestParser {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ManifestParser for YamlManifestParser {
    async fn parse(&self, manifest_path: &Path) -> Result<ModuleManifest, EidolonError> {
        let path = manifest_path.to_path_buf();
        let raw = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| EidolonError::bad_manifest(format!("cannot read {}: {e}", path.display())))?;

        let manifest: ModuleManifest = serde_yaml::from_str(&raw)
            .map_err(|e| EidolonError::bad_manifest(format!("malformed manifest {}: {e}", path.display())))?;

        manifest.validate()?;
        Ok(manifest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncWriteExt;

    async fn write_manifest(dir: &tempfile::TempDir, body: &str) -> std::path::PathBuf {
        let path = dir.path().join("manifest.yaml");
        let mut f = tokio::fs::File::create(&path).await.unwrap();
        f.write_all(body.as_bytes()).await.unwrap();
        path
    }

    #[tokio::test]
    async fn parses_a_well_formed_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_manifest(
            &dir,
            r#"
name: crawler
alias: Crawler
creator: eidolon
version: 1.0.0
runtime:
  main: main.py
inputs: []
outputs:
  - name: result
    type: list<str>
    description: discovered URLs
"#,
        )
        .await;

        let parser = YamlManifestParser::new();
        let manifest = parser.parse(&path).await.unwrap();
        assert_eq!(manifest.name.as_str(), "crawler");
        assert_eq!(manifest.outputs.len(), 1);
    }

    #[tokio::test]
    async fn rejects_a_manifest_with_an_unparseable_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_manifest(
            &dir,
            r#"
name: crawler
alias: Crawler
creator: eidolon
version: 1.0.0
runtime:
  main: main.py
outputs:
  - name: result
    type: not a type
"#,
        )
        .await;

        let parser = YamlManifestParser::new();
        assert!(parser.parse(&path).await.is_err());
    }

    #[tokio::test]
    async fn rejects_a_missing_file() {
        let parser = YamlManifestParser::new();
        let err = parser.parse(Path::new("/nonexistent/manifest.yaml")).await.unwrap_err();
        assert_eq!(err.category(), "bad_manifest");
    }
}
