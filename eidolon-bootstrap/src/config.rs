// /////////////////////////////////////////////////////////////////////////////
// Optimized Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Bootstrap Configuration
//!
//! `BootstrapConfig` holds the settings this layer resolves before handing
//! control to the engine: which pipeline to run, the process-wide security
//! posture, and the logging/config-file knobs common to every binary this
//! codebase ships. It is immutable once built — no synchronization is
//! needed to share it across the async tasks the engine spawns.
//!
//! Layered merging of an on-disk engine configuration file with
//! `EIDOLON_*` environment variables is `eidolon-runtime`'s job (§10.3);
//! this structure only carries what the CLI itself resolved.

use std::collections::BTreeMap;
use std::path::PathBuf;

use eidolon_domain::value_objects::SecurityMode;

/// Bootstrap-phase configuration, immutable after construction.
#[derive(Debug, Clone)]
pub struct BootstrapConfig {
    /// Name or path of the pipeline document to run.
    pipeline: Option<String>,

    /// Security posture for module admission.
    security_mode: SecurityMode,

    /// Admit unsigned/untrusted modules without prompting (testing/dev
    /// convenience; still subject to the admission policy for `paranoid`).
    allow_unverified: bool,

    /// `slot.key=value` overrides collected from repeated `--set` flags.
    overrides: BTreeMap<String, serde_json::Value>,

    /// Optional engine configuration file (§10.3).
    config_file: Option<PathBuf>,

    /// Verbose logging requested.
    verbose: bool,
}

impl BootstrapConfig {
    pub fn builder() -> BootstrapConfigBuilder {
        BootstrapConfigBuilder::default()
    }

    pub fn pipeline(&self) -> Option<&str> {
        self.pipeline.as_deref()
    }

    pub fn security_mode(&self) -> SecurityMode {
        self.security_mode
    }

    pub fn allow_unverified(&self) -> bool {
        self.allow_unverified
    }

    pub fn overrides(&self) -> &BTreeMap<String, serde_json::Value> {
        &self.overrides
    }

    pub fn config_file(&self) -> Option<&PathBuf> {
        self.config_file.as_ref()
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Builder for [`BootstrapConfig`].
#[derive(Debug, Default)]
pub struct BootstrapConfigBuilder {
    pipeline: Option<String>,
    security_mode: Option<SecurityMode>,
    allow_unverified: bool,
    overrides: BTreeMap<String, serde_json::Value>,
    config_file: Option<PathBuf>,
    verbose: bool,
}

impl BootstrapConfigBuilder {
    pub fn pipeline(mut self, name: impl Into<String>) -> Self {
        self.pipeline = Some(name.into());
        self
    }

    pub fn security_mode(mut self, mode: SecurityMode) -> Self {
        self.security_mode = Some(mode);
        self
    }

    pub fn allow_unverified(mut self, allow: bool) -> Self {
        self.allow_unverified = allow;
        self
    }

    pub fn overrides(mut self, overrides: BTreeMap<String, serde_json::Value>) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    pub fn verbose(mut self, enabled: bool) -> Self {
        self.verbose = enabled;
        self
    }

    pub fn build(self) -> BootstrapConfig {
        BootstrapConfig {
            pipeline: self.pipeline,
            security_mode: self.security_mode.unwrap_or_default(),
            allow_unverified: self.allow_unverified,
            overrides: self.overrides,
            config_file: self.config_file,
            verbose: self.verbose,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_security_mode_is_the_domain_default() {
        let config = BootstrapConfig::builder().pipeline("crawl").build();
        assert_eq!(config.security_mode(), SecurityMode::default());
        assert_eq!(config.pipeline(), Some("crawl"));
        assert!(!config.allow_unverified());
    }

    #[test]
    fn builder_carries_overrides_through() {
        let mut overrides = BTreeMap::new();
        overrides.insert("crawler.depth".to_string(), serde_json::json!(3));

        let config = BootstrapConfig::builder()
            .pipeline("crawl")
            .security_mode(SecurityMode::Paranoid)
            .overrides(overrides)
            .build();

        assert_eq!(config.security_mode(), SecurityMode::Paranoid);
        assert_eq!(
            config.overrides().get("crawler.depth"),
            Some(&serde_json::json!(3))
        );
    }
}
