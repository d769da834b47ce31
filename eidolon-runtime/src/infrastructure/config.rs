// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Engine Configuration
//!
//! Layered configuration for engine-wide defaults that outlive any single
//! pipeline document (§10.3): built-in defaults, overridden by an optional
//! TOML/YAML configuration file, overridden in turn by `EIDOLON_*`-prefixed
//! environment variables (double-underscore nesting separator).
//!
//! `MODULE_DIR` and `PIPELINE_DIR` (§6) are a separate, unprefixed pair of
//! environment variables naming filesystem search roots; they are read
//! directly rather than through the layered config, matching the teacher's
//! split between "engine configuration" and "search path discovery".

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::RuntimeError;

fn default_mailbox_size() -> usize {
    64
}

fn default_cycle_delay_secs() -> u64 {
    1
}

fn default_grace_period_secs() -> u64 {
    10
}

fn default_translation_cache_size() -> usize {
    1024
}

fn default_trusted_signers_path() -> String {
    "trusted_signers.json".to_string()
}

/// Engine-wide defaults a pipeline document may not override (§10.3). A
/// pipeline document's own `execution` block always wins for the values it
/// specifies; these are only the fallbacks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_mailbox_size")]
    pub default_mailbox_size: usize,
    #[serde(default = "default_cycle_delay_secs")]
    pub default_cycle_delay_secs: u64,
    #[serde(default = "default_grace_period_secs")]
    pub default_grace_period_secs: u64,
    #[serde(default = "default_translation_cache_size")]
    pub translation_cache_size: usize,
    #[serde(default = "default_trusted_signers_path")]
    pub trusted_signers_path: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_mailbox_size: default_mailbox_size(),
            default_cycle_delay_secs: default_cycle_delay_secs(),
            default_grace_period_secs: default_grace_period_secs(),
            translation_cache_size: default_translation_cache_size(),
            trusted_signers_path: default_trusted_signers_path(),
        }
    }
}

impl EngineConfig {
    pub fn default_cycle_delay(&self) -> Duration {
        Duration::from_secs(self.default_cycle_delay_secs)
    }

    pub fn default_grace_period(&self) -> Duration {
        Duration::from_secs(self.default_grace_period_secs)
    }

    pub fn trusted_signers_path(&self) -> PathBuf {
        PathBuf::from(&self.trusted_signers_path)
    }
}

/// Loads [`EngineConfig`], layering defaults, an optional config file, and
/// `EIDOLON_`-prefixed environment variables, in that order of increasing
/// precedence.
pub struct ConfigService;

impl ConfigService {
    pub fn load(config_path: Option<&Path>) -> Result<EngineConfig, RuntimeError> {
        let defaults = Config::try_from(&EngineConfig::default())?;

        let mut builder = Config::builder().add_source(defaults);
        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path).required(false));
        }
        builder = builder.add_source(Environment::with_prefix("EIDOLON").separator("__"));

        let merged = builder.build()?;
        let config: EngineConfig = merged.try_deserialize()?;
        Ok(config)
    }
}

/// Splits a colon- or semicolon-separated search path into component
/// directories, the way `MODULE_DIR`/`PIPELINE_DIR` are documented (§6).
fn split_search_path(raw: &str) -> Vec<PathBuf> {
    raw.split([':', ';']).filter(|s| !s.is_empty()).map(PathBuf::from).collect()
}

/// Module root directories from `MODULE_DIR` (§6), empty if unset.
pub fn module_search_paths() -> Vec<PathBuf> {
    std::env::var("MODULE_DIR").map(|raw| split_search_path(&raw)).unwrap_or_default()
}

/// Pipeline document search roots from `PIPELINE_DIR` (§6), empty if unset.
pub fn pipeline_search_paths() -> Vec<PathBuf> {
    std::env::var("PIPELINE_DIR").map(|raw| split_search_path(&raw)).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_load_with_no_file_and_no_env() {
        let config = ConfigService::load(None).unwrap();
        assert_eq!(config.default_mailbox_size, 64);
        assert_eq!(config.translation_cache_size, 1024);
    }

    #[test]
    fn splits_colon_and_semicolon_separated_search_paths() {
        assert_eq!(
            split_search_path("/a/modules:/b/modules"),
            vec![PathBuf::from("/a/modules"), PathBuf::from("/b/modules")]
        );
        assert_eq!(
            split_search_path("/a/modules;/b/modules"),
            vec![PathBuf::from("/a/modules"), PathBuf::from("/b/modules")]
        );
    }

    #[test]
    fn empty_search_path_yields_no_roots() {
        assert!(split_search_path("").is_empty());
    }
}
