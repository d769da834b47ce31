// /////////////////////////////////////////////////////////////////////////////
// Optimized Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Runtime Error
//!
//! Wraps [`EidolonError`] with the infrastructure failure modes the domain
//! crate has no business knowing about: I/O, YAML/JSON parsing, RSA key
//! parsing, and configuration-layer failures (§10.1). Every fallible
//! infrastructure operation in this crate returns `Result<T, RuntimeError>`.

use eidolon_domain::EidolonError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error(transparent)]
    Domain(#[from] EidolonError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("RSA key error: {0}")]
    Rsa(#[from] rsa::Error),

    #[error("PKCS#8 key error: {0}")]
    Pkcs8(#[from] pkcs8::Error),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl RuntimeError {
    /// Configuration-time failures (including every infrastructure failure
    /// mode this enum adds) are fatal to the run; domain errors defer to
    /// [`EidolonError::is_fatal_to_run`].
    pub fn is_fatal_to_run(&self) -> bool {
        match self {
            RuntimeError::Domain(e) => e.is_fatal_to_run(),
            _ => true,
        }
    }

    pub fn is_security_error(&self) -> bool {
        matches!(self, RuntimeError::Domain(e) if e.is_security_error())
    }

    /// Stable category tag, mirroring [`EidolonError::category`] and
    /// extending it with the infrastructure failure modes this crate adds.
    pub fn category(&self) -> &'static str {
        match self {
            RuntimeError::Domain(e) => e.category(),
            RuntimeError::Io(_) => "io",
            RuntimeError::Yaml(_) => "yaml",
            RuntimeError::Json(_) => "json",
            RuntimeError::Rsa(_) => "rsa",
            RuntimeError::Pkcs8(_) => "pkcs8",
            RuntimeError::Config(_) => "config",
        }
    }

    /// Borrows the wrapped domain error, if this is one — used by the
    /// bootstrap exit-code mapping, which only distinguishes domain error
    /// categories (§7, §10.1).
    pub fn as_domain_error(&self) -> Option<&EidolonError> {
        match self {
            RuntimeError::Domain(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_error_fatality_is_delegated() {
        let err = RuntimeError::Domain(EidolonError::bad_pipeline("cycle"));
        assert!(err.is_fatal_to_run());
        assert_eq!(err.category(), "bad_pipeline");
    }

    #[test]
    fn infrastructure_errors_are_fatal_to_the_run() {
        let err = RuntimeError::Yaml(serde_yaml::from_str::<()>("[").unwrap_err());
        assert!(err.is_fatal_to_run());
        assert_eq!(err.category(), "yaml");
    }

    #[test]
    fn as_domain_error_unwraps_only_the_domain_variant() {
        let err = RuntimeError::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "missing"));
        assert!(err.as_domain_error().is_none());
    }
}
