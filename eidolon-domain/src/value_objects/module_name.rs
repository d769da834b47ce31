// /////////////////////////////////////////////////////////////////////////////
// Optimized Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Module Name
//!
//! The unique, lowercase identifier by which a module manifest is named and
//! by which a pipeline slot resolves it through the Module Registry.

use crate::EidolonError;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleName(String);

impl ModuleName {
    /// # Errors
    /// Returns `BadManifest` if `name` is empty, longer than 64 bytes, or
    /// contains anything outside `[a-z0-9_-]`.
    pub fn new(name: impl Into<String>) -> Result<Self, EidolonError> {
        let name = name.into();
        if name.is_empty() || name.len() > 64 {
            return Err(EidolonError::bad_manifest(format!(
                "module name must be 1-64 bytes, got {} bytes",
                name.len()
            )));
        }
        if !name
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_' || b == b'-')
        {
            return Err(EidolonError::bad_manifest(format!(
                "module name '{name}' must match [a-z0-9_-]+"
            )));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_name_roundtrips() {
        let name = ModuleName::new("url_cleaner").unwrap();
        assert_eq!(name.as_str(), "url_cleaner");
    }

    #[test]
    fn rejects_invalid_characters() {
        assert!(ModuleName::new("URL Cleaner").is_err());
    }
}
