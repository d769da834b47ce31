// /////////////////////////////////////////////////////////////////////////////
// Optimized Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Secure Command-Line Argument Parsing
//!
//! Security-first argument validation applied after `clap` has parsed the
//! raw arguments, following this codebase's existing bootstrap CLI
//! validator.
//!
//! ## Dangerous Patterns Detected
//!
//! - `..` - Path traversal
//! - `~` - Home directory expansion
//! - `$` - Variable expansion
//! - Backticks - Command substitution
//! - `;` `&` `|` - Command chaining
//! - `>` `<` - Redirection
//! - Null bytes, newlines, carriage returns

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Maximum single argument length.
const MAX_ARG_LENGTH: usize = 1000;

/// Maximum path length.
const MAX_PATH_LENGTH: usize = 4096;

const DANGEROUS_PATTERNS: &[&str] = &[
    "..", "~", "$", "`", ";", "&", "|", ">", "<", "\n", "\r", "\0",
];

const PROTECTED_DIRS: &[&str] = &["/etc", "/bin", "/sbin", "/usr/bin", "/usr/sbin", "/boot", "/sys", "/proc", "/dev"];

/// Secure argument parsing errors.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    #[error("argument too long (max {MAX_ARG_LENGTH} characters): {0}")]
    ArgumentTooLong(String),

    #[error("dangerous pattern '{pattern}' detected in argument: {arg}")]
    DangerousPattern { pattern: String, arg: String },

    #[error("path exceeds maximum length (max {MAX_PATH_LENGTH})")]
    PathTooLong,

    #[error("access to protected system directory denied: {0}")]
    ProtectedDirectory(String),

    #[error("path does not exist: {0}")]
    PathNotFound(String),

    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("invalid value for {arg}: {reason}")]
    InvalidValue { arg: String, reason: String },
}

/// Security-first argument parser: path canonicalization, pattern
/// detection, and range checks applied to already-clap-parsed values.
pub struct SecureArgParser;

impl SecureArgParser {
    /// Validate a single argument string for dangerous patterns.
    pub fn validate_argument(arg: &str) -> Result<(), ParseError> {
        if arg.len() > MAX_ARG_LENGTH {
            return Err(ParseError::ArgumentTooLong(arg.chars().take(50).collect::<String>() + "..."));
        }

        for pattern in DANGEROUS_PATTERNS {
            if arg.contains(pattern) {
                return Err(ParseError::DangerousPattern {
                    pattern: pattern.to_string(),
                    arg: arg.to_string(),
                });
            }
        }

        Ok(())
    }

    /// Validate and canonicalize a path argument that must already exist.
    pub fn validate_path(path: &str) -> Result<PathBuf, ParseError> {
        Self::validate_argument(path).map_err(|e| match e {
            ParseError::ArgumentTooLong(_) => ParseError::InvalidPath(format!("path too long: {path}")),
            ParseError::DangerousPattern { pattern, .. } => {
                ParseError::InvalidPath(format!("path contains dangerous pattern '{pattern}': {path}"))
            }
            other => other,
        })?;

        let path_obj = Path::new(path);
        let canonical = path_obj.canonicalize().map_err(|e| {
            if !path_obj.exists() {
                ParseError::PathNotFound(path.to_string())
            } else {
                ParseError::InvalidPath(format!("{path}: {e}"))
            }
        })?;

        if canonical.to_string_lossy().len() > MAX_PATH_LENGTH {
            return Err(ParseError::PathTooLong);
        }

        for protected in PROTECTED_DIRS {
            if canonical.starts_with(protected) {
                return Err(ParseError::ProtectedDirectory(canonical.display().to_string()));
            }
        }

        Ok(canonical)
    }

    /// Validate a path that may not exist yet (e.g. an output directory).
    pub fn validate_output_path(path: &str) -> Result<PathBuf, ParseError> {
        Self::validate_argument(path)?;
        Ok(PathBuf::from(path))
    }

    pub fn validate_optional_path(path: Option<&str>) -> Result<Option<PathBuf>, ParseError> {
        path.map(Self::validate_path).transpose()
    }

    /// Parse and validate a `slot.key=value` override into its three parts.
    pub fn validate_set_expr(expr: &str) -> Result<(String, String, serde_json::Value), ParseError> {
        Self::validate_argument(expr)?;

        let (path, raw_value) = expr.split_once('=').ok_or_else(|| ParseError::InvalidValue {
            arg: "set".to_string(),
            reason: format!("expected <slot>.<key>=<value>, got '{expr}'"),
        })?;

        let (slot, key) = path.split_once('.').ok_or_else(|| ParseError::InvalidValue {
            arg: "set".to_string(),
            reason: format!("expected <slot>.<key>=<value>, got '{expr}'"),
        })?;

        if slot.is_empty() || key.is_empty() {
            return Err(ParseError::InvalidValue {
                arg: "set".to_string(),
                reason: format!("slot and key must be non-empty in '{expr}'"),
            });
        }

        let value = serde_json::from_str(raw_value).unwrap_or_else(|_| serde_json::Value::String(raw_value.to_string()));

        Ok((slot.to_string(), key.to_string(), value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod argument_validation {
        use super::*;

        #[test]
        fn accepts_safe_arguments() {
            assert!(SecureArgParser::validate_argument("crawl").is_ok());
            assert!(SecureArgParser::validate_argument("module/path").is_ok());
        }

        #[test]
        fn rejects_too_long_arguments() {
            let long_arg = "a".repeat(MAX_ARG_LENGTH + 1);
            assert!(matches!(
                SecureArgParser::validate_argument(&long_arg),
                Err(ParseError::ArgumentTooLong(_))
            ));
        }

        #[test]
        fn detects_dangerous_patterns() {
            let dangerous = ["../etc/passwd", "~/.ssh/id_rsa", "$(whoami)", "`ls`", "a;rm -rf /", "a|b", "a>b", "a<b"];
            for arg in dangerous {
                assert!(
                    matches!(SecureArgParser::validate_argument(arg), Err(ParseError::DangerousPattern { .. })),
                    "failed to flag: {arg}"
                );
            }
        }
    }

    mod set_expr {
        use super::*;

        #[test]
        fn parses_qualified_numeric_override() {
            let (slot, key, value) = SecureArgParser::validate_set_expr("crawler.depth=3").unwrap();
            assert_eq!(slot, "crawler");
            assert_eq!(key, "depth");
            assert_eq!(value, serde_json::json!(3));
        }

        #[test]
        fn falls_back_to_string_for_non_json_values() {
            let (_, _, value) = SecureArgParser::validate_set_expr("crawler.label=acme").unwrap();
            assert_eq!(value, serde_json::json!("acme"));
        }

        #[test]
        fn rejects_missing_dot() {
            assert!(matches!(
                SecureArgParser::validate_set_expr("crawler=3"),
                Err(ParseError::InvalidValue { .. })
            ));
        }

        #[test]
        fn rejects_missing_equals() {
            assert!(matches!(
                SecureArgParser::validate_set_expr("crawler.depth"),
                Err(ParseError::InvalidValue { .. })
            ));
        }
    }
}
