// /////////////////////////////////////////////////////////////////////////////
// Optimized Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Command-Line Interface Module
//!
//! Bootstrap-layer CLI handling with security-first design.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │  1. parser::parse_cli()             │  Parse CLI with clap
//! └─────────────────┬───────────────────┘
//!                   ↓
//! ┌─────────────────────────────────────┐
//! │  2. validator::SecureArgParser      │  Security validation
//! └─────────────────┬───────────────────┘
//!                   ↓
//! ┌─────────────────────────────────────┐
//! │  3. ValidatedCli                    │  Safe, validated config
//! └─────────────────────────────────────┘
//! ```

pub mod parser;
pub mod validator;

pub use parser::{parse_cli, Cli, Commands, ListTarget, SecurityAction};
pub use validator::{ParseError, SecureArgParser};

use std::collections::BTreeMap;
use std::path::PathBuf;

use eidolon_domain::value_objects::SecurityMode;

/// Validated CLI configuration: all paths canonicalized, all values
/// range/pattern-checked.
#[derive(Debug, Clone)]
pub struct ValidatedCli {
    pub command: ValidatedCommand,
    pub verbose: bool,
    pub config: Option<PathBuf>,
}

/// Validated command variants (§6).
#[derive(Debug, Clone)]
pub enum ValidatedCommand {
    Run {
        pipeline: Option<String>,
        security_mode: SecurityMode,
        allow_unverified: bool,
        overrides: BTreeMap<String, serde_json::Value>,
    },
    ListModules,
    ListPipelines,
    SecurityVerify {
        module_path: PathBuf,
    },
    SecuritySign {
        key: PathBuf,
        module_path: PathBuf,
    },
    SecurityGenerateKeypair {
        output_dir: PathBuf,
    },
    SecurityTrust {
        key: PathBuf,
        id: String,
        comment: Option<String>,
    },
    SecurityUntrust {
        id: String,
    },
    SecurityListTrusted,
}

/// Parse and validate CLI arguments: clap parsing followed by a
/// `SecureArgParser` security pass.
pub fn parse_and_validate() -> Result<ValidatedCli, ParseError> {
    let cli = parse_cli();
    validate_cli(cli)
}

fn validate_cli(cli: Cli) -> Result<ValidatedCli, ParseError> {
    let config = cli
        .config
        .as_ref()
        .map(|path| SecureArgParser::validate_argument(&path.to_string_lossy()).map(|_| path.clone()))
        .transpose()?;

    let command = match cli.command {
        Commands::Run {
            pipeline,
            security_mode,
            allow_unverified,
            set,
        } => {
            if let Some(ref p) = pipeline {
                SecureArgParser::validate_argument(p)?;
            }

            let security_mode = security_mode
                .as_deref()
                .map(|s| {
                    s.parse::<SecurityMode>()
                        .map_err(|e| ParseError::InvalidValue {
                            arg: "security-mode".to_string(),
                            reason: e.to_string(),
                        })
                })
                .transpose()?
                .unwrap_or_default();

            let mut overrides = BTreeMap::new();
            for expr in &set {
                let (slot, key, value) = SecureArgParser::validate_set_expr(expr)?;
                overrides.insert(format!("{slot}.{key}"), value);
            }

            ValidatedCommand::Run {
                pipeline,
                security_mode,
                allow_unverified,
                overrides,
            }
        }
        Commands::List { what } => match what {
            ListTarget::Modules => ValidatedCommand::ListModules,
            ListTarget::Pipelines => ValidatedCommand::ListPipelines,
        },
        Commands::Security { action } => match action {
            SecurityAction::Verify { module_path } => ValidatedCommand::SecurityVerify {
                module_path: SecureArgParser::validate_path(&module_path.to_string_lossy())?,
            },
            SecurityAction::Sign { key, module_path } => ValidatedCommand::SecuritySign {
                key: SecureArgParser::validate_path(&key.to_string_lossy())?,
                module_path: SecureArgParser::validate_path(&module_path.to_string_lossy())?,
            },
            SecurityAction::GenerateKeypair { output_dir } => ValidatedCommand::SecurityGenerateKeypair {
                output_dir: SecureArgParser::validate_output_path(&output_dir.to_string_lossy())?,
            },
            SecurityAction::Trust { key, id, comment } => {
                SecureArgParser::validate_argument(&id)?;
                if let Some(ref c) = comment {
                    SecureArgParser::validate_argument(c)?;
                }
                ValidatedCommand::SecurityTrust {
                    key: SecureArgParser::validate_path(&key.to_string_lossy())?,
                    id,
                    comment,
                }
            }
            SecurityAction::Untrust { id } => {
                SecureArgParser::validate_argument(&id)?;
                ValidatedCommand::SecurityUntrust { id }
            }
            SecurityAction::ListTrusted => ValidatedCommand::SecurityListTrusted,
        },
    };

    Ok(ValidatedCli {
        command,
        verbose: cli.verbose,
        config,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn validates_run_command_with_security_mode_and_overrides() {
        let cli = Cli::parse_from([
            "eidolon",
            "run",
            "crawl-and-report",
            "--security-mode",
            "paranoid",
            "--set",
            "crawler.depth=3",
        ]);
        let validated = validate_cli(cli).unwrap();
        match validated.command {
            ValidatedCommand::Run {
                pipeline,
                security_mode,
                overrides,
                ..
            } => {
                assert_eq!(pipeline.as_deref(), Some("crawl-and-report"));
                assert_eq!(security_mode, SecurityMode::Paranoid);
                assert_eq!(overrides.get("crawler.depth"), Some(&serde_json::json!(3)));
            }
            other => panic!("expected Run, got {other:?}"),
        }
    }

    #[test]
    fn rejects_dangerous_pipeline_name() {
        let cli = Cli::parse_from(["eidolon", "run", "../etc/passwd"]);
        assert!(validate_cli(cli).is_err());
    }

    #[test]
    fn rejects_unknown_security_mode() {
        let cli = Cli::parse_from(["eidolon", "run", "p", "--security-mode", "bogus"]);
        assert!(matches!(validate_cli(cli), Err(ParseError::InvalidValue { .. })));
    }

    #[test]
    fn validates_list_modules() {
        let cli = Cli::parse_from(["eidolon", "list", "modules"]);
        assert!(matches!(validate_cli(cli).unwrap().command, ValidatedCommand::ListModules));
    }
}
