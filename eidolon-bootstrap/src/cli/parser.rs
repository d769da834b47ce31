// /////////////////////////////////////////////////////////////////////////////
// Optimized Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # CLI Parser
//!
//! Command-line interface parsing using clap. This module defines the CLI
//! structure and handles raw argument parsing; security validation happens
//! afterward in [`super::validator`].

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Pluggable dataflow runtime.
#[derive(Parser, Debug, Clone)]
#[command(name = "eidolon")]
#[command(about = concat!("Eidolon dataflow runtime v", env!("CARGO_PKG_VERSION")))]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Engine configuration file path (§10.3).
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

/// CLI subcommands (§6).
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run a pipeline document.
    Run {
        /// Name or path of the pipeline document to run.
        pipeline: Option<String>,

        /// Security posture for module admission: paranoid|default|permissive.
        #[arg(long)]
        security_mode: Option<String>,

        /// Admit unsigned/untrusted modules without prompting.
        #[arg(long)]
        allow_unverified: bool,

        /// Slot configuration override, repeatable: `<slot>.<key>=<value>`.
        #[arg(long = "set", value_name = "SLOT.KEY=VALUE")]
        set: Vec<String>,
    },

    /// List known modules or pipelines.
    List {
        #[command(subcommand)]
        what: ListTarget,
    },

    /// Module security operations.
    Security {
        #[command(subcommand)]
        action: SecurityAction,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ListTarget {
    /// List modules discovered on the module search path.
    Modules,
    /// List pipeline documents discovered on the pipeline search path.
    Pipelines,
}

#[derive(Subcommand, Debug, Clone)]
pub enum SecurityAction {
    /// Verify a module's canonical digest and signature.
    Verify {
        /// Path to the module directory.
        module_path: PathBuf,
    },

    /// Sign a module with a private key, writing `module.sig`.
    Sign {
        /// Path to a PKCS#8-encoded RSA private key.
        #[arg(long)]
        key: PathBuf,

        /// Path to the module directory.
        module_path: PathBuf,
    },

    /// Generate a new RSA keypair for signing modules.
    GenerateKeypair {
        /// Directory to write `private.pem`/`public.pem` into.
        #[arg(long)]
        output_dir: PathBuf,
    },

    /// Add a trusted signer to the registry.
    Trust {
        /// Path to the signer's public key (PEM).
        #[arg(long)]
        key: PathBuf,

        /// Identifier to register the signer under.
        #[arg(long)]
        id: String,

        /// Optional free-text comment.
        #[arg(long)]
        comment: Option<String>,
    },

    /// Remove a trusted signer from the registry.
    Untrust {
        /// Identifier of the signer to remove.
        id: String,
    },

    /// List all trusted signers.
    ListTrusted,
}

/// Parse CLI arguments. Clap handles `--help`/`--version` and exits the
/// process on its own for those and for unparsable argument structures.
pub fn parse_cli() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_run_with_security_mode_and_overrides() {
        let cli = Cli::parse_from([
            "eidolon",
            "run",
            "crawl-and-report",
            "--security-mode",
            "paranoid",
            "--set",
            "crawler.depth=3",
        ]);
        match cli.command {
            Commands::Run {
                pipeline,
                security_mode,
                set,
                ..
            } => {
                assert_eq!(pipeline.as_deref(), Some("crawl-and-report"));
                assert_eq!(security_mode.as_deref(), Some("paranoid"));
                assert_eq!(set, vec!["crawler.depth=3".to_string()]);
            }
            other => panic!("expected Run, got {other:?}"),
        }
    }

    #[test]
    fn parses_list_modules() {
        let cli = Cli::parse_from(["eidolon", "list", "modules"]);
        assert!(matches!(cli.command, Commands::List { what: ListTarget::Modules }));
    }

    #[test]
    fn parses_security_verify() {
        let cli = Cli::parse_from(["eidolon", "security", "verify", "/tmp/mymodule"]);
        match cli.command {
            Commands::Security {
                action: SecurityAction::Verify { module_path },
            } => assert_eq!(module_path, PathBuf::from("/tmp/mymodule")),
            other => panic!("expected Security::Verify, got {other:?}"),
        }
    }
}
