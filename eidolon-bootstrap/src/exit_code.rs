// /////////////////////////////////////////////////////////////////////////////
// Optimized Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Exit Code Management
//!
//! The four exit codes a run of the engine can terminate with, plus the
//! conventional signal-termination codes a process shell adds on top.
//!
//! ## Exit Code Conventions
//!
//! - **0**: Success
//! - **1**: Pipeline error (a module fault, translation failure, or other
//!   run-time failure not itself a security rejection)
//! - **2**: Security rejection (the admission policy rejected one or more
//!   modules)
//! - **3**: Configuration error (an unparsable manifest/pipeline document, a
//!   validation failure, or an invalid merged configuration)
//! - **130/143**: process-shell signal termination (SIGINT / SIGTERM), not
//!   part of the pipeline-error taxonomy above.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use eidolon_bootstrap::exit_code::{result_to_exit_code, ExitCode};
//!
//! fn run_engine() -> Result<(), eidolon_domain::EidolonError> {
//!     Ok(())
//! }
//!
//! fn main() -> std::process::ExitCode {
//!     result_to_exit_code(run_engine())
//! }
//! ```

use std::fmt;

use eidolon_domain::EidolonError;

/// Exit codes a run of the engine can terminate with (§6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(i32)]
pub enum ExitCode {
    /// Successful termination (0).
    #[default]
    Success = 0,

    /// Pipeline error: a module fault, translation failure, or other
    /// run-time failure that is not itself a security rejection (1).
    PipelineError = 1,

    /// Security rejection: the admission policy rejected one or more
    /// modules and the pipeline could not proceed (or excluded downstream
    /// consumers) as a result (2).
    SecurityRejection = 2,

    /// Configuration error: an unparsable manifest or pipeline document,
    /// a validation failure, or an invalid merged configuration (3).
    ConfigurationError = 3,

    /// Interrupted by SIGINT (Ctrl+C) (130). A process-shell concern, not
    /// part of the pipeline-error taxonomy above.
    Interrupted = 130,

    /// Terminated by SIGTERM (143). A process-shell concern, not part of
    /// the pipeline-error taxonomy above.
    Terminated = 143,
}

impl ExitCode {
    /// Convert to `i32` for use with `std::process::exit`.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Map a domain error to its exit code by its structured category —
    /// never by inspecting the formatted message text.
    pub fn from_domain_error(error: &EidolonError) -> Self {
        if error.is_security_error() {
            return ExitCode::SecurityRejection;
        }
        match error.category() {
            "bad_manifest" | "bad_pipeline" | "cycle" | "unknown_module" | "unknown_output"
            | "type_incompatible" => ExitCode::ConfigurationError,
            _ => ExitCode::PipelineError,
        }
    }

    /// Human-readable description of this exit code.
    pub fn description(self) -> &'static str {
        match self {
            ExitCode::Success => "Success",
            ExitCode::PipelineError => "Pipeline error",
            ExitCode::SecurityRejection => "Security rejection",
            ExitCode::ConfigurationError => "Configuration error",
            ExitCode::Interrupted => "Interrupted by signal (SIGINT)",
            ExitCode::Terminated => "Terminated by signal (SIGTERM)",
        }
    }

    pub fn is_success(self) -> bool {
        matches!(self, ExitCode::Success)
    }

    pub fn is_error(self) -> bool {
        !self.is_success()
    }

    /// Whether this code represents process-shell signal termination
    /// rather than a pipeline-error-taxonomy outcome.
    pub fn is_signal(self) -> bool {
        matches!(self, ExitCode::Interrupted | ExitCode::Terminated)
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.description(), self.as_i32())
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code.as_i32()
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> std::process::ExitCode {
        std::process::ExitCode::from(code.as_i32() as u8)
    }
}

/// Map a run result to the exit code this codebase's exit-code module
/// already defines, exhaustively and without ad hoc string inspection.
pub fn map_error_to_exit_code(error: &EidolonError) -> ExitCode {
    ExitCode::from_domain_error(error)
}

/// Convert a run's final `Result` into a process exit code.
pub fn result_to_exit_code(result: Result<(), EidolonError>) -> std::process::ExitCode {
    match result {
        Ok(()) => ExitCode::Success.into(),
        Err(e) => map_error_to_exit_code(&e).into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_code_values_match_the_specification() {
        assert_eq!(ExitCode::Success.as_i32(), 0);
        assert_eq!(ExitCode::PipelineError.as_i32(), 1);
        assert_eq!(ExitCode::SecurityRejection.as_i32(), 2);
        assert_eq!(ExitCode::ConfigurationError.as_i32(), 3);
        assert_eq!(ExitCode::Interrupted.as_i32(), 130);
        assert_eq!(ExitCode::Terminated.as_i32(), 143);
    }

    #[test]
    fn security_errors_map_to_security_rejection() {
        let err = EidolonError::SecurityRejected {
            module: "crawler".into(),
            verdict: "Unsigned".into(),
            signer: None,
        };
        assert_eq!(ExitCode::from_domain_error(&err), ExitCode::SecurityRejection);
    }

    #[test]
    fn bad_manifest_maps_to_configuration_error() {
        let err = EidolonError::bad_manifest("missing name field");
        assert_eq!(ExitCode::from_domain_error(&err), ExitCode::ConfigurationError);
    }

    #[test]
    fn module_fault_maps_to_pipeline_error() {
        let err = EidolonError::module_fault("crawler", "iterate", "panicked");
        assert_eq!(ExitCode::from_domain_error(&err), ExitCode::PipelineError);
    }

    #[test]
    fn is_signal_distinguishes_process_shell_codes() {
        assert!(ExitCode::Interrupted.is_signal());
        assert!(ExitCode::Terminated.is_signal());
        assert!(!ExitCode::SecurityRejection.is_signal());
    }

    #[test]
    fn result_to_exit_code_success() {
        let code: std::process::ExitCode = result_to_exit_code(Ok(()));
        assert_eq!(format!("{:?}", code), format!("{:?}", std::process::ExitCode::from(0u8)));
    }

    #[test]
    fn display_includes_description_and_number() {
        let display = format!("{}", ExitCode::ConfigurationError);
        assert!(display.contains("Configuration error"));
        assert!(display.contains('3'));
    }
}
