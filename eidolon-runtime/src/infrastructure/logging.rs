// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Logging Initialisation (§10.2)
//!
//! `tracing-subscriber`'s `EnvFilter` honours `EIDOLON_LOG` first; absent
//! that, `--verbose` implies `debug`, otherwise `info`. Every subsystem logs
//! with its own `target:` (`"engine"`, `"bus"`, `"registry"`, `"security"`,
//! `"bootstrap"`) so a filter expression like `EIDOLON_LOG=bus=debug,info`
//! can isolate one subsystem without raising the rest.

use tracing_subscriber::EnvFilter;

/// Initialises the global `tracing` subscriber. Must be called exactly once,
/// before any other subsystem logs.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_env("EIDOLON_LOG").unwrap_or_else(|_| {
        let default_level = if verbose { "debug" } else { "info" };
        EnvFilter::new(default_level)
    });

    tracing_subscriber::fmt().with_env_filter(filter).with_target(true).init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_and_quiet_filters_do_not_panic_to_construct() {
        let _ = EnvFilter::new("debug");
        let _ = EnvFilter::new("info");
    }
}
