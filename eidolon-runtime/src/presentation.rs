// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Presentation Layer
//!
//! Renders engine and registry state to the terminal (§6). Argument parsing
//! and validation live one layer out, in `eidolon_bootstrap::cli`; this
//! module only turns already-computed results into the text a `run`/`list`/
//! `security` invocation prints.

use crate::application::{EngineOutcome, HostOutcome, ModuleRegistry};

/// Renders `eidolon list modules` (§6): one line per discovered module, its
/// verification verdict, and the path it was loaded from.
pub fn render_module_list(registry: &ModuleRegistry) -> String {
    if registry.is_empty() {
        return "No modules discovered. Check MODULE_DIR.".to_string();
    }

    let mut lines = vec![format!("Discovered {} module(s):", registry.len())];
    let mut modules: Vec<_> = registry.list_all().collect();
    modules.sort_by(|a, b| a.manifest.name.as_str().cmp(b.manifest.name.as_str()));
    for module in modules {
        lines.push(format!(
            "  {:<24} verdict={:<28} path={}",
            module.manifest.name.as_str(),
            module.verdict.to_string(),
            module.path.display()
        ));
    }
    lines.join("\n")
}

/// Renders a `run` invocation's final outcome (§6, §7): every excluded slot
/// with its rejection reason, then every host's terminal state.
pub fn render_run_summary(outcome: &EngineOutcome) -> String {
    let mut lines = Vec::new();

    if !outcome.excluded.is_empty() {
        lines.push(format!("Excluded {} slot(s) before the run started:", outcome.excluded.len()));
        for (slot_id, reason) in &outcome.excluded {
            lines.push(format!("  {slot_id}: {reason}"));
        }
    }

    lines.push(format!("Ran {} slot(s):", outcome.host_reports.len()));
    for report in &outcome.host_reports {
        let status = match &report.outcome {
            HostOutcome::Completed => "completed".to_string(),
            HostOutcome::Isolated { reason } => format!("isolated ({reason})"),
            HostOutcome::Halted { reason } => format!("halted ({reason})"),
        };
        lines.push(format!("  {:<24} {} (faults: {})", report.slot_id.as_str(), status, report.fault_count));
    }

    lines.join("\n")
}
