// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Module Host (C6)
//!
//! One task per slot (§4.6): owns the module instance, drives its run-mode
//! scheduling, and classifies faults per the pipeline's `error_policy`. A
//! host task is itself a single `tokio` task, so `on_input`/`iterate` calls
//! it makes are never actually concurrent with each other — that single
//! fact is what satisfies §5's "the host serialises `on_input` against
//! `iterate()`" and "`iterate()` invocations on one module are strictly
//! serial" guarantees, with no extra locking required.

use std::time::Duration;

use eidolon_domain::entities::Envelope;
use eidolon_domain::value_objects::{ErrorPolicy, RunMode, SlotId};
use tokio::sync::mpsc;

use eidolon_bootstrap::shutdown::CancellationToken;

use crate::application::module::Module;

/// Why a host task stopped running its module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostOutcome {
    /// Ran to completion or was cancelled cleanly; no unrecoverable fault.
    Completed,
    /// An `error_policy: isolate` fault terminated only this slot.
    Isolated { reason: String },
    /// An `error_policy: halt` fault; the caller must cancel every other
    /// host too.
    Halted { reason: String },
}

/// Summary an engine collects once a host task finishes (§4.7 step 8).
#[derive(Debug, Clone)]
pub struct HostReport {
    pub slot_id: SlotId,
    pub outcome: HostOutcome,
    pub fault_count: u64,
}

pub struct ModuleHost {
    slot_id: SlotId,
    module: Box<dyn Module>,
    run_mode: RunMode,
    cycle_delay: Duration,
    error_policy: ErrorPolicy,
    trigger_input: Option<String>,
    shutdown: CancellationToken,
    fault_count: u64,
}

impl ModuleHost {
    pub fn new(
        slot_id: SlotId,
        module: Box<dyn Module>,
        run_mode: RunMode,
        cycle_delay: Duration,
        error_policy: ErrorPolicy,
        trigger_input: Option<String>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            slot_id,
            module,
            run_mode,
            cycle_delay,
            error_policy,
            trigger_input,
            shutdown,
            fault_count: 0,
        }
    }

    /// Drives this slot's module until shutdown or an unrecoverable fault.
    /// `inbox` fans in every subscribed input, tagged with the local input
    /// name the envelope arrived on (the translation already happened on
    /// the bus side; the host only needs the name to recognise a trigger
    /// input for `on_trigger` mode).
    pub async fn run(mut self, mut inbox: mpsc::Receiver<(String, Envelope)>) -> HostReport {
        let outcome = match self.run_mode {
            RunMode::Once => self.run_once(&mut inbox).await,
            RunMode::Loop => self.run_loop(&mut inbox).await,
            RunMode::Reactive => self.run_reactive(&mut inbox).await,
            RunMode::OnTrigger => self.run_on_trigger(&mut inbox).await,
        };

        tracing::info!(target: "engine", slot = %self.slot_id, outcome = ?outcome, "module host teardown");
        self.module.teardown().await;

        HostReport {
            slot_id: self.slot_id,
            outcome,
            fault_count: self.fault_count,
        }
    }

    /// `once` mode runs its single iteration and stops; it does not idle
    /// waiting for shutdown (§4.7 step 8's natural-completion trigger
    /// depends on this slot reaching a terminal state on its own). Any
    /// envelope still queued in `inbox` when this returns is left for the
    /// engine to close out via [`crate::application::message_bus::MessageBus::close_producer`]
    /// on whichever upstream produced it.
    async fn run_once(&mut self, _inbox: &mut mpsc::Receiver<(String, Envelope)>) -> HostOutcome {
        match self.iterate_once().await {
            Some(outcome) => outcome,
            None => HostOutcome::Completed,
        }
    }

    async fn run_loop(&mut self, inbox: &mut mpsc::Receiver<(String, Envelope)>) -> HostOutcome {
        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => return HostOutcome::Completed,
                maybe = inbox.recv() => {
                    match maybe {
                        Some((_, envelope)) => {
                            if let Some(outcome) = self.deliver(envelope) {
                                return outcome;
                            }
                        }
                        None => return HostOutcome::Completed,
                    }
                }
                _ = tokio::time::sleep(self.cycle_delay) => {
                    if let Some(outcome) = self.iterate_once().await {
                        return outcome;
                    }
                }
            }
        }
    }

    async fn run_reactive(&mut self, inbox: &mut mpsc::Receiver<(String, Envelope)>) -> HostOutcome {
        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => return HostOutcome::Completed,
                maybe = inbox.recv() => {
                    match maybe {
                        Some((_, envelope)) => {
                            if let Some(outcome) = self.deliver(envelope) {
                                return outcome;
                            }
                            // Coalesce whatever else has queued up while we
                            // were handling the first arrival (§4.6 "the
                            // host coalesces multiple pending envelopes into
                            // one iteration").
                            while let Ok((_, envelope)) = inbox.try_recv() {
                                if let Some(outcome) = self.deliver(envelope) {
                                    return outcome;
                                }
                            }
                            if let Some(outcome) = self.iterate_once().await {
                                return outcome;
                            }
                        }
                        None => return HostOutcome::Completed,
                    }
                }
            }
        }
    }

    async fn run_on_trigger(&mut self, inbox: &mut mpsc::Receiver<(String, Envelope)>) -> HostOutcome {
        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => return HostOutcome::Completed,
                maybe = inbox.recv() => {
                    match maybe {
                        Some((input_name, envelope)) => {
                            let is_trigger = self.trigger_input.as_deref() == Some(input_name.as_str());
                            if let Some(outcome) = self.deliver(envelope) {
                                return outcome;
                            }
                            if is_trigger {
                                if let Some(outcome) = self.iterate_once().await {
                                    return outcome;
                                }
                            }
                        }
                        None => return HostOutcome::Completed,
                    }
                }
            }
        }
    }

    fn deliver(&mut self, envelope: Envelope) -> Option<HostOutcome> {
        if let Err(e) = self.module.on_input(&envelope) {
            return self.classify_fault("on_input", e.to_string());
        }
        None
    }

    async fn iterate_once(&mut self) -> Option<HostOutcome> {
        if let Err(e) = self.module.iterate().await {
            return self.classify_fault("iterate", e.to_string());
        }
        None
    }

    /// Applies the `error_policy` boundary (§4.6 "Error boundary"). Returns
    /// `Some(outcome)` when the host loop must stop; `None` under
    /// `continue`/`log_only`, which keep the module running.
    fn classify_fault(&mut self, phase: &str, cause: String) -> Option<HostOutcome> {
        self.fault_count += 1;
        let reason = format!("{phase}: {cause}");
        tracing::error!(target: "engine", slot = %self.slot_id, phase, cause = %cause, policy = ?self.error_policy, "module fault");

        match self.error_policy {
            ErrorPolicy::Halt => {
                self.shutdown.cancel();
                Some(HostOutcome::Halted { reason })
            }
            ErrorPolicy::Isolate => Some(HostOutcome::Isolated { reason }),
            ErrorPolicy::Continue | ErrorPolicy::LogOnly => None,
        }
    }
}
