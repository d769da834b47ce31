// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Module Engine (C7)
//!
//! The composition root (§4.7): discovers modules through the Module
//! Registry, loads and semantically validates a pipeline document against
//! them, applies the admission policy per slot (excluding rejected slots and
//! their transitive downstream consumers), topologically sorts the
//! survivors, wires the bus, constructs and initialises every module in
//! dependency order, and finally drives one host task per slot until a
//! shutdown trigger fires.
//!
//! Every module host shares one [`CancellationToken`]: an `error_policy:
//! halt` fault cancels it from inside [`ModuleHost`], exactly as an operator
//! interrupt or a pipeline timeout would. Once cancelled, the engine awaits
//! each host's completion in reverse topological order, bounded by the
//! configured grace period, force-aborting any straggler before moving
//! upstream (§4.7 step 8, §5 "cancellation and timeouts").

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{mpsc, Notify};
use tokio::task::JoinHandle;

use eidolon_bootstrap::shutdown::{CancellationToken, ShutdownCoordinator};
use eidolon_bootstrap::signals::SystemSignals;
use eidolon_domain::aggregates::PipelineGraph;
use eidolon_domain::entities::{Envelope, ModuleSlot, PipelineDocument};
use eidolon_domain::services::admission_policy;
use eidolon_domain::value_objects::{
    Admission, ErrorPolicy, MailboxPolicy, ModuleName, PromptDecision, RunId, RunMode, SecurityMode, SlotId, TypeExpr,
};
use eidolon_domain::EidolonError;

use crate::application::message_bus::MessageBus;
use crate::application::module::{Capabilities, ModuleConfig, ModuleFactoryRegistry};
use crate::application::module_host::{HostOutcome, HostReport, ModuleHost};
use crate::application::module_registry::ModuleRegistry;
use crate::application::translation_cache::TranslationCache;
use crate::error::RuntimeError;
use crate::infrastructure::config::EngineConfig;
use crate::infrastructure::metrics::Metrics;
use crate::infrastructure::runtime::worker_pool::WorkerPool;

/// Injected `prompt(module-name, reason) -> decision` capability (§4.3), so
/// the core never talks to a terminal directly.
#[async_trait]
pub trait PromptCapability: Send + Sync {
    async fn prompt(&self, module_name: &str, reason: &str) -> PromptDecision;
}

/// Used under `--allow-unverified`: every prompt is answered `AllowOnce`
/// without asking, so a headless run never blocks on stdin. Does not touch
/// outright rejections — `paranoid` mode and an `Invalid` verdict still
/// reject regardless of this flag (§9 resolution, see DESIGN.md).
pub struct AutoAllowPrompt;

#[async_trait]
impl PromptCapability for AutoAllowPrompt {
    async fn prompt(&self, module_name: &str, reason: &str) -> PromptDecision {
        tracing::warn!(target: "engine", module = module_name, reason, "admitting unverified module under --allow-unverified");
        PromptDecision::AllowOnce
    }
}

/// Denies every prompt without asking; the conservative default for
/// non-interactive contexts that didn't opt into `--allow-unverified`.
pub struct DenyPrompt;

#[async_trait]
impl PromptCapability for DenyPrompt {
    async fn prompt(&self, module_name: &str, reason: &str) -> PromptDecision {
        tracing::warn!(target: "engine", module = module_name, reason, "denying unverified module, no interactive prompt available");
        PromptDecision::Deny
    }
}

/// What the engine produced once its run loop exits: every slot that ran
/// (with its [`HostReport`]), and every slot excluded before it ever started
/// (with the reason).
#[derive(Debug, Default)]
pub struct EngineOutcome {
    pub host_reports: Vec<HostReport>,
    pub excluded: Vec<(SlotId, EidolonError)>,
}

impl EngineOutcome {
    /// The first fatal condition found, if any: a halted host, or a
    /// security rejection that excluded at least one slot, surfaced for
    /// exit-code mapping (§6, §7).
    pub fn fatal_error(&self) -> Option<EidolonError> {
        if let Some((_, e)) = self.excluded.first() {
            return Some(e.clone());
        }
        self.host_reports
            .iter()
            .find_map(|r| match &r.outcome {
                HostOutcome::Halted { reason } => Some(EidolonError::module_fault(r.slot_id.to_string(), "halt", reason.clone())),
                _ => None,
            })
    }
}

/// Per-run configuration the CLI layer resolves before constructing the
/// engine (§6 `run` subcommand flags).
pub struct RunOptions {
    pub security_mode: SecurityMode,
    pub allow_unverified: bool,
    pub overrides: BTreeMap<String, serde_json::Value>,
}

pub struct ModuleEngine<'a> {
    registry: &'a ModuleRegistry,
    factories: &'a ModuleFactoryRegistry,
    config: &'a EngineConfig,
    options: RunOptions,
    prompt: Arc<dyn PromptCapability>,
    signals: Box<dyn SystemSignals>,
    metrics: Arc<Metrics>,
}

impl<'a> ModuleEngine<'a> {
    pub fn new(
        registry: &'a ModuleRegistry,
        factories: &'a ModuleFactoryRegistry,
        config: &'a EngineConfig,
        options: RunOptions,
        prompt: Arc<dyn PromptCapability>,
        signals: Box<dyn SystemSignals>,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            registry,
            factories,
            config,
            options,
            prompt,
            signals,
            metrics,
        }
    }

    /// Runs `doc` end to end (§4.7 steps 2-8). Step 1, discovery, has
    /// already happened by the time a [`ModuleRegistry`] exists to pass in.
    pub async fn run(self, doc: PipelineDocument) -> Result<EngineOutcome, RuntimeError> {
        doc.validate()?;

        self.validate_against_registry(&doc)?;

        let graph = PipelineGraph::build(&doc)?;

        let mut excluded_with_reason: HashMap<SlotId, EidolonError> = HashMap::new();
        let mut allow_always: HashMap<ModuleName, ()> = HashMap::new();
        for slot in &doc.slots {
            if let Some(reason) = self.admit_slot(slot, &mut allow_always).await {
                excluded_with_reason.insert(slot.id.clone(), reason);
            }
        }

        let directly_excluded: HashSet<SlotId> = excluded_with_reason.keys().cloned().collect();
        let full_closure: HashSet<SlotId> = graph.transitive_exclusion(&directly_excluded).into_iter().collect();
        for slot_id in &full_closure {
            excluded_with_reason.entry(slot_id.clone()).or_insert_with(|| {
                EidolonError::SecurityRejected {
                    module: slot_id.to_string(),
                    verdict: "excluded-downstream-of-rejected-slot".to_string(),
                    signer: None,
                }
            });
        }

        let surviving = graph.surviving_order(&full_closure);
        tracing::info!(target: "engine", total = doc.slots.len(), surviving = surviving.len(), excluded = full_closure.len(), "admission complete");

        let run_id = RunId::new();
        let translation_cache = Arc::new(TranslationCache::new(self.config.translation_cache_size));
        let bus = Arc::new(MessageBus::new(run_id, translation_cache));
        let worker_pool = Arc::new(WorkerPool::new(doc.options.max_threads));
        let coordinator = ShutdownCoordinator::new(self.config.default_grace_period());
        let shutdown_token = coordinator.token();

        let mut hosts = Vec::with_capacity(surviving.len());
        for slot_id in &surviving {
            let slot = doc.slot(slot_id.as_str()).expect("surviving slot id came from this document's graph");
            let host_rx = self.wire_slot(slot, &doc, &bus)?;
            let host = self
                .construct_slot(slot, bus.clone(), worker_pool.clone(), shutdown_token.clone(), doc.options.error_policy)
                .await?;
            hosts.push((slot_id.clone(), host, host_rx));
        }

        let non_loop_remaining = Arc::new(AtomicUsize::new(
            surviving.iter().filter(|id| doc.slot(id.as_str()).expect("surviving slot exists").run_mode != RunMode::Loop).count(),
        ));
        let natural_completion = Arc::new(Notify::new());

        let mut handles: HashMap<SlotId, JoinHandle<HostReport>> = HashMap::new();
        for (slot_id, host, inbox) in hosts {
            let run_mode = doc.slot(slot_id.as_str()).expect("surviving slot exists").run_mode;
            let bus_for_host = bus.clone();
            let producer = slot_id.clone();
            let remaining = non_loop_remaining.clone();
            let completion = natural_completion.clone();
            let handle = tokio::spawn(async move {
                let report = host.run(inbox).await;
                // Let anything downstream of this slot observe its mailbox
                // close, regardless of why it stopped (§4.7 step 8).
                bus_for_host.close_producer(&producer);
                if run_mode != RunMode::Loop && remaining.fetch_sub(1, Ordering::SeqCst) == 1 {
                    completion.notify_waiters();
                }
                report
            });
            handles.insert(slot_id, handle);
        }

        self.drive_until_shutdown(&doc, &coordinator, &shutdown_token, &non_loop_remaining, &natural_completion, surviving.len())
            .await;

        let shutdown_started = std::time::Instant::now();
        let reports = self.shutdown_in_reverse_order(&graph, handles, &shutdown_token).await;
        self.metrics.shutdown_duration_seconds.observe(shutdown_started.elapsed().as_secs_f64());
        for report in &reports {
            let outcome = match &report.outcome {
                HostOutcome::Completed => "completed",
                HostOutcome::Isolated { .. } => "isolated",
                HostOutcome::Halted { .. } => "halted",
            };
            self.metrics.module_faults.with_label_values(&[report.slot_id.as_str(), outcome]).inc_by(report.fault_count);
        }
        bus.close_all();
        coordinator.complete_shutdown();

        Ok(EngineOutcome {
            host_reports: reports,
            excluded: excluded_with_reason.into_iter().collect(),
        })
    }

    /// Semantic validation against discovered manifests (§4.1): every
    /// slot's module name resolves, every input binding's producer output
    /// exists and is type-compatible with the consumer's declared input.
    fn validate_against_registry(&self, doc: &PipelineDocument) -> Result<(), EidolonError> {
        for slot in &doc.slots {
            let registered = self
                .registry
                .resolve(&slot.name)
                .ok_or_else(|| EidolonError::UnknownModule(slot.name.to_string()))?;

            for (input_name, binding) in &slot.input {
                let producer_slot = doc
                    .slot(binding.slot_id.as_str())
                    .expect("PipelineDocument::validate already checked this reference");
                let producer = self
                    .registry
                    .resolve(&producer_slot.name)
                    .ok_or_else(|| EidolonError::UnknownModule(producer_slot.name.to_string()))?;
                let output = producer
                    .manifest
                    .output(&binding.output_name)
                    .ok_or_else(|| EidolonError::unknown_output(binding.slot_id.to_string(), binding.output_name.clone()))?;

                let input = registered.manifest.input(input_name).ok_or_else(|| {
                    EidolonError::bad_pipeline(format!(
                        "slot '{}' wires input '{input_name}' that module '{}' does not declare",
                        slot.id, slot.name
                    ))
                })?;

                let output_type = output.parsed_type()?;
                let input_type = input.parsed_type()?;
                if !output_type.is_compatible_with(&input_type) {
                    return Err(EidolonError::TypeIncompatible {
                        src_slot: binding.slot_id.to_string(),
                        src_output: binding.output_name.clone(),
                        src_type: output_type.to_string(),
                        dst_slot: slot.id.to_string(),
                        dst_input: input_name.clone(),
                        dst_type: input_type.to_string(),
                    });
                }
            }

            if slot.run_mode.requires_trigger_input() && registered.manifest.trigger_input().is_none() {
                return Err(EidolonError::bad_pipeline(format!(
                    "slot '{}' runs 'on_trigger' but module '{}' declares no input with `trigger: true`",
                    slot.id, slot.name
                )));
            }
        }
        Ok(())
    }

    /// Applies the admission policy to one slot (§4.3), returning `Some`
    /// with the rejection reason when the slot must be excluded.
    async fn admit_slot(&self, slot: &ModuleSlot, allow_always: &mut HashMap<ModuleName, ()>) -> Option<EidolonError> {
        let registered = self.registry.resolve(&slot.name).expect("already validated to resolve");
        let verdict = registered.verdict.clone();

        if allow_always.contains_key(&slot.name) {
            tracing::info!(target: "engine", slot = %slot.id, module = %slot.name, "admitted: remembered AllowAlways decision");
            return None;
        }

        let admission = admission_policy::decide(self.options.security_mode, &verdict);
        match admission {
            Admission::Admit => None,
            Admission::AdmitWithWarning => {
                tracing::warn!(target: "engine", slot = %slot.id, module = %slot.name, verdict = %verdict, "admitted with warning");
                None
            }
            Admission::Reject => Some(EidolonError::SecurityRejected {
                module: slot.name.to_string(),
                verdict: verdict.to_string(),
                signer: None,
            }),
            Admission::Prompt => {
                let decision = if self.options.allow_unverified {
                    self.prompt.prompt(slot.name.as_str(), "security mode requires confirmation").await
                } else {
                    DenyPrompt.prompt(slot.name.as_str(), "security mode requires confirmation").await
                };
                match decision {
                    PromptDecision::AllowOnce => None,
                    PromptDecision::AllowAlways => {
                        allow_always.insert(slot.name.clone(), ());
                        None
                    }
                    PromptDecision::Deny => Some(EidolonError::SecurityRejected {
                        module: slot.name.to_string(),
                        verdict: verdict.to_string(),
                        signer: None,
                    }),
                }
            }
        }
    }

    /// Registers this slot's subscriptions on the bus (§4.7 step 5) and
    /// returns the combined inbox its host task will read from, tagging
    /// each delivered envelope with the local input name it arrived on.
    fn wire_slot(&self, slot: &ModuleSlot, doc: &PipelineDocument, bus: &Arc<MessageBus>) -> Result<mpsc::Receiver<(String, Envelope)>, RuntimeError> {
        let manifest = &self.registry.resolve(&slot.name).expect("validated above").manifest;
        let (host_tx, host_rx) = mpsc::channel(combiner_capacity(slot, doc));

        for (input_name, binding) in &slot.input {
            let declared_input_type = manifest
                .input(input_name)
                .expect("validated above")
                .parsed_type()
                .map_err(RuntimeError::Domain)?;
            let mailbox_size = slot.mailbox_size.unwrap_or(doc.options.default_mailbox_size);
            let policy = slot.mailbox_policy.unwrap_or(MailboxPolicy::Block);
            let qualified_topic = format!("{}.{}", binding.slot_id, binding.output_name);

            let mut mailbox_rx = bus.subscribe(slot.id.clone(), input_name.clone(), qualified_topic, declared_input_type, mailbox_size, policy)?;

            let tx = host_tx.clone();
            let name = input_name.clone();
            tokio::spawn(async move {
                while let Some(envelope) = mailbox_rx.recv().await {
                    if tx.send((name.clone(), envelope)).await.is_err() {
                        break;
                    }
                }
            });
        }

        Ok(host_rx)
    }

    /// Constructs and initialises this slot's module (§4.7 step 6),
    /// merging the slot's manifest-independent `config:` map with any
    /// `--set slot.key=value` overrides.
    async fn construct_slot(
        &self,
        slot: &ModuleSlot,
        bus: Arc<MessageBus>,
        worker_pool: Arc<WorkerPool>,
        shutdown: CancellationToken,
        error_policy: ErrorPolicy,
    ) -> Result<ModuleHost, RuntimeError> {
        let registered = self.registry.resolve(&slot.name).expect("validated above");
        let mut module = self
            .factories
            .create(slot.name.as_str())
            .ok_or_else(|| RuntimeError::Domain(EidolonError::UnknownModule(slot.name.to_string())))?;

        let output_types: HashMap<String, TypeExpr> = registered
            .manifest
            .outputs
            .iter()
            .filter_map(|port| port.parsed_type().ok().map(|t| (port.name.clone(), t)))
            .collect();

        let capabilities = Capabilities::new(slot.id.clone(), bus, output_types, worker_pool);
        let config = merged_config(slot, &self.options.overrides);
        module.initialise(&config, capabilities).await?;

        let cycle_delay = slot.cycle_delay.unwrap_or_else(|| self.config.default_cycle_delay());
        let trigger_input = registered.manifest.trigger_input().map(|p| p.name.clone());

        Ok(ModuleHost::new(
            slot.id.clone(),
            module,
            slot.run_mode,
            cycle_delay,
            error_policy,
            trigger_input,
            shutdown,
        ))
    }

    /// Waits for any of the four §4.7 step 8 shutdown triggers: an operator
    /// signal, the pipeline timeout, an `error_policy: halt` fault
    /// cancelling `token` directly, or every non-`loop` slot reaching a
    /// terminal state on its own (a `loop` slot is deliberately
    /// never-ending, so its presence among the survivors rules out natural
    /// completion; a pipeline with no slots at all completes trivially).
    async fn drive_until_shutdown(
        &self,
        doc: &PipelineDocument,
        coordinator: &ShutdownCoordinator,
        token: &CancellationToken,
        non_loop_remaining: &AtomicUsize,
        natural_completion: &Notify,
        total_hosts: usize,
    ) {
        let coordinator_for_signal = coordinator.clone();
        let signal_wait = self.signals.wait_for_signal(Box::new(move || coordinator_for_signal.initiate_shutdown()));

        let timeout_wait = async {
            match doc.options.timeout {
                Some(timeout) => tokio::time::sleep(timeout).await,
                None => std::future::pending::<()>().await,
            }
        };

        let non_loop_total = non_loop_remaining.load(Ordering::SeqCst);
        let natural_completion_wait = async {
            if non_loop_total == 0 {
                if total_hosts > non_loop_total {
                    // Only `loop` slots survived; they never self-complete.
                    std::future::pending::<()>().await;
                }
                // Nothing survived admission at all; there is nothing to wait on.
                return;
            }
            loop {
                let notified = natural_completion.notified();
                tokio::pin!(notified);
                notified.as_mut().enable();
                if non_loop_remaining.load(Ordering::SeqCst) == 0 {
                    return;
                }
                notified.await;
            }
        };

        tokio::select! {
            _ = signal_wait => {}
            _ = timeout_wait => {
                tracing::warn!(target: "engine", "pipeline timeout elapsed, initiating shutdown");
                coordinator.initiate_shutdown();
            }
            _ = token.cancelled() => {
                // Already cancelled, e.g. by an `error_policy: halt` fault
                // inside a host (`ModuleHost::classify_fault`).
            }
            _ = natural_completion_wait => {
                tracing::info!(target: "engine", "every non-loop slot reached a terminal state, initiating shutdown");
                coordinator.initiate_shutdown();
            }
        }
    }

    /// Awaits every host's completion in reverse topological order,
    /// bounded by the configured grace period; force-aborts stragglers
    /// (§4.7 step 8, §5 "cancellation and timeouts").
    async fn shutdown_in_reverse_order(
        &self,
        graph: &PipelineGraph,
        mut handles: HashMap<SlotId, JoinHandle<HostReport>>,
        token: &CancellationToken,
    ) -> Vec<HostReport> {
        token.cancel();
        let grace_period = self.config.default_grace_period();
        let mut reports = Vec::with_capacity(handles.len());

        for slot_id in graph.reverse_topological_order() {
            let Some(mut handle) = handles.remove(&slot_id) else {
                continue;
            };
            match tokio::time::timeout(grace_period, &mut handle).await {
                Ok(Ok(report)) => reports.push(report),
                Ok(Err(join_error)) => {
                    tracing::error!(target: "engine", slot = %slot_id, error = %join_error, "module host task panicked during shutdown");
                }
                Err(_) => {
                    tracing::error!(target: "engine", slot = %slot_id, grace_period = ?grace_period, "module host exceeded grace period, forcing termination");
                    handle.abort();
                    reports.push(HostReport {
                        slot_id,
                        outcome: HostOutcome::Halted {
                            reason: "forced termination after grace period expiry".to_string(),
                        },
                        fault_count: 0,
                    });
                }
            }
        }
        reports
    }
}

/// Combiner-channel capacity for a slot's fanned-in inbox: generous enough
/// that the per-binding mailbox backpressure (already bounded on the bus
/// side) is what actually governs flow control, not this internal relay.
fn combiner_capacity(slot: &ModuleSlot, doc: &PipelineDocument) -> usize {
    let per_input = slot.mailbox_size.unwrap_or(doc.options.default_mailbox_size);
    (per_input * slot.input.len().max(1)).max(64)
}

fn merged_config(slot: &ModuleSlot, overrides: &BTreeMap<String, serde_json::Value>) -> ModuleConfig {
    let mut config = slot.config.clone();
    let prefix = format!("{}.", slot.id);
    for (key, value) in overrides {
        if let Some(field) = key.strip_prefix(&prefix) {
            config.insert(field.to_string(), value.clone());
        }
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use eidolon_bootstrap::signals::NoOpSignalHandler;
    use eidolon_domain::entities::{ExecutionOptions, InputBinding, ModuleSlot};
    use eidolon_domain::value_objects::{ModuleName, Payload, RunMode, SlotId};

    use crate::application::module::test_support::RecordingModule;
    use crate::application::module::{Capabilities, ModuleConfig};
    use crate::application::module_registry::ModuleRegistry;
    use crate::infrastructure::adapters::{RsaPssSignatureService, Sha256ModuleHasher, YamlManifestParser};

    /// Publishes a fixed `int` payload on `"result"` during its one
    /// iteration, exercising the producer side of the bus.
    struct PublishingModule {
        capabilities: Option<Capabilities>,
    }

    #[async_trait]
    impl crate::application::module::Module for PublishingModule {
        async fn initialise(&mut self, _config: &ModuleConfig, capabilities: Capabilities) -> Result<(), RuntimeError> {
            self.capabilities = Some(capabilities);
            Ok(())
        }

        fn on_input(&mut self, _envelope: &Envelope) -> Result<(), RuntimeError> {
            Ok(())
        }

        async fn iterate(&mut self) -> Result<(), RuntimeError> {
            self.capabilities.as_ref().expect("initialised before iterate").publish("result", Payload::Int(42)).await
        }

        async fn teardown(&mut self) {}
    }

    async fn write_module(root: &std::path::Path, name: &str, port_block: &str) {
        let dir = root.join(name);
        tokio::fs::create_dir_all(&dir).await.unwrap();
        tokio::fs::write(
            dir.join("manifest.yaml"),
            format!("name: {name}\nalias: {name}\ncreator: test\nversion: 1.0.0\nruntime:\n  main: main.py\n{port_block}"),
        )
        .await
        .unwrap();
    }

    fn slot(id: &str, module_name: &str, run_mode: RunMode, input: HashMap<String, InputBinding>) -> ModuleSlot {
        ModuleSlot {
            id: SlotId::new(id).unwrap(),
            name: ModuleName::new(module_name).unwrap(),
            config: HashMap::new(),
            run_mode,
            depends_on: input.values().map(|b| b.slot_id.clone()).collect(),
            input,
            mailbox_size: None,
            mailbox_policy: None,
            cycle_delay: Some(Duration::from_millis(5)),
        }
    }

    /// Builds a two-slot pipeline (an unsigned producer and an unsigned
    /// consumer), discovered against real on-disk manifests through the
    /// real adapters, and returns everything `ModuleEngine::new` needs.
    async fn fixture(modules_root: &std::path::Path, timeout: Duration) -> (ModuleRegistry, ModuleFactoryRegistry, PipelineDocument, Arc<std::sync::Mutex<Vec<Envelope>>>) {
        write_module(modules_root, "producer_mod", "outputs:\n  - name: result\n    type: int\n").await;
        write_module(modules_root, "consumer_mod", "inputs:\n  - name: data\n    type: int\n").await;

        let registry = ModuleRegistry::discover(
            &[modules_root.to_path_buf()],
            &YamlManifestParser::new(),
            &Sha256ModuleHasher::new(),
            &RsaPssSignatureService::new(),
            &[],
        )
        .await
        .unwrap();

        let mut factories = ModuleFactoryRegistry::new();
        factories.register("producer_mod", || -> Box<dyn crate::application::module::Module> {
            Box::new(PublishingModule { capabilities: None })
        });
        let received: Arc<std::sync::Mutex<Vec<Envelope>>> = Arc::new(std::sync::Mutex::new(Vec::new()));
        let received_for_factory = received.clone();
        factories.register("consumer_mod", move || -> Box<dyn crate::application::module::Module> {
            Box::new(RecordingModule::new(received_for_factory.clone()))
        });

        let mut input = HashMap::new();
        input.insert(
            "data".to_string(),
            InputBinding {
                slot_id: SlotId::new("producer").unwrap(),
                output_name: "result".to_string(),
            },
        );

        let doc = PipelineDocument {
            name: "fixture".to_string(),
            description: String::new(),
            options: ExecutionOptions {
                timeout: Some(timeout),
                ..ExecutionOptions::default()
            },
            slots: vec![
                slot("producer", "producer_mod", RunMode::Once, HashMap::new()),
                slot("consumer", "consumer_mod", RunMode::Reactive, input),
            ],
        };

        (registry, factories, doc, received)
    }

    fn permissive_options() -> RunOptions {
        RunOptions {
            security_mode: SecurityMode::Permissive,
            allow_unverified: false,
            overrides: BTreeMap::new(),
        }
    }

    #[tokio::test]
    async fn a_published_envelope_is_delivered_to_its_reactive_subscriber() {
        let modules_root = tempfile::tempdir().unwrap();
        let (registry, factories, doc, received) = fixture(modules_root.path(), Duration::from_millis(200)).await;
        let config = EngineConfig::default();

        let engine = ModuleEngine::new(
            &registry,
            &factories,
            &config,
            permissive_options(),
            Arc::new(DenyPrompt),
            Box::new(NoOpSignalHandler::new()),
            Arc::new(Metrics::new()),
        );

        let outcome = tokio::time::timeout(Duration::from_secs(5), engine.run(doc)).await.unwrap().unwrap();

        assert!(outcome.excluded.is_empty(), "unsigned modules are admitted with a warning under permissive mode");
        assert_eq!(outcome.host_reports.len(), 2);
        for report in &outcome.host_reports {
            assert_eq!(report.outcome, HostOutcome::Completed);
        }

        let delivered = received.lock().unwrap();
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].payload, Payload::Int(42));
        assert_eq!(delivered[0].destination_input.as_deref(), Some("data"));
    }

    /// No `options.timeout` configured and no operator signal ever fires
    /// (`NoOpSignalHandler`): the engine must still return once every
    /// non-`loop` slot reaches a terminal state on its own.
    #[tokio::test]
    async fn a_finite_pipeline_with_no_timeout_terminates_on_natural_completion() {
        let modules_root = tempfile::tempdir().unwrap();
        let (registry, factories, mut doc, received) = fixture(modules_root.path(), Duration::from_secs(3600)).await;
        doc.options.timeout = None;
        let config = EngineConfig::default();

        let engine = ModuleEngine::new(
            &registry,
            &factories,
            &config,
            permissive_options(),
            Arc::new(DenyPrompt),
            Box::new(NoOpSignalHandler::new()),
            Arc::new(Metrics::new()),
        );

        let outcome = tokio::time::timeout(Duration::from_secs(5), engine.run(doc)).await.expect("natural completion must not depend on a configured timeout").unwrap();

        assert_eq!(outcome.host_reports.len(), 2);
        for report in &outcome.host_reports {
            assert_eq!(report.outcome, HostOutcome::Completed);
        }
        assert_eq!(received.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn on_trigger_slot_is_rejected_when_its_module_declares_no_trigger_input() {
        let modules_root = tempfile::tempdir().unwrap();
        write_module(modules_root.path(), "no_trigger_mod", "inputs:\n  - name: data\n    type: int\n").await;

        let registry = ModuleRegistry::discover(
            &[modules_root.path().to_path_buf()],
            &YamlManifestParser::new(),
            &Sha256ModuleHasher::new(),
            &RsaPssSignatureService::new(),
            &[],
        )
        .await
        .unwrap();
        let factories = ModuleFactoryRegistry::new();

        let doc = PipelineDocument {
            name: "fixture".to_string(),
            description: String::new(),
            options: ExecutionOptions::default(),
            slots: vec![slot("consumer", "no_trigger_mod", RunMode::OnTrigger, HashMap::new())],
        };

        let config = EngineConfig::default();
        let engine = ModuleEngine::new(
            &registry,
            &factories,
            &config,
            permissive_options(),
            Arc::new(DenyPrompt),
            Box::new(NoOpSignalHandler::new()),
            Arc::new(Metrics::new()),
        );

        let err = engine.run(doc).await.unwrap_err();
        assert!(matches!(err, RuntimeError::Domain(EidolonError::BadPipeline(_))));
    }

    #[tokio::test]
    async fn paranoid_mode_excludes_every_unsigned_module_and_its_downstream_consumers() {
        let modules_root = tempfile::tempdir().unwrap();
        let (registry, factories, doc, _received) = fixture(modules_root.path(), Duration::from_millis(200)).await;
        let config = EngineConfig::default();

        let options = RunOptions {
            security_mode: SecurityMode::Paranoid,
            allow_unverified: false,
            overrides: BTreeMap::new(),
        };

        let engine = ModuleEngine::new(
            &registry,
            &factories,
            &config,
            options,
            Arc::new(DenyPrompt),
            Box::new(NoOpSignalHandler::new()),
            Arc::new(Metrics::new()),
        );

        let outcome = tokio::time::timeout(Duration::from_secs(5), engine.run(doc)).await.unwrap().unwrap();

        assert!(outcome.host_reports.is_empty());
        let excluded_slots: HashSet<&str> = outcome.excluded.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(excluded_slots, HashSet::from(["producer", "consumer"]));
    }
}
