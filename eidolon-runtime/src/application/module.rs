// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Module Contract (C6)
//!
//! The lifecycle every module slot's instance implements (§4.6):
//! `initialise` once, `on_input` synchronously off the bus delivery path,
//! `iterate` per its run mode, `teardown` during shutdown.
//!
//! A manifest's `runtime.main` names the module's entry point, but this
//! runtime does not shell out to an external interpreter to reach it —
//! modules are native `Module` trait objects registered with a
//! [`ModuleFactory`] under the manifest's name (see DESIGN.md, "module
//! execution mechanism"). Bundled module domain logic (crawlers,
//! reporters, and the like) stays out of scope; this crate only supplies
//! the contract and the engine that drives it.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use eidolon_domain::entities::Envelope;
use eidolon_domain::value_objects::{Payload, SlotId, TypeExpr};

use crate::application::message_bus::MessageBus;
use crate::error::RuntimeError;
use crate::infrastructure::runtime::worker_pool::WorkerPool;

/// Slot override configuration (manifest-independent `config:` map plus
/// `--set slot.key=value` CLI overrides), handed to `initialise` verbatim.
pub type ModuleConfig = HashMap<String, serde_json::Value>;

/// What `initialise` receives alongside the slot's configuration: a bus
/// handle scoped to this slot's declared outputs, and the shared worker
/// pool (§4.6, §5).
pub struct Capabilities {
    slot_id: SlotId,
    bus: Arc<MessageBus>,
    output_types: HashMap<String, TypeExpr>,
    worker_pool: Arc<WorkerPool>,
}

impl Capabilities {
    pub(crate) fn new(
        slot_id: SlotId,
        bus: Arc<MessageBus>,
        output_types: HashMap<String, TypeExpr>,
        worker_pool: Arc<WorkerPool>,
    ) -> Self {
        Self {
            slot_id,
            bus,
            output_types,
            worker_pool,
        }
    }

    /// Publishes `payload` on one of this slot's declared manifest outputs
    /// (§4.5 `publish`). Unknown output names are tagged `any` rather than
    /// rejected — the manifest is validated at load time, so this can only
    /// happen if a module publishes a name it never declared.
    pub async fn publish(&self, output_name: &str, payload: Payload) -> Result<(), RuntimeError> {
        let source_type = self.output_types.get(output_name).cloned().unwrap_or(TypeExpr::Any);
        self.bus.publish(&self.slot_id, output_name, payload, source_type).await
    }

    /// The shared, `max_threads`-bounded pool for offloading blocking work
    /// (§4.6 "worker pool").
    pub fn worker_pool(&self) -> &Arc<WorkerPool> {
        &self.worker_pool
    }

    pub fn slot_id(&self) -> &SlotId {
        &self.slot_id
    }
}

/// One module's lifecycle (§4.6). Implementations are expected to hold
/// their own state between calls; the host never calls two of these
/// concurrently for the same instance (§5: "`iterate()` invocations on one
/// module are strictly serial").
#[async_trait]
pub trait Module: Send {
    /// Called once before the slot's host task starts scheduling
    /// iterations or deliveries.
    async fn initialise(&mut self, config: &ModuleConfig, capabilities: Capabilities) -> Result<(), RuntimeError>;

    /// Called synchronously from the bus delivery path (§4.6); must not
    /// block. Typically stores the payload into module-local state for the
    /// next `iterate()`.
    fn on_input(&mut self, envelope: &Envelope) -> Result<(), RuntimeError>;

    /// Called according to the slot's run mode (§4.6).
    async fn iterate(&mut self) -> Result<(), RuntimeError>;

    /// Called during shutdown, in reverse topological order across slots
    /// (§4.7 step 8). May do asynchronous cleanup.
    async fn teardown(&mut self);
}

/// Constructs a fresh, uninitialised [`Module`] instance for one manifest
/// name (§4.7 step 6, "construct each module").
pub trait ModuleFactory: Send + Sync {
    fn create(&self) -> Box<dyn Module>;
}

impl<F> ModuleFactory for F
where
    F: Fn() -> Box<dyn Module> + Send + Sync,
{
    fn create(&self) -> Box<dyn Module> {
        (self)()
    }
}

/// In-process registry mapping a manifest's module name to the factory
/// that builds it. The embedding binary populates this at startup; the
/// Module Registry (C3) consults it once a manifest has passed admission.
#[derive(Default)]
pub struct ModuleFactoryRegistry {
    factories: HashMap<String, Box<dyn ModuleFactory>>,
}

impl ModuleFactoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, module_name: impl Into<String>, factory: impl ModuleFactory + 'static) {
        self.factories.insert(module_name.into(), Box::new(factory));
    }

    pub fn create(&self, module_name: &str) -> Option<Box<dyn Module>> {
        self.factories.get(module_name).map(|f| f.create())
    }

    pub fn contains(&self, module_name: &str) -> bool {
        self.factories.contains_key(module_name)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use std::sync::Mutex;

    /// A module that records every envelope it receives and republishes it
    /// unchanged on `"echo"`, used across `message_bus`/`module_host`/
    /// `module_engine` unit and integration tests.
    #[derive(Default)]
    pub struct RecordingModule {
        pub received: Arc<Mutex<Vec<Envelope>>>,
        capabilities: Option<Capabilities>,
    }

    impl RecordingModule {
        pub fn new(received: Arc<Mutex<Vec<Envelope>>>) -> Self {
            Self {
                received,
                capabilities: None,
            }
        }
    }

    #[async_trait]
    impl Module for RecordingModule {
        async fn initialise(&mut self, _config: &ModuleConfig, capabilities: Capabilities) -> Result<(), RuntimeError> {
            self.capabilities = Some(capabilities);
            Ok(())
        }

        fn on_input(&mut self, envelope: &Envelope) -> Result<(), RuntimeError> {
            self.received.lock().unwrap().push(envelope.clone());
            Ok(())
        }

        async fn iterate(&mut self) -> Result<(), RuntimeError> {
            Ok(())
        }

        async fn teardown(&mut self) {}
    }

    #[test]
    fn factory_registry_creates_registered_modules() {
        let mut registry = ModuleFactoryRegistry::new();
        registry.register("recorder", || -> Box<dyn Module> {
            Box::new(RecordingModule::new(Arc::new(Mutex::new(Vec::new()))))
        });
        assert!(registry.contains("recorder"));
        assert!(registry.create("recorder").is_some());
        assert!(registry.create("unknown").is_none());
    }
}
