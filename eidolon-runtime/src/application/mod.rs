// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Application Layer
//!
//! The runtime-scoped orchestration that sits between the pure domain
//! (`eidolon-domain`) and the concrete infrastructure adapters: the bus,
//! mailboxes, module lifecycle, host scheduling, module discovery, and the
//! engine that composes all of it into one running pipeline.

pub mod mailbox;
pub mod message_bus;
pub mod module;
pub mod module_engine;
pub mod module_host;
pub mod module_registry;
pub mod translation_cache;

pub use message_bus::MessageBus;
pub use module::{Capabilities, Module, ModuleConfig, ModuleFactory, ModuleFactoryRegistry};
pub use module_engine::{AutoAllowPrompt, DenyPrompt, EngineOutcome, ModuleEngine, PromptCapability, RunOptions};
pub use module_host::{HostOutcome, HostReport, ModuleHost};
pub use module_registry::{ModuleRegistry, RegisteredModule};
pub use translation_cache::TranslationCache;
