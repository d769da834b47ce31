// /////////////////////////////////////////////////////////////////////////////
// Optimized Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Eidolon Domain
//!
//! The pure business logic of a pluggable dataflow runtime: a pipeline of
//! independently developed modules, wired over a typed publish/subscribe
//! bus, with integrity enforced by detached module signatures. This crate
//! is completely independent of external concerns — filesystem, process
//! scheduling, the wire format of a manifest file — those live in
//! `eidolon-runtime`'s infrastructure layer behind the ports declared here.
//!
//! ## Module structure
//!
//! - [`entities`]: [`ModuleManifest`](entities::ModuleManifest),
//!   [`PipelineDocument`](entities::PipelineDocument),
//!   [`Envelope`](entities::Envelope), [`TrustedSigner`](entities::TrustedSigner)
//!   — the objects with identity that the runtime tracks across its
//!   lifecycle.
//! - [`aggregates`]: [`PipelineGraph`](aggregates::PipelineGraph) — the
//!   dependency graph derived from a pipeline document, its topological
//!   order, and transitive-exclusion computation.
//! - [`value_objects`]: identifiers, the [`TypeExpr`](value_objects::TypeExpr)
//!   grammar and compatibility relation, [`Payload`](value_objects::Payload),
//!   [`Verdict`](value_objects::Verdict)/[`Admission`](value_objects::Admission),
//!   and the run-mode/error-policy/mailbox-policy enums a pipeline document
//!   declares.
//! - [`services`]: the admission-policy decision matrix and translation
//!   coercion as pure functions, plus the `ManifestParser`/`PipelineParser`/
//!   `ModuleHasher`/`SignatureService` ports the runtime crate implements.
//! - [`events`]: the domain events a run emits at slot-lifecycle and
//!   security-decision boundaries.
//! - [`error`]: [`EidolonError`], the single structured error enum spanning
//!   every configuration-time, per-module, and per-delivery failure kind
//!   (§7).
//!
//! ## What this crate deliberately does not do
//!
//! No I/O, no async runtime dependency beyond the `async-trait` port
//! signatures, no concrete cryptography, no YAML/JSON parsing. Those are
//! `eidolon-runtime`'s job; this crate only defines the shapes they must
//! produce and the invariants they must uphold.

pub mod aggregates;
pub mod entities;
pub mod error;
pub mod events;
pub mod services;
pub mod value_objects;

pub use entities::{Envelope, ModuleManifest, ModuleSlot, PipelineDocument, TrustedSigner};
pub use error::EidolonError;
