// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

// Production code safety enforced via CI and `make lint-strict`
// (lib/bins checked separately from tests - tests may use unwrap/expect)

//! # Eidolon Runtime
//!
//! The runtime half of a pluggable dataflow engine: discovers modules on
//! disk, verifies them against a trusted-signer registry, loads and
//! validates a pipeline document against the discovered manifests, wires a
//! typed publish/subscribe bus between module slots, and drives one host
//! task per slot from construction through cooperative shutdown.
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │              Presentation Layer                │
//! │  (terminal rendering of registry/run state)    │
//! └───────────────────────────────────────────────┘
//!                        │
//! ┌───────────────────────────────────────────────┐
//! │              Application Layer                 │
//! │  Module Registry · Message Bus · Translation   │
//! │  Cache · Module Host · Module Engine           │
//! └───────────────────────────────────────────────┘
//!                        │
//! ┌───────────────────────────────────────────────┐
//! │                Domain Layer                    │
//! │  (eidolon-domain: entities, value objects,     │
//! │   aggregates, domain services)                 │
//! └───────────────────────────────────────────────┘
//!                        │
//! ┌───────────────────────────────────────────────┐
//! │             Infrastructure Layer                │
//! │  YAML/manifest parsers · RSA-PSS signatures ·  │
//! │  SHA-256 module hashing · config · metrics     │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! Argument parsing, signal handling, shutdown coordination, and exit-code
//! mapping live one layer further out, in `eidolon-bootstrap`.

pub mod application;
pub mod infrastructure;
pub mod presentation;

pub mod error;

// Tests are organized as:
// - Unit tests: #[cfg(test)] modules within each source file
// - Integration tests: separate files in tests/ directory
