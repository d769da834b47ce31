// /////////////////////////////////////////////////////////////////////////////
// Optimized Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Domain Error Module
//!
//! [`EidolonError`] is the one structured error enum spanning every
//! configuration-time, security, per-delivery, and per-module failure kind
//! the domain distinguishes (§7). Every variant carries the structured
//! context a caller needs to match on programmatically rather than
//! formatted message text.

mod eidolon_error;

pub use eidolon_error::EidolonError;
