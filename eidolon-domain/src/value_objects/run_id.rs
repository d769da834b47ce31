// /////////////////////////////////////////////////////////////////////////////
// Optimized Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Run Identifier
//!
//! Correlates one engine execution (discover → load → verify → run →
//! shutdown) across log lines and metrics. Built on the generic,
//! time-ordered [`GenericId`] system.

use crate::value_objects::generic_id::{GenericId, IdCategory};
use ulid::Ulid;

#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct RunIdCategory;

impl IdCategory for RunIdCategory {
    fn category_name() -> &'static str {
        "run"
    }

    fn validate_id(_ulid: &Ulid) -> Result<(), crate::EidolonError> {
        Ok(())
    }

    fn allows_nil() -> bool {
        true
    }
}

pub type RunId = GenericId<RunIdCategory>;
