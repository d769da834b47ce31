// /////////////////////////////////////////////////////////////////////////////
// Optimized Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Pipeline Parser
//!
//! Domain-level port for loading a [`PipelineDocument`] from disk (§4.1,
//! §6). Mirrors [`ManifestParser`](crate::services::ManifestParser) for the
//! pipeline document side of configuration loading.

use std::path::Path;

use async_trait::async_trait;

use crate::entities::PipelineDocument;
use crate::EidolonError;

#[async_trait]
pub trait PipelineParser: Send + Sync {
    /// Parses and structurally validates the pipeline document at `path`.
    async fn parse(&self, path: &Path) -> Result<PipelineDocument, EidolonError>;
}
