// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # YAML Pipeline Parser
//!
//! Concrete [`PipelineParser`] adapter (§4.1, §6). The on-disk document
//! nests everything under a `pipeline:` root and wires inputs with the
//! `producer.output` qualified-name shorthand (`input: { data: producer.result }`),
//! neither of which matches `PipelineDocument`'s own `Serialize`/`Deserialize`
//! shape directly — this adapter parses an intermediate DTO and builds the
//! domain entity from it, resolving the shorthand through
//! `InputBinding::parse_qualified`.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;

use eidolon_domain::entities::{ExecutionOptions, InputBinding, ModuleSlot, PipelineDocument};
use eidolon_domain::services::PipelineParser;
use eidolon_domain::value_objects::{ErrorPolicy, MailboxPolicy, ModuleName, RunMode, SlotId};
use eidolon_domain::EidolonError;

#[derive(Debug, Deserialize)]
struct PipelineFile {
    pipeline: PipelineDto,
}

#[derive(Debug, Deserialize)]
struct PipelineDto {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    execution: ExecutionDto,
    modules: Vec<SlotDto>,
}

#[derive(Debug, Default, Deserialize)]
struct ExecutionDto {
    max_threads: Option<usize>,
    timeout: Option<String>,
    retries: Option<u32>,
    error_policy: Option<ErrorPolicy>,
    default_mailbox_size: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct SlotDto {
    id: String,
    name: String,
    #[serde(default)]
    config: HashMap<String, serde_json::Value>,
    run_mode: RunMode,
    #[serde(default)]
    depends_on: Vec<String>,
    #[serde(default)]
    input: HashMap<String, String>,
    mailbox_size: Option<usize>,
    mailbox_policy: Option<MailboxPolicy>,
    cycle_delay: Option<String>,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct YamlPipelineParser;

impl YamlPipelineParser {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PipelineParser for YamlPipelineParser {
    async fn parse(&self, path: &Path) -> Result<PipelineDocument, EidolonError> {
        let path = path.to_path_buf();
        let raw = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| EidolonError::bad_pipeline(format!("cannot read {}: {e}", path.display())))?;

        let file: PipelineFile = serde_yaml::from_str(&raw)
            .map_err(|e| EidolonError::bad_pipeline(format!("malformed pipeline {}: {e}", path.display())))?;

        let document = build_document(file.pipeline)?;
        document.validate()?;
        Ok(document)
    }
}

fn build_document(dto: PipelineDto) -> Result<PipelineDocument, EidolonError> {
    let mut options = ExecutionOptions::default();
    if let Some(max_threads) = dto.execution.max_threads {
        options.max_threads = max_threads;
    }
    if let Some(timeout) = dto.execution.timeout {
        options.timeout = Some(
            humantime::parse_duration(&timeout)
                .map_err(|e| EidolonError::bad_pipeline(format!("invalid timeout '{timeout}': {e}")))?,
        );
    }
    if let Some(retries) = dto.execution.retries {
        options.retries = retries;
    }
    if let Some(error_policy) = dto.execution.error_policy {
        options.error_policy = error_policy;
    }
    if let Some(default_mailbox_size) = dto.execution.default_mailbox_size {
        options.default_mailbox_size = default_mailbox_size;
    }

    let slots = dto.modules.into_iter().map(build_slot).collect::<Result<Vec<_>, _>>()?;

    Ok(PipelineDocument {
        name: dto.name,
        description: dto.description,
        options,
        slots,
    })
}

fn build_slot(dto: SlotDto) -> Result<ModuleSlot, EidolonError> {
    let id = SlotId::new(dto.id)?;
    let name = ModuleName::new(dto.name)?;
    let depends_on = dto.depends_on.into_iter().map(SlotId::new).collect::<Result<Vec<_>, _>>()?;

    let mut input = HashMap::with_capacity(dto.input.len());
    for (local_name, qualified) in dto.input {
        let binding = InputBinding::parse_qualified(&qualified).ok_or_else(|| {
            EidolonError::bad_pipeline(format!(
                "slot '{id}' input '{local_name}' has malformed binding '{qualified}', expected 'slot.output'"
            ))
        })?;
        input.insert(local_name, binding);
    }

    let cycle_delay = dto
        .cycle_delay
        .map(|s| humantime::parse_duration(&s).map_err(|e| EidolonError::bad_pipeline(format!("invalid cycle_delay '{s}': {e}"))))
        .transpose()?;

    Ok(ModuleSlot {
        id,
        name,
        config: dto.config,
        run_mode: dto.run_mode,
        depends_on,
        input,
        mailbox_size: dto.mailbox_size,
        mailbox_policy: dto.mailbox_policy,
        cycle_delay,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncWriteExt;

    async fn write_pipeline(dir: &tempfile::TempDir, body: &str) -> std::path::PathBuf {
        let path = dir.path().join("pipeline.yaml");
        let mut f = tokio::fs::File::create(&path).await.unwrap();
        f.write_all(body.as_bytes()).await.unwrap();
        path
    }

    #[tokio::test]
    async fn parses_the_canonical_example_fragment() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_pipeline(
            &dir,
            r#"
pipeline:
  name: example
  execution: { max_threads: 8, timeout: 300s, retries: 2, error_policy: halt }
  modules:
    - { id: producer, name: src_mod, run_mode: once }
    - { id: consumer, name: dst_mod, depends_on: [producer],
        input: { data: producer.result }, run_mode: reactive }
"#,
        )
        .await;

        let parser = YamlPipelineParser::new();
        let doc = parser.parse(&path).await.unwrap();
        assert_eq!(doc.name, "example");
        assert_eq!(doc.options.max_threads, 8);
        assert_eq!(doc.options.retries, 2);
        assert_eq!(doc.options.error_policy, ErrorPolicy::Halt);

        let consumer = doc.slot("consumer").unwrap();
        let binding = consumer.input.get("data").unwrap();
        assert_eq!(binding.slot_id.as_str(), "producer");
        assert_eq!(binding.output_name, "result");
    }

    #[tokio::test]
    async fn rejects_a_malformed_input_binding() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_pipeline(
            &dir,
            r#"
pipeline:
  name: broken
  modules:
    - { id: a, name: mod_a, run_mode: once, input: { data: "no-dot-here" } }
"#,
        )
        .await;

        let parser = YamlPipelineParser::new();
        assert!(parser.parse(&path).await.is_err());
    }

    #[tokio::test]
    async fn rejects_a_dependency_cycle_only_at_the_graph_stage() {
        // Parsing alone only checks structural validity (§4.1); cycle
        // detection is `aggregates::PipelineGraph::build`'s job.
        let dir = tempfile::tempdir().unwrap();
        let path = write_pipeline(
            &dir,
            r#"
pipeline:
  name: cyclic
  modules:
    - { id: a, name: mod_a, run_mode: once, depends_on: [b] }
    - { id: b, name: mod_b, run_mode: once, depends_on: [a] }
"#,
        )
        .await;

        let parser = YamlPipelineParser::new();
        assert!(parser.parse(&path).await.is_ok());
    }
}
