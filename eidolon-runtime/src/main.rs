// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # `eidolon` Binary
//!
//! Wires the bootstrap layer (CLI parsing, logging, signals, exit codes)
//! to the runtime's application layer: discovers modules, loads a pipeline
//! document, and drives a [`ModuleEngine`] run, or dispatches a `list`/
//! `security` subcommand directly against the adapters.

use std::path::PathBuf;
use std::sync::Arc;

use eidolon_bootstrap::cli::ValidatedCommand;
use eidolon_bootstrap::exit_code::ExitCode;
use eidolon_bootstrap::signals::create_signal_handler;

use eidolon_domain::entities::TrustedSigner;
use eidolon_domain::services::{ManifestParser, ModuleHasher, PipelineParser, SignatureService};
use eidolon_domain::value_objects::SignerId;
use eidolon_domain::EidolonError;

use eidolon_runtime::application::{AutoAllowPrompt, DenyPrompt, ModuleEngine, ModuleFactoryRegistry, ModuleRegistry, RunOptions};
use eidolon_runtime::error::RuntimeError;
use eidolon_runtime::infrastructure::adapters::{
    RsaPssSignatureService, Sha256ModuleHasher, TrustedSignerRegistry, YamlManifestParser, YamlPipelineParser,
};
use eidolon_runtime::infrastructure::config::{module_search_paths, pipeline_search_paths, ConfigService, EngineConfig};
use eidolon_runtime::infrastructure::logging;
use eidolon_runtime::infrastructure::metrics::Metrics;
use eidolon_runtime::presentation;

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let cli = match eidolon_bootstrap::bootstrap_cli() {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::ConfigurationError.into();
        }
    };

    logging::init(cli.verbose);

    match run(cli).await {
        Ok(code) => code.into(),
        Err(e) => {
            tracing::error!(target: "bootstrap", error = %e, "run failed");
            eprintln!("error: {e}");
            runtime_error_exit_code(&e).into()
        }
    }
}

fn runtime_error_exit_code(error: &RuntimeError) -> ExitCode {
    match error.as_domain_error() {
        Some(domain_error) => ExitCode::from_domain_error(domain_error),
        None => ExitCode::ConfigurationError,
    }
}

async fn run(cli: eidolon_bootstrap::cli::ValidatedCli) -> Result<ExitCode, RuntimeError> {
    let config = ConfigService::load(cli.config.as_deref())?;

    match cli.command {
        ValidatedCommand::Run {
            pipeline,
            security_mode,
            allow_unverified,
            overrides,
        } => run_pipeline(&config, pipeline, security_mode, allow_unverified, overrides).await,
        ValidatedCommand::ListModules => list_modules(&config).await,
        ValidatedCommand::ListPipelines => list_pipelines(),
        ValidatedCommand::SecurityVerify { module_path } => security_verify(&config, module_path).await,
        ValidatedCommand::SecuritySign { key, module_path } => security_sign(key, module_path).await,
        ValidatedCommand::SecurityGenerateKeypair { output_dir } => security_generate_keypair(output_dir).await,
        ValidatedCommand::SecurityTrust { key, id, comment } => security_trust(&config, key, id, comment).await,
        ValidatedCommand::SecurityUntrust { id } => security_untrust(&config, id).await,
        ValidatedCommand::SecurityListTrusted => security_list_trusted(&config).await,
    }
}

async fn discover_registry(config: &EngineConfig) -> Result<ModuleRegistry, RuntimeError> {
    let manifest_parser = YamlManifestParser::new();
    let hasher = Sha256ModuleHasher::new();
    let signature_service = RsaPssSignatureService::new();
    let trusted_signers = TrustedSignerRegistry::new(config.trusted_signers_path()).load().await?;

    ModuleRegistry::discover(&module_search_paths(), &manifest_parser, &hasher, &signature_service, &trusted_signers).await
}

async fn run_pipeline(
    config: &EngineConfig,
    pipeline: Option<String>,
    security_mode: eidolon_domain::value_objects::SecurityMode,
    allow_unverified: bool,
    overrides: std::collections::BTreeMap<String, serde_json::Value>,
) -> Result<ExitCode, RuntimeError> {
    let pipeline_name = pipeline.ok_or_else(|| {
        RuntimeError::Domain(EidolonError::bad_pipeline("no pipeline name given and no default configured"))
    })?;

    let registry = discover_registry(config).await?;
    let doc_path = resolve_pipeline_path(&pipeline_name)?;
    let parser = YamlPipelineParser::new();
    let doc = parser.parse(&doc_path).await?;

    let factories = ModuleFactoryRegistry::new();
    let metrics = Arc::new(Metrics::new());
    let signals = create_signal_handler();
    let prompt: Arc<dyn eidolon_runtime::application::PromptCapability> =
        if allow_unverified { Arc::new(AutoAllowPrompt) } else { Arc::new(DenyPrompt) };

    let options = RunOptions {
        security_mode,
        allow_unverified,
        overrides,
    };

    let engine = ModuleEngine::new(&registry, &factories, config, options, prompt, signals, metrics);
    let outcome = engine.run(doc).await?;

    println!("{}", presentation::render_run_summary(&outcome));

    Ok(match outcome.fatal_error() {
        Some(e) => ExitCode::from_domain_error(&e),
        None => ExitCode::Success,
    })
}

/// Resolves a bare pipeline name to a `<name>.yaml` document under
/// `PIPELINE_DIR` (§6), falling back to treating the argument as a literal
/// path when it already names an existing file.
fn resolve_pipeline_path(name: &str) -> Result<PathBuf, RuntimeError> {
    let literal = PathBuf::from(name);
    if literal.is_file() {
        return Ok(literal);
    }

    for root in pipeline_search_paths() {
        let candidate = root.join(format!("{name}.yaml"));
        if candidate.is_file() {
            return Ok(candidate);
        }
    }

    Err(RuntimeError::Domain(EidolonError::bad_pipeline(format!(
        "pipeline '{name}' not found under PIPELINE_DIR"
    ))))
}

async fn list_modules(config: &EngineConfig) -> Result<ExitCode, RuntimeError> {
    let registry = discover_registry(config).await?;
    println!("{}", presentation::render_module_list(&registry));
    Ok(ExitCode::Success)
}

fn list_pipelines() -> Result<ExitCode, RuntimeError> {
    let roots = pipeline_search_paths();
    if roots.is_empty() {
        println!("No pipeline search roots configured. Check PIPELINE_DIR.");
        return Ok(ExitCode::Success);
    }

    let mut names = Vec::new();
    for root in roots {
        let Ok(entries) = std::fs::read_dir(&root) else {
            continue;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yaml" || ext == "yml") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    names.push(stem.to_string());
                }
            }
        }
    }
    names.sort();
    names.dedup();

    if names.is_empty() {
        println!("No pipeline documents discovered. Check PIPELINE_DIR.");
    } else {
        println!("Discovered {} pipeline(s):", names.len());
        for name in names {
            println!("  {name}");
        }
    }
    Ok(ExitCode::Success)
}

async fn security_verify(config: &EngineConfig, module_path: PathBuf) -> Result<ExitCode, RuntimeError> {
    let manifest_parser = YamlManifestParser::new();
    let hasher = Sha256ModuleHasher::new();
    let signature_service = RsaPssSignatureService::new();
    let trusted_signers = TrustedSignerRegistry::new(config.trusted_signers_path()).load().await?;

    let manifest_path = module_path.join("manifest.yaml");
    let manifest = manifest_parser.parse(&manifest_path).await?;
    let digest = hasher.hash_module(&module_path).await?;

    let signature_path = module_path.join("module.sig");
    let signature = match tokio::fs::read(&signature_path).await {
        Ok(bytes) => Some(eidolon_domain::services::signature_service::DetachedSignature {
            signer_id: String::new(),
            signature_bytes: bytes,
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => return Err(RuntimeError::Io(e)),
    };

    let verdict = signature_service.verify(&digest, signature.as_ref(), &trusted_signers).await?;
    println!("module: {}", manifest.name.as_str());
    println!("digest: {digest}");
    println!("verdict: {verdict}");

    Ok(if matches!(verdict, eidolon_domain::value_objects::Verdict::Invalid) {
        ExitCode::SecurityRejection
    } else {
        ExitCode::Success
    })
}

async fn security_sign(key_path: PathBuf, module_path: PathBuf) -> Result<ExitCode, RuntimeError> {
    let hasher = Sha256ModuleHasher::new();
    let signature_service = RsaPssSignatureService::new();

    let private_key_pem = tokio::fs::read_to_string(&key_path).await?;
    let digest = hasher.hash_module(&module_path).await?;
    let signer_id = key_path.file_stem().and_then(|s| s.to_str()).unwrap_or("unknown");

    let detached = signature_service.sign(&digest, signer_id, &private_key_pem).await?;
    tokio::fs::write(module_path.join("module.sig"), &detached.signature_bytes).await?;

    println!("signed module at {} (digest {digest})", module_path.display());
    Ok(ExitCode::Success)
}

async fn security_generate_keypair(output_dir: PathBuf) -> Result<ExitCode, RuntimeError> {
    let signature_service = RsaPssSignatureService::new();
    let keypair = signature_service.generate_keypair().await?;

    tokio::fs::create_dir_all(&output_dir).await?;
    tokio::fs::write(output_dir.join("private.pem"), &keypair.private_key_pem).await?;
    tokio::fs::write(output_dir.join("public.pem"), &keypair.public_key_pem).await?;

    println!("generated keypair in {}", output_dir.display());
    Ok(ExitCode::Success)
}

async fn security_trust(config: &EngineConfig, key_path: PathBuf, id: String, comment: Option<String>) -> Result<ExitCode, RuntimeError> {
    let registry_store = TrustedSignerRegistry::new(config.trusted_signers_path());
    let mut signers = registry_store.load().await?;

    let public_key_pem = tokio::fs::read_to_string(&key_path).await?;
    let signer_id = SignerId::new(id).map_err(RuntimeError::Domain)?;

    signers.retain(|s| s.signer_id != signer_id);
    signers.push(TrustedSigner::new(signer_id.clone(), public_key_pem, comment.unwrap_or_default()));
    registry_store.save(&signers).await?;

    println!("trusted signer '{signer_id}' added");
    Ok(ExitCode::Success)
}

async fn security_untrust(config: &EngineConfig, id: String) -> Result<ExitCode, RuntimeError> {
    let registry_store = TrustedSignerRegistry::new(config.trusted_signers_path());
    let mut signers = registry_store.load().await?;

    let signer_id = SignerId::new(id).map_err(RuntimeError::Domain)?;
    let before = signers.len();
    signers.retain(|s| s.signer_id != signer_id);
    registry_store.save(&signers).await?;

    if signers.len() == before {
        println!("signer '{signer_id}' was not trusted");
    } else {
        println!("signer '{signer_id}' removed");
    }
    Ok(ExitCode::Success)
}

async fn security_list_trusted(config: &EngineConfig) -> Result<ExitCode, RuntimeError> {
    let signers = TrustedSignerRegistry::new(config.trusted_signers_path()).load().await?;

    if signers.is_empty() {
        println!("No trusted signers configured.");
        return Ok(ExitCode::Success);
    }

    println!("Trusted signer(s):");
    for signer in signers {
        println!("  {:<24} {}", signer.signer_id.as_str(), signer.comment);
    }
    Ok(ExitCode::Success)
}
