// /////////////////////////////////////////////////////////////////////////////
// Optimized Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Signature Service
//!
//! Domain-level port for the Module Security Subsystem's cryptographic
//! operations (§4.2, §4.3): verifying a module digest against a detached
//! signature and a trusted-signer registry, signing a module digest for
//! publication, and generating a new keypair. The RSA-PSS implementation
//! lives in the runtime crate's infrastructure layer.

use async_trait::async_trait;

use crate::entities::TrustedSigner;
use crate::value_objects::{ModuleDigest, Verdict};
use crate::EidolonError;

/// A detached signature over a module digest, as shipped alongside a
/// manifest (`module.sig`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetachedSignature {
    pub signer_id: String,
    pub signature_bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keypair {
    pub public_key_pem: String,
    pub private_key_pem: String,
}

#[async_trait]
pub trait SignatureService: Send + Sync {
    /// Verifies `signature` over `digest` against `trusted_signers`,
    /// returning the §4.3 verdict. Absence of a signature is `Unsigned`, not
    /// an error; a signature from a signer not in `trusted_signers` is
    /// `SignedButUntrusted`; cryptographic failure is `Invalid`.
    async fn verify(
        &self,
        digest: &ModuleDigest,
        signature: Option<&DetachedSignature>,
        trusted_signers: &[TrustedSigner],
    ) -> Result<Verdict, EidolonError>;

    /// Produces a detached signature over `digest` using the private key at
    /// `private_key_pem`.
    async fn sign(
        &self,
        digest: &ModuleDigest,
        signer_id: &str,
        private_key_pem: &str,
    ) -> Result<DetachedSignature, EidolonError>;

    /// Generates a fresh RSA keypair for a new trusted signer.
    async fn generate_keypair(&self) -> Result<Keypair, EidolonError>;
}
