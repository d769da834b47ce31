// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # RSA-PSS Signature Service
//!
//! Concrete [`SignatureService`] adapter (§4.2): detached RSA-PSS(SHA-256)
//! signatures over a module's canonical digest, verified against the
//! trusted-signer registry.

use pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey, LineEnding};
use rsa::pss::{Signature, SigningKey, VerifyingKey};
use rsa::signature::rand_core::OsRng;
use rsa::signature::{RandomizedSigner, SignatureEncoding, Verifier};
use rsa::{RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;

use async_trait::async_trait;

use eidolon_domain::entities::TrustedSigner;
use eidolon_domain::services::signature_service::{DetachedSignature, Keypair, SignatureService};
use eidolon_domain::value_objects::{ModuleDigest, Verdict};
use eidolon_domain::EidolonError;

/// RSA key size for newly generated signing keys (§6 `security generate-keypair`).
const KEY_BITS: usize = 2048;

#[derive(Debug, Default, Clone, Copy)]
pub struct RsaPssSignatureService;

impl RsaPssSignatureService {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SignatureService for RsaPssSignatureService {
    async fn verify(
        &self,
        digest: &ModuleDigest,
        signature: Option<&DetachedSignature>,
        trusted_signers: &[TrustedSigner],
    ) -> Result<Verdict, EidolonError> {
        let Some(signature) = signature else {
            return Ok(Verdict::Unsigned);
        };

        let parsed_signature = match Signature::try_from(signature.signature_bytes.as_slice()) {
            Ok(sig) => sig,
            Err(_) => return Ok(Verdict::Invalid),
        };

        for signer in trusted_signers {
            let Ok(public_key) = RsaPublicKey::from_public_key_pem(&signer.public_key_pem) else {
                continue;
            };
            let verifying_key = VerifyingKey::<Sha256>::new(public_key);
            if verifying_key.verify(digest.as_bytes(), &parsed_signature).is_ok() {
                return Ok(Verdict::VerifiedByTrusted {
                    signer: signer.signer_id.clone(),
                });
            }
        }

        Ok(Verdict::SignedButUntrusted)
    }

    async fn sign(
        &self,
        digest: &ModuleDigest,
        signer_id: &str,
        private_key_pem: &str,
    ) -> Result<DetachedSignature, EidolonError> {
        let private_key = RsaPrivateKey::from_pkcs8_pem(private_key_pem)
            .map_err(|e| EidolonError::internal(format!("invalid private key: {e}")))?;
        let signing_key = SigningKey::<Sha256>::new(private_key);
        let signature = signing_key.sign_with_rng(&mut OsRng, digest.as_bytes());

        Ok(DetachedSignature {
            signer_id: signer_id.to_string(),
            signature_bytes: signature.to_bytes().to_vec(),
        })
    }

    async fn generate_keypair(&self) -> Result<Keypair, EidolonError> {
        let mut rng = OsRng;
        let private_key =
            RsaPrivateKey::new(&mut rng, KEY_BITS).map_err(|e| EidolonError::internal(format!("keygen failed: {e}")))?;
        let public_key = RsaPublicKey::from(&private_key);

        let private_key_pem = private_key
            .to_pkcs8_pem(LineEnding::LF)
            .map_err(|e| EidolonError::internal(format!("cannot encode private key: {e}")))?
            .to_string();
        let public_key_pem = public_key
            .to_public_key_pem(LineEnding::LF)
            .map_err(|e| EidolonError::internal(format!("cannot encode public key: {e}")))?;

        Ok(Keypair {
            public_key_pem,
            private_key_pem,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eidolon_domain::value_objects::SignerId;

    fn sample_digest() -> ModuleDigest {
        ModuleDigest::from_bytes([42u8; 32])
    }

    #[tokio::test]
    async fn absence_of_a_signature_is_unsigned() {
        let service = RsaPssSignatureService::new();
        let verdict = service.verify(&sample_digest(), None, &[]).await.unwrap();
        assert_eq!(verdict, Verdict::Unsigned);
    }

    #[tokio::test]
    async fn a_valid_signature_from_a_trusted_signer_verifies() {
        let service = RsaPssSignatureService::new();
        let keypair = service.generate_keypair().await.unwrap();
        let digest = sample_digest();

        let detached = service.sign(&digest, "alice", &keypair.private_key_pem).await.unwrap();

        let trusted = vec![TrustedSigner::new(
            SignerId::new("alice").unwrap(),
            keypair.public_key_pem,
            "test key".to_string(),
        )];

        let verdict = service.verify(&digest, Some(&detached), &trusted).await.unwrap();
        assert_eq!(
            verdict,
            Verdict::VerifiedByTrusted {
                signer: SignerId::new("alice").unwrap()
            }
        );
    }

    #[tokio::test]
    async fn a_valid_signature_from_an_untrusted_signer_is_signed_but_untrusted() {
        let service = RsaPssSignatureService::new();
        let signer_keys = service.generate_keypair().await.unwrap();
        let other_keys = service.generate_keypair().await.unwrap();
        let digest = sample_digest();

        let detached = service.sign(&digest, "mallory", &signer_keys.private_key_pem).await.unwrap();

        let trusted = vec![TrustedSigner::new(
            SignerId::new("someone-else").unwrap(),
            other_keys.public_key_pem,
            String::new(),
        )];

        let verdict = service.verify(&digest, Some(&detached), &trusted).await.unwrap();
        assert_eq!(verdict, Verdict::SignedButUntrusted);
    }

    #[tokio::test]
    async fn garbage_bytes_are_invalid() {
        let service = RsaPssSignatureService::new();
        let bogus = DetachedSignature {
            signer_id: String::new(),
            signature_bytes: vec![1, 2, 3],
        };
        let verdict = service.verify(&sample_digest(), Some(&bogus), &[]).await.unwrap();
        assert_eq!(verdict, Verdict::Invalid);
    }
}
