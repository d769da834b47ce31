// /////////////////////////////////////////////////////////////////////////////
// Optimized Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Trusted Signer
//!
//! One entry of the trusted-signer registry (§4.2, §4.3): a signer's public
//! key and the operator-facing comment attached when it was trusted.

use serde::{Deserialize, Serialize};

use crate::value_objects::SignerId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustedSigner {
    pub signer_id: SignerId,
    /// PEM-encoded RSA public key used to verify module signatures.
    pub public_key_pem: String,
    #[serde(default)]
    pub comment: String,
}

impl TrustedSigner {
    pub fn new(signer_id: SignerId, public_key_pem: impl Into<String>, comment: impl Into<String>) -> Self {
        Self {
            signer_id,
            public_key_pem: public_key_pem.into(),
            comment: comment.into(),
        }
    }
}
