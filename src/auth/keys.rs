// Copyright (c) 2025 Panda Auth Contributors
// This file is part of the panda-auth project and is licensed under the
// MIT License (see LICENSE.md for details).

//! RSA Key Management
//!
//! This module owns the single RSA keypair the service signs with. The pair
//! is loaded once at startup from two PEM files and never changes while the
//! process runs. A fresh random key id is generated alongside it, so every
//! restart produces a new key id and silently invalidates tokens issued by
//! the previous incarnation. Key rotation within a process lifetime is
//! deliberately not supported.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use jsonwebtoken::{DecodingKey, EncodingKey};
use rsa::pkcs8::DecodePublicKey;
use rsa::RsaPublicKey;
use uuid::Uuid;

/// Owner of the active RSA keypair and its key id.
///
/// The store is built exactly once before the server starts accepting
/// traffic and is shared behind an `Arc` afterwards. All accessors are
/// read-only and infallible; any problem with the key files is reported at
/// construction time and prevents startup.
pub struct RsaKeyStore {
    key_id: String,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    public_key: RsaPublicKey,
    public_key_body: String,
}

impl std::fmt::Debug for RsaKeyStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RsaKeyStore")
            .field("key_id", &self.key_id)
            .field("encoding_key", &"<EncodingKey>")
            .field("decoding_key", &"<DecodingKey>")
            .finish()
    }
}

impl RsaKeyStore {
    /// Load the keypair from two PEM files.
    ///
    /// The private key must be PKCS#8 PEM, the public key SPKI PEM. Fails
    /// if either file is missing, unreadable, or not a valid RSA key
    /// encoding; callers treat this as fatal and refuse to start.
    pub fn from_pem_files(
        private_key_path: impl AsRef<Path>,
        public_key_path: impl AsRef<Path>,
    ) -> Result<Self> {
        let private_pem = fs::read_to_string(private_key_path.as_ref()).with_context(|| {
            format!(
                "Failed to read private key file {:?}",
                private_key_path.as_ref()
            )
        })?;
        let public_pem = fs::read_to_string(public_key_path.as_ref()).with_context(|| {
            format!(
                "Failed to read public key file {:?}",
                public_key_path.as_ref()
            )
        })?;

        Self::from_pem(&private_pem, &public_pem)
    }

    /// Build the store from in-memory PEM strings.
    pub fn from_pem(private_pem: &str, public_pem: &str) -> Result<Self> {
        let encoding_key = EncodingKey::from_rsa_pem(private_pem.as_bytes())
            .context("Private key is not a valid RSA PEM")?;
        let decoding_key = DecodingKey::from_rsa_pem(public_pem.as_bytes())
            .context("Public key is not a valid RSA PEM")?;

        let public_key_body = pem_body(public_pem);
        let public_der = STANDARD
            .decode(public_key_body.as_bytes())
            .context("Public key body is not valid base64")?;
        let public_key = RsaPublicKey::from_public_key_der(&public_der)
            .context("Public key is not a valid SPKI RSA encoding")?;

        Ok(Self {
            key_id: Uuid::new_v4().to_string(),
            encoding_key,
            decoding_key,
            public_key,
            public_key_body,
        })
    }

    /// The key id for this process lifetime.
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// Signing half of the keypair.
    pub fn encoding_key(&self) -> &EncodingKey {
        &self.encoding_key
    }

    /// Verification half of the keypair.
    pub fn decoding_key(&self) -> &DecodingKey {
        &self.decoding_key
    }

    /// The parsed public key, used to derive JWK parameters.
    pub fn public_key(&self) -> &RsaPublicKey {
        &self.public_key
    }

    /// Raw public key material with the PEM armor stripped.
    ///
    /// With `encode` set, the body is base64-encoded once more, matching
    /// what callers that transport the key in a single opaque string expect.
    pub fn export_public_key(&self, encode: bool) -> String {
        if encode {
            STANDARD.encode(self.public_key_body.as_bytes())
        } else {
            self.public_key_body.clone()
        }
    }
}

/// Strip PEM armor lines and line separators, leaving the base64 body.
fn pem_body(pem: &str) -> String {
    pem.lines()
        .filter(|line| !line.starts_with("-----"))
        .collect::<Vec<_>>()
        .concat()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pem_body_strips_armor_and_newlines() {
        let pem = "-----BEGIN PUBLIC KEY-----\nAAAA\nBBBB\n-----END PUBLIC KEY-----\n";
        assert_eq!(pem_body(pem), "AAAABBBB");
    }

    #[test]
    fn garbage_pem_is_rejected() {
        let err = RsaKeyStore::from_pem("not a key", "also not a key");
        assert!(err.is_err());
    }

    #[test]
    fn missing_file_is_rejected() {
        let err = RsaKeyStore::from_pem_files("/nonexistent/private.key", "/nonexistent/pub.key");
        assert!(err.is_err());
    }
}
