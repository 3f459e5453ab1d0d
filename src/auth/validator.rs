// Copyright (c) 2025 Panda Auth Contributors
// This file is part of the panda-auth project and is licensed under the
// MIT License (see LICENSE.md for details).

//! Token validation against the current key material
//!
//! The validator checks three things on an inbound compact token: the RS256
//! signature against the store's public key, that the token has not
//! expired (no leeway), and that the issuer matches the configured one.
//! Each failure is terminal for the request; nothing here retries, and
//! rejections are expected client-side conditions rather than server
//! faults.

use std::sync::Arc;

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, Algorithm, Validation};
use thiserror::Error;

use super::claims::AccessTokenClaims;
use super::keys::RsaKeyStore;

/// Failure modes of token validation.
///
/// `SignatureInvalid` covers both tampering and tokens signed with a
/// different keypair, including tokens issued before a restart of this
/// service regenerated the key.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The token cannot be parsed as a compact JWT.
    #[error("malformed token")]
    Malformed(#[source] jsonwebtoken::errors::Error),

    /// The signature does not match the current public key.
    #[error("token signature is invalid")]
    SignatureInvalid,

    /// The token's expiration time has passed.
    #[error("token has expired")]
    Expired,

    /// The token was issued by a different issuer.
    #[error("token issuer mismatch")]
    IssuerMismatch,
}

/// Validates inbound compact tokens against the current public key.
pub struct TokenValidator {
    key_store: Arc<RsaKeyStore>,
    expected_issuer: String,
}

impl TokenValidator {
    pub fn new(key_store: Arc<RsaKeyStore>, expected_issuer: impl Into<String>) -> Self {
        Self {
            key_store,
            expected_issuer: expected_issuer.into(),
        }
    }

    /// Validate a compact token and return its claims.
    pub fn validate(&self, token: &str) -> Result<AccessTokenClaims, ValidationError> {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.leeway = 0;
        validation.validate_exp = true;
        // The claim shape carries an audience, but only signature, expiry,
        // and issuer gate acceptance.
        validation.validate_aud = false;
        validation.set_issuer(&[&self.expected_issuer]);

        let token_data = decode::<AccessTokenClaims>(
            token,
            self.key_store.decoding_key(),
            &validation,
        )
        .map_err(|e| match e.kind() {
            ErrorKind::InvalidSignature => ValidationError::SignatureInvalid,
            ErrorKind::ExpiredSignature => ValidationError::Expired,
            ErrorKind::InvalidIssuer => ValidationError::IssuerMismatch,
            _ => ValidationError::Malformed(e),
        })?;

        Ok(token_data.claims)
    }
}
