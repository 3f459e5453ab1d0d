// Copyright (c) 2025 Panda Auth Contributors
// This file is part of the panda-auth project and is licensed under the
// MIT License (see LICENSE.md for details).

//! Access token construction and signing
//!
//! The signer turns an authenticated principal name into a signed compact
//! JWT. It never authenticates anyone itself: callers must only hand it
//! principals that already passed the session layer, and an empty principal
//! is rejected as unauthorized.

use std::sync::Arc;

use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, Header};
use thiserror::Error;

use super::claims::AccessTokenClaims;
use super::keys::RsaKeyStore;

/// Failure modes of token issuance.
#[derive(Debug, Error)]
pub enum IssuanceError {
    /// Issuance was requested without an authenticated principal.
    #[error("no authenticated principal")]
    Unauthorized,

    /// The signing operation itself failed.
    #[error("token signing failed: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

/// A signed compact JWT together with structured access to its parts.
///
/// Created by [`TokenSigner::issue_access_token`] and never mutated. The
/// header and claims are the exact values that were signed, kept so callers
/// can expose a decoded view without re-parsing the token.
#[derive(Debug, Clone)]
pub struct SignedToken {
    token: String,
    headers: Header,
    claims: AccessTokenClaims,
}

impl SignedToken {
    /// The compact serialized form.
    pub fn as_str(&self) -> &str {
        &self.token
    }

    /// Consume the token, returning the compact serialized form.
    pub fn into_string(self) -> String {
        self.token
    }

    /// The JOSE header that was signed.
    pub fn headers(&self) -> &Header {
        &self.headers
    }

    /// The claim set that was signed.
    pub fn claims(&self) -> &AccessTokenClaims {
        &self.claims
    }
}

/// Produces signed access tokens for authenticated principals.
pub struct TokenSigner {
    key_store: Arc<RsaKeyStore>,
}

impl TokenSigner {
    pub fn new(key_store: Arc<RsaKeyStore>) -> Self {
        Self { key_store }
    }

    /// Issue an access token for `principal`.
    ///
    /// The claim set is fixed apart from the subject and the timestamps:
    /// two calls for the same principal at different times produce different
    /// `iat`/`exp` but structurally identical claims. The header carries
    /// `RS256`, the store's current key id, and `typ: JWT`.
    pub fn issue_access_token(
        &self,
        principal: &str,
        issuer: &str,
    ) -> Result<SignedToken, IssuanceError> {
        if principal.trim().is_empty() {
            return Err(IssuanceError::Unauthorized);
        }

        let now = Utc::now().timestamp();
        let claims = AccessTokenClaims::new(principal, issuer, now);

        let mut header = Header::new(Algorithm::RS256);
        header.kid = Some(self.key_store.key_id().to_string());
        header.typ = Some("JWT".to_string());

        let token = encode(&header, &claims, self.key_store.encoding_key())?;

        Ok(SignedToken {
            token,
            headers: header,
            claims,
        })
    }
}
