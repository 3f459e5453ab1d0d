// Copyright (c) 2025 Panda Auth Contributors
// This file is part of the panda-auth project and is licensed under the
// MIT License (see LICENSE.md for details).

//! JWKS and OpenID discovery documents
//!
//! This module derives the public-key discovery documents that let third
//! parties verify tokens without contacting this service per request:
//!
//! - the JWKS document (RFC 7517) exposing the active public key
//! - an OpenID-style discovery document describing issuer and endpoints
//!
//! The JWK is recomputed on demand from the key store so its `kid` always
//! matches the one the signer embeds in token headers. The discovery
//! document is built once at startup and never changes.

use std::sync::Arc;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rsa::traits::PublicKeyParts;
use serde::{Deserialize, Serialize};

use super::claims::SCOPE;
use super::keys::RsaKeyStore;

/// Public-only JSON Web Key derived from the active RSA public key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Jwk {
    /// Key type, always "RSA".
    pub kty: String,

    /// Signing algorithm, always "RS256".
    pub alg: String,

    /// Key id, equal to the key store's current key id.
    pub kid: String,

    /// Public key use, always "sig".
    #[serde(rename = "use")]
    pub key_use: String,

    /// RSA modulus, base64url-encoded big-endian bytes.
    pub n: String,

    /// RSA public exponent, base64url-encoded big-endian bytes.
    pub e: String,
}

/// JWKS container, currently always exactly one key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwkSet {
    pub keys: Vec<Jwk>,
}

/// OpenID-style discovery document for this issuer.
///
/// Built once from configuration at startup; immutable for the process
/// lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenIdConfiguration {
    /// Issuer identifier, the base URL of this service.
    pub issuer: String,

    /// URL of the JWKS document.
    pub jwks_uri: String,

    /// Subject identifier types this issuer supports.
    pub subject_types_supported: Vec<String>,

    /// Response types this issuer supports.
    pub response_types_supported: Vec<String>,

    /// Claim names present in issued tokens.
    pub claims_supported: Vec<String>,

    /// URL of the token endpoint.
    pub token_endpoint: String,

    /// Scopes this issuer grants.
    pub scopes_supported: Vec<String>,

    /// Signing algorithms used for issued tokens.
    pub id_token_signing_alg_values_supported: Vec<String>,
}

/// Exposes the active public key and the discovery metadata.
///
/// A publisher can only be built from an initialized key store, so key
/// material is always present when a document is requested.
pub struct JwksPublisher {
    key_store: Arc<RsaKeyStore>,
    metadata: OpenIdConfiguration,
}

impl JwksPublisher {
    pub fn new(key_store: Arc<RsaKeyStore>, base_url: &str) -> Self {
        let metadata = OpenIdConfiguration {
            issuer: base_url.to_string(),
            jwks_uri: format!("{}/.well-known/jwks", base_url),
            subject_types_supported: vec!["public".to_string()],
            response_types_supported: vec![
                "id_token".to_string(),
                "client-credentials".to_string(),
            ],
            claims_supported: vec![
                "sub".to_string(),
                "iss".to_string(),
                "exp".to_string(),
                "iat".to_string(),
                "aud".to_string(),
                "azp".to_string(),
                "gty".to_string(),
            ],
            token_endpoint: format!("{}/jwt", base_url),
            scopes_supported: vec![SCOPE.to_string()],
            id_token_signing_alg_values_supported: vec!["RS256".to_string()],
        };

        Self {
            key_store,
            metadata,
        }
    }

    /// Derive the JWKS document from the current public key.
    ///
    /// The set holds exactly one key and its `kid` equals the key id the
    /// signer embeds in every token header.
    pub fn current_jwk_set(&self) -> JwkSet {
        let public_key = self.key_store.public_key();

        JwkSet {
            keys: vec![Jwk {
                kty: "RSA".to_string(),
                alg: "RS256".to_string(),
                kid: self.key_store.key_id().to_string(),
                key_use: "sig".to_string(),
                n: URL_SAFE_NO_PAD.encode(public_key.n().to_bytes_be()),
                e: URL_SAFE_NO_PAD.encode(public_key.e().to_bytes_be()),
            }],
        }
    }

    /// The discovery document built at startup.
    pub fn well_known(&self) -> &OpenIdConfiguration {
        &self.metadata
    }
}
