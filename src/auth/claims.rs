// Copyright (c) 2025 Panda Auth Contributors
// This file is part of the panda-auth project and is licensed under the
// MIT License (see LICENSE.md for details).

//! JWT claim structure for access tokens
//!
//! Every token this service issues carries the same claim shape: standard
//! RFC 7519 registered claims plus the OAuth 2.0 extension claims the
//! downstream proxy expects. Only the subject and the timestamps vary
//! between tokens; everything else is fixed at the constants below.

use serde::{Deserialize, Serialize};

/// Client id of the downstream proxy, used for both `aud` and `azp`.
pub const CLIENT_ID: &str = "pandaproxy";

/// Scope granted by every issued token.
pub const SCOPE: &str = "openid";

/// Grant type advertised in the `gty` claim.
pub const GRANT_TYPE: &str = "client-credentials";

/// Token validity in seconds: 24 hours from issuance, not configurable.
pub const TOKEN_VALIDITY_SECS: i64 = 86_400;

/// Claims of an issued access token.
///
/// The structure is serialized to JSON when signing and deserialized when
/// validating. Instances are immutable once built; one is created per
/// signing call and never shared across requests.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AccessTokenClaims {
    /// Issuer, the base URL of this service.
    pub iss: String,

    /// Subject, the authenticated principal the token was issued for.
    pub sub: String,

    /// Audience, always the downstream proxy client id.
    pub aud: Vec<String>,

    /// Issued at, seconds since the Unix epoch.
    pub iat: i64,

    /// Expiration, seconds since the Unix epoch. Always `iat` plus
    /// [`TOKEN_VALIDITY_SECS`].
    pub exp: i64,

    /// Scope granted to the token.
    pub scope: String,

    /// Authorized party, the client the token was issued to.
    pub azp: String,

    /// Grant type the token was issued under.
    pub gty: String,
}

impl AccessTokenClaims {
    /// Build the claim set for one token.
    pub fn new(principal: &str, issuer: &str, issued_at: i64) -> Self {
        Self {
            iss: issuer.to_string(),
            sub: principal.to_string(),
            aud: vec![CLIENT_ID.to_string()],
            iat: issued_at,
            exp: issued_at + TOKEN_VALIDITY_SECS,
            scope: SCOPE.to_string(),
            azp: CLIENT_ID.to_string(),
            gty: GRANT_TYPE.to_string(),
        }
    }
}
