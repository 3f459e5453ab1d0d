// Copyright (c) 2025 Panda Auth Contributors
// This file is part of the panda-auth project and is licensed under the
// MIT License (see LICENSE.md for details).

//! Token issuance, validation, and key discovery.
//!
//! The modules here form the signing core of the service. `keys` owns the
//! process-lifetime RSA keypair and its key id; `signer` builds and signs
//! access tokens for authenticated principals; `validator` checks inbound
//! tokens against the same key material; `jwks` derives the public-key
//! discovery documents third parties use to verify tokens offline.

/// Claim shape and issuance constants for access tokens
pub mod claims;

/// JWKS and OpenID discovery document derivation
pub mod jwks;

/// RSA key material loading and ownership
pub mod keys;

/// Access token construction and signing
pub mod signer;

/// Token validation against the current key material
pub mod validator;
