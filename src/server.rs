// Copyright (c) 2025 Panda Auth Contributors
// This file is part of the panda-auth project and is licensed under the
// MIT License (see LICENSE.md for details).

//! HTTP server and composition root
//!
//! This module wires the signing core together and exposes it over HTTP:
//!
//! - `GET /jwt?decode=<bool>` issues a token for the authenticated principal
//! - `GET /.well-known/openid-configuration` serves the discovery document
//! - `GET /.well-known/jwks` serves the public key set
//!
//! Authentication itself happens upstream: a fronting session layer asserts
//! the principal through the `X-Forwarded-User` header, and the
//! [`AuthenticatedPrincipal`] guard is the only thing this service reads
//! from it. Requests without that header never reach a handler.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use log::{debug, error, info};
use rocket::fairing::{Fairing, Info, Kind};
use rocket::figment::Figment;
use rocket::http::{Header, Status};
use rocket::request::{FromRequest, Outcome};
use rocket::serde::json::{json, Json, Value};
use rocket::{get, options, routes, Build, Request, Responder, Response, Rocket, State};

use crate::auth::jwks::{JwkSet, JwksPublisher, OpenIdConfiguration};
use crate::auth::keys::RsaKeyStore;
use crate::auth::signer::{IssuanceError, TokenSigner};
use crate::config::Config;

/// Header a fronting session layer uses to assert the authenticated
/// principal.
pub const PRINCIPAL_HEADER: &str = "X-Forwarded-User";

pub struct CORS;

#[rocket::async_trait]
impl Fairing for CORS {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "POST, GET, PUT, DELETE, OPTIONS",
        ));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
        response.set_header(Header::new("Access-Control-Allow-Credentials", "true"));
    }
}

/// Answers to OPTIONS requests
#[options("/<_path..>")]
async fn options(_path: PathBuf) -> Result<(), std::io::Error> {
    Ok(())
}

/// Request guard carrying the principal asserted by the session layer.
///
/// Extraction fails with 401 when the header is absent or blank; the
/// issuance handler only ever sees a non-empty principal name.
pub struct AuthenticatedPrincipal(String);

impl AuthenticatedPrincipal {
    pub fn name(&self) -> &str {
        &self.0
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AuthenticatedPrincipal {
    type Error = ();

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        match req.headers().get_one(PRINCIPAL_HEADER) {
            Some(name) if !name.trim().is_empty() => {
                Outcome::Success(AuthenticatedPrincipal(name.trim().to_string()))
            }
            _ => Outcome::Error((Status::Unauthorized, ())),
        }
    }
}

/// Response of the token endpoint.
#[derive(Responder)]
enum JwtResponse {
    /// Compact serialized token, the default output.
    Compact(String),
    /// Decoded header and claim maps, the `decode=true` debug output.
    Decoded(Json<Value>),
}

/// Issue an access token for the authenticated principal.
///
/// Returns the compact token string by default; with `decode=true` the
/// decoded header and claims are returned as JSON instead.
#[get("/jwt?<decode>")]
fn jwt_token(
    principal: AuthenticatedPrincipal,
    decode: Option<bool>,
    signer: &State<TokenSigner>,
    config: &State<Config>,
) -> Result<JwtResponse, Status> {
    debug!("Issuing access token for principal {}", principal.name());

    let token = signer
        .issue_access_token(principal.name(), &config.jwt.base_url)
        .map_err(|e| match e {
            IssuanceError::Unauthorized => Status::Unauthorized,
            IssuanceError::Signing(err) => {
                error!("Token signing failed: {}", err);
                Status::InternalServerError
            }
        })?;

    if decode.unwrap_or(false) {
        Ok(JwtResponse::Decoded(Json(json!({
            "headers": token.headers(),
            "claims": token.claims(),
        }))))
    } else {
        Ok(JwtResponse::Compact(token.into_string()))
    }
}

/// OpenID discovery document.
#[get("/.well-known/openid-configuration")]
fn well_known(publisher: &State<JwksPublisher>) -> Json<OpenIdConfiguration> {
    Json(publisher.well_known().clone())
}

/// JSON Web Key Set with the active public key.
#[get("/.well-known/jwks")]
fn jwks(publisher: &State<JwksPublisher>) -> Json<JwkSet> {
    Json(publisher.current_jwk_set())
}

/// Build the rocket instance: load key material, construct the signing
/// core, and mount the routes.
///
/// Key loading failures are returned as errors so the process refuses to
/// start on missing or malformed key files.
pub fn build_rocket(figment: Figment, config: Config) -> Result<Rocket<Build>> {
    let key_store = Arc::new(
        RsaKeyStore::from_pem_files(&config.jwt.private_key_file, &config.jwt.public_key_file)
            .context("Failed to load RSA key material")?,
    );
    info!("RSA key material loaded, key id {}", key_store.key_id());

    let signer = TokenSigner::new(Arc::clone(&key_store));
    let publisher = JwksPublisher::new(Arc::clone(&key_store), &config.jwt.base_url);

    Ok(rocket::custom(figment)
        .attach(CORS)
        .mount("/", routes![jwt_token, well_known, jwks, options])
        .manage(config)
        .manage(signer)
        .manage(publisher))
}
