// Copyright (c) 2025 Panda Auth Contributors
// This file is part of the panda-auth project and is licensed under the
// MIT License (see LICENSE.md for details).

//! HTTP-level tests for the token and discovery endpoints.

use jsonwebtoken::decode_header;
use panda_auth::config::Config;
use panda_auth::server::{build_rocket, PRINCIPAL_HEADER};
use rocket::http::{Header, Status};
use rocket::local::blocking::Client;
use rsa::pkcs8::{EncodePrivateKey, EncodePublicKey, LineEnding};
use serde_json::Value;
use std::io::Write;

const BASE_URL: &str = "https://auth.example.com";

/// Build a client over a fresh keypair written to a temp directory.
///
/// The directory must stay alive for the duration of the test; key files
/// are only read at startup but the tempdir drop would still race rocket
/// initialization in `Client::tracked`.
fn test_client() -> (Client, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let private_path = dir.path().join("private.key");
    let public_path = dir.path().join("pub.key");

    let mut rng = rand::rngs::OsRng;
    let private_key = rsa::RsaPrivateKey::new(&mut rng, 2048).unwrap();
    let public_key = rsa::RsaPublicKey::from(&private_key);

    std::fs::File::create(&private_path)
        .unwrap()
        .write_all(private_key.to_pkcs8_pem(LineEnding::LF).unwrap().as_bytes())
        .unwrap();
    std::fs::File::create(&public_path)
        .unwrap()
        .write_all(
            public_key
                .to_public_key_pem(LineEnding::LF)
                .unwrap()
                .as_bytes(),
        )
        .unwrap();

    let mut config = Config::default();
    config.jwt.private_key_file = private_path;
    config.jwt.public_key_file = public_path;
    config.jwt.base_url = BASE_URL.to_string();

    let figment = rocket::Config::figment()
        .merge(("port", 0))
        .merge(("address", "127.0.0.1"))
        .merge(("log_level", rocket::config::LogLevel::Off));

    let client = Client::tracked(build_rocket(figment, config).unwrap()).expect("valid rocket");
    (client, dir)
}

#[test]
fn jwt_requires_authenticated_principal() {
    let (client, _dir) = test_client();

    let response = client.get("/jwt").dispatch();
    assert_eq!(response.status(), Status::Unauthorized);
}

#[test]
fn blank_principal_header_is_rejected() {
    let (client, _dir) = test_client();

    let response = client
        .get("/jwt")
        .header(Header::new(PRINCIPAL_HEADER, "   "))
        .dispatch();
    assert_eq!(response.status(), Status::Unauthorized);
}

#[test]
fn jwt_returns_compact_token_by_default() {
    let (client, _dir) = test_client();

    let response = client
        .get("/jwt")
        .header(Header::new(PRINCIPAL_HEADER, "alice"))
        .dispatch();
    assert_eq!(response.status(), Status::Ok);

    let token = response.into_string().unwrap();
    assert_eq!(token.split('.').count(), 3);

    let header = decode_header(&token).unwrap();
    assert_eq!(header.alg, jsonwebtoken::Algorithm::RS256);
    assert!(header.kid.is_some());
}

#[test]
fn jwt_decode_param_returns_headers_and_claims() {
    let (client, _dir) = test_client();

    let response = client
        .get("/jwt?decode=true")
        .header(Header::new(PRINCIPAL_HEADER, "alice"))
        .dispatch();
    assert_eq!(response.status(), Status::Ok);

    let body: Value = response.into_json().unwrap();
    assert_eq!(body["headers"]["alg"], "RS256");
    assert_eq!(body["headers"]["typ"], "JWT");
    assert!(body["headers"]["kid"].is_string());

    assert_eq!(body["claims"]["iss"], BASE_URL);
    assert_eq!(body["claims"]["sub"], "alice");
    assert_eq!(body["claims"]["aud"][0], "pandaproxy");
    assert_eq!(body["claims"]["scope"], "openid");
    assert_eq!(body["claims"]["azp"], "pandaproxy");
    assert_eq!(body["claims"]["gty"], "client-credentials");
}

#[test]
fn jwt_decode_false_still_returns_compact_form() {
    let (client, _dir) = test_client();

    let response = client
        .get("/jwt?decode=false")
        .header(Header::new(PRINCIPAL_HEADER, "alice"))
        .dispatch();
    assert_eq!(response.status(), Status::Ok);
    assert_eq!(response.into_string().unwrap().split('.').count(), 3);
}

#[test]
fn jwks_kid_matches_issued_token_kid() {
    let (client, _dir) = test_client();

    let token = client
        .get("/jwt")
        .header(Header::new(PRINCIPAL_HEADER, "alice"))
        .dispatch()
        .into_string()
        .unwrap();
    let token_kid = decode_header(&token).unwrap().kid.unwrap();

    let response = client.get("/.well-known/jwks").dispatch();
    assert_eq!(response.status(), Status::Ok);

    let body: Value = response.into_json().unwrap();
    let keys = body["keys"].as_array().unwrap();
    assert_eq!(keys.len(), 1);
    assert_eq!(keys[0]["kid"], token_kid.as_str());
    assert_eq!(keys[0]["kty"], "RSA");
    assert_eq!(keys[0]["alg"], "RS256");
    assert_eq!(keys[0]["use"], "sig");
    assert_eq!(keys[0]["e"], "AQAB");
    assert!(keys[0]["n"].is_string());
}

#[test]
fn well_known_openid_configuration_document() {
    let (client, _dir) = test_client();

    let response = client.get("/.well-known/openid-configuration").dispatch();
    assert_eq!(response.status(), Status::Ok);

    let body: Value = response.into_json().unwrap();
    assert_eq!(body["issuer"], BASE_URL);
    assert_eq!(
        body["jwks_uri"],
        format!("{}/.well-known/jwks", BASE_URL)
    );
    assert_eq!(body["token_endpoint"], format!("{}/jwt", BASE_URL));
    assert_eq!(body["subject_types_supported"][0], "public");
    assert_eq!(body["scopes_supported"][0], "openid");
    assert_eq!(body["id_token_signing_alg_values_supported"][0], "RS256");
    assert!(body["claims_supported"]
        .as_array()
        .unwrap()
        .iter()
        .any(|c| c == "sub"));
}

#[test]
fn cors_headers_are_attached() {
    let (client, _dir) = test_client();

    let response = client.get("/.well-known/jwks").dispatch();
    assert_eq!(
        response.headers().get_one("Access-Control-Allow-Origin"),
        Some("*")
    );
}
