// Copyright (c) 2025 Panda Auth Contributors
// This file is part of the panda-auth project and is licensed under the
// MIT License (see LICENSE.md for details).

// Main entry point for the token issuance service

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use panda_auth::config::Config;
use panda_auth::server::build_rocket;

/// JWT issuance and JWKS discovery service for Redpanda proxy clients
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the YAML configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Listen address override
    #[arg(short, long)]
    address: Option<String>,

    /// Listen port override
    #[arg(short, long)]
    port: Option<u16>,
}

#[rocket::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = Config::from_file(&args.config)?;
    config.apply_args(args.address, args.port);

    let figment = rocket::Config::figment()
        .merge(("ident", format!("PandaAuth/{}", env!("CARGO_PKG_VERSION"))))
        .merge(("address", config.server.address.clone()))
        .merge(("port", config.server.port));

    build_rocket(figment, config)?.launch().await?;

    Ok(())
}
