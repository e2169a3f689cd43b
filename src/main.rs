// Stratum Pool - Free and Open Source Software Statement
//
// File: src/main.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// Pool server binary: parse arguments, install logging, bind and serve.

use anyhow::{Context, anyhow};
use clap::Parser;
use log::{error, info};
use std::error::Error as _;
use stratum_pool::{PoolArgs, PoolServer, logging::init_logging};

const LOG_TARGET: &str = "stratum_pool::main";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = PoolArgs::parse();

    if let Err(err) = args.validate() {
        eprintln!("❌ Error: {}", err);
        std::process::exit(1);
    }

    init_logging(args.log_config.as_deref())
        .map_err(|e| anyhow!(e))
        .context("Failed to initialize logging")?;

    let config = args.into_config();
    let server = match PoolServer::bind(config).await {
        Ok(server) => server,
        Err(e) => {
            match e.source() {
                Some(cause) => error!(target: LOG_TARGET, "❌ {}: {}", e, cause),
                None => error!(target: LOG_TARGET, "❌ {}", e),
            }
            std::process::exit(1);
        }
    };

    info!(target: LOG_TARGET, "⛏️ Stratum pool v{}", env!("CARGO_PKG_VERSION"));
    server.run().await.context("Pool server stopped")?;
    Ok(())
}
