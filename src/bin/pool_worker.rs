// Stratum Pool - Free and Open Source Software Statement
//
// File: src/bin/pool_worker.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// Reference worker binary: connects to the pool and mines until Ctrl-C.

use anyhow::{Context, anyhow};
use clap::Parser;
use log::info;
use std::sync::Arc;
use stratum_pool::{PoolWorker, WorkerArgs, logging::init_logging};

const LOG_TARGET: &str = "stratum_pool::pool_worker";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = WorkerArgs::parse();

    if let Err(err) = args.validate() {
        eprintln!("❌ Error: {}", err);
        std::process::exit(1);
    }

    init_logging(args.log_config.as_deref())
        .map_err(|e| anyhow!(e))
        .context("Failed to initialize logging")?;

    let worker = Arc::new(PoolWorker::new(args.into_config()));
    let stop = worker.stop_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!(target: LOG_TARGET, "🛑 Ctrl-C received, stopping worker");
            stop.stop();
        }
    });

    worker.run().await.map_err(|e| anyhow!(e)).context("Worker failed")?;
    Ok(())
}
