// Stratum Pool - Free and Open Source Software Statement
//
// This project, stratum-pool, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/config.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file defines the command-line arguments of both binaries, located at
// the root of the source tree. Arguments are validated and then converted
// into the plain config structs the pool server and worker consume.

use crate::core::{DEFAULT_TARGET, Target};
use crate::pool::PoolConfig;
use crate::worker::WorkerConfig;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Command-line arguments for the pool server
#[derive(Parser, Debug)]
#[command(
    name = "stratum-pool",
    version = "1.0.0",
    about = "Stratum-style mining pool coordination server",
    long_about = "Issues a rotating SHA-256 work unit to every connected worker over\n\
                  line-delimited JSON, validates submitted nonces against the pool target\n\
                  and keeps per-worker share counts.\n\n\
                  Examples:\n\
                    stratum-pool --listen 0.0.0.0:3333\n\
                    stratum-pool --target 00000fffffffffffffffffffffffffffffffffffffffffffffffffffffffffff --rotation-secs 30\n\
                    stratum-pool --stats-url http://localhost:5000 --stats-interval 10"
)]
pub struct PoolArgs {
    /// Address the pool listens on for worker connections
    #[arg(short, long, default_value = "0.0.0.0:3333", value_name = "HOST:PORT")]
    pub listen: String,

    /// Share target as up to 64 hex digits; a digest must be numerically below it
    #[arg(short, long, default_value = DEFAULT_TARGET, value_name = "HEX")]
    pub target: Target,

    /// Seconds between job rotations
    #[arg(long, default_value = "10", value_name = "SECONDS")]
    pub rotation_secs: u64,

    /// Base URL of the stats dashboard (e.g. http://localhost:5000)
    #[arg(long, value_name = "URL")]
    pub stats_url: Option<String>,

    /// Seconds between stats pushes and dashboard log summaries
    #[arg(long, default_value = "30", value_name = "SECONDS")]
    pub stats_interval: u64,

    /// log4rs YAML configuration; RUST_LOG-filtered console logging otherwise
    #[arg(long, value_name = "FILE")]
    pub log_config: Option<PathBuf>,
}

impl PoolArgs {
    pub fn validate(&self) -> Result<(), String> {
        validate_address("Listen address", &self.listen)?;
        if self.rotation_secs == 0 {
            return Err("Rotation interval must be greater than 0 seconds".to_string());
        }
        validate_stats(self.stats_url.as_deref(), self.stats_interval)
    }

    pub fn into_config(self) -> PoolConfig {
        PoolConfig {
            listen: self.listen,
            target: self.target,
            rotation_interval: Duration::from_secs(self.rotation_secs),
            stats_url: self.stats_url,
            stats_interval: Duration::from_secs(self.stats_interval),
        }
    }
}

/// Command-line arguments for the reference pool worker
#[derive(Parser, Debug)]
#[command(
    name = "pool-worker",
    version = "1.0.0",
    about = "Reference CPU worker for the stratum pool"
)]
pub struct WorkerArgs {
    /// Pool address in format hostname:port or ip:port
    #[arg(short = 'o', long, default_value = "127.0.0.1:3333", value_name = "HOST:PORT")]
    pub pool: String,

    /// Number of mining threads (0 = auto-detect)
    #[arg(short, long, default_value = "4", value_name = "COUNT")]
    pub threads: usize,

    /// Seconds to wait before reconnecting after the pool goes away
    #[arg(long, default_value = "5", value_name = "SECONDS")]
    pub reconnect_secs: u64,

    /// Base URL of the stats dashboard (e.g. http://localhost:5000)
    #[arg(long, value_name = "URL")]
    pub stats_url: Option<String>,

    /// Seconds between stats pushes and log summaries
    #[arg(long, default_value = "30", value_name = "SECONDS")]
    pub stats_interval: u64,

    /// log4rs YAML configuration
    #[arg(long, value_name = "FILE")]
    pub log_config: Option<PathBuf>,
}

impl WorkerArgs {
    pub fn validate(&self) -> Result<(), String> {
        validate_address("Pool address", &self.pool)?;
        if self.threads > 1024 {
            return Err("Thread count cannot exceed 1024".to_string());
        }
        if self.reconnect_secs == 0 {
            return Err("Reconnect delay must be greater than 0 seconds".to_string());
        }
        validate_stats(self.stats_url.as_deref(), self.stats_interval)
    }

    pub fn into_config(self) -> WorkerConfig {
        WorkerConfig {
            pool: self.pool,
            threads: self.threads,
            reconnect_interval: Duration::from_secs(self.reconnect_secs),
            stats_url: self.stats_url,
            stats_interval: Duration::from_secs(self.stats_interval),
        }
    }
}

fn validate_address(name: &str, address: &str) -> Result<(), String> {
    let Some((host, port)) = address.rsplit_once(':') else {
        return Err(format!("{} must be in format HOST:PORT", name));
    };
    if host.is_empty() {
        return Err(format!("{} is missing a host", name));
    }
    if port.parse::<u16>().is_err() {
        return Err(format!("{} port must be a valid number (0-65535)", name));
    }
    Ok(())
}

fn validate_stats(url: Option<&str>, interval: u64) -> Result<(), String> {
    if url.is_some_and(|u| u.trim().is_empty()) {
        return Err("Stats URL must not be empty".to_string());
    }
    if interval == 0 {
        return Err("Stats interval must be greater than 0 seconds".to_string());
    }
    Ok(())
}


// Changelog:
// - v1.0.0 (2026-10-17): Command-line configuration for both binaries.
//   - Moved out of core::types; clap derive structs with validate() and
//     into_config() producing PoolConfig and WorkerConfig.
