// Stratum Pool - Free and Open Source Software Statement
//
// This project, stratum-pool, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/lib.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file serves as the main library entry point for the stratum pool,
// located at the root of the source tree. It exports all public modules
// and types that the binaries and integration tests use.
//
// Tree Location:
// - src/lib.rs (root library file)
// - Exports modules: config, core, pool, stats, worker

pub mod config;
pub mod core;
pub mod logging;
pub mod pool;
pub mod stats;
pub mod worker;

// Re-export commonly used types at the crate root for convenience
pub use crate::config::{PoolArgs, WorkerArgs};
pub use crate::core::{Job, Nonce, ShareValidator, Target};
pub use crate::pool::{JobManager, PoolConfig, PoolError, PoolServer, WorkerRegistry};
pub use crate::stats::{HttpStatsSink, PoolStats, StatsSink, WorkerStats};
pub use crate::worker::{PoolWorker, WorkerConfig};

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

// Changelog:
// - v1.0.0 (2026-10-17): Library root for the stratum pool.
//   - Purpose: Organizes the project into core (target, hashing, validation),
//     pool (server side), worker (reference client), stats and config.
//   - Features: Re-exports the main types and defines a common Result type.
