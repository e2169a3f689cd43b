// Stratum Pool - Free and Open Source Software Statement
//
// This project, stratum-pool, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/worker/mod.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file is the module declaration for the reference pool worker, located
// in the worker subdirectory.
//
// Tree Location:
// - src/worker/mod.rs (worker module entry point)
// - Submodules: client, miner, thread

pub mod client;
pub mod miner;
pub mod thread;

// Re-export key types for convenience
pub use client::PoolClient;
pub use miner::{PoolWorker, StopHandle, WorkerConfig};
pub use thread::MiningJob;
