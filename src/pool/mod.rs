// Stratum Pool - Free and Open Source Software Statement
//
// This project, stratum-pool, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/pool/mod.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file is the module declaration for the pool server, located in the
// pool subdirectory. It declares submodules and re-exports key types for use
// throughout the project.
//
// Tree Location:
// - src/pool/mod.rs (pool module entry point)
// - Submodules: codec, error, handler, job_manager, messages, protocol, registry, server

pub mod codec;
pub mod error;
pub mod handler;
pub mod job_manager;
pub mod messages;
pub mod protocol;
pub mod registry;
pub mod server;

// Re-export key types for convenience
pub use codec::{MAX_LINE_LENGTH, WorkerFrame, WorkerLineCodec};
pub use error::PoolError;
pub use handler::ConnectionHandler;
pub use job_manager::JobManager;
pub use messages::{JobNotification, MessageError, PoolMessage, WorkerMessage};
pub use protocol::StratumProtocol;
pub use registry::{WorkerRegistry, WorkerSession};
pub use server::{PoolConfig, PoolServer};

// Changelog:
// - v1.0.0 (2026-10-17): Pool module for the stratum pool server.
//   - Purpose: Organizes the job source, worker registry, wire protocol,
//     per-connection handler and accept loop into submodules.
//   - The former pool client moved to the worker module.
