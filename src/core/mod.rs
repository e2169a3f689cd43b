// Stratum Pool - Free and Open Source Software Statement
//
// This project, stratum-pool, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/core/mod.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file is the module declaration for the core functionality of the pool,
// located in the core subdirectory. It declares submodules and re-exports
// key types for use throughout the project.

pub mod sha256;
pub mod target;
pub mod types;
pub mod validator;

// Re-export the most commonly used items
pub use sha256::{share_digest, share_digest_hex, work_data_from_seed};
pub use target::{DEFAULT_TARGET, Target, TargetError, U256};
pub use types::{Job, Nonce};
pub use validator::{ShareCheck, ShareValidator};

// Changelog:
// - v1.0.0 (2026-10-17): Core module for the pool.
//   - Declares sha256 (share digest), target, types and validator.
