// Stratum Pool - Free and Open Source Software Statement
//
// This project, stratum-pool, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/core/validator.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file implements share validation for the pool, located in the core
// subdirectory. Validation is pure: it hashes the worker's assigned work data
// with the submitted nonce and compares the digest to the target numerically.
//
// Tree Location:
// - src/core/validator.rs (share acceptance)
// - Depends on: core::sha256, core::target

use crate::core::sha256::share_digest;
use crate::core::target::{Target, U256};
use crate::core::types::Nonce;

/// Outcome of validating one share, kept for logging
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareCheck {
    pub accepted: bool,
    pub digest_hex: String,
}

/// Stateless share validator; safe to call from any task without locking
pub struct ShareValidator;

impl ShareValidator {
    /// Accept iff SHA-256(work_data || nonce) < target
    pub fn validate(work_data: &str, nonce: &Nonce, target: &Target) -> bool {
        let digest = share_digest(work_data, nonce.as_str());
        target.is_met_by_bytes(&digest)
    }

    /// Same decision as [`ShareValidator::validate`], also returning the digest
    pub fn check(work_data: &str, nonce: &Nonce, target: &Target) -> ShareCheck {
        let digest = share_digest(work_data, nonce.as_str());
        ShareCheck {
            accepted: target.is_met_by(U256::from_big_endian(&digest)),
            digest_hex: hex::encode(digest),
        }
    }
}


// Changelog:
// - v1.0.0 (2026-10-17): Initial share validator.
//   - Purpose: Decides share acceptance against the job snapshot a worker
//     received at registration.
//   - Features: Pure validate/check functions over U256 comparisons.
