// Stratum Pool - Free and Open Source Software Statement
//
// This project, stratum-pool, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/core/sha256.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file implements the share digest used by pool and worker: a single
// SHA-256 over the job's work data followed by the nonce's string form.

use sha2::{Digest, Sha256};

/// Number of hex characters of the seed hash kept as job work data
pub const WORK_DATA_HEX_LEN: usize = 16;

/// SHA-256 of `work_data || nonce`
pub fn share_digest(work_data: &str, nonce: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(work_data.as_bytes());
    hasher.update(nonce.as_bytes());
    hasher.finalize().into()
}

/// Lowercase hex rendering of [`share_digest`], the form workers report
pub fn share_digest_hex(work_data: &str, nonce: &str) -> String {
    hex::encode(share_digest(work_data, nonce))
}

/// Derive job work data from a seed string (first 16 hex chars of its SHA-256)
pub fn work_data_from_seed(seed: &str) -> String {
    let digest = Sha256::digest(seed.as_bytes());
    let mut encoded = hex::encode(digest);
    encoded.truncate(WORK_DATA_HEX_LEN);
    encoded
}


// Changelog:
// - v1.0.0 (2026-10-17): Reworked from the SHA256d header hasher.
//   - Single SHA-256 over work data and nonce string replaces the 80-byte
//     Bitcoin header batch hashing.
//   - Added work data derivation for job rotation.
