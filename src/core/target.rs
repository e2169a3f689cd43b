// Stratum Pool - Free and Open Source Software Statement
//
// This project, stratum-pool, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/core/target.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file defines the share acceptance threshold for the pool, located in
// the core subdirectory. Targets are parsed from hex strings into 256-bit
// integers so that digests are compared numerically, never lexically.

use log::{debug, warn};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uint::construct_uint;

const LOG_TARGET: &str = "stratum_pool::core::target";

construct_uint! {
    pub struct U256(4);
}

/// Threshold used when no target is configured
pub const DEFAULT_TARGET: &str = "0000ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff";

/// Number of hex digits in a rendered target
pub const TARGET_HEX_LEN: usize = 64;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TargetError {
    #[error("Target hex is empty")]
    Empty,

    #[error("Target hex is too long ({len} digits, maximum 64)")]
    TooLong { len: usize },

    #[error("Target hex contains a non-hex character: {value}")]
    InvalidHex { value: String },

    #[error("Target must be greater than zero")]
    Zero,
}

/// Immutable acceptance threshold. A digest is accepted iff it is strictly
/// below the target when both are read as unsigned big-endian integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Target(U256);

impl Target {
    /// Parse a target from up to 64 hex digits. Shorter strings are read as
    /// numerals, so "ff" and "00ff" are the same target.
    pub fn from_hex(target_hex: &str) -> Result<Self, TargetError> {
        let trimmed = target_hex.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        if digits.is_empty() {
            return Err(TargetError::Empty);
        }
        if digits.len() > TARGET_HEX_LEN {
            warn!(target: LOG_TARGET, "Rejecting target with {} hex digits", digits.len());
            return Err(TargetError::TooLong { len: digits.len() });
        }
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(TargetError::InvalidHex {
                value: digits.to_string(),
            });
        }

        let value = U256::from_str_radix(digits, 16).map_err(|_| TargetError::InvalidHex {
            value: digits.to_string(),
        })?;
        if value.is_zero() {
            return Err(TargetError::Zero);
        }

        let target = Self(value);
        debug!(target: LOG_TARGET, "Parsed target: {}", target);
        Ok(target)
    }

    pub fn from_u256(value: U256) -> Result<Self, TargetError> {
        if value.is_zero() {
            return Err(TargetError::Zero);
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> U256 {
        self.0
    }

    /// Fixed-width lowercase rendering used on the wire
    pub fn to_hex(&self) -> String {
        // Limbs are stored least significant first.
        let U256(words) = self.0;
        format!("{:016x}{:016x}{:016x}{:016x}", words[3], words[2], words[1], words[0])
    }

    /// Numeric acceptance check for a digest value
    pub fn is_met_by(&self, digest: U256) -> bool {
        digest < self.0
    }

    /// Acceptance check for a raw 32-byte big-endian digest
    pub fn is_met_by_bytes(&self, digest: &[u8; 32]) -> bool {
        self.is_met_by(U256::from_big_endian(digest))
    }

    /// Expected number of hashes needed to find one digest below this target
    pub fn expected_hashes_per_share(&self) -> f64 {
        let quotient = U256::MAX / self.0;
        if quotient.bits() > 128 {
            u128::MAX as f64
        } else {
            quotient.as_u128() as f64
        }
    }
}

impl Default for Target {
    fn default() -> Self {
        // Same value as DEFAULT_TARGET: sixteen leading zero bits.
        Self(U256::MAX >> 16)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Target {
    type Err = TargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for Target {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Target {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::from_hex(&raw).map_err(serde::de::Error::custom)
    }
}


// Changelog:
// - v1.0.0 (2026-10-17): Replaced difficulty helpers with a pool target type.
//   - Purpose: Holds the acceptance threshold as a U256 and compares digests
//     numerically, fixing the fragile lexical hex comparison.
//   - Features: Hex parsing with typed errors, wire rendering, boundary-safe
//     acceptance checks, expected-work estimate for hashrate reporting.
