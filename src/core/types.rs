// Stratum Pool - Free and Open Source Software Statement
//
// This project, stratum-pool, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/core/types.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file defines core data structures for the pool, located in the core
// subdirectory. It includes the job issued to workers, the nonce carried by
// share submissions, and the share found by the reference worker.
//
// Tree Location:
// - src/core/types.rs (core data structures)
// - Depends on: serde, serde_json, core::target

use crate::core::target::Target;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Unit of work issued to workers. Immutable once created; a rotation
/// replaces the active job but never mutates an issued one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    /// Unique job identifier (millisecond timestamp string)
    pub id: String,

    /// 16 hex characters hashed together with each nonce
    pub work_data: String,

    /// Acceptance threshold for shares on this job
    pub target: Target,
}

impl Job {
    pub fn new(id: impl Into<String>, work_data: impl Into<String>, target: Target) -> Self {
        Self {
            id: id.into(),
            work_data: work_data.into(),
            target,
        }
    }
}

/// A worker-chosen nonce in the string form that gets hashed.
///
/// Workers may send the nonce as a JSON integer or a JSON string; both are
/// hashed by their textual form (`42` and `"42"` are the same nonce). Integer
/// text is kept as written, including values beyond u64.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Nonce(String);

impl Nonce {
    /// Convert a JSON value from a submission into a nonce
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => Some(Self(n.to_string())),
            Value::String(s) if !s.is_empty() => Some(Self(s.clone())),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric value if the nonce is a plain unsigned integer
    pub fn as_u64(&self) -> Option<u64> {
        self.0.parse().ok()
    }
}

impl From<u64> for Nonce {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl From<&str> for Nonce {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for Nonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nonce_from_json_number_and_string() {
        assert_eq!(Nonce::from_json(&json!(42)).unwrap().as_str(), "42");
        assert_eq!(Nonce::from_json(&json!("42")).unwrap(), Nonce::from(42u64));
        assert_eq!(Nonce::from_json(&json!("deadbeef")).unwrap().as_str(), "deadbeef");
        assert_eq!(Nonce::from_json(&json!(18446744073709551615u64)).unwrap().as_u64(), Some(u64::MAX));
    }

    #[test]
    fn test_nonce_from_large_json_integer_keeps_text() {
        let value: Value = serde_json::from_str("18446744073709551616").unwrap();
        assert_eq!(Nonce::from_json(&value).unwrap().as_str(), "18446744073709551616");
    }

    #[test]
    fn test_nonce_rejects_other_shapes() {
        assert!(Nonce::from_json(&json!(null)).is_none());
        assert!(Nonce::from_json(&json!("")).is_none());
        assert!(Nonce::from_json(&json!([1])).is_none());
        assert!(Nonce::from_json(&json!({"n": 1})).is_none());
    }
}

// Changelog:
// - v1.0.0 (2026-10-17): Pool data model.
//   - Replaced PoolJob/MiningJob with the immutable Job issued by the pool.
//   - Added Nonce for the textual nonce form used in share digests.
//   - Integer nonces keep their literal text (serde_json arbitrary_precision).
