// Stratum Pool - Free and Open Source Software Statement
//
// This project, stratum-pool, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/pool/messages.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file parses inbound line-delimited JSON messages for both ends of the
// mining protocol, located in the pool subdirectory. The pool parses worker
// submissions; the reference worker parses the pool's job notifications.
//
// Tree Location:
// - src/pool/messages.rs (protocol message parsing)
// - Depends on: serde_json, core::types, core::target

use crate::core::{Nonce, Target, TargetError};
use log::debug;
use serde_json::Value;
use thiserror::Error;

const LOG_TARGET: &str = "stratum_pool::pool::messages";

pub const METHOD_NOTIFY: &str = "mining.notify";
pub const METHOD_SUBMIT: &str = "submit";
pub const METHOD_PROGRESS: &str = "progress";

#[derive(Error, Debug)]
pub enum MessageError {
    #[error("Message is not valid JSON")]
    InvalidJson {
        #[from]
        source: serde_json::Error,
    },

    #[error("Message is not a JSON object")]
    NotAnObject,

    #[error("'{method}' message has missing or short params")]
    MissingParams { method: String },

    #[error("'{method}' message carries an invalid nonce: {value}")]
    InvalidNonce { method: String, value: String },

    #[error("Notification field '{field}' is invalid")]
    InvalidField { field: &'static str },

    #[error("Notification carries an invalid target")]
    InvalidTarget {
        #[from]
        source: TargetError,
    },
}

/// Messages a worker sends to the pool
#[derive(Debug, Clone, PartialEq)]
pub enum WorkerMessage {
    /// Candidate share: `{"method": "submit", "params": [nonce, reported_hash]}`
    Submit { nonce: Nonce, reported_hash: String },

    /// Search progress: `{"method": "progress", "params": [nonce, thread_id]}`
    Progress { nonce: Nonce, thread_id: Option<u64> },

    /// Any other (or absent) method; ignored by the pool
    Other { method: Option<String> },
}

/// Job notification received by a worker
#[derive(Debug, Clone, PartialEq)]
pub struct JobNotification {
    pub job_id: String,
    pub work_data: String,
    pub target: Target,
    /// Optional `[start, end)` nonce range carried in params[3..5]
    pub nonce_range: Option<(u64, u64)>,
}

/// Messages the pool sends to a worker
#[derive(Debug, Clone, PartialEq)]
pub enum PoolMessage {
    Notify(JobNotification),
    Other { method: Option<String> },
}

fn method_of(message: &Value) -> Option<String> {
    message.get("method").and_then(|m| m.as_str()).map(str::to_string)
}

/// Parse one line received from a worker
pub fn parse_worker_message(line: &str) -> Result<WorkerMessage, MessageError> {
    let message: Value = serde_json::from_str(line)?;
    if !message.is_object() {
        return Err(MessageError::NotAnObject);
    }

    let method = method_of(&message);
    let params = message.get("params").and_then(|p| p.as_array());

    match method.as_deref() {
        Some(METHOD_SUBMIT) => {
            let params = params
                .filter(|p| p.len() >= 2)
                .ok_or_else(|| MessageError::MissingParams {
                    method: METHOD_SUBMIT.to_string(),
                })?;
            let nonce = Nonce::from_json(&params[0]).ok_or_else(|| MessageError::InvalidNonce {
                method: METHOD_SUBMIT.to_string(),
                value: params[0].to_string(),
            })?;
            let reported_hash = match &params[1] {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            Ok(WorkerMessage::Submit { nonce, reported_hash })
        }
        Some(METHOD_PROGRESS) => {
            let params = params
                .filter(|p| !p.is_empty())
                .ok_or_else(|| MessageError::MissingParams {
                    method: METHOD_PROGRESS.to_string(),
                })?;
            let nonce = Nonce::from_json(&params[0]).ok_or_else(|| MessageError::InvalidNonce {
                method: METHOD_PROGRESS.to_string(),
                value: params[0].to_string(),
            })?;
            let thread_id = params.get(1).and_then(|t| t.as_u64());
            Ok(WorkerMessage::Progress { nonce, thread_id })
        }
        _ => {
            debug!(target: LOG_TARGET, "Unhandled worker method: {:?}", method);
            Ok(WorkerMessage::Other { method })
        }
    }
}

/// Parse one line received from the pool
pub fn parse_pool_message(line: &str) -> Result<PoolMessage, MessageError> {
    let message: Value = serde_json::from_str(line)?;
    if !message.is_object() {
        return Err(MessageError::NotAnObject);
    }

    let method = method_of(&message);
    if method.as_deref() != Some(METHOD_NOTIFY) {
        return Ok(PoolMessage::Other { method });
    }

    let params = message
        .get("params")
        .and_then(|p| p.as_array())
        .filter(|p| p.len() >= 3)
        .ok_or_else(|| MessageError::MissingParams {
            method: METHOD_NOTIFY.to_string(),
        })?;

    let job_id = match (&params[0], message.get("id")) {
        (Value::String(id), _) => id.clone(),
        (Value::Number(id), _) => id.to_string(),
        (_, Some(Value::String(id))) => id.clone(),
        (_, Some(Value::Number(id))) => id.to_string(),
        _ => return Err(MessageError::InvalidField { field: "job_id" }),
    };
    let work_data = params[1]
        .as_str()
        .filter(|d| !d.is_empty())
        .ok_or(MessageError::InvalidField { field: "work_data" })?
        .to_string();
    let target = params[2]
        .as_str()
        .ok_or(MessageError::InvalidField { field: "target" })
        .and_then(|t| Target::from_hex(t).map_err(MessageError::from))?;

    let nonce_range = if params.len() >= 5 {
        let start = params[3]
            .as_u64()
            .ok_or(MessageError::InvalidField { field: "nonce_start" })?;
        let end = params[4]
            .as_u64()
            .ok_or(MessageError::InvalidField { field: "nonce_end" })?;
        Some((start, end))
    } else {
        None
    };

    Ok(PoolMessage::Notify(JobNotification {
        job_id,
        work_data,
        target,
        nonce_range,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DEFAULT_TARGET;
    use crate::core::ShareValidator;
    use crate::core::sha256::share_digest_hex;

    #[test]
    fn test_parse_submit_with_numeric_nonce() {
        let msg = parse_worker_message(r#"{"method":"submit","params":[123,"00ab"],"thread_id":1}"#).unwrap();
        assert_eq!(
            msg,
            WorkerMessage::Submit {
                nonce: Nonce::from(123u64),
                reported_hash: "00ab".to_string()
            }
        );
    }

    #[test]
    fn test_parse_submit_keeps_integer_text_beyond_u64() {
        let msg = parse_worker_message(r#"{"method":"submit","params":[18446744073709551616,"x"]}"#).unwrap();
        let WorkerMessage::Submit { nonce, .. } = msg else {
            panic!("expected submit, got {:?}", msg);
        };
        assert_eq!(nonce.as_str(), "18446744073709551616");
        assert_eq!(nonce.as_u64(), None);
        assert_eq!(
            ShareValidator::check("a1b2c3d4e5f60718", &nonce, &Target::default()).digest_hex,
            share_digest_hex("a1b2c3d4e5f60718", "18446744073709551616")
        );
    }

    #[test]
    fn test_parse_submit_with_string_nonce() {
        let msg = parse_worker_message(r#"{"method":"submit","params":["77","ff"]}"#).unwrap();
        assert!(matches!(msg, WorkerMessage::Submit { ref nonce, .. } if nonce.as_str() == "77"));
    }

    #[test]
    fn test_parse_submit_malformed() {
        assert!(matches!(parse_worker_message("not json"), Err(MessageError::InvalidJson { .. })));
        assert!(matches!(parse_worker_message("[1,2]"), Err(MessageError::NotAnObject)));
        assert!(matches!(
            parse_worker_message(r#"{"method":"submit","params":[1]}"#),
            Err(MessageError::MissingParams { .. })
        ));
        assert!(matches!(
            parse_worker_message(r#"{"method":"submit"}"#),
            Err(MessageError::MissingParams { .. })
        ));
        assert!(matches!(
            parse_worker_message(r#"{"method":"submit","params":[null,"ff"]}"#),
            Err(MessageError::InvalidNonce { .. })
        ));
    }

    #[test]
    fn test_parse_progress_and_other() {
        let msg = parse_worker_message(r#"{"method":"progress","params":[1000000,3]}"#).unwrap();
        assert_eq!(
            msg,
            WorkerMessage::Progress {
                nonce: Nonce::from(1_000_000u64),
                thread_id: Some(3)
            }
        );
        let other = parse_worker_message(r#"{"method":"mining.subscribe","params":[]}"#).unwrap();
        assert_eq!(other, WorkerMessage::Other { method: Some("mining.subscribe".to_string()) });
        let none = parse_worker_message(r#"{"params":[1,2]}"#).unwrap();
        assert_eq!(none, WorkerMessage::Other { method: None });
    }

    #[test]
    fn test_parse_notify() {
        let line = format!(
            r#"{{"id":"1700000000000","method":"mining.notify","params":["1700000000000","0123456789abcdef","{}"]}}"#,
            DEFAULT_TARGET
        );
        match parse_pool_message(&line).unwrap() {
            PoolMessage::Notify(job) => {
                assert_eq!(job.job_id, "1700000000000");
                assert_eq!(job.work_data, "0123456789abcdef");
                assert_eq!(job.target.to_hex(), DEFAULT_TARGET);
                assert_eq!(job.nonce_range, None);
            }
            other => panic!("Expected notify, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_notify_with_range() {
        let line = r#"{"id":5,"method":"mining.notify","params":[5,"aa","ffff",100,200]}"#;
        match parse_pool_message(line).unwrap() {
            PoolMessage::Notify(job) => {
                assert_eq!(job.job_id, "5");
                assert_eq!(job.nonce_range, Some((100, 200)));
            }
            other => panic!("Expected notify, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_notify_invalid() {
        assert!(matches!(
            parse_pool_message(r#"{"method":"mining.notify","params":["1","aa"]}"#),
            Err(MessageError::MissingParams { .. })
        ));
        assert!(matches!(
            parse_pool_message(r#"{"method":"mining.notify","params":["1","aa","xyz"]}"#),
            Err(MessageError::InvalidTarget { .. })
        ));
        assert!(matches!(
            parse_pool_message(r#"{"method":"mining.set_difficulty","params":[1]}"#),
            Ok(PoolMessage::Other { .. })
        ));
    }
}

// Changelog:
// - v1.0.0 (2026-10-17): Rewritten for the pool wire protocol.
//   - Purpose: Parses worker submit/progress lines and pool notify lines.
//   - Features: Typed MessageError for malformed input, nonce normalization,
//     optional nonce range on notify.
