// Stratum Pool - Free and Open Source Software Statement
//
// This project, stratum-pool, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/pool/protocol.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file builds outbound line-delimited JSON messages for the mining
// protocol, located in the pool subdirectory. The pool sends mining.notify;
// the reference worker sends submit and progress.
//
// Tree Location:
// - src/pool/protocol.rs (protocol message construction)
// - Depends on: serde_json, core::types

use crate::core::Job;
use crate::pool::messages::{METHOD_NOTIFY, METHOD_PROGRESS, METHOD_SUBMIT};
use log::{debug, error};
use serde_json::{Value, json};

const LOG_TARGET: &str = "stratum_pool::pool::protocol";

/// Constructs messages for the mining protocol
pub struct StratumProtocol;

impl StratumProtocol {
    /// Job notification sent to a worker right after it connects
    pub fn create_notify(job: &Job) -> Value {
        json!({
            "id": job.id,
            "method": METHOD_NOTIFY,
            "params": [job.id, job.work_data, job.target.to_hex()]
        })
    }

    /// Share submission sent by a worker
    pub fn create_submit_request(nonce: u64, hash: &str, thread_id: usize) -> Value {
        if hash.is_empty() {
            error!(target: LOG_TARGET, "Invalid share submission: empty hash for nonce {}", nonce);
            return Value::Null;
        }
        json!({
            "method": METHOD_SUBMIT,
            "params": [nonce, hash],
            "thread_id": thread_id
        })
    }

    /// Search progress report sent by a worker
    pub fn create_progress(nonce: u64, thread_id: usize) -> Value {
        json!({
            "method": METHOD_PROGRESS,
            "params": [nonce, thread_id]
        })
    }

    /// Convert a JSON message to a string with newline
    pub fn to_message(json: Value) -> String {
        if json.is_null() {
            error!(target: LOG_TARGET, "Attempted to serialize empty JSON message");
            return String::new();
        }
        debug!(target: LOG_TARGET, "Serialized message: {}", json);
        format!("{}\n", json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Target;
    use crate::pool::messages::{PoolMessage, WorkerMessage, parse_pool_message, parse_worker_message};

    #[test]
    fn test_notify_shape() {
        let job = Job::new("1700000000123", "0123456789abcdef", Target::default());
        let notify = StratumProtocol::create_notify(&job);
        assert_eq!(notify["id"], "1700000000123");
        assert_eq!(notify["method"], "mining.notify");
        assert_eq!(notify["params"][0], "1700000000123");
        assert_eq!(notify["params"][1], "0123456789abcdef");
        assert_eq!(notify["params"][2].as_str().unwrap().len(), 64);
    }

    #[test]
    fn test_notify_is_understood_by_worker_parser() {
        let job = Job::new("42", "00112233445566aa", Target::default());
        let line = StratumProtocol::to_message(StratumProtocol::create_notify(&job));
        assert!(line.ends_with('\n'));
        match parse_pool_message(line.trim_end()).unwrap() {
            PoolMessage::Notify(n) => {
                assert_eq!(n.job_id, job.id);
                assert_eq!(n.work_data, job.work_data);
                assert_eq!(n.target, job.target);
            }
            other => panic!("Expected notify, got {:?}", other),
        }
    }

    #[test]
    fn test_submit_is_understood_by_pool_parser() {
        let line = StratumProtocol::to_message(StratumProtocol::create_submit_request(99, "00ff", 0));
        assert!(matches!(
            parse_worker_message(line.trim_end()).unwrap(),
            WorkerMessage::Submit { ref nonce, ref reported_hash } if nonce.as_str() == "99" && reported_hash == "00ff"
        ));
    }

    #[test]
    fn test_empty_submit_is_dropped() {
        assert!(StratumProtocol::create_submit_request(1, "", 0).is_null());
        assert_eq!(StratumProtocol::to_message(Value::Null), "");
    }
}

// Changelog:
// - v1.0.0 (2026-10-17): Rewritten for the pool wire protocol.
//   - Replaced login/authorize builders with mining.notify, submit and
//     progress builders; kept the newline framing helper.
