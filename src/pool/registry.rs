// Stratum Pool - Free and Open Source Software Statement
//
// This project, stratum-pool, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/pool/registry.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file implements the worker session table for the pool, located in the
// pool subdirectory. Every operation goes through one mutex so concurrent
// connects, disconnects and share updates never interleave destructively.
//
// Tree Location:
// - src/pool/registry.rs (worker sessions keyed by peer address)
// - Depends on: tokio, core::types, pool::error

use crate::core::Job;
use crate::pool::error::PoolError;
use log::{debug, warn};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Instant;
use tokio::sync::Mutex;

const LOG_TARGET: &str = "stratum_pool::pool::registry";

/// Registry entry for one connected worker. The socket itself stays with the
/// connection handler that owns it.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkerSession {
    pub address: SocketAddr,
    /// Job id handed out at connect time
    pub assigned_job_id: String,
    /// Snapshot of the job's work data at connect time; never refreshed
    pub assigned_work_data: String,
    /// Accepted shares on this session
    pub share_count: u64,
    /// Rejected shares on this session
    pub rejected_count: u64,
    pub connected_at: Instant,
}

#[derive(Default)]
pub struct WorkerRegistry {
    sessions: Mutex<HashMap<SocketAddr, WorkerSession>>,
}

impl WorkerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a session for `address`, snapshotting the job it was handed
    pub async fn register(&self, address: SocketAddr, job: &Job) -> Result<WorkerSession, PoolError> {
        let mut sessions = self.sessions.lock().await;
        if sessions.contains_key(&address) {
            warn!(target: LOG_TARGET, "⚠️ Duplicate registration attempt from {}", address);
            return Err(PoolError::DuplicateSession { address });
        }

        let session = WorkerSession {
            address,
            assigned_job_id: job.id.clone(),
            assigned_work_data: job.work_data.clone(),
            share_count: 0,
            rejected_count: 0,
            connected_at: Instant::now(),
        };
        sessions.insert(address, session.clone());
        debug!(target: LOG_TARGET, "Registered {} on job {} ({} live)", address, job.id, sessions.len());
        Ok(session)
    }

    /// Snapshot of the session for `address`
    pub async fn get(&self, address: &SocketAddr) -> Result<WorkerSession, PoolError> {
        self.sessions
            .lock()
            .await
            .get(address)
            .cloned()
            .ok_or(PoolError::SessionNotFound { address: *address })
    }

    /// Count an accepted share; returns the new count, or None if the session
    /// is already gone
    pub async fn record_share(&self, address: &SocketAddr) -> Option<u64> {
        let mut sessions = self.sessions.lock().await;
        match sessions.get_mut(address) {
            Some(session) => {
                session.share_count += 1;
                Some(session.share_count)
            }
            None => {
                warn!(target: LOG_TARGET, "Accepted share for unknown session {}", address);
                None
            }
        }
    }

    /// Count a rejected share; same absent-session behavior as `record_share`
    pub async fn record_rejection(&self, address: &SocketAddr) -> Option<u64> {
        let mut sessions = self.sessions.lock().await;
        match sessions.get_mut(address) {
            Some(session) => {
                session.rejected_count += 1;
                Some(session.rejected_count)
            }
            None => {
                warn!(target: LOG_TARGET, "Rejected share for unknown session {}", address);
                None
            }
        }
    }

    /// Remove the session for `address`
    pub async fn deregister(&self, address: &SocketAddr) -> Option<WorkerSession> {
        let removed = self.sessions.lock().await.remove(address);
        if removed.is_none() {
            debug!(target: LOG_TARGET, "Deregister for unknown session {}", address);
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.lock().await.is_empty()
    }

    /// Snapshot of every live session
    pub async fn sessions(&self) -> Vec<WorkerSession> {
        self.sessions.lock().await.values().cloned().collect()
    }
}


// Changelog:
// - v1.0.0 (2026-10-17): Initial worker registry.
//   - Purpose: Tracks live worker sessions and their job snapshots.
//   - Features: Mutex-serialized register/get/record/deregister, duplicate
//     detection, per-session accepted and rejected counters.
