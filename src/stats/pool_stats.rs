// Stratum Pool - Free and Open Source Software Statement
//
// This project, stratum-pool, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/stats/pool_stats.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file implements pool-wide statistics, located in the stats
// subdirectory. Counters are atomics updated by every connection handler;
// the summary is logged periodically and pushed to the stats sink.
//
// Tree Location:
// - src/stats/pool_stats.rs (pool-wide counters)
// - Depends on: std, core::types, pool::job_manager, stats::sink

use super::sink::{StatsSource, StatsUpdate};
use super::{format_duration, format_hashrate};
use crate::core::Nonce;
use crate::pool::job_manager::JobManager;
use log::info;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

pub struct PoolStats {
    pub shares_submitted: AtomicU64,
    pub shares_accepted: AtomicU64,
    pub shares_rejected: AtomicU64,
    pub malformed_messages: AtomicU64,
    pub connections_total: AtomicU64,
    pub workers_connected: AtomicU64,
    last_nonce: AtomicU64,
    start_time: Instant,
    jobs: Arc<JobManager>,
}

impl PoolStats {
    pub fn new(jobs: Arc<JobManager>) -> Self {
        Self {
            shares_submitted: AtomicU64::new(0),
            shares_accepted: AtomicU64::new(0),
            shares_rejected: AtomicU64::new(0),
            malformed_messages: AtomicU64::new(0),
            connections_total: AtomicU64::new(0),
            workers_connected: AtomicU64::new(0),
            last_nonce: AtomicU64::new(0),
            start_time: Instant::now(),
            jobs,
        }
    }

    pub fn record_connection(&self) {
        self.connections_total.fetch_add(1, Ordering::Relaxed);
        self.workers_connected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_disconnection(&self) {
        let _ = self
            .workers_connected
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_sub(1));
    }

    pub fn record_share(&self, nonce: &Nonce, accepted: bool) {
        self.shares_submitted.fetch_add(1, Ordering::Relaxed);
        if accepted {
            self.shares_accepted.fetch_add(1, Ordering::Relaxed);
        } else {
            self.shares_rejected.fetch_add(1, Ordering::Relaxed);
        }
        self.record_nonce(nonce);
    }

    pub fn record_progress(&self, nonce: &Nonce) {
        self.record_nonce(nonce);
    }

    pub fn record_malformed(&self) {
        self.malformed_messages.fetch_add(1, Ordering::Relaxed);
    }

    // Only numeric nonces can be shown as the dashboard's current nonce.
    fn record_nonce(&self, nonce: &Nonce) {
        if let Some(value) = nonce.as_u64() {
            self.last_nonce.store(value, Ordering::Relaxed);
        }
    }

    pub fn last_nonce(&self) -> u64 {
        self.last_nonce.load(Ordering::Relaxed)
    }

    /// Hashes the accepted shares represent at the pool target
    pub fn estimated_hashes(&self) -> f64 {
        let accepted = self.shares_accepted.load(Ordering::Relaxed) as f64;
        accepted * self.jobs.target().expected_hashes_per_share()
    }

    /// Pool hashrate estimated from accepted shares since startup
    pub fn hashrate(&self) -> f64 {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.estimated_hashes() / elapsed
        } else {
            0.0
        }
    }

    /// Log a text summary of pool activity
    pub fn display_summary(&self, summary_id: &str) {
        let submitted = self.shares_submitted.load(Ordering::Relaxed);
        let accepted = self.shares_accepted.load(Ordering::Relaxed);
        let rejected = self.shares_rejected.load(Ordering::Relaxed);
        let acceptance_rate = if submitted > 0 {
            (accepted as f64 / submitted as f64) * 100.0
        } else {
            0.0
        };

        info!("📊 POOL DASHBOARD - {}", summary_id);
        info!("├─ Workers Connected: {}", self.workers_connected.load(Ordering::Relaxed));
        info!("├─ Connections Total: {}", self.connections_total.load(Ordering::Relaxed));
        info!("├─ Shares: {}/{} ({:.1}% accepted)", accepted, submitted, acceptance_rate);
        info!("├─ Rejected Shares: {}", rejected);
        info!("├─ Malformed Messages: {}", self.malformed_messages.load(Ordering::Relaxed));
        info!("├─ Estimated Hashrate: {}", format_hashrate(self.hashrate()));
        info!("├─ Jobs Issued: {}", self.jobs.jobs_issued());
        info!("├─ Target: {}", self.jobs.target());
        info!("└─ Uptime: {}", format_duration(self.start_time.elapsed()));
    }
}

impl StatsSource for PoolStats {
    fn stats_update(&self) -> StatsUpdate {
        StatsUpdate {
            tried: self.estimated_hashes() as u64,
            hashrate: self.hashrate(),
            current_nonce: self.last_nonce(),
            block_height: self.jobs.jobs_issued(),
            search_start: None,
            search_end: None,
        }
    }
}


// Changelog:
// - v1.0.0 (2026-10-17): Pool-wide statistics.
//   - Adapted from the miner-wide stats: atomics for shares and connections,
//     periodic dashboard log, StatsSource for the dashboard push.
