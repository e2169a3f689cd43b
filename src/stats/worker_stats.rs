// Stratum Pool - Free and Open Source Software Statement
//
// This project, stratum-pool, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/stats/worker_stats.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file implements statistics for the reference pool worker, located in
// the stats subdirectory. Mining threads add to the atomics directly.

use super::sink::{StatsSource, StatsUpdate};
use super::{format_duration, format_hashrate};
use log::info;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

pub struct WorkerStats {
    pub hashes_tried: AtomicU64,
    pub shares_found: AtomicU64,
    pub jobs_received: AtomicU64,
    current_nonce: AtomicU64,
    search_start: AtomicU64,
    search_end: AtomicU64,
    start_time: Instant,
}

impl Default for WorkerStats {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkerStats {
    pub fn new() -> Self {
        Self {
            hashes_tried: AtomicU64::new(0),
            shares_found: AtomicU64::new(0),
            jobs_received: AtomicU64::new(0),
            current_nonce: AtomicU64::new(0),
            search_start: AtomicU64::new(0),
            search_end: AtomicU64::new(u64::MAX),
            start_time: Instant::now(),
        }
    }

    pub fn record_hashes(&self, count: u64) {
        self.hashes_tried.fetch_add(count, Ordering::Relaxed);
    }

    pub fn record_share(&self) {
        self.shares_found.fetch_add(1, Ordering::Relaxed);
    }

    pub fn set_current_nonce(&self, nonce: u64) {
        self.current_nonce.store(nonce, Ordering::Relaxed);
    }

    pub fn current_nonce(&self) -> u64 {
        self.current_nonce.load(Ordering::Relaxed)
    }

    pub fn record_job(&self, start: u64, end: u64) {
        self.jobs_received.fetch_add(1, Ordering::Relaxed);
        self.search_start.store(start, Ordering::Relaxed);
        self.search_end.store(end, Ordering::Relaxed);
    }

    pub fn hashrate(&self) -> f64 {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.hashes_tried.load(Ordering::Relaxed) as f64 / elapsed
        } else {
            0.0
        }
    }

    pub fn display_summary(&self) {
        info!(
            "⛏️ Worker: {} | tried {} | shares {} | nonce {:#x} | up {}",
            format_hashrate(self.hashrate()),
            self.hashes_tried.load(Ordering::Relaxed),
            self.shares_found.load(Ordering::Relaxed),
            self.current_nonce(),
            format_duration(self.start_time.elapsed())
        );
    }
}

impl StatsSource for WorkerStats {
    fn stats_update(&self) -> StatsUpdate {
        StatsUpdate {
            tried: self.hashes_tried.load(Ordering::Relaxed),
            hashrate: self.hashrate(),
            current_nonce: self.current_nonce(),
            block_height: self.jobs_received.load(Ordering::Relaxed),
            search_start: Some(format!("{:#010x}", self.search_start.load(Ordering::Relaxed))),
            search_end: Some(format!("{:#010x}", self.search_end.load(Ordering::Relaxed))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_update_reflects_counters() {
        let stats = WorkerStats::new();
        stats.record_job(0, 0xffff_ffff);
        stats.record_hashes(500);
        stats.record_hashes(250);
        stats.set_current_nonce(0x1234);

        let update = stats.stats_update();
        assert_eq!(update.tried, 750);
        assert_eq!(update.current_nonce, 0x1234);
        assert_eq!(update.block_height, 1);
        assert_eq!(update.search_start.as_deref(), Some("0x00000000"));
        assert_eq!(update.search_end.as_deref(), Some("0xffffffff"));
    }
}
