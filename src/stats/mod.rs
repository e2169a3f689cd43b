// Stratum Pool - Free and Open Source Software Statement
//
// This project, stratum-pool, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/stats/mod.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file is the module declaration for statistics tracking and reporting,
// located in the stats subdirectory. It declares submodules, re-exports key
// types and hosts the shared formatting helpers used in log output.
//
// Tree Location:
// - src/stats/mod.rs (stats module entry point)
// - Submodules: pool_stats, worker_stats, sink, reporter

pub mod pool_stats;
pub mod reporter;
pub mod sink;
pub mod worker_stats;

use std::time::Duration;

// Re-export key types for convenience
pub use pool_stats::PoolStats;
pub use reporter::{report_now, spawn_stats_reporter};
pub use sink::{HttpStatsSink, StatsError, StatsSink, StatsSource, StatsUpdate};
pub use worker_stats::WorkerStats;

/// Format hashrate in appropriate units (H/s, KH/s, MH/s, GH/s)
pub fn format_hashrate(hashrate: f64) -> String {
    if hashrate >= 1_000_000_000.0 {
        format!("{:.2} GH/s", hashrate / 1_000_000_000.0)
    } else if hashrate >= 1_000_000.0 {
        format!("{:.2} MH/s", hashrate / 1_000_000.0)
    } else if hashrate >= 1_000.0 {
        format!("{:.2} KH/s", hashrate / 1_000.0)
    } else {
        format!("{:.2} H/s", hashrate)
    }
}

/// Format an uptime as seconds, minutes or hours
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m", secs / 60)
    } else {
        format!("{:.1}h", secs as f64 / 3600.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_hashrate_units() {
        assert_eq!(format_hashrate(12.0), "12.00 H/s");
        assert_eq!(format_hashrate(1_500.0), "1.50 KH/s");
        assert_eq!(format_hashrate(2_000_000.0), "2.00 MH/s");
        assert_eq!(format_hashrate(3_250_000_000.0), "3.25 GH/s");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(5)), "5s");
        assert_eq!(format_duration(Duration::from_secs(125)), "2m");
        assert_eq!(format_duration(Duration::from_secs(5400)), "1.5h");
    }
}

// Changelog:
// - v1.0.0 (2026-10-17): Stats module for the pool and reference worker.
//   - Moved hashrate/duration formatting here from the former utils module.
