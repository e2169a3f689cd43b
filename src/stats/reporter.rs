// Stratum Pool - Free and Open Source Software Statement
//
// This project, stratum-pool, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/stats/reporter.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file implements the periodic stats push, located in the stats
// subdirectory. Both the pool and the reference worker use it to send their
// StatsSource snapshot to a StatsSink.
//
// Tree Location:
// - src/stats/reporter.rs (stats push loop)
// - Depends on: tokio, stats::sink

use super::sink::{StatsError, StatsSink, StatsSource};
use log::warn;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

const LOG_TARGET: &str = "stratum_pool::stats::reporter";

/// Push one update right now
pub async fn report_now(source: &dyn StatsSource, sink: &dyn StatsSink) -> Result<(), StatsError> {
    sink.push(&source.stats_update()).await
}

/// Push an update every `period`. Failures are logged and the loop keeps
/// going; the dashboard being down never affects the caller.
pub fn spawn_stats_reporter(
    source: Arc<dyn StatsSource>,
    sink: Arc<dyn StatsSink>,
    period: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            if let Err(e) = report_now(source.as_ref(), sink.as_ref()).await {
                warn!(target: LOG_TARGET, "📡 Failed to push stats: {}", e);
            }
        }
    })
}


// Changelog:
// - v1.0.0 (2026-10-17): Stats reporter.
//   - report_now pushes a single update; spawn_stats_reporter pushes on an
//     interval and logs failures without stopping.
