// Stratum Pool - Free and Open Source Software Statement
//
// This project, stratum-pool, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/worker/miner.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file implements the reference pool worker, located in the worker
// subdirectory. It keeps a connection to the pool open, mines every new job
// on a set of OS threads and reconnects after a fixed delay when the pool
// goes away.

use super::client::PoolClient;
use super::thread::{MiningJob, start_mining_thread};
use crate::Result;
use crate::pool::codec::MAX_LINE_LENGTH;
use crate::pool::messages::{JobNotification, PoolMessage, parse_pool_message};
use crate::stats::{HttpStatsSink, StatsSink, StatsSource, WorkerStats, spawn_stats_reporter};
use futures::StreamExt;
use log::{debug, error, info, warn};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tokio_util::codec::{FramedRead, LinesCodec};

const LOG_TARGET: &str = "stratum_pool::worker::miner";

pub const DEFAULT_POOL_ADDRESS: &str = "127.0.0.1:3333";
pub const DEFAULT_WORKER_THREADS: usize = 4;
pub const DEFAULT_RECONNECT_INTERVAL: Duration = Duration::from_secs(5);

/// Runtime settings for the reference worker
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub pool: String,
    /// Zero selects one thread per logical CPU
    pub threads: usize,
    pub reconnect_interval: Duration,
    pub stats_url: Option<String>,
    pub stats_interval: Duration,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            pool: DEFAULT_POOL_ADDRESS.to_string(),
            threads: DEFAULT_WORKER_THREADS,
            reconnect_interval: DEFAULT_RECONNECT_INTERVAL,
            stats_url: None,
            stats_interval: Duration::from_secs(30),
        }
    }
}

/// Stops a running worker and all of its mining threads
#[derive(Clone)]
pub struct StopHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl StopHandle {
    pub fn stop(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_stopped(&self) -> bool {
        *self.tx.borrow()
    }
}

struct ActiveJob {
    job_id: String,
    work_data: String,
    should_stop: Arc<AtomicBool>,
}

impl ActiveJob {
    fn matches(&self, notification: &JobNotification) -> bool {
        self.job_id == notification.job_id || self.work_data == notification.work_data
    }

    fn stop(&self) {
        self.should_stop.store(true, Ordering::Relaxed);
    }
}

pub struct PoolWorker {
    config: WorkerConfig,
    num_threads: usize,
    client: PoolClient,
    stats: Arc<WorkerStats>,
    stop: StopHandle,
}

impl PoolWorker {
    pub fn new(config: WorkerConfig) -> Self {
        let num_threads = if config.threads == 0 {
            num_cpus::get()
        } else {
            config.threads
        };
        let (tx, _) = watch::channel(false);

        Self {
            config,
            num_threads,
            client: PoolClient::new(),
            stats: Arc::new(WorkerStats::new()),
            stop: StopHandle { tx: Arc::new(tx) },
        }
    }

    pub fn num_threads(&self) -> usize {
        self.num_threads
    }

    pub fn stats(&self) -> Arc<WorkerStats> {
        Arc::clone(&self.stats)
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Mine until stopped, reconnecting whenever the pool connection ends
    pub async fn run(self: Arc<Self>) -> Result<()> {
        info!(
            target: LOG_TARGET,
            "⛏️ Starting pool worker with {} threads against {}", self.num_threads, self.config.pool
        );
        let background = self.start_background_tasks();
        let mut stop_rx = self.stop.tx.subscribe();

        while !*stop_rx.borrow_and_update() {
            match self.client.connect(&self.config.pool).await {
                Ok(stream) => {
                    info!(target: LOG_TARGET, "✅ Connected to pool at {}", self.config.pool);
                    self.mine_connection(stream, &mut stop_rx).await;
                }
                Err(e) => error!(target: LOG_TARGET, "📡 Failed to connect to {}: {}", self.config.pool, e),
            }

            if self.stop.is_stopped() {
                break;
            }
            info!(
                target: LOG_TARGET,
                "🔄 Reconnecting in {}s...",
                self.config.reconnect_interval.as_secs()
            );
            tokio::select! {
                _ = tokio::time::sleep(self.config.reconnect_interval) => {}
                _ = stop_rx.changed() => {}
            }
        }

        for task in background {
            task.abort();
        }
        info!(target: LOG_TARGET, "🛑 Pool worker stopped");
        Ok(())
    }

    fn start_background_tasks(&self) -> Vec<tokio::task::JoinHandle<()>> {
        let mut tasks = Vec::new();
        let stats = Arc::clone(&self.stats);
        let period = self.config.stats_interval;
        tasks.push(tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.tick().await;
            loop {
                interval.tick().await;
                stats.display_summary();
            }
        }));

        if let Some(url) = &self.config.stats_url {
            match HttpStatsSink::new(url) {
                Ok(sink) => {
                    let source: Arc<dyn StatsSource> = Arc::clone(&self.stats) as Arc<dyn StatsSource>;
                    let sink: Arc<dyn StatsSink> = Arc::new(sink);
                    tasks.push(spawn_stats_reporter(source, sink, period));
                }
                Err(e) => warn!(target: LOG_TARGET, "📡 Stats reporting disabled: {}", e),
            }
        }
        tasks
    }

    async fn mine_connection(&self, stream: TcpStream, stop_rx: &mut watch::Receiver<bool>) {
        let (reader, mut writer) = stream.into_split();
        let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<String>();

        let writer_task = tokio::spawn(async move {
            while let Some(message) = outbound_rx.recv().await {
                if message.is_empty() {
                    continue;
                }
                if let Err(e) = writer.write_all(message.as_bytes()).await {
                    error!(target: LOG_TARGET, "📤 Failed to send to pool: {}", e);
                    break;
                }
            }
        });

        let mut lines = FramedRead::new(reader, LinesCodec::new_with_max_length(MAX_LINE_LENGTH));
        let mut active: Option<ActiveJob> = None;

        loop {
            tokio::select! {
                _ = stop_rx.changed() => break,
                line = lines.next() => match line {
                    Some(Ok(line)) => self.handle_pool_line(&line, &mut active, &outbound_tx),
                    None => {
                        info!(target: LOG_TARGET, "📡 Connection closed by pool");
                        break;
                    }
                    Some(Err(e)) => {
                        error!(target: LOG_TARGET, "📡 Error reading from pool: {}", e);
                        break;
                    }
                },
            }
        }

        if let Some(job) = active.take() {
            job.stop();
        }
        drop(outbound_tx);
        writer_task.abort();
    }

    fn handle_pool_line(&self, line: &str, active: &mut Option<ActiveJob>, outbound: &mpsc::UnboundedSender<String>) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }

        let notification = match parse_pool_message(line) {
            Ok(PoolMessage::Notify(notification)) => notification,
            Ok(PoolMessage::Other { method }) => {
                debug!(target: LOG_TARGET, "Ignoring pool method {:?}", method);
                return;
            }
            Err(e) => {
                warn!(target: LOG_TARGET, "⚠️ Invalid message from pool: {}", e);
                return;
            }
        };

        if active.as_ref().is_some_and(|job| job.matches(&notification)) {
            debug!(target: LOG_TARGET, "Skipping repeated job {}", notification.job_id);
            return;
        }
        if let Some(job) = active.take() {
            job.stop();
        }

        let (start, end) = notification.nonce_range.unwrap_or((0, u64::MAX));
        self.stats.record_job(start, end);
        info!(
            target: LOG_TARGET,
            "📋 New job {}: data {}, target {}, nonces [{:#x}, {:#x})",
            notification.job_id,
            notification.work_data,
            notification.target,
            start,
            end
        );

        let job = Arc::new(MiningJob {
            job_id: notification.job_id.clone(),
            work_data: notification.work_data.clone(),
            target: notification.target,
            start,
            end,
        });
        let should_stop = Arc::new(AtomicBool::new(false));
        for thread_id in 0..self.num_threads {
            start_mining_thread(
                thread_id,
                self.num_threads,
                Arc::clone(&job),
                outbound.clone(),
                Arc::clone(&self.stats),
                Arc::clone(&should_stop),
            );
        }

        *active = Some(ActiveJob {
            job_id: notification.job_id,
            work_data: notification.work_data,
            should_stop,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_threads_means_all_cpus() {
        let worker = PoolWorker::new(WorkerConfig {
            threads: 0,
            ..WorkerConfig::default()
        });
        assert_eq!(worker.num_threads(), num_cpus::get());
        assert_eq!(PoolWorker::new(WorkerConfig::default()).num_threads(), DEFAULT_WORKER_THREADS);
    }

    #[test]
    fn test_repeated_job_detection() {
        let active = ActiveJob {
            job_id: "100".to_string(),
            work_data: "aaaaaaaaaaaaaaaa".to_string(),
            should_stop: Arc::new(AtomicBool::new(false)),
        };
        let mut notification = JobNotification {
            job_id: "100".to_string(),
            work_data: "bbbbbbbbbbbbbbbb".to_string(),
            target: crate::core::Target::default(),
            nonce_range: None,
        };
        assert!(active.matches(&notification));
        notification.job_id = "101".to_string();
        assert!(!active.matches(&notification));
        notification.work_data = "aaaaaaaaaaaaaaaa".to_string();
        assert!(active.matches(&notification));
    }

    #[tokio::test]
    async fn test_stop_before_run_returns_immediately() {
        let worker = Arc::new(PoolWorker::new(WorkerConfig {
            pool: "127.0.0.1:1".to_string(),
            ..WorkerConfig::default()
        }));
        worker.stop_handle().stop();
        assert!(worker.stop_handle().is_stopped());
        tokio::time::timeout(Duration::from_secs(5), Arc::clone(&worker).run())
            .await
            .unwrap()
            .unwrap();
    }
}

// Changelog:
// - v1.0.0 (2026-10-17): Reference pool worker.
//   - Adapted from the CPU miner loop: writer task fed by a channel, OS mining
//     threads per job, repeated-job skip, fixed-delay reconnect and a stop
//     handle shared with callers.
