// Stratum Pool - Free and Open Source Software Statement
//
// This project, stratum-pool, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/pool/server.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file implements the pool's TCP server, located in the pool
// subdirectory. It owns the listener, the job rotation task and the stats
// tasks, and spawns a ConnectionHandler for every accepted connection.
//
// Tree Location:
// - src/pool/server.rs (accept loop and background tasks)
// - Depends on: tokio, pool::{handler, job_manager, registry}, stats

use crate::core::Target;
use crate::pool::error::PoolError;
use crate::pool::handler::ConnectionHandler;
use crate::pool::job_manager::{DEFAULT_ROTATION_INTERVAL, JobManager};
use crate::pool::registry::WorkerRegistry;
use crate::stats::{HttpStatsSink, PoolStats, StatsSink, StatsSource, spawn_stats_reporter};
use log::{debug, error, info, warn};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

const LOG_TARGET: &str = "stratum_pool::pool::server";

pub const DEFAULT_LISTEN_ADDRESS: &str = "0.0.0.0:3333";
pub const DEFAULT_STATS_INTERVAL: Duration = Duration::from_secs(30);

/// Runtime settings for the pool server
#[derive(Debug, Clone)]
pub struct PoolConfig {
    pub listen: String,
    pub target: Target,
    pub rotation_interval: Duration,
    /// Base URL of the stats dashboard; pushing is disabled when `None`
    pub stats_url: Option<String>,
    pub stats_interval: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            listen: DEFAULT_LISTEN_ADDRESS.to_string(),
            target: Target::default(),
            rotation_interval: DEFAULT_ROTATION_INTERVAL,
            stats_url: None,
            stats_interval: DEFAULT_STATS_INTERVAL,
        }
    }
}

pub struct PoolServer {
    config: PoolConfig,
    listener: TcpListener,
    jobs: Arc<JobManager>,
    registry: Arc<WorkerRegistry>,
    stats: Arc<PoolStats>,
}

impl PoolServer {
    /// Bind the listening socket. Failure here is the only fatal pool error.
    pub async fn bind(config: PoolConfig) -> Result<Self, PoolError> {
        let listener = TcpListener::bind(&config.listen)
            .await
            .map_err(|source| PoolError::Bind {
                address: config.listen.clone(),
                source,
            })?;

        let jobs = Arc::new(JobManager::new(config.target));
        let stats = Arc::new(PoolStats::new(Arc::clone(&jobs)));
        Ok(Self {
            config,
            listener,
            jobs,
            registry: Arc::new(WorkerRegistry::new()),
            stats,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, PoolError> {
        Ok(self.listener.local_addr()?)
    }

    pub fn jobs(&self) -> Arc<JobManager> {
        Arc::clone(&self.jobs)
    }

    pub fn registry(&self) -> Arc<WorkerRegistry> {
        Arc::clone(&self.registry)
    }

    pub fn stats(&self) -> Arc<PoolStats> {
        Arc::clone(&self.stats)
    }

    /// Start the background tasks and accept connections forever
    pub async fn run(self) -> Result<(), PoolError> {
        info!(
            target: LOG_TARGET,
            "🚀 Stratum pool listening on {} (target {})",
            self.local_addr()?,
            self.jobs.target()
        );

        let job = self.jobs.current_job().await;
        info!(target: LOG_TARGET, "🆕 Initial job {} (data: {})", job.id, job.work_data);
        Arc::clone(&self.jobs).spawn_rotation(self.config.rotation_interval);
        self.start_stats_tasks();

        loop {
            match self.listener.accept().await {
                Ok((stream, address)) => {
                    if let Err(e) = stream.set_nodelay(true) {
                        debug!(target: LOG_TARGET, "Could not set TCP_NODELAY for {}: {}", address, e);
                    }
                    let handler = ConnectionHandler::new(
                        address,
                        Arc::clone(&self.jobs),
                        Arc::clone(&self.registry),
                        Arc::clone(&self.stats),
                    );
                    tokio::spawn(async move {
                        // The handler logs its own failures.
                        let _ = handler.handle(stream).await;
                    });
                }
                Err(e) => {
                    error!(target: LOG_TARGET, "❌ Failed to accept connection: {}", e);
                }
            }
        }
    }

    fn start_stats_tasks(&self) {
        let stats = Arc::clone(&self.stats);
        let registry = Arc::clone(&self.registry);
        let period = self.config.stats_interval;
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // The first tick completes immediately; skip the empty dashboard.
            interval.tick().await;
            let mut summary = 0u64;
            loop {
                interval.tick().await;
                summary += 1;
                stats.display_summary(&format!("#{:06}", summary));
                for session in registry.sessions().await {
                    debug!(
                        target: LOG_TARGET,
                        "   {} job {}: {} accepted, {} rejected, connected {}s",
                        session.address,
                        session.assigned_job_id,
                        session.share_count,
                        session.rejected_count,
                        session.connected_at.elapsed().as_secs()
                    );
                }
            }
        });

        if let Some(url) = &self.config.stats_url {
            match HttpStatsSink::new(url) {
                Ok(sink) => {
                    info!(target: LOG_TARGET, "📡 Pushing stats to {} every {:?}", sink.base_url(), period);
                    let source: Arc<dyn StatsSource> = Arc::clone(&self.stats) as Arc<dyn StatsSource>;
                    let sink: Arc<dyn StatsSink> = Arc::new(sink);
                    spawn_stats_reporter(source, sink, period);
                }
                Err(e) => warn!(target: LOG_TARGET, "📡 Stats reporting disabled: {}", e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bind_on_ephemeral_port() {
        let config = PoolConfig {
            listen: "127.0.0.1:0".to_string(),
            ..PoolConfig::default()
        };
        let server = PoolServer::bind(config).await.unwrap();
        assert_ne!(server.local_addr().unwrap().port(), 0);
        assert!(server.registry().is_empty().await);
        assert_eq!(server.jobs().jobs_issued(), 0);
    }

    #[tokio::test]
    async fn test_bind_failure_is_reported() {
        let first = PoolServer::bind(PoolConfig {
            listen: "127.0.0.1:0".to_string(),
            ..PoolConfig::default()
        })
        .await
        .unwrap();
        let taken = first.local_addr().unwrap().to_string();

        let result = PoolServer::bind(PoolConfig {
            listen: taken.clone(),
            ..PoolConfig::default()
        })
        .await;
        match result {
            Err(PoolError::Bind { address, .. }) => assert_eq!(address, taken),
            Err(e) => panic!("unexpected error: {}", e),
            Ok(_) => panic!("second bind on {} succeeded", taken),
        }
    }
}

// Changelog:
// - v1.0.0 (2026-10-17): Pool server.
//   - Bind, job rotation, periodic dashboard log, optional stats push and
//     the accept loop spawning one handler task per connection.
