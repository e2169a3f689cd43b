// Stratum Pool - Free and Open Source Software Statement
//
// This project, stratum-pool, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/pool/handler.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file implements the per-connection protocol loop of the pool, located
// in the pool subdirectory. A handler registers the worker, sends it the
// current job, validates every submission against the work data the worker
// was given and deregisters the session when the connection ends.
//
// Tree Location:
// - src/pool/handler.rs (per-connection state machine)
// - Depends on: tokio, tokio-util, core::validator, pool::{codec, job_manager, registry, messages, protocol}

use crate::core::{Job, Nonce, ShareValidator};
use crate::pool::codec::{MAX_LINE_LENGTH, WorkerFrame, WorkerLineCodec};
use crate::pool::error::PoolError;
use crate::pool::job_manager::JobManager;
use crate::pool::messages::{WorkerMessage, parse_worker_message};
use crate::pool::protocol::StratumProtocol;
use crate::pool::registry::WorkerRegistry;
use crate::stats::PoolStats;
use futures::StreamExt;
use log::{debug, info, warn};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio_util::codec::FramedRead;

const LOG_TARGET: &str = "stratum_pool::pool::handler";

pub struct ConnectionHandler {
    address: SocketAddr,
    jobs: Arc<JobManager>,
    registry: Arc<WorkerRegistry>,
    stats: Arc<PoolStats>,
}

impl ConnectionHandler {
    pub fn new(
        address: SocketAddr,
        jobs: Arc<JobManager>,
        registry: Arc<WorkerRegistry>,
        stats: Arc<PoolStats>,
    ) -> Self {
        Self {
            address,
            jobs,
            registry,
            stats,
        }
    }

    /// Serve one worker connection until the peer closes it or an I/O error
    /// occurs. The session is always deregistered before returning, except
    /// when registration itself was refused.
    pub async fn handle<S>(self, stream: S) -> Result<(), PoolError>
    where
        S: AsyncRead + AsyncWrite + Unpin + Send,
    {
        let job = self.jobs.current_job().await;
        self.registry.register(self.address, &job).await?;
        self.stats.record_connection();
        info!(target: LOG_TARGET, "🔗 Worker {} connected, assigned job {}", self.address, job.id);

        let result = self.serve(stream, &job).await;

        self.stats.record_disconnection();
        let session = self.registry.deregister(&self.address).await;
        match &result {
            Ok(()) => info!(
                target: LOG_TARGET,
                "👋 Worker {} disconnected ({} shares accepted)",
                self.address,
                session.map(|s| s.share_count).unwrap_or(0)
            ),
            Err(e) => warn!(target: LOG_TARGET, "📡 Connection to {} failed: {}", self.address, e),
        }
        result
    }

    async fn serve<S>(&self, stream: S, job: &Job) -> Result<(), PoolError>
    where
        S: AsyncRead + AsyncWrite + Unpin + Send,
    {
        let (reader, mut writer) = tokio::io::split(stream);

        let notify = StratumProtocol::to_message(StratumProtocol::create_notify(job));
        writer.write_all(notify.as_bytes()).await?;
        writer.flush().await?;
        debug!(target: LOG_TARGET, "📤 Sent job {} to {}", job.id, self.address);

        let mut frames = FramedRead::new(reader, WorkerLineCodec::new());
        while let Some(frame) = frames.next().await {
            match frame? {
                WorkerFrame::Line(line) => {
                    let line = line.trim();
                    if !line.is_empty() {
                        self.handle_line(line).await;
                    }
                }
                WorkerFrame::TooLong => {
                    self.stats.record_malformed();
                    warn!(
                        target: LOG_TARGET,
                        "⚠️ Line from {} exceeds {} bytes, discarding", self.address, MAX_LINE_LENGTH
                    );
                }
                WorkerFrame::InvalidUtf8 => {
                    self.stats.record_malformed();
                    warn!(target: LOG_TARGET, "⚠️ Non UTF-8 input from {}", self.address);
                }
            }
        }

        let _ = writer.shutdown().await;
        Ok(())
    }

    async fn handle_line(&self, line: &str) {
        match parse_worker_message(line) {
            Ok(WorkerMessage::Submit { nonce, reported_hash }) => {
                self.handle_submit(&nonce, &reported_hash).await;
            }
            Ok(WorkerMessage::Progress { nonce, thread_id }) => {
                self.stats.record_progress(&nonce);
                debug!(
                    target: LOG_TARGET,
                    "⏳ Progress from {} thread {:?}: nonce {}", self.address, thread_id, nonce
                );
            }
            Ok(WorkerMessage::Other { method }) => {
                debug!(target: LOG_TARGET, "Ignoring method {:?} from {}", method, self.address);
            }
            Err(e) => {
                self.stats.record_malformed();
                warn!(target: LOG_TARGET, "⚠️ Malformed message from {}: {} ({})", self.address, e, line);
            }
        }
    }

    async fn handle_submit(&self, nonce: &Nonce, reported_hash: &str) {
        let session = match self.registry.get(&self.address).await {
            Ok(session) => session,
            Err(e) => {
                warn!(target: LOG_TARGET, "⚠️ Submission without session: {}", e);
                return;
            }
        };

        let check = ShareValidator::check(&session.assigned_work_data, nonce, &self.jobs.target());
        if !check.digest_hex.eq_ignore_ascii_case(reported_hash) {
            debug!(
                target: LOG_TARGET,
                "Reported hash {} differs from computed {} for nonce {}", reported_hash, check.digest_hex, nonce
            );
        }

        // Session counters are updated before the pool-wide ones.
        if check.accepted {
            let total = self.registry.record_share(&self.address).await.unwrap_or(0);
            self.stats.record_share(nonce, true);
            info!(
                target: LOG_TARGET,
                "✅ Share accepted from {} (nonce {}, job {}, total {})",
                self.address,
                nonce,
                session.assigned_job_id,
                total
            );
        } else {
            self.registry.record_rejection(&self.address).await;
            self.stats.record_share(nonce, false);
            info!(
                target: LOG_TARGET,
                "❌ Share rejected from {} (nonce {}, hash {})", self.address, nonce, check.digest_hex
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Target, U256};
    use crate::pool::messages::{PoolMessage, parse_pool_message};
    use std::sync::atomic::Ordering;
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, DuplexStream};
    use tokio::task::JoinHandle;

    struct Harness {
        jobs: Arc<JobManager>,
        registry: Arc<WorkerRegistry>,
        stats: Arc<PoolStats>,
    }

    impl Harness {
        fn new(target: Target) -> Self {
            let jobs = Arc::new(JobManager::new(target));
            Self {
                registry: Arc::new(WorkerRegistry::new()),
                stats: Arc::new(PoolStats::new(Arc::clone(&jobs))),
                jobs,
            }
        }

        fn spawn(&self, address: SocketAddr) -> (DuplexStream, JoinHandle<Result<(), PoolError>>) {
            let (client, server) = tokio::io::duplex(4096);
            let handler = ConnectionHandler::new(
                address,
                Arc::clone(&self.jobs),
                Arc::clone(&self.registry),
                Arc::clone(&self.stats),
            );
            (client, tokio::spawn(handler.handle(server)))
        }
    }

    fn addr() -> SocketAddr {
        "10.0.0.1:40000".parse().unwrap()
    }

    async fn read_notify(client: &mut BufReader<DuplexStream>) -> PoolMessage {
        let mut line = String::new();
        client.read_line(&mut line).await.unwrap();
        parse_pool_message(line.trim()).unwrap()
    }

    #[tokio::test]
    async fn test_sends_current_job_on_connect() {
        let harness = Harness::new(Target::default());
        let (client, handle) = harness.spawn(addr());
        let mut client = BufReader::new(client);

        let job = harness.jobs.current_job().await;
        match read_notify(&mut client).await {
            PoolMessage::Notify(notification) => {
                assert_eq!(notification.job_id, job.id);
                assert_eq!(notification.work_data, job.work_data);
                assert_eq!(notification.target, Target::default());
            }
            other => panic!("expected notify, got {:?}", other),
        }
        assert_eq!(harness.registry.len().await, 1);

        drop(client);
        handle.await.unwrap().unwrap();
        assert!(harness.registry.is_empty().await);
    }

    #[tokio::test]
    async fn test_accepts_and_rejects_against_target() {
        // Every digest is below MAX; none is below one.
        for (target, accepted) in [(Target::from_u256(U256::MAX).unwrap(), 1), (Target::from_u256(U256::one()).unwrap(), 0)] {
            let harness = Harness::new(target);
            let (client, handle) = harness.spawn(addr());
            let mut client = BufReader::new(client);
            read_notify(&mut client).await;

            client
                .write_all(b"{\"method\":\"submit\",\"params\":[42,\"ignored\"]}\n")
                .await
                .unwrap();
            drop(client);
            handle.await.unwrap().unwrap();

            assert_eq!(harness.stats.shares_submitted.load(Ordering::Relaxed), 1);
            assert_eq!(harness.stats.shares_accepted.load(Ordering::Relaxed), accepted);
            assert_eq!(harness.stats.last_nonce(), 42);
        }
    }

    #[tokio::test]
    async fn test_malformed_input_keeps_session_open() {
        let harness = Harness::new(Target::from_u256(U256::MAX).unwrap());
        let (client, handle) = harness.spawn(addr());
        let mut client = BufReader::new(client);
        read_notify(&mut client).await;

        client.write_all(b"not json\n\n[1,2]\n").await.unwrap();
        client.write_all(&[0xff, 0xfe, b'\n']).await.unwrap();
        client
            .write_all(b"{\"method\":\"submit\",\"params\":[]}\n{\"method\":\"hello\"}\n")
            .await
            .unwrap();
        client
            .write_all(b"{\"method\":\"submit\",\"params\":[\"7\",\"x\"]}\n")
            .await
            .unwrap();
        drop(client);
        handle.await.unwrap().unwrap();

        assert_eq!(harness.stats.malformed_messages.load(Ordering::Relaxed), 4);
        assert_eq!(harness.stats.shares_accepted.load(Ordering::Relaxed), 1);
        assert!(harness.registry.is_empty().await);
    }

    #[tokio::test]
    async fn test_over_length_line_is_discarded_before_its_newline() {
        let harness = Harness::new(Target::from_u256(U256::MAX).unwrap());
        let (client, handle) = harness.spawn(addr());
        let mut client = BufReader::new(client);
        read_notify(&mut client).await;

        let chunk = vec![b'a'; 64 * 1024];
        for _ in 0..16 {
            client.write_all(&chunk).await.unwrap();
        }
        // Counted while the oversized line is still open.
        tokio::time::timeout(std::time::Duration::from_secs(5), async {
            while harness.stats.malformed_messages.load(Ordering::Relaxed) < 1 {
                tokio::task::yield_now().await;
            }
        })
        .await
        .unwrap();
        assert_eq!(harness.registry.len().await, 1);

        client
            .write_all(b"aaaa\n{\"method\":\"submit\",\"params\":[9,\"x\"]}\n")
            .await
            .unwrap();
        drop(client);
        handle.await.unwrap().unwrap();

        assert_eq!(harness.stats.malformed_messages.load(Ordering::Relaxed), 1);
        assert_eq!(harness.stats.shares_accepted.load(Ordering::Relaxed), 1);
        assert!(harness.registry.is_empty().await);
    }

    #[tokio::test]
    async fn test_duplicate_address_is_refused() {
        let harness = Harness::new(Target::default());
        let job = harness.jobs.current_job().await;
        harness.registry.register(addr(), &job).await.unwrap();

        let (_client, handle) = harness.spawn(addr());
        let result = handle.await.unwrap();
        assert!(matches!(result, Err(PoolError::DuplicateSession { .. })));

        // The existing session is untouched.
        assert_eq!(harness.registry.len().await, 1);
        assert_eq!(harness.stats.connections_total.load(Ordering::Relaxed), 0);
    }
}

// Changelog:
// - v1.0.0 (2026-10-17): Per-connection handler.
//   - Registers the worker, pushes the current job, validates submissions
//     against the session snapshot and deregisters on close.
//   - Generic over the stream type so unit tests run on in-memory duplex pipes.
//   - Lines are framed by WorkerLineCodec; over-length lines count as malformed.
