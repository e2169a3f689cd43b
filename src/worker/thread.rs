// Stratum Pool - Free and Open Source Software Statement
//
// This project, stratum-pool, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/worker/thread.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file contains the mining threads of the reference worker, located in
// the worker subdirectory. Each OS thread scans an interleaved slice of the
// job's nonce range and queues submissions for the connection writer.

use crate::core::{Target, share_digest};
use crate::pool::protocol::StratumProtocol;
use crate::stats::WorkerStats;
use log::{debug, info};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::UnboundedSender;

const LOG_TARGET: &str = "stratum_pool::worker::thread";

/// A progress message is sent for every nonce divisible by this
pub const PROGRESS_INTERVAL: u64 = 1_000_000;

const HASH_REPORT_BATCH: u64 = 1024;

/// Job as seen by the mining threads
#[derive(Debug, Clone)]
pub struct MiningJob {
    pub job_id: String,
    pub work_data: String,
    pub target: Target,
    /// Scanned range is `[start, end)`
    pub start: u64,
    pub end: u64,
}

pub fn start_mining_thread(
    thread_id: usize,
    num_threads: usize,
    job: Arc<MiningJob>,
    outbound: UnboundedSender<String>,
    stats: Arc<WorkerStats>,
    should_stop: Arc<AtomicBool>,
) -> JoinHandle<()> {
    std::thread::spawn(move || {
        mining_thread(thread_id, num_threads, &job, &outbound, &stats, &should_stop);
    })
}

fn mining_thread(
    thread_id: usize,
    num_threads: usize,
    job: &MiningJob,
    outbound: &UnboundedSender<String>,
    stats: &WorkerStats,
    should_stop: &AtomicBool,
) {
    let stride = num_threads.max(1) as u64;
    let mut hash_count = 0u64;
    let mut last_report = Instant::now();
    let mut next = job.start.checked_add(thread_id as u64);

    debug!(target: LOG_TARGET, "Thread {}: mining job {} from {:?}", thread_id, job.job_id, next);

    while let Some(nonce) = next.filter(|n| *n < job.end) {
        if should_stop.load(Ordering::Relaxed) {
            break;
        }

        let digest = share_digest(&job.work_data, &nonce.to_string());
        hash_count += 1;

        if job.target.is_met_by_bytes(&digest) {
            let hash = hex::encode(digest);
            stats.record_share();
            info!(target: LOG_TARGET, "💎 Thread {} found share! Nonce: {}, Hash: {}", thread_id, nonce, hash);

            let message = StratumProtocol::to_message(StratumProtocol::create_submit_request(nonce, &hash, thread_id));
            if outbound.send(message).is_err() {
                break;
            }
        }

        if nonce % PROGRESS_INTERVAL == 0 {
            stats.set_current_nonce(nonce);
            let message = StratumProtocol::to_message(StratumProtocol::create_progress(nonce, thread_id));
            if outbound.send(message).is_err() {
                break;
            }
        }

        if hash_count >= HASH_REPORT_BATCH && last_report.elapsed() > Duration::from_millis(250) {
            stats.record_hashes(hash_count);
            stats.set_current_nonce(nonce);
            hash_count = 0;
            last_report = Instant::now();
        }

        next = nonce.checked_add(stride);
    }

    stats.record_hashes(hash_count);
    debug!(target: LOG_TARGET, "Thread {}: stopped on job {}", thread_id, job.job_id);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::U256;
    use crate::pool::messages::{WorkerMessage, parse_worker_message};
    use std::sync::atomic::Ordering;
    use tokio::sync::mpsc;

    fn job(target: Target, start: u64, end: u64) -> Arc<MiningJob> {
        Arc::new(MiningJob {
            job_id: "1".to_string(),
            work_data: "0123456789abcdef".to_string(),
            target,
            start,
            end,
        })
    }

    #[test]
    fn test_threads_cover_range_without_overlap() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let stats = Arc::new(WorkerStats::new());
        let stop = Arc::new(AtomicBool::new(false));
        let job = job(Target::from_u256(U256::MAX).unwrap(), 100, 140);

        let handles: Vec<_> = (0..3)
            .map(|i| start_mining_thread(i, 3, Arc::clone(&job), tx.clone(), Arc::clone(&stats), Arc::clone(&stop)))
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        drop(tx);

        let mut nonces = Vec::new();
        while let Ok(line) = rx.try_recv() {
            if let WorkerMessage::Submit { nonce, .. } = parse_worker_message(line.trim()).unwrap() {
                nonces.push(nonce.as_u64().unwrap());
            }
        }
        nonces.sort_unstable();
        assert_eq!(nonces, (100..140).collect::<Vec<u64>>());
        assert_eq!(stats.hashes_tried.load(Ordering::Relaxed), 40);
        assert_eq!(stats.shares_found.load(Ordering::Relaxed), 40);
    }

    #[test]
    fn test_progress_sent_on_interval_boundary() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let stats = Arc::new(WorkerStats::new());
        let stop = Arc::new(AtomicBool::new(false));
        // Nothing meets a target of one, so only progress is emitted.
        let job = job(Target::from_u256(U256::one()).unwrap(), PROGRESS_INTERVAL - 2, PROGRESS_INTERVAL + 2);

        start_mining_thread(0, 1, job, tx, Arc::clone(&stats), stop).join().unwrap();

        let line = rx.try_recv().unwrap();
        match parse_worker_message(line.trim()).unwrap() {
            WorkerMessage::Progress { nonce, thread_id } => {
                assert_eq!(nonce.as_u64(), Some(PROGRESS_INTERVAL));
                assert_eq!(thread_id, Some(0));
            }
            other => panic!("expected progress, got {:?}", other),
        }
        assert!(rx.try_recv().is_err());
        assert_eq!(stats.current_nonce(), PROGRESS_INTERVAL);
    }

    #[test]
    fn test_stop_flag_halts_thread() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let stats = Arc::new(WorkerStats::new());
        let stop = Arc::new(AtomicBool::new(true));
        let job = job(Target::default(), 0, u64::MAX);

        start_mining_thread(0, 1, job, tx, Arc::clone(&stats), stop).join().unwrap();
        assert_eq!(stats.hashes_tried.load(Ordering::Relaxed), 0);
    }
}

// Changelog:
// - v1.0.0 (2026-10-17): Mining threads for the reference worker.
//   - Interleaved nonce scan, submit for every digest below target,
//     progress every million nonces, batched hash accounting.
