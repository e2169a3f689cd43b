// Stratum Pool - Free and Open Source Software Statement
//
// This project, stratum-pool, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/pool/job_manager.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file implements job generation and rotation for the pool, located in
// the pool subdirectory. The active job lives behind a single mutex shared by
// the rotation task and every connection's registration step.
//
// Tree Location:
// - src/pool/job_manager.rs (active job holder and rotation timer)
// - Depends on: tokio, core::sha256, core::types

use crate::core::{Job, Target, work_data_from_seed};
use log::{debug, info};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{Instant, interval_at};

const LOG_TARGET: &str = "stratum_pool::pool::job_manager";

pub const DEFAULT_ROTATION_INTERVAL: Duration = Duration::from_secs(10);

struct JobState {
    current: Option<Arc<Job>>,
    last_id: u64,
}

/// Owns the active job. `current_job` and `rotate` are serialized by one
/// mutex, so no caller observes a partially built job.
pub struct JobManager {
    target: Target,
    state: Mutex<JobState>,
    issued: AtomicU64,
}

impl JobManager {
    pub fn new(target: Target) -> Self {
        Self {
            target,
            state: Mutex::new(JobState {
                current: None,
                last_id: 0,
            }),
            issued: AtomicU64::new(0),
        }
    }

    pub fn target(&self) -> Target {
        self.target
    }

    /// Number of jobs created so far (lazy init included)
    pub fn jobs_issued(&self) -> u64 {
        self.issued.load(Ordering::Relaxed)
    }

    /// Active job, created on first use
    pub async fn current_job(&self) -> Arc<Job> {
        let mut state = self.state.lock().await;
        if let Some(job) = &state.current {
            return Arc::clone(job);
        }
        let job = self.create_job(&mut state);
        debug!(target: LOG_TARGET, "Created initial job {}", job.id);
        job
    }

    /// Replace the active job with a freshly derived one
    pub async fn rotate(&self) -> Arc<Job> {
        let mut state = self.state.lock().await;
        self.create_job(&mut state)
    }

    /// Start the rotation timer; the first rotation happens one interval
    /// after the call, then once per interval for as long as the task lives.
    pub fn spawn_rotation(self: Arc<Self>, period: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            loop {
                ticker.tick().await;
                let job = self.rotate().await;
                info!(target: LOG_TARGET, "🔄 Job updated: {} (data: {})", job.id, job.work_data);
            }
        })
    }

    // Ids are millisecond timestamps forced strictly increasing, so two
    // rotations inside the same millisecond still get distinct ids and data.
    fn create_job(&self, state: &mut JobState) -> Arc<Job> {
        let now_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();
        let id = now_ms.max(state.last_id + 1);
        state.last_id = id;

        let id = id.to_string();
        let work_data = work_data_from_seed(&id);
        let job = Arc::new(Job::new(id, work_data, self.target));
        state.current = Some(Arc::clone(&job));
        self.issued.fetch_add(1, Ordering::Relaxed);
        job
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sha256::WORK_DATA_HEX_LEN;
    use std::collections::HashSet;

    #[tokio::test]
    async fn test_lazy_init_returns_same_job() {
        let manager = JobManager::new(Target::default());
        assert_eq!(manager.jobs_issued(), 0);
        let first = manager.current_job().await;
        let second = manager.current_job().await;
        assert_eq!(first, second);
        assert_eq!(manager.jobs_issued(), 1);
        assert_eq!(first.work_data.len(), WORK_DATA_HEX_LEN);
        assert_eq!(first.target, Target::default());
    }

    #[tokio::test]
    async fn test_concurrent_callers_see_single_creation() {
        let manager = Arc::new(JobManager::new(Target::default()));
        let mut handles = Vec::new();
        for _ in 0..16 {
            let manager = Arc::clone(&manager);
            handles.push(tokio::spawn(async move { manager.current_job().await.id.clone() }));
        }
        let mut ids = HashSet::new();
        for handle in handles {
            ids.insert(handle.await.unwrap());
        }
        assert_eq!(ids.len(), 1);
        assert_eq!(manager.jobs_issued(), 1);
    }

    #[tokio::test]
    async fn test_rotate_produces_unique_ids() {
        let manager = JobManager::new(Target::default());
        let mut ids = HashSet::new();
        for _ in 0..50 {
            let job = manager.rotate().await;
            assert!(ids.insert(job.id.clone()), "duplicate job id {}", job.id);
        }
        assert_eq!(manager.jobs_issued(), 50);
    }

    #[tokio::test]
    async fn test_rotate_replaces_current_job() {
        let manager = JobManager::new(Target::default());
        let before = manager.current_job().await;
        let rotated = manager.rotate().await;
        let after = manager.current_job().await;
        assert_ne!(before.id, rotated.id);
        assert_ne!(before.work_data, rotated.work_data);
        assert_eq!(rotated, after);
        // The superseded job is still intact for anyone holding it.
        assert_eq!(before.work_data.len(), WORK_DATA_HEX_LEN);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rotation_timer_fires_once_per_interval() {
        let manager = Arc::new(JobManager::new(Target::default()));
        let handle = Arc::clone(&manager).spawn_rotation(Duration::from_secs(10));

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(manager.jobs_issued(), 0);

        tokio::time::sleep(Duration::from_secs(6)).await;
        assert_eq!(manager.jobs_issued(), 1);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(manager.jobs_issued(), 2);

        handle.abort();
    }
}

// Changelog:
// - v1.0.0 (2026-10-17): Initial job manager.
//   - Purpose: Generates and rotates pool jobs behind a mutex.
//   - Features: Lazy first job, strictly increasing millisecond ids,
//     background rotation task on a fixed interval.
