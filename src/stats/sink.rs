// Stratum Pool - Free and Open Source Software Statement
//
// This project, stratum-pool, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/stats/sink.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file defines the interface to the external stats dashboard, located in
// the stats subdirectory. The dashboard is not part of this crate; the pool
// and worker only push counters to it through a StatsSink.
//
// Tree Location:
// - src/stats/sink.rs (StatsSink trait and HTTP client)
// - Depends on: async-trait, reqwest, serde

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

const LOG_TARGET: &str = "stratum_pool::stats::sink";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("Invalid stats endpoint: {url}")]
    InvalidUrl { url: String },

    #[error("Stats request failed")]
    Http {
        #[from]
        source: reqwest::Error,
    },

    #[error("Stats endpoint returned HTTP {status}")]
    Status { status: u16 },
}

/// Counters pushed to the dashboard's `POST /update`. Only the fields owned
/// by this crate are sent; the dashboard merges them and stamps
/// `last_update` itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsUpdate {
    pub tried: u64,
    pub hashrate: f64,
    pub current_nonce: u64,
    pub block_height: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_end: Option<String>,
}

/// Anything that can produce a stats update on demand
pub trait StatsSource: Send + Sync {
    fn stats_update(&self) -> StatsUpdate;
}

/// Receiver of aggregate counters
#[async_trait]
pub trait StatsSink: Send + Sync {
    async fn push(&self, update: &StatsUpdate) -> Result<(), StatsError>;
}

/// HTTP client for the dashboard API (`POST /update`, `GET /stats`)
#[derive(Clone)]
pub struct HttpStatsSink {
    client: Client,
    base_url: String,
}

impl HttpStatsSink {
    /// Accepts `host:port` or a full `http(s)://` base URL
    pub fn new(base_url: &str) -> Result<Self, StatsError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(StatsError::InvalidUrl {
                url: base_url.to_string(),
            });
        }
        let base_url = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            trimmed.to_string()
        } else {
            format!("http://{}", trimmed)
        };

        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Current merged stats object held by the dashboard
    pub async fn fetch(&self) -> Result<Value, StatsError> {
        let url = format!("{}/stats", self.base_url);
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(StatsError::Status {
                status: response.status().as_u16(),
            });
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl StatsSink for HttpStatsSink {
    async fn push(&self, update: &StatsUpdate) -> Result<(), StatsError> {
        let url = format!("{}/update", self.base_url);
        let response = self.client.post(&url).json(update).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(StatsError::Status {
                status: status.as_u16(),
            });
        }
        debug!(target: LOG_TARGET, "📡 Stats pushed to {} (tried={}, hashrate={:.2})", url, update.tried, update.hashrate);
        Ok(())
    }
}


// Changelog:
// - v1.0.0 (2026-10-17): Initial stats sink interface.
//   - Purpose: Lets the pool and worker push counters to the dashboard API.
//   - Features: StatsSource/StatsSink traits, reqwest-based HttpStatsSink
//     with push and fetch, typed StatsError.
