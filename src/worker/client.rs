// Stratum Pool - Free and Open Source Software Statement
//
// This project, stratum-pool, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/worker/client.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file implements the TCP client the reference worker uses to reach the
// pool, located in the worker subdirectory.
//
// Tree Location:
// - src/worker/client.rs (pool TCP client logic)
// - Depends on: tokio, std

use crate::Result;
use std::net::SocketAddr;
use tokio::net::{TcpStream, lookup_host};

#[derive(Clone, Default)]
pub struct PoolClient;

impl PoolClient {
    pub fn new() -> Self {
        Self
    }

    /// Resolve `ip:port` directly, falling back to DNS for `host:port`
    pub async fn resolve_pool_address(pool: &str) -> Result<SocketAddr> {
        if let Ok(addr) = pool.parse::<SocketAddr>() {
            return Ok(addr);
        }

        let mut addrs = lookup_host(pool).await?;
        addrs
            .next()
            .ok_or_else(|| format!("No addresses found for {}", pool).into())
    }

    /// Connect with Nagle's algorithm disabled
    pub async fn connect(&self, pool: &str) -> Result<TcpStream> {
        let address = Self::resolve_pool_address(pool).await?;
        let stream = TcpStream::connect(address).await?;
        stream.set_nodelay(true)?;
        Ok(stream)
    }
}


// Changelog:
// - v1.0.0 (2026-10-17): Pool client for the reference worker.
//   - Direct address parse with DNS fallback; connects with TCP_NODELAY.
