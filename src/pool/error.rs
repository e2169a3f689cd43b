// Stratum Pool - Free and Open Source Software Statement
//
// This project, stratum-pool, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/pool/error.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file defines the error type of the pool server, located in the pool
// subdirectory. Per-connection variants end only that connection; Bind is the
// one error that stops the server.
//
// Tree Location:
// - src/pool/error.rs (pool error enum)
// - Depends on: thiserror, pool::messages

use crate::pool::messages::MessageError;
use std::net::SocketAddr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PoolError {
    #[error("Worker session for {address} is already registered")]
    DuplicateSession { address: SocketAddr },

    #[error("No worker session registered for {address}")]
    SessionNotFound { address: SocketAddr },

    #[error("Failed to bind pool listener on {address}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Connection I/O failed: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("Invalid worker message: {source}")]
    Message {
        #[from]
        source: MessageError,
    },
}


// Changelog:
// - v1.0.0 (2026-10-17): Pool error type.
//   - Session, bind, I/O and message variants built with thiserror.
//   - I/O and message errors render their cause.
