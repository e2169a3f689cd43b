// Stratum Pool - Free and Open Source Software Statement
//
// This project, stratum-pool, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/logging.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file installs the logging backend for both binaries. Library code
// only uses the `log` facade; a binary picks log4rs when given a YAML file
// and the tracing-subscriber console logger otherwise.

use crate::Result;
use std::path::Path;

/// Install the global logger. Must be called once, before any task starts.
pub fn init_logging(log_config: Option<&Path>) -> Result<()> {
    match log_config {
        Some(path) => {
            log4rs::init_file(path, Default::default())
                .map_err(|e| format!("Could not load log config {}: {}", path.display(), e))?;
        }
        None => {
            tracing_subscriber::fmt::try_init()?;
        }
    }
    Ok(())
}
