//! Diagnostic logging setup.

use std::{fs::File, path::Path, sync::Mutex};

use tracing_subscriber::EnvFilter;

use crate::error::AppError;

/// Environment variable holding the log filter, e.g. `TYPIST_LOG=debug`.
pub const LOG_ENV: &str = "TYPIST_LOG";

fn filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Install a global `tracing` subscriber writing to `log_file`, or to stderr
/// when no file is given.
pub fn init(log_file: Option<&Path>) -> Result<(), AppError> {
    let result = match log_file {
        Some(path) => {
            let file = File::create(path).map_err(|source| AppError::FileAccess {
                path: path.to_path_buf(),
                source,
            })?;
            tracing_subscriber::fmt()
                .with_env_filter(filter())
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => tracing_subscriber::fmt()
            .with_env_filter(filter())
            .with_writer(std::io::stderr)
            .try_init(),
    };
    result.map_err(|e| AppError::Logging(e.to_string()))
}
