//! Process-level error types.
//!
//! These cover failures that are the server's fault, not the client's.
//! Per-request protocol errors (invalid length, invalid parameter) are not
//! modeled here — they are ordinary wire responses written by the handlers
//! in [`crate::handlers`], never a Rust `Err`.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("failed to bind listen socket on {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid server address '{0}'")]
    InvalidAddress(String),

    #[error("session I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config file error at {path}: {source}")]
    Config {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
