//! Top-level error type aggregating the per-component errors so `main` has
//! a single `Result` to propagate and a single place to map to exit codes.

use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to read config file {path}: {source}")]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to bind listening socket on {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        #[source]
        source: std::io::Error,
    },
    #[error("no listen addresses configured (use `listen` in the config file or --listen)")]
    NoListenAddresses,
}
