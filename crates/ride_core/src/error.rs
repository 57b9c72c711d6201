use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RideError {
    #[error("no driver available to match")]
    DriverMatchFailed,

    #[error("driver match still pending")]
    DriverMatchPending,

    #[error("ride session has already ended")]
    SessionExpired,

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, RideError>;
