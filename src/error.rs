//! Error types for reward-tracker.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("caller is not the admin")]
    NotAuthorized,

    #[error("invalid arguments, usage: {usage}")]
    InvalidArguments { usage: &'static str },

    #[error("amount would overflow the ledger")]
    AmountOutOfRange,

    #[error("worker not found: {0}")]
    UnknownWorker(String),

    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("ledger file {path:?} is corrupt: {source}")]
    StorageCorrupt {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("telegram api error: {0}")]
    Telegram(String),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Short stable label used for metrics and span fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::NotAuthorized => "not_authorized",
            Error::InvalidArguments { .. } => "invalid_arguments",
            Error::AmountOutOfRange => "amount_out_of_range",
            Error::UnknownWorker(_) => "unknown_worker",
            Error::UnknownCommand(_) => "unknown_command",
            Error::StorageCorrupt { .. } => "storage_corrupt",
            Error::Config(_) => "config",
            Error::Telegram(_) => "telegram",
            Error::Http(_) => "http",
            Error::Io(_) => "io",
            Error::Json(_) => "json",
            Error::Other(_) => "other",
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
