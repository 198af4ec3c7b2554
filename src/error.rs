use std::path::PathBuf;
use thiserror::Error;

use crate::caja::{SessionAction, SessionStatus};

#[derive(Error, Debug)]
pub enum CajaError {
    #[error("Config directory not found at {0}. Run 'caja init' to create it.")]
    ConfigNotFound(PathBuf),

    #[error("Config file not found: {0}")]
    ConfigFileNotFound(PathBuf),

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to write {path}: {reason}")]
    ConfigWrite { path: PathBuf, reason: String },

    #[error("Config directory already exists at {0}")]
    AlreadyInitialized(PathBuf),

    #[error("Not logged in. Run 'caja login --user <id> --name <name>' first.")]
    NotLoggedIn,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not reach the cash register API: {0}")]
    Http(#[from] ureq::Error),

    #[error("API responded {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Unexpected API response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Cash session '{0}' not found")]
    SessionNotFound(String),

    #[error("Action '{action}' is not available for a {status} session")]
    ActionNotAllowed {
        action: SessionAction,
        status: SessionStatus,
    },

    #[error("You already have an open cash session ({0}). Close it before opening a new one.")]
    SessionAlreadyOpen(String),

    #[error("Amount must be {0}")]
    InvalidAmount(&'static str),

    #[error("Invalid date '{0}'. Expected YYYY-MM-DD.")]
    InvalidDate(String),

    #[error("Invalid history filter: {0}")]
    InvalidFilter(String),
}

pub type Result<T> = std::result::Result<T, CajaError>;
