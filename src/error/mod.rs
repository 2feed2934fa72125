//! # Error Module
//!
//! Error types for the duplicate finder.
//!
//! ## Design Principles
//! - **Never panic** on library data - return errors instead
//! - **Include context** - paths, URLs, status codes
//! - Only session and configuration errors abort a run; everything that
//!   happens to a single candidate is reported and the run continues

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum PlexDupesError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Library error: {0}")]
    Library(#[from] LibraryError),

    #[error("Decision log error: {0}")]
    Record(#[from] RecordError),
}

/// Errors loading or writing the configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config file {path} is not valid: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("Failed to write config file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config file {path} already exists. Pass --force to overwrite it.")]
    AlreadyExists { path: PathBuf },

    #[error("Invalid Plex server URL {url:?}: {reason}")]
    InvalidServerUrl { url: String, reason: String },
}

/// Errors talking to the Plex server
#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("Could not connect to {server}: {reason}")]
    Connect { server: String, reason: String },

    #[error("Library section {name:?} does not exist on the server")]
    SectionNotFound { name: String },

    #[error("Request to {url} failed: {reason}")]
    Request { url: String, reason: String },

    #[error("Request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Unexpected response from {url}: {reason}")]
    Decode { url: String, reason: String },
}

/// Errors appending to the decision log
#[derive(Error, Debug)]
pub enum RecordError {
    #[error("Failed to open decision log {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write decision log {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize decision: {0}")]
    Serialize(String),
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, PlexDupesError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_includes_path() {
        let error = ConfigError::Parse {
            path: PathBuf::from("/etc/plex-dupefinder/config.json"),
            reason: "expected value at line 3".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("/etc/plex-dupefinder/config.json"));
        assert!(message.contains("line 3"));
    }

    #[test]
    fn status_error_includes_code() {
        let error = LibraryError::Status {
            url: "https://plex.local/library/metadata/12/media/7".to_string(),
            status: 401,
        };
        let message = error.to_string();
        assert!(message.contains("401"));
        assert!(message.contains("/media/7"));
    }

    #[test]
    fn existing_config_suggests_force() {
        let error = ConfigError::AlreadyExists {
            path: PathBuf::from("config.json"),
        };
        assert!(error.to_string().contains("--force"));
    }

    #[test]
    fn library_error_converts_to_top_level() {
        let error: PlexDupesError = LibraryError::SectionNotFound {
            name: "Movies".to_string(),
        }
        .into();
        assert!(matches!(error, PlexDupesError::Library(_)));
        assert!(error.to_string().contains("\"Movies\""));
    }
}
