//! Application error types using thiserror
//!
//! Error hierarchy:
//! - SourceError: A package source (sync databases, AUR, VCS store) failed
//! - InputError: Reading the selection line failed
//! - ConfigError: Issues with configuration files

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while querying a source of upgrades
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// The local package database could not be read
    #[error("failed to read local database: {message}")]
    LocalDb { message: String },

    /// An external command exited unsuccessfully
    #[error("command '{command}' failed: {message}")]
    CommandFailed { command: String, message: String },

    /// Network request failed
    #[error("failed to query {source_name}: {message}")]
    Network {
        source_name: String,
        message: String,
    },

    /// Invalid response from a remote index
    #[error("invalid response from {source_name}: {message}")]
    InvalidResponse {
        source_name: String,
        message: String,
    },

    /// Timeout
    #[error("timeout while querying {source_name}")]
    Timeout { source_name: String },

    /// VCS metadata store failure
    #[error("vcs store error: {message}")]
    Vcs { message: String },
}

/// Errors raised while reading the selection line
#[derive(Error, Debug)]
pub enum InputError {
    /// Standard input was closed before a line was read
    #[error("unexpected end of input")]
    EndOfInput,

    /// The line exceeded the read buffer
    #[error("input line exceeds {limit} bytes")]
    LineTooLong { limit: usize },

    /// Underlying read failure
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read a configuration file
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse a configuration file
    #[error("failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

impl SourceError {
    /// Creates a new LocalDb error
    pub fn local_db(message: impl Into<String>) -> Self {
        SourceError::LocalDb {
            message: message.into(),
        }
    }

    /// Creates a new CommandFailed error
    pub fn command_failed(command: impl Into<String>, message: impl Into<String>) -> Self {
        SourceError::CommandFailed {
            command: command.into(),
            message: message.into(),
        }
    }

    /// Creates a new Network error
    pub fn network(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        SourceError::Network {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    /// Creates a new InvalidResponse error
    pub fn invalid_response(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        SourceError::InvalidResponse {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    /// Creates a new Timeout error
    pub fn timeout(source_name: impl Into<String>) -> Self {
        SourceError::Timeout {
            source_name: source_name.into(),
        }
    }

    /// Creates a new Vcs error
    pub fn vcs(message: impl Into<String>) -> Self {
        SourceError::Vcs {
            message: message.into(),
        }
    }
}

impl ConfigError {
    /// Creates a new Read error
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::Read {
            path: path.into(),
            source,
        }
    }

    /// Creates a new Parse error
    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ConfigError::Parse {
            path: path.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_error_local_db() {
        let err = SourceError::local_db("no such directory");
        let msg = format!("{}", err);
        assert!(msg.contains("failed to read local database"));
        assert!(msg.contains("no such directory"));
    }

    #[test]
    fn test_source_error_command_failed() {
        let err = SourceError::command_failed("pacman -Sl", "exit status 1");
        let msg = format!("{}", err);
        assert!(msg.contains("pacman -Sl"));
        assert!(msg.contains("exit status 1"));
    }

    #[test]
    fn test_source_error_network() {
        let err = SourceError::network("AUR", "connection refused");
        let msg = format!("{}", err);
        assert!(msg.contains("failed to query AUR"));
        assert!(msg.contains("connection refused"));
    }

    #[test]
    fn test_source_error_timeout() {
        let err = SourceError::timeout("AUR");
        assert_eq!(format!("{}", err), "timeout while querying AUR");
    }

    #[test]
    fn test_input_error_messages() {
        assert_eq!(
            format!("{}", InputError::EndOfInput),
            "unexpected end of input"
        );
        let msg = format!("{}", InputError::LineTooLong { limit: 4096 });
        assert!(msg.contains("4096"));
    }

    #[test]
    fn test_config_error_parse() {
        let err = ConfigError::parse("/etc/aurup.toml", "expected `=`");
        let msg = format!("{}", err);
        assert!(msg.contains("failed to parse config file"));
        assert!(msg.contains("expected `=`"));
    }

    #[test]
    fn test_error_debug_trait() {
        let err = SourceError::timeout("AUR");
        let debug = format!("{:?}", err);
        assert!(debug.contains("Timeout"));
    }
}
