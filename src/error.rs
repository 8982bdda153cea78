//! Error types for the msrv CLI
//!
//! Every error is terminal for the current invocation. Each variant maps to
//! the process exit code reported to the caller.

use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

/// Main error type for msrv
#[derive(Error, Debug)]
pub enum MsrvError {
    /// Remote user or host is not configured
    #[error("Production deployment requires SSH_USER and SSH_HOST in .env")]
    MissingCredentials,

    /// User or host would be parsed as a command-line option by ssh/scp
    #[error("Invalid SSH_USER/SSH_HOST value '{value}': must not start with '-'")]
    InvalidTarget { value: String },

    /// Configured private key does not exist
    #[error("PEM Key not found at: {}", .path.display())]
    KeyNotFound { path: PathBuf },

    /// Required compose definition is absent
    #[error("Error: {} missing.", .path.display())]
    ComposeFileMissing { path: PathBuf },

    /// Hosts file is absent, the platform is not supported
    #[error("Error: {} not found. Are you on Linux/macOS?", .path.display())]
    HostsFileNotFound { path: PathBuf },

    /// Privileged append to the hosts file exited non-zero
    #[error(
        "ERROR: Failed to update hosts file {}.\nPlease run the script with necessary permissions or add the entry manually.",
        .path.display()
    )]
    HostsWriteFailed {
        path: PathBuf,
        #[source]
        source: Box<MsrvError>,
    },

    /// An executed step exited non-zero
    #[error("ERROR: {label}\nCommand returned exit code {exit_code}")]
    ExternalCommandFailed {
        label: String,
        command: String,
        exit_code: i32,
    },

    /// File system operation errors
    #[error("File system error: {operation} failed on {}", .path.display())]
    FileSystem {
        operation: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl MsrvError {
    /// Create a new invalid-target error
    pub fn invalid_target(value: impl Into<String>) -> Self {
        Self::InvalidTarget {
            value: value.into(),
        }
    }

    /// Create a new key-not-found error
    pub fn key_not_found<P: Into<PathBuf>>(path: P) -> Self {
        Self::KeyNotFound { path: path.into() }
    }

    /// Create a new compose-file-missing error
    pub fn compose_file_missing<P: Into<PathBuf>>(path: P) -> Self {
        Self::ComposeFileMissing { path: path.into() }
    }

    /// Create a new hosts-file-not-found error
    pub fn hosts_file_not_found<P: Into<PathBuf>>(path: P) -> Self {
        Self::HostsFileNotFound { path: path.into() }
    }

    /// Wrap a failed elevated append
    pub fn hosts_write_failed<P: Into<PathBuf>>(path: P, source: MsrvError) -> Self {
        Self::HostsWriteFailed {
            path: path.into(),
            source: Box::new(source),
        }
    }

    /// Create a new external command failure
    pub fn external_command(
        label: impl Into<String>,
        command: impl Into<String>,
        exit_code: i32,
    ) -> Self {
        Self::ExternalCommandFailed {
            label: label.into(),
            command: command.into(),
            exit_code,
        }
    }

    /// Create a new file system error
    pub fn file_system<P: Into<PathBuf>>(
        operation: impl Into<String>,
        path: P,
        source: std::io::Error,
    ) -> Self {
        Self::FileSystem {
            operation: operation.into(),
            path: path.into(),
            source,
        }
    }

    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Process exit code for this error.
    ///
    /// Executed steps report the subprocess's own status; everything else,
    /// validation included, exits with 1.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ExternalCommandFailed { exit_code, .. } => *exit_code,
            _ => 1,
        }
    }

    /// [`Self::exit_code`] narrowed to a process exit status.
    ///
    /// Codes outside `0..=255` (possible on Windows) cannot be passed through
    /// and become 1.
    #[must_use]
    pub fn exit_status(&self) -> u8 {
        let code = self.exit_code();
        u8::try_from(code).unwrap_or_else(|_| {
            debug!("Exit status {} out of range, exiting with 1", code);
            1
        })
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, MsrvError>;
