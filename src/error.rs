//! Error type for the command line tool

use std::path::PathBuf;

use mxflash_core::config::ConfigError;
use thiserror::Error;

/// Errors reported by `mxflash` commands
#[derive(Debug, Error)]
pub enum CliError {
    /// The flash device or its driver reported an error
    #[error("Flash operation failed: {0}")]
    Flash(#[from] mxflash_core::Error),

    /// Failed to load the configuration file
    #[error("Failed to load {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: ConfigError,
    },

    /// Failed to access a file given on the command line
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Data read back differs from what was written
    #[error("Verify failed at 0x{addr:08X} (erase the range before writing)")]
    VerifyFailed { addr: u32 },

    /// Invalid option value
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl CliError {
    /// Attach a file name to an I/O error
    pub fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        CliError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Result type for `mxflash` commands
pub type Result<T> = std::result::Result<T, CliError>;
