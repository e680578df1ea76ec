//! Error types for mxflash-core
//!
//! This module provides a no_std compatible error type shared by the core
//! and by the collaborators implementing [`crate::driver::MxDriver`]. Errors
//! reported by a collaborator are passed through to the caller unchanged.

use core::fmt;

/// Core error type - no_std compatible, Copy for efficiency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A bring-up step or flash operation failed
    Failure,
    /// Operation rejected because the device is busy or a buffered write is
    /// in progress
    DeviceBusy,
    /// The collaborator gave up waiting for the device (program/erase polling)
    Timeout,
    /// The handle has not completed bring-up
    NotInitialized,
    /// The collaborator does not provide this capability
    Unsupported,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failure => write!(f, "flash operation failed"),
            Self::DeviceBusy => write!(f, "device busy"),
            Self::Timeout => write!(f, "operation timed out"),
            Self::NotInitialized => write!(f, "device not initialized"),
            Self::Unsupported => write!(f, "operation not supported by driver"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Result type alias using the core Error type
pub type Result<T> = core::result::Result<T, Error>;
