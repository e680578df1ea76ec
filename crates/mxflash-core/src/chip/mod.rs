//! Chip characterization produced by the mode scan
//!
//! This module contains the capability flags a specific chip instance
//! reports and the result record of the bring-up mode scan.

mod features;

pub use features::CmdCaps;

use crate::spi::AddressMode;

/// Result of probing the device during bring-up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModeScan {
    /// Addressing mode the device is currently in
    pub mode: AddressMode,
    /// Optional command variants this chip instance accepts
    pub caps: CmdCaps,
}

impl ModeScan {
    /// Create a scan result from its parts
    pub const fn new(mode: AddressMode, caps: CmdCaps) -> Self {
        Self { mode, caps }
    }
}
