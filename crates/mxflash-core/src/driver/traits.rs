//! Driver trait definitions

use core::fmt;

use crate::chip::ModeScan;
use crate::error::{Error, Result};
use crate::spi::{AddressMode, IoMode};

/// Outcome of a single, non-blocking busy probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusyStatus {
    /// Device accepts new commands
    Ready,
    /// A program or erase is still running
    Busy,
}

/// Answer of a lock-status query
///
/// Kept separate from [`Error`] so that "the query failed" and "the query
/// succeeded and the region is locked" can never be confused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockStatus {
    /// Every block in the range is protected
    Locked,
    /// At least one block in the range is writable
    Unlocked,
}

impl fmt::Display for LockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Locked => write!(f, "locked"),
            Self::Unlocked => write!(f, "unlocked"),
        }
    }
}

/// Low-level driver for an MX25R-class flash and its controller
///
/// This trait represents the external driver library: controller setup,
/// device probing, and the command primitives for each addressing width.
/// [`crate::flash::FlashDevice`] sequences and dispatches these calls but
/// never encodes a command itself.
///
/// `Controller` is the private controller state created by
/// [`software_init`](Self::software_init). It is owned by the device handle
/// and lent back to every other call.
///
/// ## Primitives
///
/// Each of read, program and erase comes in a 3-byte and a 4-byte flavour.
/// The handle picks one flavour per operation at bring-up and sticks to it.
/// Any polling for program/erase completion happens inside the primitive;
/// a primitive that gives up reports [`Error::Timeout`].
///
/// ## Ancillary commands
///
/// Mode change, suspend/resume, power management, OTP and block protection
/// are forwarded by the handle without any policy. Their default
/// implementations return [`Error::Unsupported`].
pub trait MxDriver {
    /// Controller state produced by software initialization
    type Controller;

    // =========================================================================
    // Bring-up
    // =========================================================================

    /// Bind the controller at `base_address`
    ///
    /// Failure here means the controller cannot be addressed at all.
    fn software_init(&mut self, base_address: u32) -> Result<Self::Controller>;

    /// Run the physical bring-up sequence of the controller
    fn hardware_init(&mut self, ctrl: &mut Self::Controller) -> Result<()>;

    /// Probe the device for its addressing mode and optional commands
    fn scan_mode(&mut self, ctrl: &mut Self::Controller) -> Result<ModeScan>;

    /// Issue a software reset to return the device to a known command state
    fn chip_reset(&mut self, ctrl: &mut Self::Controller) -> Result<()>;

    /// Check once whether the device is busy; must not wait
    fn busy_status(&mut self, ctrl: &mut Self::Controller) -> BusyStatus;

    // =========================================================================
    // Array access primitives
    // =========================================================================

    /// Read `buf.len()` bytes using the 3-byte READ command
    fn read_3b(&mut self, ctrl: &mut Self::Controller, addr: u32, buf: &mut [u8]) -> Result<()>;

    /// Read `buf.len()` bytes using the 4-byte READ4B command
    fn read_4b(&mut self, ctrl: &mut Self::Controller, addr: u32, buf: &mut [u8]) -> Result<()>;

    /// Program `data` using the 3-byte PP command
    fn program_3b(&mut self, ctrl: &mut Self::Controller, addr: u32, data: &[u8]) -> Result<()>;

    /// Program `data` using the 4-byte PP4B command
    fn program_4b(&mut self, ctrl: &mut Self::Controller, addr: u32, data: &[u8]) -> Result<()>;

    /// Erase `count` 64 KiB blocks starting at `addr` using the 3-byte BE command
    fn erase_block_3b(&mut self, ctrl: &mut Self::Controller, addr: u32, count: u32)
        -> Result<()>;

    /// Erase `count` 64 KiB blocks starting at `addr` using the 4-byte BE4B command
    fn erase_block_4b(&mut self, ctrl: &mut Self::Controller, addr: u32, count: u32)
        -> Result<()>;

    // =========================================================================
    // Ancillary commands (optional)
    // =========================================================================

    /// Switch the bus I/O mode and the device addressing mode
    fn change_mode(
        &mut self,
        _ctrl: &mut Self::Controller,
        _io_mode: IoMode,
        _addr_mode: AddressMode,
    ) -> Result<()> {
        Err(Error::Unsupported)
    }

    /// Suspend a running program or erase
    fn suspend(&mut self, _ctrl: &mut Self::Controller) -> Result<()> {
        Err(Error::Unsupported)
    }

    /// Resume a suspended program or erase
    fn resume(&mut self, _ctrl: &mut Self::Controller) -> Result<()> {
        Err(Error::Unsupported)
    }

    /// Enter deep power down
    fn deep_power_down(&mut self, _ctrl: &mut Self::Controller) -> Result<()> {
        Err(Error::Unsupported)
    }

    /// Release from deep power down
    fn release_deep_power_down(&mut self, _ctrl: &mut Self::Controller) -> Result<()> {
        Err(Error::Unsupported)
    }

    /// Enter the secured OTP area
    fn enter_otp(&mut self, _ctrl: &mut Self::Controller) -> Result<()> {
        Err(Error::Unsupported)
    }

    /// Leave the secured OTP area
    fn exit_otp(&mut self, _ctrl: &mut Self::Controller) -> Result<()> {
        Err(Error::Unsupported)
    }

    /// Write-protect the blocks covering `addr..addr + len`
    fn lock(&mut self, _ctrl: &mut Self::Controller, _addr: u32, _len: u64) -> Result<()> {
        Err(Error::Unsupported)
    }

    /// Remove write protection from the blocks covering `addr..addr + len`
    fn unlock(&mut self, _ctrl: &mut Self::Controller, _addr: u32, _len: u64) -> Result<()> {
        Err(Error::Unsupported)
    }

    /// Query the write protection of the blocks covering `addr..addr + len`
    fn lock_status(
        &mut self,
        _ctrl: &mut Self::Controller,
        _addr: u32,
        _len: u64,
    ) -> Result<LockStatus> {
        Err(Error::Unsupported)
    }

    /// Set the dynamic protection bits covering `addr..addr + len`
    fn dpb_lock(&mut self, _ctrl: &mut Self::Controller, _addr: u32, _len: u64) -> Result<()> {
        Err(Error::Unsupported)
    }

    /// Clear the dynamic protection bits covering `addr..addr + len`
    fn dpb_unlock(&mut self, _ctrl: &mut Self::Controller, _addr: u32, _len: u64) -> Result<()> {
        Err(Error::Unsupported)
    }

    /// Query the dynamic protection bits covering `addr..addr + len`
    fn dpb_lock_status(
        &mut self,
        _ctrl: &mut Self::Controller,
        _addr: u32,
        _len: u64,
    ) -> Result<LockStatus> {
        Err(Error::Unsupported)
    }
}
