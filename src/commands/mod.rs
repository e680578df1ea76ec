//! CLI command implementations
//!
//! Every command runs against a [`Device`] that has already been brought up.
//! Array access goes through the handle's read/write/erase facade; the
//! remaining commands use its pass-through methods.

pub mod erase;
pub mod info;
pub mod protect;
pub mod read;
pub mod write;

use indicatif::{ProgressBar, ProgressStyle};
use mxflash_core::flash::FlashDevice;
use mxflash_dummy::DummyFlash;

use crate::error::{CliError, Result};

/// Device handle driving the emulated chip
pub type Device = FlashDevice<DummyFlash>;

/// Create a byte progress bar labelled with `phase`
fn progress_bar(total: u64, phase: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(&format!(
                "{{spinner:.green}} [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{bytes}}/{{total_bytes}} ({{bytes_per_sec}}, {{eta}}) {}",
                phase
            ))
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    pb
}

/// Reject `len` bytes at `addr` that run past the 32-bit address space
fn check_range(addr: u32, len: u64) -> Result<()> {
    if u64::from(addr) + len > 1 << 32 {
        return Err(CliError::InvalidParameter(format!(
            "0x{:08X} + 0x{:X} runs past the 32-bit address space",
            addr, len
        )));
    }
    Ok(())
}

/// Address `offset` bytes past `addr`
fn offset_address(addr: u32, offset: u64) -> Result<u32> {
    u32::try_from(offset)
        .ok()
        .and_then(|offset| addr.checked_add(offset))
        .ok_or_else(|| {
            CliError::InvalidParameter(format!(
                "0x{:08X} + 0x{:X} runs past the 32-bit address space",
                addr, offset
            ))
        })
}
