//! Block protection command implementations

use mxflash_core::driver::LockStatus;

use super::Device;
use crate::cli::RangeArgs;
use crate::error::Result;

fn kind(range: &RangeArgs) -> &'static str {
    if range.dynamic {
        "Dynamic protection"
    } else {
        "Block lock"
    }
}

/// Query and print the protection of a range
pub fn cmd_status(dev: &mut Device, range: &RangeArgs) -> Result<LockStatus> {
    let len = range.len as u64;
    let status = if range.dynamic {
        dev.dpb_lock_status(range.addr, len)?
    } else {
        dev.lock_status(range.addr, len)?
    };

    println!(
        "{} 0x{:08X} - 0x{:08X}: {}",
        kind(range),
        range.addr,
        range.addr as u64 + len.saturating_sub(1),
        status
    );
    Ok(status)
}

/// Protect a range
pub fn cmd_lock(dev: &mut Device, range: &RangeArgs) -> Result<()> {
    let len = range.len as u64;
    if range.dynamic {
        dev.dpb_lock(range.addr, len)?;
    } else {
        dev.lock(range.addr, len)?;
    }
    cmd_status(dev, range)?;
    Ok(())
}

/// Remove protection from a range
pub fn cmd_unlock(dev: &mut Device, range: &RangeArgs) -> Result<()> {
    let len = range.len as u64;
    if range.dynamic {
        dev.dpb_unlock(range.addr, len)?;
    } else {
        dev.unlock(range.addr, len)?;
    }
    cmd_status(dev, range)?;
    Ok(())
}
