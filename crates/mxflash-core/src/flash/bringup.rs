//! Bring-up sequence
//!
//! Bring-up runs four collaborator steps in a fixed order and stops at the
//! first failure:
//!
//! 1. software init - bind the controller at the configured base address
//! 2. hardware init - physical controller bring-up
//! 3. mode scan     - detect addressing mode and optional commands
//! 4. chip reset    - return the device to a known command state
//!
//! The handle is reset before step 1. A failed step leaves the handle as
//! that step left it, without a resolved operation table; the caller has
//! to start over with a new [`FlashDevice::initialize`].

use core::fmt;

use crate::chip::CmdCaps;
use crate::driver::MxDriver;
use crate::error::Result;
use crate::spi::AddressMode;

use super::device::FlashDevice;
use super::ops::OpTable;

/// Steps of the bring-up sequence, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BringUpStage {
    /// Controller/base-address binding
    SoftwareInit,
    /// Physical controller bring-up
    HardwareInit,
    /// Addressing mode and capability probe
    ModeScan,
    /// Logical reset of the flash device
    ChipReset,
}

impl fmt::Display for BringUpStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SoftwareInit => write!(f, "software init"),
            Self::HardwareInit => write!(f, "hardware init"),
            Self::ModeScan => write!(f, "mode scan"),
            Self::ChipReset => write!(f, "chip reset"),
        }
    }
}

/// Log the outcome of a step and hand its result back untouched
fn step<T>(stage: BringUpStage, result: Result<T>) -> Result<T> {
    match &result {
        Ok(_) => log::debug!("Bring-up: {} done", stage),
        Err(e) => log::warn!("Bring-up: {} failed: {}", stage, e),
    }
    result
}

impl<D: MxDriver> FlashDevice<D> {
    /// Bring up the controller and device, then resolve the operation table
    ///
    /// Any previous state of the handle is discarded first. On success the
    /// handle is ready for [`read`](Self::read), [`write`](Self::write) and
    /// [`erase`](Self::erase) until the next call to this function.
    ///
    /// # Errors
    /// Returns the error of the first step that fails, exactly as the driver
    /// reported it. No later step is run.
    pub fn initialize(&mut self) -> Result<()> {
        log::debug!(
            "Initializing flash device and controller at 0x{:08X}",
            self.config.base_address
        );

        self.reset();

        let controller = step(
            BringUpStage::SoftwareInit,
            self.driver.software_init(self.config.base_address),
        )?;
        let ctrl = self.controller.insert(controller);

        step(BringUpStage::HardwareInit, self.driver.hardware_init(ctrl))?;

        let scan = step(BringUpStage::ModeScan, self.driver.scan_mode(ctrl))?;
        self.address_mode = scan.mode;
        self.caps = scan.caps;

        step(BringUpStage::ChipReset, self.driver.chip_reset(ctrl))?;

        let ops = OpTable::resolve(self.address_mode, self.caps);
        log::info!(
            "Flash ready: {} addressing, caps {:?}, {}",
            self.address_mode,
            self.caps,
            ops
        );
        self.ops = Some(ops);

        Ok(())
    }

    /// Return the handle to its freshly created state
    fn reset(&mut self) {
        self.controller = None;
        self.address_mode = AddressMode::default();
        self.caps = CmdCaps::empty();
        self.write_buffering = false;
        self.ops = None;
    }
}
