//! Ancillary commands forwarded to the driver
//!
//! None of these change the handle. They only need the controller, so they
//! work as soon as software init has succeeded.

use crate::driver::{LockStatus, MxDriver};
use crate::error::{Error, Result};
use crate::spi::{AddressMode, IoMode};

use super::device::FlashDevice;

impl<D: MxDriver> FlashDevice<D> {
    /// Driver and controller, available once software init has succeeded
    fn attached(&mut self) -> Result<(&mut D, &mut D::Controller)> {
        match self.controller.as_mut() {
            Some(ctrl) => Ok((&mut self.driver, ctrl)),
            None => Err(Error::NotInitialized),
        }
    }

    /// Change the bus I/O mode and the device addressing mode
    ///
    /// The handle keeps the addressing mode and operation table found at
    /// bring-up. Run [`initialize`](Self::initialize) again to pick up the
    /// new addressing mode.
    pub fn set_mode(&mut self, io_mode: IoMode, addr_mode: AddressMode) -> Result<()> {
        let (driver, ctrl) = self.attached()?;
        log::trace!("Change mode: {} / {}", io_mode, addr_mode);
        driver.change_mode(ctrl, io_mode, addr_mode)
    }

    /// Suspend a running program or erase
    pub fn suspend(&mut self) -> Result<()> {
        let (driver, ctrl) = self.attached()?;
        log::trace!("Suspend");
        driver.suspend(ctrl)
    }

    /// Resume a suspended program or erase
    pub fn resume(&mut self) -> Result<()> {
        let (driver, ctrl) = self.attached()?;
        log::trace!("Resume");
        driver.resume(ctrl)
    }

    /// Put the device into deep power down
    pub fn deep_power_down(&mut self) -> Result<()> {
        let (driver, ctrl) = self.attached()?;
        log::trace!("Deep power down");
        driver.deep_power_down(ctrl)
    }

    /// Release the device from deep power down
    pub fn release_deep_power_down(&mut self) -> Result<()> {
        let (driver, ctrl) = self.attached()?;
        log::trace!("Release deep power down");
        driver.release_deep_power_down(ctrl)
    }

    /// Enter the secured OTP area
    pub fn enter_otp(&mut self) -> Result<()> {
        let (driver, ctrl) = self.attached()?;
        log::trace!("Enter OTP");
        driver.enter_otp(ctrl)
    }

    /// Leave the secured OTP area
    pub fn exit_otp(&mut self) -> Result<()> {
        let (driver, ctrl) = self.attached()?;
        log::trace!("Exit OTP");
        driver.exit_otp(ctrl)
    }

    /// Write-protect `len` bytes starting at `addr`
    pub fn lock(&mut self, addr: u32, len: u64) -> Result<()> {
        let (driver, ctrl) = self.attached()?;
        log::trace!("Lock 0x{:08X} +{}", addr, len);
        driver.lock(ctrl, addr, len)
    }

    /// Remove write protection from `len` bytes starting at `addr`
    pub fn unlock(&mut self, addr: u32, len: u64) -> Result<()> {
        let (driver, ctrl) = self.attached()?;
        log::trace!("Unlock 0x{:08X} +{}", addr, len);
        driver.unlock(ctrl, addr, len)
    }

    /// Query write protection of `len` bytes starting at `addr`
    pub fn lock_status(&mut self, addr: u32, len: u64) -> Result<LockStatus> {
        let (driver, ctrl) = self.attached()?;
        log::trace!("Lock status 0x{:08X} +{}", addr, len);
        driver.lock_status(ctrl, addr, len)
    }

    /// Set the dynamic protection bits for `len` bytes starting at `addr`
    pub fn dpb_lock(&mut self, addr: u32, len: u64) -> Result<()> {
        let (driver, ctrl) = self.attached()?;
        log::trace!("DPB lock 0x{:08X} +{}", addr, len);
        driver.dpb_lock(ctrl, addr, len)
    }

    /// Clear the dynamic protection bits for `len` bytes starting at `addr`
    pub fn dpb_unlock(&mut self, addr: u32, len: u64) -> Result<()> {
        let (driver, ctrl) = self.attached()?;
        log::trace!("DPB unlock 0x{:08X} +{}", addr, len);
        driver.dpb_unlock(ctrl, addr, len)
    }

    /// Query the dynamic protection bits for `len` bytes starting at `addr`
    pub fn dpb_lock_status(&mut self, addr: u32, len: u64) -> Result<LockStatus> {
        let (driver, ctrl) = self.attached()?;
        log::trace!("DPB lock status 0x{:08X} +{}", addr, len);
        driver.dpb_lock_status(ctrl, addr, len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chip::{CmdCaps, ModeScan};
    use crate::config::DeviceConfig;
    use crate::flash::mock::{Call, MockDriver};
    use crate::flash::{BringUpStage, OpVariant};

    fn device() -> FlashDevice<MockDriver> {
        let scan = ModeScan::new(AddressMode::ThreeByte, CmdCaps::READ_4B);
        FlashDevice::new(MockDriver::new(scan), DeviceConfig::default())
    }

    #[test]
    fn test_requires_controller() {
        let mut dev = device();

        assert_eq!(dev.suspend(), Err(Error::NotInitialized));
        assert_eq!(dev.lock_status(0, 4096), Err(Error::NotInitialized));
        assert!(dev.driver().calls.is_empty());
    }

    #[test]
    fn test_available_after_partial_bringup() {
        let mut dev = device();
        dev.driver_mut().fail = Some((BringUpStage::ModeScan, Error::Failure));
        assert_eq!(dev.initialize(), Err(Error::Failure));

        assert_eq!(dev.suspend(), Ok(()));
        assert_eq!(dev.driver().count(Call::Suspend), 1);
    }

    #[test]
    fn test_results_forwarded_verbatim() {
        let mut dev = device();
        dev.initialize().unwrap();

        assert_eq!(dev.suspend(), Ok(()));
        assert_eq!(dev.resume(), Err(Error::Timeout));
        assert_eq!(dev.lock_status(0x1000, 0x1000), Ok(LockStatus::Unlocked));
        assert_eq!(dev.lock(0x1000, 0x1000), Ok(()));
        assert_eq!(dev.lock_status(0x1000, 0x1000), Ok(LockStatus::Locked));
        assert_eq!(dev.dpb_lock_status(0, 1), Err(Error::Failure));
        assert_eq!(
            dev.driver().count(Call::Lock {
                addr: 0x1000,
                len: 0x1000
            }),
            1
        );
    }

    #[test]
    fn test_unimplemented_capability() {
        let mut dev = device();
        dev.initialize().unwrap();

        assert_eq!(dev.deep_power_down(), Err(Error::Unsupported));
        assert_eq!(dev.enter_otp(), Err(Error::Unsupported));
        assert_eq!(dev.dpb_unlock(0, 1), Err(Error::Unsupported));
    }

    #[test]
    fn test_mode_change_needs_new_bringup() {
        let mut dev = device();
        dev.initialize().unwrap();
        assert_eq!(dev.op_table().unwrap().read, OpVariant::Narrow);

        dev.set_mode(IoMode::Single, AddressMode::FourByte).unwrap();
        assert_eq!(
            dev.driver().count(Call::ChangeMode(IoMode::Single, AddressMode::FourByte)),
            1
        );
        assert_eq!(dev.address_mode(), AddressMode::ThreeByte);
        assert_eq!(dev.op_table().unwrap().read, OpVariant::Narrow);

        dev.initialize().unwrap();
        assert_eq!(dev.address_mode(), AddressMode::FourByte);
        assert_eq!(dev.op_table().unwrap().write, OpVariant::Wide);
    }
}
