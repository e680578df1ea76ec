//! Device handle and dispatch facade

use core::fmt;

use crate::chip::CmdCaps;
use crate::config::DeviceConfig;
use crate::driver::{BusyStatus, MxDriver};
use crate::error::{Error, Result};
use crate::spi::AddressMode;

use super::ops::{OpTable, OpVariant};

/// Device-level state as seen by the dispatch facade
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceState {
    /// Bring-up has not completed
    Uninitialized,
    /// Reads, writes and erases are accepted
    Ready,
    /// The device reports a running program or erase
    Busy,
    /// A buffered write sequence is open; reads are refused
    WriteBuffering,
}

impl fmt::Display for DeviceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uninitialized => write!(f, "uninitialized"),
            Self::Ready => write!(f, "ready"),
            Self::Busy => write!(f, "busy"),
            Self::WriteBuffering => write!(f, "write buffering"),
        }
    }
}

/// Handle for one flash device
///
/// Holds the controller state created during bring-up, the scanned
/// addressing mode and capability flags, the write-buffering flag and the
/// resolved operation table. The handle is not synchronized internally;
/// callers sharing it between threads must wrap it in their own lock.
pub struct FlashDevice<D: MxDriver> {
    pub(super) driver: D,
    pub(super) config: DeviceConfig,
    pub(super) controller: Option<D::Controller>,
    pub(super) address_mode: AddressMode,
    pub(super) caps: CmdCaps,
    pub(super) write_buffering: bool,
    pub(super) ops: Option<OpTable>,
}

impl<D: MxDriver> FlashDevice<D> {
    /// Create an uninitialized handle
    ///
    /// No collaborator call is made until [`initialize`](Self::initialize).
    pub fn new(driver: D, config: DeviceConfig) -> Self {
        Self {
            driver,
            config,
            controller: None,
            address_mode: AddressMode::default(),
            caps: CmdCaps::empty(),
            write_buffering: false,
            ops: None,
        }
    }

    /// Get the configuration used for bring-up
    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    /// Get the underlying driver
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Get the underlying driver mutably
    ///
    /// Meant for collaborator-specific setup. Changing the device behind the
    /// handle's back (e.g. its addressing mode) requires a new bring-up.
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    /// Consume the handle and return the driver
    pub fn release(self) -> D {
        self.driver
    }

    /// Addressing mode detected during bring-up
    pub fn address_mode(&self) -> AddressMode {
        self.address_mode
    }

    /// Capability flags detected during bring-up
    pub fn caps(&self) -> CmdCaps {
        self.caps
    }

    /// Resolved operation table, `None` until bring-up has completed
    pub fn op_table(&self) -> Option<OpTable> {
        self.ops
    }

    /// Check if bring-up has completed
    pub fn is_initialized(&self) -> bool {
        self.ops.is_some()
    }

    /// Check if a buffered write sequence is open
    pub fn is_write_buffering(&self) -> bool {
        self.write_buffering
    }

    /// Mark the start of a buffered write sequence
    ///
    /// Reads are refused with [`Error::DeviceBusy`] until
    /// [`end_write_buffering`](Self::end_write_buffering).
    pub fn begin_write_buffering(&mut self) {
        log::trace!("Write buffering started");
        self.write_buffering = true;
    }

    /// Mark the end of a buffered write sequence
    pub fn end_write_buffering(&mut self) {
        log::trace!("Write buffering ended");
        self.write_buffering = false;
    }

    /// Current device-level state
    ///
    /// Issues one busy probe when the device is initialized and no write
    /// sequence is open.
    pub fn state(&mut self) -> DeviceState {
        if self.ops.is_none() {
            return DeviceState::Uninitialized;
        }
        let Some(ctrl) = self.controller.as_mut() else {
            return DeviceState::Uninitialized;
        };
        if self.write_buffering {
            return DeviceState::WriteBuffering;
        }
        match self.driver.busy_status(ctrl) {
            BusyStatus::Ready => DeviceState::Ready,
            BusyStatus::Busy => DeviceState::Busy,
        }
    }

    /// Read `buf.len()` bytes starting at `addr`
    ///
    /// # Errors
    /// * `NotInitialized` - bring-up has not completed
    /// * `DeviceBusy` - the device is busy or a buffered write is open; the
    ///   read command is not issued
    /// * anything the driver's read primitive reports, unchanged
    pub fn read(&mut self, addr: u32, buf: &mut [u8]) -> Result<()> {
        let write_buffering = self.write_buffering;
        let (ops, driver, ctrl) = self.resolved()?;

        if driver.busy_status(ctrl) == BusyStatus::Busy || write_buffering {
            log::debug!("Read at 0x{:08X} refused: device busy", addr);
            return Err(Error::DeviceBusy);
        }

        log::trace!("Read 0x{:08X} +{} ({})", addr, buf.len(), ops.read);
        match ops.read {
            OpVariant::Narrow => driver.read_3b(ctrl, addr, buf),
            OpVariant::Wide => driver.read_4b(ctrl, addr, buf),
        }
    }

    /// Program `data` starting at `addr`
    ///
    /// No readiness check is made here; the driver's program primitive is
    /// responsible for waiting on the device.
    ///
    /// # Errors
    /// * `NotInitialized` - bring-up has not completed
    /// * anything the driver's program primitive reports, unchanged
    pub fn write(&mut self, addr: u32, data: &[u8]) -> Result<()> {
        let (ops, driver, ctrl) = self.resolved()?;

        log::trace!("Write 0x{:08X} +{} ({})", addr, data.len(), ops.write);
        match ops.write {
            OpVariant::Narrow => driver.program_3b(ctrl, addr, data),
            OpVariant::Wide => driver.program_4b(ctrl, addr, data),
        }
    }

    /// Erase `block_count` 64 KiB blocks starting at `addr`
    ///
    /// # Errors
    /// * `NotInitialized` - bring-up has not completed
    /// * anything the driver's erase primitive reports, unchanged
    pub fn erase(&mut self, addr: u32, block_count: u32) -> Result<()> {
        let (ops, driver, ctrl) = self.resolved()?;

        log::trace!("Erase 0x{:08X} x{} blocks ({})", addr, block_count, ops.erase);
        match ops.erase {
            OpVariant::Narrow => driver.erase_block_3b(ctrl, addr, block_count),
            OpVariant::Wide => driver.erase_block_4b(ctrl, addr, block_count),
        }
    }

    /// Split the handle into the pieces dispatch needs
    fn resolved(&mut self) -> Result<(OpTable, &mut D, &mut D::Controller)> {
        match (self.ops, self.controller.as_mut()) {
            (Some(ops), Some(ctrl)) => Ok((ops, &mut self.driver, ctrl)),
            _ => Err(Error::NotInitialized),
        }
    }
}

impl<D: MxDriver> fmt::Debug for FlashDevice<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlashDevice")
            .field("config", &self.config)
            .field("address_mode", &self.address_mode)
            .field("caps", &self.caps)
            .field("write_buffering", &self.write_buffering)
            .field("ops", &self.ops)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chip::ModeScan;
    use crate::flash::mock::{Call, MockDriver};

    fn ready_device(mode: AddressMode, caps: CmdCaps) -> FlashDevice<MockDriver> {
        let mut dev = FlashDevice::new(
            MockDriver::new(ModeScan::new(mode, caps)),
            DeviceConfig::new(0x000),
        );
        dev.initialize().unwrap();
        dev.driver_mut().calls.clear();
        dev
    }

    #[test]
    fn test_narrow_read_scenario() {
        let mut dev = ready_device(AddressMode::ThreeByte, CmdCaps::empty());
        let mut buf = [0u8; 16];

        assert_eq!(dev.read(0x100, &mut buf), Ok(()));

        assert_eq!(
            dev.driver().calls,
            [Call::BusyStatus, Call::Read3b { addr: 0x100, len: 16 }]
        );
        assert_eq!(buf, [0x3B; 16]);
    }

    #[test]
    fn test_wide_dispatch() {
        let mut dev = ready_device(AddressMode::FourByte, CmdCaps::READ_4B);
        let mut buf = [0u8; 8];

        dev.read(0x0100_0000, &mut buf).unwrap();
        dev.write(0x0100_0000, &[0xA5; 32]).unwrap();
        dev.erase(0x0101_0000, 2).unwrap();

        assert_eq!(
            dev.driver().calls,
            [
                Call::BusyStatus,
                Call::Read4b {
                    addr: 0x0100_0000,
                    len: 8
                },
                Call::Program4b {
                    addr: 0x0100_0000,
                    len: 32
                },
                Call::Erase4b {
                    addr: 0x0101_0000,
                    count: 2
                },
            ]
        );
        assert_eq!(buf, [0x4B; 8]);
    }

    #[test]
    fn test_read_rejected_when_busy() {
        let mut dev = ready_device(AddressMode::ThreeByte, CmdCaps::empty());
        dev.driver_mut().busy = BusyStatus::Busy;
        let mut buf = [0u8; 4];

        assert_eq!(dev.read(0, &mut buf), Err(Error::DeviceBusy));
        assert_eq!(dev.driver().array_calls(), 0);
        assert_eq!(buf, [0; 4]);
    }

    #[test]
    fn test_read_rejected_while_write_buffering() {
        let mut dev = ready_device(AddressMode::FourByte, CmdCaps::READ_4B);
        let mut buf = [0u8; 4];

        dev.begin_write_buffering();
        assert_eq!(dev.read(0, &mut buf), Err(Error::DeviceBusy));
        assert_eq!(dev.driver().array_calls(), 0);

        dev.end_write_buffering();
        assert_eq!(dev.read(0, &mut buf), Ok(()));
        assert_eq!(dev.driver().count(Call::Read4b { addr: 0, len: 4 }), 1);
    }

    #[test]
    fn test_write_and_erase_skip_readiness_check() {
        let mut dev = ready_device(AddressMode::ThreeByte, CmdCaps::empty());
        dev.driver_mut().busy = BusyStatus::Busy;
        dev.begin_write_buffering();

        assert_eq!(dev.write(0x2000, &[0u8; 256]), Ok(()));
        assert_eq!(dev.erase(0x10000, 1), Ok(()));

        assert_eq!(
            dev.driver().calls,
            [
                Call::Program3b {
                    addr: 0x2000,
                    len: 256
                },
                Call::Erase3b {
                    addr: 0x10000,
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn test_primitive_errors_pass_through() {
        let mut dev = ready_device(AddressMode::ThreeByte, CmdCaps::empty());
        dev.driver_mut().op_result = Err(Error::Timeout);
        let mut buf = [0u8; 1];

        assert_eq!(dev.read(0, &mut buf), Err(Error::Timeout));
        assert_eq!(dev.write(0, &[0]), Err(Error::Timeout));
        assert_eq!(dev.erase(0, 1), Err(Error::Timeout));
    }

    #[test]
    fn test_operations_before_bringup() {
        let scan = ModeScan::new(AddressMode::ThreeByte, CmdCaps::empty());
        let mut dev = FlashDevice::new(MockDriver::new(scan), DeviceConfig::default());
        let mut buf = [0u8; 4];

        assert_eq!(dev.read(0, &mut buf), Err(Error::NotInitialized));
        assert_eq!(dev.write(0, &buf), Err(Error::NotInitialized));
        assert_eq!(dev.erase(0, 1), Err(Error::NotInitialized));
        assert!(dev.driver().calls.is_empty());
    }

    #[test]
    fn test_state() {
        let scan = ModeScan::new(AddressMode::ThreeByte, CmdCaps::empty());
        let mut dev = FlashDevice::new(MockDriver::new(scan), DeviceConfig::default());
        assert_eq!(dev.state(), DeviceState::Uninitialized);

        dev.initialize().unwrap();
        assert_eq!(dev.state(), DeviceState::Ready);

        dev.driver_mut().busy = BusyStatus::Busy;
        assert_eq!(dev.state(), DeviceState::Busy);

        dev.driver_mut().busy = BusyStatus::Ready;
        dev.begin_write_buffering();
        assert_eq!(dev.state(), DeviceState::WriteBuffering);

        dev.end_write_buffering();
        assert_eq!(dev.state(), DeviceState::Ready);
    }
}
