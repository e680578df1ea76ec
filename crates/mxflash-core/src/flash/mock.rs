//! Recording driver for handle tests

use std::vec::Vec;

use crate::chip::ModeScan;
use crate::driver::{BusyStatus, LockStatus, MxDriver};
use crate::error::{Error, Result};
use crate::spi::{AddressMode, IoMode};

use super::BringUpStage;

/// One collaborator call, with the arguments that matter for assertions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Call {
    SoftwareInit(u32),
    HardwareInit(u32),
    ScanMode,
    ChipReset,
    BusyStatus,
    Read3b { addr: u32, len: usize },
    Read4b { addr: u32, len: usize },
    Program3b { addr: u32, len: usize },
    Program4b { addr: u32, len: usize },
    Erase3b { addr: u32, count: u32 },
    Erase4b { addr: u32, count: u32 },
    ChangeMode(IoMode, AddressMode),
    Suspend,
    Resume,
    Lock { addr: u32, len: u64 },
    LockStatus { addr: u32, len: u64 },
    DpbLockStatus { addr: u32, len: u64 },
}

#[derive(Debug)]
pub(crate) struct MockController {
    pub base_address: u32,
    pub hw_ready: bool,
}

/// Driver that records every call and answers from its fields
pub(crate) struct MockDriver {
    pub calls: Vec<Call>,
    pub scan: ModeScan,
    pub fail: Option<(BringUpStage, Error)>,
    pub busy: BusyStatus,
    /// Result returned by the array primitives
    pub op_result: Result<()>,
    pub lock_status: LockStatus,
}

impl MockDriver {
    pub fn new(scan: ModeScan) -> Self {
        Self {
            calls: Vec::new(),
            scan,
            fail: None,
            busy: BusyStatus::Ready,
            op_result: Ok(()),
            lock_status: LockStatus::Unlocked,
        }
    }

    pub fn failing_at(scan: ModeScan, stage: BringUpStage, error: Error) -> Self {
        let mut driver = Self::new(scan);
        driver.fail = Some((stage, error));
        driver
    }

    pub fn count(&self, call: Call) -> usize {
        self.calls.iter().filter(|c| **c == call).count()
    }

    /// Number of array primitive calls of any flavour
    pub fn array_calls(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| {
                matches!(
                    c,
                    Call::Read3b { .. }
                        | Call::Read4b { .. }
                        | Call::Program3b { .. }
                        | Call::Program4b { .. }
                        | Call::Erase3b { .. }
                        | Call::Erase4b { .. }
                )
            })
            .count()
    }

    fn stage(&mut self, stage: BringUpStage) -> Result<()> {
        match self.fail {
            Some((failing, error)) if failing == stage => Err(error),
            _ => Ok(()),
        }
    }
}

impl MxDriver for MockDriver {
    type Controller = MockController;

    fn software_init(&mut self, base_address: u32) -> Result<MockController> {
        self.calls.push(Call::SoftwareInit(base_address));
        self.stage(BringUpStage::SoftwareInit)?;
        Ok(MockController {
            base_address,
            hw_ready: false,
        })
    }

    fn hardware_init(&mut self, ctrl: &mut MockController) -> Result<()> {
        self.calls.push(Call::HardwareInit(ctrl.base_address));
        self.stage(BringUpStage::HardwareInit)?;
        ctrl.hw_ready = true;
        Ok(())
    }

    fn scan_mode(&mut self, ctrl: &mut MockController) -> Result<ModeScan> {
        self.calls.push(Call::ScanMode);
        if !ctrl.hw_ready {
            return Err(Error::Failure);
        }
        self.stage(BringUpStage::ModeScan)?;
        Ok(self.scan)
    }

    fn chip_reset(&mut self, _ctrl: &mut MockController) -> Result<()> {
        self.calls.push(Call::ChipReset);
        self.stage(BringUpStage::ChipReset)
    }

    fn busy_status(&mut self, _ctrl: &mut MockController) -> BusyStatus {
        self.calls.push(Call::BusyStatus);
        self.busy
    }

    fn read_3b(&mut self, _ctrl: &mut MockController, addr: u32, buf: &mut [u8]) -> Result<()> {
        self.calls.push(Call::Read3b {
            addr,
            len: buf.len(),
        });
        buf.fill(0x3B);
        self.op_result
    }

    fn read_4b(&mut self, _ctrl: &mut MockController, addr: u32, buf: &mut [u8]) -> Result<()> {
        self.calls.push(Call::Read4b {
            addr,
            len: buf.len(),
        });
        buf.fill(0x4B);
        self.op_result
    }

    fn program_3b(&mut self, _ctrl: &mut MockController, addr: u32, data: &[u8]) -> Result<()> {
        self.calls.push(Call::Program3b {
            addr,
            len: data.len(),
        });
        self.op_result
    }

    fn program_4b(&mut self, _ctrl: &mut MockController, addr: u32, data: &[u8]) -> Result<()> {
        self.calls.push(Call::Program4b {
            addr,
            len: data.len(),
        });
        self.op_result
    }

    fn erase_block_3b(&mut self, _ctrl: &mut MockController, addr: u32, count: u32) -> Result<()> {
        self.calls.push(Call::Erase3b { addr, count });
        self.op_result
    }

    fn erase_block_4b(&mut self, _ctrl: &mut MockController, addr: u32, count: u32) -> Result<()> {
        self.calls.push(Call::Erase4b { addr, count });
        self.op_result
    }

    fn change_mode(
        &mut self,
        _ctrl: &mut MockController,
        io_mode: IoMode,
        addr_mode: AddressMode,
    ) -> Result<()> {
        self.calls.push(Call::ChangeMode(io_mode, addr_mode));
        self.scan.mode = addr_mode;
        Ok(())
    }

    fn suspend(&mut self, _ctrl: &mut MockController) -> Result<()> {
        self.calls.push(Call::Suspend);
        Ok(())
    }

    fn resume(&mut self, _ctrl: &mut MockController) -> Result<()> {
        self.calls.push(Call::Resume);
        Err(Error::Timeout)
    }

    fn lock(&mut self, _ctrl: &mut MockController, addr: u32, len: u64) -> Result<()> {
        self.calls.push(Call::Lock { addr, len });
        self.lock_status = LockStatus::Locked;
        Ok(())
    }

    fn lock_status(&mut self, _ctrl: &mut MockController, addr: u32, len: u64) -> Result<LockStatus> {
        self.calls.push(Call::LockStatus { addr, len });
        Ok(self.lock_status)
    }

    fn dpb_lock_status(
        &mut self,
        _ctrl: &mut MockController,
        addr: u32,
        len: u64,
    ) -> Result<LockStatus> {
        self.calls.push(Call::DpbLockStatus { addr, len });
        Err(Error::Failure)
    }
}
