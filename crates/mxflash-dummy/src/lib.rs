//! mxflash-dummy - In-memory MX25R flash emulator
//!
//! This crate provides a driver that emulates an MX25R-class chip and its
//! controller in memory. It implements [`MxDriver`] so the bring-up and
//! dispatch logic of `mxflash-core` can be exercised without hardware.
//!
//! Faults can be injected into any bring-up stage, and every command the
//! emulator executes is recorded so callers can check which command
//! variant was used.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(feature = "alloc")]
use alloc::vec;
#[cfg(feature = "alloc")]
use alloc::vec::Vec;
#[cfg(feature = "alloc")]
use core::ops::Range;

use mxflash_core::chip::CmdCaps;
use mxflash_core::flash::BringUpStage;
use mxflash_core::spi::{AddressMode, IoMode};
use mxflash_core::Error;

#[cfg(feature = "alloc")]
use mxflash_core::chip::ModeScan;
#[cfg(feature = "alloc")]
use mxflash_core::driver::{BusyStatus, LockStatus, MxDriver};
#[cfg(feature = "alloc")]
use mxflash_core::spi::opcodes;
#[cfg(feature = "alloc")]
use mxflash_core::Result;

/// Erase block size
pub const BLOCK_SIZE: usize = 64 * 1024;

/// Size of the secured OTP area
pub const OTP_SIZE: usize = 4096;

/// Configuration for the dummy flash
#[derive(Debug, Clone)]
pub struct DummyConfig {
    /// Flash size in bytes
    pub size: usize,
    /// Addressing mode reported by the mode scan
    pub address_mode: AddressMode,
    /// Capability flags reported by the mode scan
    pub caps: CmdCaps,
    /// Start with a program/erase in progress
    pub busy: bool,
    /// Make one bring-up stage fail with the given error
    pub fault: Option<(BringUpStage, Error)>,
}

impl Default for DummyConfig {
    fn default() -> Self {
        Self {
            size: 2 * 1024 * 1024, // MX25R1635F
            address_mode: AddressMode::ThreeByte,
            caps: CmdCaps::FAST_READ
                | CmdCaps::DUAL
                | CmdCaps::QUAD
                | CmdCaps::OTP
                | CmdCaps::BLOCK_LOCK
                | CmdCaps::DPB
                | CmdCaps::SUSPEND
                | CmdCaps::DEEP_POWER_DOWN,
            busy: false,
            fault: None,
        }
    }
}

impl DummyConfig {
    /// Configuration of a large part that runs in 4-byte mode
    pub fn four_byte(size: usize) -> Self {
        Self {
            size,
            address_mode: AddressMode::FourByte,
            caps: Self::default().caps | CmdCaps::READ_4B | CmdCaps::PP_4B | CmdCaps::BE_4B,
            ..Self::default()
        }
    }
}

/// Controller state handed out by [`DummyFlash::software_init`]
///
/// [`DummyFlash::software_init`]: MxDriver::software_init
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DummyController {
    /// Base address the controller was bound to
    pub base_address: u32,
    /// Set once hardware init has run
    pub hw_ready: bool,
    /// Current bus I/O mode
    pub io_mode: IoMode,
}

/// Dummy flash driver
///
/// Emulates an MX25R chip in memory for testing purposes.
#[cfg(feature = "alloc")]
pub struct DummyFlash {
    config: DummyConfig,
    data: Vec<u8>,
    otp: Vec<u8>,
    block_locks: Vec<bool>,
    dpb: Vec<bool>,
    address_mode: AddressMode,
    busy: bool,
    suspended: bool,
    powered_down: bool,
    in_otp: bool,
    command_log: Vec<u8>,
}

#[cfg(feature = "alloc")]
impl DummyFlash {
    /// Create a new dummy flash with the given configuration
    pub fn new(config: DummyConfig) -> Self {
        let blocks = config.size.div_ceil(BLOCK_SIZE);
        Self {
            data: vec![0xFF; config.size],
            otp: vec![0xFF; OTP_SIZE],
            block_locks: vec![false; blocks],
            dpb: vec![false; blocks],
            address_mode: config.address_mode,
            busy: config.busy,
            suspended: false,
            powered_down: false,
            in_otp: false,
            command_log: Vec::new(),
            config,
        }
    }

    /// Create a new dummy flash with default configuration (MX25R1635F)
    pub fn new_default() -> Self {
        Self::new(DummyConfig::default())
    }

    /// Create a dummy flash with pre-filled data
    pub fn with_data(config: DummyConfig, initial_data: &[u8]) -> Self {
        let mut flash = Self::new(config);
        let len = core::cmp::min(initial_data.len(), flash.data.len());
        flash.data[..len].copy_from_slice(&initial_data[..len]);
        flash
    }

    /// Get a reference to the flash data
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Get a reference to the OTP area
    pub fn otp(&self) -> &[u8] {
        &self.otp
    }

    /// Get a mutable reference to the OTP area
    pub fn otp_mut(&mut self) -> &mut [u8] {
        &mut self.otp
    }

    /// Get the configuration
    pub fn config(&self) -> &DummyConfig {
        &self.config
    }

    /// Opcodes of every command executed so far, oldest first
    pub fn command_log(&self) -> &[u8] {
        &self.command_log
    }

    /// Forget the recorded commands
    pub fn clear_command_log(&mut self) {
        self.command_log.clear();
    }

    /// Addressing mode the emulated chip is in
    pub fn address_mode(&self) -> AddressMode {
        self.address_mode
    }

    /// Start or finish an emulated program/erase cycle
    pub fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }

    /// Check if the chip is in deep power down
    pub fn is_powered_down(&self) -> bool {
        self.powered_down
    }

    /// Check if the OTP area is mapped in
    pub fn is_in_otp(&self) -> bool {
        self.in_otp
    }

    fn issue(&mut self, opcode: u8) {
        log::trace!("dummy: opcode 0x{:02X}", opcode);
        self.command_log.push(opcode);
    }

    fn fault(&self, stage: BringUpStage) -> Result<()> {
        match self.config.fault {
            Some((failing, error)) if failing == stage => Err(error),
            _ => Ok(()),
        }
    }

    fn require(&self, cap: CmdCaps) -> Result<()> {
        if self.config.caps.contains(cap) {
            Ok(())
        } else {
            Err(Error::Unsupported)
        }
    }

    fn check_awake(&self) -> Result<()> {
        if self.powered_down {
            log::debug!("dummy: command ignored in deep power down");
            return Err(Error::Failure);
        }
        Ok(())
    }

    /// Program and erase wait for the running cycle, which never ends here
    fn wait_ready(&self) -> Result<()> {
        if self.busy && !self.suspended {
            return Err(Error::Timeout);
        }
        Ok(())
    }

    /// Array or OTP area, whichever is mapped in
    fn region(&self) -> &[u8] {
        if self.in_otp {
            &self.otp
        } else {
            &self.data
        }
    }

    fn byte_range(len_limit: usize, addr: u32, len: usize) -> Result<Range<usize>> {
        let start = addr as usize;
        let end = start.checked_add(len).ok_or(Error::Failure)?;
        if end > len_limit {
            log::debug!(
                "dummy: 0x{:08X} +{} outside of {} bytes",
                addr,
                len,
                len_limit
            );
            return Err(Error::Failure);
        }
        Ok(start..end)
    }

    /// Indices of the blocks covering `addr..addr + len`
    fn block_range(&self, addr: u32, len: u64) -> Result<Range<usize>> {
        let len = usize::try_from(len).map_err(|_| Error::Failure)?;
        let range = Self::byte_range(self.data.len(), addr, len)?;
        if range.is_empty() {
            return Err(Error::Failure);
        }
        Ok(range.start / BLOCK_SIZE..range.end.div_ceil(BLOCK_SIZE))
    }

    fn is_protected(&self, block: usize) -> bool {
        self.block_locks[block] || self.dpb[block]
    }

    fn do_read(&mut self, opcode: u8, addr: u32, buf: &mut [u8]) -> Result<()> {
        self.issue(opcode);
        self.check_awake()?;

        let range = Self::byte_range(self.region().len(), addr, buf.len())?;
        buf.copy_from_slice(&self.region()[range]);
        Ok(())
    }

    fn do_program(&mut self, opcode: u8, addr: u32, data: &[u8]) -> Result<()> {
        self.issue(opcodes::WREN);
        self.issue(opcode);
        self.check_awake()?;
        self.wait_ready()?;

        let range = Self::byte_range(self.region().len(), addr, data.len())?;
        if !self.in_otp && !range.is_empty() {
            let first = range.start / BLOCK_SIZE;
            let last = (range.end - 1) / BLOCK_SIZE;
            if (first..=last).any(|b| self.is_protected(b)) {
                log::debug!("dummy: program at 0x{:08X} hits a protected block", addr);
                return Err(Error::Failure);
            }
        }

        let target = if self.in_otp {
            &mut self.otp[range]
        } else {
            &mut self.data[range]
        };
        // Flash programming: can only change 1 -> 0
        for (dst, &src) in target.iter_mut().zip(data) {
            *dst &= src;
        }
        Ok(())
    }

    fn do_erase(&mut self, opcode: u8, addr: u32, count: u32) -> Result<()> {
        self.issue(opcodes::WREN);
        self.issue(opcode);
        self.check_awake()?;
        self.wait_ready()?;

        if self.in_otp {
            log::debug!("dummy: the OTP area cannot be erased");
            return Err(Error::Failure);
        }

        // Align address to erase boundary
        let aligned = (addr as usize) & !(BLOCK_SIZE - 1);
        let len = (count as usize)
            .checked_mul(BLOCK_SIZE)
            .ok_or(Error::Failure)?;
        let range = Self::byte_range(self.data.len(), aligned as u32, len)?;

        if (range.start / BLOCK_SIZE..range.end / BLOCK_SIZE).any(|b| self.is_protected(b)) {
            log::debug!("dummy: erase at 0x{:08X} hits a protected block", addr);
            return Err(Error::Failure);
        }

        self.data[range].fill(0xFF);
        Ok(())
    }

    fn set_protection(
        &mut self,
        opcode: u8,
        dynamic: bool,
        addr: u32,
        len: u64,
        on: bool,
    ) -> Result<()> {
        self.issue(opcode);
        self.check_awake()?;

        let blocks = self.block_range(addr, len)?;
        let bits = if dynamic {
            &mut self.dpb
        } else {
            &mut self.block_locks
        };
        bits[blocks].fill(on);
        Ok(())
    }

    fn protection_status(
        &mut self,
        opcode: u8,
        dynamic: bool,
        addr: u32,
        len: u64,
    ) -> Result<LockStatus> {
        self.issue(opcode);
        self.check_awake()?;

        let blocks = self.block_range(addr, len)?;
        let bits = if dynamic { &self.dpb } else { &self.block_locks };
        if bits[blocks].iter().all(|&locked| locked) {
            Ok(LockStatus::Locked)
        } else {
            Ok(LockStatus::Unlocked)
        }
    }
}

#[cfg(feature = "alloc")]
impl MxDriver for DummyFlash {
    type Controller = DummyController;

    fn software_init(&mut self, base_address: u32) -> Result<DummyController> {
        log::debug!("dummy: controller bound at 0x{:08X}", base_address);
        self.fault(BringUpStage::SoftwareInit)?;
        Ok(DummyController {
            base_address,
            hw_ready: false,
            io_mode: IoMode::Single,
        })
    }

    fn hardware_init(&mut self, ctrl: &mut DummyController) -> Result<()> {
        self.fault(BringUpStage::HardwareInit)?;
        ctrl.hw_ready = true;
        Ok(())
    }

    fn scan_mode(&mut self, ctrl: &mut DummyController) -> Result<ModeScan> {
        if !ctrl.hw_ready {
            return Err(Error::Failure);
        }
        self.issue(opcodes::RDID);
        self.check_awake()?;
        self.fault(BringUpStage::ModeScan)?;
        Ok(ModeScan::new(self.address_mode, self.config.caps))
    }

    fn chip_reset(&mut self, _ctrl: &mut DummyController) -> Result<()> {
        self.issue(opcodes::RSTEN);
        self.issue(opcodes::RST);
        self.check_awake()?;
        self.fault(BringUpStage::ChipReset)?;

        self.suspended = false;
        self.in_otp = false;
        Ok(())
    }

    /// A chip in deep power down does not drive the bus, so WIP reads as set
    fn busy_status(&mut self, _ctrl: &mut DummyController) -> BusyStatus {
        self.issue(opcodes::RDSR);
        if self.powered_down || (self.busy && !self.suspended) {
            BusyStatus::Busy
        } else {
            BusyStatus::Ready
        }
    }

    fn read_3b(&mut self, _ctrl: &mut DummyController, addr: u32, buf: &mut [u8]) -> Result<()> {
        self.do_read(opcodes::READ, AddressMode::ThreeByte.mask(addr), buf)
    }

    fn read_4b(&mut self, _ctrl: &mut DummyController, addr: u32, buf: &mut [u8]) -> Result<()> {
        self.do_read(opcodes::READ_4B, addr, buf)
    }

    fn program_3b(&mut self, _ctrl: &mut DummyController, addr: u32, data: &[u8]) -> Result<()> {
        self.do_program(opcodes::PP, AddressMode::ThreeByte.mask(addr), data)
    }

    fn program_4b(&mut self, _ctrl: &mut DummyController, addr: u32, data: &[u8]) -> Result<()> {
        self.do_program(opcodes::PP_4B, addr, data)
    }

    fn erase_block_3b(&mut self, _ctrl: &mut DummyController, addr: u32, count: u32) -> Result<()> {
        self.do_erase(opcodes::BE, AddressMode::ThreeByte.mask(addr), count)
    }

    fn erase_block_4b(&mut self, _ctrl: &mut DummyController, addr: u32, count: u32) -> Result<()> {
        self.do_erase(opcodes::BE_4B, addr, count)
    }

    fn change_mode(
        &mut self,
        ctrl: &mut DummyController,
        io_mode: IoMode,
        addr_mode: AddressMode,
    ) -> Result<()> {
        self.check_awake()?;
        if !self.config.caps.supports_io_mode(io_mode) {
            return Err(Error::Unsupported);
        }
        if addr_mode == AddressMode::FourByte {
            self.require(CmdCaps::READ_4B)?;
        }

        match (ctrl.io_mode == IoMode::Qpi, io_mode == IoMode::Qpi) {
            (false, true) => self.issue(opcodes::EQIO),
            (true, false) => self.issue(opcodes::RSTQIO),
            _ => {}
        }
        match addr_mode {
            AddressMode::FourByte => self.issue(opcodes::EN4B),
            AddressMode::ThreeByte => self.issue(opcodes::EX4B),
        }

        ctrl.io_mode = io_mode;
        self.address_mode = addr_mode;
        Ok(())
    }

    fn suspend(&mut self, _ctrl: &mut DummyController) -> Result<()> {
        self.require(CmdCaps::SUSPEND)?;
        self.issue(opcodes::SUSPEND);
        self.check_awake()?;
        if self.busy {
            self.suspended = true;
        }
        Ok(())
    }

    fn resume(&mut self, _ctrl: &mut DummyController) -> Result<()> {
        self.require(CmdCaps::SUSPEND)?;
        self.issue(opcodes::RESUME);
        self.check_awake()?;
        if !self.suspended {
            return Err(Error::Failure);
        }
        self.suspended = false;
        Ok(())
    }

    fn deep_power_down(&mut self, _ctrl: &mut DummyController) -> Result<()> {
        self.require(CmdCaps::DEEP_POWER_DOWN)?;
        self.issue(opcodes::DP);
        self.check_awake()?;
        self.powered_down = true;
        Ok(())
    }

    fn release_deep_power_down(&mut self, _ctrl: &mut DummyController) -> Result<()> {
        self.require(CmdCaps::DEEP_POWER_DOWN)?;
        self.issue(opcodes::RDP);
        self.powered_down = false;
        Ok(())
    }

    fn enter_otp(&mut self, _ctrl: &mut DummyController) -> Result<()> {
        self.require(CmdCaps::OTP)?;
        self.issue(opcodes::ENSO);
        self.check_awake()?;
        self.in_otp = true;
        Ok(())
    }

    fn exit_otp(&mut self, _ctrl: &mut DummyController) -> Result<()> {
        self.require(CmdCaps::OTP)?;
        self.issue(opcodes::EXSO);
        self.check_awake()?;
        self.in_otp = false;
        Ok(())
    }

    fn lock(&mut self, _ctrl: &mut DummyController, addr: u32, len: u64) -> Result<()> {
        self.require(CmdCaps::BLOCK_LOCK)?;
        self.set_protection(opcodes::SBLK, false, addr, len, true)
    }

    fn unlock(&mut self, _ctrl: &mut DummyController, addr: u32, len: u64) -> Result<()> {
        self.require(CmdCaps::BLOCK_LOCK)?;
        self.set_protection(opcodes::SBULK, false, addr, len, false)
    }

    fn lock_status(
        &mut self,
        _ctrl: &mut DummyController,
        addr: u32,
        len: u64,
    ) -> Result<LockStatus> {
        self.require(CmdCaps::BLOCK_LOCK)?;
        self.protection_status(opcodes::RDBLOCK, false, addr, len)
    }

    fn dpb_lock(&mut self, _ctrl: &mut DummyController, addr: u32, len: u64) -> Result<()> {
        self.require(CmdCaps::DPB)?;
        self.set_protection(opcodes::WRDPB, true, addr, len, true)
    }

    fn dpb_unlock(&mut self, _ctrl: &mut DummyController, addr: u32, len: u64) -> Result<()> {
        self.require(CmdCaps::DPB)?;
        self.set_protection(opcodes::WRDPB, true, addr, len, false)
    }

    fn dpb_lock_status(
        &mut self,
        _ctrl: &mut DummyController,
        addr: u32,
        len: u64,
    ) -> Result<LockStatus> {
        self.require(CmdCaps::DPB)?;
        self.protection_status(opcodes::RDDPB, true, addr, len)
    }
}
