//! Command capability flags

use bitflags::bitflags;

use crate::spi::IoMode;

bitflags! {
    /// Optional command variants a chip instance accepts
    ///
    /// The mode scan fills these in. Only `READ_4B` takes part in the
    /// operation resolution; the remaining flags describe the chip to
    /// collaborators and tools.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CmdCaps: u32 {
        // Read command group
        /// Accepts READ4B (0x13) and the 4-byte command set
        const READ_4B     = 1 << 0;
        /// Accepts FAST_READ (0x0B)
        const FAST_READ   = 1 << 1;
        /// Accepts dual output read (0x3B)
        const DREAD       = 1 << 2;
        /// Accepts dual I/O read (0xBB)
        const READ2       = 1 << 3;
        /// Accepts quad output read (0x6B)
        const QREAD       = 1 << 4;
        /// Accepts quad I/O read (0xEB)
        const READ4       = 1 << 5;

        // Program command group
        /// Accepts PP4B (0x12)
        const PP_4B       = 1 << 8;

        // Erase command group
        /// Accepts BE4B (0xDC)
        const BE_4B       = 1 << 12;

        // Special features
        /// Supports QPI mode (4-4-4)
        const QPI         = 1 << 16;
        /// Has a secured OTP area
        const OTP         = 1 << 17;
        /// Supports individual block protection (SBLK/SBULK)
        const BLOCK_LOCK  = 1 << 18;
        /// Supports dynamic protection bits (WRDPB/RDDPB)
        const DPB         = 1 << 19;
        /// Supports program/erase suspend
        const SUSPEND     = 1 << 20;
        /// Supports deep power down
        const DEEP_POWER_DOWN = 1 << 21;

        /// Shorthand for dual reads
        const DUAL = Self::DREAD.bits() | Self::READ2.bits();
        /// Shorthand for quad reads
        const QUAD = Self::QREAD.bits() | Self::READ4.bits();
    }
}

impl Default for CmdCaps {
    fn default() -> Self {
        CmdCaps::empty()
    }
}

impl CmdCaps {
    /// Check whether the chip can be switched to the given I/O mode
    pub fn supports_io_mode(&self, mode: IoMode) -> bool {
        match mode {
            IoMode::Single => true,
            IoMode::DualOut => self.contains(CmdCaps::DREAD),
            IoMode::DualIo => self.contains(CmdCaps::READ2),
            IoMode::QuadOut => self.contains(CmdCaps::QREAD),
            IoMode::QuadIo => self.contains(CmdCaps::READ4),
            IoMode::Qpi => self.contains(CmdCaps::QPI),
        }
    }
}
