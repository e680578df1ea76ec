//! Operation table resolution
//!
//! The table is decided exactly once per bring-up from the scanned
//! addressing mode and capability flags. Dispatch afterwards is a plain
//! `match` on the stored variant.

use core::fmt;

use crate::chip::CmdCaps;
use crate::spi::{opcodes, AddressMode};

/// Operation kinds held in the table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    /// Array read
    Read,
    /// Page program
    Write,
    /// 64 KiB block erase
    Erase,
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Read => "read",
            Self::Write => "write",
            Self::Erase => "erase",
        })
    }
}

/// Command encoding bound to one operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpVariant {
    /// 3-byte address command (READ, PP, BE)
    Narrow,
    /// 4-byte address command (READ4B, PP4B, BE4B)
    Wide,
}

impl OpVariant {
    /// Address width this variant puts on the bus
    pub const fn address_mode(&self) -> AddressMode {
        match self {
            Self::Narrow => AddressMode::ThreeByte,
            Self::Wide => AddressMode::FourByte,
        }
    }

    /// Opcode issued for the given operation kind
    pub const fn opcode(&self, kind: OpKind) -> u8 {
        match (self, kind) {
            (Self::Narrow, OpKind::Read) => opcodes::READ,
            (Self::Narrow, OpKind::Write) => opcodes::PP,
            (Self::Narrow, OpKind::Erase) => opcodes::BE,
            (Self::Wide, OpKind::Read) => opcodes::READ_4B,
            (Self::Wide, OpKind::Write) => opcodes::PP_4B,
            (Self::Wide, OpKind::Erase) => opcodes::BE_4B,
        }
    }
}

impl fmt::Display for OpVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.address_mode())
    }
}

/// Resolved read/write/erase bindings
///
/// A table always has all three slots bound; an unresolved device simply
/// has no table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpTable {
    /// Variant used by [`FlashDevice::read`](super::FlashDevice::read)
    pub read: OpVariant,
    /// Variant used by [`FlashDevice::write`](super::FlashDevice::write)
    pub write: OpVariant,
    /// Variant used by [`FlashDevice::erase`](super::FlashDevice::erase)
    pub erase: OpVariant,
}

impl OpTable {
    /// Bind every operation from the scanned mode and capabilities
    ///
    /// A device in 3-byte mode always gets the narrow commands, whatever the
    /// capability flags claim. In 4-byte mode the wide commands are used if
    /// the chip accepts READ4B. Program and erase follow the read decision;
    /// their own capability flags are not consulted.
    pub fn resolve(mode: AddressMode, caps: CmdCaps) -> Self {
        let variant = match mode {
            AddressMode::ThreeByte => OpVariant::Narrow,
            AddressMode::FourByte if caps.contains(CmdCaps::READ_4B) => OpVariant::Wide,
            AddressMode::FourByte => OpVariant::Narrow,
        };

        Self {
            read: variant,
            write: variant,
            erase: variant,
        }
    }

    /// Variant bound to the given operation
    pub const fn get(&self, kind: OpKind) -> OpVariant {
        match kind {
            OpKind::Read => self.read,
            OpKind::Write => self.write,
            OpKind::Erase => self.erase,
        }
    }
}

impl fmt::Display for OpTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "read={} (0x{:02X}), write={} (0x{:02X}), erase={} (0x{:02X})",
            self.read,
            self.read.opcode(OpKind::Read),
            self.write,
            self.write.opcode(OpKind::Write),
            self.erase,
            self.erase.opcode(OpKind::Erase),
        )
    }
}
