//! Address mode types

use core::fmt;

/// Addressing mode the device currently expects in commands
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AddressMode {
    /// 3-byte (24-bit) address - supports up to 16 MiB
    #[default]
    ThreeByte,
    /// 4-byte (32-bit) address - supports up to 4 GiB
    FourByte,
}

impl AddressMode {
    /// Returns the maximum addressable size in bytes
    pub const fn max_size(&self) -> u64 {
        match self {
            Self::ThreeByte => 16 * 1024 * 1024,    // 16 MiB
            Self::FourByte => u32::MAX as u64 + 1, // 4 GiB
        }
    }

    /// Truncate an address to what fits in the address phase
    pub const fn mask(&self, address: u32) -> u32 {
        match self {
            Self::ThreeByte => address & 0x00FF_FFFF,
            Self::FourByte => address,
        }
    }
}

impl fmt::Display for AddressMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ThreeByte => write!(f, "3-byte"),
            Self::FourByte => write!(f, "4-byte"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask() {
        assert_eq!(AddressMode::ThreeByte.mask(0x0112_3456), 0x0012_3456);
        assert_eq!(AddressMode::FourByte.mask(0x0112_3456), 0x0112_3456);
    }

    #[test]
    fn test_max_size() {
        assert_eq!(AddressMode::ThreeByte.max_size(), 0x0100_0000);
        assert_eq!(AddressMode::FourByte.max_size(), 0x1_0000_0000);
    }
}
