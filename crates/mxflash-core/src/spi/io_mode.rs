//! SPI I/O modes

use core::fmt;

/// Operating mode of the SPI bus, as passed to a mode change
///
/// Represents how data is transferred on the SPI bus, from single-wire
/// to quad-wire modes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum IoMode {
    /// Standard SPI: 1-1-1 (cmd, addr, data all on single line)
    #[default]
    Single,
    /// Dual Output: 1-1-2 (data phase on 2 lines)
    DualOut,
    /// Dual I/O: 1-2-2 (addr and data on 2 lines)
    DualIo,
    /// Quad Output: 1-1-4 (data phase on 4 lines)
    QuadOut,
    /// Quad I/O: 1-4-4 (addr and data on 4 lines)
    QuadIo,
    /// QPI mode: 4-4-4 (everything on 4 lines)
    Qpi,
}

impl fmt::Display for IoMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single => write!(f, "1-1-1"),
            Self::DualOut => write!(f, "1-1-2"),
            Self::DualIo => write!(f, "1-2-2"),
            Self::QuadOut => write!(f, "1-1-4"),
            Self::QuadIo => write!(f, "1-4-4"),
            Self::Qpi => write!(f, "4-4-4"),
        }
    }
}

impl core::str::FromStr for IoMode {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1-1-1" | "single" => Ok(Self::Single),
            "1-1-2" | "dual-out" => Ok(Self::DualOut),
            "1-2-2" | "dual-io" => Ok(Self::DualIo),
            "1-1-4" | "quad-out" => Ok(Self::QuadOut),
            "1-4-4" | "quad-io" => Ok(Self::QuadIo),
            "4-4-4" | "qpi" => Ok(Self::Qpi),
            _ => Err("expected one of 1-1-1, 1-1-2, 1-2-2, 1-1-4, 1-4-4, 4-4-4"),
        }
    }
}
