//! Macronix MX25R/MX25L serial NOR flash opcodes

// ============================================================================
// Array read
// ============================================================================

/// Read Data with 3-byte address
pub const READ: u8 = 0x03;
/// Read Data with 4-byte address
pub const READ_4B: u8 = 0x13;

// ============================================================================
// Program and erase
// ============================================================================

/// Page Program with 3-byte address
pub const PP: u8 = 0x02;
/// Page Program with 4-byte address
pub const PP_4B: u8 = 0x12;
/// Block Erase 64KB with 3-byte address
pub const BE: u8 = 0xD8;
/// Block Erase 64KB with 4-byte address
pub const BE_4B: u8 = 0xDC;

// ============================================================================
// Write control and identification
// ============================================================================

/// Write Enable
pub const WREN: u8 = 0x06;
/// Read Status Register
pub const RDSR: u8 = 0x05;
/// Read JEDEC ID
pub const RDID: u8 = 0x9F;

// ============================================================================
// 4-byte address mode control
// ============================================================================

/// Enter 4-Byte Address Mode
pub const EN4B: u8 = 0xB7;
/// Exit 4-Byte Address Mode
pub const EX4B: u8 = 0xE9;
/// Enable QPI
pub const EQIO: u8 = 0x35;
/// Reset QPI
pub const RSTQIO: u8 = 0xF5;

// ============================================================================
// Reset, suspend and power
// ============================================================================

/// Reset Enable
pub const RSTEN: u8 = 0x66;
/// Reset Memory
pub const RST: u8 = 0x99;
/// Program/Erase Suspend
pub const SUSPEND: u8 = 0x75;
/// Program/Erase Resume
pub const RESUME: u8 = 0x7A;
/// Deep Power Down
pub const DP: u8 = 0xB9;
/// Release from Deep Power Down
pub const RDP: u8 = 0xAB;

// ============================================================================
// Secured OTP
// ============================================================================

/// Enter Secured OTP
pub const ENSO: u8 = 0xB1;
/// Exit Secured OTP
pub const EXSO: u8 = 0xC1;

// ============================================================================
// Block protection
// ============================================================================

/// Single Block Lock
pub const SBLK: u8 = 0x36;
/// Single Block Unlock
pub const SBULK: u8 = 0x39;
/// Read Block Lock Status
pub const RDBLOCK: u8 = 0x3C;
/// Write Dynamic Protection Bit
pub const WRDPB: u8 = 0xE2;
/// Read Dynamic Protection Bit
pub const RDDPB: u8 = 0xE0;
