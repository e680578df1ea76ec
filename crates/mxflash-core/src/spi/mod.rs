//! SPI addressing, I/O modes and Macronix opcodes
//!
//! These are the vocabulary types shared between the core and the
//! collaborator that actually talks to the device.

mod address;
mod io_mode;
pub mod opcodes;

pub use address::AddressMode;
pub use io_mode::IoMode;
