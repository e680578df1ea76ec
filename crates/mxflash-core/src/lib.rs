//! mxflash-core - Bring-up and dispatch core for MX25R serial NOR flash
//!
//! This crate brings a Macronix MX25R-class flash device and its controller
//! into a known state, then decides once whether read, program and erase go
//! through the 3-byte or the 4-byte command set. It is designed to be
//! `no_std` compatible for use in embedded environments.
//!
//! The actual SPI traffic is produced by an external collaborator that
//! implements [`driver::MxDriver`]; this crate only sequences and dispatches.
//!
//! # Features
//!
//! - `std` - Enable standard library support, TOML configuration loading
//!
//! # Example
//!
//! ```ignore
//! use mxflash_core::{config::DeviceConfig, driver::MxDriver, flash::FlashDevice};
//!
//! fn dump_first_page<D: MxDriver>(driver: D) -> mxflash_core::Result<()> {
//!     let mut dev = FlashDevice::new(driver, DeviceConfig::default());
//!     dev.initialize()?;
//!     let mut page = [0u8; 256];
//!     dev.read(0, &mut page)?;
//!     Ok(())
//! }
//! ```

#![no_std]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

#[cfg(any(feature = "std", test))]
extern crate std;

pub mod chip;
pub mod config;
pub mod driver;
pub mod error;
pub mod flash;
pub mod spi;

pub use error::{Error, Result};
