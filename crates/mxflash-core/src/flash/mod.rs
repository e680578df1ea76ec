//! Device handle, bring-up and operation dispatch
//!
//! [`FlashDevice`] is the caller-owned handle for one physical flash chip.
//! [`FlashDevice::initialize`] runs the bring-up sequence and binds the
//! operation table; [`FlashDevice::read`], [`FlashDevice::write`] and
//! [`FlashDevice::erase`] dispatch through that table afterwards.

mod bringup;
mod device;
mod ops;
mod passthrough;

#[cfg(test)]
mod mock;

pub use bringup::BringUpStage;
pub use device::{DeviceState, FlashDevice};
pub use ops::{OpKind, OpTable, OpVariant};
