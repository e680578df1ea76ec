//! Collaborator interface
//!
//! The core never talks to the bus itself. Everything that touches the
//! controller or the flash device goes through [`MxDriver`].

mod traits;

pub use traits::{BusyStatus, LockStatus, MxDriver};
