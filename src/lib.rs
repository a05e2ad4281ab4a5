//! Driver core for AMD LANCE/PCnet PCI Ethernet controllers
//!
//! This crate owns the parts of a PCnet driver that talk to the chip: register-width
//! negotiation, the software style 2 initialization block, the receive and transmit
//! descriptor rings, and the interrupt service loop that keeps the software and hardware
//! views of those rings consistent.
//!
//! Everything the driver needs from its host platform comes in through traits:
//!
//! * [`PortIo`] for raw port access on a claimed I/O window,
//! * [`BusConfig`] for the PCI function's base addresses and command register,
//! * [`ResourceAllocator`] for claiming the interrupt line and port range,
//! * [`DmaMapper`] for turning driver memory into 32-bit bus addresses,
//! * [`NetworkStack`] for handing received frames upward,
//! * [`Clock`] for transmit deadlines.
//!
//! # Usage
//!
//! ```ignore
//! let controller = pcnet::Builder::new()
//!     .set_receive_ring_length(16)
//!     .set_transmit_ring_length(16)
//!     .attach(&mut pci_function, &mut resources, &dma, stack, clock)?;
//!
//! controller.initialize();
//! // The platform's interrupt dispatcher calls `controller.handle_interrupt()`.
//!
//! let deadline = clock.now() + pcnet::time::Duration::millis(10);
//! controller.transmit(&frame, deadline)?;
//! ```

#![warn(missing_docs)]
#![cfg_attr(not(test), no_std)]

extern crate alloc;
extern crate nb;
extern crate void;

#[macro_use]
mod macros;

pub mod chipid;
pub mod dma;
mod error;
pub mod ethernet;
mod eui48;
pub mod pci;
pub mod port;
pub mod registers;
pub mod resource;
pub mod stack;
pub mod time;

pub use chipid::ChipVersion;
pub use dma::DmaMapper;
pub use error::{Error, TxError};
pub use ethernet::{
    BufferManager, Builder, CancelToken, Controller, DeviceConfig, DeviceState, RingStatus,
    Statistics,
};
pub use eui48::HardwareAddress;
pub use pci::{BaseAddress, BusConfig};
pub use port::PortIo;
pub use registers::{AccessWidth, RegisterAccess, Registers};
pub use resource::{ResourceAllocator, ResourceUnavailable};
pub use stack::{Frame, NetworkDeliveryError, NetworkStack};
pub use time::Clock;
