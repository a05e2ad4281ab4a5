//! Exclusive platform resources: the interrupt line and the I/O port window
//!
//! Claims are represented by handles. Dropping a handle releases the claim, so a
//! failed attach gives back whatever it got without extra bookkeeping.

use core::fmt;

use crate::port::PortIo;

/// A resource another owner already holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResourceUnavailable {
    /// The interrupt line could not be claimed.
    InterruptLine(u8),
    /// The I/O port window could not be claimed.
    PortRange {
        /// First port of the window.
        base: u16,
        /// Number of ports in the window.
        length: u16,
    },
}

impl fmt::Display for ResourceUnavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceUnavailable::InterruptLine(line) => write!(f, "interrupt line {}", line),
            ResourceUnavailable::PortRange { base, length } => {
                write!(f, "ports {:#x}..{:#x}", base, *base as u32 + *length as u32)
            }
        }
    }
}

/// Hands out exclusive interrupt lines and port windows.
///
/// The driver does not register its own interrupt handler. Once attach succeeds the
/// platform routes the claimed line to `Controller::handle_interrupt`.
pub trait ResourceAllocator {
    /// Claim on an interrupt line. Released on drop.
    type Interrupt;
    /// Claim on a port window. Released on drop.
    type Ports: PortIo;

    /// Claims `line` for `owner`, possibly shared with other devices.
    fn claim_interrupt_line(
        &mut self,
        owner: &'static str,
        line: u8,
        shared: bool,
    ) -> Result<Self::Interrupt, ResourceUnavailable>;

    /// Claims the ports `base..base + length` for `owner`.
    fn claim_port_range(
        &mut self,
        owner: &'static str,
        base: u16,
        length: u16,
    ) -> Result<Self::Ports, ResourceUnavailable>;
}
