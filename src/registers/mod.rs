//! Register access for PCnet chips
//!
//! The chip exposes its control and status registers (CSRs) and bus configuration
//! registers (BCRs) indirectly: software writes a register index to the address
//! pointer port, then reads or writes the data port. Which ports those are, and
//! whether they are accessed as words or double words, depends on the I/O mode the
//! chip is in. [`Registers::probe`] works that out once, and every later access goes
//! through the chosen [`RegisterAccess`] implementation.

use core::fmt;

use crate::{port::PortIo, Error};

mod access;
pub mod bits;

pub use access::{NarrowAccess, WideAccess};

/// Width of the register data path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AccessWidth {
    /// Word I/O mode, 16-bit accesses.
    Narrow,
    /// Double word I/O mode, 32-bit accesses.
    Wide,
}

impl fmt::Display for AccessWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessWidth::Narrow => f.write_str("16-bit"),
            AccessWidth::Wide => f.write_str("32-bit"),
        }
    }
}

/// Control and status registers used by the driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Csr {
    /// CSR0, controller status and command
    Status = 0,
    /// CSR1, initialization block address bits 15:0
    InitBlockLow = 1,
    /// CSR2, initialization block address bits 31:16
    InitBlockHigh = 2,
    /// CSR3, interrupt masks and deferral control
    InterruptMasks = 3,
    /// CSR4, test and features control
    FeatureControl = 4,
    /// CSR5, extended control and interrupt 1
    ExtendedControl = 5,
    /// CSR15, mode
    Mode = 15,
    /// CSR88, chip id bits 15:0
    ChipIdLow = 88,
    /// CSR89, chip id bits 31:16
    ChipIdHigh = 89,
}

/// Bus configuration registers used by the driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Bcr {
    /// BCR2, miscellaneous configuration
    MiscConfig = 2,
    /// BCR9, full-duplex control
    FullDuplex = 9,
    /// BCR20, software style
    SoftwareStyle = 20,
}

/// Reading and writing chip registers through the indirect address/data ports.
pub trait RegisterAccess {
    /// The I/O mode this accessor talks in.
    fn width(&self) -> AccessWidth;

    /// Reads a control and status register.
    fn csr(&mut self, register: Csr) -> u16;

    /// Writes a control and status register.
    fn set_csr(&mut self, register: Csr, value: u16);

    /// Reads a bus configuration register.
    fn bcr(&mut self, register: Bcr) -> u16;

    /// Writes a bus configuration register.
    fn set_bcr(&mut self, register: Bcr, value: u16);

    /// Issues a software reset by reading the reset port.
    fn reset(&mut self);

    /// Reads one byte of the address PROM.
    fn aprom(&mut self, offset: u16) -> u8;
}

/// Register access in whichever I/O mode the chip answered in.
#[derive(Debug)]
pub enum Registers<P> {
    /// Word I/O mode
    Narrow(NarrowAccess<P>),
    /// Double word I/O mode
    Wide(WideAccess<P>),
}

impl<P: PortIo> Registers<P> {
    /// Finds the chip's I/O mode, trying word mode first.
    ///
    /// On failure the port handle is dropped, which releases the claimed window.
    pub fn probe(mut io: P) -> Result<Self, Error> {
        if NarrowAccess::detect(&mut io) {
            return Ok(Registers::Narrow(NarrowAccess::new(io)));
        }
        if WideAccess::detect(&mut io) {
            return Ok(Registers::Wide(WideAccess::new(io)));
        }
        pcnet_warn!("PCnet register probe failed in both access widths");
        Err(Error::DeviceProbe)
    }

    /// Gives back the port handle.
    pub fn into_inner(self) -> P {
        match self {
            Registers::Narrow(access) => access.into_inner(),
            Registers::Wide(access) => access.into_inner(),
        }
    }
}

impl<P: PortIo> RegisterAccess for Registers<P> {
    fn width(&self) -> AccessWidth {
        match self {
            Registers::Narrow(access) => access.width(),
            Registers::Wide(access) => access.width(),
        }
    }

    fn csr(&mut self, register: Csr) -> u16 {
        match self {
            Registers::Narrow(access) => access.csr(register),
            Registers::Wide(access) => access.csr(register),
        }
    }

    fn set_csr(&mut self, register: Csr, value: u16) {
        match self {
            Registers::Narrow(access) => access.set_csr(register, value),
            Registers::Wide(access) => access.set_csr(register, value),
        }
    }

    fn bcr(&mut self, register: Bcr) -> u16 {
        match self {
            Registers::Narrow(access) => access.bcr(register),
            Registers::Wide(access) => access.bcr(register),
        }
    }

    fn set_bcr(&mut self, register: Bcr, value: u16) {
        match self {
            Registers::Narrow(access) => access.set_bcr(register, value),
            Registers::Wide(access) => access.set_bcr(register, value),
        }
    }

    fn reset(&mut self) {
        match self {
            Registers::Narrow(access) => access.reset(),
            Registers::Wide(access) => access.reset(),
        }
    }

    fn aprom(&mut self, offset: u16) -> u8 {
        match self {
            Registers::Narrow(access) => access.aprom(offset),
            Registers::Wide(access) => access.aprom(offset),
        }
    }
}
