use core::fmt;

use crate::resource::ResourceUnavailable;

/// Errors that abort bringing a device up.
///
/// Any resource claimed before the failing step has already been released by the
/// time one of these reaches the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The PCI function reports no base address registers.
    NoBaseAddress,
    /// The first base address register does not decode I/O space.
    NotIoSpace,
    /// The interrupt line or port range is owned by someone else.
    ResourceUnavailable(ResourceUnavailable),
    /// Neither the 16-bit nor the 32-bit register handshake confirmed a PCnet chip.
    DeviceProbe,
    /// Ring lengths must be a power of two between 1 and 512.
    InvalidRingLength(usize),
    /// Buffers must hold a full frame and fit the 12-bit byte count field.
    InvalidBufferSize(usize),
}

impl From<ResourceUnavailable> for Error {
    fn from(err: ResourceUnavailable) -> Self {
        Error::ResourceUnavailable(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoBaseAddress => write!(f, "cannot find iobase: no base addresses"),
            Self::NotIoSpace => write!(f, "cannot find iobase: first address is not I/O"),
            Self::ResourceUnavailable(what) => write!(f, "resource unavailable: {}", what),
            Self::DeviceProbe => write!(f, "register access probe failed in both widths"),
            Self::InvalidRingLength(len) => write!(f, "invalid descriptor ring length {}", len),
            Self::InvalidBufferSize(size) => write!(f, "invalid DMA buffer size {}", size),
        }
    }
}

/// Errors returned by a transmit request.
///
/// None of these leave the transmit ring modified.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TxError {
    /// No transmit descriptor was released by the hardware before the deadline.
    RingFullTimeout,
    /// The caller cancelled the wait for a free descriptor.
    Cancelled,
    /// The frame is shorter than an Ethernet header or longer than a maximum frame.
    InvalidLength {
        /// Length of the rejected frame.
        len: usize,
    },
    /// The device has not reached the running state, or has been disabled.
    NotRunning,
}

impl fmt::Display for TxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RingFullTimeout => write!(f, "transmit ring full until deadline"),
            Self::Cancelled => write!(f, "transmit cancelled"),
            Self::InvalidLength { len } => write!(f, "invalid frame length {}", len),
            Self::NotRunning => write!(f, "device not running"),
        }
    }
}
