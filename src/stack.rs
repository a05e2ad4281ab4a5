//! Upward delivery of received frames

use alloc::vec::Vec;
use core::fmt;

/// A received Ethernet frame, exactly the message length the chip reported.
pub type Frame = Vec<u8>;

/// The network stack refused a frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NetworkDeliveryError;

impl fmt::Display for NetworkDeliveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("network stack refused frame")
    }
}

/// Consumer of received frames.
///
/// Called from the interrupt service loop with no driver locks held.
pub trait NetworkStack {
    /// Takes ownership of one received frame.
    fn on_receive(&self, frame: Frame) -> Result<(), NetworkDeliveryError>;
}

impl<S: NetworkStack + ?Sized> NetworkStack for &S {
    fn on_receive(&self, frame: Frame) -> Result<(), NetworkDeliveryError> {
        (**self).on_receive(frame)
    }
}

impl<S: NetworkStack + ?Sized> NetworkStack for alloc::sync::Arc<S> {
    fn on_receive(&self, frame: Frame) -> Result<(), NetworkDeliveryError> {
        (**self).on_receive(frame)
    }
}
