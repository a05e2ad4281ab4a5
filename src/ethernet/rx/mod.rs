use void::Void;

use super::descriptor_table::{DescriptorEntry, DescriptorTable, Ownership};
use crate::stack::Frame;

mod descriptor;
pub use descriptor::RxDescriptor;

/// The receive descriptor ring.
pub type RxRing = DescriptorTable<RxDescriptor>;

/// What the descriptor under the receive cursor held.
pub(crate) enum Received {
    Frame(Frame),
    /// A frame the chip flagged as bad, or one that spilled over several buffers.
    Dropped,
}

impl DescriptorTable<RxDescriptor> {
    /// Takes the next filled descriptor, copies its frame out, and gives the
    /// descriptor straight back to the chip.
    pub(crate) fn receive(&mut self) -> nb::Result<Received, Void> {
        let buffer_size = self.buffer_size();
        let (next_descriptor, next_buffer) = self.next_descriptor_pair();
        let status = next_descriptor.read();
        if status.is_owned_by_hardware() {
            return Err(nb::Error::WouldBlock);
        }

        let received = if status.has_error() {
            let reason = if status.is_framing_error() {
                "framing error"
            } else if status.is_overflow() {
                "overflow"
            } else if status.is_crc_error() {
                "CRC error"
            } else if status.is_buffer_error() {
                "buffer error"
            } else if status.is_buffer_parity_error() {
                "buffer parity error"
            } else {
                "error"
            };
            pcnet_warn!("dropping received frame: {}", reason);
            Received::Dropped
        } else if !status.is_complete_frame() {
            pcnet_warn!("dropping received frame spanning several buffers");
            Received::Dropped
        } else {
            let len = status.message_length().min(next_buffer.len());
            Received::Frame(next_buffer[..len].to_vec())
        };

        next_descriptor.rearm(buffer_size, Ownership::Hardware);
        self.consume_next_descriptor();
        Ok(received)
    }
}
