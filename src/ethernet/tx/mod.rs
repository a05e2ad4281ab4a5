use super::{
    descriptor_table::DescriptorTable,
    ETH_FRAME_LEN, ETH_HLEN,
};
use crate::TxError;

mod descriptor;
pub use descriptor::TxDescriptor;
pub(crate) use descriptor::TxDescriptorReader;

/// The transmit descriptor ring.
pub type TxRing = DescriptorTable<TxDescriptor>;

impl DescriptorTable<TxDescriptor> {
    /// Claims the descriptor under the cursor, lets `f` fill `size` bytes of its
    /// buffer, then hands it to the chip.
    pub(crate) fn send<R, F: FnOnce(&mut [u8]) -> R>(
        &mut self,
        size: usize,
        f: F,
    ) -> nb::Result<R, TxError> {
        if !(ETH_HLEN..=ETH_FRAME_LEN).contains(&size) {
            return Err(nb::Error::Other(TxError::InvalidLength { len: size }));
        }

        // Check if the next entry is still being used by the chip...if so,
        // indicate there's no more entries and the client has to wait for one to
        // become available.
        let (next_descriptor, next_buffer) = self.next_descriptor_pair();
        if next_descriptor.read().is_owned_by_hardware() {
            return Err(nb::Error::WouldBlock);
        }

        let r = f(&mut next_buffer[..size]);

        next_descriptor.modify(|w| {
            w.clear_status()
                .set_byte_count(size)
                .set_single_buffer_frame()
                .set_owned_by_hardware()
        });
        self.consume_next_descriptor();

        Ok(r)
    }
}

/// Short description of why the chip gave up on a frame.
pub(crate) fn describe_error(status: &TxDescriptorReader) -> &'static str {
    if status.is_underflow() {
        "underflow"
    } else if status.is_late_collision() {
        "late collision"
    } else if status.is_loss_of_carrier() {
        "loss of carrier"
    } else if status.is_retry_error() {
        "retry limit exceeded"
    } else if status.is_excessive_deferral() {
        "excessive deferral"
    } else if status.is_buffer_error() {
        "buffer error"
    } else if status.is_buffer_parity_error() {
        "buffer parity error"
    } else {
        "error"
    }
}
