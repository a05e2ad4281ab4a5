use core::sync::atomic::{fence, Ordering};

use super::super::{
    descriptor_table::{decode_byte_count, encode_byte_count, DescriptorEntry, Ownership},
    volatile_read_write::VolatileReadWrite,
};

enum Word1BitNumbers {
    BufferParityError = 23,
    EndOfPacket = 24,
    StartOfPacket = 25,
    Deferred = 26,
    OneRetry = 27,
    MoreRetries = 28,
    Error = 30,
    Own = 31,
}

enum Word2BitNumbers {
    RetryError = 26,
    LossOfCarrier = 27,
    LateCollision = 28,
    ExcessiveDeferral = 29,
    Underflow = 30,
    BufferError = 31,
}

const WORD1_STATUS_MASK: u32 = 0xFF80_0000;

/// Transmit message descriptor, software style 2
#[repr(C, align(16))]
#[derive(Default)]
pub struct TxDescriptor {
    // NOTE: Only read or write these fields using volatile operations
    word0: u32, // TBADR
    word1: u32, // status, ONES, BCNT
    word2: u32, // error status, TRC
    _word3: u32, // reserved for the driver
}

impl TxDescriptor {
    /// Snapshot of the descriptor. OWN is read first.
    pub fn read(&self) -> TxDescriptorReader {
        let word1 = self.word1.read_volatile();
        fence(Ordering::Acquire);
        TxDescriptorReader(self.word0.read_volatile(), word1, self.word2.read_volatile())
    }

    /// Read-modify-write. OWN is written last.
    pub fn modify<F: FnOnce(TxDescriptorWriter) -> TxDescriptorWriter>(&mut self, f: F) {
        let w = TxDescriptorWriter(
            self.word0.read_volatile(),
            self.word1.read_volatile(),
            self.word2.read_volatile(),
        );
        self.store(f(w));
    }

    /// Overwrites every field. OWN is written last.
    pub fn write<F: FnOnce(TxDescriptorWriter) -> TxDescriptorWriter>(&mut self, f: F) {
        self.store(f(TxDescriptorWriter(0, 0, 0)));
    }

    fn store(&mut self, w: TxDescriptorWriter) {
        self.word0.write_volatile(w.0);
        self.word2.write_volatile(w.2);
        // The buffer contents and the other words must be visible before OWN flips.
        fence(Ordering::Release);
        self.word1.write_volatile(w.1);
    }
}

impl DescriptorEntry for TxDescriptor {
    fn initialize(&mut self, buffer_address: u32, _buffer_size: usize, owner: Ownership) {
        self.write(|w| w.set_address(buffer_address).set_byte_count(0).set_owner(owner));
    }

    fn rearm(&mut self, _buffer_size: usize, owner: Ownership) {
        self.modify(|w| w.clear_status().set_byte_count(0).set_owner(owner));
    }

    fn owner(&self) -> Ownership {
        if self.read().is_owned_by_hardware() {
            Ownership::Hardware
        } else {
            Ownership::Software
        }
    }
}

/// Decoded view of a transmit descriptor.
pub struct TxDescriptorReader(u32, u32, u32);
impl TxDescriptorReader {
    fn is_set(&self, bit: Word1BitNumbers) -> bool {
        self.1 & (1 << bit as u32) != 0
    }

    fn is_error_set(&self, bit: Word2BitNumbers) -> bool {
        self.2 & (1 << bit as u32) != 0
    }

    /// Bus address of the buffer.
    pub fn buffer_address(&self) -> u32 {
        self.0
    }

    /// Bytes to transmit from the buffer.
    pub fn byte_count(&self) -> usize {
        decode_byte_count(self.1)
    }

    /// OWN: the chip owns the descriptor.
    pub fn is_owned_by_hardware(&self) -> bool {
        self.is_set(Word1BitNumbers::Own)
    }

    /// ERR: some error bit is set.
    pub fn has_error(&self) -> bool {
        self.is_set(Word1BitNumbers::Error)
    }

    /// STP: first buffer of a frame.
    pub fn is_start_of_packet(&self) -> bool {
        self.is_set(Word1BitNumbers::StartOfPacket)
    }

    /// ENP: last buffer of a frame.
    pub fn is_end_of_packet(&self) -> bool {
        self.is_set(Word1BitNumbers::EndOfPacket)
    }

    /// BPE: bus parity error.
    pub fn is_buffer_parity_error(&self) -> bool {
        self.is_set(Word1BitNumbers::BufferParityError)
    }

    /// DEF: the chip had to defer while the medium was busy.
    pub fn was_deferred(&self) -> bool {
        self.is_set(Word1BitNumbers::Deferred)
    }

    /// The frame needed one or more retries before it went out.
    pub fn had_collisions(&self) -> bool {
        self.is_set(Word1BitNumbers::OneRetry) || self.is_set(Word1BitNumbers::MoreRetries)
    }

    /// BUFF: buffer error.
    pub fn is_buffer_error(&self) -> bool {
        self.is_error_set(Word2BitNumbers::BufferError)
    }

    /// UFLO: the transmit FIFO ran dry.
    pub fn is_underflow(&self) -> bool {
        self.is_error_set(Word2BitNumbers::Underflow)
    }

    /// EXDEF: deferred past the limit.
    pub fn is_excessive_deferral(&self) -> bool {
        self.is_error_set(Word2BitNumbers::ExcessiveDeferral)
    }

    /// LCOL: collision after the slot time.
    pub fn is_late_collision(&self) -> bool {
        self.is_error_set(Word2BitNumbers::LateCollision)
    }

    /// LCAR: carrier lost during transmission.
    pub fn is_loss_of_carrier(&self) -> bool {
        self.is_error_set(Word2BitNumbers::LossOfCarrier)
    }

    /// RTRY: sixteen attempts failed.
    pub fn is_retry_error(&self) -> bool {
        self.is_error_set(Word2BitNumbers::RetryError)
    }
}

/// Builder for a new transmit descriptor value.
pub struct TxDescriptorWriter(u32, u32, u32);
impl TxDescriptorWriter {
    /// Sets the buffer bus address.
    pub fn set_address(self, address: u32) -> Self {
        TxDescriptorWriter(address, self.1, self.2)
    }

    /// Sets the number of bytes to transmit.
    pub fn set_byte_count(self, len: usize) -> Self {
        TxDescriptorWriter(self.0, (self.1 & !0x0000_FFFF) | encode_byte_count(len), self.2)
    }

    /// Marks the buffer as holding a whole frame.
    pub fn set_single_buffer_frame(self) -> Self {
        let frame = (1 << Word1BitNumbers::StartOfPacket as u32)
            | (1 << Word1BitNumbers::EndOfPacket as u32);
        TxDescriptorWriter(self.0, self.1 | frame, self.2)
    }

    /// Gives the descriptor to `owner`.
    pub fn set_owner(self, owner: Ownership) -> Self {
        match owner {
            Ownership::Hardware => self.set_owned_by_hardware(),
            Ownership::Software => self.clear_owned_by_hardware(),
        }
    }

    /// Sets OWN.
    pub fn set_owned_by_hardware(self) -> Self {
        TxDescriptorWriter(self.0, self.1 | (1 << Word1BitNumbers::Own as u32), self.2)
    }

    /// Clears OWN.
    pub fn clear_owned_by_hardware(self) -> Self {
        TxDescriptorWriter(self.0, self.1 & !(1 << Word1BitNumbers::Own as u32), self.2)
    }

    /// Clears the frame markers, all status bits, and the error word.
    pub fn clear_status(self) -> Self {
        TxDescriptorWriter(self.0, self.1 & !WORD1_STATUS_MASK, 0)
    }
}
