use core::sync::atomic::{fence, Ordering};

use super::super::{
    descriptor_table::{decode_byte_count, encode_byte_count, DescriptorEntry, Ownership},
    volatile_read_write::VolatileReadWrite,
};

enum Word1BitNumbers {
    BufferParityError = 23,
    EndOfPacket = 24,
    StartOfPacket = 25,
    BufferError = 26,
    CrcError = 27,
    Overflow = 28,
    FramingError = 29,
    Error = 30,
    Own = 31,
}

const STATUS_MASK: u32 = 0xFFF0_0000;

/// Receive message descriptor, software style 2
#[repr(C, align(16))]
#[derive(Default)]
pub struct RxDescriptor {
    // NOTE: Only read or write these fields using volatile operations
    word0: u32, // RBADR
    word1: u32, // status, ONES, BCNT
    word2: u32, // RCC, RPC, MCNT
    _word3: u32, // reserved for the driver
}

impl RxDescriptor {
    /// Snapshot of the descriptor. OWN is read first.
    pub fn read(&self) -> RxDescriptorReader {
        let word1 = self.word1.read_volatile();
        // Fields behind OWN are only valid once OWN has been observed clear.
        fence(Ordering::Acquire);
        RxDescriptorReader(self.word0.read_volatile(), word1, self.word2.read_volatile())
    }

    /// Read-modify-write. OWN is written last.
    pub fn modify<F: FnOnce(RxDescriptorWriter) -> RxDescriptorWriter>(&mut self, f: F) {
        let w = RxDescriptorWriter(
            self.word0.read_volatile(),
            self.word1.read_volatile(),
            self.word2.read_volatile(),
        );
        self.store(f(w));
    }

    /// Overwrites every field. OWN is written last.
    pub fn write<F: FnOnce(RxDescriptorWriter) -> RxDescriptorWriter>(&mut self, f: F) {
        self.store(f(RxDescriptorWriter(0, 0, 0)));
    }

    fn store(&mut self, w: RxDescriptorWriter) {
        self.word0.write_volatile(w.0);
        self.word2.write_volatile(w.2);
        // OWN lives in word1, which must be the last word the chip can see change.
        fence(Ordering::Release);
        self.word1.write_volatile(w.1);
    }
}

#[cfg(test)]
impl RxDescriptor {
    /// Writes status and message length the way the chip does when it hands a
    /// descriptor back.
    pub(crate) fn force_status(&mut self, status: u32, message_length: usize) {
        self.word2.write_volatile(message_length as u32);
        let word1 = self.word1.read_volatile();
        self.word1.write_volatile((word1 & 0x0000_FFFF) | status);
    }
}

impl DescriptorEntry for RxDescriptor {
    fn initialize(&mut self, buffer_address: u32, buffer_size: usize, owner: Ownership) {
        self.write(|w| {
            w.set_address(buffer_address)
                .set_buffer_length(buffer_size)
                .set_owner(owner)
        });
    }

    fn rearm(&mut self, buffer_size: usize, owner: Ownership) {
        self.modify(|w| w.clear_status().set_buffer_length(buffer_size).set_owner(owner));
    }

    fn owner(&self) -> Ownership {
        if self.read().is_owned_by_hardware() {
            Ownership::Hardware
        } else {
            Ownership::Software
        }
    }
}

/// Decoded view of a receive descriptor.
pub struct RxDescriptorReader(u32, u32, u32);
impl RxDescriptorReader {
    fn is_set(&self, bit: Word1BitNumbers) -> bool {
        self.1 & (1 << bit as u32) != 0
    }

    /// Bus address of the buffer.
    pub fn buffer_address(&self) -> u32 {
        self.0
    }

    /// Buffer size the chip may fill.
    pub fn buffer_length(&self) -> usize {
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

    /// FRAM: framing error.
    pub fn is_framing_error(&self) -> bool {
        self.is_set(Word1BitNumbers::FramingError)
    }

    /// OFLO: the receive FIFO overflowed.
    pub fn is_overflow(&self) -> bool {
        self.is_set(Word1BitNumbers::Overflow)
    }

    /// CRC: frame check sequence mismatch.
    pub fn is_crc_error(&self) -> bool {
        self.is_set(Word1BitNumbers::CrcError)
    }

    /// BUFF: buffer error.
    pub fn is_buffer_error(&self) -> bool {
        self.is_set(Word1BitNumbers::BufferError)
    }

    /// BPE: bus parity error.
    pub fn is_buffer_parity_error(&self) -> bool {
        self.is_set(Word1BitNumbers::BufferParityError)
    }

    /// STP: first buffer of a frame.
    pub fn is_start_of_packet(&self) -> bool {
        self.is_set(Word1BitNumbers::StartOfPacket)
    }

    /// ENP: last buffer of a frame.
    pub fn is_end_of_packet(&self) -> bool {
        self.is_set(Word1BitNumbers::EndOfPacket)
    }

    /// A whole frame landed in this one buffer.
    pub fn is_complete_frame(&self) -> bool {
        self.is_start_of_packet() && self.is_end_of_packet()
    }

    /// Message byte count: bytes the chip wrote, frame check sequence included.
    pub fn message_length(&self) -> usize {
        (self.2 & 0x0000_0FFF) as usize
    }
}

/// Builder for a new receive descriptor value.
pub struct RxDescriptorWriter(u32, u32, u32);
impl RxDescriptorWriter {
    /// Sets the buffer bus address.
    pub fn set_address(self, address: u32) -> Self {
        RxDescriptorWriter(address, self.1, self.2)
    }

    /// Sets the buffer size the chip may fill.
    pub fn set_buffer_length(self, len: usize) -> Self {
        RxDescriptorWriter(self.0, (self.1 & !0x0000_FFFF) | encode_byte_count(len), self.2)
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
        RxDescriptorWriter(self.0, self.1 | (1 << Word1BitNumbers::Own as u32), self.2)
    }

    /// Clears OWN.
    pub fn clear_owned_by_hardware(self) -> Self {
        RxDescriptorWriter(self.0, self.1 & !(1 << Word1BitNumbers::Own as u32), self.2)
    }

    /// Clears every status bit and the message byte count.
    pub fn clear_status(self) -> Self {
        RxDescriptorWriter(self.0, self.1 & !STATUS_MASK, 0)
    }
}
