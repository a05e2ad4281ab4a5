use alloc::{boxed::Box, vec};
use core::mem::size_of;

use super::{MAX_BUFFER_SIZE, MAX_RING_LENGTH, MIN_BUFFER_SIZE};
use crate::{dma::DmaMapper, Error};

/// Which side may touch a descriptor and its buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Ownership {
    /// The chip owns it (OWN set).
    Hardware,
    /// The driver owns it (OWN clear).
    Software,
}

/// A ring entry the chip understands.
pub trait DescriptorEntry: Default {
    /// Points a fresh descriptor at its buffer and gives it to `owner`.
    fn initialize(&mut self, buffer_address: u32, buffer_size: usize, owner: Ownership);

    /// Clears status, keeps the buffer address, and gives the descriptor to `owner`.
    fn rearm(&mut self, buffer_size: usize, owner: Ownership);

    /// Current owner, as last written by either side.
    fn owner(&self) -> Ownership;
}

/// Negative byte count field as the chip expects it: two's complement in bits 11:0
/// with bits 15:12 set.
pub(crate) fn encode_byte_count(len: usize) -> u32 {
    0x0000_F000 | ((len as u32).wrapping_neg() & 0x0000_0FFF)
}

pub(crate) fn decode_byte_count(word: u32) -> usize {
    (0x1000 - (word & 0x0FFF)) as usize & 0x0FFF
}

/// A power-of-two ring of descriptors with one DMA buffer each.
///
/// The table owns both the descriptors and the buffers. Neither moves between
/// allocation and drop, so the bus addresses handed out at allocation stay valid.
pub struct DescriptorTable<D> {
    descriptors: Box<[D]>,
    buffers: Box<[u8]>,
    buffer_size: usize,
    base_address: u32,

    next_entry: usize, // Index of next entry to read/write
}

impl<D: DescriptorEntry> DescriptorTable<D> {
    /// Allocates `capacity` descriptors and buffers and gives every descriptor to `owner`.
    pub fn allocate<M: DmaMapper + ?Sized>(
        capacity: usize,
        buffer_size: usize,
        owner: Ownership,
        dma: &M,
    ) -> Result<Self, Error> {
        check_ring_length(capacity)?;
        check_buffer_size(buffer_size)?;

        let mut descriptors: Box<[D]> = (0..capacity).map(|_| D::default()).collect();
        let buffers = vec![0u8; capacity * buffer_size].into_boxed_slice();

        let base_address = dma.bus_address(
            descriptors.as_ptr() as *const u8,
            capacity * size_of::<D>(),
        );
        for (descriptor, buffer) in descriptors.iter_mut().zip(buffers.chunks_exact(buffer_size)) {
            let buffer_address = dma.bus_address(buffer.as_ptr(), buffer_size);
            descriptor.initialize(buffer_address, buffer_size, owner);
        }

        Ok(DescriptorTable {
            descriptors,
            buffers,
            buffer_size,
            base_address,
            next_entry: 0,
        })
    }

    /// Hands every descriptor to `owner` again and moves the cursor back to the start.
    pub fn reset(&mut self, owner: Ownership) {
        for descriptor in self.descriptors.iter_mut() {
            descriptor.rearm(self.buffer_size, owner);
        }
        self.next_entry = 0;
    }

    /// Number of descriptors.
    pub fn capacity(&self) -> usize {
        self.descriptors.len()
    }

    /// Ring length as the power of two the initialization block encodes.
    pub fn length_exponent(&self) -> u8 {
        self.descriptors.len().trailing_zeros() as u8
    }

    /// Bus address of the first descriptor.
    pub fn base_address(&self) -> u32 {
        self.base_address
    }

    /// Size of every buffer in the ring.
    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    /// Index the cursor is at.
    pub fn next_index(&self) -> usize {
        self.next_entry
    }

    /// Descriptor at `index`.
    pub fn descriptor(&self, index: usize) -> &D {
        &self.descriptors[index]
    }

    /// Number of descriptors currently owned by `owner`.
    pub fn count_owned_by(&self, owner: Ownership) -> usize {
        self.descriptors
            .iter()
            .filter(|descriptor| descriptor.owner() == owner)
            .count()
    }

    /// Descriptor under the cursor.
    pub fn next_descriptor(&self) -> &D {
        &self.descriptors[self.next_entry]
    }

    /// Descriptor and buffer under the cursor.
    pub fn next_descriptor_pair(&mut self) -> (&mut D, &mut [u8]) {
        let start = self.next_entry * self.buffer_size;
        (
            &mut self.descriptors[self.next_entry],
            &mut self.buffers[start..start + self.buffer_size],
        )
    }

    /// Advances the cursor by one, wrapping at the end of the ring.
    pub fn consume_next_descriptor(&mut self) {
        if self.next_entry == self.descriptors.len() - 1 {
            self.next_entry = 0;
        } else {
            self.next_entry += 1;
        }
    }
}

#[cfg(test)]
impl<D> DescriptorTable<D> {
    pub(crate) fn descriptors_mut(&mut self) -> &mut [D] {
        &mut self.descriptors
    }

    pub(crate) fn buffer_mut(&mut self, index: usize) -> &mut [u8] {
        let start = index * self.buffer_size;
        &mut self.buffers[start..start + self.buffer_size]
    }
}

pub(crate) fn check_ring_length(capacity: usize) -> Result<(), Error> {
    if !capacity.is_power_of_two() || capacity > MAX_RING_LENGTH {
        return Err(Error::InvalidRingLength(capacity));
    }
    Ok(())
}

pub(crate) fn check_buffer_size(buffer_size: usize) -> Result<(), Error> {
    if !(MIN_BUFFER_SIZE..=MAX_BUFFER_SIZE).contains(&buffer_size) {
        return Err(Error::InvalidBufferSize(buffer_size));
    }
    Ok(())
}
