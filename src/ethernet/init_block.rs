use crate::HardwareAddress;

/// Software style 2 initialization block.
///
/// The chip reads this once, by DMA, when INIT is set in CSR0. All multi-byte
/// fields are stored little endian.
#[repr(C, align(4))]
#[derive(Debug)]
pub struct InitializationBlock {
    mode: u16,
    rlen: u8, // log2(receive ring length) << 4
    tlen: u8, // log2(transmit ring length) << 4
    padr: [u8; 6],
    _reserved: u16,
    ladrf: [u8; 8],
    rdra: u32,
    tdra: u32,
}

const _: () = assert!(core::mem::size_of::<InitializationBlock>() == 28);

impl InitializationBlock {
    /// Builds a block that accepts unicast to `padr` and broadcast, and no multicast.
    pub fn new(
        mode: u16,
        rx_length_exponent: u8,
        tx_length_exponent: u8,
        padr: HardwareAddress,
        rdra: u32,
        tdra: u32,
    ) -> Self {
        InitializationBlock {
            mode: mode.to_le(),
            rlen: rx_length_exponent << 4,
            tlen: tx_length_exponent << 4,
            padr: *padr.as_bytes(),
            _reserved: 0,
            ladrf: [0; 8],
            rdra: rdra.to_le(),
            tdra: tdra.to_le(),
        }
    }

    /// Value CSR15 takes when the block is loaded.
    pub fn mode(&self) -> u16 {
        u16::from_le(self.mode)
    }

    /// Receive ring length, as a power of two.
    pub fn rx_length_exponent(&self) -> u8 {
        self.rlen >> 4
    }

    /// Transmit ring length, as a power of two.
    pub fn tx_length_exponent(&self) -> u8 {
        self.tlen >> 4
    }

    /// Physical station address.
    pub fn physical_address(&self) -> HardwareAddress {
        HardwareAddress::new(self.padr)
    }

    /// Multicast hash filter.
    pub fn logical_address_filter(&self) -> [u8; 8] {
        self.ladrf
    }

    /// Bus address of the first receive descriptor.
    pub fn rx_ring_address(&self) -> u32 {
        u32::from_le(self.rdra)
    }

    /// Bus address of the first transmit descriptor.
    pub fn tx_ring_address(&self) -> u32 {
        u32::from_le(self.tdra)
    }
}
