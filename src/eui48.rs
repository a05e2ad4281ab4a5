use core::fmt;

/// A 48-bit IEEE 802 station address
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HardwareAddress([u8; 6]);

impl HardwareAddress {
    /// Number of octets in an address.
    pub const LEN: usize = 6;

    /// The all-ones broadcast address.
    pub const BROADCAST: HardwareAddress = HardwareAddress([0xFF; 6]);

    /// Wraps six octets in transmission order.
    pub const fn new(octets: [u8; 6]) -> Self {
        HardwareAddress(octets)
    }

    /// Octets in transmission order.
    pub const fn as_bytes(&self) -> &[u8; 6] {
        &self.0
    }

    /// True if the group bit of the first octet is set.
    pub fn is_multicast(&self) -> bool {
        self.0[0] & 0x01 != 0
    }

    /// True if the locally administered bit of the first octet is set.
    pub fn is_local(&self) -> bool {
        self.0[0] & 0x02 != 0
    }

    /// Copies the address into the first six bytes of `dest`.
    ///
    /// # Panics
    ///
    /// Panics if `dest` is shorter than six bytes.
    pub fn write_to(&self, dest: &mut [u8]) {
        dest[..Self::LEN].copy_from_slice(&self.0);
    }
}

impl From<[u8; 6]> for HardwareAddress {
    fn from(octets: [u8; 6]) -> Self {
        HardwareAddress(octets)
    }
}

impl fmt::Display for HardwareAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = &self.0;
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            b[0], b[1], b[2], b[3], b[4], b[5]
        )
    }
}
