use core::fmt;

/// PCnet family member, decoded from the chip identification registers (CSR88/CSR89)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChipVersion {
    /// PCnet-ISA
    Am79C960,
    /// PCnet-ISA+
    Am79C961,
    /// PCnet-ISA II
    Am79C961A,
    /// PCnet-32
    Am79C965,
    /// PCnet-PCI
    Am79C970,
    /// PCnet-PCI II
    Am79C970A,
    /// PCnet-FAST
    Am79C971,
    /// PCnet-FAST+
    Am79C972,
    /// PCnet-FAST III
    Am79C973,
    /// PCnet-FAST III, non-PCI variant
    Am79C975,
    /// PCnet-PRO
    Am79C976,
    /// PCnet-Home
    Am79C978,
    /// A part number this driver does not recognize
    Unknown(u16),
}

impl ChipVersion {
    /// Decodes the 16-bit part number held in bits 27:12 of the chip identification word.
    pub fn from_registers(csr88: u16, csr89: u16) -> Self {
        let id = (csr88 as u32) | ((csr89 as u32) << 16);
        Self::from_part_number(((id >> 12) & 0xFFFF) as u16)
    }

    /// Maps a raw part number onto a known chip.
    pub fn from_part_number(part: u16) -> Self {
        match part {
            0x2003 => ChipVersion::Am79C960,
            0x2260 => ChipVersion::Am79C961,
            0x2261 => ChipVersion::Am79C961A,
            0x2430 => ChipVersion::Am79C965,
            0x2420 => ChipVersion::Am79C970,
            0x2621 => ChipVersion::Am79C970A,
            0x2623 => ChipVersion::Am79C971,
            0x2624 => ChipVersion::Am79C972,
            0x2625 => ChipVersion::Am79C973,
            0x2627 => ChipVersion::Am79C975,
            0x2628 => ChipVersion::Am79C976,
            0x2626 => ChipVersion::Am79C978,
            other => ChipVersion::Unknown(other),
        }
    }

    /// The raw part number.
    pub fn part_number(&self) -> u16 {
        match self {
            ChipVersion::Am79C960 => 0x2003,
            ChipVersion::Am79C961 => 0x2260,
            ChipVersion::Am79C961A => 0x2261,
            ChipVersion::Am79C965 => 0x2430,
            ChipVersion::Am79C970 => 0x2420,
            ChipVersion::Am79C970A => 0x2621,
            ChipVersion::Am79C971 => 0x2623,
            ChipVersion::Am79C972 => 0x2624,
            ChipVersion::Am79C973 => 0x2625,
            ChipVersion::Am79C975 => 0x2627,
            ChipVersion::Am79C976 => 0x2628,
            ChipVersion::Am79C978 => 0x2626,
            ChipVersion::Unknown(part) => *part,
        }
    }

    /// Marketing name of the chip.
    pub fn name(&self) -> &'static str {
        match self {
            ChipVersion::Am79C960 => "PCnet/ISA 79C960",
            ChipVersion::Am79C961 => "PCnet/ISA+ 79C961",
            ChipVersion::Am79C961A => "PCnet/ISA II 79C961A",
            ChipVersion::Am79C965 => "PCnet/32 79C965",
            ChipVersion::Am79C970 => "PCnet/PCI 79C970",
            ChipVersion::Am79C970A => "PCnet/PCI II 79C970A",
            ChipVersion::Am79C971 => "PCnet/FAST 79C971",
            ChipVersion::Am79C972 => "PCnet/FAST+ 79C972",
            ChipVersion::Am79C973 => "PCnet/FAST III 79C973",
            ChipVersion::Am79C975 => "PCnet/FAST III 79C975",
            ChipVersion::Am79C976 => "PCnet/PRO 79C976",
            ChipVersion::Am79C978 => "PCnet/Home 79C978",
            ChipVersion::Unknown(_) => "unknown PCnet",
        }
    }
}

impl fmt::Display for ChipVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChipVersion::Unknown(part) => write!(f, "unknown PCnet (part {:#x})", part),
            known => f.write_str(known.name()),
        }
    }
}
