//! The slice of PCI configuration space the driver depends on

/// Offset of the command register in configuration space.
pub const PCI_COMMAND: u8 = 0x04;
/// Bus master enable bit of the command register.
pub const PCI_COMMAND_MASTER: u8 = 0x04;

/// A decoded base address register.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BaseAddress {
    /// A window in I/O port space.
    Io {
        /// First port of the window.
        base: u16,
        /// Number of ports in the window.
        length: u16,
    },
    /// A window in memory space.
    Memory {
        /// Physical start address.
        base: u64,
        /// Size in bytes.
        length: u64,
    },
}

impl BaseAddress {
    /// True for I/O port windows.
    pub fn is_io(&self) -> bool {
        matches!(self, BaseAddress::Io { .. })
    }
}

/// Configuration space access for one PCI function.
pub trait BusConfig {
    /// The interrupt line routed to this function.
    fn interrupt_line(&self) -> u8;

    /// Base address registers in BAR order. Unimplemented BARs are omitted.
    fn base_addresses(&self) -> &[BaseAddress];

    /// Reads one byte of configuration space.
    fn read_config_byte(&mut self, offset: u8) -> u8;

    /// Writes one byte of configuration space.
    fn write_config_byte(&mut self, offset: u8, value: u8);
}

/// Lets the function master the bus so it can reach the rings.
pub(crate) fn enable_bus_master<B: BusConfig + ?Sized>(bus: &mut B) {
    let command = bus.read_config_byte(PCI_COMMAND);
    bus.write_config_byte(PCI_COMMAND, command | PCI_COMMAND_MASTER);
}
