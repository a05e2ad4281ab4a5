use crate::{AccessWidth, ChipVersion, HardwareAddress};

/// What attach found out about the device, fixed for the controller's lifetime.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceConfig {
    pub(super) io_base: u16,
    pub(super) io_length: u16,
    pub(super) interrupt_line: u8,
    pub(super) access_width: AccessWidth,
    pub(super) chip: ChipVersion,
    pub(super) hardware_address: HardwareAddress,
    pub(super) rx_ring_length: usize,
    pub(super) tx_ring_length: usize,
    pub(super) buffer_size: usize,
}

impl DeviceConfig {
    /// First port of the register window.
    pub fn io_base(&self) -> u16 {
        self.io_base
    }

    /// Size of the register window.
    pub fn io_length(&self) -> u16 {
        self.io_length
    }

    /// Interrupt line the device signals on.
    pub fn interrupt_line(&self) -> u8 {
        self.interrupt_line
    }

    /// Register access width the probe settled on.
    pub fn access_width(&self) -> AccessWidth {
        self.access_width
    }

    /// Chip identified from CSR88/CSR89.
    pub fn chip(&self) -> ChipVersion {
        self.chip
    }

    /// Station address read from the address PROM.
    pub fn hardware_address(&self) -> HardwareAddress {
        self.hardware_address
    }

    /// Number of receive descriptors.
    pub fn rx_ring_length(&self) -> usize {
        self.rx_ring_length
    }

    /// Number of transmit descriptors.
    pub fn tx_ring_length(&self) -> usize {
        self.tx_ring_length
    }

    /// Size of each DMA buffer.
    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }
}

/// Where the device is in its lifecycle.
///
/// `Released` has no variant: releasing consumes the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceState {
    /// Attached and identified. The chip has not been configured.
    Probed,
    /// Reset and feature registers written, initialization block not yet committed.
    Configured,
    /// INIT issued. Waiting for the chip to report IDON.
    InitCommitted,
    /// Started. Frames flow in both directions.
    Running,
    /// Reset and stopped.
    Disabled,
}
