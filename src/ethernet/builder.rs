use super::{
    descriptor_table::{check_buffer_size, check_ring_length},
    BufferManager, Controller, DeviceConfig, DEFAULT_BUFFER_SIZE, DEFAULT_RING_LENGTH,
};
use crate::{
    chipid::ChipVersion,
    dma::DmaMapper,
    pci::{self, BaseAddress, BusConfig},
    registers::{
        bits::{CSR15_DRX, CSR15_DTX},
        Csr, RegisterAccess, Registers,
    },
    resource::ResourceAllocator,
    stack::NetworkStack,
    time::Clock,
    Error, HardwareAddress,
};

/// Attach-time settings for one PCnet device.
#[derive(Clone, Debug)]
pub struct Builder {
    rx_ring_length: usize,
    tx_ring_length: usize,
    buffer_size: usize,
    owner: &'static str,
    shared_interrupt: bool,
}

impl Builder {
    /// Four descriptors per ring, 1544 byte buffers, shared interrupt.
    pub fn new() -> Self {
        Builder {
            rx_ring_length: DEFAULT_RING_LENGTH,
            tx_ring_length: DEFAULT_RING_LENGTH,
            buffer_size: DEFAULT_BUFFER_SIZE,
            owner: "pcnet",
            shared_interrupt: true,
        }
    }

    /// Number of receive descriptors. Must be a power of two up to 512.
    pub fn set_receive_ring_length(mut self, length: usize) -> Self {
        self.rx_ring_length = length;
        self
    }

    /// Configured receive ring length.
    pub fn receive_ring_length(&self) -> usize {
        self.rx_ring_length
    }

    /// Number of transmit descriptors. Must be a power of two up to 512.
    pub fn set_transmit_ring_length(mut self, length: usize) -> Self {
        self.tx_ring_length = length;
        self
    }

    /// Configured transmit ring length.
    pub fn transmit_ring_length(&self) -> usize {
        self.tx_ring_length
    }

    /// Size of each DMA buffer, between 1518 and 4095 bytes.
    pub fn set_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size;
        self
    }

    /// Configured DMA buffer size.
    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    /// Name the interrupt line and port range are claimed under.
    pub fn set_owner(mut self, owner: &'static str) -> Self {
        self.owner = owner;
        self
    }

    /// Configured resource owner name.
    pub fn owner(&self) -> &'static str {
        self.owner
    }

    /// Claims the interrupt line exclusively instead of sharing it.
    pub fn exclusive_interrupt(mut self) -> Self {
        self.shared_interrupt = false;
        self
    }

    /// Whether the interrupt line is claimed as shared.
    pub fn has_shared_interrupt(&self) -> bool {
        self.shared_interrupt
    }

    /// Claims the device's resources, identifies the chip, allocates the rings and
    /// enables bus mastering.
    ///
    /// The returned controller is in the `Probed` state. Call `initialize` to bring
    /// the link up. If any step fails, everything claimed so far is released before
    /// the error is returned.
    pub fn attach<B, A, M, S, C>(
        self,
        bus: &mut B,
        resources: &mut A,
        dma: &M,
        stack: S,
        clock: C,
    ) -> Result<Controller<A::Ports, A::Interrupt, S, C>, Error>
    where
        B: BusConfig + ?Sized,
        A: ResourceAllocator + ?Sized,
        M: DmaMapper + ?Sized,
        S: NetworkStack,
        C: Clock,
    {
        check_ring_length(self.rx_ring_length)?;
        check_ring_length(self.tx_ring_length)?;
        check_buffer_size(self.buffer_size)?;

        let (io_base, io_length) = match bus.base_addresses().first() {
            None => {
                pcnet_warn!("cannot find iobase: no base addresses");
                return Err(Error::NoBaseAddress);
            }
            Some(BaseAddress::Io { base, length }) => (*base, *length),
            Some(BaseAddress::Memory { .. }) => {
                pcnet_warn!("cannot find iobase: first address is not I/O");
                return Err(Error::NotIoSpace);
            }
        };
        let interrupt_line = bus.interrupt_line();
        pcnet_debug!(
            "found PCnet at {:#x} length {} irq {}",
            io_base,
            io_length,
            interrupt_line
        );

        let interrupt =
            resources.claim_interrupt_line(self.owner, interrupt_line, self.shared_interrupt)?;
        // On any error below, dropping `interrupt` (and the ports) releases them.
        let ports = resources.claim_port_range(self.owner, io_base, io_length)?;
        let mut registers = Registers::probe(ports)?;
        pcnet_debug!("register access is {}", registers.width());

        let chip = ChipVersion::from_registers(
            registers.csr(Csr::ChipIdLow),
            registers.csr(Csr::ChipIdHigh),
        );
        let hardware_address = read_hardware_address(&mut registers);
        pcnet_info!("found {} with hardware address {}", chip, hardware_address);

        let buffers = BufferManager::new(
            CSR15_DRX | CSR15_DTX,
            self.rx_ring_length,
            self.tx_ring_length,
            self.buffer_size,
            hardware_address,
            dma,
        )?;

        pci::enable_bus_master(bus);

        let config = DeviceConfig {
            io_base,
            io_length,
            interrupt_line,
            access_width: registers.width(),
            chip,
            hardware_address,
            rx_ring_length: self.rx_ring_length,
            tx_ring_length: self.tx_ring_length,
            buffer_size: self.buffer_size,
        };
        Ok(Controller::new(registers, buffers, config, interrupt, stack, clock))
    }
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

fn read_hardware_address<R: RegisterAccess>(registers: &mut R) -> HardwareAddress {
    let mut octets = [0u8; HardwareAddress::LEN];
    for (offset, octet) in octets.iter_mut().enumerate() {
        *octet = registers.aprom(offset as u16);
    }
    HardwareAddress::new(octets)
}
