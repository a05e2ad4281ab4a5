use core::sync::atomic::{fence, Ordering};

use spin::Mutex;

use super::{
    buffer_manager::{BufferManager, RingStatus},
    config::{DeviceConfig, DeviceState},
    diagnostics::{self, CSR0_EVENTS, CSR4_EVENTS, CSR5_EVENTS},
    statistics::{self, Counters, Statistics},
    wait::{CancelToken, TxWaiter},
    ETH_ALEN,
};
use crate::{
    port::PortIo,
    registers::{
        bits::{
            Csr0, BCR20_SWSTYLE_PCNET_PCI, BCR2_ASEL, BCR9_FDEN, CSR4_APAD_XMT, CSR4_DMAPLUS,
            CSR5_EXDINTE, CSR5_LTINTEN, CSR5_MPINTE, CSR5_SINE, CSR5_SLPINTE,
        },
        Bcr, Csr, RegisterAccess, Registers,
    },
    stack::NetworkStack,
    time::{Clock, Instant},
    HardwareAddress, TxError,
};

// Everything behind the device lock: register access, both rings, and the state.
struct Shared<P> {
    registers: Registers<P>,
    buffers: BufferManager,
    state: DeviceState,
}

#[derive(Clone, Copy)]
struct InterruptStatus {
    csr0: Csr0,
    csr3: u16,
    csr4: u16,
    csr5: u16,
}

/// A PCnet device after attach.
///
/// `P` is the claimed port window, `I` the claimed interrupt line, `S` the network
/// stack that receives frames, and `C` the clock transmit deadlines are measured on.
///
/// All methods take `&self`. Callers may transmit from any number of threads while
/// the platform's interrupt dispatcher runs `handle_interrupt`.
pub struct Controller<P, I, S, C> {
    shared: Mutex<Shared<P>>,
    tx_waiter: TxWaiter,
    counters: Counters,
    config: DeviceConfig,
    stack: S,
    clock: C,
    interrupt: I,
}

impl<P: PortIo, I, S: NetworkStack, C: Clock> Controller<P, I, S, C> {
    pub(super) fn new(
        registers: Registers<P>,
        buffers: BufferManager,
        config: DeviceConfig,
        interrupt: I,
        stack: S,
        clock: C,
    ) -> Self {
        Controller {
            shared: Mutex::new(Shared {
                registers,
                buffers,
                state: DeviceState::Probed,
            }),
            tx_waiter: TxWaiter::new(),
            counters: Counters::default(),
            config,
            stack,
            clock,
            interrupt,
        }
    }

    /// Station address read from the address PROM at attach.
    pub fn hardware_address(&self) -> HardwareAddress {
        self.config.hardware_address()
    }

    /// What attach found out about the device.
    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    /// Current lifecycle state.
    pub fn state(&self) -> DeviceState {
        self.shared.lock().state
    }

    /// Counters since attach.
    pub fn statistics(&self) -> Statistics {
        self.counters.snapshot()
    }

    /// Receive ring snapshot.
    pub fn rx_ring_status(&self) -> RingStatus {
        self.shared.lock().buffers.rx_status()
    }

    /// Transmit ring snapshot.
    pub fn tx_ring_status(&self) -> RingStatus {
        self.shared.lock().buffers.tx_status()
    }

    /// The network stack frames are delivered to.
    pub fn stack(&self) -> &S {
        &self.stack
    }

    /// The claimed interrupt line.
    pub fn interrupt(&self) -> &I {
        &self.interrupt
    }

    /// Resets and configures the chip, then asks it to load the initialization block.
    ///
    /// Does not wait for the load. The device starts once `handle_interrupt` sees
    /// initialization done. Valid from any state, so a disabled device can be brought
    /// back up; the rings are returned to their power-on state first.
    pub fn initialize(&self) {
        let mut shared = self.shared.lock();
        let Shared {
            registers,
            buffers,
            state,
        } = &mut *shared;

        registers.reset();
        buffers.reset();

        registers.set_bcr(Bcr::SoftwareStyle, BCR20_SWSTYLE_PCNET_PCI);
        registers.set_bcr(Bcr::MiscConfig, BCR2_ASEL);
        registers.set_bcr(Bcr::FullDuplex, BCR9_FDEN);
        registers.set_csr(Csr::FeatureControl, CSR4_DMAPLUS | CSR4_APAD_XMT);
        registers.set_csr(
            Csr::ExtendedControl,
            CSR5_LTINTEN | CSR5_SINE | CSR5_SLPINTE | CSR5_EXDINTE | CSR5_MPINTE,
        );
        *state = DeviceState::Configured;

        // The chip reads the block and rings by DMA as soon as INIT is set.
        fence(Ordering::SeqCst);
        let address = buffers.init_block_address();
        registers.set_csr(Csr::InitBlockLow, (address & 0xFFFF) as u16);
        registers.set_csr(Csr::InitBlockHigh, ((address >> 16) & 0xFFFF) as u16);
        registers.set_csr(
            Csr::Status,
            Csr0::default().set_init().set_interrupt_enable().bits(),
        );
        *state = DeviceState::InitCommitted;
        drop(shared);

        pcnet_debug!("initialization block committed at {:#x}", address);
        // Anyone still waiting on the old rings has to look again.
        self.tx_waiter.notify();
    }

    /// Resets and stops the chip. Calling it again changes nothing.
    pub fn disable(&self) {
        {
            let mut shared = self.shared.lock();
            shared.registers.reset();
            shared
                .registers
                .set_csr(Csr::Status, Csr0::default().set_stop().bits());
            shared.state = DeviceState::Disabled;
        }
        self.tx_waiter.notify();
    }

    /// Queues `frame` for transmission, waiting up to `deadline` for a free descriptor.
    ///
    /// The source address field is overwritten with the device's hardware address in
    /// the DMA copy; `frame` itself is not modified.
    pub fn transmit(&self, frame: &[u8], deadline: Instant) -> Result<(), TxError> {
        self.transmit_cancellable(frame, deadline, &CancelToken::new())
    }

    /// [`Controller::transmit`], abandoning the wait when `cancel` fires.
    pub fn transmit_cancellable(
        &self,
        frame: &[u8],
        deadline: Instant,
        cancel: &CancelToken,
    ) -> Result<(), TxError> {
        let source = self.config.hardware_address();
        loop {
            // Sampled before looking at the ring so a completion in between is not missed.
            let seen = self.tx_waiter.generation();
            {
                let mut shared = self.shared.lock();
                if shared.state != DeviceState::Running {
                    return Err(TxError::NotRunning);
                }

                let claimed = shared.buffers.transmit_with(frame.len(), |buffer| {
                    buffer.copy_from_slice(frame);
                    source.write_to(&mut buffer[ETH_ALEN..]);
                });
                match claimed {
                    Ok(()) => {
                        let csr0 = Csr0::new(shared.registers.csr(Csr::Status));
                        let demand = if csr0.is_interrupt_enabled() {
                            Csr0::default().set_interrupt_enable()
                        } else {
                            Csr0::default()
                        };
                        shared
                            .registers
                            .set_csr(Csr::Status, demand.set_transmit_demand().bits());
                        statistics::add(&self.counters.tx_frames, 1);
                        pcnet_trace!("queued {} byte frame", frame.len());
                        return Ok(());
                    }
                    Err(nb::Error::WouldBlock) => {}
                    Err(nb::Error::Other(err)) => return Err(err),
                }
            }

            pcnet_trace!("transmit ring full, waiting");
            self.tx_waiter.wait(seen, deadline, &self.clock, cancel)?;
        }
    }

    /// Services the device until it stops signalling.
    ///
    /// Returns the number of passes that found INTR set; zero means the interrupt
    /// was not for this device.
    pub fn handle_interrupt(&self) -> usize {
        let mut passes = 0;
        loop {
            let status = {
                let mut shared = self.shared.lock();
                let csr0 = Csr0::new(shared.registers.csr(Csr::Status));
                if !csr0.is_interrupt_pending() {
                    break;
                }
                let status = InterruptStatus {
                    csr0,
                    csr3: shared.registers.csr(Csr::InterruptMasks),
                    csr4: shared.registers.csr(Csr::FeatureControl),
                    csr5: shared.registers.csr(Csr::ExtendedControl),
                };

                // Writing back what was read acknowledges exactly those events.
                shared.registers.set_csr(Csr::Status, status.csr0.bits());
                shared.registers.set_csr(Csr::FeatureControl, status.csr4);
                shared.registers.set_csr(Csr::ExtendedControl, status.csr5);

                if status.csr0.is_init_done() {
                    shared.registers.set_csr(Csr::Mode, 0);
                    shared.registers.set_csr(
                        Csr::Status,
                        Csr0::default()
                            .set_start()
                            .set_interrupt_enable()
                            .set_init_done()
                            .bits(),
                    );
                    shared.state = DeviceState::Running;
                    pcnet_info!("{} initialization complete", self.config.chip());
                }
                status
            };
            passes += 1;
            statistics::add(&self.counters.interrupts, 1);
            pcnet_trace!(
                "interrupt csr0={:#x} csr3={:#x} csr4={:#x} csr5={:#x}",
                status.csr0.bits(),
                status.csr3,
                status.csr4,
                status.csr5
            );

            if status.csr0.is_transmit_interrupt() {
                self.complete_transmits();
            }
            if status.csr0.is_receive_interrupt() {
                self.drain_receive_ring();
            }

            let mut events = 0;
            if status.csr0.is_error() {
                events += diagnostics::report("CSR0", status.csr0.bits(), CSR0_EVENTS);
            }
            events += diagnostics::report("CSR4", status.csr4, CSR4_EVENTS);
            events += diagnostics::report("CSR5", status.csr5, CSR5_EVENTS);
            statistics::add(&self.counters.events, events);
        }
        passes
    }

    /// Gives everything back: ring memory first, then the port window, then the
    /// interrupt line.
    ///
    /// The chip is stopped first if it might still be mastering the bus.
    pub fn release(self) {
        let Controller {
            shared, interrupt, ..
        } = self;
        let Shared {
            mut registers,
            buffers,
            state,
        } = shared.into_inner();

        if state != DeviceState::Disabled {
            registers.reset();
            registers.set_csr(Csr::Status, Csr0::default().set_stop().bits());
        }
        buffers.release();
        drop(registers.into_inner());
        drop(interrupt);
        pcnet_debug!("released PCnet device");
    }

    fn complete_transmits(&self) {
        let completion = self.shared.lock().buffers.reclaim_transmitted();
        statistics::add(&self.counters.tx_completed, completion.sent);
        statistics::add(&self.counters.tx_errors, completion.errors);
        statistics::add(&self.counters.tx_collisions, completion.collisions);
        self.tx_waiter.notify();
    }

    fn drain_receive_ring(&self) {
        loop {
            let (polled, dropped) = {
                let mut shared = self.shared.lock();
                let polled = shared.buffers.receive_poll();
                (polled, shared.buffers.take_dropped())
            };
            statistics::add(&self.counters.rx_dropped, dropped);

            match polled {
                Ok(frame) => {
                    pcnet_trace!("received {} byte frame", frame.len());
                    statistics::add(&self.counters.rx_frames, 1);
                    if let Err(err) = self.stack.on_receive(frame) {
                        pcnet_warn!("frame delivery failed: {}", err);
                        statistics::add(&self.counters.rx_delivery_failures, 1);
                    }
                }
                Err(nb::Error::WouldBlock) => break,
                Err(nb::Error::Other(never)) => void::unreachable(never),
            }
        }
    }
}
