use alloc::boxed::Box;
use core::mem::{size_of, take};

use void::Void;

use super::{
    descriptor_table::Ownership,
    init_block::InitializationBlock,
    rx::{Received, RxRing},
    tx::{self, TxRing},
};
use crate::{dma::DmaMapper, stack::Frame, Error, HardwareAddress, TxError};

/// Snapshot of one descriptor ring.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RingStatus {
    /// Number of descriptors in the ring.
    pub capacity: usize,
    /// Index the driver's cursor is at.
    pub next_index: usize,
    /// Descriptors currently owned by the chip.
    pub hardware_owned: usize,
}

/// Transmit descriptors the chip has handed back since the last reclaim.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TxCompletion {
    /// Frames that went out.
    pub sent: usize,
    /// Frames the chip gave up on.
    pub errors: usize,
    /// Frames that needed at least one retry.
    pub collisions: usize,
}

impl TxCompletion {
    /// Total descriptors handed back.
    pub fn total(&self) -> usize {
        self.sent + self.errors
    }
}

/// The initialization block and both descriptor rings, allocated once per device.
pub struct BufferManager {
    init_block: Box<InitializationBlock>,
    init_block_address: u32,
    rx: RxRing,
    tx: TxRing,

    tx_dirty: usize, // Oldest descriptor not yet reclaimed
    tx_in_flight: usize,
    completions: TxCompletion,
    rx_dropped: usize,
}

impl BufferManager {
    /// Allocates and maps everything the chip will read at INIT.
    ///
    /// Receive descriptors start out owned by the chip and transmit descriptors by
    /// the driver.
    pub fn new<M: DmaMapper + ?Sized>(
        mode: u16,
        rx_ring_length: usize,
        tx_ring_length: usize,
        buffer_size: usize,
        hardware_address: HardwareAddress,
        dma: &M,
    ) -> Result<Self, Error> {
        let rx = RxRing::allocate(rx_ring_length, buffer_size, Ownership::Hardware, dma)?;
        let tx = TxRing::allocate(tx_ring_length, buffer_size, Ownership::Software, dma)?;

        let init_block = Box::new(InitializationBlock::new(
            mode,
            rx.length_exponent(),
            tx.length_exponent(),
            hardware_address,
            rx.base_address(),
            tx.base_address(),
        ));
        let init_block_address = dma.bus_address(
            &*init_block as *const InitializationBlock as *const u8,
            size_of::<InitializationBlock>(),
        );

        pcnet_debug!(
            "init block at {:#x}, {} receive descriptors at {:#x}, {} transmit descriptors at {:#x}",
            init_block_address,
            rx.capacity(),
            rx.base_address(),
            tx.capacity(),
            tx.base_address()
        );

        Ok(BufferManager {
            init_block,
            init_block_address,
            rx,
            tx,
            tx_dirty: 0,
            tx_in_flight: 0,
            completions: TxCompletion::default(),
            rx_dropped: 0,
        })
    }

    /// Bus address to load into CSR1/CSR2.
    pub fn init_block_address(&self) -> u32 {
        self.init_block_address
    }

    /// The block the chip reads at INIT.
    pub fn init_block(&self) -> &InitializationBlock {
        &self.init_block
    }

    /// Puts both rings back in their power-on state: every receive descriptor owned
    /// by the chip, every transmit descriptor owned by the driver, cursors at zero.
    ///
    /// Only valid while the chip is stopped, since INIT restarts it at the first
    /// descriptor of each ring.
    pub fn reset(&mut self) {
        self.rx.reset(Ownership::Hardware);
        self.tx.reset(Ownership::Software);
        self.tx_dirty = 0;
        self.tx_in_flight = 0;
    }

    /// Queues one frame.
    ///
    /// Returns `WouldBlock` when the descriptor under the cursor still belongs to
    /// the chip, leaving the ring untouched.
    pub fn transmit(&mut self, frame: &[u8]) -> nb::Result<(), TxError> {
        self.transmit_with(frame.len(), |buffer| buffer.copy_from_slice(frame))
    }

    /// Queues a `len` byte frame that `fill` writes straight into the DMA buffer.
    pub fn transmit_with<R, F: FnOnce(&mut [u8]) -> R>(
        &mut self,
        len: usize,
        fill: F,
    ) -> nb::Result<R, TxError> {
        self.collect_transmitted();
        let r = self.tx.send(len, fill)?;
        self.tx_in_flight += 1;
        Ok(r)
    }

    /// Takes the next good frame off the receive ring.
    ///
    /// Descriptors holding bad or multi-buffer frames are recycled and counted on
    /// the way; see [`BufferManager::take_dropped`].
    pub fn receive_poll(&mut self) -> nb::Result<Frame, Void> {
        loop {
            match self.rx.receive()? {
                Received::Frame(frame) => return Ok(frame),
                Received::Dropped => self.rx_dropped += 1,
            }
        }
    }

    /// Number of received frames discarded since the last call.
    pub fn take_dropped(&mut self) -> usize {
        take(&mut self.rx_dropped)
    }

    /// Accounts for every transmit descriptor the chip has handed back since the
    /// last call.
    pub fn reclaim_transmitted(&mut self) -> TxCompletion {
        self.collect_transmitted();
        take(&mut self.completions)
    }

    /// Transmit descriptors handed to the chip and not yet reclaimed.
    pub fn transmit_in_flight(&self) -> usize {
        self.tx_in_flight
    }

    /// Receive ring snapshot.
    pub fn rx_status(&self) -> RingStatus {
        RingStatus {
            capacity: self.rx.capacity(),
            next_index: self.rx.next_index(),
            hardware_owned: self.rx.count_owned_by(Ownership::Hardware),
        }
    }

    /// Transmit ring snapshot.
    pub fn tx_status(&self) -> RingStatus {
        RingStatus {
            capacity: self.tx.capacity(),
            next_index: self.tx.next_index(),
            hardware_owned: self.tx.count_owned_by(Ownership::Hardware),
        }
    }

    /// Frees the initialization block, both rings and every buffer.
    ///
    /// The chip must already be stopped.
    pub fn release(self) {
        let BufferManager {
            init_block,
            rx,
            tx,
            ..
        } = self;
        drop(rx);
        drop(tx);
        drop(init_block);
    }

    fn collect_transmitted(&mut self) {
        while self.tx_in_flight > 0 {
            let status = self.tx.descriptor(self.tx_dirty).read();
            if status.is_owned_by_hardware() {
                break;
            }

            if status.has_error() {
                pcnet_debug!("transmit failed: {}", tx::describe_error(&status));
                self.completions.errors += 1;
            } else {
                self.completions.sent += 1;
            }
            if status.had_collisions() {
                self.completions.collisions += 1;
            }

            self.tx_in_flight -= 1;
            self.tx_dirty = (self.tx_dirty + 1) % self.tx.capacity();
        }
    }
}
