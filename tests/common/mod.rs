//! A simulated PCnet chip and the platform pieces around it.
//!
//! The simulator decodes port accesses the way the chip does in word and double word
//! I/O mode, keeps a small register file, and plays the chip's side of the rings by
//! reading and writing driver memory through the bus addresses the driver mapped.

#![allow(dead_code)]

use std::{
    sync::{
        atomic::{AtomicBool, AtomicU32, Ordering},
        Arc, OnceLock,
    },
    vec::Vec,
};

use spin::Mutex;

use pcnet::{
    pci::{BaseAddress, BusConfig, PCI_COMMAND},
    port::PortIo,
    resource::{ResourceAllocator, ResourceUnavailable},
    stack::{Frame, NetworkDeliveryError, NetworkStack},
    time::{Clock, Instant},
    Builder, Controller, DmaMapper,
};

pub const IO_BASE: u16 = 0xC000;
pub const IO_LENGTH: u16 = 0x20;
pub const IRQ: u8 = 11;
pub const STATION: [u8; 6] = [0x52, 0x54, 0x00, 0x12, 0x34, 0x56];

// CSR0
pub const INIT: u16 = 1 << 0;
pub const STRT: u16 = 1 << 1;
pub const STOP: u16 = 1 << 2;
pub const TDMD: u16 = 1 << 3;
pub const TXON: u16 = 1 << 4;
pub const RXON: u16 = 1 << 5;
pub const IENA: u16 = 1 << 6;
pub const INTR: u16 = 1 << 7;
pub const IDON: u16 = 1 << 8;
pub const TINT: u16 = 1 << 9;
pub const RINT: u16 = 1 << 10;
pub const MERR: u16 = 1 << 11;
pub const MISS: u16 = 1 << 12;
pub const CERR: u16 = 1 << 13;
pub const BABL: u16 = 1 << 14;
pub const ERR: u16 = 1 << 15;

const CSR0_ACK: u16 = IDON | TINT | RINT | MERR | MISS | CERR | BABL;
const CSR0_INTR: u16 = IDON | TINT | RINT | MERR | MISS | BABL;
const CSR0_ERR: u16 = MERR | MISS | CERR | BABL;

// CSR4 and CSR5 event flags, cleared by writing one.
pub const CSR4_JAB: u16 = 1 << 1;
pub const CSR4_MFCO: u16 = 1 << 9;
const CSR4_ACK: u16 = (1 << 1) | (1 << 3) | (1 << 5) | (1 << 6) | (1 << 9);
pub const CSR5_SINT: u16 = 1 << 11;
const CSR5_ACK: u16 = (1 << 4) | (1 << 7) | (1 << 9) | (1 << 11);

// Receive descriptor word 1 error bits.
pub const RX_CRC: u32 = 1 << 27;
pub const RX_FRAM: u32 = 1 << 29;
// Transmit descriptor word 2 error bits.
pub const TX_UFLO: u32 = 1 << 30;

const OWN: u32 = 1 << 31;
const DESC_ERR: u32 = 1 << 30;
const STP_ENP: u32 = 0x0300_0000;

/// Which I/O mode the simulated chip answers in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Narrow,
    Wide,
    Neither,
}

/// A register level event the driver caused.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    Reset,
    Csr(u8, u16),
    Bcr(u8, u16),
}

/// A platform resource handed back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Released {
    Interrupt(u8),
    Ports(u16),
}

// ---------------------------------------------------------------------------
// DMA

#[derive(Clone, Copy)]
struct Region {
    bus: u32,
    cpu: usize,
    len: usize,
}

/// Hands out 16-byte aligned bus addresses and remembers what they map to.
pub struct SimDma {
    regions: Mutex<Vec<Region>>,
    next: AtomicU32,
}

impl SimDma {
    pub fn new() -> Self {
        SimDma {
            regions: Mutex::new(Vec::new()),
            next: AtomicU32::new(0x0010_0000),
        }
    }

    pub fn regions(&self) -> usize {
        self.regions.lock().len()
    }

    fn translate(&self, bus: u32, len: usize) -> *mut u8 {
        let regions = self.regions.lock();
        let region = regions
            .iter()
            .find(|r| bus >= r.bus && (bus - r.bus) as usize + len <= r.len)
            .unwrap_or_else(|| panic!("chip touched unmapped bus address {:#010x}", bus));
        (region.cpu + (bus - region.bus) as usize) as *mut u8
    }

    fn word(&self, bus: u32) -> &AtomicU32 {
        let ptr = self.translate(bus, 4);
        assert_eq!(ptr as usize % 4, 0);
        unsafe { &*(ptr as *const AtomicU32) }
    }

    fn read_bytes(&self, bus: u32, len: usize) -> Vec<u8> {
        let ptr = self.translate(bus, len);
        let mut bytes = vec![0u8; len];
        unsafe { std::ptr::copy_nonoverlapping(ptr, bytes.as_mut_ptr(), len) };
        bytes
    }

    fn write_bytes(&self, bus: u32, bytes: &[u8]) {
        let ptr = self.translate(bus, bytes.len());
        unsafe { std::ptr::copy_nonoverlapping(bytes.as_ptr(), ptr, bytes.len()) };
    }
}

impl DmaMapper for SimDma {
    fn bus_address(&self, cpu: *const u8, len: usize) -> u32 {
        let size = ((len as u32) + 15) & !15;
        let bus = self.next.fetch_add(size.max(16), Ordering::SeqCst);
        self.regions.lock().push(Region {
            bus,
            cpu: cpu as usize,
            len,
        });
        bus
    }
}

// ---------------------------------------------------------------------------
// The chip

#[derive(Clone, Copy)]
struct Ring {
    base: u32,
    len: usize,
    next: usize,
}

impl Ring {
    fn descriptor(&self, index: usize) -> u32 {
        self.base + 16 * index as u32
    }

    fn advance(&mut self) {
        self.next = (self.next + 1) % self.len;
    }
}

struct Chip {
    mode: Mode,
    rap: u32,
    csr: [u16; 128],
    bcr: [u16; 32],
    aprom: [u8; 16],
    running: bool,
    rx: Option<Ring>,
    tx: Option<Ring>,
    starts: usize,
    inits: usize,
    demands: usize,
    accesses: Vec<Access>,
}

impl Chip {
    fn reset(&mut self) {
        self.csr[0] = STOP;
        self.csr[3] = 0;
        self.csr[4] = 0;
        self.csr[5] = 0;
        self.csr[15] = 0;
        self.running = false;
        self.rx = None;
        self.tx = None;
        self.accesses.push(Access::Reset);
    }

    fn status(&self) -> u16 {
        let mut csr0 = self.csr[0];
        let interrupt = csr0 & CSR0_INTR != 0
            || self.csr[4] & CSR4_ACK != 0
            || self.csr[5] & CSR5_ACK != 0;
        if interrupt {
            csr0 |= INTR;
        }
        if csr0 & CSR0_ERR != 0 {
            csr0 |= ERR;
        }
        csr0
    }

    fn read_csr(&self, index: usize) -> u16 {
        match index {
            0 => self.status(),
            _ => self.csr[index],
        }
    }

    fn write_csr(&mut self, index: usize, value: u16) {
        self.accesses.push(Access::Csr(index as u8, value));
        match index {
            0 => self.write_status(value),
            4 => self.csr[4] = (self.csr[4] & CSR4_ACK & !value) | (value & !CSR4_ACK),
            5 => self.csr[5] = (self.csr[5] & CSR5_ACK & !value) | (value & !CSR5_ACK),
            88 | 89 => {}
            _ => self.csr[index] = value,
        }
    }

    fn write_status(&mut self, value: u16) {
        let csr0 = &mut self.csr[0];
        *csr0 &= !(value & CSR0_ACK);
        *csr0 = (*csr0 & !IENA) | (value & IENA);

        if value & STOP != 0 {
            self.csr[0] = STOP;
            self.running = false;
            self.rx = None;
            self.tx = None;
            return;
        }
        if value & INIT != 0 {
            self.inits += 1;
            self.csr[0] &= !STOP;
        }
        if value & STRT != 0 && !self.running {
            self.running = true;
            self.starts += 1;
            self.csr[0] = (self.csr[0] & !STOP) | STRT | TXON | RXON;
        }
        if value & TDMD != 0 {
            self.demands += 1;
        }
    }

    fn read_rdp(&self) -> u16 {
        self.read_csr(self.rap as usize & 0x7F)
    }
}

/// The simulated chip. Clones share state.
#[derive(Clone)]
pub struct SimNic {
    chip: Arc<Mutex<Chip>>,
    dma: Arc<SimDma>,
}

impl SimNic {
    /// An Am79C970A with the test station address.
    pub fn new(mode: Mode) -> Self {
        Self::with_chip_id(mode, 0x1003, 0x0262)
    }

    pub fn with_chip_id(mode: Mode, csr88: u16, csr89: u16) -> Self {
        let mut aprom = [0u8; 16];
        aprom[..6].copy_from_slice(&STATION);
        aprom[14] = 0x57;
        aprom[15] = 0x57;
        let mut csr = [0u16; 128];
        csr[0] = STOP;
        csr[88] = csr88;
        csr[89] = csr89;
        SimNic {
            chip: Arc::new(Mutex::new(Chip {
                mode,
                rap: 0,
                csr,
                bcr: [0; 32],
                aprom,
                running: false,
                rx: None,
                tx: None,
                starts: 0,
                inits: 0,
                demands: 0,
                accesses: Vec::new(),
            })),
            dma: Arc::new(SimDma::new()),
        }
    }

    pub fn dma(&self) -> &SimDma {
        &self.dma
    }

    /// CSR0 as the driver would read it.
    pub fn status(&self) -> u16 {
        self.chip.lock().status()
    }

    pub fn csr(&self, index: usize) -> u16 {
        self.chip.lock().read_csr(index)
    }

    pub fn bcr(&self, index: usize) -> u16 {
        self.chip.lock().bcr[index]
    }

    pub fn starts(&self) -> usize {
        self.chip.lock().starts
    }

    pub fn inits(&self) -> usize {
        self.chip.lock().inits
    }

    pub fn transmit_demands(&self) -> usize {
        self.chip.lock().demands
    }

    pub fn is_running(&self) -> bool {
        self.chip.lock().running
    }

    pub fn take_accesses(&self) -> Vec<Access> {
        std::mem::take(&mut self.chip.lock().accesses)
    }

    /// Loads the initialization block the driver pointed CSR1/CSR2 at and raises IDON.
    pub fn complete_init(&self) {
        let mut chip = self.chip.lock();
        let address = (chip.csr[2] as u32) << 16 | chip.csr[1] as u32;
        let block = self.dma.read_bytes(address, 28);
        let rdra = u32::from_le_bytes([block[20], block[21], block[22], block[23]]);
        let tdra = u32::from_le_bytes([block[24], block[25], block[26], block[27]]);
        chip.csr[15] = u16::from_le_bytes([block[0], block[1]]);
        chip.rx = Some(Ring {
            base: rdra,
            len: 1 << (block[2] >> 4),
            next: 0,
        });
        chip.tx = Some(Ring {
            base: tdra,
            len: 1 << (block[3] >> 4),
            next: 0,
        });
        chip.csr[0] |= IDON;
    }

    /// The station address the initialization block asked for.
    pub fn init_block_station(&self) -> [u8; 6] {
        let chip = self.chip.lock();
        let address = (chip.csr[2] as u32) << 16 | chip.csr[1] as u32;
        let block = self.dma.read_bytes(address, 28);
        let mut station = [0u8; 6];
        station.copy_from_slice(&block[4..10]);
        station
    }

    /// Receives `frame` into the next receive descriptor. Returns false, and raises
    /// MISS, when the driver has not given that descriptor back yet.
    pub fn deliver(&self, frame: &[u8]) -> bool {
        self.deliver_with_status(frame, 0)
    }

    /// Receives `frame` with the given error bits set in the descriptor.
    pub fn deliver_with_error(&self, frame: &[u8], error: u32) -> bool {
        self.deliver_with_status(frame, DESC_ERR | error)
    }

    fn deliver_with_status(&self, frame: &[u8], status: u32) -> bool {
        let mut chip = self.chip.lock();
        let mut ring = chip.rx.expect("receive ring not loaded");
        let descriptor = ring.descriptor(ring.next);
        let word1 = self.dma.word(descriptor + 4).load(Ordering::Acquire);
        if word1 & OWN == 0 {
            chip.csr[0] |= MISS;
            return false;
        }

        let buffer = self.dma.word(descriptor).load(Ordering::Relaxed);
        let capacity = ((0x1000 - (word1 & 0x0FFF)) & 0x0FFF) as usize;
        assert!(frame.len() <= capacity);
        self.dma.write_bytes(buffer, frame);
        self.dma
            .word(descriptor + 8)
            .store(frame.len() as u32, Ordering::Relaxed);
        self.dma
            .word(descriptor + 4)
            .store((word1 & 0x0000_FFFF) | STP_ENP | status, Ordering::Release);

        ring.advance();
        chip.rx = Some(ring);
        chip.csr[0] |= RINT;
        true
    }

    /// Sends every frame the driver queued and raises TINT if there were any.
    pub fn complete_transmits(&self) -> Vec<Vec<u8>> {
        self.finish_transmits(0)
    }

    /// Like [`SimNic::complete_transmits`], but every frame fails with `error` in word 2.
    pub fn fail_transmits(&self, error: u32) -> Vec<Vec<u8>> {
        self.finish_transmits(error)
    }

    fn finish_transmits(&self, error: u32) -> Vec<Vec<u8>> {
        let mut chip = self.chip.lock();
        let mut ring = match chip.tx {
            Some(ring) => ring,
            None => return Vec::new(),
        };
        let mut sent = Vec::new();
        loop {
            let descriptor = ring.descriptor(ring.next);
            let word1 = self.dma.word(descriptor + 4).load(Ordering::Acquire);
            if word1 & OWN == 0 {
                break;
            }
            let buffer = self.dma.word(descriptor).load(Ordering::Relaxed);
            let len = ((0x1000 - (word1 & 0x0FFF)) & 0x0FFF) as usize;
            sent.push(self.dma.read_bytes(buffer, len));

            self.dma.word(descriptor + 8).store(error, Ordering::Relaxed);
            let word1 = if error != 0 {
                (word1 & !OWN) | DESC_ERR
            } else {
                word1 & !OWN
            };
            self.dma.word(descriptor + 4).store(word1, Ordering::Release);
            ring.advance();
        }
        if !sent.is_empty() {
            chip.csr[0] |= TINT;
        }
        chip.tx = Some(ring);
        sent
    }

    pub fn raise_csr0(&self, bits: u16) {
        self.chip.lock().csr[0] |= bits;
    }

    pub fn raise_csr4(&self, bits: u16) {
        self.chip.lock().csr[4] |= bits;
    }

    pub fn raise_csr5(&self, bits: u16) {
        self.chip.lock().csr[5] |= bits;
    }

    fn ports(&self, base: u16, released: Arc<Mutex<Vec<Released>>>) -> SimPorts {
        SimPorts {
            chip: self.chip.clone(),
            base,
            released,
        }
    }
}

// ---------------------------------------------------------------------------
// Platform

/// A claimed port window on the simulated chip.
pub struct SimPorts {
    chip: Arc<Mutex<Chip>>,
    base: u16,
    released: Arc<Mutex<Vec<Released>>>,
}

impl PortIo for SimPorts {
    fn read_u8(&mut self, offset: u16) -> u8 {
        let chip = self.chip.lock();
        match (chip.mode, offset) {
            (Mode::Neither, _) => 0xFF,
            (_, 0..=15) => chip.aprom[offset as usize],
            _ => 0xFF,
        }
    }

    fn read_u16(&mut self, offset: u16) -> u16 {
        let mut chip = self.chip.lock();
        if chip.mode != Mode::Narrow {
            return 0xFFFF;
        }
        match offset {
            0x10 => chip.read_rdp(),
            0x12 => chip.rap as u16,
            0x14 => {
                chip.reset();
                0
            }
            0x16 => chip.bcr[chip.rap as usize & 0x1F],
            _ => 0xFFFF,
        }
    }

    fn write_u16(&mut self, offset: u16, value: u16) {
        let mut chip = self.chip.lock();
        if chip.mode != Mode::Narrow {
            return;
        }
        write_port(&mut chip, offset, [0x10, 0x12, 0x16], value);
    }

    fn read_u32(&mut self, offset: u16) -> u32 {
        let mut chip = self.chip.lock();
        if chip.mode != Mode::Wide {
            return 0xFFFF_FFFF;
        }
        match offset {
            0x10 => chip.read_rdp() as u32,
            0x14 => chip.rap,
            0x18 => {
                chip.reset();
                0
            }
            0x1C => chip.bcr[chip.rap as usize & 0x1F] as u32,
            _ => 0xFFFF_FFFF,
        }
    }

    fn write_u32(&mut self, offset: u16, value: u32) {
        let mut chip = self.chip.lock();
        if chip.mode != Mode::Wide {
            return;
        }
        write_port(&mut chip, offset, [0x10, 0x14, 0x1C], value as u16);
    }
}

fn write_port(chip: &mut Chip, offset: u16, [rdp, rap, bdp]: [u16; 3], value: u16) {
    if offset == rdp {
        let index = chip.rap as usize & 0x7F;
        chip.write_csr(index, value);
    } else if offset == rap {
        chip.rap = value as u32;
    } else if offset == bdp {
        let index = chip.rap as usize & 0x1F;
        chip.bcr[index] = value;
        chip.accesses.push(Access::Bcr(index as u8, value));
    }
}

impl Drop for SimPorts {
    fn drop(&mut self) {
        self.released.lock().push(Released::Ports(self.base));
    }
}

/// A claimed interrupt line.
pub struct SimIrq {
    pub line: u8,
    pub shared: bool,
    released: Arc<Mutex<Vec<Released>>>,
}

impl Drop for SimIrq {
    fn drop(&mut self) {
        self.released.lock().push(Released::Interrupt(self.line));
    }
}

/// Hands out claims on the simulated chip and logs when they come back.
pub struct SimResources {
    nic: SimNic,
    pub refuse_interrupt: bool,
    pub refuse_ports: bool,
    pub claims: usize,
    released: Arc<Mutex<Vec<Released>>>,
}

impl SimResources {
    pub fn new(nic: &SimNic) -> Self {
        SimResources {
            nic: nic.clone(),
            refuse_interrupt: false,
            refuse_ports: false,
            claims: 0,
            released: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn released(&self) -> Vec<Released> {
        self.released.lock().clone()
    }
}

impl ResourceAllocator for SimResources {
    type Interrupt = SimIrq;
    type Ports = SimPorts;

    fn claim_interrupt_line(
        &mut self,
        _owner: &'static str,
        line: u8,
        shared: bool,
    ) -> Result<SimIrq, ResourceUnavailable> {
        if self.refuse_interrupt {
            return Err(ResourceUnavailable::InterruptLine(line));
        }
        self.claims += 1;
        Ok(SimIrq {
            line,
            shared,
            released: self.released.clone(),
        })
    }

    fn claim_port_range(
        &mut self,
        _owner: &'static str,
        base: u16,
        length: u16,
    ) -> Result<SimPorts, ResourceUnavailable> {
        if self.refuse_ports {
            return Err(ResourceUnavailable::PortRange { base, length });
        }
        self.claims += 1;
        Ok(self.nic.ports(base, self.released.clone()))
    }
}

/// PCI configuration space of the simulated function.
pub struct SimBus {
    pub bars: Vec<BaseAddress>,
    pub interrupt_line: u8,
    pub config: [u8; 256],
}

impl SimBus {
    pub fn new() -> Self {
        let mut config = [0u8; 256];
        config[PCI_COMMAND as usize] = 0x01;
        SimBus {
            bars: vec![BaseAddress::Io {
                base: IO_BASE,
                length: IO_LENGTH,
            }],
            interrupt_line: IRQ,
            config,
        }
    }

    pub fn is_bus_master(&self) -> bool {
        self.config[PCI_COMMAND as usize] & 0x04 != 0
    }
}

impl BusConfig for SimBus {
    fn interrupt_line(&self) -> u8 {
        self.interrupt_line
    }

    fn base_addresses(&self) -> &[BaseAddress] {
        &self.bars
    }

    fn read_config_byte(&mut self, offset: u8) -> u8 {
        self.config[offset as usize]
    }

    fn write_config_byte(&mut self, offset: u8, value: u8) {
        self.config[offset as usize] = value;
    }
}

/// Keeps every frame the driver delivers.
#[derive(Default)]
pub struct RecordingStack {
    frames: Mutex<Vec<Frame>>,
    refuse: AtomicBool,
}

impl RecordingStack {
    pub fn frames(&self) -> Vec<Frame> {
        self.frames.lock().clone()
    }

    pub fn refuse(&self, refuse: bool) {
        self.refuse.store(refuse, Ordering::SeqCst);
    }
}

impl NetworkStack for RecordingStack {
    fn on_receive(&self, frame: Frame) -> Result<(), NetworkDeliveryError> {
        if self.refuse.load(Ordering::SeqCst) {
            return Err(NetworkDeliveryError);
        }
        self.frames.lock().push(frame);
        Ok(())
    }
}

/// Wall clock time since the first clock in the test binary was read.
#[derive(Clone, Copy, Default)]
pub struct StdClock;

impl StdClock {
    pub fn new() -> Self {
        StdClock
    }
}

impl Clock for StdClock {
    fn now(&self) -> Instant {
        static EPOCH: OnceLock<std::time::Instant> = OnceLock::new();
        let epoch = EPOCH.get_or_init(std::time::Instant::now);
        Instant::from_ticks(epoch.elapsed().as_micros() as u64)
    }
}

pub type SimController = Controller<SimPorts, SimIrq, RecordingStack, StdClock>;

/// Everything one test needs around a controller.
pub struct Rig {
    pub nic: SimNic,
    pub bus: SimBus,
    pub resources: SimResources,
}

impl Rig {
    pub fn new(mode: Mode) -> Self {
        let nic = SimNic::new(mode);
        let resources = SimResources::new(&nic);
        Rig {
            nic,
            bus: SimBus::new(),
            resources,
        }
    }

    pub fn attach(&mut self, builder: Builder) -> Result<SimController, pcnet::Error> {
        let dma = self.nic.dma.clone();
        builder.attach(
            &mut self.bus,
            &mut self.resources,
            &*dma,
            RecordingStack::default(),
            StdClock::new(),
        )
    }

    /// Attaches with `builder`, initializes, and services the IDON interrupt.
    pub fn running(&mut self, builder: Builder) -> SimController {
        let controller = self.attach(builder).expect("attach");
        controller.initialize();
        self.nic.complete_init();
        assert_eq!(controller.handle_interrupt(), 1);
        controller
    }
}

/// A minimum size frame to `destination` with a payload byte pattern.
pub fn frame(destination: [u8; 6], fill: u8, len: usize) -> Vec<u8> {
    let mut frame = vec![fill; len];
    frame[..6].copy_from_slice(&destination);
    frame[6..12].fill(0);
    frame[12] = 0x08;
    frame[13] = 0x00;
    frame
}

/// A deadline `millis` from now.
pub fn deadline_in(millis: u64) -> Instant {
    StdClock::new().now() + pcnet::time::Duration::millis(millis)
}
