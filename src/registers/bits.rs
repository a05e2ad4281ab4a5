//! Register bit layouts

enum Csr0BitNumbers {
    Init = 0,
    Start = 1,
    Stop = 2,
    TransmitDemand = 3,
    TransmitOn = 4,
    ReceiveOn = 5,
    InterruptEnable = 6,
    Interrupt = 7,
    InitDone = 8,
    TransmitInterrupt = 9,
    ReceiveInterrupt = 10,
    MemoryError = 11,
    MissedFrame = 12,
    CollisionError = 13,
    Babble = 14,
    Error = 15,
}

/// Controller status and command register (CSR0)
///
/// Status bits 8 to 14 are write-one-to-clear, so writing back a value that was just
/// read acknowledges exactly the events it reported.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Csr0(u16);

impl Csr0 {
    /// Memory error
    pub const MERR: u16 = 1 << Csr0BitNumbers::MemoryError as u16;
    /// Missed frame
    pub const MISS: u16 = 1 << Csr0BitNumbers::MissedFrame as u16;
    /// Collision error
    pub const CERR: u16 = 1 << Csr0BitNumbers::CollisionError as u16;
    /// Babble
    pub const BABL: u16 = 1 << Csr0BitNumbers::Babble as u16;

    /// Wraps a raw register value.
    pub const fn new(bits: u16) -> Self {
        Csr0(bits)
    }

    /// Raw register value.
    pub const fn bits(self) -> u16 {
        self.0
    }

    fn is_set(self, bit: Csr0BitNumbers) -> bool {
        self.0 & (1 << bit as u16) != 0
    }

    fn with(self, bit: Csr0BitNumbers) -> Self {
        Csr0(self.0 | (1 << bit as u16))
    }

    /// INTR: some enabled interrupt source is pending.
    pub fn is_interrupt_pending(self) -> bool {
        self.is_set(Csr0BitNumbers::Interrupt)
    }

    /// IDON: the chip finished reading the initialization block.
    pub fn is_init_done(self) -> bool {
        self.is_set(Csr0BitNumbers::InitDone)
    }

    /// TINT: a transmit descriptor was handed back.
    pub fn is_transmit_interrupt(self) -> bool {
        self.is_set(Csr0BitNumbers::TransmitInterrupt)
    }

    /// RINT: a receive descriptor was handed back.
    pub fn is_receive_interrupt(self) -> bool {
        self.is_set(Csr0BitNumbers::ReceiveInterrupt)
    }

    /// ERR: one of BABL, CERR, MISS or MERR is set.
    pub fn is_error(self) -> bool {
        self.is_set(Csr0BitNumbers::Error)
    }

    /// IENA as currently set.
    pub fn is_interrupt_enabled(self) -> bool {
        self.is_set(Csr0BitNumbers::InterruptEnable)
    }

    /// STOP as currently set.
    pub fn is_stopped(self) -> bool {
        self.is_set(Csr0BitNumbers::Stop)
    }

    /// TXON and RXON are both set.
    pub fn is_running(self) -> bool {
        self.is_set(Csr0BitNumbers::TransmitOn) && self.is_set(Csr0BitNumbers::ReceiveOn)
    }

    /// Sets INIT, which makes the chip read the initialization block.
    pub fn set_init(self) -> Self {
        self.with(Csr0BitNumbers::Init)
    }

    /// Sets STRT, which enables the transmit and receive engines.
    pub fn set_start(self) -> Self {
        self.with(Csr0BitNumbers::Start)
    }

    /// Sets STOP, which halts all DMA activity.
    pub fn set_stop(self) -> Self {
        self.with(Csr0BitNumbers::Stop)
    }

    /// Sets TDMD, which makes the chip poll the transmit ring now.
    pub fn set_transmit_demand(self) -> Self {
        self.with(Csr0BitNumbers::TransmitDemand)
    }

    /// Sets IENA.
    pub fn set_interrupt_enable(self) -> Self {
        self.with(Csr0BitNumbers::InterruptEnable)
    }

    /// Sets IDON, which acknowledges initialization done.
    pub fn set_init_done(self) -> Self {
        self.with(Csr0BitNumbers::InitDone)
    }
}

/// CSR4: jabber error
pub const CSR4_JAB: u16 = 1 << 1;
/// CSR4: transmit start status
pub const CSR4_TXSTRT: u16 = 1 << 3;
/// CSR4: receive collision counter overflow
pub const CSR4_RCVCCO: u16 = 1 << 5;
/// CSR4: user interrupt
pub const CSR4_UINT: u16 = 1 << 6;
/// CSR4: missed frame counter overflow
pub const CSR4_MFCO: u16 = 1 << 9;
/// CSR4: auto pad short transmit frames
pub const CSR4_APAD_XMT: u16 = 1 << 11;
/// CSR4: disable the DMA burst transfer counter
pub const CSR4_DMAPLUS: u16 = 1 << 14;

/// CSR5: magic packet interrupt enable
pub const CSR5_MPINTE: u16 = 1 << 3;
/// CSR5: magic packet interrupt
pub const CSR5_MPINT: u16 = 1 << 4;
/// CSR5: excessive deferral interrupt enable
pub const CSR5_EXDINTE: u16 = 1 << 6;
/// CSR5: excessive deferral interrupt
pub const CSR5_EXDINT: u16 = 1 << 7;
/// CSR5: sleep interrupt enable
pub const CSR5_SLPINTE: u16 = 1 << 8;
/// CSR5: sleep interrupt
pub const CSR5_SLPINT: u16 = 1 << 9;
/// CSR5: system interrupt enable
pub const CSR5_SINE: u16 = 1 << 10;
/// CSR5: system interrupt
pub const CSR5_SINT: u16 = 1 << 11;
/// CSR5: last transmit interrupt enable
pub const CSR5_LTINTEN: u16 = 1 << 14;

/// CSR15: disable the receiver
pub const CSR15_DRX: u16 = 1 << 0;
/// CSR15: disable the transmitter
pub const CSR15_DTX: u16 = 1 << 1;

/// BCR2: automatic media selection
pub const BCR2_ASEL: u16 = 1 << 1;
/// BCR9: full-duplex enable
pub const BCR9_FDEN: u16 = 1 << 0;
/// BCR20: 32-bit PCnet-PCI descriptors and initialization block
pub const BCR20_SWSTYLE_PCNET_PCI: u16 = 2;
