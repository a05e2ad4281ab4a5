//! PCnet descriptor rings and the device controller built on them

mod buffer_manager;
mod builder;
mod config;
mod controller;
mod descriptor_table;
mod diagnostics;
mod init_block;
mod rx;
mod statistics;
mod tx;
mod volatile_read_write;
mod wait;

pub use buffer_manager::{BufferManager, RingStatus, TxCompletion};
pub use builder::Builder;
pub use config::{DeviceConfig, DeviceState};
pub use controller::Controller;
pub use descriptor_table::{DescriptorEntry, DescriptorTable, Ownership};
pub use init_block::InitializationBlock;
pub use rx::{RxDescriptor, RxRing};
pub use statistics::Statistics;
pub use tx::{TxDescriptor, TxRing};
pub use wait::CancelToken;

/// Octets in a hardware address.
pub const ETH_ALEN: usize = 6;
/// Octets in an Ethernet header.
pub const ETH_HLEN: usize = 14;
/// Largest frame without frame check sequence.
pub const ETH_FRAME_LEN: usize = 1514;

/// Smallest buffer that holds a maximum frame plus its frame check sequence.
pub const MIN_BUFFER_SIZE: usize = ETH_FRAME_LEN + 4;
/// Largest size the 12-bit byte count fields can describe.
pub const MAX_BUFFER_SIZE: usize = 4095;
/// Buffer size used unless the builder says otherwise.
pub const DEFAULT_BUFFER_SIZE: usize = 1544;

/// Descriptors per ring unless the builder says otherwise.
pub const DEFAULT_RING_LENGTH: usize = 4;
/// Largest ring the initialization block can describe.
pub const MAX_RING_LENGTH: usize = 512;
