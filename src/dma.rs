//! Bus addresses for driver memory
//!
//! PCnet chips in software style 2 take 32-bit bus addresses for the initialization
//! block, both rings and every buffer. The driver allocates that memory itself and
//! asks the platform for the address the device should use.

/// Translates driver memory into addresses the device can master.
pub trait DmaMapper {
    /// Bus address of the `len` bytes starting at `cpu`.
    ///
    /// Called once per region while attaching. The region stays allocated and
    /// does not move until the controller is released. It must be reachable below
    /// 4 GiB and contiguous on the bus.
    fn bus_address(&self, cpu: *const u8, len: usize) -> u32;
}

impl<M: DmaMapper + ?Sized> DmaMapper for &M {
    fn bus_address(&self, cpu: *const u8, len: usize) -> u32 {
        (**self).bus_address(cpu, len)
    }
}

/// Identity mapping, for platforms where the heap is physically addressed in the
/// low 4 GiB.
#[derive(Clone, Copy, Debug, Default)]
pub struct IdentityMapper;

impl DmaMapper for IdentityMapper {
    fn bus_address(&self, cpu: *const u8, len: usize) -> u32 {
        let address = cpu as usize;
        debug_assert!(address as u64 + len as u64 <= u32::MAX as u64 + 1);
        address as u32
    }
}

#[cfg(test)]
pub(crate) use self::tests::SequentialMapper;
