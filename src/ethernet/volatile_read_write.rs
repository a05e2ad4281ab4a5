/// Volatile access to memory the device also reads and writes.
pub(crate) trait VolatileReadWrite<T> {
    fn read_volatile(&self) -> T;
    fn write_volatile(&mut self, new_value: T);
}

// Descriptor words are little endian on the bus.
impl VolatileReadWrite<u32> for u32 {
    #[inline]
    fn read_volatile(&self) -> u32 {
        u32::from_le(unsafe { core::ptr::read_volatile(self) })
    }

    #[inline]
    fn write_volatile(&mut self, new_value: u32) {
        unsafe { core::ptr::write_volatile(self, new_value.to_le()) }
    }
}
