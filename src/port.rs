//! Port I/O on a claimed register window
//!
//! A [`PortIo`] value is the driver's handle on the chip's I/O space. Offsets are
//! relative to the start of the claimed window, and dropping the handle gives the
//! window back to whoever handed it out.

/// Raw access to an I/O port window.
///
/// PCnet chips only honor 8-bit reads of the address PROM and accesses of the width
/// they were switched into, so the trait exposes exactly those.
pub trait PortIo {
    /// Reads one byte at `offset`.
    fn read_u8(&mut self, offset: u16) -> u8;
    /// Reads a 16-bit word at `offset`.
    fn read_u16(&mut self, offset: u16) -> u16;
    /// Writes a 16-bit word at `offset`.
    fn write_u16(&mut self, offset: u16, value: u16);
    /// Reads a 32-bit double word at `offset`.
    fn read_u32(&mut self, offset: u16) -> u32;
    /// Writes a 32-bit double word at `offset`.
    fn write_u32(&mut self, offset: u16, value: u32);
}

impl<P: PortIo + ?Sized> PortIo for &mut P {
    fn read_u8(&mut self, offset: u16) -> u8 {
        (**self).read_u8(offset)
    }
    fn read_u16(&mut self, offset: u16) -> u16 {
        (**self).read_u16(offset)
    }
    fn write_u16(&mut self, offset: u16, value: u16) {
        (**self).write_u16(offset, value)
    }
    fn read_u32(&mut self, offset: u16) -> u32 {
        (**self).read_u32(offset)
    }
    fn write_u32(&mut self, offset: u16, value: u32) {
        (**self).write_u32(offset, value)
    }
}

#[cfg(all(feature = "x86-pio", target_arch = "x86_64"))]
pub use self::x86::PortRange;

#[cfg(all(feature = "x86-pio", target_arch = "x86_64"))]
mod x86 {
    use x86_64::instructions::port::Port;

    use super::PortIo;

    /// A range of x86 I/O ports, accessed with `in`/`out`.
    #[derive(Debug)]
    pub struct PortRange {
        base: u16,
        length: u16,
    }

    impl PortRange {
        /// # Safety
        ///
        /// The caller must own the ports `base..base + length` exclusively for the
        /// lifetime of the returned value, and they must belong to a PCnet device.
        pub unsafe fn new(base: u16, length: u16) -> Self {
            PortRange { base, length }
        }

        /// First port of the range.
        pub fn base(&self) -> u16 {
            self.base
        }

        /// Number of ports in the range.
        pub fn length(&self) -> u16 {
            self.length
        }

        fn port(&self, offset: u16) -> u16 {
            debug_assert!(offset < self.length);
            self.base + offset
        }
    }

    impl PortIo for PortRange {
        fn read_u8(&mut self, offset: u16) -> u8 {
            let mut port = Port::<u8>::new(self.port(offset));
            unsafe { port.read() }
        }

        fn read_u16(&mut self, offset: u16) -> u16 {
            let mut port = Port::<u16>::new(self.port(offset));
            unsafe { port.read() }
        }

        fn write_u16(&mut self, offset: u16, value: u16) {
            let mut port = Port::<u16>::new(self.port(offset));
            unsafe { port.write(value) }
        }

        fn read_u32(&mut self, offset: u16) -> u32 {
            let mut port = Port::<u32>::new(self.port(offset));
            unsafe { port.read() }
        }

        fn write_u32(&mut self, offset: u16, value: u32) {
            let mut port = Port::<u32>::new(self.port(offset));
            unsafe { port.write(value) }
        }
    }
}
