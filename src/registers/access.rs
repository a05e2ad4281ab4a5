use paste::paste;

use super::{AccessWidth, Bcr, Csr, RegisterAccess};
use crate::port::PortIo;

// Probe handshake: after a reset CSR0 reads back STOP only, and the address
// pointer holds whatever index was last written to it.
const PROBE_STATUS: u32 = 0x0004;
const PROBE_INDEX: u32 = 88;

macro_rules! define_register_access {
    (
        $(#[$attr:meta])*
        $name:ident, $width:ident, $word:ident,
        rdp: $rdp:expr, rap: $rap:expr, reset: $reset:expr, bdp: $bdp:expr
    ) => {
        paste! {
            $(#[$attr])*
            #[derive(Debug)]
            pub struct $name<P> {
                io: P,
            }

            impl<P: PortIo> $name<P> {
                const RDP: u16 = $rdp;
                const RAP: u16 = $rap;
                const RESET: u16 = $reset;
                const BDP: u16 = $bdp;

                /// Wraps a port window the chip is known to answer on in this mode.
                pub fn new(io: P) -> Self {
                    $name { io }
                }

                /// Gives back the port window.
                pub fn into_inner(self) -> P {
                    self.io
                }

                /// Runs the reset and address pointer handshake in this mode.
                pub fn detect(io: &mut P) -> bool {
                    io.[<read_ $word>](Self::RESET);
                    io.[<write_ $word>](Self::RAP, 0);
                    if io.[<read_ $word>](Self::RDP) as u32 != PROBE_STATUS {
                        return false;
                    }
                    io.[<write_ $word>](Self::RAP, PROBE_INDEX as $word);
                    (io.[<read_ $word>](Self::RAP) as u32 & 0xFFFF) == PROBE_INDEX
                }

                fn select(&mut self, index: u8) {
                    self.io.[<write_ $word>](Self::RAP, index as $word);
                }
            }

            impl<P: PortIo> RegisterAccess for $name<P> {
                fn width(&self) -> AccessWidth {
                    AccessWidth::$width
                }

                fn csr(&mut self, register: Csr) -> u16 {
                    self.select(register as u8);
                    (self.io.[<read_ $word>](Self::RDP) as u32 & 0xFFFF) as u16
                }

                fn set_csr(&mut self, register: Csr, value: u16) {
                    self.select(register as u8);
                    self.io.[<write_ $word>](Self::RDP, value as $word);
                }

                fn bcr(&mut self, register: Bcr) -> u16 {
                    self.select(register as u8);
                    (self.io.[<read_ $word>](Self::BDP) as u32 & 0xFFFF) as u16
                }

                fn set_bcr(&mut self, register: Bcr, value: u16) {
                    self.select(register as u8);
                    self.io.[<write_ $word>](Self::BDP, value as $word);
                }

                fn reset(&mut self) {
                    self.io.[<read_ $word>](Self::RESET);
                }

                fn aprom(&mut self, offset: u16) -> u8 {
                    self.io.read_u8(offset)
                }
            }
        }
    };
}

define_register_access!(
    /// Word I/O mode register access.
    NarrowAccess, Narrow, u16,
    rdp: 0x10, rap: 0x12, reset: 0x14, bdp: 0x16
);

define_register_access!(
    /// Double word I/O mode register access.
    WideAccess, Wide, u32,
    rdp: 0x10, rap: 0x14, reset: 0x18, bdp: 0x1C
);
