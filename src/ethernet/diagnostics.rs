use crate::registers::bits::{
    Csr0, CSR4_JAB, CSR4_MFCO, CSR4_RCVCCO, CSR4_TXSTRT, CSR4_UINT, CSR5_EXDINT, CSR5_MPINT,
    CSR5_SINT, CSR5_SLPINT,
};

/// Error conditions reported through CSR0 when ERR is set.
pub(crate) const CSR0_EVENTS: &[(u16, &str)] = &[
    (Csr0::MERR, "Memory Error"),
    (Csr0::MISS, "Missed Frame"),
    (Csr0::CERR, "Collision Error"),
    (Csr0::BABL, "Babble transmitter time-out"),
];

pub(crate) const CSR4_EVENTS: &[(u16, &str)] = &[
    (CSR4_MFCO, "Missed Frame Counter Overflow"),
    (CSR4_UINT, "User Interrupt"),
    (CSR4_RCVCCO, "Receive Collision Counter Overflow"),
    (CSR4_TXSTRT, "Transmit Start"),
    (CSR4_JAB, "Jabber Error"),
];

pub(crate) const CSR5_EVENTS: &[(u16, &str)] = &[
    (CSR5_SINT, "System Interrupt"),
    (CSR5_SLPINT, "Sleep Interrupt"),
    (CSR5_EXDINT, "Excessive Deferral Interrupt"),
    (CSR5_MPINT, "Magic Packet Interrupt"),
];

/// Logs every event of `table` that is set in `status` and returns how many were.
pub(crate) fn report(register: &str, status: u16, table: &[(u16, &str)]) -> usize {
    let mut reported = 0;
    for (mask, label) in table {
        if status & mask != 0 {
            pcnet_debug!("{}: {}", register, label);
            reported += 1;
        }
    }
    reported
}
