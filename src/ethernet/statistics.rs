use core::sync::atomic::{AtomicU32, Ordering};

/// Running totals since attach.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Statistics {
    /// Frames handed to the network stack.
    pub rx_frames: u32,
    /// Received frames discarded because the chip flagged them or they did not fit one buffer.
    pub rx_dropped: u32,
    /// Frames the network stack refused.
    pub rx_delivery_failures: u32,
    /// Frames queued for transmission.
    pub tx_frames: u32,
    /// Transmit descriptors handed back without error.
    pub tx_completed: u32,
    /// Transmit descriptors handed back with an error.
    pub tx_errors: u32,
    /// Transmitted frames that needed at least one retry.
    pub tx_collisions: u32,
    /// Passes through the interrupt service loop that found INTR set.
    pub interrupts: u32,
    /// Error and status events logged from CSR0, CSR4 and CSR5.
    pub events: u32,
}

macro_rules! counters {
    ($($field:ident),* $(,)?) => {
        #[derive(Debug, Default)]
        pub(crate) struct Counters {
            $( pub(crate) $field: AtomicU32, )*
        }

        impl Counters {
            pub(crate) fn snapshot(&self) -> Statistics {
                Statistics {
                    $( $field: self.$field.load(Ordering::Relaxed), )*
                }
            }
        }
    };
}

counters!(
    rx_frames,
    rx_dropped,
    rx_delivery_failures,
    tx_frames,
    tx_completed,
    tx_errors,
    tx_collisions,
    interrupts,
    events,
);

pub(crate) fn add(counter: &AtomicU32, amount: usize) {
    if amount != 0 {
        counter.fetch_add(amount as u32, Ordering::Relaxed);
    }
}
