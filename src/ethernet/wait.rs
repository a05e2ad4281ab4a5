use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use crate::{
    time::{Clock, Instant},
    TxError,
};

/// Lets another thread abandon a blocked transmit.
#[derive(Debug, Default)]
pub struct CancelToken {
    cancelled: AtomicBool,
}

impl CancelToken {
    /// A token that has not been cancelled.
    pub const fn new() -> Self {
        CancelToken {
            cancelled: AtomicBool::new(false),
        }
    }

    /// Makes every transmit waiting on this token return `TxError::Cancelled`.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Whether `cancel` has been called.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Wakes transmitters waiting for a free descriptor.
///
/// Each notification bumps a generation counter. A waiter samples the counter
/// before it looks at the ring, so a notification that lands between the look and
/// the wait is never lost.
#[derive(Debug, Default)]
pub(crate) struct TxWaiter {
    generation: AtomicU32,
}

impl TxWaiter {
    pub(crate) const fn new() -> Self {
        TxWaiter {
            generation: AtomicU32::new(0),
        }
    }

    pub(crate) fn generation(&self) -> u32 {
        self.generation.load(Ordering::Acquire)
    }

    pub(crate) fn notify(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
    }

    /// Spins until the generation moves past `seen`, the deadline passes, or the
    /// token is cancelled, whichever comes first.
    pub(crate) fn wait<C: Clock + ?Sized>(
        &self,
        seen: u32,
        deadline: Instant,
        clock: &C,
        cancel: &CancelToken,
    ) -> Result<(), TxError> {
        loop {
            if cancel.is_cancelled() {
                return Err(TxError::Cancelled);
            }
            if self.generation() != seen {
                return Ok(());
            }
            if clock.now() >= deadline {
                return Err(TxError::RingFullTimeout);
            }
            core::hint::spin_loop();
        }
    }
}
