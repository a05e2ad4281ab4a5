//! Time base for transmit deadlines
//!
//! Deadlines are absolute instants on a 1 MHz tick. The platform supplies the tick
//! source through [`Clock`].

/// An absolute point in time, in microseconds since an arbitrary epoch
pub type Instant = fugit::TimerInstantU64<1_000_000>;

/// A span of time, in microseconds
pub type Duration = fugit::MicrosDurationU64;

/// Monotonic time source used to enforce transmit deadlines
pub trait Clock {
    /// Current time. Must never go backwards.
    fn now(&self) -> Instant;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Instant {
        (**self).now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(u64);

    impl Clock for Fixed {
        fn now(&self) -> Instant {
            Instant::from_ticks(self.0)
        }
    }

    #[test]
    fn deadline_arithmetic_is_in_microseconds() {
        let clock = Fixed(1_000);
        let deadline = clock.now() + Duration::millis(2);
        assert_eq!(deadline.ticks(), 3_000);
        assert!(Fixed(3_000).now() >= deadline);
        assert!(Fixed(2_999).now() < deadline);
    }

    #[test]
    fn references_are_clocks() {
        let clock = Fixed(42);
        let by_ref: &dyn Clock = &clock;
        assert_eq!((&by_ref).now().ticks(), 42);
    }
}
