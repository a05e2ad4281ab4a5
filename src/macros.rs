// Driver diagnostics go to `defmt` when that feature is enabled, to the `log`
// facade otherwise, and nowhere when both are disabled.

#[cfg(feature = "defmt")]
macro_rules! pcnet_log {
    ($level:ident, $($arg:expr),*) => {
        defmt::$level!($($arg),*)
    };
}

#[cfg(all(feature = "log", not(feature = "defmt")))]
macro_rules! pcnet_log {
    ($level:ident, $($arg:expr),*) => {
        log::$level!($($arg),*)
    };
}

#[cfg(not(any(feature = "log", feature = "defmt")))]
macro_rules! pcnet_log {
    ($level:ident, $($arg:expr),*) => {{
        $( let _ = &$arg; )*
    }};
}

macro_rules! pcnet_trace {
    ($($arg:expr),* $(,)?) => {
        pcnet_log!(trace, $($arg),*)
    };
}

macro_rules! pcnet_debug {
    ($($arg:expr),* $(,)?) => {
        pcnet_log!(debug, $($arg),*)
    };
}

macro_rules! pcnet_info {
    ($($arg:expr),* $(,)?) => {
        pcnet_log!(info, $($arg),*)
    };
}

macro_rules! pcnet_warn {
    ($($arg:expr),* $(,)?) => {
        pcnet_log!(warn, $($arg),*)
    };
}
