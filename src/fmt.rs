//! Logging front-end.
//!
//! Firmware builds log through defmt (RTT transport). Host test builds print to stdout,
//! anything else compiles the call sites away. Format strings must stay within the
//! common subset of defmt and `core::fmt` (`{}`, `{:?}`, `{:02X}`).
#![allow(unused_macros)]

macro_rules! log_at {
    ($level:ident, $tag:literal, $s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(feature = "defmt")]
            ::defmt::$level!($s $(, $x)*);
            #[cfg(all(not(feature = "defmt"), test))]
            ::std::println!(concat!("[", $tag, "] ", $s) $(, $x)*);
            #[cfg(not(any(feature = "defmt", test)))]
            let _ = ($( & $x ),*);
        }
    };
}

macro_rules! trace {
    ($($t:tt)*) => { log_at!(trace, "TRACE", $($t)*) };
}

macro_rules! debug {
    ($($t:tt)*) => { log_at!(debug, "DEBUG", $($t)*) };
}

macro_rules! info {
    ($($t:tt)*) => { log_at!(info, "INFO", $($t)*) };
}

macro_rules! warn {
    ($($t:tt)*) => { log_at!(warn, "WARN", $($t)*) };
}

macro_rules! error {
    ($($t:tt)*) => { log_at!(error, "ERROR", $($t)*) };
}
