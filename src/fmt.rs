//! Logging shims.
//!
//! Forwards to `defmt` or `log` depending on the enabled feature. With neither
//! enabled the arguments are still type-checked but nothing is emitted.
#![allow(unused_macros)]

cfg_if::cfg_if! {
    if #[cfg(feature = "defmt")] {
        macro_rules! trace {
            ($($arg:tt)*) => { ::defmt::trace!($($arg)*) };
        }
        macro_rules! debug {
            ($($arg:tt)*) => { ::defmt::debug!($($arg)*) };
        }
    } else if #[cfg(feature = "log")] {
        macro_rules! trace {
            ($($arg:tt)*) => { ::log::trace!($($arg)*) };
        }
        macro_rules! debug {
            ($($arg:tt)*) => { ::log::debug!($($arg)*) };
        }
    } else {
        macro_rules! trace {
            ($($arg:tt)*) => {{ let _ = ::core::format_args!($($arg)*); }};
        }
        macro_rules! debug {
            ($($arg:tt)*) => {{ let _ = ::core::format_args!($($arg)*); }};
        }
    }
}
