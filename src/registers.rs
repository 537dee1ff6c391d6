//! Packed BCD byte views of the digit pairs.
//!
//! Each pair of digits (seconds, minutes, hours) fits in one byte: the tens
//! digit in the high nibble and the units digit in the low nibble, so 23:59:30
//! packs to `0x23`, `0x59`, `0x30`. These views are used to seed the counter
//! from packed bytes and to export the current value in the same form.

use bitfield::bitfield;

// This macro generates the From<u8> and Into<u8> implementations for the
// register type
macro_rules! from_register_u8 {
    ($typ:ty) => {
        impl From<u8> for $typ {
            fn from(v: u8) -> Self {
                paste::paste!([< $typ >](v))
            }
        }
        impl From<$typ> for u8 {
            fn from(v: $typ) -> Self {
                v.0
            }
        }
    };
}

bitfield! {
    /// Seconds pair (0-59) with BCD encoding.
    #[derive(Clone, Copy, Default, PartialEq, Eq)]
    pub struct Seconds(u8);
    impl Debug;
    /// Tens place of seconds (0-5)
    pub ten_seconds, set_ten_seconds: 6, 4;
    /// Ones place of seconds (0-9)
    pub seconds, set_seconds: 3, 0;
}
from_register_u8!(Seconds);

#[cfg(feature = "defmt")]
impl defmt::Format for Seconds {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Seconds({}{}s)", self.ten_seconds(), self.seconds());
    }
}

bitfield! {
    /// Minutes pair (0-59) with BCD encoding.
    #[derive(Clone, Copy, Default, PartialEq, Eq)]
    pub struct Minutes(u8);
    impl Debug;
    /// Tens place of minutes (0-5)
    pub ten_minutes, set_ten_minutes: 6, 4;
    /// Ones place of minutes (0-9)
    pub minutes, set_minutes: 3, 0;
}
from_register_u8!(Minutes);

#[cfg(feature = "defmt")]
impl defmt::Format for Minutes {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Minutes({}{}m)", self.ten_minutes(), self.minutes());
    }
}

bitfield! {
    /// Hours pair (0-23) with BCD encoding, 24-hour only.
    #[derive(Clone, Copy, Default, PartialEq, Eq)]
    pub struct Hours(u8);
    impl Debug;
    /// Tens place of hours (0-2)
    pub ten_hours, set_ten_hours: 5, 4;
    /// Ones place of hours (0-9, 0-3 when tens is 2)
    pub hours, set_hours: 3, 0;
}
from_register_u8!(Hours);

#[cfg(feature = "defmt")]
impl defmt::Format for Hours {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Hours({}{}h)", self.ten_hours(), self.hours());
    }
}
