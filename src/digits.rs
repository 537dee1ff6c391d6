//! The six-digit BCD time value.
//!
//! [`Digits`] stores hours, minutes and seconds as six independent decimal
//! digits. Every constructor validates its input, so a `Digits` value always
//! satisfies the per-digit bounds below:
//!
//! - units digits: 0-9
//! - tens of seconds and tens of minutes: 0-5
//! - tens of hours: 0-2, with hours units limited to 0-3 when tens is 2
//!
//! # Conversions
//!
//! - to/from chrono `NaiveTime`
//! - to/from packed BCD bytes ([`Hours`], [`Minutes`], [`Seconds`])
//!
//! Conversion errors are reported via [`DigitsError`].

use chrono::{NaiveTime, Timelike};

use crate::registers::{Hours, Minutes, Seconds};

/// Largest value of any units digit.
pub const UNITS_MAX: u8 = 9;
/// Largest value of the tens-of-seconds digit.
pub const SECONDS_TENS_MAX: u8 = 5;
/// Largest value of the tens-of-minutes digit.
pub const MINUTES_TENS_MAX: u8 = 5;
/// Largest value of the tens-of-hours digit.
pub const HOURS_TENS_MAX: u8 = 2;
/// Largest hours-units digit once tens of hours is at [`HOURS_TENS_MAX`].
pub const HOURS_UNITS_MAX_AT_TOP: u8 = 3;

/// Six BCD digits making up an `hh:mm:ss` value.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Digits {
    pub(crate) seconds_units: u8,
    pub(crate) seconds_tens: u8,
    pub(crate) minutes_units: u8,
    pub(crate) minutes_tens: u8,
    pub(crate) hours_units: u8,
    pub(crate) hours_tens: u8,
}

impl Digits {
    /// 00:00:00
    pub const ZERO: Digits = Digits {
        seconds_units: 0,
        seconds_tens: 0,
        minutes_units: 0,
        minutes_tens: 0,
        hours_units: 0,
        hours_tens: 0,
    };

    /// Builds a value from decimal hours, minutes and seconds.
    ///
    /// # Errors
    /// `DigitsError::InvalidTime` if any component is out of range.
    pub const fn from_hms(hours: u8, minutes: u8, seconds: u8) -> Result<Self, DigitsError> {
        if hours > 23 || minutes > 59 || seconds > 59 {
            return Err(DigitsError::InvalidTime);
        }
        Ok(Digits {
            seconds_units: seconds % 10,
            seconds_tens: seconds / 10,
            minutes_units: minutes % 10,
            minutes_tens: minutes / 10,
            hours_units: hours % 10,
            hours_tens: hours / 10,
        })
    }

    pub fn seconds_units(&self) -> u8 {
        self.seconds_units
    }

    pub fn seconds_tens(&self) -> u8 {
        self.seconds_tens
    }

    pub fn minutes_units(&self) -> u8 {
        self.minutes_units
    }

    pub fn minutes_tens(&self) -> u8 {
        self.minutes_tens
    }

    pub fn hours_units(&self) -> u8 {
        self.hours_units
    }

    pub fn hours_tens(&self) -> u8 {
        self.hours_tens
    }

    /// Decimal hours (0-23).
    pub fn hours(&self) -> u8 {
        10 * self.hours_tens + self.hours_units
    }

    /// Decimal minutes (0-59).
    pub fn minutes(&self) -> u8 {
        10 * self.minutes_tens + self.minutes_units
    }

    /// Decimal seconds (0-59).
    pub fn seconds(&self) -> u8 {
        10 * self.seconds_tens + self.seconds_units
    }

    /// Seconds since 00:00:00.
    pub fn total_seconds(&self) -> u32 {
        3600 * u32::from(self.hours()) + 60 * u32::from(self.minutes()) + u32::from(self.seconds())
    }

    /// Checks every digit against its bound, including the compound hour rule.
    pub fn is_valid(&self) -> bool {
        self.seconds_units <= UNITS_MAX
            && self.seconds_tens <= SECONDS_TENS_MAX
            && self.minutes_units <= UNITS_MAX
            && self.minutes_tens <= MINUTES_TENS_MAX
            && self.hours_units <= UNITS_MAX
            && self.hours_tens <= HOURS_TENS_MAX
            && (self.hours_tens < HOURS_TENS_MAX || self.hours_units <= HOURS_UNITS_MAX_AT_TOP)
    }

    /// True when everything above the seconds-units digit is zero.
    pub(crate) fn is_floor_above_seconds_units(&self) -> bool {
        self.hours_tens == 0
            && self.hours_units == 0
            && self.minutes_tens == 0
            && self.minutes_units == 0
            && self.seconds_tens == 0
    }

    /// Converts to a chrono `NaiveTime`.
    ///
    /// # Errors
    /// `DigitsError::InvalidTime` if chrono rejects the value.
    pub fn to_time(&self) -> Result<NaiveTime, DigitsError> {
        NaiveTime::from_hms_opt(
            u32::from(self.hours()),
            u32::from(self.minutes()),
            u32::from(self.seconds()),
        )
        .ok_or(DigitsError::InvalidTime)
    }

    /// Packs the digits into BCD bytes.
    pub fn to_registers(&self) -> (Hours, Minutes, Seconds) {
        let mut hours = Hours::default();
        hours.set_ten_hours(self.hours_tens);
        hours.set_hours(self.hours_units);
        let mut minutes = Minutes::default();
        minutes.set_ten_minutes(self.minutes_tens);
        minutes.set_minutes(self.minutes_units);
        let mut seconds = Seconds::default();
        seconds.set_ten_seconds(self.seconds_tens);
        seconds.set_seconds(self.seconds_units);
        (hours, minutes, seconds)
    }
}

impl From<NaiveTime> for Digits {
    fn from(time: NaiveTime) -> Self {
        // chrono keeps hour < 24, minute < 60 and second < 60; leap seconds
        // show up only in the nanosecond field.
        let (h, m, s) = (time.hour() as u8, time.minute() as u8, time.second() as u8);
        Digits {
            seconds_units: s % 10,
            seconds_tens: s / 10,
            minutes_units: m % 10,
            minutes_tens: m / 10,
            hours_units: h % 10,
            hours_tens: h / 10,
        }
    }
}

impl TryFrom<(Hours, Minutes, Seconds)> for Digits {
    type Error = DigitsError;

    fn try_from((hours, minutes, seconds): (Hours, Minutes, Seconds)) -> Result<Self, Self::Error> {
        let digits = Digits {
            seconds_units: seconds.seconds(),
            seconds_tens: seconds.ten_seconds(),
            minutes_units: minutes.minutes(),
            minutes_tens: minutes.ten_minutes(),
            hours_units: hours.hours(),
            hours_tens: hours.ten_hours(),
        };
        if !digits.is_valid() {
            debug!("rejecting packed time {:?}", digits);
            return Err(DigitsError::InvalidBcd);
        }
        Ok(digits)
    }
}

impl TryFrom<[u8; 3]> for Digits {
    type Error = DigitsError;

    /// Parses `[hours, minutes, seconds]` packed BCD bytes.
    fn try_from(data: [u8; 3]) -> Result<Self, Self::Error> {
        Digits::try_from((
            Hours::from(data[0]),
            Minutes::from(data[1]),
            Seconds::from(data[2]),
        ))
    }
}

impl From<&Digits> for [u8; 3] {
    fn from(digits: &Digits) -> [u8; 3] {
        let (hours, minutes, seconds) = digits.to_registers();
        [hours.into(), minutes.into(), seconds.into()]
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Errors that can occur while building a [`Digits`] value.
pub enum DigitsError {
    /// Hours, minutes or seconds out of range
    InvalidTime,
    /// A packed BCD nibble is out of range for its digit
    InvalidBcd,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hms_valid() {
        let digits = Digits::from_hms(23, 59, 30).unwrap();
        assert_eq!(digits.hours_tens(), 2);
        assert_eq!(digits.hours_units(), 3);
        assert_eq!(digits.minutes_tens(), 5);
        assert_eq!(digits.minutes_units(), 9);
        assert_eq!(digits.seconds_tens(), 3);
        assert_eq!(digits.seconds_units(), 0);
        assert!(digits.is_valid());
    }

    #[test]
    fn test_from_hms_invalid() {
        assert_eq!(Digits::from_hms(24, 0, 0), Err(DigitsError::InvalidTime));
        assert_eq!(Digits::from_hms(0, 60, 0), Err(DigitsError::InvalidTime));
        assert_eq!(Digits::from_hms(0, 0, 60), Err(DigitsError::InvalidTime));
    }

    #[test]
    fn test_is_valid_compound_hour_bound() {
        let mut digits = Digits::from_hms(19, 0, 0).unwrap();
        assert!(digits.is_valid());
        digits.hours_tens = 2;
        // 29 is not an hour
        assert!(!digits.is_valid());
        digits.hours_units = 3;
        assert!(digits.is_valid());
    }

    #[test]
    fn test_is_valid_tens_bound() {
        let mut digits = Digits::ZERO;
        digits.seconds_tens = 6;
        assert!(!digits.is_valid());
        digits.seconds_tens = 5;
        digits.minutes_tens = 6;
        assert!(!digits.is_valid());
    }

    #[test]
    fn test_total_seconds() {
        assert_eq!(Digits::ZERO.total_seconds(), 0);
        assert_eq!(Digits::from_hms(23, 59, 59).unwrap().total_seconds(), 86_399);
        assert_eq!(Digits::from_hms(1, 2, 3).unwrap().total_seconds(), 3723);
    }

    #[test]
    fn test_naive_time_conversions() {
        let time = NaiveTime::from_hms_opt(15, 30, 7).unwrap();
        let digits = Digits::from(time);
        assert_eq!(digits.hours(), 15);
        assert_eq!(digits.minutes(), 30);
        assert_eq!(digits.seconds(), 7);
        assert_eq!(digits.to_time().unwrap(), time);
    }

    #[test]
    fn test_packed_bytes() {
        let digits = Digits::try_from([0x23_u8, 0x59, 0x30]).unwrap();
        assert_eq!(digits, Digits::from_hms(23, 59, 30).unwrap());
        let bytes: [u8; 3] = (&digits).into();
        assert_eq!(bytes, [0x23, 0x59, 0x30]);
    }

    #[test]
    fn test_packed_bytes_invalid() {
        // 24 hours
        assert_eq!(
            Digits::try_from([0x24_u8, 0x00, 0x00]),
            Err(DigitsError::InvalidBcd)
        );
        // 0x5A is not BCD
        assert_eq!(
            Digits::try_from([0x00_u8, 0x5A, 0x00]),
            Err(DigitsError::InvalidBcd)
        );
        // 60 seconds
        assert_eq!(
            Digits::try_from([0x00_u8, 0x00, 0x60]),
            Err(DigitsError::InvalidBcd)
        );
    }

    #[test]
    fn test_floor_detection() {
        assert!(Digits::ZERO.is_floor_above_seconds_units());
        assert!(Digits::from_hms(0, 0, 9).unwrap().is_floor_above_seconds_units());
        assert!(!Digits::from_hms(0, 0, 10).unwrap().is_floor_above_seconds_units());
        assert!(!Digits::from_hms(1, 0, 0).unwrap().is_floor_above_seconds_units());
    }
}
