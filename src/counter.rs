//! Tick-driven BCD counter.
//!
//! [`CounterEngine`] accumulates raw timer ticks and, every
//! `ticks_per_step` ticks, moves the six-digit value by one second in the
//! requested [`Direction`].
//!
//! # Rollover rules
//!
//! Carries and borrows travel up the chain seconds units, seconds tens,
//! minutes units, minutes tens, hours units, hours tens:
//!
//! - units digits wrap between 9 and 0
//! - tens of seconds and tens of minutes wrap between 5 and 0
//! - hours follow the 0-23 rule: 09 -> 10, 19 -> 20 and 23 -> 00 when counting
//!   up, 10 -> 09 and 20 -> 19 when counting down
//!
//! Counting down stops at 00:00:00 instead of wrapping to 23:59:59. Counting
//! up from 23:59:59 does wrap to 00:00:00, so the two directions behave
//! differently at the day boundary.

use crate::digits::{
    Digits, HOURS_TENS_MAX, HOURS_UNITS_MAX_AT_TOP, MINUTES_TENS_MAX, SECONDS_TENS_MAX, UNITS_MAX,
};
use crate::mode::Direction;

/// Owns the digits and the tick accumulator.
#[derive(Debug, Clone)]
pub struct CounterEngine {
    digits: Digits,
    accumulator: u16,
    ticks_per_step: u16,
}

impl CounterEngine {
    /// Creates an engine starting at `seed`.
    ///
    /// A `ticks_per_step` of 0 is treated as 1.
    pub fn new(seed: Digits, ticks_per_step: u16) -> Self {
        Self {
            digits: seed,
            accumulator: 0,
            ticks_per_step: ticks_per_step.max(1),
        }
    }

    pub fn digits(&self) -> Digits {
        self.digits
    }

    /// Raw ticks seen since the last step.
    pub fn accumulator(&self) -> u16 {
        self.accumulator
    }

    pub fn ticks_per_step(&self) -> u16 {
        self.ticks_per_step
    }

    /// Counts one raw tick. Returns `true` when the tick completed a logical
    /// second and the digits moved.
    pub fn on_tick(&mut self, direction: Direction) -> bool {
        self.accumulator += 1;
        if self.accumulator < self.ticks_per_step {
            return false;
        }
        self.accumulator = 0;
        self.step(direction);
        true
    }

    /// Moves the digits by one second.
    pub fn step(&mut self, direction: Direction) {
        let next = adjust(self.digits, direction);
        debug_assert!(next.is_valid(), "digit out of bounds: {:?}", next);
        trace!("step {:?}: {:?} -> {:?}", direction, self.digits, next);
        self.digits = next;
    }
}

/// One carry/borrow step for a digit bounded by `max`.
///
/// Returns the normalised digit and the (possibly adjusted) next-higher digit.
fn carry(digit: i8, next: i8, max: u8, step: i8) -> (i8, i8) {
    let max = max as i8;
    if digit > max {
        (0, next + step)
    } else if digit < 0 {
        (max, next + step)
    } else {
        (digit, next)
    }
}

fn adjust(digits: Digits, direction: Direction) -> Digits {
    let step = direction.step();
    let su = digits.seconds_units as i8 + step;

    if su < 0 && digits.is_floor_above_seconds_units() {
        return Digits {
            seconds_units: 0,
            ..digits
        };
    }

    let (su, st) = carry(su, digits.seconds_tens as i8, UNITS_MAX, step);
    let (st, mu) = carry(st, digits.minutes_units as i8, SECONDS_TENS_MAX, step);
    let (mu, mt) = carry(mu, digits.minutes_tens as i8, UNITS_MAX, step);
    let (mt, hu) = carry(mt, digits.hours_units as i8, MINUTES_TENS_MAX, step);

    let ht = digits.hours_tens as i8;
    let (hu, ht) = if hu > UNITS_MAX as i8 && ht < HOURS_TENS_MAX as i8 {
        (0, ht + step)
    } else if hu > HOURS_UNITS_MAX_AT_TOP as i8 && ht == HOURS_TENS_MAX as i8 {
        (0, 0)
    } else if hu < 0 {
        // no 00 -> 23 case: the floor guard stops the chain before it gets here
        (UNITS_MAX as i8, ht + step)
    } else {
        (hu, ht)
    };

    Digits {
        seconds_units: su as u8,
        seconds_tens: st as u8,
        minutes_units: mu as u8,
        minutes_tens: mt as u8,
        hours_units: hu as u8,
        hours_tens: ht as u8,
    }
}
