//! Four-position multiplexed display refresh.
//!
//! The display has one shared digit-value port and one enable line per
//! position. A refresh cycle visits positions 0 to 3 in order; for each it
//! writes the value, enables the position, holds for the settle delay and
//! disables it again. Only one position is ever enabled, and a position is
//! never enabled before its value has been written.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{OutputPin, PinState};

use crate::Snapshot;

/// Number of physical display positions.
pub const POSITIONS: usize = 4;

/// Output surface for the value shown by the currently enabled position.
pub trait DigitPort {
    type Error;

    /// Puts `value` (0-9) on the port.
    fn write_digit(&mut self, value: u8) -> Result<(), Self::Error>;
}

/// A [`DigitPort`] made of four output pins carrying bits 0..3 of the value,
/// as read by a BCD to seven-segment decoder.
pub struct BcdPort<P> {
    lines: [P; 4],
}

impl<P: OutputPin> BcdPort<P> {
    /// `lines[0]` carries the least significant bit.
    pub fn new(lines: [P; 4]) -> Self {
        Self { lines }
    }

    pub fn release(self) -> [P; 4] {
        self.lines
    }
}

impl<P: OutputPin> DigitPort for BcdPort<P> {
    type Error = P::Error;

    fn write_digit(&mut self, value: u8) -> Result<(), Self::Error> {
        for (bit, line) in self.lines.iter_mut().enumerate() {
            line.set_state(PinState::from(value & (1 << bit) != 0))?;
        }
        Ok(())
    }
}

/// Electrical level that turns a position on.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EnableLevel {
    /// Low enables the position (PNP digit drivers)
    #[default]
    ActiveLow,
    /// High enables the position
    ActiveHigh,
}

impl EnableLevel {
    fn on(self) -> PinState {
        match self {
            EnableLevel::ActiveLow => PinState::Low,
            EnableLevel::ActiveHigh => PinState::High,
        }
    }

    fn off(self) -> PinState {
        !self.on()
    }
}

/// Errors raised during a refresh.
#[derive(Debug)]
pub enum DisplayError<PortE, PinE> {
    /// Writing the digit value failed
    Port(PortE),
    /// Driving an enable line failed
    Enable(PinE),
}

/// Multiplexes four digits over a shared [`DigitPort`].
pub struct DisplayMux<PORT, EN> {
    port: PORT,
    enables: [EN; POSITIONS],
    level: EnableLevel,
    settle_delay_us: u32,
}

impl<PORT, EN> DisplayMux<PORT, EN>
where
    PORT: DigitPort,
    EN: OutputPin,
{
    /// `enables[0]` is the rightmost position (seconds or minutes units).
    pub fn new(port: PORT, enables: [EN; POSITIONS], level: EnableLevel, settle_delay_us: u32) -> Self {
        Self {
            port,
            enables,
            level,
            settle_delay_us,
        }
    }

    /// Turns every position off.
    pub fn blank(&mut self) -> Result<(), DisplayError<PORT::Error, EN::Error>> {
        let off = self.level.off();
        for enable in self.enables.iter_mut() {
            enable.set_state(off).map_err(DisplayError::Enable)?;
        }
        Ok(())
    }

    /// Shows every position of `snapshot` once.
    ///
    /// A port error is raised while every position is off. If an enable line
    /// fails, all lines are driven off on a best-effort basis before the
    /// error is returned; a line that keeps failing may stay lit.
    pub fn refresh_cycle<D: DelayNs>(
        &mut self,
        snapshot: &Snapshot,
        delay: &mut D,
    ) -> Result<(), DisplayError<PORT::Error, EN::Error>> {
        for (position, value) in snapshot.visible_digits().into_iter().enumerate() {
            self.port.write_digit(value).map_err(DisplayError::Port)?;
            if let Err(e) = self.hold(position, delay) {
                debug!("display: enable line {} failed, blanking", position);
                self.force_off();
                return Err(DisplayError::Enable(e));
            }
        }
        Ok(())
    }

    fn hold<D: DelayNs>(&mut self, position: usize, delay: &mut D) -> Result<(), EN::Error> {
        let enable = &mut self.enables[position];
        enable.set_state(self.level.on())?;
        delay.delay_us(self.settle_delay_us);
        enable.set_state(self.level.off())
    }

    fn force_off(&mut self) {
        let off = self.level.off();
        for enable in self.enables.iter_mut() {
            let _ = enable.set_state(off);
        }
    }

    pub fn release(self) -> (PORT, [EN; POSITIONS]) {
        (self.port, self.enables)
    }
}
