//! Mode and direction control.
//!
//! Two input signals select what the display shows and which way the counter
//! runs. The decision is taken on every edge of either signal:
//!
//! | change time | up/down | page          | direction   | indicator |
//! |-------------|---------|---------------|-------------|-----------|
//! | high        | high    | `HoursView`   | `Increment` | on        |
//! | high        | low     | `HoursView`   | `Decrement` | off       |
//! | low         | high    | `SecondsView` | `Increment` | on        |
//! | low         | low     | `SecondsView` | `Decrement` | off       |

use embedded_hal::digital::{OutputPin, PinState};

/// Counting direction applied on each logical second.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Count up
    #[default]
    Increment,
    /// Count down, saturating at 00:00:00
    Decrement,
}

impl Direction {
    /// Signed step applied to the seconds-units digit.
    pub fn step(self) -> i8 {
        match self {
            Direction::Increment => 1,
            Direction::Decrement => -1,
        }
    }
}

/// Which digit pairs are routed to the four display positions.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayPage {
    /// Minutes and seconds (`mm:ss`)
    #[default]
    SecondsView,
    /// Hours and minutes (`hh:mm`)
    HoursView,
}

/// Outcome of one mode decision.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ModeState {
    pub page: DisplayPage,
    pub direction: Direction,
    pub indicator: bool,
}

impl ModeState {
    /// Applies the decision table to the sampled signal levels.
    pub fn decide(change_time: bool, up_down: bool) -> Self {
        let page = if change_time {
            DisplayPage::HoursView
        } else {
            DisplayPage::SecondsView
        };
        let direction = if up_down {
            Direction::Increment
        } else {
            Direction::Decrement
        };
        ModeState {
            page,
            direction,
            indicator: up_down,
        }
    }
}

/// Errors raised while applying a mode decision.
#[derive(Debug)]
pub enum ModeError<PinE> {
    /// The status indicator pin could not be driven
    Indicator(PinE),
}

impl<PinE> From<PinE> for ModeError<PinE> {
    fn from(e: PinE) -> Self {
        ModeError::Indicator(e)
    }
}

/// Interprets mode-signal edges and drives the status indicator.
pub struct ModeController<LED> {
    indicator: LED,
    state: ModeState,
}

impl<LED: OutputPin> ModeController<LED> {
    /// Creates a controller in the power-on state (`SecondsView`, `Increment`).
    ///
    /// The indicator is left untouched until the first edge.
    pub fn new(indicator: LED) -> Self {
        Self {
            indicator,
            state: ModeState::default(),
        }
    }

    pub fn state(&self) -> ModeState {
        self.state
    }

    /// Handles an edge on either input signal.
    ///
    /// The new state is committed before the indicator is driven, so the
    /// page and direction follow the inputs even if the pin reports an error.
    pub fn on_mode_signal_edge(
        &mut self,
        change_time: bool,
        up_down: bool,
    ) -> Result<ModeState, ModeError<LED::Error>> {
        let state = ModeState::decide(change_time, up_down);
        if state != self.state {
            debug!("mode: {:?} -> {:?}", self.state, state);
        }
        self.state = state;
        self.indicator.set_state(PinState::from(state.indicator))?;
        Ok(state)
    }

    /// Gives back the indicator pin.
    pub fn release(self) -> LED {
        self.indicator
    }
}
