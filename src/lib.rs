//! A platform-agnostic BCD clock/stopwatch core.
//!
//! The crate keeps a six-digit `hh:mm:ss` value in BCD, advances it once every
//! `ticks_per_second` timer ticks (counting up or down), and multiplexes the
//! selected digit pair onto a four-position display.
//!
//! Hardware is reached through `embedded-hal` traits plus two small traits of
//! its own: [`TickTimer`] for the tick counter and [`DigitPort`] for the digit
//! value lines.
//!
//! # Execution model
//!
//! - the timer interrupt calls [`TickSource::rearm`] and then
//!   [`Clock::on_tick`] (or posts [`Event::Tick`])
//! - the edge interrupt samples both mode signals and calls
//!   [`Clock::on_mode_signal_edge`] (or posts [`Event::ModeEdge`])
//! - after each change the interrupt side publishes [`Clock::snapshot`] into a
//!   [`SharedSnapshot`]
//! - the foreground [`MainLoop`] loads that snapshot and refreshes the display
//!   forever
//!
//! # Example
//!
//! ```rust,ignore
//! use bcd_timer::{Clock, Config, DisplayMux, MainLoop, SharedSnapshot, Snapshot, TickSource};
//!
//! static SHARED: SharedSnapshot = SharedSnapshot::new(Snapshot::new(
//!     bcd_timer::DEFAULT_SEED,
//!     bcd_timer::DisplayPage::SecondsView,
//! ));
//!
//! // or Config::with_packed_seed(bytes_from_rtc)?
//! let config = Config::default();
//! let mut ticks = TickSource::new(timer0, config.timer_preload);
//! ticks.start()?;
//! let mut clock = Clock::new(&config, led);
//!
//! // in the timer interrupt
//! ticks.rearm()?;
//! if clock.on_tick() {
//!     SHARED.publish(clock.snapshot());
//! }
//!
//! // in main
//! let mux = DisplayMux::new(port, enables, config.enable_level, config.settle_delay_us);
//! MainLoop::new(mux, delay).run(&SHARED)?;
//! ```

#![no_std]

#[macro_use]
mod fmt;

pub mod counter;
pub mod digits;
pub mod display;
pub mod event;
pub mod mode;
pub mod registers;
pub mod runner;
pub mod shared;
pub mod tick;

use chrono::NaiveTime;
use embedded_hal::digital::OutputPin;
use heapless::spsc::Consumer;

pub use counter::CounterEngine;
pub use digits::{Digits, DigitsError};
pub use display::{BcdPort, DigitPort, DisplayError, DisplayMux, EnableLevel};
pub use event::{Event, EventQueue};
pub use mode::{Direction, DisplayPage, ModeController, ModeError, ModeState};
pub use registers::{Hours, Minutes, Seconds};
pub use runner::MainLoop;
pub use shared::SharedSnapshot;
pub use tick::{TickError, TickSource, TickTimer};

/// Power-on value, 23:59:30, chosen so the midnight rollover is visible
/// shortly after start-up.
pub const DEFAULT_SEED: Digits = Digits {
    seconds_units: 0,
    seconds_tens: 3,
    minutes_units: 9,
    minutes_tens: 5,
    hours_units: 3,
    hours_tens: 2,
};

/// Raw ticks per logical second: 2 ms ticks from a 4 MHz oscillator
/// (1 MHz instruction clock, /8 prescaler, 250 counts).
pub const DEFAULT_TICKS_PER_SECOND: u16 = 500;

/// Timer preload giving 250 counts to overflow on an 8-bit counter.
pub const DEFAULT_TIMER_PRELOAD: u8 = 6;

/// Hold time per display position.
pub const DEFAULT_SETTLE_DELAY_US: u32 = 10_000;

/// Start-up configuration.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    pub seed: Digits,
    pub ticks_per_second: u16,
    pub timer_preload: u8,
    pub settle_delay_us: u32,
    pub enable_level: EnableLevel,
}

impl Config {
    /// Default configuration starting from `time`, e.g. one read from an RTC.
    pub fn with_seed_time(time: NaiveTime) -> Self {
        Self {
            seed: Digits::from(time),
            ..Self::default()
        }
    }

    /// Default configuration starting from packed BCD
    /// `[hours, minutes, seconds]` bytes, e.g. a saved `[0x12, 0x00, 0x00]`.
    pub fn with_packed_seed(data: [u8; 3]) -> Result<Self, DigitsError> {
        Ok(Self {
            seed: Digits::try_from(data)?,
            ..Self::default()
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            ticks_per_second: DEFAULT_TICKS_PER_SECOND,
            timer_preload: DEFAULT_TIMER_PRELOAD,
            settle_delay_us: DEFAULT_SETTLE_DELAY_US,
            enable_level: EnableLevel::ActiveLow,
        }
    }
}

/// A consistent copy of what the display should show.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Snapshot {
    digits: Digits,
    page: DisplayPage,
}

impl Snapshot {
    pub const fn new(digits: Digits, page: DisplayPage) -> Self {
        Self { digits, page }
    }

    pub fn digits(&self) -> Digits {
        self.digits
    }

    pub fn page(&self) -> DisplayPage {
        self.page
    }

    /// Values for display positions 0..3, rightmost first.
    pub fn visible_digits(&self) -> [u8; 4] {
        let d = &self.digits;
        match self.page {
            DisplayPage::SecondsView => [
                d.seconds_units,
                d.seconds_tens,
                d.minutes_units,
                d.minutes_tens,
            ],
            DisplayPage::HoursView => [
                d.minutes_units,
                d.minutes_tens,
                d.hours_units,
                d.hours_tens,
            ],
        }
    }
}

/// The timekeeping state machine: counter plus mode control.
///
/// All mutation happens through the handler methods, which are meant to be
/// called from interrupt context (or from an event drain). Readers get
/// [`Snapshot`] copies.
pub struct Clock<LED> {
    counter: CounterEngine,
    mode: ModeController<LED>,
}

impl<LED: OutputPin> Clock<LED> {
    pub fn new(config: &Config, indicator: LED) -> Self {
        debug!("clock config: {:?}", config);
        Self {
            counter: CounterEngine::new(config.seed, config.ticks_per_second),
            mode: ModeController::new(indicator),
        }
    }

    /// Handles one raw timer tick. Returns `true` when the time changed.
    pub fn on_tick(&mut self) -> bool {
        self.counter.on_tick(self.mode.state().direction)
    }

    /// Handles an edge on either mode signal.
    pub fn on_mode_signal_edge(
        &mut self,
        change_time: bool,
        up_down: bool,
    ) -> Result<ModeState, ModeError<LED::Error>> {
        self.mode.on_mode_signal_edge(change_time, up_down)
    }

    /// Dispatches one event.
    pub fn handle(&mut self, event: Event) -> Result<(), ModeError<LED::Error>> {
        match event {
            Event::Tick => {
                self.on_tick();
            }
            Event::ModeEdge {
                change_time,
                up_down,
            } => {
                self.on_mode_signal_edge(change_time, up_down)?;
            }
        }
        Ok(())
    }

    /// Drains every queued event in order, then publishes one snapshot.
    ///
    /// Returns the number of events handled. On an indicator error the drain
    /// stops at the failing event; the snapshot is published regardless.
    pub fn process<const N: usize>(
        &mut self,
        events: &mut Consumer<'_, Event, N>,
        shared: &SharedSnapshot,
    ) -> Result<usize, ModeError<LED::Error>> {
        let mut handled = 0;
        let result = loop {
            let Some(event) = events.dequeue() else {
                break Ok(handled);
            };
            handled += 1;
            if let Err(e) = self.handle(event) {
                break Err(e);
            }
        };
        shared.publish(self.snapshot());
        result
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.counter.digits(), self.mode.state().page)
    }

    pub fn mode(&self) -> ModeState {
        self.mode.state()
    }

    pub fn counter(&self) -> &CounterEngine {
        &self.counter
    }

    /// Gives back the indicator pin.
    pub fn release(self) -> LED {
        self.mode.release()
    }
}

#[cfg(test)]
mod tests {
    extern crate alloc;
    use super::*;
    use crate::display::tests::{check_protocol, recording_mux};
    use alloc::vec;
    use crate::mode::tests::BrokenPin;
    use embedded_hal::digital::ErrorKind;
    use embedded_hal_mock::eh1::digital::{
        Mock as PinMock, State as PinLevel, Transaction as PinTrans,
    };

    fn hms(h: u8, m: u8, s: u8) -> Digits {
        Digits::from_hms(h, m, s).unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.seed, hms(23, 59, 30));
        assert_eq!(config.ticks_per_second, 500);
        assert_eq!(config.timer_preload, 6);
        assert_eq!(config.settle_delay_us, 10_000);
        assert_eq!(config.enable_level, EnableLevel::ActiveLow);
        assert!(DEFAULT_SEED.is_valid());
    }

    #[test]
    fn test_config_seeded_from_packed_bytes() {
        let config = Config::with_packed_seed([0x12, 0x00, 0x05]).unwrap();
        assert_eq!(config.seed, hms(12, 0, 5));
        assert_eq!(config.ticks_per_second, DEFAULT_TICKS_PER_SECOND);

        let clock = Clock::new(&config, BrokenPin);
        assert_eq!(<[u8; 3]>::from(&clock.snapshot().digits()), [0x12, 0x00, 0x05]);

        assert_eq!(
            Config::with_packed_seed([0x24, 0x00, 0x00]),
            Err(DigitsError::InvalidBcd)
        );
    }

    #[test]
    fn test_config_seeded_from_time() {
        let time = NaiveTime::from_hms_opt(7, 45, 9).unwrap();
        let config = Config::with_seed_time(time);
        assert_eq!(config.seed, hms(7, 45, 9));
        assert_eq!(config.seed.to_time(), Ok(time));
        assert_eq!(config.enable_level, EnableLevel::ActiveLow);
    }

    #[test]
    fn test_visible_digits() {
        let snapshot = Snapshot::new(hms(12, 34, 56), DisplayPage::SecondsView);
        assert_eq!(snapshot.visible_digits(), [6, 5, 4, 3]);
        let snapshot = Snapshot::new(hms(12, 34, 56), DisplayPage::HoursView);
        assert_eq!(snapshot.visible_digits(), [4, 3, 2, 1]);
    }

    #[test]
    fn test_ticks_advance_seed() {
        let mut led = PinMock::new(&[]);
        let mut clock = Clock::new(&Config::default(), led.clone());
        for _ in 0..499 {
            assert!(!clock.on_tick());
        }
        assert!(clock.on_tick());
        assert_eq!(clock.snapshot().digits(), hms(23, 59, 31));
        for _ in 0..(30 * 500) {
            clock.on_tick();
            assert!(clock.snapshot().digits().is_valid());
        }
        assert_eq!(clock.snapshot().digits(), hms(0, 0, 1));
        clock.release();
        led.done();
    }

    #[test]
    fn test_mode_edges_steer_counter_and_page() {
        let mut led = PinMock::new(&[
            PinTrans::set(PinLevel::High),
            PinTrans::set(PinLevel::Low),
            PinTrans::set(PinLevel::Low),
        ]);
        let config = Config {
            seed: hms(0, 0, 2),
            ticks_per_second: 1,
            ..Config::default()
        };
        let mut clock = Clock::new(&config, led.clone());

        clock.on_mode_signal_edge(true, true).unwrap();
        assert_eq!(clock.snapshot().page(), DisplayPage::HoursView);
        clock.on_tick();
        assert_eq!(clock.snapshot().digits(), hms(0, 0, 3));

        clock.on_mode_signal_edge(false, false).unwrap();
        assert_eq!(clock.snapshot().page(), DisplayPage::SecondsView);
        for _ in 0..5 {
            clock.on_tick();
        }
        assert_eq!(clock.snapshot().digits(), Digits::ZERO);

        let state = clock.on_mode_signal_edge(true, false).unwrap();
        assert_eq!(
            state,
            ModeState {
                page: DisplayPage::HoursView,
                direction: Direction::Decrement,
                indicator: false,
            }
        );
        assert_eq!(clock.mode(), state);
        clock.release();
        led.done();
    }

    #[test]
    fn test_process_drains_in_order_and_publishes() {
        let mut led = PinMock::new(&[PinTrans::set(PinLevel::Low)]);
        let config = Config {
            seed: hms(10, 0, 0),
            ticks_per_second: 2,
            ..Config::default()
        };
        let mut clock = Clock::new(&config, led.clone());
        let shared = SharedSnapshot::new(clock.snapshot());

        let mut queue: EventQueue<8> = EventQueue::new();
        let (mut producer, mut consumer) = queue.split();
        producer.enqueue(Event::Tick).unwrap();
        producer.enqueue(Event::Tick).unwrap();
        producer
            .enqueue(Event::ModeEdge {
                change_time: true,
                up_down: false,
            })
            .unwrap();
        producer.enqueue(Event::Tick).unwrap();
        producer.enqueue(Event::Tick).unwrap();

        assert_eq!(clock.process(&mut consumer, &shared).unwrap(), 5);
        // one second up, then one second down
        assert_eq!(
            shared.load(),
            Snapshot::new(hms(10, 0, 0), DisplayPage::HoursView)
        );
        assert_eq!(clock.counter().accumulator(), 0);

        assert_eq!(clock.process(&mut consumer, &shared).unwrap(), 0);
        clock.release();
        led.done();
    }

    #[test]
    fn test_process_stops_on_indicator_error() {
        let config = Config {
            seed: Digits::ZERO,
            ticks_per_second: 1,
            ..Config::default()
        };
        let mut clock = Clock::new(&config, BrokenPin);
        let shared = SharedSnapshot::new(Snapshot::default());

        let mut queue: EventQueue<4> = EventQueue::new();
        let (mut producer, mut consumer) = queue.split();
        producer
            .enqueue(Event::ModeEdge {
                change_time: true,
                up_down: true,
            })
            .unwrap();
        producer.enqueue(Event::Tick).unwrap();

        let result = clock.process(&mut consumer, &shared);
        assert!(matches!(result, Err(ModeError::Indicator(ErrorKind::Other))));
        // the page change was committed and published; the tick is still queued
        assert_eq!(shared.load().page(), DisplayPage::HoursView);
        assert_eq!(shared.load().digits(), Digits::ZERO);
        assert_eq!(consumer.len(), 1);
    }

    #[test]
    fn test_interrupts_and_foreground_together() {
        let mut led = PinMock::new(&[PinTrans::set(PinLevel::High)]);
        let config = Config {
            ticks_per_second: 4,
            settle_delay_us: 100,
            ..Config::default()
        };
        let mut clock = Clock::new(&config, led.clone());
        let shared = SharedSnapshot::new(clock.snapshot());
        let (mux, delay, log) = recording_mux(config.enable_level, config.settle_delay_us);
        let mut main_loop = MainLoop::new(mux, delay);

        let mut queue: EventQueue<8> = EventQueue::new();
        let (mut producer, mut consumer) = queue.split();

        // 23:59:30 -> 23:59:59, then switch to hh:mm and cross midnight
        for _ in 0..(29 * 4) {
            producer.enqueue(Event::Tick).unwrap();
            clock.process(&mut consumer, &shared).unwrap();
        }
        assert_eq!(main_loop.refresh(&shared).unwrap().digits(), hms(23, 59, 59));

        producer
            .enqueue(Event::ModeEdge {
                change_time: true,
                up_down: true,
            })
            .unwrap();
        for _ in 0..4 {
            producer.enqueue(Event::Tick).unwrap();
        }
        clock.process(&mut consumer, &shared).unwrap();
        main_loop.refresh(&shared).unwrap();

        assert_eq!(
            check_protocol(&log.borrow(), false),
            vec![9, 5, 9, 5, 0, 0, 0, 0]
        );
        clock.release();
        led.done();
    }
}
