//! Periodic tick source.
//!
//! The tick comes from an 8-bit hardware counter that interrupts on overflow.
//! Loading it with `preload` makes it overflow after `256 - preload` counts
//! (250 with the default preload of 6). By the time the interrupt handler
//! runs the counter has already advanced a few counts past the overflow, so
//! [`TickSource::rearm`] adds that overshoot to the preload instead of
//! discarding it. This keeps the long-run tick period at its nominal value.

/// Access to the hardware counter that generates ticks.
pub trait TickTimer {
    type Error;

    /// Current counter value.
    fn counter(&mut self) -> Result<u8, Self::Error>;

    /// Loads a new counter value.
    fn set_counter(&mut self, value: u8) -> Result<(), Self::Error>;
}

/// Errors raised while programming the tick timer.
#[derive(Debug)]
pub enum TickError<TimerE> {
    Timer(TimerE),
}

impl<TimerE> From<TimerE> for TickError<TimerE> {
    fn from(e: TimerE) -> Self {
        TickError::Timer(e)
    }
}

/// Keeps the hardware counter running at a fixed period.
pub struct TickSource<T> {
    timer: T,
    preload: u8,
}

impl<T: TickTimer> TickSource<T> {
    pub fn new(timer: T, preload: u8) -> Self {
        Self { timer, preload }
    }

    pub fn preload(&self) -> u8 {
        self.preload
    }

    /// Loads the preload value. Call once before enabling the interrupt.
    pub fn start(&mut self) -> Result<(), TickError<T::Error>> {
        debug!("tick timer preload {}", self.preload);
        self.timer.set_counter(self.preload)?;
        Ok(())
    }

    /// Re-arms the counter from the overflow interrupt.
    ///
    /// Returns the value loaded.
    pub fn rearm(&mut self) -> Result<u8, TickError<T::Error>> {
        let overshoot = self.timer.counter()?;
        let reload = self.preload.wrapping_add(overshoot);
        self.timer.set_counter(reload)?;
        Ok(reload)
    }

    pub fn release(self) -> T {
        self.timer
    }
}
