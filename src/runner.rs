//! Foreground refresh loop.
//!
//! Runs with interrupts enabled; the tick and edge handlers update the
//! [`Clock`](crate::Clock) and publish snapshots, and this loop keeps drawing
//! whatever was published last.

use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::display::{DigitPort, DisplayError, DisplayMux};
use crate::shared::SharedSnapshot;
use crate::Snapshot;

pub struct MainLoop<PORT, EN, D> {
    mux: DisplayMux<PORT, EN>,
    delay: D,
}

impl<PORT, EN, D> MainLoop<PORT, EN, D>
where
    PORT: DigitPort,
    EN: OutputPin,
    D: DelayNs,
{
    pub fn new(mux: DisplayMux<PORT, EN>, delay: D) -> Self {
        Self { mux, delay }
    }

    /// Draws the latest published snapshot once and returns it.
    pub fn refresh(
        &mut self,
        shared: &SharedSnapshot,
    ) -> Result<Snapshot, DisplayError<PORT::Error, EN::Error>> {
        let snapshot = shared.load();
        self.mux.refresh_cycle(&snapshot, &mut self.delay)?;
        Ok(snapshot)
    }

    /// Blanks the display, then refreshes forever. Returns only on error,
    /// after [`DisplayMux::refresh_cycle`] has tried to turn every position off.
    pub fn run(
        &mut self,
        shared: &SharedSnapshot,
    ) -> Result<Infallible, DisplayError<PORT::Error, EN::Error>> {
        self.mux.blank()?;
        loop {
            self.refresh(shared)?;
        }
    }

    pub fn release(self) -> (DisplayMux<PORT, EN>, D) {
        (self.mux, self.delay)
    }
}
