//! Events posted by interrupt handlers.
//!
//! The tick and edge handlers enqueue [`Event`]s into a single-producer
//! single-consumer [`EventQueue`]; [`Clock::process`](crate::Clock::process)
//! drains it in order.

use heapless::spsc::Queue;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// One raw timer tick
    Tick,
    /// Either mode signal changed; carries both levels sampled at the edge
    ModeEdge { change_time: bool, up_down: bool },
}

/// Lock-free event queue holding up to `N - 1` events.
pub type EventQueue<const N: usize> = Queue<Event, N>;
