//! # Runner — The Externally-Paced Tick Loop
//!
//! The engine never owns a clock or a frame callback. The host injects a
//! [`TickPacer`] — "give me the timestamp of the next tick, or `None` to
//! stop" — and [`Runner::run`] drives the loop: compute the delta against the
//! previous timestamp, run every system in order, ask the pacer again. On a
//! display-driven host the pacer blocks on vsync; in tests and benches a
//! [`FixedStepPacer`] steps a synthetic clock.
//!
//! The loop ends when the pacer yields `None` or when the [`RunHandle`]
//! (obtained from the runner before the loop starts) is cancelled; the
//! handle is checked once per tick boundary, so a system cancelling mid-tick
//! still finishes its own tick. Everything is single-threaded — exactly one
//! system executes at any instant, and the handle is a plain `Rc<Cell>`.

use std::cell::Cell;
use std::rc::Rc;

use super::system::Tick;
use super::world::World;

/// The injectable "schedule the next tick" primitive.
///
/// Each call returns the timestamp of the next tick in the host's clock
/// unit (monotonically increasing), or `None` to end the loop. Blanket
/// implemented for `FnMut() -> Option<f64>` closures.
pub trait TickPacer {
    fn next_tick(&mut self) -> Option<f64>;
}

impl<F> TickPacer for F
where
    F: FnMut() -> Option<f64>,
{
    fn next_tick(&mut self) -> Option<f64> {
        (self)()
    }
}

/// Cancellation handle for a [`Runner`] loop.
///
/// Cloneable; cancelling any clone stops the loop at the next tick boundary.
#[derive(Clone)]
pub struct RunHandle {
    cancelled: Rc<Cell<bool>>,
}

impl RunHandle {
    /// Stop the loop before its next tick. The tick currently executing (if
    /// any) still runs to completion.
    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

/// Drives repeated ticks over a [`World`].
#[derive(Default)]
pub struct Runner {
    cancelled: Rc<Cell<bool>>,
}

impl Runner {
    pub fn new() -> Self {
        Self::default()
    }

    /// A cancellation handle for this runner. Grab one before calling
    /// [`run`](Runner::run) and hand it to whatever decides when to stop.
    pub fn handle(&self) -> RunHandle {
        RunHandle {
            cancelled: Rc::clone(&self.cancelled),
        }
    }

    /// Run the tick loop until the pacer yields `None` or the handle is
    /// cancelled.
    ///
    /// Each tick's timestamp comes from the pacer; the first tick's delta is
    /// measured against the caller-supplied `start_time`. System faults are
    /// not caught — a panicking system unwinds out of this call.
    pub fn run(&mut self, world: &mut World, start_time: f64, pacer: &mut dyn TickPacer) {
        log::debug!(
            "tick loop starting: {} systems, start_time {start_time}",
            world.system_count()
        );
        let mut last = start_time;
        loop {
            if self.cancelled.get() {
                break;
            }
            let Some(now) = pacer.next_tick() else { break };
            world.run_tick(Tick {
                delta: now - last,
                elapsed: now,
            });
            last = now;
        }
        log::debug!("tick loop stopped at {last}");
    }
}

/// A finite fixed-step pacer: yields `start + step`, `start + 2*step`, … for
/// a given number of ticks. The headless stand-in for a display callback.
pub struct FixedStepPacer {
    now: f64,
    step: f64,
    remaining: u64,
}

impl FixedStepPacer {
    pub fn new(start: f64, step: f64, ticks: u64) -> Self {
        Self {
            now: start,
            step,
            remaining: ticks,
        }
    }
}

impl TickPacer for FixedStepPacer {
    fn next_tick(&mut self) -> Option<f64> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        self.now += self.step;
        Some(self.now)
    }
}
