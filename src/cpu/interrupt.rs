//! Interrupt sources and the timer.
//!
//! The controller owns the clock and the timer reference. Delivery itself
//! lives on [`Cpu`](crate::cpu::Cpu) because it needs the stack.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};
use serde::{Serialize, Deserialize};

/// How often the timer line is raised.
pub const TIMER_PERIOD: Duration = Duration::from_secs(1);

/// Interrupt lines with a defined meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Interrupt {
    /// Raised once per [`TIMER_PERIOD`].
    Timer = 0,
    /// Raised by an external keyboard source.
    Keyboard = 1,
}

impl Interrupt {
    /// The IS/IM bit for this line.
    #[inline]
    pub fn mask(self) -> u8 {
        1 << self as u8
    }
}

/// A monotonic time source.
pub trait Clock {
    /// Time elapsed since some fixed, arbitrary origin.
    fn now(&self) -> Duration;
}

/// Wall-clock time, measured from construction.
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same time, so a test can keep one handle and give
/// another to the CPU.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

/// Timer state and pending-interrupt selection.
#[derive(Debug, Clone)]
pub struct InterruptController<C: Clock> {
    clock: C,
    last_timer: Option<Duration>,
}

impl<C: Clock> InterruptController<C> {
    pub fn new(clock: C) -> Self {
        Self { clock, last_timer: None }
    }

    /// Check the timer and return the updated IS value.
    ///
    /// The first poll only arms the timer; the line is raised once a full
    /// period has elapsed since the last firing.
    pub fn poll_timer(&mut self, is: u8) -> u8 {
        let now = self.clock.now();
        let last = *self.last_timer.get_or_insert(now);

        if now.saturating_sub(last) >= TIMER_PERIOD {
            self.last_timer = Some(now);
            log::debug!("timer fired at {:?}", now);
            is | Interrupt::Timer.mask()
        } else {
            is
        }
    }

    /// Forget the timer reference.
    pub fn reset(&mut self) {
        self.last_timer = None;
    }
}

/// The line to service for the given mask and status, if any.
///
/// Lowest numbered line wins.
pub fn pending(im: u8, is: u8) -> Option<u8> {
    let masked = im & is;
    (0..8).find(|i| masked & (1 << i) != 0)
}
