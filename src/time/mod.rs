//! # Device clock
//!
//! Microcontrollers have a millisecond tick counter but no real-time clock.
//! [`DateTime`] turns the tick counter into wall-clock time: it is seeded
//! from a network [`TimeSource`] on construction, advanced locally from the
//! tick counter between syncs, and re-seeded once a day to bound drift.
//!
//! The tick counter is a `u32` and wraps after roughly 49.7 days. All tick
//! arithmetic uses wrapping subtraction, which stays correct across a wrap
//! as long as two readings are less than one full period apart.
//!
//! ```rust
//! use qsense::time::{DateTime, TimeSource, Timer};
//! use heapless::String;
//!
//! struct Ticks(u32);
//! impl Timer for Ticks {
//!     fn millis(&mut self) -> u32 { self.0 }
//! }
//!
//! struct Fixed;
//! impl TimeSource for Fixed {
//!     fn server_time(&mut self) -> qsense::time::ServerTime {
//!         String::try_from("2024-01-01T00:00:00.000Z").unwrap()
//!     }
//! }
//!
//! let mut clock = DateTime::new(Ticks(0), Fixed);
//! assert_eq!(clock.current_time().as_str(), "2024-01-01T00:00:00.000Z");
//! assert_eq!(clock.date().as_str(), "2024-01-01");
//! ```

use heapless::String;

/// Conversion between epoch milliseconds and ISO-8601 text.
pub mod iso8601;


pub use iso8601::{Date, Timestamp, is_leap_year};

/// Earliest epoch the clock will report (2015-05-04T01:51:59Z).
///
/// A time service that answers with garbage or an obviously stale date is
/// overridden with this floor.
pub const MIN_EPOCH: i64 = 1_430_704_319_000;

/// Local ticks after which the clock re-seeds from the network (24 hours).
pub const RESYNC_INTERVAL_MILLIS: u32 = 86_400_000;

/// Capacity of a raw time string returned by a [`TimeSource`].
pub const SERVER_TIME_LEN: usize = 64;

/// Raw ISO-8601 text as returned by a time service. Empty on failure.
pub type ServerTime = String<SERVER_TIME_LEN>;

/// Errors from interpreting a time string.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// No time string was received.
    Empty,
    /// The string is too short or has non-numeric fields.
    Malformed,
    /// A field is outside its calendar range.
    OutOfRange,
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::Empty => defmt::write!(f, "Empty"),
            Error::Malformed => defmt::write!(f, "Malformed"),
            Error::OutOfRange => defmt::write!(f, "OutOfRange"),
        }
    }
}

/// A free-running millisecond tick counter.
pub trait Timer {
    /// Milliseconds since an arbitrary origin, wrapping at `u32::MAX`.
    fn millis(&mut self) -> u32;
}

/// A source of network time.
pub trait TimeSource {
    /// Fetches the current UTC time as ISO-8601 text.
    ///
    /// Returns an empty string when the service could not be reached.
    fn server_time(&mut self) -> ServerTime;
}

/// Wall-clock time derived from a tick counter and a network time source.
#[derive(Debug)]
pub struct DateTime<T: Timer, S: TimeSource> {
    timer: T,
    source: S,
    start_millis: u32,
    last_update_millis: u32,
    millis_since_epoch: i64,
}

impl<T: Timer, S: TimeSource> DateTime<T, S> {
    /// Creates a clock and seeds it from `source`.
    pub fn new(mut timer: T, source: S) -> Self {
        let now = timer.millis();
        let mut clock = Self {
            timer,
            source,
            start_millis: now,
            last_update_millis: now,
            millis_since_epoch: 0,
        };
        clock.init();
        clock
    }

    /// Milliseconds since the UNIX epoch.
    ///
    /// Re-seeds from the time source when more than
    /// [`RESYNC_INTERVAL_MILLIS`] ticks have passed since the last seed.
    pub fn current_time_millis(&mut self) -> i64 {
        let now = self.timer.millis();

        if now.wrapping_sub(self.start_millis) > RESYNC_INTERVAL_MILLIS {
            self.init();
        } else {
            self.millis_since_epoch += i64::from(now.wrapping_sub(self.last_update_millis));
            self.last_update_millis = now;
        }

        self.millis_since_epoch
    }

    /// The current time as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
    pub fn current_time(&mut self) -> Timestamp {
        iso8601::format(self.current_time_millis())
    }

    /// The current date as `YYYY-MM-DD`.
    pub fn date(&mut self) -> Date {
        iso8601::date(&self.current_time())
    }

    /// Forces a re-seed from the time source.
    pub fn sync(&mut self) {
        self.init();
    }

    /// Mutable access to the tick counter.
    pub fn timer_mut(&mut self) -> &mut T {
        &mut self.timer
    }

    /// Mutable access to the time source.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    fn init(&mut self) {
        let requested = self.timer.millis();
        let iso = self.source.server_time();

        let epoch = match iso8601::parse(&iso) {
            Ok(epoch) if epoch >= MIN_EPOCH => epoch,
            Ok(epoch) => {
                log::warn!(
                    "minimum epoch greater than server time, difference {} ms",
                    MIN_EPOCH - epoch
                );
                MIN_EPOCH
            }
            Err(e) => {
                log::warn!(
                    "unusable server time {:?} ({:?}), falling back to minimum epoch",
                    iso.as_str(),
                    e
                );
                MIN_EPOCH
            }
        };

        // Account for the time spent waiting on the time service.
        let now = self.timer.millis();
        self.millis_since_epoch = epoch + i64::from(now.wrapping_sub(requested));
        self.start_millis = now;
        self.last_update_millis = now;
    }
}

/// [`Timer`] backed by `std::time::Instant`.
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy)]
pub struct SystemTimer {
    origin: std::time::Instant,
}

#[cfg(feature = "std")]
impl SystemTimer {
    /// Starts counting from now.
    pub fn new() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Default for SystemTimer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl Timer for SystemTimer {
    fn millis(&mut self) -> u32 {
        // Truncation reproduces the wrapping of a hardware tick counter.
        self.origin.elapsed().as_millis() as u32
    }
}
