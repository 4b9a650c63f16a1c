//! Date/time and duration display utilities.

use std::fmt;

use jiff::{tz::TimeZone, Timestamp};

/// A wrapper around `Timestamp` formatting it in the system time zone as
/// `YYYY-MM-DD HH:MM:SS TZ`.
pub struct LocalDateTime<'a>(pub &'a Timestamp);

impl<'a> fmt::Display for LocalDateTime<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.0
                .to_zoned(TimeZone::system())
                .strftime("%Y-%m-%d %H:%M:%S %Z")
        )
    }
}

/// A signed number of seconds shown as `MM:SS`, or `H:MM:SS` from one hour
/// up. Negative values get a leading minus.
///
/// ```rust
/// use cadence_core::display::Countdown;
///
/// assert_eq!(Countdown(754).to_string(), "12:34");
/// assert_eq!(Countdown(3600).to_string(), "1:00:00");
/// assert_eq!(Countdown(-90).to_string(), "-01:30");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown(pub i64);

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let secs = self.0.unsigned_abs();
        let (hours, minutes, seconds) = (secs / 3600, secs % 3600 / 60, secs % 60);
        if hours > 0 {
            write!(f, "{sign}{hours}:{minutes:02}:{seconds:02}")
        } else {
            write!(f, "{sign}{minutes:02}:{seconds:02}")
        }
    }
}

/// A progress fraction drawn as a fixed-width text bar plus percentage.
///
/// The bar is clamped; the percentage is not, so running over time stays
/// visible.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressBar(pub f64);

const BAR_WIDTH: usize = 20;

impl fmt::Display for ProgressBar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let filled = (self.0.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize;
        write!(
            f,
            "`[{}{}]` {:.0}%",
            "#".repeat(filled),
            "-".repeat(BAR_WIDTH - filled),
            self.0 * 100.0
        )
    }
}
