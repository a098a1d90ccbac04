use core::time::Duration;
use std::time::{SystemTime, UNIX_EPOCH};

/// Custom epoch: Friday, January 1, 2016 00:00:00 UTC
///
/// All [`RawId`] timestamps are measured in milliseconds from this instant.
/// The 43-bit timestamp field runs out around the year 2248.
///
/// [`RawId`]: crate::RawId
pub const EPOCH: Duration = Duration::from_millis(1_451_606_400_000);

/// [`EPOCH`] as signed milliseconds, the unit the generator works in.
pub(crate) const EPOCH_MILLIS: i64 = 1_451_606_400_000;

/// A trait for time sources that return the current wall-clock timestamp.
///
/// This abstraction allows you to plug in the real system clock or a mocked
/// time source in tests. The unit is **milliseconds since the Unix epoch**;
/// the generator owns the subtraction down to [`EPOCH`].
///
/// # Example
///
/// ```
/// use catoid::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> i64 {
///         1234
///     }
/// }
///
/// let time = FixedTime;
/// assert_eq!(time.current_millis(), 1234);
/// ```
pub trait TimeSource {
    /// Returns the current time in milliseconds since the Unix epoch.
    fn current_millis(&self) -> i64;
}

/// The default time source, backed by [`SystemTime::now`].
///
/// Every call performs a system time query. Identifier generation reads the
/// clock once per id, so wall-clock adjustments between calls surface
/// directly in the timestamp bits; uniqueness is still carried by the
/// sequence counter.
#[derive(Clone, Copy, Debug, Default)]
pub struct WallClock;

impl TimeSource for WallClock {
    fn current_millis(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO)
            .as_millis() as i64
    }
}
