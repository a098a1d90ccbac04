use crate::{RawId, TimeSource, WallClock, time::EPOCH_MILLIS};
use portable_atomic::{AtomicI64, Ordering};
#[cfg(feature = "tracing")]
use tracing::instrument;

/// A lock-free per-shard id generator suitable for multi-threaded use.
///
/// The shard number is fixed at construction (masked into `[0, 1024)`) and
/// a single atomically-incremented sequence counter orders all calls, so
/// concurrent callers against one instance receive distinct values. The
/// counter grows without bound and is reduced modulo 2048 when the id is
/// composed: after 2048 ids within the same millisecond the sequence bits
/// repeat, which is the accepted per-millisecond budget of the layout.
///
/// Two instances constructed with the same shard can collide when they
/// generate within the same millisecond; shard numbers must be allocated
/// out-of-band, one per process or node. The [`Registry`] hands out one
/// generator per category, which keeps this invariant inside one process.
///
/// # Example
///
/// ```
/// use catoid::ShardGenerator;
///
/// let generator = ShardGenerator::new(8);
/// let a = generator.next();
/// let b = generator.next();
/// assert!(a < b);
/// assert_eq!(a.shard(), 8);
/// ```
///
/// [`Registry`]: crate::Registry
#[derive(Debug)]
pub struct ShardGenerator<T = WallClock>
where
    T: TimeSource,
{
    seq: AtomicI64,
    shard: i64,
    time: T,
}

impl ShardGenerator<WallClock> {
    /// Creates a generator for `shard`, reading time from [`WallClock`].
    ///
    /// The shard is masked into `[0, 1024)`; it is not re-validated per
    /// call.
    #[must_use]
    pub fn new(shard: i64) -> Self {
        Self::with_time_source(shard, WallClock)
    }
}

impl<T> ShardGenerator<T>
where
    T: TimeSource,
{
    /// Creates a generator for `shard` with a custom [`TimeSource`].
    ///
    /// Useful in tests that need a fixed or stepped clock.
    #[must_use]
    pub fn with_time_source(shard: i64, time: T) -> Self {
        Self {
            seq: AtomicI64::new(0),
            shard: shard & RawId::SHARD_MASK,
            time,
        }
    }

    /// The shard number encoded into every id from this generator.
    #[must_use]
    pub const fn shard(&self) -> i64 {
        self.shard
    }

    /// Returns the next id for the current time.
    ///
    /// Equivalent to [`next_at`] with the time source's current reading.
    ///
    /// [`next_at`]: Self::next_at
    #[must_use]
    pub fn next(&self) -> RawId {
        self.next_at(self.time.current_millis())
    }

    /// Returns the next id for the given wall-clock time, in milliseconds
    /// since the Unix epoch.
    ///
    /// Only 2048 unique ids exist per millisecond; past that the sequence
    /// bits wrap and ordering within the millisecond is lost.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    #[must_use]
    pub fn next_at(&self, unix_millis: i64) -> RawId {
        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        RawId::from_components(unix_millis - EPOCH_MILLIS, self.shard, seq)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::thread::scope;

    struct MockTime {
        millis: i64,
    }

    impl TimeSource for MockTime {
        fn current_millis(&self) -> i64 {
            self.millis
        }
    }

    #[test]
    fn sequence_increments_within_same_tick() {
        let generator = ShardGenerator::with_time_source(3, MockTime { millis: EPOCH_MILLIS + 42 });

        let id1 = generator.next();
        let id2 = generator.next();
        let id3 = generator.next();

        assert_eq!(id1.timestamp(), 42);
        assert_eq!(id2.timestamp(), 42);
        assert_eq!(id3.timestamp(), 42);
        assert_eq!(id1.sequence(), 0);
        assert_eq!(id2.sequence(), 1);
        assert_eq!(id3.sequence(), 2);
        assert!(id1 < id2 && id2 < id3);
    }

    #[test]
    fn shard_is_masked_at_construction() {
        let generator = ShardGenerator::new(1024 + 5);
        assert_eq!(generator.shard(), 5);
        assert_eq!(generator.next().shard(), 5);
    }

    #[test]
    fn every_shard_round_trips() {
        for shard in 0..=RawId::max_shard() {
            let generator = ShardGenerator::with_time_source(shard, MockTime { millis: EPOCH_MILLIS + 1 });
            assert_eq!(generator.next().shard(), shard);
        }
    }

    #[test]
    fn strictly_increasing_within_sequence_budget() {
        let generator = ShardGenerator::with_time_source(7, MockTime { millis: EPOCH_MILLIS + 9 });

        let mut last = generator.next();
        for _ in 1..=RawId::max_sequence() {
            let id = generator.next();
            assert!(id > last, "{id:?} must exceed {last:?}");
            last = id;
        }
    }

    #[test]
    fn sequence_wraps_past_budget() {
        // The counter is only reduced modulo 2048 at composition time;
        // once exhausted within one millisecond the bits repeat.
        let generator = ShardGenerator::with_time_source(7, MockTime { millis: EPOCH_MILLIS + 9 });

        let first = generator.next();
        for _ in 0..RawId::max_sequence() {
            let _ = generator.next();
        }
        let wrapped = generator.next();
        assert_eq!(wrapped.sequence(), first.sequence());
        assert_eq!(wrapped, first);
    }

    #[test]
    fn advancing_time_keeps_ids_increasing() {
        let generator = ShardGenerator::new(1);
        let early = generator.next_at(EPOCH_MILLIS + 1_000);
        let late = generator.next_at(EPOCH_MILLIS + 2_000);
        assert!(late > early);
        assert_eq!(late.timestamp() - early.timestamp(), 1_000);
    }

    #[test]
    fn concurrent_calls_yield_distinct_ids() {
        const THREADS: usize = 8;
        const PER_THREAD: usize = 128;

        let generator = ShardGenerator::with_time_source(5, MockTime { millis: EPOCH_MILLIS + 77 });

        let mut all = HashSet::new();
        scope(|s| {
            let handles: Vec<_> = (0..THREADS)
                .map(|_| s.spawn(|| (0..PER_THREAD).map(|_| generator.next()).collect::<Vec<_>>()))
                .collect();
            for handle in handles {
                for id in handle.join().unwrap() {
                    assert!(all.insert(id.to_raw()), "duplicate id {id:?}");
                    assert_eq!(id.shard(), 5);
                }
            }
        });
        assert_eq!(all.len(), THREADS * PER_THREAD);
    }

    #[test]
    fn distinct_shards_never_collide() {
        // A trimmed-down cross-shard trial: same clock, same sequence
        // positions, differing only in shard bits.
        let mut seen = HashSet::new();
        for shard in 0..64 {
            let generator =
                ShardGenerator::with_time_source(shard, MockTime { millis: EPOCH_MILLIS + 123 });
            for _ in 0..512 {
                assert!(seen.insert(generator.next().to_raw()));
            }
        }
    }
}
