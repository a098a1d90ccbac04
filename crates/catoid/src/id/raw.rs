use crate::time::EPOCH_MILLIS;
use std::time::{Duration, SystemTime};

/// The raw 64-bit packed identifier produced by a [`ShardGenerator`].
///
/// - 43 bits timestamp (ms since [`EPOCH`])
/// - 10 bits shard (the category discriminator)
/// - 11 bits sequence
///
/// ```text
///  Bit Index:  63             21 20         11 10           0
///              +-----------------+-------------+--------------+
///  Field:      | timestamp (43)  | shard (10)  | sequence (11)|
///              +-----------------+-------------+--------------+
///              |<----- MSB ----- 64 bits ----- LSB ---------->|
/// ```
///
/// 2048 ids can be generated per millisecond for each of 1024 shards. For a
/// fixed shard, successive ids from one generator are strictly increasing
/// whenever time advances; within one millisecond the sequence field carries
/// the ordering.
///
/// [`ShardGenerator`]: crate::ShardGenerator
/// [`EPOCH`]: crate::EPOCH
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct RawId {
    id: i64,
}

impl RawId {
    pub const TIMESTAMP_BITS: i64 = 43;
    pub const SHARD_BITS: i64 = 10;
    pub const SEQUENCE_BITS: i64 = 11;

    pub const SEQUENCE_SHIFT: i64 = 0;
    pub const SHARD_SHIFT: i64 = Self::SEQUENCE_SHIFT + Self::SEQUENCE_BITS;
    pub const TIMESTAMP_SHIFT: i64 = Self::SHARD_SHIFT + Self::SHARD_BITS;

    pub const TIMESTAMP_MASK: i64 = (1 << Self::TIMESTAMP_BITS) - 1;
    pub const SHARD_MASK: i64 = (1 << Self::SHARD_BITS) - 1;
    pub const SEQUENCE_MASK: i64 = (1 << Self::SEQUENCE_BITS) - 1;

    /// Packs the three components into a raw id.
    ///
    /// Each field is masked to its bit width; the timestamp is milliseconds
    /// since [`EPOCH`].
    ///
    /// [`EPOCH`]: crate::EPOCH
    #[must_use]
    pub const fn from_components(timestamp: i64, shard: i64, sequence: i64) -> Self {
        let t = (timestamp & Self::TIMESTAMP_MASK) << Self::TIMESTAMP_SHIFT;
        let s = (shard & Self::SHARD_MASK) << Self::SHARD_SHIFT;
        let q = (sequence & Self::SEQUENCE_MASK) << Self::SEQUENCE_SHIFT;
        Self { id: t | s | q }
    }

    /// Extracts the timestamp (ms since [`EPOCH`]) from the packed id.
    ///
    /// Together with [`shard`] and [`sequence`] this is the exact bitwise
    /// inverse of [`from_components`].
    ///
    /// [`EPOCH`]: crate::EPOCH
    /// [`shard`]: Self::shard
    /// [`sequence`]: Self::sequence
    /// [`from_components`]: Self::from_components
    #[must_use]
    pub const fn timestamp(&self) -> i64 {
        (self.id >> Self::TIMESTAMP_SHIFT) & Self::TIMESTAMP_MASK
    }

    /// Extracts the shard from the packed id.
    #[must_use]
    pub const fn shard(&self) -> i64 {
        (self.id >> Self::SHARD_SHIFT) & Self::SHARD_MASK
    }

    /// Extracts the sequence from the packed id.
    #[must_use]
    pub const fn sequence(&self) -> i64 {
        (self.id >> Self::SEQUENCE_SHIFT) & Self::SEQUENCE_MASK
    }

    /// Returns the maximum representable shard value (1023).
    #[must_use]
    pub const fn max_shard() -> i64 {
        Self::SHARD_MASK
    }

    /// Returns the maximum representable sequence value (2047).
    #[must_use]
    pub const fn max_sequence() -> i64 {
        Self::SEQUENCE_MASK
    }

    /// Converts this type into its raw integer representation.
    #[must_use]
    pub const fn to_raw(&self) -> i64 {
        self.id
    }

    /// Converts a raw integer into this type.
    #[must_use]
    pub const fn from_raw(raw: i64) -> Self {
        Self { id: raw }
    }

    /// The timestamp as milliseconds since the Unix epoch.
    #[must_use]
    pub const fn unix_millis(&self) -> i64 {
        self.timestamp() + EPOCH_MILLIS
    }

    /// The timestamp as a [`SystemTime`], at millisecond precision.
    #[must_use]
    pub fn system_time(&self) -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_millis(self.unix_millis() as u64)
    }
}

impl core::fmt::Display for RawId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl core::fmt::Debug for RawId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RawId")
            .field("id", &format_args!("{} (0x{:x})", self.id, self.id))
            .field(
                "timestamp",
                &format_args!("{} (0x{:x})", self.timestamp(), self.timestamp()),
            )
            .field("shard", &self.shard())
            .field("sequence", &self.sequence())
            .finish()
    }
}
