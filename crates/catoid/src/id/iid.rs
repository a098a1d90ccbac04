use crate::base36::{Base36Error, decode_base36, encode_base36};

/// An integer identifier: a thin wrapper over `u64` where zero means
/// absent/invalid.
///
/// `Iid` carries the two wire encodings of an identifier value:
///
/// - **text**: minimal-length lower-case base-36 (`"0"` for zero), via
///   [`Display`] and [`FromStr`];
/// - **binary**: minimal-length big-endian unsigned bytes (empty for
///   zero), via [`to_bytes`] and [`from_bytes`].
///
/// Both round-trip losslessly for every `u64` value.
///
/// [`Display`]: core::fmt::Display
/// [`FromStr`]: core::str::FromStr
/// [`to_bytes`]: Self::to_bytes
/// [`from_bytes`]: Self::from_bytes
#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Iid {
    id: u64,
}

impl Iid {
    /// The absent/invalid value.
    pub const ZERO: Self = Self { id: 0 };

    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self { id }
    }

    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.id == 0
    }

    /// Converts this type into its raw integer representation.
    #[must_use]
    pub const fn to_raw(&self) -> u64 {
        self.id
    }

    /// Converts a raw integer into this type.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self { id: raw }
    }

    /// The minimal big-endian unsigned byte form; empty for zero.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let bytes = self.id.to_be_bytes();
        let skip = (self.id.leading_zeros() / 8) as usize;
        bytes[skip..].to_vec()
    }

    /// The inverse of [`to_bytes`].
    ///
    /// Leading zero bytes are ignored; an empty or all-zero input is zero.
    /// If more than eight significant bytes are supplied, the low eight
    /// win.
    ///
    /// [`to_bytes`]: Self::to_bytes
    #[must_use]
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut id: u64 = 0;
        for &b in data {
            id = (id << 8) | u64::from(b);
        }
        Self { id }
    }

    /// Encodes the value as lower-case base-36 text.
    #[must_use]
    pub fn encode(&self) -> String {
        encode_base36(self.id)
    }

    /// Decodes base-36 text; case-insensitive on input.
    ///
    /// # Errors
    ///
    /// Returns [`Base36Error`] for empty input, a byte outside
    /// `[0-9a-zA-Z]`, or a value that overflows 64 bits.
    pub fn decode(s: &str) -> Result<Self, Base36Error> {
        decode_base36(s).map(Self::from_raw)
    }
}

impl core::fmt::Display for Iid {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.encode())
    }
}

impl core::fmt::Debug for Iid {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Iid")
            .field("id", &format_args!("{} (0x{:x})", self.id, self.id))
            .field("base36", &self.encode())
            .finish()
    }
}

impl core::str::FromStr for Iid {
    type Err = Base36Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

impl From<u64> for Iid {
    fn from(id: u64) -> Self {
        Self::from_raw(id)
    }
}

impl From<Iid> for u64 {
    fn from(iid: Iid) -> Self {
        iid.to_raw()
    }
}
