use crate::base36::Base36Error;

pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All recoverable errors produced by this crate.
///
/// Decode and parse failures are always returned to the immediate caller;
/// nothing is logged or swallowed internally. Registration conflicts are
/// recoverable here, but they indicate a programming error in startup
/// wiring; a caller that wants the fail-fast behavior can `expect` them.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// An empty string was given where an identifier is required.
    #[error("empty oid")]
    EmptyOid,

    /// The text form is malformed, or the decoded value is below the
    /// validity floor.
    #[error("invalid oid: '{0}'")]
    InvalidOid(String),

    /// The base-36 portion of an identifier failed to decode.
    #[error(transparent)]
    Base36(#[from] Base36Error),

    /// A category code contains a disallowed character or derives to a
    /// value outside the 10-bit shard range.
    #[error("invalid cate code: '{code}'")]
    InvalidCode { code: String },

    /// The category code (or the value it derives to) is already in use.
    #[error("cate code '{code}' already registered")]
    CodeTaken { code: String },

    /// The category name is already known, directly or by resolution.
    #[error("cate name '{name}' already registered")]
    NameTaken { name: String },

    /// A category name or code shorter than two characters.
    #[error("cate name or code too short: '{0}'")]
    TooShort(String),
}
