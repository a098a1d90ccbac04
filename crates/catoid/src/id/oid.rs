use crate::{Cate, Code, Error, Iid, RawId, Result};

/// An object identifier: an [`Iid`] interpreted together with the category
/// embedded in its shard bits.
///
/// An `Oid` is created once at entity-creation time (see
/// [`Registry::new_id`]) and is immutable thereafter, as the entity's
/// permanent primary key. The category is never stored separately; it is
/// always re-derived from the shard bits, so an `Oid` is recoverable from
/// the bare integer alone.
///
/// The text form is `"<code>-<base36>"` with the two-character category
/// code as prefix; the zero value renders as the empty string. On parse
/// the prefix is optional: a bare base-36 string resolves its own category
/// from the decoded shard bits.
///
/// # Example
///
/// ```
/// use catoid::{Cate, Oid};
///
/// let (code, oid) = Oid::parse("pe-39vg1q8y2mf4").unwrap();
/// assert_eq!(code, "pe");
/// assert_eq!(oid.cate(), Cate::PEOPLE);
/// assert!(oid.valid());
/// ```
///
/// [`Registry::new_id`]: crate::Registry::new_id
#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Oid {
    id: u64,
}

impl Oid {
    /// The absent/invalid value.
    pub const ZERO: Self = Self { id: 0 };

    /// The validity floor (2^21).
    ///
    /// Values below it cannot carry a meaningful timestamp component and
    /// are considered invalid even when non-zero.
    pub const MIN: Self = Self { id: 1 << 21 };

    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self { id }
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

    /// The underlying integer identifier.
    #[must_use]
    pub const fn iid(&self) -> Iid {
        Iid::new(self.id)
    }

    /// The packed bit-layout view of this identifier.
    #[must_use]
    pub const fn raw(&self) -> RawId {
        RawId::from_raw(self.id as i64)
    }

    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.id == 0
    }

    /// Non-zero and at or above the [`MIN`] floor (signed comparison, so
    /// values with the top bit set are invalid).
    ///
    /// [`MIN`]: Self::MIN
    #[must_use]
    pub const fn valid(&self) -> bool {
        !self.is_zero() && self.id as i64 >= Self::MIN.id as i64
    }

    /// The category recovered from the shard bits.
    #[must_use]
    pub fn cate(&self) -> Cate {
        Cate::from_value(self.raw().shard())
    }

    /// The two-character code of the recovered category.
    #[must_use]
    pub fn code(&self) -> Code {
        self.cate().code()
    }

    /// Parses the text form, returning the category code and the value.
    ///
    /// The input is either `"<code>-<base36>"` or a bare base-36 string;
    /// in the bare form the code is recovered from the decoded shard
    /// bits, so numeric-style identifiers resolve their own category.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyOid`] for an empty string; [`Error::InvalidOid`]
    /// when the base-36 portion is malformed or the decoded value fails
    /// the [`MIN`] floor.
    ///
    /// [`MIN`]: Self::MIN
    pub fn parse(s: &str) -> Result<(String, Oid)> {
        if s.is_empty() {
            return Err(Error::EmptyOid);
        }
        match parse_relaxed(s) {
            Some((code, oid)) if oid.valid() => {
                let code = if code.is_empty() {
                    oid.code().to_string()
                } else {
                    code.to_owned()
                };
                Ok((code, oid))
            }
            _ => Err(Error::InvalidOid(s.to_owned())),
        }
    }

    /// Best-effort coercion from an already-typed value.
    ///
    /// Total over all its inputs: unparseable strings coerce to
    /// [`ZERO`], never an error. Use at system boundaries where input
    /// arrives untyped; use [`check`] when validity matters.
    ///
    /// [`ZERO`]: Self::ZERO
    /// [`check`]: Self::check
    #[must_use]
    pub fn cast(value: impl Into<Oid>) -> Oid {
        value.into()
    }

    /// [`cast`] followed by a validity check.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidOid`] when the coerced value is zero or below the
    /// [`MIN`] floor.
    ///
    /// [`cast`]: Self::cast
    /// [`MIN`]: Self::MIN
    pub fn check(value: impl Into<Oid>) -> Result<Oid> {
        let oid = value.into();
        if oid.valid() {
            Ok(oid)
        } else {
            Err(Error::InvalidOid(format!("{}", oid.id)))
        }
    }
}

/// Lenient inner parse: no validity floor, empty code for the bare form.
///
/// Splitting happens at the first `-`; when the suffix fails to decode
/// the whole string is retried as bare base-36 (which then fails on the
/// `-` itself unless the prefix was the only problem).
fn parse_relaxed(s: &str) -> Option<(&str, Oid)> {
    if let Some((code, digits)) = s.split_once('-') {
        if let Ok(iid) = Iid::decode(digits) {
            return Some((code, Oid::new(iid.to_raw())));
        }
    }
    Iid::decode(s).ok().map(|iid| ("", Oid::new(iid.to_raw())))
}

impl core::fmt::Display for Oid {
    /// Renders `"<code>-<base36>"`, or the empty string for zero.
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.is_zero() {
            return Ok(());
        }
        write!(f, "{}-{}", self.code(), self.iid())
    }
}

impl core::fmt::Debug for Oid {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Oid")
            .field("id", &format_args!("{} (0x{:x})", self.id, self.id))
            .field("text", &self.to_string())
            .field("cate", &self.cate())
            .finish()
    }
}

impl core::str::FromStr for Oid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s).map(|(_, oid)| oid)
    }
}

impl From<Iid> for Oid {
    fn from(iid: Iid) -> Self {
        Self::new(iid.to_raw())
    }
}

impl From<Oid> for Iid {
    fn from(oid: Oid) -> Self {
        oid.iid()
    }
}

impl From<RawId> for Oid {
    fn from(raw: RawId) -> Self {
        Self::new(raw.to_raw() as u64)
    }
}

impl From<u64> for Oid {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

impl From<i64> for Oid {
    fn from(id: i64) -> Self {
        Self::new(id as u64)
    }
}

impl From<&str> for Oid {
    /// Lenient: an unparseable string is the zero value.
    fn from(s: &str) -> Self {
        parse_relaxed(s).map_or(Self::ZERO, |(_, oid)| oid)
    }
}

impl From<String> for Oid {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<Oid> for u64 {
    fn from(oid: Oid) -> Self {
        oid.to_raw()
    }
}

/// A list of object identifiers with a comma-separated text form.
///
/// Parsing is strict: every element must pass [`Oid::parse`], so one bad
/// element fails the whole list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Oids(pub Vec<Oid>);

impl Oids {
    #[must_use]
    pub fn contains(&self, id: Oid) -> bool {
        self.0.contains(&id)
    }
}

impl core::ops::Deref for Oids {
    type Target = Vec<Oid>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl core::ops::DerefMut for Oids {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<Vec<Oid>> for Oids {
    fn from(ids: Vec<Oid>) -> Self {
        Self(ids)
    }
}

impl FromIterator<Oid> for Oids {
    fn from_iter<I: IntoIterator<Item = Oid>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Oids {
    type Item = Oid;
    type IntoIter = std::vec::IntoIter<Oid>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl core::fmt::Display for Oids {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for (i, id) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{id}")?;
        }
        Ok(())
    }
}

impl core::str::FromStr for Oids {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(Error::EmptyOid);
        }
        s.split(',')
            .map(|part| Oid::parse(part).map(|(_, oid)| oid))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ShardGenerator;

    // people-shard id from 2022-07-06, sequence 0
    const PEOPLE_TEXT: &str = "39vg1q8y2mf4";
    const PEOPLE_RAW: u64 = 430_964_169_404_071_936;

    #[test]
    fn zero_renders_empty() {
        assert_eq!(Oid::ZERO.to_string(), "");
    }

    #[test]
    fn parse_empty_fails() {
        assert_eq!(Oid::parse(""), Err(Error::EmptyOid));
    }

    #[test]
    fn parse_prefixed_form() {
        let (code, oid) = Oid::parse(&format!("pe-{PEOPLE_TEXT}")).unwrap();
        assert_eq!(code, "pe");
        assert_eq!(oid.to_raw(), PEOPLE_RAW);
        assert_eq!(oid.cate(), Cate::PEOPLE);
    }

    #[test]
    fn parse_bare_form_recovers_category() {
        let (code, oid) = Oid::parse(PEOPLE_TEXT).unwrap();
        assert_eq!(code, "pe");
        assert_eq!(oid.cate(), Cate::PEOPLE);

        let (prefixed_code, prefixed) = Oid::parse(&format!("pe-{PEOPLE_TEXT}")).unwrap();
        assert_eq!(code, prefixed_code);
        assert_eq!(oid, prefixed);
    }

    #[test]
    fn parse_rejects_malformed_digits() {
        assert!(matches!(Oid::parse("pe-!!!"), Err(Error::InvalidOid(_))));
        assert!(matches!(Oid::parse("nope"), Err(Error::InvalidOid(_))));
        assert!(matches!(Oid::parse("-"), Err(Error::InvalidOid(_))));
    }

    #[test]
    fn parse_rejects_below_floor() {
        // "z" is well-formed base-36 but far below the validity floor.
        assert!(matches!(Oid::parse("z"), Err(Error::InvalidOid(_))));
        assert!(matches!(Oid::parse("pe-z"), Err(Error::InvalidOid(_))));
        assert!(matches!(Oid::parse("0"), Err(Error::InvalidOid(_))));
    }

    #[test]
    fn validity_floor() {
        assert!(!Oid::ZERO.valid());
        assert!(!Oid::new(1).valid());
        assert!(!Oid::new(Oid::MIN.to_raw() - 1).valid());
        assert!(Oid::MIN.valid());
        assert!(!Oid::new(u64::MAX).valid()); // negative as i64
    }

    #[test]
    fn display_and_parse_agree() {
        let generator = ShardGenerator::new(Cate::ARTICLE.value());
        let oid = Oid::from(generator.next());
        let text = oid.to_string();
        assert!(text.starts_with("at-"));

        let (code, parsed) = Oid::parse(&text).unwrap();
        assert_eq!(code, "at");
        assert_eq!(parsed, oid);
    }

    #[test]
    fn cast_is_total() {
        assert_eq!(Oid::cast(PEOPLE_RAW), Oid::new(PEOPLE_RAW));
        assert_eq!(Oid::cast(PEOPLE_RAW as i64), Oid::new(PEOPLE_RAW));
        assert_eq!(Oid::cast(Iid::new(7)), Oid::new(7));
        assert_eq!(Oid::cast(PEOPLE_TEXT), Oid::new(PEOPLE_RAW));
        assert_eq!(Oid::cast("not/an/oid"), Oid::ZERO);
        // The lenient path skips the floor; `check` is the strict one.
        assert_eq!(Oid::cast("z"), Oid::new(35));
    }

    #[test]
    fn check_enforces_validity() {
        assert!(Oid::check(PEOPLE_RAW).is_ok());
        assert!(matches!(Oid::check("not/an/oid"), Err(Error::InvalidOid(_))));
        assert!(matches!(Oid::check(1_u64), Err(Error::InvalidOid(_))));
    }

    #[test]
    fn category_comes_from_shard_bits_alone() {
        for cate in [Cate::ACCOUNT, Cate::TOKEN, Cate::TASK, Cate::from_value(500)] {
            let generator = ShardGenerator::new(cate.value());
            let oid = Oid::from(generator.next());
            assert_eq!(oid.cate(), cate);
        }
    }

    #[test]
    fn oids_round_trip() {
        let generator = ShardGenerator::new(Cate::EVENT.value());
        let ids: Oids = (0..3).map(|_| Oid::from(generator.next())).collect();

        let text = ids.to_string();
        assert_eq!(text.matches(',').count(), 2);
        let back: Oids = text.parse().unwrap();
        assert_eq!(back, ids);
    }

    #[test]
    fn oids_parse_is_strict() {
        let good = Oid::from(ShardGenerator::new(1).next());
        let text = format!("{good},garbage!");
        assert!(text.parse::<Oids>().is_err());
        assert!("".parse::<Oids>().is_err());
    }

    #[test]
    fn oids_contains() {
        let a = Oid::new(PEOPLE_RAW);
        let ids = Oids(vec![a]);
        assert!(ids.contains(a));
        assert!(!ids.contains(Oid::ZERO));
        assert_eq!(ids.len(), 1);
    }
}
