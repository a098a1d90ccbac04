use crate::{
    Cate, Error, Oid, Result, ShardGenerator, cate::BUILTIN_COUNT, cate_value,
};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
#[cfg(feature = "tracing")]
use tracing::instrument;

/// The process-wide category table and its per-category id generators.
///
/// Built-in categories get their generators eagerly at construction and are
/// reachable without taking any lock; only registration and cold-path
/// resolution touch the [`RwLock`] around the runtime tables. Generation is
/// therefore one atomic counter increment plus an `Arc` clone on the hot
/// path.
///
/// The registry is an explicit object rather than hidden global state:
/// construct one at startup, share it by reference (or `Arc`), and tests
/// can instantiate as many independent registries as they need.
/// Registration is append-only; categories are never removed.
///
/// # Example
///
/// ```
/// use catoid::{Cate, Registry};
///
/// let registry = Registry::new();
/// let oid = registry.new_id(Cate::ACCOUNT);
/// assert_eq!(oid.cate(), Cate::ACCOUNT);
///
/// let ticket = registry.register("ticket", "tc").unwrap();
/// let (found, ok) = registry.resolve("ticket");
/// assert!(ok);
/// assert_eq!(found, ticket);
/// ```
pub struct Registry {
    builtins: [Arc<ShardGenerator>; BUILTIN_COUNT as usize],
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    /// code -> derived category value, registered categories only.
    codes: HashMap<String, i64>,
    /// long name -> code, for names that don't start with their code.
    names: HashMap<String, String>,
    /// category value -> generator, registered or created on demand.
    gens: HashMap<i64, Arc<ShardGenerator>>,
}

impl Registry {
    /// Creates a registry with the built-in categories wired up.
    #[must_use]
    pub fn new() -> Self {
        Self {
            builtins: core::array::from_fn(|shard| Arc::new(ShardGenerator::new(shard as i64))),
            inner: RwLock::new(Inner::default()),
        }
    }

    /// Returns a new identifier for the category.
    #[must_use]
    pub fn new_id(&self, cate: Cate) -> Oid {
        Oid::from(self.generator(cate).next())
    }

    /// The dedicated generator for a category.
    ///
    /// Built-ins come from the eager array; other values are created once
    /// under the write lock and cached, so repeated calls for the same
    /// category share one sequence counter.
    #[must_use]
    pub fn generator(&self, cate: Cate) -> Arc<ShardGenerator> {
        if cate.is_builtin() {
            return Arc::clone(&self.builtins[cate.value() as usize]);
        }
        let value = cate.value();
        if let Some(generator) = self.inner.read().gens.get(&value) {
            return Arc::clone(generator);
        }
        let mut inner = self.inner.write();
        Arc::clone(
            inner
                .gens
                .entry(value)
                .or_insert_with(|| Arc::new(ShardGenerator::new(value))),
        )
    }

    /// Registers a category under a long name and a two-character code.
    ///
    /// Both are lower-cased; the category value derives from the code via
    /// [`cate_value`], and a dedicated generator is keyed by that value.
    /// The name is stored only when its first two characters differ from
    /// the code (otherwise code truncation already resolves it).
    ///
    /// All checks run before any mutation, under one write lock: a failed
    /// registration leaves the registry untouched.
    ///
    /// # Errors
    ///
    /// - [`Error::TooShort`]: name or code shorter than two characters.
    /// - [`Error::InvalidCode`]: code characters outside `[a-z0-9]`, or a
    ///   derived value outside the shard range.
    /// - [`Error::CodeTaken`]: the code, or the value it derives to, is
    ///   already in use, built-ins included.
    /// - [`Error::NameTaken`]: the name is already known, directly or
    ///   because it resolves to a non-default category.
    ///
    /// A conflict here means the startup wiring is wrong; letting it pass
    /// would silently corrupt the shard-to-category mapping for every
    /// subsequently generated identifier. Callers that want the fail-fast
    /// behavior can `expect` the result.
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip(self)))]
    pub fn register(&self, name: &str, code: &str) -> Result<Cate> {
        let name = name.to_ascii_lowercase();
        let mut code = code.to_ascii_lowercase();
        if name.len() < 2 {
            return Err(Error::TooShort(name));
        }
        if code.len() < 2 {
            return Err(Error::TooShort(code));
        }
        let value = cate_value(&code)?;
        // The first two bytes are validated ascii, so this cannot split a
        // character; longer codes collapse to the two digits that carry
        // the value.
        code.truncate(2);

        let mut inner = self.inner.write();

        if Cate::builtin(&code).is_some() || inner.codes.contains_key(&code) {
            return Err(Error::CodeTaken { code });
        }
        if value < BUILTIN_COUNT || inner.codes.values().any(|&v| v == value) {
            return Err(Error::CodeTaken { code });
        }
        if Cate::builtin(&name).is_some() || inner.names.contains_key(&name) {
            return Err(Error::NameTaken { name });
        }
        let prefix = name.get(0..2);
        if let Some(prefix) = prefix {
            let collides = prefix != code
                && (Cate::builtin(prefix).is_some() || inner.codes.contains_key(prefix));
            if collides {
                return Err(Error::NameTaken { name });
            }
        }

        inner.codes.insert(code.clone(), value);
        if prefix != Some(code.as_str()) {
            inner.names.insert(name, code);
        }
        inner
            .gens
            .entry(value)
            .or_insert_with(|| Arc::new(ShardGenerator::new(value)));

        Ok(Cate::from_value(value))
    }

    /// Resolves a category by long name or code.
    ///
    /// Tries the built-ins first (exact name or mnemonic code), then the
    /// long-name table, then the input's first two characters against the
    /// registered codes. Returns `(Cate::DEFAULT, false)` when nothing
    /// matches; never an error, so lookups stay total.
    #[must_use]
    pub fn resolve(&self, name_or_code: &str) -> (Cate, bool) {
        let s = name_or_code.to_ascii_lowercase();
        if let Some(cate) = Cate::builtin(&s) {
            return (cate, true);
        }
        let inner = self.inner.read();
        if let Some(code) = inner.names.get(&s) {
            if let Some(&value) = inner.codes.get(code) {
                return (Cate::from_value(value), true);
            }
        }
        if let Some(prefix) = s.get(0..2) {
            if let Some(&value) = inner.codes.get(prefix) {
                return (Cate::from_value(value), true);
            }
        }
        (Cate::DEFAULT, false)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for Registry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let inner = self.inner.read();
        f.debug_struct("Registry")
            .field("builtins", &self.builtins.len())
            .field("codes", &inner.codes.len())
            .field("names", &inner.names.len())
            .finish()
    }
}
