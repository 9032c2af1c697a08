//! Type and resource names backed by a global string interner.
//!
//! Schema corpora mention the same handful of names over and over (every
//! field typed `Reference` or `CodeableConcept`), so names are interned once
//! and passed around as the `Copy` handle [`Id`].
//!
//! Unlike the raw interner symbol, [`Id`] orders lexicographically by the
//! name it stands for. Every sorted structure in the workspace relies on that.

use std::{
    cmp::Ordering,
    fmt,
    sync::{Mutex, MutexGuard, OnceLock},
};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Global string interner for identifier storage.
///
/// # Thread Safety
///
/// This uses `Mutex` for thread-safe access to the string interner.
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

fn interner() -> MutexGuard<'static, DefaultStringInterner> {
    INTERNER
        .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
        .lock()
        .expect("Failed to acquire interner lock")
}

/// Interned name of a schema type or resource.
///
/// # Examples
///
/// ```
/// use strata_core::identifier::Id;
///
/// let patient = Id::new("Patient");
/// let observation = Id::new("Observation");
///
/// assert_eq!(patient, "Patient");
/// assert!(observation < patient);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(DefaultSymbol);

impl Id {
    /// Creates an `Id` from &str.
    ///
    /// # Arguments
    ///
    /// * `name` - The string representation of the identifier
    pub fn new(name: &str) -> Self {
        Self(interner().get_or_intern(name))
    }

    /// Returns `true` when the name starts with an ASCII uppercase letter.
    ///
    /// Only capitalized names take part in type definitions and references.
    pub fn is_capitalized(&self) -> bool {
        self.with_str(|name| name.starts_with(|c: char| c.is_ascii_uppercase()))
    }

    /// Runs `f` against the interned string without allocating.
    pub fn with_str<R>(&self, f: impl FnOnce(&str) -> R) -> R {
        let interner = interner();
        let name = interner
            .resolve(self.0)
            .expect("Symbol should exist in interner");
        f(name)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Copy out before formatting so the lock is not held across `f`.
        let name = self.with_str(str::to_owned);
        f.write_str(&name)
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.with_str(str::to_owned);
        f.debug_tuple("Id").field(&name).finish()
    }
}

impl Ord for Id {
    fn cmp(&self, other: &Self) -> Ordering {
        if self.0 == other.0 {
            return Ordering::Equal;
        }
        let interner = interner();
        let lhs = interner
            .resolve(self.0)
            .expect("Symbol should exist in interner");
        let rhs = interner
            .resolve(other.0)
            .expect("Symbol should exist in interner");
        lhs.cmp(rhs)
    }
}

impl PartialOrd for Id {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl std::str::FromStr for Id {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for Id {
    /// Creates an `Id` from a string slice
    ///
    /// This is a convenience implementation that calls `Id::new`.
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for Id {
    /// Allows direct comparison with string slices: `id == "string"`
    fn eq(&self, other: &str) -> bool {
        self.with_str(|name| name == other)
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl Serialize for Id {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.with_str(|name| serializer.serialize_str(name))
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self::new(&name))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeSet, HashMap};

    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_new() {
        let id1 = Id::new("Patient");
        let id2 = Id::new("Patient");
        let id3 = Id::new("Practitioner");

        assert_eq!(id1, id2);
        assert_ne!(id1, id3);
        assert_eq!(id1, "Patient");
    }

    #[test]
    fn test_display_trait() {
        let id = Id::new("Observation");
        assert_eq!(format!("{}", id), "Observation");
        assert_eq!(id.to_string(), "Observation");
    }

    #[test]
    fn test_debug_shows_name() {
        let id = Id::new("Organization");
        assert_eq!(format!("{id:?}"), r#"Id("Organization")"#);
        assert_eq!(
            format!("{:?}", vec![Id::new("A"), Id::new("B")]),
            r#"[Id("A"), Id("B")]"#
        );
    }

    #[test]
    fn test_from_trait() {
        let id1: Id = "Encounter".into();
        let id2 = Id::new("Encounter");

        assert_eq!(id1, id2);
        assert_eq!(id1, "Encounter");
    }

    #[test]
    fn test_hash_and_eq() {
        let id1 = Id::new("key1");
        let id2 = Id::new("key1");
        let id3 = Id::new("key2");

        let mut map = HashMap::new();
        map.insert(id1, "value1");
        map.insert(id3, "value2");

        assert_eq!(map.get(&id2), Some(&"value1"));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_ordering_is_lexicographic_not_insertion() {
        // Interned in reverse alphabetical order on purpose
        let zeta = Id::new("Zeta_ordering");
        let beta = Id::new("Beta_ordering");
        let alpha = Id::new("Alpha_ordering");

        let sorted: Vec<Id> = [zeta, beta, alpha]
            .into_iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        assert_eq!(sorted, vec![alpha, beta, zeta]);
    }

    #[test]
    fn test_ordering_is_case_sensitive_bytewise() {
        // Uppercase letters sort before lowercase ones
        assert!(Id::new("Zebra") < Id::new("apple"));
    }

    #[test]
    fn test_is_capitalized() {
        assert!(Id::new("HumanName").is_capitalized());
        assert!(!Id::new("dateTime").is_capitalized());
        assert!(!Id::new("_Hidden").is_capitalized());
        assert!(!Id::new("").is_capitalized());
    }

    #[test]
    fn test_partial_eq_str() {
        let id = Id::new("Reference");

        assert!(id == "Reference");
        assert!(id != "Ref");

        let empty = Id::new("");
        assert!(empty == "");
    }

    fn check_order_matches_str_order(a: &str, b: &str) -> Result<(), TestCaseError> {
        prop_assert_eq!(Id::new(a).cmp(&Id::new(b)), a.cmp(b));
        Ok(())
    }

    proptest! {
        #[test]
        fn order_matches_str_order(a in "[A-Za-z_]{0,8}", b in "[A-Za-z_]{0,8}") {
            check_order_matches_str_order(&a, &b)?;
        }
    }
}
