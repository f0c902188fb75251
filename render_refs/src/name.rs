/// Resource names.
///
/// A `Name` pairs a string with its precomputed hash. Cloning shares the
/// string storage, and hashing a `Name` feeds only the cached hash, so name
/// index lookups never rehash the text.

use std::fmt;
use std::hash::{BuildHasher, Hash, Hasher};
use std::sync::Arc;
use rustc_hash::FxBuildHasher;

/// Hashed, cheaply clonable resource identifier
#[derive(Clone)]
pub struct Name {
    hash: u64,
    text: Arc<str>,
}

impl Name {
    /// Create a name from any string-like value
    pub fn new(text: impl AsRef<str>) -> Self {
        let text = text.as_ref();
        Self {
            hash: FxBuildHasher.hash_one(text),
            text: Arc::from(text),
        }
    }

    /// Borrow the name as a string slice
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Precomputed hash of the name text
    pub fn hash_value(&self) -> u64 {
        self.hash
    }

    /// Whether the name is the empty string
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl Default for Name {
    fn default() -> Self {
        Self::new("")
    }
}

impl PartialEq for Name {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && self.text == other.text
    }
}

impl Eq for Name {}

impl Hash for Name {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({:?})", &*self.text)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl From<&str> for Name {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Name {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl From<&Name> for Name {
    fn from(name: &Name) -> Self {
        name.clone()
    }
}

impl AsRef<str> for Name {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

#[cfg(test)]
#[path = "name_tests.rs"]
mod tests;
