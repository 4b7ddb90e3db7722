//! Query keys — ordered tuples of primitive values identifying cached fetches.
//!
//! Keys are kept structural rather than hashed: prefix scans
//! ([`QueryCache::get_many`](super::QueryCache::get_many)) need the parts
//! back, and `Ord` on the parts makes a prefix scan a plain range scan over
//! the backing map.

use std::fmt;

/// One segment of a [`QueryKey`].
///
/// `None` represents an omitted optional filter (e.g. an order listing with
/// no status filter) and is a distinct value, so `["orders", 0, None]` and
/// `["orders", 0, "pending"]` cache independently.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KeyPart {
    None,
    Bool(bool),
    Int(i64),
    Str(String),
}

impl fmt::Display for KeyPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyPart::None => write!(f, "-"),
            KeyPart::Bool(b) => write!(f, "{b}"),
            KeyPart::Int(i) => write!(f, "{i}"),
            KeyPart::Str(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for KeyPart {
    fn from(s: &str) -> Self {
        KeyPart::Str(s.to_string())
    }
}

impl From<String> for KeyPart {
    fn from(s: String) -> Self {
        KeyPart::Str(s)
    }
}

impl From<&String> for KeyPart {
    fn from(s: &String) -> Self {
        KeyPart::Str(s.clone())
    }
}

impl From<i64> for KeyPart {
    fn from(i: i64) -> Self {
        KeyPart::Int(i)
    }
}

impl From<u32> for KeyPart {
    fn from(i: u32) -> Self {
        KeyPart::Int(i64::from(i))
    }
}

impl From<bool> for KeyPart {
    fn from(b: bool) -> Self {
        KeyPart::Bool(b)
    }
}

impl<T: Into<KeyPart>> From<Option<T>> for KeyPart {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => KeyPart::None,
        }
    }
}

/// Ordered tuple of primitive values identifying a cached fetch result.
///
/// ```rust
/// # use comanda::cache::QueryKey;
/// let key = QueryKey::new("orders").with(0u32).with(Option::<&str>::None);
/// assert!(key.starts_with(&QueryKey::new("orders")));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QueryKey(Vec<KeyPart>);

impl QueryKey {
    /// Start a key with a root segment (by convention, the resource name).
    pub fn new(root: impl Into<KeyPart>) -> Self {
        QueryKey(vec![root.into()])
    }

    /// Append a segment.
    pub fn with(mut self, part: impl Into<KeyPart>) -> Self {
        self.0.push(part.into());
        self
    }

    /// The key's segments, in order.
    pub fn parts(&self) -> &[KeyPart] {
        &self.0
    }

    /// Whether this key starts with every segment of `prefix`, in order.
    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.len() >= prefix.0.len() && self.0[..prefix.0.len()] == prefix.0[..]
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, part) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{part}")?;
        }
        write!(f, "]")
    }
}

impl FromIterator<KeyPart> for QueryKey {
    fn from_iter<I: IntoIterator<Item = KeyPart>>(iter: I) -> Self {
        QueryKey(iter.into_iter().collect())
    }
}
