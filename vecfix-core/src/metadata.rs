//! The `key=value;key2=value2` metadata column.
//!
//! Pairs are encoded in ascending key order. A backslash escapes `\`, `;` and
//! `=` inside keys and values.

use std::collections::BTreeMap;

use crate::error::MetadataError;

const ESCAPE: char = '\\';
const PAIR_SEPARATOR: char = ';';
const KEY_VALUE_SEPARATOR: char = '=';

/// Key under which the fixture records an item's cluster.
pub const CLUSTER_KEY: &str = "cluster";
/// Key under which the fixture records where an item came from.
pub const SOURCE_KEY: &str = "source";
/// Value of [`SOURCE_KEY`] for every generated item.
pub const SYNTHETIC_SOURCE: &str = "synthetic";

/// An ordered string map carried in a row's metadata column.
///
/// # Examples
/// ```
/// use vecfix_core::Metadata;
///
/// let meta = Metadata::for_cluster(2);
/// assert_eq!(meta.encode(), "cluster=2;source=synthetic");
/// assert_eq!(Metadata::decode("cluster=2;source=synthetic"), Ok(meta));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    entries: BTreeMap<String, String>,
}

impl Metadata {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Metadata written for a synthetic item assigned to `cluster`.
    #[must_use]
    pub fn for_cluster(cluster: usize) -> Self {
        let mut meta = Self::new();
        meta.insert(CLUSTER_KEY, cluster.to_string());
        meta.insert(SOURCE_KEY, SYNTHETIC_SOURCE);
        meta
    }

    /// Inserts `value` under `key`, returning the previous value if any.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), value.into())
    }

    /// Looks up `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Number of pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when there are no pairs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates the pairs in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Encodes the pairs as `key=value` joined by `;`, keys ascending.
    #[must_use]
    pub fn encode(&self) -> String {
        let mut out = String::new();
        for (position, (key, value)) in self.entries.iter().enumerate() {
            if position > 0 {
                out.push(PAIR_SEPARATOR);
            }
            push_escaped(&mut out, key);
            out.push(KEY_VALUE_SEPARATOR);
            push_escaped(&mut out, value);
        }
        out
    }

    /// Decodes an encoded metadata string.
    ///
    /// The first unescaped `=` of a pair splits key from value; any later `=`
    /// belongs to the value. An unescaped `;` ends a pair only once its `=`
    /// has been seen, so a `;` inside a key is kept. Pairs with an empty key
    /// are dropped and a later duplicate key replaces an earlier one.
    ///
    /// # Errors
    /// Returns [`MetadataError::TrailingEscape`] when `raw` ends with an
    /// unpaired backslash.
    pub fn decode(raw: &str) -> Result<Self, MetadataError> {
        let mut meta = Self::new();
        let mut key = String::new();
        let mut value = String::new();
        let mut in_key = true;
        let mut chars = raw.chars();

        while let Some(ch) = chars.next() {
            let target = if in_key { &mut key } else { &mut value };
            match ch {
                ESCAPE => match chars.next() {
                    Some(escaped) => target.push(escaped),
                    None => {
                        return Err(MetadataError::TrailingEscape {
                            input: raw.to_owned(),
                        });
                    }
                },
                KEY_VALUE_SEPARATOR if in_key => in_key = false,
                PAIR_SEPARATOR if !in_key => {
                    meta.flush_pair(&mut key, &mut value);
                    in_key = true;
                }
                other => target.push(other),
            }
        }
        meta.flush_pair(&mut key, &mut value);
        Ok(meta)
    }

    fn flush_pair(&mut self, key: &mut String, value: &mut String) {
        let taken_key = std::mem::take(key);
        let taken_value = std::mem::take(value);
        if !taken_key.is_empty() {
            self.entries.insert(taken_key, taken_value);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for Metadata
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

fn push_escaped(out: &mut String, token: &str) {
    for ch in token.chars() {
        if matches!(ch, ESCAPE | PAIR_SEPARATOR | KEY_VALUE_SEPARATOR) {
            out.push(ESCAPE);
        }
        out.push(ch);
    }
}
