//! Data models shared across the pipeline.
//!
//! - [`Record`]: one extracted field-to-value mapping, fields in rule order
//! - [`RobotsPolicy`]: accumulated `User-agent`/`Disallow`/`Allow` values
//! - [`SiteReport`]: everything learned about a single URL

use std::fmt;
use std::str::FromStr;

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// Trimmed entries of the `keywords` meta tag, in source order.
pub type KeywordList = Vec<String>;

/// Raw header values used as a technology fingerprint.
pub type TechnologyList = Vec<String>;

/// Field name to optional value, in insertion order.
///
/// A value is `None` when the selector matched nothing or the element had no
/// text. Keys are unique.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, Option<String>)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `field`, replacing an earlier value without changing its position.
    pub fn insert(&mut self, field: impl Into<String>, value: Option<String>) {
        let field = field.into();
        match self.fields.iter_mut().find(|(k, _)| *k == field) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((field, value)),
        }
    }

    /// `None` if the field is absent, `Some(None)` if present without a value.
    pub fn get(&self, field: &str) -> Option<Option<&str>> {
        self.fields
            .iter()
            .find(|(k, _)| k == field)
            .map(|(_, v)| v.as_deref())
    }

    /// The field's value, treating "no such field" and "no value" alike.
    pub fn value(&self, field: &str) -> Option<&str> {
        self.get(field).flatten()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K, V> FromIterator<(K, Option<V>)> for Record
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, Option<V>)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (k, v) in iter {
            record.insert(k, v.map(Into::into));
        }
        record
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (k, v)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match v {
                Some(v) => write!(f, "{k:?}: {v:?}")?,
                None => write!(f, "{k:?}: null")?,
            }
        }
        write!(f, "}}")
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (k, v) in &self.fields {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// A robots.txt instruction this tool records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Directive {
    UserAgent,
    Disallow,
    Allow,
}

impl Directive {
    pub const ALL: [Directive; 3] = [Directive::UserAgent, Directive::Disallow, Directive::Allow];

    pub fn as_str(self) -> &'static str {
        match self {
            Directive::UserAgent => "User-agent",
            Directive::Disallow => "Disallow",
            Directive::Allow => "Allow",
        }
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Directive {
    type Err = ();

    /// Exact, case-sensitive match on the directive name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Directive::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or(())
    }
}

/// Directive values in order of appearance; directives keep the order in
/// which they were first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RobotsPolicy {
    entries: Vec<(Directive, Vec<String>)>,
}

impl RobotsPolicy {
    pub fn push(&mut self, directive: Directive, value: impl Into<String>) {
        let value = value.into();
        match self.entries.iter_mut().find(|(d, _)| *d == directive) {
            Some((_, values)) => values.push(value),
            None => self.entries.push((directive, vec![value])),
        }
    }

    /// Values recorded for `directive`; empty if it never appeared.
    pub fn get(&self, directive: Directive) -> &[String] {
        self.entries
            .iter()
            .find(|(d, _)| *d == directive)
            .map(|(_, v)| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn directives(&self) -> impl Iterator<Item = Directive> + '_ {
        self.entries.iter().map(|(d, _)| *d)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for RobotsPolicy {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (d, values) in &self.entries {
            map.serialize_entry(d.as_str(), values)?;
        }
        map.end()
    }
}

/// The combined result of analyzing one URL.
#[derive(Debug, Clone, Serialize)]
pub struct SiteReport {
    pub url: String,
    pub record: Record,
    pub keywords: KeywordList,
    pub robots: RobotsPolicy,
    pub technologies: TechnologyList,
}
