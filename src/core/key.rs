//! Namespaced keys in the `namespace:value` format used for resource
//! identifiers, e.g. `minecraft:stone` or `myplugin:sync/inventory`.

use crate::error::{constants, ProtocolError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Namespace applied when a key string carries no `:` separator.
pub const DEFAULT_NAMESPACE: &str = "minecraft";

/// A validated namespaced key.
///
/// Namespaces may contain `[a-z0-9_.-]`; values may additionally contain `/`.
/// Uppercase characters are rejected rather than folded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key {
    namespace: String,
    value: String,
}

impl Key {
    /// Build a key from its two parts, validating both.
    pub fn new(namespace: impl Into<String>, value: impl Into<String>) -> Result<Self> {
        let namespace = namespace.into();
        let value = value.into();

        if namespace.is_empty() {
            return Err(ProtocolError::InvalidKey(
                constants::ERR_EMPTY_NAMESPACE.to_string(),
            ));
        }
        if value.is_empty() {
            return Err(ProtocolError::InvalidKey(constants::ERR_EMPTY_VALUE.to_string()));
        }
        if let Some(c) = namespace.chars().find(|c| !valid_namespace_char(*c)) {
            return Err(ProtocolError::InvalidKey(format!(
                "Illegal character '{c}' in namespace '{namespace}'"
            )));
        }
        if let Some(c) = value.chars().find(|c| !valid_value_char(*c)) {
            return Err(ProtocolError::InvalidKey(format!(
                "Illegal character '{c}' in value '{value}'"
            )));
        }

        Ok(Self { namespace, value })
    }

    /// Parse `namespace:value`, or a bare `value` in the default namespace.
    /// An empty namespace (`:value`) also maps to the default namespace.
    pub fn parse(s: &str) -> Result<Self> {
        match s.split_once(':') {
            Some(("", value)) => Self::new(DEFAULT_NAMESPACE, value),
            Some((namespace, value)) => Self::new(namespace, value),
            None => Self::new(DEFAULT_NAMESPACE, s),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Canonical `namespace:value` form.
    pub fn as_string(&self) -> String {
        self.to_string()
    }
}

#[inline]
fn valid_namespace_char(c: char) -> bool {
    matches!(c, 'a'..='z' | '0'..='9' | '_' | '.' | '-')
}

#[inline]
fn valid_value_char(c: char) -> bool {
    valid_namespace_char(c) || c == '/'
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.value)
    }
}

impl FromStr for Key {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for Key {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Key {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Key::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_parse_with_namespace() {
        let key = Key::parse("catalyst:sync/inventory").unwrap();
        assert_eq!(key.namespace(), "catalyst");
        assert_eq!(key.value(), "sync/inventory");
        assert_eq!(key.to_string(), "catalyst:sync/inventory");
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_parse_defaults_namespace() {
        let key = Key::parse("stone").unwrap();
        assert_eq!(key.namespace(), DEFAULT_NAMESPACE);
        assert_eq!(key.as_string(), "minecraft:stone");
    }

    #[test]
    fn test_rejects_uppercase() {
        assert!(matches!(
            Key::parse("Mod:ping"),
            Err(ProtocolError::InvalidKey(_))
        ));
        assert!(matches!(
            Key::new("mod", "Ping"),
            Err(ProtocolError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_rejects_slash_in_namespace() {
        assert!(Key::new("my/mod", "ping").is_err());
        assert!(Key::new("mymod", "a/b").is_ok());
    }

    #[test]
    fn test_rejects_empty_parts() {
        assert!(Key::parse("mod:").is_err());
        assert!(Key::parse(":").is_err());
        assert!(Key::parse("").is_err());
        assert!(Key::new("", "ping").is_err());
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_empty_namespace_defaults() {
        let key = Key::parse(":ping").unwrap();
        assert_eq!(key.namespace(), DEFAULT_NAMESPACE);
        assert_eq!(key.value(), "ping");
        assert_eq!(key, Key::parse("minecraft:ping").unwrap());
    }

    #[test]
    fn test_second_colon_is_illegal() {
        assert!(Key::parse("a:b:c").is_err());
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_serde_as_string() {
        let key = Key::new("mod", "ping").unwrap();
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"mod:ping\"");
        let back: Key = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }
}
