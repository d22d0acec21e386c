//! Shape identifiers
//!
//! Absolute ids have the form `namespace#Name` or `namespace#Name$member`.
//! Ordering is lexicographic on (namespace, name, member) and drives every
//! deterministic iteration in the model and in selector results.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Namespace of the built-in shapes and trait definitions
pub const PRELUDE_NAMESPACE: &str = "smithy.api";

/// Malformed shape id text
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Invalid shape id `{input}`: {reason}")]
pub struct ShapeIdError {
    pub input: String,
    pub reason: String,
}

impl ShapeIdError {
    fn new(input: &str, reason: impl Into<String>) -> Self {
        Self {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

/// Globally unique shape identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId {
    namespace: String,
    name: String,
    member: Option<String>,
}

impl ShapeId {
    /// Build an id from a namespace and a shape name
    pub fn from_parts(namespace: &str, name: &str) -> Result<Self, ShapeIdError> {
        let text = format!("{namespace}#{name}");
        if !is_valid_namespace(namespace) {
            return Err(ShapeIdError::new(&text, "invalid namespace"));
        }
        if !is_identifier(name) {
            return Err(ShapeIdError::new(&text, "invalid shape name"));
        }
        Ok(Self {
            namespace: namespace.to_string(),
            name: name.to_string(),
            member: None,
        })
    }

    /// Id of a shape in the prelude namespace
    pub fn prelude(name: &str) -> Self {
        debug_assert!(is_identifier(name), "invalid prelude name {name}");
        Self {
            namespace: PRELUDE_NAMESPACE.to_string(),
            name: name.to_string(),
            member: None,
        }
    }

    /// Parse `text`, resolving it against `default_namespace` when it has no `#`
    pub fn from_relative(text: &str, default_namespace: &str) -> Result<Self, ShapeIdError> {
        if text.contains('#') {
            text.parse()
        } else {
            format!("{default_namespace}#{text}").parse()
        }
    }

    /// Id of the member `member` of this (container) shape
    pub fn with_member(&self, member: &str) -> Result<Self, ShapeIdError> {
        if !is_identifier(member) {
            return Err(ShapeIdError::new(
                &format!("{}${member}", self.without_member()),
                "invalid member name",
            ));
        }
        Ok(Self {
            namespace: self.namespace.clone(),
            name: self.name.clone(),
            member: Some(member.to_string()),
        })
    }

    /// The container id (drops the member part, if any)
    pub fn without_member(&self) -> Self {
        Self {
            namespace: self.namespace.clone(),
            name: self.name.clone(),
            member: None,
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn member(&self) -> Option<&str> {
        self.member.as_deref()
    }

    pub fn has_member(&self) -> bool {
        self.member.is_some()
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.member {
            Some(member) => write!(f, "{}#{}${}", self.namespace, self.name, member),
            None => write!(f, "{}#{}", self.namespace, self.name),
        }
    }
}

impl FromStr for ShapeId {
    type Err = ShapeIdError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let (namespace, rest) = text
            .split_once('#')
            .ok_or_else(|| ShapeIdError::new(text, "missing `#` separator"))?;

        if !is_valid_namespace(namespace) {
            return Err(ShapeIdError::new(text, "invalid namespace"));
        }

        let (name, member) = match rest.split_once('$') {
            Some((name, member)) => (name, Some(member)),
            None => (rest, None),
        };

        if !is_identifier(name) {
            return Err(ShapeIdError::new(text, "invalid shape name"));
        }
        if let Some(member) = member {
            if !is_identifier(member) {
                return Err(ShapeIdError::new(text, "invalid member name"));
            }
        }

        Ok(Self {
            namespace: namespace.to_string(),
            name: name.to_string(),
            member: member.map(str::to_string),
        })
    }
}

impl TryFrom<&str> for ShapeId {
    type Error = ShapeIdError;

    fn try_from(text: &str) -> Result<Self, Self::Error> {
        text.parse()
    }
}

impl Serialize for ShapeId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ShapeId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// `[A-Za-z_][A-Za-z0-9_]*`, with at least one alphanumeric character
pub(crate) fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    text.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && text.chars().any(|c| c.is_ascii_alphanumeric())
}

fn is_valid_namespace(text: &str) -> bool {
    !text.is_empty() && text.split('.').all(is_identifier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_absolute_id() {
        let id: ShapeId = "example.weather#Forecast".parse().unwrap();
        assert_eq!(id.namespace(), "example.weather");
        assert_eq!(id.name(), "Forecast");
        assert_eq!(id.member(), None);
        assert_eq!(id.to_string(), "example.weather#Forecast");
    }

    #[test]
    fn test_parse_member_id() {
        let id: ShapeId = "ns#Foo$bar".parse().unwrap();
        assert_eq!(id.member(), Some("bar"));
        assert_eq!(id.without_member().to_string(), "ns#Foo");
    }

    #[test]
    fn test_rejects_malformed_ids() {
        assert!("Foo".parse::<ShapeId>().is_err());
        assert!("ns#".parse::<ShapeId>().is_err());
        assert!("#Foo".parse::<ShapeId>().is_err());
        assert!("ns..a#Foo".parse::<ShapeId>().is_err());
        assert!("ns#Foo$".parse::<ShapeId>().is_err());
        assert!("ns#1Foo".parse::<ShapeId>().is_err());
        assert!("ns#_".parse::<ShapeId>().is_err());
    }

    #[test]
    fn test_relative_resolution() {
        let id = ShapeId::from_relative("sensitive", "smithy.api").unwrap();
        assert_eq!(id.to_string(), "smithy.api#sensitive");

        let id = ShapeId::from_relative("other#tag", "smithy.api").unwrap();
        assert_eq!(id.to_string(), "other#tag");
    }

    #[test]
    fn test_ordering_puts_container_before_members() {
        let container: ShapeId = "ns#A".parse().unwrap();
        let member: ShapeId = "ns#A$z".parse().unwrap();
        let next: ShapeId = "ns#B".parse().unwrap();
        assert!(container < member);
        assert!(member < next);
    }

    #[test]
    fn test_serde_as_string() {
        let id: ShapeId = "ns#Foo$bar".parse().unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"ns#Foo$bar\"");
        let back: ShapeId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
