//! Typed access to input source properties.
//!
//! The OS reports every property as a loosely typed value. Each accessor here
//! checks presence and shape, so a provider that breaks its contract yields a
//! `PropertyError` instead of a crash.

use std::fmt;

use thiserror::Error;

// =============================================================================
// Keys & Values
// =============================================================================

/// The properties this crate reads from a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKey {
    /// Stable identifier, e.g. `com.apple.keylayout.US`.
    Id,
    /// Category tag string.
    Category,
    /// Whether the source can be activated.
    IsSelectable,
    /// Ordered language tags (BCP 47).
    Languages,
}

impl PropertyKey {
    /// Name of the matching Text Input Sources property.
    pub const fn as_str(self) -> &'static str {
        match self {
            PropertyKey::Id => "TISPropertyInputSourceID",
            PropertyKey::Category => "TISPropertyInputSourceCategory",
            PropertyKey::IsSelectable => "TISPropertyInputSourceIsSelectCapable",
            PropertyKey::Languages => "TISPropertyInputSourceLanguages",
        }
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A property value as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    String(String),
    Bool(bool),
    StringList(Vec<String>),
    /// Anything this crate has no representation for.
    Other(&'static str),
}

impl PropertyValue {
    fn type_name(&self) -> &'static str {
        match self {
            PropertyValue::String(_) => "string",
            PropertyValue::Bool(_) => "bool",
            PropertyValue::StringList(_) => "string list",
            PropertyValue::Other(name) => *name,
        }
    }
}

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PropertyError {
    #[error("input source has no `{key}` property")]
    MissingProperty { key: PropertyKey },

    #[error("property `{key}` has type {found}, expected {expected}")]
    UnexpectedPropertyType {
        key: PropertyKey,
        expected: &'static str,
        found: &'static str,
    },
}

// =============================================================================
// Accessors
// =============================================================================

fn unexpected(key: PropertyKey, expected: &'static str, found: &PropertyValue) -> PropertyError {
    PropertyError::UnexpectedPropertyType {
        key,
        expected,
        found: found.type_name(),
    }
}

/// Read `key` as a string.
pub fn as_string(key: PropertyKey, value: Option<PropertyValue>) -> Result<String, PropertyError> {
    match value {
        Some(PropertyValue::String(s)) => Ok(s),
        Some(other) => Err(unexpected(key, "string", &other)),
        None => Err(PropertyError::MissingProperty { key }),
    }
}

/// Read `key` as a boolean.
pub fn as_bool(key: PropertyKey, value: Option<PropertyValue>) -> Result<bool, PropertyError> {
    match value {
        Some(PropertyValue::Bool(b)) => Ok(b),
        Some(other) => Err(unexpected(key, "bool", &other)),
        None => Err(PropertyError::MissingProperty { key }),
    }
}

/// Read `key` as a list of strings.
pub fn as_string_list(
    key: PropertyKey,
    value: Option<PropertyValue>,
) -> Result<Vec<String>, PropertyError> {
    match value {
        Some(PropertyValue::StringList(list)) => Ok(list),
        Some(other) => Err(unexpected(key, "string list", &other)),
        None => Err(PropertyError::MissingProperty { key }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_present() {
        let value = Some(PropertyValue::String("com.apple.keylayout.US".into()));
        assert_eq!(
            as_string(PropertyKey::Id, value).as_deref(),
            Ok("com.apple.keylayout.US")
        );
    }

    #[test]
    fn test_missing_property() {
        assert_eq!(
            as_bool(PropertyKey::IsSelectable, None),
            Err(PropertyError::MissingProperty { key: PropertyKey::IsSelectable })
        );
    }

    #[test]
    fn test_unexpected_type() {
        let err = as_string_list(PropertyKey::Languages, Some(PropertyValue::Bool(true))).unwrap_err();
        assert_eq!(
            err,
            PropertyError::UnexpectedPropertyType {
                key: PropertyKey::Languages,
                expected: "string list",
                found: "bool",
            }
        );
        assert_eq!(
            err.to_string(),
            "property `TISPropertyInputSourceLanguages` has type bool, expected string list"
        );
    }
}
