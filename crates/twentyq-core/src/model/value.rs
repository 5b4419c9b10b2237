use core::fmt;
use serde::{Deserialize, Serialize};

/// Value an entity holds for one attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Bool(bool),
    Text(String),
}

impl AttributeValue {
    /// Grouping key used when partitioning candidates. Booleans render as
    /// `True`/`False` regardless of how the provider spelled them.
    pub fn canonical(&self) -> String {
        match self {
            AttributeValue::Bool(true) => "True".to_string(),
            AttributeValue::Bool(false) => "False".to_string(),
            AttributeValue::Text(text) => text.clone(),
        }
    }

    /// Truth value of the attribute. Text is true only when it reads `true`.
    pub fn truthy(&self) -> bool {
        match self {
            AttributeValue::Bool(flag) => *flag,
            AttributeValue::Text(text) => parse_bool(text),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(text) => Some(text.as_str()),
            AttributeValue::Bool(_) => None,
        }
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Bool(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Text(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::Text(value)
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Bool(true) => f.write_str("yes"),
            AttributeValue::Bool(false) => f.write_str("no"),
            AttributeValue::Text(text) => f.write_str(text),
        }
    }
}

/// Catalogue providers store booleans as text; only `true` (any case) is truthy.
pub fn parse_bool(raw: &str) -> bool {
    raw.trim().eq_ignore_ascii_case("true")
}
