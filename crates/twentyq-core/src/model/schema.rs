use core::fmt;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// How values of an attribute are compared and offered as answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeKind {
    Boolean,
    Text,
}

impl AttributeKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            AttributeKind::Boolean => "boolean",
            AttributeKind::Text => "text",
        }
    }
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub kind: AttributeKind,
}

impl Attribute {
    pub fn boolean(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: AttributeKind::Boolean,
        }
    }

    pub fn text(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: AttributeKind::Text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    Empty,
    BlankName,
    DuplicateAttribute(String),
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaError::Empty => write!(f, "schema must declare at least one attribute"),
            SchemaError::BlankName => write!(f, "attribute names must not be blank"),
            SchemaError::DuplicateAttribute(name) => {
                write!(f, "attribute '{name}' declared more than once")
            }
        }
    }
}

impl std::error::Error for SchemaError {}

/// Ordered attribute descriptor. Declaration order is the question tie-break order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    attributes: Vec<Attribute>,
}

impl Schema {
    pub fn new(attributes: Vec<Attribute>) -> Result<Self, SchemaError> {
        if attributes.is_empty() {
            return Err(SchemaError::Empty);
        }
        let mut seen = HashSet::new();
        for attribute in &attributes {
            if attribute.name.trim().is_empty() {
                return Err(SchemaError::BlankName);
            }
            if !seen.insert(attribute.name.as_str()) {
                return Err(SchemaError::DuplicateAttribute(attribute.name.clone()));
            }
        }
        Ok(Self { attributes })
    }

    /// The footballer schema the engine ships with.
    pub fn football() -> Self {
        Self {
            attributes: vec![
                Attribute::text("club"),
                Attribute::text("position"),
                Attribute::text("nationality"),
                Attribute::boolean("retired"),
                Attribute::boolean("ballon_dor"),
                Attribute::boolean("champions_league"),
            ],
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.attributes.iter().map(|attr| attr.name.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|attr| attr.name == name)
    }

    pub fn kind_of(&self, name: &str) -> Option<AttributeKind> {
        self.get(name).map(|attr| attr.kind)
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}
