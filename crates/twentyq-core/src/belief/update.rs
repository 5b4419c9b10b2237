use super::{BeliefEntry, BeliefState};
use crate::model::{AttributeKind, AttributeValue, Catalogue, Entity, Schema};
use core::fmt;
use serde::{Deserialize, Serialize};

/// Normalized reply to a posed question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Bool(bool),
    Text(String),
}

impl Answer {
    /// Keeps the trimmed reply as text. Whether `yes`/`no` style tokens mean a
    /// boolean is only decided against the attribute kind, so a text attribute
    /// holding `"Y"` still matches the reply `"y"`.
    pub fn parse(raw: &str) -> Self {
        Answer::Text(raw.trim().to_string())
    }

    /// `yes`/`true`/`y` and `no`/`false`/`n` in any case; `None` for other text.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Answer::Bool(flag) => Some(*flag),
            Answer::Text(text) => match text.trim().to_lowercase().as_str() {
                "yes" | "true" | "y" => Some(true),
                "no" | "false" | "n" => Some(false),
                _ => None,
            },
        }
    }

    fn matches(&self, kind: AttributeKind, value: &AttributeValue) -> bool {
        match kind {
            // Text other than a yes/no token never satisfies a boolean attribute.
            AttributeKind::Boolean => self.as_bool() == Some(value.truthy()),
            AttributeKind::Text => {
                value_text(value).to_lowercase() == self.to_string().to_lowercase()
            }
        }
    }
}

impl From<bool> for Answer {
    fn from(value: bool) -> Self {
        Answer::Bool(value)
    }
}

impl From<&str> for Answer {
    fn from(value: &str) -> Self {
        Answer::parse(value)
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Answer::Bool(true) => f.write_str("true"),
            Answer::Bool(false) => f.write_str("false"),
            Answer::Text(text) => f.write_str(text),
        }
    }
}

fn value_text(value: &AttributeValue) -> String {
    match value {
        AttributeValue::Bool(flag) => flag.to_string(),
        AttributeValue::Text(text) => text.clone(),
    }
}

fn entity_matches(entity: &Entity, attribute: &str, kind: AttributeKind, answer: &Answer) -> bool {
    entity
        .value(attribute)
        .is_some_and(|value| answer.matches(kind, value))
}

/// Eliminates every live entity inconsistent with `answer` and renormalizes.
///
/// Eliminated entities stay at zero. When nothing matches the returned state is
/// all-zero and unnormalized, which callers read as "no candidate left".
/// Attributes missing from the schema are compared as text.
pub fn update(
    catalogue: &Catalogue,
    schema: &Schema,
    state: &BeliefState,
    attribute: &str,
    answer: &Answer,
) -> BeliefState {
    let kind = schema.kind_of(attribute).unwrap_or(AttributeKind::Text);

    let entries = state
        .iter()
        .map(|entry| {
            let keep = entry.weight > 0.0
                && catalogue
                    .get(&entry.id)
                    .is_some_and(|entity| entity_matches(entity, attribute, kind, answer));
            BeliefEntry {
                id: entry.id.clone(),
                weight: if keep { entry.weight } else { 0.0 },
            }
        })
        .collect();

    let mut next = BeliefState::from_entries_unchecked(entries);
    next.normalize();
    next
}
