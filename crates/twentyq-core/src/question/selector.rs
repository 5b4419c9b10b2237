use super::information_gain;
use crate::belief::BeliefState;
use crate::model::{AttributeKind, Catalogue, Schema};
use serde::Serialize;
use std::collections::BTreeSet;

/// Attribute to ask about plus the answers worth offering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Question {
    pub attribute: String,
    pub kind: AttributeKind,
    pub options: Vec<String>,
    pub gain: f64,
}

impl Question {
    pub fn is_boolean(&self) -> bool {
        self.kind == AttributeKind::Boolean
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredAttribute {
    pub attribute: String,
    pub gain: f64,
}

/// Gain of every schema attribute, in schema order.
pub fn score_attributes(
    catalogue: &Catalogue,
    schema: &Schema,
    state: &BeliefState,
) -> Vec<ScoredAttribute> {
    schema
        .iter()
        .map(|attr| ScoredAttribute {
            attribute: attr.name.clone(),
            gain: information_gain(catalogue, schema, state, &attr.name),
        })
        .collect()
}

/// Picks the most informative attribute, or `None` when nothing can discriminate
/// the remaining candidates. Ties go to the attribute declared first.
pub fn select_question(
    catalogue: &Catalogue,
    schema: &Schema,
    state: &BeliefState,
) -> Option<Question> {
    if state.live_count() <= 1 {
        return None;
    }

    let mut best: Option<ScoredAttribute> = None;
    for scored in score_attributes(catalogue, schema, state) {
        if scored.gain <= 0.0 {
            continue;
        }
        match &best {
            Some(current) if current.gain >= scored.gain => {}
            _ => best = Some(scored),
        }
    }

    let best = best?;
    let kind = schema
        .kind_of(&best.attribute)
        .unwrap_or(AttributeKind::Text);
    let options = match kind {
        AttributeKind::Boolean => vec!["yes".to_string(), "no".to_string()],
        AttributeKind::Text => live_values(catalogue, state, &best.attribute),
    };

    Some(Question {
        attribute: best.attribute,
        kind,
        options,
        gain: best.gain,
    })
}

fn live_values(catalogue: &Catalogue, state: &BeliefState, attribute: &str) -> Vec<String> {
    state
        .live_entities(catalogue)
        .filter_map(|(entity, _)| entity.value(attribute))
        .map(|value| value.canonical())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
