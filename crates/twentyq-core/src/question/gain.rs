use crate::belief::{BeliefState, entropy};
use crate::model::{AttributeKind, AttributeValue, Catalogue, Schema};
use std::collections::BTreeMap;

fn group_key(kind: AttributeKind, value: &AttributeValue) -> String {
    match kind {
        AttributeKind::Boolean => AttributeValue::Bool(value.truthy()).canonical(),
        AttributeKind::Text => value.canonical(),
    }
}

/// Expected entropy reduction, in bits, from asking about `attribute`.
///
/// Candidates are partitioned by the canonical form of their value. Only entities
/// with positive weight take part in the partition, so an attribute every live
/// candidate shares scores exactly zero. Entities lacking the attribute are left
/// out of every group.
pub fn information_gain(
    catalogue: &Catalogue,
    schema: &Schema,
    state: &BeliefState,
    attribute: &str,
) -> f64 {
    if catalogue.is_empty() || state.is_empty() {
        return 0.0;
    }
    let total_weight = state.total();
    if total_weight <= 0.0 {
        return 0.0;
    }

    let base_entropy = entropy(state.weights());
    let kind = schema.kind_of(attribute).unwrap_or(AttributeKind::Text);

    let mut groups: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for (entity, weight) in state.live_entities(catalogue) {
        let Some(value) = entity.value(attribute) else {
            continue;
        };
        groups
            .entry(group_key(kind, value))
            .or_default()
            .push(weight);
    }

    if groups.len() <= 1 {
        return 0.0;
    }

    let mut weighted_entropy = 0.0;
    for weights in groups.values() {
        let group_weight: f64 = weights.iter().sum();
        if group_weight <= 0.0 {
            continue;
        }
        let group_probs = weights
            .iter()
            .filter(|w| **w > 0.0)
            .map(|w| w / group_weight);
        weighted_entropy += (group_weight / total_weight) * entropy(group_probs);
    }

    (base_entropy - weighted_entropy).max(0.0)
}
