use crate::model::{Catalogue, Entity, EntityId};
use core::fmt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeliefEntry {
    pub id: EntityId,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BeliefError {
    InvalidWeight { id: EntityId, weight: f64 },
    DuplicateIdentity(EntityId),
}

impl fmt::Display for BeliefError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BeliefError::InvalidWeight { id, weight } => {
                write!(f, "weight {weight} for '{id}' is not a finite non-negative number")
            }
            BeliefError::DuplicateIdentity(id) => {
                write!(f, "'{id}' has more than one weight")
            }
        }
    }
}

impl std::error::Error for BeliefError {}

/// Probability mass function over entity identities.
///
/// Entries keep catalogue order. A weight of zero marks an eliminated entity; the
/// entry is kept so elimination stays queryable. Whenever any weight is positive
/// the weights sum to one.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BeliefState {
    entries: Vec<BeliefEntry>,
}

impl BeliefState {
    /// `1/N` for each of the `N` catalogue entities.
    pub fn uniform(catalogue: &Catalogue) -> Self {
        if catalogue.is_empty() {
            return Self::default();
        }
        let weight = 1.0 / catalogue.len() as f64;
        Self {
            entries: catalogue
                .iter()
                .map(|entity| BeliefEntry {
                    id: entity.id().clone(),
                    weight,
                })
                .collect(),
        }
    }

    /// Builds a state from raw weights, normalizing when any mass is present.
    pub fn from_weights<I>(weights: I) -> Result<Self, BeliefError>
    where
        I: IntoIterator<Item = (EntityId, f64)>,
    {
        let mut entries: Vec<BeliefEntry> = Vec::new();
        for (id, weight) in weights {
            if !weight.is_finite() || weight < 0.0 {
                return Err(BeliefError::InvalidWeight { id, weight });
            }
            if entries.iter().any(|entry| entry.id == id) {
                return Err(BeliefError::DuplicateIdentity(id));
            }
            entries.push(BeliefEntry { id, weight });
        }
        let mut state = Self { entries };
        state.normalize();
        Ok(state)
    }

    /// Rescales weights to sum to one. An all-zero state is left untouched.
    pub(crate) fn normalize(&mut self) {
        let total = self.total();
        if total > 0.0 {
            for entry in &mut self.entries {
                entry.weight /= total;
            }
        }
    }

    pub(crate) fn from_entries_unchecked(entries: Vec<BeliefEntry>) -> Self {
        Self { entries }
    }

    /// Weight of `id`; unknown identities have zero mass.
    pub fn weight(&self, id: &EntityId) -> f64 {
        self.entries
            .iter()
            .find(|entry| &entry.id == id)
            .map(|entry| entry.weight)
            .unwrap_or(0.0)
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.entries.iter().any(|entry| &entry.id == id)
    }

    pub fn is_eliminated(&self, id: &EntityId) -> bool {
        self.weight(id) <= 0.0
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|entry| entry.weight).sum()
    }

    pub fn weights(&self) -> impl Iterator<Item = f64> + '_ {
        self.entries.iter().map(|entry| entry.weight)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BeliefEntry> {
        self.entries.iter()
    }

    /// Entries with strictly positive weight.
    pub fn live(&self) -> impl Iterator<Item = &BeliefEntry> {
        self.entries.iter().filter(|entry| entry.weight > 0.0)
    }

    /// Live entries resolved against `catalogue`, in belief order. Entries the
    /// catalogue does not know are skipped.
    pub fn live_entities<'c>(
        &self,
        catalogue: &'c Catalogue,
    ) -> impl Iterator<Item = (&'c Entity, f64)> {
        self.live()
            .filter_map(move |entry| catalogue.get(&entry.id).map(|entity| (entity, entry.weight)))
    }

    pub fn live_count(&self) -> usize {
        self.live().count()
    }

    /// Highest-weight entry; the earliest entry wins ties. `None` when no mass remains.
    pub fn top(&self) -> Option<&BeliefEntry> {
        let mut best: Option<&BeliefEntry> = None;
        for entry in self.live() {
            match best {
                Some(current) if current.weight >= entry.weight => {}
                _ => best = Some(entry),
            }
        }
        best
    }

    /// Live entries sorted by descending weight, capped at `limit`.
    pub fn ranked(&self, limit: usize) -> Vec<&BeliefEntry> {
        let mut live: Vec<&BeliefEntry> = self.live().collect();
        live.sort_by(|a, b| b.weight.total_cmp(&a.weight));
        live.truncate(limit);
        live
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
