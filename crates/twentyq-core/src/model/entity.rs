use super::AttributeValue;
use core::fmt;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Unique identity of a catalogue entry.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for EntityId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    id: EntityId,
    attributes: BTreeMap<String, AttributeValue>,
}

impl Entity {
    pub fn new(id: impl Into<EntityId>) -> Self {
        Self {
            id: id.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Builder-style attribute setter used by providers and tests.
    pub fn with(mut self, attribute: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(attribute.into(), value.into());
        self
    }

    pub fn insert(&mut self, attribute: impl Into<String>, value: impl Into<AttributeValue>) {
        self.attributes.insert(attribute.into(), value.into());
    }

    pub fn id(&self) -> &EntityId {
        &self.id
    }

    pub fn value(&self, attribute: &str) -> Option<&AttributeValue> {
        self.attributes.get(attribute)
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.attributes
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogueError {
    DuplicateIdentity(EntityId),
}

impl fmt::Display for CatalogueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogueError::DuplicateIdentity(id) => {
                write!(f, "entity '{id}' appears more than once in the catalogue")
            }
        }
    }
}

impl std::error::Error for CatalogueError {}

/// Ordered, immutable collection of entities.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalogue {
    entities: Vec<Entity>,
    index: HashMap<EntityId, usize>,
}

impl Catalogue {
    pub fn new(entities: Vec<Entity>) -> Result<Self, CatalogueError> {
        let mut index = HashMap::with_capacity(entities.len());
        for (position, entity) in entities.iter().enumerate() {
            if index.insert(entity.id().clone(), position).is_some() {
                return Err(CatalogueError::DuplicateIdentity(entity.id().clone()));
            }
        }
        Ok(Self { entities, index })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &EntityId) -> Option<&Entity> {
        self.index.get(id).map(|&position| &self.entities[position])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_attributes() {
        let messi = Entity::new("Lionel Messi")
            .with("club", "Inter Miami")
            .with("retired", false);
        assert_eq!(messi.id().as_str(), "Lionel Messi");
        assert_eq!(messi.value("club"), Some(&AttributeValue::from("Inter Miami")));
        assert_eq!(messi.value("retired"), Some(&AttributeValue::Bool(false)));
        assert!(messi.value("position").is_none());
    }

    #[test]
    fn catalogue_rejects_duplicate_identity() {
        let err = Catalogue::new(vec![Entity::new("Pele"), Entity::new("Pele")])
            .expect_err("duplicate");
        assert_eq!(err, CatalogueError::DuplicateIdentity(EntityId::new("Pele")));
    }

    #[test]
    fn catalogue_preserves_order_and_lookup() {
        let catalogue =
            Catalogue::new(vec![Entity::new("b"), Entity::new("a")]).expect("unique ids");
        let ids: Vec<_> = catalogue.iter().map(|e| e.id().as_str()).collect();
        assert_eq!(ids, ["b", "a"]);
        let a = catalogue.get(&EntityId::new("a")).expect("indexed");
        assert_eq!(a.id().as_str(), "a");
        assert_eq!(catalogue.get(&EntityId::new("b")).map(|e| e.id().as_str()), Some("b"));
        assert!(catalogue.get(&EntityId::new("c")).is_none());
    }
}
