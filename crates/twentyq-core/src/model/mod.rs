//! Catalogue data model: attribute schema, attribute values and entities.

pub mod entity;
pub mod schema;
pub mod value;

pub use entity::{Catalogue, CatalogueError, Entity, EntityId};
pub use schema::{Attribute, AttributeKind, Schema, SchemaError};
pub use value::{AttributeValue, parse_bool};
