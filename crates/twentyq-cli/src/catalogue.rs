//! Catalogue loading from YAML or JSON record lists.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{Level, event};
use twentyq_core::model::{
    AttributeKind, AttributeValue, Catalogue, CatalogueError, Entity, Schema, parse_bool,
};

const NAME_FIELD: &str = "name";

/// Scalar as it appears in the source file.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl RawValue {
    fn into_text(self) -> String {
        match self {
            RawValue::Bool(flag) => flag.to_string(),
            RawValue::Int(value) => value.to_string(),
            RawValue::Float(value) => value.to_string(),
            RawValue::Text(text) => text.trim().to_string(),
        }
    }

    fn into_value(self, kind: AttributeKind) -> AttributeValue {
        match (kind, self) {
            (AttributeKind::Boolean, RawValue::Bool(flag)) => AttributeValue::Bool(flag),
            (AttributeKind::Boolean, other) => AttributeValue::Bool(parse_bool(&other.into_text())),
            (AttributeKind::Text, other) => AttributeValue::Text(other.into_text()),
        }
    }
}

type RawRecord = BTreeMap<String, Option<RawValue>>;

#[derive(Debug, Error)]
pub enum CatalogueLoadError {
    #[error("failed to read catalogue {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse catalogue {path:?}: {source}")]
    ParseYaml {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("failed to parse catalogue {path:?}: {source}")]
    ParseJson {
        #[source]
        source: serde_json::Error,
        path: PathBuf,
    },
    #[error("catalogue {path:?} contains no entries")]
    Empty { path: PathBuf },
    #[error("record {record} has no 'name'")]
    MissingName { record: usize },
    #[error("record {record} ('{name}') is missing fields: {}", .fields.join(", "))]
    MissingFields {
        record: usize,
        name: String,
        fields: Vec<String>,
    },
    #[error(transparent)]
    Catalogue(#[from] CatalogueError),
}

/// Reads a catalogue file, picking the parser from the file extension.
pub fn load_catalogue(
    path: impl AsRef<Path>,
    schema: &Schema,
) -> Result<Catalogue, CatalogueLoadError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|source| CatalogueLoadError::Read {
        source,
        path: path.to_path_buf(),
    })?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let records: Vec<RawRecord> = if is_json {
        serde_json::from_str(&raw).map_err(|source| CatalogueLoadError::ParseJson {
            source,
            path: path.to_path_buf(),
        })?
    } else {
        serde_yaml::from_str(&raw).map_err(|source| CatalogueLoadError::ParseYaml {
            source,
            path: path.to_path_buf(),
        })?
    };

    if records.is_empty() {
        return Err(CatalogueLoadError::Empty {
            path: path.to_path_buf(),
        });
    }

    let catalogue = catalogue_from_records(records, schema)?;
    event!(
        target: "twentyq::catalogue",
        Level::INFO,
        path = %path.display(),
        entities = catalogue.len(),
        attributes = schema.len(),
    );
    Ok(catalogue)
}

/// Parses a YAML document held in memory.
pub fn catalogue_from_yaml(yaml: &str, schema: &Schema) -> Result<Catalogue, CatalogueLoadError> {
    let records: Vec<RawRecord> =
        serde_yaml::from_str(yaml).map_err(|source| CatalogueLoadError::ParseYaml {
            source,
            path: PathBuf::from("<inline>"),
        })?;
    catalogue_from_records(records, schema)
}

fn catalogue_from_records(
    records: Vec<RawRecord>,
    schema: &Schema,
) -> Result<Catalogue, CatalogueLoadError> {
    let mut entities = Vec::with_capacity(records.len());
    for (index, mut record) in records.into_iter().enumerate() {
        let number = index + 1;
        let name = record
            .remove(NAME_FIELD)
            .flatten()
            .map(RawValue::into_text)
            .filter(|name| !name.is_empty())
            .ok_or(CatalogueLoadError::MissingName { record: number })?;

        let missing: Vec<String> = schema
            .names()
            .filter(|attr| !matches!(record.get(*attr), Some(Some(_))))
            .map(str::to_string)
            .collect();
        if !missing.is_empty() {
            return Err(CatalogueLoadError::MissingFields {
                record: number,
                name,
                fields: missing,
            });
        }

        let mut entity = Entity::new(name);
        for attr in schema.iter() {
            if let Some(Some(value)) = record.remove(&attr.name) {
                entity.insert(attr.name.clone(), value.into_value(attr.kind));
            }
        }
        entities.push(entity);
    }

    Ok(Catalogue::new(entities)?)
}
