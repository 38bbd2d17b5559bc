//! Attribute schema: which attributes exist, how they are stored and how they are described.
//! The game's item schema is large; upgrades only need these few properties per attribute.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::steps::DescriptionFormat;

pub const DEFAULT_SCHEMA_PATH: &str = "data/attributes.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeDefinition {
    pub name: String,
    #[serde(default = "default_true")]
    pub stored_as_float: bool,
    #[serde(default)]
    pub stored_as_integer: bool,
    /// Supports gameplay modification and networking.
    #[serde(default = "default_true")]
    pub networked: bool,
    #[serde(default)]
    pub description_format: DescriptionFormat,
}

const fn default_true() -> bool {
    true
}

impl AttributeDefinition {
    pub fn float(name: impl Into<String>, description_format: DescriptionFormat) -> Self {
        Self {
            name: name.into(),
            stored_as_float: true,
            stored_as_integer: false,
            networked: true,
            description_format,
        }
    }

    /// Why this attribute cannot back an upgrade, if it can't.
    pub fn upgrade_rejection(&self) -> Option<&'static str> {
        if !self.networked {
            Some("is of a type that doesn't support networking")
        } else if !self.stored_as_float || self.stored_as_integer {
            Some("is not stored as a float")
        } else {
            None
        }
    }
}

/// Attribute definition lookup by name.
pub trait AttributeSchema {
    fn attribute_by_name(&self, name: &str) -> Option<&AttributeDefinition>;
}

impl<S: AttributeSchema + ?Sized> AttributeSchema for &S {
    fn attribute_by_name(&self, name: &str) -> Option<&AttributeDefinition> {
        (**self).attribute_by_name(name)
    }
}

impl<S: AttributeSchema + ?Sized> AttributeSchema for Box<S> {
    fn attribute_by_name(&self, name: &str) -> Option<&AttributeDefinition> {
        (**self).attribute_by_name(name)
    }
}

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("failed to read attribute schema from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse attribute schema: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SchemaFile {
    Wrapped { attributes: Vec<AttributeDefinition> },
    Bare(Vec<AttributeDefinition>),
}

/// In-memory schema, usually loaded from `data/attributes.json`.
#[derive(Debug, Clone, Default)]
pub struct StaticSchema {
    by_name: HashMap<String, AttributeDefinition>,
}

impl StaticSchema {
    pub fn new<I>(attributes: I) -> Self
    where
        I: IntoIterator<Item = AttributeDefinition>,
    {
        Self {
            by_name: attributes
                .into_iter()
                .map(|attr| (attr.name.clone(), attr))
                .collect(),
        }
    }

    /// Accepts either a top-level array or `{ "attributes": [...] }`.
    pub fn from_json_str(json: &str) -> Result<Self, SchemaError> {
        let attributes = match serde_json::from_str(json)? {
            SchemaFile::Wrapped { attributes } => attributes,
            SchemaFile::Bare(attributes) => attributes,
        };
        Ok(Self::new(attributes))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| SchemaError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

impl AttributeSchema for StaticSchema {
    fn attribute_by_name(&self, name: &str) -> Option<&AttributeDefinition> {
        self.by_name.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_wrapped_and_bare_json() {
        let wrapped = StaticSchema::from_json_str(
            r#"{ "attributes": [ { "name": "damage bonus", "description_format": "value_is_percentage" } ] }"#,
        )
        .unwrap();
        let attr = wrapped.attribute_by_name("damage bonus").unwrap();
        assert_eq!(attr.description_format, DescriptionFormat::Percentage);
        assert!(attr.networked && attr.stored_as_float);

        let bare = StaticSchema::from_json_str(
            r#"[ { "name": "max health additive bonus" }, { "name": "kill eater", "stored_as_integer": true } ]"#,
        )
        .unwrap();
        assert_eq!(bare.len(), 2);
        assert_eq!(
            bare.attribute_by_name("max health additive bonus")
                .unwrap()
                .description_format,
            DescriptionFormat::Linear
        );
    }

    #[test]
    fn rejection_reasons_cover_networking_and_storage() {
        let mut attr = AttributeDefinition::float("x", DescriptionFormat::Linear);
        assert_eq!(attr.upgrade_rejection(), None);
        attr.stored_as_integer = true;
        assert_eq!(attr.upgrade_rejection(), Some("is not stored as a float"));
        attr.networked = false;
        assert_eq!(
            attr.upgrade_rejection(),
            Some("is of a type that doesn't support networking")
        );
    }
}
