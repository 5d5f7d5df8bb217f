//! Schema-driven groups.
//!
//! Builds groups from [`MessageSchema`] tables instead of compiled facades.
//! Nested group entries are registered with a [`FactoryRegistry`] so they
//! can be created on demand like any other structure.
//!
//! # Usage
//!
//! ```
//! use hl7_model::{schema, FactoryRegistry, Group};
//!
//! let json = r#"{
//!     "name": "ACK",
//!     "version": "2.4",
//!     "entries": [
//!         { "kind": "MSH", "required": true },
//!         { "kind": "MSA", "required": true },
//!         { "kind": "ERR" }
//!     ]
//! }"#;
//!
//! let message = schema::parse_schema(json)?;
//! let mut registry = FactoryRegistry::new();
//! registry.register_segments(["MSH", "MSA", "ERR"]);
//! registry.register_schema(&message);
//!
//! let group = Group::from_schema(&message, registry.into_shared())?;
//! assert_eq!(group.names(), vec!["MSH", "MSA", "ERR"]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use hl7_types::{MessageSchema, SchemaEntry, SchemaValidationError};
use thiserror::Error;
use tracing::debug;

use crate::factory::{FactoryRegistry, SharedFactory};
use crate::group::{Group, GroupBuilder, SlotSpec};
use crate::types::{FactoryError, FactoryResult};

/// Errors that can occur while loading a schema table.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// I/O error reading the schema file.
    #[error("IO error reading schema: {0}")]
    Io(#[from] std::io::Error),

    /// The schema is not valid JSON for a message schema.
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// The schema parsed but is structurally unusable.
    #[error("Invalid schema: {0}")]
    Invalid(#[from] SchemaValidationError),

    /// Schema file not found.
    #[error("Schema file not found: {path}")]
    FileNotFound {
        /// The path that was not found.
        path: String,
    },
}

/// Result type for schema loading.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Parses and validates a schema from JSON text.
pub fn parse_schema(json: &str) -> SchemaResult<MessageSchema> {
    let schema: MessageSchema = serde_json::from_str(json)?;
    schema.validate()?;
    Ok(schema)
}

/// Reads and validates a schema from any reader.
pub fn read_schema<R: Read>(reader: R) -> SchemaResult<MessageSchema> {
    let schema: MessageSchema = serde_json::from_reader(reader)?;
    schema.validate()?;
    Ok(schema)
}

/// Loads and validates a schema from a JSON file.
pub fn load_schema<P: AsRef<Path>>(path: P) -> SchemaResult<MessageSchema> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(SchemaError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let schema = read_schema(BufReader::new(File::open(path)?))?;
    debug!(path = %path.display(), name = %schema.name, "loaded message schema");
    Ok(schema)
}

fn slot_specs(entries: &[SchemaEntry]) -> Vec<SlotSpec> {
    entries
        .iter()
        .map(|entry| SlotSpec::owned(entry.kind.clone(), entry.required, entry.repeating))
        .collect()
}

impl FactoryRegistry {
    /// Registers the message of `schema` and every nested group it defines.
    ///
    /// Segment kinds used by the schema must be registered separately.
    pub fn register_schema(&mut self, schema: &MessageSchema) -> &mut Self {
        self.register_group(schema.name.clone(), slot_specs(&schema.entries));
        for group in schema.groups() {
            self.register_group(group.kind.clone(), slot_specs(&group.children));
        }
        self
    }
}

impl Group {
    /// Builds the top-level group of `schema`.
    ///
    /// Nested groups must be resolvable through `factory`, typically by
    /// having called [`FactoryRegistry::register_schema`] beforehand.
    pub fn from_schema(schema: &MessageSchema, factory: SharedFactory) -> FactoryResult<Self> {
        schema.validate().map_err(|e| FactoryError::InvalidGroup {
            kind: schema.name.clone(),
            reason: e.to_string(),
        })?;
        GroupBuilder::new(schema.name.clone(), factory)
            .specs(slot_specs(&schema.entries))
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Segment, StructureError};

    const ORU_JSON: &str = r#"{
        "name": "ORU_R01",
        "version": "2.4",
        "entries": [
            { "kind": "MSH", "required": true },
            {
                "kind": "ORU_R01_ORDER_OBSERVATION",
                "required": true,
                "repeating": true,
                "children": [
                    { "kind": "OBR", "required": true },
                    { "kind": "NTE", "repeating": true },
                    { "kind": "OBX", "repeating": true }
                ]
            }
        ]
    }"#;

    fn make_factory(schema: &MessageSchema) -> SharedFactory {
        let mut registry = FactoryRegistry::new();
        registry
            .register_segments(["MSH", "OBR", "NTE", "OBX"])
            .register_schema(schema);
        registry.into_shared()
    }

    #[test]
    fn test_parse_and_build_nested() {
        let schema = parse_schema(ORU_JSON).unwrap();
        let mut message = Group::from_schema(&schema, make_factory(&schema)).unwrap();

        assert_eq!(message.name(), "ORU_R01");
        assert_eq!(message.names(), vec!["MSH", "ORU_R01_ORDER_OBSERVATION"]);

        let order = message
            .get_rep_as::<Group>("ORU_R01_ORDER_OBSERVATION", 0)
            .unwrap();
        order.get_as::<Segment>("OBR").unwrap().set_field(3, "CBC");
        order.add("OBX").unwrap();
        order.add("OBX").unwrap();

        message.add("ORU_R01_ORDER_OBSERVATION").unwrap();
        assert_eq!(message.count("ORU_R01_ORDER_OBSERVATION").unwrap(), 2);

        let obx_counts: Vec<usize> = message
            .iter_as::<Group>("ORU_R01_ORDER_OBSERVATION")
            .unwrap()
            .map(|order| order.count("OBX").unwrap())
            .collect();
        assert_eq!(obx_counts, vec![2, 0]);
    }

    #[test]
    fn test_missing_segment_registration() {
        let schema = parse_schema(ORU_JSON).unwrap();
        let mut registry = FactoryRegistry::new();
        registry.register_segments(["MSH", "OBR"]).register_schema(&schema);
        let mut message = Group::from_schema(&schema, registry.into_shared()).unwrap();

        assert_eq!(
            message.get("ORU_R01_ORDER_OBSERVATION").unwrap_err(),
            StructureError::Factory(FactoryError::UnknownKind {
                kind: "NTE".to_string()
            })
        );
        assert_eq!(message.count("ORU_R01_ORDER_OBSERVATION").unwrap(), 0);
    }

    #[test]
    fn test_invalid_schema_rejected() {
        let error = parse_schema(r#"{ "name": "ACK", "entries": [] }"#).unwrap_err();
        assert!(matches!(
            error,
            SchemaError::Invalid(SchemaValidationError::NoEntries { .. })
        ));

        let error = parse_schema("{ not json").unwrap_err();
        assert!(matches!(error, SchemaError::Json(_)));
    }

    #[test]
    fn test_from_schema_validates() {
        let schema = MessageSchema::new("EMPTY", "2.4", vec![]);
        let factory = FactoryRegistry::new().into_shared();
        assert!(matches!(
            Group::from_schema(&schema, factory),
            Err(FactoryError::InvalidGroup { .. })
        ));
    }

    #[test]
    fn test_load_schema_missing_file() {
        let error = load_schema("/nonexistent/schema.json").unwrap_err();
        assert!(matches!(error, SchemaError::FileNotFound { .. }));
    }

    #[test]
    fn test_read_schema_from_reader() {
        let schema = read_schema(ORU_JSON.as_bytes()).unwrap();
        assert_eq!(schema.version, "2.4");
        assert_eq!(schema.groups().len(), 1);
    }
}
