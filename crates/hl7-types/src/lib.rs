//! # hl7-types
//!
//! Type definitions for HL7 v2 message structure schemas.
//!
//! This crate provides the plain data types shared by the structure model:
//! slot definitions, their cardinality, and the schema tables message shapes
//! are derived from.
//!
//! ## Features
//!
//! - `serde` (default): Enables serialization/deserialization support via serde.
//!   Disable this feature for zero-dependency usage.
//!
//! ## Usage
//!
//! ```rust
//! use hl7_types::{Cardinality, MessageSchema, SchemaEntry};
//! use hl7_types::well_known;
//!
//! let schema = MessageSchema::new(
//!     "ACK",
//!     well_known::VERSION_2_4,
//!     vec![
//!         SchemaEntry::segment(well_known::MSH, true, false),
//!         SchemaEntry::segment(well_known::MSA, true, false),
//!         SchemaEntry::segment(well_known::ERR, false, false),
//!     ],
//! );
//!
//! assert!(schema.validate().is_ok());
//! assert_eq!(Cardinality::from_flags(false, false).to_string(), "0..1");
//! ```
//!
//! ## Without Serde
//!
//! ```toml
//! [dependencies]
//! hl7-types = { version = "0.1", default-features = false }
//! ```

#![warn(missing_docs)]

mod cardinality;
mod definition;
pub mod schema;
pub mod well_known;

// Re-export all public types at crate root
pub use cardinality::Cardinality;
pub use definition::{unique_slot_name, StructureDefinition};
pub use schema::{MessageSchema, SchemaEntry, SchemaValidationError};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_types_are_exported() {
        let _card = Cardinality::unbounded();
        let _entry = SchemaEntry::segment("MSH", true, false);
        let _schema = MessageSchema::default();
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_roundtrip() {
        let definition = StructureDefinition {
            name: "PRA".to_string(),
            kind: "PRA".to_string(),
            required: false,
            repeating: true,
            position: 3,
        };

        let json = serde_json::to_string(&definition).unwrap();
        let parsed: StructureDefinition = serde_json::from_str(&json).unwrap();
        assert_eq!(definition, parsed);
    }
}
