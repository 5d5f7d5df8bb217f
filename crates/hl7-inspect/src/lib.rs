//! # hl7-inspect
//!
//! Builds an empty HL7 message structure, optionally fills in its required
//! parts, and renders it as a JSON outline.
//!
//! Configuration comes from the environment:
//!
//! - `HL7_SCHEMA_PATH`: JSON schema file describing the message
//! - `HL7_MESSAGE`: built-in structure name when no schema is given (default `PMU_B01`)
//! - `HL7_POPULATE_REQUIRED`: create required structures (default `true`)

#![warn(missing_docs)]

pub mod config;
pub mod message;
pub mod outline;

pub use config::InspectConfig;
pub use message::{build_message, populate_required};
pub use outline::{outline, Node, Outline, SlotOutline};

use hl7_model::{FactoryError, SchemaError, StructureError};
use thiserror::Error;

/// Errors that can occur while inspecting a message.
#[derive(Error, Debug)]
pub enum InspectError {
    /// The schema file could not be loaded.
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// The message structure could not be created.
    #[error("Factory error: {0}")]
    Factory(#[from] FactoryError),

    /// A container operation failed.
    #[error("Structure error: {0}")]
    Structure(#[from] StructureError),

    /// A group contains itself, directly or through nested groups.
    #[error("Structure {path} contains itself")]
    RecursiveStructure {
        /// Group names from the message down to the repeated group.
        path: String,
    },

    /// The created structure is not a group.
    #[error("Structure {name} is not a group")]
    NotAGroup {
        /// Name of the structure.
        name: String,
    },
}
