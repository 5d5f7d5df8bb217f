//! # hl7-model
//!
//! Schema-driven hierarchical structure model for HL7 v2 messages.
//!
//! A message is a tree of named, ordered, cardinality-constrained slots.
//! [`Group`] is the generic container every message and group shape is built
//! on; typed message classes are thin facades generated with
//! [`hl7_structure!`] from a table of `(kind, required, repeating)` rows.
//!
//! ## Usage
//!
//! ```rust
//! use hl7_model::v24::{self, PmuB01};
//! use hl7_model::StructureError;
//!
//! let mut message = PmuB01::new(v24::factory())?;
//!
//! // Required header segments are created on first access.
//! message.msh()?.set_field(8, "PMU^B01^PMU_B01");
//!
//! // Repeating segments are added explicitly or by "next rep" access.
//! message.add_pra()?;
//! let first = message.group().id_at("PRA", 0)?;
//! message.pra_rep(1)?;
//! assert_eq!(message.pra_reps_used()?, 2);
//!
//! message.remove_pra(first)?;
//! assert_eq!(message.pra_reps_used()?, 1);
//!
//! // Non-repeating slots hold at most one repetition.
//! assert!(matches!(
//!     message.group_mut().add("MSH"),
//!     Err(StructureError::CardinalityViolation { .. })
//! ));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Concurrency
//!
//! Containers are plain synchronous in-memory trees. Every structure is
//! `Send + Sync`; hosts sharing a message across threads wrap it in a single
//! lock.

#![warn(missing_docs)]

pub mod factory;
mod facade;
mod group;
pub mod schema;
mod segment;
mod structure;
mod types;
pub mod v24;

// Re-export hl7-types for convenience
pub use hl7_types;

pub use factory::{Constructor, FactoryRegistry, SharedFactory, StructureFactory};
pub use group::{Group, GroupBuilder, Repetitions, SlotSpec};
pub use schema::{SchemaError, SchemaResult};
pub use segment::Segment;
pub use structure::{Repetition, Structure, StructureId};
pub use types::{FactoryError, FactoryResult, StructureError, StructureResult};
