//! Error types and result aliases for the structure model.

use std::any::type_name;

use thiserror::Error;

use crate::structure::StructureId;

/// Errors raised by a structure factory.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FactoryError {
    /// No constructor is registered for the requested kind.
    #[error("No structure type registered for '{kind}'")]
    UnknownKind {
        /// The kind that could not be resolved.
        kind: String,
    },

    /// A group type could not be built from its slot table.
    #[error("Invalid group '{kind}': {reason}")]
    InvalidGroup {
        /// The group kind being built.
        kind: String,
        /// Why the group was rejected.
        reason: String,
    },
}

/// Result type for factory operations.
pub type FactoryResult<T> = Result<T, FactoryError>;

/// Errors raised by structure container operations.
///
/// Every variant is a contract violation reported to the immediate caller.
/// A failed operation leaves the container exactly as it was.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructureError {
    /// The requested name is not one of the group's slots.
    #[error("'{name}' is not a structure defined in {group}")]
    UnknownStructure {
        /// The group that was queried.
        group: String,
        /// The unknown slot name.
        name: String,
    },

    /// A repetition index outside the accessible range was requested.
    #[error(
        "Repetition {index} of '{name}' in {group} is out of range \
         ({count} in use, repeating: {repeating})"
    )]
    RepetitionOutOfRange {
        /// The group that was queried.
        group: String,
        /// The slot name.
        name: String,
        /// The requested index.
        index: usize,
        /// Number of repetitions in use at the time of the call.
        count: usize,
        /// Whether the slot may repeat.
        repeating: bool,
    },

    /// A second repetition was requested for a non-repeating slot.
    #[error("'{name}' in {group} is not repeating and already holds a repetition")]
    CardinalityViolation {
        /// The group that was modified.
        group: String,
        /// The slot name.
        name: String,
    },

    /// The given structure is not held under the slot.
    #[error("Structure {id} is not a repetition of '{name}' in {group}")]
    NotFound {
        /// The group that was modified.
        group: String,
        /// The slot name.
        name: String,
        /// Identity of the structure that was looked for.
        id: StructureId,
    },

    /// The slot holds a structure of another type than the one requested.
    #[error("'{name}' in {group} does not hold a {expected}")]
    TypeMismatch {
        /// The group that was queried.
        group: String,
        /// The slot name.
        name: String,
        /// Rust type that was requested.
        expected: &'static str,
    },

    /// The structure factory failed to produce a new instance.
    #[error(transparent)]
    Factory(#[from] FactoryError),
}

impl StructureError {
    pub(crate) fn unknown(group: &str, name: &str) -> Self {
        Self::UnknownStructure {
            group: group.to_string(),
            name: name.to_string(),
        }
    }

    pub(crate) fn type_mismatch<T>(group: &str, name: &str) -> Self {
        Self::TypeMismatch {
            group: group.to_string(),
            name: name.to_string(),
            expected: type_name::<T>(),
        }
    }
}

/// Result type for structure container operations.
pub type StructureResult<T> = Result<T, StructureError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_error_is_propagated_unchanged() {
        let source = FactoryError::UnknownKind {
            kind: "ZZZ".to_string(),
        };
        let error = StructureError::from(source.clone());
        assert_eq!(error, StructureError::Factory(source));
        assert_eq!(error.to_string(), "No structure type registered for 'ZZZ'");
    }

    #[test]
    fn test_messages() {
        let error = StructureError::unknown("PMU_B01", "PID");
        assert_eq!(error.to_string(), "'PID' is not a structure defined in PMU_B01");

        let error = StructureError::type_mismatch::<u32>("PMU_B01", "MSH");
        assert_eq!(error.to_string(), "'MSH' in PMU_B01 does not hold a u32");
    }
}
