//! Structure definition type.
//!
//! A `StructureDefinition` describes one named child slot of a message or
//! group: which kind of structure it holds, whether it is required, and
//! whether it may repeat.

use crate::Cardinality;

/// Definition of one child slot of a message or group.
///
/// Definitions are fixed when the owning group is built and never change
/// afterwards. `position` is the ordinal of the slot among its siblings and
/// defines inspection order.
///
/// # Examples
///
/// ```
/// use hl7_types::{Cardinality, StructureDefinition};
///
/// let pra = StructureDefinition {
///     name: "PRA".to_string(),
///     kind: "PRA".to_string(),
///     required: false,
///     repeating: true,
///     position: 3,
/// };
///
/// assert!(pra.is_optional());
/// assert_eq!(pra.cardinality(), Cardinality::unbounded());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StructureDefinition {
    /// Name of the slot, unique within the owning group.
    pub name: String,
    /// Kind of structure instantiated for this slot (segment id or group name).
    pub kind: String,
    /// Whether at least one repetition is expected once the message is complete.
    pub required: bool,
    /// Whether more than one repetition may exist.
    pub repeating: bool,
    /// Ordinal position among sibling definitions.
    pub position: usize,
}

impl StructureDefinition {
    /// Returns the cardinality implied by the required/repeating flags.
    pub fn cardinality(&self) -> Cardinality {
        Cardinality::from_flags(self.required, self.repeating)
    }

    /// Returns true if the slot may be left empty.
    pub fn is_optional(&self) -> bool {
        !self.required
    }

    /// Returns true if the slot holds a single repetition at most.
    pub fn is_single(&self) -> bool {
        !self.repeating
    }
}

/// Derives a slot name for `kind` that is unique among `existing` names.
///
/// The kind itself is used when free; otherwise the suffixes 2, 3, ... are
/// tried in order.
///
/// # Examples
///
/// ```
/// use hl7_types::unique_slot_name;
///
/// let taken = ["PID", "PID2"];
/// assert_eq!(unique_slot_name("PID", |n| taken.contains(&n)), "PID3");
/// assert_eq!(unique_slot_name("PV1", |n| taken.contains(&n)), "PV1");
/// ```
pub fn unique_slot_name(kind: &str, existing: impl Fn(&str) -> bool) -> String {
    if !existing(kind) {
        return kind.to_string();
    }
    let mut suffix = 2usize;
    loop {
        let candidate = format!("{kind}{suffix}");
        if !existing(&candidate) {
            return candidate;
        }
        suffix += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_definition(required: bool, repeating: bool) -> StructureDefinition {
        StructureDefinition {
            name: "MSH".to_string(),
            kind: "MSH".to_string(),
            required,
            repeating,
            position: 0,
        }
    }

    #[test]
    fn test_definition_helpers() {
        let msh = make_definition(true, false);
        assert!(!msh.is_optional());
        assert!(msh.is_single());
        assert_eq!(msh.cardinality(), Cardinality::required());

        let nte = make_definition(false, true);
        assert!(nte.is_optional());
        assert!(!nte.is_single());
        assert_eq!(nte.cardinality().to_string(), "0..*");
    }

    #[test]
    fn test_unique_slot_name() {
        let taken: Vec<String> = vec![];
        assert_eq!(unique_slot_name("OBX", |n| taken.iter().any(|t| t == n)), "OBX");

        let taken = ["OBX", "OBX2", "OBX3"];
        assert_eq!(unique_slot_name("OBX", |n| taken.contains(&n)), "OBX4");
    }
}
