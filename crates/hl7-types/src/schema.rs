//! Schema tables describing message and group shapes.
//!
//! A `MessageSchema` is the table of `(kind, required, repeating)` rows a
//! message facade is derived from. Entries with children describe nested
//! groups; the entry's `kind` is then the name of the group type.
//!
//! With the `serde` feature enabled, schemas can be read from JSON:
//!
//! ```json
//! {
//!   "name": "PMU_B01",
//!   "version": "2.4",
//!   "entries": [
//!     { "kind": "MSH", "required": true },
//!     { "kind": "PRA", "repeating": true }
//!   ]
//! }
//! ```
//!
//! A kind names one shape throughout a schema: it is either a segment or a
//! group with one set of children, and never the message or one of its own
//! enclosing groups.

use std::collections::HashMap;

/// Error returned by [`MessageSchema::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaValidationError {
    /// The message has an empty name.
    EmptyName,
    /// An entry below `parent` has an empty kind.
    EmptyKind {
        /// Name of the message or group holding the entry.
        parent: String,
    },
    /// A message or group defines no entries at all.
    NoEntries {
        /// Name of the empty message or group.
        name: String,
    },
    /// An entry reuses the name of the message or of an enclosing group.
    RecursiveKind {
        /// The recursive kind.
        kind: String,
    },
    /// A kind is used both as a segment and as a group, or as two groups
    /// with different children.
    ConflictingKind {
        /// The conflicting kind.
        kind: String,
    },
}

impl std::fmt::Display for SchemaValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "message schema has an empty name"),
            Self::EmptyKind { parent } => write!(f, "entry with empty kind in '{}'", parent),
            Self::NoEntries { name } => write!(f, "'{}' defines no entries", name),
            Self::RecursiveKind { kind } => {
                write!(f, "'{}' is nested inside a structure of the same name", kind)
            }
            Self::ConflictingKind { kind } => {
                write!(f, "'{}' is defined with more than one shape", kind)
            }
        }
    }
}

impl std::error::Error for SchemaValidationError {}

/// Schema of a complete message.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MessageSchema {
    /// Message structure name (e.g. `PMU_B01`).
    pub name: String,
    /// HL7 version the schema belongs to (e.g. `2.4`).
    #[cfg_attr(feature = "serde", serde(default))]
    pub version: String,
    /// Ordered child entries.
    pub entries: Vec<SchemaEntry>,
}

/// One row of a schema table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SchemaEntry {
    /// Segment id, or group name when `children` is non-empty.
    pub kind: String,
    /// Whether the slot is required.
    #[cfg_attr(feature = "serde", serde(default))]
    pub required: bool,
    /// Whether the slot may repeat.
    #[cfg_attr(feature = "serde", serde(default))]
    pub repeating: bool,
    /// Entries of the nested group, empty for segments.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Vec::is_empty")
    )]
    pub children: Vec<SchemaEntry>,
}

impl SchemaEntry {
    /// Creates a segment entry.
    pub fn segment(kind: impl Into<String>, required: bool, repeating: bool) -> Self {
        Self {
            kind: kind.into(),
            required,
            repeating,
            children: Vec::new(),
        }
    }

    /// Creates a nested group entry.
    pub fn group(
        kind: impl Into<String>,
        required: bool,
        repeating: bool,
        children: Vec<SchemaEntry>,
    ) -> Self {
        Self {
            kind: kind.into(),
            required,
            repeating,
            children,
        }
    }

    /// Returns true if this entry describes a nested group.
    pub fn is_group(&self) -> bool {
        !self.children.is_empty()
    }
}

impl MessageSchema {
    /// Creates a schema from its name, version and entries.
    pub fn new(name: impl Into<String>, version: impl Into<String>, entries: Vec<SchemaEntry>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            entries,
        }
    }

    /// Checks that the schema is structurally usable.
    ///
    /// # Examples
    ///
    /// ```
    /// use hl7_types::{MessageSchema, SchemaEntry, SchemaValidationError};
    ///
    /// let schema = MessageSchema::new("ACK", "2.4", vec![SchemaEntry::segment("MSH", true, false)]);
    /// assert!(schema.validate().is_ok());
    ///
    /// let empty = MessageSchema::new("ACK", "2.4", vec![]);
    /// assert_eq!(
    ///     empty.validate(),
    ///     Err(SchemaValidationError::NoEntries { name: "ACK".to_string() })
    /// );
    /// ```
    pub fn validate(&self) -> Result<(), SchemaValidationError> {
        if self.name.is_empty() {
            return Err(SchemaValidationError::EmptyName);
        }
        let mut ancestors = vec![self.name.as_str()];
        let mut shapes = HashMap::new();
        validate_entries(&self.name, &self.entries, &mut ancestors, &mut shapes)
    }

    /// Returns every nested group entry, depth first.
    pub fn groups(&self) -> Vec<&SchemaEntry> {
        let mut groups = Vec::new();
        collect_groups(&self.entries, &mut groups);
        groups
    }
}

// Kind -> children of its group shape (empty for segments).
type Shapes<'a> = HashMap<&'a str, &'a [SchemaEntry]>;

fn validate_entries<'a>(
    parent: &str,
    entries: &'a [SchemaEntry],
    ancestors: &mut Vec<&'a str>,
    shapes: &mut Shapes<'a>,
) -> Result<(), SchemaValidationError> {
    if entries.is_empty() {
        return Err(SchemaValidationError::NoEntries {
            name: parent.to_string(),
        });
    }
    for entry in entries {
        let kind = entry.kind.as_str();
        if kind.is_empty() {
            return Err(SchemaValidationError::EmptyKind {
                parent: parent.to_string(),
            });
        }
        if ancestors.contains(&kind) {
            return Err(SchemaValidationError::RecursiveKind {
                kind: kind.to_string(),
            });
        }
        match shapes.get(kind) {
            Some(children) if *children != entry.children.as_slice() => {
                return Err(SchemaValidationError::ConflictingKind {
                    kind: kind.to_string(),
                });
            }
            Some(_) => {}
            None => {
                shapes.insert(kind, entry.children.as_slice());
            }
        }
        if entry.is_group() {
            ancestors.push(kind);
            validate_entries(kind, &entry.children, ancestors, shapes)?;
            ancestors.pop();
        }
    }
    Ok(())
}

fn collect_groups<'a>(entries: &'a [SchemaEntry], out: &mut Vec<&'a SchemaEntry>) {
    for entry in entries.iter().filter(|e| e.is_group()) {
        out.push(entry);
        collect_groups(&entry.children, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_schema() -> MessageSchema {
        MessageSchema::new(
            "ORU_R01",
            "2.4",
            vec![
                SchemaEntry::segment("MSH", true, false),
                SchemaEntry::group(
                    "ORU_R01_PATIENT_RESULT",
                    true,
                    true,
                    vec![
                        SchemaEntry::segment("PID", false, false),
                        SchemaEntry::group(
                            "ORU_R01_ORDER_OBSERVATION",
                            true,
                            true,
                            vec![
                                SchemaEntry::segment("OBR", true, false),
                                SchemaEntry::segment("OBX", false, true),
                            ],
                        ),
                    ],
                ),
            ],
        )
    }

    #[test]
    fn test_valid_schema() {
        assert_eq!(make_schema().validate(), Ok(()));
    }

    #[test]
    fn test_empty_name() {
        let mut schema = make_schema();
        schema.name.clear();
        assert_eq!(schema.validate(), Err(SchemaValidationError::EmptyName));
    }

    #[test]
    fn test_empty_kind_in_nested_group() {
        let mut schema = make_schema();
        schema.entries[1].children[0].kind.clear();
        assert_eq!(
            schema.validate(),
            Err(SchemaValidationError::EmptyKind {
                parent: "ORU_R01_PATIENT_RESULT".to_string()
            })
        );
    }

    #[test]
    fn test_message_name_reused_below() {
        let schema = MessageSchema::new(
            "ZZX",
            "2.4",
            vec![SchemaEntry::group(
                "ZZG",
                true,
                false,
                vec![SchemaEntry::segment("ZZX", true, false)],
            )],
        );
        assert_eq!(
            schema.validate(),
            Err(SchemaValidationError::RecursiveKind {
                kind: "ZZX".to_string()
            })
        );
    }

    #[test]
    fn test_group_nested_in_itself() {
        let mut schema = make_schema();
        schema.entries[1].children[1].children.push(SchemaEntry::group(
            "ORU_R01_PATIENT_RESULT",
            false,
            false,
            vec![SchemaEntry::segment("PID", false, false)],
        ));
        assert_eq!(
            schema.validate(),
            Err(SchemaValidationError::RecursiveKind {
                kind: "ORU_R01_PATIENT_RESULT".to_string()
            })
        );
    }

    #[test]
    fn test_kind_used_as_segment_and_group() {
        let mut schema = make_schema();
        schema.entries.push(SchemaEntry::segment("ORU_R01_ORDER_OBSERVATION", false, false));
        assert_eq!(
            schema.validate(),
            Err(SchemaValidationError::ConflictingKind {
                kind: "ORU_R01_ORDER_OBSERVATION".to_string()
            })
        );
    }

    #[test]
    fn test_repeated_kinds_with_one_shape() {
        let mut schema = make_schema();
        schema.entries.push(SchemaEntry::segment("OBX", false, true));
        schema.entries.push(SchemaEntry::group(
            "ORU_R01_ORDER_OBSERVATION",
            false,
            true,
            vec![
                SchemaEntry::segment("OBR", true, false),
                SchemaEntry::segment("OBX", false, true),
            ],
        ));
        assert_eq!(schema.validate(), Ok(()));

        schema.entries.push(SchemaEntry::group(
            "ORU_R01_ORDER_OBSERVATION",
            false,
            true,
            vec![SchemaEntry::segment("OBR", true, false)],
        ));
        assert!(matches!(
            schema.validate(),
            Err(SchemaValidationError::ConflictingKind { .. })
        ));
    }

    #[test]
    fn test_groups_depth_first() {
        let schema = make_schema();
        let kinds: Vec<&str> = schema.groups().iter().map(|g| g.kind.as_str()).collect();
        assert_eq!(kinds, vec!["ORU_R01_PATIENT_RESULT", "ORU_R01_ORDER_OBSERVATION"]);
    }

    #[test]
    fn test_is_group() {
        assert!(!SchemaEntry::segment("MSH", true, false).is_group());
        assert!(make_schema().entries[1].is_group());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_defaults() {
        let json = r#"{
            "name": "PMU_B01",
            "entries": [
                { "kind": "MSH", "required": true },
                { "kind": "PRA", "repeating": true }
            ]
        }"#;

        let schema: MessageSchema = serde_json::from_str(json).unwrap();
        assert_eq!(schema.version, "");
        assert_eq!(schema.entries[0], SchemaEntry::segment("MSH", true, false));
        assert_eq!(schema.entries[1], SchemaEntry::segment("PRA", false, true));
    }
}
