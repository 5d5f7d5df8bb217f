//! Serializable outline of a message tree.

use hl7_model::hl7_types::well_known;
use hl7_model::{Group, Repetition, Segment};
use serde::Serialize;

/// Outline of one group and everything below it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outline {
    /// Group name.
    pub name: String,
    /// Slots in definition order.
    pub slots: Vec<SlotOutline>,
}

/// Outline of one slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotOutline {
    /// Slot name.
    pub name: String,
    /// Structure kind.
    pub kind: String,
    /// Descriptive name, for well-known segments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'static str>,
    /// Cardinality as `min..max`.
    pub cardinality: String,
    /// Live repetitions.
    pub repetitions: Vec<Node>,
}

/// One repetition in the outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    /// A segment with its raw fields.
    Segment {
        /// Field values.
        fields: Vec<String>,
    },
    /// A nested group.
    Group(Outline),
    /// Any other structure.
    Other {
        /// Structure name.
        name: String,
    },
}

/// Builds the outline of `group`.
pub fn outline(group: &Group) -> Outline {
    Outline {
        name: group.name().to_string(),
        slots: group
            .slots()
            .map(|(definition, repetitions)| SlotOutline {
                name: definition.name.clone(),
                kind: definition.kind.clone(),
                description: well_known::segment_description(&definition.kind),
                cardinality: definition.cardinality().to_string(),
                repetitions: repetitions.iter().map(node).collect(),
            })
            .collect(),
    }
}

fn node(repetition: &Repetition) -> Node {
    if let Some(segment) = repetition.downcast_ref::<Segment>() {
        Node::Segment {
            fields: segment.fields().to_vec(),
        }
    } else if let Some(group) = repetition.as_group() {
        Node::Group(outline(group))
    } else {
        Node::Other {
            name: repetition.name().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hl7_model::v24::{self, PmuB01};

    #[test]
    fn test_outline_of_empty_message() {
        let message = PmuB01::new(v24::factory()).unwrap();
        let outline = outline(message.group());

        assert_eq!(outline.name, "PMU_B01");
        assert_eq!(outline.slots.len(), 8);
        assert_eq!(outline.slots[0].cardinality, "1..1");
        assert_eq!(outline.slots[3].cardinality, "0..*");
        assert!(outline.slots.iter().all(|s| s.repetitions.is_empty()));
    }

    #[test]
    fn test_outline_json() {
        let mut message = PmuB01::new(v24::factory()).unwrap();
        message.msh().unwrap().set_field(0, "|");
        message.add_pra().unwrap();

        let json = serde_json::to_value(outline(message.group())).unwrap();
        assert_eq!(json["slots"][0]["name"], "MSH");
        assert_eq!(json["slots"][0]["description"], "Message Header");
        assert_eq!(json["slots"][0]["repetitions"][0]["type"], "segment");
        assert_eq!(json["slots"][0]["repetitions"][0]["fields"][0], "|");
        assert_eq!(json["slots"][3]["repetitions"].as_array().unwrap().len(), 1);
    }
}
