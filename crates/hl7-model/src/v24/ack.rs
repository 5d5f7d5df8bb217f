//! ACK general acknowledgment message structure.

use crate::Segment;

crate::hl7_structure! {
    /// Represents an ACK message structure. Contains the following elements:
    ///
    /// 0. MSH (Message Header)
    /// 1. MSA (Message Acknowledgment)
    /// 2. ERR (Error) optional
    pub struct Ack("ACK") {
        "MSH": Segment, required, single { get: msh },
        "MSA": Segment, required, single { get: msa },
        "ERR": Segment, optional, single { get: err },
    }
}

impl Ack {
    /// HL7 version of this message structure.
    pub const VERSION: &'static str = super::VERSION;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::v24;
    use crate::StructureError;

    #[test]
    fn test_optional_single_slot() {
        let mut ack = Ack::new(v24::factory()).unwrap();
        assert_eq!(ack.group().count("ERR").unwrap(), 0);

        ack.err().unwrap().set_field(0, "MSH^1^9");
        assert_eq!(ack.group().count("ERR").unwrap(), 1);
        assert!(matches!(
            ack.group_mut().get_rep("ERR", 1),
            Err(StructureError::RepetitionOutOfRange { repeating: false, .. })
        ));
    }

    #[test]
    fn test_required_slots() {
        let mut ack = Ack::new(v24::factory()).unwrap();
        ack.msh().unwrap();
        assert_eq!(ack.group().missing_required(), vec!["MSA"]);
        ack.msa().unwrap().set_field(0, "AA");
        assert!(ack.group().missing_required().is_empty());
    }
}
