//! Well-known HL7 v2.4 segment identifiers.
//!
//! This module provides constants for the segment ids used by the bundled
//! message structures, together with their descriptive names.
//!
//! # Examples
//!
//! ```
//! use hl7_types::well_known;
//!
//! assert_eq!(well_known::MSH, "MSH");
//! assert_eq!(well_known::segment_description("PRA"), Some("Practitioner Detail"));
//! assert_eq!(well_known::segment_description("ZZZ"), None);
//! ```

// =============================================================================
// Versions
// =============================================================================

/// HL7 version 2.4.
pub const VERSION_2_4: &str = "2.4";

// =============================================================================
// Control Segments
// =============================================================================

/// Message Header.
pub const MSH: &str = "MSH";

/// Event Type.
pub const EVN: &str = "EVN";

/// Message Acknowledgment.
pub const MSA: &str = "MSA";

/// Error.
pub const ERR: &str = "ERR";

/// Notes and Comments.
pub const NTE: &str = "NTE";

// =============================================================================
// Personnel Management Segments
// =============================================================================

/// Staff Identification.
pub const STF: &str = "STF";

/// Practitioner Detail.
pub const PRA: &str = "PRA";

/// Practitioner Organization Unit.
pub const ORG: &str = "ORG";

/// Professional Affiliation.
pub const AFF: &str = "AFF";

/// Language Detail.
pub const LAN: &str = "LAN";

/// Educational Detail.
pub const EDU: &str = "EDU";

// =============================================================================
// Patient and Observation Segments
// =============================================================================

/// Patient Identification.
pub const PID: &str = "PID";

/// Patient Visit.
pub const PV1: &str = "PV1";

/// Observation Request.
pub const OBR: &str = "OBR";

/// Observation/Result.
pub const OBX: &str = "OBX";

/// All segment ids above with their descriptive names.
pub const SEGMENTS: &[(&str, &str)] = &[
    (MSH, "Message Header"),
    (EVN, "Event Type"),
    (MSA, "Message Acknowledgment"),
    (ERR, "Error"),
    (NTE, "Notes and Comments"),
    (STF, "Staff Identification"),
    (PRA, "Practitioner Detail"),
    (ORG, "Practitioner Organization Unit"),
    (AFF, "Professional Affiliation"),
    (LAN, "Language Detail"),
    (EDU, "Educational Detail"),
    (PID, "Patient Identification"),
    (PV1, "Patient Visit"),
    (OBR, "Observation Request"),
    (OBX, "Observation/Result"),
];

/// Returns the descriptive name of a well-known segment id.
pub fn segment_description(id: &str) -> Option<&'static str> {
    SEGMENTS
        .iter()
        .find(|(segment, _)| *segment == id)
        .map(|(_, description)| *description)
}

/// Returns true if `id` has the shape of a segment id: three upper-case
/// letters or digits, starting with a letter.
pub fn is_segment_id(id: &str) -> bool {
    let bytes = id.as_bytes();
    bytes.len() == 3
        && bytes[0].is_ascii_uppercase()
        && bytes[1..]
            .iter()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
}
