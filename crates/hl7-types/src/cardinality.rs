//! Cardinality of a structure slot.
//!
//! HL7 v2 message definitions only distinguish required/optional and
//! single/repeating slots, which gives four possible cardinalities:
//!
//! | required | repeating | cardinality |
//! |----------|-----------|-------------|
//! | yes      | no        | `1..1`      |
//! | no       | no        | `0..1`      |
//! | yes      | yes       | `1..*`      |
//! | no       | yes       | `0..*`      |

/// Cardinality constraint for a structure slot.
///
/// # Examples
///
/// ```
/// use hl7_types::Cardinality;
///
/// let card = Cardinality::from_flags(false, true);
/// assert_eq!(card, Cardinality::unbounded());
/// assert!(card.allows(0));
/// assert!(card.allows(100));
///
/// let card = Cardinality::from_flags(true, false);
/// assert!(!card.allows(0));
/// assert!(card.allows(1));
/// assert!(!card.allows(2));
/// assert_eq!(card.to_string(), "1..1");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cardinality {
    /// Minimum occurrences (inclusive).
    pub min: u32,
    /// Maximum occurrences (inclusive). None means unbounded (*).
    pub max: Option<u32>,
}

impl Cardinality {
    /// Creates a new cardinality with explicit min and max.
    pub const fn new(min: u32, max: Option<u32>) -> Self {
        Self { min, max }
    }

    /// Creates an unbounded cardinality (0..*).
    pub const fn unbounded() -> Self {
        Self { min: 0, max: None }
    }

    /// Creates an optional cardinality (0..1).
    pub const fn optional() -> Self {
        Self { min: 0, max: Some(1) }
    }

    /// Creates a required single cardinality (1..1).
    pub const fn required() -> Self {
        Self { min: 1, max: Some(1) }
    }

    /// Creates a required unbounded cardinality (1..*).
    pub const fn one_or_more() -> Self {
        Self { min: 1, max: None }
    }

    /// Derives the cardinality of a slot from its required/repeating flags.
    pub const fn from_flags(required: bool, repeating: bool) -> Self {
        match (required, repeating) {
            (true, false) => Self::required(),
            (false, false) => Self::optional(),
            (true, true) => Self::one_or_more(),
            (false, true) => Self::unbounded(),
        }
    }

    /// Returns true if the given count satisfies this cardinality constraint.
    pub fn allows(&self, count: usize) -> bool {
        let count = u32::try_from(count).unwrap_or(u32::MAX);
        count >= self.min && self.max.map_or(true, |max| count <= max)
    }

    /// Returns true if this cardinality is unbounded (max = *).
    pub fn is_unbounded(&self) -> bool {
        self.max.is_none()
    }

    /// Returns true if this cardinality requires at least one occurrence.
    pub fn is_required(&self) -> bool {
        self.min >= 1
    }
}

impl std::fmt::Display for Cardinality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.max {
            Some(max) => write!(f, "{}..{}", self.min, max),
            None => write!(f, "{}..*", self.min),
        }
    }
}
