//! Generic segment structure.
//!
//! Segments are the leaves of a message tree. Field content is kept as opaque
//! text; parsing and validating it belongs to the segment codecs, not to the
//! structure model.

use std::any::Any;

use crate::structure::Structure;

/// A segment holding an ordered list of opaque field values.
///
/// Field positions are 0-based and count the fields after the segment id.
///
/// # Examples
///
/// ```
/// use hl7_model::{Segment, Structure};
///
/// let mut pra = Segment::new("PRA");
/// assert!(pra.is_empty());
///
/// pra.set_field(2, "MD");
/// assert_eq!(pra.field(2), Some("MD"));
/// assert_eq!(pra.field(0), Some(""));
/// assert_eq!(pra.field_count(), 3);
/// assert!(!pra.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Segment {
    name: String,
    fields: Vec<String>,
}

impl Segment {
    /// Creates an empty segment with the given id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Returns the field at `index`, if it exists.
    pub fn field(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(String::as_str)
    }

    /// Sets the field at `index`, padding with empty fields as needed.
    pub fn set_field(&mut self, index: usize, value: impl Into<String>) {
        if index >= self.fields.len() {
            self.fields.resize(index + 1, String::new());
        }
        self.fields[index] = value.into();
    }

    /// Returns all fields in order.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Returns the number of fields held, including empty ones.
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Removes all field values.
    pub fn clear(&mut self) {
        self.fields.clear();
    }
}

impl Structure for Segment {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_empty(&self) -> bool {
        self.fields.iter().all(String::is_empty)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
