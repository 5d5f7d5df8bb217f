//! HL7 v2.4 message structures.
//!
//! # Usage
//!
//! ```
//! use hl7_model::v24::{self, PmuB01};
//!
//! let mut message = PmuB01::new(v24::factory())?;
//! message.stf()?.set_field(0, "STAFF-1");
//! message.add_pra()?;
//! message.add_pra()?;
//! assert_eq!(message.pra_reps_used()?, 2);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod ack;
mod pmu_b01;

pub use ack::Ack;
pub use pmu_b01::PmuB01;

use hl7_types::well_known;

use crate::factory::{FactoryRegistry, SharedFactory};

/// HL7 version of the structures in this module.
pub const VERSION: &str = well_known::VERSION_2_4;

/// Returns a registry with every v2.4 segment and message structure.
pub fn registry() -> FactoryRegistry {
    let mut registry = FactoryRegistry::new();
    registry
        .register_segments(well_known::SEGMENTS.iter().map(|(id, _)| *id))
        .register(PmuB01::NAME, PmuB01::constructor())
        .register(Ack::NAME, Ack::constructor());
    registry
}

/// Returns a shared factory over [`registry`].
pub fn factory() -> SharedFactory {
    registry().into_shared()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Structure;

    #[test]
    fn test_registry_contents() {
        let registry = registry();
        assert!(registry.contains("MSH"));
        assert!(registry.contains("PMU_B01"));
        assert!(registry.contains("ACK"));
        assert_eq!(registry.len(), well_known::SEGMENTS.len() + 2);
    }

    #[test]
    fn test_create_message_by_name() {
        let shared = factory();
        let message = crate::factory::create(&shared, "PMU_B01").unwrap();
        assert_eq!(message.name(), "PMU_B01");
        assert!(message.as_any().is::<PmuB01>());
        assert_eq!(message.as_group().unwrap().names().len(), 8);
    }
}
