//! Structure factories.
//!
//! A factory maps a structure kind (segment id or group name) to a
//! [`Constructor`]. Groups resolve the constructor of each slot once, when
//! their definition table is built, and call it whenever a new repetition is
//! needed.
//!
//! # Usage
//!
//! ```
//! use hl7_model::{factory, FactoryRegistry, Structure};
//!
//! let mut registry = FactoryRegistry::new();
//! registry.register_segments(["MSH", "EVN"]);
//! let shared = registry.into_shared();
//!
//! let msh = factory::create(&shared, "MSH").unwrap();
//! assert_eq!(msh.name(), "MSH");
//! assert!(factory::create(&shared, "PID").is_err());
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::group::{GroupBuilder, SlotSpec};
use crate::segment::Segment;
use crate::structure::Structure;
use crate::types::{FactoryError, FactoryResult};

/// Shared handle to a structure factory.
pub type SharedFactory = Arc<dyn StructureFactory>;

/// Creates a new, empty structure of one kind.
///
/// The factory passed in is the one the new structure should use for its own
/// children (only relevant for groups).
pub type Constructor =
    Arc<dyn Fn(&SharedFactory) -> FactoryResult<Box<dyn Structure>> + Send + Sync>;

/// Capability to resolve structure kinds to constructors.
///
/// Implementations must fail with an error rather than hand out a
/// constructor for a kind they cannot build.
pub trait StructureFactory: fmt::Debug + Send + Sync {
    /// Resolves the constructor for `kind`.
    fn resolve(&self, kind: &str) -> FactoryResult<Constructor>;
}

/// Creates a new empty instance of `kind` using `factory`.
pub fn create(factory: &SharedFactory, kind: &str) -> FactoryResult<Box<dyn Structure>> {
    let constructor = factory.resolve(kind)?;
    constructor(factory)
}

/// Factory backed by a table of registered constructors.
#[derive(Clone, Default)]
pub struct FactoryRegistry {
    constructors: HashMap<String, Constructor>,
}

impl FactoryRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a constructor for `kind`, replacing any previous one.
    pub fn register(&mut self, kind: impl Into<String>, constructor: Constructor) -> &mut Self {
        let kind = kind.into();
        debug!(kind = %kind, "registering structure constructor");
        self.constructors.insert(kind, constructor);
        self
    }

    /// Registers `id` as a generic [`Segment`].
    pub fn register_segment(&mut self, id: impl Into<String>) -> &mut Self {
        let id = id.into();
        let name = id.clone();
        self.register(
            id,
            Arc::new(move |_: &SharedFactory| -> FactoryResult<Box<dyn Structure>> {
                Ok(Box::new(Segment::new(name.clone())))
            }),
        )
    }

    /// Registers several segment ids at once.
    pub fn register_segments<I, S>(&mut self, ids: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for id in ids {
            self.register_segment(id);
        }
        self
    }

    /// Registers `kind` as a generic group with the given slot table.
    ///
    /// Slot kinds are resolved when an instance is created, so groups may be
    /// registered in any order relative to their children.
    pub fn register_group(&mut self, kind: impl Into<String>, slots: Vec<SlotSpec>) -> &mut Self {
        let kind = kind.into();
        let name = kind.clone();
        let slots = Arc::new(slots);
        self.register(
            kind,
            Arc::new(move |factory: &SharedFactory| -> FactoryResult<Box<dyn Structure>> {
                let group = GroupBuilder::new(name.clone(), Arc::clone(factory))
                    .specs(slots.iter().cloned())
                    .build()?;
                Ok(Box::new(group))
            }),
        )
    }

    /// Returns true if a constructor is registered for `kind`.
    pub fn contains(&self, kind: &str) -> bool {
        self.constructors.contains_key(kind)
    }

    /// Returns all registered kinds, sorted.
    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        kinds
    }

    /// Returns the number of registered kinds.
    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }

    /// Freezes the registry into a shared factory.
    pub fn into_shared(self) -> SharedFactory {
        Arc::new(self)
    }
}

impl StructureFactory for FactoryRegistry {
    fn resolve(&self, kind: &str) -> FactoryResult<Constructor> {
        self.constructors
            .get(kind)
            .cloned()
            .ok_or_else(|| FactoryError::UnknownKind {
                kind: kind.to_string(),
            })
    }
}

impl fmt::Debug for FactoryRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FactoryRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Group;

    #[test]
    fn test_unknown_kind_fails_loudly() {
        let shared = FactoryRegistry::new().into_shared();
        let error = create(&shared, "MSH").unwrap_err();
        assert_eq!(
            error,
            FactoryError::UnknownKind {
                kind: "MSH".to_string()
            }
        );
    }

    #[test]
    fn test_register_group() {
        let mut registry = FactoryRegistry::new();
        registry
            .register_segments(["OBR", "OBX"])
            .register_group(
                "ORDER",
                vec![
                    SlotSpec::new("OBR", true, false),
                    SlotSpec::new("OBX", false, true),
                ],
            );
        assert_eq!(registry.kinds(), vec!["OBR", "OBX", "ORDER"]);

        let shared = registry.into_shared();
        let order = create(&shared, "ORDER").unwrap();
        let group = order.as_any().downcast_ref::<Group>().unwrap();
        assert_eq!(group.name(), "ORDER");
        assert_eq!(group.names(), vec!["OBR", "OBX"]);
        assert!(order.is_empty());
    }

    #[test]
    fn test_group_with_unresolvable_child_fails() {
        let mut registry = FactoryRegistry::new();
        registry.register_group("ORDER", vec![SlotSpec::new("OBR", true, false)]);
        let shared = registry.into_shared();

        assert_eq!(
            create(&shared, "ORDER").unwrap_err(),
            FactoryError::UnknownKind {
                kind: "OBR".to_string()
            }
        );
    }

    #[test]
    fn test_debug_lists_kinds() {
        let mut registry = FactoryRegistry::new();
        registry.register_segment("MSH");
        assert_eq!(format!("{registry:?}"), r#"FactoryRegistry { kinds: ["MSH"] }"#);
        assert_eq!(registry.len(), 1);
        assert!(registry.contains("MSH"));
    }
}
