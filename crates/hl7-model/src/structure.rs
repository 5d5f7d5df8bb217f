//! The `Structure` trait and repetition handles.
//!
//! Every node of a message tree (segments, groups, generated facades)
//! implements [`Structure`]. Containers store children as boxed trait objects
//! wrapped in a [`Repetition`], which adds the identity used by
//! remove-by-reference.

use std::any::Any;
use std::fmt;
use std::ops::Deref;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::group::Group;

/// A node in a message tree.
pub trait Structure: Any + fmt::Debug + Send + Sync {
    /// Returns the structure name (segment id or group name).
    fn name(&self) -> &str;

    /// Returns true if the structure holds no data.
    fn is_empty(&self) -> bool;

    /// Returns `self` as `Any` for typed downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Returns `self` as mutable `Any` for typed downcasting.
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Returns the group view of this structure, if it is a group.
    fn as_group(&self) -> Option<&Group> {
        None
    }

    /// Returns the mutable group view of this structure, if it is a group.
    fn as_group_mut(&mut self) -> Option<&mut Group> {
        None
    }
}

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a repetition.
///
/// Assigned when a repetition is stored and never reused, so it identifies
/// one live instance for [`Group::remove`](crate::Group::remove).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StructureId(u64);

impl StructureId {
    fn next() -> Self {
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for StructureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One live repetition of a slot.
///
/// Dereferences to the contained [`Structure`]. Only shared references to a
/// repetition leave its group, so an instance and its identity stay in the
/// slot that created them.
#[derive(Debug)]
pub struct Repetition {
    id: StructureId,
    structure: Box<dyn Structure>,
}

impl Repetition {
    pub(crate) fn new(structure: Box<dyn Structure>) -> Self {
        Self {
            id: StructureId::next(),
            structure,
        }
    }

    /// Returns the identity of this repetition.
    pub fn id(&self) -> StructureId {
        self.id
    }

    pub(crate) fn structure_mut(&mut self) -> &mut dyn Structure {
        self.structure.as_mut()
    }

    /// Returns true if the contained structure is a `T`.
    pub fn is<T: Structure>(&self) -> bool {
        self.structure.as_any().is::<T>()
    }

    /// Returns the contained structure as a `T`, if it is one.
    pub fn downcast_ref<T: Structure>(&self) -> Option<&T> {
        self.structure.as_any().downcast_ref::<T>()
    }

    pub(crate) fn downcast_mut<T: Structure>(&mut self) -> Option<&mut T> {
        self.structure.as_any_mut().downcast_mut::<T>()
    }
}

impl Deref for Repetition {
    type Target = dyn Structure;

    fn deref(&self) -> &Self::Target {
        self.structure.as_ref()
    }
}
