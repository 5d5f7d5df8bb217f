//! The structure container.
//!
//! A [`Group`] owns an ordered, fixed set of named slots. Each slot holds
//! zero or more repetitions of one kind of child structure, created through
//! the group's [`StructureFactory`](crate::StructureFactory).
//!
//! Reads create on demand: [`Group::get`] and [`Group::get_rep`] at the
//! one-past-the-end index append a new repetition, so a message can be filled
//! in by navigating into sections that do not exist yet. [`Group::add`]
//! always appends but respects the single-repetition cap of non-repeating
//! slots. Enumeration never creates anything.
//!
//! Failed operations never leave a partial change behind.
//!
//! # Example
//!
//! ```
//! use hl7_model::{FactoryRegistry, GroupBuilder};
//!
//! let mut registry = FactoryRegistry::new();
//! registry.register_segments(["MSH", "PRA"]);
//!
//! let mut group = GroupBuilder::new("PMU_B01", registry.into_shared())
//!     .slot("MSH", true, false)
//!     .slot("PRA", false, true)
//!     .build()?;
//!
//! group.get("MSH")?;
//! let first = group.id_at("MSH", 0)?;
//! group.get("MSH")?;
//! assert_eq!(group.id_at("MSH", 0)?, first);
//!
//! group.add("PRA")?;
//! group.add("PRA")?;
//! assert_eq!(group.count("PRA")?, 2);
//! assert!(group.add("MSH").is_err());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::any::{type_name, Any};
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::slice;

use hl7_types::{unique_slot_name, StructureDefinition};
use tracing::{debug, trace};

use crate::factory::{Constructor, SharedFactory};
use crate::structure::{Repetition, Structure, StructureId};
use crate::types::{FactoryResult, StructureError, StructureResult};

/// One row of a group's slot table, before names and positions are assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotSpec {
    /// Kind of structure held by the slot.
    pub kind: Cow<'static, str>,
    /// Whether the slot is required.
    pub required: bool,
    /// Whether the slot may repeat.
    pub repeating: bool,
}

impl SlotSpec {
    /// Creates a slot spec for a statically known kind.
    pub const fn new(kind: &'static str, required: bool, repeating: bool) -> Self {
        Self {
            kind: Cow::Borrowed(kind),
            required,
            repeating,
        }
    }

    /// Creates a slot spec for a kind only known at runtime.
    pub fn owned(kind: impl Into<String>, required: bool, repeating: bool) -> Self {
        Self {
            kind: Cow::Owned(kind.into()),
            required,
            repeating,
        }
    }
}

/// Builds a [`Group`] from its slot table.
///
/// Constructors for every slot kind are resolved in [`build`](Self::build);
/// an unresolvable kind fails the build instead of a later access.
#[derive(Debug)]
pub struct GroupBuilder {
    name: String,
    factory: SharedFactory,
    specs: Vec<SlotSpec>,
}

impl GroupBuilder {
    /// Starts a group named `name` whose children come from `factory`.
    pub fn new(name: impl Into<String>, factory: SharedFactory) -> Self {
        Self {
            name: name.into(),
            factory,
            specs: Vec::new(),
        }
    }

    /// Appends a slot.
    pub fn slot(mut self, kind: impl Into<String>, required: bool, repeating: bool) -> Self {
        self.specs.push(SlotSpec::owned(kind, required, repeating));
        self
    }

    /// Appends several slots in order.
    pub fn specs(mut self, specs: impl IntoIterator<Item = SlotSpec>) -> Self {
        self.specs.extend(specs);
        self
    }

    /// Resolves every slot and returns the group.
    ///
    /// A slot whose kind is already used as a sibling name is named with the
    /// next free numeric suffix (`PID`, `PID2`, ...).
    pub fn build(self) -> FactoryResult<Group> {
        let mut slots: Vec<Slot> = Vec::with_capacity(self.specs.len());
        let mut positions: HashMap<String, usize> = HashMap::with_capacity(self.specs.len());

        for (position, spec) in self.specs.into_iter().enumerate() {
            let constructor = self.factory.resolve(&spec.kind)?;
            let name = unique_slot_name(&spec.kind, |n| positions.contains_key(n));
            if name != spec.kind {
                debug!(group = %self.name, kind = %spec.kind, name = %name, "renamed duplicate slot");
            }
            positions.insert(name.clone(), position);
            slots.push(Slot {
                definition: StructureDefinition {
                    name,
                    kind: spec.kind.into_owned(),
                    required: spec.required,
                    repeating: spec.repeating,
                    position,
                },
                constructor,
                repetitions: Vec::new(),
            });
        }

        debug!(group = %self.name, slots = slots.len(), "built group definition table");
        Ok(Group {
            name: self.name,
            factory: self.factory,
            slots,
            positions,
        })
    }
}

struct Slot {
    definition: StructureDefinition,
    constructor: Constructor,
    repetitions: Vec<Repetition>,
}

impl Slot {
    fn instantiate(&self, factory: &SharedFactory) -> FactoryResult<Repetition> {
        (self.constructor)(factory).map(Repetition::new)
    }
}

impl fmt::Debug for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slot")
            .field("definition", &self.definition)
            .field("repetitions", &self.repetitions)
            .finish()
    }
}

/// Type check applied to a new repetition before it is stored.
#[derive(Clone, Copy)]
struct Expect {
    accepts: fn(&dyn Any) -> bool,
    type_name: &'static str,
}

impl Expect {
    const ANY: Self = Self {
        accepts: accept_any,
        type_name: "structure",
    };

    fn of<T: Structure>() -> Self {
        Self {
            accepts: accept_type::<T>,
            type_name: type_name::<T>(),
        }
    }

    fn check(self, group: &str, name: &str, repetition: &Repetition) -> StructureResult<()> {
        if (self.accepts)(repetition.as_any()) {
            Ok(())
        } else {
            Err(StructureError::TypeMismatch {
                group: group.to_string(),
                name: name.to_string(),
                expected: self.type_name,
            })
        }
    }
}

fn accept_any(_: &dyn Any) -> bool {
    true
}

fn accept_type<T: Any>(any: &dyn Any) -> bool {
    any.is::<T>()
}

/// Container of named, ordered, cardinality-constrained child structures.
///
/// See the [module documentation](self) for the access rules.
#[derive(Debug)]
pub struct Group {
    name: String,
    factory: SharedFactory,
    slots: Vec<Slot>,
    positions: HashMap<String, usize>,
}

impl Group {
    /// Returns the group name.
    pub fn name(&self) -> &str {
        &self.name
    }

    // Definition queries

    /// Returns slot names in definition order.
    pub fn names(&self) -> Vec<&str> {
        self.slots
            .iter()
            .map(|slot| slot.definition.name.as_str())
            .collect()
    }

    /// Returns all definitions in order.
    pub fn definitions(&self) -> impl Iterator<Item = &StructureDefinition> + '_ {
        self.slots.iter().map(|slot| &slot.definition)
    }

    /// Returns the definition of slot `name`.
    pub fn definition(&self, name: &str) -> StructureResult<&StructureDefinition> {
        self.slot(name).map(|slot| &slot.definition)
    }

    /// Returns true if slot `name` is required.
    pub fn is_required(&self, name: &str) -> StructureResult<bool> {
        self.definition(name).map(|d| d.required)
    }

    /// Returns true if slot `name` may repeat.
    pub fn is_repeating(&self, name: &str) -> StructureResult<bool> {
        self.definition(name).map(|d| d.repeating)
    }

    /// Returns the kind of structure slot `name` holds.
    pub fn kind(&self, name: &str) -> StructureResult<&str> {
        self.definition(name).map(|d| d.kind.as_str())
    }

    // Access

    /// Returns the first repetition of `name`, creating it if necessary.
    pub fn get(&mut self, name: &str) -> StructureResult<&mut dyn Structure> {
        self.get_rep(name, 0)
    }

    /// Returns repetition `index` of `name`.
    ///
    /// `index == count` creates and appends a new repetition. Larger indices,
    /// and any index above 0 on a non-repeating slot, fail with
    /// [`StructureError::RepetitionOutOfRange`].
    pub fn get_rep(&mut self, name: &str, index: usize) -> StructureResult<&mut dyn Structure> {
        let position = self.ensure(name, index, Expect::ANY)?;
        Ok(self.slots[position].repetitions[index].structure_mut())
    }

    /// Typed [`get`](Self::get).
    pub fn get_as<T: Structure>(&mut self, name: &str) -> StructureResult<&mut T> {
        self.get_rep_as(name, 0)
    }

    /// Typed [`get_rep`](Self::get_rep).
    ///
    /// A newly created repetition is only stored if it is a `T`.
    pub fn get_rep_as<T: Structure>(&mut self, name: &str, index: usize) -> StructureResult<&mut T> {
        let position = self.ensure(name, index, Expect::of::<T>())?;
        let group = &self.name;
        self.slots[position].repetitions[index]
            .downcast_mut::<T>()
            .ok_or_else(|| StructureError::type_mismatch::<T>(group, name))
    }

    /// Returns the number of live repetitions of `name`.
    pub fn count(&self, name: &str) -> StructureResult<usize> {
        self.slot(name).map(|slot| slot.repetitions.len())
    }

    /// Returns the identity of repetition `index` of `name`.
    ///
    /// Never creates a repetition.
    pub fn id_at(&self, name: &str, index: usize) -> StructureResult<StructureId> {
        let slot = self.slot(name)?;
        slot.repetitions
            .get(index)
            .map(Repetition::id)
            .ok_or_else(|| StructureError::RepetitionOutOfRange {
                group: self.name.clone(),
                name: name.to_string(),
                index,
                count: slot.repetitions.len(),
                repeating: slot.definition.repeating,
            })
    }

    /// Returns the live repetitions of `name` in insertion order.
    pub fn repetitions(&self, name: &str) -> StructureResult<&[Repetition]> {
        self.slot(name).map(|slot| slot.repetitions.as_slice())
    }

    /// Iterates over the repetitions of `name` without creating any.
    ///
    /// Each call starts a fresh iteration.
    pub fn iter(&self, name: &str) -> StructureResult<Repetitions<'_>> {
        self.slot(name).map(|slot| Repetitions {
            inner: slot.repetitions.iter(),
        })
    }

    /// Iterates over the repetitions of `name` as `T`.
    ///
    /// Fails with [`StructureError::TypeMismatch`] if any repetition is not a
    /// `T`, so the iteration always yields [`count`](Self::count) items.
    pub fn iter_as<T: Structure>(&self, name: &str) -> StructureResult<impl Iterator<Item = &T> + '_> {
        let slot = self.slot(name)?;
        if !slot.repetitions.iter().all(|rep| rep.is::<T>()) {
            return Err(StructureError::type_mismatch::<T>(&self.name, name));
        }
        Ok(slot.repetitions.iter().filter_map(Repetition::downcast_ref::<T>))
    }

    // Mutation

    /// Creates and appends a new repetition of `name`.
    ///
    /// Fails with [`StructureError::CardinalityViolation`] if `name` is not
    /// repeating and already holds a repetition.
    pub fn add(&mut self, name: &str) -> StructureResult<&mut dyn Structure> {
        let (position, index) = self.insert_new(name, None, Expect::ANY)?;
        Ok(self.slots[position].repetitions[index].structure_mut())
    }

    /// Typed [`add`](Self::add).
    pub fn add_as<T: Structure>(&mut self, name: &str) -> StructureResult<&mut T> {
        let (position, index) = self.insert_new(name, None, Expect::of::<T>())?;
        let group = &self.name;
        self.slots[position].repetitions[index]
            .downcast_mut::<T>()
            .ok_or_else(|| StructureError::type_mismatch::<T>(group, name))
    }

    /// Creates a new repetition of `name` and inserts it at `index`,
    /// shifting later repetitions up by one.
    ///
    /// `index` may be at most the current count. Cardinality rules are those
    /// of [`add`](Self::add).
    pub fn insert_rep(&mut self, name: &str, index: usize) -> StructureResult<&mut dyn Structure> {
        let (position, index) = self.insert_new(name, Some(index), Expect::ANY)?;
        Ok(self.slots[position].repetitions[index].structure_mut())
    }

    /// Removes the repetition with identity `id` from `name`.
    pub fn remove(&mut self, name: &str, id: StructureId) -> StructureResult<()> {
        let position = self.position(name)?;
        let slot = &mut self.slots[position];
        let index = slot
            .repetitions
            .iter()
            .position(|rep| rep.id() == id)
            .ok_or_else(|| StructureError::NotFound {
                group: self.name.clone(),
                name: name.to_string(),
                id,
            })?;
        slot.repetitions.remove(index);
        trace!(group = %self.name, structure = name, index, %id, "removed repetition");
        Ok(())
    }

    /// Removes repetition `index` of `name`, shifting later ones down by one.
    pub fn remove_rep(&mut self, name: &str, index: usize) -> StructureResult<()> {
        let position = self.position(name)?;
        let slot = &mut self.slots[position];
        let count = slot.repetitions.len();
        if index >= count {
            return Err(StructureError::RepetitionOutOfRange {
                group: self.name.clone(),
                name: name.to_string(),
                index,
                count,
                repeating: slot.definition.repeating,
            });
        }
        let removed = slot.repetitions.remove(index);
        trace!(group = %self.name, structure = name, index, id = %removed.id(), "removed repetition");
        Ok(())
    }

    // Whole-group queries

    /// Iterates over every slot with its live repetitions, in definition order.
    pub fn slots(&self) -> impl Iterator<Item = (&StructureDefinition, &[Repetition])> + '_ {
        self.slots
            .iter()
            .map(|slot| (&slot.definition, slot.repetitions.as_slice()))
    }

    /// Returns the names of required slots that hold no repetition.
    ///
    /// Required slots are never enforced by the container itself; producers
    /// call this before handing a message on.
    pub fn missing_required(&self) -> Vec<&str> {
        self.slots
            .iter()
            .filter(|slot| slot.definition.required && slot.repetitions.is_empty())
            .map(|slot| slot.definition.name.as_str())
            .collect()
    }

    /// Returns the total number of live repetitions across all slots.
    pub fn repetition_count(&self) -> usize {
        self.slots.iter().map(|slot| slot.repetitions.len()).sum()
    }

    fn position(&self, name: &str) -> StructureResult<usize> {
        self.positions
            .get(name)
            .copied()
            .ok_or_else(|| StructureError::unknown(&self.name, name))
    }

    fn slot(&self, name: &str) -> StructureResult<&Slot> {
        self.position(name).map(|position| &self.slots[position])
    }

    /// Makes sure repetition `index` of `name` exists and returns the slot
    /// position.
    fn ensure(&mut self, name: &str, index: usize, expect: Expect) -> StructureResult<usize> {
        let position = self.position(name)?;
        let slot = &mut self.slots[position];
        let count = slot.repetitions.len();
        let repeating = slot.definition.repeating;

        if index > count || (index > 0 && !repeating) {
            return Err(StructureError::RepetitionOutOfRange {
                group: self.name.clone(),
                name: name.to_string(),
                index,
                count,
                repeating,
            });
        }

        if index == count {
            let repetition = slot.instantiate(&self.factory)?;
            expect.check(&self.name, name, &repetition)?;
            trace!(group = %self.name, structure = name, index, id = %repetition.id(), "created repetition");
            slot.repetitions.push(repetition);
        }

        Ok(position)
    }

    /// Creates a repetition of `name` and inserts it at `index` (or appends).
    /// Returns the slot position and the index of the new repetition.
    fn insert_new(
        &mut self,
        name: &str,
        index: Option<usize>,
        expect: Expect,
    ) -> StructureResult<(usize, usize)> {
        let position = self.position(name)?;
        let slot = &mut self.slots[position];
        let count = slot.repetitions.len();
        let repeating = slot.definition.repeating;
        let index = index.unwrap_or(count);

        if index > count {
            return Err(StructureError::RepetitionOutOfRange {
                group: self.name.clone(),
                name: name.to_string(),
                index,
                count,
                repeating,
            });
        }
        if !repeating && count > 0 {
            return Err(StructureError::CardinalityViolation {
                group: self.name.clone(),
                name: name.to_string(),
            });
        }

        let repetition = slot.instantiate(&self.factory)?;
        expect.check(&self.name, name, &repetition)?;
        trace!(group = %self.name, structure = name, index, id = %repetition.id(), "inserted repetition");
        slot.repetitions.insert(index, repetition);
        Ok((position, index))
    }
}

impl Structure for Group {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_empty(&self) -> bool {
        self.slots
            .iter()
            .flat_map(|slot| slot.repetitions.iter())
            .all(|rep| rep.is_empty())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn as_group(&self) -> Option<&Group> {
        Some(self)
    }

    fn as_group_mut(&mut self) -> Option<&mut Group> {
        Some(self)
    }
}

/// Iterator over the repetitions of one slot.
///
/// Returned by [`Group::iter`].
#[derive(Debug, Clone)]
pub struct Repetitions<'a> {
    inner: slice::Iter<'a, Repetition>,
}

impl<'a> Iterator for Repetitions<'a> {
    type Item = &'a Repetition;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for Repetitions<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl ExactSizeIterator for Repetitions<'_> {}
