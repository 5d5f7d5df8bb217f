//! Typed facades over [`Group`](crate::Group).
//!
//! Message and group classes are mechanically derived from their schema
//! table: every slot gets a typed accessor that forwards to the generic,
//! name-keyed container operations. [`hl7_structure!`](crate::hl7_structure)
//! generates such a facade from the table.
//!
//! # Example
//!
//! ```
//! use hl7_model::{hl7_structure, FactoryRegistry, Segment};
//!
//! hl7_structure! {
//!     /// Minimal acknowledgment.
//!     pub struct MiniAck("MINI_ACK") {
//!         "MSH": Segment, required, single { get: msh },
//!         "NTE": Segment, optional, repeating {
//!             get: nte,
//!             rep: nte_rep,
//!             count: nte_reps_used,
//!             iter: ntes,
//!             add: add_nte,
//!             remove: remove_nte,
//!             remove_at: remove_nte_at,
//!         },
//!     }
//! }
//!
//! let mut registry = FactoryRegistry::new();
//! registry.register_segments(["MSH", "NTE"]);
//!
//! let mut ack = MiniAck::new(registry.into_shared())?;
//! ack.msh()?.set_field(8, "ACK");
//! ack.add_nte()?.set_field(2, "first");
//! ack.add_nte()?.set_field(2, "second");
//!
//! assert_eq!(ack.nte_reps_used()?, 2);
//! let notes: Vec<_> = ack.ntes()?.filter_map(|nte| nte.field(2)).collect();
//! assert_eq!(notes, vec!["first", "second"]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

/// Generates a typed facade for one message or group shape.
///
/// Each row reads `"KIND": Type, required|optional, single|repeating { .. }`.
/// Single slots name a `get` accessor; repeating slots additionally name
/// `rep`, `count`, `iter`, `add`, `remove` and `remove_at` accessors.
///
/// The generated type wraps a [`Group`](crate::Group), implements
/// [`Structure`](crate::Structure) so it can be nested in other groups, and
/// provides `constructor()` for registration with a
/// [`FactoryRegistry`](crate::FactoryRegistry).
#[macro_export]
macro_rules! hl7_structure {
    (@required required) => { true };
    (@required optional) => { false };
    (@repeating single) => { false };
    (@repeating repeating) => { true };

    (@accessors $kind:literal, $ty:ty, single { get: $get:ident $(,)? }) => {
        #[doc = concat!("Returns ", $kind, ", creating it if necessary.")]
        pub fn $get(&mut self) -> $crate::StructureResult<&mut $ty> {
            self.group.get_as::<$ty>($kind)
        }
    };

    (@accessors $kind:literal, $ty:ty, repeating {
        get: $get:ident,
        rep: $rep:ident,
        count: $count:ident,
        iter: $iter:ident,
        add: $add:ident,
        remove: $remove:ident,
        remove_at: $remove_at:ident $(,)?
    }) => {
        #[doc = concat!("Returns the first repetition of ", $kind, ", creating it if necessary.")]
        pub fn $get(&mut self) -> $crate::StructureResult<&mut $ty> {
            self.group.get_as::<$ty>($kind)
        }

        #[doc = concat!(
            "Returns repetition `rep` of ", $kind, ", creating it if `rep` is the ",
            "number of existing repetitions."
        )]
        pub fn $rep(&mut self, rep: usize) -> $crate::StructureResult<&mut $ty> {
            self.group.get_rep_as::<$ty>($kind, rep)
        }

        #[doc = concat!("Returns the number of existing repetitions of ", $kind, ".")]
        pub fn $count(&self) -> $crate::StructureResult<usize> {
            self.group.count($kind)
        }

        #[doc = concat!("Iterates over the existing repetitions of ", $kind, ".")]
        pub fn $iter(&self) -> $crate::StructureResult<impl Iterator<Item = &$ty> + '_> {
            self.group.iter_as::<$ty>($kind)
        }

        #[doc = concat!("Adds a new repetition of ", $kind, ".")]
        pub fn $add(&mut self) -> $crate::StructureResult<&mut $ty> {
            self.group.add_as::<$ty>($kind)
        }

        #[doc = concat!("Removes the repetition of ", $kind, " with the given identity.")]
        pub fn $remove(&mut self, id: $crate::StructureId) -> $crate::StructureResult<()> {
            self.group.remove($kind, id)
        }

        #[doc = concat!("Removes the repetition of ", $kind, " at `index`.")]
        pub fn $remove_at(&mut self, index: usize) -> $crate::StructureResult<()> {
            self.group.remove_rep($kind, index)
        }
    };

    (
        $(#[$meta:meta])*
        $vis:vis struct $facade:ident($structure:literal) {
            $(
                $kind:literal: $ty:ty, $required:ident, $mode:ident { $($accessors:tt)* }
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug)]
        $vis struct $facade {
            group: $crate::Group,
        }

        impl $facade {
            /// Structure name of this shape.
            pub const NAME: &'static str = $structure;

            /// Slot table this shape is built from.
            pub const SLOTS: &'static [$crate::SlotSpec] = &[
                $(
                    $crate::SlotSpec::new(
                        $kind,
                        $crate::hl7_structure!(@required $required),
                        $crate::hl7_structure!(@repeating $mode),
                    ),
                )*
            ];

            /// Creates an empty instance whose children come from `factory`.
            pub fn new(factory: $crate::SharedFactory) -> $crate::FactoryResult<Self> {
                let group = $crate::GroupBuilder::new(Self::NAME, factory)
                    .specs(Self::SLOTS.iter().cloned())
                    .build()?;
                Ok(Self { group })
            }

            /// Constructor for registering this shape with a factory.
            pub fn constructor() -> $crate::Constructor {
                ::std::sync::Arc::new(
                    |factory: &$crate::SharedFactory|
                        -> $crate::FactoryResult<::std::boxed::Box<dyn $crate::Structure>> {
                        Ok(::std::boxed::Box::new(Self::new(::std::sync::Arc::clone(factory))?))
                    },
                )
            }

            /// Returns the underlying group.
            pub fn group(&self) -> &$crate::Group {
                &self.group
            }

            /// Returns the underlying group mutably.
            pub fn group_mut(&mut self) -> &mut $crate::Group {
                &mut self.group
            }

            /// Unwraps the underlying group.
            pub fn into_group(self) -> $crate::Group {
                self.group
            }

            $(
                $crate::hl7_structure!(@accessors $kind, $ty, $mode { $($accessors)* });
            )*
        }

        impl $crate::Structure for $facade {
            fn name(&self) -> &str {
                Self::NAME
            }

            fn is_empty(&self) -> bool {
                $crate::Structure::is_empty(&self.group)
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                self
            }

            fn as_group(&self) -> Option<&$crate::Group> {
                Some(&self.group)
            }

            fn as_group_mut(&mut self) -> Option<&mut $crate::Group> {
                Some(&mut self.group)
            }
        }
    };
}
