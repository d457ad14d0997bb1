//! Strongly typed identifier wrappers.
//!
//! `NodeId` and `RoadId` carry the identifiers found in the source data and
//! are therefore sparse: a network may contain node 12 and node 90_417 and
//! nothing in between.  `SegmentId` is dense, assigned in insertion order by
//! the network builder, and doubles as an index into segment storage.
//!
//! All IDs are `Copy + Ord + Hash` so they can key maps and sorted sets
//! without ceremony.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Raw integer value.
            #[inline(always)]
            pub fn get(self) -> $inner {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$inner> for $name {
            #[inline(always)]
            fn from(raw: $inner) -> $name {
                $name(raw)
            }
        }
    };
}

typed_id! {
    /// Identifier of an intersection, as found in the node file.
    pub struct NodeId(u32);
}

typed_id! {
    /// Identifier of a road, as found in the road file.
    pub struct RoadId(u32);
}

typed_id! {
    /// Position of a segment in the network's segment storage.
    pub struct SegmentId(u32);
}

impl SegmentId {
    /// Cast to `usize` for direct use as a `Vec` index.
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl TryFrom<usize> for SegmentId {
    type Error = std::num::TryFromIntError;
    fn try_from(n: usize) -> Result<SegmentId, Self::Error> {
        u32::try_from(n).map(SegmentId)
    }
}
