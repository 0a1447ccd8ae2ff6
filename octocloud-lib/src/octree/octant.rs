use std::{
    cmp::Ordering,
    fmt::Debug,
    hash::{Hash, Hasher},
    iter::FusedIterator,
    mem::size_of,
};

use bitvec::{bitarr, field::BitField, order::Lsb0, BitArr};
use enum_map::Enum;

use crate::math_enums::Corner3;

/// The path from the root of an octree to one of its nodes, stored as a list of [`Corner3`].
#[derive(Clone, Copy, Default, Eq)]
pub struct Octant {
    /// Stores 5 bits for the length followed by up to 30 sets of 3 bits for each corner.
    data: BitArr!(for OCTANT_BITS, in u8),
}

const _: () = assert!(size_of::<Octant>() == 12);

const OCTANT_LEN_BITS: usize = 5;
const OCTANT_CORNER_BITS: usize = 3;
const OCTANT_BITS: usize = OCTANT_LEN_BITS + OctreeDepth::MAX.0 as usize * OCTANT_CORNER_BITS;

impl Octant {
    /// An [`Octant`] pointing to the root of an octree.
    pub const ROOT: Self = Self {
        data: bitarr!(u8, Lsb0; 0; OCTANT_BITS),
    };

    /// Constructs a new [`Octant`] pointing to the given child of the root.
    pub fn new(corner: Corner3) -> Self {
        Self::ROOT.child(corner)
    }

    /// The number of subdivisions between the root and this octant.
    pub fn depth(self) -> OctreeDepth {
        OctreeDepth(self.data[..OCTANT_LEN_BITS].load_le())
    }

    pub fn is_root(self) -> bool {
        self.depth() == OctreeDepth::MIN
    }

    /// Returns the child of this octant at the given corner.
    ///
    /// # Panics
    ///
    /// Panics if [`OctreeDepth::MAX`] would be exceeded. Octrees never subdivide past that depth,
    /// so this only happens when building paths by hand.
    pub fn child(mut self, corner: Corner3) -> Self {
        let depth = self.depth();
        self.set_depth(OctreeDepth::new(depth.0 + 1).expect("octant should not exceed max depth"));
        self.set_corner(depth, corner);
        self
    }

    fn set_depth(&mut self, depth: OctreeDepth) {
        self.data[..OCTANT_LEN_BITS].store_le(depth.0);
    }

    fn corner_bits(depth: OctreeDepth) -> std::ops::Range<usize> {
        let start = OCTANT_LEN_BITS + usize::from(depth.0) * OCTANT_CORNER_BITS;
        start..start + OCTANT_CORNER_BITS
    }

    fn get_corner(self, depth: OctreeDepth) -> Corner3 {
        Corner3::from_usize(self.data[Self::corner_bits(depth)].load_le())
    }

    fn set_corner(&mut self, depth: OctreeDepth, corner: Corner3) {
        self.data[Self::corner_bits(depth)].store_le(corner.into_usize());
    }
}

impl Debug for Octant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(*self).finish()
    }
}

impl Hash for Octant {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.depth().hash(state);
        for corner in *self {
            corner.hash(state);
        }
    }
}

impl PartialEq for Octant {
    fn eq(&self, other: &Self) -> bool {
        // only bits up to the current depth are meaningful
        self.into_iter().eq(*other)
    }
}

impl PartialOrd for Octant {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Octant {
    fn cmp(&self, other: &Self) -> Ordering {
        self.into_iter().cmp(*other)
    }
}

impl IntoIterator for Octant {
    type Item = Corner3;
    type IntoIter = OctantCorners;

    fn into_iter(self) -> Self::IntoIter {
        OctantCorners {
            depth: OctreeDepth::MIN,
            octant: self,
        }
    }
}

/// An iterator over the corners that lead from the root to a specific [`Octant`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OctantCorners {
    /// The depth of the next corner, counting up from zero.
    depth: OctreeDepth,
    octant: Octant,
}

impl Iterator for OctantCorners {
    type Item = Corner3;

    fn next(&mut self) -> Option<Self::Item> {
        (self.depth != self.octant.depth()).then(|| {
            let corner = self.octant.get_corner(self.depth);
            self.depth.0 += 1;
            corner
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len(), Some(self.len()))
    }
}

impl ExactSizeIterator for OctantCorners {
    fn len(&self) -> usize {
        usize::from(self.octant.depth().0 - self.depth.0)
    }
}

impl FusedIterator for OctantCorners {}

/// The depth of a node within an octree; zero for the root.
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct OctreeDepth(u8);

impl OctreeDepth {
    /// Indicates the root of an octree.
    pub const MIN: Self = Self(0);
    /// The depth cap used unless configured otherwise.
    pub const DEFAULT: Self = Self(8);
    /// The maximum possible depth is 30.
    ///
    /// Keeps [`Octant`] at 12 bytes while still allowing for a resolution of roughly one
    /// billionth of the root size.
    pub const MAX: Self = Self(30);

    /// Constructs a new [`OctreeDepth`], returning [`None`] if the value is out of range.
    pub fn new(depth: u8) -> Option<Self> {
        (depth <= Self::MAX.0).then_some(Self(depth))
    }

    /// Returns the depth as a [`u8`].
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Adds the given value to the depth, saturating at the maximum.
    pub fn saturating_add(self, rhs: u8) -> Self {
        Self(self.0.saturating_add(rhs).min(Self::MAX.0))
    }
}
