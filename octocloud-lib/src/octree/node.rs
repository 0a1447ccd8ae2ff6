use derive_where::derive_where;
use enum_map::{Enum, EnumMap};
use glam::Vec3;

use super::{
    octant::{Octant, OctreeDepth},
    Insertion, Positioned, SubdivisionPolicy,
};
use crate::{math::bounds::Bounds3, math_enums::Corner3};

/// A cube within an octree holding items and, once subdivided, exactly 8 child nodes.
///
/// Items normally live in leaves only. A leaf that can no longer subdivide, either because of the
/// depth cap or the minimum size, keeps accepting items beyond its capacity.
///
/// Items on a dividing plane that the rounded child cube does not quite reach stay in the split
/// node, so an item that passed the containment test of the root is never lost.
#[derive(Clone, Debug)]
pub(crate) struct Node<T> {
    center: Vec3,
    /// Distance from the center to each face of the cube.
    half_size: f32,
    items: Vec<T>,
    children: Option<Children<T>>,
}

pub(crate) type Children<T> = Box<EnumMap<Corner3, Node<T>>>;

impl<T> Node<T> {
    pub(crate) fn new(center: Vec3, half_size: f32) -> Self {
        Self {
            center,
            half_size,
            items: Vec::new(),
            children: None,
        }
    }

    /// Whether `position` lies within the cube, faces included.
    pub(crate) fn contains(&self, position: Vec3) -> bool {
        (position - self.center)
            .abs()
            .cmple(Vec3::splat(self.half_size))
            .all()
    }

    pub(crate) fn children(&self) -> Option<&Children<T>> {
        self.children.as_ref()
    }

    /// Whether the node could still be split without its children dropping below the minimum
    /// half-size of the `policy`.
    fn can_subdivide(&self, depth: OctreeDepth, policy: &SubdivisionPolicy) -> bool {
        depth < policy.max_depth && self.half_size * 0.5 >= policy.min_half_size
    }
}

impl<T: Positioned> Node<T> {
    /// Inserts an `item` into this node or one of its descendants.
    ///
    /// The item is discarded if it lies outside of this node.
    pub(crate) fn insert(
        &mut self,
        item: T,
        depth: OctreeDepth,
        policy: &SubdivisionPolicy,
    ) -> Insertion {
        if !self.contains(item.position()) {
            return Insertion::Discarded;
        }

        if depth >= policy.max_depth {
            self.items.push(item);
            return Insertion::Stored { depth };
        }

        if self.children.is_none() {
            if self.items.len() < policy.leaf_capacity || !self.can_subdivide(depth, policy) {
                self.items.push(item);
                return Insertion::Stored { depth };
            }
            self.subdivide(depth, policy);
        }

        self.insert_into_child(item, depth, policy)
    }

    /// Routes an `item` into the child at the corner it falls into.
    ///
    /// Leaves keep the item themselves, as do nodes whose child rejects an item on its face due to
    /// rounding of the child's center.
    fn insert_into_child(
        &mut self,
        item: T,
        depth: OctreeDepth,
        policy: &SubdivisionPolicy,
    ) -> Insertion {
        if let Some(children) = &mut self.children {
            let position = item.position();
            let child = &mut children[Corner3::of_position(self.center, position)];
            if child.contains(position) {
                return child.insert(item, depth.saturating_add(1), policy);
            }
        }
        self.items.push(item);
        Insertion::Stored { depth }
    }

    /// Splits the leaf into 8 children and moves all of its items into them.
    ///
    /// # Panics
    ///
    /// Panics if the node is already split.
    fn subdivide(&mut self, depth: OctreeDepth, policy: &SubdivisionPolicy) {
        assert!(self.children.is_none(), "node already split");

        let half_size = self.half_size * 0.5;
        let center = self.center;
        self.children = Some(Box::new(EnumMap::from_array(array_init::array_init(
            |index| {
                let corner = Corner3::from_usize(index);
                Node::new(center + corner.signum() * half_size, half_size)
            },
        ))));

        for item in std::mem::take(&mut self.items) {
            self.insert_into_child(item, depth, policy);
        }
    }
}

/// A read-only view of a node within an octree.
#[derive_where(Clone, Copy)]
#[derive(Debug)]
pub struct NodeRef<'a, T> {
    node: &'a Node<T>,
    /// The path from the root to this node.
    octant: Octant,
}

impl<'a, T> NodeRef<'a, T> {
    pub(crate) fn new(node: &'a Node<T>, octant: Octant) -> Self {
        Self { node, octant }
    }

    pub(crate) fn node(self) -> &'a Node<T> {
        self.node
    }

    pub fn center(self) -> Vec3 {
        self.node.center
    }

    /// Distance from the center to each face of the node's cube.
    pub fn half_size(self) -> f32 {
        self.node.half_size
    }

    /// The region covered by the node.
    pub fn bounds(self) -> Bounds3 {
        Bounds3::cube(self.node.center, self.node.half_size).unwrap_or(Bounds3::ZERO)
    }

    /// Items stored directly in this node, excluding those of its children.
    pub fn items(self) -> &'a [T] {
        &self.node.items
    }

    pub fn has_items(self) -> bool {
        !self.node.items.is_empty()
    }

    pub fn is_leaf(self) -> bool {
        self.node.children.is_none()
    }

    /// The path from the root to this node.
    pub fn octant(self) -> Octant {
        self.octant
    }

    /// The number of subdivisions between the root and this node.
    pub fn depth(self) -> OctreeDepth {
        self.octant.depth()
    }

    /// Returns the child at the given `corner`.
    ///
    /// Returns [`None`] for leaf nodes.
    pub fn child(self, corner: Corner3) -> Option<Self> {
        let children = self.node.children()?;
        Some(Self::new(&children[corner], self.octant.child(corner)))
    }

    /// Returns all 8 children in octant order.
    ///
    /// Returns [`None`] for leaf nodes.
    pub fn children(self) -> Option<impl ExactSizeIterator<Item = Self>> {
        let octant = self.octant;
        self.node.children().map(move |children| {
            children
                .iter()
                .map(move |(corner, child)| Self::new(child, octant.child(corner)))
        })
    }
}
