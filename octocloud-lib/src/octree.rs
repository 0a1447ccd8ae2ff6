pub mod iter;
pub mod node;
pub mod octant;
pub mod visit;

use std::{convert::Infallible, ops::ControlFlow};

use glam::Vec3;
use iter::Nodes;
use node::{Node, NodeRef};
use octant::{Octant, OctreeDepth};
use visit::{OctreeVisitor, VisitNode};

use crate::math::bounds::Bounds3;

/// Items that can be stored in an [`Octree`].
pub trait Positioned {
    /// The position by which the item is sorted into the octree.
    ///
    /// Must not change while the item is stored in an octree.
    fn position(&self) -> Vec3;
}

impl Positioned for Vec3 {
    fn position(&self) -> Vec3 {
        *self
    }
}

/// Decides when a leaf of an [`Octree`] is split into 8 children.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SubdivisionPolicy {
    /// Nodes at this depth never subdivide and accept any number of items.
    pub max_depth: OctreeDepth,
    /// A leaf subdivides when an item is inserted while it already holds this many items.
    pub leaf_capacity: usize,
    /// Leaves whose children would have a smaller half-size than this never subdivide.
    pub min_half_size: f32,
}

impl SubdivisionPolicy {
    /// The number of items a leaf holds before it subdivides, unless configured otherwise.
    pub const DEFAULT_LEAF_CAPACITY: usize = 8;

    /// The default policy with a different depth cap.
    pub fn with_max_depth(max_depth: OctreeDepth) -> Self {
        Self {
            max_depth,
            ..Default::default()
        }
    }
}

impl Default for SubdivisionPolicy {
    fn default() -> Self {
        Self {
            max_depth: OctreeDepth::DEFAULT,
            leaf_capacity: Self::DEFAULT_LEAF_CAPACITY,
            min_half_size: 0.0,
        }
    }
}

/// The outcome of [`Octree::insert`].
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum Insertion {
    /// The item was stored in a node at the given depth.
    ///
    /// Later subdivisions may move the item further down.
    Stored { depth: OctreeDepth },
    /// The item was outside of the octree and has been dropped.
    Discarded,
}

impl Insertion {
    pub fn is_stored(self) -> bool {
        matches!(self, Self::Stored { .. })
    }

    pub fn is_discarded(self) -> bool {
        matches!(self, Self::Discarded)
    }
}

/// An octree storing items of type `T` sorted by their [`position`](Positioned::position).
///
/// The root covers a cube around a fixed center. Leaves hold up to
/// [`SubdivisionPolicy::leaf_capacity`] items before they are split into 8 equally sized
/// children. Items that lie outside of the root cube are silently dropped on insertion.
///
/// Implemented as a recursive data structure where every node owns its children.
#[derive(Clone, Debug)]
pub struct Octree<T> {
    root: Node<T>,
    policy: SubdivisionPolicy,
}

impl<T> Octree<T> {
    /// Constructs an empty [`Octree`] around `center` with the default leaf capacity.
    pub fn new(center: Vec3, half_size: f32, max_depth: OctreeDepth) -> Self {
        Self::with_policy(center, half_size, SubdivisionPolicy::with_max_depth(max_depth))
    }

    /// Constructs an empty [`Octree`] around `center` that subdivides according to `policy`.
    ///
    /// A negative or NaN `half_size` results in an octree that rejects every item.
    pub fn with_policy(center: Vec3, half_size: f32, policy: SubdivisionPolicy) -> Self {
        Self {
            root: Node::new(center, half_size),
            policy,
        }
    }

    pub fn policy(&self) -> &SubdivisionPolicy {
        &self.policy
    }

    /// Returns a read-only view of the root node.
    pub fn root(&self) -> NodeRef<'_, T> {
        NodeRef::new(&self.root, Octant::ROOT)
    }

    /// The region covered by the root node.
    pub fn bounds(&self) -> Bounds3 {
        self.root().bounds()
    }

    /// Returns the node at the given `octant`.
    ///
    /// Returns [`None`] if the octree is not subdivided that far.
    pub fn get(&self, octant: Octant) -> Option<NodeRef<'_, T>> {
        let mut node = &self.root;
        for corner in octant {
            node = &node.children()?[corner];
        }
        Some(NodeRef::new(node, octant))
    }

    /// Returns an iterator over all nodes in depth-first pre-order.
    ///
    /// Children are visited in octant order.
    pub fn nodes(&self) -> Nodes<'_, T> {
        Nodes::new(self.root(), OctreeDepth::MAX)
    }

    /// Like [`Self::nodes`], but does not descend past nodes at depth `level`.
    pub fn nodes_to_level(&self, level: OctreeDepth) -> Nodes<'_, T> {
        Nodes::new(self.root(), level)
    }

    /// Returns an iterator over all stored items in the same order as [`Self::nodes`].
    pub fn items(&self) -> impl Iterator<Item = &T> {
        self.nodes().flat_map(|node| node.items())
    }

    /// The total number of nodes, including the root.
    pub fn node_count(&self) -> usize {
        self.nodes().count()
    }

    /// The total number of stored items.
    pub fn len(&self) -> usize {
        self.nodes().map(|node| node.items().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes().all(|node| !node.has_items())
    }

    /// Traverses the octree depth-first, calling back into the `visitor`.
    ///
    /// Each node is reported before its items, which are reported before its children.
    pub fn visit<'a, V: OctreeVisitor<'a, T>>(&'a self, visitor: &mut V) -> ControlFlow<V::Break> {
        visit::visit_node(self.root(), visitor)
    }

    /// Returns all items within the closed box spanned by `min` and `max`.
    ///
    /// Returns nothing if `min` exceeds `max` along any axis.
    pub fn query(&self, min: Vec3, max: Vec3) -> Vec<&T>
    where
        T: Positioned,
    {
        Bounds3::checked_new(min, max)
            .map(|bounds| self.query_bounds(bounds))
            .unwrap_or_default()
    }

    /// Returns all items within `bounds`.
    pub fn query_bounds(&self, bounds: Bounds3) -> Vec<&T>
    where
        T: Positioned,
    {
        let mut query = Query {
            bounds,
            results: Vec::new(),
        };
        match self.visit(&mut query) {
            ControlFlow::Continue(()) => query.results,
            ControlFlow::Break(never) => match never {},
        }
    }
}

impl<T: Positioned> Octree<T> {
    /// Inserts an `item` at its position.
    ///
    /// Items outside of the root cube are dropped without further notice; the returned
    /// [`Insertion`] is the only way to tell.
    pub fn insert(&mut self, item: T) -> Insertion {
        let position = item.position();
        let insertion = self.root.insert(item, OctreeDepth::MIN, &self.policy);
        if insertion.is_discarded() {
            log::trace!("discarded item at {position} outside of the octree");
        }
        insertion
    }
}

impl<T: Positioned> Extend<T> for Octree<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.insert(item);
        }
    }
}

/// Collects items within the bounds, skipping nodes that lie outside entirely.
struct Query<'a, T> {
    bounds: Bounds3,
    results: Vec<&'a T>,
}

impl<'a, T: Positioned> OctreeVisitor<'a, T> for Query<'a, T> {
    type Break = Infallible;

    fn node(&mut self, node: NodeRef<'a, T>) -> ControlFlow<Self::Break, VisitNode> {
        ControlFlow::Continue(if node.bounds().overlaps(self.bounds) {
            VisitNode::Enter
        } else {
            VisitNode::Skip
        })
    }

    fn item(&mut self, item: &'a T) -> ControlFlow<Self::Break> {
        if self.bounds.contains(item.position()) {
            self.results.push(item);
        }
        ControlFlow::Continue(())
    }
}

#[cfg(test)]
mod tests {
    use enum_map::Enum;
    use itertools::Itertools;

    use super::*;
    use crate::math_enums::Corner3;

    #[derive(Clone, Debug, PartialEq)]
    struct Tagged {
        position: Vec3,
        tag: u32,
    }

    impl Positioned for Tagged {
        fn position(&self) -> Vec3 {
            self.position
        }
    }

    fn tagged(x: f32, y: f32, z: f32, tag: u32) -> Tagged {
        Tagged {
            position: Vec3::new(x, y, z),
            tag,
        }
    }

    fn depth(depth: u8) -> OctreeDepth {
        OctreeDepth::new(depth).unwrap()
    }

    fn tags<'a>(items: impl IntoIterator<Item = &'a Tagged>) -> Vec<u32> {
        items.into_iter().map(|item| item.tag).sorted().collect()
    }

    #[test]
    fn octree_new_is_empty() {
        let octree = Octree::<Tagged>::new(Vec3::ZERO, 10.0, OctreeDepth::DEFAULT);
        assert!(octree.is_empty());
        assert_eq!(octree.len(), 0);
        assert_eq!(octree.node_count(), 1);
        assert!(octree.root().is_leaf());
        assert_eq!(
            octree.bounds(),
            Bounds3::new(Vec3::splat(-10.0), Vec3::splat(10.0))
        );
    }

    #[test]
    fn insert_then_point_query() {
        let mut octree = Octree::new(Vec3::ZERO, 10.0, OctreeDepth::DEFAULT);
        let item = tagged(1.5, -2.0, 3.25, 1);
        assert!(octree.insert(item.clone()).is_stored());

        let result = octree.query(item.position, item.position);
        assert_eq!(result, [&item]);
    }

    #[test]
    fn insert_on_root_face() {
        let mut octree = Octree::new(Vec3::ZERO, 10.0, OctreeDepth::DEFAULT);
        assert!(octree.insert(tagged(10.0, -10.0, 0.0, 1)).is_stored());
        assert_eq!(octree.len(), 1);
    }

    #[test]
    fn insert_outside_is_discarded() {
        let mut octree = Octree::new(Vec3::ZERO, 10.0, depth(3));
        assert_eq!(
            octree.insert(tagged(100.0, 100.0, 100.0, 1)),
            Insertion::Discarded
        );
        assert_eq!(
            octree.insert(tagged(0.0, 0.0, 10.5, 2)),
            Insertion::Discarded
        );

        let everything = octree.query(Vec3::splat(-1000.0), Vec3::splat(1000.0));
        assert!(everything.is_empty());
        assert!(octree.is_empty());
    }

    #[test]
    fn ninth_item_subdivides_leaf() {
        let mut octree = Octree::new(Vec3::ZERO, 10.0, depth(3));
        let corners = (0..8).map(Corner3::from_usize).collect_vec();
        for (tag, corner) in corners.iter().enumerate() {
            octree.insert(Tagged {
                position: corner.signum() * 5.0,
                tag: tag as u32,
            });
        }
        assert_eq!(octree.node_count(), 1);

        octree.insert(tagged(1.0, 1.0, 1.0, 8));
        assert_eq!(octree.node_count(), 9);
        assert!(!octree.root().has_items());
        for (tag, corner) in corners.into_iter().enumerate() {
            let child = octree.root().child(corner).unwrap();
            assert!(child.is_leaf());
            assert_eq!(child.items()[0].tag, tag as u32);
        }

        let found = octree.query(Vec3::splat(-10.0), Vec3::splat(10.0));
        assert_eq!(tags(found), (0..9).collect_vec());
    }

    #[test]
    fn clustered_items_split_down_to_depth_cap() {
        let mut octree = Octree::new(Vec3::ZERO, 10.0, depth(3));
        for tag in 0..8 {
            octree.insert(tagged(1.0, 1.0, 1.0 + tag as f32 * 0.001, tag));
        }
        octree.insert(tagged(1.0, 1.0, 1.01, 8));

        assert!(!octree.root().is_leaf());
        let found = octree.query(Vec3::ZERO, Vec3::splat(2.0));
        assert_eq!(tags(found), (0..9).collect_vec());
        assert_eq!(octree.len(), 9);

        // every level on the way down had to make room for the ninth item
        assert_eq!(octree.node_count(), 1 + 8 * 3);
        let holders = octree.nodes().filter(|node| node.has_items()).collect_vec();
        assert_eq!(holders.len(), 1);
        assert_eq!(holders[0].depth(), depth(3));
        assert_eq!(holders[0].center(), Vec3::splat(1.25));
    }

    #[test]
    fn depth_cap_keeps_colliding_items() {
        let max_depth = depth(4);
        let mut octree = Octree::new(Vec3::ZERO, 16.0, max_depth);
        for tag in 0..100 {
            assert!(octree.insert(tagged(3.0, 3.0, 3.0, tag)).is_stored());
        }
        assert_eq!(octree.len(), 100);

        let holders = octree.nodes().filter(|node| node.has_items()).collect_vec();
        assert_eq!(holders.len(), 1);
        assert_eq!(holders[0].depth(), max_depth);
        assert_eq!(holders[0].items().len(), 100);
        assert_eq!(octree.node_count(), 1 + 8 * usize::from(max_depth.get()));
    }

    #[test]
    fn depth_cap_zero_never_subdivides() {
        let mut octree = Octree::new(Vec3::ZERO, 1.0, OctreeDepth::MIN);
        for tag in 0..20 {
            octree.insert(tagged(0.5, -0.5, 0.25, tag));
        }
        assert_eq!(octree.node_count(), 1);
        assert_eq!(octree.root().items().len(), 20);
    }

    #[test]
    fn max_depth_limit_is_stack_safe() {
        let mut octree = Octree::new(Vec3::ZERO, 1.0, OctreeDepth::MAX);
        for tag in 0..50 {
            octree.insert(tagged(0.0, 0.0, 0.0, tag));
        }
        assert_eq!(octree.len(), 50);
        assert_eq!(
            octree.nodes().map(|node| node.depth()).max(),
            Some(OctreeDepth::MAX)
        );
    }

    #[test]
    fn query_prunes_but_finds_all_matches() {
        let mut octree = Octree::new(Vec3::ZERO, 8.0, OctreeDepth::DEFAULT);
        let mut tag = 0;
        for x in -4..4 {
            for y in -4..4 {
                for z in -4..4 {
                    octree.insert(tagged(x as f32 * 2.0, y as f32 * 2.0, z as f32 * 2.0, tag));
                    tag += 1;
                }
            }
        }
        assert_eq!(octree.len(), 512);

        let min = Vec3::new(-2.0, 0.0, 1.0);
        let max = Vec3::new(2.0, 4.0, 4.0);
        let expected = octree
            .items()
            .filter(|item| Bounds3::new(min, max).contains(item.position))
            .collect_vec();
        let found = octree.query(min, max);
        assert_eq!(found.len(), 3 * 3 * 2);
        assert_eq!(tags(found), tags(expected));
    }

    #[test]
    fn query_inverted_box_is_empty() {
        let mut octree = Octree::new(Vec3::ZERO, 8.0, OctreeDepth::DEFAULT);
        octree.insert(tagged(0.0, 0.0, 0.0, 0));
        assert!(octree.query(Vec3::ONE, Vec3::NEG_ONE).is_empty());
    }

    #[test]
    fn query_order_is_pre_order() {
        let mut octree = Octree::new(Vec3::ZERO, 8.0, OctreeDepth::DEFAULT);
        for (tag, corner) in [Corner3::X1Y1Z1, Corner3::X0Y0Z0, Corner3::X1Y0Z0]
            .into_iter()
            .cycle()
            .take(9)
            .enumerate()
        {
            octree.insert(Tagged {
                position: corner.signum() * 4.0,
                tag: tag as u32,
            });
        }

        let found = octree.query(Vec3::splat(-8.0), Vec3::splat(8.0));
        let order = found.iter().map(|item| item.tag).collect_vec();
        assert_eq!(order, [1, 4, 7, 2, 5, 8, 0, 3, 6]);
        assert_eq!(order, octree.items().map(|item| item.tag).collect_vec());
    }

    #[test]
    fn get_by_octant() {
        let mut octree = Octree::new(Vec3::ZERO, 8.0, OctreeDepth::DEFAULT);
        octree.extend((0..8).map(|tag| tagged(-1.0, 1.0, -1.0, tag)));
        octree.insert(tagged(1.0, 1.0, 1.0, 8));

        assert_eq!(octree.get(Octant::ROOT).unwrap().octant(), Octant::ROOT);
        let node = octree.get(Octant::new(Corner3::X0Y1Z0)).unwrap();
        assert_eq!(node.center(), Vec3::new(-4.0, 4.0, -4.0));
        assert_eq!(node.items().len(), 8);
        assert!(octree
            .get(Octant::new(Corner3::X0Y1Z0).child(Corner3::X0Y0Z0))
            .is_none());
    }

    #[test]
    fn policy_leaf_capacity() {
        let policy = SubdivisionPolicy {
            leaf_capacity: 2,
            ..Default::default()
        };
        let mut octree = Octree::with_policy(Vec3::ZERO, 8.0, policy);
        octree.insert(tagged(1.0, 1.0, 1.0, 0));
        octree.insert(tagged(-1.0, 1.0, 1.0, 1));
        assert_eq!(octree.node_count(), 1);
        octree.insert(tagged(1.0, -1.0, 1.0, 2));
        assert_eq!(octree.node_count(), 9);
        assert_eq!(octree.policy(), &policy);
    }

    #[test]
    fn split_node_keeps_item_its_child_cannot_reach() {
        let policy = SubdivisionPolicy {
            leaf_capacity: 1,
            ..Default::default()
        };
        let center = Vec3::new(0.3, 0.0, 0.0);
        let mut octree = Octree::with_policy(center, 0.43, policy);

        // lies on the root face, but the rounded center of its child is slightly too far away
        let on_face = tagged(0.3 + 0.43, 0.0, 0.0, 0);
        assert!(octree.insert(on_face.clone()).is_stored());
        assert_eq!(
            octree.insert(tagged(0.0, 0.0, 0.0, 1)),
            Insertion::Stored { depth: depth(1) }
        );

        let root = octree.root();
        assert!(!root.is_leaf());
        assert_eq!(root.items(), [on_face.clone()]);
        assert_eq!(octree.len(), 2);
        assert_eq!(octree.query(on_face.position, on_face.position), [&on_face]);
    }

    #[test]
    fn vec3_is_positioned() {
        let mut octree = Octree::new(Vec3::ZERO, 1.0, OctreeDepth::DEFAULT);
        octree.insert(Vec3::splat(0.5));
        assert_eq!(octree.query(Vec3::ZERO, Vec3::ONE), [&Vec3::splat(0.5)]);
    }
}
