use std::ops::ControlFlow;

use super::node::NodeRef;

/// Contains callbacks for [`Octree`](super::Octree) traversal.
///
/// - [`OctreeVisitor::node`] is called for every reached node and decides whether to enter it.
/// - [`OctreeVisitor::item`] is called for every item stored directly in an entered node.
///
/// Traversal is depth-first; a node's own items are reported before any of its children.
pub trait OctreeVisitor<'a, T> {
    /// The type within the [`ControlFlow::Break`] used to stop traversal early.
    type Break;

    /// Called for each node before its items and children.
    ///
    /// Return [`VisitNode::Skip`] to ignore the node's items and its entire subtree.
    fn node(&mut self, node: NodeRef<'a, T>) -> ControlFlow<Self::Break, VisitNode>;

    /// Called for each item of an entered node.
    fn item(&mut self, item: &'a T) -> ControlFlow<Self::Break>;
}

/// [`OctreeVisitor`] control flow for nodes that can be entered.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum VisitNode {
    /// Skips over this node without looking at its items or children.
    Skip,
    /// Enters this node, causing additional calls on the visitor.
    Enter,
}

impl VisitNode {
    pub fn is_skip(&self) -> bool {
        matches!(self, Self::Skip)
    }
}

/// Visits `node` and, if entered, its items and all of its children.
///
/// Recursion depth is bounded by the depth of the octree.
pub(crate) fn visit_node<'a, T, V: OctreeVisitor<'a, T>>(
    node: NodeRef<'a, T>,
    visitor: &mut V,
) -> ControlFlow<V::Break> {
    if visitor.node(node)?.is_skip() {
        return ControlFlow::Continue(());
    }

    for item in node.items() {
        visitor.item(item)?;
    }

    for child in node.children().into_iter().flatten() {
        visit_node(child, visitor)?;
    }

    ControlFlow::Continue(())
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::octree::{octant::OctreeDepth, Octree};

    /// Records the depth of every entered node and stops after `limit` items.
    struct Recorder {
        skip_below: Option<OctreeDepth>,
        limit: usize,
        depths: Vec<u8>,
        items: Vec<Vec3>,
    }

    impl<'a> OctreeVisitor<'a, Vec3> for Recorder {
        type Break = Vec3;

        fn node(&mut self, node: NodeRef<'a, Vec3>) -> ControlFlow<Vec3, VisitNode> {
            if self.skip_below.is_some_and(|depth| node.depth() > depth) {
                return ControlFlow::Continue(VisitNode::Skip);
            }
            self.depths.push(node.depth().get());
            ControlFlow::Continue(VisitNode::Enter)
        }

        fn item(&mut self, item: &'a Vec3) -> ControlFlow<Vec3> {
            if self.items.len() == self.limit {
                return ControlFlow::Break(*item);
            }
            self.items.push(*item);
            ControlFlow::Continue(())
        }
    }

    fn recorder(skip_below: Option<OctreeDepth>, limit: usize) -> Recorder {
        Recorder {
            skip_below,
            limit,
            depths: Vec::new(),
            items: Vec::new(),
        }
    }

    fn split_octree() -> Octree<Vec3> {
        let mut octree = Octree::new(Vec3::ZERO, 4.0, OctreeDepth::DEFAULT);
        octree.extend((0..9).map(|index| Vec3::new(index as f32 * 0.25, 1.0, 1.0)));
        octree
    }

    #[test]
    fn visits_every_node_pre_order() {
        let octree = split_octree();
        let mut visitor = recorder(None, usize::MAX);
        assert_eq!(octree.visit(&mut visitor), ControlFlow::Continue(()));
        assert_eq!(visitor.depths.len(), octree.node_count());
        assert_eq!(visitor.depths[0], 0);
        assert_eq!(visitor.items.len(), 9);
    }

    #[test]
    fn skip_prunes_subtree() {
        let octree = split_octree();
        let mut visitor = recorder(Some(OctreeDepth::MIN), usize::MAX);
        assert_eq!(octree.visit(&mut visitor), ControlFlow::Continue(()));
        assert_eq!(visitor.depths, [0]);
        assert!(visitor.items.is_empty());
    }

    #[test]
    fn break_stops_traversal() {
        let octree = split_octree();
        let mut visitor = recorder(None, 3);
        let ControlFlow::Break(stopped_at) = octree.visit(&mut visitor) else {
            panic!("visitor should have stopped");
        };
        assert_eq!(visitor.items.len(), 3);
        assert!(!visitor.items.contains(&stopped_at));
    }
}
