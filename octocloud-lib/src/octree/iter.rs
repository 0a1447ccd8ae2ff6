use std::iter::FusedIterator;

use arrayvec::ArrayVec;
use derive_where::derive_where;
use enum_map::Enum;

use super::{
    node::{Children, NodeRef},
    octant::{Octant, OctreeDepth},
};
use crate::math_enums::Corner3;

/// The maximum number of nodes whose children are being iterated at the same time.
const MAX_PARENTS: usize = OctreeDepth::MAX.get() as usize;

/// An iterator over the nodes of an octree in depth-first pre-order.
///
/// Children are visited in octant order. Nodes deeper than the configured level are not
/// reported, and their subtrees are never entered.
#[derive_where(Clone)]
pub struct Nodes<'a, T> {
    /// The root node until it has been returned.
    root: Option<NodeRef<'a, T>>,
    /// Parents whose children are currently being iterated, innermost last.
    parents: ArrayVec<Parent<'a, T>, MAX_PARENTS>,
    /// Nodes at this depth are returned but not entered.
    max_level: OctreeDepth,
}

impl<'a, T> Nodes<'a, T> {
    pub(crate) fn new(root: NodeRef<'a, T>, max_level: OctreeDepth) -> Self {
        Self {
            root: Some(root),
            parents: ArrayVec::new(),
            max_level,
        }
    }

    /// Remembers `node` so that its children are returned next.
    fn enter(&mut self, node: NodeRef<'a, T>, children: Option<&'a Children<T>>) {
        if node.depth() < self.max_level {
            if let Some(children) = children {
                self.parents.push(Parent {
                    children,
                    octant: node.octant(),
                    next: 0,
                });
            }
        }
    }
}

impl<'a, T> Iterator for Nodes<'a, T> {
    type Item = NodeRef<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(root) = self.root.take() {
            self.enter(root, root.node().children());
            return Some(root);
        }

        loop {
            let parent = self.parents.last_mut()?;
            if parent.next == Corner3::LENGTH {
                self.parents.pop();
                continue;
            }

            let corner = Corner3::from_usize(parent.next);
            parent.next += 1;

            let Parent {
                children, octant, ..
            } = *parent;
            let child = &children[corner];
            let node = NodeRef::new(child, octant.child(corner));
            self.enter(node, child.children());
            return Some(node);
        }
    }
}

impl<T> FusedIterator for Nodes<'_, T> {}

#[derive_where(Clone, Copy)]
struct Parent<'a, T> {
    children: &'a Children<T>,
    /// The octant of the parent itself.
    octant: Octant,
    /// Index of the next child to return.
    next: usize,
}
