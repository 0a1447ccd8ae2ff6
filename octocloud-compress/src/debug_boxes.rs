use glam::Vec3;
use octocloud_lib::{
    math_enums::{Axes3, Axis3, Corner3, Edges3, Facing3, Facings3},
    octree::{node::NodeRef, octant::OctreeDepth, Octree},
};

/// Describes the region covered by a single octree node for debug rendering.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub center: Vec3,
    /// Distance from the center to each face along every axis.
    pub half_size: Vec3,
    /// Whether the node stores points itself.
    pub has_data: bool,
    /// The depth of the node; zero for the root.
    pub level: u8,
}

impl BoundingBox {
    pub fn from_node<T>(node: NodeRef<T>) -> Self {
        Self {
            center: node.center(),
            half_size: Vec3::splat(node.half_size()),
            has_data: node.has_items(),
            level: node.depth().get(),
        }
    }

    /// The position of the given `corner` of the box.
    pub fn corner(&self, corner: Corner3) -> Vec3 {
        self.center + corner.signum() * self.half_size
    }

    /// The 12 edges of the box as pairs of line segment end points.
    pub fn wireframe_vertices(&self) -> [Vec3; 24] {
        let edges = Edges3::all().iter().flat_map(|edge| edge.corners());
        let mut vertices = [Vec3::ZERO; 24];
        for (vertex, corner) in vertices.iter_mut().zip(edges) {
            *vertex = self.corner(corner);
        }
        vertices
    }

    /// The 6 faces of the box as 2 triangles each.
    ///
    /// Triangles are wound counter-clockwise when looking at the box from outside.
    pub fn solid_vertices(&self) -> [Vec3; 36] {
        let triangles = Facings3::all().iter().flat_map(|facing| {
            let [a, b, c, d] = face_quad(facing);
            [a, b, c, a, c, d]
        });
        let mut vertices = [Vec3::ZERO; 36];
        for (vertex, corner) in vertices.iter_mut().zip(triangles) {
            *vertex = self.corner(corner);
        }
        vertices
    }
}

/// Returns the corners of the face in counter-clockwise order when looking at it from outside.
fn face_quad(facing: Facing3) -> [Corner3; 4] {
    let axis = facing.axis();
    let (u, v) = match axis {
        Axis3::X => (Axis3::Y, Axis3::Z),
        Axis3::Y => (Axis3::Z, Axis3::X),
        Axis3::Z => (Axis3::X, Axis3::Y),
    };
    if facing == Facing3::from(axis) {
        let base = Axes3::only(axis);
        [base, base | u, base | u | v, base | v].map(Corner3::from_axes)
    } else {
        let base = Axes3::empty();
        [base, base | v, base | u | v, base | u].map(Corner3::from_axes)
    }
}

/// Returns the bounding boxes of all nodes of `octree` in depth-first pre-order.
///
/// Nodes deeper than `max_level` are skipped; [`None`] includes every level.
pub fn extract_bounding_boxes<T>(
    octree: &Octree<T>,
    max_level: Option<u8>,
) -> impl Iterator<Item = BoundingBox> + '_ {
    let level = max_level
        .and_then(OctreeDepth::new)
        .unwrap_or(OctreeDepth::MAX);
    octree.nodes_to_level(level).map(BoundingBox::from_node)
}
