use glam::Vec3;
use octocloud_lib::{math::bounds::Bounds3, octree::Octree};

use crate::point::{Point, PointSet};

/// Estimated storage cost of a single node; its center and half-size.
pub const NODE_OVERHEAD_BYTES: usize = 16;
/// Storage cost of a single point; its position and color as `f32`.
pub const POINT_BYTES: usize = 24;

/// A point cloud sorted into an octree, together with the bounds of the original input.
#[derive(Clone, Debug)]
pub struct CompressedModel {
    octree: Octree<Point>,
    /// Bounds of the point set this model was built from.
    bounds: Bounds3,
}

impl CompressedModel {
    pub(crate) fn new(octree: Octree<Point>, bounds: Bounds3) -> Self {
        Self { octree, bounds }
    }

    /// Reconstructs the point set by collecting the points of every node in depth-first
    /// pre-order.
    ///
    /// Point values are copied unchanged; only their order may differ from the input. The bounds
    /// are recomputed from the reconstructed points.
    pub fn decompress(&self) -> PointSet {
        self.octree.items().copied().collect()
    }

    /// Estimates the size in bytes needed to store the octree with all of its points.
    pub fn compressed_size(&self) -> usize {
        let (nodes, points) = self
            .octree
            .nodes()
            .fold((0, 0), |(nodes, points), node| {
                (nodes + 1, points + node.items().len())
            });
        NODE_OVERHEAD_BYTES * nodes + POINT_BYTES * points
    }

    /// The number of points retained in the octree.
    pub fn vertex_count(&self) -> usize {
        self.octree.len()
    }

    /// The number of nodes in the octree, including the root.
    pub fn node_count(&self) -> usize {
        self.octree.node_count()
    }

    /// The size of the compressed model relative to storing every retained point as is.
    ///
    /// Returns [`None`] if no points were retained.
    pub fn compression_ratio(&self) -> Option<f32> {
        let raw = POINT_BYTES * self.vertex_count();
        (raw != 0).then(|| self.compressed_size() as f32 / raw as f32)
    }

    pub fn octree(&self) -> &Octree<Point> {
        &self.octree
    }

    /// Bounds of the point set this model was built from.
    pub fn bounds(&self) -> Bounds3 {
        self.bounds
    }

    pub fn min_bounds(&self) -> Vec3 {
        self.bounds.min()
    }

    pub fn max_bounds(&self) -> Vec3 {
        self.bounds.max()
    }
}
