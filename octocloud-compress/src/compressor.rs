use glam::Vec3;
use octocloud_lib::{math::bounds::Bounds3, octree::Octree};

use crate::{
    compressed::CompressedModel,
    error::{Error, Result},
    point::PointSet,
    settings::CompressorSettings,
};

/// Turns a point set into a [`CompressedModel`].
pub trait ModelCompressor {
    /// Builds a compressed model from `points`.
    ///
    /// Fails without building anything if `points` cannot be compressed.
    fn compress(&self, points: &PointSet) -> Result<CompressedModel>;
}

/// Compresses point sets by sorting them into an [`Octree`] covering their bounding box.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OctreeCompressor {
    settings: CompressorSettings,
}

impl OctreeCompressor {
    pub fn new(settings: CompressorSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &CompressorSettings {
        &self.settings
    }
}

impl ModelCompressor for OctreeCompressor {
    fn compress(&self, points: &PointSet) -> Result<CompressedModel> {
        let policy = self.settings.subdivision_policy()?;
        if points.is_empty() {
            return Err(Error::EmptyPointSet);
        }
        if let Some((index, position)) = points.first_non_finite() {
            return Err(Error::NonFinitePosition { index, position });
        }

        let bounds = points.bounds();
        let (center, half_size) = root_cube(bounds);
        log::debug!(
            "point bounds {:?} to {:?}, root at {center} with half-size {half_size}",
            bounds.min(),
            bounds.max()
        );

        let mut octree = Octree::with_policy(center, half_size, policy);
        let discarded = points
            .iter()
            .filter(|&point| octree.insert(point).is_discarded())
            .count();
        if discarded != 0 {
            log::warn!("discarded {discarded} points outside of the octree");
        }

        let model = CompressedModel::new(octree, bounds);
        log::info!(
            "compressed {} points into {} nodes, {} bytes",
            model.vertex_count(),
            model.node_count(),
            model.compressed_size()
        );
        Ok(model)
    }
}

/// Returns the center and half-size of the smallest cube around the center of `bounds` whose
/// containment test accepts every point within `bounds`.
///
/// The half-size is taken from the actual distances to the limits, so it is not affected by
/// rounding of the center.
fn root_cube(bounds: Bounds3) -> (Vec3, f32) {
    let center = bounds.center();
    let half_size = (bounds.max() - center)
        .max(center - bounds.min())
        .max_element();
    (center, half_size)
}
