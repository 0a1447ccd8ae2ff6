use glam::Vec3;
use itertools::Itertools;
use octocloud_lib::{math::bounds::Bounds3, octree::Positioned};

use crate::error::{Error, Result};

/// A single colored point of a point cloud.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub position: Vec3,
    /// Linear RGB, usually within `0..=1`.
    pub color: Vec3,
}

impl Point {
    pub fn new(position: Vec3, color: Vec3) -> Self {
        Self { position, color }
    }
}

impl Positioned for Point {
    fn position(&self) -> Vec3 {
        self.position
    }
}

/// A point cloud stored as parallel position and color lists together with its bounding box.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointSet {
    positions: Vec<Vec3>,
    colors: Vec<Vec3>,
    /// Smallest box enclosing all positions; [`Bounds3::default`] when empty.
    bounds: Bounds3,
}

impl PointSet {
    /// Constructs a [`PointSet`] from parallel `positions` and `colors`.
    ///
    /// Fails with [`Error::MismatchedLengths`] unless every position has exactly one color.
    pub fn new(positions: Vec<Vec3>, colors: Vec<Vec3>) -> Result<Self> {
        if positions.len() != colors.len() {
            return Err(Error::MismatchedLengths {
                positions: positions.len(),
                colors: colors.len(),
            });
        }
        let bounds = Bounds3::from_points(positions.iter().copied()).unwrap_or_default();
        Ok(Self {
            positions,
            colors,
            bounds,
        })
    }

    /// Constructs a [`PointSet`] from individual points, keeping their order.
    pub fn from_points(points: impl IntoIterator<Item = Point>) -> Self {
        let (positions, colors): (Vec<_>, Vec<_>) = points
            .into_iter()
            .map(|point| (point.position, point.color))
            .unzip();
        let bounds = Bounds3::from_points(positions.iter().copied()).unwrap_or_default();
        Self {
            positions,
            colors,
            bounds,
        }
    }

    /// The smallest box enclosing all positions.
    ///
    /// Positions containing NaN are ignored by the comparison and may leave the box too small,
    /// see [`Self::is_valid`].
    pub fn bounds(&self) -> Bounds3 {
        self.bounds
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn colors(&self) -> &[Vec3] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Iterates over all points in order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = Point> + '_ {
        self.positions
            .iter()
            .zip(&self.colors)
            .map(|(&position, &color)| Point::new(position, color))
    }

    /// Returns the index and position of the first position that is NaN or infinite.
    pub fn first_non_finite(&self) -> Option<(usize, Vec3)> {
        self.positions
            .iter()
            .copied()
            .find_position(|position| !position.is_finite())
    }

    /// Whether the point set can be compressed; it must not be empty and all positions must be
    /// finite.
    pub fn is_valid(&self) -> bool {
        !self.is_empty() && self.first_non_finite().is_none()
    }

    /// Flattens the points into `x y z r g b` per point, the layout of an interleaved vertex
    /// buffer.
    pub fn interleaved(&self) -> Vec<f32> {
        self.iter()
            .flat_map(|point| {
                point
                    .position
                    .to_array()
                    .into_iter()
                    .chain(point.color.to_array())
            })
            .collect()
    }
}

impl FromIterator<Point> for PointSet {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        Self::from_points(iter)
    }
}
