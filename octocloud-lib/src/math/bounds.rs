use glam::Vec3;

/// Floating point axis-aligned bounds in 3D-space.
///
/// Both limits are inclusive, so a point lying exactly on a face is contained.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Bounds3 {
    /// The inclusive lower limit of the bounds.
    min: Vec3,
    /// The inclusive upper limit of the bounds.
    max: Vec3,
}

impl Bounds3 {
    /// Bounds covering only the origin.
    pub const ZERO: Self = Self {
        min: Vec3::ZERO,
        max: Vec3::ZERO,
    };

    /// Constructs [`Bounds3`] from the given inclusive `min` and `max`.
    ///
    /// # Panics
    ///
    /// Panics if `min` exceeds `max` along any axis or either contains NaN.
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self::checked_new(min, max).expect("min bounds must not exceed max bounds")
    }

    /// Constructs [`Bounds3`] from the given inclusive `min` and `max`.
    ///
    /// Returns [`None`] if `min` exceeds `max` along any axis or either contains NaN.
    pub fn checked_new(min: Vec3, max: Vec3) -> Option<Self> {
        min.cmple(max).all().then_some(Self { min, max })
    }

    /// Constructs the cube that extends `half_size` from `center` along every axis.
    ///
    /// Returns [`None`] if `half_size` is negative or NaN.
    pub fn cube(center: Vec3, half_size: f32) -> Option<Self> {
        let half_size = Vec3::splat(half_size);
        Self::checked_new(center - half_size, center + half_size)
    }

    /// Constructs the smallest [`Bounds3`] enclosing all `points`.
    ///
    /// Returns [`None`] if there are no points.
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        Some(points.fold(
            Self {
                min: first,
                max: first,
            },
            Self::extend,
        ))
    }

    /// The inclusive lower limit of the bounds.
    pub fn min(self) -> Vec3 {
        self.min
    }

    /// The inclusive upper limit of the bounds.
    pub fn max(self) -> Vec3 {
        self.max
    }

    /// The midpoint of the bounds.
    pub fn center(self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// The size of the bounds along each axis.
    pub fn size(self) -> Vec3 {
        self.max - self.min
    }

    /// Half the size of the bounds along each axis.
    pub fn half_size(self) -> Vec3 {
        self.size() * 0.5
    }

    pub fn contains(self, point: Vec3) -> bool {
        self.min.cmple(point).all() && point.cmple(self.max).all()
    }

    /// Whether the two bounds share at least a single point.
    pub fn overlaps(self, other: Self) -> bool {
        self.min.cmple(other.max).all() && other.min.cmple(self.max).all()
    }

    pub fn encloses(self, other: Self) -> bool {
        self.min.cmple(other.min).all() && other.max.cmple(self.max).all()
    }

    /// Grows the bounds just enough to contain `point`.
    pub fn extend(self, point: Vec3) -> Self {
        Self {
            min: self.min.min(point),
            max: self.max.max(point),
        }
    }
}
