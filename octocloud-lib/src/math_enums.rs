use enum_map::Enum;
use enumset::{EnumSet, EnumSetType};
use glam::{BVec3, Vec3};

macro_rules! impl_from_for_vec {
    { $enum_type:ident for $value_type:ident {
        $( $variant:ident => ( $( $value:expr ),* ), )*
    } } => {
        impl From<$enum_type> for $value_type {
            fn from(value: $enum_type) -> Self {
                match value {
                    $( <$enum_type>::$variant => Self::new( $( $value as _ ),* ), )*
                }
            }
        }
    };
}

/// A three-dimensional axis; `X`, `Y`, or `Z`.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Enum, EnumSetType)]
#[enumset(no_super_impls)]
pub enum Axis3 {
    X,
    Y,
    Z,
}

/// A set of three-dimensional axes.
pub type Axes3 = EnumSet<Axis3>;

/// A three-dimensional facing direction; left, right, down, up, back or front.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Enum, EnumSetType)]
#[enumset(no_super_impls)]
pub enum Facing3 {
    X0,
    X1,
    Y0,
    Y1,
    Z0,
    Z1,
}

impl Facing3 {
    /// Returns the axis which the facing direction is along.
    pub fn axis(self) -> Axis3 {
        match self {
            Self::X0 | Self::X1 => Axis3::X,
            Self::Y0 | Self::Y1 => Axis3::Y,
            Self::Z0 | Self::Z1 => Axis3::Z,
        }
    }
}

impl From<Axis3> for Facing3 {
    fn from(value: Axis3) -> Self {
        match value {
            Axis3::X => Self::X1,
            Axis3::Y => Self::Y1,
            Axis3::Z => Self::Z1,
        }
    }
}

/// A set of three-dimensional facing directions.
pub type Facings3 = EnumSet<Facing3>;

/// A corner of a 3D cube.
///
/// The discriminant doubles as the octant code of the corner: bit 0 is set for the upper half
/// along X, bit 1 along Y and bit 2 along Z.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Enum, EnumSetType)]
#[enumset(no_super_impls)]
pub enum Corner3 {
    X0Y0Z0,
    X1Y0Z0,
    X0Y1Z0,
    X1Y1Z0,
    X0Y0Z1,
    X1Y0Z1,
    X0Y1Z1,
    X1Y1Z1,
}

impl Corner3 {
    /// Returns the corner that lies in the upper half along exactly the given `axes`.
    pub fn from_axes(axes: Axes3) -> Self {
        Self::from_usize(axes.as_usize())
    }

    /// Returns the corner that lies in the upper half along every axis that is `true`.
    pub fn from_upper(upper: BVec3) -> Self {
        Self::from_usize(upper.bitmask() as usize)
    }

    /// Returns the corner of the cube around `center` that `position` falls into.
    ///
    /// Positions lying exactly on a dividing plane count as the lower half.
    pub fn of_position(center: Vec3, position: Vec3) -> Self {
        Self::from_upper(position.cmpgt(center))
    }

    /// Returns the axes along which the corner lies in the upper half.
    pub fn axes(self) -> Axes3 {
        Axes3::from_u8(self as u8)
    }

    /// Returns `-1` or `1` for each axis depending on whether the corner is in the lower or upper
    /// half along that axis.
    pub fn signum(self) -> Vec3 {
        Vec3::from(self) * 2.0 - Vec3::ONE
    }

    /// Returns the corner flipped along the given axis.
    ///
    /// E.g. flipping [`Corner3::X0Y0Z0`] along [`Axis3::X`] returns
    /// [`Corner3::X1Y0Z0`].
    pub fn flipped(self, axis: Axis3) -> Corner3 {
        Self::from_axes(self.axes() ^ axis)
    }
}

impl_from_for_vec! {
    Corner3 for Vec3 {
        X0Y0Z0 => (0, 0, 0),
        X1Y0Z0 => (1, 0, 0),
        X0Y1Z0 => (0, 1, 0),
        X1Y1Z0 => (1, 1, 0),
        X0Y0Z1 => (0, 0, 1),
        X1Y0Z1 => (1, 0, 1),
        X0Y1Z1 => (0, 1, 1),
        X1Y1Z1 => (1, 1, 1),
    }
}

/// An edge of a 3D cube.
///
/// Named after the two fixed coordinates; e.g. [`Edge3::X0Y0`] runs along the Z axis.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Enum, EnumSetType)]
#[enumset(no_super_impls)]
pub enum Edge3 {
    Y0Z0,
    Y1Z0,
    Y0Z1,
    Y1Z1,
    X0Z0,
    X1Z0,
    X0Z1,
    X1Z1,
    X0Y0,
    X1Y0,
    X0Y1,
    X1Y1,
}

impl Edge3 {
    /// Returns the axis that the edge runs along.
    pub fn axis(self) -> Axis3 {
        match self {
            Self::Y0Z0 | Self::Y1Z0 | Self::Y0Z1 | Self::Y1Z1 => Axis3::X,
            Self::X0Z0 | Self::X1Z0 | Self::X0Z1 | Self::X1Z1 => Axis3::Y,
            Self::X0Y0 | Self::X1Y0 | Self::X0Y1 | Self::X1Y1 => Axis3::Z,
        }
    }

    /// Returns the two corners connected by the edge, lower corner first.
    pub fn corners(self) -> [Corner3; 2] {
        let start = match self {
            Self::Y0Z0 | Self::X0Z0 | Self::X0Y0 => Corner3::X0Y0Z0,
            Self::Y1Z0 => Corner3::X0Y1Z0,
            Self::Y0Z1 | Self::X0Z1 => Corner3::X0Y0Z1,
            Self::Y1Z1 => Corner3::X0Y1Z1,
            Self::X1Z0 | Self::X1Y0 => Corner3::X1Y0Z0,
            Self::X1Z1 => Corner3::X1Y0Z1,
            Self::X0Y1 => Corner3::X0Y1Z0,
            Self::X1Y1 => Corner3::X1Y1Z0,
        };
        [start, start.flipped(self.axis())]
    }
}

/// A set of edges of a 3D cube.
pub type Edges3 = EnumSet<Edge3>;
