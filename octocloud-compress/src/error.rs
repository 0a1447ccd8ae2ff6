use glam::Vec3;
use thiserror::Error;

/// Result type for all fallible point cloud operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that occur while preparing or compressing a point cloud.
#[derive(Error, Debug)]
pub enum Error {
    /// Compressing requires at least one point.
    #[error("the point set does not contain any points")]
    EmptyPointSet,

    /// Every position needs exactly one color.
    #[error("got {positions} positions but {colors} colors")]
    MismatchedLengths { positions: usize, colors: usize },

    /// Positions with NaN or infinite coordinates cannot be sorted into an octree.
    #[error("position {index} is not finite: {position}")]
    NonFinitePosition { index: usize, position: Vec3 },

    #[error("invalid compressor settings: {0}")]
    InvalidSettings(String),

    /// [toml::de::Error]
    #[error(transparent)]
    SettingsParse(#[from] toml::de::Error),
}
