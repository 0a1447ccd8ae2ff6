//! Compresses colored point clouds by sorting them into an octree.
//!
//! ```
//! use glam::Vec3;
//! use octocloud_compress::{ModelCompressor, OctreeCompressor, Point, PointSet};
//!
//! let points = PointSet::from_points([
//!     Point::new(Vec3::new(0.0, 0.0, 0.0), Vec3::X),
//!     Point::new(Vec3::new(1.0, 2.0, 3.0), Vec3::Y),
//! ]);
//! let model = OctreeCompressor::default().compress(&points)?;
//! assert_eq!(model.vertex_count(), 2);
//! assert_eq!(model.decompress().len(), 2);
//! # Ok::<(), octocloud_compress::Error>(())
//! ```

pub mod compressed;
pub mod compressor;
pub mod debug_boxes;
pub mod error;
pub mod point;
pub mod settings;

pub use compressed::CompressedModel;
pub use compressor::{ModelCompressor, OctreeCompressor};
pub use debug_boxes::{extract_bounding_boxes, BoundingBox};
pub use error::{Error, Result};
pub use point::{Point, PointSet};
pub use settings::CompressorSettings;
