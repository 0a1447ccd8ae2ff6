use octocloud_lib::octree::{octant::OctreeDepth, SubdivisionPolicy};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Controls how finely a point cloud is subdivided during compression.
///
/// Missing keys fall back to their defaults when loaded from TOML.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompressorSettings {
    /// Nodes at this depth are never split, regardless of how many points they hold.
    pub max_depth: u8,
    /// A leaf splits once it already holds this many points and another one arrives.
    pub min_points_per_node: usize,
    /// Leaves whose children would have a smaller half-size than this are never split.
    pub min_node_size: f32,
}

impl Default for CompressorSettings {
    fn default() -> Self {
        Self {
            max_depth: OctreeDepth::DEFAULT.get(),
            min_points_per_node: 10,
            min_node_size: 0.01,
        }
    }
}

impl CompressorSettings {
    /// Parses settings from a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Checks that all values are within range.
    pub fn validate(&self) -> Result<()> {
        self.subdivision_policy().map(|_| ())
    }

    /// Converts the settings into the policy used to build the octree.
    pub fn subdivision_policy(&self) -> Result<SubdivisionPolicy> {
        let max_depth = OctreeDepth::new(self.max_depth).ok_or_else(|| {
            Error::InvalidSettings(format!(
                "max_depth must not exceed {}, got {}",
                OctreeDepth::MAX.get(),
                self.max_depth
            ))
        })?;
        if self.min_points_per_node == 0 {
            return Err(Error::InvalidSettings(
                "min_points_per_node must be at least 1".into(),
            ));
        }
        if !self.min_node_size.is_finite() || self.min_node_size < 0.0 {
            return Err(Error::InvalidSettings(format!(
                "min_node_size must be finite and not negative, got {}",
                self.min_node_size
            )));
        }
        Ok(SubdivisionPolicy {
            max_depth,
            leaf_capacity: self.min_points_per_node,
            min_half_size: self.min_node_size,
        })
    }
}
