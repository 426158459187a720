//! Vegetation LOD configuration.

use serde::{Deserialize, Serialize};

/// Per-tier distance cutoffs, capacities, and mesh cost estimates for the
/// vegetation LOD selector.
///
/// Distances are in world units (the terrain surface sits near radius
/// `surface_radius`). Capacities bound instance counts per tier; the
/// billboard tier is the catch-all and defaults to an effectively
/// unbounded capacity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LodConfig {
    /// Maximum viewer distance for fully detailed instances.
    pub detailed_distance: f32,
    /// Maximum viewer distance for simplified instances.
    pub simple_distance: f32,
    /// Maximum viewer distance for billboards; beyond this, instances are
    /// culled entirely.
    pub billboard_distance: f32,

    /// Capacity of the detailed tier.
    pub max_detailed: usize,
    /// Capacity of the simplified tier.
    pub max_simple: usize,
    /// Capacity of the billboard tier (catch-all; keep large).
    pub max_billboard: usize,

    /// Radius of the rendered terrain sphere; placement points sit at
    /// `surface_radius * (1 + elevation * height_scale)`.
    pub surface_radius: f32,
    /// Relief exaggeration applied to placement height.
    pub height_scale: f32,

    /// Uniform scale variation range for detailed/simple instances.
    pub scale_min: f32,
    pub scale_max: f32,

    /// Billboard size grows with distance at this rate...
    pub billboard_growth: f32,
    /// ...clamped between these factors.
    pub billboard_min_factor: f32,
    pub billboard_max_factor: f32,

    /// Vertex counts of the meshes each tier instances, for cost
    /// estimates.
    pub detailed_vertex_count: usize,
    pub simple_vertex_count: usize,
    pub billboard_vertex_count: usize,
    /// Bytes per mesh vertex (position + normal + uv typical).
    pub per_vertex_bytes: usize,
    /// Bytes per instance transform (a 4x4 f32 matrix).
    pub per_instance_bytes: usize,
}

impl Default for LodConfig {
    fn default() -> Self {
        Self {
            detailed_distance: 0.35,
            simple_distance: 0.9,
            billboard_distance: 2.5,
            max_detailed: 256,
            max_simple: 1024,
            max_billboard: usize::MAX >> 1,
            surface_radius: 1.0,
            height_scale: 0.05,
            scale_min: 0.8,
            scale_max: 1.25,
            billboard_growth: 0.6,
            billboard_min_factor: 0.5,
            billboard_max_factor: 2.0,
            detailed_vertex_count: 1800,
            simple_vertex_count: 240,
            billboard_vertex_count: 4,
            per_vertex_bytes: 32,
            per_instance_bytes: 64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_are_ordered_by_distance() {
        let config = LodConfig::default();
        assert!(config.detailed_distance < config.simple_distance);
        assert!(config.simple_distance < config.billboard_distance);
        assert!(config.max_billboard > config.max_detailed + config.max_simple);
    }
}
