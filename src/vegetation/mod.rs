//! Vegetation level-of-detail selection.
//!
//! Partitions eligible tiles into capacity-bounded distance tiers
//! (detailed / simplified / billboard) against the live viewer position
//! and computes per-instance transforms. Runs on the render thread, once
//! per viewer-position update; the host throttles how often that is. The
//! selector never runs concurrently with a regeneration pass.
//!
//! Per-instance variation (yaw, scale) is drawn from a sub-stream of the
//! world seed keyed by tile id, so an instance keeps its look across
//! updates and viewer movement.

mod config;

pub use config::LodConfig;

use glam::{Mat3, Mat4, Quat, Vec3};
use rand::Rng;

use crate::rng::Mulberry32;
use crate::world::World;

/// Stream salt separating vegetation draws from generation draws.
const VEGETATION_STREAM: u32 = 0x7665_6774;

/// The three representation tiers, nearest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LodTier {
    Detailed,
    Simple,
    Billboard,
}

impl LodTier {
    pub const ALL: [LodTier; 3] = [LodTier::Detailed, LodTier::Simple, LodTier::Billboard];

    pub fn name(&self) -> &'static str {
        match self {
            LodTier::Detailed => "detailed",
            LodTier::Simple => "simple",
            LodTier::Billboard => "billboard",
        }
    }
}

/// One instance placement, ready for an instanced draw.
#[derive(Debug, Clone, Copy)]
pub struct InstanceTransform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl InstanceTransform {
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

/// Instances selected for one tier.
#[derive(Debug, Clone, Default)]
pub struct TierInstances {
    pub transforms: Vec<InstanceTransform>,
}

impl TierInstances {
    pub fn count(&self) -> usize {
        self.transforms.len()
    }
}

/// Output of one selection pass, consumed by the rendering collaborator.
#[derive(Debug, Clone, Default)]
pub struct LodSelection {
    pub detailed: TierInstances,
    pub simple: TierInstances,
    pub billboard: TierInstances,
}

impl LodSelection {
    pub fn tier(&self, tier: LodTier) -> &TierInstances {
        match tier {
            LodTier::Detailed => &self.detailed,
            LodTier::Simple => &self.simple,
            LodTier::Billboard => &self.billboard,
        }
    }

    pub fn total(&self) -> usize {
        self.detailed.count() + self.simple.count() + self.billboard.count()
    }

    /// Estimated GPU memory for this selection:
    /// Σ_tier (vertices × per-vertex bytes + instances × transform bytes).
    pub fn memory_estimate(&self, config: &LodConfig) -> usize {
        let mesh = |verts: usize, instances: usize| {
            verts * config.per_vertex_bytes + instances * config.per_instance_bytes
        };
        mesh(config.detailed_vertex_count, self.detailed.count())
            + mesh(config.simple_vertex_count, self.simple.count())
            + mesh(config.billboard_vertex_count, self.billboard.count())
    }
}

/// Distance-tiered vegetation selector.
pub struct VegetationLodSelector {
    config: LodConfig,
    seed: u32,
}

impl VegetationLodSelector {
    /// `seed` ties per-instance variation to a world; pass the world's
    /// resolved seed so regenerating with the same settings reproduces the
    /// same vegetation.
    pub fn new(config: LodConfig, seed: u32) -> Self {
        Self { config, seed }
    }

    pub fn config(&self) -> &LodConfig {
        &self.config
    }

    /// Runs one selection pass against the current viewer position.
    pub fn select(&self, world: &World, viewer: Vec3) -> LodSelection {
        let cfg = &self.config;

        // Eligible tiles with placement points and distances.
        let mut candidates: Vec<(u32, Vec3, f32)> = world
            .tiles()
            .filter(|t| t.terrain.map(|tr| tr.hosts_vegetation()).unwrap_or(false))
            .map(|t| {
                let radius = cfg.surface_radius
                    * (1.0 + t.elevation.max(0.0) * cfg.height_scale);
                let position = t.center * radius;
                (t.id.0, position, (viewer - position).length())
            })
            .collect();

        // Stable sort: equidistant candidates keep arena order.
        candidates.sort_by(|a, b| a.2.total_cmp(&b.2));

        let mut selection = LodSelection::default();
        for (tile_id, position, distance) in candidates {
            let up = position.normalize_or_zero();
            if up == Vec3::ZERO {
                continue;
            }

            let tier = self.assign_tier(distance, &selection);
            match tier {
                Some(LodTier::Billboard) => {
                    selection.billboard.transforms.push(self.billboard_transform(
                        position, up, viewer, distance,
                    ));
                }
                Some(tier) => {
                    let transform = self.surface_transform(tile_id, position, up);
                    match tier {
                        LodTier::Detailed => selection.detailed.transforms.push(transform),
                        LodTier::Simple => selection.simple.transforms.push(transform),
                        LodTier::Billboard => unreachable!(),
                    }
                }
                None => {}
            }
        }

        selection
    }

    /// Nearest tier whose distance cutoff admits the candidate and whose
    /// capacity is not exhausted, falling through to farther tiers.
    fn assign_tier(&self, distance: f32, selection: &LodSelection) -> Option<LodTier> {
        let cfg = &self.config;
        if distance <= cfg.detailed_distance && selection.detailed.count() < cfg.max_detailed {
            return Some(LodTier::Detailed);
        }
        if distance <= cfg.simple_distance && selection.simple.count() < cfg.max_simple {
            return Some(LodTier::Simple);
        }
        if distance <= cfg.billboard_distance && selection.billboard.count() < cfg.max_billboard {
            return Some(LodTier::Billboard);
        }
        None
    }

    /// Full transform for the near tiers: model up aligned to the surface
    /// normal, a stable per-tile yaw, and bounded scale variation.
    fn surface_transform(&self, tile_id: u32, position: Vec3, up: Vec3) -> InstanceTransform {
        let mut rng = Mulberry32::stream(self.seed ^ VEGETATION_STREAM, tile_id);
        let yaw = rng.random_range(0.0..std::f32::consts::TAU);
        let scale = rng.random_range(self.config.scale_min..=self.config.scale_max);

        let align = Quat::from_rotation_arc(Vec3::Y, up);
        let rotation = align * Quat::from_rotation_y(yaw);

        InstanceTransform {
            position,
            rotation,
            scale: Vec3::splat(scale),
        }
    }

    /// Billboard transform: a basis facing the viewer built from the view
    /// direction and a fixed up vector, with distance-scaled size.
    fn billboard_transform(
        &self,
        position: Vec3,
        surface_up: Vec3,
        viewer: Vec3,
        distance: f32,
    ) -> InstanceTransform {
        let cfg = &self.config;

        let forward = (viewer - position).normalize_or_zero();
        let forward = if forward == Vec3::ZERO { Vec3::Z } else { forward };

        // Fixed up keeps billboards upright; fall back to the surface
        // normal when the viewer is straight overhead.
        let mut right = Vec3::Y.cross(forward);
        if right.length_squared() < 1e-6 {
            right = surface_up.cross(forward);
        }
        let right = right.normalize();
        let up = forward.cross(right);
        let rotation = Quat::from_mat3(&Mat3::from_cols(right, up, forward));

        let factor = (distance * cfg.billboard_growth)
            .clamp(cfg.billboard_min_factor, cfg.billboard_max_factor);

        InstanceTransform {
            position,
            rotation,
            scale: Vec3::splat(factor),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::WorldSettings;

    fn world() -> World {
        // A slight positive bias guarantees enough vegetated land tiles.
        World::generate(WorldSettings {
            elevation_bias: 0.15,
            ..WorldSettings::earth_like(42.into())
        })
        .unwrap()
    }

    fn eligible_count(world: &World) -> usize {
        world
            .tiles()
            .filter(|t| t.terrain.map(|tr| tr.hosts_vegetation()).unwrap_or(false))
            .count()
    }

    #[test]
    fn capacities_are_never_exceeded() {
        let world = world();
        let config = LodConfig {
            max_detailed: 3,
            max_simple: 7,
            detailed_distance: 10.0,
            simple_distance: 10.0,
            billboard_distance: 10.0,
            ..Default::default()
        };
        let selector = VegetationLodSelector::new(config.clone(), 42);
        let selection = selector.select(&world, Vec3::new(0.0, 0.0, 1.5));

        assert!(selection.detailed.count() <= config.max_detailed);
        assert!(selection.simple.count() <= config.max_simple);
        assert_eq!(selection.detailed.count(), 3.min(eligible_count(&world)));
    }

    #[test]
    fn selection_never_outnumbers_eligible_tiles() {
        let world = world();
        let selector = VegetationLodSelector::new(
            LodConfig {
                detailed_distance: 100.0,
                simple_distance: 100.0,
                billboard_distance: 100.0,
                ..Default::default()
            },
            42,
        );
        let selection = selector.select(&world, Vec3::new(0.0, 0.0, 1.2));
        assert!(selection.total() <= eligible_count(&world));
    }

    #[test]
    fn far_instances_are_culled() {
        let world = world();
        let selector = VegetationLodSelector::new(LodConfig::default(), 42);
        // Viewer far beyond the billboard cutoff sees nothing.
        let selection = selector.select(&world, Vec3::new(0.0, 0.0, 100.0));
        assert_eq!(selection.total(), 0);
    }

    #[test]
    fn near_tier_fills_before_fallthrough() {
        let world = world();
        let config = LodConfig {
            max_detailed: 2,
            detailed_distance: 10.0,
            simple_distance: 10.0,
            billboard_distance: 10.0,
            ..Default::default()
        };
        let selector = VegetationLodSelector::new(config, 42);
        let selection = selector.select(&world, Vec3::new(0.0, 0.0, 1.2));

        if eligible_count(&world) > 2 {
            assert_eq!(selection.detailed.count(), 2);
            assert!(selection.simple.count() > 0);
        }
    }

    #[test]
    fn selection_is_stable_across_repeated_updates() {
        let world = world();
        let selector = VegetationLodSelector::new(LodConfig::default(), 42);
        let viewer = Vec3::new(0.3, 0.4, 1.1);

        let a = selector.select(&world, viewer);
        let b = selector.select(&world, viewer);
        assert_eq!(a.total(), b.total());
        for (ta, tb) in a
            .detailed
            .transforms
            .iter()
            .zip(&b.detailed.transforms)
        {
            assert_eq!(ta.position, tb.position);
            assert_eq!(ta.rotation, tb.rotation);
            assert_eq!(ta.scale, tb.scale);
        }
    }

    #[test]
    fn surface_instances_stand_on_their_tiles() {
        let world = world();
        let selector = VegetationLodSelector::new(
            LodConfig {
                detailed_distance: 10.0,
                simple_distance: 10.0,
                billboard_distance: 10.0,
                ..Default::default()
            },
            42,
        );
        let selection = selector.select(&world, Vec3::new(0.0, 0.0, 1.2));

        for t in &selection.detailed.transforms {
            // Model up axis should match the surface normal.
            let up = t.rotation * Vec3::Y;
            let normal = t.position.normalize();
            assert!(up.dot(normal) > 0.99);

            let scale = t.scale.x;
            assert!(scale >= LodConfig::default().scale_min);
            assert!(scale <= LodConfig::default().scale_max);
        }
    }

    #[test]
    fn billboards_face_the_viewer() {
        let world = world();
        let config = LodConfig {
            detailed_distance: 0.0,
            simple_distance: 0.0,
            max_detailed: 0,
            max_simple: 0,
            billboard_distance: 10.0,
            ..Default::default()
        };
        let selector = VegetationLodSelector::new(config.clone(), 42);
        let viewer = Vec3::new(0.0, 0.0, 3.0);
        let selection = selector.select(&world, viewer);
        assert!(selection.billboard.count() > 0);

        for t in &selection.billboard.transforms {
            let forward = t.rotation * Vec3::Z;
            let to_viewer = (viewer - t.position).normalize();
            assert!(forward.dot(to_viewer) > 0.99);

            let factor = t.scale.x;
            assert!(factor >= config.billboard_min_factor);
            assert!(factor <= config.billboard_max_factor);
        }
    }

    #[test]
    fn memory_estimate_counts_vertices_and_instances() {
        let config = LodConfig::default();
        let mut selection = LodSelection::default();
        selection.detailed.transforms.push(InstanceTransform {
            position: Vec3::X,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        });

        let expected = config.detailed_vertex_count * config.per_vertex_bytes
            + config.per_instance_bytes
            + config.simple_vertex_count * config.per_vertex_bytes
            + config.billboard_vertex_count * config.per_vertex_bytes;
        assert_eq!(selection.memory_estimate(&config), expected);
    }
}
