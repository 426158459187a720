//! World arena and the generation entry point.
//!
//! A [`World`] owns the tile arena, the plate set, and the terrain
//! registry for one generated planet. Generation is all-or-nothing: the
//! pass builds a private world and returns it only on success, so the
//! caller's previous world is never left half-mutated. One world is live
//! per session; regeneration replaces it wholesale.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::GenError;
use crate::pipeline::Pipeline;
use crate::rng::{Mulberry32, Seed};
use crate::tectonics::{Plate, PlateId};
use crate::terrain::{Rgb, TerrainId, TerrainRegistry, TerrainSample};
use crate::tiling::{PointDistribution, Tile, TileId};
use crate::vegetation::{LodSelection, VegetationLodSelector};

/// Settings for one generation pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldSettings {
    /// Number of surface tiles; controls tiling density.
    pub num_tiles: u32,
    /// Site irregularity in [0, 1]; values outside are clamped.
    pub jitter: f32,
    /// Number of tectonic plates; must not exceed `num_tiles`.
    pub num_plates: u32,
    /// Base point-distribution variant.
    pub algorithm: PointDistribution,
    /// Added uniformly to all tile elevations after plate assignment.
    pub elevation_bias: f32,
    /// Fixes the entire PRNG-derived sequence.
    pub seed: Seed,
}

impl WorldSettings {
    /// Earth-like defaults at a comfortable interactive density.
    pub fn earth_like(seed: Seed) -> Self {
        Self {
            num_tiles: 600,
            jitter: 0.5,
            num_plates: 12,
            algorithm: PointDistribution::Fibonacci,
            elevation_bias: 0.0,
            seed,
        }
    }

    /// Rejects settings the pipeline cannot honor.
    pub fn validate(&self) -> Result<(), GenError> {
        if self.num_tiles == 0 {
            return Err(GenError::Config("numTiles must be positive".into()));
        }
        if self.num_plates == 0 {
            return Err(GenError::Config("numPlates must be at least 1".into()));
        }
        if self.num_plates > self.num_tiles {
            return Err(GenError::Config(format!(
                "numPlates ({}) exceeds numTiles ({})",
                self.num_plates, self.num_tiles
            )));
        }
        Ok(())
    }
}

/// A generated planet: tiles, plates, and the classification registry.
pub struct World {
    settings: WorldSettings,
    pub(crate) tiles: Vec<Tile>,
    pub(crate) plates: Vec<Plate>,
    registry: TerrainRegistry,
}

impl World {
    /// An empty world shell for a pipeline to fill. Most callers want
    /// [`World::generate`].
    pub fn with_settings(settings: WorldSettings) -> Self {
        Self {
            settings,
            tiles: Vec::new(),
            plates: Vec::new(),
            registry: TerrainRegistry::standard(),
        }
    }

    /// Runs a full generation pass with the standard pipeline.
    ///
    /// Validates settings first; any failure leaves the caller's existing
    /// world untouched since the new arena is private until returned.
    pub fn generate(settings: WorldSettings) -> Result<Self, GenError> {
        Self::generate_with(settings, &Pipeline::standard())
    }

    /// Runs a full generation pass with a caller-assembled pipeline.
    pub fn generate_with(settings: WorldSettings, pipeline: &Pipeline) -> Result<Self, GenError> {
        settings.validate()?;
        let mut rng = Mulberry32::from_seed(&settings.seed);
        let mut world = Self::with_settings(settings);
        pipeline.run(&mut world, &mut rng)?;
        Ok(world)
    }

    pub fn settings(&self) -> &WorldSettings {
        &self.settings
    }

    /// The resolved 32-bit seed driving this world's PRNG streams.
    pub fn seed_u32(&self) -> u32 {
        self.settings.seed.to_u32()
    }

    pub fn num_tiles(&self) -> usize {
        self.tiles.len()
    }

    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(id.index())
    }

    /// Iterates tiles in insertion (arena) order.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    pub fn for_each_tile<F: FnMut(&Tile)>(&self, mut f: F) {
        for tile in &self.tiles {
            f(tile);
        }
    }

    pub fn plates(&self) -> &[Plate] {
        &self.plates
    }

    pub fn plate(&self, id: PlateId) -> Option<&Plate> {
        self.plates.get(id.index())
    }

    pub fn registry(&self) -> &TerrainRegistry {
        &self.registry
    }

    /// Classifies a tile by id; a missing id resolves to the fallback
    /// terrain rather than an error.
    pub fn classify(&self, id: TileId) -> TerrainId {
        self.registry.classify_tile(self.tile(id))
    }

    /// Re-runs classification over the current tile fields without
    /// regenerating. Water-connectivity flags are not recomputed here;
    /// pair with [`World::set_elevation_bias`] for bias-only tweaks.
    pub fn reclassify(&mut self) {
        let terrains: Vec<TerrainId> = self
            .tiles
            .iter()
            .map(|t| self.registry.classify(&TerrainSample::from(t)))
            .collect();
        for (tile, terrain) in self.tiles.iter_mut().zip(terrains) {
            tile.terrain = Some(terrain);
        }
    }

    /// Shifts every tile's elevation to match a new bias, then
    /// reclassifies. Cheaper than a full regeneration when only the bias
    /// changed.
    pub fn set_elevation_bias(&mut self, bias: f32) {
        let delta = bias - self.settings.elevation_bias;
        self.settings.elevation_bias = bias;
        if delta != 0.0 {
            for tile in self.tiles.iter_mut() {
                tile.elevation = (tile.elevation + delta).clamp(-1.0, 1.0);
            }
        }
        self.reclassify();
    }

    /// Display color for a terrain at an elevation.
    pub fn color_for(&self, terrain: TerrainId, elevation: f32) -> Rgb {
        self.registry.color_for(terrain, elevation)
    }

    /// Bucketed color for a normalized temperature.
    pub fn color_for_temperature(&self, value: f32) -> Rgb {
        self.registry.color_for_temperature(value)
    }

    /// Bucketed color for a normalized moisture.
    pub fn color_for_moisture(&self, value: f32) -> Rgb {
        self.registry.color_for_moisture(value)
    }

    /// Runs one vegetation LOD pass against the viewer position.
    pub fn update_lod(&self, selector: &VegetationLodSelector, viewer: Vec3) -> LodSelection {
        selector.select(self, viewer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(num_tiles: u32, num_plates: u32, seed: u32) -> WorldSettings {
        WorldSettings {
            num_tiles,
            jitter: 0.5,
            num_plates,
            algorithm: PointDistribution::Fibonacci,
            elevation_bias: 0.0,
            seed: seed.into(),
        }
    }

    #[test]
    fn generation_is_bit_identical_per_seed() {
        let a = World::generate(settings(100, 8, 42)).unwrap();
        let b = World::generate(settings(100, 8, 42)).unwrap();

        let a_elev: Vec<f32> = a.tiles().map(|t| t.elevation).collect();
        let b_elev: Vec<f32> = b.tiles().map(|t| t.elevation).collect();
        assert_eq!(a_elev, b_elev);

        let a_plates: Vec<_> = a.tiles().map(|t| t.plate).collect();
        let b_plates: Vec<_> = b.tiles().map(|t| t.plate).collect();
        assert_eq!(a_plates, b_plates);

        let a_terrain: Vec<_> = a.tiles().map(|t| t.terrain).collect();
        let b_terrain: Vec<_> = b.tiles().map(|t| t.terrain).collect();
        assert_eq!(a_terrain, b_terrain);
    }

    #[test]
    fn different_seeds_differ() {
        let a = World::generate(settings(100, 8, 1)).unwrap();
        let b = World::generate(settings(100, 8, 2)).unwrap();
        let same = a
            .tiles()
            .zip(b.tiles())
            .filter(|(x, y)| x.plate == y.plate)
            .count();
        assert!(same < 100);
    }

    #[test]
    fn string_seeds_generate() {
        let world = World::generate(WorldSettings {
            seed: "terra nova".into(),
            ..settings(80, 6, 0)
        })
        .unwrap();
        assert_eq!(world.num_tiles(), 80);
    }

    #[test]
    fn plates_exceeding_tiles_is_a_config_error() {
        let result = World::generate(settings(5, 10, 1));
        assert!(matches!(result, Err(GenError::Config(_))));
    }

    #[test]
    fn zero_tiles_is_a_config_error() {
        let result = World::generate(settings(0, 1, 1));
        assert!(matches!(result, Err(GenError::Config(_))));
    }

    #[test]
    fn failed_generation_leaves_previous_world_usable() {
        let old = World::generate(settings(50, 4, 3)).unwrap();
        let old_elev: Vec<f32> = old.tiles().map(|t| t.elevation).collect();

        assert!(World::generate(settings(5, 10, 3)).is_err());

        // The old world is untouched by the failed pass.
        let still: Vec<f32> = old.tiles().map(|t| t.elevation).collect();
        assert_eq!(old_elev, still);
    }

    #[test]
    fn every_tile_is_classified_and_plated() {
        let world = World::generate(settings(120, 7, 9)).unwrap();
        for tile in world.tiles() {
            assert!(tile.plate.is_some());
            assert!(tile.terrain.is_some());
        }
    }

    #[test]
    fn tile_lookup_by_id() {
        let world = World::generate(settings(60, 4, 5)).unwrap();
        assert!(world.tile(TileId(0)).is_some());
        assert!(world.tile(TileId(59)).is_some());
        assert!(world.tile(TileId(60)).is_none());
    }

    #[test]
    fn classify_of_missing_tile_falls_back() {
        let world = World::generate(settings(60, 4, 5)).unwrap();
        assert_eq!(
            world.classify(TileId(9999)),
            crate::terrain::FALLBACK_TERRAIN
        );
    }

    #[test]
    fn classify_agrees_with_stored_terrain() {
        let world = World::generate(settings(100, 8, 42)).unwrap();
        for tile in world.tiles() {
            assert_eq!(world.classify(tile.id), tile.terrain.unwrap());
        }
    }

    #[test]
    fn raising_the_bias_drowns_less_land() {
        let mut world = World::generate(settings(150, 8, 11)).unwrap();
        let land_before = world.tiles().filter(|t| t.elevation > 0.0).count();

        world.set_elevation_bias(0.3);
        let land_after = world.tiles().filter(|t| t.elevation > 0.0).count();
        assert!(land_after >= land_before);

        // Terrain was refreshed to match the shifted elevations.
        for tile in world.tiles() {
            assert_eq!(world.classify(tile.id), tile.terrain.unwrap());
        }
    }

    #[test]
    fn for_each_tile_visits_in_arena_order() {
        let world = World::generate(settings(40, 4, 2)).unwrap();
        let mut expected = 0u32;
        world.for_each_tile(|tile| {
            assert_eq!(tile.id.0, expected);
            expected += 1;
        });
        assert_eq!(expected, 40);
    }
}
