//! Generation stage trait and pipeline orchestration.

use std::time::Instant;

use crate::climate::{derive_climate, ClimateConfig};
use crate::error::GenError;
use crate::rng::Mulberry32;
use crate::tectonics::{assign_plates, BoundaryUplift, PlateConfig, RelativeMotionUplift};
use crate::terrain::TerrainSample;
use crate::tiling::build_tiles;
use crate::world::World;

/// Unique identifier for generation stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageId {
    /// Sphere tiling and adjacency graph.
    Tiling,
    /// Plate partition and elevation derivation.
    Plates,
    /// Water bodies, moisture, and temperature.
    Climate,
    /// Terrain classification.
    Classify,
}

impl StageId {
    pub fn name(&self) -> &'static str {
        match self {
            StageId::Tiling => "tiling",
            StageId::Plates => "plates",
            StageId::Climate => "climate",
            StageId::Classify => "classify",
        }
    }
}

/// Trait for implementing generation stages.
///
/// Each stage transforms the world arena in place, building on previous
/// stages. Stages run synchronously on one thread with the pass PRNG
/// threaded through in order; there is no hidden generator state.
pub trait GenerationStage: Send + Sync {
    /// Returns the unique identifier for this stage.
    fn id(&self) -> StageId;

    /// Returns a human-readable name for the stage.
    fn name(&self) -> &str;

    /// Returns the stage IDs that must be executed before this stage.
    fn dependencies(&self) -> &[StageId] {
        &[]
    }

    /// Executes the stage, mutating the world in place.
    fn execute(&self, world: &mut World, rng: &mut Mulberry32) -> Result<(), GenError>;
}

/// Orchestrates generation stages into a complete pass.
pub struct Pipeline {
    stages: Vec<Box<dyn GenerationStage>>,
}

impl Pipeline {
    /// Creates an empty pipeline.
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// The standard pass: tiling, plates, climate, classification.
    pub fn standard() -> Self {
        let mut pipeline = Self::new();
        pipeline
            .add_stage(TilingStage)
            .add_stage(PlateStage::earth_like())
            .add_stage(ClimateStage::new(ClimateConfig::earth_like()))
            .add_stage(ClassifyStage);
        pipeline
    }

    /// Adds a stage to the pipeline.
    pub fn add_stage<S: GenerationStage + 'static>(&mut self, stage: S) -> &mut Self {
        self.stages.push(Box::new(stage));
        self
    }

    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Executes all stages in order on the given world.
    pub fn run(&self, world: &mut World, rng: &mut Mulberry32) -> Result<(), GenError> {
        let mut completed: Vec<StageId> = Vec::new();

        for stage in &self.stages {
            for dep in stage.dependencies() {
                if !completed.contains(dep) {
                    return Err(GenError::MissingDependency {
                        stage: stage.id().name(),
                        requires: dep.name(),
                    });
                }
            }

            let start = Instant::now();
            stage.execute(world, rng)?;
            log::debug!("stage '{}' completed in {:?}", stage.name(), start.elapsed());

            completed.push(stage.id());
        }

        Ok(())
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::standard()
    }
}

/// Sphere tiling stage.
pub struct TilingStage;

impl GenerationStage for TilingStage {
    fn id(&self) -> StageId {
        StageId::Tiling
    }

    fn name(&self) -> &str {
        "Sphere Tiling"
    }

    fn execute(&self, world: &mut World, rng: &mut Mulberry32) -> Result<(), GenError> {
        let settings = world.settings().clone();
        world.tiles = build_tiles(
            settings.num_tiles as usize,
            settings.jitter,
            settings.algorithm,
            rng,
        )?;
        Ok(())
    }
}

/// Plate partition stage.
pub struct PlateStage {
    pub config: PlateConfig,
    uplift: Box<dyn BoundaryUplift>,
}

impl PlateStage {
    pub fn new(config: PlateConfig) -> Self {
        let uplift = Box::new(RelativeMotionUplift::new(config.uplift_scale));
        Self { config, uplift }
    }

    pub fn earth_like() -> Self {
        Self::new(PlateConfig::earth_like())
    }

    /// Replaces the boundary uplift strategy.
    pub fn with_uplift(mut self, uplift: Box<dyn BoundaryUplift>) -> Self {
        self.uplift = uplift;
        self
    }
}

impl GenerationStage for PlateStage {
    fn id(&self) -> StageId {
        StageId::Plates
    }

    fn name(&self) -> &str {
        "Plate Partition"
    }

    fn dependencies(&self) -> &[StageId] {
        &[StageId::Tiling]
    }

    fn execute(&self, world: &mut World, rng: &mut Mulberry32) -> Result<(), GenError> {
        let num_plates = world.settings().num_plates as usize;
        let bias = world.settings().elevation_bias;
        world.plates = assign_plates(
            &mut world.tiles,
            num_plates,
            &self.config,
            self.uplift.as_ref(),
            bias,
            rng,
        )?;
        Ok(())
    }
}

/// Climate derivation stage.
pub struct ClimateStage {
    pub config: ClimateConfig,
}

impl ClimateStage {
    pub fn new(config: ClimateConfig) -> Self {
        Self { config }
    }
}

impl GenerationStage for ClimateStage {
    fn id(&self) -> StageId {
        StageId::Climate
    }

    fn name(&self) -> &str {
        "Climate Derivation"
    }

    fn dependencies(&self) -> &[StageId] {
        &[StageId::Plates]
    }

    fn execute(&self, world: &mut World, rng: &mut Mulberry32) -> Result<(), GenError> {
        derive_climate(&mut world.tiles, &self.config, rng);
        Ok(())
    }
}

/// Terrain classification stage.
pub struct ClassifyStage;

impl GenerationStage for ClassifyStage {
    fn id(&self) -> StageId {
        StageId::Classify
    }

    fn name(&self) -> &str {
        "Terrain Classification"
    }

    fn dependencies(&self) -> &[StageId] {
        &[StageId::Climate]
    }

    fn execute(&self, world: &mut World, _rng: &mut Mulberry32) -> Result<(), GenError> {
        let terrains: Vec<_> = world
            .tiles
            .iter()
            .map(|t| world.registry().classify(&TerrainSample::from(t)))
            .collect();
        for (tile, terrain) in world.tiles.iter_mut().zip(terrains) {
            tile.terrain = Some(terrain);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::WorldSettings;

    #[test]
    fn standard_pipeline_has_four_stages() {
        assert_eq!(Pipeline::standard().stage_count(), 4);
    }

    #[test]
    fn stages_out_of_order_report_missing_dependency() {
        let mut pipeline = Pipeline::new();
        pipeline.add_stage(ClassifyStage);

        let mut world = World::with_settings(WorldSettings::earth_like(1.into()));
        let mut rng = Mulberry32::new(1);
        let result = pipeline.run(&mut world, &mut rng);
        assert!(matches!(
            result,
            Err(GenError::MissingDependency { .. })
        ));
    }

    #[test]
    fn standard_pipeline_fills_every_field() {
        let settings = WorldSettings {
            num_tiles: 80,
            ..WorldSettings::earth_like(9.into())
        };
        let mut world = World::with_settings(settings);
        let mut rng = Mulberry32::new(world.seed_u32());
        Pipeline::standard().run(&mut world, &mut rng).unwrap();

        assert_eq!(world.num_tiles(), 80);
        for tile in world.tiles() {
            assert!(tile.plate.is_some());
            assert!(tile.terrain.is_some());
        }
    }

    #[test]
    fn stage_id_names_are_stable() {
        assert_eq!(StageId::Tiling.name(), "tiling");
        assert_eq!(StageId::Classify.name(), "classify");
    }
}
