//! Deterministic tile-based planet generation and classification.
//!
//! This crate tiles a sphere into regions, partitions them into tectonic
//! plates, derives elevation/moisture/temperature, classifies each tile
//! into a terrain, and selects level-of-detail representations for surface
//! vegetation. The whole pass is seed-reproducible: the same settings
//! always produce a bit-identical world.

pub mod climate;
pub mod error;
pub mod export;
pub mod pipeline;
pub mod rng;
pub mod tectonics;
pub mod terrain;
pub mod tiling;
pub mod vegetation;
pub mod world;

pub use climate::ClimateConfig;
pub use error::GenError;
pub use pipeline::{GenerationStage, Pipeline, StageId};
pub use rng::{Mulberry32, Seed};
pub use tectonics::{Plate, PlateConfig, PlateId};
pub use terrain::{TerrainId, TerrainRegistry};
pub use tiling::{PointDistribution, Tile, TileId};
pub use vegetation::{LodConfig, LodSelection, LodTier, VegetationLodSelector};
pub use world::{World, WorldSettings};
