//! Pipeline module for orchestrating world generation stages.
//!
//! Provides a trait-based architecture for modular generation stages that
//! can be composed into a complete generation pass.

mod stage;

pub use stage::{
    ClassifyStage, ClimateStage, GenerationStage, Pipeline, PlateStage, StageId, TilingStage,
};
