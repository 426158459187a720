//! Terrain classification.
//!
//! A closed set of terrain identifiers plus an immutable, priority-ordered
//! rule table. Classification walks the table in ascending priority and
//! returns the first rule whose bounds all admit the tile; a full-range
//! catch-all guarantees the function is total. No PRNG is involved: the
//! same tile always classifies the same way.

mod color;
mod levels;

pub use color::{ColorSpec, ElevationBand, Rgb, NEUTRAL_GRAY};
pub use levels::{Level, LevelScale};

use serde::{Deserialize, Serialize};

use crate::tiling::Tile;

/// Terrain identifier. `as_u8` is stable and used for storage/export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerrainId {
    DeepOcean = 1,
    Ocean = 2,
    Lake = 3,
    IceCap = 4,
    SnowCap = 5,
    Mountain = 6,
    Marsh = 7,
    Beach = 8,
    Tundra = 9,
    Taiga = 10,
    Desert = 11,
    Savanna = 12,
    Rainforest = 13,
    Forest = 14,
    Steppe = 15,
}

impl TerrainId {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            TerrainId::DeepOcean => "Deep Ocean",
            TerrainId::Ocean => "Ocean",
            TerrainId::Lake => "Lake",
            TerrainId::IceCap => "Ice Cap",
            TerrainId::SnowCap => "Snow Cap",
            TerrainId::Mountain => "Mountain",
            TerrainId::Marsh => "Marsh",
            TerrainId::Beach => "Beach",
            TerrainId::Tundra => "Tundra",
            TerrainId::Taiga => "Taiga",
            TerrainId::Desert => "Desert",
            TerrainId::Savanna => "Savanna",
            TerrainId::Rainforest => "Rainforest",
            TerrainId::Forest => "Forest",
            TerrainId::Steppe => "Steppe",
        }
    }

    /// True for terrains that host surface vegetation instances.
    pub fn hosts_vegetation(self) -> bool {
        matches!(
            self,
            TerrainId::Marsh
                | TerrainId::Taiga
                | TerrainId::Savanna
                | TerrainId::Rainforest
                | TerrainId::Forest
                | TerrainId::Steppe
        )
    }
}

/// Broad physical kind of a terrain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BaseKind {
    Water,
    Land,
    Ice,
}

/// The classified inputs of one tile.
///
/// Decoupled from [`Tile`] so hosts can classify hypothetical values
/// (e.g. previewing an elevation-bias change) without building a tile.
#[derive(Debug, Clone, Copy)]
pub struct TerrainSample {
    pub elevation: f32,
    pub moisture: f32,
    pub temperature: f32,
    pub is_ocean_connected: bool,
    pub is_lake_adjacent: bool,
}

impl From<&Tile> for TerrainSample {
    fn from(tile: &Tile) -> Self {
        Self {
            elevation: tile.elevation,
            moisture: tile.moisture,
            temperature: tile.temperature,
            is_ocean_connected: tile.is_ocean_connected,
            is_lake_adjacent: tile.is_lake_adjacent,
        }
    }
}

/// One classification rule: numeric bounds (inclusive) plus flag
/// requirements. Lower priority is evaluated first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerrainRule {
    pub terrain: TerrainId,
    pub kind: BaseKind,
    pub priority: u16,
    pub min_elevation: f32,
    pub max_elevation: f32,
    pub min_moisture: f32,
    pub max_moisture: f32,
    pub min_temperature: f32,
    pub max_temperature: f32,
    /// Rule only matches tiles flagged lake-adjacent.
    pub requires_lake: bool,
    /// Rule only matches tiles connected to the ocean body.
    pub requires_ocean: bool,
    #[serde(skip)]
    pub color: ColorSpec,
}

impl TerrainRule {
    fn admits(&self, s: &TerrainSample) -> bool {
        if self.requires_lake && !s.is_lake_adjacent {
            return false;
        }
        if self.requires_ocean && !s.is_ocean_connected {
            return false;
        }
        s.elevation >= self.min_elevation
            && s.elevation <= self.max_elevation
            && s.moisture >= self.min_moisture
            && s.moisture <= self.max_moisture
            && s.temperature >= self.min_temperature
            && s.temperature <= self.max_temperature
    }
}

/// Builder with full-range defaults; rules only state the bounds they
/// actually constrain.
struct RuleSpec {
    rule: TerrainRule,
}

impl RuleSpec {
    fn new(priority: u16, terrain: TerrainId, kind: BaseKind) -> Self {
        Self {
            rule: TerrainRule {
                terrain,
                kind,
                priority,
                min_elevation: -1.0,
                max_elevation: 1.0,
                min_moisture: 0.0,
                max_moisture: 1.0,
                min_temperature: 0.0,
                max_temperature: 1.0,
                requires_lake: false,
                requires_ocean: false,
                color: ColorSpec::default(),
            },
        }
    }

    fn elevation(mut self, min: f32, max: f32) -> Self {
        self.rule.min_elevation = min;
        self.rule.max_elevation = max;
        self
    }

    fn moisture(mut self, min: f32, max: f32) -> Self {
        self.rule.min_moisture = min;
        self.rule.max_moisture = max;
        self
    }

    fn temperature(mut self, min: f32, max: f32) -> Self {
        self.rule.min_temperature = min;
        self.rule.max_temperature = max;
        self
    }

    fn lake(mut self) -> Self {
        self.rule.requires_lake = true;
        self
    }

    fn ocean(mut self) -> Self {
        self.rule.requires_ocean = true;
        self
    }

    fn solid(mut self, rgb: Rgb) -> TerrainRule {
        self.rule.color = ColorSpec::Solid(rgb);
        self.rule
    }

    fn banded(mut self, bands: &[(f32, Rgb)]) -> TerrainRule {
        self.rule.color = ColorSpec::banded(bands);
        self.rule
    }
}

/// Immutable terrain rule registry, sorted by ascending priority at
/// construction and shared read-only across generation passes.
#[derive(Debug, Clone)]
pub struct TerrainRegistry {
    rules: Vec<TerrainRule>,
    temperature_scale: LevelScale,
    moisture_scale: LevelScale,
}

/// Catch-all land type returned when nothing else matches.
pub const FALLBACK_TERRAIN: TerrainId = TerrainId::Steppe;

impl TerrainRegistry {
    /// Builds a registry from rules; ordering in the input is irrelevant.
    pub fn new(mut rules: Vec<TerrainRule>) -> Self {
        rules.sort_by_key(|r| r.priority);
        Self {
            rules,
            temperature_scale: levels::standard_temperature(),
            moisture_scale: levels::standard_moisture(),
        }
    }

    /// The standard rule set.
    ///
    /// Water and ice claim tiles first, then relief, then the
    /// moisture/temperature bands, with Steppe as the guaranteed fallback.
    pub fn standard() -> Self {
        use BaseKind::*;
        use TerrainId::*;
        Self::new(vec![
            RuleSpec::new(10, IceCap, Ice)
                .elevation(-1.0, 0.05)
                .temperature(0.0, 0.08)
                .solid([225, 238, 245]),
            RuleSpec::new(20, DeepOcean, Water)
                .elevation(-1.0, -0.55)
                .ocean()
                .solid([10, 25, 110]),
            RuleSpec::new(30, Ocean, Water)
                .elevation(-1.0, 0.0)
                .ocean()
                .banded(&[(-0.35, [25, 60, 155]), (0.0, [40, 90, 205])]),
            RuleSpec::new(40, Lake, Water)
                .elevation(-1.0, 0.0)
                .lake()
                .solid([60, 125, 190]),
            // Water that carries no connectivity flags (hand-made samples,
            // stale flags after a bias-only reclassification).
            RuleSpec::new(45, Ocean, Water)
                .elevation(-1.0, 0.0)
                .banded(&[(-0.35, [25, 60, 155]), (0.0, [40, 90, 205])]),
            RuleSpec::new(50, SnowCap, Ice)
                .elevation(0.7, 1.0)
                .temperature(0.0, 0.45)
                .solid([245, 245, 250]),
            RuleSpec::new(60, Mountain, Land).elevation(0.55, 1.0).banded(&[
                (0.7, [125, 115, 105]),
                (0.85, [150, 145, 140]),
                (1.0, [205, 205, 210]),
            ]),
            RuleSpec::new(70, Marsh, Land)
                .elevation(0.0, 0.2)
                .moisture(0.45, 1.0)
                .lake()
                .solid([90, 140, 80]),
            RuleSpec::new(80, Beach, Land)
                .elevation(0.0, 0.045)
                .solid([220, 210, 120]),
            RuleSpec::new(90, Tundra, Land)
                .temperature(0.0, 0.18)
                .solid([160, 185, 155]),
            RuleSpec::new(100, Taiga, Land)
                .temperature(0.0, 0.38)
                .moisture(0.35, 1.0)
                .solid([30, 90, 60]),
            RuleSpec::new(110, Desert, Land)
                .moisture(0.0, 0.18)
                .solid([240, 200, 100]),
            RuleSpec::new(120, Savanna, Land)
                .temperature(0.65, 1.0)
                .moisture(0.0, 0.45)
                .solid([210, 190, 60]),
            RuleSpec::new(130, Rainforest, Land)
                .temperature(0.6, 1.0)
                .moisture(0.75, 1.0)
                .solid([0, 90, 20]),
            RuleSpec::new(140, Forest, Land)
                .moisture(0.5, 1.0)
                .solid([20, 110, 20]),
            RuleSpec::new(150, Steppe, Land).solid([130, 180, 90]),
        ])
    }

    pub fn rules(&self) -> &[TerrainRule] {
        &self.rules
    }

    /// Classifies a sample; total. A registry whose rules fail to cover a
    /// sample is a configuration defect: the gap is logged and the
    /// fallback land type returned.
    pub fn classify(&self, sample: &TerrainSample) -> TerrainId {
        for rule in &self.rules {
            if rule.admits(sample) {
                return rule.terrain;
            }
        }
        log::warn!(
            "no terrain rule admits elevation={} moisture={} temperature={}; \
             falling back to {:?}",
            sample.elevation,
            sample.moisture,
            sample.temperature,
            FALLBACK_TERRAIN
        );
        FALLBACK_TERRAIN
    }

    /// Classifies a tile if present; a missing tile resolves directly to
    /// the fallback.
    pub fn classify_tile(&self, tile: Option<&Tile>) -> TerrainId {
        match tile {
            Some(t) => self.classify(&TerrainSample::from(t)),
            None => FALLBACK_TERRAIN,
        }
    }

    /// Resolves the display color for a terrain at a given elevation.
    ///
    /// Unknown terrain (not covered by any rule in this registry) resolves
    /// to neutral gray and is logged; it never aborts the caller.
    pub fn color_for(&self, terrain: TerrainId, elevation: f32) -> Rgb {
        match self.rules.iter().find(|r| r.terrain == terrain) {
            Some(rule) => rule.color.resolve(elevation),
            None => {
                log::warn!("no color registered for terrain {terrain:?}; using neutral gray");
                NEUTRAL_GRAY
            }
        }
    }

    /// Bucketed color for a normalized temperature.
    pub fn color_for_temperature(&self, value: f32) -> Rgb {
        self.temperature_scale.lookup(value).color
    }

    /// Bucketed color for a normalized moisture.
    pub fn color_for_moisture(&self, value: f32) -> Rgb {
        self.moisture_scale.lookup(value).color
    }
}

impl Default for TerrainRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
