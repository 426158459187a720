//! Climate configuration parameters.

use serde::{Deserialize, Serialize};

/// Configuration for moisture/temperature derivation.
///
/// All outputs are normalized to [0, 1]; the constants below are tuned for
/// believable distributions rather than physical realism.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClimateConfig {
    /// Elevation at or below which a tile is water.
    pub sea_level: f32,

    // Temperature model
    /// Exponent on normalized |latitude|; >1 widens the warm belt.
    pub latitude_exponent: f32,
    /// Temperature drop per unit of elevation above sea level.
    pub lapse_rate: f32,
    /// Maritime buffering: land temperature blends toward the ocean value
    /// within this many BFS hops of water.
    pub maritime_buffer_hops: f32,
    /// Normalized temperature of open water at the equator.
    pub ocean_temperature: f32,

    // Moisture model
    /// Moisture floor for land infinitely far from water.
    pub base_moisture: f32,
    /// e-folding distance (in hops from water) of the moisture falloff.
    pub moisture_falloff_hops: f32,

    /// Frequency of the climate detail noise.
    pub noise_frequency: f64,
    /// Amplitude of the climate detail noise, applied to both fields.
    pub noise_amplitude: f32,
}

impl Default for ClimateConfig {
    fn default() -> Self {
        Self {
            sea_level: 0.0,
            latitude_exponent: 1.15,
            lapse_rate: 0.55,
            maritime_buffer_hops: 4.0,
            ocean_temperature: 0.6,
            base_moisture: 0.15,
            moisture_falloff_hops: 5.0,
            noise_frequency: 3.1,
            noise_amplitude: 0.08,
        }
    }
}

impl ClimateConfig {
    pub fn earth_like() -> Self {
        Self::default()
    }
}
