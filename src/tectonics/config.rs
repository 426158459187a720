//! Configuration for plate assignment and elevation derivation.

use serde::{Deserialize, Serialize};

/// Configuration parameters for the plate stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlateConfig {
    /// Probability that a plate is oceanic (Earth-like surface is mostly
    /// ocean; 0.6-0.7 typical).
    pub oceanic_fraction: f64,

    /// Base elevation range for oceanic plates (below sea level).
    pub oceanic_elevation_min: f32,
    pub oceanic_elevation_max: f32,

    /// Base elevation range for continental plates (above sea level).
    pub continental_elevation_min: f32,
    pub continental_elevation_max: f32,

    /// Magnitude scale for plate motion vectors.
    pub motion_scale: f32,

    /// Scale factor for boundary-driven uplift/subsidence.
    pub uplift_scale: f32,

    /// Frequency of the per-tile elevation detail noise.
    pub noise_frequency: f64,
    /// Amplitude of the per-tile elevation detail noise.
    pub noise_amplitude: f32,
}

impl Default for PlateConfig {
    fn default() -> Self {
        Self {
            oceanic_fraction: 0.65,
            oceanic_elevation_min: -0.7,
            oceanic_elevation_max: -0.4,
            continental_elevation_min: 0.1,
            continental_elevation_max: 0.4,
            motion_scale: 1.0,
            uplift_scale: 0.45,
            noise_frequency: 2.4,
            noise_amplitude: 0.12,
        }
    }
}

impl PlateConfig {
    /// Earth-like defaults.
    pub fn earth_like() -> Self {
        Self::default()
    }

    /// Faster plates and stronger boundary relief.
    pub fn active() -> Self {
        Self {
            motion_scale: 1.6,
            uplift_scale: 0.65,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_mostly_ocean() {
        let config = PlateConfig::default();
        assert!(config.oceanic_fraction > 0.5);
        assert!(config.oceanic_elevation_max < 0.0);
        assert!(config.continental_elevation_min > 0.0);
    }

    #[test]
    fn active_config_has_stronger_uplift() {
        assert!(PlateConfig::active().uplift_scale > PlateConfig::default().uplift_scale);
    }
}
