//! Terrain color resolution.

use serde::{Deserialize, Serialize};

/// Canonical RGB triple used by all export backends.
pub type Rgb = [u8; 3];

/// Returned for terrain ids with no registered color.
pub const NEUTRAL_GRAY: Rgb = [128, 128, 128];

/// One elevation-banded color variant.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ElevationBand {
    /// Upper elevation bound (inclusive) for this band.
    pub max_elevation: f32,
    pub color: Rgb,
}

/// A terrain's color: either a single value or an elevation-banded list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ColorSpec {
    Solid(Rgb),
    Banded {
        /// Sorted ascending by `max_elevation` at construction.
        bands: Vec<ElevationBand>,
        /// Returned when the elevation exceeds every band's bound.
        default: Option<Rgb>,
    },
}

impl ColorSpec {
    /// Builds a banded spec, sorting bands ascending by bound.
    pub fn banded(bands: &[(f32, Rgb)]) -> Self {
        let mut bands: Vec<ElevationBand> = bands
            .iter()
            .map(|&(max_elevation, color)| ElevationBand {
                max_elevation,
                color,
            })
            .collect();
        bands.sort_by(|a, b| a.max_elevation.total_cmp(&b.max_elevation));
        ColorSpec::Banded {
            bands,
            default: None,
        }
    }

    pub fn with_default(self, default: Rgb) -> Self {
        match self {
            ColorSpec::Banded { bands, .. } => ColorSpec::Banded {
                bands,
                default: Some(default),
            },
            solid => solid,
        }
    }

    /// Resolves the color at an elevation: the first band whose bound is
    /// at or above the elevation, else the explicit default, else the
    /// last band's color.
    pub fn resolve(&self, elevation: f32) -> Rgb {
        match self {
            ColorSpec::Solid(rgb) => *rgb,
            ColorSpec::Banded { bands, default } => bands
                .iter()
                .find(|b| b.max_elevation >= elevation)
                .map(|b| b.color)
                .or(*default)
                .or_else(|| bands.last().map(|b| b.color))
                .unwrap_or(NEUTRAL_GRAY),
        }
    }
}

impl Default for ColorSpec {
    fn default() -> Self {
        ColorSpec::Solid(NEUTRAL_GRAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solid_ignores_elevation() {
        let spec = ColorSpec::Solid([1, 2, 3]);
        assert_eq!(spec.resolve(-1.0), [1, 2, 3]);
        assert_eq!(spec.resolve(1.0), [1, 2, 3]);
    }

    #[test]
    fn bands_resolve_by_first_admitting_bound() {
        let spec = ColorSpec::banded(&[(0.5, [2, 2, 2]), (0.0, [1, 1, 1])]);
        assert_eq!(spec.resolve(-0.3), [1, 1, 1]);
        assert_eq!(spec.resolve(0.0), [1, 1, 1]);
        assert_eq!(spec.resolve(0.2), [2, 2, 2]);
    }

    #[test]
    fn above_all_bands_uses_default_then_last() {
        let without = ColorSpec::banded(&[(0.0, [1, 1, 1]), (0.5, [2, 2, 2])]);
        assert_eq!(without.resolve(0.9), [2, 2, 2]);

        let with = without.with_default([9, 9, 9]);
        assert_eq!(with.resolve(0.9), [9, 9, 9]);
    }

    #[test]
    fn empty_band_list_degrades_to_gray() {
        let spec = ColorSpec::Banded {
            bands: Vec::new(),
            default: None,
        };
        assert_eq!(spec.resolve(0.0), NEUTRAL_GRAY);
    }
}
