//! Threshold-ordered discretizers for temperature and moisture.

use serde::{Deserialize, Serialize};

use super::color::Rgb;

/// One bucket: values below `threshold` (and above the previous level's)
/// map to `color`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Level {
    /// Exclusive upper bound; the registry is ordered ascending.
    pub threshold: f32,
    pub color: Rgb,
}

/// An ascending sequence of levels. Lookup is total: a value at or above
/// every threshold resolves to the last (most extreme) level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelScale {
    levels: Vec<Level>,
}

impl LevelScale {
    /// Builds a scale, sorting levels ascending by threshold.
    ///
    /// # Panics
    /// Panics if `levels` is empty; a scale with no levels cannot satisfy
    /// the totality contract.
    pub fn new(mut levels: Vec<Level>) -> Self {
        assert!(!levels.is_empty(), "a level scale needs at least one level");
        levels.sort_by(|a, b| a.threshold.total_cmp(&b.threshold));
        Self { levels }
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    /// Returns the first level whose threshold exceeds `value`, or the
    /// last level if none does.
    pub fn lookup(&self, value: f32) -> &Level {
        self.levels
            .iter()
            .find(|l| l.threshold > value)
            .unwrap_or_else(|| self.levels.last().expect("non-empty by construction"))
    }
}

/// Standard temperature buckets, polar blue through equatorial red.
pub fn standard_temperature() -> LevelScale {
    LevelScale::new(vec![
        Level { threshold: 0.08, color: [225, 238, 245] },
        Level { threshold: 0.20, color: [150, 190, 230] },
        Level { threshold: 0.35, color: [110, 175, 190] },
        Level { threshold: 0.50, color: [150, 200, 120] },
        Level { threshold: 0.65, color: [230, 215, 100] },
        Level { threshold: 0.80, color: [235, 160, 70] },
        Level { threshold: 1.01, color: [215, 80, 50] },
    ])
}

/// Standard moisture buckets, parched tan through saturated blue-green.
pub fn standard_moisture() -> LevelScale {
    LevelScale::new(vec![
        Level { threshold: 0.10, color: [225, 200, 150] },
        Level { threshold: 0.25, color: [210, 205, 130] },
        Level { threshold: 0.45, color: [170, 200, 120] },
        Level { threshold: 0.65, color: [120, 185, 130] },
        Level { threshold: 0.85, color: [80, 160, 150] },
        Level { threshold: 1.01, color: [60, 130, 180] },
    ])
}
