//! Boundary-driven uplift strategies.
//!
//! The exact collision/divergence magnitude is stylized, not geophysical,
//! so the formula sits behind a trait: convergent boundaries must raise
//! elevation and divergent boundaries lower it, but hosts can swap in
//! their own profile.

use glam::Vec3;

use crate::tiling::Tile;

use super::Plate;

/// Computes the boundary elevation adjustment for one tile.
pub trait BoundaryUplift: Send + Sync {
    /// Returns the signed elevation adjustment for `tile`.
    ///
    /// `tiles` is the full arena (for neighbor lookups) and `plates` the
    /// plate set; every tile has a plate by the time this runs.
    fn uplift(&self, tile: &Tile, tiles: &[Tile], plates: &[Plate]) -> f32;
}

/// Default strategy: project the relative motion of each foreign neighbor
/// onto the tile-to-neighbor direction.
///
/// A positive closing rate (the plates approach) raises the tile, a
/// negative one (they separate) lowers it; the mean over foreign neighbors
/// is scaled by `scale`. Tiles interior to a plate get exactly zero.
#[derive(Debug, Clone)]
pub struct RelativeMotionUplift {
    pub scale: f32,
}

impl RelativeMotionUplift {
    pub fn new(scale: f32) -> Self {
        Self { scale }
    }
}

impl BoundaryUplift for RelativeMotionUplift {
    fn uplift(&self, tile: &Tile, tiles: &[Tile], plates: &[Plate]) -> f32 {
        let Some(my_plate) = tile.plate else {
            return 0.0;
        };
        let my_motion = plates[my_plate.index()].motion;

        let mut total = 0.0f32;
        let mut foreign = 0u32;

        for &nb in &tile.neighbors {
            let neighbor = &tiles[nb.index()];
            let Some(their_plate) = neighbor.plate else {
                continue;
            };
            if their_plate == my_plate {
                continue;
            }

            let dir = (neighbor.center - tile.center).normalize_or_zero();
            if dir == Vec3::ZERO {
                continue;
            }

            // Closing rate along the boundary normal: positive when the two
            // plates approach each other across this edge.
            let relative = my_motion - plates[their_plate.index()].motion;
            total += relative.dot(dir);
            foreign += 1;
        }

        if foreign == 0 {
            0.0
        } else {
            self.scale * total / foreign as f32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tectonics::PlateId;
    use crate::tiling::TileId;

    fn tile(id: u32, center: Vec3, plate: u32, neighbors: &[u32]) -> Tile {
        Tile {
            id: TileId(id),
            center,
            neighbors: neighbors.iter().map(|&n| TileId(n)).collect(),
            area: 0.1,
            elevation: 0.0,
            moisture: 0.5,
            temperature: 0.5,
            plate: Some(PlateId(plate)),
            is_ocean_connected: false,
            is_lake_adjacent: false,
            terrain: None,
        }
    }

    fn plate(id: u32, motion: Vec3) -> Plate {
        Plate {
            id: PlateId(id),
            seed_tile: TileId(id),
            center: Vec3::X,
            motion,
            is_oceanic: false,
            base_elevation: 0.2,
        }
    }

    #[test]
    fn converging_neighbors_raise_elevation() {
        // Tile 0 moves +Z toward tile 1; tile 1 moves -Z toward tile 0.
        let tiles = vec![
            tile(0, Vec3::X, 0, &[1]),
            tile(1, Vec3::new(0.8, 0.0, 0.6).normalize(), 1, &[0]),
        ];
        let plates = vec![plate(0, Vec3::Z * 0.5), plate(1, Vec3::Z * -0.5)];

        let strategy = RelativeMotionUplift::new(1.0);
        assert!(strategy.uplift(&tiles[0], &tiles, &plates) > 0.0);
        assert!(strategy.uplift(&tiles[1], &tiles, &plates) > 0.0);
    }

    #[test]
    fn diverging_neighbors_lower_elevation() {
        let tiles = vec![
            tile(0, Vec3::X, 0, &[1]),
            tile(1, Vec3::new(0.8, 0.0, 0.6).normalize(), 1, &[0]),
        ];
        let plates = vec![plate(0, Vec3::Z * -0.5), plate(1, Vec3::Z * 0.5)];

        let strategy = RelativeMotionUplift::new(1.0);
        assert!(strategy.uplift(&tiles[0], &tiles, &plates) < 0.0);
        assert!(strategy.uplift(&tiles[1], &tiles, &plates) < 0.0);
    }

    #[test]
    fn interior_tiles_get_zero_adjustment() {
        let tiles = vec![tile(0, Vec3::X, 0, &[1]), tile(1, Vec3::Y, 0, &[0])];
        let plates = vec![plate(0, Vec3::Z)];

        let strategy = RelativeMotionUplift::new(1.0);
        assert_eq!(strategy.uplift(&tiles[0], &tiles, &plates), 0.0);
    }
}
