//! Tectonic plate partition and elevation derivation.
//!
//! Partitions the tile graph into plates with a multi-source randomized
//! flood fill, gives each plate a motion vector and crust character, and
//! derives per-tile elevation from plate membership, boundary interaction,
//! and detail noise. Stylized and deterministic rather than geophysical.

mod config;
mod uplift;

pub use config::PlateConfig;
pub use uplift::{BoundaryUplift, RelativeMotionUplift};

use std::collections::VecDeque;

use glam::Vec3;
use noise::{NoiseFn, Perlin};
use serde::{Deserialize, Serialize};

use crate::error::GenError;
use crate::rng::Mulberry32;
use crate::tiling::{points::random_unit_vector, Tile, TileId};

/// Dense index of a plate within its generation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlateId(pub u32);

impl PlateId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A contiguous group of tiles sharing simulated motion and crust.
///
/// Created once per generation pass and never mutated afterwards; tiles
/// reference plates by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plate {
    pub id: PlateId,
    /// Tile chosen as the plate's flood-fill origin.
    pub seed_tile: TileId,
    /// Unit vector to the seed tile's site.
    pub center: Vec3,
    /// Tangential motion vector; not required to be unit length.
    pub motion: Vec3,
    pub is_oceanic: bool,
    /// Crust base elevation: negative for oceanic, positive for continental.
    pub base_elevation: f32,
}

/// Partitions all tiles into exactly `num_plates` plates and derives
/// per-tile elevation.
///
/// Fails with [`GenError::Config`] before touching any tile if the plate
/// count is out of range; on success every tile has exactly one plate.
pub fn assign_plates(
    tiles: &mut [Tile],
    num_plates: usize,
    config: &PlateConfig,
    uplift: &dyn BoundaryUplift,
    elevation_bias: f32,
    rng: &mut Mulberry32,
) -> Result<Vec<Plate>, GenError> {
    if num_plates < 1 {
        return Err(GenError::Config("numPlates must be at least 1".into()));
    }
    if num_plates > tiles.len() {
        return Err(GenError::Config(format!(
            "numPlates ({num_plates}) exceeds numTiles ({})",
            tiles.len()
        )));
    }

    let seeds = select_seeds(tiles, num_plates, rng);
    let plates = create_plates(tiles, &seeds, config, rng);
    let noise_seed = rng.next_u32();

    flood_fill(tiles, &plates, rng);
    derive_elevation(tiles, &plates, config, uplift, elevation_bias, noise_seed);

    Ok(plates)
}

/// Samples `num_plates` seed tiles without replacement, spatially
/// de-duplicated: a candidate too close to an accepted seed is rejected
/// while enough candidates remain, then the gap is filled from the
/// remaining shuffled order.
fn select_seeds(tiles: &[Tile], num_plates: usize, rng: &mut Mulberry32) -> Vec<TileId> {
    let mut candidates: Vec<u32> = (0..tiles.len() as u32).collect();
    rng.shuffle(&mut candidates);

    // Half the angular radius of an ideal plate cap (cap area 4π/P).
    let cap_cos = 1.0 - 2.0 / num_plates as f32;
    let min_separation = 0.5 * cap_cos.clamp(-1.0, 1.0).acos();

    let mut seeds: Vec<TileId> = Vec::with_capacity(num_plates);
    for &candidate in &candidates {
        if seeds.len() == num_plates {
            break;
        }
        let center = tiles[candidate as usize].center;
        let too_close = seeds.iter().any(|&s| {
            let other = tiles[s.index()].center;
            center.dot(other).clamp(-1.0, 1.0).acos() < min_separation
        });
        if !too_close {
            seeds.push(TileId(candidate));
        }
    }

    // Dense tilings with many plates may not admit full separation; take
    // the earliest remaining candidates to honor the exact plate count.
    if seeds.len() < num_plates {
        for &candidate in &candidates {
            if seeds.len() == num_plates {
                break;
            }
            if !seeds.contains(&TileId(candidate)) {
                seeds.push(TileId(candidate));
            }
        }
    }

    seeds
}

fn create_plates(
    tiles: &[Tile],
    seeds: &[TileId],
    config: &PlateConfig,
    rng: &mut Mulberry32,
) -> Vec<Plate> {
    seeds
        .iter()
        .enumerate()
        .map(|(i, &seed_tile)| {
            let center = tiles[seed_tile.index()].center;

            // Tangential motion: random axis crossed with the plate center.
            let axis = random_unit_vector(rng);
            let mut direction = axis.cross(center);
            if direction.length_squared() < 1e-9 {
                direction = center.any_orthonormal_vector();
            }
            let speed = config.motion_scale * (0.5 + 0.5 * rng.next_f32());
            let motion = direction.normalize() * speed;

            let is_oceanic = rng.next_f64() < config.oceanic_fraction;
            let (lo, hi) = if is_oceanic {
                (config.oceanic_elevation_min, config.oceanic_elevation_max)
            } else {
                (
                    config.continental_elevation_min,
                    config.continental_elevation_max,
                )
            };
            let base_elevation = lo + (hi - lo) * rng.next_f32();

            Plate {
                id: PlateId(i as u32),
                seed_tile,
                center,
                motion,
                is_oceanic,
                base_elevation,
            }
        })
        .collect()
}

/// Multi-source BFS: one frontier queue per plate, processed in ascending
/// plate id each round, with each tile's unassigned neighbors visited in
/// PRNG-shuffled order.
///
/// First claim wins, and because both the round order and the shuffle are
/// fixed by the pass PRNG, the partition is reproducible. Any concurrent
/// reimplementation must preserve exactly this claim order.
fn flood_fill(tiles: &mut [Tile], plates: &[Plate], rng: &mut Mulberry32) {
    let mut frontiers: Vec<VecDeque<u32>> = plates
        .iter()
        .map(|p| VecDeque::from([p.seed_tile.0]))
        .collect();

    for plate in plates {
        tiles[plate.seed_tile.index()].plate = Some(plate.id);
    }

    let mut scratch: Vec<TileId> = Vec::new();
    while frontiers.iter().any(|f| !f.is_empty()) {
        for (plate_idx, frontier) in frontiers.iter_mut().enumerate() {
            let Some(current) = frontier.pop_front() else {
                continue;
            };

            scratch.clear();
            scratch.extend_from_slice(&tiles[current as usize].neighbors);
            rng.shuffle(&mut scratch);

            for &nb in &scratch {
                let neighbor = &mut tiles[nb.index()];
                if neighbor.plate.is_none() {
                    neighbor.plate = Some(PlateId(plate_idx as u32));
                    frontier.push_back(nb.0);
                }
            }
        }
    }
}

fn derive_elevation(
    tiles: &mut [Tile],
    plates: &[Plate],
    config: &PlateConfig,
    uplift: &dyn BoundaryUplift,
    elevation_bias: f32,
    noise_seed: u32,
) {
    let perlin = Perlin::new(noise_seed);

    let elevations: Vec<f32> = tiles
        .iter()
        .map(|tile| {
            let base = tile
                .plate
                .map(|p| plates[p.index()].base_elevation)
                .unwrap_or(0.0);
            let boundary = uplift.uplift(tile, tiles, plates);
            let sample = [
                tile.center.x as f64 * config.noise_frequency,
                tile.center.y as f64 * config.noise_frequency,
                tile.center.z as f64 * config.noise_frequency,
            ];
            let detail = perlin.get(sample) as f32 * config.noise_amplitude;
            (base + boundary + detail + elevation_bias).clamp(-1.0, 1.0)
        })
        .collect();

    for (tile, elevation) in tiles.iter_mut().zip(elevations) {
        tile.elevation = elevation;
    }
}
