//! Climate derivation: water bodies, moisture, and temperature.
//!
//! Runs after the plate stage. Identifies the connected ocean and any
//! lakes from the elevation field, then derives normalized moisture and
//! temperature per tile. The fields are pure functions of tile position,
//! elevation, and water distance, so they are computed as parallel maps;
//! the connectivity passes are single-threaded BFS.

mod config;

pub use config::ClimateConfig;

use std::collections::VecDeque;

use noise::{NoiseFn, Perlin};
use rayon::prelude::*;

use crate::rng::Mulberry32;
use crate::tiling::Tile;

/// Derives water flags, moisture, and temperature for every tile.
pub fn derive_climate(tiles: &mut [Tile], config: &ClimateConfig, rng: &mut Mulberry32) {
    let noise_seed = rng.next_u32();

    let is_water: Vec<bool> = tiles
        .iter()
        .map(|t| t.elevation <= config.sea_level)
        .collect();

    flag_water_bodies(tiles, &is_water);
    let water_hops = water_distance_hops(tiles, &is_water);

    let perlin = Perlin::new(noise_seed);
    let fields: Vec<(f32, f32)> = tiles
        .par_iter()
        .enumerate()
        .map(|(i, tile)| {
            let jitter = sample_noise(&perlin, tile, config);
            let temperature = temperature_at(tile, is_water[i], water_hops[i], jitter, config);
            let moisture = moisture_at(is_water[i], water_hops[i], jitter, config);
            (temperature, moisture)
        })
        .collect();

    for (tile, (temperature, moisture)) in tiles.iter_mut().zip(fields) {
        tile.temperature = temperature;
        tile.moisture = moisture;
    }
}

/// Finds connected water components; the largest is the ocean, the rest
/// are lakes. Lake tiles and their land neighbors get the lake-adjacency
/// flag.
fn flag_water_bodies(tiles: &mut [Tile], is_water: &[bool]) {
    let n = tiles.len();
    let mut component = vec![usize::MAX; n];
    let mut sizes: Vec<usize> = Vec::new();

    for start in 0..n {
        if !is_water[start] || component[start] != usize::MAX {
            continue;
        }
        let id = sizes.len();
        let mut size = 0usize;
        let mut queue = VecDeque::from([start]);
        component[start] = id;
        while let Some(i) = queue.pop_front() {
            size += 1;
            for &nb in &tiles[i].neighbors {
                let j = nb.index();
                if is_water[j] && component[j] == usize::MAX {
                    component[j] = id;
                    queue.push_back(j);
                }
            }
        }
        sizes.push(size);
    }

    // Largest component wins; ties go to the earliest (lowest tile id).
    let ocean = sizes
        .iter()
        .enumerate()
        .max_by_key(|&(i, &size)| (size, usize::MAX - i))
        .map(|(i, _)| i);

    for i in 0..n {
        tiles[i].is_ocean_connected = is_water[i] && Some(component[i]) == ocean;
        tiles[i].is_lake_adjacent = false;
    }

    // Lake tiles flag themselves and their land neighbors.
    for i in 0..n {
        if !is_water[i] || tiles[i].is_ocean_connected {
            continue;
        }
        tiles[i].is_lake_adjacent = true;
        let neighbors = tiles[i].neighbors.clone();
        for nb in neighbors {
            let j = nb.index();
            if !is_water[j] {
                tiles[j].is_lake_adjacent = true;
            }
        }
    }
}

/// Multi-source BFS hop distance from the nearest water tile.
///
/// Water tiles are 0; a world with no water at all yields `u32::MAX`
/// everywhere, which the moisture model treats as maximally dry.
fn water_distance_hops(tiles: &[Tile], is_water: &[bool]) -> Vec<u32> {
    let mut hops = vec![u32::MAX; tiles.len()];
    let mut queue: VecDeque<usize> = VecDeque::new();

    for (i, &water) in is_water.iter().enumerate() {
        if water {
            hops[i] = 0;
            queue.push_back(i);
        }
    }

    while let Some(i) = queue.pop_front() {
        let d = hops[i];
        for &nb in &tiles[i].neighbors {
            let j = nb.index();
            if hops[j] == u32::MAX {
                hops[j] = d.saturating_add(1);
                queue.push_back(j);
            }
        }
    }

    hops
}

fn sample_noise(perlin: &Perlin, tile: &Tile, config: &ClimateConfig) -> f32 {
    let sample = [
        tile.center.x as f64 * config.noise_frequency,
        tile.center.y as f64 * config.noise_frequency,
        tile.center.z as f64 * config.noise_frequency,
    ];
    perlin.get(sample) as f32 * config.noise_amplitude
}

/// Normalized temperature: latitude gradient, elevation lapse, maritime
/// buffering toward the ocean value near water.
fn temperature_at(
    tile: &Tile,
    is_water: bool,
    water_hops: u32,
    jitter: f32,
    config: &ClimateConfig,
) -> f32 {
    let latitude = tile.center.y.clamp(-1.0, 1.0).abs();
    let mut temperature = 1.0 - latitude.powf(config.latitude_exponent);

    let above_sea = (tile.elevation - config.sea_level).max(0.0);
    temperature -= config.lapse_rate * above_sea;

    if !is_water && water_hops != u32::MAX {
        let w = (-(water_hops as f32) / config.maritime_buffer_hops.max(1.0)).exp();
        let ocean_baseline = temperature * 0.6 + config.ocean_temperature * 0.4 * (1.0 - latitude);
        temperature = temperature * (1.0 - w) + ocean_baseline * w;
    }

    (temperature + jitter).clamp(0.0, 1.0)
}

/// Normalized moisture: saturated on water, exponential falloff with hop
/// distance from water on land.
fn moisture_at(is_water: bool, water_hops: u32, jitter: f32, config: &ClimateConfig) -> f32 {
    if is_water {
        return 1.0;
    }
    let falloff = if water_hops == u32::MAX {
        0.0
    } else {
        (-(water_hops as f32) / config.moisture_falloff_hops.max(1.0)).exp()
    };
    let moisture = config.base_moisture + (1.0 - config.base_moisture) * falloff;
    (moisture + jitter).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tectonics::{assign_plates, PlateConfig, RelativeMotionUplift};
    use crate::tiling::{build_tiles, PointDistribution};

    fn generated(n: usize, seed: u32) -> Vec<Tile> {
        let mut rng = Mulberry32::new(seed);
        let mut tiles = build_tiles(n, 0.5, PointDistribution::Fibonacci, &mut rng).unwrap();
        let config = PlateConfig::default();
        let strategy = RelativeMotionUplift::new(config.uplift_scale);
        assign_plates(&mut tiles, 8, &config, &strategy, 0.0, &mut rng).unwrap();
        derive_climate(&mut tiles, &ClimateConfig::earth_like(), &mut rng);
        tiles
    }

    #[test]
    fn fields_are_normalized() {
        let tiles = generated(150, 42);
        for tile in &tiles {
            assert!((0.0..=1.0).contains(&tile.moisture));
            assert!((0.0..=1.0).contains(&tile.temperature));
        }
    }

    #[test]
    fn water_tiles_are_saturated() {
        let tiles = generated(150, 42);
        for tile in &tiles {
            if tile.elevation <= 0.0 {
                assert_eq!(tile.moisture, 1.0);
            }
        }
    }

    #[test]
    fn exactly_one_ocean_component() {
        let tiles = generated(200, 7);
        let ocean: Vec<usize> = tiles
            .iter()
            .filter(|t| t.is_ocean_connected)
            .map(|t| t.id.index())
            .collect();
        assert!(!ocean.is_empty(), "default settings should produce an ocean");

        // The ocean must be one connected component.
        let mut seen = vec![false; tiles.len()];
        let mut stack = vec![ocean[0]];
        seen[ocean[0]] = true;
        while let Some(i) = stack.pop() {
            for &nb in &tiles[i].neighbors {
                let j = nb.index();
                if !seen[j] && tiles[j].is_ocean_connected {
                    seen[j] = true;
                    stack.push(j);
                }
            }
        }
        assert!(ocean.iter().all(|&i| seen[i]));
    }

    #[test]
    fn lake_flags_only_near_non_ocean_water() {
        let tiles = generated(200, 7);
        for tile in &tiles {
            if tile.is_ocean_connected {
                assert!(
                    !tile.is_lake_adjacent,
                    "ocean tile flagged as lake-adjacent"
                );
            }
            if tile.is_lake_adjacent && tile.elevation > 0.0 {
                let near_lake = tile.neighbors.iter().any(|&nb| {
                    let n = &tiles[nb.index()];
                    n.elevation <= 0.0 && !n.is_ocean_connected
                });
                assert!(near_lake);
            }
        }
    }

    #[test]
    fn equator_is_warmer_than_poles() {
        let tiles = generated(400, 11);
        let mean = |pred: &dyn Fn(&Tile) -> bool| {
            let picked: Vec<f32> = tiles
                .iter()
                .filter(|t| pred(t))
                .map(|t| t.temperature)
                .collect();
            picked.iter().sum::<f32>() / picked.len().max(1) as f32
        };
        let equatorial = mean(&|t| t.center.y.abs() < 0.25);
        let polar = mean(&|t| t.center.y.abs() > 0.85);
        assert!(equatorial > polar + 0.15, "{equatorial} vs {polar}");
    }

    #[test]
    fn climate_is_reproducible() {
        let a = generated(100, 3);
        let b = generated(100, 3);
        for (ta, tb) in a.iter().zip(&b) {
            assert_eq!(ta.temperature, tb.temperature);
            assert_eq!(ta.moisture, tb.moisture);
        }
    }

    #[test]
    fn dry_world_without_water_is_possible() {
        let mut rng = Mulberry32::new(1);
        let mut tiles = build_tiles(50, 0.2, PointDistribution::Fibonacci, &mut rng).unwrap();
        for tile in tiles.iter_mut() {
            tile.elevation = 0.5;
        }
        derive_climate(&mut tiles, &ClimateConfig::earth_like(), &mut rng);
        for tile in &tiles {
            assert!(!tile.is_ocean_connected);
            assert!(tile.moisture <= ClimateConfig::default().base_moisture + 0.1);
        }
    }
}
