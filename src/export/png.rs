//! Equirectangular PNG previews of a generated world.

use std::path::Path;

use glam::Vec3;
use image::{ImageBuffer, Rgb};

use crate::terrain::FALLBACK_TERRAIN;
use crate::tiling::{Tile, TileId};
use crate::world::World;

use super::ExportError;

/// Which per-tile field the preview colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapLayer {
    Terrain,
    Elevation,
    Plates,
    Temperature,
    Moisture,
}

impl MapLayer {
    pub fn name(&self) -> &'static str {
        match self {
            MapLayer::Terrain => "terrain",
            MapLayer::Elevation => "elevation",
            MapLayer::Plates => "plates",
            MapLayer::Temperature => "temperature",
            MapLayer::Moisture => "moisture",
        }
    }
}

/// Renders an equirectangular preview (width × width/2) of the selected
/// layer and writes it as PNG.
pub fn export_world_png(
    world: &World,
    layer: MapLayer,
    width: u32,
    path: &Path,
) -> Result<(), ExportError> {
    if world.num_tiles() == 0 {
        return Err(ExportError::EmptyWorld);
    }
    let height = (width / 2).max(1);
    let mut img: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::new(width, height);

    let mut hint = TileId(0);
    for y in 0..height {
        let lat = std::f32::consts::PI * (0.5 - (y as f32 + 0.5) / height as f32);
        for x in 0..width {
            let lon =
                2.0 * std::f32::consts::PI * ((x as f32 + 0.5) / width as f32) - std::f32::consts::PI;
            let dir = Vec3::new(
                lat.cos() * lon.cos(),
                lat.sin(),
                lat.cos() * lon.sin(),
            );

            hint = nearest_tile(world, dir, hint);
            let tile = world.tile(hint).expect("hint stays in range");
            let [r, g, b] = layer_color(world, tile, layer);
            img.put_pixel(x, y, Rgb([r, g, b]));
        }
    }

    img.save(path)?;
    Ok(())
}

/// Greedy walk on the adjacency graph toward the tile whose center best
/// aligns with `dir`. Consecutive pixels are near each other, so the walk
/// is a handful of hops; spherical Voronoi cells are convex enough that
/// the local optimum is the global one in practice.
fn nearest_tile(world: &World, dir: Vec3, start: TileId) -> TileId {
    let mut current = start;
    let mut current_dot = world
        .tile(current)
        .map(|t| t.center.dot(dir))
        .unwrap_or(f32::MIN);

    loop {
        let tile = match world.tile(current) {
            Some(t) => t,
            None => return current,
        };
        let mut best = current;
        let mut best_dot = current_dot;
        for &nb in &tile.neighbors {
            if let Some(neighbor) = world.tile(nb) {
                let d = neighbor.center.dot(dir);
                if d > best_dot {
                    best = nb;
                    best_dot = d;
                }
            }
        }
        if best == current {
            return current;
        }
        current = best;
        current_dot = best_dot;
    }
}

fn layer_color(world: &World, tile: &Tile, layer: MapLayer) -> [u8; 3] {
    match layer {
        MapLayer::Terrain => {
            world.color_for(tile.terrain.unwrap_or(FALLBACK_TERRAIN), tile.elevation)
        }
        MapLayer::Elevation => elevation_color(tile.elevation),
        MapLayer::Plates => match tile.plate {
            Some(plate_id) => {
                let plate = &world.plates()[plate_id.index()];
                let hue = plate_id.0 as f32 / world.plates().len().max(1) as f32 * 360.0;
                let lightness = if plate.is_oceanic { 0.35 } else { 0.55 };
                hsl_to_rgb(hue, 0.55, lightness)
            }
            None => [0, 0, 0],
        },
        MapLayer::Temperature => world.color_for_temperature(tile.temperature),
        MapLayer::Moisture => world.color_for_moisture(tile.moisture),
    }
}

/// Hypsometric tint: deep blue through shallows, green lowlands, brown
/// uplands, white peaks.
fn elevation_color(elevation: f32) -> [u8; 3] {
    let lerp = |a: [u8; 3], b: [u8; 3], t: f32| -> [u8; 3] {
        let t = t.clamp(0.0, 1.0);
        [
            (a[0] as f32 + (b[0] as f32 - a[0] as f32) * t) as u8,
            (a[1] as f32 + (b[1] as f32 - a[1] as f32) * t) as u8,
            (a[2] as f32 + (b[2] as f32 - a[2] as f32) * t) as u8,
        ]
    };

    if elevation <= 0.0 {
        lerp([5, 15, 80], [90, 150, 210], 1.0 + elevation)
    } else if elevation < 0.4 {
        lerp([85, 160, 85], [170, 175, 100], elevation / 0.4)
    } else if elevation < 0.75 {
        lerp([170, 175, 100], [130, 105, 80], (elevation - 0.4) / 0.35)
    } else {
        lerp([130, 105, 80], [245, 245, 250], (elevation - 0.75) / 0.25)
    }
}

fn hsl_to_rgb(h: f32, s: f32, l: f32) -> [u8; 3] {
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let h_prime = (h / 60.0).rem_euclid(6.0);
    let x = c * (1.0 - (h_prime % 2.0 - 1.0).abs());

    let (r1, g1, b1) = match h_prime as i32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    let m = l - c / 2.0;
    [
        ((r1 + m) * 255.0) as u8,
        ((g1 + m) * 255.0) as u8,
        ((b1 + m) * 255.0) as u8,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::WorldSettings;

    fn world() -> World {
        World::generate(WorldSettings {
            num_tiles: 80,
            ..WorldSettings::earth_like(5.into())
        })
        .unwrap()
    }

    #[test]
    fn nearest_tile_walk_finds_the_true_nearest() {
        let world = world();
        // Check against brute force for a spread of directions.
        for (i, probe) in world.tiles().step_by(7).enumerate() {
            let dir = probe.center;
            let walked = nearest_tile(&world, dir, TileId((i % 3) as u32));
            let brute = world
                .tiles()
                .max_by(|a, b| a.center.dot(dir).total_cmp(&b.center.dot(dir)))
                .unwrap()
                .id;
            assert_eq!(walked, brute);
        }
    }

    #[test]
    fn elevation_ramp_distinguishes_water_from_land() {
        let deep = elevation_color(-0.9);
        let land = elevation_color(0.3);
        // Water is blue-dominant, lowland green-dominant.
        assert!(deep[2] > deep[0]);
        assert!(land[1] > land[2]);
    }

    #[test]
    fn every_layer_produces_a_color_for_every_tile() {
        let world = world();
        for layer in [
            MapLayer::Terrain,
            MapLayer::Elevation,
            MapLayer::Plates,
            MapLayer::Temperature,
            MapLayer::Moisture,
        ] {
            for tile in world.tiles() {
                let _ = layer_color(&world, tile, layer);
            }
        }
    }

    #[test]
    fn hsl_primaries_are_sane() {
        let red = hsl_to_rgb(0.0, 1.0, 0.5);
        assert!(red[0] > 200 && red[1] < 40 && red[2] < 40);
        let green = hsl_to_rgb(120.0, 1.0, 0.5);
        assert!(green[1] > 200);
    }
}
