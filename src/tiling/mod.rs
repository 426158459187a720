//! Spherical tiling: sites, adjacency, and the tile arena.
//!
//! Generates quasi-uniform sites on the unit sphere, perturbs them by the
//! configured jitter, and derives tile adjacency as the dual of the
//! spherical Delaunay triangulation. Tiles live in a flat arena addressed
//! by dense [`TileId`] indices; neighbor lists store ids, not pointers.

pub mod hull;
pub mod points;

use std::collections::BTreeSet;
use std::f64::consts::PI;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::GenError;
use crate::rng::Mulberry32;
use crate::tectonics::PlateId;
use crate::terrain::TerrainId;

pub use points::PointDistribution;

/// Dense index of a tile within its world's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileId(pub u32);

impl TileId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One region of the spherical surface tessellation.
///
/// Created with neutral fields by the tiling stage; elevation and plate
/// membership are filled by the plate stage, moisture/temperature and the
/// water flags by the climate stage, and `terrain` by classification.
/// After a generation pass completes the tile is not mutated again until a
/// full regeneration replaces the whole arena.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tile {
    pub id: TileId,
    /// Unit vector to the tile's site on the sphere.
    pub center: Vec3,
    /// Neighboring tile ids, sorted ascending. Symmetric: if A lists B,
    /// B lists A.
    pub neighbors: Vec<TileId>,
    /// Tile area in steradians (the whole sphere sums to 4π).
    pub area: f32,
    /// Elevation in [-1, 1]; negative is below sea level.
    pub elevation: f32,
    /// Moisture in [0, 1].
    pub moisture: f32,
    /// Temperature in [0, 1].
    pub temperature: f32,
    /// Owning plate, assigned by the plate stage.
    pub plate: Option<PlateId>,
    /// True if this tile is part of the planet's connected ocean body.
    pub is_ocean_connected: bool,
    /// True for lake tiles and for land tiles bordering a lake.
    pub is_lake_adjacent: bool,
    /// Classified terrain, assigned once per generation pass.
    pub terrain: Option<TerrainId>,
}

impl Tile {
    fn new(id: TileId, center: Vec3) -> Self {
        Self {
            id,
            center,
            neighbors: Vec::new(),
            area: 0.0,
            elevation: 0.0,
            moisture: 0.5,
            temperature: 0.5,
            plate: None,
            is_ocean_connected: false,
            is_lake_adjacent: false,
            terrain: None,
        }
    }
}

/// Bounded retries before a degenerate tiling is surfaced to the caller.
const MAX_BUILD_ATTEMPTS: u32 = 3;

/// Builds the tile arena: sites, adjacency, and per-tile areas.
///
/// On an Euler-invariant violation the sites are re-perturbed and the build
/// retried up to [`MAX_BUILD_ATTEMPTS`] times; a persistent violation is a
/// [`GenError::DegenerateGeometry`], never silently ignored.
pub fn build_tiles(
    num_tiles: usize,
    jitter: f32,
    distribution: PointDistribution,
    rng: &mut Mulberry32,
) -> Result<Vec<Tile>, GenError> {
    let mut sites = points::base_points(distribution, num_tiles, rng);
    points::apply_jitter(&mut sites, jitter.clamp(0.0, 1.0), rng);

    if num_tiles < 4 {
        return Ok(tiny_tiling(&sites));
    }

    for attempt in 1..=MAX_BUILD_ATTEMPTS {
        match try_build(&sites) {
            Some(tiles) => return Ok(tiles),
            None if attempt < MAX_BUILD_ATTEMPTS => {
                log::warn!(
                    "tiling attempt {attempt} produced a degenerate graph; re-perturbing sites"
                );
                points::apply_jitter(&mut sites, 0.2, rng);
            }
            None => {}
        }
    }

    Err(GenError::DegenerateGeometry {
        attempts: MAX_BUILD_ATTEMPTS,
    })
}

/// Fewer than four tiles cannot form a triangulation; every pair of tiles
/// is mutually adjacent and the sphere is split evenly.
fn tiny_tiling(sites: &[Vec3]) -> Vec<Tile> {
    let n = sites.len();
    let area = (4.0 * PI / n.max(1) as f64) as f32;
    sites
        .iter()
        .enumerate()
        .map(|(i, &center)| {
            let mut tile = Tile::new(TileId(i as u32), center);
            tile.neighbors = (0..n)
                .filter(|&j| j != i)
                .map(|j| TileId(j as u32))
                .collect();
            tile.area = area;
            tile
        })
        .collect()
}

fn try_build(sites: &[Vec3]) -> Option<Vec<Tile>> {
    let triangles = hull::convex_hull(sites).ok()?;

    let n = sites.len();
    let mut neighbor_sets: Vec<BTreeSet<TileId>> = vec![BTreeSet::new(); n];
    let mut areas = vec![0.0f64; n];
    let mut edges: BTreeSet<(usize, usize)> = BTreeSet::new();

    for tri in &triangles {
        for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
            neighbor_sets[a].insert(TileId(b as u32));
            neighbor_sets[b].insert(TileId(a as u32));
            edges.insert(if a < b { (a, b) } else { (b, a) });
        }
        // Each triangle's area is split evenly among its three corner tiles.
        let excess = spherical_excess(sites[tri[0]], sites[tri[1]], sites[tri[2]]);
        for &v in tri {
            areas[v] += excess / 3.0;
        }
    }

    // Topological invariant of a triangulated sphere: V - E + F = 2.
    // A violation means duplicate or skipped sites.
    let euler = n as i64 - edges.len() as i64 + triangles.len() as i64;
    if euler != 2 || neighbor_sets.iter().any(|s| s.len() < 3) {
        return None;
    }

    Some(
        sites
            .iter()
            .enumerate()
            .map(|(i, &center)| {
                let mut tile = Tile::new(TileId(i as u32), center);
                tile.neighbors = neighbor_sets[i].iter().copied().collect();
                tile.area = areas[i] as f32;
                tile
            })
            .collect(),
    )
}

/// Solid angle of the spherical triangle a-b-c (unit vectors), via
/// van Oosterom & Strackee.
fn spherical_excess(a: Vec3, b: Vec3, c: Vec3) -> f64 {
    let (a, b, c) = (a.as_dvec3(), b.as_dvec3(), c.as_dvec3());
    let numer = a.dot(b.cross(c)).abs();
    let denom = 1.0 + a.dot(b) + b.dot(c) + c.dot(a);
    2.0 * numer.atan2(denom)
}
