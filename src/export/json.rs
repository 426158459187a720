//! JSON export of a generated world.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use serde::Serialize;

use crate::tectonics::Plate;
use crate::tiling::Tile;
use crate::world::{World, WorldSettings};

use super::ExportError;

#[derive(Serialize)]
struct WorldDump<'a> {
    settings: &'a WorldSettings,
    tiles: &'a [Tile],
    plates: &'a [Plate],
}

/// Writes the full world (settings, tiles, plates) as pretty JSON.
pub fn export_world_json(world: &World, path: &Path) -> Result<(), ExportError> {
    let dump = WorldDump {
        settings: world.settings(),
        tiles: &world.tiles,
        plates: world.plates(),
    };
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dump_round_trips_tile_count() {
        let world = World::generate(WorldSettings {
            num_tiles: 24,
            ..WorldSettings::earth_like(7.into())
        })
        .unwrap();

        let dump = WorldDump {
            settings: world.settings(),
            tiles: &world.tiles,
            plates: world.plates(),
        };
        let text = serde_json::to_string(&dump).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["tiles"].as_array().unwrap().len(), 24);
        assert_eq!(parsed["settings"]["num_tiles"], 24);
    }
}
