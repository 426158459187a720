//! Planetgen CLI - deterministic tile-planet generator.
//!
//! Generates a seeded tile world and exports preview maps and/or the full
//! world data as JSON.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Instant;

use planetgen::export::{export_world_json, export_world_png, MapLayer};
use planetgen::{PointDistribution, Seed, World, WorldSettings};

/// Deterministic tile-planet generator.
#[derive(Parser)]
#[command(name = "planetgen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a world and export it.
    Generate {
        /// Seed: an integer, or any other string for a text seed.
        #[arg(short, long, default_value = "42")]
        seed: String,

        /// Number of surface tiles.
        #[arg(short = 'n', long, default_value = "2000")]
        tiles: u32,

        /// Number of tectonic plates.
        #[arg(short, long, default_value = "12")]
        plates: u32,

        /// Site jitter (0 = regular, 1 = maximally perturbed).
        #[arg(short, long, default_value = "0.5")]
        jitter: f32,

        /// Base point-distribution variant.
        #[arg(short, long, default_value = "fibonacci")]
        algorithm: AlgorithmArg,

        /// Uniform elevation bias applied after plate assignment.
        #[arg(long, default_value = "0.0")]
        elevation_bias: f32,

        /// Output directory for generated files.
        #[arg(short, long, default_value = "./output")]
        output: PathBuf,

        /// Base name for output files.
        #[arg(long, default_value = "planet")]
        name: String,

        /// Preview image width in pixels (height is width/2).
        #[arg(long, default_value = "1024")]
        width: u32,

        /// Map layers to export as PNG.
        #[arg(long, value_delimiter = ',', default_value = "terrain")]
        maps: Vec<LayerArg>,

        /// Also dump the full world as JSON.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum AlgorithmArg {
    Fibonacci,
    Random,
    Stratified,
}

impl From<AlgorithmArg> for PointDistribution {
    fn from(arg: AlgorithmArg) -> Self {
        match arg {
            AlgorithmArg::Fibonacci => PointDistribution::Fibonacci,
            AlgorithmArg::Random => PointDistribution::Random,
            AlgorithmArg::Stratified => PointDistribution::Stratified,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum LayerArg {
    Terrain,
    Elevation,
    Plates,
    Temperature,
    Moisture,
}

impl From<LayerArg> for MapLayer {
    fn from(arg: LayerArg) -> Self {
        match arg {
            LayerArg::Terrain => MapLayer::Terrain,
            LayerArg::Elevation => MapLayer::Elevation,
            LayerArg::Plates => MapLayer::Plates,
            LayerArg::Temperature => MapLayer::Temperature,
            LayerArg::Moisture => MapLayer::Moisture,
        }
    }
}

fn parse_seed(raw: &str) -> Seed {
    match raw.parse::<u32>() {
        Ok(n) => Seed::Number(n),
        Err(_) => Seed::Text(raw.to_string()),
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            seed,
            tiles,
            plates,
            jitter,
            algorithm,
            elevation_bias,
            output,
            name,
            width,
            maps,
            json,
        } => {
            let settings = WorldSettings {
                num_tiles: tiles,
                jitter,
                num_plates: plates,
                algorithm: algorithm.into(),
                elevation_bias,
                seed: parse_seed(&seed),
            };

            let start = Instant::now();
            let world = match World::generate(settings) {
                Ok(world) => world,
                Err(err) => {
                    eprintln!("generation failed: {err}");
                    std::process::exit(1);
                }
            };
            log::info!(
                "generated {} tiles / {} plates in {:?}",
                world.num_tiles(),
                world.plates().len(),
                start.elapsed()
            );

            if let Err(err) = std::fs::create_dir_all(&output) {
                eprintln!("cannot create output directory: {err}");
                std::process::exit(1);
            }

            for layer_arg in maps {
                let layer: MapLayer = layer_arg.into();
                let path = output.join(format!("{name}_{}.png", layer.name()));
                match export_world_png(&world, layer, width, &path) {
                    Ok(()) => println!("wrote {}", path.display()),
                    Err(err) => {
                        eprintln!("export failed: {err}");
                        std::process::exit(1);
                    }
                }
            }

            if json {
                let path = output.join(format!("{name}.json"));
                match export_world_json(&world, &path) {
                    Ok(()) => println!("wrote {}", path.display()),
                    Err(err) => {
                        eprintln!("export failed: {err}");
                        std::process::exit(1);
                    }
                }
            }
        }
    }
}
