use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use log::info;

use prisme::Float;
use prisme_json::{serde_json, JsonSer};
use prisme_random::{
    rand::{rngs::StdRng, SeedableRng},
    random_scene,
};
use prisme_shapes::Rectangle;

use std::{fs::File, path::PathBuf};

#[derive(Parser)]
#[command(name = "gen_rand_scene")]
#[command(about = "Generate a random JSON scene")]
#[command(version)]
struct Cli {
    /// Where to write the scene
    output: PathBuf,

    /// Width of the canvas
    #[arg(long, default_value_t = 800.)]
    width: Float,

    /// Height of the canvas
    #[arg(long, default_value_t = 600.)]
    height: Float,

    /// Number of objects
    #[arg(short = 'n', long, default_value_t = 12)]
    objects: usize,

    /// Number of emitters
    #[arg(short, long, default_value_t = 3)]
    emitters: usize,

    /// Seed for the random generator, for reproducible scenes
    #[arg(short, long)]
    seed: Option<u64>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let canvas = Rectangle::try_from_corner(0., 0., cli.width, cli.height)
        .context("invalid canvas size")?;

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let scene = random_scene(&mut rng, &canvas, cli.objects, cli.emitters);

    let file = File::create(&cli.output)
        .with_context(|| format!("unable to create {}", cli.output.display()))?;
    serde_json::to_writer_pretty(file, &scene.to_json())?;

    info!(
        "wrote a scene of {} objects and {} emitters to {}",
        scene.objects.len(),
        scene.emitters.len(),
        cli.output.display()
    );

    Ok(())
}
