use anyhow::{bail, Context};
use clap::Parser;
use env_logger::Env;
use log::{debug, info};

use prisme::*;
use prisme_json::{serde_json, JsonDes, JsonSer};
use prisme_render::{Color, DrawContext, SvgCanvas};
use prisme_shapes::*;

use std::{fs::File, path::PathBuf};

#[derive(Parser)]
#[command(name = "run_scene")]
#[command(about = "Cast the rays of a JSON scene and draw them into an SVG file")]
#[command(version)]
struct Cli {
    /// JSON scene to load
    scene: PathBuf,

    /// SVG file to write
    #[arg(short, long, default_value = "scene.svg")]
    output: PathBuf,

    /// Overrides the scene's maximum number of steps per ray
    #[arg(long)]
    iteration_cap: Option<usize>,

    /// Overrides the scene's minimum travel distance between two hits
    #[arg(long)]
    epsilon: Option<Float>,

    /// Also write the paths of every ray to this JSON file
    #[arg(long)]
    paths: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// The area to draw: the scene's bounds, or the bounding box of everything in it.
fn drawing_area(scene: &Scene, emissions: &[Emission]) -> anyhow::Result<Rectangle> {
    if let Some(bounds) = scene.bounds {
        return Ok(bounds.bounding_box());
    }

    let points: Vec<Vec2> = scene
        .objects
        .iter()
        .flat_map(|o| o.bounding_box().corners())
        .chain(
            emissions
                .iter()
                .flat_map(|e| &e.rays)
                .flat_map(Ray::path)
                .flat_map(|l| [l.start, l.end]),
        )
        .collect();

    let Some(first) = points.first() else {
        bail!("the scene is empty and has no bounds, nothing to draw");
    };

    let (min, max) = points
        .iter()
        .fold((*first, *first), |(min, max), p| (min.inf(p), max.sup(p)));

    let margin = (max - min).max() * 0.05;

    Ok(Rectangle::try_from_corner(
        min.x - margin,
        min.y - margin,
        max.x - min.x + 2. * margin,
        max.y - min.y + 2. * margin,
    )?)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let file = File::open(&cli.scene)
        .with_context(|| format!("unable to open {}", cli.scene.display()))?;
    let json: serde_json::Value = serde_json::from_reader(file)?;

    let mut scene = Scene::from_json(&json)
        .with_context(|| format!("invalid scene in {}", cli.scene.display()))?;

    if let Some(cap) = cli.iteration_cap {
        scene.params.iteration_cap = cap;
    }
    if let Some(epsilon) = cli.epsilon {
        scene.params = scene
            .params
            .try_with_epsilon(epsilon)
            .context("invalid --epsilon")?;
    }
    debug!("ray parameters: {:?}", scene.params);

    info!(
        "loaded {} objects and {} emitters from {}",
        scene.objects.len(),
        scene.emitters.len(),
        cli.scene.display()
    );

    let emissions = scene.run();

    let num_rays: usize = emissions.iter().map(|e| e.rays.len()).sum();
    info!("cast {num_rays} rays");

    if let Some(path) = &cli.paths {
        let file = File::create(path)
            .with_context(|| format!("unable to create {}", path.display()))?;
        serde_json::to_writer_pretty(file, &emissions.to_json())?;
        info!("wrote ray paths to {}", path.display());
    }

    let area = drawing_area(&scene, &emissions)?;
    if area.area() <= 0. {
        bail!("nothing to draw: the scene has an empty area");
    }

    let mut canvas = SvgCanvas::covering(&area).with_background(Color::WHITE);

    {
        let mut ctx = DrawContext::new(&mut canvas);
        ctx.draw(&scene);

        ctx.set_stroke(Some(Color::RED.with_alpha(0.8)));
        ctx.set_stroke_width(area.width().max(area.height()) / 800.);
        ctx.draw(&emissions);
    }

    canvas.save(&cli.output)?;
    info!("wrote {}", cli.output.display());

    Ok(())
}
