//! Mannequin replay - feed a recorded gesture script through the poser
//!
//! Builds the armature into an in-memory scene, applies every event in
//! order and prints the resulting pose.

use anyhow::Context;
use clap::Parser;
use glam::Vec2;
use serde::Deserialize;
use std::path::PathBuf;
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use mannequin::{
    config::Config, math::radians_to_degrees, ArmatureSpec, CameraRig, InputEvent, MemoryScene,
    Poser, Scene,
};

/// Name of the camera rig node in the replay scene.
const CAMERA_NODE: &str = "selfieStick";

/// Replay a gesture script against an armature description
#[derive(Parser, Debug)]
#[command(name = "mannequin-replay", version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Armature description (JSON or TOML; overrides config)
    #[arg(short, long)]
    armature: Option<PathBuf>,

    /// Event script (JSON)
    #[arg(short, long)]
    events: PathBuf,

    /// Print every pose change as it happens
    #[arg(long)]
    trace_changes: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Screen-space circle that a tap resolves to a segment.
#[derive(Debug, Deserialize)]
struct HitRegion {
    segment: String,
    center: Vec2,
    radius: f32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ReplayScript {
    hit_regions: Vec<HitRegion>,
    events: Vec<InputEvent>,
}

/// A script is either a bare event list or an object with hit regions.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ScriptFile {
    Events(Vec<InputEvent>),
    Script(ReplayScript),
}

impl From<ScriptFile> for ReplayScript {
    fn from(file: ScriptFile) -> Self {
        match file {
            ScriptFile::Events(events) => ReplayScript {
                hit_regions: Vec::new(),
                events,
            },
            ScriptFile::Script(script) => script,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(log_level.into())
                .from_env_lossy(),
        )
        .init();

    info!("Starting {} v{}", mannequin::NAME, mannequin::VERSION);

    let config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load()?,
    };
    config.validate()?;

    let armature_path = args
        .armature
        .clone()
        .or_else(|| config.armature.path.clone())
        .context("No armature description given (use --armature or armature.path)")?;
    let spec = ArmatureSpec::from_file(&armature_path, config.armature.format)
        .with_context(|| format!("Failed to load armature from {}", armature_path.display()))?;

    let script_text = std::fs::read_to_string(&args.events)
        .with_context(|| format!("Failed to read events from {}", args.events.display()))?;
    let script: ReplayScript = serde_json::from_str::<ScriptFile>(&script_text)
        .with_context(|| format!("Failed to parse events in {}", args.events.display()))?
        .into();

    let mut scene = MemoryScene::new();
    let camera = scene.add_empty(scene.root(), CAMERA_NODE);
    let mut poser = Poser::new(&spec, CameraRig::new(camera), config.gestures.clone(), scene);

    for region in &script.hit_regions {
        match poser.armature().find(&region.segment).map(|s| s.node()) {
            Some(node) => poser.scene_mut().set_hit_region(node, region.center, region.radius),
            None => warn!("Hit region for unknown segment '{}' skipped", region.segment),
        }
    }

    info!("Replaying {} events", script.events.len());
    for event in script.events {
        let change = poser.dispatch(event);
        if args.trace_changes {
            if let Some(change) = change {
                println!("{}", serde_json::to_string(&change)?);
            }
        }
    }

    print_pose(&poser);
    Ok(())
}

fn print_pose<S: Scene>(poser: &Poser<S>) {
    for segment in poser.armature().segments() {
        let o = radians_to_degrees(segment.orientation());
        println!(
            "{:<16} x={:>8.2} y={:>8.2} z={:>8.2}",
            segment.name(),
            o.x,
            o.y,
            o.z
        );
    }
    let cam = radians_to_degrees(poser.camera().orientation());
    println!("{:<16} x={:>8.2} y={:>8.2} z={:>8.2}", CAMERA_NODE, cam.x, cam.y, cam.z);
    if let Some(selected) = poser.selected() {
        println!("selected: {selected}");
    }
}
