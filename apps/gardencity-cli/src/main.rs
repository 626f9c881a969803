use anyhow::Context;
use clap::{Parser, Subcommand};
use gardencity_assets::PrefabLibrary;
use gardencity_kernel::Scene;
use gardencity_layout::{Cell, PlotStack, Site};
use gardencity_render::{DebugTextRenderer, Renderer};
use gardencity_scatter::FrameTimer;
use gardencity_seed::{Seed, SeedManager, SeedOrigin};
use gardencity_tools::WorldInspector;
use gardencity_world::{Experience, WorldConfig};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

const DEFAULT_URL: &str = "http://localhost:5173/";

#[derive(Parser)]
#[command(name = "gardencity-cli", about = "Seeded procedural garden-city generator")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// World config (YAML). Defaults are used when absent.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print crate info
    Info,
    /// Resolve the session seed from a page URL
    Seed {
        #[arg(short, long, default_value = DEFAULT_URL)]
        url: String,
        /// Always generate a fresh seed
        #[arg(short, long)]
        randomize: bool,
    },
    /// Build a garden and print its summary
    Generate {
        /// Seed text; a fresh seed is generated when absent
        #[arg(short, long)]
        seed: Option<String>,
        /// Also list every scene node
        #[arg(long)]
        nodes: bool,
    },
    /// Run the update loop on a synthetic clock
    Simulate {
        #[arg(short, long)]
        seed: Option<String>,
        #[arg(short, long, default_value = "600")]
        frames: u64,
        /// Synthetic time between frames
        #[arg(long, default_value = "16")]
        frame_ms: u64,
        /// Print the last frame's uploads and lighting
        #[arg(long)]
        show_last: bool,
    },
    /// Print the lighting state for an arc value
    Sky {
        #[arg(short, long)]
        arc: f64,
    },
    /// Write sites, cells and plot stacks as JSON
    Export {
        #[arg(short, long)]
        seed: Option<String>,
        #[arg(short, long)]
        out: PathBuf,
    },
}

/// The layout part of a garden, as exported.
#[derive(Serialize)]
struct LayoutExport<'a> {
    seed: String,
    fingerprint: String,
    scheme: [String; 3],
    sites: &'a [Site],
    cells: &'a [Cell],
    stacks: &'a [PlotStack],
}

fn load_config(path: Option<&Path>) -> anyhow::Result<WorldConfig> {
    match path {
        Some(path) => WorldConfig::load(path).with_context(|| format!("loading config {}", path.display())),
        None => Ok(WorldConfig::default()),
    }
}

fn resolve_seed(text: Option<&str>) -> anyhow::Result<Seed> {
    match text {
        Some(text) => Seed::parse(text).with_context(|| format!("parsing seed {text:?}")),
        None => Ok(SeedManager::get_or_create(DEFAULT_URL).seed),
    }
}

fn build(seed: Option<&str>, config: WorldConfig) -> anyhow::Result<Experience> {
    let seed = resolve_seed(seed)?;
    let experience = Experience::new(seed, config, &PrefabLibrary::builtin()).context("generating garden")?;
    Ok(experience)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Info => {
            println!("gardencity-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("kernel: nodes={}", Scene::new().node_count());
            println!("seed: {}", gardencity_seed::crate_info());
            println!("assets: {}", gardencity_assets::crate_info());
            println!("layout: {}", gardencity_layout::crate_info());
            println!("scatter: {}", gardencity_scatter::crate_info());
            println!("sky: {}", gardencity_sky::crate_info());
            println!("render: {}", gardencity_render::crate_info());
            println!("tools: {}", gardencity_tools::crate_info());
            println!("world: {}", gardencity_world::crate_info());
        }
        Commands::Seed { url, randomize } => {
            let session = if randomize {
                SeedManager::randomize(&url)
            } else {
                SeedManager::get_or_create(&url)
            };
            let origin = match &session.origin {
                SeedOrigin::Url => "url".to_string(),
                SeedOrigin::Generated => "generated".to_string(),
                SeedOrigin::Recovered(err) => format!("recovered ({err})"),
            };
            println!("seed:   {}", session.share_text());
            println!("origin: {origin}");
            println!("url:    {}", session.url);
        }
        Commands::Generate { seed, nodes } => {
            let experience = build(seed.as_deref(), config)?;
            println!("{}", WorldInspector::summary(&experience));
            println!("fingerprint: {}", experience.fingerprint());
            if nodes {
                print!("{}", DebugTextRenderer::new().render(experience.scene()));
            }
        }
        Commands::Simulate {
            seed,
            frames,
            frame_ms,
            show_last,
        } => {
            let mut experience = build(seed.as_deref(), config)?;
            let mut renderer = DebugTextRenderer::new();
            let mut timer = FrameTimer::new(120);
            let mut last_output = String::new();
            let mut ticks = 0u64;
            for frame in 0..frames {
                let now = Duration::from_millis(frame * frame_ms);
                let start = Instant::now();
                let report = experience.update(now, &mut renderer)?;
                if report.selection.is_some() {
                    timer.record(start.elapsed());
                    ticks += 1;
                }
                last_output = renderer.take_output();
            }

            let scheduler = experience.scheduler();
            println!(
                "Simulated {frames} frames ({frame_ms} ms apart): {} particle ticks, {} skipped",
                scheduler.accepted(),
                scheduler.skipped()
            );
            for group in experience.groups() {
                println!("  {}: {} slots, {} respawns", group.name(), group.len(), group.respawns());
            }
            println!(
                "Tick time over last {} of {ticks}: avg={:?} min={:?} max={:?}",
                timer.count(),
                timer.average(),
                timer.min(),
                timer.max()
            );
            println!("arc: {:.4}", experience.arc());
            println!("fingerprint: {}", experience.fingerprint());
            if show_last {
                print!("{last_output}");
            }
        }
        Commands::Sky { arc } => {
            let driver = config.day_night_driver()?;
            println!("{}", driver.evaluate(arc));
        }
        Commands::Export { seed, out } => {
            let experience = build(seed.as_deref(), config)?;
            let export = LayoutExport {
                seed: experience.seed().to_string(),
                fingerprint: experience.fingerprint(),
                scheme: experience.scheme().hex(),
                sites: experience.sites(),
                cells: &experience.diagram().cells,
                stacks: &experience.layout().stacks,
            };
            let file = std::fs::File::create(&out).with_context(|| format!("creating {}", out.display()))?;
            serde_json::to_writer_pretty(file, &export)?;
            tracing::debug!(path = %out.display(), "layout exported");
            println!(
                "Exported {} sites and {} stacks to {}",
                export.sites.len(),
                export.stacks.len(),
                out.display()
            );
        }
    }

    Ok(())
}
