use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use camera_filters::{
    assets::load_image,
    composition::{FilterPipeline, LoopingOverlay, OverlayLayer},
    config::Config,
    filters::FilterRegistry,
    frame::Frame,
};

#[derive(Parser)]
#[command(
    name = "camera-filters",
    version,
    about = "Apply real-time camera filters to still images",
    long_about = "Runs an image through the same filter pipeline the camera uses: pick a filter by name, set its intensity, and optionally layer an overlay image on top."
)]
struct Cli {
    /// List available filters and exit
    #[arg(short, long)]
    list: bool,

    /// Input image (PNG, JPEG)
    #[arg(short, long, required_unless_present = "list")]
    input: Option<PathBuf>,

    /// Output PNG path
    #[arg(short, long, required_unless_present = "list")]
    output: Option<PathBuf>,

    /// Filter to apply (see --list)
    #[arg(short, long)]
    filter: Option<String>,

    /// Filter intensity; defaults to the filter's own default
    #[arg(long)]
    intensity: Option<f32>,

    /// Overlay image composited on top of the filtered frame
    #[arg(long)]
    overlay: Option<PathBuf>,

    /// Configuration file (optional)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for random filters (static, glitch)
    #[arg(long)]
    seed: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if cli.list {
        print_filters(&FilterRegistry::new());
        return Ok(());
    }

    info!("Starting camera-filters v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let mut config = match &cli.config {
        Some(config_path) => {
            info!("Loading configuration from {:?}", config_path);
            Config::from_file(config_path)?
        }
        None => {
            info!("Using default configuration");
            Config::default()
        }
    };
    if cli.seed.is_some() {
        config.engine.random_seed = cli.seed;
    }

    let mut pipeline = FilterPipeline::from_config(&config)?;

    if let Some(name) = &cli.filter {
        let intensity = match cli.intensity {
            Some(value) => value,
            None => default_intensity(pipeline.registry(), name),
        };
        info!("Filter: {} at {:.3}", name, intensity);
        pipeline.select(name.clone(), intensity);
    }

    if let Some(path) = &cli.overlay {
        let image = load_image(path).with_context(|| format!("loading overlay {:?}", path))?;
        pipeline.set_overlay(Some(OverlayLayer::from_config(LoopingOverlay::still(image), &config.overlay)));
        info!("Overlay: {:?}", path);
    }

    let input = cli.input.context("--input is required")?;
    let output = cli.output.context("--output is required")?;

    let decoded = image::open(&input).with_context(|| format!("reading {:?}", input))?;
    let frame = Frame::from_dynamic(&decoded);
    info!("Input: {:?} ({}x{})", input, frame.width(), frame.height());

    let result = pipeline.process(&frame);
    result
        .save_png(&output)
        .with_context(|| format!("writing {:?}", output))?;

    let stats = pipeline.stats();
    if stats.passed_through > 0 {
        info!("Filter could not be applied; the image was written unfiltered");
    }
    info!("Done! Output saved to: {:?}", output);
    Ok(())
}

fn default_intensity(registry: &FilterRegistry, name: &str) -> f32 {
    registry
        .lookup(name)
        .ok()
        .and_then(|descriptor| descriptor.primary_parameter())
        .map_or(0.0, |spec| spec.default)
}

fn print_filters(registry: &FilterRegistry) {
    println!("{:<28} {:<18} {:<11} {}", "NAME", "LABEL", "CATEGORY", "INTENSITY");
    for descriptor in registry.list() {
        let range = match descriptor.primary_parameter() {
            Some(spec) => format!("{} [{} .. {}] default {}", spec.key, spec.min, spec.max, spec.default),
            None => "-".to_string(),
        };
        println!(
            "{:<28} {:<18} {:<11} {}",
            descriptor.name, descriptor.label, descriptor.category, range
        );
    }
}
