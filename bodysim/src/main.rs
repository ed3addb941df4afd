use bodysim::{ScenarioConfig, Scenario, PngRenderer, RenderDispatcher, VideoEncoder, clean_frames};

use clap::Parser;
use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "bodysim", version, about = "Simulate colliding bodies and render the run to video")]
struct Args {
    /// Scenario file, or a name under the bundled `scenarios/` directory
    #[arg(short, default_value = "earth_moon.yaml")]
    file_name: String,

    /// Render frames but do not encode a video
    #[arg(long)]
    no_video: bool,

    /// Keep frame images after encoding
    #[arg(long)]
    keep_frames: bool,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

fn init_logging(args: &Args) {
    let level = match (args.quiet, args.verbose) {
        (true, _) => "warn",
        (false, 0) => "info",
        (false, 1) => "debug",
        _ => "trace",
    };
    // RUST_LOG wins over the flags when set
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Direct path first, then the bundled scenario directory
fn scenario_path(file_name: &str) -> PathBuf {
    let direct = PathBuf::from(file_name);
    if direct.exists() {
        return direct;
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(file_name)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args);

    let path = scenario_path(&args.file_name);
    let scenario_cfg = ScenarioConfig::from_path(&path)
        .with_context(|| format!("failed to load scenario {}", path.display()))?;
    let scenario = Scenario::build_scenario(scenario_cfg).context("invalid scenario")?;
    let render_rate = scenario.run.render_rate;
    let frame = scenario.frame;

    let (mut engine, output) = scenario.into_engine().context("invalid run parameters")?;
    let renderer = PngRenderer::new(frame, &output.directory)
        .with_context(|| format!("cannot create frame directory {}", output.directory.display()))?;
    let dispatcher = RenderDispatcher::new(Arc::new(renderer), output.workers, output.max_in_flight)?;

    info!(scenario = %path.display(), bodies = engine.world.len(), "loaded scenario");
    let summary = engine.run(dispatcher);
    if !summary.render.failed.is_empty() {
        warn!(count = summary.render.failed.len(), "some frames failed to render");
    }

    // Post-processing failures are reported, never fatal
    if output.encode && !args.no_video {
        let encoder = VideoEncoder::new(render_rate, &output.directory, &output.video);
        match encoder.encode() {
            Ok(()) => info!(video = %output.video.display(), "video written"),
            Err(e) => warn!(error = %e, "video encoding failed"),
        }

        if !(output.keep_frames || args.keep_frames) {
            match clean_frames(&output.directory) {
                Ok(n) => info!(removed = n, "frames cleaned up"),
                Err(e) => warn!(error = %e, "frame cleanup failed"),
            }
        }
    }

    Ok(())
}
