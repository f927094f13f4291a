mod app;
mod renderer;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use openshapa_core::model::Timeline;

#[derive(Parser)]
#[command(name = "openshapa-tracks")]
#[command(about = "Terminal track timeline: drag carriages to align media sources")]
struct Cli {
    /// Timeline description (window + tracks) as JSON
    timeline: PathBuf,

    /// Write saved timelines here instead of over the input file
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Start with all carriages locked
    #[arg(long)]
    locked: bool,

    /// Snap carriages to the timeline origin while dragging
    #[arg(long)]
    snap: bool,

    /// Minor ticks between labelled major ticks on the ruler
    #[arg(long, default_value = "5")]
    ticks_per_major: u32,
}

fn main() -> Result<()> {
    // Logs go to stderr; redirect it to keep the alternate screen clean.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();

    let data = std::fs::read(&cli.timeline)
        .with_context(|| format!("reading {}", cli.timeline.display()))?;
    let timeline = Timeline::from_json(&data)?;
    log::info!(
        "{}: {} tracks",
        cli.timeline.display(),
        timeline.tracks.len()
    );

    app::run(
        timeline,
        app::Options {
            locked: cli.locked,
            snap: cli.snap,
            ticks_per_major: cli.ticks_per_major,
            save_path: cli.output.unwrap_or(cli.timeline),
        },
    )
}
