use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use waveline::{
    config::WavelineConfig,
    logging,
    snapshot::{render_snapshot, SnapshotRequest},
    ui,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Terminal audio player with a live waveform", long_about = None)]
struct Cli {
    /// Config file (defaults to <config dir>/waveline/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Play a track with the waveform display.
    Play {
        /// Audio file to play.
        file: PathBuf,
        /// Override the waveform frame rate cap.
        #[arg(long)]
        fps: Option<f64>,
        /// Override the smoothing radius.
        #[arg(long)]
        radius: Option<usize>,
    },
    /// Render the waveform at one position of a track to a PNG.
    Snapshot {
        /// Audio file to sample.
        file: PathBuf,
        /// Output PNG path.
        #[arg(short, long)]
        out: PathBuf,
        /// Position in seconds.
        #[arg(long, default_value_t = 0.0)]
        at: f64,
        #[arg(long, default_value_t = 800)]
        width: u32,
        #[arg(long, default_value_t = 600)]
        height: u32,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = logging::init_logging() {
        eprintln!("Warning: logging disabled: {e:#}");
    }

    let mut config = WavelineConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Play { file, fps, radius } => {
            if let Some(fps) = fps {
                config.visualizer.target_fps = fps;
            }
            if let Some(radius) = radius {
                config.visualizer.smoothing_radius = radius;
            }
            config.validate()?;
            tracing::info!(file = %file.display(), ?config, "starting playback");
            ui::run(&config, &file)
        }
        Commands::Snapshot {
            file,
            out,
            at,
            width,
            height,
        } => {
            config.validate()?;
            let request = SnapshotRequest {
                input: &file,
                output: &out,
                at_secs: at,
                width,
                height,
            };
            render_snapshot(&config.visualizer, &request)?;
            println!("wrote {}", out.display());
            Ok(())
        }
    }
}
