//! Step a song through the player and print every cue

use clap::Parser;
use fishsong::json::note_name;
use fishsong::{DirSource, PlaybackConfiguration, Player};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "fishsong-play")]
#[command(version = "0.1.0")]
#[command(about = "Print the cues a fishsong produces frame by frame", long_about = None)]
struct Args {
    /// Input song file
    input: PathBuf,

    /// Initial playback configuration (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Stop after this many frames
    #[arg(short, long, default_value_t = 100_000)]
    frames: u64,

    /// Log every parsed line
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    let mut config = match &args.config {
        Some(path) => PlaybackConfiguration::from_json_file(path)?,
        None => PlaybackConfiguration::new(),
    };

    let dir = args.input.parent().unwrap_or(Path::new("."));
    let file_name = args
        .input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file = fishsong::load_song(&DirSource::new(dir), &file_name, &mut config)?;

    for diagnostic in &file.diagnostics {
        eprintln!("line {}: {}", diagnostic.line, diagnostic.message);
    }

    let mut player = Player::new(&file, &config);
    for frame in 0..args.frames {
        for event in player.update() {
            println!(
                "{:>6} {:>8.1} track {:>2} {:<5} {:>4} {:.2}",
                frame,
                player.clock(),
                event.track,
                note_name(event.note),
                event.duration,
                event.volume
            );
        }
        if player.is_finished() {
            break;
        }
    }

    Ok(())
}
