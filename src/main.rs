use clap::Parser;
use fishsong::json::SongJson;
use fishsong::library::song_name;
use fishsong::{load_song, DirSource, PlaybackConfiguration, Song, SongLibrary};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "fishsong")]
#[command(version = "0.1.0")]
#[command(about = "Parse fishsong files to JSON", long_about = None)]
struct Args {
    /// Song files or directories of songs
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output JSON file (writes to stdout if not specified)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Initial playback configuration (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output compact JSON (default is pretty-printed)
    #[arg(short, long)]
    compact: bool,

    /// Only list the song names
    #[arg(short = 'L', long)]
    list: bool,

    /// Log every parsed line
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), fishsong::Error> {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    let mut config = match &args.config {
        Some(path) => PlaybackConfiguration::from_json_file(path)?,
        None => PlaybackConfiguration::new(),
    };

    let mut songs = Vec::new();
    for input in &args.inputs {
        if input.is_dir() {
            let library = SongLibrary::load_dir(input, &mut config)?;
            for (file_name, reason) in &library.failed {
                eprintln!("Warning: skipped '{}': {}", file_name, reason);
            }
            songs.extend(library.iter().map(SongJson::from_song));
        } else {
            let song = load_file(input, &mut config)?;
            songs.push(SongJson::from_song(&song));
        }
    }

    if args.list {
        for song in &songs {
            println!("{}", song.name);
        }
        return Ok(());
    }

    let json_string = if args.compact {
        serde_json::to_string(&songs)?
    } else {
        serde_json::to_string_pretty(&songs)?
    };

    match args.output {
        Some(path) => {
            let mut file = File::create(path)?;
            file.write_all(json_string.as_bytes())?;
            file.write_all(b"\n")?;
        }
        None => {
            println!("{}", json_string);
        }
    }

    Ok(())
}

/// Parse a single song file
fn load_file(path: &Path, config: &mut PlaybackConfiguration) -> Result<Song, fishsong::Error> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = song_name(&file_name).unwrap_or(&file_name).to_string();

    let file = load_song(&DirSource::new(dir), &file_name, config)?;
    Ok(Song::new(&name, file, config))
}
