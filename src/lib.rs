pub mod config;
pub mod error;
pub mod json;
pub mod library;
pub mod player;
pub mod song;
pub mod source;

pub use config::PlaybackConfiguration;
pub use error::{Error, Result};
pub use library::{load_song, Song, SongLibrary};
pub use player::Player;
pub use song::event::{NoteValue, SongEvent};
pub use song::{ParseState, ParsedFile, SongParser};
pub use source::{DirSource, MemorySource, SongSource};

/// Parse song text with the given configuration
pub fn parse_str(text: &str, config: &mut PlaybackConfiguration) -> ParsedFile {
    SongParser::parse_str(config, text)
}
