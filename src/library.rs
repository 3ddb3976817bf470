//! Loading every song of a directory

use crate::config::PlaybackConfiguration;
use crate::error::{Error, Result};
use crate::song::{ParsedFile, SongParser};
use crate::source::{DirSource, SongSource};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// File extensions recognized as songs
const SONG_EXTENSIONS: [&str; 2] = [".txt.gz", ".txt"];

/// A parsed song and its name
#[derive(Debug, Clone)]
pub struct Song {
    pub name: String,
    /// Long songs have "long" in their name
    pub is_long: bool,
    pub file: ParsedFile,
    /// Configuration in effect right after this song was loaded
    pub config: PlaybackConfiguration,
}

impl Song {
    pub fn new(name: &str, file: ParsedFile, config: &PlaybackConfiguration) -> Self {
        Self {
            name: name.to_string(),
            is_long: name.to_ascii_lowercase().contains("long"),
            file,
            config: config.clone(),
        }
    }
}

/// Song name for a file name, if it looks like a song
pub fn song_name(file_name: &str) -> Option<&str> {
    SONG_EXTENSIONS.iter().find_map(|ext| {
        let lower = file_name.to_ascii_lowercase();
        if lower.ends_with(ext) && file_name.len() > ext.len() {
            Some(&file_name[..file_name.len() - ext.len()])
        } else {
            None
        }
    })
}

/// Parse one song from a source.
///
/// The song runs on a per-file copy of the configuration; only the global
/// fields are merged back into `config`.
pub fn load_song(source: &dyn SongSource, name: &str, config: &mut PlaybackConfiguration) -> Result<ParsedFile> {
    let reader = source.open(name)?;
    let mut file_config = config.for_file();
    let file = SongParser::parse_lines(&mut file_config, reader)?;
    config.merge_globals(&file_config);
    Ok(file)
}

/// Songs of a directory, by name
#[derive(Debug, Default)]
pub struct SongLibrary {
    songs: BTreeMap<String, Song>,
    /// Songs that could not be read, with the reason
    pub failed: Vec<(String, String)>,
}

impl SongLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse every song file of a directory, in name order.
    ///
    /// When two files map to the same song name (`x.txt` and `x.txt.gz`),
    /// the first in name order is kept and the other is recorded as failed.
    pub fn load_dir(dir: &Path, config: &mut PlaybackConfiguration) -> Result<Self> {
        if !dir.is_dir() {
            return Err(Error::NotADirectory(dir.to_path_buf()));
        }

        let mut file_names: Vec<String> = fs::read_dir(dir)?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| song_name(name).is_some())
            .collect();
        file_names.sort();

        let source = DirSource::new(dir);
        let mut library = Self::new();

        for file_name in &file_names {
            let Some(name) = song_name(file_name) else {
                continue;
            };
            if library.songs.contains_key(name) {
                log::warn!("'{}': song '{}' already loaded", file_name, name);
                library
                    .failed
                    .push((file_name.clone(), format!("duplicate song name '{}'", name)));
                continue;
            }
            match load_song(&source, file_name, config) {
                Ok(file) => {
                    log::info!("loaded song '{}' ({} events)", name, file.events.len());
                    library.insert(Song::new(name, file, config));
                }
                Err(e) => {
                    log::warn!("{}", e);
                    library.failed.push((file_name.clone(), e.to_string()));
                }
            }
        }

        Ok(library)
    }

    pub fn insert(&mut self, song: Song) {
        self.songs.insert(song.name.clone(), song);
    }

    pub fn get(&self, name: &str) -> Option<&Song> {
        self.songs.get(name)
    }

    /// Songs in name order
    pub fn iter(&self) -> impl Iterator<Item = &Song> {
        self.songs.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.songs.keys().map(String::as_str)
    }

    pub fn long_songs(&self) -> impl Iterator<Item = &Song> {
        self.iter().filter(|s| s.is_long)
    }

    pub fn short_songs(&self) -> impl Iterator<Item = &Song> {
        self.iter().filter(|s| !s.is_long)
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }
}
