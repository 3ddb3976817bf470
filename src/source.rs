//! Named song resources

use crate::error::{Error, Result};
use flate2::read::GzDecoder;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor, Read};
use std::path::{Path, PathBuf};

/// Gzip magic bytes
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Something that can open a song by name and hand out its lines
pub trait SongSource {
    fn open(&self, name: &str) -> Result<Box<dyn BufRead + '_>>;
}

/// Songs stored as files below a directory, plain or gzip-compressed
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl SongSource for DirSource {
    fn open(&self, name: &str) -> Result<Box<dyn BufRead + '_>> {
        let path = self.root.join(name);
        let not_found = |source| Error::ResourceNotFound {
            name: name.to_string(),
            source,
        };

        let mut file = File::open(&path).map_err(not_found)?;
        let mut data = Vec::new();
        file.read_to_end(&mut data).map_err(not_found)?;

        Ok(decompress(data))
    }
}

/// Wrap raw file contents in a reader, gunzipping when the gzip magic is present
fn decompress(data: Vec<u8>) -> Box<dyn BufRead> {
    if data.starts_with(&GZIP_MAGIC) {
        Box::new(BufReader::new(GzDecoder::new(Cursor::new(data))))
    } else {
        Box::new(Cursor::new(data))
    }
}

/// Songs kept in memory, keyed by name
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    songs: HashMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, text: &str) {
        self.songs.insert(name.to_string(), text.to_string());
    }

    pub fn with(mut self, name: &str, text: &str) -> Self {
        self.insert(name, text);
        self
    }
}

impl SongSource for MemorySource {
    fn open(&self, name: &str) -> Result<Box<dyn BufRead + '_>> {
        match self.songs.get(name) {
            Some(text) => Ok(Box::new(Cursor::new(text.as_bytes()))),
            None => Err(Error::ResourceNotFound {
                name: name.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such song"),
            }),
        }
    }
}
