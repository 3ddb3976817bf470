//! JSON view of parsed songs

use crate::config::PlaybackConfiguration;
use crate::library::Song;
use crate::song::event::{NoteValue, SongEvent};
use crate::song::{Diagnostic, ParsedFile};
use serde::Serialize;
use std::collections::BTreeMap;

const NOTE_NAMES: [&str; 12] = ["C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B"];

/// Top-level JSON structure for one song
#[derive(Debug, Clone, Serialize)]
pub struct SongJson {
    pub name: String,
    #[serde(skip_serializing_if = "is_false")]
    pub is_long: bool,
    /// Configuration in effect once the song was loaded
    pub config: PlaybackConfiguration,
    /// Final tick position of each track
    pub tracks: BTreeMap<i32, u32>,
    pub total_ticks: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waiting_on: Option<i32>,
    pub events: Vec<EventJson>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attributions: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

/// JSON representation of one event
#[derive(Debug, Clone, Serialize)]
pub struct EventJson {
    pub track: i32,
    pub start: u32,
    pub duration: u32,
    /// Note number, absent for rests
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pitch: Option<i32>,
    /// Note name ("C#4") or "rest"
    pub note: String,
    pub volume: f32,
    pub title: String,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl SongJson {
    pub fn new(name: &str, is_long: bool, file: &ParsedFile, config: &PlaybackConfiguration) -> Self {
        Self {
            name: name.to_string(),
            is_long,
            config: config.clone(),
            tracks: file.tracks.iter().collect(),
            total_ticks: file.total_ticks(),
            waiting_on: file.waiting_on,
            events: file.events.iter().map(EventJson::from).collect(),
            attributions: file.attributions.clone(),
            diagnostics: file.diagnostics.clone(),
        }
    }

    pub fn from_song(song: &Song) -> Self {
        Self::new(&song.name, song.is_long, &song.file, &song.config)
    }
}

impl From<&SongEvent> for EventJson {
    fn from(event: &SongEvent) -> Self {
        Self {
            track: event.track,
            start: event.start,
            duration: event.duration,
            pitch: event.note.pitch(),
            note: note_name(event.note),
            volume: event.volume,
            title: event.title.clone(),
        }
    }
}

/// Name of a note number, C4 = 60
pub fn pitch_name(pitch: i32) -> String {
    let octave = pitch.div_euclid(12) - 1;
    let name = NOTE_NAMES[pitch.rem_euclid(12) as usize];
    format!("{}{}", name, octave)
}

pub fn note_name(note: NoteValue) -> String {
    match note {
        NoteValue::Pitch(p) => pitch_name(p),
        NoteValue::Rest => "rest".to_string(),
    }
}
