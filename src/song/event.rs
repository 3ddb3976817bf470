//! Song events

use serde::Serialize;

/// Pitch of an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteValue {
    /// MIDI-style note number (C4 = 60)
    Pitch(i32),
    /// Silence that still consumes time
    Rest,
}

impl NoteValue {
    pub fn is_rest(&self) -> bool {
        matches!(self, Self::Rest)
    }

    pub fn pitch(&self) -> Option<i32> {
        match self {
            Self::Pitch(p) => Some(*p),
            Self::Rest => None,
        }
    }
}

/// One note or rest
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SongEvent {
    pub note: NoteValue,
    /// Length in ticks (480 = whole note)
    pub duration: u32,
    /// Volume [0.0, 1.0]
    pub volume: f32,
    /// Note field as written in the song
    pub title: String,
    /// Waiting for a timing-bearing event
    pub is_chord_member: bool,
    /// Track the event was finalized on
    pub track: i32,
    /// Tick offset on `track` where the event starts
    pub start: u32,
}

impl SongEvent {
    pub fn new(note: NoteValue, duration: u32, volume: f32, title: &str) -> Self {
        Self {
            note,
            duration,
            volume,
            title: title.to_string(),
            is_chord_member: false,
            track: 0,
            start: 0,
        }
    }

    /// A chord member awaiting its timing
    pub fn chord_member(note: NoteValue, volume: f32, title: &str) -> Self {
        Self {
            is_chord_member: true,
            ..Self::new(note, 0, volume, title)
        }
    }

    pub fn is_rest(&self) -> bool {
        self.note.is_rest()
    }

    /// Tick offset where the event ends on its track
    pub fn end(&self) -> u32 {
        self.start.saturating_add(self.duration)
    }

    /// Take duration and volume from the event that completes a chord
    pub fn copy_timing(&mut self, trigger: &SongEvent) {
        self.duration = trigger.duration;
        self.volume = trigger.volume;
        self.is_chord_member = false;
    }

    /// Case-insensitive match of the title; "rest" matches any rest
    pub fn check_category(&self, category: &str) -> bool {
        if self.is_rest() && category.eq_ignore_ascii_case("rest") {
            return true;
        }
        self.title.eq_ignore_ascii_case(category)
    }

    /// Mark the event as placed on a track
    pub(crate) fn place(&mut self, track: i32, start: u32) {
        self.track = track;
        self.start = start;
        self.duration = self.duration.max(1);
        self.is_chord_member = false;
    }
}
