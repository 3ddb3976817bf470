//! Event token parsing
//!
//! A token is `note [duration [volume]]`, e.g. `c#5 qd 0.8`.

use super::duration;
use super::event::{NoteValue, SongEvent};
use crate::config::PlaybackConfiguration;

/// Octave used when the note carries no digits
pub const DEFAULT_OCTAVE: i32 = 4;

/// Duration field marking a chord member
pub const CHORD_MARKER: &str = "0";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("Empty note")]
    EmptyNote,

    #[error("Unknown note '{0}'")]
    UnknownNote(char),

    #[error("Invalid octave '{0}'")]
    InvalidOctave(String),
}

/// Semitone of a note letter within the octave
pub fn note_letter(letter: char) -> Option<i32> {
    match letter.to_ascii_lowercase() {
        'c' => Some(0),
        'd' => Some(2),
        'e' => Some(4),
        'f' => Some(5),
        'g' => Some(7),
        'a' => Some(9),
        'b' => Some(11),
        _ => None,
    }
}

/// Parse the note field into a note value, without any shift applied
pub fn parse_note(field: &str) -> Result<NoteValue, TokenError> {
    let mut chars = field.chars();
    let first = chars.next().ok_or(TokenError::EmptyNote)?;

    let rest_of_note = chars.as_str();
    let (accidental, octave_str) = match rest_of_note.chars().next() {
        Some('#' | 's') => (1, &rest_of_note[1..]),
        Some('b') => (-1, &rest_of_note[1..]),
        _ => (0, rest_of_note),
    };

    let octave = if octave_str.is_empty() {
        DEFAULT_OCTAVE
    } else if octave_str.bytes().all(|b| b.is_ascii_digit()) {
        octave_str
            .parse::<i32>()
            .map_err(|_| TokenError::InvalidOctave(octave_str.to_string()))?
    } else {
        return Err(TokenError::InvalidOctave(octave_str.to_string()));
    };

    if first.eq_ignore_ascii_case(&'r') {
        return Ok(NoteValue::Rest);
    }

    let base = note_letter(first).ok_or(TokenError::UnknownNote(first))?;
    let pitch = octave
        .checked_add(1)
        .and_then(|o| o.checked_mul(12))
        .and_then(|p| p.checked_add(base))
        .and_then(|p| p.checked_add(accidental))
        .ok_or_else(|| TokenError::InvalidOctave(octave_str.to_string()))?;
    Ok(NoteValue::Pitch(pitch))
}

/// Parse one event token using the current configuration
pub fn parse_token(token: &str, config: &PlaybackConfiguration) -> Result<SongEvent, TokenError> {
    let mut fields = token.split_whitespace();
    let note_field = fields.next().ok_or(TokenError::EmptyNote)?;
    let duration_field = fields.next().unwrap_or("");
    let volume_field = fields.next();

    let note = match parse_note(note_field)? {
        NoteValue::Pitch(p) => NoteValue::Pitch(p.saturating_add(config.transpose())),
        NoteValue::Rest => NoteValue::Rest,
    };

    let volume = volume_field
        .and_then(|v| v.parse::<f32>().ok())
        .filter(|v| v.is_finite() && *v >= 0.0)
        .map(|v| v.min(1.0))
        .unwrap_or(config.volume);

    if duration_field == CHORD_MARKER {
        return Ok(SongEvent::chord_member(note, volume, note_field));
    }

    let ticks = duration::evaluate(duration_field);
    Ok(SongEvent::new(note, ticks, volume, note_field))
}
