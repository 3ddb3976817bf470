//! Playback configuration shared between songs

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Lowest accepted playback speed
pub const MIN_SPEED: f32 = 0.01;

/// Track selected at the start of every song
pub const DEFAULT_TRACK: i32 = 1;

/// Configuration mutated by `*command` lines.
///
/// `skip`, `speed`, `volume` and `global_shift` are global: they persist from
/// one song to the next. `current_line` and `local_shift` only describe the
/// song being parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfiguration {
    /// Mute playback cues
    pub skip: bool,
    /// Active track of the last parse
    pub current_line: i32,
    /// Playback speed multiplier (recorded, applied by the player)
    pub speed: f32,
    /// Default event volume [0.0, 1.0]
    pub volume: f32,
    /// Semitone shift applied to every note
    pub global_shift: i32,
    /// Semitone shift applied until the next track switch
    pub local_shift: i32,
}

impl Default for PlaybackConfiguration {
    fn default() -> Self {
        Self {
            skip: false,
            current_line: DEFAULT_TRACK,
            speed: 1.0,
            volume: 1.0,
            global_shift: 0,
            local_shift: 0,
        }
    }
}

impl PlaybackConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load an initial configuration from JSON text
    pub fn from_json_str(text: &str) -> Result<Self> {
        let mut config: Self = serde_json::from_str(text)?;
        config.normalize();
        Ok(config)
    }

    /// Load an initial configuration from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let mut config: Self = serde_json::from_reader(BufReader::new(file))?;
        config.normalize();
        Ok(config)
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed.max(MIN_SPEED);
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    /// Switch the active track, dropping the track-local shift
    pub fn select_line(&mut self, line: i32) {
        self.current_line = line;
        self.local_shift = 0;
    }

    /// Total semitone offset applied to parsed notes
    pub fn transpose(&self) -> i32 {
        self.global_shift.saturating_add(self.local_shift)
    }

    /// Per-file working copy
    pub fn for_file(&self) -> Self {
        Self {
            current_line: DEFAULT_TRACK,
            local_shift: 0,
            ..self.clone()
        }
    }

    /// Take over the global fields of a per-file copy
    pub fn merge_globals(&mut self, file: &Self) {
        self.skip = file.skip;
        self.speed = file.speed;
        self.volume = file.volume;
        self.global_shift = file.global_shift;
    }

    fn normalize(&mut self) {
        if !self.speed.is_finite() {
            self.speed = 1.0;
        }
        if !self.volume.is_finite() {
            self.volume = 1.0;
        }
        self.set_speed(self.speed);
        self.set_volume(self.volume);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PlaybackConfiguration::new();
        assert!(!config.skip);
        assert_eq!(config.current_line, 1);
        assert_eq!(config.speed, 1.0);
        assert_eq!(config.volume, 1.0);
        assert_eq!(config.transpose(), 0);
    }

    #[test]
    fn test_clamping() {
        let mut config = PlaybackConfiguration::new();
        config.set_speed(-3.0);
        assert_eq!(config.speed, MIN_SPEED);
        config.set_volume(1.5);
        assert_eq!(config.volume, 1.0);
        config.set_volume(-0.5);
        assert_eq!(config.volume, 0.0);
    }

    #[test]
    fn test_json_partial() {
        let config = PlaybackConfiguration::from_json_str(r#"{"speed": 2.5, "global_shift": -12}"#)
            .unwrap();
        assert_eq!(config.speed, 2.5);
        assert_eq!(config.global_shift, -12);
        assert_eq!(config.volume, 1.0);
    }

    #[test]
    fn test_json_clamps_values() {
        let config = PlaybackConfiguration::from_json_str(r#"{"speed": 0, "volume": 7}"#).unwrap();
        assert_eq!(config.speed, MIN_SPEED);
        assert_eq!(config.volume, 1.0);
    }

    #[test]
    fn test_derive_and_merge() {
        let mut global = PlaybackConfiguration::new();
        global.local_shift = 3;

        let mut file = global.for_file();
        assert_eq!(file.local_shift, 0);

        file.speed = 2.0;
        file.global_shift = 5;
        file.select_line(4);
        file.local_shift = 7;
        global.merge_globals(&file);

        assert_eq!(global.speed, 2.0);
        assert_eq!(global.global_shift, 5);
        assert_eq!(global.local_shift, 3);
        assert_eq!(global.current_line, 1);
    }
}
