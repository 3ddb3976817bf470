//! Per-track time positions

use serde::Serialize;
use std::collections::BTreeMap;

/// Cumulative tick position of every track seen in a song
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TrackState {
    positions: BTreeMap<i32, u32>,
}

impl TrackState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the track at position 0 if it has not been seen yet
    pub fn touch(&mut self, track: i32) {
        self.positions.entry(track).or_insert(0);
    }

    /// Current position of a track (0 when never referenced)
    pub fn position(&self, track: i32) -> u32 {
        self.positions.get(&track).copied().unwrap_or(0)
    }

    /// Move a track forward, returning the position it started from
    pub fn advance(&mut self, track: i32, ticks: u32) -> u32 {
        let position = self.positions.entry(track).or_insert(0);
        let start = *position;
        *position = position.saturating_add(ticks);
        start
    }

    /// True when `other` has reached the position of `track`
    pub fn has_caught_up(&self, other: i32, track: i32) -> bool {
        self.position(other) >= self.position(track)
    }

    /// Position of the furthest track
    pub fn end(&self) -> u32 {
        self.positions.values().copied().max().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (i32, u32)> + '_ {
        self.positions.iter().map(|(&track, &pos)| (track, pos))
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lazy_tracks() {
        let mut tracks = TrackState::new();
        assert_eq!(tracks.position(3), 0);
        assert!(tracks.is_empty());

        tracks.touch(3);
        assert_eq!(tracks.len(), 1);
        tracks.touch(3);
        assert_eq!(tracks.len(), 1);
    }

    #[test]
    fn test_advance() {
        let mut tracks = TrackState::new();
        assert_eq!(tracks.advance(1, 120), 0);
        assert_eq!(tracks.advance(1, 240), 120);
        assert_eq!(tracks.position(1), 360);
        assert_eq!(tracks.position(2), 0);
        assert_eq!(tracks.end(), 360);
    }

    #[test]
    fn test_has_caught_up() {
        let mut tracks = TrackState::new();
        tracks.advance(1, 240);
        assert!(!tracks.has_caught_up(2, 1));
        tracks.advance(2, 240);
        assert!(tracks.has_caught_up(2, 1));
    }
}
