//! Frame-driven song playback
//!
//! The player walks a parsed song on a tick clock that advances by the
//! configured speed on every update, and reports which events start.

use crate::config::PlaybackConfiguration;
use crate::song::event::SongEvent;
use crate::song::ParsedFile;

pub struct Player<'a> {
    timeline: Vec<&'a SongEvent>,
    /// Index of the next event to start
    next: usize,
    /// Song position in ticks
    clock: f64,
    speed: f64,
    muted: bool,
    started: bool,
    total: u32,
}

impl<'a> Player<'a> {
    pub fn new(file: &'a ParsedFile, config: &PlaybackConfiguration) -> Self {
        Self {
            timeline: file.timeline(),
            next: 0,
            clock: 0.0,
            speed: config.speed as f64,
            muted: config.skip,
            started: false,
            total: file.total_ticks(),
        }
    }

    /// Advance one frame and return the events starting in it
    pub fn update(&mut self) -> Vec<&'a SongEvent> {
        if self.started {
            self.clock += self.speed;
        }
        self.started = true;

        let first = self.next;
        while self.next < self.timeline.len() && (self.timeline[self.next].start as f64) <= self.clock {
            self.next += 1;
        }

        if self.muted {
            Vec::new()
        } else {
            self.timeline[first..self.next].to_vec()
        }
    }

    /// Current song position in ticks
    pub fn clock(&self) -> f64 {
        self.clock
    }

    /// A note (not a rest) is sounding at the current position
    pub fn is_singing(&self) -> bool {
        !self.muted
            && self.started
            && self.timeline[..self.next]
                .iter()
                .any(|e| !e.is_rest() && (e.end() as f64) > self.clock)
    }

    pub fn is_finished(&self) -> bool {
        self.next >= self.timeline.len() && self.clock >= self.total as f64
    }

    pub fn reset(&mut self) {
        self.next = 0;
        self.clock = 0.0;
        self.started = false;
    }
}
