//! Chord accumulation
//!
//! Tokens with a `0` duration (`c4 0, e4 0, g4 q`) are held back until an
//! event with real timing arrives; they then sound together with it.

use super::duration::DEFAULT_DURATION;
use super::event::SongEvent;

/// Chord members waiting for a timing-bearing event
#[derive(Debug, Clone, Default)]
pub struct PendingChord {
    members: Vec<SongEvent>,
}

impl PendingChord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, member: SongEvent) {
        self.members.push(member);
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Release the buffered members with the timing of `trigger`, in the
    /// order they were buffered, followed by the trigger itself.
    pub fn resolve(&mut self, mut trigger: SongEvent) -> Vec<SongEvent> {
        trigger.duration = trigger.duration.max(1);
        trigger.is_chord_member = false;

        let mut events: Vec<SongEvent> = self
            .members
            .drain(..)
            .map(|mut member| {
                member.copy_timing(&trigger);
                member
            })
            .collect();
        events.push(trigger);
        events
    }

    /// Release the buffered members without a real trigger, each lasting
    /// `root_duration` ticks. Returns nothing when the buffer is empty.
    pub fn flush(&mut self, root_duration: u32) -> Vec<SongEvent> {
        let root_duration = root_duration.max(1);
        self.members
            .drain(..)
            .map(|mut member| {
                member.duration = root_duration;
                member.is_chord_member = false;
                member
            })
            .collect()
    }

    /// Flush with the default root duration
    pub fn flush_default(&mut self) -> Vec<SongEvent> {
        self.flush(DEFAULT_DURATION)
    }
}
