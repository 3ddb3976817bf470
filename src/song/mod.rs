//! Song parser - turns fishsong text into a list of timed events
//!
//! Lines are classified as comments (`#`), commands (`*name value`) or event
//! lines (`c4 q, e4 q, g4 h`). Event lines are split on commas, each token is
//! parsed into a [`SongEvent`], chord members are held back until a timed
//! event arrives, and finalized events advance the active track.

pub mod chord;
pub mod command;
pub mod duration;
pub mod event;
pub mod token;
pub mod track;

use crate::config::{PlaybackConfiguration, DEFAULT_TRACK};
use crate::error::Result;
use chord::PendingChord;
use command::{Command, CommandError};
use event::SongEvent;
use serde::Serialize;
use std::io::{BufRead, BufReader, Read};
use track::TrackState;

/// What the parser does with event lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParseState {
    /// Event lines are parsed
    Normal,
    /// Between `*off` and `*on`
    Skipping,
    /// Event lines are dropped until the given track catches up
    WaitingOn(i32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DiagnosticKind {
    MalformedToken,
    UnknownCommand,
    InvalidCommand,
}

/// A non-fatal problem found while parsing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// 1-based line number
    pub line: usize,
    pub kind: DiagnosticKind,
    pub message: String,
}

/// Kind of an input line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    Blank,
    Comment,
    Command(&'a str),
    Events(&'a str),
}

/// Classify a trimmed input line
pub fn classify(line: &str) -> LineKind<'_> {
    match line.as_bytes().first() {
        None => LineKind::Blank,
        Some(b'#') => LineKind::Comment,
        Some(b'*') => LineKind::Command(line),
        Some(_) => LineKind::Events(line),
    }
}

/// Result of parsing one song
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedFile {
    /// Finalized events in the order they were produced
    pub events: Vec<SongEvent>,
    /// Final position of every track
    pub tracks: TrackState,
    /// Track active at the end of the song
    pub current_track: i32,
    /// Barrier still pending at the end of the song
    pub waiting_on: Option<i32>,
    pub diagnostics: Vec<Diagnostic>,
    /// Text of `*attrib` lines
    pub attributions: Vec<String>,
}

impl Default for ParsedFile {
    fn default() -> Self {
        Self {
            events: Vec::new(),
            tracks: TrackState::new(),
            current_track: DEFAULT_TRACK,
            waiting_on: None,
            diagnostics: Vec::new(),
            attributions: Vec::new(),
        }
    }
}

impl ParsedFile {
    /// Events ordered by start tick across all tracks
    pub fn timeline(&self) -> Vec<&SongEvent> {
        let mut events: Vec<&SongEvent> = self.events.iter().collect();
        events.sort_by_key(|e| e.start);
        events
    }

    /// Events finalized on one track
    pub fn track_events(&self, track: i32) -> impl Iterator<Item = &SongEvent> + '_ {
        self.events.iter().filter(move |e| e.track == track)
    }

    /// Length of the song in ticks (furthest track)
    pub fn total_ticks(&self) -> u32 {
        self.tracks.end()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Line-by-line song parser
pub struct SongParser<'c> {
    config: &'c mut PlaybackConfiguration,
    file: ParsedFile,
    state: ParseState,
    chord: PendingChord,
    line_no: usize,
}

impl<'c> SongParser<'c> {
    pub fn new(config: &'c mut PlaybackConfiguration) -> Self {
        config.select_line(DEFAULT_TRACK);
        let mut file = ParsedFile::default();
        file.tracks.touch(DEFAULT_TRACK);

        Self {
            config,
            file,
            state: ParseState::Normal,
            chord: PendingChord::new(),
            line_no: 0,
        }
    }

    /// Parse a whole song from text
    pub fn parse_str(config: &mut PlaybackConfiguration, text: &str) -> ParsedFile {
        let mut parser = SongParser::new(config);
        for line in text.lines() {
            parser.feed_line(line);
        }
        parser.finish()
    }

    /// Parse a whole song from a reader.
    ///
    /// A read error aborts the parse; the configuration is then left as it
    /// was before the call.
    pub fn parse_reader<R: Read>(config: &mut PlaybackConfiguration, input: R) -> Result<ParsedFile> {
        Self::parse_lines(config, BufReader::new(input))
    }

    /// Parse a whole song from buffered input
    pub fn parse_lines<B: BufRead>(config: &mut PlaybackConfiguration, input: B) -> Result<ParsedFile> {
        let mut working = config.clone();
        let mut parser = SongParser::new(&mut working);
        for line in input.lines() {
            parser.feed_line(&line?);
        }
        let file = parser.finish();
        *config = working;
        Ok(file)
    }

    pub fn state(&self) -> ParseState {
        self.state
    }

    pub fn current_track(&self) -> i32 {
        self.file.current_track
    }

    pub fn tracks(&self) -> &TrackState {
        &self.file.tracks
    }

    pub fn events(&self) -> &[SongEvent] {
        &self.file.events
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.file.diagnostics
    }

    pub fn config(&self) -> &PlaybackConfiguration {
        &*self.config
    }

    /// Number of chord members waiting for a timed event
    pub fn pending_chord_len(&self) -> usize {
        self.chord.len()
    }

    /// Process one input line
    pub fn feed_line(&mut self, line: &str) {
        self.line_no += 1;
        self.refresh_wait();

        let line = line.trim_start_matches('\u{FEFF}').trim();

        match classify(line) {
            LineKind::Blank | LineKind::Comment => {}
            LineKind::Command(text) => self.handle_command(text),
            LineKind::Events(text) => match self.state {
                ParseState::Normal => self.handle_events(text),
                ParseState::Skipping => {
                    log::debug!("line {}: suppressed", self.line_no);
                }
                ParseState::WaitingOn(track) => {
                    log::debug!("line {}: waiting on track {}", self.line_no, track);
                }
            },
        }
    }

    /// Flush the pending chord and return the parsed song
    pub fn finish(mut self) -> ParsedFile {
        self.flush_chord();
        self.refresh_wait();
        self.file.waiting_on = match self.state {
            ParseState::WaitingOn(track) => Some(track),
            _ => None,
        };
        self.file
    }

    fn refresh_wait(&mut self) {
        if let ParseState::WaitingOn(track) = self.state {
            if self.file.tracks.has_caught_up(track, self.file.current_track) {
                log::debug!("track {} caught up with track {}", track, self.file.current_track);
                self.state = ParseState::Normal;
            }
        }
    }

    fn handle_command(&mut self, text: &str) {
        match Command::parse(text) {
            Ok(Command::Line(track)) => self.switch_track(track),
            Ok(Command::Rest(track)) => self.install_barrier(track),
            Ok(Command::Suppress) => self.state = ParseState::Skipping,
            Ok(Command::Resume) => self.state = ParseState::Normal,
            Ok(Command::Attrib(text)) => {
                log::info!("attrib: {}", text);
                self.file.attributions.push(text);
            }
            Ok(command) => command.apply(self.config),
            Err(e @ CommandError::Unknown(_)) => self.report(DiagnosticKind::UnknownCommand, e.to_string()),
            Err(e) => self.report(DiagnosticKind::InvalidCommand, e.to_string()),
        }
    }

    fn handle_events(&mut self, text: &str) {
        for item in text.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            match token::parse_token(item, self.config) {
                Ok(event) if event.is_chord_member => self.chord.push(event),
                Ok(event) => self.finalize(event),
                Err(e) => self.report(DiagnosticKind::MalformedToken, format!("token '{}': {}", item, e)),
            }
        }
    }

    fn finalize(&mut self, trigger: SongEvent) {
        let track = self.file.current_track;
        let start = self.file.tracks.advance(track, trigger.duration.max(1));
        for mut event in self.chord.resolve(trigger) {
            event.place(track, start);
            self.file.events.push(event);
        }
    }

    fn flush_chord(&mut self) {
        if self.chord.is_empty() {
            return;
        }
        let track = self.file.current_track;
        let start = self.file.tracks.advance(track, duration::DEFAULT_DURATION);
        for mut event in self.chord.flush_default() {
            event.place(track, start);
            self.file.events.push(event);
        }
    }

    fn switch_track(&mut self, track: i32) {
        self.flush_chord();
        self.file.current_track = track;
        self.file.tracks.touch(track);
        self.config.select_line(track);

        if self.state == ParseState::WaitingOn(track) {
            self.state = ParseState::Normal;
        }
        self.refresh_wait();
    }

    fn install_barrier(&mut self, track: i32) {
        let current = self.file.current_track;
        if track > 0
            && track != current
            && self.file.tracks.position(current) > self.file.tracks.position(track)
        {
            log::debug!("track {} waits on track {}", current, track);
            self.state = ParseState::WaitingOn(track);
        } else {
            log::debug!("line {}: no barrier on track {}", self.line_no, track);
        }
    }

    fn report(&mut self, kind: DiagnosticKind, message: String) {
        log::warn!("line {}: {}", self.line_no, message);
        self.file.diagnostics.push(Diagnostic {
            line: self.line_no,
            kind,
            message,
        });
    }
}
