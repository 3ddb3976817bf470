//! Integration tests for fishsong parsing
//!
//! These tests parse complete songs through the public API and check the
//! resulting events, track positions and configuration.

use fishsong::song::DiagnosticKind;
use fishsong::{
    load_song, DirSource, MemorySource, NoteValue, ParseState, ParsedFile, PlaybackConfiguration,
    Player, SongLibrary, SongParser,
};
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::{Cursor, Write};
use tempfile::tempdir;

/// Helper to parse a song with a fresh configuration
fn parse(song: &str) -> (ParsedFile, PlaybackConfiguration) {
    let mut config = PlaybackConfiguration::new();
    let file = SongParser::parse_reader(&mut config, Cursor::new(song)).expect("Parse failed");
    (file, config)
}

/// Pitches of all events, rests as None
fn pitches(file: &ParsedFile) -> Vec<Option<i32>> {
    file.events.iter().map(|e| e.note.pitch()).collect()
}

// =============================================================================
// Whole songs
// =============================================================================

#[test]
fn test_speed_scenario() {
    let song = r#"
*speed 2
c4 q, e4 q, g4 h
r q
"#;
    let (file, config) = parse(song);

    assert_eq!(file.events.len(), 4);
    assert_eq!(pitches(&file), vec![Some(60), Some(64), Some(67), None]);
    let durations: Vec<u32> = file.events.iter().map(|e| e.duration).collect();
    assert_eq!(durations, vec![120, 120, 240, 120]);
    assert!(file.events.iter().all(|e| e.track == 1));
    assert!(file.events[3].is_rest());

    assert_eq!(file.tracks.position(1), 600);
    assert_eq!(config.speed, 2.0);
}

#[test]
fn test_chord_single_line() {
    let (file, _) = parse("c4 0, e4 0, g4 q");

    assert_eq!(file.events.len(), 3);
    let titles: Vec<&str> = file.events.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["c4", "e4", "g4"]);
    for event in &file.events {
        assert_eq!(event.duration, 120);
        assert!(!event.is_chord_member);
    }
}

#[test]
fn test_finalized_events_are_consistent() {
    let song = r#"
# a bit of everything
*volume 0.7
c4 0, e4 0, g4 h 0.9
*line 2
*localshift -12
c4 e, x9 q, d4 1+1, e4 0
*line 3
r w
*rest 2
f4 q
*line 1
a4 0
"#;
    let (file, _) = parse(song);

    for event in &file.events {
        assert!(event.duration >= 1);
        assert!(!event.is_chord_member);
        assert!((0.0..=1.0).contains(&event.volume));
    }

    // Each track position is the sum of its finalized non-chord durations
    for (track, position) in file.tracks.iter() {
        let mut seen_starts = Vec::new();
        let mut total = 0;
        for event in file.track_events(track) {
            if !seen_starts.contains(&event.start) {
                seen_starts.push(event.start);
                total += event.duration;
            }
        }
        assert_eq!(total, position, "track {}", track);
    }

    assert_eq!(file.diagnostics.len(), 1);
    assert_eq!(file.diagnostics[0].kind, DiagnosticKind::MalformedToken);
    assert_eq!(file.diagnostics[0].line, 7);
}

#[test]
fn test_idempotent_reparse() {
    let song = "*shift 2\n*volume 0.5\nc4 0, e4 q\n*line 2\nr h, g4 e\n";
    let (first, _) = parse(song);
    let (second, _) = parse(song);
    assert_eq!(first, second);
}

#[test]
fn test_config_carries_between_songs() {
    let mut config = PlaybackConfiguration::new();
    SongParser::parse_reader(&mut config, Cursor::new("*shift 12\n*localshift 1\nc4")).unwrap();
    let file = SongParser::parse_reader(&mut config, Cursor::new("c4")).unwrap();

    // Global shift persists, local shift does not
    assert_eq!(pitches(&file), vec![Some(72)]);
}

// =============================================================================
// Track barriers
// =============================================================================

#[test]
fn test_barrier_blocks_until_track_catches_up() {
    let song = r#"
*line 1
c4 q, d4 q
*line 2
e4 w
*rest 1
f4 q
g4 q
*line 1
a4 h
b4 q
*line 2
c5 q
"#;
    let (file, _) = parse(song);

    // f4 and g4 are dropped while track 2 is ahead of track 1
    let titles: Vec<&str> = file.events.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["c4", "d4", "e4", "a4", "b4", "c5"]);

    assert_eq!(file.tracks.position(1), 600);
    assert_eq!(file.tracks.position(2), 600);
    assert_eq!(file.waiting_on, None);
}

#[test]
fn test_barrier_state_transitions() {
    let mut config = PlaybackConfiguration::new();
    let mut parser = SongParser::new(&mut config);

    parser.feed_line("*line 1");
    parser.feed_line("c4 h");
    parser.feed_line("*line 2");
    parser.feed_line("*rest 1");
    // Track 2 (0) is behind track 1 (240): no barrier
    assert_eq!(parser.state(), ParseState::Normal);

    parser.feed_line("c4 w");
    parser.feed_line("*rest 1");
    assert_eq!(parser.state(), ParseState::WaitingOn(1));

    parser.feed_line("d4 q");
    assert_eq!(parser.events().len(), 2);

    parser.feed_line("*off");
    assert_eq!(parser.state(), ParseState::Skipping);
    parser.feed_line("*on");
    assert_eq!(parser.state(), ParseState::Normal);
}

#[test]
fn test_unresolved_barrier_skips_rest_of_song() {
    let (file, _) = parse("c4 w\n*rest 7\nd4 q\ne4 q\nf4 q");
    assert_eq!(file.events.len(), 1);
    assert_eq!(file.waiting_on, Some(7));
    assert_eq!(file.current_track, 1);
}

// =============================================================================
// Sources and libraries
// =============================================================================

#[test]
fn test_memory_source() {
    let source = MemorySource::new().with("duet", "c4 q\n*line 2\ne4 h");
    let mut config = PlaybackConfiguration::new();
    let file = load_song(&source, "duet", &mut config).unwrap();
    assert_eq!(file.total_ticks(), 240);
}

#[test]
fn test_missing_resource_is_fatal() {
    let dir = tempdir().unwrap();
    let mut config = PlaybackConfiguration::new();
    let result = load_song(&DirSource::new(dir.path()), "nope.txt", &mut config);
    assert!(matches!(result, Err(fishsong::Error::ResourceNotFound { .. })));
}

#[test]
fn test_gzip_song_file() {
    let dir = tempdir().unwrap();
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(b"c4 0, e4 0, g4 h\n").unwrap();
    std::fs::write(dir.path().join("packed.txt.gz"), encoder.finish().unwrap()).unwrap();

    let mut config = PlaybackConfiguration::new();
    let file = load_song(&DirSource::new(dir.path()), "packed.txt.gz", &mut config).unwrap();
    assert_eq!(file.events.len(), 3);
    assert!(file.events.iter().all(|e| e.duration == 240));
}

#[test]
fn test_library_load_dir() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("b_song.txt"), "*speed 3\nc4 q\n").unwrap();
    std::fs::write(dir.path().join("a_long.txt"), "c4 w, d4 w\n").unwrap();
    std::fs::write(dir.path().join("notes.md"), "not a song").unwrap();
    std::fs::write(dir.path().join("broken.txt"), b"c4 q\n\xff\n").unwrap();

    let mut config = PlaybackConfiguration::new();
    let library = SongLibrary::load_dir(dir.path(), &mut config).unwrap();

    let names: Vec<&str> = library.names().collect();
    assert_eq!(names, vec!["a_long", "b_song"]);
    assert_eq!(library.long_songs().count(), 1);
    assert_eq!(library.short_songs().count(), 1);
    assert_eq!(library.get("a_long").unwrap().file.total_ticks(), 960);
    assert_eq!(library.failed.len(), 1);
    assert_eq!(library.failed[0].0, "broken.txt");
    assert_eq!(config.speed, 3.0);
}

#[test]
fn test_library_requires_directory() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("song.txt");
    std::fs::write(&path, "c4").unwrap();
    let mut config = PlaybackConfiguration::new();
    assert!(matches!(
        SongLibrary::load_dir(&path, &mut config),
        Err(fishsong::Error::NotADirectory(_))
    ));
}

// =============================================================================
// Playback
// =============================================================================

#[test]
fn test_player_walks_two_tracks() {
    let (file, mut config) = parse("c4 h\n*line 2\ne4 q, g4 q");
    config.set_speed(120.0);
    let mut player = Player::new(&file, &config);

    let first: Vec<NoteValue> = player.update().iter().map(|e| e.note).collect();
    assert_eq!(first, vec![NoteValue::Pitch(60), NoteValue::Pitch(64)]);

    let second: Vec<NoteValue> = player.update().iter().map(|e| e.note).collect();
    assert_eq!(second, vec![NoteValue::Pitch(67)]);

    player.update();
    assert!(player.is_finished());
}
