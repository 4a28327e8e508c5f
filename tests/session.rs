use lector::clock::ManualTime;
use lector::config::NavigationConfig;
use lector::models::{NewReading, PlaybackStatus, Theme};
use lector::navigation::{Gesture, ScrubOutcome};
use lector::session::ReadingSession;
use lector::sources::read_local;
use lector::state::{ReadingStore, State};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn numbered(n: usize) -> String {
    (0..n).map(|i| format!("w{}", i)).collect::<Vec<_>>().join(" ")
}

fn open_session(db: &Path, time: &ManualTime) -> ReadingSession<State, ManualTime> {
    ReadingSession::new(
        State::open(db).unwrap(),
        time.clone(),
        NavigationConfig::default(),
    )
}

#[test]
fn test_progress_survives_reopening_the_database() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("states.db");
    let time = ManualTime::new();

    let id = {
        let mut session = open_session(&db, &time);
        let reading = session.import(NewReading::custom("doc", numbered(1000))).unwrap();
        session.set_words_per_minute(300);
        session.toggle_theme();
        session.commit(450);
        session.add_bookmark(Some("middle".to_string()));
        reading.id
    };

    let mut session = open_session(&db, &time);
    assert_eq!(session.settings().words_per_minute, 300);
    assert_eq!(session.theme(), Theme::Dark);
    assert!(session.resume().unwrap());
    assert_eq!(session.active().map(|a| a.id.as_str()), Some(id.as_str()));
    assert_eq!(session.index(), 450);
    assert_eq!(session.bookmarks().len(), 1);
    assert_eq!(session.bookmarks()[0].note.as_deref(), Some("middle"));
}

#[test]
fn test_playback_runs_to_the_end_and_persists_each_word() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("states.db");
    let time = ManualTime::new();
    let mut session = open_session(&db, &time);
    let reading = session.import(NewReading::custom("fox", "the quick brown fox")).unwrap();
    session.set_words_per_minute(60);

    session.play();
    assert_eq!(session.status(), PlaybackStatus::Running);
    for expected in 1..=3 {
        time.advance(1000);
        assert!(session.poll());
        assert_eq!(session.index(), expected);
    }
    // The tick that finds the last word stops playback
    time.advance(1000);
    session.poll();
    assert_eq!(session.index(), 3);
    assert_eq!(session.status(), PlaybackStatus::Stopped);
    assert!(!session.has_pending_tick());

    // Nothing left to schedule at the last word
    session.play();
    assert!(!session.is_running());

    let stored = session.store().get_reading(&reading.id).unwrap().unwrap();
    assert_eq!(stored.last_position, 3);
}

#[test]
fn test_held_press_expands_and_refines_position() {
    let dir = TempDir::new().unwrap();
    let time = ManualTime::new();
    let mut session = open_session(&dir.path().join("states.db"), &time);
    session.import(NewReading::custom("doc", numbered(1000))).unwrap();

    assert_eq!(session.navigate(Gesture::Press(0.5)), ScrubOutcome::Preview(500));
    assert_eq!(
        session.time_until_next_event(),
        Some(std::time::Duration::from_millis(500))
    );

    time.advance(500);
    assert!(session.poll());
    assert_eq!(session.scrubber().expanded_window(), Some(400..600));

    assert_eq!(session.navigate(Gesture::Drag(0.25)), ScrubOutcome::Preview(450));
    assert_eq!(session.index(), 0);
    assert_eq!(session.navigate(Gesture::Release(0.25)), ScrubOutcome::Commit(450));
    assert_eq!(session.index(), 450);

    // Still expanded until a click lands elsewhere
    assert_eq!(session.navigate(Gesture::Hover(0.5)), ScrubOutcome::Preview(500));
    assert_eq!(session.navigate(Gesture::Outside), ScrubOutcome::Collapsed);
    assert_eq!(session.scrubber().expanded_window(), None);
    assert_eq!(session.preview(), None);
    assert_eq!(session.index(), 450);
}

#[test]
fn test_imported_file_with_chapters() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("novela.txt");
    fs::write(
        &file,
        "Capítulo 1\nEra una noche oscura.\n\nCapítulo 2\nAmaneció.",
    )
    .unwrap();

    let time = ManualTime::new();
    let mut session = open_session(&dir.path().join("states.db"), &time);
    let imported = read_local(&file).unwrap();
    assert_eq!(imported.name, "novela.txt");
    session.import(imported.into_new_reading()).unwrap();

    assert_eq!(session.chapters().len(), 2);
    assert_eq!(session.current_chapter().map(|c| c.start), Some(0));
    assert!(session.next_chapter());
    assert_eq!(session.index(), 6);
    assert_eq!(session.current_word().map(|w| w.text.as_str()), Some("Capítulo"));
    assert!(!session.next_chapter());
    assert!(session.prev_chapter());
    assert_eq!(session.index(), 0);
}

#[test]
fn test_corrupt_settings_fall_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("states.db");
    {
        State::open(&db).unwrap();
        let conn = rusqlite::Connection::open(&db).unwrap();
        conn.execute(
            "INSERT OR REPLACE INTO preferences (key, value) VALUES ('settings', 'not json')",
            [],
        )
        .unwrap();
    }

    let session = open_session(&db, &ManualTime::new());
    assert_eq!(session.settings().words_per_minute, 50);
    assert_eq!(session.settings().total_cells, 13);
}
