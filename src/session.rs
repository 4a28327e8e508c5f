use std::time::Duration;

use eyre::{Result, eyre};

use crate::bookmarks::BookmarkList;
use crate::clock::{ClockEvent, PlaybackClock, TimeSource};
use crate::config::NavigationConfig;
use crate::logging;
use crate::models::{
    Bookmark, Chapter, DisplayMode, NewReading, PlaybackStatus, Reading, ReadingKind, Theme,
    WindowType, Word,
};
use crate::navigation::{self, Gesture, ScrubOutcome, Scrubber};
use crate::settings::{Settings, VOLUME_STEP, WORDS_PER_MINUTE_STEP};
use crate::state::ReadingStore;
use crate::tokenizer::{detect_chapters, tokenize};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveReading {
    pub id: String,
    pub name: String,
}

/// The reading currently on screen: words, committed index, playback and preferences.
///
/// Every committed index is written through to the store. Store failures are
/// logged and the in-memory state stays authoritative.
pub struct ReadingSession<S: ReadingStore, T: TimeSource> {
    store: S,
    clock: PlaybackClock<T>,
    scrubber: Scrubber,
    navigation: NavigationConfig,
    words: Vec<Word>,
    chapters: Vec<Chapter>,
    index: usize,
    active: Option<ActiveReading>,
    bookmarks: BookmarkList,
    settings: Settings,
    theme: Theme,
    display_mode: DisplayMode,
    view: WindowType,
}

impl<S: ReadingStore, T: TimeSource> ReadingSession<S, T> {
    pub fn new(store: S, time: T, navigation: NavigationConfig) -> Self {
        let settings = store.get_settings();
        let theme = store.get_theme();
        Self {
            clock: PlaybackClock::new(time, settings.interval_ms()),
            scrubber: Scrubber::new(&navigation),
            store,
            navigation,
            words: Vec::new(),
            chapters: Vec::new(),
            index: 0,
            active: None,
            bookmarks: BookmarkList::default(),
            settings,
            theme,
            display_mode: DisplayMode::default(),
            view: WindowType::Library,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current_word(&self) -> Option<&Word> {
        self.words.get(self.index)
    }

    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    pub fn current_chapter(&self) -> Option<&Chapter> {
        navigation::current_chapter(&self.chapters, self.index).map(|i| &self.chapters[i])
    }

    pub fn status(&self) -> PlaybackStatus {
        self.clock.status()
    }

    pub fn is_running(&self) -> bool {
        self.clock.status() == PlaybackStatus::Running
    }

    pub fn has_pending_tick(&self) -> bool {
        self.clock.has_pending_tick()
    }

    pub fn active(&self) -> Option<&ActiveReading> {
        self.active.as_ref()
    }

    pub fn bookmarks(&self) -> &[Bookmark] {
        self.bookmarks.items()
    }

    pub fn bookmark_positions(&self) -> Vec<usize> {
        self.bookmarks.positions().collect()
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.display_mode
    }

    pub fn view(&self) -> WindowType {
        self.view.clone()
    }

    pub fn set_view(&mut self, view: WindowType) {
        self.view = view;
    }

    pub fn percent(&self) -> u32 {
        navigation::display_percent(self.index, self.words.len())
    }

    pub fn preview(&self) -> Option<usize> {
        self.scrubber.preview()
    }

    pub fn scrubber(&self) -> &Scrubber {
        &self.scrubber
    }

    /// Context words around the preview candidate, if any.
    pub fn preview_snippet(&self) -> Option<String> {
        self.scrubber.preview().map(|candidate| {
            navigation::context_snippet(&self.words, candidate, self.navigation.preview_radius)
        })
    }

    pub fn load(&mut self, reading: &Reading) -> Result<()> {
        let content = reading.content.as_deref().unwrap_or_default();
        let words = tokenize(content);
        if words.is_empty() {
            logging::warn(format!("Reading {} has no content, not loading", reading.id));
            return Err(eyre!("Reading \"{}\" has no content", reading.name));
        }

        self.clock.dispatch(ClockEvent::Stop);
        self.scrubber.reset();
        self.index = reading.last_position.min(words.len() - 1);
        self.chapters = detect_chapters(content);
        self.words = words;
        self.bookmarks = BookmarkList::new(reading.bookmarks.clone());
        self.active = Some(ActiveReading {
            id: reading.id.clone(),
            name: reading.name.clone(),
        });
        self.view = WindowType::Reader;
        logging::info(format!(
            "Loaded {} ({} words) at {}",
            reading.name,
            self.words.len(),
            self.index
        ));
        Ok(())
    }

    pub fn load_by_id(&mut self, id: &str) -> Result<()> {
        match self.store.get_reading(id)? {
            Some(reading) => self.load(&reading),
            None => Err(eyre!("No reading with id {}", id)),
        }
    }

    /// Loads the first started reading that loads cleanly. Returns whether one was loaded.
    ///
    /// Readings that fail to load are logged and skipped.
    pub fn resume(&mut self) -> Result<bool> {
        let started = self
            .store
            .get_all_readings()?
            .into_iter()
            .filter(|r| r.last_position > 0);
        for reading in started {
            match self.load(&reading) {
                Ok(()) => return Ok(true),
                Err(err) => {
                    logging::warn(format!("Skipping {} on resume: {}", reading.id, err));
                }
            }
        }
        Ok(false)
    }

    /// Adds a reading to the library and opens it.
    ///
    /// Predefined readings with a known path reuse the existing entry.
    pub fn import(&mut self, new_reading: NewReading) -> Result<Reading> {
        let has_words = new_reading
            .content
            .as_deref()
            .is_some_and(|c| !c.trim().is_empty());
        if !has_words {
            logging::warn(format!("Refusing to import empty document {}", new_reading.name));
            return Err(eyre!("\"{}\" has no readable text", new_reading.name));
        }

        let existing = if new_reading.kind == ReadingKind::Predefined && new_reading.path.is_some() {
            self.store.get_all_readings()?.into_iter().find(|r| {
                r.kind == ReadingKind::Predefined && r.path == new_reading.path
            })
        } else {
            None
        };

        let reading = match existing {
            Some(reading) => reading,
            None => self.store.add_reading(new_reading)?,
        };
        self.load(&reading)?;
        Ok(reading)
    }

    pub fn delete_reading(&mut self, id: &str) -> Result<()> {
        self.store.delete_reading(id)?;
        if self.active.as_ref().is_some_and(|a| a.id == id) {
            self.clear();
        }
        Ok(())
    }

    /// Drops the active reading and stops the clock.
    pub fn clear(&mut self) {
        self.clock.teardown();
        self.scrubber.reset();
        self.words.clear();
        self.chapters.clear();
        self.index = 0;
        self.active = None;
        self.bookmarks = BookmarkList::default();
        self.view = WindowType::Library;
    }

    fn persist_position(&mut self) {
        let Some(active) = &self.active else {
            return;
        };
        if let Err(err) = self.store.update_reading_position(&active.id, self.index) {
            logging::warn(format!("Failed to save position for {}: {}", active.id, err));
        }
    }

    fn apply_commits(&mut self, commits: Vec<usize>) -> bool {
        let changed = !commits.is_empty();
        for index in commits {
            self.index = index.min(self.words.len().saturating_sub(1));
            self.persist_position();
        }
        changed
    }

    pub fn play(&mut self) {
        let commits = self.clock.dispatch(ClockEvent::Play {
            index: self.index,
            len: self.words.len(),
        });
        self.apply_commits(commits);
    }

    pub fn pause(&mut self) {
        self.clock.dispatch(ClockEvent::Pause);
    }

    pub fn toggle_playback(&mut self) {
        if self.is_running() {
            self.pause();
        } else {
            self.play();
        }
    }

    pub fn reset(&mut self) {
        let commits = self.clock.dispatch(ClockEvent::Reset);
        self.scrubber.reset();
        if self.active.is_some() {
            self.apply_commits(commits);
        }
    }

    /// Moves the committed index, stops playback and persists.
    pub fn commit(&mut self, index: usize) {
        if self.is_empty() {
            return;
        }
        self.clock.dispatch(ClockEvent::Stop);
        self.scrubber.reset();
        self.index = index.min(self.words.len() - 1);
        self.persist_position();
    }

    pub fn next_word(&mut self) {
        self.commit(navigation::step(self.index, 1, self.words.len()));
    }

    pub fn navigate(&mut self, gesture: Gesture) -> ScrubOutcome {
        let now = self.clock.time().now_ms();
        let outcome = self
            .scrubber
            .handle(gesture, self.index, self.words.len(), now);
        if let ScrubOutcome::Commit(index) = outcome {
            self.clock.dispatch(ClockEvent::Stop);
            self.index = index.min(self.words.len().saturating_sub(1));
            self.persist_position();
        }
        outcome
    }

    pub fn preview_step(&mut self, forward: bool, large: bool) -> ScrubOutcome {
        let size = if large {
            self.navigation.large_step
        } else {
            self.navigation.small_step
        };
        let delta = isize::try_from(size).unwrap_or(isize::MAX);
        self.navigate(Gesture::Step(if forward { delta } else { -delta }))
    }

    /// Fires a due tick and expands a held press. Returns true when anything changed.
    pub fn poll(&mut self) -> bool {
        let commits = self.clock.poll(self.index, self.words.len());
        let ticked = self.apply_commits(commits);
        let now = self.clock.time().now_ms();
        let expanded = self.scrubber.poll_hold(self.words.len(), now);
        ticked || expanded
    }

    /// How long the event loop may sleep before [`poll`](Self::poll) has work to do.
    pub fn time_until_next_event(&self) -> Option<Duration> {
        let now = self.clock.time().now_ms();
        let hold = self
            .scrubber
            .hold_remaining_ms(now)
            .map(Duration::from_millis);
        match (self.clock.time_until_tick(), hold) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn add_bookmark(&mut self, note: Option<String>) -> Option<&Bookmark> {
        let id = self.active.as_ref()?.id.clone();
        Some(self.bookmarks.add(&mut self.store, &id, self.index, note))
    }

    pub fn remove_bookmark(&mut self, index: usize) -> Option<Bookmark> {
        let id = self.active.as_ref()?.id.clone();
        self.bookmarks.remove(&mut self.store, &id, index)
    }

    pub fn jump_to_bookmark(&mut self, index: usize) -> bool {
        match self.bookmarks.get(index) {
            Some(bookmark) => {
                let position = bookmark.position;
                self.commit(position);
                true
            }
            None => false,
        }
    }

    pub fn next_chapter(&mut self) -> bool {
        match navigation::next_chapter_start(&self.chapters, self.index) {
            Some(start) => {
                self.commit(start);
                true
            }
            None => false,
        }
    }

    pub fn prev_chapter(&mut self) -> bool {
        match navigation::prev_chapter_start(&self.chapters, self.index) {
            Some(start) => {
                self.commit(start);
                true
            }
            None => false,
        }
    }

    fn store_settings(&mut self, settings: Settings) {
        let previous_interval = self.settings.interval_ms();
        self.settings = settings.clamped();
        if let Err(err) = self.store.set_settings(&self.settings) {
            logging::warn(format!("Failed to save settings: {}", err));
        }
        if self.settings.interval_ms() != previous_interval {
            self.clock.dispatch(ClockEvent::RateChanged {
                interval_ms: self.settings.interval_ms(),
            });
        }
    }

    pub fn set_words_per_minute(&mut self, words_per_minute: u32) {
        self.store_settings(Settings {
            words_per_minute,
            ..self.settings
        });
    }

    pub fn set_total_cells(&mut self, total_cells: u32) {
        self.store_settings(Settings {
            total_cells,
            ..self.settings
        });
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.store_settings(Settings {
            volume,
            ..self.settings
        });
    }

    pub fn faster(&mut self) {
        self.set_words_per_minute(self.settings.words_per_minute + WORDS_PER_MINUTE_STEP);
    }

    pub fn slower(&mut self) {
        self.set_words_per_minute(
            self.settings
                .words_per_minute
                .saturating_sub(WORDS_PER_MINUTE_STEP),
        );
    }

    pub fn volume_up(&mut self) {
        self.set_volume(self.settings.volume + VOLUME_STEP);
    }

    pub fn volume_down(&mut self) {
        self.set_volume(self.settings.volume - VOLUME_STEP);
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
        if let Err(err) = self.store.set_theme(self.theme) {
            logging::warn(format!("Failed to save theme: {}", err));
        }
    }

    pub fn toggle_display_mode(&mut self) {
        self.display_mode = self.display_mode.toggled();
    }
}

impl<S: ReadingStore, T: TimeSource> Drop for ReadingSession<S, T> {
    fn drop(&mut self) {
        self.clock.teardown();
    }
}
