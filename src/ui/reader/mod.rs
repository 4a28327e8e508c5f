use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::clock::{MonotonicTime, TimeSource};
use crate::config::{Config, get_app_data_prefix};
use crate::logging;
use crate::models::{DisplayMode, PlaybackStatus, Reading, ReadingKind, WindowType};
use crate::navigation::{Gesture, track_fraction};
use crate::session::ReadingSession;
use crate::settings::Action;
use crate::sources::{Catalog, CatalogEntry};
use crate::state::{ReadingStore, State};
use crate::ui::board::{Board, TrackView, build_header_line, contains, reader_areas};
use crate::ui::windows::{
    bookmarks::BookmarksWindow,
    catalog::CatalogWindow,
    help::HelpWindow,
    library::LibraryWindow,
    settings::{SettingItem, SettingsWindow},
};

const MESSAGE_LIFETIME: Duration = Duration::from_secs(3);
const IDLE_POLL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageType {
    Info,
    Warning,
    Error,
}

/// UI-specific state management
#[derive(Debug, Clone, Default)]
pub struct UiState {
    pub library_items: Vec<Reading>,
    pub library_selected_index: usize,
    pub bookmarks_selected_index: usize,
    pub settings_selected_index: usize,
    pub catalog_entries: Vec<CatalogEntry>,
    pub catalog_selected_index: usize,
    pub catalog_filter: String,
    pub catalog_filter_editing: bool,
    pub help_scroll_offset: u16,
    pub message: Option<String>,
    pub message_type: Option<MessageType>,
    pub message_time: Option<Instant>,
}

impl UiState {
    pub fn set_message(&mut self, message: impl Into<String>, message_type: MessageType) {
        self.message = Some(message.into());
        self.message_type = Some(message_type);
        self.message_time = Some(Instant::now());
    }

    pub fn clear_message(&mut self) {
        self.message = None;
        self.message_type = None;
        self.message_time = None;
    }

    /// Returns true if the current message is older than its lifetime.
    pub fn message_expired(&self) -> bool {
        self.message_time
            .is_some_and(|t| t.elapsed() >= MESSAGE_LIFETIME)
    }

    fn message_remaining(&self) -> Option<Duration> {
        self.message_time
            .map(|t| MESSAGE_LIFETIME.saturating_sub(t.elapsed()))
    }
}

/// Everything the event loop mutates, independent of the terminal.
pub struct ApplicationState<S: ReadingStore, T: TimeSource> {
    pub session: ReadingSession<S, T>,
    pub config: Config,
    pub catalog: Option<Catalog>,
    pub ui_state: UiState,
    pub should_quit: bool,
}

impl<S: ReadingStore, T: TimeSource> ApplicationState<S, T> {
    pub fn new(session: ReadingSession<S, T>, config: Config, catalog: Option<Catalog>) -> Self {
        Self {
            session,
            config,
            catalog,
            ui_state: UiState::default(),
            should_quit: false,
        }
    }

    /// Window shown once a popup closes.
    fn home_window(&self) -> WindowType {
        if self.session.active().is_some() {
            WindowType::Reader
        } else {
            WindowType::Library
        }
    }

    fn close_window(&mut self) {
        let home = self.home_window();
        self.session.set_view(home);
    }

    pub fn refresh_library(&mut self) {
        match self.session.store().get_all_readings() {
            Ok(readings) => {
                self.ui_state.library_items = readings;
                let len = self.ui_state.library_items.len();
                self.ui_state.library_selected_index =
                    self.ui_state.library_selected_index.min(len.saturating_sub(1));
            }
            Err(err) => {
                logging::error(format!("Failed to read library: {}", err));
                self.ui_state
                    .set_message("Could not read the library", MessageType::Error);
            }
        }
    }

    pub fn open_library(&mut self) {
        self.session.pause();
        self.refresh_library();
        self.session.set_view(WindowType::Library);
    }

    pub fn open_catalog(&mut self) {
        self.refresh_library();
        self.session.set_view(WindowType::Catalog);
        self.reload_catalog();
    }

    /// Catalog entries whose name contains the filter, minus stories already in the library.
    pub fn visible_catalog_entries(&self) -> Vec<&CatalogEntry> {
        let query = self.ui_state.catalog_filter.to_lowercase();
        self.ui_state
            .catalog_entries
            .iter()
            .filter(|entry| !self.in_library(entry))
            .filter(|entry| entry.name.to_lowercase().contains(&query))
            .collect()
    }

    fn in_library(&self, entry: &CatalogEntry) -> bool {
        self.ui_state.library_items.iter().any(|reading| {
            reading.kind == ReadingKind::Predefined
                && reading.path.as_deref() == Some(entry.path.as_str())
        })
    }

    fn reload_catalog(&mut self) {
        let Some(catalog) = &self.catalog else {
            self.ui_state
                .set_message("The catalog is not available", MessageType::Warning);
            return;
        };
        match catalog.list() {
            Ok(entries) => {
                self.ui_state.catalog_entries = entries;
                self.ui_state.catalog_selected_index = 0;
            }
            Err(err) => {
                logging::warn(format!("Catalog listing failed: {}", err));
                self.ui_state.set_message(
                    "Could not load the catalog. Press r to retry.",
                    MessageType::Error,
                );
            }
        }
    }

    fn download_selected_story(&mut self) {
        let Some(entry) = self
            .visible_catalog_entries()
            .get(self.ui_state.catalog_selected_index)
            .map(|entry| (*entry).clone())
        else {
            return;
        };
        let Some(catalog) = &self.catalog else {
            return;
        };

        let result = catalog
            .story(&entry.path)
            .map_err(eyre::Report::from)
            .and_then(|story| self.session.import(story));
        match result {
            Ok(reading) => {
                self.refresh_library();
                let len = self.visible_catalog_entries().len();
                self.ui_state.catalog_selected_index =
                    self.ui_state.catalog_selected_index.min(len.saturating_sub(1));
                self.ui_state
                    .set_message(format!("Loaded {}", reading.name), MessageType::Info);
            }
            Err(err) => {
                logging::warn(format!("Could not load {}: {}", entry.path, err));
                self.ui_state.set_message(
                    format!("Could not load {}. Press Enter to retry.", entry.title()),
                    MessageType::Error,
                );
            }
        }
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) {
        if self.ui_state.message.is_some() && self.session.view() == WindowType::Reader {
            self.ui_state.clear_message();
        }

        match self.session.view() {
            WindowType::Reader => self.handle_reader_keys(key),
            WindowType::Library => self.handle_library_keys(key),
            WindowType::Bookmarks => self.handle_bookmarks_keys(key),
            WindowType::Settings => self.handle_settings_keys(key),
            WindowType::Catalog => self.handle_catalog_keys(key),
            WindowType::Help => self.handle_help_keys(key),
        }
    }

    fn handle_reader_keys(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                self.session.navigate(Gesture::Confirm);
            }
            KeyCode::Esc => {
                self.session.navigate(Gesture::Cancel);
            }
            KeyCode::Left => {
                self.session.preview_step(false, false);
            }
            KeyCode::Right => {
                self.session.preview_step(true, false);
            }
            KeyCode::Up => self.session.faster(),
            KeyCode::Down => self.session.slower(),
            KeyCode::Char(c) => match self.config.keymap.action_for(c) {
                Some(action) => self.perform(action),
                None => {
                    if let Some(digit) = c.to_digit(10) {
                        self.session.navigate(Gesture::Percent(digit as u8 * 10));
                    }
                }
            },
            _ => {}
        }
    }

    fn perform(&mut self, action: Action) {
        match action {
            Action::PlayPause => self.session.toggle_playback(),
            Action::NextWord => self.session.next_word(),
            Action::Reset => self.session.reset(),
            Action::AddBookmark => {
                let position = self.session.index();
                match self.session.add_bookmark(None) {
                    Some(_) => self.ui_state.set_message(
                        format!("Bookmark added at word {}", position + 1),
                        MessageType::Info,
                    ),
                    None => self
                        .ui_state
                        .set_message("Open a reading first", MessageType::Warning),
                }
            }
            Action::ShowBookmarks => {
                self.ui_state.bookmarks_selected_index = 0;
                self.session.set_view(WindowType::Bookmarks);
            }
            Action::StepBack => {
                self.session.preview_step(false, false);
            }
            Action::StepForward => {
                self.session.preview_step(true, false);
            }
            Action::JumpBack => {
                self.session.preview_step(false, true);
            }
            Action::JumpForward => {
                self.session.preview_step(true, true);
            }
            Action::NextChapter => {
                if !self.session.next_chapter() {
                    self.ui_state
                        .set_message("No next chapter", MessageType::Info);
                }
            }
            Action::PrevChapter => {
                if !self.session.prev_chapter() {
                    self.ui_state
                        .set_message("No previous chapter", MessageType::Info);
                }
            }
            Action::Faster => self.session.faster(),
            Action::Slower => self.session.slower(),
            Action::ToggleView => self.session.toggle_display_mode(),
            Action::SwitchColor => self.session.toggle_theme(),
            Action::Library => self.open_library(),
            Action::Settings => self.session.set_view(WindowType::Settings),
            Action::Help => {
                self.ui_state.help_scroll_offset = 0;
                self.session.set_view(WindowType::Help);
            }
            Action::Quit => self.should_quit = true,
        }
    }

    fn handle_list_nav(key: &KeyEvent, list_len: usize, index: &mut usize) -> bool {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                if list_len > 0 {
                    *index = index.saturating_add(1).min(list_len - 1);
                }
                true
            }
            KeyCode::Char('k') | KeyCode::Up => {
                *index = index.saturating_sub(1);
                true
            }
            _ => false,
        }
    }

    fn is_close_key(key: &KeyEvent) -> bool {
        matches!(key.code, KeyCode::Esc | KeyCode::Char('q'))
    }

    fn handle_library_keys(&mut self, key: KeyEvent) {
        if Self::is_close_key(&key) {
            if self.session.active().is_some() {
                self.close_window();
            } else {
                self.should_quit = true;
            }
            return;
        }

        let mut index = self.ui_state.library_selected_index;
        if Self::handle_list_nav(&key, self.ui_state.library_items.len(), &mut index) {
            self.ui_state.library_selected_index = index;
            return;
        }

        match key.code {
            KeyCode::Enter => {
                let Some(reading) = self.ui_state.library_items.get(index).cloned() else {
                    return;
                };
                // Reload so the stored position and bookmarks are current
                let result = self.session.load_by_id(&reading.id);
                if let Err(err) = result {
                    self.ui_state
                        .set_message(format!("Could not open: {}", err), MessageType::Error);
                }
            }
            KeyCode::Char('d') => {
                let Some(reading) = self.ui_state.library_items.get(index).cloned() else {
                    return;
                };
                match self.session.delete_reading(&reading.id) {
                    Ok(()) => {
                        self.ui_state
                            .set_message(format!("Deleted {}", reading.name), MessageType::Info);
                        self.refresh_library();
                        // Deleting the open reading drops back here
                        self.session.set_view(WindowType::Library);
                    }
                    Err(err) => {
                        logging::error(format!("Failed to delete {}: {}", reading.id, err));
                        self.ui_state
                            .set_message("Could not delete the reading", MessageType::Error);
                    }
                }
            }
            KeyCode::Char('c') => self.open_catalog(),
            KeyCode::Char('?') => self.session.set_view(WindowType::Help),
            _ => {}
        }
    }

    fn handle_bookmarks_keys(&mut self, key: KeyEvent) {
        if Self::is_close_key(&key) {
            self.close_window();
            return;
        }

        let mut index = self.ui_state.bookmarks_selected_index;
        if Self::handle_list_nav(&key, self.session.bookmarks().len(), &mut index) {
            self.ui_state.bookmarks_selected_index = index;
            return;
        }

        match key.code {
            KeyCode::Enter => {
                if self.session.jump_to_bookmark(index) {
                    self.session.set_view(WindowType::Reader);
                }
            }
            KeyCode::Char('d') => {
                self.session.remove_bookmark(index);
                let len = self.session.bookmarks().len();
                self.ui_state.bookmarks_selected_index = index.min(len.saturating_sub(1));
            }
            _ => {}
        }
    }

    fn handle_settings_keys(&mut self, key: KeyEvent) {
        if Self::is_close_key(&key) {
            self.close_window();
            return;
        }

        let mut index = self.ui_state.settings_selected_index;
        if Self::handle_list_nav(&key, SettingItem::all().len(), &mut index) {
            self.ui_state.settings_selected_index = index;
            return;
        }

        let Some(item) = SettingItem::all().get(index).copied() else {
            return;
        };
        let delta: i32 = match key.code {
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('+') => 1,
            KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('-') => -1,
            KeyCode::Enter => 0,
            _ => return,
        };

        match item {
            SettingItem::WordsPerMinute if delta > 0 => self.session.faster(),
            SettingItem::WordsPerMinute if delta < 0 => self.session.slower(),
            SettingItem::TotalCells if delta != 0 => {
                let cells = self.session.settings().total_cells;
                self.session
                    .set_total_cells(cells.saturating_add_signed(delta));
            }
            SettingItem::Volume if delta > 0 => self.session.volume_up(),
            SettingItem::Volume if delta < 0 => self.session.volume_down(),
            SettingItem::Theme => self.session.toggle_theme(),
            SettingItem::DisplayMode => self.session.toggle_display_mode(),
            _ => {}
        }
    }

    fn handle_catalog_keys(&mut self, key: KeyEvent) {
        if self.ui_state.catalog_filter_editing {
            self.handle_catalog_filter_keys(key);
            return;
        }

        if Self::is_close_key(&key) {
            self.refresh_library();
            self.session.set_view(WindowType::Library);
            return;
        }

        let mut index = self.ui_state.catalog_selected_index;
        if Self::handle_list_nav(&key, self.visible_catalog_entries().len(), &mut index) {
            self.ui_state.catalog_selected_index = index;
            return;
        }

        match key.code {
            KeyCode::Enter => self.download_selected_story(),
            KeyCode::Char('r') => self.reload_catalog(),
            KeyCode::Char('/') => self.ui_state.catalog_filter_editing = true,
            _ => {}
        }
    }

    /// Enter keeps the typed filter, Esc drops it.
    fn handle_catalog_filter_keys(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.ui_state.catalog_filter_editing = false,
            KeyCode::Esc => {
                self.ui_state.catalog_filter.clear();
                self.ui_state.catalog_filter_editing = false;
            }
            KeyCode::Backspace => {
                self.ui_state.catalog_filter.pop();
            }
            KeyCode::Char(c) => self.ui_state.catalog_filter.push(c),
            _ => return,
        }
        self.ui_state.catalog_selected_index = 0;
    }

    fn handle_help_keys(&mut self, key: KeyEvent) {
        let total = HelpWindow::lines(self.config.keymap_user_dict()).len();
        let (width, height) = crossterm::terminal::size().unwrap_or((80, 24));
        let max_offset = HelpWindow::max_scroll_offset(Rect::new(0, 0, width, height), total);

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter => self.close_window(),
            KeyCode::Char('j') | KeyCode::Down => {
                self.ui_state.help_scroll_offset =
                    self.ui_state.help_scroll_offset.saturating_add(1).min(max_offset);
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.ui_state.help_scroll_offset =
                    self.ui_state.help_scroll_offset.saturating_sub(1);
            }
            _ => {}
        }
    }

    /// Maps pointer events over the progress track onto scrub gestures.
    pub fn handle_mouse_event(&mut self, mouse: MouseEvent, frame_area: Rect) {
        if self.session.view() != WindowType::Reader || self.session.is_empty() {
            return;
        }

        let track = reader_areas(frame_area).track;
        let over_track = contains(track, mouse.column, mouse.row);
        let fraction = track_fraction(
            f64::from(mouse.column),
            f64::from(track.x),
            f64::from(track.width),
        );
        let pressed = self.session.scrubber().is_pressed();

        let gesture = match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) if over_track => Gesture::Press(fraction),
            MouseEventKind::Down(_) => Gesture::Outside,
            MouseEventKind::Drag(MouseButton::Left) if pressed => Gesture::Drag(fraction),
            MouseEventKind::Up(MouseButton::Left) if pressed => Gesture::Release(fraction),
            MouseEventKind::Moved if over_track => Gesture::Hover(fraction),
            MouseEventKind::Moved => Gesture::Leave,
            _ => return,
        };
        self.session.navigate(gesture);
    }

    /// How long the loop may block waiting for input.
    pub fn poll_timeout(&self) -> Duration {
        [
            self.session.time_until_next_event(),
            self.ui_state.message_remaining(),
        ]
        .into_iter()
        .flatten()
        .min()
        .unwrap_or(IDLE_POLL)
    }
}

pub struct Reader {
    state: ApplicationState<State, MonotonicTime>,
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl Reader {
    pub fn new(config: Config, store: State) -> eyre::Result<Self> {
        let backend = CrosstermBackend::new(io::stdout());
        let terminal = Terminal::new(backend)?;

        let catalog = match get_app_data_prefix()
            .map_err(|err| err.to_string())
            .and_then(|prefix| {
                Catalog::new(&config.catalog, prefix.join("cache")).map_err(|err| err.to_string())
            }) {
            Ok(catalog) => Some(catalog),
            Err(err) => {
                logging::warn(format!("Catalog disabled: {}", err));
                None
            }
        };

        let session = ReadingSession::new(store, MonotonicTime::new(), config.navigation.clone());
        Ok(Self {
            state: ApplicationState::new(session, config, catalog),
            terminal,
        })
    }

    /// Opens `path` if given, otherwise resumes the first reading with progress.
    pub fn open(&mut self, path: Option<&std::path::Path>) -> eyre::Result<()> {
        let state = &mut self.state;
        match path {
            Some(path) => {
                let imported = crate::sources::read_local(path)?;
                state.session.import(imported.into_new_reading())?;
            }
            None => {
                if !state.session.resume()? {
                    state.refresh_library();
                }
            }
        }
        Ok(())
    }

    /// Run the main application loop
    pub fn run(&mut self) -> eyre::Result<()> {
        crossterm::terminal::enable_raw_mode()?;
        crossterm::execute!(
            io::stdout(),
            crossterm::terminal::EnterAlternateScreen,
            crossterm::event::EnableMouseCapture
        )?;

        self.terminal.clear()?;
        self.terminal.hide_cursor()?;

        let result = self.event_loop();

        // Stops the clock; the last committed position is already stored
        self.state.session.pause();

        self.terminal.clear()?;
        self.terminal.show_cursor()?;
        crossterm::execute!(
            io::stdout(),
            crossterm::terminal::LeaveAlternateScreen,
            crossterm::event::DisableMouseCapture
        )?;
        crossterm::terminal::disable_raw_mode()?;

        result
    }

    fn event_loop(&mut self) -> eyre::Result<()> {
        while !self.state.should_quit {
            if self.state.ui_state.message_expired() {
                self.state.ui_state.clear_message();
            }

            self.state.session.poll();

            let state = &self.state;
            self.terminal.draw(|f| render_static(f, state))?;

            if !crossterm::event::poll(self.state.poll_timeout())? {
                continue;
            }

            match crossterm::event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    self.state.handle_key_event(key);
                }
                Event::Mouse(mouse) => {
                    let size = self.terminal.size()?;
                    self.state
                        .handle_mouse_event(mouse, Rect::new(0, 0, size.width, size.height));
                }
                _ => {}
            }
        }
        Ok(())
    }
}

pub fn render_static<S: ReadingStore, T: TimeSource>(
    frame: &mut Frame,
    state: &ApplicationState<S, T>,
) {
    let session = &state.session;
    let area = frame.area();
    let board = Board::new(session.theme());

    if session.theme().is_dark() {
        frame.render_widget(Block::default().style(Style::default().bg(Color::Black)), area);
    }
    render_reader_static(frame, state, &board);

    match session.view() {
        WindowType::Reader => {}
        WindowType::Library => LibraryWindow::render(
            frame,
            area,
            &state.ui_state.library_items,
            state.ui_state.library_selected_index,
        ),
        WindowType::Bookmarks => BookmarksWindow::render(
            frame,
            area,
            session.bookmarks(),
            session.len(),
            state.ui_state.bookmarks_selected_index,
        ),
        WindowType::Settings => {
            let entries = SettingsWindow::entries(
                &session.settings(),
                session.theme(),
                session.display_mode(),
            );
            SettingsWindow::render(frame, area, &entries, state.ui_state.settings_selected_index);
        }
        WindowType::Catalog => {
            let entries: Vec<String> = state
                .visible_catalog_entries()
                .into_iter()
                .map(|entry| {
                    let cached = state
                        .catalog
                        .as_ref()
                        .is_some_and(|c| c.cached(&entry.path).is_some());
                    CatalogWindow::format_item(entry, cached)
                })
                .collect();
            CatalogWindow::render(
                frame,
                area,
                &entries,
                state.ui_state.catalog_selected_index,
                &state.ui_state.catalog_filter,
                state.ui_state.catalog_filter_editing,
            );
        }
        WindowType::Help => HelpWindow::render(
            frame,
            area,
            state.config.keymap_user_dict(),
            state.ui_state.help_scroll_offset,
        ),
    }

    if let (Some(message), Some(message_type)) =
        (&state.ui_state.message, &state.ui_state.message_type)
    {
        render_message_static(frame, message, message_type);
    }
}

fn render_reader_static<S: ReadingStore, T: TimeSource>(
    frame: &mut Frame,
    state: &ApplicationState<S, T>,
    board: &Board,
) {
    let session = &state.session;
    let areas = reader_areas(frame.area());

    let title = session
        .active()
        .map(|a| a.name.as_str())
        .unwrap_or("lector");
    let status = match session.status() {
        PlaybackStatus::Running => "▶",
        PlaybackStatus::Stopped => "❚❚",
    };
    let chapter = session
        .current_chapter()
        .map(|c| format!("{} | ", c.label))
        .unwrap_or_default();
    let right = format!("{}{} wpm {}", chapter, session.settings().words_per_minute, status);
    let header = build_header_line(title, Some(&right), areas.header.width, true);
    frame.render_widget(Paragraph::new(Line::from(header)), areas.header);

    match session.display_mode() {
        DisplayMode::Word => board.render_word(
            frame,
            areas.word,
            session.current_word(),
            session.settings().total_cells as usize,
        ),
        DisplayMode::Paragraph => {
            board.render_paragraph(frame, areas.word, session.words(), session.index())
        }
    }

    let bookmarks = session.bookmark_positions();
    let view = TrackView {
        index: session.index(),
        len: session.len(),
        preview: session.preview(),
        bookmarks: &bookmarks,
        chapters: session.chapters(),
        window: session.scrubber().expanded_window(),
    };
    board.render_track(frame, areas.label, areas.track, &view);

    if let (Some(candidate), Some(snippet)) = (session.preview(), session.preview_snippet()) {
        board.render_preview(frame, areas.preview, candidate, session.len(), &snippet);
    }

    let footer = Paragraph::new("? help | Space play | h/l preview | Enter jump | R library")
        .style(board.palette().dim);
    frame.render_widget(footer, areas.footer);
}

fn render_message_static(frame: &mut Frame, message: &str, message_type: &MessageType) {
    let color = match message_type {
        MessageType::Info => Color::Blue,
        MessageType::Warning => Color::Yellow,
        MessageType::Error => Color::Red,
    };

    let message_paragraph = Paragraph::new(message)
        .style(Style::default().fg(color))
        .block(Block::default().borders(Borders::ALL))
        .wrap(Wrap { trim: true });

    let frame_area = frame.area();
    if frame_area.width < 6 || frame_area.height < 5 {
        return;
    }
    let area = Rect {
        x: frame_area.x + 2,
        y: frame_area.y + 2,
        width: frame_area.width - 4,
        height: 3,
    };

    frame.render_widget(Clear, area);
    frame.render_widget(message_paragraph, area);
}
