use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{SecondsFormat, Utc};
use eyre::Result;
use rusqlite::{Connection, OptionalExtension, params};
use sha1::{Digest, Sha1};

use crate::config::get_app_data_prefix;
use crate::logging;
use crate::models::{Bookmark, NewReading, Reading, ReadingKind, Theme};
use crate::settings::Settings;

const SETTINGS_KEY: &str = "settings";
const THEME_KEY: &str = "theme";

/// Storage port for readings, bookmarks and process-wide preferences.
///
/// Lookups of unknown ids never fail: they yield `None`, an empty list, or do nothing.
pub trait ReadingStore {
    fn get_reading(&self, id: &str) -> Result<Option<Reading>>;
    fn get_all_readings(&self) -> Result<Vec<Reading>>;
    /// Creates a reading with a fresh id, the current timestamp, position 0 and no bookmarks.
    fn add_reading(&mut self, reading: NewReading) -> Result<Reading>;
    fn update_reading_position(&mut self, id: &str, position: usize) -> Result<()>;
    /// Appends a bookmark stamped with the current time; `None` when the reading is unknown.
    fn add_bookmark(
        &mut self,
        id: &str,
        position: usize,
        note: Option<String>,
    ) -> Result<Option<Bookmark>>;
    /// Removes the bookmark at list `index`; out of range is a no-op.
    fn remove_bookmark(&mut self, id: &str, index: usize) -> Result<()>;
    fn delete_reading(&mut self, id: &str) -> Result<()>;
    /// Stored settings merged over the defaults; defaults when absent or malformed.
    fn get_settings(&self) -> Settings;
    fn set_settings(&mut self, settings: &Settings) -> Result<()>;
    fn get_theme(&self) -> Theme;
    fn set_theme(&mut self, theme: Theme) -> Result<()>;
}

pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn new_reading_id(name: &str, path: Option<&str>) -> String {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let mut hasher = Sha1::new();
    hasher.update(name.as_bytes());
    hasher.update(path.unwrap_or_default().as_bytes());
    hasher.update(
        Utc::now()
            .timestamp_nanos_opt()
            .unwrap_or_default()
            .to_le_bytes(),
    );
    hasher.update(COUNTER.fetch_add(1, Ordering::Relaxed).to_le_bytes());
    hex::encode(hasher.finalize())[..16].to_string()
}

fn settings_from_raw(raw: Option<&str>) -> Settings {
    match raw {
        None => Settings::default(),
        Some(raw) => match Settings::from_json(raw) {
            Ok(settings) => settings,
            Err(err) => {
                logging::error(format!("Stored settings are malformed, using defaults: {}", err));
                Settings::default()
            }
        },
    }
}

pub struct State {
    conn: Connection,
}

impl State {
    pub fn new() -> Result<Self> {
        let prefix = get_app_data_prefix()?;
        Self::open(&prefix.join("states.db"))
    }

    pub fn open(filepath: &Path) -> Result<Self> {
        if let Some(parent) = filepath.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(filepath)?;
        Self::init_db(&conn)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_db(&conn)?;
        Ok(Self { conn })
    }

    fn init_db(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            "
            PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS readings (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                content TEXT,
                kind TEXT NOT NULL DEFAULT 'custom',
                category TEXT,
                path TEXT,
                timestamp TEXT NOT NULL,
                last_position INTEGER NOT NULL DEFAULT 0
            );

            CREATE TABLE IF NOT EXISTS bookmarks (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                reading_id TEXT NOT NULL,
                position INTEGER NOT NULL,
                note TEXT,
                timestamp TEXT NOT NULL,
                FOREIGN KEY (reading_id) REFERENCES readings(id)
                ON DELETE CASCADE
            );

            CREATE TABLE IF NOT EXISTS preferences (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            ",
        )?;
        Ok(())
    }

    fn bookmarks_for(&self, id: &str) -> Result<Vec<Bookmark>> {
        let mut stmt = self.conn.prepare(
            "SELECT position, note, timestamp FROM bookmarks WHERE reading_id=? ORDER BY seq",
        )?;
        let rows = stmt.query_map(params![id], |row| {
            Ok(Bookmark {
                position: row.get::<_, i64>(0)?.max(0) as usize,
                note: row.get(1)?,
                timestamp: row.get(2)?,
            })
        })?;

        let mut bookmarks = Vec::new();
        for bookmark in rows {
            bookmarks.push(bookmark?);
        }
        Ok(bookmarks)
    }

    fn preference(&self, key: &str) -> Result<Option<String>> {
        Ok(self
            .conn
            .query_row(
                "SELECT value FROM preferences WHERE key=?",
                params![key],
                |row| row.get(0),
            )
            .optional()?)
    }

    fn set_preference(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO preferences (key, value) VALUES (?, ?)",
            params![key, value],
        )?;
        Ok(())
    }

    fn read_reading_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Reading> {
        let kind: String = row.get(3)?;
        Ok(Reading {
            id: row.get(0)?,
            name: row.get(1)?,
            content: row.get(2)?,
            kind: ReadingKind::parse(&kind),
            category: row.get(4)?,
            path: row.get(5)?,
            timestamp: row.get(6)?,
            last_position: row.get::<_, i64>(7)?.max(0) as usize,
            bookmarks: Vec::new(),
        })
    }
}

impl ReadingStore for State {
    fn get_reading(&self, id: &str) -> Result<Option<Reading>> {
        let reading = self
            .conn
            .query_row(
                "SELECT id, name, content, kind, category, path, timestamp, last_position FROM readings WHERE id=?",
                params![id],
                Self::read_reading_row,
            )
            .optional()?;

        match reading {
            Some(mut reading) => {
                reading.bookmarks = self.bookmarks_for(&reading.id)?;
                Ok(Some(reading))
            }
            None => Ok(None),
        }
    }

    fn get_all_readings(&self) -> Result<Vec<Reading>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, content, kind, category, path, timestamp, last_position FROM readings ORDER BY rowid",
        )?;
        let rows = stmt.query_map([], Self::read_reading_row)?;

        let mut readings = Vec::new();
        for reading in rows {
            let mut reading = reading?;
            reading.bookmarks = self.bookmarks_for(&reading.id)?;
            readings.push(reading);
        }
        Ok(readings)
    }

    fn add_reading(&mut self, reading: NewReading) -> Result<Reading> {
        let created = Reading {
            id: new_reading_id(&reading.name, reading.path.as_deref()),
            name: reading.name,
            content: reading.content,
            kind: reading.kind,
            category: reading.category,
            path: reading.path,
            timestamp: now_timestamp(),
            last_position: 0,
            bookmarks: Vec::new(),
        };

        self.conn.execute(
            "INSERT INTO readings (id, name, content, kind, category, path, timestamp, last_position) VALUES (?, ?, ?, ?, ?, ?, ?, 0)",
            params![
                created.id,
                created.name,
                created.content,
                created.kind.as_str(),
                created.category,
                created.path,
                created.timestamp,
            ],
        )?;
        logging::debug(format!("Added reading {} ({})", created.id, created.name));
        Ok(created)
    }

    fn update_reading_position(&mut self, id: &str, position: usize) -> Result<()> {
        self.conn.execute(
            "UPDATE readings SET last_position=? WHERE id=?",
            params![position as i64, id],
        )?;
        Ok(())
    }

    fn add_bookmark(
        &mut self,
        id: &str,
        position: usize,
        note: Option<String>,
    ) -> Result<Option<Bookmark>> {
        let exists: Option<i64> = self
            .conn
            .query_row("SELECT 1 FROM readings WHERE id=?", params![id], |row| {
                row.get(0)
            })
            .optional()?;
        if exists.is_none() {
            return Ok(None);
        }

        let bookmark = Bookmark {
            position,
            note,
            timestamp: now_timestamp(),
        };
        self.conn.execute(
            "INSERT INTO bookmarks (reading_id, position, note, timestamp) VALUES (?, ?, ?, ?)",
            params![id, position as i64, bookmark.note, bookmark.timestamp],
        )?;
        Ok(Some(bookmark))
    }

    fn remove_bookmark(&mut self, id: &str, index: usize) -> Result<()> {
        let seq: Option<i64> = self
            .conn
            .query_row(
                "SELECT seq FROM bookmarks WHERE reading_id=? ORDER BY seq LIMIT 1 OFFSET ?",
                params![id, index as i64],
                |row| row.get(0),
            )
            .optional()?;

        if let Some(seq) = seq {
            self.conn
                .execute("DELETE FROM bookmarks WHERE seq=?", params![seq])?;
        }
        Ok(())
    }

    fn delete_reading(&mut self, id: &str) -> Result<()> {
        self.conn.execute("PRAGMA foreign_keys = ON", [])?;
        self.conn
            .execute("DELETE FROM readings WHERE id=?", params![id])?;
        Ok(())
    }

    fn get_settings(&self) -> Settings {
        match self.preference(SETTINGS_KEY) {
            Ok(raw) => settings_from_raw(raw.as_deref()),
            Err(err) => {
                logging::error(format!("Could not read settings: {}", err));
                Settings::default()
            }
        }
    }

    fn set_settings(&mut self, settings: &Settings) -> Result<()> {
        let raw = serde_json::to_string(settings)?;
        self.set_preference(SETTINGS_KEY, &raw)
    }

    fn get_theme(&self) -> Theme {
        match self.preference(THEME_KEY) {
            Ok(raw) => raw.map(|value| Theme::parse(&value)).unwrap_or_default(),
            Err(err) => {
                logging::error(format!("Could not read theme: {}", err));
                Theme::default()
            }
        }
    }

    fn set_theme(&mut self, theme: Theme) -> Result<()> {
        self.set_preference(THEME_KEY, theme.as_str())
    }
}

/// In-memory store with the same semantics as [`State`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    readings: Vec<Reading>,
    settings_raw: Option<String>,
    theme_raw: Option<String>,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the raw `settings` value, as if written by an older or corrupted client.
    pub fn with_raw_settings(raw: impl Into<String>) -> Self {
        Self {
            settings_raw: Some(raw.into()),
            ..Self::default()
        }
    }

    /// Makes every write fail, simulating a full disk or locked database.
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Inserts a fully-formed reading, bypassing id and timestamp assignment.
    pub fn insert(&mut self, reading: Reading) {
        self.readings.retain(|r| r.id != reading.id);
        self.readings.push(reading);
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_writes {
            return Err(eyre::eyre!("store is read-only"));
        }
        Ok(())
    }

    fn find_mut(&mut self, id: &str) -> Option<&mut Reading> {
        self.readings.iter_mut().find(|r| r.id == id)
    }
}

impl ReadingStore for MemoryStore {
    fn get_reading(&self, id: &str) -> Result<Option<Reading>> {
        Ok(self.readings.iter().find(|r| r.id == id).cloned())
    }

    fn get_all_readings(&self) -> Result<Vec<Reading>> {
        Ok(self.readings.clone())
    }

    fn add_reading(&mut self, reading: NewReading) -> Result<Reading> {
        self.check_writable()?;
        let created = Reading {
            id: new_reading_id(&reading.name, reading.path.as_deref()),
            name: reading.name,
            content: reading.content,
            kind: reading.kind,
            category: reading.category,
            path: reading.path,
            timestamp: now_timestamp(),
            last_position: 0,
            bookmarks: Vec::new(),
        };
        self.readings.push(created.clone());
        Ok(created)
    }

    fn update_reading_position(&mut self, id: &str, position: usize) -> Result<()> {
        self.check_writable()?;
        if let Some(reading) = self.find_mut(id) {
            reading.last_position = position;
        }
        Ok(())
    }

    fn add_bookmark(
        &mut self,
        id: &str,
        position: usize,
        note: Option<String>,
    ) -> Result<Option<Bookmark>> {
        self.check_writable()?;
        let Some(reading) = self.find_mut(id) else {
            return Ok(None);
        };
        let bookmark = Bookmark {
            position,
            note,
            timestamp: now_timestamp(),
        };
        reading.bookmarks.push(bookmark.clone());
        Ok(Some(bookmark))
    }

    fn remove_bookmark(&mut self, id: &str, index: usize) -> Result<()> {
        self.check_writable()?;
        if let Some(reading) = self.find_mut(id)
            && index < reading.bookmarks.len()
        {
            reading.bookmarks.remove(index);
        }
        Ok(())
    }

    fn delete_reading(&mut self, id: &str) -> Result<()> {
        self.check_writable()?;
        self.readings.retain(|r| r.id != id);
        Ok(())
    }

    fn get_settings(&self) -> Settings {
        settings_from_raw(self.settings_raw.as_deref())
    }

    fn set_settings(&mut self, settings: &Settings) -> Result<()> {
        self.check_writable()?;
        self.settings_raw = Some(serde_json::to_string(settings)?);
        Ok(())
    }

    fn get_theme(&self) -> Theme {
        self.theme_raw
            .as_deref()
            .map(Theme::parse)
            .unwrap_or_default()
    }

    fn set_theme(&mut self, theme: Theme) -> Result<()> {
        self.check_writable()?;
        self.theme_raw = Some(theme.as_str().to_string());
        Ok(())
    }
}
