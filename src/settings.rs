use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use std::ops::RangeInclusive;

use crate::logging;

pub const TOTAL_CELLS_RANGE: RangeInclusive<u32> = 10..=30;
pub const WORDS_PER_MINUTE_RANGE: RangeInclusive<u32> = 50..=600;
pub const WORDS_PER_MINUTE_STEP: u32 = 25;
pub const VOLUME_STEP: f32 = 0.1;

/// Process-wide reading preferences, stored under the `settings` key.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub total_cells: u32,
    pub words_per_minute: u32,
    pub volume: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            total_cells: 13,
            words_per_minute: 50,
            volume: 0.5,
        }
    }
}

impl Settings {
    /// Parses stored JSON, merging each readable key over the defaults.
    ///
    /// A key with the wrong type keeps its default; only unparseable JSON or a
    /// non-object is an error.
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        let Value::Object(fields) = serde_json::from_str::<Value>(raw)? else {
            return Err(serde::de::Error::custom("settings must be a JSON object"));
        };
        let defaults = Settings::default();
        let settings = Settings {
            total_cells: field(&fields, "totalCells").unwrap_or(defaults.total_cells),
            words_per_minute: field(&fields, "wordsPerMinute")
                .unwrap_or(defaults.words_per_minute),
            volume: field(&fields, "volume").unwrap_or(defaults.volume),
        };
        Ok(settings.clamped())
    }

    pub fn clamped(self) -> Self {
        let volume = if self.volume.is_finite() {
            self.volume.clamp(0.0, 1.0)
        } else {
            Settings::default().volume
        };
        Self {
            total_cells: self
                .total_cells
                .clamp(*TOTAL_CELLS_RANGE.start(), *TOTAL_CELLS_RANGE.end()),
            words_per_minute: self
                .words_per_minute
                .clamp(*WORDS_PER_MINUTE_RANGE.start(), *WORDS_PER_MINUTE_RANGE.end()),
            volume,
        }
    }

    /// Milliseconds between two words at the current pace.
    pub fn interval_ms(&self) -> u64 {
        60_000 / u64::from(self.words_per_minute.max(1))
    }
}

fn field<T: DeserializeOwned>(fields: &Map<String, Value>, key: &str) -> Option<T> {
    let value = fields.get(key)?;
    match serde_json::from_value(value.clone()) {
        Ok(parsed) => Some(parsed),
        Err(err) => {
            logging::warn(format!("Ignoring stored setting {}: {}", key, err));
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CfgDefaultKeymaps {
    pub play_pause: String,
    pub next_word: String,
    pub reset: String,
    pub add_bookmark: String,
    pub show_bookmarks: String,
    pub step_back: String,
    pub step_forward: String,
    pub jump_back: String,
    pub jump_forward: String,
    pub next_chapter: String,
    pub prev_chapter: String,
    pub faster: String,
    pub slower: String,
    pub toggle_view: String,
    pub switch_color: String,
    pub library: String,
    pub settings: String,
    pub help: String,
    pub quit: String,
}

impl Default for CfgDefaultKeymaps {
    fn default() -> Self {
        Self {
            play_pause: " ".to_string(),
            next_word: "n".to_string(),
            reset: "r".to_string(),
            add_bookmark: "b".to_string(),
            show_bookmarks: "B".to_string(),
            step_back: "h".to_string(),
            step_forward: "l".to_string(),
            jump_back: "H".to_string(),
            jump_forward: "L".to_string(),
            next_chapter: "]".to_string(),
            prev_chapter: "[".to_string(),
            faster: "+".to_string(),
            slower: "-".to_string(),
            toggle_view: "p".to_string(),
            switch_color: "c".to_string(),
            library: "R".to_string(),
            settings: "S".to_string(),
            help: "?".to_string(),
            quit: "q".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    PlayPause,
    NextWord,
    Reset,
    AddBookmark,
    ShowBookmarks,
    StepBack,
    StepForward,
    JumpBack,
    JumpForward,
    NextChapter,
    PrevChapter,
    Faster,
    Slower,
    ToggleView,
    SwitchColor,
    Library,
    Settings,
    Help,
    Quit,
}

/// Resolved single-key bindings.
#[derive(Debug, Clone, PartialEq)]
pub struct Keymap {
    bindings: Vec<(char, Action)>,
}

impl Keymap {
    pub fn from_user_dict(dict: &CfgDefaultKeymaps) -> Self {
        let pairs = [
            (&dict.play_pause, Action::PlayPause),
            (&dict.next_word, Action::NextWord),
            (&dict.reset, Action::Reset),
            (&dict.add_bookmark, Action::AddBookmark),
            (&dict.show_bookmarks, Action::ShowBookmarks),
            (&dict.step_back, Action::StepBack),
            (&dict.step_forward, Action::StepForward),
            (&dict.jump_back, Action::JumpBack),
            (&dict.jump_forward, Action::JumpForward),
            (&dict.next_chapter, Action::NextChapter),
            (&dict.prev_chapter, Action::PrevChapter),
            (&dict.faster, Action::Faster),
            (&dict.slower, Action::Slower),
            (&dict.toggle_view, Action::ToggleView),
            (&dict.switch_color, Action::SwitchColor),
            (&dict.library, Action::Library),
            (&dict.settings, Action::Settings),
            (&dict.help, Action::Help),
            (&dict.quit, Action::Quit),
        ];
        let bindings = pairs
            .into_iter()
            .filter_map(|(key, action)| key.chars().next().map(|c| (c, action)))
            .collect();
        Self { bindings }
    }

    pub fn action_for(&self, key: char) -> Option<Action> {
        self.bindings
            .iter()
            .find(|(bound, _)| *bound == key)
            .map(|(_, action)| action.clone())
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::from_user_dict(&CfgDefaultKeymaps::default())
    }
}
