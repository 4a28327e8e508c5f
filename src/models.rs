use std::fmt;

/// A single display unit of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    pub text: String,
    /// Character offset of the fixation point.
    pub orp_index: usize,
}

impl Word {
    /// Splits the word around its ORP character: (prefix, orp, suffix).
    pub fn split_at_orp(&self) -> (String, Option<char>, String) {
        let chars: Vec<char> = self.text.chars().collect();
        let orp = self.orp_index.min(chars.len());
        let prefix: String = chars[..orp].iter().collect();
        let pivot = chars.get(orp).copied();
        let suffix: String = if orp + 1 < chars.len() {
            chars[orp + 1..].iter().collect()
        } else {
            String::new()
        };
        (prefix, pivot, suffix)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadingKind {
    Predefined,
    Custom,
}

impl ReadingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadingKind::Predefined => "predefined",
            ReadingKind::Custom => "custom",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value {
            "predefined" => ReadingKind::Predefined,
            _ => ReadingKind::Custom,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bookmark {
    pub position: usize,
    pub note: Option<String>,
    pub timestamp: String,
}

/// A persisted document plus its resume state and bookmarks.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub id: String,
    pub name: String,
    pub content: Option<String>,
    pub kind: ReadingKind,
    pub category: Option<String>,
    pub path: Option<String>,
    pub timestamp: String,
    pub last_position: usize,
    pub bookmarks: Vec<Bookmark>,
}

/// Fields supplied by the caller when a reading is created; the store fills in the rest.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReading {
    pub name: String,
    pub content: Option<String>,
    pub kind: ReadingKind,
    pub category: Option<String>,
    pub path: Option<String>,
}

impl NewReading {
    pub fn custom(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: Some(content.into()),
            kind: ReadingKind::Custom,
            category: None,
            path: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    pub label: String,
    /// Word index of the heading's first word.
    pub start: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Anything other than "dark" reads as light.
    pub fn parse(value: &str) -> Self {
        if value.trim() == "dark" {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    pub fn is_dark(&self) -> bool {
        matches!(self, Theme::Dark)
    }

    pub fn toggled(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackStatus {
    #[default]
    Stopped,
    Running,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    #[default]
    Word,
    Paragraph,
}

impl DisplayMode {
    pub fn toggled(&self) -> Self {
        match self {
            DisplayMode::Word => DisplayMode::Paragraph,
            DisplayMode::Paragraph => DisplayMode::Word,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum WindowType {
    #[default]
    Library,
    Reader,
    Settings,
    Bookmarks,
    Catalog,
    Help,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(text: &str, orp_index: usize) -> Word {
        Word {
            text: text.to_string(),
            orp_index,
        }
    }

    #[test]
    fn test_split_at_orp() {
        let (prefix, pivot, suffix) = word("quick", 2).split_at_orp();
        assert_eq!(prefix, "qu");
        assert_eq!(pivot, Some('i'));
        assert_eq!(suffix, "ck");
    }

    #[test]
    fn test_split_at_orp_multibyte() {
        let (prefix, pivot, suffix) = word("niño", 2).split_at_orp();
        assert_eq!(prefix, "ni");
        assert_eq!(pivot, Some('ñ'));
        assert_eq!(suffix, "o");
    }

    #[test]
    fn test_split_at_orp_single_char() {
        let (prefix, pivot, suffix) = word("a", 0).split_at_orp();
        assert_eq!(prefix, "");
        assert_eq!(pivot, Some('a'));
        assert_eq!(suffix, "");
    }

    #[test]
    fn test_theme_parse() {
        assert_eq!(Theme::parse("dark"), Theme::Dark);
        assert_eq!(Theme::parse("light"), Theme::Light);
        assert_eq!(Theme::parse("purple"), Theme::Light);
        assert_eq!(Theme::default(), Theme::Light);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
    }

    #[test]
    fn test_reading_kind_round_trip() {
        assert_eq!(ReadingKind::parse(ReadingKind::Predefined.as_str()), ReadingKind::Predefined);
        assert_eq!(ReadingKind::parse("custom"), ReadingKind::Custom);
        assert_eq!(ReadingKind::parse("unknown"), ReadingKind::Custom);
    }

    #[test]
    fn test_display_mode_toggle() {
        assert_eq!(DisplayMode::default(), DisplayMode::Word);
        assert_eq!(DisplayMode::Word.toggled(), DisplayMode::Paragraph);
    }
}
