use ratatui::{Frame, layout::Rect};

use crate::models::{DisplayMode, Theme};
use crate::settings::Settings;
use crate::ui::windows::{centered_popup_area, render_list_popup};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingItem {
    WordsPerMinute,
    TotalCells,
    Volume,
    Theme,
    DisplayMode,
}

impl SettingItem {
    pub fn all() -> &'static [SettingItem] {
        &[
            SettingItem::WordsPerMinute,
            SettingItem::TotalCells,
            SettingItem::Volume,
            SettingItem::Theme,
            SettingItem::DisplayMode,
        ]
    }
}

pub struct SettingsWindow;

impl SettingsWindow {
    pub fn entries(settings: &Settings, theme: Theme, mode: DisplayMode) -> Vec<String> {
        SettingItem::all()
            .iter()
            .map(|item| match item {
                SettingItem::WordsPerMinute => {
                    format!("Words per minute: {}", settings.words_per_minute)
                }
                SettingItem::TotalCells => format!("Word cells: {}", settings.total_cells),
                SettingItem::Volume => {
                    format!("Background volume: {:.0}%", settings.volume * 100.0)
                }
                SettingItem::Theme => format!("Theme: {}", theme),
                SettingItem::DisplayMode => format!(
                    "View: {}",
                    match mode {
                        DisplayMode::Word => "word",
                        DisplayMode::Paragraph => "paragraph",
                    }
                ),
            })
            .collect()
    }

    pub fn render(frame: &mut Frame, area: Rect, entries: &[String], selected_index: usize) {
        render_list_popup(
            frame,
            centered_popup_area(area, 60, 50),
            "Settings",
            entries,
            selected_index,
            "No settings available",
            "Left/Right adjust | Enter toggle | q back",
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_follow_items() {
        let entries = SettingsWindow::entries(&Settings::default(), Theme::Dark, DisplayMode::Word);
        assert_eq!(entries.len(), SettingItem::all().len());
        assert_eq!(entries[0], "Words per minute: 50");
        assert_eq!(entries[1], "Word cells: 13");
        assert_eq!(entries[2], "Background volume: 50%");
        assert_eq!(entries[3], "Theme: dark");
        assert_eq!(entries[4], "View: word");
    }
}
