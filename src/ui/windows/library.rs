use ratatui::{Frame, layout::Rect};

use crate::models::{Reading, ReadingKind};
use crate::navigation::display_percent;
use crate::ui::windows::{centered_popup_area, render_list_popup};

pub struct LibraryWindow;

impl LibraryWindow {
    pub fn format_item(reading: &Reading) -> String {
        let words = reading
            .content
            .as_deref()
            .map(|c| c.split_whitespace().count())
            .unwrap_or(0);
        let progress = if words > 0 {
            format!("{:>3}%", display_percent(reading.last_position, words))
        } else {
            "  -%".to_string()
        };
        let origin = match (&reading.kind, &reading.category) {
            (ReadingKind::Predefined, Some(category)) => format!(" [{}]", category),
            (ReadingKind::Predefined, None) => " [catalog]".to_string(),
            (ReadingKind::Custom, _) => String::new(),
        };
        let marks = match reading.bookmarks.len() {
            0 => String::new(),
            1 => " (1 bookmark)".to_string(),
            n => format!(" ({} bookmarks)", n),
        };
        format!("{} {}{}{}", progress, reading.name, origin, marks)
    }

    pub fn render(frame: &mut Frame, area: Rect, readings: &[Reading], selected_index: usize) {
        let entries: Vec<String> = readings.iter().map(Self::format_item).collect();
        render_list_popup(
            frame,
            centered_popup_area(area, 80, 80),
            "Library",
            &entries,
            selected_index,
            "No readings yet. Open a file with `lector FILE` or press c for the catalog.",
            "Enter open | d delete | c catalog | q back",
        );
    }
}
