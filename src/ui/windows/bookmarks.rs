use ratatui::{Frame, layout::Rect};

use crate::models::Bookmark;
use crate::navigation::display_percent;
use crate::ui::windows::{centered_popup_area, render_list_popup};

pub struct BookmarksWindow;

impl BookmarksWindow {
    pub fn format_item(bookmark: &Bookmark, len: usize) -> String {
        // Timestamps are RFC 3339; the date and minute are enough here
        let when: String = bookmark.timestamp.chars().take(16).collect::<String>().replace('T', " ");
        let mut item = format!(
            "word {} ({}%)  {}",
            bookmark.position + 1,
            display_percent(bookmark.position, len),
            when
        );
        if let Some(note) = &bookmark.note {
            item.push_str("  ");
            item.push_str(note);
        }
        item
    }

    pub fn render(
        frame: &mut Frame,
        area: Rect,
        bookmarks: &[Bookmark],
        len: usize,
        selected_index: usize,
    ) {
        let entries: Vec<String> = bookmarks
            .iter()
            .map(|b| Self::format_item(b, len))
            .collect();
        render_list_popup(
            frame,
            centered_popup_area(area, 60, 60),
            "Bookmarks",
            &entries,
            selected_index,
            "No bookmarks. Press b while reading to add one.",
            "Enter jump | d delete | q back",
        );
    }
}
