use ratatui::{
    Frame,
    layout::Rect,
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::settings::CfgDefaultKeymaps;

pub struct HelpWindow;

fn key_label(key: &str) -> String {
    match key {
        " " => "Space".to_string(),
        other => other.to_string(),
    }
}

impl HelpWindow {
    pub fn lines(keys: &CfgDefaultKeymaps) -> Vec<String> {
        let row = |key: &str, what: &str| format!("   {:<18}{}", key_label(key), what);
        vec![
            " Playback:".to_string(),
            row(&keys.play_pause, "Play / Pause"),
            row(&keys.next_word, "Next Word"),
            row(&keys.reset, "Back To Start"),
            row(&keys.faster, "Faster"),
            row(&keys.slower, "Slower"),
            String::new(),
            " Navigation (preview, Enter to jump, Esc to cancel):".to_string(),
            row(&keys.step_back, "Back A Little"),
            row(&keys.step_forward, "Forward A Little"),
            row(&keys.jump_back, "Back A Lot"),
            row(&keys.jump_forward, "Forward A Lot"),
            row("0-9", "Preview 0% .. 90%"),
            row(&keys.next_chapter, "Next Chapter"),
            row(&keys.prev_chapter, "Previous Chapter"),
            row("Mouse", "Hover / click the track, hold to zoom"),
            String::new(),
            " Bookmarks:".to_string(),
            row(&keys.add_bookmark, "Add Bookmark"),
            row(&keys.show_bookmarks, "Show Bookmarks"),
            String::new(),
            " Display & Windows:".to_string(),
            row(&keys.toggle_view, "Word / Paragraph View"),
            row(&keys.switch_color, "Light / Dark Theme"),
            row(&keys.library, "Library"),
            row(&keys.settings, "Settings"),
            row(&keys.help, "Help"),
            row(&keys.quit, "Quit / Close Window"),
        ]
    }

    /// Largest useful scroll offset for a popup rendered into `area`.
    pub fn max_scroll_offset(area: Rect, total_lines: usize) -> u16 {
        let visible = area.height.saturating_sub(2) as usize;
        total_lines.saturating_sub(visible) as u16
    }

    pub fn render(frame: &mut Frame, area: Rect, keys: &CfgDefaultKeymaps, scroll_offset: u16) {
        let help_content: Vec<Line> = Self::lines(keys).into_iter().map(Line::from).collect();

        let max_width = help_content.iter().map(|l| l.width()).max().unwrap_or(0) as u16;
        let width = (max_width + 4).min(area.width);
        let height = (help_content.len() as u16 + 2).min(area.height);

        let x = area.x + (area.width - width) / 2;
        let y = area.y + (area.height - height) / 2;
        let popup_area = Rect::new(x, y, width, height);

        frame.render_widget(Clear, popup_area);

        let help_paragraph = Paragraph::new(help_content)
            .block(Block::default().title("Help").borders(Borders::ALL))
            .scroll((scroll_offset, 0));

        frame.render_widget(help_paragraph, popup_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_use_configured_keys() {
        let mut keys = CfgDefaultKeymaps::default();
        keys.quit = "Q".to_string();
        let lines = HelpWindow::lines(&keys);
        assert!(lines.iter().any(|l| l.contains("Space") && l.contains("Play / Pause")));
        assert!(lines.iter().any(|l| l.trim_start().starts_with('Q') && l.contains("Quit")));
    }

    #[test]
    fn test_max_scroll_offset() {
        assert_eq!(HelpWindow::max_scroll_offset(Rect::new(0, 0, 80, 12), 30), 20);
        assert_eq!(HelpWindow::max_scroll_offset(Rect::new(0, 0, 80, 50), 30), 0);
    }
}
