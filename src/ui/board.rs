use std::ops::Range;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::display::{PARAGRAPH_VISIBLE_LINES, layout_word, paragraph_window, words_per_line};
use crate::models::{Chapter, Theme, Word};
use crate::navigation::display_percent;

/// Screen regions of the reader view. Shared by rendering and mouse hit-testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderAreas {
    pub header: Rect,
    pub word: Rect,
    pub label: Rect,
    pub track: Rect,
    pub preview: Rect,
    pub footer: Rect,
}

const TRACK_MARGIN: u16 = 2;
const PREVIEW_HEIGHT: u16 = 4;

pub fn reader_areas(area: Rect) -> ReaderAreas {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(PARAGRAPH_VISIBLE_LINES as u16 + 2),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(PREVIEW_HEIGHT),
            Constraint::Length(1),
        ])
        .split(area);

    let inset = |rect: Rect| Rect {
        x: rect.x + TRACK_MARGIN.min(rect.width / 2),
        width: rect.width.saturating_sub(TRACK_MARGIN * 2),
        ..rect
    };

    ReaderAreas {
        header: rows[0],
        word: rows[2],
        label: inset(rows[4]),
        track: inset(rows[5]),
        preview: inset(rows[6]),
        footer: rows[7],
    }
}

pub fn contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x
        && column < rect.x.saturating_add(rect.width)
        && row >= rect.y
        && row < rect.y.saturating_add(rect.height)
}

/// Column of `position` on a track of `width` cells spanning `span`.
pub fn track_column(position: usize, span: &Range<usize>, width: u16) -> Option<u16> {
    if width == 0 || span.is_empty() || !span.contains(&position) {
        return None;
    }
    let offset = (position - span.start) as u64 * u64::from(width) / span.len() as u64;
    Some(offset.min(u64::from(width) - 1) as u16)
}

#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub text: Style,
    pub dim: Style,
    pub pivot: Style,
    pub highlight: Style,
    pub filled: Style,
    pub marker: Style,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        let (fg, dim, accent) = if theme.is_dark() {
            (Color::Gray, Color::DarkGray, Color::LightRed)
        } else {
            (Color::Black, Color::Gray, Color::Red)
        };
        Self {
            text: Style::default().fg(fg),
            dim: Style::default().fg(dim),
            pivot: Style::default().fg(accent).add_modifier(Modifier::BOLD),
            highlight: Style::default().fg(Color::White).bg(Color::Blue),
            filled: Style::default().fg(Color::Magenta),
            marker: Style::default().fg(Color::Green),
        }
    }
}

/// Everything the progress track needs to draw itself.
pub struct TrackView<'a> {
    pub index: usize,
    pub len: usize,
    pub preview: Option<usize>,
    pub bookmarks: &'a [usize],
    pub chapters: &'a [Chapter],
    pub window: Option<Range<usize>>,
}

/// Renders the RSVP surface: the pinned word or the paragraph view, the track and its preview.
pub struct Board {
    palette: Palette,
}

impl Board {
    pub fn new(theme: Theme) -> Self {
        Self {
            palette: Palette::for_theme(theme),
        }
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn render_word(&self, frame: &mut Frame, area: Rect, word: Option<&Word>, total_cells: usize) {
        let Some(word) = word else {
            let empty = Paragraph::new("No reading loaded. Press R for the library.")
                .style(self.palette.dim)
                .alignment(ratatui::layout::Alignment::Center);
            frame.render_widget(empty, Self::middle_row(area, 0));
            return;
        };

        let row = layout_word(word, total_cells);
        let width = row.cells.len() as u16;
        let x = area.x + area.width.saturating_sub(width) / 2;
        let line_area = |y: u16| Rect::new(x, y, area.width.saturating_sub(x - area.x), 1);
        let middle = Self::middle_row(area, 0).y;

        let mut guide = vec![' '; row.cells.len()];
        guide[row.orp_cell] = '│';
        let guide: String = guide.into_iter().collect();

        let spans = vec![
            Span::styled(row.prefix(), self.palette.text),
            Span::styled(row.pivot().map(String::from).unwrap_or_default(), self.palette.pivot),
            Span::styled(row.suffix(), self.palette.text),
            Span::styled(row.overflow.clone(), self.palette.dim),
        ];

        if middle > area.y {
            frame.render_widget(
                Paragraph::new(guide.clone()).style(self.palette.dim),
                line_area(middle - 1),
            );
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), line_area(middle));
        if middle + 1 < area.y + area.height {
            frame.render_widget(
                Paragraph::new(guide).style(self.palette.dim),
                line_area(middle + 1),
            );
        }
    }

    fn middle_row(area: Rect, offset: u16) -> Rect {
        Rect::new(area.x, area.y + area.height / 2 + offset, area.width, 1.min(area.height))
    }

    pub fn render_paragraph(&self, frame: &mut Frame, area: Rect, words: &[Word], current: usize) {
        let block = Block::default().borders(Borders::ALL);
        let inner = block.inner(area);
        let window = paragraph_window(
            words.len(),
            current,
            words_per_line(inner.width),
            inner.height as usize,
        );

        let lines: Vec<Line> = window
            .lines
            .iter()
            .map(|range| {
                let mut spans = Vec::new();
                for i in range.clone() {
                    let style = if i == current {
                        self.palette.highlight
                    } else {
                        self.palette.text
                    };
                    spans.push(Span::styled(words[i].text.clone(), style));
                    spans.push(Span::raw(" "));
                }
                Line::from(spans)
            })
            .collect();

        let block = match (window.more_before, window.more_after) {
            (true, true) => block.title("…").title_bottom("…"),
            (true, false) => block.title("…"),
            (false, true) => block.title_bottom("…"),
            (false, false) => block,
        };
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    pub fn render_track(&self, frame: &mut Frame, label_area: Rect, track_area: Rect, view: &TrackView) {
        let width = track_area.width;
        let span = view.window.clone().unwrap_or(0..view.len);

        let mut cells: Vec<(char, Style)> = vec![('─', self.palette.dim); width as usize];
        if let Some(current) = track_column(view.index, &span, width) {
            for cell in cells.iter_mut().take(current as usize) {
                *cell = ('━', self.palette.filled);
            }
        } else if view.index >= span.end {
            cells.fill(('━', self.palette.filled));
        }
        for chapter in view.chapters {
            if let Some(col) = track_column(chapter.start, &span, width) {
                cells[col as usize] = ('┃', self.palette.dim);
            }
        }
        for &position in view.bookmarks {
            if let Some(col) = track_column(position, &span, width) {
                cells[col as usize] = ('◆', self.palette.marker);
            }
        }
        if let Some(col) = track_column(view.index, &span, width) {
            cells[col as usize] = ('●', self.palette.pivot);
        }
        if let Some(col) = view.preview.and_then(|p| track_column(p, &span, width)) {
            cells[col as usize] = ('▲', self.palette.highlight);
        }

        let spans: Vec<Span> = cells
            .into_iter()
            .map(|(ch, style)| Span::styled(ch.to_string(), style))
            .collect();
        frame.render_widget(Paragraph::new(Line::from(spans)), track_area);

        let position = if view.len == 0 {
            "0 / 0 (0%)".to_string()
        } else {
            format!(
                "{} / {} ({}%)",
                view.index + 1,
                view.len,
                display_percent(view.index, view.len)
            )
        };
        let left = match &view.window {
            Some(window) => format!("zoom {}-{}", window.start + 1, window.end),
            None => String::new(),
        };
        let label = build_header_line(&left, Some(&position), label_area.width, false);
        frame.render_widget(Paragraph::new(label).style(self.palette.dim), label_area);
    }

    pub fn render_preview(
        &self,
        frame: &mut Frame,
        area: Rect,
        candidate: usize,
        len: usize,
        snippet: &str,
    ) {
        if area.width < 4 || area.height == 0 {
            return;
        }
        let mut lines = vec![Line::styled(
            format!(
                "Position {} ({}%)",
                candidate + 1,
                display_percent(candidate, len)
            ),
            self.palette.text.add_modifier(Modifier::BOLD),
        )];
        let framed = format!("...{}...", snippet);
        let wrapped = textwrap::wrap(&framed, area.width as usize);
        let room = area.height.saturating_sub(1) as usize;
        for (i, line) in wrapped.iter().take(room).enumerate() {
            let text = if i + 1 == room && wrapped.len() > room {
                format!("{}…", line.trim_end())
            } else {
                line.to_string()
            };
            lines.push(Line::styled(text, self.palette.dim));
        }
        frame.render_widget(Paragraph::new(lines), area);
    }
}

/// One row with `title` centered (or left-aligned) and `right_text` flush right.
pub fn build_header_line(title: &str, right_text: Option<&str>, width: u16, center: bool) -> String {
    let width = width as usize;
    if width == 0 {
        return String::new();
    }

    let mut buffer = vec![' '; width];
    let right: Vec<char> = right_text.map(|t| t.chars().collect()).unwrap_or_default();
    let content_width = if right.is_empty() {
        width
    } else {
        width.saturating_sub(right.len() + 1)
    };

    let title: Vec<char> = title.chars().take(content_width).collect();
    let title_start = if center {
        (content_width - title.len()) / 2
    } else {
        0
    };
    for (i, ch) in title.into_iter().enumerate() {
        buffer[title_start + i] = ch;
    }

    let start = width.saturating_sub(right.len());
    for (i, ch) in right.into_iter().enumerate() {
        if start + i < buffer.len() {
            buffer[start + i] = ch;
        }
    }

    buffer.into_iter().collect()
}
