use ratatui::{Frame, layout::Rect};

use crate::sources::CatalogEntry;
use crate::ui::windows::{centered_popup_area, render_list_popup};

pub struct CatalogWindow;

impl CatalogWindow {
    /// Catalog titles follow "Author-Title"; shown as "Title (Author)" when they do.
    pub fn format_item(entry: &CatalogEntry, cached: bool) -> String {
        let title = entry.title();
        let label = match title.split_once('-') {
            Some((author, work)) if !author.is_empty() && !work.is_empty() => {
                format!("{} ({})", work.trim(), author.trim())
            }
            _ => title.to_string(),
        };
        if cached {
            format!("{} *", label)
        } else {
            label
        }
    }

    /// Window title with the search filter, plus a cursor while it is being typed.
    pub fn title(filter: &str, editing: bool) -> String {
        match (filter.is_empty(), editing) {
            (true, false) => "Catalog".to_string(),
            (_, true) => format!("Catalog /{}_", filter),
            (false, false) => format!("Catalog /{}", filter),
        }
    }

    pub fn render(
        frame: &mut Frame,
        area: Rect,
        entries: &[String],
        selected_index: usize,
        filter: &str,
        editing: bool,
    ) {
        let empty_text = if filter.is_empty() {
            "Catalog is empty or not loaded yet. Press r to retry."
        } else {
            "No stories match the search."
        };
        let footer = if editing {
            "Type to search | Enter keep | Esc clear"
        } else {
            "/ search | Enter download | r reload | * cached | q back"
        };
        render_list_popup(
            frame,
            centered_popup_area(area, 70, 80),
            &Self::title(filter, editing),
            entries,
            selected_index,
            empty_text,
            footer,
        );
    }
}
