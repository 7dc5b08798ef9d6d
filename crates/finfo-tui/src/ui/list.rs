//! Item list widget.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Widget};

use finfo_core::Catalog;

use crate::theme::Theme;

/// The visible page of the catalog with focus and selection markers.
pub struct ItemList<'a> {
    catalog: &'a Catalog,
    theme: &'a Theme,
    title: String,
}

impl<'a> ItemList<'a> {
    pub fn new(catalog: &'a Catalog, theme: &'a Theme, title: String) -> Self {
        Self {
            catalog,
            theme,
            title,
        }
    }
}

/// First row to draw so that `focus` stays within `height` rows.
fn scroll_offset(focus: usize, height: usize) -> usize {
    if height == 0 {
        0
    } else {
        focus.saturating_sub(height - 1)
    }
}

impl Widget for ItemList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(self.title)
            .title_style(self.theme.title)
            .borders(Borders::ALL)
            .border_style(self.theme.border);
        let inner = block.inner(area);
        block.render(area, buf);

        let visible = self.catalog.visible();
        if visible.is_empty() {
            let line = Line::styled("  (empty)", Style::default().fg(self.theme.muted));
            buf.set_line(inner.x, inner.y, &line, inner.width);
            return;
        }

        let height = inner.height as usize;
        let focus = self.catalog.focus_in_page();
        let offset = scroll_offset(focus, height);

        for (row, (index, item)) in visible
            .iter()
            .enumerate()
            .skip(offset)
            .take(height)
            .enumerate()
        {
            let marker = if item.selected { "● " } else { "  " };
            let mut name = item.name();
            if item.is_dir {
                name.push('/');
            }

            let name_style = if item.selected {
                self.theme.marked
            } else if item.is_dir {
                self.theme.directory
            } else {
                self.theme.file
            };

            let mut line = Line::from(vec![
                Span::styled(marker, self.theme.marked),
                Span::styled(name, name_style),
            ]);
            if index == focus {
                line = line.style(self.theme.selected);
            }

            let y = inner.y + row as u16;
            if index == focus {
                buf.set_style(Rect::new(inner.x, y, inner.width, 1), self.theme.selected);
            }
            buf.set_line(inner.x, y, &line, inner.width);
        }
    }
}
