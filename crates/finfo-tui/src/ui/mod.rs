//! UI components and widgets.

mod help;
mod list;
pub mod modals;

pub use help::HelpOverlay;
pub use list::ItemList;

use ratatui::layout::{Constraint, Layout, Rect};

/// Layout areas for the application.
#[derive(Debug, Clone, Copy)]
pub struct AppLayout {
    pub header: Rect,
    pub list: Rect,
    pub preview: Option<Rect>,
    pub status: Rect,
    pub footer: Rect,
}

impl AppLayout {
    /// Compute layout from terminal area.
    pub fn new(area: Rect, show_preview: bool) -> Self {
        let min_list_width = 30;
        let min_preview_width = 30;

        let [header, content, status, footer] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(5),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(area);

        // Preview takes the right half when there is room for both panes
        let (list, preview) =
            if show_preview && area.width >= min_list_width + min_preview_width {
                let [list, preview] =
                    Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                        .areas(content);
                (list, Some(preview))
            } else {
                (content, None)
            };

        Self {
            header,
            list,
            preview,
            status,
            footer,
        }
    }
}

/// A `width` x `height` rectangle centered in `area`, shrunk to leave a
/// margin when the area is small.
pub fn popup_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(4));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}
