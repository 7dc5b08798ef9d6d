//! Help overlay widget.

use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Widget};

use crate::event::{get_help_sections, get_pattern_help, HelpSection};
use crate::theme::Theme;

use super::popup_rect;

/// Help overlay showing key bindings organized by section.
pub struct HelpOverlay<'a> {
    theme: &'a Theme,
}

impl<'a> HelpOverlay<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self { theme }
    }

    fn section_title(&self, title: &'a str) -> Line<'a> {
        Line::from(Span::styled(
            title,
            Style::default()
                .fg(self.theme.info)
                .add_modifier(Modifier::BOLD),
        ))
    }

    /// Draw sections top to bottom, returning the next free row.
    fn render_sections(&self, sections: &[HelpSection], area: Rect, buf: &mut Buffer) -> u16 {
        let bottom = area.y + area.height;
        let mut y = area.y;

        for section in sections {
            if y >= bottom {
                break;
            }
            buf.set_line(area.x, y, &self.section_title(section.title), area.width);
            y += 1;

            for binding in &section.bindings {
                if y >= bottom {
                    break;
                }
                let line = Line::from(vec![
                    Span::styled(format!("{:>14}", binding.keys), self.theme.help_key),
                    Span::styled(format!(" {}", binding.description), self.theme.help_desc),
                ]);
                buf.set_line(area.x, y, &line, area.width);
                y += 1;
            }

            y += 1;
        }

        y
    }
}

impl Widget for HelpOverlay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let popup_area = popup_rect(area, 84, 26);

        Clear.render(popup_area, buf);

        let block = Block::default()
            .title(" Help - Press ? or Esc to close ")
            .title_style(self.theme.title)
            .borders(Borders::ALL)
            .border_style(self.theme.border);

        let inner = block.inner(popup_area);
        block.render(popup_area, buf);

        let [left_col, right_col] =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                .areas(inner);

        let mut sections = get_help_sections();
        let right = sections.split_off(sections.len().min(2));

        self.render_sections(&sections, left_col, buf);
        let mut y = self.render_sections(&right, right_col, buf);

        // Rename pattern placeholders
        let bottom = right_col.y + right_col.height;
        if y < bottom {
            buf.set_line(right_col.x, y, &self.section_title("Rename patterns"), right_col.width);
            y += 1;
        }
        for (placeholder, desc) in get_pattern_help() {
            if y >= bottom {
                break;
            }
            let line = Line::from(vec![
                Span::styled(format!("{placeholder:>14}"), self.theme.help_key),
                Span::styled(format!(" {desc}"), self.theme.help_desc),
            ]);
            buf.set_line(right_col.x, y, &line, right_col.width);
            y += 1;
        }
    }
}
