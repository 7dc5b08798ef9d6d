//! Modal dialog widgets.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap};

use finfo_ops::{JobLog, OperationPlan};

use crate::app::input::InputState;
use crate::app::state::PendingConfirm;
use crate::theme::Theme;

use super::popup_rect;

fn key_hints(theme: &Theme, hints: &[(&str, &str)]) -> Line<'static> {
    let spans: Vec<Span> = hints
        .iter()
        .flat_map(|(key, desc)| {
            vec![
                Span::styled(format!(" {key} "), theme.help_key),
                Span::raw(format!("{desc}  ")),
            ]
        })
        .collect();
    Line::from(spans)
}

/// Yes/no gate for destructive actions and conflicting plans.
pub struct ConfirmModal<'a> {
    theme: &'a Theme,
    pending: &'a PendingConfirm,
}

impl<'a> ConfirmModal<'a> {
    pub fn new(theme: &'a Theme, pending: &'a PendingConfirm) -> Self {
        Self { theme, pending }
    }

    fn paths(&self) -> Vec<String> {
        match self.pending {
            PendingConfirm::Action { targets, .. } => {
                targets.iter().map(|p| p.display().to_string()).collect()
            }
            PendingConfirm::Plan(plan) => {
                let conflicts = plan.conflicts();
                conflicts
                    .iter()
                    .filter_map(|&i| plan.pairs.get(i))
                    .map(|(from, to)| format!("{} → {}", from.display(), to.display()))
                    .collect()
            }
        }
    }
}

impl Widget for ConfirmModal<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let paths = self.paths();
        let height = u16::try_from(paths.len()).unwrap_or(u16::MAX).saturating_add(8);
        let popup_area = popup_rect(area, 64, height);

        Clear.render(popup_area, buf);

        let block = Block::default()
            .title(" Confirm ")
            .title_style(
                Style::default()
                    .fg(self.theme.error)
                    .add_modifier(Modifier::BOLD),
            )
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.error));

        let inner = block.inner(popup_area);
        block.render(popup_area, buf);

        let mut lines = vec![
            Line::styled(
                self.pending.prompt(),
                Style::default()
                    .fg(self.theme.warning)
                    .add_modifier(Modifier::BOLD),
            ),
            Line::raw(""),
        ];

        let max_items = (inner.height as usize).saturating_sub(4);
        let max_len = (inner.width as usize).saturating_sub(4);
        for path in paths.iter().take(max_items) {
            // Long paths keep their tail
            let shown = if path.chars().count() > max_len {
                let tail: String = path
                    .chars()
                    .rev()
                    .take(max_len.saturating_sub(3))
                    .collect::<Vec<_>>()
                    .into_iter()
                    .rev()
                    .collect();
                format!("...{tail}")
            } else {
                path.clone()
            };
            lines.push(Line::raw(format!("  {shown}")));
        }
        if paths.len() > max_items {
            lines.push(Line::styled(
                format!("  ... and {} more", paths.len() - max_items),
                Style::default().fg(self.theme.muted),
            ));
        }

        lines.push(Line::raw(""));
        lines.push(key_hints(self.theme, &[("y/Enter", "Confirm"), ("n/Esc", "Cancel")]));

        Paragraph::new(lines).render(inner, buf);
    }
}

/// Single-line text input dialog.
pub struct InputModal<'a> {
    theme: &'a Theme,
    input: &'a InputState,
    title: &'a str,
    prompt: &'a str,
    targets: usize,
}

impl<'a> InputModal<'a> {
    pub fn new(
        theme: &'a Theme,
        input: &'a InputState,
        title: &'a str,
        prompt: &'a str,
        targets: usize,
    ) -> Self {
        Self {
            theme,
            input,
            title,
            prompt,
            targets,
        }
    }
}

impl Widget for InputModal<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let height = if self.input.error().is_some() { 9 } else { 7 };
        let popup_area = popup_rect(area, 56, height);

        Clear.render(popup_area, buf);

        let block = Block::default()
            .title(self.title)
            .title_style(
                Style::default()
                    .fg(self.theme.info)
                    .add_modifier(Modifier::BOLD),
            )
            .borders(Borders::ALL)
            .border_style(self.theme.border);

        let inner = block.inner(popup_area);
        block.render(popup_area, buf);

        let mut lines = vec![
            Line::from(vec![
                Span::styled(self.prompt, self.theme.help_desc),
                Span::styled(
                    format!("  ({} item(s))", self.targets),
                    Style::default().fg(self.theme.muted),
                ),
            ]),
            Line::raw(""),
        ];

        // Keep the cursor in view by dropping characters from the left
        let (before, after) = self.input.split_at_cursor();
        let max_visible = (inner.width as usize).saturating_sub(4).max(1);
        let before_len = before.chars().count();
        let skip = before_len.saturating_sub(max_visible - 1);
        let before: String = before.chars().skip(skip).collect();

        let mut after_chars = after.chars();
        let cursor_char = after_chars
            .next()
            .map(String::from)
            .unwrap_or_else(|| " ".to_string());
        let shown = before_len - skip;
        let rest: String = after_chars
            .take(max_visible.saturating_sub(shown + 1))
            .collect();

        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::raw(before),
            Span::styled(cursor_char, Style::default().add_modifier(Modifier::REVERSED)),
            Span::raw(rest),
        ]));

        if let Some(error) = self.input.error() {
            lines.push(Line::raw(""));
            lines.push(Line::styled(
                format!("  {error}"),
                Style::default().fg(self.theme.error),
            ));
        }

        lines.push(Line::raw(""));
        lines.push(key_hints(self.theme, &[("Enter", "Confirm"), ("Esc", "Cancel")]));

        Paragraph::new(lines).render(inner, buf);
    }
}

/// The action palette.
pub struct ActionPalette<'a> {
    theme: &'a Theme,
    entries: Vec<(&'static str, String)>,
    selected: usize,
}

impl<'a> ActionPalette<'a> {
    /// `entries` are `(shortcut, label)` pairs.
    pub fn new(theme: &'a Theme, entries: Vec<(&'static str, String)>, selected: usize) -> Self {
        Self {
            theme,
            entries,
            selected,
        }
    }
}

impl Widget for ActionPalette<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let popup_area = popup_rect(area, 40, self.entries.len() as u16 + 4);

        Clear.render(popup_area, buf);

        let block = Block::default()
            .title(" Actions ")
            .title_style(self.theme.title)
            .borders(Borders::ALL)
            .border_style(self.theme.border);
        let inner = block.inner(popup_area);
        block.render(popup_area, buf);

        let mut lines: Vec<Line> = self
            .entries
            .into_iter()
            .enumerate()
            .map(|(index, (shortcut, label))| {
                let line = Line::from(vec![
                    Span::styled(format!(" {shortcut:>2} "), self.theme.help_key),
                    Span::raw(format!(" {label}")),
                ]);
                if index == self.selected {
                    line.style(self.theme.selected)
                } else {
                    line
                }
            })
            .collect();

        lines.push(Line::raw(""));
        lines.push(key_hints(self.theme, &[("Enter", "Run"), ("Esc", "Close")]));

        Paragraph::new(lines).render(inner, buf);
    }
}

/// Dry-run listing of a plan.
pub struct PlanModal<'a> {
    theme: &'a Theme,
    plan: &'a OperationPlan,
    scroll: usize,
}

impl<'a> PlanModal<'a> {
    pub fn new(theme: &'a Theme, plan: &'a OperationPlan, scroll: usize) -> Self {
        Self {
            theme,
            plan,
            scroll,
        }
    }
}

impl Widget for PlanModal<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let width = area.width.saturating_sub(8).max(40);
        let height = area.height.saturating_sub(6).max(8);
        let popup_area = popup_rect(area, width, height);

        Clear.render(popup_area, buf);

        let conflicts = self.plan.conflicts().len();
        let title = format!(" Dry run: {} ", self.plan.kind);
        let block = Block::default()
            .title(title)
            .title_style(self.theme.title)
            .borders(Borders::ALL)
            .border_style(self.theme.border);
        let inner = block.inner(popup_area);
        block.render(popup_area, buf);

        let dry_run = self.plan.dry_run();
        let mut text = dry_run.lines();
        let header = text.next().unwrap_or_default().to_string();

        let mut lines = vec![Line::styled(header, self.theme.title)];
        let body_height = (inner.height as usize).saturating_sub(4);
        for line in text.skip(self.scroll).take(body_height) {
            let style = if line.ends_with(']') {
                self.theme.conflict
            } else {
                Style::default().fg(self.theme.foreground)
            };
            lines.push(Line::styled(line.to_string(), style));
        }

        lines.push(Line::raw(""));
        if conflicts > 0 {
            lines.push(Line::styled(
                format!("{conflicts} conflicting destination(s); confirming asks again"),
                Style::default().fg(self.theme.warning),
            ));
        }
        lines.push(key_hints(
            self.theme,
            &[("y/Enter", "Execute"), ("n/Esc", "Cancel"), ("j/k", "Scroll")],
        ));

        Paragraph::new(lines).render(inner, buf);
    }
}

/// Most recent job completions, newest first.
pub struct JobLogOverlay<'a> {
    theme: &'a Theme,
    log: &'a JobLog,
}

impl<'a> JobLogOverlay<'a> {
    pub fn new(theme: &'a Theme, log: &'a JobLog) -> Self {
        Self { theme, log }
    }
}

impl Widget for JobLogOverlay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let rows = u16::try_from(self.log.len()).unwrap_or(u16::MAX).saturating_add(2);
        let height = rows.clamp(5, area.height.saturating_sub(4).max(5));
        let width = area.width.saturating_sub(10).max(40);
        let popup_area = popup_rect(area, width, height);

        Clear.render(popup_area, buf);

        let block = Block::default()
            .title(format!(" Job log ({}/{}) ", self.log.len(), self.log.capacity()))
            .title_style(self.theme.title)
            .borders(Borders::ALL)
            .border_style(self.theme.border);
        let inner = block.inner(popup_area);
        block.render(popup_area, buf);

        if self.log.is_empty() {
            Paragraph::new(Line::styled(
                "No jobs yet",
                Style::default().fg(self.theme.muted),
            ))
            .render(inner, buf);
            return;
        }

        let lines: Vec<Line> = self
            .log
            .iter()
            .rev()
            .map(|entry| {
                let (mark, color) = if entry.is_success() {
                    ("ok  ", self.theme.success)
                } else {
                    ("FAIL", self.theme.error)
                };
                let mut spans = vec![
                    Span::styled(
                        entry.at.format("%H:%M:%S ").to_string(),
                        Style::default().fg(self.theme.muted),
                    ),
                    Span::styled(mark, Style::default().fg(color)),
                    Span::raw(format!(" {} {}", entry.kind, entry.target.display())),
                ];
                if let Some(error) = &entry.error {
                    spans.push(Span::styled(
                        format!("  {error}"),
                        Style::default().fg(self.theme.error),
                    ));
                }
                Line::from(spans)
            })
            .collect();

        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}
