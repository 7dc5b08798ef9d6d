//! Application rendering.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget, Wrap};

use finfo_core::Catalog;
use finfo_ops::{JobCounters, JobLog, OperationPlan};

use crate::preview::{PreviewContent, PreviewState};
use crate::theme::Theme;
use crate::ui::modals::{ActionPalette, ConfirmModal, InputModal, JobLogOverlay, PlanModal};
use crate::ui::{AppLayout, HelpOverlay, ItemList};

use super::input::InputState;
use super::palette::PaletteEntry;
use super::state::{Mode, PendingConfirm};

/// Render context containing all the state needed for rendering.
pub struct RenderContext<'a> {
    pub mode: Mode,
    pub help_return: Mode,
    pub theme: &'a Theme,
    pub catalog: &'a Catalog,
    /// Number of listings on the back stack.
    pub depth: usize,
    pub preview: &'a PreviewState,
    pub counters: &'a JobCounters,
    /// Present while the job log overlay is open.
    pub job_log: Option<&'a JobLog>,
    pub undo_depth: usize,
    pub input_state: &'a InputState,
    pub palette_index: usize,
    pub pending_confirm: Option<&'a PendingConfirm>,
    pub pending_plan: Option<&'a OperationPlan>,
    pub plan_scroll: usize,
    pub operation_message: Option<&'a (bool, String)>,
}

/// Main render function for the application.
pub fn render_app(ctx: &RenderContext, area: Rect, buf: &mut Buffer) {
    let base_style = Style::default()
        .bg(ctx.theme.background)
        .fg(ctx.theme.foreground);
    buf.set_style(area, base_style);

    let layout = AppLayout::new(area, ctx.preview.is_visible());

    render_header(ctx, layout.header, buf);

    let title = format!(
        " {} ({}) ",
        ctx.catalog.source().label(),
        ctx.catalog.len()
    );
    ItemList::new(ctx.catalog, ctx.theme, title).render(layout.list, buf);

    if let Some(preview_area) = layout.preview {
        render_preview(ctx, preview_area, buf);
    }

    render_status(ctx, layout.status, buf);
    render_footer(ctx, layout.footer, buf);

    if let Some(log) = ctx.job_log {
        JobLogOverlay::new(ctx.theme, log).render(area, buf);
    }

    render_mode_overlay(ctx, ctx.mode, area, buf);
}

fn render_mode_overlay(ctx: &RenderContext, mode: Mode, area: Rect, buf: &mut Buffer) {
    match mode {
        Mode::Help => {
            // The mode underneath stays visible behind help
            render_mode_overlay(ctx, ctx.help_return, area, buf);
            HelpOverlay::new(ctx.theme).render(area, buf);
        }
        Mode::Actions => {
            let entries = PaletteEntry::all()
                .into_iter()
                .map(|entry| (entry.shortcut(), entry.to_string()))
                .collect();
            ActionPalette::new(ctx.theme, entries, ctx.palette_index).render(area, buf);
        }
        Mode::Confirm => {
            if let Some(pending) = ctx.pending_confirm {
                ConfirmModal::new(ctx.theme, pending).render(area, buf);
            }
        }
        Mode::OpsPreview => {
            if let Some(plan) = ctx.pending_plan {
                PlanModal::new(ctx.theme, plan, ctx.plan_scroll).render(area, buf);
            }
        }
        mode if mode.is_input() => {
            let (title, prompt) = mode.input_labels();
            let targets = ctx.catalog.target_set().len();
            InputModal::new(ctx.theme, ctx.input_state, title, prompt, targets).render(area, buf);
        }
        _ => {}
    }
}

fn render_header(ctx: &RenderContext, area: Rect, buf: &mut Buffer) {
    let title = Span::styled(" finfo ", ctx.theme.title.add_modifier(Modifier::BOLD));

    let mut spans = vec![title];
    if ctx.depth > 0 {
        spans.push(Span::styled(
            format!(" ← {} ", ctx.depth),
            Style::default().fg(ctx.theme.muted),
        ));
    }

    let selected = ctx.catalog.selected_paths().len();
    if selected > 0 {
        spans.push(Span::styled(
            format!(" {selected} selected "),
            Style::default()
                .fg(ctx.theme.background)
                .bg(ctx.theme.info),
        ));
    }

    if ctx.undo_depth > 0 {
        spans.push(Span::styled(
            format!(" undo: {} ", ctx.undo_depth),
            Style::default().fg(ctx.theme.muted),
        ));
    }

    Paragraph::new(Line::from(spans))
        .style(ctx.theme.header)
        .render(area, buf);
}

fn render_preview(ctx: &RenderContext, area: Rect, buf: &mut Buffer) {
    let title = match ctx.preview.target().and_then(|p| p.file_name()) {
        Some(name) => format!(" {} ", name.to_string_lossy()),
        None => " Preview ".to_string(),
    };

    let block = Block::default()
        .title(title)
        .title_style(ctx.theme.title)
        .borders(Borders::ALL)
        .border_style(ctx.theme.border);
    let inner = block.inner(area);
    block.render(area, buf);

    let muted = Style::default().fg(ctx.theme.muted);
    let lines: Vec<Line> = match ctx.preview.content() {
        PreviewContent::Empty => vec![Line::styled("Nothing to preview", muted)],
        PreviewContent::Pending => vec![Line::styled("Loading…", ctx.theme.pending)],
        PreviewContent::Report(report) => {
            let mut lines = vec![
                Line::styled(
                    report.name.clone(),
                    Style::default()
                        .fg(ctx.theme.foreground)
                        .add_modifier(Modifier::BOLD),
                ),
                Line::raw(""),
            ];
            for (label, value) in report.rows() {
                let value_style = if label == "Verdict" {
                    ctx.theme.verdict
                } else {
                    Style::default().fg(ctx.theme.foreground)
                };
                lines.push(Line::from(vec![
                    Span::styled(format!("{label:>9} "), ctx.theme.label),
                    Span::styled(value, value_style),
                ]));
            }
            lines
        }
        PreviewContent::Text(text) => text.lines().map(|l| Line::raw(l.to_string())).collect(),
        PreviewContent::Error(error) => vec![Line::styled(
            error.clone(),
            Style::default().fg(ctx.theme.error),
        )],
    };

    Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .render(inner, buf);
}

fn render_status(ctx: &RenderContext, area: Rect, buf: &mut Buffer) {
    let mut spans = Vec::new();

    if let Some((success, message)) = ctx.operation_message {
        spans.push(Span::styled(
            format!(" {message} "),
            Style::default().fg(ctx.theme.status_color(*success)),
        ));
        spans.push(Span::styled("│", ctx.theme.border));
    }

    let counters_style = if ctx.counters.failed > 0 {
        Style::default().fg(ctx.theme.error)
    } else {
        Style::default().fg(ctx.theme.muted)
    };
    spans.push(Span::styled(format!(" {} ", ctx.counters), counters_style));
    spans.push(Span::styled("│", ctx.theme.border));

    spans.push(Span::styled(
        format!(
            " page {}/{} ",
            ctx.catalog.page() + 1,
            ctx.catalog.page_count()
        ),
        Style::default().fg(ctx.theme.muted),
    ));
    spans.push(Span::styled("│", ctx.theme.border));

    let preview = if ctx.preview.is_visible() {
        format!(" preview: {:?} ", ctx.preview.detail()).to_lowercase()
    } else {
        " preview: off ".to_string()
    };
    spans.push(Span::styled(preview, Style::default().fg(ctx.theme.muted)));

    Paragraph::new(Line::from(spans)).render(area, buf);
}

fn render_footer(ctx: &RenderContext, area: Rect, buf: &mut Buffer) {
    let mut keys: Vec<(&str, &str)> = match ctx.mode {
        Mode::Actions => vec![("j/k", "Nav"), ("Enter", "Run"), ("Esc", "Close")],
        Mode::Confirm => vec![("y", "Yes"), ("n", "No")],
        Mode::OpsPreview => vec![("y", "Execute"), ("n", "Cancel"), ("j/k", "Scroll")],
        Mode::Chmod | Mode::OpenWith | Mode::MoveToDir | Mode::RenamePattern => {
            vec![("Enter", "Submit"), ("Esc", "Cancel")]
        }
        Mode::Help => vec![("?/Esc", "Close")],
        Mode::List | Mode::Quit => {
            let mut v = vec![("j/k", "Nav"), ("Enter", "Open"), (":", "Actions")];
            if ctx.catalog.selected_paths().is_empty() {
                v.push(("Spc", "+Sel"));
            } else {
                v.push(("Esc", "Unsel"));
            }
            v.extend([("u", "Undo"), ("L", "Log")]);
            v
        }
    };

    if matches!(ctx.mode, Mode::List) {
        keys.extend([("?", "Help"), ("q", "Quit")]);
    }

    let spans: Vec<Span> = keys
        .iter()
        .flat_map(|(key, desc)| {
            vec![
                Span::styled(format!(" {key} "), ctx.theme.help_key),
                Span::styled(format!("{desc} "), ctx.theme.help_desc),
            ]
        })
        .collect();

    Paragraph::new(Line::from(spans))
        .style(ctx.theme.footer)
        .render(area, buf);
}
