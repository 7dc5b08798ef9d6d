//! Color theme for the TUI.
//!
//! Semantic styles derived from a small base palette, so every widget asks
//! for a role ("verdict", "conflict") rather than a color.

use ratatui::style::{Color, Modifier, Style};

/// Base colors a theme is derived from.
#[derive(Debug, Clone, Copy)]
struct Palette {
    base: Color,
    surface: Color,
    overlay: Color,
    subtle: Color,
    dim: Color,
    soft: Color,
    text: Color,
    bright: Color,
    accent: Color,
    accent_strong: Color,
    good: Color,
    caution: Color,
    bad: Color,
    mark: Color,
}

/// Zinc greys with sky, emerald, amber and rose accents (Tailwind CSS).
const ZINC: Palette = Palette {
    base: Color::Rgb(24, 24, 27),
    surface: Color::Rgb(39, 39, 42),
    overlay: Color::Rgb(63, 63, 70),
    subtle: Color::Rgb(82, 82, 91),
    dim: Color::Rgb(113, 113, 122),
    soft: Color::Rgb(161, 161, 170),
    text: Color::Rgb(228, 228, 231),
    bright: Color::Rgb(250, 250, 250),
    accent: Color::Rgb(56, 189, 248),
    accent_strong: Color::Rgb(14, 165, 233),
    good: Color::Rgb(52, 211, 153),
    caution: Color::Rgb(251, 191, 36),
    bad: Color::Rgb(251, 113, 133),
    mark: Color::Rgb(245, 158, 11),
};

/// Color theme for the TUI.
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub foreground: Color,
    pub muted: Color,

    /// Focused row.
    pub selected: Style,

    // Status
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,

    // Chrome
    pub border: Style,
    pub title: Style,
    pub help_key: Style,
    pub help_desc: Style,
    pub header: Style,
    pub footer: Style,

    // List entries
    pub directory: Style,
    pub file: Style,
    /// Selected entries and their marker.
    pub marked: Style,

    // Preview pane
    pub label: Style,
    /// Security verdict reported by the metadata tool.
    pub verdict: Style,
    /// Placeholder while a preview is in flight.
    pub pending: Style,

    /// Colliding destinations in a dry run.
    pub conflict: Style,
}

impl Theme {
    /// The dark theme.
    pub fn dark() -> Self {
        Self::from_palette(ZINC)
    }

    fn from_palette(p: Palette) -> Self {
        let bold = Modifier::BOLD;

        Self {
            background: p.base,
            foreground: p.text,
            muted: p.dim,

            selected: Style::new().bg(p.overlay).fg(p.bright).add_modifier(bold),

            success: p.good,
            warning: p.caution,
            error: p.bad,
            info: p.accent,

            border: Style::new().fg(p.subtle),
            title: Style::new().fg(p.accent).add_modifier(bold),
            help_key: Style::new().fg(p.accent).add_modifier(bold),
            help_desc: Style::new().fg(p.soft),
            header: Style::new().bg(p.surface).fg(p.text),
            footer: Style::new().bg(p.surface).fg(p.soft),

            directory: Style::new().fg(p.accent_strong).add_modifier(bold),
            file: Style::new().fg(p.text),
            marked: Style::new().fg(p.mark).add_modifier(bold),

            label: Style::new().fg(p.soft).add_modifier(bold),
            verdict: Style::new().fg(p.caution).add_modifier(bold),
            pending: Style::new().fg(p.dim).add_modifier(Modifier::ITALIC),

            conflict: Style::new().fg(p.bad).add_modifier(bold),
        }
    }

    /// Color for a status message.
    pub fn status_color(&self, success: bool) -> Color {
        if success { self.success } else { self.warning }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}
