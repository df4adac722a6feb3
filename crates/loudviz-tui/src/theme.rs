//! Terminal chrome colours, derived from the active visualizer palette.

use loudviz_core::engine::ConnectionStatus;
use loudviz_core::render::{Palette, Rgba};
use ratatui::style::{Color, Modifier, Style};

// ── Status light ──────────────────────────────────────────────────────────────

pub const C_CONNECTED: Color = Color::Rgb(0, 255, 0);
pub const C_ERROR: Color = Color::Rgb(255, 0, 0);
pub const C_IDLE: Color = Color::Rgb(85, 85, 85);

pub fn to_color(c: Rgba) -> Color {
    Color::Rgb(c.r, c.g, c.b)
}

pub fn status_color(status: ConnectionStatus) -> Color {
    match status {
        ConnectionStatus::Idle => C_IDLE,
        ConnectionStatus::Connected => C_CONNECTED,
        ConnectionStatus::Error => C_ERROR,
    }
}

// ── Predefined styles ─────────────────────────────────────────────────────────

pub fn style_panel(p: &Palette) -> Style {
    Style::default().bg(to_color(p.panel)).fg(to_color(p.text))
}

pub fn style_label(p: &Palette) -> Style {
    Style::default().fg(to_color(p.text)).add_modifier(Modifier::BOLD)
}

pub fn style_value(p: &Palette) -> Style {
    Style::default()
        .fg(to_color(p.text))
        .bg(to_color(p.accent))
}

pub fn style_border(p: &Palette) -> Style {
    Style::default().fg(to_color(p.border))
}

pub fn style_muted(p: &Palette) -> Style {
    Style::default().fg(to_color(p.text.lerp(p.panel, 0.5)))
}
