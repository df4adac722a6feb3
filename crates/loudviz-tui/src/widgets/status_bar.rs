//! Status bar: bottom line with connection state, sensor URL and key hints.

use loudviz_core::engine::{ConnectionStatus, Mode};
use loudviz_core::render::Palette;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::theme::{status_color, style_muted, style_panel};

fn key_hints(mode: Mode) -> &'static str {
    match mode {
        Mode::Spectrum => "c connect  m mode  s style  g/G gain  d decay  t theme  ? help  q quit",
        Mode::Vu => {
            "c connect  m mode  s style  g/G gain  d decay  x stereo  n noise  t theme  ? help  q quit"
        }
    }
}

pub fn draw_keys_bar(
    frame: &mut Frame,
    area: Rect,
    mode: Mode,
    status: ConnectionStatus,
    url: &str,
    palette: &Palette,
) {
    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", status.label().to_uppercase()),
            Style::default()
                .fg(status_color(status))
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(url.to_string(), style_muted(palette)),
        Span::raw("  "),
        Span::styled(key_hints(mode), style_muted(palette)),
    ]);
    frame.render_widget(Paragraph::new(line).style(style_panel(palette)), area);
}
