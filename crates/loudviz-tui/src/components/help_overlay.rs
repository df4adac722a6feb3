//! HelpOverlay component: centered popup with the keyboard reference.

use loudviz_core::engine::ModeController;
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::action::{Action, ComponentId};
use crate::component::Component;
use crate::theme::{style_border, style_label, style_muted, style_panel};

pub struct HelpOverlay {
    pub visible: bool,
}

impl HelpOverlay {
    pub fn new() -> Self {
        Self { visible: false }
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }
}

impl Component for HelpOverlay {
    fn id(&self) -> ComponentId {
        ComponentId::HelpOverlay
    }

    fn handle_key(&mut self, key: KeyEvent, _ctl: &ModeController) -> Option<Action> {
        if !self.visible || key.kind == KeyEventKind::Release {
            return None;
        }
        match key.code {
            KeyCode::Char('?') | KeyCode::Esc => Some(Action::ToggleHelp),
            KeyCode::Char('q') => Some(Action::Quit),
            // Consume everything else while open
            _ => Some(Action::Noop),
        }
    }

    fn on_action(&mut self, action: &Action, _ctl: &ModeController) {
        if *action == Action::ToggleHelp {
            self.toggle();
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, ctl: &ModeController) {
        if !self.visible {
            return;
        }
        let palette = ctl.palette();
        let popup = centered_rect(60, 20, area);

        let section = |title: &'static str| {
            Line::from(Span::styled(
                title,
                style_muted(palette).add_modifier(Modifier::BOLD),
            ))
        };
        let row = |key: &'static str, desc: &'static str| {
            Line::from(vec![
                Span::raw(" "),
                Span::styled(format!("{:<12}", key), style_label(palette)),
                Span::styled(desc, Style::default()),
            ])
        };

        let lines = vec![
            Line::from(Span::styled(" keyboard shortcuts", style_label(palette))),
            Line::from(""),
            section(" sensor"),
            row("c / enter", "connect / stop"),
            Line::from(""),
            section(" visualizer"),
            row("m / tab", "switch spectrum ↔ vu meter"),
            row("s / S", "next / previous style"),
            row("g / G", "gain up / down"),
            row("d / D", "decay profile"),
            row("x", "stereo simulation on/off (vu)"),
            row("n / N", "stereo noise amount (vu)"),
            row("t / T", "theme"),
            Line::from(""),
            section(" ui"),
            row("?", "toggle this help"),
            row("q / Ctrl+C", "quit"),
            Line::from(""),
            Line::from(Span::styled(" press ? or esc to close", style_muted(palette))),
        ];

        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new(lines).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(style_border(palette))
                    .style(style_panel(palette)),
            ),
            popup,
        );
    }
}

fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vert[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use loudviz_core::config::VizConfig;
    use loudviz_core::engine::Mode;
    use ratatui::crossterm::event::KeyModifiers;

    #[test]
    fn test_overlay_consumes_keys_only_when_visible() {
        let ctl = ModeController::new(Mode::Vu, VizConfig::default());
        let mut help = HelpOverlay::new();
        let g = KeyEvent::new(KeyCode::Char('g'), KeyModifiers::NONE);
        assert_eq!(help.handle_key(g, &ctl), None);

        help.on_action(&Action::ToggleHelp, &ctl);
        assert!(help.visible);
        assert_eq!(help.handle_key(g, &ctl), Some(Action::Noop));
        assert_eq!(
            help.handle_key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE), &ctl),
            Some(Action::ToggleHelp)
        );
    }
}
