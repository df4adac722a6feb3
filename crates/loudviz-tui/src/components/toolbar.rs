//! Toolbar: status light, mode overlay and the active mode's controls.

use loudviz_core::engine::ModeController;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::action::ComponentId;
use crate::component::Component;
use crate::theme::{status_color, style_label, style_muted, style_panel, style_value};

pub struct Toolbar;

impl Toolbar {
    pub fn new() -> Self {
        Self
    }
}

/// `● SPECTRUM // 60 FPS │ Mode [Bars]  Gain [4x] ...`
pub fn toolbar_line(ctl: &ModeController) -> Line<'static> {
    let palette = ctl.palette();
    let mut spans = vec![
        Span::styled(" ● ", Style::default().fg(status_color(ctl.status()))),
        Span::styled(
            format!("{} // {} FPS", ctl.mode().label(), ctl.fps()),
            style_label(palette),
        ),
        Span::styled(" │ ", style_muted(palette)),
    ];

    for control in ctl.exposed_controls() {
        spans.push(Span::styled(format!("{} ", control.label()), style_muted(palette)));
        spans.push(Span::styled(
            format!(" {} ", control.value(ctl.config())),
            style_value(palette),
        ));
        spans.push(Span::raw("  "));
    }
    Line::from(spans)
}

impl Component for Toolbar {
    fn id(&self) -> ComponentId {
        ComponentId::Toolbar
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, ctl: &ModeController) {
        frame.render_widget(
            Paragraph::new(toolbar_line(ctl)).style(style_panel(ctl.palette())),
            area,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loudviz_core::config::VizConfig;
    use loudviz_core::engine::Mode;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_vu_toolbar_lists_stereo_controls() {
        let ctl = ModeController::new(Mode::Vu, VizConfig::default());
        let t = text(&toolbar_line(&ctl));
        assert!(t.contains("VU METER // 0 FPS"), "{t}");
        assert!(t.contains("Stereo Sim"));
        assert!(t.contains("Noise"));
        assert!(t.contains("Gain"));
    }

    #[test]
    fn test_spectrum_toolbar_hides_stereo_controls() {
        let ctl = ModeController::new(Mode::Spectrum, VizConfig::default());
        let t = text(&toolbar_line(&ctl));
        assert!(t.starts_with(" ● SPECTRUM"), "{t}");
        assert!(!t.contains("Stereo"));
        assert!(t.contains("Decay"));
    }
}
