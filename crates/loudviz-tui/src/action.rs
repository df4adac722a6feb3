//! Actions: user intents produced by key handling, dispatched by the App.

use loudviz_core::engine::{Control, Mode};
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Unique identifier for a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentId {
    Toolbar,
    Stage,
    HelpOverlay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    // ── Connection ───────────────────────────────────────────────────────────
    ToggleConnection,

    // ── Visualizer ───────────────────────────────────────────────────────────
    SwitchMode,
    /// Step a control; `true` = forward.
    Adjust(Control, bool),

    // ── UI ───────────────────────────────────────────────────────────────────
    ToggleHelp,

    // ── System ───────────────────────────────────────────────────────────────
    Quit,
    Noop,
}

/// Global key bindings. `s` targets whichever style the active mode has.
pub fn map_key(key: KeyEvent, mode: Mode) -> Action {
    if key.kind == KeyEventKind::Release {
        return Action::Noop;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Action::Quit,
            _ => Action::Noop,
        };
    }

    let style = match mode {
        Mode::Spectrum => Control::SpectrumStyle,
        Mode::Vu => Control::VuStyle,
    };

    match key.code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Char('c') | KeyCode::Enter => Action::ToggleConnection,
        KeyCode::Char('m') | KeyCode::Tab => Action::SwitchMode,
        KeyCode::Char('s') => Action::Adjust(style, true),
        KeyCode::Char('S') => Action::Adjust(style, false),
        KeyCode::Char('g') => Action::Adjust(Control::Gain, true),
        KeyCode::Char('G') => Action::Adjust(Control::Gain, false),
        KeyCode::Char('d') => Action::Adjust(Control::Decay, true),
        KeyCode::Char('D') => Action::Adjust(Control::Decay, false),
        KeyCode::Char('x') => Action::Adjust(Control::StereoSim, true),
        KeyCode::Char('n') => Action::Adjust(Control::StereoNoise, true),
        KeyCode::Char('N') => Action::Adjust(Control::StereoNoise, false),
        KeyCode::Char('t') => Action::Adjust(Control::Theme, true),
        KeyCode::Char('T') => Action::Adjust(Control::Theme, false),
        KeyCode::Char('?') => Action::ToggleHelp,
        _ => Action::Noop,
    }
}
