//! Component trait: the interface every UI panel implements.
//!
//! Components render themselves from the controller (read-only) and turn
//! keys into `Action`s; they never mutate the controller directly.

use loudviz_core::engine::ModeController;
use ratatui::crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};

use crate::action::{Action, ComponentId};

pub trait Component {
    fn id(&self) -> ComponentId;

    /// Handle a key event before the global bindings see it. Return
    /// `Some` to consume the key.
    fn handle_key(&mut self, _key: KeyEvent, _ctl: &ModeController) -> Option<Action> {
        None
    }

    /// Receive an action dispatched by the App.
    fn on_action(&mut self, _action: &Action, _ctl: &ModeController) {}

    fn draw(&mut self, frame: &mut Frame, area: Rect, ctl: &ModeController);
}
