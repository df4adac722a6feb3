//! Stage: the visualizer itself, drawn through the half-block raster.

use loudviz_core::engine::ModeController;
use ratatui::{layout::Rect, Frame};

use crate::action::ComponentId;
use crate::component::Component;
use crate::raster::Raster;

pub struct Stage {
    raster: Raster,
}

impl Stage {
    pub fn new(scale: f32) -> Self {
        Self {
            raster: Raster::new(scale),
        }
    }

    /// The drawing surface, for mode switches that clear it outside a draw.
    pub fn surface_mut(&mut self) -> &mut Raster {
        &mut self.raster
    }
}

impl Component for Stage {
    fn id(&self) -> ComponentId {
        ComponentId::Stage
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, ctl: &ModeController) {
        self.raster.resize(area.width, area.height);
        ctl.render(&mut self.raster);
        self.raster.blit(frame.buffer_mut(), area);
    }
}
