//! A surface that records draw calls for assertions.

use super::{Paint, Path, Point, RectF, Rgba, Size, Surface, TextStyle};

#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Clear(Rgba),
    FillRect(RectF, Paint),
    FillPath(Path, Paint),
    StrokePath(Path, Paint, f32),
    Text(String, Point, TextStyle),
}

pub struct Recorder {
    size: Size,
    pub ops: Vec<Op>,
}

impl Recorder {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Size::new(width, height),
            ops: Vec::new(),
        }
    }
}

impl Surface for Recorder {
    fn size(&self) -> Size {
        self.size
    }

    fn clear(&mut self, color: Rgba) {
        self.ops.push(Op::Clear(color));
    }

    fn fill_rect(&mut self, rect: RectF, paint: &Paint) {
        self.ops.push(Op::FillRect(rect, paint.clone()));
    }

    fn fill_path(&mut self, path: &Path, paint: &Paint) {
        self.ops.push(Op::FillPath(path.clone(), paint.clone()));
    }

    fn stroke_path(&mut self, path: &Path, paint: &Paint, width: f32) {
        self.ops.push(Op::StrokePath(path.clone(), paint.clone(), width));
    }

    fn fill_text(&mut self, text: &str, at: Point, style: &TextStyle) {
        self.ops.push(Op::Text(text.to_string(), at, *style));
    }
}
