//! Rendering against an abstract immediate-mode 2D surface.
//!
//! [`render`] is a pure function of the [`Scene`]: state, mode, styles and
//! palette all arrive as arguments. Coordinates are logical units with the
//! origin top-left and y growing downwards; the surface decides how they map
//! onto its pixels.

mod palette;
mod path;
mod spectrum;
mod vu;

#[cfg(test)]
mod record;

pub use palette::Palette;
pub use path::{Path, SubPath};
pub use vu::{led_segment_color, needle_angle, LED_SEGMENTS};

use crate::config::{SpectrumStyle, VuStyle};
use crate::engine::Mode;
use crate::state::SimulationState;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// Opacity 0..=1.
    pub a: f32,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// From `0xRRGGBB`.
    pub const fn hex(v: u32) -> Self {
        Self::rgb((v >> 16) as u8, (v >> 8) as u8, v as u8)
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Linear blend towards `other`, `t` in 0..=1.
    pub fn lerp(self, other: Rgba, t: f32) -> Rgba {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Rgba {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: self.a + (other.a - self.a) * t,
        }
    }

    /// Composite `self` over an opaque `below`.
    pub fn over(self, below: Rgba) -> Rgba {
        below.lerp(self.with_alpha(1.0), self.a).with_alpha(1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RectF {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl RectF {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub offset: f32,
    pub color: Rgba,
}

impl ColorStop {
    pub const fn new(offset: f32, color: Rgba) -> Self {
        Self { offset, color }
    }
}

/// How a shape is filled or stroked.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Rgba),
    /// Colour varies along the axis `from` → `to`.
    Linear {
        from: Point,
        to: Point,
        stops: Vec<ColorStop>,
    },
    /// Colour varies with distance from `center`, `inner` → `outer`.
    Radial {
        center: Point,
        inner: f32,
        outer: f32,
        stops: Vec<ColorStop>,
    },
}

impl Paint {
    /// Colour of this paint at `p`. Rasterizing surfaces call this per pixel.
    pub fn color_at(&self, p: Point) -> Rgba {
        match self {
            Paint::Solid(c) => *c,
            Paint::Linear { from, to, stops } => {
                let (dx, dy) = (to.x - from.x, to.y - from.y);
                let len2 = dx * dx + dy * dy;
                let t = if len2 > 0.0 {
                    ((p.x - from.x) * dx + (p.y - from.y) * dy) / len2
                } else {
                    0.0
                };
                sample_stops(stops, t)
            }
            Paint::Radial {
                center,
                inner,
                outer,
                stops,
            } => {
                let d = ((p.x - center.x).powi(2) + (p.y - center.y).powi(2)).sqrt();
                let span = outer - inner;
                let t = if span > 0.0 { (d - inner) / span } else { 0.0 };
                sample_stops(stops, t)
            }
        }
    }
}

fn sample_stops(stops: &[ColorStop], t: f32) -> Rgba {
    let t = t.clamp(0.0, 1.0);
    let Some(first) = stops.first() else {
        return Rgba::rgb(0, 0, 0).with_alpha(0.0);
    };
    if t <= first.offset {
        return first.color;
    }
    for pair in stops.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t <= b.offset {
            let span = b.offset - a.offset;
            let local = if span > 0.0 { (t - a.offset) / span } else { 1.0 };
            return a.color.lerp(b.color, local);
        }
    }
    stops[stops.len() - 1].color
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub color: Rgba,
    /// Nominal glyph height in logical units.
    pub size: f32,
    pub bold: bool,
    pub align: TextAlign,
}

/// The drawing capabilities the renderer relies on.
pub trait Surface {
    /// Logical size of the drawable area.
    fn size(&self) -> Size;

    fn clear(&mut self, color: Rgba);

    fn fill_rect(&mut self, rect: RectF, paint: &Paint);

    /// Fill every subpath (implicitly closed), even-odd rule.
    fn fill_path(&mut self, path: &Path, paint: &Paint);

    fn stroke_path(&mut self, path: &Path, paint: &Paint, width: f32);

    /// `at` is the text's vertical middle; horizontal anchoring per `align`.
    fn fill_text(&mut self, text: &str, at: Point, style: &TextStyle);
}

/// Everything one frame depends on.
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    pub state: &'a SimulationState,
    pub mode: Mode,
    pub spectrum_style: SpectrumStyle,
    pub vu_style: VuStyle,
    pub palette: &'a Palette,
}

/// Draw one frame of `scene` onto `surface`.
pub fn render(surface: &mut impl Surface, scene: &Scene) {
    let size = surface.size();
    surface.clear(scene.palette.background);
    if size.width <= 0.0 || size.height <= 0.0 {
        return;
    }

    match scene.mode {
        Mode::Spectrum => {
            spectrum::draw_grid(surface, size, scene.palette);
            let bands = &scene.state.bands;
            match scene.spectrum_style {
                SpectrumStyle::Bars => spectrum::draw_bars(surface, size, bands, scene.palette, false),
                SpectrumStyle::Mirror => spectrum::draw_bars(surface, size, bands, scene.palette, true),
                SpectrumStyle::Line => spectrum::draw_line(surface, size, bands, scene.palette),
            }
        }
        Mode::Vu => {
            let (left, right) = (scene.state.left.current, scene.state.right.current);
            match scene.vu_style {
                VuStyle::Led => {
                    let half = size.height / 2.0;
                    vu::draw_led_meter(surface, RectF::new(0.0, 0.0, size.width, half), left, "LEFT CHANNEL", scene.palette);
                    vu::draw_led_meter(surface, RectF::new(0.0, half, size.width, half), right, "RIGHT CHANNEL", scene.palette);
                }
                VuStyle::Analog => {
                    let half = size.width / 2.0;
                    vu::draw_analog_meter(surface, RectF::new(0.0, 0.0, half, size.height), left, "LEFT", scene.palette);
                    vu::draw_analog_meter(surface, RectF::new(half, 0.0, half, size.height), right, "RIGHT", scene.palette);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_and_lerp() {
        let c = Rgba::hex(0xff3300);
        assert_eq!((c.r, c.g, c.b), (0xff, 0x33, 0x00));
        let mid = Rgba::rgb(0, 0, 0).lerp(Rgba::rgb(200, 100, 50), 0.5);
        assert_eq!((mid.r, mid.g, mid.b), (100, 50, 25));
    }

    #[test]
    fn test_alpha_over() {
        let c = Rgba::rgb(200, 200, 200).with_alpha(0.5).over(Rgba::rgb(0, 0, 0));
        assert_eq!((c.r, c.g, c.b, c.a), (100, 100, 100, 1.0));
    }

    #[test]
    fn test_linear_gradient_stops() {
        let paint = Paint::Linear {
            from: Point::new(0.0, 100.0),
            to: Point::new(0.0, 0.0),
            stops: vec![
                ColorStop::new(0.0, Rgba::rgb(0, 255, 0)),
                ColorStop::new(0.6, Rgba::rgb(255, 255, 0)),
                ColorStop::new(1.0, Rgba::rgb(255, 0, 0)),
            ],
        };
        assert_eq!(paint.color_at(Point::new(5.0, 100.0)), Rgba::rgb(0, 255, 0));
        assert_eq!(paint.color_at(Point::new(5.0, 40.0)), Rgba::rgb(255, 255, 0));
        assert_eq!(paint.color_at(Point::new(5.0, -20.0)), Rgba::rgb(255, 0, 0));
        let low = paint.color_at(Point::new(0.0, 70.0));
        assert!(low.r > 0 && low.r < 255 && low.g == 255);
    }

    #[test]
    fn test_radial_gradient() {
        let paint = Paint::Radial {
            center: Point::new(0.0, 0.0),
            inner: 10.0,
            outer: 110.0,
            stops: vec![
                ColorStop::new(0.0, Rgba::rgb(0, 0, 0)),
                ColorStop::new(1.0, Rgba::rgb(100, 100, 100)),
            ],
        };
        assert_eq!(paint.color_at(Point::new(5.0, 0.0)), Rgba::rgb(0, 0, 0));
        assert_eq!(paint.color_at(Point::new(0.0, 60.0)), Rgba::rgb(50, 50, 50));
    }
}
