//! Half-block raster, the terminal implementation of the drawing surface.
//!
//! Each terminal cell shows two vertically stacked pixels through the `▀`
//! glyph: foreground is the upper pixel, background the lower one. Shapes
//! are sampled at pixel centres ("centre-in" rule). Text is not rasterized;
//! labels are kept as strings and written over the pixels on blit.

use std::ops::Range;

use loudviz_core::render::{Paint, Path, Point, RectF, Rgba, Size, Surface, TextAlign, TextStyle};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};

use crate::theme::to_color;

const HALF_BLOCK: char = '▀';

#[derive(Debug, Clone)]
struct Label {
    text: String,
    col: i32,
    row: i32,
    color: Rgba,
    bold: bool,
}

pub struct Raster {
    /// Pixels across (one per cell column).
    width: usize,
    /// Pixels down (two per cell row).
    height: usize,
    /// Logical drawing units per pixel.
    scale: f32,
    pixels: Vec<Rgba>,
    labels: Vec<Label>,
}

/// Pixel indices whose centres fall in `[a, b)`. A non-empty interval always
/// yields at least one pixel so hairlines stay visible.
fn span(a: f32, b: f32, scale: f32, limit: usize) -> Range<usize> {
    if !(b > a) {
        return 0..0;
    }
    let mut lo = (a / scale - 0.5).ceil();
    let mut hi = (b / scale - 0.5).ceil();
    if hi <= lo {
        lo = (a / scale).floor();
        hi = lo + 1.0;
    }
    let clamp = |v: f32| v.clamp(0.0, limit as f32) as usize;
    clamp(lo)..clamp(hi)
}

/// Distance from `p` to the segment `a`–`b`.
fn segment_distance(p: Point, a: Point, b: Point) -> f32 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len2 = dx * dx + dy * dy;
    let t = if len2 > 0.0 {
        (((p.x - a.x) * dx + (p.y - a.y) * dy) / len2).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let (cx, cy) = (a.x + t * dx, a.y + t * dy);
    ((p.x - cx).powi(2) + (p.y - cy).powi(2)).sqrt()
}

/// Every edge of every subpath, each subpath implicitly closed.
fn closed_edges(path: &Path) -> Vec<(Point, Point)> {
    let mut edges = Vec::new();
    for sub in path.subpaths() {
        let pts = &sub.points;
        if pts.len() < 2 {
            continue;
        }
        for i in 0..pts.len() {
            edges.push((pts[i], pts[(i + 1) % pts.len()]));
        }
    }
    edges
}

impl Raster {
    pub fn new(scale: f32) -> Self {
        Self {
            width: 0,
            height: 0,
            scale: if scale > 0.0 { scale } else { 1.0 },
            pixels: Vec::new(),
            labels: Vec::new(),
        }
    }

    /// Match the raster to a cell area. Contents are kept when the size is
    /// unchanged.
    pub fn resize(&mut self, cols: u16, rows: u16) {
        let (width, height) = (cols as usize, rows as usize * 2);
        if width == self.width && height == self.height {
            return;
        }
        self.width = width;
        self.height = height;
        self.pixels = vec![Rgba::rgb(0, 0, 0); width * height];
        self.labels.clear();
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgba> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    fn center(&self, x: usize, y: usize) -> Point {
        Point::new(
            (x as f32 + 0.5) * self.scale,
            (y as f32 + 0.5) * self.scale,
        )
    }

    fn blend(&mut self, x: usize, y: usize, color: Rgba) {
        let px = &mut self.pixels[y * self.width + x];
        *px = color.over(*px);
    }

    /// Copy the raster into `buf` at `area`, then overlay the text labels.
    pub fn blit(&self, buf: &mut Buffer, area: Rect) {
        let cols = (area.width as usize).min(self.width);
        let rows = (area.height as usize).min(self.height / 2);

        for row in 0..rows {
            for col in 0..cols {
                let top = self.pixels[(row * 2) * self.width + col];
                let bottom = self.pixels[(row * 2 + 1) * self.width + col];
                let pos = (area.x + col as u16, area.y + row as u16);
                if let Some(cell) = buf.cell_mut(pos) {
                    cell.set_char(HALF_BLOCK)
                        .set_fg(to_color(top))
                        .set_bg(to_color(bottom));
                }
            }
        }

        for label in &self.labels {
            if label.row < 0 || label.row as usize >= rows {
                continue;
            }
            let row = label.row as usize;
            for (i, ch) in label.text.chars().enumerate() {
                let col = label.col + i as i32;
                if col < 0 || col as usize >= cols {
                    continue;
                }
                let col = col as usize;
                let top = self.pixels[(row * 2) * self.width + col];
                let bottom = self.pixels[(row * 2 + 1) * self.width + col];
                let mut style = Style::default()
                    .fg(to_color(label.color))
                    .bg(to_color(top.lerp(bottom, 0.5)));
                if label.bold {
                    style = style.add_modifier(Modifier::BOLD);
                }
                let pos = (area.x + col as u16, area.y + row as u16);
                if let Some(cell) = buf.cell_mut(pos) {
                    cell.set_char(ch).set_style(style);
                }
            }
        }
    }
}

impl Surface for Raster {
    fn size(&self) -> Size {
        Size::new(
            self.width as f32 * self.scale,
            self.height as f32 * self.scale,
        )
    }

    fn clear(&mut self, color: Rgba) {
        let color = color.with_alpha(1.0);
        self.pixels.iter_mut().for_each(|px| *px = color);
        self.labels.clear();
    }

    fn fill_rect(&mut self, rect: RectF, paint: &Paint) {
        let rows = span(rect.y, rect.y + rect.h, self.scale, self.height);
        let cols = span(rect.x, rect.x + rect.w, self.scale, self.width);
        for y in rows {
            for x in cols.clone() {
                let color = paint.color_at(self.center(x, y));
                self.blend(x, y, color);
            }
        }
    }

    fn fill_path(&mut self, path: &Path, paint: &Paint) {
        let Some(bounds) = path.bounds() else {
            return;
        };
        let edges = closed_edges(path);
        let rows = span(bounds.y, bounds.y + bounds.h, self.scale, self.height);

        let mut crossings: Vec<f32> = Vec::new();
        for y in rows {
            let yc = (y as f32 + 0.5) * self.scale;
            crossings.clear();
            for &(a, b) in &edges {
                if (a.y <= yc) != (b.y <= yc) {
                    crossings.push(a.x + (yc - a.y) * (b.x - a.x) / (b.y - a.y));
                }
            }
            crossings.sort_by(f32::total_cmp);

            for pair in crossings.chunks_exact(2) {
                let lo = (pair[0] / self.scale - 0.5).ceil().clamp(0.0, self.width as f32) as usize;
                let hi = (pair[1] / self.scale - 0.5).ceil().clamp(0.0, self.width as f32) as usize;
                for x in lo..hi {
                    let color = paint.color_at(self.center(x, y));
                    self.blend(x, y, color);
                }
            }
        }
    }

    fn stroke_path(&mut self, path: &Path, paint: &Paint, width: f32) {
        let half = (width / 2.0).max(self.scale * 0.5);
        let mut hit = vec![false; self.width * self.height];

        for sub in path.subpaths() {
            let pts = &sub.points;
            let mut segments: Vec<(Point, Point)> =
                pts.windows(2).map(|w| (w[0], w[1])).collect();
            if sub.closed && pts.len() > 2 {
                segments.push((pts[pts.len() - 1], pts[0]));
            }

            for (a, b) in segments {
                let rows = span(a.y.min(b.y) - half, a.y.max(b.y) + half, self.scale, self.height);
                let cols = span(a.x.min(b.x) - half, a.x.max(b.x) + half, self.scale, self.width);
                for y in rows {
                    for x in cols.clone() {
                        if segment_distance(self.center(x, y), a, b) <= half {
                            hit[y * self.width + x] = true;
                        }
                    }
                }
            }
        }

        for (i, _) in hit.iter().enumerate().filter(|(_, h)| **h) {
            let (x, y) = (i % self.width, i / self.width);
            let color = paint.color_at(self.center(x, y));
            self.blend(x, y, color);
        }
    }

    fn fill_text(&mut self, text: &str, at: Point, style: &TextStyle) {
        let len = text.chars().count() as i32;
        let mut col = (at.x / self.scale).round() as i32;
        if style.align == TextAlign::Center {
            col -= len / 2;
        }
        let row = (at.y / (self.scale * 2.0)).floor() as i32;
        self.labels.push(Label {
            text: text.to_string(),
            col,
            row,
            color: style.color,
            bold: style.bold,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Color;

    const BLACK: Rgba = Rgba::rgb(0, 0, 0);
    const RED: Rgba = Rgba::rgb(255, 0, 0);
    const BLUE: Rgba = Rgba::rgb(0, 0, 255);

    fn raster(cols: u16, rows: u16) -> Raster {
        let mut r = Raster::new(3.0);
        r.resize(cols, rows);
        r.clear(BLACK);
        r
    }

    #[test]
    fn test_logical_size() {
        let r = raster(10, 5);
        assert_eq!(r.size(), Size::new(30.0, 30.0));
        assert_eq!(r.pixel(9, 9), Some(BLACK));
        assert_eq!(r.pixel(10, 0), None);
    }

    #[test]
    fn test_fill_rect_centre_rule() {
        let mut r = raster(10, 5);
        r.fill_rect(RectF::new(0.0, 0.0, 6.0, 3.0), &Paint::Solid(RED));
        assert_eq!(r.pixel(0, 0), Some(RED));
        assert_eq!(r.pixel(1, 0), Some(RED));
        assert_eq!(r.pixel(2, 0), Some(BLACK));
        assert_eq!(r.pixel(0, 1), Some(BLACK));
    }

    #[test]
    fn test_hairline_rect_still_visible() {
        let mut r = raster(10, 5);
        r.fill_rect(RectF::new(0.0, 3.2, 3.0, 0.5), &Paint::Solid(RED));
        assert_eq!(r.pixel(0, 1), Some(RED));
        assert_eq!(r.pixel(0, 0), Some(BLACK));
        assert_eq!(r.pixel(0, 2), Some(BLACK));
    }

    #[test]
    fn test_fill_circle() {
        let mut r = raster(10, 5);
        r.fill_path(&Path::circle(Point::new(15.0, 15.0), 6.0), &Paint::Solid(RED));
        assert_eq!(r.pixel(5, 5), Some(RED));
        assert_eq!(r.pixel(4, 4), Some(RED));
        assert_eq!(r.pixel(0, 0), Some(BLACK));
        assert_eq!(r.pixel(9, 9), Some(BLACK));
    }

    #[test]
    fn test_stroke_blends_each_pixel_once() {
        let mut r = raster(10, 5);
        let mut path = Path::new();
        path.move_to(Point::new(0.0, 4.5))
            .line_to(Point::new(15.0, 4.5))
            .line_to(Point::new(30.0, 4.5));
        let grey = Rgba::rgb(200, 200, 200).with_alpha(0.5);
        r.stroke_path(&path, &Paint::Solid(grey), 1.0);

        assert_eq!(r.pixel(5, 1), Some(Rgba::rgb(100, 100, 100)));
        assert_eq!(r.pixel(0, 1), Some(Rgba::rgb(100, 100, 100)));
        assert_eq!(r.pixel(5, 0), Some(BLACK));
        assert_eq!(r.pixel(5, 2), Some(BLACK));
    }

    #[test]
    fn test_blit_half_blocks() {
        let mut r = raster(2, 1);
        r.fill_rect(RectF::new(0.0, 0.0, 6.0, 3.0), &Paint::Solid(RED));
        r.fill_rect(RectF::new(0.0, 3.0, 6.0, 3.0), &Paint::Solid(BLUE));

        let area = Rect::new(0, 0, 2, 1);
        let mut buf = Buffer::empty(area);
        r.blit(&mut buf, area);

        let cell = &buf[(0, 0)];
        assert_eq!(cell.symbol(), "▀");
        assert_eq!(cell.fg, Color::Rgb(255, 0, 0));
        assert_eq!(cell.bg, Color::Rgb(0, 0, 255));
    }

    #[test]
    fn test_centered_label_overlay() {
        let mut r = raster(10, 5);
        let style = TextStyle {
            color: RED,
            size: 12.0,
            bold: true,
            align: TextAlign::Center,
        };
        r.fill_text("VU", Point::new(15.0, 4.0), &style);

        let area = Rect::new(0, 0, 10, 5);
        let mut buf = Buffer::empty(area);
        r.blit(&mut buf, area);
        assert_eq!(buf[(4, 0)].symbol(), "V");
        assert_eq!(buf[(5, 0)].symbol(), "U");
        assert_eq!(buf[(4, 0)].fg, Color::Rgb(255, 0, 0));
        assert_eq!(buf[(6, 0)].symbol(), "▀");

        r.clear(BLACK);
        let mut buf = Buffer::empty(area);
        r.blit(&mut buf, area);
        assert_eq!(buf[(4, 0)].symbol(), "▀");
    }
}
