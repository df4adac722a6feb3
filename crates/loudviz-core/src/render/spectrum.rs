use std::f32::consts::PI;

use crate::state::{BandState, BAND_COUNT};

use super::{ColorStop, Paint, Palette, Path, Point, RectF, Size, Surface};

const PADDING_TOP: f32 = 20.0;
const PADDING_BOTTOM: f32 = 10.0;
const GRID_LINES: usize = 11;
const BAR_GAP: f32 = 2.0;
const PEAK_MARKER: f32 = 2.0;
const LINE_WIDTH: f32 = 3.0;
const LINE_FILL_ALPHA: f32 = 0.2;
const DOT_RADIUS: f32 = 3.0;

fn draw_height(size: Size) -> f32 {
    (size.height - PADDING_TOP - PADDING_BOTTOM).max(0.0)
}

pub(super) fn draw_grid(surface: &mut impl Surface, size: Size, palette: &Palette) {
    let step = draw_height(size) / (GRID_LINES - 1) as f32;
    let mut path = Path::new();
    for i in 0..GRID_LINES {
        let y = PADDING_TOP + step * i as f32;
        path.move_to(Point::new(0.0, y)).line_to(Point::new(size.width, y));
    }
    surface.stroke_path(&path, &Paint::Solid(palette.grid), 1.0);
}

/// Bottom → mid at 60% → top, running from `base_y` up to the top edge.
fn bar_gradient(base_y: f32, palette: &Palette) -> Paint {
    Paint::Linear {
        from: Point::new(0.0, base_y),
        to: Point::new(0.0, 0.0),
        stops: vec![
            ColorStop::new(0.0, palette.bar_bottom),
            ColorStop::new(0.6, palette.bar_mid),
            ColorStop::new(1.0, palette.bar_top),
        ],
    }
}

pub(super) fn draw_bars(
    surface: &mut impl Surface,
    size: Size,
    bands: &[BandState; BAND_COUNT],
    palette: &Palette,
    mirrored: bool,
) {
    let (w, h) = (size.width, size.height);
    let slot = w / BAND_COUNT as f32;
    let bar_w = (slot - BAR_GAP).max(0.0);
    let draw_h = draw_height(size);
    let bottom = h - PADDING_BOTTOM;

    let gradient = bar_gradient(if mirrored { h / 2.0 } else { h }, palette);
    let peak_paint = Paint::Solid(palette.peak);

    for (i, band) in bands.iter().enumerate() {
        let x = i as f32 * slot + BAR_GAP / 2.0;
        if mirrored {
            let cy = h / 2.0;
            let bar_h = band.value * h / 2.0;
            surface.fill_rect(RectF::new(x, cy - bar_h, bar_w, bar_h * 2.0), &gradient);
            let peak_h = band.peak * h / 2.0;
            surface.fill_rect(RectF::new(x, cy - peak_h - PEAK_MARKER, bar_w, PEAK_MARKER), &peak_paint);
            surface.fill_rect(RectF::new(x, cy + peak_h, bar_w, PEAK_MARKER), &peak_paint);
        } else {
            let bar_h = band.value * draw_h;
            surface.fill_rect(RectF::new(x, bottom - bar_h, bar_w, bar_h), &gradient);
            let peak_y = bottom - band.peak * draw_h;
            surface.fill_rect(RectF::new(x, peak_y - PEAK_MARKER, bar_w, PEAK_MARKER), &peak_paint);
        }
    }
}

pub(super) fn draw_line(
    surface: &mut impl Surface,
    size: Size,
    bands: &[BandState; BAND_COUNT],
    palette: &Palette,
) {
    let draw_h = draw_height(size);
    let bottom = size.height - PADDING_BOTTOM;
    let step = size.width / (BAND_COUNT - 1) as f32;

    let mut outline = Path::new();
    outline.move_to(Point::new(0.0, bottom));
    for (i, band) in bands.iter().enumerate() {
        outline.line_to(Point::new(i as f32 * step, bottom - band.value * draw_h));
    }
    outline.line_to(Point::new(size.width, bottom)).close();

    surface.fill_path(
        &outline,
        &Paint::Solid(palette.bar_mid.with_alpha(LINE_FILL_ALPHA)),
    );
    surface.stroke_path(&outline, &Paint::Solid(palette.bar_top), LINE_WIDTH);

    let dot_paint = Paint::Solid(palette.peak);
    for (i, band) in bands.iter().enumerate() {
        let center = Point::new(i as f32 * step, bottom - band.peak * draw_h);
        let mut dot = Path::new();
        dot.move_to(Point::new(center.x + DOT_RADIUS, center.y))
            .arc(center, DOT_RADIUS, 0.0, 2.0 * PI)
            .close();
        surface.fill_path(&dot, &dot_paint);
    }
}
