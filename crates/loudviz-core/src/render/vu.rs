use std::f32::consts::PI;

use crate::level::needle_fraction;

use super::{ColorStop, Paint, Palette, Path, Point, RectF, Rgba, Surface, TextAlign, TextStyle};

// ═══════════════════════════════════════════════════════════════
// Analog dial
// ═══════════════════════════════════════════════════════════════

const DIAL_ASPECT: f32 = 1.8;
const DIAL_MARGIN: f32 = 20.0;
const BEZEL_RADIUS: f32 = 12.0;
const FACE_INSET: f32 = 6.0;
const SCALE_START: f32 = 1.2 * PI;
const SCALE_SWEEP: f32 = 0.6 * PI;
const TICKS: usize = 10;
/// Ticks and labels past this fraction of the scale are drawn red.
const RED_ZONE: f32 = 0.7;

const RED: Rgba = Rgba::hex(0xff3333);
const CAPTION_GREY: Rgba = Rgba::hex(0x888888);
const SHADOW: Rgba = Rgba::rgb(0, 0, 0).with_alpha(0.3);
const SHADOW_OFFSET: f32 = 5.0;

/// Needle angle in radians (screen space, y down) for a level.
pub fn needle_angle(level: f32) -> f32 {
    SCALE_START + needle_fraction(level) * SCALE_SWEEP
}

fn polar(center: Point, radius: f32, theta: f32) -> Point {
    Point::new(center.x + theta.cos() * radius, center.y + theta.sin() * radius)
}

/// Thin triangle from the pivot: 4 units wide at the base, pointed at `len`.
fn needle_shape(pivot: Point, len: f32, theta: f32) -> Path {
    let (sin, cos) = theta.sin_cos();
    let rotate = |x: f32, y: f32| Point::new(pivot.x + x * cos - y * sin, pivot.y + x * sin + y * cos);
    Path::polygon(&[rotate(0.0, -2.0), rotate(len, 0.0), rotate(0.0, 2.0)])
}

fn scale_label(tick: usize) -> Option<&'static str> {
    match tick {
        0 => Some("-20"),
        5 => Some("0"),
        10 => Some("+3"),
        _ => None,
    }
}

pub(super) fn draw_analog_meter(
    surface: &mut impl Surface,
    area: RectF,
    value: f32,
    label: &str,
    palette: &Palette,
) {
    if area.w <= DIAL_MARGIN * 2.0 || area.h <= DIAL_MARGIN * 2.0 {
        return;
    }

    let mut meter_w = area.w - DIAL_MARGIN * 2.0;
    let mut meter_h = meter_w / DIAL_ASPECT;
    if meter_h > area.h - DIAL_MARGIN * 2.0 {
        meter_h = area.h - DIAL_MARGIN * 2.0;
        meter_w = meter_h * DIAL_ASPECT;
    }
    let mx = area.x + (area.w - meter_w) / 2.0;
    let my = area.y + (area.h - meter_h) / 2.0;

    // ── bezel and face ──
    let bezel = Path::rounded_rect(RectF::new(mx, my, meter_w, meter_h), BEZEL_RADIUS);
    surface.fill_path(
        &bezel,
        &Paint::Linear {
            from: Point::new(mx, my),
            to: Point::new(mx, my + meter_h),
            stops: vec![
                ColorStop::new(0.0, palette.meter_bezel),
                ColorStop::new(0.5, Rgba::hex(0x666666)),
                ColorStop::new(1.0, palette.meter_bezel),
            ],
        },
    );

    let face = Path::rounded_rect(
        RectF::new(
            mx + FACE_INSET,
            my + FACE_INSET,
            meter_w - FACE_INSET * 2.0,
            meter_h - FACE_INSET * 2.0,
        ),
        8.0,
    );
    surface.fill_path(
        &face,
        &Paint::Radial {
            center: Point::new(mx + meter_w / 2.0, my + meter_h),
            inner: 10.0,
            outer: meter_w,
            stops: vec![
                ColorStop::new(0.0, palette.meter_face_inner),
                ColorStop::new(1.0, palette.meter_face_outer),
            ],
        },
    );
    surface.stroke_path(&face, &Paint::Solid(SHADOW), 2.0);

    // ── scale ──
    let pivot = Point::new(mx + meter_w / 2.0, my + meter_h * 0.85);
    let radius = meter_h * 0.75;
    let tick_font = meter_w * 0.035;

    for i in 0..=TICKS {
        let pct = i as f32 / TICKS as f32;
        let theta = SCALE_START + pct * SCALE_SWEEP;
        let major = i % 5 == 0;
        let tick_len = if major { meter_h * 0.1 } else { meter_h * 0.05 };
        let color = if pct > RED_ZONE { RED } else { palette.meter_text };

        let mut tick = Path::new();
        tick.move_to(polar(pivot, radius - tick_len, theta))
            .line_to(polar(pivot, radius, theta));
        surface.stroke_path(&tick, &Paint::Solid(color), if major { 3.0 } else { 1.5 });

        if let Some(text) = scale_label(i) {
            let at = polar(pivot, radius - tick_len - 15.0, theta);
            surface.fill_text(
                text,
                at,
                &TextStyle {
                    color,
                    size: tick_font,
                    bold: true,
                    align: TextAlign::Center,
                },
            );
        }
    }

    surface.fill_text(
        "VU",
        Point::new(pivot.x, my + meter_h * 0.35),
        &TextStyle {
            color: palette.meter_text,
            size: meter_w * 0.05,
            bold: true,
            align: TextAlign::Center,
        },
    );
    surface.fill_text(
        label,
        Point::new(pivot.x, my + meter_h * 0.5),
        &TextStyle {
            color: CAPTION_GREY,
            size: meter_w * 0.03,
            bold: false,
            align: TextAlign::Center,
        },
    );

    // ── needle ──
    let needle = needle_shape(pivot, radius * 0.95, needle_angle(value));
    surface.fill_path(
        &needle.translated(SHADOW_OFFSET, SHADOW_OFFSET),
        &Paint::Solid(SHADOW),
    );
    surface.fill_path(&needle, &Paint::Solid(palette.meter_needle));

    surface.fill_path(
        &Path::circle(pivot, meter_w * 0.03),
        &Paint::Linear {
            from: Point::new(pivot.x, pivot.y - 10.0),
            to: Point::new(pivot.x, pivot.y + 10.0),
            stops: vec![
                ColorStop::new(0.0, Rgba::hex(0x666666)),
                ColorStop::new(1.0, Rgba::hex(0x111111)),
            ],
        },
    );

    // ── glass ──
    let white = Rgba::rgb(255, 255, 255);
    surface.fill_path(
        &Path::rounded_rect(
            RectF::new(
                mx + FACE_INSET,
                my + FACE_INSET,
                meter_w - FACE_INSET * 2.0,
                meter_h * 0.5,
            ),
            6.0,
        ),
        &Paint::Linear {
            from: Point::new(mx, my),
            to: Point::new(mx, my + meter_h * 0.6),
            stops: vec![
                ColorStop::new(0.0, white.with_alpha(0.1)),
                ColorStop::new(1.0, white.with_alpha(0.0)),
            ],
        },
    );
}

// ═══════════════════════════════════════════════════════════════
// LED ladder
// ═══════════════════════════════════════════════════════════════

pub const LED_SEGMENTS: usize = 40;

const LED_PAD: f32 = 20.0;
const LED_GAP: f32 = 2.0;
const LED_GREEN: Rgba = Rgba::hex(0x00e676);
const LED_AMBER: Rgba = Rgba::hex(0xffea00);
const LED_RED: Rgba = Rgba::hex(0xff1744);

/// Colour of segment `index` at `value`. Segment `i` is lit iff
/// `value > i / 40`; lit colour depends only on the segment's position.
pub fn led_segment_color(index: usize, value: f32, palette: &Palette) -> Rgba {
    let pct = index as f32 / LED_SEGMENTS as f32;
    if value <= pct {
        palette.led_off
    } else if pct > 0.85 {
        LED_RED
    } else if pct > 0.6 {
        LED_AMBER
    } else {
        LED_GREEN
    }
}

pub(super) fn draw_led_meter(
    surface: &mut impl Surface,
    area: RectF,
    value: f32,
    label: &str,
    palette: &Palette,
) {
    let meter_w = area.w - LED_PAD * 2.0;
    let meter_h = area.h * 0.75;
    let meter_x = area.x + LED_PAD;
    let meter_y = area.y + (area.h - meter_h) / 2.0;

    surface.fill_text(
        label,
        Point::new(meter_x, meter_y - 8.0),
        &TextStyle {
            color: palette.text,
            size: 12.0,
            bold: true,
            align: TextAlign::Left,
        },
    );

    let seg_w = meter_w / LED_SEGMENTS as f32 - LED_GAP;
    if seg_w <= 0.0 {
        return;
    }
    for i in 0..LED_SEGMENTS {
        let x = meter_x + i as f32 * (seg_w + LED_GAP);
        surface.fill_rect(
            RectF::new(x, meter_y, seg_w, meter_h),
            &Paint::Solid(led_segment_color(i, value, palette)),
        );
    }
}
