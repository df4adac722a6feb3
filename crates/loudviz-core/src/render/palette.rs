use crate::config::ThemeName;

use super::Rgba;

/// Colours for one theme. The spectrum and the meters only read from here.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    pub background: Rgba,
    pub panel: Rgba,
    pub text: Rgba,
    pub accent: Rgba,
    pub border: Rgba,

    pub grid: Rgba,
    pub bar_top: Rgba,
    pub bar_mid: Rgba,
    pub bar_bottom: Rgba,
    pub peak: Rgba,

    pub meter_face_inner: Rgba,
    pub meter_face_outer: Rgba,
    pub meter_bezel: Rgba,
    pub meter_text: Rgba,
    pub meter_needle: Rgba,
    pub led_off: Rgba,
}

pub const DARK: Palette = Palette {
    background: Rgba::hex(0x111111),
    panel: Rgba::hex(0x1a1a1a),
    text: Rgba::hex(0xeeeeee),
    accent: Rgba::hex(0x333333),
    border: Rgba::hex(0x444444),
    grid: Rgba::hex(0x333333),
    bar_top: Rgba::hex(0xff3333),
    bar_mid: Rgba::hex(0xffff00),
    bar_bottom: Rgba::hex(0x00ff00),
    peak: Rgba::hex(0xffffff),
    meter_face_inner: Rgba::hex(0x2a2a2a),
    meter_face_outer: Rgba::hex(0x111111),
    meter_bezel: Rgba::hex(0x444444),
    meter_text: Rgba::hex(0xdddddd),
    meter_needle: Rgba::hex(0xff3333),
    led_off: Rgba::hex(0x222222),
};

pub const LIGHT: Palette = Palette {
    background: Rgba::hex(0xf4f4f4),
    panel: Rgba::hex(0xffffff),
    text: Rgba::hex(0x333333),
    accent: Rgba::hex(0xdddddd),
    border: Rgba::hex(0xcccccc),
    grid: Rgba::hex(0xe0e0e0),
    bar_top: Rgba::hex(0xd32f2f),
    bar_mid: Rgba::hex(0xfbc02d),
    bar_bottom: Rgba::hex(0x388e3c),
    peak: Rgba::hex(0x000000),
    meter_face_inner: Rgba::hex(0xfffbf0),
    meter_face_outer: Rgba::hex(0xf0e6d2),
    meter_bezel: Rgba::hex(0xaaaaaa),
    meter_text: Rgba::hex(0x333333),
    meter_needle: Rgba::hex(0xcc0000),
    led_off: Rgba::hex(0xe0e0e0),
};

pub const BLUE: Palette = Palette {
    background: Rgba::hex(0x001e3c),
    panel: Rgba::hex(0x051e30),
    text: Rgba::hex(0x90caf9),
    accent: Rgba::hex(0x1e4976),
    border: Rgba::hex(0x1769aa),
    grid: Rgba::hex(0x132f4c),
    bar_top: Rgba::hex(0x00e5ff),
    bar_mid: Rgba::hex(0x2979ff),
    bar_bottom: Rgba::hex(0x1565c0),
    peak: Rgba::hex(0x00e5ff),
    meter_face_inner: Rgba::hex(0x052030),
    meter_face_outer: Rgba::hex(0x021019),
    meter_bezel: Rgba::hex(0x0d47a1),
    meter_text: Rgba::hex(0x00e5ff),
    meter_needle: Rgba::hex(0x00e5ff),
    led_off: Rgba::hex(0x062233),
};

pub const GREEN: Palette = Palette {
    background: Rgba::hex(0x001000),
    panel: Rgba::hex(0x0c260c),
    text: Rgba::hex(0x00ff00),
    accent: Rgba::hex(0x0a330a),
    border: Rgba::hex(0x1b5e20),
    grid: Rgba::hex(0x0f330f),
    bar_top: Rgba::hex(0xccff90),
    bar_mid: Rgba::hex(0x69f0ae),
    bar_bottom: Rgba::hex(0x00c853),
    peak: Rgba::hex(0x00ff00),
    meter_face_inner: Rgba::hex(0x0c260c),
    meter_face_outer: Rgba::hex(0x000000),
    meter_bezel: Rgba::hex(0x33691e),
    meter_text: Rgba::hex(0x66bb6a),
    meter_needle: Rgba::hex(0x00ff00),
    led_off: Rgba::hex(0x122b12),
};

impl Palette {
    pub fn for_theme(theme: ThemeName) -> &'static Palette {
        match theme {
            ThemeName::Dark => &DARK,
            ThemeName::Light => &LIGHT,
            ThemeName::Blue => &BLUE,
            ThemeName::Green => &GREEN,
        }
    }
}
