use palette::rgb::Rgb as PaletteRgb;
use palette::stimulus::FromStimulus;
use palette::{FromColor, Hsl, LightenAssign, Lch, Srgb};

use crate::engine::tile::Value;

/// Tiles above this value are drawn black instead of taking a hue.
const MAX_HUED_VALUE: Value = 11;

/// Hue step between consecutive tile values, in degrees.
const HUE_STEP: f32 = 36.0;

/// Lch lightness above which a tile gets dark text.
const LIGHT_BACKGROUND: f32 = 60.0;

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Rgb {
    color: PaletteRgb,
}

impl Rgb {
    pub(crate) fn new(r: u8, g: u8, b: u8) -> Self {
        Self {
            color: PaletteRgb::new(
                f32::from_stimulus(r),
                f32::from_stimulus(g),
                f32::from_stimulus(b),
            ),
        }
    }

    #[inline(always)]
    pub(crate) fn r(&self) -> u8 {
        u8::from_stimulus(self.color.red)
    }

    #[inline(always)]
    pub(crate) fn g(&self) -> u8 {
        u8::from_stimulus(self.color.green)
    }

    #[inline(always)]
    pub(crate) fn b(&self) -> u8 {
        u8::from_stimulus(self.color.blue)
    }

    pub(crate) fn set_lightness(&self, lightness: f32) -> Rgb {
        let lightness = if lightness > 1.0 { 1.0 } else { lightness };

        let mut new_color = self.clone();
        new_color.color.lighten_assign(lightness);
        new_color
    }
}

impl From<Srgb> for Rgb {
    fn from(color: Srgb) -> Rgb {
        Self { color }
    }
}

impl From<Rgb> for crossterm::style::Color {
    fn from(f: Rgb) -> crossterm::style::Color {
        crossterm::style::Color::Rgb {
            r: f.r(),
            g: f.g(),
            b: f.b(),
        }
    }
}

/// Background and foreground colors of a tile with the given value. Each value gets its own
/// fully saturated hue; the text is black or white, whichever reads better.
pub(crate) fn tile_colors(value: Value) -> (Rgb, Rgb) {
    let background: Srgb = if value > MAX_HUED_VALUE {
        Srgb::new(0.0, 0.0, 0.0)
    } else {
        let hsl: Hsl = Hsl::new(value as f32 * HUE_STEP, 1.0, 0.5);
        Srgb::from_color(hsl)
    };
    let lch: Lch = Lch::from_color(background);
    let foreground = if lch.l > LIGHT_BACKGROUND {
        Rgb::new(0, 0, 0)
    } else {
        Rgb::new(255, 255, 255)
    };
    (background.into(), foreground)
}
