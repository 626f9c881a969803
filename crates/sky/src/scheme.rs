use gardencity_common::Color;
use gardencity_seed::PrngStream;
use serde::{Deserialize, Serialize};

/// Hue in degrees (not wrapped), saturation and lightness in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl Hsl {
    pub fn to_rgb(&self) -> [u8; 3] {
        hsl_to_rgb(self.h / 360.0, self.s / 100.0, self.l / 100.0)
    }

    pub fn to_color(&self) -> Color {
        let [r, g, b] = self.to_rgb();
        Color::from_bytes(r, g, b)
    }
}

fn hue_to_channel(p: f64, q: f64, mut t: f64) -> f64 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

/// HSL (all in `[0, 1]`, hue wrapped) to 8-bit RGB, truncating each channel.
pub fn hsl_to_rgb(h: f64, s: f64, l: f64) -> [u8; 3] {
    let h = h.rem_euclid(1.0);
    let (r, g, b) = if s == 0.0 {
        (l, l, l)
    } else {
        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        (
            hue_to_channel(p, q, h + 1.0 / 3.0),
            hue_to_channel(p, q, h),
            hue_to_channel(p, q, h - 1.0 / 3.0),
        )
    };
    // `as u8` truncates and saturates, matching integer truncation of [0, 255].
    [(r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8]
}

/// Inputs of the colour scheme.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SchemeParams {
    pub saturation: f64,
    pub lightness: f64,
    /// Colour 1 hue offset starts here and spans twice this again.
    pub color1_range: f64,
}

impl Default for SchemeParams {
    fn default() -> Self {
        Self {
            saturation: 60.0,
            lightness: 50.0,
            color1_range: -15.0,
        }
    }
}

/// A base hue and two derived accents.
///
/// Colour 1 sits a little off the base hue and tips the grass; colour 2 is
/// anywhere within 120° of it, a bit more saturated and lighter, and is the
/// grass base colour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorScheme {
    pub base: Hsl,
    pub color1: Hsl,
    pub color2: Hsl,
}

impl ColorScheme {
    pub fn generate(stream: &mut PrngStream) -> Self {
        Self::generate_with(SchemeParams::default(), stream)
    }

    /// Consumes three draws: base hue, colour 1 offset, colour 2 offset.
    pub fn generate_with(params: SchemeParams, stream: &mut PrngStream) -> Self {
        let base = Hsl {
            h: stream.next_f64() * 360.0,
            s: params.saturation,
            l: params.lightness,
        };
        let color1 = Hsl {
            h: base.h + (params.color1_range + stream.next_f64() * 2.0 * params.color1_range),
            s: base.s,
            l: params.lightness,
        };
        let color2 = Hsl {
            h: base.h + (-120.0 + stream.next_f64() * 240.0),
            s: base.s - params.color1_range,
            l: base.l - params.color1_range,
        };
        let scheme = Self {
            base,
            color1,
            color2,
        };
        tracing::debug!(
            base = %scheme.base_color().to_hex_string(),
            color1 = %scheme.color1_color().to_hex_string(),
            color2 = %scheme.color2_color().to_hex_string(),
            "colour scheme generated"
        );
        scheme
    }

    pub fn base_color(&self) -> Color {
        self.base.to_color()
    }

    pub fn color1_color(&self) -> Color {
        self.color1.to_color()
    }

    pub fn color2_color(&self) -> Color {
        self.color2.to_color()
    }

    /// `#rrggbb` of base, colour 1 and colour 2.
    pub fn hex(&self) -> [String; 3] {
        [
            self.base_color().to_hex_string(),
            self.color1_color().to_hex_string(),
            self.color2_color().to_hex_string(),
        ]
    }
}
