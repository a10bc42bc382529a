//! Color-like values and their canonical representation.
//!
//! Options accept colors in several shapes:
//!
//! - a CSS/X11 color name (`"black"`, `"rebeccapurple"`)
//! - a hex code (`"#rgb"`, `"#rgba"`, `"#rrggbb"`, `"#rrggbbaa"`)
//! - a grayscale level as a string (`"0.0"` for black up to `"1.0"` for white)
//! - an array of three or four channel values in `0..=255`
//!
//! All of them are normalized once into a [`Color`], four `f32` channels in
//! `[0, 1]`. Drawing code only ever quantizes a [`Color`], it never parses.

use image::{Rgb, Rgba};
use palette::{Srgb, Srgba};
use serde_json::Value;

/// A validated color with normalized channels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color(Srgba<f32>);

impl Color {
    /// Creates a color from normalized channels.
    pub fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self(Srgba::new(red, green, blue, alpha))
    }

    /// Parses any color-like JSON value.
    ///
    /// Returns `None` if the value is not color-like.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Self::parse(s),
            Value::Array(channels) => Self::from_channels(channels),
            _ => None,
        }
    }

    /// Parses a color name, hex code or grayscale level.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_ascii_lowercase();
        if s.starts_with('#') {
            return parse_hex(&s);
        }
        if let Some(named) = palette::named::from_str(&s) {
            return Some(Self::from_srgb8(named, 255));
        }
        let level: f32 = s.parse().ok()?;
        (0.0..=1.0)
            .contains(&level)
            .then(|| Self::new(level, level, level, 1.0))
    }

    /// Builds a color from 3 or 4 numeric channels in `0..=255`.
    fn from_channels(channels: &[Value]) -> Option<Self> {
        if !(3..=4).contains(&channels.len()) {
            return None;
        }
        let mut normalized = [1.0f32; 4];
        for (slot, channel) in normalized.iter_mut().zip(channels) {
            let v = channel.as_f64()?;
            if !(0.0..=255.0).contains(&v) {
                return None;
            }
            *slot = (v / 255.0) as f32;
        }
        let [r, g, b, a] = normalized;
        Some(Self::new(r, g, b, a))
    }

    fn from_srgb8(rgb: Srgb<u8>, alpha: u8) -> Self {
        let rgb: Srgb<f32> = rgb.into_format();
        Self::new(rgb.red, rgb.green, rgb.blue, alpha as f32 / 255.0)
    }

    /// Returns the alpha channel in `[0, 1]`.
    pub fn alpha(&self) -> f32 {
        self.0.alpha
    }

    /// Quantizes to 8-bit RGBA.
    pub fn to_rgba8(&self) -> Rgba<u8> {
        let rgb: Srgb<u8> = self.0.color.into_format();
        Rgba([rgb.red, rgb.green, rgb.blue, quantize(self.0.alpha)])
    }

    /// Quantizes to 8-bit RGB, dropping alpha.
    pub fn to_rgb8(&self) -> Rgb<u8> {
        let [r, g, b, _] = self.to_rgba8().0;
        Rgb([r, g, b])
    }
}

fn quantize(channel: f32) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Parses `#rgb`, `#rgba`, `#rrggbb` and `#rrggbbaa`.
fn parse_hex(s: &str) -> Option<Color> {
    let digits = &s[1..];
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let (rgb, alpha) = match digits.len() {
        3 | 6 => (digits, None),
        4 => (&digits[..3], Some(digits[3..].repeat(2))),
        8 => (&digits[..6], Some(digits[6..].to_string())),
        _ => return None,
    };
    let rgb: Srgb<u8> = rgb.parse().ok()?;
    let alpha = match alpha {
        Some(hex) => u8::from_str_radix(&hex, 16).ok()?,
        None => 255,
    };
    Some(Color::from_srgb8(rgb, alpha))
}
