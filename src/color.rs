use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// An sRGB color, emitted as the packed `0xRRGGBB` integer three.js expects.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Self = Self::rgb8(0, 0, 0);
    pub const WHITE: Self = Self::rgb8(255, 255, 255);

    pub const fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build from normalized `0..1` components; out-of-range values are clamped.
    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        fn to_u8(x: f64) -> u8 {
            if x.is_nan() {
                return 0;
            }
            (x.clamp(0.0, 1.0) * 255.0).round() as u8
        }
        Self::rgb8(to_u8(r), to_u8(g), to_u8(b))
    }

    pub const fn from_packed(v: u32) -> Self {
        Self::rgb8((v >> 16) as u8, (v >> 8) as u8, v as u8)
    }

    pub const fn packed(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_hex(s)
    }
}

impl Serialize for Color {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u32(self.packed())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Packed(u32),
            Hex(String),
            RgbObj { r: f64, g: f64, b: f64 },
            Arr(Vec<f64>),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Packed(v) if v <= 0xFF_FFFF => Ok(Self::from_packed(v)),
            Repr::Packed(v) => Err(serde::de::Error::custom(format!(
                "packed color {v:#x} exceeds 0xFFFFFF"
            ))),
            Repr::Hex(s) => parse_hex(&s).map_err(serde::de::Error::custom),
            Repr::RgbObj { r, g, b } => Ok(Self::rgb(r, g, b)),
            Repr::Arr(v) => {
                if v.len() == 3 || v.len() == 4 {
                    Ok(Self::rgb(v[0], v[1], v[2]))
                } else {
                    Err(serde::de::Error::custom(
                        "rgb array must have len 3 ([r,g,b]) or 4 ([r,g,b,a])",
                    ))
                }
            }
        }
    }
}

/// Parse `#RRGGBB` or `#RRGGBBAA`; the `#` is optional and alpha is discarded.
fn parse_hex(s: &str) -> Result<Color, String> {
    let s = s.trim();
    let s = s.strip_prefix('#').unwrap_or(s);

    fn hex_byte(pair: &str) -> Result<u8, String> {
        u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex byte \"{pair}\""))
    }

    if !s.is_ascii() || (s.len() != 6 && s.len() != 8) {
        return Err("hex color must be #RRGGBB or #RRGGBBAA (case-insensitive)".to_owned());
    }

    let color = Color::rgb8(
        hex_byte(&s[0..2])?,
        hex_byte(&s[2..4])?,
        hex_byte(&s[4..6])?,
    );
    if s.len() == 8 {
        hex_byte(&s[6..8])?;
    }
    Ok(color)
}
