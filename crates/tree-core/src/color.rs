//! Small RGB helpers shared by the config layer and the scene builders.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("color must be a #RRGGBB hex string, got {0:?}")]
    Format(String),
}

/// Parse a `#RRGGBB` hex string into linear-ish [0, 1] RGB components.
pub fn parse_hex_rgb(s: &str) -> Result<[f32; 3], ColorParseError> {
    let hex = s.strip_prefix('#').unwrap_or(s);
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ColorParseError::Format(s.to_string()));
    }
    let value =
        u32::from_str_radix(hex, 16).map_err(|_| ColorParseError::Format(s.to_string()))?;
    Ok(rgb_from_u32(value))
}

#[inline]
pub fn rgb_from_u32(c: u32) -> [f32; 3] {
    [
        ((c >> 16) & 0xFF) as f32 / 255.0,
        ((c >> 8) & 0xFF) as f32 / 255.0,
        (c & 0xFF) as f32 / 255.0,
    ]
}

/// Component-wise blend of two colors, `t` in [0, 1].
#[inline]
pub fn lerp_rgb(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
    ]
}
