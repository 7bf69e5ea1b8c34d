//! Canonical control-surface state: selected shape, palette and photo list.
//!
//! The page shell owns the widgets; this struct owns the values they edit,
//! plus the reset semantics.

use crate::color::{parse_hex_rgb, ColorParseError};
use crate::constants::{DEFAULT_COLOR_1, DEFAULT_COLOR_2};
use crate::shapes::Shape;

/// Placeholder photo sources shown until the user uploads their own.
pub const DEFAULT_PHOTO_SOURCES: [&str; 5] = [
    "input_file_0.png",
    "input_file_1.png",
    "input_file_2.png",
    "input_file_3.png",
    "input_file_4.png",
];

#[derive(Clone, Debug, PartialEq)]
pub struct VisualConfig {
    pub shape: Shape,
    pub color1: [f32; 3],
    pub color2: [f32; 3],
    pub photo_sources: Vec<String>,
}

impl VisualConfig {
    /// Restore shape, palette and photo list to their defaults.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn set_color1(&mut self, hex: &str) -> Result<(), ColorParseError> {
        self.color1 = parse_hex_rgb(hex)?;
        Ok(())
    }

    pub fn set_color2(&mut self, hex: &str) -> Result<(), ColorParseError> {
        self.color2 = parse_hex_rgb(hex)?;
        Ok(())
    }

    pub fn set_photo_sources(&mut self, sources: Vec<String>) {
        self.photo_sources = sources;
    }

    /// Source shown by a given plane, cycling when the list is shorter than
    /// the plane count. `None` when the list is empty.
    pub fn photo_source_for(&self, plane: usize) -> Option<&str> {
        if self.photo_sources.is_empty() {
            return None;
        }
        Some(&self.photo_sources[plane % self.photo_sources.len()])
    }
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            shape: Shape::Cone,
            color1: parse_hex_rgb(DEFAULT_COLOR_1).unwrap_or([1.0, 1.0, 1.0]),
            color2: parse_hex_rgb(DEFAULT_COLOR_2).unwrap_or([0.0, 0.0, 0.0]),
            photo_sources: DEFAULT_PHOTO_SOURCES.iter().map(|s| s.to_string()).collect(),
        }
    }
}
