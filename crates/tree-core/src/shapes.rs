//! Shape target generation: one closed-form parametric formula per shape.
//!
//! `Shape::sample` is a pure function of the shape and the supplied RNG
//! draws, callable independently per particle, so a generation pass has no
//! shared mutable state and callers may parallelize it if they wish.

use crate::constants::{TREE_HEIGHT, TREE_RADIUS};
use glam::Vec3;
use rand::Rng;
use std::f32::consts::TAU;
use std::str::FromStr;
use thiserror::Error;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Shape {
    #[default]
    Cone,
    Heart,
    Star,
    Snowflake,
    Fireworks,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown shape id {0:?}")]
pub struct ShapeParseError(pub String);

impl Shape {
    pub const ALL: [Shape; 5] = [
        Shape::Cone,
        Shape::Heart,
        Shape::Star,
        Shape::Snowflake,
        Shape::Fireworks,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Shape::Cone => "CONE",
            Shape::Heart => "HEART",
            Shape::Star => "STAR",
            Shape::Snowflake => "SNOWFLAKE",
            Shape::Fireworks => "FIREWORKS",
        }
    }

    /// Draw one target position for this shape.
    pub fn sample(&self, rng: &mut impl Rng) -> Vec3 {
        match self {
            Shape::Cone => {
                let py = rng.gen::<f32>() * TREE_HEIGHT;
                let angle = rng.gen::<f32>() * TAU;
                let radius = TREE_RADIUS * (1.0 - py / TREE_HEIGHT);
                Vec3::new(
                    radius * angle.cos(),
                    py - TREE_HEIGHT / 2.0,
                    radius * angle.sin(),
                )
            }
            Shape::Heart => {
                let t = rng.gen::<f32>() * TAU;
                let x = 16.0 * t.sin().powi(3);
                let y = 13.0 * t.cos()
                    - 5.0 * (2.0 * t).cos()
                    - 2.0 * (3.0 * t).cos()
                    - (4.0 * t).cos();
                let z = (rng.gen::<f32>() - 0.5) * 5.0;
                Vec3::new(x * 0.5, y * 0.5, z)
            }
            Shape::Star => {
                // five radial lobes
                let angle = rng.gen::<f32>() * TAU;
                let radius = 10.0 * (0.5 + 0.5 * (angle * 2.5).cos().abs());
                let z = (rng.gen::<f32>() - 0.5) * 2.0;
                Vec3::new(radius * angle.cos(), radius * angle.sin(), z)
            }
            Shape::Snowflake => {
                // six lobes, flattened tips via the square root
                let angle = rng.gen::<f32>() * TAU;
                let radius = 10.0 * (0.3 + 0.7 * (angle * 3.0).sin().abs().sqrt());
                let z = (rng.gen::<f32>() - 0.5) * 3.0;
                Vec3::new(radius * angle.cos(), radius * angle.sin(), z)
            }
            Shape::Fireworks => {
                // uniform sphere direction, mass biased toward the outer shell
                let theta = rng.gen::<f32>() * TAU;
                let phi = (2.0 * rng.gen::<f32>() - 1.0).acos();
                let radius = 12.0 * rng.gen::<f32>().powf(0.3);
                Vec3::new(
                    radius * phi.sin() * theta.cos(),
                    radius * phi.sin() * theta.sin(),
                    radius * phi.cos(),
                )
            }
        }
    }
}

impl FromStr for Shape {
    type Err = ShapeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CONE" => Ok(Shape::Cone),
            "HEART" => Ok(Shape::Heart),
            "STAR" => Ok(Shape::Star),
            "SNOWFLAKE" => Ok(Shape::Snowflake),
            "FIREWORKS" => Ok(Shape::Fireworks),
            other => Err(ShapeParseError(other.to_string())),
        }
    }
}

/// Regenerate a full target buffer in place.
pub fn fill_targets(shape: Shape, targets: &mut [Vec3], rng: &mut impl Rng) {
    for t in targets.iter_mut() {
        *t = shape.sample(rng);
    }
}
