//! Static scene geometry around the particle cloud: ornaments, ribbons, the
//! star topper and the photo wall.
//!
//! Everything here is generated once at startup on the tree's cone surface.
//! Per-element animation parameters (ribbon phase offsets, photo rest
//! poses) live as plain struct fields, drawn at random once and fixed for
//! the session.

use crate::color::rgb_from_u32;
use crate::constants::*;
use crate::state::Camera;
use glam::{Mat3, Quat, Vec3};
use rand::Rng;
use std::f32::consts::TAU;

/// Rotation placing local +Z on the ray `from -> to`, keeping world up.
fn face_toward(from: Vec3, to: Vec3) -> Quat {
    let forward = (to - from).normalize_or_zero();
    let right = Vec3::Y.cross(forward).normalize_or_zero();
    let up = forward.cross(right);
    Quat::from_mat3(&Mat3::from_cols(right, up, forward))
}

// ---------------- Decorations ----------------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecorationKind {
    Ball,
    Spire,
    Sparkle,
}

#[derive(Clone, Copy, Debug)]
pub struct Decoration {
    pub kind: DecorationKind,
    pub position: Vec3,
    pub color: [f32; 3],
    pub size: f32,
}

/// Scatter ornaments over the lower 90% of the cone, just proud of the
/// surface.
pub fn build_decorations(rng: &mut impl Rng) -> Vec<Decoration> {
    let mut out = Vec::with_capacity(DECORATION_COUNT);
    for i in 0..DECORATION_COUNT {
        let (kind, color, size) = match i % 3 {
            0 => {
                let c = BALL_COLORS[rng.gen_range(0..BALL_COLORS.len())];
                (DecorationKind::Ball, rgb_from_u32(c), 0.6)
            }
            1 => (DecorationKind::Spire, rgb_from_u32(0xE0E0E0), 0.5),
            _ => (DecorationKind::Sparkle, [1.0, 1.0, 1.0], 1.0),
        };
        let py = rng.gen::<f32>() * (TREE_HEIGHT * 0.9);
        let angle = rng.gen::<f32>() * TAU;
        let radius = TREE_RADIUS * (1.0 - py / TREE_HEIGHT) + DECORATION_RADIUS_PAD;
        out.push(Decoration {
            kind,
            position: Vec3::new(
                angle.cos() * radius,
                py - TREE_HEIGHT / 2.0,
                angle.sin() * radius,
            ),
            color,
            size,
        });
    }
    out
}

// ---------------- Ribbons ----------------

/// One helix of glow points wound around the cone. `phase_offset` and
/// `float_speed` are drawn once so each ribbon oscillates independently.
#[derive(Clone, Debug)]
pub struct Ribbon {
    pub points: Vec<Vec3>,
    pub phase_offset: f32,
    pub float_speed: f32,
    // animated per frame
    pub y_offset: f32,
    pub breathe: f32,
    pub emissive: f32,
}

impl Ribbon {
    pub fn animate(&mut self, time: f32) {
        self.y_offset = (time * self.float_speed + self.phase_offset).sin() * RIBBON_FLOAT_AMPLITUDE;
        self.breathe = 1.0 + (time * 0.8 + self.phase_offset).sin() * RIBBON_BREATHE_AMPLITUDE;
        self.emissive =
            RIBBON_EMISSIVE_BASE + (time * 2.0 + self.phase_offset).sin() * RIBBON_EMISSIVE_AMPLITUDE;
    }
}

pub fn build_ribbons(rng: &mut impl Rng) -> Vec<Ribbon> {
    let mut out = Vec::with_capacity(RIBBON_COUNT);
    for r in 0..RIBBON_COUNT {
        let turns = 3.0 + rng.gen::<f32>() * 2.0;
        let total = (turns * RIBBON_POINTS_PER_TURN as f32) as usize;
        let start_angle = r as f32 * (TAU / RIBBON_COUNT as f32);
        let mut points = Vec::with_capacity(total + 1);
        for i in 0..=total {
            let t = i as f32 / total as f32;
            let py = t * TREE_HEIGHT;
            let angle = t * TAU * turns + start_angle;
            let base_radius = TREE_RADIUS * (1.0 - py / TREE_HEIGHT) + RIBBON_RADIUS_PAD;
            let noise = (t * 10.0).sin() * 0.2;
            points.push(Vec3::new(
                angle.cos() * (base_radius + noise),
                py - TREE_HEIGHT / 2.0,
                angle.sin() * (base_radius + noise),
            ));
        }
        out.push(Ribbon {
            points,
            phase_offset: rng.gen::<f32>() * TAU,
            float_speed: 0.5 + rng.gen::<f32>() * 0.5,
            y_offset: 0.0,
            breathe: 1.0,
            emissive: RIBBON_EMISSIVE_BASE,
        });
    }
    out
}

// ---------------- Star topper ----------------

#[derive(Clone, Copy, Debug)]
pub struct Topper {
    pub angle: f32,
    pub glow: f32,
}

impl Topper {
    pub fn new() -> Self {
        Self {
            angle: 0.0,
            glow: TOPPER_GLOW_BASE,
        }
    }

    pub fn animate(&mut self, time: f32) {
        self.angle += TOPPER_SPIN_PER_FRAME;
        self.glow = TOPPER_GLOW_BASE + (time * 3.0).sin() * TOPPER_GLOW_AMPLITUDE;
    }

    /// The topper rides the tip of the tree and tracks the global scale.
    pub fn position(&self, scale: f32) -> Vec3 {
        Vec3::new(0.0, TOPPER_HEIGHT * scale, 0.0)
    }
}

impl Default for Topper {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------- Photo wall ----------------

/// One image-bearing plane, posed in the wall's local space. The rest pose is
/// fixed at startup; position/rotation/scale are the animated values.
#[derive(Clone, Debug)]
pub struct PhotoPlane {
    pub rest_position: Vec3,
    pub rest_rotation: Quat,
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: f32,
    /// Which entry of the photo source list this plane shows, if any.
    pub source_index: Option<usize>,
}

/// The ring of photo planes, counter-rotating around the tree as one group.
#[derive(Clone, Debug)]
pub struct PhotoWall {
    pub planes: Vec<PhotoPlane>,
    pub yaw: f32,
}

impl PhotoWall {
    /// Ring the planes around the middle of the cone, each facing the axis.
    pub fn new() -> Self {
        let mut planes = Vec::with_capacity(PHOTO_COUNT);
        for i in 0..PHOTO_COUNT {
            let t = i as f32 / PHOTO_COUNT as f32;
            let py = t * (TREE_HEIGHT * 0.7) + 2.0;
            let angle = t * TAU;
            let radius = TREE_RADIUS * (1.0 - py / TREE_HEIGHT) + 0.8;
            let position = Vec3::new(
                angle.cos() * radius,
                py - TREE_HEIGHT / 2.0,
                angle.sin() * radius,
            );
            let rest_rotation = face_toward(position, Vec3::new(0.0, position.y, 0.0));
            planes.push(PhotoPlane {
                rest_position: position,
                rest_rotation,
                position,
                rotation: rest_rotation,
                scale: 1.0,
                source_index: None,
            });
        }
        Self { planes, yaw: 0.0 }
    }

    /// Cycle the source list over the planes (`plane % sources`). An empty
    /// list leaves the existing assignment alone.
    pub fn assign_sources(&mut self, source_count: usize) {
        if source_count == 0 {
            return;
        }
        for (i, plane) in self.planes.iter_mut().enumerate() {
            plane.source_index = Some(i % source_count);
        }
    }

    /// Current world position of every plane, in plane order.
    pub fn world_positions(&self) -> Vec<Vec3> {
        let rot = Quat::from_rotation_y(self.yaw);
        self.planes.iter().map(|p| rot * p.position).collect()
    }

    /// Pull the active plane toward a viewer-facing pose while the pinch
    /// holds; everything else relaxes back to its rest pose. Engagement is
    /// deliberately snappier than release.
    pub fn animate(&mut self, active_photo: i32, pinching: bool, camera: &Camera) {
        let inv = Quat::from_rotation_y(-self.yaw);
        let target_world = camera.eye + camera.forward() * ACTIVE_PHOTO_DISTANCE;
        let target_local_pos = inv * target_world;
        let target_local_rot = inv * camera.rotation();

        for (idx, plane) in self.planes.iter_mut().enumerate() {
            let is_active = pinching && active_photo == idx as i32;
            if is_active {
                plane.position = plane.position.lerp(target_local_pos, ACTIVE_PHOTO_LERP);
                plane.rotation = plane.rotation.slerp(target_local_rot, ACTIVE_PHOTO_LERP);
                plane.scale += (ACTIVE_PHOTO_SCALE - plane.scale) * ACTIVE_PHOTO_LERP;
            } else {
                plane.position = plane.position.lerp(plane.rest_position, RESTING_POSE_LERP);
                plane.rotation = plane.rotation.slerp(plane.rest_rotation, RESTING_POSE_LERP);
                plane.scale += (1.0 - plane.scale) * RESTING_SCALE_LERP;
            }
        }
    }
}

impl Default for PhotoWall {
    fn default() -> Self {
        Self::new()
    }
}
