//! Visual-side state types shared with the web and native frontends.
//!
//! These types intentionally avoid referencing platform-specific APIs and are
//! suitable for use on both native and web targets. Ownership follows a
//! single-writer rule: the gesture classifier is the only writer of
//! [`ControlTargets`]; the animation engine owns every *current* value and
//! only ever reads target snapshots.

use crate::constants::{
    CAMERA_LERP, DEFAULT_CAMERA_DISTANCE, DEFAULT_ROTATION_SPEED, DEFAULT_SCALE, ROTATION_LERP,
    SCALE_LERP,
};
use glam::{Mat3, Mat4, Quat, Vec3};

/// Simple right-handed camera description with perspective projection.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }

    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    /// Unit vector from the eye toward the look target.
    pub fn forward(&self) -> Vec3 {
        (self.target - self.eye).normalize_or_zero()
    }

    /// World-space orientation of the camera (camera -Z is `forward`).
    pub fn rotation(&self) -> Quat {
        let f = self.forward();
        let right = f.cross(self.up).normalize_or_zero();
        let up = right.cross(f);
        Quat::from_mat3(&Mat3::from_cols(right, up, -f))
    }
}

/// Target scalars written by the gesture classifier and read, as a `Copy`
/// snapshot, by the animation engine each frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControlTargets {
    pub scale: f32,
    pub camera_distance: f32,
    pub rotation_speed: f32,
}

impl ControlTargets {
    pub fn neutral() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            camera_distance: DEFAULT_CAMERA_DISTANCE,
            rotation_speed: DEFAULT_ROTATION_SPEED,
        }
    }
}

impl Default for ControlTargets {
    fn default() -> Self {
        Self::neutral()
    }
}

/// One exponentially smoothed scalar: `current += (target - current) * factor`.
#[derive(Clone, Copy, Debug)]
pub struct Smoothed {
    pub current: f32,
    pub factor: f32,
}

impl Smoothed {
    pub fn new(value: f32, factor: f32) -> Self {
        Self {
            current: value,
            factor,
        }
    }

    #[inline]
    pub fn step_toward(&mut self, target: f32) {
        self.current += (target - self.current) * self.factor;
    }
}

/// Current values for the three globally smoothed transform scalars.
///
/// Each field keeps its own smoothing factor so the per-frame advance stays a
/// single call regardless of which gesture last rewrote the targets.
#[derive(Clone, Copy, Debug)]
pub struct TransformState {
    pub scale: Smoothed,
    pub camera_distance: Smoothed,
    pub rotation_speed: Smoothed,
}

impl TransformState {
    pub fn new() -> Self {
        Self {
            scale: Smoothed::new(DEFAULT_SCALE, SCALE_LERP),
            camera_distance: Smoothed::new(DEFAULT_CAMERA_DISTANCE, CAMERA_LERP),
            rotation_speed: Smoothed::new(DEFAULT_ROTATION_SPEED, ROTATION_LERP),
        }
    }

    /// Advance every scalar one frame toward the supplied targets.
    pub fn step(&mut self, targets: ControlTargets) {
        self.scale.step_toward(targets.scale);
        self.camera_distance.step_toward(targets.camera_distance);
        self.rotation_speed.step_toward(targets.rotation_speed);
    }
}

impl Default for TransformState {
    fn default() -> Self {
        Self::new()
    }
}
