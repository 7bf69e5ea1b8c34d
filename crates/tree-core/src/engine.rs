//! The animation engine: owns every *current* value in the scene and
//! advances all of it one step per display frame.
//!
//! The engine never blocks and performs no I/O; the frontends call
//! [`TreeEngine::step`] from their frame loop, then read the resulting state
//! to fill GPU buffers. Gesture targets arrive as `Copy` snapshots taken
//! from the classifier, which keeps the two callbacks free of shared
//! mutable borrows even though they run at independent cadences.

use crate::config::VisualConfig;
use crate::constants::*;
use crate::gesture::{Gesture, GestureState};
use crate::particles::ParticleCloud;
use crate::scene::{build_decorations, build_ribbons, Decoration, PhotoWall, Ribbon, Topper};
use crate::shapes::Shape;
use crate::state::{Camera, ControlTargets, TransformState};
use glam::Vec3;
use rand::Rng;

pub struct TreeEngine {
    pub cloud: ParticleCloud,
    pub transform: TransformState,
    pub decorations: Vec<Decoration>,
    pub ribbons: Vec<Ribbon>,
    pub topper: Topper,
    pub photos: PhotoWall,
    pub camera: Camera,
    /// Yaw shared by particles and decorations.
    pub tree_yaw: f32,
    /// Ribbons spin a little faster than the tree.
    pub ribbon_yaw: f32,
}

impl TreeEngine {
    pub fn new(config: &VisualConfig, aspect: f32, rng: &mut impl Rng) -> Self {
        let mut cloud = ParticleCloud::new(rng);
        cloud.retarget(config.shape, rng);
        cloud.set_colors(config.color1, config.color2, rng);
        let mut photos = PhotoWall::new();
        photos.assign_sources(config.photo_sources.len());
        Self {
            cloud,
            transform: TransformState::new(),
            decorations: build_decorations(rng),
            ribbons: build_ribbons(rng),
            topper: Topper::new(),
            photos,
            camera: Camera {
                eye: Vec3::new(0.0, 0.0, DEFAULT_CAMERA_DISTANCE),
                target: Vec3::ZERO,
                up: Vec3::Y,
                aspect,
                fovy_radians: CAMERA_FOV_DEG.to_radians(),
                znear: CAMERA_ZNEAR,
                zfar: CAMERA_ZFAR,
            },
            tree_yaw: 0.0,
            ribbon_yaw: 0.0,
        }
    }

    /// Advance the whole scene one frame.
    ///
    /// `time_sec` is elapsed time since engine start and only drives the
    /// periodic effects; target updates are frame-rate based like the
    /// smoothing itself.
    pub fn step(&mut self, time_sec: f32, targets: ControlTargets, gesture: GestureState) {
        self.transform.step(targets);

        let rotation_speed = self.transform.rotation_speed.current;
        self.tree_yaw += rotation_speed;
        self.ribbon_yaw += rotation_speed * RIBBON_SPIN_MULTIPLIER;
        self.photos.yaw += rotation_speed * PHOTO_SPIN_MULTIPLIER;
        self.camera.eye.z = self.transform.camera_distance.current;

        self.cloud.step();

        for ribbon in self.ribbons.iter_mut() {
            ribbon.animate(time_sec);
        }
        self.topper.animate(time_sec);

        let pinching = gesture.last_gesture == Gesture::Pinch;
        self.photos
            .animate(gesture.active_photo, pinching, &self.camera);
    }

    pub fn set_shape(&mut self, shape: Shape, rng: &mut impl Rng) {
        self.cloud.retarget(shape, rng);
    }

    pub fn set_colors(&mut self, c1: [f32; 3], c2: [f32; 3], rng: &mut impl Rng) {
        self.cloud.set_colors(c1, c2, rng);
    }

    pub fn set_photo_source_count(&mut self, count: usize) {
        self.photos.assign_sources(count);
    }

    pub fn resize(&mut self, aspect: f32) {
        self.camera.aspect = aspect;
    }

    /// Live world positions of the photo planes, for pinch target selection.
    pub fn photo_world_positions(&self) -> Vec<Vec3> {
        self.photos.world_positions()
    }

    pub fn scale(&self) -> f32 {
        self.transform.scale.current
    }
}
