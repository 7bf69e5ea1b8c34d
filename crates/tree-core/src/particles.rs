//! The morphing particle cloud.
//!
//! Current and target buffers stay index-aligned at a fixed length for the
//! whole session. Swapping the shape rewrites targets only; the per-frame
//! smoothing migrates current positions toward them, so a morph never jumps.
//! The constant-rate lerp converges asymptotically and never exactly lands on
//! the target, which is intentional.

use crate::color::lerp_rgb;
use crate::constants::{PARTICLE_COUNT, PARTICLE_LERP, PARTICLE_SIZE_MAX, SPAWN_SPREAD};
use crate::shapes::{fill_targets, Shape};
use glam::Vec3;
use rand::Rng;

pub struct ParticleCloud {
    current: Vec<Vec3>,
    target: Vec<Vec3>,
    colors: Vec<[f32; 3]>,
    sizes: Vec<f32>,
}

impl ParticleCloud {
    /// Scatter the cloud through a spawn cube; targets start at the spawn
    /// positions so a freshly built cloud is at rest until retargeted.
    pub fn new(rng: &mut impl Rng) -> Self {
        let mut current = Vec::with_capacity(PARTICLE_COUNT);
        let mut sizes = Vec::with_capacity(PARTICLE_COUNT);
        for _ in 0..PARTICLE_COUNT {
            current.push(Vec3::new(
                (rng.gen::<f32>() - 0.5) * SPAWN_SPREAD,
                (rng.gen::<f32>() - 0.5) * SPAWN_SPREAD,
                (rng.gen::<f32>() - 0.5) * SPAWN_SPREAD,
            ));
            sizes.push(rng.gen::<f32>() * PARTICLE_SIZE_MAX);
        }
        Self {
            target: current.clone(),
            colors: vec![[0.0; 3]; PARTICLE_COUNT],
            sizes,
            current,
        }
    }

    pub fn len(&self) -> usize {
        self.current.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.current
    }

    pub fn targets(&self) -> &[Vec3] {
        &self.target
    }

    pub fn colors(&self) -> &[[f32; 3]] {
        &self.colors
    }

    pub fn sizes(&self) -> &[f32] {
        &self.sizes
    }

    /// Regenerate the target buffer for a new shape. Colors and current
    /// positions are left untouched.
    pub fn retarget(&mut self, shape: Shape, rng: &mut impl Rng) {
        fill_targets(shape, &mut self.target, rng);
    }

    /// Reassign every particle a random blend of the two palette colors.
    /// Independent of the selected shape.
    pub fn set_colors(&mut self, c1: [f32; 3], c2: [f32; 3], rng: &mut impl Rng) {
        for c in self.colors.iter_mut() {
            *c = lerp_rgb(c1, c2, rng.gen::<f32>());
        }
    }

    /// One smoothing step: close a fixed fraction of the remaining distance.
    pub fn step(&mut self) {
        for (p, t) in self.current.iter_mut().zip(self.target.iter()) {
            *p += (*t - *p) * PARTICLE_LERP;
        }
    }
}
