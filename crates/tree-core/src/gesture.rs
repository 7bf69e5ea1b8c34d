//! Hand-gesture classification from raw landmark samples.
//!
//! Each camera frame delivers at most one hand as a slice of >= 21 normalized
//! 2D points. Two scalar features are computed (thumb-to-index pinch distance
//! and mean fingertip-to-palm distance), classified against fixed thresholds,
//! and debounced so an event is emitted only when the classification changes.
//!
//! The classifier is the sole writer of [`ControlTargets`] and of its own
//! [`GestureState`]; the animation engine reads both through `Copy`
//! snapshots. That single-writer split is what lets the landmark callback
//! and the frame loop run at independent cadences without locking.

use crate::constants::{
    DEFAULT_CAMERA_DISTANCE, DEFAULT_ROTATION_SPEED, DEFAULT_SCALE, FIST_MAX_AVG, FIST_SCALE,
    OPEN_MIN_AVG, OPEN_SCALE, PINCH_CAMERA_DISTANCE, PINCH_MAX_DIST, ROTATION_SPEED_SPAN,
};
use crate::state::ControlTargets;
use glam::{Vec2, Vec3};

// MediaPipe Hands landmark indices
pub const LANDMARK_COUNT: usize = 21;
pub const PALM: usize = 0;
pub const THUMB_TIP: usize = 4;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_BASE: usize = 9;
pub const MIDDLE_TIP: usize = 12;
pub const RING_TIP: usize = 16;
pub const PINKY_TIP: usize = 20;

const FINGER_TIPS: [usize; 4] = [INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Gesture {
    #[default]
    None,
    Fist,
    Open,
    Pinch,
    Rotation,
}

impl Gesture {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gesture::None => "NONE",
            Gesture::Fist => "FIST",
            Gesture::Open => "OPEN",
            Gesture::Pinch => "PINCH",
            Gesture::Rotation => "ROTATION",
        }
    }
}

/// Debounced classification state. `active_photo` is -1 when no plane is
/// pulled toward the viewer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GestureState {
    pub last_gesture: Gesture,
    pub active_photo: i32,
}

impl Default for GestureState {
    fn default() -> Self {
        Self {
            last_gesture: Gesture::None,
            active_photo: -1,
        }
    }
}

/// The two scalar features everything is classified from, plus the hand's
/// horizontal position used by the rotation gesture.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandFeatures {
    pub pinch_dist: f32,
    pub avg_finger_dist: f32,
    pub center_x: f32,
}

/// Compute features from one landmark sample. A slice shorter than 21 points
/// is malformed input and reported as `None`, the same as no hand at all.
pub fn extract_features(landmarks: &[Vec2]) -> Option<HandFeatures> {
    if landmarks.len() < LANDMARK_COUNT {
        return None;
    }
    let pinch_dist = landmarks[THUMB_TIP].distance(landmarks[INDEX_TIP]);
    let palm = landmarks[PALM];
    let sum: f32 = FINGER_TIPS
        .iter()
        .map(|&i| landmarks[i].distance(palm))
        .sum();
    Some(HandFeatures {
        pinch_dist,
        avg_finger_dist: sum / FINGER_TIPS.len() as f32,
        center_x: landmarks[MIDDLE_BASE].x,
    })
}

/// Index of the photo plane nearest the camera; ties go to the lowest index,
/// an empty slice yields -1.
pub fn nearest_photo(world_positions: &[Vec3], camera_pos: Vec3) -> i32 {
    let mut best = -1i32;
    let mut best_dist = f32::INFINITY;
    for (i, p) in world_positions.iter().enumerate() {
        let d = p.distance(camera_pos);
        if d < best_dist {
            best_dist = d;
            best = i as i32;
        }
    }
    best
}

/// Per-frame gesture classifier and single writer of the control targets.
pub struct GestureClassifier {
    targets: ControlTargets,
    state: GestureState,
}

impl GestureClassifier {
    pub fn new() -> Self {
        Self {
            targets: ControlTargets::neutral(),
            state: GestureState::default(),
        }
    }

    /// Snapshot of the targets for the animation engine to smooth toward.
    pub fn targets(&self) -> ControlTargets {
        self.targets
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    /// Feed one landmark sample, or `None` when no hand was detected.
    ///
    /// `photo_positions` are the current world positions of the photo planes
    /// and `camera_pos` the live camera eye; both are only consulted on a
    /// pinch rising edge. Returns `Some(gesture)` exactly when the
    /// classification changed, so callers can forward it to the UI without
    /// flooding at camera frame rate.
    pub fn observe(
        &mut self,
        landmarks: Option<&[Vec2]>,
        photo_positions: &[Vec3],
        camera_pos: Vec3,
    ) -> Option<Gesture> {
        let features = match landmarks.and_then(extract_features) {
            Some(f) => f,
            None => return self.observe_no_hand(),
        };

        // Precedence: pinch wins over fist, fist over open, rotation is the rest.
        let gesture = if features.pinch_dist < PINCH_MAX_DIST {
            if self.state.last_gesture != Gesture::Pinch {
                self.state.active_photo = nearest_photo(photo_positions, camera_pos);
            }
            self.targets.camera_distance = PINCH_CAMERA_DISTANCE;
            Gesture::Pinch
        } else if features.avg_finger_dist < FIST_MAX_AVG {
            self.targets.scale = FIST_SCALE;
            self.targets.camera_distance = DEFAULT_CAMERA_DISTANCE;
            Gesture::Fist
        } else if features.avg_finger_dist > OPEN_MIN_AVG {
            self.targets.scale = OPEN_SCALE;
            self.targets.camera_distance = DEFAULT_CAMERA_DISTANCE;
            Gesture::Open
        } else {
            let x_offset = features.center_x - 0.5;
            self.targets.rotation_speed = DEFAULT_ROTATION_SPEED + x_offset * ROTATION_SPEED_SPAN;
            self.targets.scale = DEFAULT_SCALE;
            self.targets.camera_distance = DEFAULT_CAMERA_DISTANCE;
            Gesture::Rotation
        };
        self.edge(gesture)
    }

    fn observe_no_hand(&mut self) -> Option<Gesture> {
        self.targets = ControlTargets::neutral();
        self.state.active_photo = -1;
        self.edge(Gesture::None)
    }

    fn edge(&mut self, gesture: Gesture) -> Option<Gesture> {
        if self.state.last_gesture != gesture {
            self.state.last_gesture = gesture;
            Some(gesture)
        } else {
            None
        }
    }
}

impl Default for GestureClassifier {
    fn default() -> Self {
        Self::new()
    }
}
