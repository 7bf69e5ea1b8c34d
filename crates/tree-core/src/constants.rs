// Shared visual/gesture tuning constants used by both web and native frontends.

// Particle cloud
pub const PARTICLE_COUNT: usize = 15_000;
pub const PARTICLE_LERP: f32 = 0.06; // fraction of remaining distance closed per frame
pub const SPAWN_SPREAD: f32 = 50.0; // initial random cube side length
pub const PARTICLE_SIZE_MAX: f32 = 2.0;

// Tree silhouette (cone the decorations, ribbons and photos hang on)
pub const TREE_HEIGHT: f32 = 20.0;
pub const TREE_RADIUS: f32 = 8.0;

// Transform smoothing factors, per frame. Scale reacts fastest, rotation
// speed slowest, to keep the spin free of visible jitter.
pub const SCALE_LERP: f32 = 0.1;
pub const CAMERA_LERP: f32 = 0.08;
pub const ROTATION_LERP: f32 = 0.05;

// Neutral transform targets restored when no hand is in view
pub const DEFAULT_SCALE: f32 = 1.0;
pub const DEFAULT_CAMERA_DISTANCE: f32 = 25.0;
pub const DEFAULT_ROTATION_SPEED: f32 = 0.002;

// Gesture thresholds in normalized landmark space
pub const PINCH_MAX_DIST: f32 = 0.04;
pub const FIST_MAX_AVG: f32 = 0.12;
pub const OPEN_MIN_AVG: f32 = 0.4;

// Gesture-driven targets
pub const FIST_SCALE: f32 = 0.4;
pub const OPEN_SCALE: f32 = 1.8;
pub const PINCH_CAMERA_DISTANCE: f32 = 16.0;
pub const ROTATION_SPEED_SPAN: f32 = 0.15; // full-frame horizontal sweep

// Decorations
pub const DECORATION_COUNT: usize = 50;
pub const DECORATION_RADIUS_PAD: f32 = 0.2;
pub const BALL_COLORS: [u32; 5] = [0x00BFFF, 0x0000FF, 0xFF00FF, 0x8800FF, 0xE0E0E0];

// Ribbons
pub const RIBBON_COUNT: usize = 4;
pub const RIBBON_POINTS_PER_TURN: usize = 40;
pub const RIBBON_RADIUS_PAD: f32 = 0.3;
pub const RIBBON_SPIN_MULTIPLIER: f32 = 1.5;
pub const RIBBON_FLOAT_AMPLITUDE: f32 = 0.3;
pub const RIBBON_BREATHE_AMPLITUDE: f32 = 0.05;
pub const RIBBON_EMISSIVE_BASE: f32 = 12.0;
pub const RIBBON_EMISSIVE_AMPLITUDE: f32 = 3.0;

// Star topper
pub const TOPPER_HEIGHT: f32 = 10.5;
pub const TOPPER_SPIN_PER_FRAME: f32 = 0.02;
pub const TOPPER_GLOW_BASE: f32 = 2.0;
pub const TOPPER_GLOW_AMPLITUDE: f32 = 0.5;

// Photo wall
pub const PHOTO_COUNT: usize = 8;
pub const PHOTO_SIZE: f32 = 3.5;
pub const PHOTO_SPIN_MULTIPLIER: f32 = -1.0; // counter-rotates against the tree
pub const ACTIVE_PHOTO_DISTANCE: f32 = 10.0; // units in front of the camera
pub const ACTIVE_PHOTO_SCALE: f32 = 3.5;
pub const ACTIVE_PHOTO_LERP: f32 = 0.15;
pub const RESTING_POSE_LERP: f32 = 0.1;
pub const RESTING_SCALE_LERP: f32 = 0.15;

// Camera
pub const CAMERA_FOV_DEG: f32 = 75.0;
pub const CAMERA_ZNEAR: f32 = 0.1;
pub const CAMERA_ZFAR: f32 = 1000.0;

// Default particle palette (silver into blue-purple)
pub const DEFAULT_COLOR_1: &str = "#C0C0C0";
pub const DEFAULT_COLOR_2: &str = "#6A0DAD";
