// DOM ids and web-side rendering constants.

pub const CANVAS_ID: &str = "tree-canvas";
pub const VIDEO_ID: &str = "hand-video";
pub const GESTURE_INDICATOR_ID: &str = "gesture-indicator";
pub const COLOR1_INPUT_ID: &str = "color-1";
pub const COLOR2_INPUT_ID: &str = "color-2";
pub const PHOTO_INPUT_ID: &str = "photo-input";
pub const FULLSCREEN_BUTTON_ID: &str = "fullscreen-toggle";
pub const RESET_BUTTON_ID: &str = "reset-button";

pub const MEDIAPIPE_HANDS_CDN: &str = "https://cdn.jsdelivr.net/npm/@mediapipe/hands";
pub const HAND_CAMERA_WIDTH: u32 = 640;
pub const HAND_CAMERA_HEIGHT: u32 = 480;
pub const MIN_HAND_CONFIDENCE: f64 = 0.7;
