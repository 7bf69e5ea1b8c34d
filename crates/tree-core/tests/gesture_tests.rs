// Host-side tests for the gesture classifier.

use glam::{Vec2, Vec3};
use tree_core::{
    extract_features, nearest_photo, ControlTargets, Gesture, GestureClassifier, LANDMARK_COUNT,
    INDEX_TIP, MIDDLE_BASE, MIDDLE_TIP, PALM, PINKY_TIP, RING_TIP, THUMB_TIP,
};

/// Build a 21-point sample with controlled pinch distance, fingertip spread
/// and horizontal hand position.
fn make_landmarks(pinch_dist: f32, avg_finger_dist: f32, center_x: f32) -> Vec<Vec2> {
    let palm = Vec2::new(0.5, 0.5);
    let mut lm = vec![palm; LANDMARK_COUNT];
    for &tip in &[INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP] {
        lm[tip] = palm + Vec2::new(0.0, -avg_finger_dist);
    }
    lm[THUMB_TIP] = lm[INDEX_TIP] + Vec2::new(pinch_dist, 0.0);
    lm[MIDDLE_BASE] = Vec2::new(center_x, 0.5);
    lm[PALM] = palm;
    lm
}

const CAM: Vec3 = Vec3::new(0.0, 0.0, 25.0);

fn photo_ring() -> Vec<Vec3> {
    vec![
        Vec3::new(0.0, 0.0, 8.0),
        Vec3::new(8.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -8.0),
        Vec3::new(-8.0, 0.0, 0.0),
    ]
}

#[test]
fn features_come_from_the_designated_landmarks() {
    let lm = make_landmarks(0.03, 0.2, 0.7);
    let f = extract_features(&lm).expect("valid sample");
    assert!((f.pinch_dist - 0.03).abs() < 1e-6);
    assert!((f.avg_finger_dist - 0.2).abs() < 1e-6);
    assert!((f.center_x - 0.7).abs() < 1e-6);
}

#[test]
fn short_sample_is_treated_as_no_hand() {
    let lm = vec![Vec2::new(0.5, 0.5); 10];
    assert!(extract_features(&lm).is_none());

    let mut classifier = GestureClassifier::new();
    // establish a non-NONE state first
    assert_eq!(
        classifier.observe(Some(&make_landmarks(0.2, 0.2, 0.5)), &photo_ring(), CAM),
        Some(Gesture::Rotation)
    );
    assert_eq!(
        classifier.observe(Some(&lm), &photo_ring(), CAM),
        Some(Gesture::None)
    );
    assert_eq!(classifier.targets(), ControlTargets::neutral());
}

#[test]
fn steady_gesture_emits_exactly_one_event() {
    let mut classifier = GestureClassifier::new();
    let lm = make_landmarks(0.2, 0.5, 0.5); // OPEN band
    assert_eq!(
        classifier.observe(Some(&lm), &photo_ring(), CAM),
        Some(Gesture::Open)
    );
    for _ in 0..30 {
        assert_eq!(classifier.observe(Some(&lm), &photo_ring(), CAM), None);
    }
    assert_eq!(classifier.state().last_gesture, Gesture::Open);
}

#[test]
fn pinch_takes_precedence_over_fist() {
    let mut classifier = GestureClassifier::new();
    // pinch_dist < 0.04 AND avg_finger_dist < 0.12 simultaneously
    let lm = make_landmarks(0.01, 0.05, 0.5);
    assert_eq!(
        classifier.observe(Some(&lm), &photo_ring(), CAM),
        Some(Gesture::Pinch)
    );
    assert!((classifier.targets().camera_distance - 16.0).abs() < 1e-6);
}

#[test]
fn fist_and_open_write_their_scale_targets() {
    let mut classifier = GestureClassifier::new();
    classifier.observe(Some(&make_landmarks(0.2, 0.05, 0.5)), &photo_ring(), CAM);
    assert!((classifier.targets().scale - 0.4).abs() < 1e-6);
    assert!((classifier.targets().camera_distance - 25.0).abs() < 1e-6);

    classifier.observe(Some(&make_landmarks(0.2, 0.5, 0.5)), &photo_ring(), CAM);
    assert!((classifier.targets().scale - 1.8).abs() < 1e-6);
}

#[test]
fn rotation_speed_follows_horizontal_hand_position() {
    let mut classifier = GestureClassifier::new();
    classifier.observe(Some(&make_landmarks(0.2, 0.2, 0.8)), &photo_ring(), CAM);
    let t = classifier.targets();
    assert!((t.rotation_speed - (0.002 + 0.3 * 0.15)).abs() < 1e-5);
    assert!((t.scale - 1.0).abs() < 1e-6);
    assert!((t.camera_distance - 25.0).abs() < 1e-6);

    // hand left of center spins the other way
    classifier.observe(Some(&make_landmarks(0.2, 0.2, 0.2)), &photo_ring(), CAM);
    assert!(classifier.targets().rotation_speed < 0.0);
}

#[test]
fn nearest_photo_prefers_lowest_index_on_ties() {
    let positions = vec![
        Vec3::new(0.0, 3.0, 10.0),
        Vec3::new(0.0, -3.0, 10.0), // same distance as index 0
        Vec3::new(0.0, 0.0, -10.0),
    ];
    assert_eq!(nearest_photo(&positions, CAM), 0);
    assert_eq!(nearest_photo(&[], CAM), -1);
}

#[test]
fn pinch_selects_nearest_photo_on_rising_edge_only() {
    let mut classifier = GestureClassifier::new();
    let pinch = make_landmarks(0.01, 0.2, 0.5);
    let ring = photo_ring();
    classifier.observe(Some(&pinch), &ring, CAM);
    assert_eq!(classifier.state().active_photo, 0); // (0,0,8) is nearest

    // While the pinch holds, planes keep rotating; selection must not chase.
    let mut rotated = ring.clone();
    rotated.rotate_left(1);
    classifier.observe(Some(&pinch), &rotated, CAM);
    assert_eq!(classifier.state().active_photo, 0);
}

#[test]
fn no_hand_after_pinch_resets_everything_once() {
    let mut classifier = GestureClassifier::new();
    classifier.observe(Some(&make_landmarks(0.01, 0.2, 0.5)), &photo_ring(), CAM);
    assert_eq!(classifier.state().last_gesture, Gesture::Pinch);

    assert_eq!(
        classifier.observe(None, &photo_ring(), CAM),
        Some(Gesture::None)
    );
    let t = classifier.targets();
    assert!((t.scale - 1.0).abs() < 1e-6);
    assert!((t.camera_distance - 25.0).abs() < 1e-6);
    assert!((t.rotation_speed - 0.002).abs() < 1e-6);
    assert_eq!(classifier.state().active_photo, -1);

    // steady no-hand stays silent
    assert_eq!(classifier.observe(None, &photo_ring(), CAM), None);
}
