// Host-side tests for shape target generation.

use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::str::FromStr;
use tree_core::{
    fill_targets, ParticleCloud, Shape, PARTICLE_COUNT, TREE_HEIGHT, TREE_RADIUS,
};

fn generate(shape: Shape, n: usize, seed: u64) -> Vec<Vec3> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut targets = vec![Vec3::ZERO; n];
    fill_targets(shape, &mut targets, &mut rng);
    targets
}

#[test]
fn every_shape_fills_the_whole_buffer_with_finite_values() {
    for shape in Shape::ALL {
        let targets = generate(shape, PARTICLE_COUNT, 7);
        assert_eq!(targets.len(), PARTICLE_COUNT);
        for (i, t) in targets.iter().enumerate() {
            assert!(
                t.is_finite(),
                "{} produced non-finite target at {i}: {t:?}",
                shape.as_str()
            );
        }
    }
}

#[test]
fn cone_targets_stay_inside_the_cone() {
    let half = TREE_HEIGHT / 2.0;
    for t in generate(Shape::Cone, 20_000, 11) {
        assert!(t.y >= -half - 1e-4 && t.y <= half + 1e-4, "y out of range: {t:?}");
        let radial = (t.x * t.x + t.z * t.z).sqrt();
        let allowed = TREE_RADIUS * (1.0 - (t.y + half) / TREE_HEIGHT);
        assert!(radial <= allowed + 1e-3, "radius {radial} exceeds {allowed} at {t:?}");
    }
}

#[test]
fn star_profile_stays_in_its_radial_band() {
    for t in generate(Shape::Star, 20_000, 13) {
        let r = (t.x * t.x + t.y * t.y).sqrt();
        assert!(r >= 5.0 - 1e-3 && r <= 10.0 + 1e-3, "star radius {r}");
        assert!(t.z.abs() <= 1.0 + 1e-4, "star depth {t:?}");
    }
}

#[test]
fn snowflake_profile_stays_in_its_radial_band() {
    for t in generate(Shape::Snowflake, 20_000, 17) {
        let r = (t.x * t.x + t.y * t.y).sqrt();
        assert!(r >= 3.0 - 1e-3 && r <= 10.0 + 1e-3, "snowflake radius {r}");
        assert!(t.z.abs() <= 1.5 + 1e-4, "snowflake depth {t:?}");
    }
}

#[test]
fn fireworks_fit_inside_the_shell_radius() {
    for t in generate(Shape::Fireworks, 20_000, 19) {
        assert!(t.length() <= 12.0 + 1e-3, "fireworks radius {}", t.length());
    }
}

#[test]
fn heart_is_symmetric_about_x_in_expectation() {
    let targets = generate(Shape::Heart, 50_000, 23);
    let mean_x: f32 = targets.iter().map(|t| t.x).sum::<f32>() / targets.len() as f32;
    assert!(mean_x.abs() < 0.2, "mean x {mean_x} too far from 0");
    for t in &targets {
        assert!(t.x.abs() <= 8.0 + 1e-3, "heart x out of range: {t:?}");
        assert!(t.z.abs() <= 2.5 + 1e-4, "heart depth out of range: {t:?}");
    }
}

#[test]
fn shape_ids_round_trip() {
    for shape in Shape::ALL {
        assert_eq!(Shape::from_str(shape.as_str()), Ok(shape));
    }
    assert!(Shape::from_str("TRIANGLE").is_err());
    assert!(Shape::from_str("cone").is_err());
}

#[test]
fn cone_scenario_with_default_palette() {
    // shape=CONE, color1=#C0C0C0, color2=#6A0DAD
    let mut rng = StdRng::seed_from_u64(42);
    let mut cloud = ParticleCloud::new(&mut rng);
    cloud.retarget(Shape::Cone, &mut rng);
    let c1 = tree_core::parse_hex_rgb("#C0C0C0").unwrap();
    let c2 = tree_core::parse_hex_rgb("#6A0DAD").unwrap();
    cloud.set_colors(c1, c2, &mut rng);

    assert_eq!(cloud.targets().len(), PARTICLE_COUNT);
    let half = TREE_HEIGHT / 2.0;
    for t in cloud.targets() {
        assert!((t.x * t.x + t.z * t.z).sqrt() <= TREE_RADIUS + 1e-3);
        assert!(t.y >= -half - 1e-4 && t.y <= half + 1e-4);
    }

    // Every color is a single linear blend of the two palette entries: the
    // blend factor recovered from each channel must agree.
    for c in cloud.colors() {
        let mut blend: Option<f32> = None;
        for ch in 0..3 {
            let span: f32 = c2[ch] - c1[ch];
            if span.abs() < 1e-6 {
                continue;
            }
            let t = (c[ch] - c1[ch]) / span;
            assert!((-1e-3..=1.0 + 1e-3).contains(&t), "blend factor {t} out of range");
            if let Some(prev) = blend {
                assert!((t - prev).abs() < 1e-3, "channels disagree: {t} vs {prev}");
            }
            blend = Some(t);
        }
        assert!(blend.is_some());
    }
}
