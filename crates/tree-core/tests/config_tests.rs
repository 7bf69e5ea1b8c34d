// Host-side tests for the control-surface config and color parsing.

use tree_core::{parse_hex_rgb, ColorParseError, Shape, VisualConfig, DEFAULT_PHOTO_SOURCES};

#[test]
fn defaults_match_the_launch_state() {
    let config = VisualConfig::default();
    assert_eq!(config.shape, Shape::Cone);
    assert_eq!(config.photo_sources.len(), 5);
    assert_eq!(config.photo_sources[0], DEFAULT_PHOTO_SOURCES[0]);
    // silver and blue-purple
    assert!((config.color1[0] - 192.0 / 255.0).abs() < 1e-6);
    assert!((config.color2[0] - 106.0 / 255.0).abs() < 1e-6);
    assert!((config.color2[2] - 173.0 / 255.0).abs() < 1e-6);
}

#[test]
fn reset_restores_defaults_regardless_of_prior_state() {
    let mut config = VisualConfig::default();
    config.shape = Shape::Fireworks;
    config.set_color1("#FF0000").unwrap();
    config.set_photo_sources(vec!["blob:abc".into(), "blob:def".into()]);

    config.reset();
    assert_eq!(config, VisualConfig::default());
}

#[test]
fn photo_sources_cycle_when_list_is_short() {
    let mut config = VisualConfig::default();
    config.set_photo_sources(vec!["a".into(), "b".into(), "c".into()]);
    assert_eq!(config.photo_source_for(0), Some("a"));
    assert_eq!(config.photo_source_for(4), Some("b"));
    assert_eq!(config.photo_source_for(7), Some("b"));

    config.set_photo_sources(Vec::new());
    assert_eq!(config.photo_source_for(3), None);
}

#[test]
fn hex_parsing_accepts_rrggbb_only() {
    assert_eq!(parse_hex_rgb("#FFFFFF"), Ok([1.0, 1.0, 1.0]));
    assert_eq!(parse_hex_rgb("000000"), Ok([0.0, 0.0, 0.0]));
    let silver = parse_hex_rgb("#C0C0C0").unwrap();
    assert!((silver[1] - 192.0 / 255.0).abs() < 1e-6);

    for bad in ["", "#FFF", "#12345", "#GGGGGG", "#C0C0C0C0"] {
        assert!(matches!(parse_hex_rgb(bad), Err(ColorParseError::Format(_))), "{bad}");
    }
}
