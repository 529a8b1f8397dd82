use super::*;
use crate::pattern::tiles::TileShape;

#[test]
fn empty_document_yields_defaults() {
    let cfg = PosterConfig::from_json_str("{}").unwrap();
    assert_eq!(cfg, PosterConfig::default());
    assert_eq!(cfg.canvas, Canvas::default());
    assert_eq!(cfg.tiles.palette.len(), 5);
    assert_eq!(cfg.filter.contrast, 1.3);
    assert_eq!(cfg.filter.grain, 15);
}

#[test]
fn partial_sections_merge_with_defaults() {
    let cfg = PosterConfig::from_json_str(
        r##"{
            "filter": { "grayscale": false, "tint": "#ffffff" },
            "tiles": { "shape": "circle", "clustering": true },
            "seed": 7
        }"##,
    )
    .unwrap();
    assert!(!cfg.filter.grayscale);
    assert_eq!(cfg.filter.tint, Rgb8::new(255, 255, 255));
    assert_eq!(cfg.filter.contrast, 1.3);
    assert_eq!(cfg.tiles.shape, TileShape::Circle);
    assert!(cfg.tiles.clustering);
    assert_eq!(cfg.tiles.tile_size, 100);
    assert_eq!(cfg.seed, Some(7));
}

#[test]
fn json_roundtrip_preserves_values() {
    let cfg = PosterConfig {
        seed: Some(3),
        ..PosterConfig::default()
    };
    let json = cfg.to_json_pretty().unwrap();
    assert!(json.contains("\"#f6f2df\""));
    assert_eq!(PosterConfig::from_json_str(&json).unwrap(), cfg);
}

#[test]
fn out_of_range_values_are_parameter_errors() {
    let err = PosterConfig::from_json_str(r#"{ "tiles": { "tile_size": 0 } }"#).unwrap_err();
    assert!(matches!(err, PosterError::Parameter(_)), "{err}");

    let err = PosterConfig::from_json_str(r#"{ "filter": { "contrast": -1.0 } }"#).unwrap_err();
    assert!(matches!(err, PosterError::Parameter(_)), "{err}");
}

#[test]
fn malformed_documents_are_serde_errors() {
    for doc in [
        "{",
        r#"{ "unknown": 1 }"#,
        r#"{ "background": "blue" }"#,
        r#"{ "filter": { "grain": -3 } }"#,
    ] {
        let err = PosterConfig::from_json_str(doc).unwrap_err();
        assert!(matches!(err, PosterError::Serde(_)), "{doc}: {err}");
    }
}
