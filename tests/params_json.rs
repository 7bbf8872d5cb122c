#![cfg(feature = "serde")]

use maptrack::{InferParams, InferResult, Inference, TrackerConfig};

#[test]
fn empty_and_partial_params_use_defaults() {
    assert_eq!(InferParams::from_json(""), InferParams::default());
    assert_eq!(InferParams::from_json("  {} "), InferParams::default());

    let p = InferParams::from_json(r#"{"precision": 0.8}"#);
    assert_eq!(p.precision, 0.8);
    assert_eq!(p.threshold, 0.5);

    let p = InferParams::from_json(r#"{"precision": 1, "threshold": 0}"#);
    assert_eq!((p.precision, p.threshold), (1.0, 0.0));
}

#[test]
fn out_of_range_fields_fall_back_individually() {
    let p = InferParams::from_json(r#"{"precision": 0, "threshold": 0.7}"#);
    assert_eq!((p.precision, p.threshold), (0.4, 0.7));

    let p = InferParams::from_json(r#"{"precision": 0.3, "threshold": 1.0}"#);
    assert_eq!((p.precision, p.threshold), (0.3, 0.5));
}

#[test]
fn malformed_params_fall_back_to_defaults() {
    for text in ["{", "{\"precision\": 0.8", r#""fast""#, "[0.8, 0.7]", "null"] {
        assert_eq!(InferParams::from_json(text), InferParams::default(), "{text}");
    }
}

#[test]
fn non_numeric_field_falls_back_alone() {
    let p = InferParams::from_json(r#"{"precision": "high", "threshold": 0.6}"#);
    assert_eq!((p.precision, p.threshold), (0.4, 0.6));

    let p = InferParams::from_json(r#"{"precision": 0.9, "threshold": null, "extra": true}"#);
    assert_eq!((p.precision, p.threshold), (0.9, 0.5));
}

#[test]
fn result_serializes_with_camel_case_names() {
    let inference = Inference {
        result: InferResult {
            map_name: "map01_lv001".to_string(),
            x: 512,
            y: 300,
            rot: 90,
            loc_conf: 0.93,
            rot_conf: 0.81,
            loc_time_ms: 12,
            rot_time_ms: 4,
        },
        hit: true,
    };
    let value = serde_json::to_value(&inference).unwrap();
    assert_eq!(
        value,
        serde_json::json!({
            "mapName": "map01_lv001",
            "x": 512,
            "y": 300,
            "rot": 90,
            "locConf": 0.93,
            "rotConf": 0.81,
            "locTimeMs": 12,
            "rotTimeMs": 4,
            "hit": true
        })
    );
    let back: Inference = serde_json::from_value(value).unwrap();
    assert_eq!(back, inference);
}

#[test]
fn tracker_config_accepts_partial_json() {
    let cfg: TrackerConfig =
        serde_json::from_str(r#"{"minimap": {"radius": 30}, "parallel": false}"#).unwrap();
    assert_eq!(cfg.minimap.radius, 30);
    assert_eq!(cfg.minimap.center_x, 108);
    assert_eq!(cfg.pointer.radius, 12);
    assert!(!cfg.parallel);
    assert!(cfg.validate().is_ok());
}
