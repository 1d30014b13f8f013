use std::sync::Arc;

use serde_json::json;
use spriter_core::document::Document;
use spriter_core::meta::VarValue;
use spriter_core::pose::Pose;

fn approx(a: f64, b: f64, eps: f64) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

/// Length-1000 animation with an eventline keyed at 300 and 500, a
/// soundline keyed at 500, a tagline keyed at 0, and an int varline.
fn tracked_doc() -> Arc<Document> {
    Arc::new(Document::load(&json!({
        "tag_list": [
            { "id": 0, "name": "vulnerable" },
            { "id": 1, "name": "airborne" }
        ],
        "folder": {
            "id": 0,
            "file": { "id": 0, "name": "sfx/step.ogg", "type": "sound" }
        },
        "entity": {
            "id": 0, "name": "hero",
            "var_defs": [
                { "id": 0, "type": "int", "name": "frame", "default_value": 0 },
                { "id": 1, "type": "float", "name": "charge", "default_value": 0.25 },
                { "id": 2, "type": "string", "name": "phase", "default_value": "rest" }
            ],
            "animation": {
                "id": 0, "name": "walk", "length": 1000,
                "mainline": { "key": { "id": 0, "time": 0 } },
                "eventline": { "id": 0, "name": "footfall", "key": [
                    { "id": 0, "time": 300 },
                    { "id": 1, "time": 500 }
                ]},
                "soundline": { "id": 0, "name": "steps", "key": {
                    "id": 0, "time": 500,
                    "object": { "folder": 0, "file": 0, "volume": 0.8, "panning": -0.5 }
                }},
                "meta": {
                    "tagline": { "key": {
                        "id": 0, "time": 0,
                        "tag": [ { "id": 0, "t": 1 }, { "id": 1, "t": 0 } ]
                    }},
                    "varline": { "id": 0, "def": 0, "key": [
                        { "id": 0, "time": 0, "val": 0 },
                        { "id": 1, "time": 500, "val": 10 }
                    ]}
                }
            }
        }
    })))
}

fn walk_pose(data: &Arc<Document>) -> Pose {
    let mut pose = Pose::new(Arc::clone(data));
    pose.set_entity("hero");
    pose.set_anim("walk");
    pose
}

/// it should fire an event when the step interval crosses its keyframe
#[test]
fn event_fires_on_crossing() {
    let data = tracked_doc();
    let mut pose = walk_pose(&data);
    pose.set_time(400.0);
    pose.strike().unwrap();
    assert!(pose.event_array.is_empty());

    pose.update(150.0);
    pose.strike().unwrap();
    assert_eq!(pose.event_array, ["footfall"]);
}

/// it should fire edge-triggered: at most once, not again while parked past
/// the keyframe
#[test]
fn event_fires_once() {
    let data = tracked_doc();
    let mut pose = walk_pose(&data);
    pose.set_time(450.0);
    pose.update(100.0);
    pose.strike().unwrap();
    assert_eq!(pose.event_array, ["footfall"]);

    pose.update(10.0);
    pose.strike().unwrap();
    assert!(pose.event_array.is_empty());
}

/// it should report only the governing keyframe when one step crosses
/// several keyframes (known limitation, kept for compatibility)
#[test]
fn large_step_drops_intermediate_firings() {
    let data = tracked_doc();
    let mut pose = walk_pose(&data);
    pose.set_time(200.0);
    pose.strike().unwrap();

    // one step across both the 300 and 500 keyframes
    pose.update(350.0);
    pose.strike().unwrap();
    assert_eq!(pose.event_array, ["footfall"]);
}

/// it should drop firings on a step that wraps across the loop seam
/// (known limitation, kept for compatibility)
#[test]
fn wrapping_step_drops_firings() {
    let data = tracked_doc();
    let mut pose = walk_pose(&data);
    pose.set_time(950.0);
    pose.strike().unwrap();

    pose.update(100.0);
    pose.strike().unwrap();
    approx(pose.get_time(), 50.0, 1e-12);
    assert!(pose.event_array.is_empty());
    assert!(pose.sound_array.is_empty());
}

/// it should fire on backward travel when landing on the keyframe (the
/// reversed interval check only admits the governing keyframe itself)
#[test]
fn event_fires_backward() {
    let data = tracked_doc();
    let mut pose = walk_pose(&data);
    pose.set_time(600.0);
    pose.strike().unwrap();

    pose.update(-100.0);
    pose.strike().unwrap();
    assert_eq!(pose.event_array, ["footfall"]);

    // sweeping past without landing on it reports nothing
    pose.set_time(600.0);
    pose.strike().unwrap();
    pose.update(-150.0);
    pose.strike().unwrap();
    assert!(pose.event_array.is_empty());
}

/// it should resolve sound firings to the referenced file name
#[test]
fn sound_firing_resolves_file() {
    let data = tracked_doc();
    let mut pose = walk_pose(&data);
    pose.set_time(450.0);
    pose.update(100.0);
    pose.strike().unwrap();

    assert_eq!(pose.sound_array.len(), 1);
    let sound = &pose.sound_array[0];
    assert_eq!(sound.name, "sfx/step.ogg");
    approx(sound.volume, 0.8, 1e-12);
    approx(sound.panning, -0.5, 1e-12);
}

/// it should fire tags sorted by name and hold them between firings
#[test]
fn tagline_fires_sorted_and_persists() {
    let data = tracked_doc();
    let mut pose = walk_pose(&data);
    pose.update(10.0);
    pose.strike().unwrap();
    // tag defs are referenced out of order; output is sorted
    assert_eq!(pose.tag_array, ["airborne", "vulnerable"]);

    pose.update(100.0);
    pose.strike().unwrap();
    assert_eq!(pose.tag_array, ["airborne", "vulnerable"]);
}

/// it should seed variable defaults on the first strike
#[test]
fn variable_defaults_seeded() {
    let data = tracked_doc();
    let mut pose = walk_pose(&data);
    pose.strike().unwrap();

    // "frame" is immediately overwritten by its varline at time 0
    assert_eq!(pose.var_map.get("frame"), Some(&VarValue::Int(0)));
    assert_eq!(pose.var_map.get("charge"), Some(&VarValue::Float(0.25)));
    assert_eq!(
        pose.var_map.get("phase"),
        Some(&VarValue::Str("rest".to_string()))
    );
}

/// it should interpolate int varlines linearly with truncation toward zero
#[test]
fn int_varline_truncates() {
    let data = tracked_doc();
    let mut pose = walk_pose(&data);
    pose.set_time(250.0);
    pose.strike().unwrap();
    // lerp(0, 10, 0.5) = 5
    assert_eq!(pose.var_map.get("frame"), Some(&VarValue::Int(5)));

    pose.set_time(90.0);
    pose.strike().unwrap();
    // lerp(0, 10, 0.18) = 1.8 → 1
    assert_eq!(pose.var_map.get("frame"), Some(&VarValue::Int(1)));
}

/// it should keep the fraction for float varlines
#[test]
fn float_varline_keeps_fraction() {
    let data = Arc::new(Document::load(&json!({
        "entity": {
            "id": 0, "name": "hero",
            "var_defs": [ { "id": 0, "type": "float", "name": "charge", "default_value": 0 } ],
            "animation": {
                "id": 0, "name": "walk", "length": 1000,
                "mainline": { "key": { "id": 0, "time": 0 } },
                "meta": {
                    "varline": { "id": 0, "def": 0, "key": [
                        { "id": 0, "time": 0, "val": 0.0 },
                        { "id": 1, "time": 1000, "val": 1.0 }
                    ]}
                }
            }
        }
    })));
    let mut pose = walk_pose(&data);
    pose.set_time(125.0);
    pose.strike().unwrap();
    match pose.var_map.get("charge") {
        Some(VarValue::Float(value)) => approx(*value, 0.125, 1e-9),
        other => panic!("expected float var, got {other:?}"),
    }
}

/// it should accept the legacy "valline" spelling for varlines
#[test]
fn legacy_valline_alias() {
    let data = Arc::new(Document::load(&json!({
        "entity": {
            "id": 0, "name": "hero",
            "var_defs": [ { "id": 0, "type": "int", "name": "step", "default_value": 0 } ],
            "animation": {
                "id": 0, "name": "walk", "length": 1000,
                "mainline": { "key": { "id": 0, "time": 0 } },
                "meta": {
                    "valline": { "id": 0, "def": 0, "key": { "id": 0, "time": 0, "val": 7 } }
                }
            }
        }
    })));
    let mut pose = walk_pose(&data);
    pose.strike().unwrap();
    assert_eq!(pose.var_map.get("step"), Some(&VarValue::Int(7)));
}
