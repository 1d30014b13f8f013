use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::json;
use spriter_core::{Document, Pose};

/// Two-bone, one-sprite document exercising the full strike path:
/// mainline resolve, timeline tweens, hierarchy composition, pivot offset.
fn bench_doc() -> Arc<Document> {
    Arc::new(Document::load(&json!({
        "folder": {
            "id": 0,
            "file": { "id": 0, "name": "torso.png", "width": 64, "height": 128 }
        },
        "entity": {
            "id": 0, "name": "hero",
            "animation": {
                "id": 0, "name": "walk", "length": 1000,
                "mainline": { "key": [
                    { "id": 0, "time": 0,
                      "bone_ref": [
                          { "id": 0, "timeline": 0, "key": 0 },
                          { "id": 1, "parent": 0, "timeline": 1, "key": 0 }
                      ],
                      "object_ref": { "id": 0, "parent": 1, "timeline": 2, "key": 0 } },
                    { "id": 1, "time": 500,
                      "bone_ref": [
                          { "id": 0, "timeline": 0, "key": 1 },
                          { "id": 1, "parent": 0, "timeline": 1, "key": 1 }
                      ],
                      "object_ref": { "id": 0, "parent": 1, "timeline": 2, "key": 1 } }
                ]},
                "timeline": [
                    { "id": 0, "name": "hip", "object_type": "bone", "key": [
                        { "id": 0, "time": 0, "bone": { "x": 0, "angle": 0 } },
                        { "id": 1, "time": 500, "spin": 1, "bone": { "x": 40, "angle": 180 } }
                    ]},
                    { "id": 1, "name": "torso", "object_type": "bone", "key": [
                        { "id": 0, "time": 0, "bone": { "x": 20, "angle": -30 } },
                        { "id": 1, "time": 500, "bone": { "x": 20, "angle": 30 } }
                    ]},
                    { "id": 2, "name": "torso_sprite", "object_type": "sprite", "key": [
                        { "id": 0, "time": 0, "object": { "folder": 0, "file": 0 } },
                        { "id": 1, "time": 500, "object": { "folder": 0, "file": 0, "a": 0.5 } }
                    ]}
                ]
            }
        }
    })))
}

fn pose_strike(c: &mut Criterion) {
    let data = bench_doc();
    let mut pose = Pose::new(data);
    pose.set_entity("hero");
    pose.set_anim("walk");
    pose.strike().unwrap();

    c.bench_function("update_strike_16ms", |b| {
        b.iter(|| {
            pose.update(black_box(16.0));
            pose.strike().unwrap();
            black_box(pose.bone_array.len())
        })
    });
}

criterion_group!(benches, pose_strike);
criterion_main!(benches);
