//! Mainline and per-object timelines.
//!
//! The mainline selects which bones/objects exist at a given time and which
//! timeline keyframe each one dereferences; the timelines hold the actual
//! payload data. Ref arrays are sorted by id because a ref's id is its
//! position in the resolved pose array (the index parent references point
//! at); keyframe arrays are sorted by time for the binary search.

use serde_json::Value as JsonValue;

use crate::curve::Curve;
use crate::json::{load_int, load_string, make_array};
use crate::keyframe::HasTime;
use crate::meta::Meta;
use crate::objects::{
    Bone, BoxObject, EntityObject, Object, PointObject, SoundObject, SpriteObject, VariableObject,
};

#[derive(Clone, Debug, Default)]
pub struct BoneRef {
    pub id: i32,
    pub parent_index: i32,
    pub timeline_index: i32,
    pub keyframe_index: i32,
}

impl BoneRef {
    pub fn load(json: &JsonValue) -> BoneRef {
        BoneRef {
            id: load_int(json, "id", -1),
            parent_index: load_int(json, "parent", -1),
            timeline_index: load_int(json, "timeline", -1),
            keyframe_index: load_int(json, "key", -1),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ObjectRef {
    pub id: i32,
    pub parent_index: i32,
    pub timeline_index: i32,
    pub keyframe_index: i32,
    pub z_index: i32,
}

impl ObjectRef {
    pub fn load(json: &JsonValue) -> ObjectRef {
        ObjectRef {
            id: load_int(json, "id", -1),
            parent_index: load_int(json, "parent", -1),
            timeline_index: load_int(json, "timeline", -1),
            keyframe_index: load_int(json, "key", -1),
            z_index: load_int(json, "z_index", 0),
        }
    }
}

#[derive(Debug, Default)]
pub struct MainlineKeyframe {
    pub id: i32,
    pub time: f64,
    pub curve: Curve,
    pub bone_refs: Vec<BoneRef>,
    pub object_refs: Vec<ObjectRef>,
}

impl HasTime for MainlineKeyframe {
    fn time(&self) -> f64 {
        self.time
    }
}

impl MainlineKeyframe {
    pub fn load(json: &JsonValue) -> MainlineKeyframe {
        let mut bone_refs: Vec<BoneRef> = make_array(json, "bone_ref")
            .into_iter()
            .map(BoneRef::load)
            .collect();
        bone_refs.sort_by_key(|r| r.id);

        let mut object_refs: Vec<ObjectRef> = make_array(json, "object_ref")
            .into_iter()
            .map(ObjectRef::load)
            .collect();
        object_refs.sort_by_key(|r| r.id);

        MainlineKeyframe {
            id: load_int(json, "id", -1),
            time: load_int(json, "time", 0) as f64,
            curve: Curve::load(json),
            bone_refs,
            object_refs,
        }
    }
}

#[derive(Debug, Default)]
pub struct Mainline {
    pub keyframes: Vec<MainlineKeyframe>,
}

impl Mainline {
    pub fn load(json: &JsonValue) -> Mainline {
        let mut keyframes: Vec<MainlineKeyframe> = make_array(json, "key")
            .into_iter()
            .map(MainlineKeyframe::load)
            .collect();
        keyframes.sort_by(|a, b| a.time.total_cmp(&b.time));
        Mainline { keyframes }
    }
}

/// Timeline payload kind. The set is closed per format version; an
/// unrecognized tag loads as `Other` with no keyframes and becomes fatal
/// only if the pose actually dereferences it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ObjectType {
    Sprite,
    Bone,
    Box,
    Point,
    Sound,
    Entity,
    Variable,
    Other(String),
}

impl std::fmt::Display for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self {
            ObjectType::Sprite => "sprite",
            ObjectType::Bone => "bone",
            ObjectType::Box => "box",
            ObjectType::Point => "point",
            ObjectType::Sound => "sound",
            ObjectType::Entity => "entity",
            ObjectType::Variable => "variable",
            ObjectType::Other(tag) => tag,
        };
        f.write_str(tag)
    }
}

#[derive(Debug)]
pub struct TimelineKeyframe {
    pub id: i32,
    pub time: f64,
    /// Tween rotation direction: 1 counter-clockwise, -1 clockwise, 0 hold.
    pub spin: i32,
    pub curve: Curve,
    pub object: Object,
}

impl HasTime for TimelineKeyframe {
    fn time(&self) -> f64 {
        self.time
    }
}

impl TimelineKeyframe {
    fn load(json: &JsonValue, object_type: &ObjectType) -> Option<TimelineKeyframe> {
        // Bone keyframes carry their payload under "bone", all others
        // under "object".
        let null = JsonValue::Null;
        let object = match object_type {
            ObjectType::Sprite => {
                Object::Sprite(SpriteObject::load(json.get("object").unwrap_or(&null)))
            }
            ObjectType::Bone => Object::Bone(Bone::load(json.get("bone").unwrap_or(&null))),
            ObjectType::Box => Object::Box(BoxObject::load(json.get("object").unwrap_or(&null))),
            ObjectType::Point => {
                Object::Point(PointObject::load(json.get("object").unwrap_or(&null)))
            }
            ObjectType::Sound => {
                Object::Sound(SoundObject::load(json.get("object").unwrap_or(&null)))
            }
            ObjectType::Entity => {
                Object::Entity(EntityObject::load(json.get("object").unwrap_or(&null)))
            }
            ObjectType::Variable => {
                Object::Variable(VariableObject::load(json.get("object").unwrap_or(&null)))
            }
            ObjectType::Other(tag) => {
                log::warn!("unknown timeline object type {tag:?}, dropping keyframe");
                return None;
            }
        };
        Some(TimelineKeyframe {
            id: load_int(json, "id", -1),
            time: load_int(json, "time", 0) as f64,
            spin: load_int(json, "spin", 1),
            curve: Curve::load(json),
            object,
        })
    }
}

#[derive(Debug)]
pub struct Timeline {
    pub id: i32,
    pub name: String,
    pub object_type: ObjectType,
    pub object_index: i32,
    pub keyframes: Vec<TimelineKeyframe>,
    pub meta: Option<Meta>,
}

impl Timeline {
    pub fn load(json: &JsonValue) -> Timeline {
        let object_type = match load_string(json, "object_type", "sprite").as_str() {
            "sprite" => ObjectType::Sprite,
            "bone" => ObjectType::Bone,
            "box" => ObjectType::Box,
            "point" => ObjectType::Point,
            "sound" => ObjectType::Sound,
            "entity" => ObjectType::Entity,
            "variable" => ObjectType::Variable,
            other => ObjectType::Other(other.to_string()),
        };

        let mut keyframes: Vec<TimelineKeyframe> = make_array(json, "key")
            .into_iter()
            .filter_map(|key_json| TimelineKeyframe::load(key_json, &object_type))
            .collect();
        keyframes.sort_by(|a, b| a.time.total_cmp(&b.time));

        Timeline {
            id: load_int(json, "id", -1),
            name: load_string(json, "name", ""),
            object_type,
            object_index: load_int(json, "obj", -1),
            keyframes,
            meta: json.get("meta").map(Meta::load),
        }
    }
}
