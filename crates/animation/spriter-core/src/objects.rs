//! Pose payload records.
//!
//! One concrete record per timeline kind. Each supports `load` (JSON with
//! documented defaults), `copy_from` (in-place value copy so pose buffers
//! can be reused across strikes) and `tween` (interpolate `self` toward
//! `other` in place). Names are intentionally not copied by `copy_from`:
//! the pose overwrites them from the owning timeline every strike.

use serde_json::Value as JsonValue;

use crate::json::{load_bool, load_float, load_int};
use crate::math::{lerp, Space, Vector};
use crate::pose::Pose;

#[derive(Debug)]
pub struct Bone {
    pub name: String,
    pub parent_index: i32,
    pub local_space: Space,
    pub world_space: Space,
}

impl Default for Bone {
    fn default() -> Self {
        Bone {
            name: String::new(),
            parent_index: -1,
            local_space: Space::identity(),
            world_space: Space::identity(),
        }
    }
}

impl Bone {
    pub fn load(json: &JsonValue) -> Bone {
        let local_space = Space::load(json);
        Bone {
            name: String::new(),
            parent_index: load_int(json, "parent", -1),
            local_space,
            world_space: local_space,
        }
    }

    pub fn copy_from(&mut self, other: &Bone) {
        self.parent_index = other.parent_index;
        self.local_space = other.local_space;
        self.world_space = other.world_space;
    }

    pub fn tween(&mut self, other: &Bone, t: f64, spin: i32) {
        self.local_space = Space::tween(&self.local_space, &other.local_space, t, spin);
    }
}

#[derive(Debug)]
pub struct SpriteObject {
    pub name: String,
    pub parent_index: i32,
    pub folder_index: i32,
    pub file_index: i32,
    pub local_space: Space,
    pub world_space: Space,
    /// Set when the keyframe did not author an explicit pivot; the document
    /// patch pass back-fills the referenced file's pivot.
    pub default_pivot: bool,
    pub pivot: Vector,
    pub z_index: i32,
    pub alpha: f64,
}

impl Default for SpriteObject {
    fn default() -> Self {
        SpriteObject {
            name: String::new(),
            parent_index: -1,
            folder_index: -1,
            file_index: -1,
            local_space: Space::identity(),
            world_space: Space::identity(),
            default_pivot: false,
            pivot: Vector::DEFAULT_PIVOT,
            z_index: 0,
            alpha: 1.0,
        }
    }
}

impl SpriteObject {
    pub fn load(json: &JsonValue) -> SpriteObject {
        let mut sprite = SpriteObject {
            parent_index: load_int(json, "parent", -1),
            folder_index: load_int(json, "folder", -1),
            file_index: load_int(json, "file", -1),
            local_space: Space::load(json),
            z_index: load_int(json, "z_index", 0),
            alpha: load_float(json, "a", 1.0),
            ..SpriteObject::default()
        };
        sprite.world_space = sprite.local_space;
        if json.get("pivot_x").is_some() || json.get("pivot_y").is_some() {
            sprite.pivot.x = load_float(json, "pivot_x", 0.0);
            sprite.pivot.y = load_float(json, "pivot_y", 1.0);
        } else {
            sprite.default_pivot = true;
        }
        sprite
    }

    pub fn copy_from(&mut self, other: &SpriteObject) {
        self.parent_index = other.parent_index;
        self.folder_index = other.folder_index;
        self.file_index = other.file_index;
        self.local_space = other.local_space;
        self.world_space = other.world_space;
        self.default_pivot = other.default_pivot;
        self.pivot = other.pivot;
        self.z_index = other.z_index;
        self.alpha = other.alpha;
    }

    pub fn tween(&mut self, other: &SpriteObject, t: f64, spin: i32) {
        self.local_space = Space::tween(&self.local_space, &other.local_space, t, spin);
        self.alpha = lerp(self.alpha, other.alpha, t);
    }
}

#[derive(Debug)]
pub struct BoxObject {
    pub name: String,
    pub parent_index: i32,
    pub local_space: Space,
    pub world_space: Space,
    pub pivot: Vector,
}

impl Default for BoxObject {
    fn default() -> Self {
        BoxObject {
            name: String::new(),
            parent_index: -1,
            local_space: Space::identity(),
            world_space: Space::identity(),
            pivot: Vector::DEFAULT_PIVOT,
        }
    }
}

impl BoxObject {
    pub fn load(json: &JsonValue) -> BoxObject {
        let local_space = Space::load(json);
        BoxObject {
            name: String::new(),
            parent_index: load_int(json, "parent", -1),
            local_space,
            world_space: local_space,
            pivot: Vector::new(
                load_float(json, "pivot_x", 0.0),
                load_float(json, "pivot_y", 1.0),
            ),
        }
    }

    pub fn copy_from(&mut self, other: &BoxObject) {
        self.parent_index = other.parent_index;
        self.local_space = other.local_space;
        self.world_space = other.world_space;
        self.pivot = other.pivot;
    }

    pub fn tween(&mut self, other: &BoxObject, t: f64, spin: i32) {
        self.local_space = Space::tween(&self.local_space, &other.local_space, t, spin);
    }
}

#[derive(Debug)]
pub struct PointObject {
    pub name: String,
    pub parent_index: i32,
    pub local_space: Space,
    pub world_space: Space,
}

impl Default for PointObject {
    fn default() -> Self {
        PointObject {
            name: String::new(),
            parent_index: -1,
            local_space: Space::identity(),
            world_space: Space::identity(),
        }
    }
}

impl PointObject {
    pub fn load(json: &JsonValue) -> PointObject {
        let local_space = Space::load(json);
        PointObject {
            name: String::new(),
            parent_index: load_int(json, "parent", -1),
            local_space,
            world_space: local_space,
        }
    }

    pub fn copy_from(&mut self, other: &PointObject) {
        self.parent_index = other.parent_index;
        self.local_space = other.local_space;
        self.world_space = other.world_space;
    }

    pub fn tween(&mut self, other: &PointObject, t: f64, spin: i32) {
        self.local_space = Space::tween(&self.local_space, &other.local_space, t, spin);
    }
}

#[derive(Debug)]
pub struct SoundObject {
    pub name: String,
    pub folder_index: i32,
    pub file_index: i32,
    pub trigger: bool,
    pub volume: f64,
    pub panning: f64,
}

impl Default for SoundObject {
    fn default() -> Self {
        SoundObject {
            name: String::new(),
            folder_index: -1,
            file_index: -1,
            trigger: false,
            volume: 1.0,
            panning: 0.0,
        }
    }
}

impl SoundObject {
    pub fn load(json: &JsonValue) -> SoundObject {
        SoundObject {
            name: String::new(),
            folder_index: load_int(json, "folder", -1),
            file_index: load_int(json, "file", -1),
            trigger: load_bool(json, "trigger", false),
            volume: load_float(json, "volume", 1.0),
            panning: load_float(json, "panning", 0.0),
        }
    }

    pub fn copy_from(&mut self, other: &SoundObject) {
        self.folder_index = other.folder_index;
        self.file_index = other.file_index;
        self.trigger = other.trigger;
        self.volume = other.volume;
        self.panning = other.panning;
    }

    pub fn tween(&mut self, other: &SoundObject, t: f64, _spin: i32) {
        self.volume = lerp(self.volume, other.volume, t);
        self.panning = lerp(self.panning, other.panning, t);
    }
}

#[derive(Debug)]
pub struct EntityObject {
    pub name: String,
    pub parent_index: i32,
    pub local_space: Space,
    pub world_space: Space,
    pub entity_index: i32,
    pub animation_index: i32,
    /// Normalized position within the sub-animation, 0..1.
    pub animation_time: f64,
    /// Lazily created nested pose over the same document; owned by this
    /// slot and reused across strikes, never copied between slots.
    pub pose: Option<Box<Pose>>,
}

impl Default for EntityObject {
    fn default() -> Self {
        EntityObject {
            name: String::new(),
            parent_index: -1,
            local_space: Space::identity(),
            world_space: Space::identity(),
            entity_index: -1,
            animation_index: -1,
            animation_time: 0.0,
            pose: None,
        }
    }
}

impl EntityObject {
    pub fn load(json: &JsonValue) -> EntityObject {
        let local_space = Space::load(json);
        EntityObject {
            name: String::new(),
            parent_index: load_int(json, "parent", -1),
            local_space,
            world_space: local_space,
            entity_index: load_int(json, "entity", -1),
            animation_index: load_int(json, "animation", -1),
            animation_time: load_float(json, "t", 0.0),
            pose: None,
        }
    }

    pub fn copy_from(&mut self, other: &EntityObject) {
        self.parent_index = other.parent_index;
        self.local_space = other.local_space;
        self.world_space = other.world_space;
        self.entity_index = other.entity_index;
        self.animation_index = other.animation_index;
        self.animation_time = other.animation_time;
    }

    pub fn tween(&mut self, other: &EntityObject, t: f64, spin: i32) {
        self.local_space = Space::tween(&self.local_space, &other.local_space, t, spin);
        self.animation_time = lerp(self.animation_time, other.animation_time, t);
    }
}

#[derive(Debug, Default)]
pub struct VariableObject {
    pub name: String,
}

impl VariableObject {
    pub fn load(_json: &JsonValue) -> VariableObject {
        VariableObject::default()
    }

    pub fn copy_from(&mut self, _other: &VariableObject) {}

    pub fn tween(&mut self, _other: &VariableObject, _t: f64, _spin: i32) {}
}

/// Closed set of timeline payload kinds; also the element type of a pose's
/// object array.
#[derive(Debug)]
pub enum Object {
    Sprite(SpriteObject),
    Bone(Bone),
    Box(BoxObject),
    Point(PointObject),
    Sound(SoundObject),
    Entity(EntityObject),
    Variable(VariableObject),
}

impl Object {
    pub fn name(&self) -> &str {
        match self {
            Object::Sprite(o) => &o.name,
            Object::Bone(o) => &o.name,
            Object::Box(o) => &o.name,
            Object::Point(o) => &o.name,
            Object::Sound(o) => &o.name,
            Object::Entity(o) => &o.name,
            Object::Variable(o) => &o.name,
        }
    }

    /// World space for renderable kinds; sounds and variables have none.
    pub fn world_space(&self) -> Option<&Space> {
        match self {
            Object::Sprite(o) => Some(&o.world_space),
            Object::Bone(o) => Some(&o.world_space),
            Object::Box(o) => Some(&o.world_space),
            Object::Point(o) => Some(&o.world_space),
            Object::Entity(o) => Some(&o.world_space),
            Object::Sound(_) | Object::Variable(_) => None,
        }
    }
}
