//! Entities: character maps, variable definitions, object metadata, and the
//! ordered name→animation map.

use hashbrown::HashMap;
use serde_json::Value as JsonValue;

use crate::animation::Animation;
use crate::json::{load_float, load_int, load_string, make_array};
use crate::meta::VarValue;

/// One folder/file → folder/file substitution of a character map.
#[derive(Clone, Debug, Default)]
pub struct MapInstruction {
    pub folder_index: i32,
    pub file_index: i32,
    pub target_folder_index: i32,
    pub target_file_index: i32,
}

impl MapInstruction {
    pub fn load(json: &JsonValue) -> MapInstruction {
        MapInstruction {
            folder_index: load_int(json, "folder", -1),
            file_index: load_int(json, "file", -1),
            target_folder_index: load_int(json, "target_folder", -1),
            target_file_index: load_int(json, "target_file", -1),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct CharacterMap {
    pub id: i32,
    pub name: String,
    pub map_instructions: Vec<MapInstruction>,
}

impl CharacterMap {
    pub fn load(json: &JsonValue) -> CharacterMap {
        CharacterMap {
            id: load_int(json, "id", -1),
            name: load_string(json, "name", ""),
            map_instructions: make_array(json, "map")
                .into_iter()
                .map(MapInstruction::load)
                .collect(),
        }
    }
}

/// Typed default for a declared variable.
#[derive(Clone, Debug, PartialEq)]
pub enum VarDefault {
    Int(i64),
    Float(f64),
    Str(String),
    /// Unknown declaration type; seeds nothing.
    Other(String),
}

#[derive(Clone, Debug)]
pub struct VarDef {
    pub id: i32,
    pub name: String,
    pub default: VarDefault,
}

impl VarDef {
    pub fn load(json: &JsonValue) -> VarDef {
        let default = match load_string(json, "type", "").as_str() {
            "int" => VarDefault::Int(load_int(json, "default_value", 0) as i64),
            "float" => VarDefault::Float(load_float(json, "default_value", 0.0)),
            "string" => VarDefault::Str(load_string(json, "default_value", "")),
            other => {
                log::warn!("unknown var_def type {other:?}");
                VarDefault::Other(other.to_string())
            }
        };
        VarDef {
            id: load_int(json, "id", -1),
            name: load_string(json, "name", ""),
            default,
        }
    }

    pub fn default_value(&self) -> Option<VarValue> {
        match &self.default {
            VarDefault::Int(v) => Some(VarValue::Int(*v)),
            VarDefault::Float(v) => Some(VarValue::Float(*v)),
            VarDefault::Str(s) => Some(VarValue::Str(s.clone())),
            VarDefault::Other(_) => None,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct VarDefs {
    pub var_defs: Vec<VarDef>,
}

impl VarDefs {
    pub fn load(json: &JsonValue) -> VarDefs {
        // SCML nests declarations under "i"; SCON passes a bare array.
        let items: Vec<&JsonValue> = match json.get("i") {
            Some(_) => make_array(json, "i"),
            None => match json {
                JsonValue::Array(items) => items.iter().collect(),
                _ => Vec::new(),
            },
        };
        VarDefs {
            var_defs: items.into_iter().map(VarDef::load).collect(),
        }
    }
}

/// Frame list entry of a sprite obj-info.
#[derive(Clone, Debug, Default)]
pub struct SpriteFrame {
    pub folder_index: i32,
    pub file_index: i32,
}

impl SpriteFrame {
    pub fn load(json: &JsonValue) -> SpriteFrame {
        SpriteFrame {
            folder_index: load_int(json, "folder", -1),
            file_index: load_int(json, "file", -1),
        }
    }
}

#[derive(Clone, Debug)]
pub enum ObjInfoData {
    Sprite { frames: Vec<SpriteFrame> },
    Bone { w: f64, h: f64 },
    Box { w: f64, h: f64 },
    Other(String),
}

/// Static per-object-name metadata (gizmo dimensions, sprite frame lists,
/// box sizes used for pivot offsets).
#[derive(Clone, Debug)]
pub struct ObjInfo {
    pub id: i32,
    pub name: String,
    pub var_defs: VarDefs,
    pub data: ObjInfoData,
}

impl ObjInfo {
    pub fn load(json: &JsonValue) -> ObjInfo {
        let data = match load_string(json, "type", "").as_str() {
            "sprite" => ObjInfoData::Sprite {
                frames: make_array(json, "frames")
                    .into_iter()
                    .map(SpriteFrame::load)
                    .collect(),
            },
            "bone" => ObjInfoData::Bone {
                w: load_int(json, "w", 0) as f64,
                h: load_int(json, "h", 0) as f64,
            },
            "box" => ObjInfoData::Box {
                w: load_float(json, "w", 0.0),
                h: load_float(json, "h", 0.0),
            },
            other => {
                log::warn!("unknown obj_info type {other:?}");
                ObjInfoData::Other(other.to_string())
            }
        };
        ObjInfo {
            id: load_int(json, "id", -1),
            name: load_string(json, "name", ""),
            var_defs: VarDefs::load(json.get("var_defs").unwrap_or(&JsonValue::Null)),
            data,
        }
    }

    /// Width/height for kinds that carry them.
    pub fn dims(&self) -> Option<(f64, f64)> {
        match self.data {
            ObjInfoData::Bone { w, h } | ObjInfoData::Box { w, h } => Some((w, h)),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct Entity {
    pub id: i32,
    pub name: String,
    pub character_map_map: HashMap<String, CharacterMap>,
    pub character_map_keys: Vec<String>,
    pub var_defs: VarDefs,
    pub obj_info_map: HashMap<String, ObjInfo>,
    pub obj_info_keys: Vec<String>,
    pub animation_map: HashMap<String, Animation>,
    /// Load order; the only iteration-order contract for UI enumeration.
    pub animation_keys: Vec<String>,
}

impl Entity {
    pub fn load(json: &JsonValue) -> Entity {
        let mut entity = Entity {
            id: load_int(json, "id", -1),
            name: load_string(json, "name", ""),
            var_defs: VarDefs::load(json.get("var_defs").unwrap_or(&JsonValue::Null)),
            ..Entity::default()
        };

        for character_map_json in make_array(json, "character_map") {
            let character_map = CharacterMap::load(character_map_json);
            entity.character_map_keys.push(character_map.name.clone());
            entity
                .character_map_map
                .insert(character_map.name.clone(), character_map);
        }

        for obj_info_json in make_array(json, "obj_info") {
            let obj_info = ObjInfo::load(obj_info_json);
            entity.obj_info_keys.push(obj_info.name.clone());
            entity.obj_info_map.insert(obj_info.name.clone(), obj_info);
        }

        for animation_json in make_array(json, "animation") {
            let animation = Animation::load(animation_json);
            entity.animation_keys.push(animation.name.clone());
            entity
                .animation_map
                .insert(animation.name.clone(), animation);
        }

        entity
    }
}
