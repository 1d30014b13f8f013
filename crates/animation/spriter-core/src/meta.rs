//! Tag and variable tracks ("meta" blocks on animations and timelines).

use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::json::{load_float, load_int, load_string, make_array};
use crate::keyframe::HasTime;

/// Document-level tag name declaration; taglines reference these by index.
#[derive(Clone, Debug, Default)]
pub struct TagDef {
    pub id: i32,
    pub name: String,
}

impl TagDef {
    pub fn load(json: &JsonValue) -> TagDef {
        TagDef {
            id: load_int(json, "id", -1),
            name: load_string(json, "name", ""),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Tag {
    pub id: i32,
    pub tag_def_index: i32,
}

impl Tag {
    pub fn load(json: &JsonValue) -> Tag {
        Tag {
            id: load_int(json, "id", -1),
            tag_def_index: load_int(json, "t", -1),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct TaglineKeyframe {
    pub id: i32,
    pub time: f64,
    pub tags: Vec<Tag>,
}

impl HasTime for TaglineKeyframe {
    fn time(&self) -> f64 {
        self.time
    }
}

impl TaglineKeyframe {
    pub fn load(json: &JsonValue) -> TaglineKeyframe {
        TaglineKeyframe {
            id: load_int(json, "id", -1),
            time: load_int(json, "time", 0) as f64,
            tags: make_array(json, "tag").into_iter().map(Tag::load).collect(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Tagline {
    pub id: i32,
    pub name: String,
    pub keyframes: Vec<TaglineKeyframe>,
}

impl Tagline {
    pub fn load(json: &JsonValue) -> Tagline {
        Tagline {
            id: load_int(json, "id", -1),
            name: load_string(json, "name", ""),
            keyframes: make_array(json, "key")
                .into_iter()
                .map(TaglineKeyframe::load)
                .collect(),
        }
    }
}

/// A variable's runtime value. Int values appear only after varline
/// interpolation truncates; loaded keyframes hold floats or strings.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum VarValue {
    Int(i64),
    Float(f64),
    Str(String),
}

impl Default for VarValue {
    fn default() -> Self {
        VarValue::Float(0.0)
    }
}

impl VarValue {
    pub fn as_number(&self) -> f64 {
        match self {
            VarValue::Int(v) => *v as f64,
            VarValue::Float(v) => *v,
            VarValue::Str(s) => s.parse().unwrap_or(f64::NAN),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct VarlineKeyframe {
    pub id: i32,
    pub time: f64,
    pub val: VarValue,
}

impl HasTime for VarlineKeyframe {
    fn time(&self) -> f64 {
        self.time
    }
}

impl VarlineKeyframe {
    pub fn load(json: &JsonValue) -> VarlineKeyframe {
        let val = match json.get("val") {
            Some(JsonValue::String(s)) => VarValue::Str(s.clone()),
            Some(JsonValue::Number(_)) => VarValue::Float(load_float(json, "val", 0.0)),
            _ => VarValue::default(),
        };
        VarlineKeyframe {
            id: load_int(json, "id", -1),
            time: load_int(json, "time", 0) as f64,
            val,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Varline {
    pub id: i32,
    pub name: String,
    pub var_def_index: i32,
    pub keyframes: Vec<VarlineKeyframe>,
}

impl Varline {
    pub fn load(json: &JsonValue) -> Varline {
        Varline {
            id: load_int(json, "id", -1),
            name: load_string(json, "name", ""),
            var_def_index: load_int(json, "def", -1),
            keyframes: make_array(json, "key")
                .into_iter()
                .map(VarlineKeyframe::load)
                .collect(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Meta {
    pub tagline: Tagline,
    pub varlines: Vec<Varline>,
}

impl Meta {
    pub fn load(json: &JsonValue) -> Meta {
        let tagline = match json.get("tagline") {
            Some(tagline_json) => Tagline::load(tagline_json),
            None => Tagline::default(),
        };
        // Some exporter versions wrote "valline" for "varline".
        let varline_key = if json.get("varline").is_some() {
            "varline"
        } else {
            "valline"
        };
        Meta {
            tagline,
            varlines: make_array(json, varline_key)
                .into_iter()
                .map(Varline::load)
                .collect(),
        }
    }
}
