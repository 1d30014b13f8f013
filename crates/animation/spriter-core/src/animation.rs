//! Animations and their sound/event tracks.

use serde_json::Value as JsonValue;

use crate::json::{load_int, load_string, make_array};
use crate::keyframe::HasTime;
use crate::meta::Meta;
use crate::objects::SoundObject;
use crate::timeline::{Mainline, Timeline};

#[derive(Debug, Default)]
pub struct SoundlineKeyframe {
    pub id: i32,
    pub time: f64,
    pub sound: SoundObject,
}

impl HasTime for SoundlineKeyframe {
    fn time(&self) -> f64 {
        self.time
    }
}

impl SoundlineKeyframe {
    pub fn load(json: &JsonValue) -> SoundlineKeyframe {
        SoundlineKeyframe {
            id: load_int(json, "id", -1),
            time: load_int(json, "time", 0) as f64,
            sound: SoundObject::load(json.get("object").unwrap_or(&JsonValue::Null)),
        }
    }
}

#[derive(Debug, Default)]
pub struct Soundline {
    pub id: i32,
    pub name: String,
    pub keyframes: Vec<SoundlineKeyframe>,
}

impl Soundline {
    pub fn load(json: &JsonValue) -> Soundline {
        let mut keyframes: Vec<SoundlineKeyframe> = make_array(json, "key")
            .into_iter()
            .map(SoundlineKeyframe::load)
            .collect();
        keyframes.sort_by(|a, b| a.time.total_cmp(&b.time));
        Soundline {
            id: load_int(json, "id", -1),
            name: load_string(json, "name", ""),
            keyframes,
        }
    }
}

#[derive(Debug, Default)]
pub struct EventlineKeyframe {
    pub id: i32,
    pub time: f64,
}

impl HasTime for EventlineKeyframe {
    fn time(&self) -> f64 {
        self.time
    }
}

impl EventlineKeyframe {
    pub fn load(json: &JsonValue) -> EventlineKeyframe {
        EventlineKeyframe {
            id: load_int(json, "id", -1),
            time: load_int(json, "time", 0) as f64,
        }
    }
}

#[derive(Debug, Default)]
pub struct Eventline {
    pub id: i32,
    pub name: String,
    pub keyframes: Vec<EventlineKeyframe>,
}

impl Eventline {
    pub fn load(json: &JsonValue) -> Eventline {
        let mut keyframes: Vec<EventlineKeyframe> = make_array(json, "key")
            .into_iter()
            .map(EventlineKeyframe::load)
            .collect();
        keyframes.sort_by(|a, b| a.time.total_cmp(&b.time));
        Eventline {
            id: load_int(json, "id", -1),
            name: load_string(json, "name", ""),
            keyframes,
        }
    }
}

#[derive(Debug, Default)]
pub struct Animation {
    pub id: i32,
    pub name: String,
    /// Loop period, in the same integer time unit as keyframe times
    /// (milliseconds for all known exporters).
    pub length: f64,
    /// "true", "false" or "ping_pong"; stored as authored.
    pub looping: String,
    pub loop_to: i32,
    pub mainline: Mainline,
    pub timeline_array: Vec<Timeline>,
    pub soundline_array: Vec<Soundline>,
    pub eventline_array: Vec<Eventline>,
    pub meta: Option<Meta>,
    pub min_time: f64,
    pub max_time: f64,
}

impl Animation {
    pub fn load(json: &JsonValue) -> Animation {
        let length = load_int(json, "length", 0) as f64;
        Animation {
            id: load_int(json, "id", -1),
            name: load_string(json, "name", ""),
            length,
            looping: load_string(json, "looping", "true"),
            loop_to: load_int(json, "loop_to", 0),
            mainline: Mainline::load(json.get("mainline").unwrap_or(&JsonValue::Null)),
            timeline_array: make_array(json, "timeline")
                .into_iter()
                .map(Timeline::load)
                .collect(),
            soundline_array: make_array(json, "soundline")
                .into_iter()
                .map(Soundline::load)
                .collect(),
            eventline_array: make_array(json, "eventline")
                .into_iter()
                .map(Eventline::load)
                .collect(),
            meta: json.get("meta").map(Meta::load),
            min_time: 0.0,
            max_time: length,
        }
    }
}
