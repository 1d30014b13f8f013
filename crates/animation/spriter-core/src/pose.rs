//! The pose engine: a stateful cursor over a shared document.
//!
//! A [`Pose`] tracks an entity/animation selection and a time value.
//! Setters and [`Pose::update`] only move the cursor and raise the dirty
//! flag; [`Pose::strike`] flushes the accumulated elapsed time into a
//! recomputed pose. The bone and object arrays are reused buffers, resized
//! to the governing keyframe's element count each strike, so a per-frame
//! update/strike cycle allocates nothing once warm.
//!
//! Poses are not thread-safe; each instance is confined to one owner. The
//! document behind the `Arc` is read-only and may back any number of poses.

use std::mem::discriminant;
use std::sync::Arc;

use hashbrown::HashMap;
use serde::Serialize;

use crate::animation::Animation;
use crate::document::Document;
use crate::entity::{Entity, VarDefault};
use crate::error::Error;
use crate::keyframe;
use crate::math::{lerp, wrap, Space};
use crate::meta::VarValue;
use crate::objects::{Bone, Object};
use crate::timeline::ObjectType;

/// A sound firing reported by a strike; the host triggers playback.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SoundEvent {
    pub name: String,
    pub volume: f64,
    pub panning: f64,
}

#[derive(Debug)]
pub struct Pose {
    pub data: Arc<Document>,
    pub entity_key: String,
    /// Active skins, applied in order; later maps override earlier ones.
    pub character_map_key_array: Vec<String>,
    pub anim_key: String,
    pub time: f64,
    pub elapsed_time: f64,
    pub dirty: bool,
    pub bone_array: Vec<Bone>,
    pub object_array: Vec<Object>,
    pub sound_array: Vec<SoundEvent>,
    pub event_array: Vec<String>,
    pub tag_array: Vec<String>,
    pub var_map: HashMap<String, VarValue>,
}

impl Pose {
    pub fn new(data: Arc<Document>) -> Pose {
        Pose {
            data,
            entity_key: String::new(),
            character_map_key_array: Vec::new(),
            anim_key: String::new(),
            time: 0.0,
            elapsed_time: 0.0,
            dirty: true,
            bone_array: Vec::new(),
            object_array: Vec::new(),
            sound_array: Vec::new(),
            event_array: Vec::new(),
            tag_array: Vec::new(),
            var_map: HashMap::new(),
        }
    }

    pub fn entities(&self) -> &HashMap<String, Entity> {
        self.data.entities()
    }

    pub fn entity_keys(&self) -> &[String] {
        self.data.entity_keys()
    }

    pub fn cur_entity(&self) -> Option<&Entity> {
        self.data.entity_map.get(&self.entity_key)
    }

    pub fn get_entity(&self) -> &str {
        &self.entity_key
    }

    /// Select an entity. A change is a discontinuity barrier: the animation
    /// selection, time, and output arrays are all reset so nothing blends
    /// across entities.
    pub fn set_entity(&mut self, entity_key: &str) {
        if self.entity_key != entity_key {
            self.entity_key = entity_key.to_string();
            self.anim_key = String::new();
            self.time = 0.0;
            self.dirty = true;
            self.bone_array.clear();
            self.object_array.clear();
        }
    }

    pub fn anims(&self) -> Option<&HashMap<String, Animation>> {
        self.data.anims(&self.entity_key)
    }

    pub fn anim_keys(&self) -> &[String] {
        self.data.anim_keys(&self.entity_key)
    }

    pub fn cur_anim(&self) -> Option<&Animation> {
        self.cur_entity()
            .and_then(|entity| entity.animation_map.get(&self.anim_key))
    }

    pub fn cur_anim_length(&self) -> f64 {
        self.cur_anim().map(|anim| anim.length).unwrap_or(0.0)
    }

    pub fn get_anim(&self) -> &str {
        &self.anim_key
    }

    /// Select an animation. The current time is wrapped into the new
    /// animation's range rather than reset, so switching animations of
    /// compatible length does not jump the pose.
    pub fn set_anim(&mut self, anim_key: &str) {
        if self.anim_key != anim_key {
            self.anim_key = anim_key.to_string();
            let range = self.cur_anim().map(|anim| (anim.min_time, anim.max_time));
            if let Some((min_time, max_time)) = range {
                self.time = wrap(self.time, min_time, max_time);
            }
            self.elapsed_time = 0.0;
            self.dirty = true;
        }
    }

    pub fn get_time(&self) -> f64 {
        self.time
    }

    pub fn set_time(&mut self, time: f64) {
        let time = match self.cur_anim() {
            Some(anim) => wrap(time, anim.min_time, anim.max_time),
            None => time,
        };
        if self.time != time {
            self.time = time;
            self.elapsed_time = 0.0;
            self.dirty = true;
        }
    }

    /// Accumulate elapsed time. Does not recompute; callers may batch
    /// several updates before one strike.
    pub fn update(&mut self, elapsed_time: f64) {
        self.elapsed_time += elapsed_time;
        self.dirty = true;
    }

    /// Flush accumulated time into a recomputed pose. No-op while clean.
    ///
    /// Sub-entity recursion assumes the authored entity graph is acyclic;
    /// no cycle detection is performed.
    pub fn strike(&mut self) -> Result<(), Error> {
        if !self.dirty {
            return Ok(());
        }
        self.dirty = false;

        let data = Arc::clone(&self.data);
        let entity = match data.entity_map.get(&self.entity_key) {
            Some(entity) => entity,
            None => return Ok(()),
        };

        // First-strike variable defaults.
        for var_def in &entity.var_defs.var_defs {
            if !self.var_map.contains_key(&var_def.name) {
                if let Some(value) = var_def.default_value() {
                    self.var_map.insert(var_def.name.clone(), value);
                }
            }
        }

        let prev_time = self.time;
        let elapsed_time = self.elapsed_time;
        self.time += self.elapsed_time;
        self.elapsed_time = 0.0;

        let anim = match entity.animation_map.get(&self.anim_key) {
            Some(anim) => anim,
            None => return Ok(()),
        };
        self.time = wrap(self.time, anim.min_time, anim.max_time);
        let time = self.time;

        let mainline_keyframes = &anim.mainline.keyframes;
        let mainline_index1 = match keyframe::find(mainline_keyframes, time) {
            Some(index) => index,
            None => return Ok(()),
        };
        let mainline_index2 = (mainline_index1 + 1) % mainline_keyframes.len();
        let mainline_keyframe1 = &mainline_keyframes[mainline_index1];
        let mainline_keyframe2 = &mainline_keyframes[mainline_index2];
        let mainline_time1 = mainline_keyframe1.time;
        let mut mainline_time2 = mainline_keyframe2.time;
        if mainline_time2 < mainline_time1 {
            mainline_time2 = anim.length;
        }

        // The mainline tween does not drive payload blending directly; it
        // picks the virtual time at which every referenced timeline is
        // sampled.
        let mut mainline_time = time;
        if mainline_time1 != mainline_time2 {
            let mut mainline_tween = (time - mainline_time1) / (mainline_time2 - mainline_time1);
            mainline_tween = mainline_keyframe1.curve.evaluate(mainline_tween);
            mainline_time = lerp(mainline_time1, mainline_time2, mainline_tween);
        }

        let timeline_array = &anim.timeline_array;

        // Bones: dereference, tween, then truncate stale trailing slots.
        for (bone_index, bone_ref) in mainline_keyframe1.bone_refs.iter().enumerate() {
            let timeline = &timeline_array[bone_ref.timeline_index as usize];
            if let ObjectType::Other(tag) = &timeline.object_type {
                return Err(Error::UnsupportedPayloadKind(tag.clone()));
            }
            let keyframes = &timeline.keyframes;
            let keyframe_index1 = bone_ref.keyframe_index as usize;
            let keyframe_index2 = (keyframe_index1 + 1) % keyframes.len();
            let timeline_keyframe1 = &keyframes[keyframe_index1];
            let timeline_keyframe2 = &keyframes[keyframe_index2];
            let time1 = timeline_keyframe1.time;
            let mut time2 = timeline_keyframe2.time;
            if time2 < time1 {
                time2 = anim.length;
            }
            let mut tween = 0.0;
            if time1 != time2 {
                tween = (mainline_time - time1) / (time2 - time1);
                tween = timeline_keyframe1.curve.evaluate(tween);
            }

            let (data_bone1, data_bone2) =
                match (&timeline_keyframe1.object, &timeline_keyframe2.object) {
                    (Object::Bone(bone1), Object::Bone(bone2)) => (bone1, bone2),
                    _ => {
                        return Err(Error::UnsupportedPayloadKind(
                            timeline.object_type.to_string(),
                        ))
                    }
                };

            if bone_index == self.bone_array.len() {
                self.bone_array.push(Bone::default());
            }
            let pose_bone = &mut self.bone_array[bone_index];
            pose_bone.copy_from(data_bone1);
            pose_bone.tween(data_bone2, tween, timeline_keyframe1.spin);
            // Name comes from the timeline, parent from the ref.
            pose_bone.name.clone_from(&timeline.name);
            pose_bone.parent_index = bone_ref.parent_index;
        }
        self.bone_array.truncate(mainline_keyframe1.bone_refs.len());

        // Bone world spaces, bottom-up; parents precede children in the
        // id-ordered pose array.
        for bone_index in 0..self.bone_array.len() {
            let parent_world = parent_world(&self.bone_array, self.bone_array[bone_index].parent_index);
            let bone = &mut self.bone_array[bone_index];
            bone.world_space = match parent_world {
                Some(parent_world) => Space::combine(&parent_world, &bone.local_space),
                None => bone.local_space,
            };
        }

        // Objects: same dereference/tween scheme, branched per payload kind.
        let object_refs = &mainline_keyframe1.object_refs;
        for (object_index, object_ref) in object_refs.iter().enumerate() {
            let timeline = &timeline_array[object_ref.timeline_index as usize];
            if let ObjectType::Other(tag) = &timeline.object_type {
                return Err(Error::UnsupportedPayloadKind(tag.clone()));
            }
            let keyframes = &timeline.keyframes;
            let keyframe_index1 = object_ref.keyframe_index as usize;
            let keyframe_index2 = (keyframe_index1 + 1) % keyframes.len();
            let timeline_keyframe1 = &keyframes[keyframe_index1];
            let timeline_keyframe2 = &keyframes[keyframe_index2];
            let time1 = timeline_keyframe1.time;
            let mut time2 = timeline_keyframe2.time;
            if time2 < time1 {
                time2 = anim.length;
            }
            let mut tween = 0.0;
            if time1 != time2 {
                tween = (mainline_time - time1) / (time2 - time1);
                tween = timeline_keyframe1.curve.evaluate(tween);
            }
            let spin = timeline_keyframe1.spin;

            // Reuse the slot when the kind matches, replace it otherwise.
            if object_index == self.object_array.len() {
                self.object_array.push(fresh_like(&timeline_keyframe1.object));
            }
            let slot = &mut self.object_array[object_index];
            if discriminant(&*slot) != discriminant(&timeline_keyframe1.object) {
                *slot = fresh_like(&timeline_keyframe1.object);
            }

            match (
                &mut *slot,
                &timeline_keyframe1.object,
                &timeline_keyframe2.object,
            ) {
                (Object::Sprite(pose_sprite), Object::Sprite(sprite1), Object::Sprite(sprite2)) => {
                    pose_sprite.copy_from(sprite1);
                    pose_sprite.tween(sprite2, tween, spin);
                    pose_sprite.name.clone_from(&timeline.name);
                    pose_sprite.parent_index = object_ref.parent_index;
                }
                (Object::Bone(pose_bone), Object::Bone(bone1), Object::Bone(bone2)) => {
                    pose_bone.copy_from(bone1);
                    pose_bone.tween(bone2, tween, spin);
                    pose_bone.name.clone_from(&timeline.name);
                    pose_bone.parent_index = object_ref.parent_index;
                }
                (Object::Box(pose_box), Object::Box(box1), Object::Box(box2)) => {
                    pose_box.copy_from(box1);
                    pose_box.tween(box2, tween, spin);
                    pose_box.name.clone_from(&timeline.name);
                    pose_box.parent_index = object_ref.parent_index;
                }
                (Object::Point(pose_point), Object::Point(point1), Object::Point(point2)) => {
                    pose_point.copy_from(point1);
                    pose_point.tween(point2, tween, spin);
                    pose_point.name.clone_from(&timeline.name);
                    pose_point.parent_index = object_ref.parent_index;
                }
                (Object::Sound(pose_sound), Object::Sound(sound1), Object::Sound(sound2)) => {
                    pose_sound.copy_from(sound1);
                    pose_sound.tween(sound2, tween, spin);
                    pose_sound.name.clone_from(&timeline.name);
                }
                (Object::Entity(pose_entity), Object::Entity(entity1), Object::Entity(entity2)) => {
                    pose_entity.copy_from(entity1);
                    pose_entity.tween(entity2, tween, spin);
                    pose_entity.name.clone_from(&timeline.name);
                    pose_entity.parent_index = object_ref.parent_index;
                }
                (
                    Object::Variable(pose_variable),
                    Object::Variable(variable1),
                    Object::Variable(variable2),
                ) => {
                    pose_variable.name.clone_from(&timeline.name);
                    pose_variable.copy_from(variable1);
                    pose_variable.tween(variable2, tween, spin);
                }
                _ => {
                    return Err(Error::UnsupportedPayloadKind(
                        timeline.object_type.to_string(),
                    ))
                }
            }
        }
        self.object_array.truncate(object_refs.len());

        // Character maps, in activation order; later maps may re-map the
        // output of earlier ones.
        for character_map_key in &self.character_map_key_array {
            if let Some(character_map) = entity.character_map_map.get(character_map_key) {
                for map_instruction in &character_map.map_instructions {
                    for object in &mut self.object_array {
                        if let Object::Sprite(sprite) = object {
                            if sprite.folder_index == map_instruction.folder_index
                                && sprite.file_index == map_instruction.file_index
                            {
                                sprite.folder_index = map_instruction.target_folder_index;
                                sprite.file_index = map_instruction.target_file_index;
                            }
                        }
                    }
                }
            }
        }

        // Object world spaces. Sprites and boxes get a pivot offset in
        // world space from the referenced file / obj-info dimensions.
        for object in &mut self.object_array {
            match object {
                Object::Sprite(sprite) => {
                    sprite.world_space = match parent_world(&self.bone_array, sprite.parent_index) {
                        Some(parent_world) => Space::combine(&parent_world, &sprite.local_space),
                        None => sprite.local_space,
                    };
                    if let Some(file) = data.image_file(sprite.folder_index, sprite.file_index) {
                        let offset_x = (0.5 - sprite.pivot.x) * file.width as f64;
                        let offset_y = (0.5 - sprite.pivot.y) * file.height as f64;
                        sprite.world_space.translate(offset_x, offset_y);
                    }
                }
                Object::Bone(bone) => {
                    bone.world_space = match parent_world(&self.bone_array, bone.parent_index) {
                        Some(parent_world) => Space::combine(&parent_world, &bone.local_space),
                        None => bone.local_space,
                    };
                }
                Object::Box(box_object) => {
                    box_object.world_space =
                        match parent_world(&self.bone_array, box_object.parent_index) {
                            Some(parent_world) => {
                                Space::combine(&parent_world, &box_object.local_space)
                            }
                            None => box_object.local_space,
                        };
                    if let Some((w, h)) = entity
                        .obj_info_map
                        .get(&box_object.name)
                        .and_then(|obj_info| obj_info.dims())
                    {
                        let offset_x = (0.5 - box_object.pivot.x) * w;
                        let offset_y = (0.5 - box_object.pivot.y) * h;
                        box_object.world_space.translate(offset_x, offset_y);
                    }
                }
                Object::Point(point) => {
                    point.world_space = match parent_world(&self.bone_array, point.parent_index) {
                        Some(parent_world) => Space::combine(&parent_world, &point.local_space),
                        None => point.local_space,
                    };
                }
                Object::Entity(entity_object) => {
                    entity_object.world_space =
                        match parent_world(&self.bone_array, entity_object.parent_index) {
                            Some(parent_world) => {
                                Space::combine(&parent_world, &entity_object.local_space)
                            }
                            None => entity_object.local_space,
                        };
                }
                Object::Sound(_) | Object::Variable(_) => {}
            }
        }

        // Sub-entities: drive each nested pose to the authored normalized
        // time, incrementally when the selection is unchanged.
        for object in &mut self.object_array {
            if let Object::Entity(entity_object) = object {
                let sub_entity_key =
                    match data.entity_keys.get(entity_object.entity_index as usize) {
                        Some(key) => key,
                        None => continue,
                    };
                let sub_pose = entity_object
                    .pose
                    .get_or_insert_with(|| Box::new(Pose::new(Arc::clone(&data))));
                if sub_entity_key != &sub_pose.entity_key {
                    sub_pose.set_entity(sub_entity_key);
                }
                let sub_entity = match data.entity_map.get(sub_entity_key) {
                    Some(sub_entity) => sub_entity,
                    None => continue,
                };
                let sub_anim_key =
                    match sub_entity.animation_keys.get(entity_object.animation_index as usize) {
                        Some(key) => key,
                        None => continue,
                    };
                if sub_anim_key != &sub_pose.anim_key {
                    sub_pose.set_anim(sub_anim_key);
                    let anim_length = sub_pose.cur_anim_length();
                    sub_pose.set_time(entity_object.animation_time * anim_length);
                } else {
                    let anim_length = sub_pose.cur_anim_length();
                    let sub_time = entity_object.animation_time * anim_length;
                    let sub_dt = sub_time - sub_pose.get_time();
                    sub_pose.update(sub_dt);
                }
                sub_pose.strike()?;
            }
        }

        // Edge-triggered track firings. Only the keyframe governing the
        // current time is inspected: a strike whose elapsed interval skips
        // several keyframes reports at most the last one.
        self.sound_array.clear();
        for soundline in &anim.soundline_array {
            if let Some(keyframe_index) = keyframe::find(&soundline.keyframes, time) {
                let keyframe = &soundline.keyframes[keyframe_index];
                if fired(elapsed_time, prev_time, time, keyframe.time) {
                    if let Some(file) =
                        data.file(keyframe.sound.folder_index, keyframe.sound.file_index)
                    {
                        self.sound_array.push(SoundEvent {
                            name: file.name().to_string(),
                            volume: keyframe.sound.volume,
                            panning: keyframe.sound.panning,
                        });
                    }
                }
            }
        }

        self.event_array.clear();
        for eventline in &anim.eventline_array {
            if let Some(keyframe_index) = keyframe::find(&eventline.keyframes, time) {
                let keyframe = &eventline.keyframes[keyframe_index];
                if fired(elapsed_time, prev_time, time, keyframe.time) {
                    self.event_array.push(eventline.name.clone());
                }
            }
        }

        if let Some(meta) = &anim.meta {
            // Tags hold their last fired set between firings.
            if let Some(keyframe_index) = keyframe::find(&meta.tagline.keyframes, time) {
                let keyframe = &meta.tagline.keyframes[keyframe_index];
                if fired(elapsed_time, prev_time, time, keyframe.time) {
                    self.tag_array.clear();
                    for tag in &keyframe.tags {
                        if let Some(tag_def) =
                            data.tag_def_array.get(tag.tag_def_index as usize)
                        {
                            self.tag_array.push(tag_def.name.clone());
                        }
                    }
                    self.tag_array.sort();
                }
            }

            // Variables are level-valued: re-evaluated every strike with
            // plain linear progress (per-keyframe curves intentionally not
            // applied here).
            for varline in &meta.varlines {
                if let Some(keyframe_index1) = keyframe::find(&varline.keyframes, time) {
                    let keyframe_index2 = (keyframe_index1 + 1) % varline.keyframes.len();
                    let keyframe1 = &varline.keyframes[keyframe_index1];
                    let keyframe2 = &varline.keyframes[keyframe_index2];
                    let time1 = keyframe1.time;
                    let mut time2 = keyframe2.time;
                    if time2 < time1 {
                        time2 = anim.length;
                    }
                    let mut tween = 0.0;
                    if time1 != time2 {
                        tween = (time - time1) / (time2 - time1);
                    }
                    if let Some(var_def) =
                        entity.var_defs.var_defs.get(varline.var_def_index as usize)
                    {
                        let val = match &var_def.default {
                            VarDefault::Int(_) => VarValue::Int(lerp(
                                keyframe1.val.as_number(),
                                keyframe2.val.as_number(),
                                tween,
                            )
                                as i64),
                            VarDefault::Float(_) => VarValue::Float(lerp(
                                keyframe1.val.as_number(),
                                keyframe2.val.as_number(),
                                tween,
                            )),
                            VarDefault::Str(_) => keyframe1.val.clone(),
                            VarDefault::Other(_) => VarValue::Float(0.0),
                        };
                        self.var_map.insert(var_def.name.clone(), val);
                    }
                }
            }
        }

        Ok(())
    }
}

fn parent_world(bone_array: &[Bone], parent_index: i32) -> Option<Space> {
    usize::try_from(parent_index)
        .ok()
        .and_then(|index| bone_array.get(index))
        .map(|bone| bone.world_space)
}

/// Forward travel fires on `prev_time <= t <= time`, backward on
/// `time <= t <= prev_time`; a zero-length step never fires.
fn fired(elapsed_time: f64, prev_time: f64, time: f64, keyframe_time: f64) -> bool {
    (elapsed_time < 0.0 && time <= keyframe_time && keyframe_time <= prev_time)
        || (elapsed_time > 0.0 && prev_time <= keyframe_time && keyframe_time <= time)
}

/// Fresh default payload of the same kind, used when a reused slot held a
/// different kind last strike.
fn fresh_like(object: &Object) -> Object {
    match object {
        Object::Sprite(_) => Object::Sprite(Default::default()),
        Object::Bone(_) => Object::Bone(Default::default()),
        Object::Box(_) => Object::Box(Default::default()),
        Object::Point(_) => Object::Point(Default::default()),
        Object::Sound(_) => Object::Sound(Default::default()),
        Object::Entity(_) => Object::Entity(Default::default()),
        Object::Variable(_) => Object::Variable(Default::default()),
    }
}
