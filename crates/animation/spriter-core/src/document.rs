//! The animation document: folders of files, entities, and the one-time
//! post-load pivot patch.
//!
//! A [`Document`] is immutable after [`Document::load`] and is shared
//! read-only (`Arc`) by any number of poses.

use hashbrown::HashMap;
use serde_json::Value as JsonValue;

use crate::entity::Entity;
use crate::error::Error;
use crate::json::{load_float, load_int, load_string, make_array};
use crate::math::Vector;
use crate::meta::TagDef;
use crate::objects::Object;

#[derive(Clone, Debug, Default)]
pub struct ImageFile {
    pub id: i32,
    pub name: String,
    pub width: i32,
    pub height: i32,
    pub pivot: Vector,
}

impl ImageFile {
    pub fn load(json: &JsonValue) -> ImageFile {
        ImageFile {
            id: load_int(json, "id", -1),
            name: load_string(json, "name", ""),
            width: load_int(json, "width", 0),
            height: load_int(json, "height", 0),
            pivot: Vector::new(
                load_float(json, "pivot_x", 0.0),
                load_float(json, "pivot_y", 1.0),
            ),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct SoundFile {
    pub id: i32,
    pub name: String,
}

impl SoundFile {
    pub fn load(json: &JsonValue) -> SoundFile {
        SoundFile {
            id: load_int(json, "id", -1),
            name: load_string(json, "name", ""),
        }
    }
}

/// An asset entry of a folder, addressed by `(folder_index, file_index)`.
#[derive(Clone, Debug)]
pub enum File {
    Image(ImageFile),
    Sound(SoundFile),
}

impl File {
    pub fn load(json: &JsonValue) -> File {
        match load_string(json, "type", "image").as_str() {
            "sound" => File::Sound(SoundFile::load(json)),
            _ => File::Image(ImageFile::load(json)),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            File::Image(f) => &f.name,
            File::Sound(f) => &f.name,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Folder {
    pub id: i32,
    pub name: String,
    pub file_array: Vec<File>,
}

impl Folder {
    pub fn load(json: &JsonValue) -> Folder {
        Folder {
            id: load_int(json, "id", -1),
            name: load_string(json, "name", ""),
            file_array: make_array(json, "file").into_iter().map(File::load).collect(),
        }
    }
}

#[derive(Debug, Default)]
pub struct Document {
    pub scon_version: String,
    pub generator: String,
    pub generator_version: String,
    pub folder_array: Vec<Folder>,
    pub tag_def_array: Vec<TagDef>,
    pub entity_map: HashMap<String, Entity>,
    /// Load order; the only iteration-order contract for UI enumeration.
    pub entity_keys: Vec<String>,
}

impl Document {
    /// Parse a SCON document from its JSON text.
    pub fn from_json_str(text: &str) -> Result<Document, Error> {
        let json: JsonValue = serde_json::from_str(text)?;
        Ok(Document::load(&json))
    }

    /// Build a document from a parsed JSON tree. Missing or malformed
    /// fields resolve to their documented defaults; this never fails.
    pub fn load(json: &JsonValue) -> Document {
        let mut document = Document {
            scon_version: load_string(json, "scon_version", ""),
            generator: load_string(json, "generator", ""),
            generator_version: load_string(json, "generator_version", ""),
            folder_array: make_array(json, "folder")
                .into_iter()
                .map(Folder::load)
                .collect(),
            tag_def_array: make_array(json, "tag_list")
                .into_iter()
                .map(TagDef::load)
                .collect(),
            ..Document::default()
        };

        for entity_json in make_array(json, "entity") {
            let entity = Entity::load(entity_json);
            document.entity_keys.push(entity.name.clone());
            document.entity_map.insert(entity.name.clone(), entity);
        }

        document.patch_default_pivots();
        document
    }

    /// Back-fill file pivots into every sprite keyframe that did not author
    /// an explicit pivot. Runs once, before the document is shared.
    fn patch_default_pivots(&mut self) {
        let Document {
            folder_array,
            entity_map,
            ..
        } = self;
        for entity in entity_map.values_mut() {
            for animation in entity.animation_map.values_mut() {
                for timeline in &mut animation.timeline_array {
                    for keyframe in &mut timeline.keyframes {
                        if let Object::Sprite(sprite) = &mut keyframe.object {
                            if sprite.default_pivot {
                                let file = folder_array
                                    .get(sprite.folder_index as usize)
                                    .and_then(|folder| {
                                        folder.file_array.get(sprite.file_index as usize)
                                    });
                                if let Some(File::Image(file)) = file {
                                    sprite.pivot = file.pivot;
                                }
                            }
                        }
                    }
                }
            }
        }
    }

    /// Resolve a `(folder_index, file_index)` pair; stale indices yield
    /// `None` and callers skip the object.
    pub fn file(&self, folder_index: i32, file_index: i32) -> Option<&File> {
        self.folder_array
            .get(usize::try_from(folder_index).ok()?)?
            .file_array
            .get(usize::try_from(file_index).ok()?)
    }

    pub fn image_file(&self, folder_index: i32, file_index: i32) -> Option<&ImageFile> {
        match self.file(folder_index, file_index) {
            Some(File::Image(file)) => Some(file),
            _ => None,
        }
    }

    pub fn entities(&self) -> &HashMap<String, Entity> {
        &self.entity_map
    }

    pub fn entity_keys(&self) -> &[String] {
        &self.entity_keys
    }

    pub fn anims(&self, entity_key: &str) -> Option<&HashMap<String, crate::animation::Animation>> {
        self.entity_map
            .get(entity_key)
            .map(|entity| &entity.animation_map)
    }

    pub fn anim_keys(&self, entity_key: &str) -> &[String] {
        self.entity_map
            .get(entity_key)
            .map(|entity| entity.animation_keys.as_slice())
            .unwrap_or(&[])
    }
}
